//! Hover focus: which nodes and edges relate to the hovered node, and how
//! strongly. Pure functions of graph state; recomputed on every hover
//! change, never cached across hovers.

use std::collections::{HashMap, HashSet};

use crate::world::{Graph, Node};

/// Emphasis output for one hovered node. Nodes and edges absent from the
/// maps are unfocused; dimming them is the renderer's decision.
#[derive(Clone, Debug, Default)]
pub struct FocusState {
    pub focused: HashSet<String>,
    pub node_strength: HashMap<String, f32>,
    pub edge_strength: HashMap<(String, String), f32>,
}

impl FocusState {
    pub fn is_empty(&self) -> bool {
        self.focused.is_empty()
    }
}

/// Jaccard similarity of two nodes' non-structural tag sets, 0 when both
/// are empty.
pub fn tag_similarity(a: &Node, b: &Node) -> f32 {
    let a_tags = a.semantic_tags().collect::<HashSet<_>>();
    let b_tags = b.semantic_tags().collect::<HashSet<_>>();
    let union = a_tags.union(&b_tags).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a_tags.intersection(&b_tags).count();
    intersection as f32 / union as f32
}

/// Focus set and strengths for a hovered node: the node itself, its
/// parent, its children, and its edge-neighbors in either direction.
/// Relatedness per node is `max(edge strength, tag similarity)`, so either
/// signal alone is enough to register a relationship.
pub fn compute_focus(graph: &Graph, hovered: Option<&str>) -> FocusState {
    let Some(hovered_node) = hovered.and_then(|id| graph.node(id)) else {
        return FocusState::default();
    };

    let mut focused = HashSet::new();
    focused.insert(hovered_node.id.clone());
    if let Some(parent) = &hovered_node.parent {
        focused.insert(parent.clone());
    }
    for child in graph.children(&hovered_node.id) {
        focused.insert(child.id.clone());
    }
    for neighbor in graph.neighbor_ids(&hovered_node.id) {
        focused.insert(neighbor.to_owned());
    }

    let mut node_strength = HashMap::with_capacity(focused.len());
    node_strength.insert(hovered_node.id.clone(), 1.0);
    for id in &focused {
        if id == &hovered_node.id {
            continue;
        }
        let Some(node) = graph.node(id) else {
            continue;
        };
        let edge_strength = graph.max_edge_strength(&hovered_node.id, id);
        let similarity = tag_similarity(hovered_node, node);
        node_strength.insert(id.clone(), edge_strength.max(similarity));
    }

    let mut edge_strength = HashMap::new();
    for edge in &graph.edges {
        if edge.is_containment() {
            continue;
        }
        if focused.contains(&edge.from) && focused.contains(&edge.to) {
            edge_strength.insert((edge.from.clone(), edge.to.clone()), edge.strength);
        }
    }

    FocusState {
        focused,
        node_strength,
        edge_strength,
    }
}

/// Focus-relevant ids currently hidden by the tag filter. These are
/// promoted to visible for the duration of the hover. The caller derives
/// this set fresh on every hover change, so one hover's surfaced ids can
/// never leak into the next.
pub fn surfaced_ids(focus: &FocusState, visible: &HashSet<String>) -> HashSet<String> {
    focus
        .focused
        .iter()
        .filter(|id| !visible.contains(*id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Edge, Tier};
    use eframe::egui::{Color32, vec2};

    fn node(id: &str, tier: Tier, parent: Option<&str>, tags: &[&str]) -> Node {
        Node {
            id: id.to_owned(),
            label: id.to_owned(),
            description: String::new(),
            url: None,
            tier,
            parent: parent.map(str::to_owned),
            pos: vec2(0.0, 0.0),
            base: vec2(0.0, 0.0),
            radius: 20.0,
            color: Color32::WHITE,
            tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
            status: None,
        }
    }

    fn edge(from: &str, to: &str, label: Option<&str>, strength: f32) -> Edge {
        Edge {
            from: from.to_owned(),
            to: to.to_owned(),
            label: label.map(str::to_owned),
            strength,
        }
    }

    fn fixture() -> Graph {
        Graph::new(
            vec![
                node("region", Tier::Region, None, &["ecosystem"]),
                node("a", Tier::Project, Some("region"), &["rust", "media"]),
                node("b", Tier::Project, Some("region"), &["rust", "media"]),
                node("c", Tier::Project, None, &["typescript"]),
                node("d", Tier::Project, None, &[]),
            ],
            vec![
                edge("region", "a", None, 0.7),
                edge("region", "b", None, 0.7),
                edge("a", "b", Some("uses"), 0.8),
                edge("c", "a", Some("client"), 0.3),
            ],
        )
    }

    #[test]
    fn no_hover_is_an_empty_state() {
        let state = compute_focus(&fixture(), None);
        assert!(state.is_empty());
        assert!(state.node_strength.is_empty());
        assert!(state.edge_strength.is_empty());
    }

    #[test]
    fn unknown_hover_id_is_an_empty_state() {
        assert!(compute_focus(&fixture(), Some("ghost")).is_empty());
    }

    #[test]
    fn focus_collects_self_parent_children_and_neighbors() {
        let graph = fixture();
        let state = compute_focus(&graph, Some("a"));
        for id in ["a", "region", "b", "c"] {
            assert!(state.focused.contains(id), "missing {id}");
        }
        assert!(!state.focused.contains("d"));

        // Hovering the region focuses its children.
        let state = compute_focus(&graph, Some("region"));
        assert!(state.focused.contains("a"));
        assert!(state.focused.contains("b"));
    }

    #[test]
    fn neighbor_relation_is_symmetric() {
        let graph = fixture();
        // Edge c -> a is directed; focus treats it both ways.
        assert!(compute_focus(&graph, Some("c")).focused.contains("a"));
        assert!(compute_focus(&graph, Some("a")).focused.contains("c"));
    }

    #[test]
    fn hovered_node_has_full_strength() {
        let state = compute_focus(&fixture(), Some("a"));
        assert_eq!(state.node_strength["a"], 1.0);
    }

    #[test]
    fn strength_is_max_of_edge_and_similarity() {
        let graph = fixture();
        let state = compute_focus(&graph, Some("a"));
        // a-b: edge 0.8, identical tags (similarity 1.0) -> 1.0 wins.
        assert_eq!(state.node_strength["b"], 1.0);
        // a-c: edge 0.3, no shared tags -> edge wins.
        assert!((state.node_strength["c"] - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn similarity_ignores_structural_tags_and_bounds_hold() {
        let a = node("a", Tier::Project, None, &["project", "rust", "media"]);
        let b = node("b", Tier::Project, None, &["ecosystem", "rust", "media"]);
        assert_eq!(tag_similarity(&a, &b), 1.0);

        let bare = node("x", Tier::Project, None, &[]);
        let structural_only = node("y", Tier::Project, None, &["region"]);
        assert_eq!(tag_similarity(&bare, &structural_only), 0.0);

        let c = node("c", Tier::Project, None, &["rust"]);
        let d = node("d", Tier::Project, None, &["rust", "lua", "games"]);
        let similarity = tag_similarity(&c, &d);
        assert!((0.0..=1.0).contains(&similarity));
        assert!((similarity - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn unrelated_nodes_score_zero() {
        let graph = fixture();
        let hovered = graph.node("c").expect("c");
        let other = graph.node("d").expect("d");
        assert_eq!(tag_similarity(hovered, other), 0.0);
        assert_eq!(graph.max_edge_strength("c", "d"), 0.0);
    }

    #[test]
    fn containment_edges_are_not_emphasized() {
        let state = compute_focus(&fixture(), Some("a"));
        assert!(
            state
                .edge_strength
                .contains_key(&("a".to_owned(), "b".to_owned()))
        );
        assert!(
            !state
                .edge_strength
                .contains_key(&("region".to_owned(), "a".to_owned()))
        );
    }

    #[test]
    fn surfacing_reverts_when_focus_moves() {
        let graph = fixture();
        // Filter leaves only a and d visible; hovering a surfaces its
        // hidden relatives.
        let visible = ["a", "d"]
            .iter()
            .map(|id| (*id).to_owned())
            .collect::<HashSet<_>>();

        let surfaced = surfaced_ids(&compute_focus(&graph, Some("a")), &visible);
        assert!(surfaced.contains("b"));
        assert!(surfaced.contains("c"));

        // Moving the hover to d recomputes surfacing from scratch; the
        // previous hover's ids do not persist.
        let surfaced = surfaced_ids(&compute_focus(&graph, Some("d")), &visible);
        assert!(surfaced.is_empty());

        let surfaced = surfaced_ids(&compute_focus(&graph, None), &visible);
        assert!(surfaced.is_empty());
    }
}
