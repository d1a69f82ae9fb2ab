//! Tag filtering: which nodes are visible under the active tag selection,
//! plus the presentation-only ghosting signal for filtered-out nodes.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::world::{Graph, Tier};

use super::focus::tag_similarity;

#[derive(Clone, Debug)]
pub struct FilterState {
    pub active: BTreeSet<String>,
    pub available: Vec<String>,
}

impl FilterState {
    /// Derive the filterable tag list from all non-region nodes.
    pub fn new(graph: &Graph) -> Self {
        let mut tags = BTreeSet::new();
        for node in &graph.nodes {
            if node.tier == Tier::Region {
                continue;
            }
            for tag in node.semantic_tags() {
                tags.insert(tag.to_owned());
            }
        }
        Self {
            active: BTreeSet::new(),
            available: tags.into_iter().collect(),
        }
    }

    pub fn is_filtering(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.active.remove(tag) {
            self.active.insert(tag.to_owned());
        }
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// Node ids passing the current filter. With no active tags everything
    /// is visible. Otherwise a non-region node passes iff its tags
    /// intersect the active set, and a region passes iff at least one of
    /// its children does.
    pub fn visible_ids(&self, graph: &Graph) -> HashSet<String> {
        let mut visible = HashSet::new();

        for node in &graph.nodes {
            if node.tier == Tier::Region {
                continue;
            }
            let passes = !self.is_filtering()
                || node.semantic_tags().any(|tag| self.active.contains(tag));
            if passes {
                visible.insert(node.id.clone());
            }
        }

        for node in &graph.nodes {
            if node.tier != Tier::Region {
                continue;
            }
            let passes = !self.is_filtering()
                || graph
                    .children(&node.id)
                    .any(|child| visible.contains(&child.id));
            if passes {
                visible.insert(node.id.clone());
            }
        }

        visible
    }
}

/// For each filtered-out node, how related it is to the visible set:
/// the max over visible nodes of `max(edge strength, tag similarity)`.
/// Purely presentational; drives ghost opacity, never visibility.
pub fn adjacent_strength(graph: &Graph, visible: &HashSet<String>) -> HashMap<String, f32> {
    let mut strengths = HashMap::new();
    for hidden in &graph.nodes {
        if visible.contains(&hidden.id) || hidden.tier == Tier::Region {
            continue;
        }

        let mut best = 0.0_f32;
        for other in &graph.nodes {
            if !visible.contains(&other.id) || other.tier == Tier::Region {
                continue;
            }
            best = best
                .max(graph.max_edge_strength(&hidden.id, &other.id))
                .max(tag_similarity(hidden, other));
        }

        if best > 0.0 {
            strengths.insert(hidden.id.clone(), best);
        }
    }
    strengths
}

/// Region fade when only part of its children survive the filter.
pub fn region_opacity(graph: &Graph, visible: &HashSet<String>, region_id: &str) -> f32 {
    let mut total = 0usize;
    let mut shown = 0usize;
    for child in graph.children(region_id) {
        total += 1;
        if visible.contains(&child.id) {
            shown += 1;
        }
    }
    member_opacity(shown, total)
}

/// Opacity for a container with `shown` of `total` members visible.
/// Containers with no members stay fully opaque.
pub fn member_opacity(shown: usize, total: usize) -> f32 {
    if total == 0 {
        return 1.0;
    }
    0.25 + 0.75 * (shown as f32 / total as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Edge, Node};
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

    fn fixture() -> Graph {
        Graph::new(
            vec![
                node("r1", Tier::Region, None, &["ecosystem"]),
                node("r2", Tier::Region, None, &["ecosystem"]),
                node("a", Tier::Project, Some("r1"), &["rust", "media"]),
                node("b", Tier::Project, Some("r1"), &["lua"]),
                node("c", Tier::Project, Some("r2"), &["typescript"]),
                node("d", Tier::Detail, None, &["writing"]),
            ],
            vec![Edge {
                from: "a".to_owned(),
                to: "c".to_owned(),
                label: Some("uses".to_owned()),
                strength: 0.6,
            }],
        )
    }

    #[test]
    fn available_tags_are_sorted_and_exclude_structural() {
        let filter = FilterState::new(&fixture());
        assert_eq!(
            filter.available,
            vec!["lua", "media", "rust", "typescript", "writing"]
        );
    }

    #[test]
    fn no_active_tags_means_everything_visible() {
        let graph = fixture();
        let filter = FilterState::new(&graph);
        let visible = filter.visible_ids(&graph);
        assert_eq!(visible.len(), graph.node_count());
    }

    #[test]
    fn nodes_pass_by_tag_intersection() {
        let graph = fixture();
        let mut filter = FilterState::new(&graph);
        filter.toggle_tag("rust");
        filter.toggle_tag("lua");
        let visible = filter.visible_ids(&graph);
        assert!(visible.contains("a"));
        assert!(visible.contains("b"));
        assert!(!visible.contains("c"));
        assert!(!visible.contains("d"));
    }

    #[test]
    fn regions_follow_their_children() {
        let graph = fixture();
        let mut filter = FilterState::new(&graph);
        filter.toggle_tag("rust");
        let visible = filter.visible_ids(&graph);
        // r1 keeps a visible child, r2's only child is filtered out.
        assert!(visible.contains("r1"));
        assert!(!visible.contains("r2"));
    }

    #[test]
    fn toggle_is_an_involution() {
        let graph = fixture();
        let mut filter = FilterState::new(&graph);
        filter.toggle_tag("rust");
        assert!(filter.is_filtering());
        filter.toggle_tag("rust");
        assert!(!filter.is_filtering());
    }

    #[test]
    fn adjacent_strength_relates_hidden_to_visible() {
        let graph = fixture();
        let mut filter = FilterState::new(&graph);
        filter.toggle_tag("typescript");
        let visible = filter.visible_ids(&graph);
        let strengths = adjacent_strength(&graph, &visible);
        // a is hidden but has a 0.6 edge to the visible c.
        assert!((strengths["a"] - 0.6).abs() < f32::EPSILON);
        // d shares nothing with c.
        assert!(!strengths.contains_key("d"));
    }

    #[test]
    fn region_opacity_scales_with_visible_children() {
        let graph = fixture();
        let mut filter = FilterState::new(&graph);
        filter.toggle_tag("rust");
        let visible = filter.visible_ids(&graph);
        // r1: one of two children visible.
        let opacity = region_opacity(&graph, &visible, "r1");
        assert!((opacity - 0.625).abs() < 1e-6);
        // Childless regions stay fully opaque.
        assert_eq!(region_opacity(&graph, &visible, "none"), 1.0);
    }
}
