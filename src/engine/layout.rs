//! Force-directed re-layout of the visible subgraph.
//!
//! `run_layout` is a synchronous fixed-iteration simulation: it runs to
//! convergence (or the step cap) within one call and writes final resting
//! positions. The visual transition toward those positions is owned by the
//! presentation layer. Together with `reset_layout` these are the only two
//! functions that write node positions.

use std::collections::HashSet;

use eframe::egui::{Vec2, vec2};

use crate::world::Graph;

/// Tunable simulation constants. The defaults are empirically tuned for
/// this dataset's scale and carry no physical meaning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    pub repulsion: f32,
    pub spring_k: f32,
    pub rest_length: f32,
    pub anchor_k: f32,
    pub center_k: f32,
    pub damping: f32,
    pub max_force: f32,
    pub max_steps: usize,
    pub convergence: f32,
    pub fade_threshold: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 5000.0,
            spring_k: 0.008,
            rest_length: 80.0,
            anchor_k: 0.08,
            center_k: 0.006,
            damping: 0.85,
            max_force: 10.0,
            max_steps: 200,
            convergence: 0.5,
            fade_threshold: 0.45,
        }
    }
}

/// How strongly the simulation result displaces nodes from their bases.
/// Fades to zero as the visible fraction approaches the threshold, so a
/// barely-restricting filter does not rearrange the whole world.
pub fn fade_weight(movable: usize, total_unpinned: usize, threshold: f32) -> f32 {
    if total_unpinned == 0 || threshold <= 0.0 {
        return 0.0;
    }
    let ratio = movable as f32 / total_unpinned as f32;
    ((threshold - ratio) / threshold).max(0.0)
}

/// Unit direction and distance between two points, with coincident points
/// treated as one unit apart so forces stay finite.
fn separation(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        (vec2(1.0, 0.0), 1.0)
    } else {
        (delta / distance, distance)
    }
}

/// Reposition visible non-region nodes. Region nodes and nodes outside
/// `visible` are never touched. Starts from current positions, so rapid
/// successive filter changes compose without snapping.
pub fn run_layout(graph: &mut Graph, visible: &HashSet<String>, config: &LayoutConfig) {
    let movable = graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| visible.contains(&node.id) && !node.tier.is_pinned())
        .map(|(index, _)| index)
        .collect::<Vec<_>>();
    if movable.is_empty() {
        return;
    }

    let total_unpinned = graph
        .nodes
        .iter()
        .filter(|node| !node.tier.is_pinned())
        .count();
    let weight = fade_weight(movable.len(), total_unpinned, config.fade_threshold);
    if weight <= 0.0 {
        return;
    }

    // Active edges resolved to indices. Edges referencing unknown ids are
    // skipped, as are edges between two pinned endpoints. A mixed edge
    // keeps its pinned endpoint as a fixed attractor.
    let edges = graph
        .edges
        .iter()
        .filter_map(|edge| {
            if !visible.contains(&edge.from) || !visible.contains(&edge.to) {
                return None;
            }
            let from = graph.index_of(&edge.from)?;
            let to = graph.index_of(&edge.to)?;
            if from == to
                || (graph.nodes[from].tier.is_pinned() && graph.nodes[to].tier.is_pinned())
            {
                return None;
            }
            Some((from, to))
        })
        .collect::<Vec<_>>();

    let mut slot_of = vec![usize::MAX; graph.nodes.len()];
    for (slot, &index) in movable.iter().enumerate() {
        slot_of[index] = slot;
    }
    let mut velocities = vec![Vec2::ZERO; movable.len()];

    for _ in 0..config.max_steps {
        // Pairwise repulsion among movable nodes.
        for a_slot in 0..movable.len() {
            for b_slot in (a_slot + 1)..movable.len() {
                let a = movable[a_slot];
                let b = movable[b_slot];
                let (direction, distance) =
                    separation(graph.nodes[a].pos, graph.nodes[b].pos);
                let force = (config.repulsion / (distance * distance)).min(config.max_force);
                velocities[a_slot] -= direction * force;
                velocities[b_slot] += direction * force;
            }
        }

        // Spring attraction along active edges. Only movable endpoints
        // receive the force; pinned endpoints still exert it.
        for &(from, to) in &edges {
            let (direction, distance) =
                separation(graph.nodes[from].pos, graph.nodes[to].pos);
            let force = (distance - config.rest_length) * config.spring_k;
            let pull = direction * force;
            let from_slot = slot_of[from];
            if from_slot != usize::MAX {
                velocities[from_slot] += pull;
            }
            let to_slot = slot_of[to];
            if to_slot != usize::MAX {
                velocities[to_slot] -= pull;
            }
        }

        // Weak pull back toward each node's anchor.
        for (slot, &index) in movable.iter().enumerate() {
            let node = &graph.nodes[index];
            velocities[slot] += (node.base - node.pos) * config.anchor_k;
        }

        // Weak pull toward the collective centroid, so disconnected
        // subgraphs do not drift apart.
        let mut centroid = Vec2::ZERO;
        for &index in &movable {
            centroid += graph.nodes[index].pos;
        }
        centroid /= movable.len() as f32;
        for (slot, &index) in movable.iter().enumerate() {
            velocities[slot] += (centroid - graph.nodes[index].pos) * config.center_k;
        }

        // Damped integration with an early exit at steady state.
        let mut max_component = 0.0_f32;
        for (slot, &index) in movable.iter().enumerate() {
            velocities[slot] *= config.damping;
            graph.nodes[index].pos += velocities[slot];
            max_component = max_component
                .max(velocities[slot].x.abs())
                .max(velocities[slot].y.abs());
        }

        if max_component < config.convergence {
            break;
        }
    }

    // Blend back toward base positions as the visible fraction grows.
    if weight < 1.0 {
        for &index in &movable {
            let node = &mut graph.nodes[index];
            node.pos = node.base + (node.pos - node.base) * weight;
        }
    }
}

/// Restore every node, regardless of tier, to its anchor position.
pub fn reset_layout(graph: &mut Graph) {
    for node in &mut graph.nodes {
        node.pos = node.base;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Edge, Node, Tier};
    use eframe::egui::vec2;

    fn node(id: &str, tier: Tier, x: f32, y: f32) -> Node {
        let pos = vec2(x, y);
        Node {
            id: id.to_owned(),
            label: id.to_owned(),
            description: String::new(),
            url: None,
            tier,
            parent: None,
            pos,
            base: pos,
            radius: 20.0,
            color: eframe::egui::Color32::WHITE,
            tags: Vec::new(),
            status: None,
        }
    }

    fn edge(from: &str, to: &str, strength: f32) -> Edge {
        Edge {
            from: from.to_owned(),
            to: to.to_owned(),
            label: Some("dep".to_owned()),
            strength,
        }
    }

    fn visible(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| (*id).to_owned()).collect()
    }

    /// A sparse cluster: few enough visible nodes for full layout weight.
    fn small_graph() -> Graph {
        let mut nodes = vec![
            node("region", Tier::Region, 0.0, 0.0),
            node("a", Tier::Project, 10.0, 0.0),
            node("b", Tier::Project, 20.0, 5.0),
        ];
        // Padding nodes bring the non-pinned total to 20.
        for index in 0..18 {
            nodes.push(node(
                &format!("pad{index}"),
                Tier::Project,
                200.0 + index as f32 * 30.0,
                200.0,
            ));
        }
        Graph::new(nodes, vec![edge("a", "b", 0.8)])
    }

    #[test]
    fn fade_weight_boundaries() {
        // Exactly at the threshold: zero weight.
        assert_eq!(fade_weight(9, 20, 0.45), 0.0);
        // Above the threshold: still zero.
        assert_eq!(fade_weight(18, 20, 0.45), 0.0);
        // One of twenty visible: close to 0.89.
        let weight = fade_weight(1, 20, 0.45);
        assert!((weight - 0.888_888_9).abs() < 1e-4, "weight {weight}");
        // Degenerate totals never divide by zero.
        assert_eq!(fade_weight(0, 0, 0.45), 0.0);
    }

    #[test]
    fn regions_are_never_moved() {
        let mut graph = small_graph();
        let all = graph
            .nodes
            .iter()
            .map(|node| node.id.clone())
            .collect::<HashSet<_>>();
        run_layout(&mut graph, &visible(&["region", "a", "b"]), &LayoutConfig::default());
        run_layout(&mut graph, &all, &LayoutConfig::default());
        let region = graph.node("region").expect("region node");
        assert_eq!(region.pos, region.base);
    }

    #[test]
    fn at_threshold_ratio_nothing_moves() {
        // 9 of 20 non-pinned nodes visible: ratio exactly 0.45.
        let mut graph = small_graph();
        let ids = ["a", "b", "pad0", "pad1", "pad2", "pad3", "pad4", "pad5", "pad6"];
        let before = graph.nodes.iter().map(|node| node.pos).collect::<Vec<_>>();
        run_layout(&mut graph, &visible(&ids), &LayoutConfig::default());
        let after = graph.nodes.iter().map(|node| node.pos).collect::<Vec<_>>();
        assert_eq!(before, after);
    }

    #[test]
    fn displacement_is_scaled_by_the_fade_weight() {
        // Two graphs, identical forces; only the blend weight differs.
        let config = LayoutConfig::default();
        let mut blended = small_graph();
        run_layout(&mut blended, &visible(&["a", "b"]), &config);

        let full = LayoutConfig {
            // Threshold so large the weight is effectively 1.
            fade_threshold: 1.0e6,
            ..config
        };
        let mut unblended = small_graph();
        run_layout(&mut unblended, &visible(&["a", "b"]), &full);

        let weight = fade_weight(2, 20, config.fade_threshold);
        for (a, b) in blended.nodes.iter().zip(unblended.nodes.iter()) {
            let blended_drift = (a.pos - a.base).length();
            let full_drift = (b.pos - b.base).length();
            if full_drift > 1.0 {
                let ratio = blended_drift / full_drift;
                assert!(
                    (ratio - weight).abs() < 1e-2,
                    "{}: drift ratio {ratio} vs weight {weight}",
                    a.id
                );
            }
        }

        // The spring actually separated the two close nodes.
        let a = unblended.node("a").expect("a");
        let b = unblended.node("b").expect("b");
        assert!((a.pos - b.pos).length() > (a.base - b.base).length());
    }

    #[test]
    fn second_run_on_converged_graph_barely_moves() {
        let mut graph = small_graph();
        // Tight convergence leaves almost no residual travel, so the
        // second run restarts from a true steady state.
        let config = LayoutConfig {
            convergence: 0.01,
            max_steps: 5000,
            ..LayoutConfig::default()
        };
        let ids = visible(&["a", "b"]);
        run_layout(&mut graph, &ids, &config);
        let settled = graph.nodes.iter().map(|node| node.pos).collect::<Vec<_>>();
        run_layout(&mut graph, &ids, &config);
        for (node, before) in graph.nodes.iter().zip(settled) {
            let delta = node.pos - before;
            assert!(
                delta.x.abs() < 0.5 && delta.y.abs() < 0.5,
                "{} drifted by {delta:?}",
                node.id
            );
        }
    }

    #[test]
    fn reset_restores_every_base_exactly() {
        let mut graph = small_graph();
        run_layout(&mut graph, &visible(&["a", "b"]), &LayoutConfig::default());
        reset_layout(&mut graph);
        for node in &graph.nodes {
            assert_eq!(node.pos, node.base, "{}", node.id);
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let mut first = small_graph();
        let mut second = small_graph();
        let ids = visible(&["a", "b", "pad0"]);
        let config = LayoutConfig::default();
        run_layout(&mut first, &ids, &config);
        run_layout(&mut second, &ids, &config);
        for (a, b) in first.nodes.iter().zip(second.nodes.iter()) {
            assert_eq!(a.pos, b.pos, "{}", a.id);
        }
    }

    #[test]
    fn malformed_edges_are_skipped() {
        let nodes = vec![
            node("a", Tier::Project, 0.0, 0.0),
            node("b", Tier::Project, 30.0, 0.0),
        ];
        let edges = vec![edge("a", "ghost", 0.5), edge("ghost", "b", 0.5)];
        let mut graph = Graph::new(nodes, edges);
        let mut ids = visible(&["a", "b"]);
        ids.insert("ghost".to_owned());
        // Threshold high enough that the simulation actually runs.
        let config = LayoutConfig {
            fade_threshold: 1.0e6,
            ..LayoutConfig::default()
        };
        // Must not panic; both real nodes still simulate.
        run_layout(&mut graph, &ids, &config);
        assert_ne!(graph.node("a").expect("a").pos, vec2(0.0, 0.0));
    }

    #[test]
    fn coincident_nodes_do_not_blow_up() {
        let nodes = vec![
            node("a", Tier::Project, 5.0, 5.0),
            node("b", Tier::Project, 5.0, 5.0),
        ];
        let mut graph = Graph::new(nodes, vec![edge("a", "b", 1.0)]);
        let config = LayoutConfig {
            fade_threshold: 1.0e6,
            ..LayoutConfig::default()
        };
        run_layout(&mut graph, &visible(&["a", "b"]), &config);
        for node in &graph.nodes {
            assert!(node.pos.x.is_finite() && node.pos.y.is_finite(), "{}", node.id);
        }
        // The coincident pair actually separated.
        let a = graph.node("a").expect("a").pos;
        let b = graph.node("b").expect("b").pos;
        assert!((a - b).length() > 1.0);
    }

    #[test]
    fn empty_movable_set_is_a_no_op() {
        let mut graph = small_graph();
        let before = graph.nodes.iter().map(|node| node.pos).collect::<Vec<_>>();
        run_layout(&mut graph, &visible(&["region"]), &LayoutConfig::default());
        run_layout(&mut graph, &HashSet::new(), &LayoutConfig::default());
        let after = graph.nodes.iter().map(|node| node.pos).collect::<Vec<_>>();
        assert_eq!(before, after);
    }
}
