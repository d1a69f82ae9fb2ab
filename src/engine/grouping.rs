//! Active-grouping state. Owns the authored placement cache and rewrites
//! node anchors when the grouping changes; an explicit session object so
//! multiple graphs can coexist and tests need no global state.

use std::collections::HashMap;

use eframe::egui::{Color32, Vec2};

use crate::world::{DEFAULT_GROUPING, Graph, Grouping, Node, Region, Tier};

#[derive(Clone, Debug)]
struct AuthoredPlacement {
    base: Vec2,
    color: Color32,
}

pub struct GroupingSession {
    groupings: Vec<Grouping>,
    active: usize,
    authored: HashMap<String, AuthoredPlacement>,
}

impl GroupingSession {
    /// Capture each node's authored base and color before any grouping
    /// rewrites them.
    pub fn new(graph: &Graph, groupings: Vec<Grouping>) -> Self {
        assert!(!groupings.is_empty(), "at least one grouping required");
        let authored = graph
            .nodes
            .iter()
            .map(|node| {
                (
                    node.id.clone(),
                    AuthoredPlacement {
                        base: node.base,
                        color: node.color,
                    },
                )
            })
            .collect();
        let active = groupings
            .iter()
            .position(|grouping| grouping.id == DEFAULT_GROUPING)
            .unwrap_or(0);
        Self {
            groupings,
            active,
            authored,
        }
    }

    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }

    pub fn active(&self) -> &Grouping {
        &self.groupings[self.active]
    }

    pub fn active_regions(&self) -> &[Region] {
        &self.active().regions
    }

    /// The region a node belongs to under the active grouping: the
    /// placement override's region if any, else the structural parent
    /// under the default grouping.
    pub fn resolved_region<'a>(&'a self, node: &'a Node) -> Option<&'a str> {
        let grouping = self.active();
        if let Some(region) = grouping
            .placement(&node.id)
            .and_then(|placement| placement.region.as_deref())
        {
            return Some(region);
        }
        if grouping.id == DEFAULT_GROUPING {
            return node.parent.as_deref();
        }
        None
    }

    /// Switch groupings: rewrite every non-region node's anchor and color
    /// to the new grouping's placement (or back to the authored values).
    /// Current positions are left alone; the caller re-runs or resets the
    /// layout and the presentation tweens toward the new anchors.
    /// Returns false when the grouping is unknown or already active.
    pub fn set_active(&mut self, graph: &mut Graph, grouping_id: &str) -> bool {
        let Some(next) = self
            .groupings
            .iter()
            .position(|grouping| grouping.id == grouping_id)
        else {
            return false;
        };
        if next == self.active {
            return false;
        }
        self.active = next;

        let grouping = &self.groupings[self.active];
        for node in &mut graph.nodes {
            if node.tier == Tier::Region {
                continue;
            }
            let Some(authored) = self.authored.get(&node.id) else {
                continue;
            };
            match grouping.placement(&node.id) {
                Some(placement) => {
                    node.base = placement.pos;
                    node.color = placement.color.unwrap_or(authored.color);
                }
                None => {
                    node.base = authored.base;
                    node.color = authored.color;
                }
            }
        }
        true
    }
}
