mod groupings;
mod load;

pub use groupings::{DEFAULT_GROUPING, Grouping, NodePlacement, Region, builtin_groupings};
pub use load::{builtin_world, load_world};

use std::collections::HashMap;

use eframe::egui::{Color32, Vec2};

/// Tags that mark structural role rather than subject matter. They are
/// excluded from tag filtering and from tag-similarity scoring.
pub const STRUCTURAL_TAGS: [&str; 3] = ["region", "project", "ecosystem"];

pub fn is_structural_tag(tag: &str) -> bool {
    STRUCTURAL_TAGS.contains(&tag)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Region,
    Project,
    Detail,
    Meta,
}

impl Tier {
    /// Pinned tiers are never moved by the layout engine.
    pub fn is_pinned(self) -> bool {
        matches!(self, Self::Region)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Project => "project",
            Self::Detail => "detail",
            Self::Meta => "meta",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Production,
    FleshedOut,
    Early,
    Planned,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::FleshedOut => "fleshed out",
            Self::Early => "early",
            Self::Planned => "planned",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub description: String,
    pub url: Option<String>,
    pub tier: Tier,
    /// Containing region's id. Reference only; regions do not own children.
    pub parent: Option<String>,
    /// Current position. Written only by the layout engine.
    pub pos: Vec2,
    /// Anchor position. Rewritten only by a grouping switch.
    pub base: Vec2,
    pub radius: f32,
    pub color: Color32,
    pub tags: Vec<String>,
    pub status: Option<Status>,
}

impl Node {
    /// Tags eligible for filtering and similarity scoring.
    pub fn semantic_tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|tag| !is_structural_tag(tag))
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// Relationship label. Containment edges have none.
    pub label: Option<String>,
    /// Relationship weight in [0, 1].
    pub strength: f32,
}

impl Edge {
    pub fn is_containment(&self) -> bool {
        self.label.is_none()
    }

    /// The endpoint opposite `id`, if `id` is an endpoint at all.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.from == id {
            Some(&self.to)
        } else if self.to == id {
            Some(&self.from)
        } else {
            None
        }
    }
}

/// The single shared graph instance for the session. Node positions are
/// mutated in place; the node and edge lists never change after load.
#[derive(Clone, Debug)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();
        Self {
            nodes,
            edges,
            index_by_id,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn children(&self, region_id: &str) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(move |node| node.parent.as_deref() == Some(region_id))
    }

    /// Edge-neighbor ids of `id`, in either direction.
    pub fn neighbor_ids<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> {
        self.edges.iter().filter_map(move |edge| edge.other(id))
    }

    /// Strongest direct edge between two nodes, 0.0 when unconnected.
    pub fn max_edge_strength(&self, a: &str, b: &str) -> f32 {
        self.edges
            .iter()
            .filter(|edge| {
                (edge.from == a && edge.to == b) || (edge.from == b && edge.to == a)
            })
            .map(|edge| edge.strength)
            .fold(0.0, f32::max)
    }
}
