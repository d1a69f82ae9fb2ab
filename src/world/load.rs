use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use eframe::egui::{Color32, vec2};
use serde::Deserialize;

use super::{Edge, Graph, Node, Status, Tier};

/// Relationship weight assumed for containment (unlabeled) edges.
const CONTAINMENT_STRENGTH: f32 = 0.7;
/// Relationship weight assumed for labeled edges that omit one.
const DEFAULT_LABELED_STRENGTH: f32 = 0.5;

#[derive(Clone, Debug, Deserialize)]
struct RawWorld {
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawNode {
    id: String,
    label: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: Option<String>,
    tier: String,
    #[serde(default)]
    parent: Option<String>,
    x: f32,
    y: f32,
    radius: f32,
    color: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct RawEdge {
    from: String,
    to: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    strength: Option<f32>,
}

/// The portfolio dataset shipped inside the binary.
pub fn builtin_world() -> Result<Graph> {
    parse_world(include_str!("../../assets/world.json")).context("embedded world dataset is invalid")
}

pub fn load_world(path: &Path) -> Result<Graph> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read world dataset {}", path.display()))?;
    parse_world(&raw).with_context(|| format!("invalid world dataset {}", path.display()))
}

fn parse_world(raw: &str) -> Result<Graph> {
    let world: RawWorld = serde_json::from_str(raw).context("invalid world JSON")?;

    if world.nodes.is_empty() {
        return Err(anyhow!("world dataset contains no nodes"));
    }

    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(world.nodes.len());
    for raw_node in world.nodes {
        if !seen.insert(raw_node.id.clone()) {
            return Err(anyhow!("duplicate node id {:?}", raw_node.id));
        }
        nodes.push(parse_node(raw_node)?);
    }

    let known_ids = nodes.iter().map(|node| node.id.as_str()).collect::<HashSet<_>>();

    let mut edges = Vec::with_capacity(world.edges.len());
    for raw_edge in world.edges {
        if !known_ids.contains(raw_edge.from.as_str())
            || !known_ids.contains(raw_edge.to.as_str())
        {
            log::warn!(
                "dropping edge {} -> {}: endpoint not in node list",
                raw_edge.from,
                raw_edge.to
            );
            continue;
        }

        let default_strength = if raw_edge.label.is_none() {
            CONTAINMENT_STRENGTH
        } else {
            DEFAULT_LABELED_STRENGTH
        };
        edges.push(Edge {
            from: raw_edge.from,
            to: raw_edge.to,
            label: raw_edge.label,
            strength: raw_edge.strength.unwrap_or(default_strength).clamp(0.0, 1.0),
        });
    }

    Ok(Graph::new(nodes, edges))
}

fn parse_node(raw: RawNode) -> Result<Node> {
    let tier = parse_tier(&raw.tier)
        .with_context(|| format!("node {:?} has invalid tier {:?}", raw.id, raw.tier))?;
    let status = raw
        .status
        .as_deref()
        .map(|value| {
            parse_status(value)
                .with_context(|| format!("node {:?} has invalid status {value:?}", raw.id))
        })
        .transpose()?;
    let color = parse_hex_color(&raw.color)
        .with_context(|| format!("node {:?} has invalid color {:?}", raw.id, raw.color))?;

    let pos = vec2(raw.x, raw.y);
    Ok(Node {
        id: raw.id,
        label: raw.label,
        description: raw.description,
        url: raw.url,
        tier,
        parent: raw.parent,
        pos,
        base: pos,
        radius: raw.radius.max(1.0),
        color,
        tags: raw.tags,
        status,
    })
}

fn parse_tier(value: &str) -> Result<Tier> {
    match value {
        "region" | "ecosystem" => Ok(Tier::Region),
        "project" => Ok(Tier::Project),
        "detail" | "prose" => Ok(Tier::Detail),
        "meta" => Ok(Tier::Meta),
        _ => Err(anyhow!("unknown tier")),
    }
}

fn parse_status(value: &str) -> Result<Status> {
    match value {
        "production" => Ok(Status::Production),
        "fleshed-out" => Ok(Status::FleshedOut),
        "early" => Ok(Status::Early),
        "planned" => Ok(Status::Planned),
        _ => Err(anyhow!("unknown status")),
    }
}

pub(super) fn parse_hex_color(value: &str) -> Result<Color32> {
    let hex = value
        .strip_prefix('#')
        .ok_or_else(|| anyhow!("expected #rrggbb"))?;
    if hex.len() != 6 {
        return Err(anyhow!("expected #rrggbb"));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).context("invalid hex digit")
    };
    Ok(Color32::from_rgb(
        channel(0..2)?,
        channel(2..4)?,
        channel(4..6)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_world_parses() {
        let graph = builtin_world().expect("builtin dataset");
        assert!(graph.node_count() > 0);
        assert!(graph.edge_count() > 0);
        // Every edge endpoint resolves after validation.
        for edge in &graph.edges {
            assert!(graph.index_of(&edge.from).is_some(), "missing {}", edge.from);
            assert!(graph.index_of(&edge.to).is_some(), "missing {}", edge.to);
        }
    }

    #[test]
    fn duplicate_node_ids_are_rejected() {
        let raw = r##"{
            "nodes": [
                {"id": "a", "label": "a", "tier": "project", "x": 0, "y": 0, "radius": 10, "color": "#112233"},
                {"id": "a", "label": "a2", "tier": "project", "x": 1, "y": 1, "radius": 10, "color": "#112233"}
            ],
            "edges": []
        }"##;
        assert!(parse_world(raw).is_err());
    }

    #[test]
    fn dangling_edges_are_dropped_not_fatal() {
        let raw = r##"{
            "nodes": [
                {"id": "a", "label": "a", "tier": "project", "x": 0, "y": 0, "radius": 10, "color": "#112233"}
            ],
            "edges": [
                {"from": "a", "to": "ghost"},
                {"from": "ghost", "to": "a"}
            ]
        }"##;
        let graph = parse_world(raw).expect("dangling edges degrade gracefully");
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn containment_edges_default_to_strength_0_7() {
        let raw = r##"{
            "nodes": [
                {"id": "r", "label": "r", "tier": "region", "x": 0, "y": 0, "radius": 100, "color": "#112233"},
                {"id": "a", "label": "a", "tier": "project", "parent": "r", "x": 10, "y": 0, "radius": 10, "color": "#112233"}
            ],
            "edges": [{"from": "r", "to": "a"}]
        }"##;
        let graph = parse_world(raw).expect("valid world");
        assert!(graph.edges[0].is_containment());
        assert_eq!(graph.edges[0].strength, 0.7);
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(
            parse_hex_color("#5a9c6a").expect("valid color"),
            Color32::from_rgb(0x5a, 0x9c, 0x6a)
        );
        assert!(parse_hex_color("5a9c6a").is_err());
        assert!(parse_hex_color("#xyzxyz").is_err());
    }
}
