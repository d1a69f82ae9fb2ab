//! Groupings are alternative spatial arrangements of the graph. Each one
//! carries its own regions (top-level containers) and placement overrides
//! for member nodes; nodes without an override keep their authored base.

use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Color32, Vec2, vec2};

pub const DEFAULT_GROUPING: &str = "ecosystem";

#[derive(Clone, Debug)]
pub struct Region {
    pub id: String,
    pub label: String,
    pub description: String,
    pub center: Vec2,
    pub radius: f32,
    pub color: Color32,
}

#[derive(Clone, Debug)]
pub struct NodePlacement {
    pub pos: Vec2,
    pub region: Option<String>,
    pub color: Option<Color32>,
}

#[derive(Clone, Debug)]
pub struct Grouping {
    pub id: String,
    pub label: String,
    pub regions: Vec<Region>,
    pub positions: HashMap<String, NodePlacement>,
}

impl Grouping {
    pub fn placement(&self, node_id: &str) -> Option<&NodePlacement> {
        self.positions.get(node_id)
    }
}

fn region(
    id: &str,
    label: &str,
    description: &str,
    center: Vec2,
    radius: f32,
    color: Color32,
) -> Region {
    Region {
        id: id.to_owned(),
        label: label.to_owned(),
        description: description.to_owned(),
        center,
        radius,
        color,
    }
}

/// Place members evenly on a circle, starting at the top going clockwise.
fn ring_positions(
    positions: &mut HashMap<String, NodePlacement>,
    center: Vec2,
    radius: f32,
    ids: &[&str],
    region_id: &str,
    color: Color32,
) {
    for (index, id) in ids.iter().enumerate() {
        let angle = -TAU / 4.0 + (TAU * index as f32) / ids.len() as f32;
        positions.insert(
            (*id).to_owned(),
            NodePlacement {
                pos: (center + vec2(angle.cos(), angle.sin()) * radius).round(),
                region: Some(region_id.to_owned()),
                color: Some(color),
            },
        );
    }
}

fn free_position(positions: &mut HashMap<String, NodePlacement>, id: &str, pos: Vec2) {
    positions.insert(
        id.to_owned(),
        NodePlacement {
            pos,
            region: None,
            color: None,
        },
    );
}

fn ecosystem_grouping() -> Grouping {
    Grouping {
        id: "ecosystem".to_owned(),
        label: "Ecosystems".to_owned(),
        regions: vec![
            region(
                "ecosystem/rhi",
                "rhi",
                "Glue layer for computers",
                vec2(-370.0, 0.0),
                200.0,
                Color32::from_rgb(0x4a, 0x7c, 0x59),
            ),
            region(
                "ecosystem/exo",
                "exo",
                "Places to exist",
                vec2(370.0, 0.0),
                140.0,
                Color32::from_rgb(0x7c, 0x4a, 0x6e),
            ),
        ],
        // Authored node positions already assume this grouping.
        positions: HashMap::new(),
    }
}

fn domain_grouping() -> Grouping {
    let infra = Color32::from_rgb(0x5a, 0xb0, 0xd4);
    let creative = Color32::from_rgb(0xdc, 0x9b, 0x63);
    let games = Color32::from_rgb(0xa0, 0x8f, 0xe3);
    let ai = Color32::from_rgb(0xaa, 0xb8, 0x5c);
    let social = Color32::from_rgb(0xc5, 0x77, 0xb7);

    let mut positions = HashMap::new();
    ring_positions(
        &mut positions,
        vec2(-300.0, -100.0),
        140.0,
        &[
            "project/server-less",
            "project/portals",
            "project/myenv",
            "project/concord",
            "project/paraphase",
            "project/rescribe",
            "project/normalize",
            "project/zone",
        ],
        "domain/infrastructure",
        infra,
    );
    ring_positions(
        &mut positions,
        vec2(300.0, -100.0),
        110.0,
        &[
            "project/unshape",
            "project/wick",
            "project/dusklight",
            "project/keybinds",
        ],
        "domain/creative",
        creative,
    );
    ring_positions(
        &mut positions,
        vec2(0.0, 200.0),
        100.0,
        &[
            "project/playmate",
            "project/interconnect",
            "project/reincarnate",
        ],
        "domain/games",
        games,
    );
    ring_positions(
        &mut positions,
        vec2(-150.0, -280.0),
        60.0,
        &[
            "project/hologram",
            "project/claude-code-hub",
            "project/gels",
        ],
        "domain/ai",
        ai,
    );
    ring_positions(
        &mut positions,
        vec2(150.0, -280.0),
        60.0,
        &["project/aspect"],
        "domain/social",
        social,
    );

    // Projects spanning multiple domains sit between clusters.
    for (id, x, y) in [
        ("project/moonlet", -100.0, 50.0),
        ("project/ooxml", -200.0, 100.0),
        ("project/pad", -350.0, 100.0),
        ("project/lua", -400.0, -50.0),
    ] {
        positions.insert(
            id.to_owned(),
            NodePlacement {
                pos: vec2(x, y),
                region: Some("domain/infrastructure".to_owned()),
                color: Some(infra),
            },
        );
    }

    free_position(&mut positions, "prose/whats-actually-wrong", vec2(0.0, 80.0));
    free_position(&mut positions, "prose/why-is-software-hard", vec2(-120.0, 130.0));
    free_position(&mut positions, "prose/what-do-we-keep-losing", vec2(120.0, 130.0));
    free_position(&mut positions, "meta/pteraworld", vec2(0.0, -380.0));

    Grouping {
        id: "domain".to_owned(),
        label: "Domains".to_owned(),
        regions: vec![
            region(
                "domain/infrastructure",
                "infrastructure",
                "Tools that connect other tools",
                vec2(-300.0, -100.0),
                180.0,
                Color32::from_rgb(0x4a, 0x9f, 0xc3),
            ),
            region(
                "domain/creative",
                "creative",
                "Making things that didn't exist",
                vec2(300.0, -100.0),
                150.0,
                Color32::from_rgb(0xc9, 0x8a, 0x56),
            ),
            region(
                "domain/games",
                "games",
                "Worlds to play in",
                vec2(0.0, 200.0),
                140.0,
                Color32::from_rgb(0x8f, 0x7f, 0xd1),
            ),
            region(
                "domain/ai",
                "ai",
                "Working with language models",
                vec2(-150.0, -280.0),
                100.0,
                Color32::from_rgb(0x9a, 0xa9, 0x4f),
            ),
            region(
                "domain/social",
                "social",
                "How people connect",
                vec2(150.0, -280.0),
                100.0,
                Color32::from_rgb(0xb2, 0x68, 0xa8),
            ),
        ],
        positions,
    }
}

fn tech_grouping() -> Grouping {
    let rust = Color32::from_rgb(0xd0, 0x8b, 0x6a);
    let lua = Color32::from_rgb(0x7b, 0x95, 0xdc);
    let typescript = Color32::from_rgb(0x5f, 0xac, 0xd0);

    let mut positions = HashMap::new();
    ring_positions(
        &mut positions,
        vec2(-250.0, 0.0),
        160.0,
        &[
            "project/normalize",
            "project/gels",
            "project/unshape",
            "project/wick",
            "project/server-less",
            "project/concord",
            "project/rescribe",
            "project/paraphase",
            "project/playmate",
            "project/interconnect",
            "project/reincarnate",
            "project/myenv",
            "project/portals",
            "project/ooxml",
        ],
        "technology/rust",
        rust,
    );
    ring_positions(
        &mut positions,
        vec2(250.0, -150.0),
        80.0,
        &[
            "project/moonlet",
            "project/zone",
            "project/pad",
            "project/lua",
        ],
        "technology/lua",
        lua,
    );
    ring_positions(
        &mut positions,
        vec2(250.0, 150.0),
        80.0,
        &[
            "project/dusklight",
            "project/hologram",
            "project/aspect",
            "project/keybinds",
            "project/claude-code-hub",
        ],
        "technology/typescript",
        typescript,
    );

    free_position(&mut positions, "prose/whats-actually-wrong", vec2(0.0, 50.0));
    free_position(&mut positions, "prose/why-is-software-hard", vec2(-80.0, 100.0));
    free_position(&mut positions, "prose/what-do-we-keep-losing", vec2(80.0, 100.0));
    free_position(&mut positions, "meta/pteraworld", vec2(0.0, -330.0));

    Grouping {
        id: "tech".to_owned(),
        label: "Technologies".to_owned(),
        regions: vec![
            region(
                "technology/rust",
                "rust",
                "Systems programming",
                vec2(-250.0, 0.0),
                200.0,
                Color32::from_rgb(0xc4, 0x7a, 0x58),
            ),
            region(
                "technology/lua",
                "lua",
                "Scripting and glue",
                vec2(250.0, -150.0),
                120.0,
                Color32::from_rgb(0x6a, 0x85, 0xcc),
            ),
            region(
                "technology/typescript",
                "typescript",
                "Web and applications",
                vec2(250.0, 150.0),
                120.0,
                Color32::from_rgb(0x4f, 0x9c, 0xc0),
            ),
        ],
        positions,
    }
}

fn status_grouping() -> Grouping {
    let production = Color32::from_rgb(0x54, 0xc4, 0x78);
    let fleshed_out = Color32::from_rgb(0x63, 0xa9, 0xdc);
    let early = Color32::from_rgb(0xd3, 0xa4, 0x5e);
    let planned = Color32::from_rgb(0xa0, 0x95, 0x98);

    let mut positions = HashMap::new();
    ring_positions(
        &mut positions,
        vec2(-300.0, -150.0),
        60.0,
        &["project/unshape", "project/wick"],
        "status/production",
        production,
    );
    ring_positions(
        &mut positions,
        vec2(0.0, -100.0),
        140.0,
        &[
            "project/normalize",
            "project/moonlet",
            "project/paraphase",
            "project/rescribe",
            "project/server-less",
            "project/myenv",
            "project/portals",
            "project/hologram",
            "project/keybinds",
        ],
        "status/fleshed-out",
        fleshed_out,
    );
    ring_positions(
        &mut positions,
        vec2(300.0, -100.0),
        100.0,
        &[
            "project/playmate",
            "project/concord",
            "project/zone",
            "project/aspect",
            "project/claude-code-hub",
            "project/ooxml",
            "project/pad",
            "project/lua",
        ],
        "status/early",
        early,
    );
    ring_positions(
        &mut positions,
        vec2(0.0, 200.0),
        80.0,
        &[
            "project/gels",
            "project/interconnect",
            "project/reincarnate",
            "project/dusklight",
        ],
        "status/planned",
        planned,
    );

    free_position(&mut positions, "prose/whats-actually-wrong", vec2(-350.0, 30.0));
    free_position(&mut positions, "prose/why-is-software-hard", vec2(-420.0, 130.0));
    free_position(&mut positions, "prose/what-do-we-keep-losing", vec2(-280.0, 130.0));
    free_position(&mut positions, "meta/pteraworld", vec2(0.0, -350.0));

    Grouping {
        id: "status".to_owned(),
        label: "Status".to_owned(),
        regions: vec![
            region(
                "status/production",
                "production",
                "Stable and complete",
                vec2(-300.0, -150.0),
                100.0,
                Color32::from_rgb(0x44, 0xa8, 0x62),
            ),
            region(
                "status/fleshed-out",
                "fleshed out",
                "Solid foundation, expanding",
                vec2(0.0, -100.0),
                180.0,
                Color32::from_rgb(0x54, 0x9c, 0xcc),
            ),
            region(
                "status/early",
                "early",
                "Work in progress",
                vec2(300.0, -100.0),
                140.0,
                Color32::from_rgb(0xc1, 0x91, 0x4f),
            ),
            region(
                "status/planned",
                "planned",
                "Not yet started",
                vec2(0.0, 200.0),
                120.0,
                Color32::from_rgb(0x9b, 0x8f, 0x91),
            ),
        ],
        positions,
    }
}

pub fn builtin_groupings() -> Vec<Grouping> {
    vec![
        ecosystem_grouping(),
        domain_grouping(),
        tech_grouping(),
        status_grouping(),
    ]
}
