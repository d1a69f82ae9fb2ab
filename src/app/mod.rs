use std::collections::{HashMap, HashSet};

use eframe::egui::{Context, Vec2};

use crate::engine::filter::{self, FilterState};
use crate::engine::focus::{self, FocusState};
use crate::engine::grouping::GroupingSession;
use crate::engine::layout::{self, LayoutConfig};
use crate::world::{Graph, builtin_groupings};

mod animate;
mod graph;
mod render_utils;
mod ui;

pub struct PteraworldApp {
    model: ViewModel,
}

impl PteraworldApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, graph: Graph, initial_grouping: &str) -> Self {
        Self {
            model: ViewModel::new(graph, initial_grouping),
        }
    }
}

impl eframe::App for PteraworldApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.model.show(ctx);
    }
}

pub(crate) struct ViewModel {
    graph: Graph,
    session: GroupingSession,
    filter: FilterState,
    layout_config: LayoutConfig,
    /// Ids passing the current filter; recomputed on every toggle.
    visible: HashSet<String>,
    /// Ghost opacity signal for filtered-out nodes.
    adjacent: HashMap<String, f32>,
    hovered: Option<String>,
    selected: Option<String>,
    focus: FocusState,
    /// Hidden-but-focus-relevant ids promoted for the current hover only.
    surfaced: HashSet<String>,
    search: String,
    pan: Vec2,
    zoom: f32,
    show_minimap: bool,
    /// Tweened presentation positions, index-aligned with `graph.nodes`.
    /// The core always holds final resting positions; this map only eases
    /// what is drawn.
    display: Vec<Vec2>,
}

impl ViewModel {
    pub(crate) fn new(graph: Graph, initial_grouping: &str) -> Self {
        let session = GroupingSession::new(&graph, builtin_groupings());
        let filter = FilterState::new(&graph);
        let visible = filter.visible_ids(&graph);
        let display = graph.nodes.iter().map(|node| node.pos).collect();

        let mut model = Self {
            graph,
            session,
            filter,
            layout_config: LayoutConfig::default(),
            visible,
            adjacent: HashMap::new(),
            hovered: None,
            selected: None,
            focus: FocusState::default(),
            surfaced: HashSet::new(),
            search: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            show_minimap: true,
            display,
        };
        model.set_grouping(initial_grouping);
        model
    }

    /// Filter or grouping changed: recompute visibility, then layout, then
    /// the downstream emphasis state, strictly in that order.
    fn apply_filter_change(&mut self) {
        self.visible = self.filter.visible_ids(&self.graph);
        if self.filter.is_filtering() {
            layout::run_layout(&mut self.graph, &self.visible, &self.layout_config);
        } else {
            layout::reset_layout(&mut self.graph);
        }
        self.adjacent = filter::adjacent_strength(&self.graph, &self.visible);
        self.refresh_focus();
    }

    fn toggle_tag(&mut self, tag: &str) {
        self.filter.toggle_tag(tag);
        self.apply_filter_change();
    }

    fn clear_filter(&mut self) {
        if self.filter.is_filtering() {
            self.filter.clear();
            self.apply_filter_change();
        }
    }

    fn set_grouping(&mut self, grouping_id: &str) {
        if !self
            .session
            .groupings()
            .iter()
            .any(|grouping| grouping.id == grouping_id)
        {
            log::warn!("unknown grouping {grouping_id:?}");
            return;
        }
        if self.session.set_active(&mut self.graph, grouping_id) {
            // Adopt the new anchors first: the filtered re-layout blends
            // toward them, and it no-ops entirely when the visible ratio
            // is at or past the fade threshold.
            layout::reset_layout(&mut self.graph);
            self.apply_filter_change();
        }
    }

    fn set_hovered(&mut self, hovered: Option<String>) {
        if self.hovered == hovered {
            return;
        }
        self.hovered = hovered;
        self.refresh_focus();
    }

    fn set_selected(&mut self, selected: Option<String>) {
        self.selected = selected;
    }

    /// Surfacing is derived fresh from the current focus, so a previous
    /// hover's surfaced ids never survive a hover change.
    fn refresh_focus(&mut self) {
        self.focus = focus::compute_focus(&self.graph, self.hovered.as_deref());
        self.surfaced = if self.filter.is_filtering() {
            focus::surfaced_ids(&self.focus, &self.visible)
        } else {
            HashSet::new()
        };
    }

    /// Whether a node is currently drawn at full presence: passing the
    /// filter, or temporarily surfaced by the hover.
    fn is_shown(&self, id: &str) -> bool {
        !self.filter.is_filtering() || self.visible.contains(id) || self.surfaced.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{DEFAULT_GROUPING, builtin_world};

    fn model() -> ViewModel {
        let graph = builtin_world().expect("builtin dataset");
        ViewModel::new(graph, DEFAULT_GROUPING)
    }

    #[test]
    fn grouping_switch_adopts_new_anchors_while_filtered() {
        let mut model = model();
        // Enough nodes stay visible that the filtered re-layout is a
        // no-op; the switch must still move nodes to their new anchors.
        model.toggle_tag("rust");
        assert!(model.visible.contains("project/normalize"));

        model.set_grouping("tech");
        let expected = model
            .session
            .active()
            .placement("project/normalize")
            .expect("tech placement")
            .pos;
        let node = model.graph.node("project/normalize").expect("node");
        assert_eq!(node.base, expected);
        assert_eq!(node.pos, node.base, "node stranded off its new anchor");
    }

    #[test]
    fn switching_back_restores_authored_positions() {
        let mut model = model();
        let authored = model.graph.node("project/unshape").expect("node").base;

        model.toggle_tag("rust");
        model.set_grouping("status");
        model.set_grouping(DEFAULT_GROUPING);

        let node = model.graph.node("project/unshape").expect("node");
        assert_eq!(node.base, authored);
        assert_eq!(node.pos, node.base);
    }
}
