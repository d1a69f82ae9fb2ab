use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::engine::filter;
use crate::util::short_label;
use crate::world::{DEFAULT_GROUPING, Tier};

use super::super::ViewModel;
use super::super::animate::approach;
use super::super::render_utils::{
    blend_color, circle_visible, dim_color, draw_background, lighten, with_alpha, world_to_screen,
};

/// Zoom bands governing which labels and edges are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum ZoomTier {
    Far,
    Mid,
    Near,
}

impl ZoomTier {
    pub(in crate::app) fn of(zoom: f32) -> Self {
        if zoom < 1.5 {
            Self::Far
        } else if zoom < 3.5 {
            Self::Mid
        } else {
            Self::Near
        }
    }

    fn edge_alpha(self) -> f32 {
        match self {
            Self::Far => 0.08,
            Self::Mid => 0.15,
            Self::Near => 0.25,
        }
    }
}

const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const SEARCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
const DIM_ALPHA: f32 = 0.15;

impl ViewModel {
    fn search_matches(&self) -> Option<HashSet<usize>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }
        let matcher = SkimMatcherV2::default();
        Some(
            self.graph
                .nodes
                .iter()
                .enumerate()
                .filter_map(|(index, node)| {
                    matcher
                        .fuzzy_match(&node.label, query)
                        .or_else(|| matcher.fuzzy_match(short_label(&node.id), query))
                        .map(|_| index)
                })
                .collect(),
        )
    }

    /// Presentation alpha for a node, or `None` when it is not drawn at
    /// all. Hidden nodes related to the visible set ghost in faintly.
    fn node_alpha(&self, id: &str) -> Option<f32> {
        if self.is_shown(id) {
            if self.focus.is_empty() {
                Some(1.0)
            } else if self.focus.focused.contains(id) {
                Some(1.0)
            } else {
                Some(DIM_ALPHA)
            }
        } else {
            self.adjacent
                .get(id)
                .map(|strength| 0.06 + 0.24 * strength)
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        // Ease display positions toward the core's resting positions.
        let delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let mut animating = false;
        for (index, node) in self.graph.nodes.iter().enumerate() {
            self.display[index] = approach(self.display[index], node.pos, delta_seconds);
            if self.display[index] != node.pos {
                animating = true;
            }
        }
        if animating {
            ui.ctx().request_repaint();
        }

        let tier = ZoomTier::of(self.zoom);
        let default_grouping = self.session.active().id == DEFAULT_GROUPING;
        let search_matches = self.search_matches();

        // Screen-space positions for drawable nodes, and the subset that
        // can be hovered (ghosted nodes are not interactive).
        let mut drawn: Vec<(usize, Pos2, f32, f32)> = Vec::new();
        let mut hoverable: Vec<(usize, Pos2, f32)> = Vec::new();
        for (index, node) in self.graph.nodes.iter().enumerate() {
            let position = world_to_screen(rect, self.pan, self.zoom, self.display[index]);
            if node.tier == Tier::Region {
                // Regions render in the region pass; under the default
                // grouping their core dot is still a hover target.
                let core_radius = (node.radius * 0.15 * self.zoom).max(6.0);
                if default_grouping
                    && self.is_shown(&node.id)
                    && circle_visible(rect, position, core_radius)
                {
                    hoverable.push((index, position, core_radius));
                }
                continue;
            }

            let Some(alpha) = self.node_alpha(&node.id) else {
                continue;
            };
            let radius = (node.radius * 0.5 * self.zoom).clamp(3.0, 40.0);
            if !circle_visible(rect, position, radius + 60.0) {
                continue;
            }
            drawn.push((index, position, radius, alpha));
            if self.is_shown(&node.id) {
                hoverable.push((index, position, radius));
            }
        }

        let hovered_id = if response.hovered() {
            self.hovered_node_id(ui, &hoverable)
        } else {
            None
        };
        if hovered_id.is_some() {
            ui.ctx()
                .output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }
        let pending_selection = response
            .clicked_by(egui::PointerButton::Primary)
            .then(|| hovered_id.clone());

        self.draw_regions(&painter, rect, tier);
        self.draw_edges(&painter, rect, tier, hovered_id.as_deref());
        self.draw_nodes(
            &painter,
            tier,
            &drawn,
            hovered_id.as_deref(),
            search_matches.as_ref(),
        );

        if self.show_minimap {
            self.draw_minimap(ui, rect);
        }

        if let Some(id) = &hovered_id
            && let Some(node) = self.graph.node(id)
        {
            let mut info = format!("{}  |  {}", node.label, node.tier.label());
            if let Some(status) = node.status {
                info.push_str("  |  ");
                info.push_str(status.label());
            }
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                info,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        self.set_hovered(hovered_id);
        if let Some(selection) = pending_selection {
            self.set_selected(selection);
        }
    }

    fn draw_regions(&self, painter: &egui::Painter, rect: egui::Rect, tier: ZoomTier) {
        let filtering = self.filter.is_filtering();
        let default_grouping = self.session.active().id == DEFAULT_GROUPING;

        for region in self.session.active_regions() {
            let mut opacity = if !filtering {
                1.0
            } else if default_grouping {
                // Regions follow their children: fully filtered-out regions
                // are absent from the visible set.
                if !self.visible.contains(&region.id) {
                    continue;
                }
                filter::region_opacity(&self.graph, &self.visible, &region.id)
            } else {
                // Alternate groupings have no region nodes in the graph;
                // fade by the visible fraction of resolved members instead.
                let mut members = 0usize;
                let mut shown = 0usize;
                for node in &self.graph.nodes {
                    if node.tier == Tier::Region {
                        continue;
                    }
                    if self.session.resolved_region(node) == Some(region.id.as_str()) {
                        members += 1;
                        if self.visible.contains(&node.id) {
                            shown += 1;
                        }
                    }
                }
                if members > 0 && shown == 0 {
                    continue;
                }
                filter::member_opacity(shown, members)
            };

            // While a hover is active, unrelated regions dim with the rest.
            if default_grouping
                && !self.focus.is_empty()
                && !self.focus.focused.contains(&region.id)
            {
                opacity *= DIM_ALPHA;
            }

            let center = world_to_screen(rect, self.pan, self.zoom, region.center);
            let radius = region.radius * self.zoom;
            if !circle_visible(rect, center, radius) {
                continue;
            }

            // Layered fills stand in for a radial glow.
            painter.circle_filled(center, radius, with_alpha(region.color, 0.08 * opacity));
            painter.circle_filled(center, radius * 0.6, with_alpha(region.color, 0.10 * opacity));
            painter.circle_filled(
                center,
                (radius * 0.15).max(5.0),
                with_alpha(region.color, 0.55 * opacity),
            );
            painter.circle_stroke(
                center,
                radius,
                Stroke::new(1.0, with_alpha(region.color, 0.25 * opacity)),
            );

            if tier != ZoomTier::Near {
                let font = FontId::proportional((radius * 0.18).clamp(14.0, 30.0));
                painter.text(
                    center,
                    Align2::CENTER_CENTER,
                    &region.label,
                    font,
                    with_alpha(Color32::from_gray(221), opacity.max(0.2)),
                );
            }
        }
    }

    fn draw_edges(
        &self,
        painter: &egui::Painter,
        rect: egui::Rect,
        tier: ZoomTier,
        hovered: Option<&str>,
    ) {
        let focusing = hovered.is_some() && !self.focus.is_empty();

        for edge in &self.graph.edges {
            let (Some(from), Some(to)) = (self.graph.index_of(&edge.from), self.graph.index_of(&edge.to))
            else {
                continue;
            };

            // Hidden only when both endpoints are hidden.
            if !self.is_shown(&edge.from) && !self.is_shown(&edge.to) {
                continue;
            }

            // Containment edges to regions add noise at far zoom.
            if tier == ZoomTier::Far && edge.is_containment() {
                continue;
            }

            let start = world_to_screen(rect, self.pan, self.zoom, self.display[from]);
            let end = world_to_screen(rect, self.pan, self.zoom, self.display[to]);
            let padded = rect.expand(60.0);
            if !padded.contains(start) && !padded.contains(end) {
                continue;
            }

            let edge_focused = focusing
                && self.focus.focused.contains(&edge.from)
                && self.focus.focused.contains(&edge.to);

            let (width, color) = if edge_focused {
                let strength = self
                    .focus
                    .edge_strength
                    .get(&(edge.from.clone(), edge.to.clone()))
                    .copied()
                    .unwrap_or(0.0);
                (
                    1.0 + 2.0 * strength,
                    with_alpha(Color32::from_gray(150), 0.45 + 0.5 * strength),
                )
            } else if focusing {
                (1.0, with_alpha(Color32::from_gray(85), tier.edge_alpha() * 0.2))
            } else {
                (1.0, with_alpha(Color32::from_gray(85), tier.edge_alpha()))
            };

            painter.line_segment([start, end], Stroke::new(width, color));

            if tier == ZoomTier::Near
                && let Some(label) = &edge.label
                && (!focusing || edge_focused)
            {
                let midpoint = start + (end - start) * 0.5;
                painter.text(
                    midpoint - vec2(0.0, 4.0),
                    Align2::CENTER_BOTTOM,
                    label,
                    FontId::monospace(10.0),
                    with_alpha(Color32::from_gray(136), 0.4),
                );
            }
        }
    }

    fn draw_nodes(
        &self,
        painter: &egui::Painter,
        tier: ZoomTier,
        drawn: &[(usize, Pos2, f32, f32)],
        hovered: Option<&str>,
        search_matches: Option<&HashSet<usize>>,
    ) {
        for &(index, position, radius, alpha) in drawn {
            let node = &self.graph.nodes[index];
            let is_hovered = hovered == Some(node.id.as_str());
            let is_selected = self.selected.as_deref() == Some(node.id.as_str());
            let is_search_match = search_matches.is_some_and(|matches| matches.contains(&index));
            let focus_strength = self
                .focus
                .node_strength
                .get(&node.id)
                .copied()
                .unwrap_or(0.0);

            let mut color = node.color;
            if is_search_match {
                color = blend_color(color, SEARCH_COLOR, 0.6);
            } else if search_matches.is_some() {
                color = dim_color(color, 0.45);
            }
            if focus_strength > 0.0 && !is_hovered {
                color = lighten(color, 0.25 * focus_strength);
            }
            if is_hovered {
                color = lighten(color, 0.3);
            }

            painter.circle_filled(position, radius, with_alpha(color, alpha));
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(1.0, with_alpha(Color32::from_rgb(15, 15, 15), 0.75 * alpha)),
            );
            if is_hovered {
                painter.circle_stroke(position, radius + 1.5, Stroke::new(1.5, Color32::WHITE));
            }
            if is_selected {
                painter.circle_stroke(
                    position,
                    radius + 4.0,
                    Stroke::new(2.0, with_alpha(SELECTED_COLOR, alpha.max(0.6))),
                );
            }

            let labeled = match tier {
                ZoomTier::Far => false,
                ZoomTier::Mid => node.tier == Tier::Project || node.tier == Tier::Meta,
                ZoomTier::Near => true,
            };
            if labeled || is_hovered || is_search_match || focus_strength > 0.0 || is_selected {
                let font_size = (radius * 0.55).clamp(10.0, 14.0);
                painter.text(
                    position + vec2(0.0, radius + 4.0),
                    Align2::CENTER_TOP,
                    &node.label,
                    FontId::monospace(font_size),
                    with_alpha(
                        if is_hovered {
                            Color32::WHITE
                        } else {
                            Color32::from_gray(204)
                        },
                        alpha.max(0.35),
                    ),
                );

                if tier == ZoomTier::Near
                    && !node.description.is_empty()
                    && (is_hovered || focus_strength > 0.0 || self.focus.is_empty())
                {
                    painter.text(
                        position + vec2(0.0, radius + 8.0 + font_size),
                        Align2::CENTER_TOP,
                        &node.description,
                        FontId::monospace((font_size * 0.8).max(9.0)),
                        with_alpha(Color32::from_gray(136), alpha * 0.9),
                    );
                }
            }
        }
    }
}
