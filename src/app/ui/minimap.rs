use eframe::egui::{self, Color32, Pos2, Rect, Sense, Stroke, Ui, vec2};

use super::super::ViewModel;
use super::super::render_utils::with_alpha;
use crate::world::Tier;

const MINIMAP_SIZE: egui::Vec2 = egui::Vec2::new(190.0, 140.0);
const MARGIN: f32 = 14.0;

impl ViewModel {
    /// Corner overview of the whole world. Fades in as the main view zooms
    /// past 1x, when orientation actually becomes a problem.
    pub(in crate::app) fn draw_minimap(&mut self, ui: &mut Ui, graph_rect: Rect) {
        let fade = ((self.zoom - 1.0) / 0.5).clamp(0.0, 1.0);
        if fade <= 0.0 {
            return;
        }

        let mini_rect = Rect::from_min_size(
            graph_rect.right_bottom() - MINIMAP_SIZE - vec2(MARGIN, MARGIN),
            MINIMAP_SIZE,
        );
        let painter = ui.painter_at(mini_rect);
        painter.rect_filled(
            mini_rect,
            4.0,
            with_alpha(Color32::from_rgb(10, 12, 16), 0.85 * fade),
        );
        painter.rect_stroke(
            mini_rect,
            4.0,
            Stroke::new(1.0, with_alpha(Color32::from_gray(90), fade)),
            egui::StrokeKind::Inside,
        );

        // World bounds from what is drawn, padded so edge nodes stay inset.
        let mut min = vec2(f32::MAX, f32::MAX);
        let mut max = vec2(f32::MIN, f32::MIN);
        for (index, node) in self.graph.nodes.iter().enumerate() {
            if node.tier != Tier::Region && !self.is_shown(&node.id) {
                continue;
            }
            let pos = self.display[index];
            min = min.min(pos - vec2(node.radius, node.radius));
            max = max.max(pos + vec2(node.radius, node.radius));
        }
        if min.x > max.x {
            return;
        }
        min -= vec2(40.0, 40.0);
        max += vec2(40.0, 40.0);

        let world_size = max - min;
        let scale = (mini_rect.width() / world_size.x).min(mini_rect.height() / world_size.y);
        let world_center = min + world_size * 0.5;
        let to_mini = |world: egui::Vec2| -> Pos2 {
            mini_rect.center() + (world - world_center) * scale
        };

        for region in self.session.active_regions() {
            painter.circle_stroke(
                to_mini(region.center),
                region.radius * scale,
                Stroke::new(1.0, with_alpha(region.color, 0.5 * fade)),
            );
        }
        for (index, node) in self.graph.nodes.iter().enumerate() {
            if node.tier == Tier::Region || !self.is_shown(&node.id) {
                continue;
            }
            painter.circle_filled(
                to_mini(self.display[index]),
                (node.radius * scale).clamp(1.0, 3.0),
                with_alpha(node.color, fade),
            );
        }

        // Current viewport, as a rectangle in minimap space.
        let view_min = (graph_rect.min - graph_rect.center() - self.pan) / self.zoom;
        let view_max = (graph_rect.max - graph_rect.center() - self.pan) / self.zoom;
        let view_rect = Rect::from_min_max(
            to_mini(vec2(view_min.x, view_min.y)),
            to_mini(vec2(view_max.x, view_max.y)),
        )
        .intersect(mini_rect.shrink(1.0));
        painter.rect_stroke(
            view_rect,
            0.0,
            Stroke::new(1.0, with_alpha(Color32::from_gray(230), fade)),
            egui::StrokeKind::Inside,
        );

        // Click or drag recenters the main view on that world point.
        let response = ui.interact(mini_rect, ui.id().with("minimap"), Sense::click_and_drag());
        if response.clicked() || response.dragged() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let world = world_center + (pointer - mini_rect.center()) / scale;
                self.pan = -world * self.zoom;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn fade_ramps_over_the_half_zoom_band() {
        let fade = |zoom: f32| ((zoom - 1.0) / 0.5).clamp(0.0, 1.0);
        assert_eq!(fade(0.8), 0.0);
        assert_eq!(fade(1.0), 0.0);
        assert!((fade(1.25) - 0.5).abs() < 1e-6);
        assert_eq!(fade(2.0), 1.0);
    }
}
