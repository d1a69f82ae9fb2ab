use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::render_utils::screen_to_world;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.25, 6.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Closest drawn node under the pointer, by screen distance.
    pub(in crate::app) fn hovered_node_id(
        &self,
        ui: &Ui,
        screen_positions: &[(usize, Pos2, f32)],
    ) -> Option<String> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        screen_positions
            .iter()
            .filter_map(|&(index, position, radius)| {
                let distance = position.distance(pointer);
                // Generous pick radius so small nodes stay hoverable.
                if distance <= radius.max(6.0) {
                    Some((index, distance))
                } else {
                    None
                }
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| self.graph.nodes[index].id.clone())
    }
}
