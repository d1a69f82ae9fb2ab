use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;
use crate::engine::focus;
use crate::util::short_label;
use crate::world::Tier;

impl ViewModel {
    pub(in crate::app) fn details_panel(&mut self, ui: &mut Ui) {
        ui.add_space(6.0);

        let Some(selected) = self.selected.clone() else {
            ui.label(RichText::new("Nothing selected").weak());
            ui.add_space(4.0);
            ui.label(
                RichText::new("Click a node in the graph to see its details here.")
                    .small()
                    .weak(),
            );
            return;
        };

        // The selection can outlive a dataset reload; drop it if stale.
        let Some(node) = self.graph.node(&selected).cloned() else {
            self.selected = None;
            return;
        };

        ui.horizontal(|ui| {
            ui.heading(&node.label);
            if ui.small_button("x").clicked() {
                self.selected = None;
            }
        });
        if self.selected.is_none() {
            return;
        }

        ui.label(RichText::new(short_label(&node.id)).monospace().weak());
        ui.horizontal(|ui| {
            ui.label(node.tier.label());
            if let Some(status) = node.status {
                ui.separator();
                ui.label(status.label());
            }
        });

        if !node.description.is_empty() {
            ui.add_space(6.0);
            ui.label(&node.description);
        }

        if let Some(url) = &node.url {
            ui.add_space(6.0);
            ui.hyperlink(url);
        }

        let tags: Vec<&str> = node.semantic_tags().collect();
        if !tags.is_empty() {
            ui.add_space(6.0);
            ui.horizontal_wrapped(|ui| {
                for tag in tags {
                    ui.label(RichText::new(tag).small().monospace());
                }
            });
        }

        // Related nodes, ranked by the same scoring that drives hover
        // emphasis in the graph.
        let relations = focus::compute_focus(&self.graph, Some(&selected));
        let mut related: Vec<(String, f32)> = relations
            .node_strength
            .iter()
            .filter(|(id, _)| id.as_str() != selected)
            .map(|(id, strength)| (id.clone(), *strength))
            .collect();
        related.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        if !related.is_empty() {
            ui.add_space(10.0);
            ui.separator();
            ui.label("Related");
            for (id, strength) in related {
                let Some(other) = self.graph.node(&id) else {
                    continue;
                };
                if other.tier == Tier::Region {
                    continue;
                }
                let label = other.label.clone();
                ui.horizontal(|ui| {
                    if ui.link(&label).clicked() {
                        self.set_selected(Some(id.clone()));
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(format!("{strength:.2}")).small().weak());
                    });
                });
            }
        }
    }
}
