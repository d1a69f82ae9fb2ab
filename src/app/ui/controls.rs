use eframe::egui::{self, Slider, Ui};

use super::super::ViewModel;
use crate::engine::layout::LayoutConfig;

impl ViewModel {
    pub(in crate::app) fn controls_panel(&mut self, ui: &mut Ui) {
        ui.add_space(6.0);
        ui.label("Search");
        let search = ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("fuzzy match labels")
                .desired_width(f32::INFINITY),
        );
        if search.changed() && !self.search.is_empty() {
            log::debug!("search: {:?}", self.search);
        }

        ui.add_space(10.0);
        ui.separator();
        ui.label("Grouping");
        let groupings: Vec<(String, String)> = self
            .session
            .groupings()
            .iter()
            .map(|grouping| (grouping.id.clone(), grouping.label.clone()))
            .collect();
        let active_id = self.session.active().id.clone();
        ui.horizontal_wrapped(|ui| {
            for (id, label) in &groupings {
                if ui.selectable_label(*id == active_id, label).clicked() {
                    self.set_grouping(id);
                }
            }
        });

        ui.add_space(10.0);
        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Tags");
            if self.filter.is_filtering() && ui.small_button("clear").clicked() {
                self.clear_filter();
            }
        });
        let tags = self.filter.available.clone();
        ui.horizontal_wrapped(|ui| {
            for tag in &tags {
                let active = self.filter.active.contains(tag);
                if ui.selectable_label(active, tag).clicked() {
                    self.toggle_tag(tag);
                }
            }
        });

        ui.add_space(10.0);
        ui.separator();
        ui.collapsing("Layout tuning", |ui| {
            let config = &mut self.layout_config;
            ui.add(Slider::new(&mut config.repulsion, 500.0..=20000.0).text("repulsion"));
            ui.add(
                Slider::new(&mut config.spring_k, 0.001..=0.05)
                    .logarithmic(true)
                    .text("spring"),
            );
            ui.add(Slider::new(&mut config.rest_length, 20.0..=240.0).text("rest length"));
            ui.add(Slider::new(&mut config.anchor_k, 0.0..=0.3).text("anchor pull"));
            ui.add(Slider::new(&mut config.center_k, 0.0..=0.05).text("centroid pull"));
            ui.add(Slider::new(&mut config.damping, 0.5..=0.99).text("damping"));
            ui.add(Slider::new(&mut config.max_force, 1.0..=50.0).text("max force"));
            ui.add(Slider::new(&mut config.max_steps, 20..=600).text("max steps"));
            ui.add(Slider::new(&mut config.convergence, 0.05..=2.0).text("convergence"));
            ui.add(Slider::new(&mut config.fade_threshold, 0.05..=1.0).text("fade threshold"));

            ui.horizontal(|ui| {
                if ui.button("Defaults").clicked() {
                    self.layout_config = LayoutConfig::default();
                }
                if ui.button("Re-run layout").clicked() {
                    self.apply_filter_change();
                }
            });
        });

        ui.add_space(10.0);
        ui.separator();
        ui.checkbox(&mut self.show_minimap, "Minimap");
        ui.add_space(6.0);
        ui.label(
            egui::RichText::new("Scroll to zoom, drag to pan. Hover a node to trace its relations, click to inspect it.")
                .small()
                .weak(),
        );
    }
}
