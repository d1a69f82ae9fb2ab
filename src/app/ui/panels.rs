use eframe::egui::{self, Context};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("pteraworld");
                ui.separator();
                ui.label(format!(
                    "{} nodes, {} edges",
                    self.graph.node_count(),
                    self.graph.edge_count()
                ));
                ui.separator();
                ui.label(&self.session.active().label);
                if self.filter.is_filtering() {
                    ui.separator();
                    ui.label(format!("{} visible", self.visible.len()));
                }
            });
        });

        egui::SidePanel::left("controls")
            .default_width(235.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.controls_panel(ui);
                });
            });

        egui::SidePanel::right("details")
            .default_width(270.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.details_panel(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }
}
