// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar for selecting the point mode.

use crate::models::point::PointKind;

/// Display the toolbar with point mode buttons.
pub fn show(ui: &mut egui::Ui, mode: &mut PointKind) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Point mode:");

        ui.separator();

        let foreground = egui::RichText::new("● Foreground (F)").color(egui::Color32::GREEN);
        if ui.selectable_label(*mode == PointKind::Foreground, foreground).clicked() {
            *mode = PointKind::Foreground;
        }

        let background = egui::RichText::new("● Background (B)").color(egui::Color32::RED);
        if ui.selectable_label(*mode == PointKind::Background, background).clicked() {
            *mode = PointKind::Background;
        }

        ui.separator();

        let hint = match mode {
            PointKind::Foreground => "Click inside the object of interest",
            PointKind::Background => "Click outside the object of interest",
        };

        ui.label(egui::RichText::new(hint).italics().weak());
    });
}
