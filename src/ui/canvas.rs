// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and point annotation.
//!
//! The canvas reports its size to the overlay engine, draws the image at
//! the engine's scale anchored to the top-left corner, and draws one marker
//! per stored point. Clicks are reported back in display coordinates
//! relative to the image origin.

use crate::engine::{Marker, OverlayEngine};
use crate::models::point::PointKind;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    AddPoint { x: f64, y: f64 },
}

/// Display the main canvas area and handle mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    engine: &mut OverlayEngine,
    image_texture: &Option<egui::TextureHandle>,
    marker_radius: f32,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available);

        let (Some(texture), Some(_)) = (image_texture, engine.image()) else {
            show_welcome(ui);
            return;
        };

        let area = ui.available_size();
        engine.set_display_area_size(area.x as f64, area.y as f64);

        let Some((display_width, display_height)) = engine.displayed_image_size() else {
            return;
        };
        if display_width <= 0.0 || display_height <= 0.0 {
            return;
        }

        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min,
            egui::vec2(display_width as f32, display_height as f32),
        );

        ui.painter().image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let response = ui.allocate_rect(image_rect, egui::Sense::click());
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if image_rect.contains(pos) {
                    action = CanvasAction::AddPoint {
                        x: (pos.x - image_rect.min.x) as f64,
                        y: (pos.y - image_rect.min.y) as f64,
                    };
                }
            }
        }

        let painter = ui.painter();
        for marker in engine.render_positions() {
            draw_marker(painter, &marker, image_rect.min, marker_radius);
        }
    });

    action
}

fn draw_marker(painter: &egui::Painter, marker: &Marker, origin: egui::Pos2, radius: f32) {
    let (fill, outline) = match marker.kind {
        PointKind::Foreground => (egui::Color32::GREEN, egui::Color32::DARK_GREEN),
        PointKind::Background => (egui::Color32::RED, egui::Color32::DARK_RED),
    };
    let center = origin + egui::vec2(marker.x as f32, marker.y as f32);
    painter.circle(center, radius, fill, egui::Stroke::new(2.0, outline));
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Point Annotator")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Foreground / background points for segmentation prompts")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open an image directory to begin annotating")
                    .color(egui::Color32::from_gray(180)),
            );
        });
    });
}
