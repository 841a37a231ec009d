// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Point management panel.
//!
//! Shows the point counts and coordinates for the current image and offers
//! the undo/clear/save operations.

use crate::engine::OverlayEngine;
use crate::models::point::PointKind;

/// Result of point panel interaction.
pub enum PropertiesAction {
    None,
    Undo,
    Clear(Option<PointKind>),
    Save,
    DeleteCurrent,
    BatchStatus,
    CopyPrompt,
}

/// Display the point panel.
pub fn show(ui: &mut egui::Ui, engine: &OverlayEngine) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Points");
    ui.separator();

    if engine.image().is_none() {
        ui.label(egui::RichText::new("No image loaded").weak());
        return action;
    }

    let foreground = engine.points(PointKind::Foreground);
    let background = engine.points(PointKind::Background);

    ui.label(format!("Foreground: {}", foreground.len()));
    ui.label(format!("Background: {}", background.len()));
    if engine.is_modified() {
        ui.label(egui::RichText::new("Unsaved changes").italics().weak());
    }

    ui.add_space(6.0);
    if ui.button("Undo Last Point (Z)").clicked() {
        action = PropertiesAction::Undo;
    }
    if ui.button("Clear All Points (C)").clicked() {
        action = PropertiesAction::Clear(None);
    }
    if ui.button("Clear Foreground").clicked() {
        action = PropertiesAction::Clear(Some(PointKind::Foreground));
    }
    if ui.button("Clear Background").clicked() {
        action = PropertiesAction::Clear(Some(PointKind::Background));
    }

    ui.separator();
    if ui.button("Save Annotations (S)").clicked() {
        action = PropertiesAction::Save;
    }
    if ui.button("Delete Current Annotations").clicked() {
        action = PropertiesAction::DeleteCurrent;
    }
    if ui.button("Batch Status").clicked() {
        action = PropertiesAction::BatchStatus;
    }
    if ui.button("Copy Prompt JSON").clicked() {
        action = PropertiesAction::CopyPrompt;
    }

    ui.separator();
    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::CollapsingHeader::new(format!("Foreground points ({})", foreground.len()))
            .default_open(true)
            .show(ui, |ui| {
                for (i, point) in foreground.iter().enumerate() {
                    ui.monospace(format!("{:>3}: ({}, {})", i + 1, point.x, point.y));
                }
            });
        egui::CollapsingHeader::new(format!("Background points ({})", background.len()))
            .default_open(true)
            .show(ui, |ui| {
                for (i, point) in background.iter().enumerate() {
                    ui.monospace(format!("{:>3}: ({}, {})", i + 1, point.x, point.y));
                }
            });
    });

    action
}
