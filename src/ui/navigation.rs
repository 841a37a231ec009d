// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame navigation controls.
//!
//! Previous/next buttons, a frame slider, a frame number entry and quick
//! jumps over the image catalog.

use crate::io::catalog::ImageCatalog;
use crate::util::frames::frame_index;

/// Result of navigation panel interaction.
pub enum NavigationAction {
    None,
    Previous,
    Next,
    First,
    Last,
    Relative(isize),
    JumpTo(usize),
    InvalidEntry(String),
}

/// Display the navigation panel. `entry` holds the frame number text box.
pub fn show(ui: &mut egui::Ui, catalog: &ImageCatalog, entry: &mut String) -> NavigationAction {
    let mut action = NavigationAction::None;

    ui.heading("Navigation");
    ui.separator();

    let Some(current) = catalog.current() else {
        ui.label(egui::RichText::new("No directory selected").weak());
        return action;
    };

    ui.horizontal(|ui| {
        if ui.button("◀ Previous").clicked() {
            action = NavigationAction::Previous;
        }
        if ui.button("Next ▶").clicked() {
            action = NavigationAction::Next;
        }
    });

    ui.horizontal(|ui| {
        ui.label("Frame:");
        let response = ui.add(egui::TextEdit::singleline(entry).desired_width(60.0));
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Go").clicked() || submitted {
            action = parse_entry(entry, catalog.len());
        }
    });

    let mut slider_index = catalog.index();
    let max_index = catalog.len().saturating_sub(1);
    let slider = ui.add(egui::Slider::new(&mut slider_index, 0..=max_index).show_value(false));
    if slider.changed() && slider_index != catalog.index() {
        action = NavigationAction::JumpTo(slider_index);
    }

    ui.horizontal(|ui| {
        if ui.small_button("First").clicked() {
            action = NavigationAction::First;
        }
        for offset in [-100, -10, 10, 100] {
            if ui.small_button(format!("{:+}", offset)).clicked() {
                action = NavigationAction::Relative(offset);
            }
        }
        if ui.small_button("Last").clicked() {
            action = NavigationAction::Last;
        }
    });

    let (position, total) = catalog.position();
    let filename = current
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    ui.label(format!(
        "{}/{}: {} (Frame {})",
        position,
        total,
        filename,
        frame_index(&filename)
    ));
    ui.add(egui::ProgressBar::new(position as f32 / total as f32));

    action
}

/// Interpret the 1-based frame number typed by the user.
fn parse_entry(entry: &str, total: usize) -> NavigationAction {
    match entry.trim().parse::<usize>() {
        Ok(number) if number >= 1 && number <= total => NavigationAction::JumpTo(number - 1),
        Ok(_) => NavigationAction::InvalidEntry(format!("Frame number must be between 1 and {}", total)),
        Err(_) => NavigationAction::InvalidEntry("Please enter a valid frame number".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entry() {
        assert!(matches!(parse_entry("1", 10), NavigationAction::JumpTo(0)));
        assert!(matches!(parse_entry(" 10 ", 10), NavigationAction::JumpTo(9)));
        assert!(matches!(parse_entry("0", 10), NavigationAction::InvalidEntry(_)));
        assert!(matches!(parse_entry("11", 10), NavigationAction::InvalidEntry(_)));
        assert!(matches!(parse_entry("abc", 10), NavigationAction::InvalidEntry(_)));
    }
}
