// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the eframe::App trait. It wires the image catalog, the annotation store
//! and the overlay engine to the UI components.

use crate::config::AppConfig;
use crate::engine::{ImageInfo, OverlayEngine};
use crate::io::catalog::ImageCatalog;
use crate::io::store::AnnotationStore;
use crate::models::point::PointKind;
use crate::models::record::AnnotationRecord;
use crate::ui::{canvas, navigation, properties, toolbar};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

/// Result of background image loading operation.
struct LoadedImageData {
    path: PathBuf,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    prior: Option<AnnotationRecord>,
}

/// Whether navigating away should write the current record.
///
/// An emptied record is only written when it replaces a stored file, so the
/// old points do not come back on the next visit.
pub fn should_autosave(enabled: bool, modified: bool, has_points: bool, stored_exists: bool) -> bool {
    enabled && modified && (has_points || stored_exists)
}

/// Main application state.
pub struct AnnotatorApp {
    config: AppConfig,

    /// Points for the image on screen
    engine: OverlayEngine,

    /// Where records are persisted
    store: AnnotationStore,

    /// Images available for annotation
    catalog: ImageCatalog,

    /// Kind assigned to the next click
    mode: PointKind,

    /// Loaded image texture for display
    image_texture: Option<egui::TextureHandle>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImageData, String>>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Frame number text box contents
    frame_entry: String,

    /// Last message shown in the status bar
    status: String,
}

impl AnnotatorApp {
    /// Create a new application instance.
    pub fn new(config: AppConfig) -> Self {
        Self {
            engine: OverlayEngine::new(config.display.width, config.display.height),
            store: AnnotationStore::new(config.annotations_dir.clone()),
            config,
            catalog: ImageCatalog::default(),
            mode: PointKind::Foreground,
            image_texture: None,
            image_loader: None,
            loading_message: None,
            frame_entry: String::new(),
            status: "No file loaded".to_string(),
        }
    }

    /// Open every image in a directory, starting with the first.
    pub fn open_directory(&mut self, dir: &Path) {
        match ImageCatalog::from_directory(dir, &self.config.image_extensions) {
            Ok(catalog) if catalog.is_empty() => {
                self.set_status(format!("No image files found in {}", dir.display()));
            }
            Ok(catalog) => {
                self.autosave();
                self.catalog = catalog;
                self.load_current();
            }
            Err(e) => {
                log::error!("{:#}", e);
                self.set_status(format!("Failed to open directory: {}", e));
            }
        }
    }

    /// Open a single image file.
    pub fn open_image(&mut self, path: PathBuf) {
        self.autosave();
        self.catalog = ImageCatalog::single(path);
        self.load_current();
    }

    /// Move through the catalog, saving the current image first.
    fn navigate(&mut self, step: impl FnOnce(&mut ImageCatalog) -> bool) {
        if self.image_loader.is_some() {
            return;
        }
        self.autosave();
        if step(&mut self.catalog) {
            self.load_current();
        }
    }

    /// Load the catalog's current image and its stored record (asynchronously).
    fn load_current(&mut self) {
        let Some(path) = self.catalog.current().cloned() else {
            return;
        };
        let (position, total) = self.catalog.position();
        self.frame_entry = position.to_string();

        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some(format!("Loading image {}/{}...", position, total));

        let store = self.store.clone();

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = (|| -> Result<LoadedImageData, String> {
                let loaded_img = crate::io::media::load_image(&path)
                    .map_err(|e| format!("Failed to load image: {:#}", e))?;

                log::info!("Loaded image: {} ({}x{})", path.display(), loaded_img.width, loaded_img.height);

                let prior = match store.load(&path) {
                    Ok(prior) => prior,
                    Err(e) => {
                        log::warn!("Ignoring stored annotations for {}: {:#}", path.display(), e);
                        None
                    }
                };

                Ok(LoadedImageData {
                    path,
                    width: loaded_img.width,
                    height: loaded_img.height,
                    pixels: loaded_img.pixels,
                    prior,
                })
            })();

            let _ = sender.send(result);
        });
    }

    /// Install a finished background load.
    fn finish_loading(&mut self, ctx: &egui::Context, loaded: LoadedImageData) {
        let size = [loaded.width as usize, loaded.height as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
        self.image_texture = Some(ctx.load_texture("loaded_image", color_image, egui::TextureOptions::LINEAR));

        let info = ImageInfo::new(loaded.path.clone(), loaded.width, loaded.height);
        if let Err(e) = self.engine.load(info.clone(), loaded.prior.as_ref()) {
            log::warn!("Stored annotations for {} rejected: {}", loaded.path.display(), e);
            // Loading without a prior record cannot fail.
            let _ = self.engine.load(info, None);
        }

        let name = loaded
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!("Point Annotator - {}", name)));
        self.set_status(format!("Loaded {}", name));
    }

    /// Save the current record when it changed since it was loaded.
    fn autosave(&mut self) {
        let Some(image) = self.engine.image() else {
            return;
        };
        let stored_exists = self.store.path_for(&image.path).exists();
        if !should_autosave(
            self.config.autosave,
            self.engine.is_modified(),
            self.engine.has_points(),
            stored_exists,
        ) {
            return;
        }
        if let Err(e) = self.persist() {
            log::error!("Auto-save failed: {:#}", e);
            self.set_status(format!("Auto-save failed: {}", e));
        }
    }

    fn persist(&mut self) -> anyhow::Result<PathBuf> {
        let record = self.engine.to_record()?;
        let path = self.store.save(&record)?;
        self.engine.mark_saved();
        Ok(path)
    }

    fn save_current(&mut self) {
        match self.persist() {
            Ok(path) => self.set_status(format!("Annotations saved to {}", path.display())),
            Err(e) => {
                log::error!("Failed to save annotations: {:#}", e);
                self.set_status(format!("Failed to save annotations: {}", e));
            }
        }
    }

    /// Export the current record to a file chosen by the user.
    fn export_annotations(&mut self, path: PathBuf) {
        let result = self
            .engine
            .to_record()
            .map_err(anyhow::Error::from)
            .and_then(|record| crate::io::serialization::export_by_extension(&record, &path));

        match result {
            Ok(()) => {
                log::info!("Exported annotations to {}", path.display());
                self.set_status(format!("Exported annotations to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export annotations: {:#}", e);
                self.set_status(format!("Failed to export annotations: {}", e));
            }
        }
    }

    /// Replace the current points with a record read from a file.
    fn import_annotations(&mut self, path: PathBuf) {
        let result = crate::io::serialization::import_by_extension(&path)
            .and_then(|record| self.engine.from_record(&record).map_err(anyhow::Error::from));

        match result {
            Ok(()) => {
                log::info!("Imported annotations from {}", path.display());
                self.set_status(format!("Imported annotations from {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to import annotations: {:#}", e);
                self.set_status(format!("Failed to import annotations: {}", e));
            }
        }
    }

    /// Clear both point sets and remove the stored file.
    fn delete_current(&mut self) {
        let Some(image_path) = self.engine.image().map(|image| image.path.clone()) else {
            return;
        };
        self.engine.clear(None);
        match self.store.delete(&image_path) {
            Ok(existed) => {
                self.engine.mark_saved();
                self.set_status(if existed {
                    "Deleted stored annotations".to_string()
                } else {
                    "Cleared points (nothing stored)".to_string()
                });
            }
            Err(e) => {
                log::error!("{:#}", e);
                self.set_status(format!("Failed to delete annotation file: {}", e));
            }
        }
    }

    fn batch_status(&mut self) {
        if self.catalog.is_empty() {
            self.set_status("No directory loaded".to_string());
            return;
        }
        self.autosave();
        let existing = self.store.count_existing(self.catalog.items());
        let dir_name = self
            .catalog
            .items()
            .first()
            .and_then(|p| p.parent())
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());
        self.set_status(format!(
            "Annotations exist for {}/{} images in {}",
            existing,
            self.catalog.len(),
            self.store.root().join(dir_name).display()
        ));
    }

    fn copy_prompt(&mut self, ctx: &egui::Context) {
        let prompt = self
            .engine
            .prompt(self.config.prompt.foreground_limit, self.config.prompt.background_limit);
        match serde_json::to_string(&prompt) {
            Ok(json) => {
                ctx.output_mut(|o| o.copied_text = json);
                self.set_status(format!("Copied prompt with {} points", prompt.points.len()));
            }
            Err(e) => log::error!("Failed to encode prompt: {}", e),
        }
    }

    fn add_point(&mut self, x: f64, y: f64) {
        match self.engine.record_click(x, y, self.mode) {
            Ok(point) => self.set_status(format!("Added {} point ({}, {})", self.mode.name(), point.x, point.y)),
            Err(e) => {
                log::warn!("Click ignored: {}", e);
                self.set_status(e.to_string());
            }
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let pressed = |key| ctx.input(|i| i.key_pressed(key) && !i.modifiers.command);

        if pressed(egui::Key::F) {
            self.mode = PointKind::Foreground;
        }
        if pressed(egui::Key::B) {
            self.mode = PointKind::Background;
        }
        if pressed(egui::Key::C) {
            self.engine.clear(None);
        }
        if pressed(egui::Key::Z) {
            self.engine.undo(self.mode);
        }
        if pressed(egui::Key::S) {
            self.save_current();
        }
        if pressed(egui::Key::Delete) {
            self.delete_current();
        }
        if pressed(egui::Key::ArrowLeft) {
            self.navigate(ImageCatalog::previous);
        }
        if pressed(egui::Key::ArrowRight) || pressed(egui::Key::Space) {
            self.navigate(ImageCatalog::next);
        }
        if pressed(egui::Key::Home) {
            self.navigate(ImageCatalog::first);
        }
        if pressed(egui::Key::End) {
            self.navigate(ImageCatalog::last);
        }
        if pressed(egui::Key::PageUp) {
            self.navigate(|c| c.jump_relative(-10));
        }
        if pressed(egui::Key::PageDown) {
            self.navigate(|c| c.jump_relative(10));
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Directory...").clicked() {
                        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                            self.open_directory(&dir);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Open Image...").clicked() {
                        let extensions: Vec<&str> = self.config.image_extensions.iter().map(String::as_str).collect();
                        if let Some(path) = rfd::FileDialog::new().add_filter("Images", &extensions).pick_file() {
                            self.open_image(path);
                        }
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Save Annotations").clicked() {
                        self.save_current();
                        ui.close_menu();
                    }
                    if ui.button("Load Annotations...").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Annotations", &["json", "yaml", "yml"])
                            .pick_file()
                        {
                            self.import_annotations(path);
                        }
                        ui.close_menu();
                    }
                    ui.menu_button("Export Annotations", |ui| {
                        if ui.button("Export as JSON...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("JSON", &["json"])
                                .set_file_name("annotations.json")
                                .save_file()
                            {
                                self.export_annotations(path);
                            }
                            ui.close_menu();
                        }
                        if ui.button("Export as YAML...").clicked() {
                            if let Some(path) = rfd::FileDialog::new()
                                .add_filter("YAML", &["yaml", "yml"])
                                .set_file_name("annotations.yaml")
                                .save_file()
                            {
                                self.export_annotations(path);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        self.autosave();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });
    }
}

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed image loading
        if let Some(ref receiver) = self.image_loader {
            if let Ok(result) = receiver.try_recv() {
                self.image_loader = None;
                self.loading_message = None;

                match result {
                    Ok(loaded) => self.finish_loading(ctx, loaded),
                    Err(e) => {
                        log::error!("{}", e);
                        // The cursor already points at the failed image.
                        self.image_texture = None;
                        self.engine.unload();
                        self.set_status(e);
                    }
                }
            }
        }

        if ctx.input(|i| i.viewport().close_requested()) {
            self.autosave();
        }

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        self.menu_bar(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar::show(ui, &mut self.mode);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Mode: {}", self.mode.name()));
                ui.separator();
                ui.label(format!("Scale: {:.3}", self.engine.scale()));
                ui.separator();
                ui.label(&self.status);
            });
        });

        let navigation_action = egui::SidePanel::left("navigation")
            .default_width(240.0)
            .show(ctx, |ui| navigation::show(ui, &self.catalog, &mut self.frame_entry))
            .inner;

        match navigation_action {
            navigation::NavigationAction::Previous => self.navigate(ImageCatalog::previous),
            navigation::NavigationAction::Next => self.navigate(ImageCatalog::next),
            navigation::NavigationAction::First => self.navigate(ImageCatalog::first),
            navigation::NavigationAction::Last => self.navigate(ImageCatalog::last),
            navigation::NavigationAction::Relative(offset) => self.navigate(|c| c.jump_relative(offset)),
            navigation::NavigationAction::JumpTo(index) => self.navigate(|c| c.jump_to(index)),
            navigation::NavigationAction::InvalidEntry(message) => self.set_status(message),
            navigation::NavigationAction::None => {}
        }

        let properties_action = egui::SidePanel::right("points")
            .default_width(220.0)
            .show(ctx, |ui| properties::show(ui, &self.engine))
            .inner;

        match properties_action {
            properties::PropertiesAction::Undo => {
                self.engine.undo(self.mode);
            }
            properties::PropertiesAction::Clear(kind) => self.engine.clear(kind),
            properties::PropertiesAction::Save => self.save_current(),
            properties::PropertiesAction::DeleteCurrent => self.delete_current(),
            properties::PropertiesAction::BatchStatus => self.batch_status(),
            properties::PropertiesAction::CopyPrompt => self.copy_prompt(ctx),
            properties::PropertiesAction::None => {}
        }

        self.handle_keyboard(ctx);

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    canvas::CanvasAction::None
                } else {
                    canvas::show(ui, &mut self.engine, &self.image_texture, self.config.marker_radius)
                }
            })
            .inner;

        if let canvas::CanvasAction::AddPoint { x, y } = canvas_action {
            self.add_point(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmodified_is_not_saved() {
        assert!(!should_autosave(true, false, true, true));
        assert!(!should_autosave(true, false, true, false));
    }

    #[test]
    fn test_modified_with_points_is_saved() {
        assert!(should_autosave(true, true, true, false));
        assert!(should_autosave(true, true, true, true));
    }

    #[test]
    fn test_emptied_record_replaces_stored_file() {
        assert!(should_autosave(true, true, false, true));
    }

    #[test]
    fn test_emptied_record_without_stored_file_is_skipped() {
        assert!(!should_autosave(true, true, false, false));
    }

    #[test]
    fn test_disabled() {
        assert!(!should_autosave(false, true, true, true));
        assert!(!should_autosave(false, true, false, true));
    }
}
