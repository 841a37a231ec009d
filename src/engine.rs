// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation overlay engine.
//!
//! The engine owns the foreground and background point sets of the image on
//! screen. Points are stored in source-image pixels only; display positions
//! are derived from the current scale factor every time they are asked for,
//! so resizing the display area after annotating never moves a point.

use crate::error::OverlayError;
use crate::models::point::{Point, PointKind, PointSet};
use crate::models::prompt::SegmentationPrompt;
use crate::models::record::AnnotationRecord;
use crate::util::geometry::{fit_scale, to_display, to_source_clamped};
use std::path::PathBuf;

/// Identity and pixel dimensions of the image being annotated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}

/// A marker position in display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub x: f64,
    pub y: f64,
    pub kind: PointKind,
}

/// Maps pointer input onto labeled source-space points for one image.
#[derive(Debug, Clone)]
pub struct OverlayEngine {
    image: Option<ImageInfo>,
    display_size: (f64, f64),
    scale: f64,
    foreground: PointSet,
    background: PointSet,
    /// Bumped on every visible change; the renderer redraws when it moves.
    revision: u64,
    /// Unsaved changes since the last load or save.
    modified: bool,
}

impl OverlayEngine {
    /// Create an engine with no image and the given display area.
    pub fn new(display_width: f64, display_height: f64) -> Self {
        Self {
            image: None,
            display_size: (display_width, display_height),
            scale: 0.0,
            foreground: PointSet::new(),
            background: PointSet::new(),
            revision: 0,
            modified: false,
        }
    }

    /// Show a new image, optionally seeded from a previously saved record.
    ///
    /// A bad prior record, or one made for an image of another size, is
    /// rejected before anything changes.
    pub fn load(&mut self, image: ImageInfo, prior: Option<&AnnotationRecord>) -> Result<(), OverlayError> {
        if let Some(record) = prior {
            record.validate()?;
            check_size(record, &image)?;
        }

        self.foreground.clear();
        self.background.clear();
        if let Some(record) = prior {
            self.foreground = PointSet::from(record.foreground_points.clone());
            self.background = PointSet::from(record.background_points.clone());
        }

        log::info!(
            "Loaded {} ({}x{}) with {} foreground and {} background points",
            image.path.display(),
            image.width,
            image.height,
            self.foreground.len(),
            self.background.len()
        );

        self.image = Some(image);
        self.modified = false;
        self.recompute_scale();
        self.touch();
        Ok(())
    }

    /// Drop the current image and its points.
    pub fn unload(&mut self) {
        self.image = None;
        self.foreground.clear();
        self.background.clear();
        self.scale = 0.0;
        self.modified = false;
        self.touch();
    }

    /// Update the space available for rendering.
    pub fn set_display_area_size(&mut self, width: f64, height: f64) {
        if self.display_size == (width, height) {
            return;
        }
        self.display_size = (width, height);
        let previous = self.scale;
        self.recompute_scale();
        if self.scale != previous {
            log::debug!("Display scale {:.4} -> {:.4}", previous, self.scale);
            self.touch();
        }
    }

    /// Record a click at display coordinates as a point of the given kind.
    ///
    /// The source point is snapped into the image, so a click on the last
    /// drawn row or column lands on the last pixel.
    pub fn record_click(&mut self, display_x: f64, display_y: f64, kind: PointKind) -> Result<Point, OverlayError> {
        let Some(image) = &self.image else {
            return Err(OverlayError::not_ready("no image loaded"));
        };
        if self.scale <= 0.0 {
            return Err(OverlayError::not_ready("display area has no usable size"));
        }
        if !(display_x.is_finite() && display_y.is_finite()) {
            return Err(OverlayError::not_ready("click position is not a finite coordinate"));
        }

        let point = Point::new(
            to_source_clamped(display_x, self.scale, image.width),
            to_source_clamped(display_y, self.scale, image.height),
        );
        self.set_mut(kind).push(point);
        log::debug!(
            "Added {} point ({}, {}) from click ({:.1}, {:.1})",
            kind.name(),
            point.x,
            point.y,
            display_x,
            display_y
        );
        self.modified = true;
        self.touch();
        Ok(point)
    }

    /// Remove the most recent point of a kind. Empty sets are left alone.
    pub fn undo(&mut self, kind: PointKind) -> Option<Point> {
        let removed = self.set_mut(kind).pop();
        if removed.is_some() {
            self.modified = true;
            self.touch();
        }
        removed
    }

    /// Empty one point set, or both when `kind` is `None`.
    pub fn clear(&mut self, kind: Option<PointKind>) {
        let had_points = match kind {
            Some(kind) => {
                let set = self.set_mut(kind);
                let had = !set.is_empty();
                set.clear();
                had
            }
            None => {
                let had = !self.foreground.is_empty() || !self.background.is_empty();
                self.foreground.clear();
                self.background.clear();
                had
            }
        };
        if had_points {
            self.modified = true;
            self.touch();
        }
    }

    /// Display positions of every stored point, foreground first.
    ///
    /// Computed fresh on each call from source coordinates and the current
    /// scale.
    pub fn render_positions(&self) -> impl Iterator<Item = Marker> + '_ {
        let scale = self.scale;
        let foreground = self.foreground.iter().map(move |p| (p, PointKind::Foreground));
        let background = self.background.iter().map(move |p| (p, PointKind::Background));
        foreground.chain(background).map(move |(point, kind)| Marker {
            x: to_display(point.x, scale),
            y: to_display(point.y, scale),
            kind,
        })
    }

    /// Snapshot the current image and points for persistence.
    pub fn to_record(&self) -> Result<AnnotationRecord, OverlayError> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| OverlayError::not_ready("no image loaded"))?;
        Ok(AnnotationRecord::new(
            &image.path,
            image.width,
            image.height,
            self.foreground.as_slice().to_vec(),
            self.background.as_slice().to_vec(),
        ))
    }

    /// Replace both point sets with the contents of a record.
    ///
    /// With an image loaded, the record must describe an image of the same
    /// size.
    pub fn from_record(&mut self, record: &AnnotationRecord) -> Result<(), OverlayError> {
        record.validate()?;
        if let Some(image) = &self.image {
            check_size(record, image)?;
        }
        self.foreground = PointSet::from(record.foreground_points.clone());
        self.background = PointSet::from(record.background_points.clone());
        self.modified = true;
        self.touch();
        Ok(())
    }

    /// Prompt payload for the segmentation model from the current points.
    pub fn prompt(&self, foreground_limit: usize, background_limit: usize) -> SegmentationPrompt {
        SegmentationPrompt::from_points(
            self.foreground.as_slice(),
            self.background.as_slice(),
            foreground_limit,
            background_limit,
        )
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn has_points(&self) -> bool {
        !self.foreground.is_empty() || !self.background.is_empty()
    }

    pub fn points(&self, kind: PointKind) -> &PointSet {
        match kind {
            PointKind::Foreground => &self.foreground,
            PointKind::Background => &self.background,
        }
    }

    pub fn image(&self) -> Option<&ImageInfo> {
        self.image.as_ref()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn display_size(&self) -> (f64, f64) {
        self.display_size
    }

    /// Size of the scaled image in display space.
    pub fn displayed_image_size(&self) -> Option<(f64, f64)> {
        self.image
            .as_ref()
            .map(|image| (image.width as f64 * self.scale, image.height as f64 * self.scale))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn set_mut(&mut self, kind: PointKind) -> &mut PointSet {
        match kind {
            PointKind::Foreground => &mut self.foreground,
            PointKind::Background => &mut self.background,
        }
    }

    fn recompute_scale(&mut self) {
        self.scale = match &self.image {
            Some(image) => fit_scale(self.display_size.0, self.display_size.1, image.width, image.height),
            None => 0.0,
        };
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn check_size(record: &AnnotationRecord, image: &ImageInfo) -> Result<(), OverlayError> {
    if record.image_size != [image.width, image.height] {
        return Err(OverlayError::invalid_record(format!(
            "record is for a {}x{} image, {} is {}x{}",
            record.width(),
            record.height(),
            image.path.display(),
            image.width,
            image.height
        )));
    }
    Ok(())
}

impl Default for OverlayEngine {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
