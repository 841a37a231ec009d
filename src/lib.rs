// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Point Annotator
//!
//! Foreground/background point annotation for segmentation prompts. Points
//! are placed by clicking on a scaled image and stored in source-image
//! pixel coordinates, one JSON record per image.

pub mod app;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod io;
pub mod models;
pub mod ui;
pub mod util;

pub use engine::{ImageInfo, Marker, OverlayEngine};
pub use error::OverlayError;
pub use models::point::{Point, PointKind};
pub use models::record::AnnotationRecord;
