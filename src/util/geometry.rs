// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the mapping between source-image pixel coordinates
//! and display coordinates. The mapping is a single uniform scale, so the
//! aspect ratio is preserved and the origin stays at the top-left corner.

/// Scale that fits an image into a display area without upscaling.
///
/// Returns 0.0 when either size is empty or not finite, which callers
/// treat as "not ready".
pub fn fit_scale(area_width: f64, area_height: f64, image_width: u32, image_height: u32) -> f64 {
    if image_width == 0 || image_height == 0 {
        return 0.0;
    }
    if !(area_width.is_finite() && area_height.is_finite()) || area_width <= 0.0 || area_height <= 0.0 {
        return 0.0;
    }

    let scale_x = area_width / image_width as f64;
    let scale_y = area_height / image_height as f64;
    scale_x.min(scale_y).min(1.0)
}

/// Convert a display coordinate to the nearest source pixel inside an axis
/// of `len` pixels. Positions past either edge snap to the edge pixel.
pub fn to_source_clamped(display: f64, scale: f64, len: u32) -> i32 {
    let max = len.saturating_sub(1) as f64;
    (display / scale).round().clamp(0.0, max) as i32
}

/// Convert a source pixel coordinate to display space.
pub fn to_display(source: i32, scale: f64) -> f64 {
    source as f64 * scale
}
