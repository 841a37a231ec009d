// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings come from an optional YAML file. Every field has a default, so a
//! partial file (or no file at all) is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default = "default_annotations_dir")]
    pub annotations_dir: PathBuf,
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
    #[serde(default = "default_marker_radius")]
    pub marker_radius: f32,
    #[serde(default = "default_true")]
    pub autosave: bool,
    #[serde(default)]
    pub prompt: PromptConfig,
}

/// Initial display area, used until the window reports its real size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_display_width")]
    pub width: f64,
    #[serde(default = "default_display_height")]
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_point_limit")]
    pub foreground_limit: usize,
    #[serde(default = "default_point_limit")]
    pub background_limit: usize,
}

fn default_annotations_dir() -> PathBuf {
    PathBuf::from("annotations")
}

fn default_image_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "bmp", "tiff", "gif", "webp"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_marker_radius() -> f32 {
    5.0
}

fn default_true() -> bool {
    true
}

fn default_display_width() -> f64 {
    800.0
}

fn default_display_height() -> f64 {
    600.0
}

fn default_point_limit() -> usize {
    3
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_display_width(),
            height: default_display_height(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            foreground_limit: default_point_limit(),
            background_limit: default_point_limit(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            annotations_dir: default_annotations_dir(),
            image_extensions: default_image_extensions(),
            marker_radius: default_marker_radius(),
            autosave: true,
            prompt: PromptConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load settings from `path`, falling back to defaults when it is absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            log::info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}
