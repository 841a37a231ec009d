// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persisted annotation record.
//!
//! The field names are shared with the segmentation tooling that consumes
//! these files, so they must not change.

use super::point::Point;
use crate::error::OverlayError;
use crate::util::frames::frame_index;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extra context for records taken from extracted video frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSequenceInfo {
    pub is_video_frame: bool,
    pub frame_number: u64,
    pub sequence_name: String,
}

/// Complete annotation state for one source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub image_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_directory_name: Option<String>,
    /// `[width, height]` in pixels.
    pub image_size: [u32; 2],
    pub foreground_points: Vec<Point>,
    pub background_points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_points: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation_structure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_sequence_info: Option<VideoSequenceInfo>,
}

impl AnnotationRecord {
    /// Build a record for an image, deriving the file-name metadata from its path.
    pub fn new(
        image_path: &Path,
        width: u32,
        height: u32,
        foreground_points: Vec<Point>,
        background_points: Vec<Point>,
    ) -> Self {
        let filename = image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        let source_directory = image_path
            .parent()
            .map(|dir| dir.to_string_lossy().into_owned());
        let source_directory_name = image_path
            .parent()
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let frame = filename.as_deref().map(frame_index).unwrap_or(0);
        let total = foreground_points.len() + background_points.len();

        Self {
            image_path: image_path.to_string_lossy().into_owned(),
            image_filename: filename,
            frame_index: Some(frame),
            source_directory,
            annotation_structure: Some(format!("annotations/{}/", source_directory_name)),
            video_sequence_info: Some(VideoSequenceInfo {
                is_video_frame: true,
                frame_number: frame,
                sequence_name: source_directory_name.clone(),
            }),
            source_directory_name: Some(source_directory_name),
            image_size: [width, height],
            foreground_points,
            background_points,
            total_points: Some(total),
            annotation_created: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image_size[0]
    }

    pub fn height(&self) -> u32 {
        self.image_size[1]
    }

    pub fn point_count(&self) -> usize {
        self.foreground_points.len() + self.background_points.len()
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), OverlayError> {
        if self.image_path.is_empty() {
            return Err(OverlayError::invalid_record("image_path is empty"));
        }
        if self.width() == 0 || self.height() == 0 {
            return Err(OverlayError::invalid_record(format!(
                "image_size {}x{} has a zero dimension",
                self.width(),
                self.height()
            )));
        }
        if let Some(total) = self.total_points {
            if total != self.point_count() {
                return Err(OverlayError::invalid_record(format!(
                    "total_points is {} but the record holds {} points",
                    total,
                    self.point_count()
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a record from JSON text.
    pub fn from_json(text: &str) -> Result<Self, OverlayError> {
        let record: AnnotationRecord = serde_json::from_str(text)?;
        record.validate()?;
        Ok(record)
    }

    pub fn to_json(&self) -> Result<String, OverlayError> {
        serde_json::to_string_pretty(self).map_err(|e| OverlayError::invalid_record(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnnotationRecord {
        AnnotationRecord::new(
            Path::new("videos/imgs/IMG_1824/IMG_1824_frame_000010.png"),
            1000,
            500,
            vec![Point::new(200, 100), Point::new(10, 20)],
            vec![Point::new(900, 450)],
        )
    }

    #[test]
    fn test_derived_metadata() {
        let record = sample();
        assert_eq!(record.image_filename.as_deref(), Some("IMG_1824_frame_000010.png"));
        assert_eq!(record.frame_index, Some(10));
        assert_eq!(record.source_directory_name.as_deref(), Some("IMG_1824"));
        assert_eq!(record.annotation_structure.as_deref(), Some("annotations/IMG_1824/"));
        assert_eq!(record.total_points, Some(3));
        let info = record.video_sequence_info.as_ref().unwrap();
        assert_eq!(info.frame_number, 10);
        assert_eq!(info.sequence_name, "IMG_1824");
    }

    #[test]
    fn test_json_roundtrip() {
        let record = sample();
        let json = record.to_json().unwrap();
        let parsed = AnnotationRecord::from_json(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_json_field_names() {
        let value: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(value["image_size"], serde_json::json!([1000, 500]));
        assert_eq!(value["foreground_points"], serde_json::json!([[200, 100], [10, 20]]));
        assert_eq!(value["background_points"], serde_json::json!([[900, 450]]));
        assert_eq!(value["total_points"], serde_json::json!(3));
    }

    #[test]
    fn test_minimal_record_is_accepted() {
        let json = r#"{
            "image_path": "a/b.png",
            "image_size": [640, 480],
            "foreground_points": [[1, 2]],
            "background_points": []
        }"#;
        let record = AnnotationRecord::from_json(json).unwrap();
        assert_eq!(record.foreground_points, vec![Point::new(1, 2)]);
        assert!(record.total_points.is_none());
    }

    #[test]
    fn test_missing_field_is_invalid() {
        let json = r#"{ "image_path": "a/b.png", "image_size": [640, 480], "foreground_points": [] }"#;
        assert!(matches!(
            AnnotationRecord::from_json(json),
            Err(OverlayError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_non_numeric_coordinate_is_invalid() {
        let json = r#"{
            "image_path": "a/b.png",
            "image_size": [640, 480],
            "foreground_points": [["x", 2]],
            "background_points": []
        }"#;
        assert!(matches!(
            AnnotationRecord::from_json(json),
            Err(OverlayError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_total_points_mismatch_is_invalid() {
        let mut record = sample();
        record.total_points = Some(7);
        assert!(matches!(record.validate(), Err(OverlayError::InvalidRecord(_))));
    }

    #[test]
    fn test_zero_size_is_invalid() {
        let mut record = sample();
        record.image_size = [0, 500];
        assert!(matches!(record.validate(), Err(OverlayError::InvalidRecord(_))));
    }
}
