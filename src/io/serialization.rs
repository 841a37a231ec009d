// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation record serialization and deserialization.
//!
//! This module handles exporting and importing annotation records in YAML
//! and JSON formats. Imports are validated before they are returned.

use crate::models::record::AnnotationRecord;
use anyhow::{bail, Result};
use std::path::Path;

/// Export an annotation record to YAML format.
pub fn export_yaml(record: &AnnotationRecord, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(record)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export an annotation record to JSON format.
pub fn export_json(record: &AnnotationRecord, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import an annotation record from YAML format.
pub fn import_yaml(path: &Path) -> Result<AnnotationRecord> {
    let yaml = std::fs::read_to_string(path)?;
    let record: AnnotationRecord = serde_yaml::from_str(&yaml).map_err(crate::error::OverlayError::from)?;
    record.validate()?;
    Ok(record)
}

/// Import an annotation record from JSON format.
pub fn import_json(path: &Path) -> Result<AnnotationRecord> {
    let json = std::fs::read_to_string(path)?;
    Ok(AnnotationRecord::from_json(&json)?)
}

/// Export using the format implied by the file extension.
pub fn export_by_extension(record: &AnnotationRecord, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(record, path),
        Some("json") => export_json(record, path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

/// Import using the format implied by the file extension.
pub fn import_by_extension(path: &Path) -> Result<AnnotationRecord> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        other => bail!("Unsupported file extension: {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OverlayError;
    use crate::models::point::Point;

    fn sample() -> AnnotationRecord {
        AnnotationRecord::new(
            Path::new("imgs/IMG_1831/IMG_1831_frame_000004.png"),
            1920,
            1080,
            vec![Point::new(960, 540)],
            vec![Point::new(10, 10), Point::new(1900, 1070)],
        )
    }

    #[test]
    fn test_yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.yaml");
        export_by_extension(&sample(), &path).unwrap();
        assert_eq!(import_by_extension(&path).unwrap(), sample());
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        export_by_extension(&sample(), &path).unwrap();
        assert_eq!(import_by_extension(&path).unwrap(), sample());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export_by_extension(&sample(), &dir.path().join("record.txt")).is_err());
    }

    #[test]
    fn test_malformed_import_is_invalid_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");
        std::fs::write(&path, r#"{"image_path": "a.png"}"#).unwrap();

        let err = import_json(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OverlayError>(),
            Some(OverlayError::InvalidRecord(_))
        ));
    }
}
