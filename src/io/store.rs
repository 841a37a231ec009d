// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! On-disk annotation store.
//!
//! Records are keyed by image identity. An image at `<dir>/<stem>.<ext>`
//! is stored at `<root>/<dir name>/<stem>_annotations.json`, so frames
//! extracted from the same video end up side by side. Writes replace the
//! previous file outright (last write wins).

use crate::models::record::AnnotationRecord;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct AnnotationStore {
    root: PathBuf,
}

impl AnnotationStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the record for an image.
    pub fn path_for(&self, image_path: &Path) -> PathBuf {
        let dir_name = image_path
            .parent()
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = image_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.root.join(dir_name).join(format!("{}_annotations.json", stem))
    }

    /// Read the stored record for an image, if any.
    pub fn load(&self, image_path: &Path) -> Result<Option<AnnotationRecord>> {
        let path = self.path_for(image_path);
        if !path.exists() {
            return Ok(None);
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let record = AnnotationRecord::from_json(&text)?;
        log::info!(
            "Loaded existing annotations: {} FG, {} BG from {}",
            record.foreground_points.len(),
            record.background_points.len(),
            path.display()
        );
        Ok(Some(record))
    }

    /// Write a record, replacing any previous one for the same image.
    pub fn save(&self, record: &AnnotationRecord) -> Result<PathBuf> {
        let path = self.path_for(Path::new(&record.image_path));
        let dir = path.parent().unwrap_or(&self.root);
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let mut record = record.clone();
        record.annotation_created = Some(dir.to_string_lossy().into_owned());
        let json = record.to_json()?;
        std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

        log::info!("Saved {} points to {}", record.point_count(), path.display());
        Ok(path)
    }

    /// Remove the stored record for an image. Returns whether a file existed.
    pub fn delete(&self, image_path: &Path) -> Result<bool> {
        let path = self.path_for(image_path);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path).with_context(|| format!("Failed to delete {}", path.display()))?;
        log::info!("Deleted annotation file {}", path.display());
        Ok(true)
    }

    /// Number of images that already have a stored record.
    pub fn count_existing<'a>(&self, images: impl IntoIterator<Item = &'a PathBuf>) -> usize {
        images
            .into_iter()
            .filter(|image| self.path_for(image).exists())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OverlayError;
    use crate::models::point::Point;

    fn record_for(image: &Path) -> AnnotationRecord {
        AnnotationRecord::new(image, 640, 480, vec![Point::new(1, 2)], vec![Point::new(3, 4)])
    }

    #[test]
    fn test_path_for() {
        let store = AnnotationStore::new("annotations");
        assert_eq!(
            store.path_for(Path::new("videos/imgs/IMG_1824/IMG_1824_frame_000001.png")),
            PathBuf::from("annotations/IMG_1824/IMG_1824_frame_000001_annotations.json")
        );
    }

    #[test]
    fn test_save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = AnnotationStore::new(dir.path().join("annotations"));
        let image = PathBuf::from("imgs/IMG_1756/frame_000002.png");

        assert!(store.load(&image).unwrap().is_none());

        let record = record_for(&image);
        let path = store.save(&record).unwrap();
        assert!(path.exists());

        let loaded = store.load(&image).unwrap().unwrap();
        assert_eq!(loaded.foreground_points, record.foreground_points);
        assert_eq!(loaded.background_points, record.background_points);
        assert!(loaded.annotation_created.is_some());

        assert!(store.delete(&image).unwrap());
        assert!(!store.delete(&image).unwrap());
        assert!(store.load(&image).unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = AnnotationStore::new(dir.path());
        let image = PathBuf::from("imgs/seq/a.png");

        store.save(&record_for(&image)).unwrap();
        let mut second = record_for(&image);
        second.foreground_points.push(Point::new(9, 9));
        second.total_points = Some(3);
        store.save(&second).unwrap();

        let loaded = store.load(&image).unwrap().unwrap();
        assert_eq!(loaded.foreground_points.len(), 2);
    }

    #[test]
    fn test_load_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = AnnotationStore::new(dir.path());
        let image = PathBuf::from("imgs/seq/a.png");
        let path = store.path_for(&image);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let err = store.load(&image).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OverlayError>(),
            Some(OverlayError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_count_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = AnnotationStore::new(dir.path());
        let images = vec![
            PathBuf::from("imgs/seq/a.png"),
            PathBuf::from("imgs/seq/b.png"),
            PathBuf::from("imgs/seq/c.png"),
        ];
        store.save(&record_for(&images[0])).unwrap();
        store.save(&record_for(&images[2])).unwrap();

        assert_eq!(store.count_existing(&images), 2);
    }
}
