// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Ordered list of images to annotate and a cursor over it.
//!
//! Cursor moves return `true` only when the current image actually changed.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    items: Vec<PathBuf>,
    index: usize,
}

impl ImageCatalog {
    /// Collect the images directly inside `dir`, sorted by path.
    pub fn from_directory(dir: &Path, extensions: &[String]) -> Result<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;

        let mut items = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && has_extension(&path, extensions) {
                items.push(path);
            }
        }
        items.sort();

        log::info!("Found {} images in {}", items.len(), dir.display());
        Ok(Self { items, index: 0 })
    }

    /// A catalog holding one image.
    pub fn single(path: PathBuf) -> Self {
        Self {
            items: vec![path],
            index: 0,
        }
    }

    pub fn items(&self) -> &[PathBuf] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&PathBuf> {
        self.items.get(self.index)
    }

    /// 1-based position and total, for display.
    pub fn position(&self) -> (usize, usize) {
        if self.items.is_empty() {
            (0, 0)
        } else {
            (self.index + 1, self.items.len())
        }
    }

    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.items.len() || index == self.index {
            return false;
        }
        self.index = index;
        true
    }

    /// Move by `offset`, clamped to the ends of the catalog.
    pub fn jump_relative(&mut self, offset: isize) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let last = self.items.len() as isize - 1;
        let target = (self.index as isize + offset).clamp(0, last);
        self.jump_to(target as usize)
    }

    pub fn next(&mut self) -> bool {
        self.jump_relative(1)
    }

    pub fn previous(&mut self) -> bool {
        self.jump_relative(-1)
    }

    pub fn first(&mut self) -> bool {
        self.jump_to(0)
    }

    pub fn last(&mut self) -> bool {
        match self.items.len() {
            0 => false,
            len => self.jump_to(len - 1),
        }
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn catalog_of(n: usize) -> ImageCatalog {
        ImageCatalog {
            items: (0..n).map(|i| PathBuf::from(format!("frame_{:06}.png", i))).collect(),
            index: 0,
        }
    }

    #[test]
    fn test_from_directory_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "notes.txt", "c.webp"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let catalog = ImageCatalog::from_directory(dir.path(), &AppConfig::default().image_extensions).unwrap();
        let names: Vec<_> = catalog
            .items()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.png", "c.webp"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = ImageCatalog::from_directory(dir.path(), &AppConfig::default().image_extensions).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.current().is_none());
        assert_eq!(catalog.position(), (0, 0));
        assert!(!catalog.next());
        assert!(!catalog.last());
    }

    #[test]
    fn test_navigation() {
        let mut catalog = catalog_of(25);
        assert!(!catalog.previous());
        assert!(catalog.next());
        assert_eq!(catalog.index(), 1);

        assert!(catalog.jump_relative(100));
        assert_eq!(catalog.index(), 24);
        assert!(!catalog.next());

        assert!(catalog.jump_relative(-10));
        assert_eq!(catalog.position(), (15, 25));

        assert!(catalog.first());
        assert!(!catalog.first());
        assert!(catalog.last());
        assert_eq!(catalog.index(), 24);
    }

    #[test]
    fn test_jump_to_out_of_range() {
        let mut catalog = catalog_of(3);
        assert!(!catalog.jump_to(3));
        assert_eq!(catalog.index(), 0);
        assert!(catalog.jump_to(2));
    }

    #[test]
    fn test_single() {
        let catalog = ImageCatalog::single(PathBuf::from("x.png"));
        assert_eq!(catalog.position(), (1, 1));
        assert_eq!(catalog.current(), Some(&PathBuf::from("x.png")));
    }
}
