// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Dataset preparation for detector training.
//!
//! Per-video label directories are first combined into one flat directory,
//! then each label file is moved together with the image of the same stem
//! into `<out>/labels/<split>` and `<out>/images/<split>`.

use anyhow::{Context, Result};
use rand::Rng;
use std::path::{Path, PathBuf};

const TRAIN_CUTOFF: f64 = 0.7;
const VALIDATE_CUTOFF: f64 = 0.9;
const LABEL_DIR_SUFFIX: &str = "_yolo_labels";
pub const COMBINED_DIR: &str = "combined";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Validate,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Validate, Split::Test];

    /// Map a uniform sample in `[0, 1)` onto a split (70/20/10).
    pub fn from_sample(r: f64) -> Self {
        if r < TRAIN_CUTOFF {
            Split::Train
        } else if r < VALIDATE_CUTOFF {
            Split::Validate
        } else {
            Split::Test
        }
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Validate => "val",
            Split::Test => "test",
        }
    }
}

/// Where to read from and write to.
#[derive(Debug, Clone)]
pub struct SplitLayout {
    pub labels_dir: PathBuf,
    pub images_dir: PathBuf,
    pub output_root: PathBuf,
    pub image_extension: String,
}

impl SplitLayout {
    fn labels_out(&self, split: Split) -> PathBuf {
        self.output_root.join("labels").join(split.dir_name())
    }

    fn images_out(&self, split: Split) -> PathBuf {
        self.output_root.join("images").join(split.dir_name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    pub train: usize,
    pub validate: usize,
    pub test: usize,
    pub missing_images: usize,
}

impl SplitSummary {
    fn record(&mut self, split: Split) {
        match split {
            Split::Train => self.train += 1,
            Split::Validate => self.validate += 1,
            Split::Test => self.test += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.train + self.validate + self.test
    }
}

fn is_label_file(path: &Path) -> bool {
    let is_label = path.extension().and_then(|e| e.to_str()) == Some("txt");
    let is_class_list = path.file_name().and_then(|n| n.to_str()) == Some("classes.txt");
    path.is_file() && is_label && !is_class_list
}

/// Name a label gets in the combined directory.
///
/// Labels already named after their source video (`IMG_...`) keep their
/// name; others are prefixed with the video name taken from the directory
/// (`<video>_yolo_labels`).
pub fn combined_name(dir_name: &str, file_name: &str) -> String {
    if file_name.contains("IMG") {
        file_name.to_string()
    } else {
        let prefix = dir_name.strip_suffix(LABEL_DIR_SUFFIX).unwrap_or(dir_name);
        format!("{}{}", prefix, file_name)
    }
}

/// Copy the labels of every per-video directory under `label_root` into
/// `output`. Returns the number of files copied.
pub fn combine_labels(label_root: &Path, output: &Path) -> Result<usize> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(label_root)
        .with_context(|| format!("Failed to read directory {}", label_root.display()))?
    {
        let path = entry?.path();
        if path.is_dir() && path != output && path.file_name().and_then(|n| n.to_str()) != Some(COMBINED_DIR) {
            dirs.push(path);
        }
    }
    dirs.sort();

    let mut copied = 0;
    for dir in dirs {
        let dir_name = dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let mut labels: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        labels.retain(|path| is_label_file(path));
        labels.sort();

        for label in labels {
            let file_name = label.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            let target = output.join(combined_name(&dir_name, &file_name));
            std::fs::copy(&label, &target)
                .with_context(|| format!("Failed to copy {} to {}", label.display(), target.display()))?;
            log::debug!("Copied {} -> {}", label.display(), target.display());
            copied += 1;
        }
    }

    log::info!("Combined {} label files into {}", copied, output.display());
    Ok(copied)
}

/// Label files eligible for splitting, sorted so a seeded run is repeatable.
pub fn label_files(labels_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(labels_dir)
        .with_context(|| format!("Failed to read directory {}", labels_dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if is_label_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Move every label/image pair into a randomly chosen split.
pub fn split_dataset<R: Rng>(layout: &SplitLayout, rng: &mut R) -> Result<SplitSummary> {
    for split in Split::ALL {
        std::fs::create_dir_all(layout.labels_out(split))?;
        std::fs::create_dir_all(layout.images_out(split))?;
    }

    let mut summary = SplitSummary::default();
    for label in label_files(&layout.labels_dir)? {
        let split = Split::from_sample(rng.gen::<f64>());
        move_into(&label, &layout.labels_out(split))?;

        let stem = label.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let image = layout
            .images_dir
            .join(format!("{}.{}", stem, layout.image_extension));
        if image.is_file() {
            move_into(&image, &layout.images_out(split))?;
        } else {
            log::warn!("No image {} for label {}", image.display(), label.display());
            summary.missing_images += 1;
        }

        summary.record(split);
    }

    log::info!(
        "Split {} pairs: {} train, {} val, {} test",
        summary.total(),
        summary.train,
        summary.validate,
        summary.test
    );
    Ok(summary)
}

fn move_into(file: &Path, dir: &Path) -> Result<()> {
    let name = file
        .file_name()
        .with_context(|| format!("{} has no file name", file.display()))?;
    let target = dir.join(name);
    if std::fs::rename(file, &target).is_err() {
        // rename fails across filesystems
        std::fs::copy(file, &target)
            .with_context(|| format!("Failed to copy {} to {}", file.display(), target.display()))?;
        std::fs::remove_file(file)?;
    }
    log::debug!("Moved {} -> {}", file.display(), target.display());
    Ok(())
}
