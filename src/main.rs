// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Point Annotator
//!
//! Desktop tool for placing foreground/background points on images, plus
//! command line helpers for the segmentation prompt and dataset preparation.

use anyhow::Result;
use clap::{Parser, Subcommand};
use point_annotator::app::AnnotatorApp;
use point_annotator::config::AppConfig;
use point_annotator::dataset::{combine_labels, split_dataset, SplitLayout, COMBINED_DIR};
use point_annotator::io::catalog::ImageCatalog;
use point_annotator::io::serialization::import_by_extension;
use point_annotator::io::store::AnnotationStore;
use point_annotator::models::prompt::SegmentationPrompt;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "point-annotator", version, about = "Point annotation for segmentation prompts")]
struct Cli {
    /// YAML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the annotation window (default)
    Gui {
        /// Directory of images to annotate
        #[arg(long, conflicts_with = "image")]
        dir: Option<PathBuf>,
        /// Single image to annotate
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Print the segmentation prompt for an annotation file
    Prompt {
        #[arg(long)]
        annotations: PathBuf,
        /// Number of foreground points to use
        #[arg(long)]
        fg_points: Option<usize>,
        /// Number of background points to use
        #[arg(long)]
        bg_points: Option<usize>,
    },
    /// Report how many images in a directory have stored annotations
    Status {
        #[arg(long)]
        dir: PathBuf,
    },
    /// Merge per-video `*_yolo_labels` folders into one label folder
    Combine {
        #[arg(long)]
        labels: PathBuf,
        /// Defaults to `<labels>/combined`
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Move label/image pairs into train/val/test folders
    Split {
        #[arg(long)]
        labels: PathBuf,
        #[arg(long)]
        images: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "png")]
        image_ext: String,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Gui { dir: None, image: None }) {
        Command::Gui { dir, image } => run_gui(config, dir, image),
        Command::Prompt {
            annotations,
            fg_points,
            bg_points,
        } => {
            let record = import_by_extension(&annotations)?;
            let prompt = SegmentationPrompt::from_record(
                &record,
                fg_points.unwrap_or(config.prompt.foreground_limit),
                bg_points.unwrap_or(config.prompt.background_limit),
            );
            println!("{}", serde_json::to_string_pretty(&prompt)?);
            Ok(())
        }
        Command::Status { dir } => {
            let catalog = ImageCatalog::from_directory(&dir, &config.image_extensions)?;
            let store = AnnotationStore::new(config.annotations_dir.clone());
            println!(
                "Annotations exist for {}/{} images",
                store.count_existing(catalog.items()),
                catalog.len()
            );
            Ok(())
        }
        Command::Combine { labels, out } => {
            let out = out.unwrap_or_else(|| labels.join(COMBINED_DIR));
            let copied = combine_labels(&labels, &out)?;
            println!("Copied {} label files into {}", copied, out.display());
            Ok(())
        }
        Command::Split {
            labels,
            images,
            out,
            seed,
            image_ext,
        } => {
            let layout = SplitLayout {
                labels_dir: labels,
                images_dir: images,
                output_root: out,
                image_extension: image_ext,
            };
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let summary = split_dataset(&layout, &mut rng)?;
            println!(
                "train: {}, val: {}, test: {}, missing images: {}",
                summary.train, summary.validate, summary.test, summary.missing_images
            );
            Ok(())
        }
    }
}

fn run_gui(config: AppConfig, dir: Option<PathBuf>, image: Option<PathBuf>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Point Annotator"),
        ..Default::default()
    };

    let mut app = AnnotatorApp::new(config);
    if let Some(dir) = dir {
        app.open_directory(&dir);
    } else if let Some(image) = image {
        app.open_image(image);
    }

    // Run the application
    eframe::run_native("Point Annotator", options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
