use anyhow::Context;
use clap::Parser;
use image::{DynamicImage, ImageReader};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Level, error, info, warn};

use ecosort::{Classifier, ClassificationResult, Sorter, WasteCategory};

#[derive(Parser)]
#[command(name = "ecosort")]
#[command(about = "Classify photographed waste items as recyclable or organic")]
struct Cli {
    /// Images to classify
    #[arg(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// Classifier artifact (tar.zst bundle)
    #[arg(short, long, value_name = "FILE")]
    model: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save preprocessing stages to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Flag results below this confidence for human review
    #[arg(long, value_name = "CONFIDENCE")]
    review_below: Option<f32>,

    /// Print one JSON object per image
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    image: &'a Path,
    category: WasteCategory,
    confidence: f32,
    needs_review: bool,
    untrained: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    if let Some(threshold) = args.review_below {
        if !(0.0..=1.0).contains(&threshold) {
            anyhow::bail!("--review-below must be within [0, 1], got {}", threshold);
        }
    }

    // No fallback: without a usable artifact there is nothing meaningful to report
    let classifier = Classifier::load(&args.model)
        .with_context(|| format!("Cannot classify without a classifier artifact ({:?})", args.model))?;
    let sorter = Sorter::new(Arc::new(classifier))?;

    if sorter.is_untrained() {
        warn!("Results come from an untrained placeholder model and must not be relied on");
    }

    let mut failures = 0usize;
    for (i, path) in args.images.iter().enumerate() {
        let debug_dir = args.debug_out.as_deref().map(|dir| debug_dir_for(dir, i, path));

        match classify_file(&sorter, path, debug_dir) {
            Ok(result) => print_result(&args, &sorter, path, &result)?,
            Err(e) => {
                error!("{}: {:#}", path.display(), e);
                failures += 1;
            }
        }
    }

    info!(
        "Classified {} of {} images",
        args.images.len() - failures,
        args.images.len()
    );

    if failures > 0 {
        anyhow::bail!("{} image(s) could not be classified", failures);
    }
    Ok(())
}

fn classify_file(
    sorter: &Sorter,
    path: &Path,
    debug_dir: Option<PathBuf>,
) -> anyhow::Result<ClassificationResult> {
    let debug_sorter;
    let sorter = match debug_dir {
        Some(dir) => {
            debug_sorter = sorter.clone().with_debug(dir)?;
            &debug_sorter
        }
        None => sorter,
    };

    let img = ImageReader::open(path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    Ok(sorter.sort(&rgb)?)
}

fn print_result(
    args: &Cli,
    sorter: &Sorter,
    path: &Path,
    result: &ClassificationResult,
) -> anyhow::Result<()> {
    let needs_review = args
        .review_below
        .is_some_and(|threshold| result.needs_review(threshold));

    if args.json {
        let report = Report {
            image: path,
            category: result.category,
            confidence: result.confidence,
            needs_review,
            untrained: sorter.is_untrained(),
        };
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    let mut line = format!(
        "{}: {} - confidence: {:.2}",
        path.display(),
        result.category.bin_description(),
        result.confidence
    );
    if needs_review {
        line.push_str(" (needs review)");
    }
    if sorter.is_untrained() {
        line.push_str(" [untrained model]");
    }
    println!("{}", line);
    Ok(())
}

/// One debug directory per input, e.g. `03_bottle`
fn debug_dir_for(root: &Path, index: usize, image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    root.join(format!("{:02}_{}", index + 1, stem))
}
