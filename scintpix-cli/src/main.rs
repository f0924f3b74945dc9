//! scintpix CLI
//!
//! Inspects scintillator record files and training histories.
#![allow(clippy::uninlined_format_args, clippy::cast_precision_loss)]

use clap::{Args, Parser, Subcommand};
use log::debug;
use scintpix_core::{normalize, Dataset, EventLabel, ImageStats};
use scintpix_io::{DecoderConfig, RecordDecoder, TrainingHistory};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    ScintpixIo(#[from] scintpix_io::Error),

    #[error("{0}")]
    Core(#[from] scintpix_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scintillator event record inspector.
#[derive(Parser)]
#[command(name = "scintpix")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the commands that decode a record file.
#[derive(Args)]
struct DecodeArgs {
    /// Input record file (262 whitespace-separated numbers per line)
    input: PathBuf,

    /// Keep a random, label-balanced selection of this many events
    #[arg(short = 'n', long)]
    num_samples: Option<usize>,

    /// Seed for the balanced selection
    #[arg(long)]
    seed: Option<u64>,
}

impl DecodeArgs {
    fn decode(&self) -> Result<Dataset> {
        let config = DecoderConfig {
            num_samples: self.num_samples,
            seed: self.seed,
        };
        let start = Instant::now();
        let dataset = RecordDecoder::new()
            .with_config(config)
            .decode(&self.input)?;
        debug!(
            "decoded {} in {:.2}s",
            self.input.display(),
            start.elapsed().as_secs_f64()
        );
        Ok(dataset)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show event counts and pixel statistics of a record file
    Info {
        #[command(flatten)]
        decode: DecodeArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the global normalization statistics of a record file
    NormalizeStats {
        #[command(flatten)]
        decode: DecodeArgs,
    },

    /// Validate a training history JSON file
    History {
        /// History file with loss, val_loss, accuracy and val_accuracy
        input: PathBuf,
    },
}

#[derive(Serialize)]
struct InfoSummary {
    file: String,
    events: usize,
    singles: usize,
    doubles: usize,
    pixel_stats: Option<PixelStats>,
}

#[derive(Serialize)]
struct PixelStats {
    min: f64,
    max: f64,
    mean: f64,
}

impl From<ImageStats> for PixelStats {
    fn from(stats: ImageStats) -> Self {
        Self {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { decode, json } => {
            let dataset = decode.decode()?;
            let pixel_stats = if dataset.is_empty() {
                None
            } else {
                Some(ImageStats::compute(dataset.images())?.into())
            };
            let summary = InfoSummary {
                file: decode.input.display().to_string(),
                events: dataset.len(),
                singles: dataset.count_label(EventLabel::Single),
                doubles: dataset.count_label(EventLabel::Double),
                pixel_stats,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("File: {}", summary.file);
                println!("Events: {}", summary.events);
                println!("Singles (label 0): {}", summary.singles);
                println!("Doubles (label 1): {}", summary.doubles);
                if let Some(stats) = &summary.pixel_stats {
                    println!("Pixel range: {} - {}", stats.min, stats.max);
                    println!("Pixel mean: {:.6}", stats.mean);
                }
            }
        }

        Commands::NormalizeStats { decode } => {
            let dataset = decode.decode()?;
            let normalized = normalize(dataset.images())?;
            let stats = normalized.stats;
            let out = ImageStats::compute(&normalized.images)?;

            println!("Events: {}", dataset.len());
            println!("Mean: {:.6}", stats.mean);
            println!("Min: {}", stats.min);
            println!("Max: {}", stats.max);
            println!("Range (max - min): {}", stats.range());
            println!("Normalized range: {:.6} - {:.6}", out.min, out.max);
        }

        Commands::History { input } => {
            let history = TrainingHistory::from_json_file(&input)?;
            println!("File: {}", input.display());
            println!("Epochs: {}", history.epochs());
            if let Some((epoch, acc)) = history.best_val_accuracy() {
                println!("Best val_accuracy: {:.4} (epoch {})", acc, epoch + 1);
                println!("val_loss at best: {:.4}", history.val_loss[epoch]);
            }
        }
    }

    Ok(())
}
