use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use flocsize_core::detection::ThresholdMode;
use flocsize_core::io::{write_report, RunReport};
use flocsize_core::pipeline::{
    analyse_directory_reported, AnalysisConfig, PipelineStage, ProgressReporter,
};
use indicatif::{ProgressBar, ProgressStyle};

use crate::summary::{print_analysis_summary, print_run_summary};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Directory of micrographs
    pub dir: PathBuf,

    /// Analysis config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Micrometres per pixel
    #[arg(long)]
    pub pixel_scale: Option<f64>,

    /// Focus-map maximum a particle must exceed
    #[arg(long)]
    pub clarity: Option<f32>,

    /// Exclusive lower bound on particle pixel count
    #[arg(long)]
    pub area_min: Option<usize>,

    /// Exclusive upper bound on particle pixel count
    #[arg(long)]
    pub area_max: Option<usize>,

    /// Pick the binarization level automatically (Otsu)
    #[arg(long, conflicts_with = "threshold")]
    pub otsu: bool,

    /// Fixed binarization level (0-255)
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Height applied to every particle, in pixels
    #[arg(long)]
    pub average_height: Option<f64>,

    /// Skip the 3-D estimates unless an average height is given
    #[arg(long)]
    pub no_3d: bool,

    /// Write intermediate images to this directory
    #[arg(long)]
    pub debug_dir: Option<PathBuf>,

    /// Report file path
    #[arg(short, long, default_value = "report.json")]
    pub output: PathBuf,
}

/// Drives an indicatif bar from pipeline progress callbacks.
struct BarReporter {
    pb: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.pb.set_message(stage.to_string());
        self.pb.set_position(0);
        if let Some(total) = total_items {
            self.pb.set_length(total as u64);
        }
    }

    fn advance(&self, items_done: usize) {
        self.pb.set_position(items_done as u64);
    }
}

pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let config = build_config(args)?;
    config.validate().context("Invalid analysis config")?;

    print_analysis_summary(&config, &args.dir);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = BarReporter { pb };

    let batch = analyse_directory_reported(&args.dir, &config, &reporter)
        .with_context(|| format!("Failed to analyse {}", args.dir.display()))?;
    reporter.pb.finish_with_message("Done");

    let report = RunReport::from_batch(&config, &batch);
    write_report(&report, &args.output)
        .with_context(|| format!("Failed to write report {}", args.output.display()))?;

    print_run_summary(&report);
    println!("\nReport saved to {}", args.output.display());

    Ok(())
}

/// Start from the config file (or defaults) and apply command-line overrides.
fn build_config(args: &AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config: AnalysisConfig = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid analysis config")?
    } else {
        AnalysisConfig::default()
    };

    if let Some(scale) = args.pixel_scale {
        config.pixel_scale = scale;
    }
    if let Some(clarity) = args.clarity {
        config.clarity_threshold = clarity;
    }
    if let Some(area_min) = args.area_min {
        config.area_min = area_min;
    }
    if let Some(area_max) = args.area_max {
        config.area_max = area_max;
    }
    if args.otsu {
        config.segmentation.threshold_mode = ThresholdMode::Automatic;
    }
    if let Some(level) = args.threshold {
        config.segmentation.threshold_mode = ThresholdMode::Fixed;
        config.segmentation.threshold_value = level;
    }
    if args.average_height.is_some() {
        config.average_height = args.average_height;
    }
    if args.no_3d {
        config.estimate_height = false;
    }
    if args.debug_dir.is_some() {
        config.debug_dir = args.debug_dir.clone();
    }

    Ok(config)
}
