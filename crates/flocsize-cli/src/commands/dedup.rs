use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use flocsize_core::dedup::{remove_repeats, DedupConfig};
use flocsize_core::io::{load_report, write_report, RunReport};
use tracing::debug;

use crate::summary::print_dedup_summary;

#[derive(Args)]
pub struct DedupArgs {
    /// Run reports, in run order
    #[arg(required = true)]
    pub reports: Vec<PathBuf>,

    /// Maximum center offset (pixels) for two particles to match
    #[arg(long, default_value = "0")]
    pub position_radius: f64,

    /// Maximum contour-area difference (pixels) for two particles to match
    #[arg(long, default_value = "0")]
    pub area_radius: f64,

    /// Removal percentage above which the runs are reported dirty
    #[arg(long, default_value = "5")]
    pub max_percent: f64,

    /// Filtered report path
    #[arg(short, long, default_value = "filtered.json")]
    pub output: PathBuf,
}

pub fn run(args: &DedupArgs) -> Result<()> {
    let config = DedupConfig {
        position_radius: args.position_radius,
        area_radius: args.area_radius,
        max_percent_removed: args.max_percent,
    };
    config.validate().context("Invalid dedup settings")?;

    let mut merged: Option<RunReport> = None;
    for path in &args.reports {
        let report = load_report(path)
            .with_context(|| format!("Failed to read report {}", path.display()))?;
        debug!(report = %path.display(), records = report.records.len(), "Loaded report");
        match merged.as_mut() {
            None => merged = Some(report),
            Some(m) => {
                m.images.extend(report.images);
                m.failures.extend(report.failures);
                m.records.extend(report.records);
            }
        }
    }
    let Some(merged) = merged else {
        bail!("No reports given");
    };
    let records = &merged.records;

    let outcome = remove_repeats(records, &config);
    print_dedup_summary(&outcome, records.len(), &config);

    let filtered = merged.with_records(outcome.kept);
    write_report(&filtered, &args.output)
        .with_context(|| format!("Failed to write report {}", args.output.display()))?;
    println!("\nFiltered report saved to {}", args.output.display());

    Ok(())
}
