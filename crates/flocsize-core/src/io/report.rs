use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pipeline::config::AnalysisConfig;
use crate::pipeline::{BatchReport, ImageAnalysis, ImageFailure};
use crate::record::ParticleRecord;
use crate::summary::{summarize, PopulationSummary};

/// Per-image line of a run report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub source_image: String,
    pub particle_count: usize,
    pub candidates_total: usize,
}

impl From<&ImageAnalysis> for ImageEntry {
    fn from(image: &ImageAnalysis) -> Self {
        Self {
            source_image: image.source_image.clone(),
            particle_count: image.particle_count(),
            candidates_total: image.candidates_total,
        }
    }
}

/// Everything a run produced, as written to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub config: AnalysisConfig,
    #[serde(default)]
    pub images: Vec<ImageEntry>,
    #[serde(default)]
    pub failures: Vec<ImageFailure>,
    pub records: Vec<ParticleRecord>,
    pub summary: PopulationSummary,
}

impl RunReport {
    pub fn from_batch(config: &AnalysisConfig, batch: &BatchReport) -> Self {
        let records: Vec<ParticleRecord> = batch.records().cloned().collect();
        Self {
            config: config.clone(),
            images: batch.images.iter().map(ImageEntry::from).collect(),
            failures: batch.failures.clone(),
            summary: summarize(&records),
            records,
        }
    }

    /// Replace the records and recompute the summary, keeping the rest.
    pub fn with_records(mut self, records: Vec<ParticleRecord>) -> Self {
        self.summary = summarize(&records);
        self.records = records;
        self
    }
}

/// Write a report as pretty-printed JSON.
pub fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn load_report(path: &Path) -> Result<RunReport> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
