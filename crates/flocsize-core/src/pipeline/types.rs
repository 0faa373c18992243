use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::record::ParticleRecord;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug)]
pub enum PipelineStage {
    Scanning,
    Analysing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scanning => write!(f, "Scanning directory"),
            Self::Analysing => write!(f, "Analysing images"),
        }
    }
}

/// Everything measured in one image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// File stem of the image.
    pub source_image: String,
    /// Dimensions after the left-border trim.
    pub width: usize,
    pub height: usize,
    /// 8-bit level the image was segmented at.
    pub threshold: u8,
    /// External contours found before filtering.
    pub candidates_total: usize,
    /// Accepted particles in contour discovery order.
    pub records: Vec<ParticleRecord>,
}

impl ImageAnalysis {
    pub fn particle_count(&self) -> usize {
        self.records.len()
    }
}

/// An image that could not be analysed. The rest of the batch is unaffected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Results of a directory run, in input file order.
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    pub images: Vec<ImageAnalysis>,
    pub failures: Vec<ImageFailure>,
}

impl BatchReport {
    /// All records of the run, image by image.
    pub fn records(&self) -> impl Iterator<Item = &ParticleRecord> {
        self.images.iter().flat_map(|image| image.records.iter())
    }

    pub fn particle_count(&self) -> usize {
        self.images.iter().map(ImageAnalysis::particle_count).sum()
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., image count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
