pub mod config;
mod orchestrator;
mod types;

pub use config::AnalysisConfig;
pub use orchestrator::{
    analyse_directory, analyse_directory_reported, analyse_frame, analyse_image,
};
pub use types::{
    BatchReport, ImageAnalysis, ImageFailure, NoOpReporter, PipelineStage, ProgressReporter,
};
