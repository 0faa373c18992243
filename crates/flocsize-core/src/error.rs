use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlocError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FlocError>;
