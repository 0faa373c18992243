pub mod config;
pub mod contours;
pub mod segment;
pub mod threshold;

pub use config::{SegmentationConfig, ThresholdMode};
pub use contours::{external_contours, Contour};
pub use segment::{segment, Segmentation};
