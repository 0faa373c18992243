use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_THRESHOLD_VALUE;

/// How the binarization level is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// Caller-supplied 8-bit level (`threshold_value`).
    #[default]
    Fixed,
    /// Otsu's method: minimizes intra-class variance on a bimodal histogram.
    Automatic,
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "Fixed"),
            Self::Automatic => write!(f, "Automatic (Otsu)"),
        }
    }
}

/// Configuration for binary segmentation of the contrast-enhanced image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    #[serde(default)]
    pub threshold_mode: ThresholdMode,
    /// Level used in `Fixed` mode. Pixels at or below it become foreground.
    #[serde(default = "default_threshold_value")]
    pub threshold_value: u8,
}

fn default_threshold_value() -> u8 {
    DEFAULT_THRESHOLD_VALUE
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            threshold_mode: ThresholdMode::default(),
            threshold_value: DEFAULT_THRESHOLD_VALUE,
        }
    }
}

impl SegmentationConfig {
    pub fn fixed(threshold_value: u8) -> Self {
        Self {
            threshold_mode: ThresholdMode::Fixed,
            threshold_value,
        }
    }

    pub fn automatic() -> Self {
        Self {
            threshold_mode: ThresholdMode::Automatic,
            ..Default::default()
        }
    }
}
