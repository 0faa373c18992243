use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_AREA_MAX, DEFAULT_AREA_MIN, DEFAULT_CLARITY_THRESHOLD, DEFAULT_EDGE_MARGIN,
    DEFAULT_IMAGE_EXTENSIONS, DEFAULT_LEFT_BORDER_TRIM, DEFAULT_PIXEL_SCALE,
};
use crate::detection::SegmentationConfig;
use crate::error::{FlocError, Result};
use crate::measure::{AcceptanceCriteria, HeightPolicy};
use crate::preprocess::PreprocessConfig;

/// Run-wide analysis settings. Built once, validated, then shared read-only
/// by every stage and every worker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Physical length of one pixel (micrometres per pixel).
    #[serde(default = "default_pixel_scale")]
    pub pixel_scale: f64,
    /// Focus-map maximum a particle must exceed.
    #[serde(default = "default_clarity_threshold")]
    pub clarity_threshold: f32,
    /// Exclusive lower bound on foreground pixel count.
    #[serde(default = "default_area_min")]
    pub area_min: usize,
    /// Exclusive upper bound on foreground pixel count.
    #[serde(default = "default_area_max")]
    pub area_max: usize,
    #[serde(flatten)]
    pub segmentation: SegmentationConfig,
    /// Height applied to every particle. Unset means estimate per particle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_height: Option<f64>,
    /// Estimate a height per particle when `average_height` is unset.
    #[serde(default = "default_true")]
    pub estimate_height: bool,
    #[serde(default = "default_edge_margin")]
    pub edge_margin: u32,
    #[serde(default = "default_left_border_trim")]
    pub left_border_trim: u32,
    /// File extensions picked up when scanning a directory (case-insensitive).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(flatten)]
    pub preprocess: PreprocessConfig,
    /// Write intermediate images here when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_dir: Option<PathBuf>,
}

fn default_pixel_scale() -> f64 {
    DEFAULT_PIXEL_SCALE
}
fn default_clarity_threshold() -> f32 {
    DEFAULT_CLARITY_THRESHOLD
}
fn default_area_min() -> usize {
    DEFAULT_AREA_MIN
}
fn default_area_max() -> usize {
    DEFAULT_AREA_MAX
}
fn default_true() -> bool {
    true
}
fn default_edge_margin() -> u32 {
    DEFAULT_EDGE_MARGIN
}
fn default_left_border_trim() -> u32 {
    DEFAULT_LEFT_BORDER_TRIM
}
fn default_extensions() -> Vec<String> {
    DEFAULT_IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pixel_scale: DEFAULT_PIXEL_SCALE,
            clarity_threshold: DEFAULT_CLARITY_THRESHOLD,
            area_min: DEFAULT_AREA_MIN,
            area_max: DEFAULT_AREA_MAX,
            segmentation: SegmentationConfig::default(),
            average_height: None,
            estimate_height: true,
            edge_margin: DEFAULT_EDGE_MARGIN,
            left_border_trim: DEFAULT_LEFT_BORDER_TRIM,
            extensions: default_extensions(),
            preprocess: PreprocessConfig::default(),
            debug_dir: None,
        }
    }
}

fn invalid(message: impl Into<String>) -> FlocError {
    FlocError::InvalidConfig(message.into())
}

impl AnalysisConfig {
    /// Reject settings no image could be analysed with.
    pub fn validate(&self) -> Result<()> {
        if !(self.pixel_scale.is_finite() && self.pixel_scale > 0.0) {
            return Err(invalid(format!(
                "pixel_scale must be positive, got {}",
                self.pixel_scale
            )));
        }
        if !(self.clarity_threshold.is_finite() && self.clarity_threshold >= 0.0) {
            return Err(invalid(format!(
                "clarity_threshold must not be negative, got {}",
                self.clarity_threshold
            )));
        }
        if self.area_min == 0 {
            return Err(invalid("area_min must be positive"));
        }
        // Strict bounds on both sides: at least one count must fit between them.
        if self.area_max <= self.area_min.saturating_add(1) {
            return Err(invalid(format!(
                "area bounds ({}, {}) admit no particle",
                self.area_min, self.area_max
            )));
        }
        if let Some(height) = self.average_height {
            if !(height.is_finite() && height > 0.0) {
                return Err(invalid(format!(
                    "average_height must be positive, got {height}"
                )));
            }
        }
        if self.edge_margin == 0 {
            return Err(invalid("edge_margin must be at least 1"));
        }
        if self.extensions.is_empty() {
            return Err(invalid("extensions must not be empty"));
        }

        let pre = &self.preprocess;
        if !(pre.denoise_strength.is_finite() && pre.denoise_strength > 0.0) {
            return Err(invalid(format!(
                "denoise_strength must be positive, got {}",
                pre.denoise_strength
            )));
        }
        for (name, size) in [
            ("template_window", pre.template_window),
            ("search_window", pre.search_window),
        ] {
            if size == 0 || size % 2 == 0 {
                return Err(invalid(format!("{name} must be odd, got {size}")));
            }
        }
        if !(pre.clahe_clip_limit.is_finite() && pre.clahe_clip_limit > 0.0) {
            return Err(invalid(format!(
                "clahe_clip_limit must be positive, got {}",
                pre.clahe_clip_limit
            )));
        }
        if pre.clahe_tile_grid == 0 {
            return Err(invalid("clahe_tile_grid must be at least 1"));
        }
        if !(pre.sobel_scale.is_finite() && pre.sobel_scale > 0.0) {
            return Err(invalid(format!(
                "sobel_scale must be positive, got {}",
                pre.sobel_scale
            )));
        }
        Ok(())
    }

    /// Where particle heights come from for this run.
    pub fn height_policy(&self) -> HeightPolicy {
        match self.average_height {
            Some(height) => HeightPolicy::Average(height),
            None if self.estimate_height => HeightPolicy::EstimatePerParticle,
            None => HeightPolicy::Disabled,
        }
    }

    pub fn acceptance_criteria(&self) -> AcceptanceCriteria {
        AcceptanceCriteria {
            clarity_threshold: self.clarity_threshold,
            area_min: self.area_min,
            area_max: self.area_max,
            edge_margin: self.edge_margin,
        }
    }
}
