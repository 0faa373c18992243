use ndarray::Array2;
use tracing::debug;

use crate::frame::Frame;

use super::config::SegmentationConfig;
use super::contours::{external_contours, Contour};
use super::threshold::{binarize_inverted, compute_threshold};

/// Output of the segmentation stage.
#[derive(Clone, Debug)]
pub struct Segmentation {
    /// 8-bit level the image was split at.
    pub threshold: u8,
    /// Foreground (particle) mask, shape = (height, width).
    pub mask: Array2<bool>,
    /// External contours in discovery order.
    pub contours: Vec<Contour>,
}

/// Binarize the contrast-enhanced frame and trace particle outlines.
pub fn segment(enhanced: &Frame, config: &SegmentationConfig) -> Segmentation {
    let levels = enhanced.to_levels();
    let threshold = compute_threshold(&levels, config);
    let mask = binarize_inverted(&levels, threshold);
    let contours = external_contours(&mask);

    debug!(
        threshold,
        mode = %config.threshold_mode,
        contours = contours.len(),
        "Segmented frame"
    );

    Segmentation {
        threshold,
        mask,
        contours,
    }
}
