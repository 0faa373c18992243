use ndarray::Array2;

use crate::consts::GRAY_LEVELS;

use super::config::{SegmentationConfig, ThresholdMode};

/// Resolve the 8-bit binarization level for an image.
pub fn compute_threshold(levels: &Array2<u8>, config: &SegmentationConfig) -> u8 {
    match config.threshold_mode {
        ThresholdMode::Fixed => config.threshold_value,
        ThresholdMode::Automatic => otsu_threshold(levels),
    }
}

/// Inverted binary threshold: a pixel is foreground iff `level <= threshold`.
///
/// Particles are darker than the illuminated background, so inverting the
/// polarity makes them the foreground.
pub fn binarize_inverted(levels: &Array2<u8>, threshold: u8) -> Array2<bool> {
    levels.mapv(|v| v <= threshold)
}

/// Otsu's thresholding: find the level that maximizes between-class variance
/// (equivalently, minimizes intra-class variance).
///
/// Returns the last level of the lower class, so `level > threshold` is the
/// upper class.
pub fn otsu_threshold(levels: &Array2<u8>) -> u8 {
    let mut histogram = [0u64; GRAY_LEVELS];
    for &v in levels.iter() {
        histogram[v as usize] += 1;
    }

    let total = levels.len() as f64;
    let mut sum_all: f64 = 0.0;
    for (i, &count) in histogram.iter().enumerate() {
        sum_all += i as f64 * count as f64;
    }

    let mut weight_bg: f64 = 0.0;
    let mut sum_bg: f64 = 0.0;
    let mut best_variance = 0.0_f64;
    let mut best_bin = 0usize;

    for (i, &count) in histogram.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += i as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let between_variance = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);

        if between_variance > best_variance {
            best_variance = between_variance;
            best_bin = i;
        }
    }

    best_bin as u8
}
