use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    DEFAULT_CLAHE_CLIP_LIMIT, DEFAULT_CLAHE_TILE_GRID, DEFAULT_DENOISE_STRENGTH,
    DEFAULT_SEARCH_WINDOW, DEFAULT_SOBEL_SCALE, DEFAULT_TEMPLATE_WINDOW,
};
use crate::filters::{clahe, nl_means_denoise, ClaheParams, NlMeansParams};
use crate::frame::Frame;
use crate::quality::focus_map;

/// Filter parameters for the preprocessing stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Non-local means strength in 8-bit grey levels.
    #[serde(default = "default_denoise_strength")]
    pub denoise_strength: f32,
    /// Non-local means patch size (odd).
    #[serde(default = "default_template_window")]
    pub template_window: usize,
    /// Non-local means search area (odd).
    #[serde(default = "default_search_window")]
    pub search_window: usize,
    /// CLAHE clip limit.
    #[serde(default = "default_clahe_clip_limit")]
    pub clahe_clip_limit: f32,
    /// CLAHE tiles per side.
    #[serde(default = "default_clahe_tile_grid")]
    pub clahe_tile_grid: usize,
    /// Scale applied to the Sobel derivatives of the focus map.
    #[serde(default = "default_sobel_scale")]
    pub sobel_scale: f32,
}

fn default_denoise_strength() -> f32 {
    DEFAULT_DENOISE_STRENGTH
}
fn default_template_window() -> usize {
    DEFAULT_TEMPLATE_WINDOW
}
fn default_search_window() -> usize {
    DEFAULT_SEARCH_WINDOW
}
fn default_clahe_clip_limit() -> f32 {
    DEFAULT_CLAHE_CLIP_LIMIT
}
fn default_clahe_tile_grid() -> usize {
    DEFAULT_CLAHE_TILE_GRID
}
fn default_sobel_scale() -> f32 {
    DEFAULT_SOBEL_SCALE
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            denoise_strength: DEFAULT_DENOISE_STRENGTH,
            template_window: DEFAULT_TEMPLATE_WINDOW,
            search_window: DEFAULT_SEARCH_WINDOW,
            clahe_clip_limit: DEFAULT_CLAHE_CLIP_LIMIT,
            clahe_tile_grid: DEFAULT_CLAHE_TILE_GRID,
            sobel_scale: DEFAULT_SOBEL_SCALE,
        }
    }
}

impl PreprocessConfig {
    pub fn nl_means(&self) -> NlMeansParams {
        NlMeansParams {
            strength: self.denoise_strength,
            template_window: self.template_window,
            search_window: self.search_window,
        }
    }

    pub fn clahe(&self) -> ClaheParams {
        ClaheParams {
            clip_limit: self.clahe_clip_limit,
            tile_grid: self.clahe_tile_grid,
        }
    }
}

/// Every image produced by the preprocessing stage.
///
/// Only `enhanced` and `focus_map` feed the rest of the pipeline; the other
/// images are kept for the debug sink.
#[derive(Clone, Debug)]
pub struct Preprocessed {
    pub gray: Frame,
    pub denoised: Frame,
    /// CLAHE of the raw grayscale image, used for segmentation.
    pub enhanced: Frame,
    /// CLAHE of the denoised image, used for the focus map.
    pub enhanced_denoised: Frame,
    /// Per-pixel sharpness in 8-bit gradient units.
    pub focus_map: Array2<f32>,
}

/// Run the preprocessing stage on a grayscale frame.
///
/// Pipeline: non-local means denoise -> CLAHE (denoised and raw) ->
/// Sobel focus map of the denoised+CLAHE image.
pub fn preprocess(gray: &Frame, config: &PreprocessConfig) -> Preprocessed {
    let denoised = nl_means_denoise(gray, &config.nl_means());
    debug!(
        width = gray.width(),
        height = gray.height(),
        "Denoised frame"
    );

    let clahe_params = config.clahe();
    let enhanced_denoised = clahe(&denoised, &clahe_params);
    let enhanced = clahe(gray, &clahe_params);

    let focus_map = focus_map(&enhanced_denoised, config.sobel_scale);

    Preprocessed {
        gray: gray.clone(),
        denoised,
        enhanced,
        enhanced_denoised,
        focus_map,
    }
}
