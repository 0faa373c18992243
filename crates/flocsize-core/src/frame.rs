use ndarray::{s, Array2};

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R, MAX_LEVEL};

/// A single grayscale micrograph.
/// Pixel values are f32 in [0.0, 1.0].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
}

impl Frame {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    /// Build a frame from 8-bit grey levels.
    pub fn from_levels(levels: &Array2<u8>) -> Self {
        Self::new(levels.mapv(|v| v as f32 / MAX_LEVEL))
    }

    /// Build a frame from an interleaved RGB buffer using BT.601 luminance.
    pub fn from_rgb8(rgb: &image::RgbImage) -> Self {
        let (w, h) = rgb.dimensions();
        let data = Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
            let p = rgb.get_pixel(col as u32, row as u32).0;
            (LUMINANCE_R * p[0] as f32 + LUMINANCE_G * p[1] as f32 + LUMINANCE_B * p[2] as f32)
                / MAX_LEVEL
        });
        Self::new(data)
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Quantize to 8-bit grey levels (rounded, saturated).
    pub fn to_levels(&self) -> Array2<u8> {
        self.data.mapv(to_level)
    }

    /// Drop `columns` columns from the left edge.
    ///
    /// Returns `None` when nothing would remain.
    pub fn trim_left(&self, columns: usize) -> Option<Frame> {
        if columns == 0 {
            return Some(self.clone());
        }
        if columns >= self.width() {
            return None;
        }
        let data = self.data.slice(s![.., columns..]).to_owned();
        Some(Frame::new(data))
    }
}

/// Convert a [0.0, 1.0] intensity to the nearest 8-bit grey level.
pub fn to_level(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * MAX_LEVEL).round() as u8
}
