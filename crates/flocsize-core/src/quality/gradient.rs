use ndarray::Array2;

use crate::consts::MAX_LEVEL;
use crate::filters::reflect_101;
use crate::frame::{to_level, Frame};

/// Compute the focus-quality map of a frame.
///
/// Each value is the Sobel gradient magnitude of the 8-bit image, with both
/// derivatives multiplied by `scale`, saturated and truncated to [0, 255].
/// Sharp particle edges give high values; defocused blobs stay low.
pub fn focus_map(frame: &Frame, scale: f32) -> Array2<f32> {
    let levels = frame.data.mapv(|v| to_level(v) as f32);
    gradient_magnitude_array(&levels, scale)
        .mapv(|m| m.clamp(0.0, MAX_LEVEL).floor())
}

/// Compute the scaled Sobel gradient magnitude of an array.
///
/// Sobel kernels:
///   Gx = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]]
///   Gy = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]]
///
/// Borders are handled by reflection, so the output has no dead frame.
pub fn gradient_magnitude_array(data: &Array2<f32>, scale: f32) -> Array2<f32> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return Array2::zeros((h, w));
    }
    let scale = scale as f64;

    Array2::from_shape_fn((h, w), |(row, col)| {
        let px = |dr: isize, dc: isize| {
            data[[
                reflect_101(row as isize + dr, h),
                reflect_101(col as isize + dc, w),
            ]] as f64
        };

        let gx = -px(-1, -1) + px(-1, 1) - 2.0 * px(0, -1) + 2.0 * px(0, 1) - px(1, -1)
            + px(1, 1);
        let gy = -px(-1, -1) - 2.0 * px(-1, 0) - px(-1, 1)
            + px(1, -1)
            + 2.0 * px(1, 0)
            + px(1, 1);

        ((gx * scale).powi(2) + (gy * scale).powi(2)).sqrt() as f32
    })
}
