use ndarray::Array2;

use crate::consts::{GRAY_LEVELS, MAX_LEVEL};
use crate::frame::Frame;

use super::reflect_101;

/// Parameters for contrast-limited adaptive histogram equalization.
#[derive(Clone, Copy, Debug)]
pub struct ClaheParams {
    /// Histogram clip limit relative to a uniform histogram (2.0 = twice the mean bin).
    pub clip_limit: f32,
    /// Number of tiles along each image side.
    pub tile_grid: usize,
}

/// Apply CLAHE to a frame. The frame is quantized to 8-bit levels first.
pub fn clahe(frame: &Frame, params: &ClaheParams) -> Frame {
    Frame::from_levels(&clahe_levels(&frame.to_levels(), params))
}

/// CLAHE on 8-bit levels.
///
/// The image is split into `tile_grid x tile_grid` tiles (padded by
/// reflection on the bottom/right edge when the size does not divide evenly).
/// Each tile gets a clipped, equalized lookup table; every output pixel
/// bilinearly blends the tables of the four nearest tile centres.
pub fn clahe_levels(levels: &Array2<u8>, params: &ClaheParams) -> Array2<u8> {
    let (h, w) = levels.dim();
    if h == 0 || w == 0 {
        return levels.clone();
    }

    let tiles = params.tile_grid.max(1);
    let tile_h = h.div_ceil(tiles);
    let tile_w = w.div_ceil(tiles);
    let tile_area = tile_h * tile_w;
    let clip = ((params.clip_limit * tile_area as f32 / GRAY_LEVELS as f32) as usize).max(1);
    let lut_scale = MAX_LEVEL / tile_area as f32;

    let mut luts = vec![[0u8; GRAY_LEVELS]; tiles * tiles];
    for ty in 0..tiles {
        for tx in 0..tiles {
            let mut hist = [0usize; GRAY_LEVELS];
            for row in ty * tile_h..(ty + 1) * tile_h {
                let src_row = reflect_101(row as isize, h);
                for col in tx * tile_w..(tx + 1) * tile_w {
                    let src_col = reflect_101(col as isize, w);
                    hist[levels[[src_row, src_col]] as usize] += 1;
                }
            }
            clip_histogram(&mut hist, clip);

            let lut = &mut luts[ty * tiles + tx];
            let mut cdf = 0usize;
            for (level, &count) in hist.iter().enumerate() {
                cdf += count;
                lut[level] = (cdf as f32 * lut_scale).round().min(MAX_LEVEL) as u8;
            }
        }
    }

    let inv_th = 1.0 / tile_h as f32;
    let inv_tw = 1.0 / tile_w as f32;
    let last = tiles as isize - 1;

    Array2::from_shape_fn((h, w), |(row, col)| {
        let (ty1, ty2, ya) = tile_neighbours(row as f32 * inv_th - 0.5, last);
        let (tx1, tx2, xa) = tile_neighbours(col as f32 * inv_tw - 0.5, last);
        let v = levels[[row, col]] as usize;

        let lut = |ty: usize, tx: usize| luts[ty * tiles + tx][v] as f32;
        let top = lut(ty1, tx1) * (1.0 - xa) + lut(ty1, tx2) * xa;
        let bottom = lut(ty2, tx1) * (1.0 - xa) + lut(ty2, tx2) * xa;
        (top * (1.0 - ya) + bottom * ya).round().clamp(0.0, MAX_LEVEL) as u8
    })
}

/// Indices of the two tiles bracketing a fractional tile coordinate and the
/// blend weight of the second one.
fn tile_neighbours(t: f32, last: isize) -> (usize, usize, f32) {
    let lower = t.floor();
    let frac = t - lower;
    let lower = lower as isize;
    let first = lower.clamp(0, last) as usize;
    let second = (lower + 1).clamp(0, last) as usize;
    (first, second, frac)
}

/// Clip every bin to `clip` and spread the excess back over the histogram:
/// an equal share to every bin, then the remainder one count at a time at a
/// regular stride.
fn clip_histogram(hist: &mut [usize; GRAY_LEVELS], clip: usize) {
    let mut excess = 0usize;
    for count in hist.iter_mut() {
        if *count > clip {
            excess += *count - clip;
            *count = clip;
        }
    }

    let batch = excess / GRAY_LEVELS;
    let residual = excess - batch * GRAY_LEVELS;
    for count in hist.iter_mut() {
        *count += batch;
    }

    if residual > 0 {
        let step = (GRAY_LEVELS / residual).max(1);
        for count in hist.iter_mut().step_by(step).take(residual) {
            *count += 1;
        }
    }
}
