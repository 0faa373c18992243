use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::{MAX_LEVEL, NLM_WEIGHT_THRESHOLD};
use crate::frame::Frame;

use super::reflect_101;

/// Parameters for non-local means denoising.
#[derive(Clone, Copy, Debug)]
pub struct NlMeansParams {
    /// Filter strength in 8-bit grey levels.
    pub strength: f32,
    /// Side of the square patch compared between two pixels (odd).
    pub template_window: usize,
    /// Side of the square area searched for similar patches (odd).
    pub search_window: usize,
}

/// Edge-preserving denoise of a frame with non-local means.
pub fn nl_means_denoise(frame: &Frame, params: &NlMeansParams) -> Frame {
    Frame::new(nl_means_array(&frame.data, params))
}

/// Non-local means on a raw array.
///
/// Every pixel becomes a weighted mean of the pixels in its search window,
/// weighted by `exp(-d / h^2)` where `d` is the mean squared difference of the
/// two surrounding patches. Patch distances for one search offset are taken
/// from an integral image, so the cost is O(search^2 * pixels) regardless of
/// the template size. Offsets are processed in parallel and summed.
pub fn nl_means_array(data: &Array2<f32>, params: &NlMeansParams) -> Array2<f32> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 || params.strength <= 0.0 {
        return data.clone();
    }

    let rt = params.template_window / 2;
    let rs = params.search_window / 2;
    let padded = pad_reflect(data, rt + rs);

    let strength = params.strength as f64 / MAX_LEVEL as f64;
    let window = Window {
        h,
        w,
        rt,
        rs,
        inv_h2: 1.0 / (strength * strength),
        patch_len: ((2 * rt + 1) * (2 * rt + 1)) as f64,
    };

    let radius = rs as isize;
    let offsets: Vec<(isize, isize)> = (-radius..=radius)
        .flat_map(|dy| (-radius..=radius).map(move |dx| (dy, dx)))
        .collect();

    let (weighted, weights) = offsets
        .par_iter()
        .fold(
            || (Array2::<f64>::zeros((h, w)), Array2::<f64>::zeros((h, w))),
            |(mut acc_v, mut acc_w), &offset| {
                accumulate_offset(&padded, &window, offset, &mut acc_v, &mut acc_w);
                (acc_v, acc_w)
            },
        )
        .reduce(
            || (Array2::<f64>::zeros((h, w)), Array2::<f64>::zeros((h, w))),
            |(a_v, a_w), (b_v, b_w)| (a_v + b_v, a_w + b_w),
        );

    // The zero offset always contributes weight 1, so `weights` is never 0.
    ndarray::Zip::from(&weighted)
        .and(&weights)
        .map_collect(|&v, &wt| (v / wt) as f32)
}

struct Window {
    h: usize,
    w: usize,
    rt: usize,
    rs: usize,
    inv_h2: f64,
    patch_len: f64,
}

fn pad_reflect(data: &Array2<f32>, pad: usize) -> Array2<f32> {
    let (h, w) = data.dim();
    let p = pad as isize;
    Array2::from_shape_fn((h + 2 * pad, w + 2 * pad), |(row, col)| {
        data[[
            reflect_101(row as isize - p, h),
            reflect_101(col as isize - p, w),
        ]]
    })
}

fn accumulate_offset(
    padded: &Array2<f32>,
    win: &Window,
    (dy, dx): (isize, isize),
    acc_v: &mut Array2<f64>,
    acc_w: &mut Array2<f64>,
) {
    let span = 2 * win.rt + 1;
    let dh = win.h + 2 * win.rt;
    let dw = win.w + 2 * win.rt;
    let rs = win.rs as isize;

    // Integral image of squared differences between the frame and its shifted copy.
    let mut integral = Array2::<f64>::zeros((dh + 1, dw + 1));
    for y in 0..dh {
        let mut row_sum = 0.0f64;
        for x in 0..dw {
            let a = padded[[y + win.rs, x + win.rs]] as f64;
            let b = padded[[
                (y as isize + rs + dy) as usize,
                (x as isize + rs + dx) as usize,
            ]] as f64;
            row_sum += (a - b) * (a - b);
            integral[[y + 1, x + 1]] = integral[[y, x + 1]] + row_sum;
        }
    }

    let pad = (win.rt + win.rs) as isize;
    for row in 0..win.h {
        for col in 0..win.w {
            let sum = integral[[row + span, col + span]] - integral[[row, col + span]]
                - integral[[row + span, col]]
                + integral[[row, col]];
            let dist = (sum / win.patch_len).max(0.0);
            let weight = (-dist * win.inv_h2).exp();
            if weight < NLM_WEIGHT_THRESHOLD {
                continue;
            }
            let neighbour = padded[[
                (row as isize + pad + dy) as usize,
                (col as isize + pad + dx) as usize,
            ]] as f64;
            acc_v[[row, col]] += weight * neighbour;
            acc_w[[row, col]] += weight;
        }
    }
}
