use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;
use ndarray::Array2;

/// Outer boundary of one top-level foreground region.
#[derive(Clone, Debug)]
pub struct Contour {
    /// Position among the external contours of the image, in discovery order.
    pub index: usize,
    /// Boundary pixels (x = column, y = row), traced in order.
    pub points: Vec<Point<i32>>,
}

/// Extract external contours from a binary mask.
///
/// Only outer borders of regions that are not nested inside another region's
/// hole are returned; hole borders and anything inside them are discarded.
/// Foreground is 8-connected. Order follows the raster scan that discovered
/// each border.
pub fn external_contours(mask: &Array2<bool>) -> Vec<Contour> {
    let (h, w) = mask.dim();
    if h == 0 || w == 0 {
        return Vec::new();
    }

    let image = GrayImage::from_fn(w as u32, h as u32, |x, y| {
        if mask[[y as usize, x as usize]] {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });

    find_contours::<i32>(&image)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .enumerate()
        .map(|(index, c)| Contour {
            index,
            points: c.points,
        })
        .collect()
}
