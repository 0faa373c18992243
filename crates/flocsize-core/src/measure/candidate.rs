use std::fmt;

use imageproc::point::Point;
use ndarray::{s, Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::detection::Contour;

use super::rotated_rect::{min_area_rect, RotatedRect};

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Tightest box around a point set. `None` for an empty set.
    pub fn from_points(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            x: min_x.max(0) as u32,
            y: min_y.max(0) as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        })
    }

    /// One past the last column.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the last row.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True when at least `margin` background columns/rows separate the box
    /// from every image edge.
    pub fn is_clear_of_border(&self, image_width: u32, image_height: u32, margin: u32) -> bool {
        self.x >= margin
            && self.y >= margin
            && self.right() + margin <= image_width
            && self.bottom() + margin <= image_height
    }

    /// View of `data` restricted to the box.
    pub fn crop<'a, T>(&self, data: &'a Array2<T>) -> ArrayView2<'a, T> {
        let (x, y) = (self.x as usize, self.y as usize);
        data.slice(s![
            y..y + self.height as usize,
            x..x + self.width as usize
        ])
    }
}

/// Thresholds of the acceptance predicate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AcceptanceCriteria {
    pub clarity_threshold: f32,
    pub area_min: usize,
    pub area_max: usize,
    pub edge_margin: u32,
}

/// Why a candidate was dropped. Rejection is normal filtering, not an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rejection {
    OutOfFocus { max_sharpness: f32 },
    TooSmall { pixel_count: usize },
    TooLarge { pixel_count: usize },
    TouchesBorder,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfFocus { max_sharpness } => {
                write!(f, "out of focus (max sharpness {max_sharpness})")
            }
            Self::TooSmall { pixel_count } => write!(f, "too small ({pixel_count} px)"),
            Self::TooLarge { pixel_count } => write!(f, "too large ({pixel_count} px)"),
            Self::TouchesBorder => write!(f, "touches image border"),
        }
    }
}

/// A segmented region with the values the acceptance predicate needs.
#[derive(Clone, Debug)]
pub struct Candidate<'a> {
    pub contour: &'a Contour,
    pub bounding_box: BoundingBox,
    pub rotated_rect: RotatedRect,
    /// Maximum focus-map value inside the bounding box.
    pub max_sharpness: f32,
    /// Foreground pixels of the mask inside the bounding box.
    pub pixel_count: usize,
}

impl<'a> Candidate<'a> {
    /// Crop the focus map and mask to the contour's bounding box and collect
    /// the clarity and area figures. `None` for an empty contour.
    pub fn from_contour(
        contour: &'a Contour,
        focus_map: &Array2<f32>,
        mask: &Array2<bool>,
    ) -> Option<Self> {
        let bounding_box = BoundingBox::from_points(&contour.points)?;
        let max_sharpness = bounding_box
            .crop(focus_map)
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        let pixel_count = bounding_box.crop(mask).iter().filter(|&&v| v).count();

        Some(Self {
            contour,
            bounding_box,
            rotated_rect: min_area_rect(&contour.points),
            max_sharpness,
            pixel_count,
        })
    }

    /// Acceptance predicate: in focus, strictly inside the area bounds, and
    /// clear of the image border.
    pub fn check(
        &self,
        criteria: &AcceptanceCriteria,
        image_width: u32,
        image_height: u32,
    ) -> Result<(), Rejection> {
        if self.max_sharpness <= criteria.clarity_threshold {
            return Err(Rejection::OutOfFocus {
                max_sharpness: self.max_sharpness,
            });
        }
        if self.pixel_count <= criteria.area_min {
            return Err(Rejection::TooSmall {
                pixel_count: self.pixel_count,
            });
        }
        if self.pixel_count >= criteria.area_max {
            return Err(Rejection::TooLarge {
                pixel_count: self.pixel_count,
            });
        }
        if !self
            .bounding_box
            .is_clear_of_border(image_width, image_height, criteria.edge_margin)
        {
            return Err(Rejection::TouchesBorder);
        }
        Ok(())
    }
}

/// Build a candidate per contour and keep the accepted ones, in contour order.
pub fn filter_candidates<'a>(
    contours: &'a [Contour],
    focus_map: &Array2<f32>,
    mask: &Array2<bool>,
    criteria: &AcceptanceCriteria,
) -> Vec<Candidate<'a>> {
    let (h, w) = mask.dim();
    contours
        .iter()
        .filter_map(|contour| Candidate::from_contour(contour, focus_map, mask))
        .filter(|candidate| match candidate.check(criteria, w as u32, h as u32) {
            Ok(()) => true,
            Err(reason) => {
                debug!(contour = candidate.contour.index, %reason, "Rejected candidate");
                false
            }
        })
        .collect()
}
