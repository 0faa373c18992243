use std::f64::consts::PI;

use imageproc::geometry::contour_area;

use super::candidate::Candidate;
use super::rotated_rect::RotatedRect;

/// Diameter of the circle with the given area, scaled to physical units:
/// `scale * sqrt(4 * area / pi)`.
pub fn equivalent_diameter(area: f64, pixel_scale: f64) -> f64 {
    pixel_scale * (4.0 * area / PI).sqrt()
}

/// Side lengths of the rotated rectangle, ordered so `major >= minor`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Axes {
    pub major: f64,
    pub minor: f64,
}

impl Axes {
    pub fn new(a: f64, b: f64) -> Self {
        if a >= b {
            Self { major: a, minor: b }
        } else {
            Self { major: b, minor: a }
        }
    }

    /// The rectangle fit gives no guarantee on side order, so sort here.
    pub fn from_rect(rect: &RotatedRect) -> Self {
        Self::new(rect.size_a, rect.size_b)
    }

    /// A rectangle with a zero-length side has no meaningful shape ratios.
    pub fn is_degenerate(&self) -> bool {
        self.minor <= 0.0
    }

    /// `minor / major`, in (0, 1].
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_degenerate() {
            return None;
        }
        Some(self.minor / self.major)
    }

    /// Eccentricity of the inscribed ellipse, `sqrt(1 - (minor/major)^2)`, in [0, 1).
    pub fn eccentricity(&self) -> Option<f64> {
        let ratio = self.aspect_ratio()?;
        Some((1.0 - ratio * ratio).max(0.0).sqrt())
    }
}

/// Planar measurements of one accepted candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub pixel_area: usize,
    pub contour_area: f64,
    pub pixel_diameter: f64,
    pub contour_diameter: f64,
    pub axes: Axes,
    pub aspect_ratio: Option<f64>,
    pub eccentricity: Option<f64>,
}

impl Measurement {
    pub fn is_degenerate(&self) -> bool {
        self.axes.is_degenerate()
    }
}

/// Derive areas, diameters and axis-based shape descriptors for a candidate.
///
/// The contour area runs through pixel centres, so a filled `s x s` square
/// encloses `(s - 1)^2`.
pub fn measure(candidate: &Candidate<'_>, pixel_scale: f64) -> Measurement {
    let contour_area = contour_area(&candidate.contour.points);
    let pixel_area = candidate.pixel_count;
    let axes = Axes::from_rect(&candidate.rotated_rect);

    Measurement {
        pixel_area,
        contour_area,
        pixel_diameter: equivalent_diameter(pixel_area as f64, pixel_scale),
        contour_diameter: equivalent_diameter(contour_area, pixel_scale),
        axes,
        aspect_ratio: axes.aspect_ratio(),
        eccentricity: axes.eccentricity(),
    }
}
