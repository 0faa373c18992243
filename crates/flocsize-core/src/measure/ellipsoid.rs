use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::THOMSEN_EXPONENT;

use super::geometry::Axes;

/// Where the height of a particle came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightSource {
    /// The run-wide average height from the configuration.
    Configured,
    /// Per-particle estimate from the planar axes.
    Estimated,
}

impl fmt::Display for HeightSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configured => write!(f, "Configured"),
            Self::Estimated => write!(f, "Estimated"),
        }
    }
}

/// How the third dimension is obtained for every particle of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeightPolicy {
    /// Same height for every particle.
    Average(f64),
    /// `(major + minor) / 2` per particle.
    EstimatePerParticle,
    /// No 3-D descriptors.
    Disabled,
}

impl HeightPolicy {
    pub fn height_for(&self, axes: &Axes) -> Option<(f64, HeightSource)> {
        match *self {
            Self::Average(h) => Some((h, HeightSource::Configured)),
            Self::EstimatePerParticle => Some((estimate_height(axes), HeightSource::Estimated)),
            Self::Disabled => None,
        }
    }
}

/// Height estimate when none is configured: mean of the planar axes.
pub fn estimate_height(axes: &Axes) -> f64 {
    (axes.major + axes.minor) / 2.0
}

/// Tri-axial ellipsoid given by its semi-axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Ellipsoid {
    pub fn from_axes(axes: &Axes, height: f64) -> Self {
        Self {
            a: axes.major / 2.0,
            b: axes.minor / 2.0,
            c: height / 2.0,
        }
    }

    /// Knud Thomsen approximation (p = 1.6, relative error about 1%):
    /// `4 pi ((a^p b^p + a^p c^p + b^p c^p) / 3)^(1/p)`.
    pub fn surface_area(&self) -> f64 {
        let p = THOMSEN_EXPONENT;
        let mean = ((self.a * self.b).powf(p) + (self.a * self.c).powf(p)
            + (self.b * self.c).powf(p))
            / 3.0;
        4.0 * PI * mean.powf(1.0 / p)
    }

    pub fn volume(&self) -> f64 {
        4.0 / 3.0 * PI * self.a * self.b * self.c
    }
}

/// Diameter of the sphere with the same surface area.
pub fn sauter_diameter(surface_area: f64) -> f64 {
    (surface_area / PI).sqrt()
}

/// Surface area of the volume-equivalent sphere over the actual surface area.
pub fn sphericity(surface_area: f64, volume: f64) -> f64 {
    let radius = (3.0 * volume / (4.0 * PI)).cbrt();
    4.0 * PI * radius * radius / surface_area
}

/// Height-dependent descriptors of a particle modelled as an ellipsoid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape3d {
    pub height: f64,
    pub height_source: HeightSource,
    pub surface_area: f64,
    pub volume: f64,
    pub sauter_diameter: f64,
    pub sphericity: f64,
}

/// Compute the 3-D descriptors, or `None` when the policy gives no height or
/// the ellipsoid has no surface.
pub fn estimate_shape_3d(axes: &Axes, policy: &HeightPolicy) -> Option<Shape3d> {
    let (height, height_source) = policy.height_for(axes)?;
    let ellipsoid = Ellipsoid::from_axes(axes, height);
    let surface_area = ellipsoid.surface_area();
    if !(surface_area > 0.0) {
        return None;
    }
    let volume = ellipsoid.volume();

    Some(Shape3d {
        height,
        height_source,
        surface_area,
        volume,
        sauter_diameter: sauter_diameter(surface_area),
        sphericity: sphericity(surface_area, volume),
    })
}
