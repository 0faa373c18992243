use serde::{Deserialize, Serialize};

use crate::record::ParticleRecord;

/// Aggregate statistics over a particle population.
///
/// A statistic is `None` when no record carries the underlying value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationSummary {
    pub particle_count: usize,
    pub mean_pixel_area: Option<f64>,
    pub mean_pixel_diameter: Option<f64>,
    pub mean_contour_area: Option<f64>,
    pub mean_contour_diameter: Option<f64>,
    pub mean_minor_axis: Option<f64>,
    pub mean_major_axis: Option<f64>,
    pub mean_aspect_ratio: Option<f64>,
    pub mean_eccentricity: Option<f64>,
    pub max_eccentricity: Option<f64>,
    pub min_pixel_area: Option<usize>,
    pub max_pixel_area: Option<usize>,
    pub sauter_mean_diameter: Option<f64>,
    pub mean_volume: Option<f64>,
    pub mean_sphericity: Option<f64>,
    pub mean_surface_area: Option<f64>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn max(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.reduce(f64::max)
}

pub fn summarize(records: &[ParticleRecord]) -> PopulationSummary {
    let shapes = || records.iter().filter_map(|r| r.shape_3d.as_ref());

    PopulationSummary {
        particle_count: records.len(),
        mean_pixel_area: mean(records.iter().map(|r| r.pixel_area as f64)),
        mean_pixel_diameter: mean(records.iter().map(|r| r.pixel_diameter)),
        mean_contour_area: mean(records.iter().map(|r| r.contour_area)),
        mean_contour_diameter: mean(records.iter().map(|r| r.contour_diameter)),
        mean_minor_axis: mean(records.iter().map(|r| r.minor_axis)),
        mean_major_axis: mean(records.iter().map(|r| r.major_axis)),
        mean_aspect_ratio: mean(records.iter().filter_map(|r| r.aspect_ratio)),
        mean_eccentricity: mean(records.iter().filter_map(|r| r.eccentricity)),
        max_eccentricity: max(records.iter().filter_map(|r| r.eccentricity)),
        min_pixel_area: records.iter().map(|r| r.pixel_area).min(),
        max_pixel_area: records.iter().map(|r| r.pixel_area).max(),
        sauter_mean_diameter: mean(shapes().map(|s| s.sauter_diameter)),
        mean_volume: mean(shapes().map(|s| s.volume)),
        mean_sphericity: mean(shapes().map(|s| s.sphericity)),
        mean_surface_area: mean(shapes().map(|s| s.surface_area)),
    }
}
