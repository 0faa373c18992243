use serde::{Deserialize, Serialize};

use crate::measure::{BoundingBox, Candidate, Measurement, RotatedRect, Shape3d};

/// One accepted particle with every derived measurement attached.
///
/// `(source_image, discovery_index)` identifies the particle; records never
/// rely on positional alignment with other collections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    pub source_image: String,
    pub discovery_index: usize,
    pub bounding_box: BoundingBox,
    pub rotated_rect: RotatedRect,
    pub pixel_area: usize,
    pub contour_area: f64,
    pub pixel_diameter: f64,
    pub contour_diameter: f64,
    pub major_axis: f64,
    pub minor_axis: f64,
    pub aspect_ratio: Option<f64>,
    pub eccentricity: Option<f64>,
    #[serde(default)]
    pub degenerate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_3d: Option<Shape3d>,
}

impl ParticleRecord {
    pub fn new(
        source_image: &str,
        candidate: &Candidate<'_>,
        measurement: &Measurement,
        shape_3d: Option<Shape3d>,
    ) -> Self {
        Self {
            source_image: source_image.to_string(),
            discovery_index: candidate.contour.index,
            bounding_box: candidate.bounding_box,
            rotated_rect: candidate.rotated_rect,
            pixel_area: measurement.pixel_area,
            contour_area: measurement.contour_area,
            pixel_diameter: measurement.pixel_diameter,
            contour_diameter: measurement.contour_diameter,
            major_axis: measurement.axes.major,
            minor_axis: measurement.axes.minor,
            aspect_ratio: measurement.aspect_ratio,
            eccentricity: measurement.eccentricity,
            degenerate: measurement.is_degenerate(),
            shape_3d,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.rotated_rect.center_x, self.rotated_rect.center_y)
    }
}
