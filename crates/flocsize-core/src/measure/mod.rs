pub mod candidate;
pub mod ellipsoid;
pub mod geometry;
pub mod rotated_rect;

pub use candidate::{filter_candidates, AcceptanceCriteria, BoundingBox, Candidate, Rejection};
pub use ellipsoid::{estimate_shape_3d, HeightPolicy, HeightSource, Shape3d};
pub use geometry::{measure, Axes, Measurement};
pub use rotated_rect::{min_area_rect, RotatedRect};
