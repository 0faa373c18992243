pub mod gradient;

pub use gradient::{focus_map, gradient_magnitude_array};
