pub mod debug_sink;
pub mod image_io;
pub mod report;

pub use image_io::{list_images, load_image, load_rgb, source_name};
pub use report::{load_report, write_report, RunReport};
