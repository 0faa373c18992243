#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use ndarray::Array2;

use flocsize_core::frame::Frame;
use flocsize_core::measure::{BoundingBox, RotatedRect};
use flocsize_core::pipeline::AnalysisConfig;
use flocsize_core::record::ParticleRecord;

/// Illuminated background level of the synthetic micrographs.
pub const BACKGROUND: u8 = 200;

/// Level of the dark synthetic particles.
pub const PARTICLE: u8 = 30;

/// Uniform 8-bit image.
pub fn blank_levels(h: usize, w: usize, level: u8) -> Array2<u8> {
    Array2::from_elem((h, w), level)
}

/// Fill an axis-aligned square with its top-left corner at (x, y).
pub fn fill_square(levels: &mut Array2<u8>, x: usize, y: usize, side: usize, level: u8) {
    for row in y..y + side {
        for col in x..x + side {
            levels[[row, col]] = level;
        }
    }
}

/// Fill every pixel within `radius` of (cx, cy).
pub fn fill_disk(levels: &mut Array2<u8>, cx: usize, cy: usize, radius: usize, level: u8) {
    let r2 = (radius * radius) as isize;
    for row in cy - radius..=cy + radius {
        for col in cx - radius..=cx + radius {
            let (dy, dx) = (row as isize - cy as isize, col as isize - cx as isize);
            if dx * dx + dy * dy <= r2 {
                levels[[row, col]] = level;
            }
        }
    }
}

/// Number of pixels `fill_disk` sets for a radius.
pub fn disk_pixel_count(radius: usize) -> usize {
    let r = radius as isize;
    let mut count = 0;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                count += 1;
            }
        }
    }
    count
}

/// Boolean mask with the same shapes, foreground where `levels` is dark.
pub fn mask_of(levels: &Array2<u8>) -> Array2<bool> {
    levels.mapv(|v| v < BACKGROUND)
}

pub fn frame_of(levels: &Array2<u8>) -> Frame {
    Frame::from_levels(levels)
}

/// Micrograph with two squares and one disk, well inside the borders.
pub fn three_particle_levels() -> Array2<u8> {
    let mut levels = blank_levels(96, 128, BACKGROUND);
    fill_square(&mut levels, 10, 10, 12, PARTICLE);
    fill_square(&mut levels, 80, 20, 8, PARTICLE);
    fill_disk(&mut levels, 50, 64, 10, PARTICLE);
    levels
}

/// Defaults, except nothing is trimmed from the left edge.
pub fn untrimmed_config() -> AnalysisConfig {
    AnalysisConfig {
        left_border_trim: 0,
        ..Default::default()
    }
}

/// Write 8-bit levels as a grey RGB PNG.
pub fn write_png(dir: &Path, name: &str, levels: &Array2<u8>) -> PathBuf {
    let (h, w) = levels.dim();
    let image = RgbImage::from_fn(w as u32, h as u32, |col, row| {
        let v = levels[[row as usize, col as usize]];
        Rgb([v, v, v])
    });
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

/// Minimal record for dedup and summary tests.
pub fn record(source: &str, x: f64, y: f64, contour_area: f64) -> ParticleRecord {
    let side = contour_area.sqrt();
    ParticleRecord {
        source_image: source.to_string(),
        discovery_index: 0,
        bounding_box: BoundingBox {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        },
        rotated_rect: RotatedRect {
            center_x: x,
            center_y: y,
            size_a: side,
            size_b: side,
            angle: 0.0,
        },
        pixel_area: contour_area.round() as usize,
        contour_area,
        pixel_diameter: 0.0,
        contour_diameter: 0.0,
        major_axis: side,
        minor_axis: side,
        aspect_ratio: Some(1.0),
        eccentricity: Some(0.0),
        degenerate: false,
        shape_3d: None,
    }
}
