use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Luma, RgbImage};
use ndarray::Array2;

use crate::consts::MAX_LEVEL;
use crate::error::{FlocError, Result};
use crate::frame::{to_level, Frame};

/// Load any raster format the `image` crate decodes as 8-bit RGB.
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    Ok(image::open(path)?.to_rgb8())
}

/// Load an image file into a grayscale Frame (BT.601 luminance).
pub fn load_image(path: &Path) -> Result<Frame> {
    Ok(Frame::from_rgb8(&load_rgb(path)?))
}

/// Drop `columns` columns from the left edge of an RGB image.
pub fn trim_left_rgb(image: &RgbImage, columns: u32) -> Result<RgbImage> {
    let (w, h) = image.dimensions();
    if columns >= w {
        return Err(FlocError::InvalidDimensions {
            width: w as usize,
            height: h as usize,
        });
    }
    Ok(image::imageops::crop_imm(image, columns, 0, w - columns, h).to_image())
}

/// List the image files of `dir` whose extension matches one of
/// `extensions` (case-insensitive), sorted by file name.
/// Sub-directories are not descended into.
pub fn list_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(FlocError::NotADirectory(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if has_extension(&path, extensions) {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

/// True when the extension of `path` is one of `extensions`, ignoring case.
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Identifier of an image in the records: its file stem.
pub fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn gray_image(levels: &Array2<u8>) -> GrayImage {
    let (h, w) = levels.dim();
    GrayImage::from_fn(w as u32, h as u32, |col, row| {
        Luma([levels[[row as usize, col as usize]]])
    })
}

/// Save a frame as 8-bit grayscale PNG.
pub fn save_png(frame: &Frame, path: &Path) -> Result<()> {
    save_levels_png(&frame.to_levels(), path)
}

/// Save 8-bit levels as grayscale PNG.
pub fn save_levels_png(levels: &Array2<u8>, path: &Path) -> Result<()> {
    gray_image(levels).save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a binary mask as PNG, foreground white.
pub fn save_mask_png(mask: &Array2<bool>, path: &Path) -> Result<()> {
    save_levels_png(&mask.mapv(|v| if v { u8::MAX } else { 0 }), path)
}

/// Save a focus map (8-bit gradient units) as grayscale PNG.
pub fn save_focus_png(focus: &Array2<f32>, path: &Path) -> Result<()> {
    save_levels_png(&focus.mapv(|v| to_level(v / MAX_LEVEL)), path)
}

/// Grayscale frame replicated into three channels, for drawing overlays.
pub fn frame_to_rgb(frame: &Frame) -> RgbImage {
    let levels = frame.to_levels();
    let (h, w) = levels.dim();
    RgbImage::from_fn(w as u32, h as u32, |col, row| {
        let v = levels[[row as usize, col as usize]];
        image::Rgb([v, v, v])
    })
}
