use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use ndarray::Array2;

use crate::error::Result;
use crate::preprocess::Preprocessed;
use crate::record::ParticleRecord;

use super::image_io::{save_focus_png, save_mask_png, save_png};

const RECT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Intermediate images of one analysed image.
pub struct DebugImages<'a> {
    pub source_image: &'a str,
    /// Trimmed original the overlays are drawn on.
    pub background: RgbImage,
    pub preprocessed: &'a Preprocessed,
    pub mask: &'a Array2<bool>,
    pub records: &'a [ParticleRecord],
}

/// Write every intermediate image and one mask crop per accepted particle.
pub fn write_debug_images(dir: &Path, images: DebugImages<'_>) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let name = images.source_image;
    let path = |suffix: &str| dir.join(format!("{name}{suffix}.png"));
    let pre = images.preprocessed;

    save_png(&pre.gray, &path("_1_gray"))?;
    save_png(&pre.denoised, &path("_2_denoised"))?;
    save_png(&pre.enhanced, &path("_3_clahe"))?;
    save_png(&pre.enhanced_denoised, &path("_4_clahe_denoised"))?;
    save_focus_png(&pre.focus_map, &path("_5_focus"))?;
    save_mask_png(images.mask, &path("_6_binary"))?;

    let annotated = annotate(images.background, images.records);
    annotated.save_with_format(path("_7_annotated"), image::ImageFormat::Png)?;

    let crops = dir.join("crops");
    std::fs::create_dir_all(&crops)?;
    for record in images.records {
        let crop = record.bounding_box.crop(images.mask).to_owned();
        let file = crops.join(format!("{name}_{}.png", record.discovery_index));
        save_mask_png(&crop, &file)?;
    }
    Ok(())
}

/// Draw each particle's rotated rectangle and bounding box.
pub fn annotate(mut canvas: RgbImage, records: &[ParticleRecord]) -> RgbImage {
    for record in records {
        let bb = record.bounding_box;
        draw_hollow_rect_mut(
            &mut canvas,
            Rect::at(bb.x as i32, bb.y as i32).of_size(bb.width.max(1), bb.height.max(1)),
            BOX_COLOR,
        );

        let corners = record.rotated_rect.corners();
        for i in 0..corners.len() {
            let (x0, y0) = corners[i];
            let (x1, y1) = corners[(i + 1) % corners.len()];
            draw_line_segment_mut(
                &mut canvas,
                (x0 as f32, y0 as f32),
                (x1 as f32, y1 as f32),
                RECT_COLOR,
            );
        }
    }
    canvas
}
