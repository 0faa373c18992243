use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::RgbImage;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::detection::segment;
use crate::error::{FlocError, Result};
use crate::frame::Frame;
use crate::io::debug_sink::{write_debug_images, DebugImages};
use crate::io::image_io::{frame_to_rgb, list_images, load_rgb, source_name, trim_left_rgb};
use crate::measure::{estimate_shape_3d, filter_candidates, measure};
use crate::preprocess::preprocess;
use crate::record::ParticleRecord;

use super::config::AnalysisConfig;
use super::types::{
    BatchReport, ImageAnalysis, ImageFailure, NoOpReporter, PipelineStage, ProgressReporter,
};

/// Analyse a grayscale frame that still carries its left artefact strip.
pub fn analyse_frame(
    frame: &Frame,
    source_image: &str,
    config: &AnalysisConfig,
) -> Result<ImageAnalysis> {
    let trimmed = frame
        .trim_left(config.left_border_trim as usize)
        .ok_or(FlocError::InvalidDimensions {
            width: frame.width(),
            height: frame.height(),
        })?;
    analyse_trimmed(&trimmed, None, source_image, config)
}

/// Load, trim and analyse one image file.
pub fn analyse_image(path: &Path, config: &AnalysisConfig) -> Result<ImageAnalysis> {
    let rgb = trim_left_rgb(&load_rgb(path)?, config.left_border_trim)?;
    let gray = Frame::from_rgb8(&rgb);
    analyse_trimmed(&gray, Some(rgb), &source_name(path), config)
}

fn analyse_trimmed(
    gray: &Frame,
    background: Option<RgbImage>,
    source_image: &str,
    config: &AnalysisConfig,
) -> Result<ImageAnalysis> {
    let (width, height) = (gray.width(), gray.height());
    if width == 0 || height == 0 {
        return Err(FlocError::InvalidDimensions { width, height });
    }

    let pre = preprocess(gray, &config.preprocess);
    let seg = segment(&pre.enhanced, &config.segmentation);

    let criteria = config.acceptance_criteria();
    let height_policy = config.height_policy();
    let accepted = filter_candidates(&seg.contours, &pre.focus_map, &seg.mask, &criteria);
    debug!(
        source = source_image,
        contours = seg.contours.len(),
        accepted = accepted.len(),
        "Filtered candidates"
    );

    let records: Vec<ParticleRecord> = accepted
        .iter()
        .map(|candidate| {
            let measurement = measure(candidate, config.pixel_scale);
            let shape_3d = estimate_shape_3d(&measurement.axes, &height_policy);
            ParticleRecord::new(source_image, candidate, &measurement, shape_3d)
        })
        .collect();

    info!(
        source = source_image,
        threshold = seg.threshold,
        candidates = seg.contours.len(),
        particles = records.len(),
        "Analysed image"
    );

    if let Some(dir) = &config.debug_dir {
        let images = DebugImages {
            source_image,
            background: background.unwrap_or_else(|| frame_to_rgb(gray)),
            preprocessed: &pre,
            mask: &seg.mask,
            records: &records,
        };
        if let Err(e) = write_debug_images(dir, images) {
            warn!(source = source_image, error = %e, "Failed to write debug images");
        }
    }

    Ok(ImageAnalysis {
        source_image: source_image.to_string(),
        width,
        height,
        threshold: seg.threshold,
        candidates_total: seg.contours.len(),
        records,
    })
}

/// Analyse every matching image of a directory in parallel.
///
/// Configuration problems and an unreadable directory are fatal. A failure on
/// a single image is recorded in `BatchReport::failures` and the run goes on.
/// Results follow the sorted input file order.
pub fn analyse_directory_reported(
    dir: &Path,
    config: &AnalysisConfig,
    reporter: &dyn ProgressReporter,
) -> Result<BatchReport> {
    config.validate()?;

    reporter.begin_stage(PipelineStage::Scanning, None);
    let paths = list_images(dir, &config.extensions)?;
    reporter.finish_stage();
    info!(dir = %dir.display(), images = paths.len(), "Scanning directory");

    reporter.begin_stage(PipelineStage::Analysing, Some(paths.len()));
    let done = AtomicUsize::new(0);
    let results: Vec<(usize, Result<ImageAnalysis>)> = paths
        .par_iter()
        .enumerate()
        .map(|(i, path)| {
            let result = analyse_image(path, config);
            let completed = done.fetch_add(1, Ordering::Relaxed) + 1;
            reporter.advance(completed);
            (i, result)
        })
        .collect();
    reporter.finish_stage();

    let mut batch = BatchReport::default();
    for (i, result) in results {
        match result {
            Ok(analysis) => batch.images.push(analysis),
            Err(e) => {
                warn!(path = %paths[i].display(), error = %e, "Skipping image");
                batch.failures.push(ImageFailure {
                    path: paths[i].clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        images = batch.images.len(),
        failures = batch.failures.len(),
        particles = batch.particle_count(),
        "Batch complete"
    );
    Ok(batch)
}

/// Analyse a directory without progress reporting.
pub fn analyse_directory(dir: &Path, config: &AnalysisConfig) -> Result<BatchReport> {
    analyse_directory_reported(dir, config, &NoOpReporter)
}
