mod common;

use ndarray::Array2;

use flocsize_core::detection::threshold::{binarize_inverted, compute_threshold, otsu_threshold};
use flocsize_core::detection::{external_contours, segment, SegmentationConfig, ThresholdMode};
use flocsize_core::measure::BoundingBox;

use common::{blank_levels, fill_square, frame_of, mask_of, BACKGROUND, PARTICLE};

#[test]
fn test_otsu_bimodal() {
    let levels = Array2::from_shape_fn((10, 10), |(r, _)| if r < 5 { 20 } else { 220 });
    assert_eq!(otsu_threshold(&levels), 20);
}

#[test]
fn test_otsu_separates_unequal_populations() {
    let mut levels = blank_levels(40, 40, 180);
    fill_square(&mut levels, 5, 5, 10, 40);
    let t = otsu_threshold(&levels);
    assert!((40..180).contains(&t), "threshold {t}");
}

#[test]
fn test_compute_threshold_fixed_ignores_image() {
    let levels = blank_levels(4, 4, 10);
    assert_eq!(compute_threshold(&levels, &SegmentationConfig::fixed(80)), 80);
}

#[test]
fn test_compute_threshold_automatic_uses_otsu() {
    let levels = Array2::from_shape_fn((8, 8), |(_, c)| if c < 4 { 20 } else { 220 });
    assert_eq!(
        compute_threshold(&levels, &SegmentationConfig::automatic()),
        20
    );
}

#[test]
fn test_binarize_inverted_includes_threshold() {
    let levels = Array2::from_shape_vec((1, 4), vec![79, 80, 81, 0]).unwrap();
    let mask = binarize_inverted(&levels, 80);
    assert_eq!(mask.as_slice().unwrap(), &[true, true, false, true]);
}

#[test]
fn test_threshold_mode_display() {
    assert_eq!(format!("{}", ThresholdMode::Fixed), "Fixed");
    assert_eq!(format!("{}", ThresholdMode::Automatic), "Automatic (Otsu)");
    assert_eq!(ThresholdMode::default(), ThresholdMode::Fixed);
}

// ---------------------------------------------------------------------------
// External contours
// ---------------------------------------------------------------------------

#[test]
fn test_external_contours_empty_mask() {
    let mask = Array2::from_elem((10, 10), false);
    assert!(external_contours(&mask).is_empty());
}

#[test]
fn test_external_contours_discovery_order() {
    let mut levels = blank_levels(20, 30, BACKGROUND);
    fill_square(&mut levels, 20, 2, 4, PARTICLE);
    fill_square(&mut levels, 2, 10, 4, PARTICLE);
    let contours = external_contours(&mask_of(&levels));

    assert_eq!(contours.len(), 2);
    assert_eq!(contours[0].index, 0);
    assert_eq!(contours[1].index, 1);
    let first = BoundingBox::from_points(&contours[0].points).unwrap();
    let second = BoundingBox::from_points(&contours[1].points).unwrap();
    assert_eq!((first.x, first.y), (20, 2));
    assert_eq!((second.x, second.y), (2, 10));
}

#[test]
fn test_external_contours_ignore_nested_blob() {
    // Hollow square with a blob inside its hole.
    let mut levels = blank_levels(30, 30, BACKGROUND);
    fill_square(&mut levels, 5, 5, 20, PARTICLE);
    fill_square(&mut levels, 7, 7, 16, BACKGROUND);
    fill_square(&mut levels, 13, 13, 4, PARTICLE);
    let contours = external_contours(&mask_of(&levels));

    assert_eq!(contours.len(), 1);
    let bb = BoundingBox::from_points(&contours[0].points).unwrap();
    assert_eq!((bb.x, bb.y, bb.width, bb.height), (5, 5, 20, 20));
}

#[test]
fn test_external_contours_diagonal_pixels_connect() {
    let mut mask = Array2::from_elem((8, 8), false);
    mask[[2, 2]] = true;
    mask[[3, 3]] = true;
    mask[[4, 4]] = true;
    assert_eq!(external_contours(&mask).len(), 1);
}

// ---------------------------------------------------------------------------
// segment
// ---------------------------------------------------------------------------

#[test]
fn test_segment_fixed_threshold() {
    let mut levels = blank_levels(40, 40, BACKGROUND);
    fill_square(&mut levels, 5, 5, 6, PARTICLE);
    fill_square(&mut levels, 25, 25, 6, PARTICLE);
    let seg = segment(&frame_of(&levels), &SegmentationConfig::fixed(80));

    assert_eq!(seg.threshold, 80);
    assert_eq!(seg.contours.len(), 2);
    assert_eq!(seg.mask.iter().filter(|&&v| v).count(), 72);
}

#[test]
fn test_segment_automatic_threshold() {
    let mut levels = blank_levels(40, 40, BACKGROUND);
    fill_square(&mut levels, 10, 10, 8, PARTICLE);
    let seg = segment(&frame_of(&levels), &SegmentationConfig::automatic());

    assert_eq!(seg.threshold, PARTICLE);
    assert_eq!(seg.contours.len(), 1);
}
