mod common;

use ndarray::Array2;

use flocsize_core::detection::external_contours;
use flocsize_core::measure::{
    filter_candidates, AcceptanceCriteria, BoundingBox, Candidate, Rejection,
};

use common::{blank_levels, fill_square, mask_of, BACKGROUND, PARTICLE};

const H: usize = 40;
const W: usize = 50;

fn criteria() -> AcceptanceCriteria {
    AcceptanceCriteria {
        clarity_threshold: 10.0,
        area_min: 3,
        area_max: 18_000,
        edge_margin: 2,
    }
}

fn sharp_focus() -> Array2<f32> {
    Array2::from_elem((H, W), 50.0)
}

/// Mask with a single square particle.
fn square_mask(x: usize, y: usize, side: usize) -> Array2<bool> {
    let mut levels = blank_levels(H, W, BACKGROUND);
    fill_square(&mut levels, x, y, side, PARTICLE);
    mask_of(&levels)
}

fn check_square(
    x: usize,
    y: usize,
    side: usize,
    criteria: &AcceptanceCriteria,
) -> Result<(), Rejection> {
    let mask = square_mask(x, y, side);
    let contours = external_contours(&mask);
    assert_eq!(contours.len(), 1);
    let candidate = Candidate::from_contour(&contours[0], &sharp_focus(), &mask).unwrap();
    candidate.check(criteria, W as u32, H as u32)
}

#[test]
fn test_candidate_fields() {
    let mask = square_mask(10, 12, 5);
    let contours = external_contours(&mask);
    let mut focus = Array2::from_elem((H, W), 1.0f32);
    focus[[14, 11]] = 42.0;
    focus[[0, 0]] = 99.0;
    let candidate = Candidate::from_contour(&contours[0], &focus, &mask).unwrap();

    assert_eq!(
        candidate.bounding_box,
        BoundingBox {
            x: 10,
            y: 12,
            width: 5,
            height: 5
        }
    );
    assert_eq!(candidate.pixel_count, 25);
    // Only the focus values inside the bounding box count.
    assert_eq!(candidate.max_sharpness, 42.0);
}

#[test]
fn test_accepts_interior_particle() {
    assert_eq!(check_square(10, 10, 5, &criteria()), Ok(()));
}

#[test]
fn test_rejects_touching_left_and_top_border() {
    assert_eq!(check_square(0, 10, 5, &criteria()), Err(Rejection::TouchesBorder));
    assert_eq!(check_square(10, 0, 5, &criteria()), Err(Rejection::TouchesBorder));
}

#[test]
fn test_rejects_touching_right_and_bottom_border() {
    assert_eq!(check_square(W - 5, 10, 5, &criteria()), Err(Rejection::TouchesBorder));
    assert_eq!(check_square(10, H - 5, 5, &criteria()), Err(Rejection::TouchesBorder));
}

#[test]
fn test_border_margin_boundaries() {
    // One background column is not enough with the default margin of 2.
    assert_eq!(check_square(1, 10, 5, &criteria()), Err(Rejection::TouchesBorder));
    assert_eq!(check_square(2, 10, 5, &criteria()), Ok(()));
    assert_eq!(check_square(W - 7, 10, 5, &criteria()), Ok(()));
    assert_eq!(check_square(W - 6, 10, 5, &criteria()), Err(Rejection::TouchesBorder));
}

#[test]
fn test_border_rejection_regardless_of_area_and_clarity() {
    let mask = square_mask(0, 0, 6);
    let contours = external_contours(&mask);
    let focus = Array2::from_elem((H, W), 255.0f32);
    let candidate = Candidate::from_contour(&contours[0], &focus, &mask).unwrap();
    assert_eq!(
        candidate.check(&criteria(), W as u32, H as u32),
        Err(Rejection::TouchesBorder)
    );
}

#[test]
fn test_area_bounds_are_strict() {
    let at_min = AcceptanceCriteria {
        area_min: 25,
        ..criteria()
    };
    assert_eq!(
        check_square(10, 10, 5, &at_min),
        Err(Rejection::TooSmall { pixel_count: 25 })
    );

    let below_min = AcceptanceCriteria {
        area_min: 24,
        ..criteria()
    };
    assert_eq!(check_square(10, 10, 5, &below_min), Ok(()));

    let at_max = AcceptanceCriteria {
        area_max: 25,
        ..criteria()
    };
    assert_eq!(
        check_square(10, 10, 5, &at_max),
        Err(Rejection::TooLarge { pixel_count: 25 })
    );

    let above_max = AcceptanceCriteria {
        area_max: 26,
        ..criteria()
    };
    assert_eq!(check_square(10, 10, 5, &above_max), Ok(()));
}

#[test]
fn test_clarity_threshold_is_strict() {
    let at = AcceptanceCriteria {
        clarity_threshold: 50.0,
        ..criteria()
    };
    assert_eq!(
        check_square(10, 10, 5, &at),
        Err(Rejection::OutOfFocus {
            max_sharpness: 50.0
        })
    );

    let below = AcceptanceCriteria {
        clarity_threshold: 49.0,
        ..criteria()
    };
    assert_eq!(check_square(10, 10, 5, &below), Ok(()));
}

#[test]
fn test_filter_candidates_keeps_contour_order() {
    let mut levels = blank_levels(H, W, BACKGROUND);
    fill_square(&mut levels, 5, 5, 4, PARTICLE);
    fill_square(&mut levels, 0, 15, 4, PARTICLE); // touches the border
    fill_square(&mut levels, 20, 25, 1, PARTICLE); // too small
    fill_square(&mut levels, 30, 30, 6, PARTICLE);
    let mask = mask_of(&levels);
    let contours = external_contours(&mask);
    assert_eq!(contours.len(), 4);

    let accepted = filter_candidates(&contours, &sharp_focus(), &mask, &criteria());
    let indices: Vec<usize> = accepted.iter().map(|c| c.contour.index).collect();
    assert_eq!(indices, vec![0, 3]);
}

#[test]
fn test_rejection_display() {
    assert_eq!(Rejection::TouchesBorder.to_string(), "touches image border");
    assert_eq!(
        Rejection::TooSmall { pixel_count: 2 }.to_string(),
        "too small (2 px)"
    );
}

#[test]
fn test_bounding_box_crop() {
    let data = Array2::from_shape_fn((6, 6), |(r, c)| r * 10 + c);
    let bb = BoundingBox {
        x: 1,
        y: 2,
        width: 3,
        height: 2,
    };
    let view = bb.crop(&data);
    assert_eq!(view.dim(), (2, 3));
    assert_eq!(view[[0, 0]], 21);
    assert_eq!(view[[1, 2]], 33);
}
