use imageproc::geometry::convex_hull;
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// Minimum-area enclosing rectangle of a contour.
///
/// `size_a` is the extent along the direction `angle` (degrees, in [0, 90)),
/// `size_b` the extent perpendicular to it. No ordering between the two
/// sizes is implied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    pub center_x: f64,
    pub center_y: f64,
    pub size_a: f64,
    pub size_b: f64,
    pub angle: f64,
}

impl RotatedRect {
    /// Corner points in drawing order.
    pub fn corners(&self) -> [(f64, f64); 4] {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let (ha, hb) = (self.size_a / 2.0, self.size_b / 2.0);
        let corner = |su: f64, sv: f64| {
            (
                self.center_x + su * ha * cos - sv * hb * sin,
                self.center_y + su * ha * sin + sv * hb * cos,
            )
        };
        [
            corner(-1.0, -1.0),
            corner(1.0, -1.0),
            corner(1.0, 1.0),
            corner(-1.0, 1.0),
        ]
    }
}

/// Fit the minimum-area rotated rectangle around a set of points.
///
/// Uses the convex hull and rotating calipers: the optimal rectangle has one
/// side collinear with a hull edge, so every edge direction is tried.
/// A single point yields a zero-size rectangle; collinear points yield a
/// rectangle with zero width.
pub fn min_area_rect(points: &[Point<i32>]) -> RotatedRect {
    // Contours revisit pixels along thin parts; repeated points upset the
    // angular sort of the hull scan.
    let mut distinct = points.to_vec();
    distinct.sort_unstable_by_key(|p| (p.y, p.x));
    distinct.dedup();

    let hull: Vec<(f64, f64)> = convex_hull(distinct)
        .into_iter()
        .map(|p| (p.x as f64, p.y as f64))
        .collect();
    match hull.len() {
        0 => RotatedRect::default(),
        1 => RotatedRect {
            center_x: hull[0].0,
            center_y: hull[0].1,
            ..Default::default()
        },
        _ => rotating_calipers(&hull),
    }
}

fn rotating_calipers(hull: &[(f64, f64)]) -> RotatedRect {
    let n = hull.len();
    let mut best: Option<(f64, RotatedRect)> = None;

    for i in 0..n {
        let (x0, y0) = hull[i];
        let (x1, y1) = hull[(i + 1) % n];
        let len = (x1 - x0).hypot(y1 - y0);
        if len == 0.0 {
            continue;
        }
        let (ux, uy) = ((x1 - x0) / len, (y1 - y0) / len);

        let mut min_u = f64::INFINITY;
        let mut max_u = f64::NEG_INFINITY;
        let mut min_v = f64::INFINITY;
        let mut max_v = f64::NEG_INFINITY;
        for &(px, py) in hull {
            let (dx, dy) = (px - x0, py - y0);
            let u = dx * ux + dy * uy;
            let v = -dx * uy + dy * ux;
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }

        let width = max_u - min_u;
        let height = max_v - min_v;
        let area = width * height;
        if best.as_ref().is_some_and(|(best_area, _)| area >= *best_area) {
            continue;
        }

        let cu = (min_u + max_u) / 2.0;
        let cv = (min_v + max_v) / 2.0;
        let center_x = x0 + cu * ux - cv * uy;
        let center_y = y0 + cu * uy + cv * ux;
        let rect = normalized(center_x, center_y, width, height, uy.atan2(ux).to_degrees());
        best = Some((area, rect));
    }

    best.map(|(_, rect)| rect).unwrap_or_default()
}

/// Fold the edge direction into [0, 90), swapping the sides when the
/// reference direction turns by a quarter.
fn normalized(center_x: f64, center_y: f64, width: f64, height: f64, angle: f64) -> RotatedRect {
    let mut angle = angle.rem_euclid(180.0);
    if angle >= 180.0 {
        angle = 0.0;
    }
    let (mut size_a, mut size_b) = (width, height);
    if angle >= 90.0 {
        angle -= 90.0;
        std::mem::swap(&mut size_a, &mut size_b);
    }
    RotatedRect {
        center_x,
        center_y,
        size_a,
        size_b,
        angle,
    }
}
