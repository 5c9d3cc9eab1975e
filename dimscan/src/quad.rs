// Minimal-area rectangle fitting and canonical corner ordering

use dimscan_common::{BoundingQuad, Point2D};
use imageproc::geometry::min_area_rect;
use imageproc::point::Point;

/// Fit the minimal-area enclosing rectangle (rotation allowed) to a contour
/// and canonicalize its corners.
///
/// Corner labels come from coordinate rules, not from the fitter's output
/// order: the two points with the smallest y form the top pair (ordered by x
/// into top-left / top-right), the remaining two form the bottom pair
/// (ordered by x, emitted bottom-right then bottom-left to complete the
/// clockwise cycle). Among equal-y points the smaller x wins "left", so a
/// perfectly axis-aligned square gets the same labeling on every run.
pub fn fit_bounding_quad(points: &[Point<i32>]) -> BoundingQuad {
    let raw = if points.len() >= 3 {
        min_area_rect(points)
    } else {
        axis_aligned_box(points)
    };
    order_corners(raw.map(|p| Point2D::new(f64::from(p.x), f64::from(p.y))))
}

/// Fallback for contours too small for rotating calipers: the axis-aligned
/// bounding box, degenerate when the points are collinear or coincident.
fn axis_aligned_box(points: &[Point<i32>]) -> [Point<i32>; 4] {
    let first = points.first().copied().unwrap_or(Point::new(0, 0));
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    [
        Point::new(min_x, min_y),
        Point::new(max_x, min_y),
        Point::new(max_x, max_y),
        Point::new(min_x, max_y),
    ]
}

/// Canonicalize four rectangle corners into clockwise tl, tr, br, bl.
fn order_corners(mut corners: [Point2D; 4]) -> BoundingQuad {
    // Lexicographic (y, x) sort: the first two entries are the top pair and
    // equal-y ties already place the smaller x first.
    corners.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let (top_left, top_right) = if corners[0].x <= corners[1].x {
        (corners[0], corners[1])
    } else {
        (corners[1], corners[0])
    };
    let (bottom_left, bottom_right) = if corners[2].x <= corners[3].x {
        (corners[2], corners[3])
    } else {
        (corners[3], corners[2])
    };

    BoundingQuad {
        top_left,
        top_right,
        bottom_right,
        bottom_left,
    }
}
