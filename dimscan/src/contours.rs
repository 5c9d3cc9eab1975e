// Contour extraction, area filtering, and left-to-right ordering

use dimscan_common::MeasureConfig;
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

/// One candidate object boundary with its derived, cached geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedContour {
    /// Boundary points as traced from the edge mask. Never mutated after
    /// extraction.
    pub points: Vec<Point<i32>>,
    /// Enclosed area in px^2 (shoelace over the boundary polygon).
    pub area: f64,
    /// Leftmost extent, the primary ordering key.
    pub min_x: i32,
    /// Topmost extent, the tie-break ordering key.
    pub min_y: i32,
}

/// Shoelace area of a closed boundary polygon.
fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for (p, q) in points.iter().zip(points.iter().cycle().skip(1)) {
        twice_area += f64::from(p.x) * f64::from(q.y) - f64::from(q.x) * f64::from(p.y);
    }
    (twice_area / 2.0).abs()
}

/// Extract top-level object boundaries from a binary edge mask.
///
/// Only external borders without a parent are candidate objects. The inner
/// side of an edge ring, holes, and outlines nested inside another object's
/// interior are all dropped. Output order is unspecified; callers must run
/// [`order_left_to_right`] before relying on positions.
pub fn extract_contours(mask: &GrayImage) -> Vec<DetectedContour> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| {
            c.border_type == BorderType::Outer && c.parent.is_none() && !c.points.is_empty()
        })
        .map(|c| {
            let area = polygon_area(&c.points);
            let min_x = c.points.iter().map(|p| p.x).min().unwrap_or(0);
            let min_y = c.points.iter().map(|p| p.y).min().unwrap_or(0);
            DetectedContour {
                points: c.points,
                area,
                min_x,
                min_y,
            }
        })
        .collect()
}

/// Drop noise speckles below the minimum area.
///
/// The comparison is strictly `area < min_contour_area`: a contour whose
/// area equals the threshold survives. This boundary behavior is a fixed
/// contract, not a tunable.
pub fn filter_by_area(contours: Vec<DetectedContour>, config: &MeasureConfig) -> Vec<DetectedContour> {
    let before = contours.len();
    let kept: Vec<_> = contours
        .into_iter()
        .filter(|c| c.area >= config.min_contour_area)
        .collect();
    tracing::debug!(
        before,
        after = kept.len(),
        min_area = config.min_contour_area,
        "area filter applied"
    );
    kept
}

/// Sort contours ascending by leftmost extent, ties broken by topmost
/// extent.
///
/// The physical setup puts the calibration reference leftmost in the frame,
/// so after this ordering the first contour is deterministically the
/// reference.
pub fn order_left_to_right(mut contours: Vec<DetectedContour>) -> Vec<DetectedContour> {
    contours.sort_by_key(|c| (c.min_x, c.min_y));
    contours
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_contour(x: i32, y: i32, w: i32, h: i32) -> DetectedContour {
        let points = vec![
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w, y + h),
            Point::new(x, y + h),
        ];
        let area = polygon_area(&points);
        DetectedContour {
            points,
            area,
            min_x: x,
            min_y: y,
        }
    }

    #[test]
    fn shoelace_area_of_square() {
        let c = rect_contour(0, 0, 10, 10);
        assert!((c.area - 100.0).abs() < 1e-9);
    }

    #[test]
    fn area_filter_is_strictly_less_than() {
        let config = MeasureConfig::default(); // threshold 100 px^2
        let at_threshold = rect_contour(0, 0, 10, 10); // exactly 100
        let below = rect_contour(0, 0, 9, 11); // 99
        let kept = filter_by_area(vec![at_threshold.clone(), below], &config);
        assert_eq!(kept, vec![at_threshold]);
    }

    #[test]
    fn ordering_is_by_min_x_then_min_y() {
        let right = rect_contour(80, 0, 20, 20);
        let left_low = rect_contour(10, 50, 20, 20);
        let left_high = rect_contour(10, 5, 20, 20);
        let ordered = order_left_to_right(vec![right.clone(), left_low.clone(), left_high.clone()]);
        assert_eq!(ordered, vec![left_high, left_low, right]);
        let xs: Vec<i32> = ordered_xs(&ordered);
        assert!(xs.windows(2).all(|w| w[0] <= w[1]));
    }

    fn ordered_xs(contours: &[DetectedContour]) -> Vec<i32> {
        contours.iter().map(|c| c.min_x).collect()
    }

    #[test]
    fn extraction_keeps_outer_borders_only() {
        use image::Luma;
        use imageproc::drawing::draw_hollow_rect_mut;
        use imageproc::rect::Rect;

        // A hollow rectangle has an outer and an inner border; only the
        // outer one is a candidate object.
        let mut mask = GrayImage::new(100, 100);
        draw_hollow_rect_mut(&mut mask, Rect::at(20, 20).of_size(40, 40), Luma([255u8]));
        let contours = extract_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].min_x, 20);
        assert_eq!(contours[0].min_y, 20);
    }

    #[test]
    fn extraction_drops_outlines_nested_inside_an_object() {
        use image::Luma;
        use imageproc::drawing::draw_hollow_rect_mut;
        use imageproc::rect::Rect;

        // A pattern printed on an object's face traces as an outer border
        // with a parent; it is not a second object.
        let mut mask = GrayImage::new(200, 200);
        draw_hollow_rect_mut(&mut mask, Rect::at(10, 10).of_size(160, 160), Luma([255u8]));
        draw_hollow_rect_mut(&mut mask, Rect::at(60, 60).of_size(60, 60), Luma([255u8]));
        let contours = extract_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].min_x, 10);
    }
}
