// Result rendering: overlay measured geometry and dimension labels
//
// Consumes the ordered MeasuredObject sequence and the original raster;
// never feeds anything back into measurement state.

use ab_glyph::{FontVec, PxScale};
use dimscan_common::{MeasuredObject, Point2D};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_text_mut};

const OUTLINE: Rgb<u8> = Rgb([0u8, 0u8, 0u8]);
const CORNER: Rgb<u8> = Rgb([255u8, 0u8, 0u8]);
const MIDPOINT: Rgb<u8> = Rgb([32u8, 33u8, 89u8]);
const CONNECTOR: Rgb<u8> = Rgb([255u8, 0u8, 255u8]);
const LABEL: Rgb<u8> = Rgb([101u8, 67u8, 33u8]);

/// Draw quad outlines, corner and midpoint markers, midpoint connectors,
/// and (when a font is available) unit-labeled dimension text for every
/// measured object.
pub fn annotate(
    image: &RgbImage,
    objects: &[MeasuredObject],
    unit: &str,
    font: Option<&FontVec>,
) -> RgbImage {
    let mut canvas = image.clone();
    for object in objects {
        draw_object(&mut canvas, object, unit, font);
    }
    canvas
}

fn draw_object(canvas: &mut RgbImage, object: &MeasuredObject, unit: &str, font: Option<&FontVec>) {
    let corners = object.quad.corners();

    // Object outline along the clockwise corner cycle.
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        draw_line_segment_mut(
            canvas,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            OUTLINE,
        );
    }

    for corner in corners {
        draw_filled_circle_mut(canvas, (corner.x as i32, corner.y as i32), 5, CORNER);
    }

    let quad = &object.quad;
    let top_mid = quad.top_left.midpoint(quad.top_right);
    let bottom_mid = quad.bottom_left.midpoint(quad.bottom_right);
    let left_mid = quad.top_left.midpoint(quad.bottom_left);
    let right_mid = quad.top_right.midpoint(quad.bottom_right);

    for mid in [top_mid, bottom_mid, left_mid, right_mid] {
        draw_filled_circle_mut(canvas, (mid.x as i32, mid.y as i32), 5, MIDPOINT);
    }

    // Vertical then horizontal connector between opposing midpoints.
    draw_line_segment_mut(
        canvas,
        (top_mid.x as f32, top_mid.y as f32),
        (bottom_mid.x as f32, bottom_mid.y as f32),
        CONNECTOR,
    );
    draw_line_segment_mut(
        canvas,
        (left_mid.x as f32, left_mid.y as f32),
        (right_mid.x as f32, right_mid.y as f32),
        CONNECTOR,
    );

    if let Some(font) = font {
        draw_labels(canvas, object, unit, font, top_mid, right_mid);
    }
}

fn draw_labels(
    canvas: &mut RgbImage,
    object: &MeasuredObject,
    unit: &str,
    font: &FontVec,
    top_mid: Point2D,
    right_mid: Point2D,
) {
    let scale = PxScale::from(18.0);
    // Height label above the top midpoint, width label beside the right
    // midpoint.
    if let Some(height) = object.height_units {
        let text = format!("{height:.1}{unit}");
        let x = (top_mid.x as i32 - 15).max(0);
        let y = (top_mid.y as i32 - 20).max(0);
        draw_text_mut(canvas, LABEL, x, y, scale, font, &text);
    }
    if let Some(width) = object.width_units {
        let text = format!("{width:.1}{unit}");
        let x = (right_mid.x as i32 + 10).min(canvas.width() as i32 - 1);
        let y = right_mid.y as i32;
        draw_text_mut(canvas, LABEL, x, y, scale, font, &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimscan_common::BoundingQuad;

    fn sample_object() -> MeasuredObject {
        let quad = BoundingQuad {
            top_left: Point2D::new(20.0, 20.0),
            top_right: Point2D::new(80.0, 20.0),
            bottom_right: Point2D::new(80.0, 60.0),
            bottom_left: Point2D::new(20.0, 60.0),
        };
        MeasuredObject {
            quad,
            width_px: 60.0,
            height_px: 40.0,
            width_units: Some(3.0),
            height_units: Some(2.0),
        }
    }

    #[test]
    fn annotation_preserves_dimensions_and_marks_corners() {
        let base = RgbImage::from_pixel(120, 100, Rgb([200u8, 200u8, 200u8]));
        let annotated = annotate(&base, &[sample_object()], "cm", None);
        assert_eq!(annotated.dimensions(), base.dimensions());
        // Corner marker lands on the top-left corner.
        assert_eq!(*annotated.get_pixel(20, 20), CORNER);
        // Pixels far from any geometry are untouched.
        assert_eq!(*annotated.get_pixel(110, 90), Rgb([200u8, 200u8, 200u8]));
    }

    #[test]
    fn source_image_is_not_mutated() {
        let base = RgbImage::from_pixel(120, 100, Rgb([200u8, 200u8, 200u8]));
        let _ = annotate(&base, &[sample_object()], "cm", None);
        assert_eq!(*base.get_pixel(20, 20), Rgb([200u8, 200u8, 200u8]));
    }
}
