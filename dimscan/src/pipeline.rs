// Per-image measurement run: stage sequencing and error surfacing
//
// The flow is strictly linear: raster -> edge mask -> contour set -> ordered
// contours -> per contour {rectangle -> corners -> distances -> (first only)
// calibrate -> unit dimensions}. The calibration established by the first
// (leftmost) contour is the only state shared across loop iterations, and it
// is write-once.

use dimscan_common::{CalibrationState, MeasureConfig, MeasuredObject, PipelineError};
use image::RgbImage;

use crate::contours::{extract_contours, filter_by_area, order_left_to_right, DetectedContour};
use crate::edges::edge_map;
use crate::measure::{calibrate_once, edge_lengths, measure};
use crate::quad::fit_bounding_quad;

/// Run the full measurement pipeline over one decoded image.
///
/// When `debug_prefix` is set, intermediate rasters are written alongside it
/// (`<prefix>_gray.png`, `<prefix>_edges.png`); failures there are logged
/// and ignored since they do not affect measurement.
///
/// # Errors
///
/// - [`PipelineError::Input`] for a zero-dimension image.
/// - [`PipelineError::Config`] for out-of-range tunables.
/// - [`PipelineError::EmptyContourSet`] when nothing survives the area
///   filter.
/// - [`PipelineError::Calibration`] when the leftmost object's fitted
///   rectangle has no usable width; no object receives unit dimensions in
///   that case.
pub fn run(
    image: &RgbImage,
    config: &MeasureConfig,
    debug_prefix: Option<&str>,
) -> Result<Vec<MeasuredObject>, PipelineError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::Input {
            reason: format!("image has zero extent ({}x{})", image.width(), image.height()),
        });
    }
    config.validate()?;

    let gray = image::imageops::grayscale(image);
    save_debug(&gray, debug_prefix, "gray");

    let mask = edge_map(&gray, config);
    save_debug(&mask, debug_prefix, "edges");

    let contours = order_left_to_right(filter_by_area(extract_contours(&mask), config));
    if contours.is_empty() {
        return Err(PipelineError::EmptyContourSet);
    }
    tracing::info!(count = contours.len(), "contours ordered left to right");

    measure_objects(&contours, config)
}

/// Fit and measure each ordered contour, calibrating from the first.
///
/// A reference whose fitted rectangle has no usable width fails the whole
/// run; no object receives unit dimensions.
fn measure_objects(
    contours: &[DetectedContour],
    config: &MeasureConfig,
) -> Result<Vec<MeasuredObject>, PipelineError> {
    let mut calibration: Option<CalibrationState> = None;
    let mut objects = Vec::with_capacity(contours.len());
    for contour in contours {
        let quad = fit_bounding_quad(&contour.points);
        let (width_px, _) = edge_lengths(&quad);
        // The first iteration establishes the scale; the reference object is
        // then measured against the scale it just created.
        let cal = *calibrate_once(&mut calibration, width_px, config.reference_width)?;
        objects.push(measure(&quad, Some(&cal)));
    }

    Ok(objects)
}

fn save_debug(image: &image::GrayImage, prefix: Option<&str>, stage: &str) {
    let Some(prefix) = prefix else { return };
    let path = format!("{prefix}_{stage}.png");
    if let Err(err) = image.save(&path) {
        tracing::warn!(%err, path, "failed to save debug image");
    } else {
        tracing::debug!(path, "saved debug image");
    }
}
