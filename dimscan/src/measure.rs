// Midpoint/distance computation and unit conversion against the run's
// calibration state

use dimscan_common::{BoundingQuad, CalibrationState, MeasuredObject, PipelineError};

/// Pixel width and height of a canonical quad.
///
/// Width is the distance between the left-edge midpoint (tl, bl) and the
/// right-edge midpoint (tr, br); height between the top-edge midpoint
/// (tl, tr) and the bottom-edge midpoint (bl, br).
pub fn edge_lengths(quad: &BoundingQuad) -> (f64, f64) {
    let top_mid = quad.top_left.midpoint(quad.top_right);
    let bottom_mid = quad.bottom_left.midpoint(quad.bottom_right);
    let left_mid = quad.top_left.midpoint(quad.bottom_left);
    let right_mid = quad.top_right.midpoint(quad.bottom_right);

    let width_px = left_mid.distance(right_mid);
    let height_px = top_mid.distance(bottom_mid);
    (width_px, height_px)
}

/// Establish the run's calibration from the reference object, exactly once.
///
/// When `slot` is already populated the existing state is returned untouched
/// regardless of the new geometry. The scale is immutable for the rest of
/// the run.
///
/// # Errors
///
/// Returns [`PipelineError::Calibration`] when the slot is empty and the
/// measured reference width is not positive.
pub fn calibrate_once(
    slot: &mut Option<CalibrationState>,
    width_px: f64,
    reference_width_units: f64,
) -> Result<&CalibrationState, PipelineError> {
    if let Some(ref existing) = *slot {
        return Ok(existing);
    }
    let state = CalibrationState::from_reference(width_px, reference_width_units)?;
    tracing::info!(
        pixels_per_unit = state.pixels_per_unit(),
        reference_width_units,
        "calibration established from leftmost object"
    );
    Ok(slot.insert(state))
}

/// Measure one quad, converting to physical units when a calibration exists.
pub fn measure(quad: &BoundingQuad, calibration: Option<&CalibrationState>) -> MeasuredObject {
    let (width_px, height_px) = edge_lengths(quad);
    MeasuredObject {
        quad: *quad,
        width_px,
        height_px,
        width_units: calibration.map(|c| c.to_units(width_px)),
        height_units: calibration.map(|c| c.to_units(height_px)),
    }
}
