use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// Horizontal position, pixels from the left edge.
    pub x: f64,
    /// Vertical position, pixels from the top edge.
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between this point and another.
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) * 0.5,
            y: (self.y + other.y) * 0.5,
        }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }
}

/// Minimal-area rectangle around one contour, corners in canonical
/// clockwise order.
///
/// Corner labels are assigned by coordinate rules (see `quad` in the binary
/// crate), never by the fitting routine's output order, so repeated runs over
/// identical input produce bit-identical quads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingQuad {
    pub top_left: Point2D,
    pub top_right: Point2D,
    pub bottom_right: Point2D,
    pub bottom_left: Point2D,
}

impl BoundingQuad {
    /// Corners in clockwise order: tl, tr, br, bl.
    pub fn corners(&self) -> [Point2D; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }
}

/// Pixel-to-unit scale derived from the reference object.
///
/// Created at most once per run and never mutated afterwards; the fields are
/// private and there are no setters, so "write-once" is enforced by the type
/// rather than by discipline at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationState {
    pixels_per_unit: f64,
    reference_width_units: f64,
}

impl CalibrationState {
    /// Derive the scale from the reference object's measured pixel width.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Calibration`] when `width_px <= 0`, i.e. the
    /// fitted reference rectangle collapsed to a line or point.
    pub fn from_reference(
        width_px: f64,
        reference_width_units: f64,
    ) -> Result<Self, PipelineError> {
        if width_px <= 0.0 {
            return Err(PipelineError::Calibration { width_px });
        }
        Ok(Self {
            pixels_per_unit: width_px / reference_width_units,
            reference_width_units,
        })
    }

    pub fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }

    pub fn reference_width_units(&self) -> f64 {
        self.reference_width_units
    }

    /// Convert a pixel distance into physical units.
    pub fn to_units(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_unit
    }
}

/// One measured object: fitted quad, pixel dimensions, and unit dimensions
/// when a calibration existed at the time the object was processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredObject {
    pub quad: BoundingQuad,
    pub width_px: f64,
    pub height_px: f64,
    pub width_units: Option<f64>,
    pub height_units: Option<f64>,
}

/// Tunables for one measurement run. Defaults match the documented pipeline
/// parameters; [`validate`](Self::validate) rejects out-of-range values
/// before any image work starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureConfig {
    /// Smoothing kernel size in pixels; must be odd and >= 1.
    pub blur_kernel: u32,
    /// Lower Canny hysteresis threshold.
    pub canny_low: f32,
    /// Upper Canny hysteresis threshold.
    pub canny_high: f32,
    /// 3x3 dilation passes applied after edge detection.
    pub dilate_iterations: u8,
    /// 3x3 erosion passes applied after dilation.
    pub erode_iterations: u8,
    /// Contours with area strictly below this survive-threshold (px^2) are
    /// discarded; area exactly equal to it is kept.
    pub min_contour_area: f64,
    /// Known physical width of the leftmost (reference) object, in the
    /// chosen unit.
    pub reference_width: f64,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 3,
            canny_low: 50.0,
            canny_high: 100.0,
            dilate_iterations: 1,
            erode_iterations: 1,
            min_contour_area: 100.0,
            reference_width: 3.0,
        }
    }
}

impl MeasureConfig {
    /// Check every tunable against its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] naming the offending field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.blur_kernel == 0 || self.blur_kernel % 2 == 0 {
            return Err(PipelineError::Config {
                reason: format!(
                    "blur kernel must be an odd integer >= 1, got {}",
                    self.blur_kernel
                ),
            });
        }
        if self.canny_low <= 0.0 || self.canny_high <= 0.0 || self.canny_low > self.canny_high {
            return Err(PipelineError::Config {
                reason: format!(
                    "canny thresholds must satisfy 0 < low <= high, got {}/{}",
                    self.canny_low, self.canny_high
                ),
            });
        }
        if self.min_contour_area < 0.0 {
            return Err(PipelineError::Config {
                reason: format!(
                    "minimum contour area must be non-negative, got {}",
                    self.min_contour_area
                ),
            });
        }
        if self.reference_width <= 0.0 {
            return Err(PipelineError::Config {
                reason: format!(
                    "reference width must be positive, got {}",
                    self.reference_width
                ),
            });
        }
        Ok(())
    }
}
