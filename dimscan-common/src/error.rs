use thiserror::Error;

/// Structured failures surfaced by a single measurement run.
///
/// The variants are deliberately distinct so a batch wrapper can tell
/// "nothing detected" ([`EmptyContourSet`](Self::EmptyContourSet)) apart from
/// "reference unusable" ([`Calibration`](Self::Calibration)) and skip the
/// image instead of aborting. None of these are transient; the pipeline
/// never retries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// No contour survived the minimum-area filter.
    #[error("no measurable objects found in the frame")]
    EmptyContourSet,

    /// The reference object's fitted rectangle collapsed, so no valid
    /// pixels-per-unit scale exists for this run.
    #[error("calibration failed: reference object measured {width_px} px wide")]
    Calibration {
        /// Pixel width measured for the reference object.
        width_px: f64,
    },

    /// The input image is malformed or has zero extent. Raised before the
    /// pipeline starts.
    #[error("invalid input image: {reason}")]
    Input {
        /// What was wrong with the input.
        reason: String,
    },

    /// A configuration value is outside its documented range.
    #[error("invalid configuration: {reason}")]
    Config {
        /// Which tunable was rejected and why.
        reason: String,
    },
}
