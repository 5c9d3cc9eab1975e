//! Shared data types for the dimscan measurement pipeline.
//!
//! The binary crate depends on these records for every stage boundary, and
//! downstream consumers (report writers, renderers) read them without pulling
//! in the imaging stack.

mod error;
mod types;

pub use error::PipelineError;
pub use types::{BoundingQuad, CalibrationState, MeasureConfig, MeasuredObject, Point2D};
