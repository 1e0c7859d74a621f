//! Error types for the layout engine.
//!
//! Out-of-range geometry is never an error: every write path clamps it.
//! What remains are missing ids, malformed templates and programmer errors.

use crate::id::FieldId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    /// An operation referenced a field id absent from the store.
    #[error("field {0} not found")]
    NotFound(FieldId),

    /// A template contains two fields with the same id.
    #[error("duplicate field id {0}")]
    DuplicateId(FieldId),

    /// A template whose canvas cannot hold a minimum-size field.
    #[error("invalid canvas {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },

    /// Programmer error, e.g. starting a resize while a drag is active.
    #[error("invariant violation: {0}")]
    InvariantViolation(&'static str),

    #[error("template JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by a persistence collaborator.
    #[error("storage: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
