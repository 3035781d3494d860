//! # Error Types
//!
//! This module defines error types used throughout the hvac-report library.

use thiserror::Error;

use crate::unit::UnitId;

/// Main error type for report operations
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required field is missing or a record is otherwise unacceptable
    #[error("Validation error: {0}")]
    Validation(String),

    /// A single image could not be read or encoded
    #[error("Encode error: {0}")]
    Encode(String),

    /// The report surface could not be produced or paginated
    #[error("Render error: {0}")]
    Render(String),

    /// No unit with this id exists in the collection
    #[error("Unit not found: {0}")]
    NotFound(UnitId),

    /// Filter row index out of range
    #[error("Filter row {index} out of range ({len} rows)")]
    FilterIndex { index: usize, len: usize },

    /// Another export is still running
    #[error("An export is already in progress")]
    ExportInProgress,

    /// Page serialization or export task failure
    #[error("Export error: {0}")]
    Export(String),

    /// JSON error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
