//! Error handling for NOTAM and METAR processing operations.
//!
//! Field-level absence is never an error: extractors leave the field empty.
//! Only malformed timestamps and structurally invalid tables surface here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotamError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid compact timestamp: '{token}' (expected YYMMDDhhmm, YYMMDDhhmmss or PERM)")]
    InvalidTimestamp { token: String },

    #[error("Timestamp '{token}' does not describe a valid date: {reason}")]
    InvalidDate { token: String, reason: String },

    #[error("Table {path} is missing required columns: {}", missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("Input not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Invalid input pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl NotamError {
    /// True for the malformed-timestamp category that presentation code
    /// replaces with a placeholder instead of propagating.
    pub fn is_timestamp_error(&self) -> bool {
        matches!(
            self,
            NotamError::InvalidTimestamp { .. } | NotamError::InvalidDate { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, NotamError>;
