//! Error types for interpolation and contouring.

use thiserror::Error;

/// Result type alias using GeoError.
pub type GeoResult<T> = Result<T, GeoError>;

/// Errors raised by the geogrid operations.
///
/// Every operation validates its arguments on entry, so an error always means
/// no output was produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeoError {
    /// Malformed or out-of-range arguments.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The weighting step produced no usable weights.
    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),
}

impl GeoError {
    /// Create an InvalidInput error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a NumericDegeneracy error.
    pub fn numeric_degeneracy(msg: impl Into<String>) -> Self {
        Self::NumericDegeneracy(msg.into())
    }

    /// True for [`GeoError::InvalidInput`].
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, GeoError::InvalidInput(_))
    }

    /// True for [`GeoError::NumericDegeneracy`].
    pub fn is_numeric_degeneracy(&self) -> bool {
        matches!(self, GeoError::NumericDegeneracy(_))
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::InvalidInput(format!("JSON error: {}", err))
    }
}

impl From<crate::bbox::BboxParseError> for GeoError {
    fn from(err: crate::bbox::BboxParseError) -> Self {
        GeoError::InvalidInput(err.to_string())
    }
}
