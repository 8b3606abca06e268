//! Error types for trueno-curvilinear operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in trueno-curvilinear operations.
///
/// Geometric conditions (undefined tangent angles, ticks outside the view) are
/// not errors; they surface as `NaN` angles or filtered/`None` results.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (config file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration file could not be parsed.
    #[error("Config parse error at line {line}: {message}")]
    ConfigParse {
        /// Line number reported by the YAML parser (0 if unknown).
        line: usize,
        /// Parser message.
        message: String,
    },

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sample arrays cannot be broadcast against each other.
    #[error("Data length mismatch: x has {x_len} elements, y has {y_len} elements")]
    DataLengthMismatch {
        /// Length of x data.
        x_len: usize,
        /// Length of y data.
        y_len: usize,
    },

    /// Scale domain error (e.g., empty axis limits).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Floating axis extremes with `low > high` or a NaN bound.
    #[error("Invalid extremes: low {low} is not <= high {high}")]
    InvalidExtremes {
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },

    /// Affine matrix has a zero determinant.
    #[error("Singular transform: determinant is zero")]
    SingularTransform,
}
