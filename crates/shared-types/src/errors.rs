//! Common error type used across the thermal grid crates

use thiserror::Error;

/// Errors raised while validating or interpreting `/state` payloads
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: u16, height: u16 },

    #[error("{grid} grid is {rows}x{cols} but expected {expected_rows}x{expected_cols}")]
    DimensionMismatch {
        grid: String,
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("result '{name}' reports error code {error_code} but carries a temperature grid")]
    UnexpectedGrid { name: String, error_code: u32 },

    #[error("result '{name}' reports success but has no temperature grid")]
    MissingGrid { name: String },

    #[error("duplicate result name: {name}")]
    DuplicateResult { name: String },

    #[error("unknown point type: {value}")]
    UnknownPointType { value: String },

    #[error("point ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: u16,
        height: u16,
    },

    #[error("invalid classification cycle: {message}")]
    InvalidCycle { message: String },

    #[error("payload parse error: {message}")]
    Parse { message: String },
}

/// Result type alias for validation operations
pub type ThermResult<T> = Result<T, ThermError>;

impl From<serde_json::Error> for ThermError {
    fn from(err: serde_json::Error) -> Self {
        ThermError::Parse {
            message: err.to_string(),
        }
    }
}
