//! Error type shared by every module of the crate.
//!
//! Contract violations (mismatched dimensions, invalid tolerances, empty
//! structures, malformed input files) surface here. Precision exhaustion is
//! not an error: it is logged through `tracing` and reported as data.

use thiserror::Error;

use crate::dim_exps::DimExps;

/// Errors raised by the numerical core.
#[derive(Debug, Error)]
pub enum NumError {
    /// Addition, subtraction, or comparison between values of different
    /// dimension.
    #[error("Dimension mismatch: expected [{expected}], found [{found}]")]
    DimensionMismatch {
        /// Dimension of the left operand.
        expected: DimExps,
        /// Dimension of the right operand.
        found: DimExps,
    },

    /// Integer root of non-positive degree, or an exponent that the root does
    /// not divide evenly.
    #[error("Invalid exponent operation: {reason}")]
    InvalidExponentOperation { reason: String },

    /// Tolerance was zero, negative, or NaN.
    #[error("Tolerance must be positive, got {0}")]
    InvalidTolerance(f64),

    /// Evaluation or integration of an interpolant with no control points.
    #[error("Interpolant has no control points")]
    EmptyInterpolant,

    /// Ranged integration of an interpolant that has too few control points.
    #[error("Interpolant needs at least {required} control points, found {found}")]
    InsufficientPoints { required: usize, found: usize },

    /// Source could not be read (line 0) or a data line could not be parsed.
    #[error("Failed to parse '{origin}' at line {line}: {reason}")]
    FileParse {
        origin: String,
        line: usize,
        reason: String,
    },

    /// Coefficient list length does not match the declared polynomial degree.
    #[error("Wrong number of coefficients: expected {expected}, got {found}")]
    WrongCoefficientCount { expected: usize, found: usize },

    /// Lookup table constructed without any cell.
    #[error("Table must have at least one cell")]
    EmptyTable,

    /// Lookup table spacing or cell width was not positive.
    #[error("Length of sub-domain must be positive, got {0}")]
    InvalidSpacing(f64),
}

pub type Result<T> = std::result::Result<T, NumError>;

/// Fails with [`NumError::InvalidTolerance`] unless `tolerance` is positive;
/// otherwise raises it to `floor` when it is smaller.
pub(crate) fn clamp_tolerance(tolerance: f64, floor: f64) -> Result<f64> {
    if !(tolerance > 0.0) {
        return Err(NumError::InvalidTolerance(tolerance));
    }
    Ok(tolerance.max(floor))
}
