pub mod dim_exps;
pub mod dimval;
pub mod dyndim;
pub mod error;
pub mod integral;
pub mod integral_stats;
pub mod interpolant;
pub mod interval;
pub mod poly;
pub mod rk;
pub mod tables;
pub mod units;
/// The `quadrant_core` crate provides a dimension-checked numerical core.
/// Every algorithm is generic over plain `f64` and over values that carry
/// physical dimensions, so an integral over a length of an area is a volume.
///
/// Key components:
/// - **Traits**: `Quantity` (numeric abstraction), `Integrand` (gives the dimension of an area).
/// - **Dimensions**: `DimExps`, static `Dimval` checked by the compiler, dynamic `DynDim` checked at runtime, and unit constants.
/// - **Quadrature**: adaptive trapezoid `integral` and the Cash–Karp `RkQuad` solver.
/// - **Interpolation**: piecewise-linear `Interpolant` from points, text files, or functions.
/// - **Tables**: `DenseTable` and `SparseTable` of per-cell pieces such as `Polynomial`.
pub mod traits;

pub use dim_exps::DimExps;
pub use dimval::{Dimensionless, Dimval};
pub use dyndim::DynDim;
pub use error::{NumError, Result};
pub use integral::{
    integral, integral_fn, integral_with_report, QuadratureReport, QuadratureSettings,
    ToleranceUnmet,
};
pub use integral_stats::IntegralStats;
pub use interpolant::{midpoints, ControlPoint, Interpolant};
pub use poly::Polynomial;
pub use rk::{RkQuad, RkSettings};
pub use tables::{Constant, DenseTable, IntegrablePiece, Piece, PieceFn, SparseTable};
pub use traits::{Integrand, Quantity};
