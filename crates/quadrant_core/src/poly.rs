use std::ops::{Div, DivAssign, Mul, MulAssign};

use serde::{Deserialize, Serialize};

use crate::error::{NumError, Result};

/// Polynomial `c0 + c1 x + c2 x^2 + ...` in one real variable.
///
/// Used as a table piece: each cell of a [`crate::tables::SparseTable`] can
/// hold a local polynomial in the offset from its center.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Polynomial of the given degree; fails unless exactly `degree + 1`
    /// coefficients are supplied, lowest order first.
    pub fn new(degree: usize, coefficients: Vec<f64>) -> Result<Self> {
        if coefficients.len() != degree + 1 {
            return Err(NumError::WrongCoefficientCount {
                expected: degree + 1,
                found: coefficients.len(),
            });
        }
        Ok(Self { coefficients })
    }

    pub fn constant(c: f64) -> Self {
        Self {
            coefficients: vec![c],
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    pub fn derivative(&self) -> Self {
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| i as f64 * c)
            .collect();
        Self { coefficients }
    }

    /// Antiderivative whose constant term is `constant`.
    pub fn antiderivative(&self, constant: f64) -> Self {
        let coefficients = std::iter::once(constant)
            .chain(
                self.coefficients
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| c / (i + 1) as f64),
            )
            .collect();
        Self { coefficients }
    }

    /// Exact definite integral from `a` to `b`.
    pub fn integral(&self, a: f64, b: f64) -> f64 {
        let anti = self.antiderivative(0.0);
        anti.eval(b) - anti.eval(a)
    }
}

impl MulAssign<f64> for Polynomial {
    fn mul_assign(&mut self, factor: f64) {
        for c in &mut self.coefficients {
            *c *= factor;
        }
    }
}

impl DivAssign<f64> for Polynomial {
    fn div_assign(&mut self, divisor: f64) {
        for c in &mut self.coefficients {
            *c /= divisor;
        }
    }
}

impl Mul<f64> for Polynomial {
    type Output = Self;

    fn mul(mut self, factor: f64) -> Self {
        self *= factor;
        self
    }
}

impl Div<f64> for Polynomial {
    type Output = Self;

    fn div(mut self, divisor: f64) -> Self {
        self /= divisor;
        self
    }
}
