use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A trait for types that can be used as arguments and values of the
/// functions we integrate and interpolate.
/// Implemented for `f64` and for both forms of dimensioned value.
///
/// All comparisons the adaptive algorithms make happen between two values of
/// one type, so they are always dimensionally well formed; the tolerance tests
/// themselves run on [`Quantity::number`].
pub trait Quantity:
    Copy
    + Debug
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + 'static
{
    /// Coefficient of the value in MKS base units.
    fn number(&self) -> f64;

    /// Absolute value. Never changes dimension.
    fn magnitude(self) -> Self {
        if self.number() < 0.0 {
            -self
        } else {
            self
        }
    }

    /// Value of the same dimension with a zero coefficient.
    fn zeroed(self) -> Self {
        self * 0.0
    }
}

impl Quantity for f64 {
    fn number(&self) -> f64 {
        *self
    }
}

/// A quantity that, multiplied by a width along the argument `A`, gives an
/// area under the curve.
/// `Area` is `f64` for plain numbers and carries the product dimension for
/// dimensioned values.
pub trait Integrand<A>: Quantity {
    type Area: Quantity;

    /// Area of a rectangle of height `self` over `width`.
    fn area_over(self, width: A) -> Self::Area;
}

impl<A, R> Integrand<A> for R
where
    A: Quantity,
    R: Quantity + Mul<A>,
    <R as Mul<A>>::Output: Quantity,
{
    type Area = <R as Mul<A>>::Output;

    fn area_over(self, width: A) -> Self::Area {
        self * width
    }
}

/// Product type of two quantities.
pub type Product<X, Y> = <X as Mul<Y>>::Output;

/// Ratio type of two quantities.
pub type Ratio<Y, X> = <Y as Div<X>>::Output;

/// Absolute value of the gap `a - b`, in MKS units.
pub(crate) fn gap<Q: Quantity>(a: Q, b: Q) -> f64 {
    (a - b).number().abs()
}
