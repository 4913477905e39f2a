//! Dynamically dimensioned value.
//!
//! [`DynDim`] carries its [`DimExps`] at run time, for contexts that cannot
//! fix a dimension at compile time (containers of mixed units, units chosen by
//! an input file). Every [`Dimval`] converts into a [`DynDim`]; going back is
//! checked.
//!
//! Operators panic when the dimensions of the operands disagree, with the
//! message of [`NumError::DimensionMismatch`]. Use the `try_*` methods to get
//! the error as a value instead.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use typenum::Integer;

use crate::dim_exps::DimExps;
use crate::dimval::Dimval;
use crate::error::{NumError, Result};
use crate::traits::Quantity;

/// Value whose dimension is known only at run time. The coefficient is stored
/// in MKS base units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DynDim {
    value: f64,
    exps: DimExps,
}

impl DynDim {
    pub const fn new(value: f64, exps: DimExps) -> Self {
        Self { value, exps }
    }

    pub fn dimensionless(value: f64) -> Self {
        Self::new(value, DimExps::NONE)
    }

    pub fn number(&self) -> f64 {
        self.value
    }

    pub fn exps(&self) -> DimExps {
        self.exps
    }

    fn check(&self, other: DimExps) -> Result<()> {
        if self.exps != other {
            return Err(NumError::DimensionMismatch {
                expected: self.exps,
                found: other,
            });
        }
        Ok(())
    }

    pub fn try_add(self, rhs: Self) -> Result<Self> {
        self.check(rhs.exps)?;
        Ok(Self::new(self.value + rhs.value, self.exps))
    }

    pub fn try_sub(self, rhs: Self) -> Result<Self> {
        self.check(rhs.exps)?;
        Ok(Self::new(self.value - rhs.value, self.exps))
    }

    /// Orders two values of the same dimension.
    ///
    /// Fails on a dimension mismatch; `Ok(None)` when either coefficient is
    /// NaN.
    pub fn try_cmp(&self, other: &Self) -> Result<Option<Ordering>> {
        self.check(other.exps)?;
        Ok(self.value.partial_cmp(&other.value))
    }

    pub fn abs(self) -> Self {
        Self::new(self.value.abs(), self.exps)
    }

    pub fn recip(self) -> Self {
        Self::new(1.0 / self.value, self.exps.recip())
    }

    /// Product with dimensions added; fails if an exponent overflows.
    pub fn try_mul(self, rhs: Self) -> Result<Self> {
        Ok(Self::new(self.value * rhs.value, self.exps.checked_add(rhs.exps)?))
    }

    pub fn try_div(self, rhs: Self) -> Result<Self> {
        Ok(Self::new(self.value / rhs.value, self.exps.checked_sub(rhs.exps)?))
    }

    /// Integer power; every exponent is multiplied by `e`. Fails if an
    /// exponent leaves the representable range.
    pub fn powi(self, e: i32) -> Result<Self> {
        Ok(Self::new(self.value.powi(e), self.exps.checked_pow(e)?))
    }

    /// Integer root; fails unless `r` is positive and divides every exponent.
    pub fn root(self, r: i32) -> Result<Self> {
        let exps = self.exps.root(r)?;
        Ok(Self::new(self.value.powf(1.0 / f64::from(r)), exps))
    }

    pub fn sqrt(self) -> Result<Self> {
        self.root(2)
    }

    /// Converts to a statically dimensioned value, failing if the exponents
    /// differ from those of the target type.
    pub fn to_static<Ti, L, M, C, Te>(self) -> Result<Dimval<Ti, L, M, C, Te>>
    where
        Ti: Integer,
        L: Integer,
        M: Integer,
        C: Integer,
        Te: Integer,
    {
        self.check(Dimval::<Ti, L, M, C, Te>::EXPS)?;
        Ok(Dimval::from_mks(self.value))
    }

    fn expect_same(&self, other: DimExps) {
        if let Err(err) = self.check(other) {
            panic!("{err}");
        }
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> From<Dimval<Ti, L, M, C, Te>>
    for DynDim
{
    fn from(dv: Dimval<Ti, L, M, C, Te>) -> Self {
        Self::new(dv.number(), Dimval::<Ti, L, M, C, Te>::EXPS)
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> TryFrom<DynDim>
    for Dimval<Ti, L, M, C, Te>
{
    type Error = NumError;
    fn try_from(dd: DynDim) -> Result<Self> {
        dd.to_static()
    }
}

impl From<f64> for DynDim {
    fn from(value: f64) -> Self {
        Self::dimensionless(value)
    }
}

impl PartialEq for DynDim {
    /// Panics when the dimensions differ.
    fn eq(&self, other: &Self) -> bool {
        self.expect_same(other.exps);
        self.value == other.value
    }
}

impl PartialOrd for DynDim {
    /// Panics when the dimensions differ.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.expect_same(other.exps);
        self.value.partial_cmp(&other.value)
    }
}

impl Add for DynDim {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.expect_same(rhs.exps);
        Self::new(self.value + rhs.value, self.exps)
    }
}

impl Sub for DynDim {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.expect_same(rhs.exps);
        Self::new(self.value - rhs.value, self.exps)
    }
}

impl AddAssign for DynDim {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for DynDim {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for DynDim {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.value, self.exps)
    }
}

impl Mul for DynDim {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.value * rhs.value, self.exps + rhs.exps)
    }
}

impl Div for DynDim {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(self.value / rhs.value, self.exps - rhs.exps)
    }
}

impl Mul<f64> for DynDim {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::new(self.value * s, self.exps)
    }
}

impl Mul<DynDim> for f64 {
    type Output = DynDim;
    fn mul(self, dd: DynDim) -> DynDim {
        DynDim::new(self * dd.value, dd.exps)
    }
}

impl Div<f64> for DynDim {
    type Output = Self;
    fn div(self, s: f64) -> Self {
        Self::new(self.value / s, self.exps)
    }
}

impl Div<DynDim> for f64 {
    type Output = DynDim;
    fn div(self, dd: DynDim) -> DynDim {
        DynDim::new(self / dd.value, dd.exps.recip())
    }
}

impl MulAssign<f64> for DynDim {
    fn mul_assign(&mut self, s: f64) {
        self.value *= s;
    }
}

impl DivAssign<f64> for DynDim {
    fn div_assign(&mut self, s: f64) {
        self.value /= s;
    }
}

impl MulAssign for DynDim {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for DynDim {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

// Mixed static/dynamic arithmetic: the static operand is lifted, and the
// dynamic exponents are checked against it where the dimension must agree.

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> Add<Dimval<Ti, L, M, C, Te>>
    for DynDim
{
    type Output = DynDim;
    fn add(self, rhs: Dimval<Ti, L, M, C, Te>) -> DynDim {
        self + DynDim::from(rhs)
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> Add<DynDim>
    for Dimval<Ti, L, M, C, Te>
{
    type Output = DynDim;
    fn add(self, rhs: DynDim) -> DynDim {
        DynDim::from(self) + rhs
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> Sub<Dimval<Ti, L, M, C, Te>>
    for DynDim
{
    type Output = DynDim;
    fn sub(self, rhs: Dimval<Ti, L, M, C, Te>) -> DynDim {
        self - DynDim::from(rhs)
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> Sub<DynDim>
    for Dimval<Ti, L, M, C, Te>
{
    type Output = DynDim;
    fn sub(self, rhs: DynDim) -> DynDim {
        DynDim::from(self) - rhs
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> Mul<Dimval<Ti, L, M, C, Te>>
    for DynDim
{
    type Output = DynDim;
    fn mul(self, rhs: Dimval<Ti, L, M, C, Te>) -> DynDim {
        self * DynDim::from(rhs)
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> Mul<DynDim>
    for Dimval<Ti, L, M, C, Te>
{
    type Output = DynDim;
    fn mul(self, rhs: DynDim) -> DynDim {
        DynDim::from(self) * rhs
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> Div<Dimval<Ti, L, M, C, Te>>
    for DynDim
{
    type Output = DynDim;
    fn div(self, rhs: Dimval<Ti, L, M, C, Te>) -> DynDim {
        self / DynDim::from(rhs)
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> Div<DynDim>
    for Dimval<Ti, L, M, C, Te>
{
    type Output = DynDim;
    fn div(self, rhs: DynDim) -> DynDim {
        DynDim::from(self) / rhs
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer>
    PartialEq<Dimval<Ti, L, M, C, Te>> for DynDim
{
    /// Panics when the dimensions differ.
    fn eq(&self, other: &Dimval<Ti, L, M, C, Te>) -> bool {
        *self == DynDim::from(*other)
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> PartialEq<DynDim>
    for Dimval<Ti, L, M, C, Te>
{
    /// Panics when the dimensions differ.
    fn eq(&self, other: &DynDim) -> bool {
        DynDim::from(*self) == *other
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer>
    PartialOrd<Dimval<Ti, L, M, C, Te>> for DynDim
{
    /// Panics when the dimensions differ.
    fn partial_cmp(&self, other: &Dimval<Ti, L, M, C, Te>) -> Option<Ordering> {
        self.partial_cmp(&DynDim::from(*other))
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> PartialOrd<DynDim>
    for Dimval<Ti, L, M, C, Te>
{
    /// Panics when the dimensions differ.
    fn partial_cmp(&self, other: &DynDim) -> Option<Ordering> {
        DynDim::from(*self).partial_cmp(other)
    }
}

impl fmt::Display for DynDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        fmt::Display::fmt(&self.value, f)?;
        self.exps.write_units(f)?;
        write!(f, "]")
    }
}

impl Quantity for DynDim {
    fn number(&self) -> f64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{meters, secs, Force, Length, Time, KILOGRAM, METER, SECOND};

    fn length(v: f64) -> DynDim {
        DynDim::from(meters(v))
    }

    #[test]
    fn static_values_convert_with_their_exponents() {
        let dd = DynDim::from(meters(2.5));
        assert_eq!(dd.exps(), Length::EXPS);
        assert_eq!(dd.number(), 2.5);

        let back: Length = dd.to_static().expect("same dimension");
        assert_eq!(back, meters(2.5));
        let back: Length = Length::try_from(dd).expect("same dimension");
        assert_eq!(back, meters(2.5));
    }

    #[test]
    fn conversion_to_wrong_static_type_fails() {
        let err = DynDim::from(meters(1.0))
            .to_static::<typenum::P1, typenum::Z0, typenum::Z0, typenum::Z0, typenum::Z0>()
            .expect_err("length is not time");
        assert!(matches!(err, NumError::DimensionMismatch { .. }));
        assert!(Time::try_from(length(1.0)).is_err());
    }

    #[test]
    fn addition_inverts_subtraction() {
        let x = length(4.0);
        let y = length(-1.5);
        assert_eq!(x + y - y, x);
        assert_eq!(x.try_add(y).unwrap().try_sub(y).unwrap(), x);
    }

    #[test]
    fn checked_operations_report_mismatch() {
        let t = DynDim::from(secs(1.0));
        let x = length(1.0);
        let err = x.try_add(t).expect_err("mismatch");
        let message = format!("{err}");
        assert!(message.contains("Dimension mismatch"), "got {message}");
        assert!(x.try_sub(t).is_err());
        assert!(x.try_cmp(&t).is_err());
        assert_eq!(x.try_cmp(&length(2.0)).unwrap(), Some(Ordering::Less));
    }

    #[test]
    #[should_panic(expected = "Dimension mismatch")]
    fn operator_addition_panics_on_mismatch() {
        let _ = length(1.0) + DynDim::from(secs(1.0));
    }

    #[test]
    #[should_panic(expected = "Dimension mismatch")]
    fn comparison_panics_on_mismatch() {
        let _ = length(1.0) < DynDim::from(secs(1.0));
    }

    #[test]
    fn products_add_exponents() {
        let x = length(3.0);
        let t = DynDim::from(secs(2.0));
        let v = x / t;
        assert_eq!(v.exps(), DimExps::new(-1, 1, 0, 0, 0));
        assert_eq!(v.number(), 1.5);
        assert_eq!((x * t).exps(), Length::EXPS + Time::EXPS);
        assert_eq!((2.0 / t).exps(), DimExps::new(-1, 0, 0, 0, 0));
        assert_eq!(t.recip().number(), 0.5);
    }

    #[test]
    fn mixed_static_dynamic_arithmetic_checks_at_run_time() {
        let x = length(1.0);
        assert_eq!((x + METER).number(), 2.0);
        assert_eq!((METER + x).number(), 2.0);
        assert_eq!((METER - x).number(), 0.0);

        let force: Force = 3.0 * KILOGRAM * METER / (SECOND * SECOND);
        let product = DynDim::from(secs(1.0)) * force;
        assert_eq!(product.exps(), DimExps::new(-1, 1, 1, 0, 0));
        assert_eq!((force / x).exps(), DimExps::new(-2, 0, 1, 0, 0));
    }

    #[test]
    #[should_panic(expected = "Dimension mismatch")]
    fn mixed_addition_panics_on_mismatch() {
        let _ = DynDim::from(secs(1.0)) + METER;
    }

    #[test]
    fn powers_and_roots() {
        let area = length(3.0).powi(2).unwrap();
        assert_eq!(area.exps(), DimExps::new(0, 2, 0, 0, 0));
        let side = area.sqrt().expect("even exponents");
        assert!((side.number() - 3.0).abs() < 1e-12);
        assert_eq!(side.exps(), Length::EXPS);

        let err = length(8.0).root(3).expect_err("length has no cube root");
        assert!(matches!(err, NumError::InvalidExponentOperation { .. }));
        assert!(area.root(0).is_err());
    }

    #[test]
    fn scalar_operations_keep_dimension() {
        let mut x = length(2.0);
        x *= 3.0;
        x /= 2.0;
        assert_eq!(x, length(3.0));
        assert_eq!((-x).abs(), x);
        assert_eq!((2.0 * x).exps(), Length::EXPS);
    }

    #[test]
    fn display_matches_static_form() {
        let force: Force = 3.0 * KILOGRAM * METER / (SECOND * SECOND);
        assert_eq!(format!("{}", DynDim::from(force)), "[3 kg m s^-2]");
        assert_eq!(format!("{}", DynDim::dimensionless(0.5)), "[0.5]");
    }

    #[test]
    fn exponent_overflow_is_an_error() {
        let err = length(1.0).powi(200).expect_err("length^200 is out of range");
        assert!(matches!(err, NumError::InvalidExponentOperation { .. }));
        assert!(err.to_string().contains("length exponent"));
        assert_eq!(length(1.0).powi(127).unwrap().exps().length, 127);

        let big = length(2.0).powi(100).unwrap();
        assert!(big.try_mul(big).is_err());
        assert!(big.try_div(big.recip()).is_err());
        assert_eq!(big.try_div(big).unwrap(), DynDim::dimensionless(1.0));
    }

    #[test]
    fn mixed_static_dynamic_comparisons() {
        let x = length(2.0);
        assert!(x == meters(2.0));
        assert!(meters(2.0) == x);
        assert!(x > METER);
        assert!(METER < x);
        assert!(meters(3.0) >= x);
        assert_eq!(x.partial_cmp(&meters(2.0)), Some(Ordering::Equal));
    }

    #[test]
    #[should_panic(expected = "Dimension mismatch")]
    fn mixed_comparison_panics_on_mismatch() {
        let _ = DynDim::from(secs(1.0)) < METER;
    }
}
