//! Statically dimensioned value.
//!
//! The five dimension exponents are type-level integers, so adding a length
//! to a time does not compile, and the exponents of a product or quotient are
//! computed by the type checker. At run time a [`Dimval`] is a single `f64`.
//!
//! ```
//! use quadrant_core::units::{meters, secs, Velocity};
//!
//! let v: Velocity = meters(6.0) / secs(2.0);
//! assert_eq!(format!("{v}"), "[3 m s^-1]");
//! ```
//!
//! ```compile_fail
//! use quadrant_core::units::{METER, SECOND};
//!
//! let _ = METER + SECOND;
//! ```

use num_traits::{Inv, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use typenum::{Diff, Integer, Negate, PartialDiv, PartialQuot, Prod, Sum as TSum, P2, P3, Z0};

use crate::dim_exps::DimExps;
use crate::traits::Quantity;

/// Value whose dimension exponents (time, length, mass, charge, temperature)
/// are fixed at compile time. The coefficient is stored in MKS base units.
pub struct Dimval<Ti, L, M, C, Te> {
    value: f64,
    dims: PhantomData<fn() -> (Ti, L, M, C, Te)>,
}

/// Value with every exponent zero.
pub type Dimensionless = Dimval<Z0, Z0, Z0, Z0, Z0>;

impl<Ti, L, M, C, Te> Dimval<Ti, L, M, C, Te> {
    /// Wraps a coefficient already expressed in MKS base units.
    pub const fn from_mks(value: f64) -> Self {
        Self {
            value,
            dims: PhantomData,
        }
    }

    /// Coefficient in MKS base units.
    pub fn number(&self) -> f64 {
        self.value
    }

    pub fn abs(self) -> Self {
        Self::from_mks(self.value.abs())
    }

    /// Integer power; every exponent is multiplied by `E`.
    pub fn powi<E>(self) -> Dimval<Prod<Ti, E>, Prod<L, E>, Prod<M, E>, Prod<C, E>, Prod<Te, E>>
    where
        E: Integer,
        Ti: Mul<E>,
        L: Mul<E>,
        M: Mul<E>,
        C: Mul<E>,
        Te: Mul<E>,
    {
        Dimval::from_mks(self.value.powi(E::I32))
    }

    /// Integer root; does not compile unless `E` divides every exponent.
    pub fn root<E>(
        self,
    ) -> Dimval<
        PartialQuot<Ti, E>,
        PartialQuot<L, E>,
        PartialQuot<M, E>,
        PartialQuot<C, E>,
        PartialQuot<Te, E>,
    >
    where
        E: Integer,
        Ti: PartialDiv<E>,
        L: PartialDiv<E>,
        M: PartialDiv<E>,
        C: PartialDiv<E>,
        Te: PartialDiv<E>,
    {
        Dimval::from_mks(self.value.powf(1.0 / f64::from(E::I32)))
    }

    pub fn sqrt(
        self,
    ) -> Dimval<
        PartialQuot<Ti, P2>,
        PartialQuot<L, P2>,
        PartialQuot<M, P2>,
        PartialQuot<C, P2>,
        PartialQuot<Te, P2>,
    >
    where
        Ti: PartialDiv<P2>,
        L: PartialDiv<P2>,
        M: PartialDiv<P2>,
        C: PartialDiv<P2>,
        Te: PartialDiv<P2>,
    {
        self.root::<P2>()
    }

    pub fn cbrt(
        self,
    ) -> Dimval<
        PartialQuot<Ti, P3>,
        PartialQuot<L, P3>,
        PartialQuot<M, P3>,
        PartialQuot<C, P3>,
        PartialQuot<Te, P3>,
    >
    where
        Ti: PartialDiv<P3>,
        L: PartialDiv<P3>,
        M: PartialDiv<P3>,
        C: PartialDiv<P3>,
        Te: PartialDiv<P3>,
    {
        Dimval::from_mks(self.value.cbrt())
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> Dimval<Ti, L, M, C, Te> {
    /// Dimension exponents of this type.
    pub const EXPS: DimExps = DimExps::new(Ti::I8, L::I8, M::I8, C::I8, Te::I8);

    pub fn exps(&self) -> DimExps {
        Self::EXPS
    }
}

impl Dimensionless {
    pub fn value(self) -> f64 {
        self.value
    }
}

impl From<f64> for Dimensionless {
    fn from(value: f64) -> Self {
        Self::from_mks(value)
    }
}

impl From<Dimensionless> for f64 {
    fn from(value: Dimensionless) -> Self {
        value.value
    }
}

// Clone, Copy, and friends are written by hand so that they do not demand
// the same traits of the exponent markers.

impl<Ti, L, M, C, Te> Clone for Dimval<Ti, L, M, C, Te> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Ti, L, M, C, Te> Copy for Dimval<Ti, L, M, C, Te> {}

impl<Ti, L, M, C, Te> Default for Dimval<Ti, L, M, C, Te> {
    fn default() -> Self {
        Self::from_mks(0.0)
    }
}

impl<Ti, L, M, C, Te> PartialEq for Dimval<Ti, L, M, C, Te> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<Ti, L, M, C, Te> PartialOrd for Dimval<Ti, L, M, C, Te> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl<Ti, L, M, C, Te> Add for Dimval<Ti, L, M, C, Te> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::from_mks(self.value + rhs.value)
    }
}

impl<Ti, L, M, C, Te> Sub for Dimval<Ti, L, M, C, Te> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::from_mks(self.value - rhs.value)
    }
}

impl<Ti, L, M, C, Te> AddAssign for Dimval<Ti, L, M, C, Te> {
    fn add_assign(&mut self, rhs: Self) {
        self.value += rhs.value;
    }
}

impl<Ti, L, M, C, Te> SubAssign for Dimval<Ti, L, M, C, Te> {
    fn sub_assign(&mut self, rhs: Self) {
        self.value -= rhs.value;
    }
}

impl<Ti, L, M, C, Te> Neg for Dimval<Ti, L, M, C, Te> {
    type Output = Self;
    fn neg(self) -> Self {
        Self::from_mks(-self.value)
    }
}

impl<Ti, L, M, C, Te> Sum for Dimval<Ti, L, M, C, Te> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, v| acc + v)
    }
}

impl<Ti, L, M, C, Te> Zero for Dimval<Ti, L, M, C, Te> {
    fn zero() -> Self {
        Self::default()
    }
    fn is_zero(&self) -> bool {
        self.value == 0.0
    }
}

impl<Ti, L, M, C, Te, Ti2, L2, M2, C2, Te2> Mul<Dimval<Ti2, L2, M2, C2, Te2>>
    for Dimval<Ti, L, M, C, Te>
where
    Ti: Add<Ti2>,
    L: Add<L2>,
    M: Add<M2>,
    C: Add<C2>,
    Te: Add<Te2>,
{
    type Output = Dimval<TSum<Ti, Ti2>, TSum<L, L2>, TSum<M, M2>, TSum<C, C2>, TSum<Te, Te2>>;
    fn mul(self, rhs: Dimval<Ti2, L2, M2, C2, Te2>) -> Self::Output {
        Dimval::from_mks(self.value * rhs.value)
    }
}

impl<Ti, L, M, C, Te, Ti2, L2, M2, C2, Te2> Div<Dimval<Ti2, L2, M2, C2, Te2>>
    for Dimval<Ti, L, M, C, Te>
where
    Ti: Sub<Ti2>,
    L: Sub<L2>,
    M: Sub<M2>,
    C: Sub<C2>,
    Te: Sub<Te2>,
{
    type Output = Dimval<Diff<Ti, Ti2>, Diff<L, L2>, Diff<M, M2>, Diff<C, C2>, Diff<Te, Te2>>;
    fn div(self, rhs: Dimval<Ti2, L2, M2, C2, Te2>) -> Self::Output {
        Dimval::from_mks(self.value / rhs.value)
    }
}

impl<Ti, L, M, C, Te> Mul<f64> for Dimval<Ti, L, M, C, Te> {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::from_mks(self.value * s)
    }
}

impl<Ti, L, M, C, Te> Mul<Dimval<Ti, L, M, C, Te>> for f64 {
    type Output = Dimval<Ti, L, M, C, Te>;
    fn mul(self, dv: Dimval<Ti, L, M, C, Te>) -> Self::Output {
        Dimval::from_mks(self * dv.value)
    }
}

impl<Ti, L, M, C, Te> Div<f64> for Dimval<Ti, L, M, C, Te> {
    type Output = Self;
    fn div(self, s: f64) -> Self {
        Self::from_mks(self.value / s)
    }
}

impl<Ti, L, M, C, Te> Div<Dimval<Ti, L, M, C, Te>> for f64
where
    Ti: Neg,
    L: Neg,
    M: Neg,
    C: Neg,
    Te: Neg,
{
    type Output = Dimval<Negate<Ti>, Negate<L>, Negate<M>, Negate<C>, Negate<Te>>;
    fn div(self, dv: Dimval<Ti, L, M, C, Te>) -> Self::Output {
        Dimval::from_mks(self / dv.value)
    }
}

impl<Ti, L, M, C, Te> Inv for Dimval<Ti, L, M, C, Te>
where
    Ti: Neg,
    L: Neg,
    M: Neg,
    C: Neg,
    Te: Neg,
{
    type Output = Dimval<Negate<Ti>, Negate<L>, Negate<M>, Negate<C>, Negate<Te>>;
    fn inv(self) -> Self::Output {
        1.0 / self
    }
}

impl<Ti, L, M, C, Te> MulAssign<f64> for Dimval<Ti, L, M, C, Te> {
    fn mul_assign(&mut self, s: f64) {
        self.value *= s;
    }
}

impl<Ti, L, M, C, Te> DivAssign<f64> for Dimval<Ti, L, M, C, Te> {
    fn div_assign(&mut self, s: f64) {
        self.value /= s;
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> fmt::Display
    for Dimval<Ti, L, M, C, Te>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        fmt::Display::fmt(&self.value, f)?;
        Self::EXPS.write_units(f)?;
        write!(f, "]")
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> fmt::Debug
    for Dimval<Ti, L, M, C, Te>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dimval")
            .field("value", &self.value)
            .field("exps", &Self::EXPS)
            .finish()
    }
}

impl<Ti: Integer, L: Integer, M: Integer, C: Integer, Te: Integer> Quantity
    for Dimval<Ti, L, M, C, Te>
{
    fn number(&self) -> f64 {
        self.value
    }
}
