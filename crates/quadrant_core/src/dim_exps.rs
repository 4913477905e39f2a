//! Five-exponent dimension signature (time, length, mass, charge,
//! temperature).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::error::{NumError, Result};

/// Exponents of the base dimensions of a quantity.
///
/// Multiplying two quantities adds their exponents, dividing subtracts them,
/// an integer power scales them, and an integer root divides them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimExps {
    pub time: i8,
    pub length: i8,
    pub mass: i8,
    pub charge: i8,
    pub temperature: i8,
}

impl DimExps {
    pub const NONE: DimExps = DimExps::new(0, 0, 0, 0, 0);

    pub const fn new(time: i8, length: i8, mass: i8, charge: i8, temperature: i8) -> Self {
        Self {
            time,
            length,
            mass,
            charge,
            temperature,
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == Self::NONE
    }

    fn axes(self) -> [(&'static str, i8); 5] {
        [
            ("time", self.time),
            ("length", self.length),
            ("mass", self.mass),
            ("charge", self.charge),
            ("temperature", self.temperature),
        ]
    }

    /// Applies `op` along every axis, failing if a result leaves the `i8`
    /// exponent range.
    fn try_zip(self, other: Self, what: &str, op: impl Fn(i32, i32) -> i32) -> Result<Self> {
        let mut out = [0_i8; 5];
        let pairs = self.axes().into_iter().zip(other.axes());
        for (slot, ((axis, a), (_, b))) in out.iter_mut().zip(pairs) {
            let exp = op(i32::from(a), i32::from(b));
            *slot = i8::try_from(exp).map_err(|_| NumError::InvalidExponentOperation {
                reason: format!("{what} overflows the {axis} exponent ({exp})"),
            })?;
        }
        let [time, length, mass, charge, temperature] = out;
        Ok(Self::new(time, length, mass, charge, temperature))
    }

    /// Exponents of a product of quantities.
    pub fn checked_add(self, rhs: Self) -> Result<Self> {
        self.try_zip(rhs, "product", |a, b| a + b)
    }

    /// Exponents of a quotient of quantities.
    pub fn checked_sub(self, rhs: Self) -> Result<Self> {
        self.try_zip(rhs, "quotient", |a, b| a - b)
    }

    /// Exponents of the `p`-th power of the quantity.
    pub fn checked_pow(self, p: i32) -> Result<Self> {
        self.try_zip(Self::NONE, &format!("power {p}"), |a, _| a.saturating_mul(p))
    }

    /// Exponents of the reciprocal quantity.
    pub fn recip(self) -> Self {
        -self
    }

    /// Exponents of the `r`-th root of the quantity.
    ///
    /// Fails unless `r` is positive and divides every exponent evenly.
    pub fn root(self, r: i32) -> Result<Self> {
        if r <= 0 {
            return Err(NumError::InvalidExponentOperation {
                reason: format!("root of degree {r} is not positive"),
            });
        }
        for (axis, exp) in self.axes() {
            if i32::from(exp) % r != 0 {
                return Err(NumError::InvalidExponentOperation {
                    reason: format!("illegal root of degree {r} along {axis} (exponent {exp})"),
                });
            }
        }
        self.try_zip(Self::NONE, "root", |e, _| e / r)
    }

    /// Writes each nonzero exponent as ` symbol` or ` symbol^exp`.
    pub(crate) fn write_units(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens = [
            ("kg", self.mass),
            ("m", self.length),
            ("s", self.time),
            ("C", self.charge),
            ("K", self.temperature),
        ];
        for (symbol, exp) in tokens {
            match exp {
                0 => {}
                1 => write!(f, " {symbol}")?,
                e => write!(f, " {symbol}^{e}")?,
            }
        }
        Ok(())
    }
}

impl Add for DimExps {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.checked_add(rhs).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl Sub for DimExps {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.checked_sub(rhs).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl AddAssign for DimExps {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for DimExps {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for DimExps {
    type Output = Self;
    fn neg(self) -> Self {
        Self::NONE - self
    }
}

/// Exponents of an integer power of the quantity.
impl Mul<i32> for DimExps {
    type Output = Self;
    fn mul(self, p: i32) -> Self {
        self.checked_pow(p).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl fmt::Display for DimExps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return write!(f, "1");
        }
        // Drop the leading space that write_units puts before every token.
        let rendered = format!("{}", Units(self));
        write!(f, "{}", rendered.trim_start())
    }
}

struct Units<'a>(&'a DimExps);

impl fmt::Display for Units<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write_units(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORCE: DimExps = DimExps::new(-2, 1, 1, 0, 0);

    #[test]
    fn arithmetic_is_componentwise() {
        let velocity = DimExps::new(-1, 1, 0, 0, 0);
        let time = DimExps::new(1, 0, 0, 0, 0);
        assert_eq!(velocity + time, DimExps::new(0, 1, 0, 0, 0));
        assert_eq!(velocity - time, DimExps::new(-2, 1, 0, 0, 0));
        assert_eq!(velocity * 3, DimExps::new(-3, 3, 0, 0, 0));
        assert_eq!(-velocity, DimExps::new(1, -1, 0, 0, 0));

        let mut acc = velocity;
        acc += time;
        acc -= time;
        assert_eq!(acc, velocity);
    }

    #[test]
    fn root_divides_even_exponents() {
        let area = DimExps::new(0, 2, 0, 0, 0);
        assert_eq!(area.root(2).unwrap(), DimExps::new(0, 1, 0, 0, 0));
        assert_eq!(DimExps::NONE.root(7).unwrap(), DimExps::NONE);
    }

    #[test]
    fn root_rejects_bad_degree_and_odd_exponent() {
        let err = FORCE.root(2).expect_err("force has no square root");
        assert!(format!("{err}").contains("along length"));
        assert!(matches!(
            FORCE.root(0),
            Err(NumError::InvalidExponentOperation { .. })
        ));
        assert!(FORCE.root(-3).is_err());
    }

    #[test]
    fn display_orders_mass_length_time_charge_temperature() {
        assert_eq!(format!("{FORCE}"), "kg m s^-2");
        assert_eq!(format!("{}", DimExps::new(1, 0, 0, 1, -1)), "s C K^-1");
        assert_eq!(format!("{}", DimExps::NONE), "1");
    }

    #[test]
    fn exponent_overflow_is_reported() {
        let length = DimExps::new(0, 1, 0, 0, 0);
        assert_eq!(length.checked_pow(127).unwrap().length, 127);
        let err = length.checked_pow(200).unwrap_err();
        assert!(err.to_string().contains("power 200 overflows the length exponent (200)"));

        let heavy = DimExps::new(0, 0, 100, 0, 0);
        assert!(matches!(
            heavy.checked_add(heavy),
            Err(NumError::InvalidExponentOperation { .. })
        ));
        assert_eq!(heavy.checked_sub(heavy).unwrap(), DimExps::NONE);
        assert!(DimExps::new(-128, 0, 0, 0, 0).checked_pow(-1).is_err());
    }

    #[test]
    #[should_panic(expected = "overflows the mass exponent")]
    fn overflowing_product_operator_panics() {
        let heavy = DimExps::new(0, 0, 100, 0, 0);
        let _ = heavy + heavy;
    }
}
