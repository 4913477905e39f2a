//! Named dimensions and unit constants.
//!
//! Every constant is the MKS coefficient of one unit, so `2.1 * FOOT`-style
//! expressions convert on construction and never afterwards.

use std::f64::consts::PI;
use typenum::{N1, N2, N3, P1, P2, P3, Z0};

use crate::dimval::Dimval;

pub use crate::dimval::Dimensionless;

pub type Time = Dimval<P1, Z0, Z0, Z0, Z0>;
pub type Length = Dimval<Z0, P1, Z0, Z0, Z0>;
pub type Mass = Dimval<Z0, Z0, P1, Z0, Z0>;
pub type Charge = Dimval<Z0, Z0, Z0, P1, Z0>;
pub type Temperature = Dimval<Z0, Z0, Z0, Z0, P1>;
pub type Area = Dimval<Z0, P2, Z0, Z0, Z0>;
pub type Volume = Dimval<Z0, P3, Z0, Z0, Z0>;
pub type Frequency = Dimval<N1, Z0, Z0, Z0, Z0>;
pub type Velocity = Dimval<N1, P1, Z0, Z0, Z0>;
pub type Acceleration = Dimval<N2, P1, Z0, Z0, Z0>;
pub type Momentum = Dimval<N1, P1, P1, Z0, Z0>;
pub type Force = Dimval<N2, P1, P1, Z0, Z0>;
pub type Energy = Dimval<N2, P2, P1, Z0, Z0>;
pub type Power = Dimval<N3, P2, P1, Z0, Z0>;
pub type Current = Dimval<N1, Z0, Z0, P1, Z0>;
pub type Density = Dimval<Z0, N3, P1, Z0, Z0>;

pub const SECOND: Time = Time::from_mks(1.0);
pub const MILLISECOND: Time = Time::from_mks(1.0e-3);
pub const MICROSECOND: Time = Time::from_mks(1.0e-6);
pub const NANOSECOND: Time = Time::from_mks(1.0e-9);

pub const METER: Length = Length::from_mks(1.0);
pub const KILOMETER: Length = Length::from_mks(1.0e3);
pub const CENTIMETER: Length = Length::from_mks(1.0e-2);
pub const MILLIMETER: Length = Length::from_mks(1.0e-3);
pub const MICROMETER: Length = Length::from_mks(1.0e-6);
pub const NANOMETER: Length = Length::from_mks(1.0e-9);
pub const ANGSTROM: Length = Length::from_mks(1.0e-10);
pub const FOOT: Length = Length::from_mks(0.3048);

pub const KILOGRAM: Mass = Mass::from_mks(1.0);
pub const GRAM: Mass = Mass::from_mks(1.0e-3);

pub const COULOMB: Charge = Charge::from_mks(1.0);
pub const KELVIN: Temperature = Temperature::from_mks(1.0);

pub const NEWTON: Force = Force::from_mks(1.0);
pub const DYNE: Force = Force::from_mks(1.0e-5);
pub const JOULE: Energy = Energy::from_mks(1.0);
pub const ERG: Energy = Energy::from_mks(1.0e-7);
pub const WATT: Power = Power::from_mks(1.0);
pub const AMPERE: Current = Current::from_mks(1.0);

/// Standard acceleration of gravity.
pub const GEE: Acceleration = Acceleration::from_mks(9.80665);

/// One degree of arc, in radians.
pub const DEG: f64 = PI / 180.0;
pub const ARCMIN: f64 = DEG / 60.0;
pub const ARCSEC: f64 = ARCMIN / 60.0;

pub fn degs(n: f64) -> f64 {
    n * DEG
}

pub fn arcmins(n: f64) -> f64 {
    n * ARCMIN
}

pub fn arcsecs(n: f64) -> f64 {
    n * ARCSEC
}

pub fn secs(n: f64) -> Time {
    n * SECOND
}

pub fn millisecs(n: f64) -> Time {
    n * MILLISECOND
}

pub fn meters(n: f64) -> Length {
    n * METER
}

pub fn kilometers(n: f64) -> Length {
    n * KILOMETER
}

pub fn centimeters(n: f64) -> Length {
    n * CENTIMETER
}

pub fn millimeters(n: f64) -> Length {
    n * MILLIMETER
}

pub fn kilograms(n: f64) -> Mass {
    n * KILOGRAM
}

pub fn grams(n: f64) -> Mass {
    n * GRAM
}

pub fn coulombs(n: f64) -> Charge {
    n * COULOMB
}

pub fn kelvins(n: f64) -> Temperature {
    n * KELVIN
}

pub fn newtons(n: f64) -> Force {
    n * NEWTON
}

pub fn joules(n: f64) -> Energy {
    n * JOULE
}
