//! Scaling of one interpolant and pointwise product/quotient of two.

use std::ops::{Div, DivAssign, Mul, MulAssign};

use super::{ControlPoint, Interpolant};
use crate::error::{NumError, Result};
use crate::traits::{Integrand, Product, Quantity, Ratio};

impl<I, D> Interpolant<I, D>
where
    I: Quantity,
    D: Integrand<I>,
{
    /// Multiplies every value by a quantity, changing the value dimension.
    pub fn scaled_by<S>(&self, factor: S) -> Interpolant<I, Product<D, S>>
    where
        S: Copy,
        D: Mul<S>,
        Product<D, S>: Integrand<I>,
    {
        let points = self
            .points
            .iter()
            .map(|p| ControlPoint {
                x: p.x,
                y: p.y * factor,
            })
            .collect();
        Interpolant::from_sorted(points)
    }

    /// Pointwise product with `other` over the merged control points.
    ///
    /// At every argument of either operand, that operand's value is combined
    /// with the other's interpolated value. Where both have a point at the
    /// same argument the result gets a single point.
    pub fn product<E>(&self, other: &Interpolant<I, E>) -> Result<Interpolant<I, Product<D, E>>>
    where
        E: Integrand<I>,
        D: Mul<E>,
        Product<D, E>: Integrand<I>,
    {
        merge(self, other, |y, z| y * z)
    }

    /// Pointwise quotient by `other`, merged as in [`Interpolant::product`].
    pub fn quotient<E>(&self, other: &Interpolant<I, E>) -> Result<Interpolant<I, Ratio<D, E>>>
    where
        E: Integrand<I>,
        D: Div<E>,
        Ratio<D, E>: Integrand<I>,
    {
        merge(self, other, |y, z| y / z)
    }
}

fn merge<I, D, E, O>(
    left: &Interpolant<I, D>,
    right: &Interpolant<I, E>,
    combine: impl Fn(D, E) -> O,
) -> Result<Interpolant<I, O>>
where
    I: Quantity,
    D: Integrand<I>,
    E: Integrand<I>,
    O: Integrand<I>,
{
    if left.is_empty() || right.is_empty() {
        return Err(NumError::EmptyInterpolant);
    }
    let (a, b) = (left.points(), right.points());
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    loop {
        let point = match (a.get(i), b.get(j)) {
            (Some(p), Some(q)) if q.x < p.x => {
                j += 1;
                ControlPoint {
                    x: q.x,
                    y: combine(left.eval(q.x)?, q.y),
                }
            }
            (Some(p), Some(q)) => {
                i += 1;
                // Equal arguments collapse onto the left operand's point.
                let y = if p.x < q.x {
                    right.eval(p.x)?
                } else {
                    j += 1;
                    q.y
                };
                ControlPoint {
                    x: p.x,
                    y: combine(p.y, y),
                }
            }
            (Some(p), None) => {
                i += 1;
                ControlPoint {
                    x: p.x,
                    y: combine(p.y, right.eval(p.x)?),
                }
            }
            (None, Some(q)) => {
                j += 1;
                ControlPoint {
                    x: q.x,
                    y: combine(left.eval(q.x)?, q.y),
                }
            }
            (None, None) => break,
        };
        merged.push(point);
    }
    Ok(Interpolant::from_sorted(merged))
}

impl<I, D> MulAssign<f64> for Interpolant<I, D>
where
    I: Quantity,
    D: Integrand<I>,
{
    fn mul_assign(&mut self, factor: f64) {
        for p in &mut self.points {
            p.y = p.y * factor;
        }
        self.area = self.area.map(|a| a * factor);
    }
}

impl<I, D> DivAssign<f64> for Interpolant<I, D>
where
    I: Quantity,
    D: Integrand<I>,
{
    fn div_assign(&mut self, divisor: f64) {
        for p in &mut self.points {
            p.y = p.y / divisor;
        }
        self.area = self.area.map(|a| a / divisor);
    }
}

impl<I, D> Mul<f64> for Interpolant<I, D>
where
    I: Quantity,
    D: Integrand<I>,
{
    type Output = Self;

    fn mul(mut self, factor: f64) -> Self {
        self *= factor;
        self
    }
}

impl<I, D> Div<f64> for Interpolant<I, D>
where
    I: Quantity,
    D: Integrand<I>,
{
    type Output = Self;

    fn div(mut self, divisor: f64) -> Self {
        self /= divisor;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{meters, secs, Length, Time, Velocity};

    fn line() -> Interpolant<f64, f64> {
        [(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)].into_iter().collect()
    }

    fn ramp() -> Interpolant<f64, f64> {
        [(0.5, 2.0), (1.0, 4.0), (3.0, 4.0)].into_iter().collect()
    }

    #[test]
    fn scalar_scaling_rescales_values_and_integral() {
        let base = line();
        let doubled = base.clone() * 2.0;
        assert_eq!(doubled.eval(0.5).unwrap(), 4.0);
        assert_eq!(doubled.integral().unwrap(), 2.0 * base.integral().unwrap());

        let mut halved = base.clone();
        halved /= 2.0;
        assert_eq!(halved.eval(2.0).unwrap(), 2.5);
        assert_eq!((base / 4.0).integral().unwrap(), 1.5);
    }

    #[test]
    fn product_matches_pointwise_values_at_shared_arguments() {
        let (a, b) = (line(), ramp());
        let prod = a.product(&b).unwrap();
        let xs: Vec<f64> = prod.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 0.5, 1.0, 2.0, 3.0]);
        for x in [0.5, 1.0, 2.0] {
            let expected = a.eval(x).unwrap() * b.eval(x).unwrap();
            assert!((prod.eval(x).unwrap() - expected).abs() < 1e-14);
        }
    }

    #[test]
    fn quotient_divides_pointwise() {
        let quot = line().quotient(&ramp()).unwrap();
        assert_eq!(quot.eval(1.0).unwrap(), 0.75);
        assert_eq!(quot.eval(3.0).unwrap(), 5.0 / 4.0);
        assert_eq!(quot.eval(0.0).unwrap(), 0.5);
    }

    #[test]
    fn dimensioned_quotient_has_ratio_dimension() {
        let distance: Interpolant<f64, Length> =
            [(0.0, meters(0.0)), (1.0, meters(10.0))].into_iter().collect();
        let elapsed: Interpolant<f64, Time> =
            [(0.0, secs(1.0)), (1.0, secs(2.0))].into_iter().collect();
        let speed: Interpolant<f64, Velocity> = distance.quotient(&elapsed).unwrap();
        assert_eq!(speed.eval(1.0).unwrap(), meters(5.0) / secs(1.0));

        let stretched: Interpolant<f64, _> = elapsed.scaled_by(meters(3.0));
        assert_eq!(stretched.eval(0.0).unwrap(), secs(3.0) * meters(1.0));
    }

    #[test]
    fn merging_with_empty_operand_fails() {
        let empty: Interpolant<f64, f64> = Interpolant::from_points(Vec::new());
        assert!(matches!(line().product(&empty), Err(NumError::EmptyInterpolant)));
        assert!(matches!(empty.quotient(&line()), Err(NumError::EmptyInterpolant)));
    }
}
