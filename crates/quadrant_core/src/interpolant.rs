//! Piecewise-linear interpolant over sorted control points.
//!
//! An [`Interpolant`] is built once, from explicit points, from a two-column
//! text source (see [`ingest`]), or adaptively from a function, and is
//! read-mostly afterwards. Outside its domain it extends the first and last
//! values as constants, both for evaluation and for integration.

pub mod algebra;
pub mod ingest;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{clamp_tolerance, NumError, Result};
use crate::integral::{QuadratureSettings, MIN_TOLERANCE};
use crate::interval::SubintervalStack;
use crate::traits::{gap, Integrand, Quantity};

pub use ingest::{read_points, write_points};

/// One anchor of an interpolant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint<I, D> {
    pub x: I,
    pub y: D,
}

impl<I, D> From<(I, D)> for ControlPoint<I, D> {
    fn from((x, y): (I, D)) -> Self {
        Self { x, y }
    }
}

/// Midpoints of each consecutive pair of points sorted by `x`.
/// Fewer than two points yield an empty list.
pub fn midpoints<I: Quantity, D: Quantity>(points: &[ControlPoint<I, D>]) -> Vec<ControlPoint<I, D>> {
    points
        .windows(2)
        .map(|w| ControlPoint {
            x: (w[0].x + w[1].x) * 0.5,
            y: (w[0].y + w[1].y) * 0.5,
        })
        .collect()
}

pub(crate) fn sort_points<I: Quantity, D>(points: &mut [ControlPoint<I, D>]) {
    points.sort_by(|p, q| p.x.number().total_cmp(&q.x.number()));
}

fn trapezoid<I, D>(p: &ControlPoint<I, D>, q: &ControlPoint<I, D>) -> D::Area
where
    I: Quantity,
    D: Integrand<I>,
{
    ((p.y + q.y) * 0.5).area_over(q.x - p.x)
}

/// Linear interpolant with a cached integral over its whole domain.
#[derive(Debug, Clone)]
pub struct Interpolant<I: Quantity, D: Integrand<I>> {
    points: Vec<ControlPoint<I, D>>,
    area: Option<D::Area>,
}

impl<I, D> Interpolant<I, D>
where
    I: Quantity,
    D: Integrand<I>,
{
    /// Builds from points in any order; they are sorted by `x` here.
    pub fn from_points(mut points: Vec<ControlPoint<I, D>>) -> Self {
        sort_points(&mut points);
        Self::from_sorted(points)
    }

    pub(crate) fn from_sorted(points: Vec<ControlPoint<I, D>>) -> Self {
        let area = points.first().map(|first| {
            let zero = first.y.area_over(first.x - first.x);
            points
                .windows(2)
                .fold(zero, |sum, w| sum + trapezoid(&w[0], &w[1]))
        });
        Self { points, area }
    }

    /// Samples `f` adaptively over `[a, b]` until linear interpolation
    /// between neighbouring samples meets the relative tolerance.
    ///
    /// Each interval stops being refined as soon as one of these holds,
    /// tested in this order:
    /// 1. the refined mean differs from the coarse mean by at most
    ///    `tolerance` times the refined mean;
    /// 2. that difference is at most `tolerance` times `|mean + refined|`;
    /// 3. the interval is no wider than `tolerance` times its midpoint;
    /// 4. its area is no more than `tolerance` times the area accepted so far.
    ///
    /// Every sampled midpoint becomes a control point. A non-positive
    /// tolerance fails; one below `1000 ε` is raised to that floor.
    pub fn from_fn<F>(mut f: F, a: I, b: I, settings: QuadratureSettings) -> Result<Self>
    where
        F: FnMut(I) -> D,
    {
        let tol = clamp_tolerance(settings.tolerance, MIN_TOLERANCE)?;
        let (lo, hi) = if b < a { (b, a) } else { (a, b) };

        let mut stack = SubintervalStack::new(settings.initial_samples, lo, hi, &mut f);
        let mut points: Vec<ControlPoint<I, D>> = stack
            .sample_points()
            .into_iter()
            .map(ControlPoint::from)
            .collect();
        let mut accumulated = 0.0_f64;
        let mut exhausted = 0_usize;

        while let Some(iv) = stack.pop() {
            let mid = iv.midpoint();
            let fmid = f(mid);
            points.push(ControlPoint { x: mid, y: fmid });

            let len = iv.width();
            let mean = (iv.fa + iv.fb) * 0.5;
            let rmean = (mean + fmid) * 0.5;
            let u1 = gap(mean, rmean);
            let ds = rmean.area_over(len).number();

            let accept = u1 <= tol * rmean.number().abs()
                || u1 <= tol * (mean + rmean).number().abs()
                || len.number() <= mid.number().abs() * tol
                || ds.abs() <= accumulated.abs() * tol;
            if accept {
                accumulated += ds;
                continue;
            }

            if !u1.is_finite() || mid.number() <= iv.a.number() || mid.number() >= iv.b.number() {
                exhausted += 1;
                accumulated += ds;
                continue;
            }

            let (left, right) = iv.split(mid, fmid);
            stack.push(left);
            stack.push(right);
        }

        if exhausted > 0 {
            warn!(
                intervals = exhausted,
                tolerance = tol,
                "Interpolant tolerance not met: floating-point precision exhausted"
            );
        }

        sort_points(&mut points);
        points.dedup_by(|p, q| p.x.number() == q.x.number());
        debug!(points = points.len(), "Adaptive interpolant built");
        Ok(Self::from_sorted(points))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Control points, sorted by `x`.
    pub fn points(&self) -> &[ControlPoint<I, D>] {
        &self.points
    }

    pub fn into_points(self) -> Vec<ControlPoint<I, D>> {
        self.points
    }

    /// First and last argument, if any point exists.
    pub fn domain(&self) -> Option<(I, I)> {
        Some((self.points.first()?.x, self.points.last()?.x))
    }

    pub fn eval(&self, x: I) -> Result<D> {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(NumError::EmptyInterpolant),
        };
        if self.points.len() == 1 || x <= first.x {
            return Ok(first.y);
        }
        if x >= last.x {
            return Ok(last.y);
        }
        // First point strictly right of `x`; clamped so NaN still indexes.
        let j = self
            .points
            .partition_point(|p| p.x <= x)
            .clamp(1, self.points.len() - 1);
        let (p, q) = (&self.points[j - 1], &self.points[j]);
        let t = (x - p.x).number() / (q.x - p.x).number();
        Ok(p.y + (q.y - p.y) * t)
    }

    /// Integral over the whole domain, computed at construction.
    /// A single point gives zero.
    pub fn integral(&self) -> Result<D::Area> {
        self.area.ok_or(NumError::EmptyInterpolant)
    }

    /// Integral from `x1` to `x2`, negative when `x2 < x1`.
    /// Needs at least two control points.
    pub fn integral_over(&self, x1: I, x2: I) -> Result<D::Area> {
        match self.points.len() {
            0 => return Err(NumError::EmptyInterpolant),
            1 => {
                return Err(NumError::InsufficientPoints {
                    required: 2,
                    found: 1,
                })
            }
            _ => {}
        }
        let (lo, hi, sign) = if x2 < x1 { (x2, x1, -1.0) } else { (x1, x2, 1.0) };

        let start = self.points.partition_point(|p| p.x <= lo);
        let end = self.points.partition_point(|p| p.x < hi).max(start);

        let mut prev = ControlPoint {
            x: lo,
            y: self.eval(lo)?,
        };
        let mut sum = prev.y.area_over(lo - lo);
        for p in &self.points[start..end] {
            sum = sum + trapezoid(&prev, p);
            prev = *p;
        }
        let tail = ControlPoint {
            x: hi,
            y: self.eval(hi)?,
        };
        Ok((sum + trapezoid(&prev, &tail)) * sign)
    }
}

impl<I, D> FromIterator<(I, D)> for Interpolant<I, D>
where
    I: Quantity,
    D: Integrand<I>,
{
    fn from_iter<T: IntoIterator<Item = (I, D)>>(iter: T) -> Self {
        Self::from_points(iter.into_iter().map(ControlPoint::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{meters, secs, Length, Time};
    use std::f64::consts::PI;

    fn parabola() -> Interpolant<f64, f64> {
        [(0.0, 0.0), (0.5, 0.25), (1.0, 1.0)].into_iter().collect()
    }

    #[test]
    fn clamps_outside_and_interpolates_inside() {
        let interp = parabola();
        assert_eq!(interp.eval(-3.0).unwrap(), 0.0);
        assert_eq!(interp.eval(0.0).unwrap(), 0.0);
        assert_eq!(interp.eval(1.0).unwrap(), 1.0);
        assert_eq!(interp.eval(7.0).unwrap(), 1.0);
        assert_eq!(interp.eval(0.5).unwrap(), 0.25);
        assert!((interp.eval(0.25).unwrap() - 0.125).abs() < 1e-15);
        assert!((interp.eval(0.75).unwrap() - 0.625).abs() < 1e-15);
    }

    #[test]
    fn cached_integral_matches_trapezoid_sum() {
        let interp = parabola();
        let cached = interp.integral().unwrap();
        assert!((cached - 0.375).abs() < 1e-15);
        let ranged = interp.integral_over(0.0, 1.0).unwrap();
        assert!((cached - ranged).abs() < 1e-15);
    }

    #[test]
    fn ranged_integral_is_sign_corrected_and_clamped() {
        let interp = parabola();
        let inner = interp.integral_over(0.25, 0.75).unwrap();
        // 0.25..0.5 under (0.125, 0.25), 0.5..0.75 under (0.25, 0.625)
        let expected = 0.25 * (0.125 + 0.25) / 2.0 + 0.25 * (0.25 + 0.625) / 2.0;
        assert!((inner - expected).abs() < 1e-15);
        assert_eq!(interp.integral_over(0.75, 0.25).unwrap(), -inner);

        // Constant extension of the last value beyond the domain.
        let beyond = interp.integral_over(1.0, 3.0).unwrap();
        assert!((beyond - 2.0).abs() < 1e-15);
    }

    #[test]
    fn out_of_order_points_are_sorted() {
        let interp: Interpolant<f64, f64> = [(2.0, 4.0), (1.0, 2.0)].into_iter().collect();
        assert_eq!(interp.domain(), Some((1.0, 2.0)));
        assert!((interp.eval(1.5).unwrap() - 3.0).abs() < 1e-15);
        assert!((interp.integral().unwrap() - 3.0).abs() < 1e-15);
        assert_eq!(
            interp.integral_over(1.0, 2.0).unwrap(),
            interp.integral().unwrap()
        );
    }

    #[test]
    fn degenerate_interpolants() {
        let empty: Interpolant<f64, f64> = Interpolant::from_points(Vec::new());
        assert!(matches!(empty.eval(0.0), Err(NumError::EmptyInterpolant)));
        assert!(matches!(empty.integral(), Err(NumError::EmptyInterpolant)));
        assert!(matches!(
            empty.integral_over(0.0, 1.0),
            Err(NumError::EmptyInterpolant)
        ));

        let single: Interpolant<f64, f64> = [(1.0, 5.0)].into_iter().collect();
        assert_eq!(single.eval(-10.0).unwrap(), 5.0);
        assert_eq!(single.eval(f64::NAN).unwrap(), 5.0);
        assert_eq!(single.integral().unwrap(), 0.0);
        assert!(matches!(
            single.integral_over(0.0, 2.0),
            Err(NumError::InsufficientPoints {
                required: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn dimensioned_points_integrate_to_product_dimension() {
        let interp: Interpolant<Time, Length> =
            [(secs(0.0), meters(0.0)), (secs(2.0), meters(4.0))]
                .into_iter()
                .collect();
        let area = interp.integral().unwrap();
        assert_eq!(area, secs(2.0) * meters(2.0));
        let at: Length = interp.eval(secs(0.5)).unwrap();
        assert_eq!(at, meters(1.0));
    }

    #[test]
    fn adaptive_construction_tracks_sine() {
        let interp =
            Interpolant::from_fn(f64::sin, 0.0, PI, QuadratureSettings::default()).unwrap();
        assert!(interp.len() > 16);
        assert_eq!(interp.domain(), Some((0.0, PI)));
        for k in 0..=30 {
            let x = PI * k as f64 / 30.0;
            let err = (interp.eval(x).unwrap() - x.sin()).abs();
            assert!(err < 1e-5, "error {err} at {x}");
        }
        assert!((interp.integral().unwrap() - 2.0).abs() < 1e-5);
        assert!(interp.points().windows(2).all(|w| w[0].x < w[1].x));
    }

    #[test]
    fn adaptive_construction_accepts_reversed_bounds() {
        let interp = Interpolant::from_fn(
            |x: f64| x * x,
            1.0,
            -1.0,
            QuadratureSettings::default(),
        )
        .unwrap();
        assert_eq!(interp.domain(), Some((-1.0, 1.0)));
        assert!((interp.integral().unwrap() - 2.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn nan_argument_stays_in_bounds() {
        let value = parabola().eval(f64::NAN).unwrap();
        assert!(value.is_nan() || (0.0..=1.0).contains(&value));
    }

    #[test]
    fn adaptive_construction_stops_at_a_pole() {
        // The interval touching the pole has a non-finite error and is
        // accepted unrefined; the infinite area then covers every other one.
        let interp = Interpolant::from_fn(
            |x: f64| 1.0 / x,
            0.0,
            1.0,
            QuadratureSettings {
                tolerance: 1e-12,
                initial_samples: 16,
            },
        )
        .unwrap();
        let step = 1.0 / 15.0;
        let near_pole = interp
            .points()
            .iter()
            .filter(|p| p.x > 0.0 && p.x < step)
            .count();
        assert_eq!(near_pole, 1);
        assert_eq!(interp.len(), 31);
        assert_eq!(interp.integral().unwrap(), f64::INFINITY);
    }

    #[test]
    fn adaptive_construction_rejects_negative_tolerance() {
        let settings = QuadratureSettings {
            tolerance: -1e-3,
            ..QuadratureSettings::default()
        };
        let result = Interpolant::from_fn(|x: f64| x, 0.0, 1.0, settings);
        assert!(matches!(result, Err(NumError::InvalidTolerance(t)) if t == -1e-3));
    }

    #[test]
    fn midpoints_of_consecutive_points() {
        let mids = midpoints(parabola().points());
        assert_eq!(
            mids,
            vec![
                ControlPoint { x: 0.25, y: 0.125 },
                ControlPoint { x: 0.75, y: 0.625 },
            ]
        );
        assert!(midpoints::<f64, f64>(&[ControlPoint { x: 1.0, y: 1.0 }]).is_empty());
    }
}
