//! Adaptive trapezoid quadrature.
//!
//! The domain is seeded with equal-width intervals which are then bisected
//! until the coarse and refined trapezoid means of every interval agree to
//! the requested relative tolerance. Intervals live on an explicit
//! [`SubintervalStack`], never on the call stack.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{clamp_tolerance, Result};
use crate::integral_stats::IntegralStats;
use crate::interval::SubintervalStack;
use crate::traits::{gap, Integrand, Quantity};

/// Smallest tolerance honoured; smaller positive requests are raised to it.
pub const MIN_TOLERANCE: f64 = 1000.0 * f64::EPSILON;

/// Multiple of machine epsilon below which a shortfall is round-off.
const EXHAUSTION_ULPS: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadratureSettings {
    /// Relative tolerance on each accepted interval.
    pub tolerance: f64,
    /// Number of equally spaced samples used to seed the bisection.
    pub initial_samples: usize,
}

impl Default for QuadratureSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            initial_samples: 16,
        }
    }
}

/// Advisory raised when floating-point precision ran out before the
/// tolerance was met.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceUnmet {
    /// Largest relative error `|coarse - refined| / |refined|` among the
    /// intervals accepted without meeting the tolerance.
    pub worst_shortfall: f64,
    /// Largest area magnitude (MKS) contributed by such an interval.
    pub largest_unresolved: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadratureReport<Q> {
    pub area: Q,
    pub stats: IntegralStats,
    pub unmet: Option<ToleranceUnmet>,
}

/// Integrates `f` from `a` to `b`.
///
/// The bounds may come in either order; reversed bounds negate the result.
/// Fails only on a non-positive tolerance. Precision exhaustion is logged
/// as a warning and the best estimate is still returned.
pub fn integral<A, R, F>(
    f: F,
    a: A,
    b: A,
    tolerance: f64,
    initial_samples: usize,
) -> Result<R::Area>
where
    A: Quantity,
    R: Integrand<A>,
    F: FnMut(A) -> R,
{
    let settings = QuadratureSettings {
        tolerance,
        initial_samples,
    };
    Ok(integral_with_report(f, a, b, settings)?.area)
}

/// [`integral`] for plain function pointers.
pub fn integral_fn<A, R>(
    f: fn(A) -> R,
    a: A,
    b: A,
    tolerance: f64,
    initial_samples: usize,
) -> Result<R::Area>
where
    A: Quantity,
    R: Integrand<A>,
{
    integral(f, a, b, tolerance, initial_samples)
}

/// [`integral`], also returning the accumulated statistics and whether the
/// tolerance went unmet.
pub fn integral_with_report<A, R, F>(
    mut f: F,
    a: A,
    b: A,
    settings: QuadratureSettings,
) -> Result<QuadratureReport<R::Area>>
where
    A: Quantity,
    R: Integrand<A>,
    F: FnMut(A) -> R,
{
    let tol = clamp_tolerance(settings.tolerance, MIN_TOLERANCE)?;
    let (lo, hi, sign) = if b < a { (b, a, -1.0) } else { (a, b, 1.0) };

    let mut stack = SubintervalStack::new(settings.initial_samples, lo, hi, &mut f);
    let mut stats = IntegralStats::new();
    let mut total: Option<R::Area> = None;
    let mut unresolved: Option<ToleranceUnmet> = None;

    while let Some(iv) = stack.pop() {
        let mid = iv.midpoint();
        let fmid = f(mid);
        let width = iv.width();
        let mean = (iv.fa + iv.fb) * 0.5;
        let rmean = (mean + fmid) * 0.5;

        let u1 = gap(mean, rmean);
        let u3 = tol * rmean.number().abs();
        let ds = rmean.area_over(width);

        let converged = u1 < u3 || u1 == 0.0;
        if !converged {
            let scale = iv
                .fa
                .number()
                .abs()
                .max(iv.fb.number().abs())
                .max(fmid.number().abs());
            let slack = u1 - u3;
            let round_off = slack <= EXHAUSTION_ULPS * f64::EPSILON * scale
                || slack < f64::MIN_POSITIVE;
            let unsplittable = mid.number() <= iv.a.number()
                || mid.number() >= iv.b.number()
                || width.number() <= mid.number().abs() * EXHAUSTION_ULPS * f64::EPSILON;

            if !(round_off || unsplittable || !u1.is_finite()) {
                let (left, right) = iv.split(mid, fmid);
                stack.push(left);
                stack.push(right);
                continue;
            }

            let shortfall = u1 / rmean.number().abs();
            let contribution = ds.number().abs();
            let entry = unresolved.get_or_insert(ToleranceUnmet {
                worst_shortfall: shortfall,
                largest_unresolved: contribution,
            });
            entry.worst_shortfall = entry.worst_shortfall.max(shortfall);
            entry.largest_unresolved = entry.largest_unresolved.max(contribution);
        }

        stats.add(ds.number(), u1 * width.number());
        total = Some(match total {
            Some(t) => t + ds,
            None => ds,
        });
    }

    let area = match total {
        Some(t) => t,
        None => f(lo).area_over(hi - lo).zeroed(),
    };
    let magnitude = area.number().abs();

    let unmet = unresolved.filter(|u| u.largest_unresolved > magnitude * tol);
    if let Some(u) = unmet {
        warn!(
            worst_shortfall = u.worst_shortfall,
            largest_unresolved = u.largest_unresolved,
            area = magnitude,
            tolerance = tol,
            "Integral tolerance not met: floating-point precision exhausted"
        );
    } else if stats.error_estimate() > magnitude * tol {
        warn!(
            error_estimate = stats.error_estimate(),
            area = magnitude,
            tolerance = tol,
            "Integral error estimate exceeds requested tolerance"
        );
    }
    debug!(
        intervals = stats.count(),
        area = area.number(),
        "Adaptive integration finished"
    );

    Ok(QuadratureReport {
        area: area * sign,
        stats,
        unmet,
    })
}
