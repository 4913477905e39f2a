//! Fifth-order Cash–Karp Runge–Kutta quadrature with adaptive step size.
//!
//! Quadrature is the special case of an ODE whose derivative depends only on
//! the independent variable, so the second Cash–Karp stage (which would need
//! the intermediate state) is never evaluated: each trial step costs four
//! samples of the integrand beyond the one at its start.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{clamp_tolerance, NumError, Result};
use crate::integral::MIN_TOLERANCE;
use crate::interpolant::{ControlPoint, Interpolant};
use crate::poly::Polynomial;
use crate::tables::SparseTable;
use crate::traits::{Integrand, Quantity};

// Stage offsets as fractions of the step.
const A3: f64 = 0.3;
const A4: f64 = 0.6;
const A5: f64 = 1.0;
const A6: f64 = 0.875;

// Fifth-order weights.
const C1: f64 = 37.0 / 378.0;
const C3: f64 = 250.0 / 621.0;
const C4: f64 = 125.0 / 594.0;
const C6: f64 = 512.0 / 1771.0;

// Differences from the embedded fourth-order weights.
const DC1: f64 = C1 - 2825.0 / 27648.0;
const DC3: f64 = C3 - 18575.0 / 48384.0;
const DC4: f64 = C4 - 13525.0 / 55296.0;
const DC5: f64 = -277.0 / 14336.0;
const DC6: f64 = C6 - 0.25;

const SAFETY: f64 = 0.9;
const PGROW: f64 = -0.2;
const PSHRNK: f64 = -0.25;
const TINY: f64 = 1.0e-300;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RkSettings {
    /// Relative tolerance on the local truncation error of each step.
    pub tolerance: f64,
    /// The first trial step is `1 / (initial_steps - 1)` of the domain.
    pub initial_steps: usize,
    /// Keep every sampled point and build interpolants from them.
    pub store: bool,
    /// Steps taken before giving up with the current estimate.
    pub max_steps: usize,
}

impl Default for RkSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            initial_steps: 16,
            store: false,
            max_steps: 100_000,
        }
    }
}

/// Outcome of one error-controlled step.
struct Step<X> {
    did: X,
    next: X,
    underflow: bool,
}

/// Position of the integration: `y` is the integral up to `x`, and `dydx`
/// the integrand at `x`.
struct Cursor<X, D: Integrand<X>> {
    x: X,
    y: D::Area,
    dydx: D,
    tol: f64,
}

impl<X, D> Cursor<X, D>
where
    X: Quantity,
    D: Integrand<X>,
{
    /// Cash–Karp step of size `h`: the advanced integral and an estimate of
    /// its truncation error.
    fn rkck<F: FnMut(X) -> D>(&self, f: &mut F, h: X) -> (D::Area, D::Area) {
        let k3 = f(self.x + h * A3);
        let k4 = f(self.x + h * A4);
        let k5 = f(self.x + h * A5);
        let k6 = f(self.x + h * A6);

        let out = self.y + (self.dydx * C1 + k3 * C3 + k4 * C4 + k6 * C6).area_over(h);
        let err = (self.dydx * DC1 + k3 * DC3 + k4 * DC4 + k5 * DC5 + k6 * DC6).area_over(h);
        (out, err)
    }

    /// Takes the largest step not exceeding `htry` whose scaled error is
    /// at most one, and advances the cursor past it.
    fn rkqs<F: FnMut(X) -> D>(&mut self, f: &mut F, htry: X, yscal: f64) -> Step<X> {
        let mut h = htry;
        let mut underflow = false;
        let (y, err) = loop {
            let (out, yerr) = self.rkck(f, h);
            let err = (yerr.number() / yscal / self.tol).abs();
            if err <= 1.0 {
                break (out, err);
            }
            let reduced = reduce_step(h, err);
            if (self.x + reduced).number() == self.x.number() {
                // Accept the smallest step that still moves `x`.
                let magnitude = (self.x.number().abs() * 2.0 * f64::EPSILON).max(f64::MIN_POSITIVE);
                h = reduced * (magnitude / reduced.number().abs());
                underflow = true;
                let (out, _) = self.rkck(f, h);
                break (out, 1.0);
            }
            h = reduced;
        };

        // Grow by at most a factor of five.
        let errcon = (5.0 / SAFETY).powf(1.0 / PGROW);
        let next = if err > errcon {
            h * (SAFETY * err.powf(PGROW))
        } else {
            h * 5.0
        };

        self.x = self.x + h;
        self.y = y;
        Step {
            did: h,
            next,
            underflow,
        }
    }
}

/// Shrinks `h` for a scaled error `err > 1`, never by more than a factor
/// of ten.
fn reduce_step<X: Quantity>(h: X, err: f64) -> X {
    let factor = SAFETY * err.powf(PSHRNK);
    if factor > 0.1 {
        h * factor
    } else {
        h * 0.1
    }
}

/// Definite integral of `f` computed by adaptive Runge–Kutta steps, with
/// the samples it visited.
///
/// `X` is the variable of integration and `D` the integrand; the integral
/// has type `D::Area`.
#[derive(Debug, Clone)]
pub struct RkQuad<X, D>
where
    X: Quantity,
    D: Integrand<X>,
    D::Area: Integrand<X>,
{
    integral: D::Area,
    tolerance: f64,
    planned: usize,
    adjusted: usize,
    forced: usize,
    integrand_points: Vec<ControlPoint<X, D>>,
    integral_points: Vec<ControlPoint<X, D::Area>>,
    integrand: Option<Interpolant<X, D>>,
    running: Option<Interpolant<X, D::Area>>,
}

impl<X, D> RkQuad<X, D>
where
    X: Quantity,
    D: Integrand<X>,
    D::Area: Integrand<X>,
{
    /// Integrates `f` from `x1` to `x2`, in either direction.
    ///
    /// Fails only on a non-positive tolerance. A step-size underflow or an
    /// exhausted step budget is logged and the current estimate kept.
    pub fn new<F>(mut f: F, x1: X, x2: X, settings: RkSettings) -> Result<Self>
    where
        F: FnMut(X) -> D,
    {
        let tol = clamp_tolerance(settings.tolerance, MIN_TOLERANCE)?;
        let steps = settings.initial_steps.max(2);
        let mut h = (x2 - x1) / (steps - 1) as f64;

        let dydx = f(x1);
        let mut cursor: Cursor<X, D> = Cursor {
            x: x1,
            y: dydx.area_over(x2 - x1).zeroed(),
            dydx,
            tol,
        };

        let mut integrand_points = Vec::new();
        let mut integral_points = Vec::new();
        let (mut planned, mut adjusted, mut underflows) = (0_usize, 0_usize, 0_usize);

        loop {
            let yscal =
                cursor.y.number().abs() + cursor.dydx.area_over(h).number().abs() + TINY;
            if settings.store {
                integrand_points.push(ControlPoint {
                    x: cursor.x,
                    y: cursor.dydx,
                });
                integral_points.push(ControlPoint {
                    x: cursor.x,
                    y: cursor.y,
                });
            }

            // Shorten the last step so it ends exactly on `x2`.
            let xh = cursor.x + h;
            if (xh - x2).number() * (xh - x1).number() > 0.0 {
                h = x2 - cursor.x;
            }

            let step = cursor.rkqs(&mut f, h, yscal);
            if step.did.number() == h.number() {
                planned += 1;
            } else {
                adjusted += 1;
            }
            if step.underflow {
                underflows += 1;
            }

            if (cursor.x - x2).number() * (x2 - x1).number() >= 0.0 {
                if settings.store {
                    integrand_points.push(ControlPoint {
                        x: cursor.x,
                        y: f(cursor.x),
                    });
                    integral_points.push(ControlPoint {
                        x: cursor.x,
                        y: cursor.y,
                    });
                }
                break;
            }
            if step.next.number() == 0.0 {
                warn!(x = cursor.x.number(), "Runge-Kutta step size vanished");
                break;
            }
            if planned + adjusted >= settings.max_steps {
                warn!(
                    steps = planned + adjusted,
                    x = cursor.x.number(),
                    "Runge-Kutta step budget exhausted before reaching the upper limit"
                );
                break;
            }

            h = step.next;
            cursor.dydx = f(cursor.x);
        }

        if underflows > 0 {
            warn!(
                underflows,
                tolerance = tol,
                "Runge-Kutta step size underflow; minimal steps were forced"
            );
        }
        debug!(
            planned,
            adjusted,
            integral = cursor.y.number(),
            "Runge-Kutta quadrature finished"
        );

        let (integrand, running) = if settings.store {
            (
                Some(Interpolant::from_points(integrand_points.clone())),
                Some(Interpolant::from_points(integral_points.clone())),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            integral: cursor.y,
            tolerance: tol,
            planned,
            adjusted,
            forced: underflows,
            integrand_points,
            integral_points,
            integrand,
            running,
        })
    }

    pub fn definite_integral(&self) -> D::Area {
        self.integral
    }

    /// Tolerance actually used, after clamping.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Steps taken with the planned size.
    pub fn planned_steps(&self) -> usize {
        self.planned
    }

    /// Steps whose size had to be reduced.
    pub fn adjusted_steps(&self) -> usize {
        self.adjusted
    }

    /// Steps accepted at the smallest representable size after the error
    /// control could no longer shrink them.
    pub fn forced_steps(&self) -> usize {
        self.forced
    }

    /// Integrand at the start of every step and at the upper limit, in the
    /// order visited. Empty unless storing was requested.
    pub fn integrand_points(&self) -> &[ControlPoint<X, D>] {
        &self.integrand_points
    }

    /// Running integral at the same arguments as [`RkQuad::integrand_points`].
    pub fn integral_points(&self) -> &[ControlPoint<X, D::Area>] {
        &self.integral_points
    }

    pub fn integrand_interpolant(&self) -> Option<&Interpolant<X, D>> {
        self.integrand.as_ref()
    }

    /// Indefinite integral, zero at the lower limit.
    pub fn integral_interpolant(&self) -> Option<&Interpolant<X, D::Area>> {
        self.running.as_ref()
    }
}

impl RkQuad<f64, f64> {
    /// Quadratic approximant of the integrand: one cell per step, each
    /// piece through the integrand at both ends of the step and with the
    /// same integral over the step as the solver found.
    pub fn integrand_table(&self) -> Result<SparseTable<f64, Polynomial>> {
        let mut samples: Vec<(f64, f64, f64)> = self
            .integrand_points
            .iter()
            .zip(&self.integral_points)
            .map(|(d, y)| (d.x, d.y, y.y))
            .collect();
        if samples.len() < 2 {
            return Err(NumError::InsufficientPoints {
                required: 2,
                found: samples.len(),
            });
        }
        samples.sort_by(|p, q| p.0.total_cmp(&q.0));

        let first_center = 0.5 * (samples[0].0 + samples[1].0);
        let mut cells = Vec::with_capacity(samples.len() - 1);
        for w in samples.windows(2) {
            let ((x1, y1, i1), (x2, y2, i2)) = (w[0], w[1]);
            let dx = x2 - x1;
            let slope = (y2 - y1) / dx;
            let chord_area = 0.5 * (y1 + y2) * dx;
            let curvature = -6.0 * ((i2 - i1) - chord_area) / (dx * dx * dx);
            let c0 = y1 + 0.5 * slope * dx - 0.25 * curvature * dx * dx;
            cells.push((dx, Polynomial::new(2, vec![c0, slope, curvature])?));
        }
        SparseTable::with_widths(first_center, cells)
    }
}
