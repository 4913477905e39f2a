//! Work list of subintervals for adaptive bisection.
//!
//! Both [`crate::integral`] and the adaptive [`crate::interpolant`] constructor
//! drain a [`SubintervalStack`] instead of recursing, so subdivision depth is
//! bounded by heap memory rather than by the call stack.

use crate::traits::Quantity;

/// One bisection unit: the argument and the function value at each end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval<A, R> {
    pub a: A,
    pub b: A,
    pub fa: R,
    pub fb: R,
}

impl<A: Quantity, R: Quantity> Interval<A, R> {
    pub fn midpoint(&self) -> A {
        (self.a + self.b) * 0.5
    }

    pub fn width(&self) -> A {
        self.b - self.a
    }

    /// Splits at `mid`, where the function value is `fmid`. The children
    /// share `fmid` at their common end and keep the parent's outer values.
    pub fn split(&self, mid: A, fmid: R) -> (Self, Self) {
        (
            Interval {
                a: self.a,
                b: mid,
                fa: self.fa,
                fb: fmid,
            },
            Interval {
                a: mid,
                b: self.b,
                fa: fmid,
                fb: self.fb,
            },
        )
    }

    /// Larger of the two endpoint magnitudes.
    fn peak(&self) -> f64 {
        self.fa.number().abs().max(self.fb.number().abs())
    }
}

/// LIFO stack of intervals seeded by uniform sampling.
#[derive(Debug, Clone)]
pub struct SubintervalStack<A, R> {
    intervals: Vec<Interval<A, R>>,
}

impl<A: Quantity, R: Quantity> SubintervalStack<A, R> {
    /// Samples `f` at `n` equally spaced points across `[a, b]` (at least the
    /// two end points) and pushes the `n - 1` intervals between them.
    ///
    /// The intervals are ordered so that those with the largest function
    /// magnitudes sit on top: refinement there fixes the scale of the result
    /// before the regions of small magnitude are visited.
    pub fn new(n: usize, a: A, b: A, f: &mut impl FnMut(A) -> R) -> Self {
        let n = n.max(2);
        let step = (b - a) / (n - 1) as f64;
        let mut intervals = Vec::with_capacity(2 * n);
        let mut ta = a;
        let mut fta = f(ta);
        for j in 1..n {
            // The last end point is `b` itself rather than an accumulated sum.
            let tb = if j + 1 == n { b } else { a + step * j as f64 };
            let ftb = f(tb);
            intervals.push(Interval {
                a: ta,
                b: tb,
                fa: fta,
                fb: ftb,
            });
            ta = tb;
            fta = ftb;
        }
        intervals.sort_by(|p, q| p.peak().total_cmp(&q.peak()));
        Self { intervals }
    }

    pub fn push(&mut self, interval: Interval<A, R>) {
        self.intervals.push(interval);
    }

    pub fn pop(&mut self) -> Option<Interval<A, R>> {
        self.intervals.pop()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// End points of every interval currently on the stack, with their
    /// function values, sorted by argument and without duplicates.
    pub fn sample_points(&self) -> Vec<(A, R)> {
        let mut points: Vec<(A, R)> = self
            .intervals
            .iter()
            .flat_map(|iv| [(iv.a, iv.fa), (iv.b, iv.fb)])
            .collect();
        points.sort_by(|p, q| p.0.number().total_cmp(&q.0.number()));
        points.dedup_by(|p, q| p.0.number() == q.0.number());
        points
    }
}
