//! Piecewise functions on a grid of cells.
//!
//! Every cell holds a [`Piece`], evaluated at the offset of the argument from
//! the cell's center. A [`DenseTable`] has uniform cells, finds the cell in
//! constant time, and is zero outside its cells. A [`SparseTable`] may have
//! cells of varying width, finds the cell by binary search, and extends its
//! edge cells beyond the grid.

use std::ops::Mul;

use crate::error::{NumError, Result};
use crate::poly::Polynomial;
use crate::traits::{Integrand, Quantity};

/// Sub-function of one table cell.
pub trait Piece<A> {
    type Output: Quantity;

    /// Value at `offset` from the cell center.
    fn eval(&self, offset: A) -> Self::Output;
}

/// A piece with a closed-form integral.
pub trait IntegrablePiece<A>: Piece<A> {
    type Area: Quantity;

    /// Integral between two offsets from the cell center.
    fn integral(&self, lo: A, hi: A) -> Self::Area;
}

/// A cell holding a single value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant<V>(pub V);

impl<A, V: Quantity> Piece<A> for Constant<V> {
    type Output = V;

    fn eval(&self, _offset: A) -> V {
        self.0
    }
}

impl<A: Quantity, V: Integrand<A>> IntegrablePiece<A> for Constant<V> {
    type Area = V::Area;

    fn integral(&self, lo: A, hi: A) -> V::Area {
        self.0.area_over(hi - lo)
    }
}

impl<V: Quantity> Mul<f64> for Constant<V> {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Constant(self.0 * factor)
    }
}

/// A cell holding an arbitrary closure of the offset.
#[derive(Clone, Copy)]
pub struct PieceFn<F>(pub F);

impl<A, R, F> Piece<A> for PieceFn<F>
where
    R: Quantity,
    F: Fn(A) -> R,
{
    type Output = R;

    fn eval(&self, offset: A) -> R {
        (self.0)(offset)
    }
}

impl Piece<f64> for Polynomial {
    type Output = f64;

    fn eval(&self, offset: f64) -> f64 {
        Polynomial::eval(self, offset)
    }
}

impl IntegrablePiece<f64> for Polynomial {
    type Area = f64;

    fn integral(&self, lo: f64, hi: f64) -> f64 {
        Polynomial::integral(self, lo, hi)
    }
}

fn check_width<A: Quantity>(width: A) -> Result<()> {
    if width.number() > 0.0 {
        Ok(())
    } else {
        Err(NumError::InvalidSpacing(width.number()))
    }
}

/// Uniform grid with constant-time lookup, zero outside
/// `[first - spacing/2, last + spacing/2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseTable<A, P> {
    first: A,
    spacing: A,
    cells: Vec<P>,
}

impl<A: Quantity, P: Piece<A>> DenseTable<A, P> {
    /// `first` is the center of the first cell.
    pub fn new(first: A, spacing: A, cells: Vec<P>) -> Result<Self> {
        if cells.is_empty() {
            return Err(NumError::EmptyTable);
        }
        check_width(spacing)?;
        Ok(Self {
            first,
            spacing,
            cells,
        })
    }

    pub fn eval(&self, a: A) -> P::Output {
        let n = self.cells.len();
        let half = self.spacing * 0.5;
        if a < self.first - half || a > self.last_center() + half {
            return self.cells[0].eval(self.spacing.zeroed()).zeroed();
        }
        // Saturating cast: a round-off negative index lands on cell 0.
        let index = ((a - self.first).number() / self.spacing.number() + 0.5).floor() as usize;
        let i = index.min(n - 1);
        let center = self.first + self.spacing * i as f64;
        self.cells[i].eval(a - center)
    }

    pub fn first_center(&self) -> A {
        self.first
    }

    pub fn last_center(&self) -> A {
        self.first + self.spacing * (self.cells.len() - 1) as f64
    }

    pub fn spacing(&self) -> A {
        self.spacing
    }

    pub fn pieces(&self) -> &[P] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<A: Quantity, P: IntegrablePiece<A>> DenseTable<A, P> {
    /// Sum of the integrals of every piece over its own cell.
    pub fn integral(&self) -> P::Area {
        let half = self.spacing * 0.5;
        let zero = self.cells[0].integral(half, half);
        self.cells
            .iter()
            .fold(zero, |sum, p| sum + p.integral(-half, half))
    }
}

impl<A: Quantity, P: Mul<f64, Output = P>> Mul<f64> for DenseTable<A, P> {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Self {
            first: self.first,
            spacing: self.spacing,
            cells: self.cells.into_iter().map(|p| p * factor).collect(),
        }
    }
}

/// One cell of a [`SparseTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<A, P> {
    pub center: A,
    pub width: A,
    pub piece: P,
}

/// Grid of cells of arbitrary positive width, found by binary search.
/// Arguments beyond either edge go to the edge cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseTable<A, P> {
    cells: Vec<Cell<A, P>>,
}

impl<A: Quantity, P: Piece<A>> SparseTable<A, P> {
    /// Cells of equal width `spacing`, the first centered on `first`.
    pub fn uniform(first: A, spacing: A, pieces: Vec<P>) -> Result<Self> {
        Self::with_widths(first, pieces.into_iter().map(|p| (spacing, p)).collect())
    }

    /// Adjacent cells given as `(width, piece)` in order; each center lies
    /// half of both widths past the previous one.
    pub fn with_widths(first: A, cells: Vec<(A, P)>) -> Result<Self> {
        if cells.is_empty() {
            return Err(NumError::EmptyTable);
        }
        let mut built: Vec<Cell<A, P>> = Vec::with_capacity(cells.len());
        for (width, piece) in cells {
            check_width(width)?;
            let center = match built.last() {
                Some(prev) => prev.center + (prev.width + width) * 0.5,
                None => first,
            };
            built.push(Cell {
                center,
                width,
                piece,
            });
        }
        Ok(Self { cells: built })
    }

    /// Cell whose span contains `a`; a boundary belongs to the upper cell.
    fn cell(&self, a: A) -> &Cell<A, P> {
        let last = self.cells.len() - 1;
        let j = self.cells.partition_point(|c| c.center <= a);
        if j == 0 {
            return &self.cells[0];
        }
        if j > last {
            return &self.cells[last];
        }
        let next = &self.cells[j];
        if next.center - a > next.width * 0.5 {
            &self.cells[j - 1]
        } else {
            next
        }
    }

    pub fn eval(&self, a: A) -> P::Output {
        let cell = self.cell(a);
        cell.piece.eval(a - cell.center)
    }

    pub fn first_center(&self) -> A {
        self.cells[0].center
    }

    pub fn last_center(&self) -> A {
        self.cells[self.cells.len() - 1].center
    }

    /// Width of the first cell; the spacing of a uniform table.
    pub fn spacing(&self) -> A {
        self.cells[0].width
    }

    pub fn cells(&self) -> &[Cell<A, P>] {
        &self.cells
    }

    pub fn pieces(&self) -> impl Iterator<Item = &P> {
        self.cells.iter().map(|c| &c.piece)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<A: Quantity, P: IntegrablePiece<A>> SparseTable<A, P> {
    /// Sum of the integrals of every piece over its own cell.
    pub fn integral(&self) -> P::Area {
        let origin = self.cells[0].width.zeroed();
        let zero = self.cells[0].piece.integral(origin, origin);
        self.cells.iter().fold(zero, |sum, c| {
            let half = c.width * 0.5;
            sum + c.piece.integral(-half, half)
        })
    }
}

impl<A: Quantity, P: Mul<f64, Output = P>> Mul<f64> for SparseTable<A, P> {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        let cells = self
            .cells
            .into_iter()
            .map(|c| Cell {
                center: c.center,
                width: c.width,
                piece: c.piece * factor,
            })
            .collect();
        Self { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{meters, newtons, Force, Length};

    fn steps() -> Vec<Constant<f64>> {
        vec![Constant(1.0), Constant(2.0), Constant(3.0)]
    }

    #[test]
    fn construction_is_validated() {
        assert!(matches!(
            DenseTable::<f64, Constant<f64>>::new(0.0, 1.0, Vec::new()),
            Err(NumError::EmptyTable)
        ));
        assert!(matches!(
            DenseTable::new(0.0, 0.0, steps()),
            Err(NumError::InvalidSpacing(s)) if s == 0.0
        ));
        assert!(matches!(
            SparseTable::<f64, Constant<f64>>::uniform(0.0, 1.0, Vec::new()),
            Err(NumError::EmptyTable)
        ));
        assert!(matches!(
            SparseTable::with_widths(0.0, vec![(1.0, Constant(1.0)), (-2.0, Constant(2.0))]),
            Err(NumError::InvalidSpacing(s)) if s == -2.0
        ));
    }

    #[test]
    fn dense_lookup_rounds_half_up_and_is_zero_outside() {
        let table = DenseTable::new(10.0, 2.0, steps()).unwrap();
        assert_eq!(table.eval(10.0), 1.0);
        assert_eq!(table.eval(10.9), 1.0);
        assert_eq!(table.eval(11.0), 2.0);
        assert_eq!(table.eval(13.0), 3.0);
        assert_eq!(table.eval(9.0), 1.0);
        assert_eq!(table.eval(15.0), 3.0);
        assert_eq!(table.eval(8.99), 0.0);
        assert_eq!(table.eval(15.01), 0.0);
        assert_eq!(table.last_center(), 14.0);
        assert_eq!(table.integral(), 12.0);
    }

    #[test]
    fn sparse_lookup_rounds_half_up_and_clamps_outside() {
        let table = SparseTable::uniform(10.0, 2.0, steps()).unwrap();
        assert_eq!(table.eval(10.9), 1.0);
        assert_eq!(table.eval(11.0), 2.0);
        assert_eq!(table.eval(13.0), 3.0);
        assert_eq!(table.eval(-100.0), 1.0);
        assert_eq!(table.eval(100.0), 3.0);
        assert_eq!(table.first_center(), 10.0);
        assert_eq!(table.last_center(), 14.0);
        assert_eq!(table.spacing(), 2.0);
        assert_eq!(table.integral(), 12.0);
    }

    #[test]
    fn pieces_receive_offset_from_center() {
        let ratio = |dx: Length| dx / meters(1.0);
        let table =
            SparseTable::uniform(meters(1.0), meters(2.0), vec![PieceFn(ratio), PieceFn(ratio)])
                .unwrap();
        assert_eq!(table.eval(meters(1.5)).value(), 0.5);
        assert_eq!(table.eval(meters(2.5)).value(), -0.5);
        assert_eq!(table.eval(meters(5.0)).value(), 2.0);

        let dense = DenseTable::new(0.0, 1.0, vec![PieceFn(|dx: f64| 10.0 + dx)]).unwrap();
        assert_eq!(dense.eval(0.25), 10.25);
        assert_eq!(dense.eval(0.75), 0.0);
    }

    #[test]
    fn variable_widths_place_centers_between_half_widths() {
        let table = SparseTable::with_widths(
            0.0,
            vec![
                (2.0, Constant(1.0)),
                (4.0, Constant(2.0)),
                (1.0, Constant(3.0)),
            ],
        )
        .unwrap();
        let centers: Vec<f64> = table.cells().iter().map(|c| c.center).collect();
        assert_eq!(centers, vec![0.0, 3.0, 5.5]);
        assert_eq!(table.eval(0.99), 1.0);
        assert_eq!(table.eval(1.0), 2.0);
        assert_eq!(table.eval(4.99), 2.0);
        assert_eq!(table.eval(5.0), 3.0);
        assert_eq!(table.integral(), 2.0 + 8.0 + 3.0);
    }

    #[test]
    fn polynomial_pieces_integrate_exactly() {
        // x^2 on [-1, 1] split into two cells of width 1 centered at -0.5, 0.5.
        let left = Polynomial::new(2, vec![0.25, -1.0, 1.0]).unwrap();
        let right = Polynomial::new(2, vec![0.25, 1.0, 1.0]).unwrap();
        let table = SparseTable::uniform(-0.5, 1.0, vec![left, right]).unwrap();
        assert!((table.eval(-0.8) - 0.64).abs() < 1e-15);
        assert!((table.eval(0.3) - 0.09).abs() < 1e-15);
        assert!((table.integral() - 2.0 / 3.0).abs() < 1e-15);
        assert!(((table * 3.0).integral() - 2.0).abs() < 1e-15);
    }

    #[test]
    fn dimensioned_constants_integrate_to_product() {
        let table = DenseTable::new(
            meters(0.0),
            meters(0.5),
            vec![Constant(newtons(2.0)), Constant(newtons(4.0))],
        )
        .unwrap();
        let force: Force = table.eval(meters(0.6));
        assert_eq!(force, newtons(4.0));
        assert_eq!(table.integral(), newtons(3.0) * meters(1.0));
        assert_eq!((table * 0.5).eval(meters(0.1)), newtons(1.0));
    }
}
