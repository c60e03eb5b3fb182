use std::rc::Rc;

use robofab_core::Point;

use crate::distance::squared;

/// Grid graph interface used by [`PathSearch`](crate::PathSearch).
///
/// Only [`neighbors`](Self::neighbors) is required. The default step cost and
/// heuristic are both the squared straight-line distance, which makes an
/// orthogonal step cost 1 and a diagonal step cost 2.
pub trait Pather {
    /// Append neighbors of `p` into `buf`. The caller clears `buf` before calling.
    ///
    /// Must be deterministic: the same point always yields the same
    /// neighbors in the same order.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);

    /// Cost of moving from `from` to adjacent `to`. Must be > 0.
    fn cost(&self, from: Point, to: Point) -> i32 {
        squared(from, to)
    }

    /// Estimated cost from `from` to `to`.
    ///
    /// The default overestimates on long diagonals, so the search is fast
    /// but not guaranteed optimal.
    fn estimate(&self, from: Point, to: Point) -> i32 {
        squared(from, to)
    }
}

impl<P: Pather + ?Sized> Pather for &P {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        (**self).neighbors(p, buf)
    }

    fn cost(&self, from: Point, to: Point) -> i32 {
        (**self).cost(from, to)
    }

    fn estimate(&self, from: Point, to: Point) -> i32 {
        (**self).estimate(from, to)
    }
}

impl<P: Pather + ?Sized> Pather for Rc<P> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        (**self).neighbors(p, buf)
    }

    fn cost(&self, from: Point, to: Point) -> i32 {
        (**self).cost(from, to)
    }

    fn estimate(&self, from: Point, to: Point) -> i32 {
        (**self).estimate(from, to)
    }
}

/// Adapts a neighbor function `Fn(Point) -> Vec<Point>` into a [`Pather`].
#[derive(Clone, Copy)]
pub struct FnPather<F>(pub F);

impl<F> Pather for FnPather<F>
where
    F: Fn(Point) -> Vec<Point>,
{
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend((self.0)(p));
    }
}

/// Anything with a position on the grid.
pub trait Located {
    fn point(&self) -> Point;
}

impl Located for Point {
    fn point(&self) -> Point {
        *self
    }
}

/// A destination the [`TargetSelector`](crate::TargetSelector) may choose.
///
/// The key identifies the candidate independently of its position so that a
/// candidate withdrawn from the pool mid-selection can be recognised.
pub trait Candidate: Located {
    type Key: Copy + Eq;

    fn key(&self) -> Self::Key;
}

impl Candidate for Point {
    type Key = Point;

    fn key(&self) -> Point {
        *self
    }
}
