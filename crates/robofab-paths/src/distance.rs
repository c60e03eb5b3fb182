use robofab_core::Point;

/// Squared Euclidean distance between two points.
#[inline]
pub fn squared(a: Point, b: Point) -> i32 {
    a.dist_sq(b)
}

/// Chebyshev (L∞) distance between two points: the number of 8-directional
/// moves between them on an open floor.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}

/// Manhattan (L1) distance between two points: the number of 4-directional
/// moves between them on an open floor.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
