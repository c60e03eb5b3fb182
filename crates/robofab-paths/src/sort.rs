//! Stepped heap-sort of located entities by distance to an origin.

use robofab_core::{Point, Resumable, Step};

use crate::distance::squared;
use crate::traits::Located;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Sift `root` down within `items[..end]`. `build` is the node whose
    /// sift is running while the heap is still being built.
    Sift {
        root: usize,
        end: usize,
        build: Option<usize>,
    },
}

/// Sorts entities by squared distance to an origin, nearest first.
///
/// A max-heap is built by sift-down and the root is repeatedly swapped to the
/// end of the shrinking heap. Each [`resume`](Resumable::resume) performs a
/// single sift level: one comparison of a node against its children and at
/// most one swap. The extraction swap that follows a finished sift happens on
/// the same step.
///
/// The sort is not stable. [`heap_sort_by_distance`] performs the same work
/// in one call and reports the same number of steps.
pub struct DistanceSort<T> {
    items: Vec<T>,
    origin: Point,
    phase: Phase,
}

impl<T: Located> Default for DistanceSort<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Located> DistanceSort<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            origin: Point::ZERO,
            phase: Phase::Idle,
        }
    }

    /// The origin of the current (or last) run.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The entities being sorted, in their current partially sorted order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    fn sift(&mut self, root: usize, end: usize, build: Option<usize>) -> Step<Vec<T>> {
        let largest = largest_child(&self.items, self.origin, root, end);
        if largest != root {
            self.items.swap(root, largest);
            self.phase = Phase::Sift {
                root: largest,
                end,
                build,
            };
            return Step::Pending;
        }

        match build {
            Some(node) if node > 0 => {
                self.phase = Phase::Sift {
                    root: node - 1,
                    end,
                    build: Some(node - 1),
                };
                Step::Pending
            }
            _ => self.extract(end),
        }
    }

    fn extract(&mut self, end: usize) -> Step<Vec<T>> {
        let end = end - 1;
        self.items.swap(0, end);
        if end > 1 {
            self.phase = Phase::Sift {
                root: 0,
                end,
                build: None,
            };
            Step::Pending
        } else {
            self.phase = Phase::Idle;
            Step::Done(std::mem::take(&mut self.items))
        }
    }
}

impl<T: Located> Resumable for DistanceSort<T> {
    type Args = (Point, Vec<T>);
    type Output = Vec<T>;

    /// Start sorting `items` by distance to `origin`.
    ///
    /// Fewer than two items complete immediately.
    fn begin(&mut self, (origin, items): (Point, Vec<T>)) -> Step<Vec<T>> {
        self.origin = origin;
        self.items = items;
        let n = self.items.len();
        if n < 2 {
            self.phase = Phase::Idle;
            return Step::Done(std::mem::take(&mut self.items));
        }
        let node = n / 2 - 1;
        self.phase = Phase::Sift {
            root: node,
            end: n,
            build: Some(node),
        };
        self.resume()
    }

    fn resume(&mut self) -> Step<Vec<T>> {
        match self.phase {
            Phase::Idle => Step::Idle,
            Phase::Sift { root, end, build } => self.sift(root, end, build),
        }
    }

    fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }
}

/// Index of the farthest of `root` and its children within `items[..end]`.
/// Ties keep `root`, then the left child.
fn largest_child<T: Located>(items: &[T], origin: Point, root: usize, end: usize) -> usize {
    let key = |i: usize| squared(items[i].point(), origin);
    let mut largest = root;
    for child in [2 * root + 1, 2 * root + 2] {
        if child < end && key(child) > key(largest) {
            largest = child;
        }
    }
    largest
}

/// Sort `items` nearest-first in one call, returning the number of steps a
/// [`DistanceSort`] takes for the same input.
pub fn heap_sort_by_distance<T: Located>(items: &mut [T], origin: Point) -> usize {
    let n = items.len();
    if n < 2 {
        return 1;
    }

    let sift = |items: &mut [T], mut root: usize, end: usize| {
        let mut levels = 0;
        loop {
            levels += 1;
            let largest = largest_child(items, origin, root, end);
            if largest == root {
                return levels;
            }
            items.swap(root, largest);
            root = largest;
        }
    };

    let mut steps = 0;
    for node in (0..n / 2).rev() {
        steps += sift(items, node, n);
    }
    for end in (1..n).rev() {
        items.swap(0, end);
        if end > 1 {
            steps += sift(items, 0, end);
        }
    }
    steps
}
