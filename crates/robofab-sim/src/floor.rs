use robofab_core::{Point, Range};
use robofab_paths::{Neighborhood, Pather};

/// The walkable area of a factory.
///
/// Machines do not block movement: a robot walks onto the cell of the
/// machine it serves. Only walls and the floor's edge do.
#[derive(Debug, Clone)]
pub struct Floor {
    range: Range,
    walls: Vec<bool>,
    hood: Neighborhood,
}

impl Floor {
    /// An open floor of `size` cells.
    pub fn new(size: Point, hood: Neighborhood) -> Self {
        let range = Range::sized(size.x, size.y);
        Self {
            walls: vec![false; range.len()],
            range,
            hood,
        }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn size(&self) -> Point {
        self.range.size()
    }

    pub fn neighborhood(&self) -> Neighborhood {
        self.hood
    }

    fn idx(&self, p: Point) -> Option<usize> {
        if !self.range.contains(p) {
            return None;
        }
        let q = p - self.range.min;
        Some((q.y * self.range.width() + q.x) as usize)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.range.contains(p)
    }

    pub fn is_wall(&self, p: Point) -> bool {
        self.idx(p).is_some_and(|i| self.walls[i])
    }

    /// Whether a robot may stand on `p`.
    pub fn passable(&self, p: Point) -> bool {
        self.idx(p).is_some_and(|i| !self.walls[i])
    }

    /// Mark `p` as a wall. Points off the floor are ignored.
    pub fn set_wall(&mut self, p: Point) {
        if let Some(i) = self.idx(p) {
            self.walls[i] = true;
        }
    }
}

impl Pather for Floor {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        self.hood.extend(p, |n| self.passable(n), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_and_edges_block() {
        let mut floor = Floor::new(Point::new(3, 3), Neighborhood::Eight);
        floor.set_wall(Point::new(1, 0));
        floor.set_wall(Point::new(9, 9));
        assert!(floor.is_wall(Point::new(1, 0)));
        assert!(!floor.passable(Point::new(1, 0)));
        assert!(!floor.passable(Point::new(-1, 0)));
        assert!(!floor.is_wall(Point::new(9, 9)));

        let mut buf = Vec::new();
        floor.neighbors(Point::ZERO, &mut buf);
        assert_eq!(buf, vec![Point::new(1, 1), Point::new(0, 1)]);
    }

    #[test]
    fn cardinal_floor() {
        let floor = Floor::new(Point::new(3, 3), Neighborhood::Four);
        let mut buf = Vec::new();
        floor.neighbors(Point::new(1, 1), &mut buf);
        assert_eq!(buf.len(), 4);
        assert_eq!(floor.size(), Point::new(3, 3));
    }
}
