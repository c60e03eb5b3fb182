//! Factory floor plans written as ASCII art.
//!
//! A [`Layout`] is parsed from text, one character per cell:
//!
//! | Glyph | Meaning |
//! |---|---|
//! | `.` | floor |
//! | `#` | wall |
//! | `P` | producer |
//! | `C` | consumer |
//! | `R` | robot on floor |
//!
//! Lines are separated by `'\n'` and must all have the same width.

use std::fmt;
use std::str::FromStr;

use robofab_core::Point;

use crate::error::LayoutError;

/// A parsed floor plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    size: Point,
    walls: Vec<Point>,
    producers: Vec<Point>,
    consumers: Vec<Point>,
    robots: Vec<Point>,
}

impl Layout {
    /// Parse a floor plan.
    ///
    /// Leading and trailing whitespace is trimmed from the whole string but
    /// not from individual lines.
    pub fn parse(s: &str) -> Result<Self, LayoutError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut layout = Self {
            size: Point::ZERO,
            walls: Vec::new(),
            producers: Vec::new(),
            consumers: Vec::new(),
            robots: Vec::new(),
        };
        let mut width = None;
        for (y, line) in (0..).zip(s.split('\n')) {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let mut x = 0;
            for ch in line.chars() {
                let pos = Point::new(x, y);
                match ch {
                    '.' => {}
                    '#' => layout.walls.push(pos),
                    'P' => layout.producers.push(pos),
                    'C' => layout.consumers.push(pos),
                    'R' => layout.robots.push(pos),
                    _ => return Err(LayoutError::InvalidRune { ch, pos }),
                }
                x += 1;
            }
            match width {
                None => width = Some(x),
                Some(expected) if expected != x => {
                    return Err(LayoutError::InconsistentSize {
                        row: y,
                        width: x,
                        expected,
                    });
                }
                Some(_) => {}
            }
            layout.size = Point::new(x, y + 1);
        }
        Ok(layout)
    }

    /// The 15x11 floor with five consumers along the top, five producers
    /// near the bottom and one robot in the middle.
    pub fn demo() -> Self {
        Self {
            size: Point::new(15, 11),
            walls: Vec::new(),
            producers: [1, 4, 7, 10, 13].map(|x| Point::new(x, 9)).to_vec(),
            consumers: [1, 4, 7, 10, 13].map(|x| Point::new(x, 0)).to_vec(),
            robots: vec![Point::new(7, 5)],
        }
    }

    /// The (width, height) of the floor in cells.
    pub fn size(&self) -> Point {
        self.size
    }

    pub fn walls(&self) -> &[Point] {
        &self.walls
    }

    pub fn producers(&self) -> &[Point] {
        &self.producers
    }

    pub fn consumers(&self) -> &[Point] {
        &self.consumers
    }

    pub fn robots(&self) -> &[Point] {
        &self.robots
    }

    fn glyph(&self, p: Point) -> char {
        if self.walls.contains(&p) {
            '#'
        } else if self.producers.contains(&p) {
            'P'
        } else if self.consumers.contains(&p) {
            'C'
        } else if self.robots.contains(&p) {
            'R'
        } else {
            '.'
        }
    }
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size.y {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.size.x {
                write!(f, "{}", self.glyph(Point::new(x, y)))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = "\
.C..C..C..C..C.
...............
...............
...............
...............
.......R.......
...............
...............
...............
.P..P..P..P..P.
...............";

    const ROOM: &str = "\
#####
#P.C#
#.R.#
#####";

    #[test]
    fn parse_and_size() {
        let l = Layout::parse(ROOM).unwrap();
        assert_eq!(l.size(), Point::new(5, 4));
        assert_eq!(l.producers(), &[Point::new(1, 1)]);
        assert_eq!(l.consumers(), &[Point::new(3, 1)]);
        assert_eq!(l.robots(), &[Point::new(2, 2)]);
        assert_eq!(l.walls().len(), 14);
    }

    #[test]
    fn surrounding_whitespace_and_crlf() {
        let l: Layout = "\n  \nP.\r\n.C\n\n".parse().unwrap();
        assert_eq!(l.size(), Point::new(2, 2));
        assert_eq!(l.consumers(), &[Point::new(1, 1)]);
    }

    #[test]
    fn display_round_trips() {
        let l = Layout::parse(ROOM).unwrap();
        assert_eq!(l.to_string(), ROOM);
    }

    #[test]
    fn demo_matches_its_drawing() {
        assert_eq!(Layout::parse(DEMO).unwrap(), Layout::demo());
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(Layout::parse(" \n\t"), Err(LayoutError::Empty));
    }

    #[test]
    fn inconsistent_size_error() {
        assert_eq!(
            Layout::parse("..\n...\n.."),
            Err(LayoutError::InconsistentSize {
                row: 1,
                width: 3,
                expected: 2
            })
        );
    }

    #[test]
    fn invalid_rune_error() {
        assert_eq!(
            Layout::parse("..\n.x"),
            Err(LayoutError::InvalidRune {
                ch: 'x',
                pos: Point::new(1, 1)
            })
        );
    }
}
