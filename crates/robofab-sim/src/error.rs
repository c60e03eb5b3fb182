//! Construction-time errors.
//!
//! Running the simulation never fails: unreachable targets and empty pools
//! are ordinary outcomes. Only building a factory from bad input does.

use robofab_core::Point;
use thiserror::Error;

/// Errors produced while parsing a [`Layout`](crate::Layout).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout is empty")]
    Empty,

    #[error("layout row {row} is {width} cells wide, expected {expected}")]
    InconsistentSize { row: i32, width: i32, expected: i32 },

    #[error("layout contains invalid glyph {ch:?} at {pos}")]
    InvalidRune { ch: char, pos: Point },
}

/// Errors produced while building a [`Factory`](crate::Factory).
#[derive(Debug, Error)]
pub enum FactoryError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("{0} is outside the factory floor")]
    OutOfBounds(Point),

    #[error("{0} is a wall")]
    OnWall(Point),

    #[error("{0} already holds a machine")]
    Occupied(Point),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type FactoryResult<T> = Result<T, FactoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_cell() {
        let err = LayoutError::InvalidRune {
            ch: 'x',
            pos: Point::new(3, 1),
        };
        assert_eq!(err.to_string(), "layout contains invalid glyph 'x' at (3, 1)");
        let err = FactoryError::from(err);
        assert!(matches!(err, FactoryError::Layout(_)));
        assert_eq!(FactoryError::OnWall(Point::new(0, 2)).to_string(), "(0, 2) is a wall");
    }
}
