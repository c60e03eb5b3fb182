use robofab_core::Point;

/// Which adjacent cells count as neighbors.
///
/// Both variants enumerate every offset exactly once, clockwise starting
/// from the cell above.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Neighborhood {
    /// Up, right, down, left.
    Four,
    /// Cardinal plus diagonal moves.
    #[default]
    Eight,
}

impl Neighborhood {
    /// Append the neighbors of `p` for which `keep` returns `true`.
    pub fn extend(self, p: Point, keep: impl Fn(Point) -> bool, buf: &mut Vec<Point>) {
        match self {
            Self::Four => buf.extend(p.neighbors_4().into_iter().filter(|&n| keep(n))),
            Self::Eight => buf.extend(p.neighbors_8().into_iter().filter(|&n| keep(n))),
        }
    }

    /// Maximum number of neighbors a cell can have.
    pub fn degree(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }
}
