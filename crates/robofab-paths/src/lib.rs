//! Resumable search algorithms over implicit grid graphs.
//!
//! Every algorithm here implements [`robofab_core::Resumable`] and advances
//! one bounded unit of work per call, so a simulation can interleave many of
//! them without any single tick paying for a whole run:
//!
//! - [`PathSearch`]: heuristic shortest-path search, one frontier pop, one
//!   neighbor visit or one path-reconstruction step per call.
//! - [`TargetSelector`]: runs a [`PathSearch`] against each candidate in turn
//!   and keeps the shortest path.
//! - [`DistanceSort`]: heap-sort of entities by distance to an origin, one
//!   sift level per call.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | [`PathSearch`], [`TargetSelector`] |
//! | [`Located`] | [`DistanceSort`] |
//! | [`Candidate`] : [`Located`] | [`TargetSelector`] |

mod distance;
mod neighbors;
mod search;
mod select;
mod sort;
mod traits;

pub use distance::{chebyshev, manhattan, squared};
pub use neighbors::Neighborhood;
pub use search::{Path, PathSearch, SearchStats};
pub use select::{Selection, TargetSelector};
pub use sort::{DistanceSort, heap_sort_by_distance};
pub use traits::{Candidate, FnPather, Located, Pather};
