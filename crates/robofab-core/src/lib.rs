//! **robofab-core**: core types for the factory-floor simulation.
//!
//! This crate provides the foundations shared by the rest of the *robofab*
//! workspace: grid geometry and the resumable-computation framework that lets
//! long-running algorithms advance one bounded step per simulation tick.

pub mod geom;
pub mod step;

pub use geom::{Point, Range, RangeIter};
pub use step::{Callback, Resumable, Sink, Step, Task, finish};
