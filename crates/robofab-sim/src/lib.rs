//! Factory floor simulation.
//!
//! Robots shuttle items from producers to consumers across a grid floor.
//! Every robot chooses its next machine with a resumable
//! [`TargetSelector`](robofab_paths::TargetSelector) that the [`Factory`]
//! resumes once per tick, so choosing never stalls the simulation.
//!
//! ```
//! use robofab_sim::{Factory, FactoryConfig, Layout};
//!
//! let layout: Layout = "P...R...C".parse()?;
//! let mut factory = Factory::from_layout(&layout, FactoryConfig::default())?;
//! for _ in 0..100 {
//!     factory.update(16);
//! }
//! assert!(factory.robots()[0].target().is_some());
//! # Ok::<(), robofab_sim::FactoryError>(())
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod factory;
pub mod floor;
pub mod layout;
pub mod machine;
pub mod pool;
pub mod robot;
pub mod timer;

pub use config::FactoryConfig;
pub use error::{FactoryError, FactoryResult, LayoutError};
pub use events::{Event, EventBus, EventKind, FactoryObserver};
pub use factory::{Factory, SortTask};
pub use floor::Floor;
pub use layout::Layout;
pub use machine::{MachineId, RobotId, Structure, StructureKind, Target};
pub use pool::CandidatePool;
pub use robot::{Robot, RobotState};
pub use timer::BusyTimer;
