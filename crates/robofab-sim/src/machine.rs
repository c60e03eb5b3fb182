//! Producers, consumers and the handles robots use to target them.

use std::fmt;

use robofab_core::Point;
use robofab_paths::{Candidate, Located};

use crate::timer::BusyTimer;

/// Identifies a structure within its factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MachineId(pub usize);

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "machine #{}", self.0)
    }
}

/// Identifies a robot within its factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RobotId(pub usize);

impl fmt::Display for RobotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "robot #{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    /// Hands an item to an empty robot.
    Producer,
    /// Takes an item from a loaded robot.
    Consumer,
}

impl StructureKind {
    /// The kind a robot serves next: producers when empty, consumers when
    /// loaded.
    pub fn wanted_by(loaded: bool) -> Self {
        if loaded { Self::Consumer } else { Self::Producer }
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Producer => "producer",
            Self::Consumer => "consumer",
        })
    }
}

/// A stationary machine on the floor.
///
/// An idle structure is available to robots. Serving a robot restarts its
/// timer and keeps it busy for its delay.
#[derive(Debug, Clone)]
pub struct Structure {
    id: MachineId,
    kind: StructureKind,
    pos: Point,
    timer: BusyTimer,
    reserved: Option<RobotId>,
}

impl Structure {
    pub fn new(id: MachineId, kind: StructureKind, pos: Point, delay_ms: u32) -> Self {
        Self {
            id,
            kind,
            pos,
            timer: BusyTimer::new(delay_ms),
            reserved: None,
        }
    }

    pub fn id(&self) -> MachineId {
        self.id
    }

    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn is_idle(&self) -> bool {
        self.timer.is_idle()
    }

    /// Busy progress in percent.
    pub fn progress(&self) -> u32 {
        self.timer.progress()
    }

    /// The robot this structure has been promised to, if any.
    pub fn reserved_by(&self) -> Option<RobotId> {
        self.reserved
    }

    pub(crate) fn reserve(&mut self, robot: RobotId) {
        self.reserved = Some(robot);
    }

    pub(crate) fn release(&mut self) {
        self.reserved = None;
    }

    /// Start serving the robot that reserved this structure.
    pub(crate) fn serve(&mut self) {
        self.reserved = None;
        self.timer.restart();
    }

    /// Advance the timer. Returns `true` when the structure turns idle.
    pub(crate) fn update(&mut self, dt: u32) -> bool {
        self.timer.update(dt)
    }

    /// The handle robots select and travel to.
    pub fn target(&self) -> Target {
        Target {
            id: self.id,
            pos: self.pos,
        }
    }
}

/// A structure as seen by a robot's selector: a stable id and a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub id: MachineId,
    pub pos: Point,
}

impl Located for Target {
    fn point(&self) -> Point {
        self.pos
    }
}

impl Candidate for Target {
    type Key = MachineId;

    fn key(&self) -> MachineId {
        self.id
    }
}
