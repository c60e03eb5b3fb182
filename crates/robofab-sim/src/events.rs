//! Typed factory notifications.
//!
//! Events are queued on an [`EventBus`] as they happen during a tick and
//! dispatched together at its end. The bus is a min-heap keyed by
//! `(kind, insertion order)`: lower-ranked kinds come out first and events of
//! the same kind come out FIFO.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::machine::{MachineId, RobotId};

/// Dispatch rank of an [`Event`]. Lower ranks are dispatched first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    IdleChanged = 0,
    TargetChanged = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A structure started or finished being busy.
    IdleChanged { machine: MachineId, idle: bool },
    /// A robot adopted a target, or dropped one (`None`) and needs another.
    TargetChanged {
        robot: RobotId,
        target: Option<MachineId>,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::IdleChanged { .. } => EventKind::IdleChanged,
            Self::TargetChanged { .. } => EventKind::TargetChanged,
        }
    }
}

#[derive(Debug)]
struct Entry {
    event: Event,
    kind: EventKind,
    /// Monotonically increasing counter used to break ties.
    seq: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Natural order; the heap wraps entries in `Reverse`.
        self.kind.cmp(&other.kind).then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Queue of pending [`Event`]s.
#[derive(Debug, Default)]
pub struct EventBus {
    heap: BinaryHeap<Reverse<Entry>>,
    seq: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry {
            event,
            kind: event.kind(),
            seq,
        }));
    }

    /// Pop the lowest-ranked event, oldest first within a kind.
    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(entry)| entry.event)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Watches a [`Factory`](crate::Factory) run.
///
/// Both methods default to doing nothing.
pub trait FactoryObserver {
    /// Called for every event the factory dispatches, in dispatch order.
    fn on_event(&mut self, _event: &Event) {}

    /// Called after tick number `tick` has been fully processed.
    fn on_tick(&mut self, _tick: u64, _elapsed_ms: u64) {}
}
