use robofab_core::Point;

use crate::machine::{MachineId, StructureKind, Target};

/// Idle, unreserved structures of one kind, in the order they became
/// available.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    kind: StructureKind,
    items: Vec<Target>,
}

impl CandidatePool {
    pub fn new(kind: StructureKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: MachineId) -> bool {
        self.items.iter().any(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.items.iter()
    }

    /// Positions of every candidate, in pool order.
    pub fn points(&self) -> Vec<Point> {
        self.items.iter().map(|t| t.pos).collect()
    }

    /// A copy of the pool for a selector to consume.
    pub fn snapshot(&self) -> Vec<Target> {
        self.items.clone()
    }

    /// Append `target`. Returns `false` if it was already listed.
    pub fn insert(&mut self, target: Target) -> bool {
        if self.contains(target.id) {
            return false;
        }
        self.items.push(target);
        true
    }

    /// Remove the candidate with `id`. Returns `false` if it was not listed.
    pub fn remove(&mut self, id: MachineId) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: usize, x: i32) -> Target {
        Target {
            id: MachineId(id),
            pos: Point::new(x, 0),
        }
    }

    #[test]
    fn keeps_insertion_order_without_duplicates() {
        let mut pool = CandidatePool::new(StructureKind::Producer);
        assert!(pool.insert(target(2, 5)));
        assert!(pool.insert(target(0, 1)));
        assert!(!pool.insert(target(2, 5)));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.points(), vec![Point::new(5, 0), Point::new(1, 0)]);
    }

    #[test]
    fn remove_reports_membership() {
        let mut pool = CandidatePool::new(StructureKind::Consumer);
        pool.insert(target(1, 1));
        pool.insert(target(3, 3));
        assert!(pool.remove(MachineId(1)));
        assert!(!pool.remove(MachineId(1)));
        assert!(!pool.contains(MachineId(1)));
        assert_eq!(pool.snapshot(), vec![target(3, 3)]);
        assert!(pool.remove(MachineId(3)));
        assert!(pool.is_empty());
    }
}
