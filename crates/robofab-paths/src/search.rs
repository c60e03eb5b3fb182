//! Stepped A*-style shortest-path search.

use std::collections::{BinaryHeap, HashMap, HashSet};

use robofab_core::{Point, Resumable, Step};

use crate::traits::Pather;

/// A path from goal back to start, both included. Empty when unreachable.
pub type Path = Vec<Point>;

/// Frontier entry, ordered by `f` for use in `BinaryHeap`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Frontier {
    f: i32,
    pos: Point,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first. Position
        // only keeps Ord consistent with Eq; it is not a tie-break policy.
        other.f.cmp(&self.f).then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Pop the most promising frontier point.
    Pop,
    /// Visit `neighbors[next]` of `current`.
    Expand { current: Point, next: usize },
    /// Append the predecessor of `at` to the path.
    Trace { at: Point },
}

/// Units of work performed by the current run, one counter per phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub pops: usize,
    pub visits: usize,
    pub traces: usize,
}

impl SearchStats {
    /// Total units performed.
    pub fn total(&self) -> usize {
        self.pops + self.visits + self.traces
    }
}

/// Shortest-path search that advances one unit of work per [`resume`].
///
/// Each call performs exactly one of: a frontier pop, a single neighbor
/// visit, or a single path-reconstruction step. All tables live in the
/// struct and are cleared by [`begin`], so one instance can serve any
/// number of searches in sequence.
///
/// [`begin`]: Resumable::begin
/// [`resume`]: Resumable::resume
pub struct PathSearch<P> {
    pather: P,
    goal: Point,
    phase: Phase,
    open: BinaryHeap<Frontier>,
    open_set: HashSet<Point>,
    closed: HashSet<Point>,
    came_from: HashMap<Point, Point>,
    g_score: HashMap<Point, i32>,
    f_score: HashMap<Point, i32>,
    neighbors: Vec<Point>,
    path: Path,
    stats: SearchStats,
}

impl<P: Pather> PathSearch<P> {
    /// Create an idle search over `pather`.
    pub fn new(pather: P) -> Self {
        Self {
            pather,
            goal: Point::ZERO,
            phase: Phase::Idle,
            open: BinaryHeap::new(),
            open_set: HashSet::new(),
            closed: HashSet::new(),
            came_from: HashMap::new(),
            g_score: HashMap::new(),
            f_score: HashMap::new(),
            neighbors: Vec::with_capacity(8),
            path: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// The graph being searched.
    pub fn pather(&self) -> &P {
        &self.pather
    }

    /// The goal of the current (or last) run.
    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Work performed by the current (or last) run.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Best known cost from the start to `p`, if `p` has been reached.
    pub fn g_score(&self, p: Point) -> Option<i32> {
        self.g_score.get(&p).copied()
    }

    /// Estimated total cost through `p`, if `p` has been reached.
    pub fn f_score(&self, p: Point) -> Option<i32> {
        self.f_score.get(&p).copied()
    }

    /// Whether `p` is currently on the frontier.
    pub fn is_open(&self, p: Point) -> bool {
        self.open_set.contains(&p)
    }

    /// Whether `p` has been expanded.
    pub fn is_closed(&self, p: Point) -> bool {
        self.closed.contains(&p)
    }

    /// Abandon the current run. Its tables are released on the next `begin`.
    pub(crate) fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    fn reset(&mut self) {
        self.open.clear();
        self.open_set.clear();
        self.closed.clear();
        self.came_from.clear();
        self.g_score.clear();
        self.f_score.clear();
        self.neighbors.clear();
        self.path.clear();
        self.stats = SearchStats::default();
    }

    fn pop(&mut self) -> Step<Path> {
        self.stats.pops += 1;
        let Some(Frontier { pos, .. }) = self.open.pop() else {
            // Frontier exhausted: the goal is unreachable.
            self.phase = Phase::Idle;
            return Step::Done(Vec::new());
        };

        // An improved point is pushed again; its older entry surfaces later.
        if self.closed.contains(&pos) {
            return Step::Pending;
        }

        if pos == self.goal {
            self.path.push(pos);
            self.phase = Phase::Trace { at: pos };
            return Step::Pending;
        }

        self.open_set.remove(&pos);
        self.closed.insert(pos);

        self.neighbors.clear();
        self.pather.neighbors(pos, &mut self.neighbors);
        if !self.neighbors.is_empty() {
            self.phase = Phase::Expand {
                current: pos,
                next: 0,
            };
        }
        Step::Pending
    }

    fn visit(&mut self, current: Point, next: usize) -> Step<Path> {
        let np = self.neighbors[next];
        self.stats.visits += 1;
        self.phase = if next + 1 < self.neighbors.len() {
            Phase::Expand {
                current,
                next: next + 1,
            }
        } else {
            Phase::Pop
        };

        if self.closed.contains(&np) {
            return Step::Pending;
        }

        // Every expanded point has a g-score.
        let current_g = self.g_score.get(&current).copied().unwrap_or_default();
        let tentative_g = current_g + self.pather.cost(current, np);
        if self.g_score.get(&np).is_some_and(|&g| g <= tentative_g) {
            return Step::Pending;
        }

        let f = tentative_g + self.pather.estimate(np, self.goal);
        self.came_from.insert(np, current);
        self.g_score.insert(np, tentative_g);
        self.f_score.insert(np, f);
        self.open_set.insert(np);
        self.open.push(Frontier { f, pos: np });
        Step::Pending
    }

    fn trace(&mut self, at: Point) -> Step<Path> {
        self.stats.traces += 1;
        match self.came_from.get(&at) {
            Some(&prev) => {
                self.path.push(prev);
                self.phase = Phase::Trace { at: prev };
                Step::Pending
            }
            None => {
                self.phase = Phase::Idle;
                Step::Done(std::mem::take(&mut self.path))
            }
        }
    }
}

impl<P: Pather> Resumable for PathSearch<P> {
    type Args = (Point, Point);
    type Output = Path;

    /// Start a search from `start` to `goal` and pop the start point.
    fn begin(&mut self, (start, goal): (Point, Point)) -> Step<Path> {
        self.reset();
        self.goal = goal;
        let f = self.pather.estimate(start, goal);
        self.g_score.insert(start, 0);
        self.f_score.insert(start, f);
        self.open_set.insert(start);
        self.open.push(Frontier { f, pos: start });
        self.phase = Phase::Pop;
        self.resume()
    }

    fn resume(&mut self) -> Step<Path> {
        match self.phase {
            Phase::Idle => Step::Idle,
            Phase::Pop => self.pop(),
            Phase::Expand { current, next } => self.visit(current, next),
            Phase::Trace { at } => self.trace(at),
        }
    }

    fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }
}
