//! Stepped best-candidate selection.

use robofab_core::{Point, Resumable, Step};

use crate::search::{Path, PathSearch};
use crate::traits::{Candidate, Pather};

/// Result of a [`TargetSelector`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<C> {
    /// The chosen candidate, or `None` if no candidate was reachable.
    pub target: Option<C>,
    /// Path from the target back to the origin. Empty without a target.
    pub path: Path,
}

impl<C> Selection<C> {
    /// A selection that chose nothing.
    pub fn none() -> Self {
        Self {
            target: None,
            path: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    /// Delegating to the search for the last pending candidate.
    Searching,
    /// Begin the search for the last pending candidate.
    Next,
    /// Nothing left to search; deliver the retained best.
    Finish,
}

/// Picks the candidate with the shortest path from an origin.
///
/// The selector owns a single [`PathSearch`] and runs it against each
/// candidate in turn, consuming the list from the back. Every
/// [`resume`](Resumable::resume) performs one unit: a delegated search step
/// or the switch to the next candidate.
///
/// Only strictly shorter paths replace the retained best, so among equally
/// short paths the first one found wins. Because candidates are consumed from
/// the back, that is the one supplied *last*.
pub struct TargetSelector<P, C> {
    search: PathSearch<P>,
    origin: Point,
    pending: Vec<C>,
    best: Option<(C, Path)>,
    phase: Phase,
}

impl<P: Pather, C: Candidate> TargetSelector<P, C> {
    /// Create an idle selector over `pather`.
    pub fn new(pather: P) -> Self {
        Self {
            search: PathSearch::new(pather),
            origin: Point::ZERO,
            pending: Vec::new(),
            best: None,
            phase: Phase::Idle,
        }
    }

    /// The origin of the current (or last) run.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The owned path search.
    pub fn search(&self) -> &PathSearch<P> {
        &self.search
    }

    /// Candidates not yet fully searched, including the one under search.
    pub fn pending(&self) -> &[C] {
        &self.pending
    }

    /// The candidate currently being searched.
    pub fn current(&self) -> Option<&C> {
        match self.phase {
            Phase::Searching => self.pending.last(),
            _ => None,
        }
    }

    /// The best candidate and path found so far.
    pub fn best(&self) -> Option<(&C, &[Point])> {
        self.best.as_ref().map(|(c, p)| (c, p.as_slice()))
    }

    /// Withdraw the candidate identified by `key` from the current run.
    ///
    /// A pending candidate is dropped; if it was under search, the search is
    /// abandoned and the next resume moves on. Returns `false` if the
    /// withdrawn candidate was the retained best: the remaining result can no
    /// longer be trusted and the caller should begin a fresh run.
    pub fn forget(&mut self, key: C::Key) -> bool {
        if self.phase == Phase::Idle {
            return true;
        }
        if let Some(i) = self.pending.iter().rposition(|c| c.key() == key) {
            let under_search = self.phase == Phase::Searching && i + 1 == self.pending.len();
            self.pending.remove(i);
            if under_search {
                self.search.cancel();
                self.phase = if self.pending.is_empty() {
                    Phase::Finish
                } else {
                    Phase::Next
                };
            }
        }
        if self.best.as_ref().is_some_and(|(c, _)| c.key() == key) {
            self.best = None;
            return false;
        }
        true
    }

    fn start_next(&mut self) -> Step<Selection<C>> {
        let Some(goal) = self.pending.last().map(|c| c.point()) else {
            return self.finish();
        };
        self.phase = Phase::Searching;
        let step = self.search.begin((self.origin, goal));
        self.absorb(step)
    }

    fn absorb(&mut self, step: Step<Path>) -> Step<Selection<C>> {
        match step {
            Step::Pending => Step::Pending,
            Step::Done(path) => self.settle(path),
            // The search never goes idle on its own without a result.
            Step::Idle => {
                self.phase = Phase::Next;
                Step::Pending
            }
        }
    }

    fn settle(&mut self, path: Path) -> Step<Selection<C>> {
        let Some(candidate) = self.pending.pop() else {
            return self.finish();
        };
        let shorter = !path.is_empty()
            && self
                .best
                .as_ref()
                .is_none_or(|(_, best)| path.len() < best.len());
        if shorter {
            self.best = Some((candidate, path));
        }
        if self.pending.is_empty() {
            self.finish()
        } else {
            self.phase = Phase::Next;
            Step::Pending
        }
    }

    fn finish(&mut self) -> Step<Selection<C>> {
        self.phase = Phase::Idle;
        self.pending.clear();
        match self.best.take() {
            Some((target, path)) => Step::Done(Selection {
                target: Some(target),
                path,
            }),
            None => Step::Done(Selection::none()),
        }
    }
}

impl<P: Pather, C: Candidate> Resumable for TargetSelector<P, C> {
    type Args = (Point, Vec<C>);
    type Output = Selection<C>;

    /// Start selecting among `candidates` from `origin`.
    ///
    /// An empty candidate list completes immediately with no target.
    fn begin(&mut self, (origin, candidates): (Point, Vec<C>)) -> Step<Selection<C>> {
        self.search.cancel();
        self.origin = origin;
        self.pending = candidates;
        self.best = None;
        self.start_next()
    }

    fn resume(&mut self) -> Step<Selection<C>> {
        match self.phase {
            Phase::Idle => Step::Idle,
            Phase::Searching => {
                let step = self.search.resume();
                self.absorb(step)
            }
            Phase::Next => self.start_next(),
            Phase::Finish => self.finish(),
        }
    }

    fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighbors::Neighborhood;
    use robofab_core::{Range, Task, finish};

    struct Floor {
        rng: Range,
        walls: Vec<Point>,
    }

    impl Floor {
        fn open(w: i32, h: i32) -> Self {
            Self {
                rng: Range::sized(w, h),
                walls: Vec::new(),
            }
        }
    }

    impl Pather for Floor {
        fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
            Neighborhood::Eight.extend(
                p,
                |n| self.rng.contains(n) && !self.walls.contains(&n),
                buf,
            );
        }
    }

    /// A machine identified by number.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    struct Machine(u32, Point);

    impl crate::traits::Located for Machine {
        fn point(&self) -> Point {
            self.1
        }
    }

    impl Candidate for Machine {
        type Key = u32;
        fn key(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn empty_candidates_complete_at_begin() {
        let floor = Floor::open(5, 5);
        let mut sel: TargetSelector<_, Point> = TargetSelector::new(&floor);
        assert_eq!(
            sel.begin((Point::ZERO, Vec::new())),
            Step::Done(Selection::none())
        );
        assert!(!sel.is_running());
        assert_eq!(sel.resume(), Step::Idle);
    }

    #[test]
    fn later_supplied_candidate_wins_a_tie() {
        // Both targets are four moves away; (0, 4) is consumed first.
        let floor = Floor::open(5, 5);
        let mut sel = TargetSelector::new(&floor);
        let candidates = vec![Point::new(4, 4), Point::new(0, 4)];
        let (out, _) = finish(&mut sel, (Point::new(0, 0), candidates));
        let out = out.unwrap();
        assert_eq!(out.target, Some(Point::new(0, 4)));
        assert_eq!(out.path.len(), 5);
        assert_eq!(out.path.first(), Some(&Point::new(0, 4)));
        assert_eq!(out.path.last(), Some(&Point::new(0, 0)));

        // Reversing the supply order flips the winner.
        let candidates = vec![Point::new(0, 4), Point::new(4, 4)];
        let (out, _) = finish(&mut sel, (Point::new(0, 0), candidates));
        assert_eq!(out.unwrap().target, Some(Point::new(4, 4)));
    }

    #[test]
    fn picks_the_nearest_by_path_not_by_air() {
        // A wall makes the machine right across it the long way round.
        let mut floor = Floor::open(9, 9);
        floor.walls = (0..8).map(|y| Point::new(4, y)).collect();
        let near_by_air = Machine(1, Point::new(5, 0));
        let near_by_path = Machine(2, Point::new(0, 6));
        let mut sel = TargetSelector::new(&floor);
        let (out, _) = finish(&mut sel, (Point::new(3, 0), vec![near_by_path, near_by_air]));
        assert_eq!(out.unwrap().target, Some(near_by_path));
    }

    #[test]
    fn unreachable_candidates_are_never_chosen() {
        let mut floor = Floor::open(6, 6);
        floor.walls = vec![Point::new(4, 4), Point::new(4, 5), Point::new(5, 4)];
        let boxed_in = Point::new(5, 5);
        let mut sel = TargetSelector::new(&floor);

        let (out, _) = finish(&mut sel, (Point::ZERO, vec![boxed_in]));
        assert_eq!(out, Some(Selection::none()));

        let far = Point::new(0, 5);
        let (out, _) = finish(&mut sel, (Point::ZERO, vec![far, boxed_in]));
        assert_eq!(out.unwrap().target, Some(far));
    }

    #[test]
    fn best_length_never_increases() {
        let floor = Floor::open(10, 10);
        let candidates = vec![
            Point::new(1, 1),
            Point::new(9, 0),
            Point::new(5, 5),
            Point::new(2, 8),
            Point::new(9, 9),
        ];
        let mut sel = TargetSelector::new(&floor);
        let mut step = sel.begin((Point::new(0, 0), candidates));
        let mut last = usize::MAX;
        while step.has_more() {
            if let Some((_, path)) = sel.best() {
                assert!(path.len() <= last);
                last = path.len();
            }
            step = sel.resume();
        }
        assert_eq!(step.done().unwrap().target, Some(Point::new(1, 1)));
    }

    #[test]
    fn each_resume_is_one_search_step_or_one_switch() {
        let floor = Floor::open(6, 6);
        let candidates = vec![Point::new(5, 5), Point::new(0, 5), Point::new(5, 0)];
        let mut sel = TargetSelector::new(&floor);
        let mut step = sel.begin((Point::new(2, 2), candidates));
        let mut prev = sel.search().stats().total();
        let mut switches = 0;
        while step.has_more() {
            let searching = sel.current().is_some();
            step = sel.resume();
            let now = sel.search().stats().total();
            if searching {
                assert_eq!(now, prev + 1);
            } else {
                // Switching begins the next search, which pops its start.
                switches += 1;
                assert_eq!(now, 1);
            }
            prev = now;
        }
        assert_eq!(switches, 2);
    }

    #[test]
    fn forget_pending_candidate() {
        let floor = Floor::open(8, 8);
        let a = Machine(1, Point::new(1, 0));
        let b = Machine(2, Point::new(7, 7));
        let c = Machine(3, Point::new(0, 3));
        let mut sel = TargetSelector::new(&floor);
        sel.begin((Point::ZERO, vec![a, b, c]));
        // `c` is under search; `a` is still waiting.
        assert!(sel.forget(1));
        assert_eq!(sel.pending(), &[b, c]);
        assert_eq!(sel.current(), Some(&c));
        let mut step = sel.resume();
        while step.has_more() {
            step = sel.resume();
        }
        assert_eq!(step.done().unwrap().target, Some(c));
    }

    #[test]
    fn forget_candidate_under_search() {
        let floor = Floor::open(8, 8);
        let a = Machine(1, Point::new(7, 0));
        let b = Machine(2, Point::new(1, 1));
        let mut sel = TargetSelector::new(&floor);
        sel.begin((Point::ZERO, vec![a, b]));
        assert_eq!(sel.current(), Some(&b));
        assert!(sel.forget(2));
        assert_eq!(sel.current(), None);
        let mut step = sel.resume();
        assert_eq!(sel.current(), Some(&a));
        while step.has_more() {
            step = sel.resume();
        }
        assert_eq!(step.done().unwrap().target, Some(a));
    }

    #[test]
    fn forget_last_candidate_finishes() {
        let floor = Floor::open(4, 4);
        let a = Machine(1, Point::new(3, 3));
        let mut sel = TargetSelector::new(&floor);
        sel.begin((Point::ZERO, vec![a]));
        assert!(sel.forget(1));
        assert_eq!(sel.resume(), Step::Done(Selection::none()));
    }

    #[test]
    fn forget_best_reports_untrusted() {
        let floor = Floor::open(8, 8);
        let far = Machine(1, Point::new(7, 7));
        let near = Machine(2, Point::new(1, 0));
        let mut sel = TargetSelector::new(&floor);
        let mut step = sel.begin((Point::ZERO, vec![far, near]));
        while sel.best().is_none() {
            step = sel.resume();
        }
        assert!(step.has_more());
        assert!(!sel.forget(2));
        assert!(sel.best().is_none());
        assert!(sel.forget(99));
    }

    #[test]
    fn forget_when_idle_is_harmless() {
        let floor = Floor::open(4, 4);
        let mut sel: TargetSelector<_, Machine> = TargetSelector::new(&floor);
        assert!(sel.forget(7));
        assert_eq!(sel.resume(), Step::Idle);
    }

    #[test]
    fn rebegin_matches_fresh_instance() {
        let floor = Floor::open(7, 7);
        let mut reused = TargetSelector::new(&floor);
        finish(&mut reused, (Point::new(6, 6), vec![Point::new(0, 0), Point::new(3, 6)]));
        reused.begin((Point::new(0, 6), vec![Point::new(6, 0)]));
        reused.resume();

        let args = (Point::new(3, 3), vec![Point::new(0, 0), Point::new(6, 5)]);
        let mut fresh = TargetSelector::new(&floor);
        assert_eq!(finish(&mut reused, args.clone()), finish(&mut fresh, args));
    }

    #[test]
    fn task_delivers_selection_once() {
        let floor = Floor::open(5, 5);
        let mut task = Task::new(TargetSelector::new(&floor), Vec::new());
        let mut ticks = 0;
        let mut live = task.begin((Point::new(0, 0), vec![Point::new(4, 4), Point::new(0, 4)]));
        while live {
            ticks += 1;
            live = task.resume();
        }
        assert!(ticks > 0);
        assert!(!task.resume());
        assert_eq!(task.sink().len(), 1);
        assert_eq!(task.sink()[0].target, Some(Point::new(0, 4)));
    }
}
