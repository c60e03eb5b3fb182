use std::rc::Rc;

use robofab_core::{Point, Task};
use robofab_paths::{Path, Selection, TargetSelector};

use crate::config::FactoryConfig;
use crate::floor::Floor;
use crate::machine::{MachineId, RobotId, StructureKind, Target};
use crate::timer::BusyTimer;

type Selector = TargetSelector<Rc<Floor>, Target>;

/// What a robot is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotState {
    /// A selection is in flight.
    Picking,
    /// No reachable candidate; waiting for the pool to change.
    Waiting,
    /// Walking the path to its target.
    Moving,
    /// Working at its target.
    Working,
}

/// Something the factory must act on, reported by [`Robot::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RobotEvent {
    /// The selector delivered its result.
    Selected(Selection<Target>),
    /// The robot stepped onto the last cell of its path.
    Arrived(Target),
    /// Work finished and the robot picked up or dropped off its item.
    WorkDone,
}

/// A carrier shuttling items from producers to consumers.
///
/// Each robot owns one [`TargetSelector`]. While picking, every
/// [`update`](Self::update) resumes it exactly once; the result lands in the
/// task's slot and is handed to the factory, which owns the candidate pools
/// and decides whether the choice still stands.
pub struct Robot {
    id: RobotId,
    pos: Point,
    loaded: bool,
    state: RobotState,
    target: Option<Target>,
    /// Remaining cells, next one last.
    path: Path,
    step_ms: u32,
    step_delay: u32,
    work: BusyTimer,
    selector: Task<Selector, Option<Selection<Target>>>,
}

impl Robot {
    pub(crate) fn new(id: RobotId, pos: Point, floor: Rc<Floor>, config: &FactoryConfig) -> Self {
        Self {
            id,
            pos,
            loaded: false,
            state: RobotState::Waiting,
            target: None,
            path: Vec::new(),
            step_ms: 0,
            step_delay: config.robot_step_ms,
            work: BusyTimer::new(config.robot_work_ms),
            selector: Task::new(TargetSelector::new(floor), None),
        }
    }

    pub fn id(&self) -> RobotId {
        self.id
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn state(&self) -> RobotState {
        self.state
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    /// The cells still to walk, in walking order.
    pub fn route(&self) -> impl Iterator<Item = Point> + '_ {
        self.path.iter().rev().copied()
    }

    /// The cell the robot is stepping into, if moving.
    pub fn next_step(&self) -> Option<Point> {
        self.path.last().copied()
    }

    /// How far the robot is into its current step, from 0 to 1.
    pub fn step_progress(&self) -> f32 {
        if self.state != RobotState::Moving || self.step_delay == 0 {
            return 0.0;
        }
        (self.step_ms as f32 / self.step_delay as f32).min(1.0)
    }

    /// Work progress at the target in percent.
    pub fn work_progress(&self) -> u32 {
        self.work.progress()
    }

    /// The kind of structure this robot is looking for.
    pub fn wants(&self) -> StructureKind {
        StructureKind::wanted_by(self.loaded)
    }

    /// Whether a selection is in flight.
    pub fn is_selecting(&self) -> bool {
        self.selector.is_live()
    }

    /// The candidate the in-flight selection currently favors.
    pub fn best_candidate(&self) -> Option<Target> {
        self.selector.computation().best().map(|(t, _)| *t)
    }

    /// Drop any target and start selecting among `candidates`.
    pub(crate) fn pick(&mut self, candidates: Vec<Target>) {
        log::debug!(
            "{} at {} picks among {} {}(s)",
            self.id,
            self.pos,
            candidates.len(),
            self.wants()
        );
        self.target = None;
        self.path.clear();
        self.step_ms = 0;
        self.state = RobotState::Picking;
        self.selector.begin((self.pos, candidates));
    }

    /// Withdraw a candidate from the in-flight selection. Returns `false`
    /// if the selection lost its best result and must be restarted.
    pub(crate) fn forget(&mut self, id: MachineId) -> bool {
        if !self.selector.is_live() {
            return true;
        }
        self.selector.computation_mut().forget(id)
    }

    pub(crate) fn wait(&mut self) {
        self.state = RobotState::Waiting;
    }

    /// Take `target` and the path to it. Returns `true` if the robot is
    /// already standing on it.
    pub(crate) fn adopt(&mut self, target: Target, mut path: Path) -> bool {
        if path.last() == Some(&self.pos) {
            path.pop();
        }
        self.target = Some(target);
        self.path = path;
        self.step_ms = 0;
        self.state = RobotState::Moving;
        self.path.is_empty()
    }

    pub(crate) fn start_work(&mut self) {
        self.state = RobotState::Working;
        self.work.restart();
    }

    /// Give up the current target without working at it.
    pub(crate) fn drop_target(&mut self) {
        self.target = None;
        self.path.clear();
        self.state = RobotState::Waiting;
    }

    /// Advance timers by `dt` milliseconds, then resume the selector once.
    pub(crate) fn update(&mut self, dt: u32) -> Option<RobotEvent> {
        match self.state {
            RobotState::Moving => {
                self.step_ms = self.step_ms.saturating_add(dt);
                if self.step_ms >= self.step_delay {
                    self.step_ms -= self.step_delay;
                    if let Some(next) = self.path.pop() {
                        self.pos = next;
                    }
                    if self.path.is_empty() {
                        self.step_ms = 0;
                        return self.target.map(RobotEvent::Arrived);
                    }
                }
            }
            RobotState::Working => {
                if self.work.update(dt) {
                    self.loaded = !self.loaded;
                    self.target = None;
                    self.state = RobotState::Waiting;
                    return Some(RobotEvent::WorkDone);
                }
            }
            RobotState::Picking | RobotState::Waiting => {}
        }

        self.selector.resume();
        self.selector.sink_mut().take().map(RobotEvent::Selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robofab_paths::Neighborhood;

    fn robot_on(w: i32, h: i32, pos: Point) -> Robot {
        let floor = Rc::new(Floor::new(Point::new(w, h), Neighborhood::Eight));
        Robot::new(RobotId(0), pos, floor, &FactoryConfig::default())
    }

    fn target(id: usize, x: i32, y: i32) -> Target {
        Target {
            id: MachineId(id),
            pos: Point::new(x, y),
        }
    }

    fn run_selection(robot: &mut Robot) -> Selection<Target> {
        for _ in 0..1000 {
            if let Some(RobotEvent::Selected(sel)) = robot.update(16) {
                return sel;
            }
        }
        panic!("selection never delivered");
    }

    #[test]
    fn starts_empty_and_wants_producers() {
        let robot = robot_on(5, 5, Point::new(2, 2));
        assert!(!robot.is_loaded());
        assert_eq!(robot.wants(), StructureKind::Producer);
        assert_eq!(robot.state(), RobotState::Waiting);
        assert!(!robot.is_selecting());
    }

    #[test]
    fn empty_pool_delivers_nothing_on_next_update() {
        let mut robot = robot_on(5, 5, Point::new(2, 2));
        robot.pick(Vec::new());
        assert_eq!(
            robot.update(16),
            Some(RobotEvent::Selected(Selection::none()))
        );
    }

    #[test]
    fn one_selector_step_per_update() {
        let mut robot = robot_on(8, 8, Point::ZERO);
        robot.pick(vec![target(0, 7, 7)]);
        let mut updates = 0;
        let sel = loop {
            updates += 1;
            let stats = robot.selector.computation().search().stats().total();
            match robot.update(16) {
                Some(RobotEvent::Selected(sel)) => break sel,
                _ => assert_eq!(
                    robot.selector.computation().search().stats().total(),
                    stats + 1
                ),
            }
        };
        assert!(updates > 1);
        assert_eq!(sel.target, Some(target(0, 7, 7)));
        assert_eq!(sel.path.len(), 8);
    }

    #[test]
    fn walks_one_cell_per_step_delay() {
        let mut robot = robot_on(5, 5, Point::ZERO);
        robot.pick(vec![target(0, 3, 0)]);
        let sel = run_selection(&mut robot);
        let t = sel.target.unwrap();
        assert!(!robot.adopt(t, sel.path));
        assert_eq!(robot.state(), RobotState::Moving);
        assert_eq!(robot.next_step(), Some(Point::new(1, 0)));
        assert_eq!(
            robot.route().collect::<Vec<_>>(),
            vec![Point::new(1, 0), Point::new(2, 0), Point::new(3, 0)]
        );

        assert_eq!(robot.update(250), None);
        assert_eq!(robot.step_progress(), 0.5);
        assert_eq!(robot.update(250), None);
        assert_eq!(robot.pos(), Point::new(1, 0));
        assert_eq!(robot.update(500), None);
        assert_eq!(robot.pos(), Point::new(2, 0));
        assert_eq!(robot.update(500), Some(RobotEvent::Arrived(t)));
        assert_eq!(robot.pos(), Point::new(3, 0));
    }

    #[test]
    fn adopting_own_cell_arrives_at_once() {
        let mut robot = robot_on(3, 3, Point::new(1, 1));
        assert!(robot.adopt(target(0, 1, 1), vec![Point::new(1, 1)]));
        assert_eq!(robot.next_step(), None);
    }

    #[test]
    fn work_toggles_load() {
        let mut robot = robot_on(3, 3, Point::ZERO);
        robot.adopt(target(0, 0, 0), vec![Point::ZERO]);
        robot.start_work();
        assert_eq!(robot.state(), RobotState::Working);
        assert_eq!(robot.update(499), None);
        assert_eq!(robot.update(1), Some(RobotEvent::WorkDone));
        assert!(robot.is_loaded());
        assert_eq!(robot.wants(), StructureKind::Consumer);
        assert_eq!(robot.target(), None);
    }

    #[test]
    fn forget_without_selection_is_harmless() {
        let mut robot = robot_on(3, 3, Point::ZERO);
        assert!(robot.forget(MachineId(3)));
    }
}
