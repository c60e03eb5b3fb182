//! The per-tick driver.

use std::rc::Rc;

use robofab_core::{Point, Task};
use robofab_paths::{DistanceSort, Selection};

use crate::config::FactoryConfig;
use crate::error::{FactoryError, FactoryResult};
use crate::events::{Event, EventBus, FactoryObserver};
use crate::floor::Floor;
use crate::layout::Layout;
use crate::machine::{MachineId, RobotId, Structure, StructureKind, Target};
use crate::pool::CandidatePool;
use crate::robot::{Robot, RobotEvent, RobotState};

/// A [`DistanceSort`] wrapped with a slot for its result.
pub type SortTask = Task<DistanceSort<Target>, Option<Vec<Target>>>;

/// A factory floor with its machines and robots.
///
/// Each [`update`](Self::update) is one tick:
///
/// 1. every structure advances its busy timer;
/// 2. every robot advances its movement or work timer and resumes its
///    selector once;
/// 3. events raised during the tick are dispatched, idle changes first.
///
/// The factory owns both candidate pools. Robots only ever see copies, so a
/// selection result is checked against the pool before it is adopted.
pub struct Factory {
    floor: Rc<Floor>,
    config: FactoryConfig,
    structures: Vec<Structure>,
    robots: Vec<Robot>,
    producers: CandidatePool,
    consumers: CandidatePool,
    bus: EventBus,
    observers: Vec<Box<dyn FactoryObserver>>,
    tick: u64,
    elapsed_ms: u64,
}

impl Factory {
    /// An open floor of `size` cells with no machines.
    pub fn new(size: Point, config: FactoryConfig) -> FactoryResult<Self> {
        let floor = Floor::new(size, config.neighborhood);
        Self::with_floor(floor, config)
    }

    /// A factory on a prepared floor. Walls cannot change afterwards.
    pub fn with_floor(floor: Floor, config: FactoryConfig) -> FactoryResult<Self> {
        config.validate()?;
        Ok(Self {
            floor: Rc::new(floor),
            config,
            structures: Vec::new(),
            robots: Vec::new(),
            producers: CandidatePool::new(StructureKind::Producer),
            consumers: CandidatePool::new(StructureKind::Consumer),
            bus: EventBus::new(),
            observers: Vec::new(),
            tick: 0,
            elapsed_ms: 0,
        })
    }

    /// Build everything a [`Layout`] describes. Structures are placed
    /// before robots, so robots start picking right away.
    pub fn from_layout(layout: &Layout, config: FactoryConfig) -> FactoryResult<Self> {
        let mut floor = Floor::new(layout.size(), config.neighborhood);
        for &p in layout.walls() {
            floor.set_wall(p);
        }
        let mut factory = Self::with_floor(floor, config)?;
        for &p in layout.producers() {
            factory.add_producer(p)?;
        }
        for &p in layout.consumers() {
            factory.add_consumer(p)?;
        }
        for &p in layout.robots() {
            factory.add_robot(p)?;
        }
        log::info!(
            "factory {}x{}: {} structures, {} robots",
            layout.size().x,
            layout.size().y,
            factory.structures.len(),
            factory.robots.len()
        );
        Ok(factory)
    }

    pub fn add_producer(&mut self, pos: Point) -> FactoryResult<MachineId> {
        self.add_structure(StructureKind::Producer, pos)
    }

    pub fn add_consumer(&mut self, pos: Point) -> FactoryResult<MachineId> {
        self.add_structure(StructureKind::Consumer, pos)
    }

    fn check_cell(&self, pos: Point) -> FactoryResult<()> {
        if !self.floor.contains(pos) {
            return Err(FactoryError::OutOfBounds(pos));
        }
        if self.floor.is_wall(pos) {
            return Err(FactoryError::OnWall(pos));
        }
        Ok(())
    }

    fn add_structure(&mut self, kind: StructureKind, pos: Point) -> FactoryResult<MachineId> {
        self.check_cell(pos)?;
        if self.structure_at(pos).is_some() {
            return Err(FactoryError::Occupied(pos));
        }
        let id = MachineId(self.structures.len());
        let delay = match kind {
            StructureKind::Producer => self.config.producer_delay_ms,
            StructureKind::Consumer => self.config.consumer_delay_ms,
        };
        let structure = Structure::new(id, kind, pos, delay);
        let target = structure.target();
        self.structures.push(structure);
        self.make_available(kind, target);
        Ok(id)
    }

    /// Place an empty robot. It immediately starts picking a producer.
    pub fn add_robot(&mut self, pos: Point) -> FactoryResult<RobotId> {
        self.check_cell(pos)?;
        let id = RobotId(self.robots.len());
        let mut robot = Robot::new(id, pos, Rc::clone(&self.floor), &self.config);
        robot.pick(self.pool(robot.wants()).snapshot());
        self.robots.push(robot);
        Ok(id)
    }

    /// Register an observer for events and tick boundaries.
    pub fn observe(&mut self, observer: Box<dyn FactoryObserver>) {
        self.observers.push(observer);
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn structure(&self, id: MachineId) -> Option<&Structure> {
        self.structures.get(id.0)
    }

    pub fn structure_at(&self, pos: Point) -> Option<&Structure> {
        self.structures.iter().find(|s| s.pos() == pos)
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(id.0)
    }

    /// Idle, unreserved structures of `kind`.
    pub fn pool(&self, kind: StructureKind) -> &CandidatePool {
        match kind {
            StructureKind::Producer => &self.producers,
            StructureKind::Consumer => &self.consumers,
        }
    }

    fn pool_mut(&mut self, kind: StructureKind) -> &mut CandidatePool {
        match kind {
            StructureKind::Producer => &mut self.producers,
            StructureKind::Consumer => &mut self.consumers,
        }
    }

    /// Number of ticks run so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated time so far, in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Begin sorting every structure by distance to `origin`, nearest first.
    ///
    /// Resume the returned task until it is no longer live; the sorted
    /// targets are then in its slot.
    pub fn structures_by_distance(&self, origin: Point) -> SortTask {
        let targets = self.structures.iter().map(Structure::target).collect();
        let mut task = Task::new(DistanceSort::new(), None);
        task.begin((origin, targets));
        task
    }

    /// Run one tick of `dt` milliseconds.
    pub fn update(&mut self, dt: u32) {
        self.tick += 1;
        self.elapsed_ms += u64::from(dt);

        for s in &mut self.structures {
            if s.update(dt) {
                self.bus.push(Event::IdleChanged {
                    machine: s.id(),
                    idle: true,
                });
            }
        }

        for i in 0..self.robots.len() {
            if let Some(event) = self.robots[i].update(dt) {
                self.handle_robot(i, event);
            }
        }

        while let Some(event) = self.bus.pop() {
            for o in &mut self.observers {
                o.on_event(&event);
            }
            self.dispatch(event);
        }

        for o in &mut self.observers {
            o.on_tick(self.tick, self.elapsed_ms);
        }
    }

    fn handle_robot(&mut self, i: usize, event: RobotEvent) {
        match event {
            RobotEvent::Selected(selection) => self.settle_selection(i, selection),
            RobotEvent::Arrived(target) => self.arrive(i, target),
            RobotEvent::WorkDone => {
                let robot = &self.robots[i];
                log::info!(
                    "{} {} at {}",
                    robot.id(),
                    if robot.is_loaded() { "loaded" } else { "unloaded" },
                    robot.pos()
                );
                self.bus.push(Event::TargetChanged {
                    robot: robot.id(),
                    target: None,
                });
            }
        }
    }

    fn settle_selection(&mut self, i: usize, selection: Selection<Target>) {
        let kind = self.robots[i].wants();
        let Some(target) = selection.target else {
            log::debug!("{} found no reachable {}", self.robots[i].id(), kind);
            self.robots[i].wait();
            return;
        };

        if !self.pool_mut(kind).remove(target.id) {
            log::warn!(
                "{} selected {} after it was taken, picking again",
                self.robots[i].id(),
                target.id
            );
            let candidates = self.pool(kind).snapshot();
            self.robots[i].pick(candidates);
            return;
        }

        let robot = &mut self.robots[i];
        let id = robot.id();
        self.structures[target.id.0].reserve(id);
        let here = robot.adopt(target, selection.path);
        log::info!("{} heads for {} {} at {}", id, kind, target.id, target.pos);
        self.bus.push(Event::TargetChanged {
            robot: id,
            target: Some(target.id),
        });
        if here {
            self.arrive(i, target);
        }
    }

    fn arrive(&mut self, i: usize, target: Target) {
        let robot = &mut self.robots[i];
        let structure = &mut self.structures[target.id.0];
        let reserved = structure.reserved_by() == Some(robot.id());
        if reserved && structure.is_idle() && structure.pos() == robot.pos() {
            structure.serve();
            robot.start_work();
            log::debug!("{} serves {} at {}", target.id, robot.id(), target.pos);
            self.bus.push(Event::IdleChanged {
                machine: target.id,
                idle: false,
            });
            return;
        }

        log::warn!("{} reached {} but it is unavailable", robot.id(), target.id);
        robot.drop_target();
        let id = robot.id();
        if reserved {
            structure.release();
            if structure.is_idle() {
                let kind = structure.kind();
                self.make_available(kind, target);
            }
        }
        self.bus.push(Event::TargetChanged {
            robot: id,
            target: None,
        });
    }

    fn dispatch(&mut self, event: Event) {
        log::debug!("dispatch {event:?}");
        match event {
            Event::IdleChanged { machine, idle: true } => {
                let structure = &self.structures[machine.0];
                let (kind, target) = (structure.kind(), structure.target());
                self.make_available(kind, target);
            }
            Event::IdleChanged { idle: false, .. } => {}
            Event::TargetChanged {
                robot,
                target: Some(taken),
            } => {
                for r in self.robots.iter_mut().filter(|r| r.id() != robot) {
                    if !r.forget(taken) {
                        log::debug!("{} lost its best candidate {}", r.id(), taken);
                        let candidates = match r.wants() {
                            StructureKind::Producer => self.producers.snapshot(),
                            StructureKind::Consumer => self.consumers.snapshot(),
                        };
                        r.pick(candidates);
                    }
                }
            }
            Event::TargetChanged {
                robot,
                target: None,
            } => {
                let i = robot.0;
                if !self.robots[i].is_selecting() {
                    let candidates = self.pool(self.robots[i].wants()).snapshot();
                    self.robots[i].pick(candidates);
                }
            }
        }
    }

    /// Return `target` to its pool and restart every robot that is looking
    /// for that kind without a target.
    fn make_available(&mut self, kind: StructureKind, target: Target) {
        if !self.pool_mut(kind).insert(target) {
            return;
        }
        log::debug!("{} {} available at {}", kind, target.id, target.pos);
        let candidates = self.pool(kind).snapshot();
        for r in &mut self.robots {
            let idle = matches!(r.state(), RobotState::Picking | RobotState::Waiting);
            if idle && r.wants() == kind {
                r.pick(candidates.clone());
            }
        }
    }
}
