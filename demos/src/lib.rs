//! Shared pieces of the headless factory demo: an ASCII renderer and a
//! statistics observer.

use std::cell::RefCell;
use std::rc::Rc;

use robofab_core::Point;
use robofab_sim::{Event, Factory, FactoryObserver, RobotState, StructureKind};

/// Counters filled in by [`Stats`] while a factory runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Totals {
    pub ticks: u64,
    pub elapsed_ms: u64,
    /// Machines that started serving a robot.
    pub served: u64,
    /// Machines that finished and became available again.
    pub freed: u64,
    /// Targets adopted by robots.
    pub adopted: u64,
    /// Robots that dropped a target and went looking for another.
    pub released: u64,
}

/// Observer that tallies factory events into shared [`Totals`].
#[derive(Default)]
pub struct Stats {
    totals: Rc<RefCell<Totals>>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that stays readable after the observer is handed over.
    pub fn totals(&self) -> Rc<RefCell<Totals>> {
        Rc::clone(&self.totals)
    }
}

impl FactoryObserver for Stats {
    fn on_event(&mut self, event: &Event) {
        let mut t = self.totals.borrow_mut();
        match *event {
            Event::IdleChanged { idle: false, .. } => t.served += 1,
            Event::IdleChanged { idle: true, .. } => t.freed += 1,
            Event::TargetChanged {
                target: Some(_), ..
            } => t.adopted += 1,
            Event::TargetChanged { target: None, .. } => t.released += 1,
        }
    }

    fn on_tick(&mut self, tick: u64, elapsed_ms: u64) {
        let mut t = self.totals.borrow_mut();
        t.ticks = tick;
        t.elapsed_ms = elapsed_ms;
    }
}

/// Draw the floor as text.
///
/// Idle machines are `P`/`C`, busy ones `p`/`c`. Robots are `r` when empty
/// and `R` when loaded, drawn over whatever they stand on.
pub fn render(factory: &Factory) -> String {
    let size = factory.floor().size();
    let mut out = String::with_capacity(((size.x + 1) * size.y) as usize);
    for y in 0..size.y {
        if y > 0 {
            out.push('\n');
        }
        for x in 0..size.x {
            out.push(glyph(factory, Point::new(x, y)));
        }
    }
    out
}

fn glyph(factory: &Factory, p: Point) -> char {
    if let Some(r) = factory.robots().iter().find(|r| r.pos() == p) {
        return if r.is_loaded() { 'R' } else { 'r' };
    }
    if let Some(s) = factory.structure_at(p) {
        return match (s.kind(), s.is_idle()) {
            (StructureKind::Producer, true) => 'P',
            (StructureKind::Producer, false) => 'p',
            (StructureKind::Consumer, true) => 'C',
            (StructureKind::Consumer, false) => 'c',
        };
    }
    if factory.floor().is_wall(p) { '#' } else { '.' }
}

/// One status line per robot.
pub fn robot_lines(factory: &Factory) -> Vec<String> {
    factory
        .robots()
        .iter()
        .map(|r| {
            let doing = match r.state() {
                RobotState::Picking => match r.best_candidate() {
                    Some(t) => format!("picking a {} (best so far {})", r.wants(), t.id),
                    None => format!("picking a {}", r.wants()),
                },
                RobotState::Waiting => format!("waiting for a {}", r.wants()),
                RobotState::Moving => match r.target() {
                    Some(t) => format!(
                        "moving to {} at {}, {} cells left",
                        t.id,
                        t.pos,
                        r.route().count()
                    ),
                    None => "moving".to_string(),
                },
                RobotState::Working => format!("working ({}%)", r.work_progress()),
            };
            format!("{} at {}: {}", r.id(), r.pos(), doing)
        })
        .collect()
}
