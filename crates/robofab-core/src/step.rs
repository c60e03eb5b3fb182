//! Resumable computations: [`Resumable`], [`Step`], [`Sink`], [`Task`].
//!
//! A resumable computation is an algorithm whose loop body has been turned
//! inside out. Instead of running to completion it performs one bounded unit
//! of work per call and keeps everything it needs to continue in its own
//! fields: a phase enum plus saved state. The simulation loop calls
//! [`Resumable::resume`] once per tick, so no single tick ever pays for a
//! whole search.
//!
//! The computation itself only *returns* its result ([`Step::Done`]).
//! Delivering that result to whoever asked for it is the job of a [`Task`],
//! which pairs a computation with a [`Sink`] and guarantees the sink sees each
//! result exactly once.

use std::sync::mpsc::Sender;

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// Outcome of a single unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<R> {
    /// More work remains; resume again on a later tick.
    Pending,
    /// The computation finished on this step.
    Done(R),
    /// Nothing in flight: never begun, or already completed.
    Idle,
}

impl<R> Step<R> {
    /// Whether another `resume` call is needed.
    #[inline]
    pub fn has_more(&self) -> bool {
        matches!(self, Step::Pending)
    }

    /// Whether this step produced the result.
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, Step::Done(_))
    }

    /// Map the result, leaving `Pending` and `Idle` untouched.
    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Step<U> {
        match self {
            Step::Pending => Step::Pending,
            Step::Done(r) => Step::Done(f(r)),
            Step::Idle => Step::Idle,
        }
    }

    /// The result, if this step produced one.
    pub fn done(self) -> Option<R> {
        match self {
            Step::Done(r) => Some(r),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Resumable
// ---------------------------------------------------------------------------

/// An algorithm that advances one bounded unit of work per call.
///
/// Implementors must uphold:
///
/// - `begin` discards all state from any previous run before storing the new
///   arguments, then performs the first unit of work.
/// - `resume` performs exactly one unit of work.
/// - The step that returns [`Step::Done`] leaves the computation idle; every
///   later `resume` returns [`Step::Idle`] until the next `begin`.
pub trait Resumable {
    /// Arguments accepted by [`begin`](Self::begin).
    type Args;
    /// The result delivered on completion.
    type Output;

    /// Reset, store `args`, and perform the first unit of work.
    fn begin(&mut self, args: Self::Args) -> Step<Self::Output>;

    /// Perform the next unit of work.
    fn resume(&mut self) -> Step<Self::Output>;

    /// Whether a run is in flight.
    fn is_running(&self) -> bool;
}

/// Run `computation` to completion, blocking.
///
/// Returns the result (or `None` if the computation went idle without
/// producing one) and the number of units performed, counting `begin`.
pub fn finish<C: Resumable>(computation: &mut C, args: C::Args) -> (Option<C::Output>, usize) {
    let mut steps = 1;
    let mut step = computation.begin(args);
    while step.has_more() {
        steps += 1;
        step = computation.resume();
    }
    (step.done(), steps)
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Receiver of a computation's result.
pub trait Sink<R> {
    /// Accept a finished result.
    fn deliver(&mut self, result: R);
}

/// Sends the result over a channel. A hung-up receiver drops the result.
impl<R> Sink<R> for Sender<R> {
    fn deliver(&mut self, result: R) {
        let _ = self.send(result);
    }
}

/// Stores the latest result, replacing any unread one.
impl<R> Sink<R> for Option<R> {
    fn deliver(&mut self, result: R) {
        *self = Some(result);
    }
}

/// Collects every result in delivery order.
impl<R> Sink<R> for Vec<R> {
    fn deliver(&mut self, result: R) {
        self.push(result);
    }
}

/// Adapts a closure into a [`Sink`].
pub struct Callback<F>(pub F);

impl<R, F: FnMut(R)> Sink<R> for Callback<F> {
    fn deliver(&mut self, result: R) {
        (self.0)(result)
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A resumable computation bound to the sink that receives its results.
///
/// `Task` exposes the boolean "has more" contract used by the tick loop and
/// forwards each [`Step::Done`] to the sink at the step that produced it.
pub struct Task<C, S> {
    computation: C,
    sink: S,
    live: bool,
}

impl<C, S> Task<C, S>
where
    C: Resumable,
    S: Sink<C::Output>,
{
    /// Bind `computation` to `sink`. Nothing runs until [`begin`](Self::begin).
    pub fn new(computation: C, sink: S) -> Self {
        Self {
            computation,
            sink,
            live: false,
        }
    }

    /// Start a new run, abandoning any run still in flight.
    ///
    /// Returns `true` if the task needs further [`resume`](Self::resume)
    /// calls. If the run completed immediately the sink has already been
    /// called.
    pub fn begin(&mut self, args: C::Args) -> bool {
        let step = self.computation.begin(args);
        self.settle(step)
    }

    /// Perform one unit of work. A no-op returning `false` when idle.
    pub fn resume(&mut self) -> bool {
        if !self.live {
            return false;
        }
        let step = self.computation.resume();
        self.settle(step)
    }

    fn settle(&mut self, step: Step<C::Output>) -> bool {
        match step {
            Step::Pending => {
                self.live = true;
                true
            }
            Step::Done(result) => {
                self.live = false;
                self.sink.deliver(result);
                false
            }
            Step::Idle => {
                self.live = false;
                false
            }
        }
    }

    /// Whether a run is in flight.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// The wrapped computation.
    pub fn computation(&self) -> &C {
        &self.computation
    }

    /// Mutable access to the wrapped computation.
    ///
    /// Changes made here bypass the task; if they finish the run, the task
    /// only notices on the next `resume`.
    pub fn computation_mut(&mut self) -> &mut C {
        &mut self.computation
    }

    /// The sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the sink, e.g. to take a result out of a slot.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
