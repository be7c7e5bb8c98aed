//! # Tick Source
//!
//! The contract between the scheduler and whatever produces ticks. A
//! source must arrange for [`Scheduler::tick`](crate::Scheduler::tick) to
//! be called exactly once per tick period, from a context that never runs
//! concurrently with itself. Missed ticks are not compensated.

/// Periodic tick generator driven by the scheduler's lifecycle calls.
pub trait TickSource {
    /// Configure the period (`1 / TICK_HZ`) and begin delivering ticks.
    fn start(&mut self);

    /// Stop delivering ticks without losing configuration.
    fn halt(&mut self);

    /// Resume delivery after [`TickSource::halt`].
    fn resume(&mut self);
}

/// Tick source for hosts and simulations.
///
/// It only records whether delivery is enabled; the owner calls
/// `Scheduler::tick` itself, for example from a dedicated timer thread or
/// a test loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManualTickSource {
    started: bool,
    running: bool,
}

impl ManualTickSource {
    pub const fn new() -> Self {
        Self {
            started: false,
            running: false,
        }
    }

    pub const fn is_started(&self) -> bool {
        self.started
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }
}

impl TickSource for ManualTickSource {
    fn start(&mut self) {
        self.started = true;
        self.running = true;
    }

    fn halt(&mut self) {
        self.running = false;
    }

    fn resume(&mut self) {
        self.running = self.started;
    }
}
