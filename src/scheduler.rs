//! # Scheduler
//!
//! The scheduler object: task table, tick counter and tick source behind a
//! single critical-section mutex, plus the foreground API and the tick
//! entry point.
//!
//! ## Tick Algorithm
//!
//! At each tick delivered by the [`TickSource`]:
//! 1. **Advance the counter** by one (wrapping)
//! 2. **Collect the due set**: handles of every unpaused task due at
//!    `now`, in slot order, taken under the same lock as step 1
//! 3. **Fire each handle** in turn via [`dispatch::fire`]:
//!    a. Skip it if the task has since been removed or is no longer due
//!    b. Reschedule a due recurring task to `now + interval`
//!    c. Remove a due one-shot task
//!    d. Run the task's callback with the table unlocked
//!
//! ## Locking
//!
//! Every foreground call does all of its table work inside one critical
//! section, so it lands either entirely before or entirely after any tick
//! pass step. The tick path takes the same guard per step and drops it
//! around each callback, which lets callbacks call back into the API.
//! The pass follows handles rather than slots, so removals that compact
//! the table mid-pass never skip a due task, and tasks added mid-pass
//! (immediate or not) first run on a later tick.
//!
//! ## Placement
//!
//! [`Scheduler::new`] is `const`, so the scheduler can live in a `static`
//! shared by `main` and the tick interrupt:
//!
//! ```ignore
//! static SCHEDULER: Scheduler<SysTickSource> = Scheduler::new();
//!
//! #[exception]
//! fn SysTick() {
//!     SCHEDULER.tick();
//! }
//! ```

use core::cell::RefCell;

use log::{debug, info, warn};

use crate::config::MAX_TASKS;
use crate::dispatch::{self, DueSet};
use crate::error::{SchedError, SchedResult};
use crate::source::TickSource;
use crate::sync::{self, Mutex};
use crate::table::TaskTable;
use crate::task::{Task, TaskFn, TaskId, TaskInfo, TaskMode, TaskStatus};
use crate::time::{self, Tick};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

struct State<S> {
    table: TaskTable,
    /// Monotonic tick counter, wrapping at the `Tick` width.
    ticks: Tick,
    /// Last handle handed out. `0` is never issued.
    last_id: u32,
    /// `Some` once `init` has run.
    source: Option<S>,
    halted: bool,
}

impl<S> State<S> {
    fn source_mut(&mut self) -> SchedResult<&mut S> {
        self.source.as_mut().ok_or(SchedError::NotInitialized)
    }

    fn ensure_initialized(&self) -> SchedResult<()> {
        if self.source.is_some() {
            Ok(())
        } else {
            Err(SchedError::NotInitialized)
        }
    }

    /// Next unused, non-zero handle.
    fn allocate_id(&mut self) -> TaskId {
        // At most MAX_TASKS handles are live, so this terminates quickly
        loop {
            self.last_id = self.last_id.wrapping_add(1);
            let id = TaskId::from_raw(self.last_id);
            if self.last_id != 0 && self.table.find(id).is_none() {
                return id;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Periodic task scheduler driven by a tick source `S`.
pub struct Scheduler<S> {
    state: Mutex<RefCell<State<S>>>,
}

impl<S: TickSource> Scheduler<S> {
    /// Uninitialized scheduler with the counter at zero.
    pub const fn new() -> Self {
        Self::with_epoch(0)
    }

    /// Uninitialized scheduler whose counter starts at `epoch`.
    ///
    /// Useful for exercising counter rollover without waiting for it.
    pub const fn with_epoch(epoch: Tick) -> Self {
        Self {
            state: Mutex::new(RefCell::new(State {
                table: TaskTable::new(),
                ticks: epoch,
                last_id: 0,
                source: None,
                halted: false,
            })),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State<S>) -> R) -> R {
        sync::critical_section(|cs| f(&mut self.state.borrow_ref_mut(cs)))
    }

    /// Take ownership of the tick source, empty the table and start ticking.
    ///
    /// Calling it again on a running scheduler is a no-op; the extra source
    /// is dropped untouched and registered tasks are kept.
    pub fn init(&self, source: S) {
        self.with_state(|state| {
            if state.source.is_some() {
                debug!("scheduler already initialized");
                return;
            }
            state.table.clear();
            state.halted = false;
            let source = state.source.insert(source);
            source.start();
            info!(
                "scheduler initialized: {} slots, tick {}",
                MAX_TASKS, state.ticks
            );
        });
    }

    // -----------------------------------------------------------------------
    // Task registration
    // -----------------------------------------------------------------------

    /// Register `callback` to run every `interval` ticks.
    ///
    /// An `interval` outside `1..=MAX_INTERVAL` is replaced by
    /// `DEFAULT_INTERVAL` (50 ticks) and a warning is logged; it is never
    /// an error. The first run is one interval from now, or on the next
    /// tick if `mode.immediate` is set.
    ///
    /// # Errors
    /// - `NotInitialized` before [`Scheduler::init`]
    /// - `CapacityExceeded` when `MAX_TASKS` tasks are registered
    pub fn add_task(
        &self,
        callback: TaskFn,
        interval: u32,
        mode: impl Into<TaskMode>,
    ) -> SchedResult<TaskId> {
        let mode = mode.into();
        let interval = checked_interval(interval);
        self.with_state(|state| {
            state.ensure_initialized()?;
            if state.table.is_full() {
                warn!("task table full ({} tasks)", MAX_TASKS);
                return Err(SchedError::CapacityExceeded);
            }
            let id = state.allocate_id();
            let task = Task::new(id, callback, interval, mode, state.ticks);
            let slot = state.table.insert(task)?;
            debug!(
                "task {} added in slot {}: every {} ticks, {:?}, due at {}",
                id.raw(),
                slot,
                interval,
                mode.status,
                task.next_due
            );
            Ok(id)
        })
    }

    /// Remove a task. Its slot is compacted away; later tasks keep their order.
    ///
    /// A callback already running in the current tick is not interrupted.
    pub fn remove_task(&self, id: TaskId) -> SchedResult<()> {
        self.with_state(|state| {
            state.ensure_initialized()?;
            let slot = state.table.find(id).ok_or(SchedError::NotFound)?;
            state.table.remove_at(slot);
            debug!("task {} removed from slot {}", id.raw(), slot);
            Ok(())
        })
    }

    /// Stop dispatching a task until it is restarted. Idempotent.
    pub fn pause_task(&self, id: TaskId) -> SchedResult<()> {
        self.with_state(|state| {
            state.ensure_initialized()?;
            state.table.by_id_mut(id)?.status = TaskStatus::Paused;
            debug!("task {} paused", id.raw());
            Ok(())
        })
    }

    /// Mark a task recurring and schedule its next run one interval from now.
    pub fn restart_task(&self, id: TaskId) -> SchedResult<()> {
        self.with_state(|state| {
            state.ensure_initialized()?;
            let now = state.ticks;
            let task = state.table.by_id_mut(id)?;
            task.status = TaskStatus::Scheduled;
            task.reschedule(now);
            debug!("task {} restarted, due at {}", id.raw(), task.next_due);
            Ok(())
        })
    }

    /// Change a task's interval and, if given, its status.
    ///
    /// The next run is always rescheduled to `now + interval`. The interval
    /// policy is the same as for [`Scheduler::add_task`].
    pub fn modify_task(
        &self,
        id: TaskId,
        interval: u32,
        status: Option<TaskStatus>,
    ) -> SchedResult<()> {
        let interval = checked_interval(interval);
        self.with_state(|state| {
            state.ensure_initialized()?;
            let now = state.ticks;
            let task = state.table.by_id_mut(id)?;
            task.interval = interval;
            if let Some(status) = status {
                task.status = status;
            }
            task.reschedule(now);
            debug!(
                "task {} modified: every {} ticks, {:?}, due at {}",
                id.raw(),
                interval,
                task.status,
                task.next_due
            );
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn task_status(&self, id: TaskId) -> SchedResult<TaskStatus> {
        self.task_info(id).map(|info| info.status)
    }

    pub fn task_info(&self, id: TaskId) -> SchedResult<TaskInfo> {
        self.with_state(|state| {
            state.ensure_initialized()?;
            let slot = state.table.find(id).ok_or(SchedError::NotFound)?;
            state
                .table
                .get(slot)
                .map(TaskInfo::from)
                .ok_or(SchedError::NotFound)
        })
    }

    /// Current slot of a task, i.e. its position in dispatch order.
    pub fn slot_of(&self, id: TaskId) -> SchedResult<usize> {
        self.with_state(|state| {
            state.ensure_initialized()?;
            state.table.find(id).ok_or(SchedError::NotFound)
        })
    }

    /// Handle of the first task running `callback`.
    pub fn task_for(&self, callback: TaskFn) -> SchedResult<TaskId> {
        self.with_state(|state| {
            state.ensure_initialized()?;
            let slot = state
                .table
                .find_by_callback(callback)
                .ok_or(SchedError::NotFound)?;
            state
                .table
                .get(slot)
                .map(|task| task.id)
                .ok_or(SchedError::NotFound)
        })
    }

    pub fn task_count(&self) -> usize {
        self.with_state(|state| state.table.len())
    }

    /// Current value of the tick counter.
    pub fn ticks(&self) -> Tick {
        self.with_state(|state| state.ticks)
    }

    pub fn is_initialized(&self) -> bool {
        self.with_state(|state| state.source.is_some())
    }

    pub fn is_halted(&self) -> bool {
        self.with_state(|state| state.halted)
    }

    // -----------------------------------------------------------------------
    // Global control
    // -----------------------------------------------------------------------

    /// Freeze all scheduling by stopping tick delivery. The table is untouched.
    pub fn halt(&self) -> SchedResult<()> {
        self.with_state(|state| {
            state.source_mut()?.halt();
            state.halted = true;
            debug!("scheduler halted at tick {}", state.ticks);
            Ok(())
        })
    }

    /// Resume tick delivery after [`Scheduler::halt`].
    pub fn restart(&self) -> SchedResult<()> {
        self.with_state(|state| {
            state.source_mut()?.resume();
            state.halted = false;
            debug!("scheduler restarted at tick {}", state.ticks);
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Tick entry point
    // -----------------------------------------------------------------------

    /// Advance the counter by one tick and dispatch every due task.
    ///
    /// Must be called by the tick source once per period, from a context
    /// that never runs concurrently with another `tick`. Ticks arriving
    /// before `init` or while halted are ignored.
    pub fn tick(&self) {
        let pass = self.with_state(|state| {
            if state.source.is_none() || state.halted {
                return None;
            }
            state.ticks = state.ticks.wrapping_add(1);
            Some((state.ticks, DueSet::collect(&state.table, state.ticks)))
        });
        let Some((now, due)) = pass else {
            return;
        };

        for &id in due.ids() {
            let callback = self.with_state(|state| dispatch::fire(&mut state.table, id, now));
            if let Some(callback) = callback {
                callback();
            }
        }
    }
}

impl<S: TickSource> Default for Scheduler<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply the interval policy, logging any substitution.
fn checked_interval(interval: u32) -> u32 {
    let (checked, substituted) = time::clamp_interval(interval);
    if substituted {
        warn!(
            "interval {} out of range, using {} ticks",
            interval, checked
        );
    }
    checked
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
