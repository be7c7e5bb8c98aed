//! # Task Record
//!
//! Defines the task model for TickOS. A task is a plain function pointer
//! that the tick handler calls every `interval` ticks (or once, for a
//! one-shot task), together with the bookkeeping needed to decide when it
//! is next due.
//!
//! Tasks are addressed through a [`TaskId`] handle returned at creation.
//! Handles stay valid until the task is removed, explicitly or by firing
//! as a one-shot; slot indices do not, because removal compacts the table.

use crate::error::SchedError;
use crate::time::{self, Tick};

/// Task body. Called from the tick context; must be short.
pub type TaskFn = fn();

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Opaque handle naming one live task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u32);

impl TaskId {
    pub(crate) const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw handle value, for logging.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Status and start mode
// ---------------------------------------------------------------------------

/// Scheduling status of a task.
///
/// ```text
///   add_task ──► Scheduled ◄──── restart_task ────┐
///        │           │                            │
///        │           └──── pause_task ──► Paused ─┘
///        │
///        └─────► OneShot ── fires ──► (removed)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Kept in the table but never dispatched.
    Paused,
    /// Recurring: rescheduled after every firing.
    Scheduled,
    /// Fires once, then is removed from the table.
    OneShot,
}

/// Status requested at creation, plus the immediate-start modifier.
///
/// Without `immediate`, the first run happens one full interval after the
/// task is added; with it, on the very next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskMode {
    pub status: TaskStatus,
    pub immediate: bool,
}

impl TaskMode {
    pub const PAUSED: Self = Self::new(TaskStatus::Paused);
    pub const SCHEDULED: Self = Self::new(TaskStatus::Scheduled);
    pub const SCHEDULED_IMMEDIATE: Self = Self::new(TaskStatus::Scheduled).immediately();
    pub const ONE_SHOT: Self = Self::new(TaskStatus::OneShot);
    pub const ONE_SHOT_IMMEDIATE: Self = Self::new(TaskStatus::OneShot).immediately();

    /// Raw code bits: `0b001` scheduled, `0b010` one-shot, `0b100` immediate start.
    const RAW_SCHEDULED: u8 = 0b001;
    const RAW_ONE_SHOT: u8 = 0b010;
    const RAW_IMMEDIATE: u8 = 0b100;

    pub const fn new(status: TaskStatus) -> Self {
        Self {
            status,
            immediate: false,
        }
    }

    /// Same status, first run on the next tick.
    pub const fn immediately(mut self) -> Self {
        self.immediate = true;
        self
    }

    /// Decode a raw mode code, coercing anything unknown to `SCHEDULED`.
    ///
    /// Known codes: `0` paused, `1` scheduled, `2` one-shot,
    /// `5` scheduled + immediate, `6` one-shot + immediate.
    pub fn from_raw(raw: u8) -> Self {
        Self::try_from(raw).unwrap_or(Self::SCHEDULED)
    }

    /// Encode back to the raw code accepted by [`TaskMode::from_raw`].
    pub const fn to_raw(self) -> u8 {
        let base = match self.status {
            TaskStatus::Paused => 0,
            TaskStatus::Scheduled => Self::RAW_SCHEDULED,
            TaskStatus::OneShot => Self::RAW_ONE_SHOT,
        };
        if self.immediate && base != 0 {
            base | Self::RAW_IMMEDIATE
        } else {
            base
        }
    }
}

impl Default for TaskMode {
    fn default() -> Self {
        Self::SCHEDULED
    }
}

impl From<TaskStatus> for TaskMode {
    fn from(status: TaskStatus) -> Self {
        Self::new(status)
    }
}

impl TryFrom<u8> for TaskMode {
    type Error = SchedError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::PAUSED),
            1 => Ok(Self::SCHEDULED),
            2 => Ok(Self::ONE_SHOT),
            5 => Ok(Self::SCHEDULED_IMMEDIATE),
            6 => Ok(Self::ONE_SHOT_IMMEDIATE),
            _ => Err(SchedError::InvalidMode),
        }
    }
}

// ---------------------------------------------------------------------------
// Task record
// ---------------------------------------------------------------------------

/// One scheduled unit of work, stored inline in the task table.
#[derive(Debug, Clone, Copy)]
pub struct Task {
    /// Handle returned to the caller.
    pub id: TaskId,
    /// Function invoked when the task is due.
    pub callback: TaskFn,
    /// Ticks between runs, `1..=MAX_INTERVAL`.
    pub interval: u32,
    pub status: TaskStatus,
    /// Absolute tick of the next run.
    pub next_due: Tick,
}

fn vacant() {}

impl Task {
    /// Placeholder for unoccupied table slots.
    pub const VACANT: Self = Self {
        id: TaskId(0),
        callback: vacant,
        interval: 0,
        status: TaskStatus::Paused,
        next_due: 0,
    };

    /// Build a task created at tick `now` with the given mode.
    pub fn new(id: TaskId, callback: TaskFn, interval: u32, mode: TaskMode, now: Tick) -> Self {
        let next_due = if mode.immediate {
            now
        } else {
            time::deadline(now, interval)
        };
        Self {
            id,
            callback,
            interval,
            status: mode.status,
            next_due,
        }
    }

    /// Paused tasks are never due.
    #[inline]
    pub fn is_due(&self, now: Tick) -> bool {
        self.status != TaskStatus::Paused && time::is_due(now, self.next_due)
    }

    /// Push the next run one interval past `now`.
    #[inline]
    pub fn reschedule(&mut self, now: Tick) {
        self.next_due = time::deadline(now, self.interval);
    }

    /// Compare callbacks by address.
    #[inline]
    pub fn runs(&self, callback: TaskFn) -> bool {
        self.callback as usize == callback as usize
    }
}

/// Snapshot of a task's scheduling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskInfo {
    pub status: TaskStatus,
    pub interval: u32,
    pub next_due: Tick,
}

impl From<&Task> for TaskInfo {
    fn from(task: &Task) -> Self {
        Self {
            status: task.status,
            interval: task.interval,
            next_due: task.next_due,
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
