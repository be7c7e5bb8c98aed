//! # TickOS
//!
//! A cooperative, interrupt-driven periodic task scheduler for ARM
//! Cortex-M microcontrollers.
//!
//! ## Overview
//!
//! TickOS is not a kernel: there are no threads, stacks or context
//! switches. The host program registers a handful of plain functions and
//! an interval for each; a periodic timer interrupt (SysTick at 1 kHz)
//! advances a tick counter and calls every function whose time has come.
//!
//! - **Recurring tasks** run every `interval` ticks
//! - **One-shot tasks** run once and are then removed
//! - **Paused tasks** stay registered but are skipped
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                   Host program (main)                  │
//! ├────────────────────────────────────────────────────────┤
//! │              Scheduler API (scheduler.rs)              │
//! │   init · add_task · remove_task · pause_task · ...     │
//! ├──────────────┬────────────────────┬────────────────────┤
//! │  Tick path   │   Task Table       │  Sync              │
//! │  tick()      │   table.rs         │  sync.rs           │
//! │  dispatch.rs │   ─ insert         │  ─ critical_section│
//! │              │   ─ remove_at      │                    │
//! ├──────────────┴────────────────────┴────────────────────┤
//! │        Task Model (task.rs) · Tick math (time.rs)      │
//! ├────────────────────────────────────────────────────────┤
//! │     Tick Source (source.rs, arch/cortex_m4.rs)         │
//! │              SysTick · halt · resume                   │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timing Model
//!
//! - One tick ≈ one millisecond (`TICK_HZ`)
//! - The counter wraps; due checks use signed wrapping differences
//! - Intervals are bounded by `MAX_INTERVAL`, far below half the counter
//!   range, so rollover never makes a future task look overdue
//! - Missed ticks are not compensated
//!
//! ## Memory Model
//!
//! - **No heap**: All state is statically allocated
//! - **No `alloc`**: Pure `core` only
//! - **Fixed-size table**: `[Task; MAX_TASKS]`, compacted on removal
//! - **Critical sections**: `critical_section::with()` for shared state
//!
//! ## Example
//!
//! ```ignore
//! static SCHEDULER: Scheduler<SysTickSource> = Scheduler::new();
//!
//! SCHEDULER.init(SysTickSource::new(cp.SYST));
//! let blink = SCHEDULER.add_task(toggle_led, 500, TaskMode::SCHEDULED)?;
//! SCHEDULER.add_task(say_hello, 2000, TaskMode::ONE_SHOT)?;
//! SCHEDULER.pause_task(blink)?;
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod arch;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod scheduler;
pub mod source;
pub mod sync;
pub mod table;
pub mod task;
pub mod time;

pub use error::{SchedError, SchedResult};
pub use scheduler::Scheduler;
pub use source::{ManualTickSource, TickSource};
pub use task::{TaskFn, TaskId, TaskInfo, TaskMode, TaskStatus};
pub use time::Tick;
