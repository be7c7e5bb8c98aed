//! # TickOS Example Firmware
//!
//! Demonstrates the scheduler with a few background jobs:
//!
//! | Task | Mode | Interval | Behavior |
//! |------|------|----------|----------|
//! | `heartbeat` | Scheduled | 500 ms | Counts beats |
//! | `sample_sensor` | Scheduled, immediate | 10 ms | Accumulates fake readings |
//! | `report` | Scheduled | 1000 ms | Snapshots the sample total |
//! | `boot_complete` | One-shot | 2000 ms | Slows sampling, then retires |
//!
//! The main loop sleeps with `wfi`; all work happens in the SysTick
//! exception. `boot_complete` calls back into the scheduler from tick
//! context, which is allowed because callbacks run with the table unlocked.

#![no_std]
#![no_main]

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m_rt::{entry, exception};
use log::warn;
use panic_halt as _;

use tickos::arch::cortex_m4::SysTickSource;
use tickos::{Scheduler, TaskMode};

static SCHEDULER: Scheduler<SysTickSource> = Scheduler::new();

static BEATS: AtomicU32 = AtomicU32::new(0);
static SAMPLES: AtomicU32 = AtomicU32::new(0);
static LAST_REPORT: AtomicU32 = AtomicU32::new(0);

// ---------------------------------------------------------------------------
// Task bodies
// ---------------------------------------------------------------------------

fn heartbeat() {
    BEATS.fetch_add(1, Ordering::Relaxed);
}

fn sample_sensor() {
    // Stand-in for an ADC read
    let reading = SCHEDULER.ticks() as u32 & 0xFF;
    SAMPLES.fetch_add(reading, Ordering::Relaxed);
}

fn report() {
    LAST_REPORT.store(SAMPLES.load(Ordering::Relaxed), Ordering::Relaxed);
}

/// Drop the sampling rate once start-up settles.
fn boot_complete() {
    let slowed = SCHEDULER
        .task_for(sample_sensor)
        .and_then(|sampler| SCHEDULER.modify_task(sampler, 100, None));
    if let Err(err) = slowed {
        warn!("could not slow sampling: {}", err);
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[entry]
fn main() -> ! {
    let cp = cortex_m::Peripherals::take().unwrap();

    SCHEDULER.init(SysTickSource::new(cp.SYST));

    SCHEDULER
        .add_task(heartbeat, 500, TaskMode::SCHEDULED)
        .expect("Failed to add heartbeat");
    SCHEDULER
        .add_task(sample_sensor, 10, TaskMode::SCHEDULED_IMMEDIATE)
        .expect("Failed to add sample_sensor");
    SCHEDULER
        .add_task(report, 1000, TaskMode::SCHEDULED)
        .expect("Failed to add report");
    SCHEDULER
        .add_task(boot_complete, 2000, TaskMode::ONE_SHOT)
        .expect("Failed to add boot_complete");

    loop {
        cortex_m::asm::wfi();
    }
}

#[exception]
fn SysTick() {
    SCHEDULER.tick();
}
