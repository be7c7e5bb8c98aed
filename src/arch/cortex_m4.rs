//! # Cortex-M4 Port Layer
//!
//! SysTick-based tick source for ARM Cortex-M processors.
//!
//! The SysTick counter reloads every `SYSTICK_RELOAD + 1` core clock
//! cycles, i.e. once per millisecond at `SYSTEM_CLOCK_HZ`, and raises the
//! SysTick exception. The firmware's exception handler forwards it to
//! [`Scheduler::tick`](crate::Scheduler::tick):
//!
//! ```ignore
//! #[exception]
//! fn SysTick() {
//!     SCHEDULER.tick();
//! }
//! ```
//!
//! SysTick never preempts itself, which is the only reentrancy guarantee
//! the scheduler needs from its tick source.
//!
//! ## Halting
//!
//! `halt` masks the SysTick exception but leaves the counter running, so
//! `resume` picks up with the same period and no reconfiguration.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;

use crate::config::SYSTICK_RELOAD;
use crate::source::TickSource;

/// Tick source owning the SysTick peripheral.
pub struct SysTickSource {
    syst: SYST,
}

impl SysTickSource {
    pub fn new(syst: SYST) -> Self {
        Self { syst }
    }

    /// Give the peripheral back, stopping the counter first.
    pub fn free(mut self) -> SYST {
        self.syst.disable_interrupt();
        self.syst.disable_counter();
        self.syst
    }
}

impl TickSource for SysTickSource {
    /// Configure SysTick for `TICK_HZ` using the processor clock and start it.
    fn start(&mut self) {
        configure_systick(&mut self.syst);
    }

    fn halt(&mut self) {
        self.syst.disable_interrupt();
    }

    fn resume(&mut self) {
        self.syst.enable_interrupt();
    }
}

/// Program SysTick to fire at `TICK_HZ` from the core clock.
pub fn configure_systick(syst: &mut SYST) {
    syst.disable_counter();
    syst.set_reload(SYSTICK_RELOAD);
    syst.clear_current();
    syst.set_clock_source(SystClkSource::Core);
    syst.enable_counter();
    syst.enable_interrupt();
}
