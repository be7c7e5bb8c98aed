//! # TickOS Configuration
//!
//! Compile-time constants governing the scheduler and system behavior.
//! All limits are fixed at compile time; there is no dynamic allocation.

/// Library version, in the `major*100 + minor*10 + patch` form.
pub const VERSION: u16 = 111;

/// Maximum number of tasks the scheduler can hold simultaneously.
/// This bounds the static task table. `CapacityExceeded` is the normal
/// outcome once it is full.
pub const MAX_TASKS: usize = 9;

/// Longest accepted task interval in ticks (one hour at 1 kHz).
///
/// Must stay well below half the range of the tick counter so that the
/// due test in [`crate::time::is_due`] remains correct across rollover.
pub const MAX_INTERVAL: u32 = 3_600_000;

/// Interval substituted when a caller passes one outside `1..=MAX_INTERVAL`.
pub const DEFAULT_INTERVAL: u32 = 50;

/// Tick frequency in Hz. One tick is nominally one millisecond.
pub const TICK_HZ: u32 = 1000;

/// System clock frequency in Hz (default for STM32F4 at 16 MHz HSI).
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;

/// SysTick reload value producing one interrupt per tick.
pub const SYSTICK_RELOAD: u32 = SYSTEM_CLOCK_HZ / TICK_HZ - 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_bounds_fit_counter() {
        assert!(DEFAULT_INTERVAL >= 1 && DEFAULT_INTERVAL <= MAX_INTERVAL);
        assert!(MAX_INTERVAL < u32::MAX / 2);
    }

    #[test]
    fn test_systick_reload_fits_24_bits() {
        assert_eq!(SYSTICK_RELOAD, 15_999);
        assert!(SYSTICK_RELOAD <= 0x00FF_FFFF);
    }
}
