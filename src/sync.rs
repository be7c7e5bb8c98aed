//! # Synchronization Primitives
//!
//! Critical-section abstraction shared by the foreground API and the tick
//! handler. On Cortex-M the implementation comes from `cortex-m`'s
//! `critical-section-single-core` feature (interrupts masked for the
//! duration); host builds link whichever `critical-section` implementation
//! the binary provides, `std` in tests.

pub use critical_section::{CriticalSection, Mutex};

/// Execute a closure within a critical section.
///
/// Table mutations happen only inside one of these, so a tick can never
/// observe a half-applied change.
///
/// # Usage
/// ```ignore
/// sync::critical_section(|cs| {
///     // Access shared state safely
/// });
/// ```
///
/// Keep the closure short; it delays the next tick.
#[inline]
pub fn critical_section<F, R>(f: F) -> R
where
    F: FnOnce(CriticalSection<'_>) -> R,
{
    critical_section::with(f)
}
