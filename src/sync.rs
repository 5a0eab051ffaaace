//! # Synchronization Primitives
//!
//! Interrupt-safe critical sections. Shared scheduler state is touched both
//! from the tick interrupt and from the main loop, so every access goes
//! through one of these.
//!
//! The implementation is chosen at link time by the `critical-section` crate:
//! on Cortex-M it masks interrupts (`cortex-m`'s `critical-section-single-core`
//! feature), on a host it is a global lock.

pub use critical_section::{CriticalSection, Mutex};

/// Execute a closure within a critical section.
///
/// Keep the closure short: the tick interrupt stays pending for as long as
/// it runs.
///
/// # Usage
/// ```ignore
/// sync::critical_section(|cs| {
///     // Access shared state safely
/// });
/// ```
#[inline]
pub fn critical_section<F, R>(f: F) -> R
where
    F: FnOnce(CriticalSection<'_>) -> R,
{
    critical_section::with(f)
}
