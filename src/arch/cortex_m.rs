//! # Cortex-M Port Layer
//!
//! SysTick configuration for the scheduler tick, and a low-power wait for
//! the main loop.
//!
//! ## Interrupt Priorities
//!
//! - SysTick: Priority 0xF0 (lowest with 4 priority bits) — application
//!   interrupts may preempt the tick update
//!
//! The firmware's `SysTick` exception handler is expected to call
//! [`crate::kernel::SharedScheduler::tick`]; nothing else is installed here.

use cortex_m::peripheral::scb::SystemHandler;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{SCB, SYST};

use crate::config::systick_reload;
use crate::error::Result;

// ---------------------------------------------------------------------------
// SysTick configuration
// ---------------------------------------------------------------------------

/// Start SysTick firing at `tick_rate_hz` from the processor clock.
///
/// Each expiry raises the `SysTick` exception, whose handler advances the
/// scheduler by one tick.
///
/// # Errors
/// `InvalidParameter` if [`systick_reload`] rejects the rate.
pub fn configure_systick(syst: &mut SYST, tick_rate_hz: u32) -> Result<()> {
    let reload = systick_reload(tick_rate_hz)?;
    syst.set_reload(reload);
    syst.clear_current();
    syst.set_clock_source(SystClkSource::Core);
    syst.enable_counter();
    syst.enable_interrupt();
    Ok(())
}

/// Put SysTick at the lowest exception priority.
pub fn set_interrupt_priorities(scb: &mut SCB) {
    // SAFETY: lowering the SysTick priority cannot break a priority-based
    // critical section; the scheduler's critical sections mask all interrupts.
    unsafe {
        scb.set_priority(SystemHandler::SysTick, 0xF0);
    }
}

// ---------------------------------------------------------------------------
// Idle
// ---------------------------------------------------------------------------

/// Sleep until the next interrupt. Called from the main loop when a dispatch
/// pass found nothing to do.
#[inline]
pub fn wait_for_interrupt() {
    cortex_m::asm::wfi();
}
