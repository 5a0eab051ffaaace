//! # CoopOS Configuration
//!
//! Compile-time constants governing the scheduler and system behavior.
//! All limits are fixed at compile time — no dynamic allocation.

use crate::error::{Error, Result};

/// Scheduler tick counter.
///
/// 32 bits by default. With the `tick-16bit` feature delays and periods are
/// stored as `u16`, saving 4 bytes of RAM per task at the cost of limiting
/// them to 65535 ticks.
#[cfg(not(feature = "tick-16bit"))]
pub type Tick = u32;

/// Scheduler tick counter (16-bit build).
#[cfg(feature = "tick-16bit")]
pub type Tick = u16;

/// Maximum number of tasks, which is also the number of priority levels.
/// Priorities range over `[0, MAX_TASKS - 1]`, 0 being the highest.
pub const MAX_TASKS: usize = 4;

/// Default tick rate in Hz: how many times `tick()` is called per second.
pub const TICK_RATE_HZ: u32 = 1000;

/// Upper bound on the pending-job counter of a single task. Ticks that
/// activate a task already holding this many jobs are absorbed.
pub const MAX_PENDING_JOBS: u8 = 0x7F;

/// System clock frequency in Hz (STM32F103 running from the 8 MHz HSI).
pub const SYSTEM_CLOCK_HZ: u32 = 8_000_000;

/// Largest value the 24-bit SysTick reload register holds.
pub const SYST_MAX_RELOAD: u32 = 0x00FF_FFFF;

/// Compute the SysTick reload value for `tick_rate_hz` at `SYSTEM_CLOCK_HZ`.
///
/// # Errors
/// `InvalidParameter` if the rate is zero, faster than the core clock, or
/// too slow for the 24-bit counter.
pub fn systick_reload(tick_rate_hz: u32) -> Result<u32> {
    systick_reload_at(SYSTEM_CLOCK_HZ, tick_rate_hz)
}

pub(crate) fn systick_reload_at(core_clock_hz: u32, tick_rate_hz: u32) -> Result<u32> {
    if tick_rate_hz == 0 || tick_rate_hz > core_clock_hz {
        return Err(Error::InvalidParameter);
    }
    let reload = core_clock_hz / tick_rate_hz - 1;
    if reload > SYST_MAX_RELOAD {
        return Err(Error::InvalidParameter);
    }
    Ok(reload)
}

/// Convert milliseconds to ticks at the build-time `TICK_RATE_HZ`.
///
/// The product is computed in 64 bits and saturates at `Tick::MAX`.
pub const fn ms_to_ticks(ms: u32) -> Tick {
    ms_to_ticks_at(TICK_RATE_HZ, ms)
}

/// Convert milliseconds to ticks at an arbitrary tick rate.
pub(crate) const fn ms_to_ticks_at(tick_rate_hz: u32, ms: u32) -> Tick {
    let ticks = (tick_rate_hz as u64 * ms as u64) / 1000;
    if ticks > Tick::MAX as u64 {
        Tick::MAX
    } else {
        ticks as Tick
    }
}
