//! # Task Model
//!
//! A task is a plain function plus an opaque argument, activated every
//! `period` ticks (or exactly once when `period == 0`). Each task owns one
//! slot of the scheduler's table; its priority is the slot index.
//!
//! ```text
//!                 register()
//!   ┌────────┐ ────────────────► ┌──────────┐  tick(): count down / rearm
//!   │ (None) │                   │ Occupied │ ◄──────────────────────────┐
//!   └────────┘ ◄──────────────── └──────────┘ ───────────────────────────┘
//!        remove() / one-shot dispatched   │ ▲
//!                                suspend()│ │resume()
//!                                         ▼ │
//!                                    ┌───────────┐
//!                                    │ Suspended │
//!                                    └───────────┘
//! ```

use crate::config::{Tick, MAX_PENDING_JOBS};

/// Task handler. Receives the argument given at registration, verbatim.
pub type TaskFn<A> = fn(A);

// ---------------------------------------------------------------------------
// Task handle
// ---------------------------------------------------------------------------

/// Identifies a registered task.
///
/// Carries the slot index together with the generation the slot had when the
/// task was registered, so a handle kept after its task was removed, retired
/// or replaced is rejected instead of addressing the new occupant. Generations
/// never repeat: a priority whose counter is used up refuses new tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskHandle {
    pub(crate) priority: usize,
    pub(crate) generation: u32,
}

impl TaskHandle {
    /// Priority (table index) of the task this handle was issued for.
    #[inline]
    pub const fn priority(&self) -> usize {
        self.priority
    }
}

// ---------------------------------------------------------------------------
// Occupied slot
// ---------------------------------------------------------------------------

/// State of an occupied table slot.
///
/// An unoccupied slot is `None` in the table, so there is no half-valid
/// "empty task" value to confuse with a real one.
#[derive(Clone, Copy)]
pub struct Task<A> {
    handler: TaskFn<A>,
    args: A,
    /// Ticks left before the next activation.
    delay: Tick,
    /// Ticks between activations. 0 for a one-shot task.
    period: Tick,
    /// Activations not yet dispatched, saturating at `MAX_PENDING_JOBS`.
    pending_jobs: u8,
    one_shot: bool,
    suspended: bool,
}

impl<A: Copy> Task<A> {
    /// Build a task. A nonzero `delay` of `d` is stored as `d - 1` so exactly
    /// `d` ticks elapse before the first activation; `delay == 0` activates
    /// on the first tick.
    pub(crate) fn new(handler: TaskFn<A>, args: A, period: Tick, delay: Tick) -> Self {
        Self {
            handler,
            args,
            delay: delay.saturating_sub(1),
            period,
            pending_jobs: 0,
            one_shot: period == 0,
            suspended: false,
        }
    }

    /// Advance by one tick: count down, or add a job and rearm.
    #[inline]
    pub(crate) fn advance(&mut self) {
        if self.suspended {
            return;
        }
        if self.delay > 0 {
            self.delay -= 1;
        } else {
            self.delay = self.period.saturating_sub(1);
            if self.pending_jobs < MAX_PENDING_JOBS {
                self.pending_jobs += 1;
            }
        }
    }

    /// Whether a dispatch pass should run this task now.
    #[inline]
    pub(crate) fn is_ready(&self) -> bool {
        !self.suspended && self.pending_jobs > 0
    }

    /// Drop every pending job in one go.
    #[inline]
    pub(crate) fn clear_jobs(&mut self) {
        self.pending_jobs = 0;
    }

    pub(crate) fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    pub fn handler(&self) -> TaskFn<A> {
        self.handler
    }

    pub fn args(&self) -> A {
        self.args
    }

    pub fn delay(&self) -> Tick {
        self.delay
    }

    pub fn period(&self) -> Tick {
        self.period
    }

    pub fn pending_jobs(&self) -> u8 {
        self.pending_jobs
    }

    pub fn is_one_shot(&self) -> bool {
        self.one_shot
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }
}

impl<A> core::fmt::Debug for Task<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Task")
            .field("delay", &self.delay)
            .field("period", &self.period)
            .field("pending_jobs", &self.pending_jobs)
            .field("one_shot", &self.one_shot)
            .field("suspended", &self.suspended)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
