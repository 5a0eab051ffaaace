//! # Scheduler
//!
//! Core scheduling logic for CoopOS: a fixed table of periodic and one-shot
//! tasks, advanced by a periodic tick and run to completion from the main
//! loop. No task ever preempts another.
//!
//! ## Scheduling Algorithm
//!
//! At each tick (`tick()`, called from the timer interrupt):
//! 1. **Count down**: every occupied, non-suspended slot with `delay > 0`
//!    decrements its delay
//! 2. **Activate**: a slot whose delay is already 0 rearms to `period - 1`
//!    and gains one pending job (saturating)
//! 3. **Signal**: `dispatch_ready` is set, whether or not anything activated
//!
//! At each dispatch (`dispatch()`, called from the main loop):
//! 1. **Gate**: return immediately unless `dispatch_ready` is set, then clear it
//! 2. **Run**: walk the table from priority 0 upwards and call each ready
//!    task's handler exactly once, however many jobs it accumulated
//! 3. **Retire / rearm**: one-shot tasks free their slot, periodic tasks drop
//!    all pending jobs
//!
//! A handler that never returns starves every task after it in the table.

use crate::config::{self, Tick, TICK_RATE_HZ};
use crate::error::{Error, Result};
use crate::task::{Task, TaskFn, TaskHandle};

// ---------------------------------------------------------------------------
// Scheduler struct
// ---------------------------------------------------------------------------

/// Task table and dispatch state for `N` priority levels.
///
/// `A` is the handler argument type. It is copied into the slot at
/// registration and handed back to the handler on every run.
///
/// `tick()` and `dispatch()` take `&mut self`; when they are driven from an
/// interrupt and the main loop respectively, wrap the scheduler in
/// [`crate::kernel::SharedScheduler`].
pub struct Scheduler<A, const N: usize> {
    /// Slot `i` holds the task with priority `i`, if any.
    tasks: [Option<Task<A>>; N],

    /// Per-slot registration counters used to tag handles. Never wrap.
    generations: [u32; N],

    /// Set by `tick()`, cleared at the start of each dispatch pass.
    dispatch_ready: bool,

    /// Tick rate used by `ms_to_ticks()`.
    tick_rate_hz: u32,

    /// Latched by the first registration after `initialize()`.
    registered: bool,
}

/// A ready task taken out of the table for execution.
#[derive(Clone, Copy)]
pub(crate) struct Job<A> {
    handler: TaskFn<A>,
    args: A,
}

impl<A: Copy> Job<A> {
    #[inline]
    pub(crate) fn run(self) {
        (self.handler)(self.args)
    }
}

impl<A: Copy, const N: usize> Scheduler<A, N> {
    /// Create a scheduler with every slot unoccupied.
    pub const fn new() -> Self {
        Self {
            tasks: [None; N],
            generations: [0; N],
            dispatch_ready: false,
            tick_rate_hz: TICK_RATE_HZ,
            registered: false,
        }
    }

    /// Reset the table to all-unoccupied.
    ///
    /// Generation counters survive, so handles issued before the reset are
    /// rejected afterwards.
    pub fn initialize(&mut self) {
        self.tasks = [None; N];
        self.dispatch_ready = false;
        self.tick_rate_hz = TICK_RATE_HZ;
        self.registered = false;
    }

    /// Register a task at `priority`.
    ///
    /// `period == 0` makes a one-shot task. `delay` is the number of ticks
    /// before the first activation (0 activates on the first tick).
    ///
    /// Whatever occupied the slot before is replaced, and its handle becomes
    /// stale.
    ///
    /// # Errors
    /// - `NullReference` if `handler` is `None`
    /// - `InvalidParameter` if `priority >= N`
    /// - `HandlesExhausted` if `u32::MAX` tasks were already registered at
    ///   `priority`; the current occupant is left in place
    pub fn register(
        &mut self,
        handler: Option<TaskFn<A>>,
        args: A,
        priority: usize,
        period: Tick,
        delay: Tick,
    ) -> Result<TaskHandle> {
        let handler = handler.ok_or(Error::NullReference)?;
        if priority >= N {
            warn!("register: priority {} out of range", priority);
            return Err(Error::InvalidParameter);
        }

        let Some(generation) = self.generations[priority].checked_add(1) else {
            warn!("register: handles exhausted at priority {}", priority);
            return Err(Error::HandlesExhausted);
        };

        if self.tasks[priority].is_some() {
            debug!("register: replacing task at priority {}", priority);
        }

        self.generations[priority] = generation;
        self.tasks[priority] = Some(Task::new(handler, args, period, delay));
        self.registered = true;

        debug!(
            "task registered: priority={} period={} delay={}",
            priority, period, delay
        );

        Ok(TaskHandle {
            priority,
            generation,
        })
    }

    /// Remove the task addressed by `handle`, discarding its pending jobs.
    ///
    /// # Errors
    /// `InvalidParameter` if the handle is out of range, its slot is empty,
    /// or the slot was re-registered since the handle was issued.
    pub fn remove(&mut self, handle: TaskHandle) -> Result<()> {
        self.task_mut(handle)?;
        self.tasks[handle.priority] = None;
        debug!("task removed: priority={}", handle.priority);
        Ok(())
    }

    /// Stop ticking and dispatching the task. Its countdown and pending jobs
    /// are kept as they are until `resume()`.
    ///
    /// # Errors
    /// Same as [`Scheduler::remove`].
    pub fn suspend(&mut self, handle: TaskHandle) -> Result<()> {
        self.task_mut(handle)?.set_suspended(true);
        debug!("task suspended: priority={}", handle.priority);
        Ok(())
    }

    /// Undo `suspend()`. Resuming a running task is a no-op.
    ///
    /// # Errors
    /// Same as [`Scheduler::remove`].
    pub fn resume(&mut self, handle: TaskHandle) -> Result<()> {
        self.task_mut(handle)?.set_suspended(false);
        debug!("task resumed: priority={}", handle.priority);
        Ok(())
    }

    /// Advance time by one tick.
    ///
    /// Constant work per slot, no logging, no failure: safe to call from the
    /// timer interrupt. Must not be re-entered.
    pub fn tick(&mut self) {
        for task in self.tasks.iter_mut().flatten() {
            task.advance();
        }
        self.dispatch_ready = true;
    }

    /// Run every ready task once, in ascending priority order.
    ///
    /// Returns the number of handlers invoked; 0 without touching the table
    /// when no tick happened since the previous pass. A panicking handler
    /// propagates to the caller.
    pub fn dispatch(&mut self) -> usize {
        if !self.begin_dispatch() {
            return 0;
        }

        let mut executed = 0;
        for priority in 0..N {
            if let Some(job) = self.take_job(priority) {
                job.run();
                executed += 1;
            }
        }
        executed
    }

    /// Check and clear the dispatch-ready flag.
    #[inline]
    pub(crate) fn begin_dispatch(&mut self) -> bool {
        core::mem::replace(&mut self.dispatch_ready, false)
    }

    /// If the task at `priority` is ready, settle its bookkeeping and hand
    /// back what must be run: a one-shot task leaves the table, a periodic
    /// one drops all of its pending jobs.
    pub(crate) fn take_job(&mut self, priority: usize) -> Option<Job<A>> {
        let slot = &mut self.tasks[priority];
        let task = slot.as_mut().filter(|task| task.is_ready())?;

        let job = Job {
            handler: task.handler(),
            args: task.args(),
        };

        if task.is_one_shot() {
            *slot = None;
            trace!("one-shot task retired: priority={}", priority);
        } else {
            task.clear_jobs();
        }

        Some(job)
    }

    /// Convert milliseconds to ticks at the current tick rate, saturating at
    /// `Tick::MAX`.
    pub fn ms_to_ticks(&self, ms: u32) -> Tick {
        config::ms_to_ticks_at(self.tick_rate_hz, ms)
    }

    /// Change the tick rate used by `ms_to_ticks()`.
    ///
    /// Only allowed before the first registration: stored delays and periods
    /// are in ticks and are never rescaled.
    ///
    /// # Errors
    /// - `InvalidParameter` if `tick_rate_hz == 0`
    /// - `TasksRegistered` if a task was registered since `initialize()`
    pub fn set_tick_rate(&mut self, tick_rate_hz: u32) -> Result<()> {
        if tick_rate_hz == 0 {
            return Err(Error::InvalidParameter);
        }
        if self.registered {
            warn!("set_tick_rate: rejected, tasks already registered");
            return Err(Error::TasksRegistered);
        }
        self.tick_rate_hz = tick_rate_hz;
        debug!("tick rate set to {} Hz", tick_rate_hz);
        Ok(())
    }

    /// Current tick rate in Hz.
    pub fn tick_rate_hz(&self) -> u32 {
        self.tick_rate_hz
    }

    /// The task registered at `priority`, if any.
    pub fn task(&self, priority: usize) -> Option<&Task<A>> {
        self.tasks.get(priority)?.as_ref()
    }

    /// Number of occupied slots.
    pub fn task_count(&self) -> usize {
        self.tasks.iter().flatten().count()
    }

    /// Whether a tick happened since the last dispatch pass.
    pub fn is_dispatch_ready(&self) -> bool {
        self.dispatch_ready
    }

    /// Resolve a handle to its live task.
    fn task_mut(&mut self, handle: TaskHandle) -> Result<&mut Task<A>> {
        if handle.priority >= N || self.generations[handle.priority] != handle.generation {
            warn!("stale or out-of-range handle: priority={}", handle.priority);
            return Err(Error::InvalidParameter);
        }
        self.tasks[handle.priority]
            .as_mut()
            .ok_or(Error::InvalidParameter)
    }
}

impl<A: Copy, const N: usize> Default for Scheduler<A, N> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
