//! # Kernel
//!
//! A scheduler instance shared between the tick interrupt and the main loop.
//!
//! [`SharedScheduler`] can be placed in a `static`. Every operation takes a
//! critical section for exactly as long as it touches the table; task
//! handlers run with interrupts enabled, so ticks keep arriving while a
//! handler executes and are picked up by the next dispatch pass.
//!
//! ## Startup Sequence
//!
//! ```text
//! reset_handler (cortex-m-rt)
//!   └─► main()
//!         ├─► SCHEDULER.initialize()
//!         ├─► SCHEDULER.register()  ← one call per task
//!         ├─► arch::cortex_m::configure_systick()
//!         └─► loop { SCHEDULER.dispatch() } (no return)
//!
//! SysTick exception
//!   └─► SCHEDULER.tick()
//! ```

use core::cell::RefCell;

use crate::config::Tick;
use crate::error::Result;
use crate::scheduler::Scheduler;
use crate::sync::{self, Mutex};
use crate::task::{TaskFn, TaskHandle};

/// Interrupt-safe handle to a [`Scheduler`].
pub struct SharedScheduler<A, const N: usize> {
    inner: Mutex<RefCell<Scheduler<A, N>>>,
}

impl<A: Copy, const N: usize> SharedScheduler<A, N> {
    /// Create an empty scheduler. Usable in a `static` initializer.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Scheduler::new())),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Scheduler<A, N>) -> R) -> R {
        sync::critical_section(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// See [`Scheduler::initialize`].
    pub fn initialize(&self) {
        self.with(Scheduler::initialize);
        info!("scheduler initialized: {} priority levels", N);
    }

    /// See [`Scheduler::register`].
    pub fn register(
        &self,
        handler: Option<TaskFn<A>>,
        args: A,
        priority: usize,
        period: Tick,
        delay: Tick,
    ) -> Result<TaskHandle> {
        self.with(|s| s.register(handler, args, priority, period, delay))
    }

    /// See [`Scheduler::remove`].
    pub fn remove(&self, handle: TaskHandle) -> Result<()> {
        self.with(|s| s.remove(handle))
    }

    /// See [`Scheduler::suspend`].
    pub fn suspend(&self, handle: TaskHandle) -> Result<()> {
        self.with(|s| s.suspend(handle))
    }

    /// See [`Scheduler::resume`].
    pub fn resume(&self, handle: TaskHandle) -> Result<()> {
        self.with(|s| s.resume(handle))
    }

    /// See [`Scheduler::set_tick_rate`].
    pub fn set_tick_rate(&self, tick_rate_hz: u32) -> Result<()> {
        self.with(|s| s.set_tick_rate(tick_rate_hz))
    }

    /// See [`Scheduler::ms_to_ticks`].
    pub fn ms_to_ticks(&self, ms: u32) -> Tick {
        self.with(|s| s.ms_to_ticks(ms))
    }

    /// Advance time by one tick. Call from the timer interrupt only.
    pub fn tick(&self) {
        self.with(Scheduler::tick);
    }

    /// Run every ready task once, in ascending priority order, and return
    /// how many ran. Call from the main loop only.
    ///
    /// Each slot is settled inside its own short critical section and its
    /// handler is called outside of it, so handlers may use this scheduler
    /// (register a follow-up task, remove themselves, ...).
    pub fn dispatch(&self) -> usize {
        if !self.with(Scheduler::begin_dispatch) {
            return 0;
        }

        let mut executed = 0;
        for priority in 0..N {
            if let Some(job) = self.with(|s| s.take_job(priority)) {
                job.run();
                executed += 1;
            }
        }
        executed
    }

    /// Number of occupied slots.
    pub fn task_count(&self) -> usize {
        self.with(|s| s.task_count())
    }

    /// Whether the task at `priority` exists and the next dispatch pass would
    /// run it. A suspended task keeps its jobs but is not pending.
    pub fn is_pending(&self, priority: usize) -> bool {
        self.with(|s| s.task(priority).is_some_and(|t| t.is_ready()))
    }
}

impl<A: Copy, const N: usize> Default for SharedScheduler<A, N> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use core::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_shared_round_trip() {
        static RUNS: AtomicUsize = AtomicUsize::new(0);
        fn bump(counter: &'static AtomicUsize) {
            counter.fetch_add(1, Ordering::SeqCst);
        }

        let sched: SharedScheduler<&'static AtomicUsize, 2> = SharedScheduler::new();
        sched.initialize();
        let handle = sched.register(Some(bump), &RUNS, 0, 2, 0).unwrap();
        assert_eq!(sched.task_count(), 1);

        sched.tick();
        assert!(sched.is_pending(0));
        assert_eq!(sched.dispatch(), 1);
        assert_eq!(sched.dispatch(), 0);

        sched.tick();
        sched.tick();
        assert_eq!(sched.dispatch(), 1);
        assert_eq!(RUNS.load(Ordering::SeqCst), 2);

        sched.remove(handle).unwrap();
        assert_eq!(sched.remove(handle), Err(Error::InvalidParameter));
        assert_eq!(sched.task_count(), 0);
    }

    #[test]
    fn test_handler_can_reenter_scheduler() {
        static SHARED: SharedScheduler<usize, 3> = SharedScheduler::new();
        static FOLLOW_UPS: AtomicUsize = AtomicUsize::new(0);

        fn follow_up(_: usize) {
            FOLLOW_UPS.fetch_add(1, Ordering::SeqCst);
        }

        // One-shot task that schedules another one-shot below it
        fn spawner(next_priority: usize) {
            SHARED
                .register(Some(follow_up), 0, next_priority, 0, 0)
                .unwrap();
        }

        SHARED.initialize();
        SHARED.register(Some(spawner), 2, 0, 0, 0).unwrap();

        SHARED.tick();
        assert_eq!(SHARED.dispatch(), 1);
        assert_eq!(SHARED.task_count(), 1);

        SHARED.tick();
        assert_eq!(SHARED.dispatch(), 1);
        assert_eq!(FOLLOW_UPS.load(Ordering::SeqCst), 1);
        assert_eq!(SHARED.task_count(), 0);
    }

    #[test]
    fn test_tick_during_handler_is_kept() {
        static SHARED: SharedScheduler<usize, 1> = SharedScheduler::new();
        static RUNS: AtomicUsize = AtomicUsize::new(0);

        // Stands in for the timer interrupt firing while the handler runs
        fn ticking_handler(_: usize) {
            RUNS.fetch_add(1, Ordering::SeqCst);
            SHARED.tick();
        }

        SHARED.initialize();
        SHARED.register(Some(ticking_handler), 0, 0, 1, 0).unwrap();

        SHARED.tick();
        assert_eq!(SHARED.dispatch(), 1);
        assert!(SHARED.is_pending(0));
        assert_eq!(SHARED.dispatch(), 1);
        assert_eq!(RUNS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_shared_tick_rate() {
        let sched: SharedScheduler<usize, 1> = SharedScheduler::default();
        sched.initialize();
        sched.set_tick_rate(10).unwrap();
        assert_eq!(sched.ms_to_ticks(1000), 10);

        fn noop(_: usize) {}
        let handle = sched.register(Some(noop), 0, 0, 5, 0).unwrap();
        assert_eq!(sched.set_tick_rate(20), Err(Error::TasksRegistered));

        sched.suspend(handle).unwrap();
        sched.tick();
        assert_eq!(sched.dispatch(), 0);
        sched.resume(handle).unwrap();
        sched.tick();
        assert_eq!(sched.dispatch(), 1);
    }

    #[test]
    fn test_suspended_task_not_pending() {
        let sched: SharedScheduler<usize, 2> = SharedScheduler::new();
        sched.initialize();

        fn noop(_: usize) {}
        let handle = sched.register(Some(noop), 0, 1, 1, 0).unwrap();
        sched.tick();
        assert!(sched.is_pending(1));

        sched.suspend(handle).unwrap();
        assert!(!sched.is_pending(1));
        assert_eq!(sched.dispatch(), 0);

        sched.resume(handle).unwrap();
        assert!(sched.is_pending(1));
        assert_eq!(sched.dispatch(), 1);
        assert!(!sched.is_pending(1));
        assert!(!sched.is_pending(0));
    }
}
