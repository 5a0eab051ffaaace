//! # CoopOS — Cooperative Operating System
//!
//! A minimal cooperative task scheduler for resource-constrained
//! microcontrollers: a fixed table of periodic and one-shot jobs, advanced
//! by a periodic timer interrupt and run from a non-preemptive dispatch loop.
//!
//! ## Overview
//!
//! Firmware registers independent periodic behaviors (blinking an output,
//! polling a sensor, ...) at distinct priorities. The timer interrupt calls
//! `tick()`, which counts every task down and marks the ones that are due;
//! the main loop calls `dispatch()`, which runs each due task exactly once,
//! highest priority first. Tasks run to completion and never preempt each
//! other.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                    Application Tasks                    │
//! │                  fn(A) handlers + args                  │
//! ├────────────────────────────────────────────────────────┤
//! │             Shared instance (kernel.rs)                 │
//! │   initialize() · register() · remove() · tick() ·      │
//! │   dispatch()   — critical sections via sync.rs          │
//! ├────────────────────────────────────────────────────────┤
//! │                Scheduler (scheduler.rs)                 │
//! │     task table · tick update · dispatch pass           │
//! ├──────────────────────────┬─────────────────────────────┤
//! │   Task model (task.rs)   │  Config / Error / fmt       │
//! │   Task · TaskHandle      │  config.rs · error.rs       │
//! ├──────────────────────────┴─────────────────────────────┤
//! │            Arch Port (arch/cortex_m.rs)                 │
//! │              SysTick · wait for interrupt              │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timing Model
//!
//! - A task with period `P` and initial delay 0 is activated on the first
//!   tick and every `P` ticks after that
//! - An initial delay `d > 0` activates the task after exactly `d` ticks
//! - `period == 0` makes a one-shot task, removed after its single run
//! - Activations that pile up between two dispatch passes are coalesced
//!   into a single run
//!
//! ## Memory Model
//!
//! - **No heap**: the task table is a `[Option<Task<A>>; N]` inside the scheduler
//! - **No `alloc`**: pure `core`
//! - **Explicit instances**: `Scheduler` is an ordinary value; put a
//!   `SharedScheduler` in a `static` to share it with an interrupt

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod arch;
pub mod config;
pub mod error;
pub mod kernel;
pub mod scheduler;
pub mod sync;
pub mod task;

pub use config::Tick;
pub use error::{Error, Result};
pub use kernel::SharedScheduler;
pub use scheduler::Scheduler;
pub use task::{Task, TaskFn, TaskHandle};
