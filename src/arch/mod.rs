//! # Architecture Abstraction Layer
//!
//! Hardware glue around the scheduler: the periodic tick source and idling
//! between dispatch passes. Only the Cortex-M port exists; other targets
//! drive `tick()` from their own timer.

#[cfg(target_arch = "arm")]
pub mod cortex_m;
