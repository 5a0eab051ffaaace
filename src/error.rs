//! # Errors
//!
//! Error type returned by the fallible scheduler operations. `tick()` and
//! `dispatch()` are infallible and never produce one.

use core::fmt;

/// Result alias for scheduler operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported synchronously to the immediate caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// A required handler was absent.
    NullReference,
    /// Priority out of range, zero tick rate, or a handle that does not
    /// address an occupied slot of the generation it was issued for.
    InvalidParameter,
    /// The tick rate cannot change once a task has been registered.
    TasksRegistered,
    /// Every handle generation of this priority has been issued.
    HandlesExhausted,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullReference => f.write_str("null task handler"),
            Self::InvalidParameter => f.write_str("invalid parameter"),
            Self::TasksRegistered => f.write_str("tick rate locked: tasks already registered"),
            Self::HandlesExhausted => f.write_str("no task handles left at this priority"),
        }
    }
}
