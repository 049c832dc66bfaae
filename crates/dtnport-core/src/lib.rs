#![warn(missing_docs)]

//! dtnport-core: foundational types and utilities.
//!
//! This crate provides the minimal set of core utilities shared across all
//! layers of the portability library:
//! - Configuration types
//! - Error handling
//! - Shared constants
//! - Reentrant resource locking
//! - Bounded string composition
//!
//! Wire-format numerics live in `dtnport-wire`; the deferred diagnostics
//! machinery lives in `dtnport-diag`.

/// Bounds shared across layers.
pub mod constants {
    /// Default capacity of the deferred error-message pool, in bytes.
    pub const DEFAULT_ERRMSG_CAPACITY: usize = 4096;
    /// Size of the line buffer used when composing memo text.
    pub const MEMO_LINE_SIZE: usize = 1024;
    /// Largest honored field width or precision for numeric conversions.
    /// Larger requests are clamped; any 64-bit value still renders in
    /// full at this bound.
    pub const MAX_NUMERIC_FIELD: usize = 64;
    /// Digits of field width/precision accepted before further digits are
    /// ignored. A 64-bit magnitude needs at most 21 decimal digits, so any
    /// longer run is pathological input.
    pub const MAX_NUMBER_DIGITS: usize = 21;
}

/// Configuration options for the primitives layer.
pub mod config;
/// Bounded printf-style string composition.
pub mod compose;
/// Error types and results.
pub mod error;
/// Reentrant resource lock with owner tracking.
pub mod lock;
/// Token scanning for command-line text.
pub mod text;

pub use compose::{compose_into, copy_into, FormatArg};
pub use error::{ErrorKind, Result};
pub use lock::{Guarded, LockGuard, ResourceLock};
