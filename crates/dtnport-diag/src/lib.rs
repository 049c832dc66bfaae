#![warn(missing_docs)]

//! dtnport-diag: deferred diagnostics for long-running agents.
//!
//! Error text accumulates in a bounded in-memory pool until some
//! convenient moment, then drains in FIFO order through a pluggable memo
//! sink. The pool degrades gracefully under exhaustion: a message that
//! does not fit is replaced by a one-byte omission marker, and the drain
//! substitutes a fixed notice for it.
//!
//! The [`Diagnostics`] context object ties the pieces together: the pool,
//! the active sink, and the assertion-fatality flag. Construct one per
//! process (or one per test) and share it; there is no hidden global
//! state.

/// The deferred error-message pool and context surface.
pub mod context;
/// The bounded message region.
pub mod pool;
/// Pluggable memo sinks.
pub mod sink;

pub use context::Diagnostics;
pub use pool::{ErrmsgPool, OMISSION_NOTICE};
pub use sink::{ChannelSink, MemoSink, StdoutSink};
