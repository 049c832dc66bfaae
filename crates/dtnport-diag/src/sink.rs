//! Pluggable memo sinks.
//!
//! A memo is one human-readable diagnostic line. Exactly one sink is
//! active per diagnostics context; installing a new one replaces the
//! previous one. The drain operation of the error-message pool is the
//! main internal producer, but any component may emit memos directly.

use std::io::{self, Write};

use crossbeam_channel::{unbounded, Receiver, Sender};

/// Destination for emitted memo lines.
pub trait MemoSink: Send + Sync {
    /// Emits one line of diagnostic text.
    fn emit(&self, line: &str);
}

/// Default sink: writes each memo to standard output and flushes.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl MemoSink for StdoutSink {
    fn emit(&self, line: &str) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        // A failed write to stdout leaves nowhere to report the failure.
        let _ = writeln!(handle, "{}", line);
        let _ = handle.flush();
    }
}

/// Sink that forwards memos over a channel, for embedders that collect
/// diagnostics on another thread (and for tests).
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: Sender<String>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its memos arrive on.
    pub fn new() -> (Self, Receiver<String>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }
}

impl MemoSink for ChannelSink {
    fn emit(&self, line: &str) {
        // A disconnected receiver just means nobody is listening anymore.
        let _ = self.sender.send(line.to_owned());
    }
}
