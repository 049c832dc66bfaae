//! The deferred error-message pool and context surface.
//!
//! `Diagnostics` is the explicitly constructed home for what would
//! otherwise be process-wide state: the message pool, the active memo
//! sink, and the assertion-fatality flag. A process normally builds one
//! and shares it (an `Arc` works fine); unit tests build as many
//! independent ones as they need.

use std::{
    io,
    panic::Location,
    process,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
};

use dtnport_core::{
    compose::{compose_line, FormatArg},
    config::Config,
    constants::MEMO_LINE_SIZE,
    lock::ResourceLock,
};

use crate::{
    pool::{ErrmsgPool, OMISSION_NOTICE},
    sink::{MemoSink, StdoutSink},
};

/// Returns the description of the most recent platform error.
fn system_error_msg() -> String {
    io::Error::last_os_error().to_string()
}

/// Diagnostics context: error-message pool, memo sink, assertion policy.
pub struct Diagnostics {
    pool: ErrmsgPool,
    sink: RwLock<Arc<dyn MemoSink>>,
    drain_lock: ResourceLock,
    core_dump_wanted: AtomicBool,
}

impl Diagnostics {
    /// Creates a context with the default configuration and stdout sink.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates a context with the given configuration.
    pub fn with_config(config: &Config) -> Self {
        Self {
            pool: ErrmsgPool::new(config.errmsg_capacity),
            sink: RwLock::new(Arc::new(StdoutSink)),
            drain_lock: ResourceLock::initialized(),
            core_dump_wanted: AtomicBool::new(config.core_dump_wanted),
        }
    }

    fn sink_read(&self) -> RwLockReadGuard<'_, Arc<dyn MemoSink>> {
        match self.sink.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn sink_write(&self) -> RwLockWriteGuard<'_, Arc<dyn MemoSink>> {
        match self.sink.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Installs a new memo sink, replacing the previous one.
    pub fn set_sink(&self, sink: Arc<dyn MemoSink>) {
        *self.sink_write() = sink;
    }

    /// Controls whether an assertion failure aborts the process.
    pub fn set_core_dump_wanted(&self, wanted: bool) {
        self.core_dump_wanted.store(wanted, Ordering::SeqCst);
    }

    /// Returns the current assertion-fatality setting.
    pub fn core_dump_wanted(&self) -> bool {
        self.core_dump_wanted.load(Ordering::SeqCst)
    }

    /// Emits one memo line directly through the active sink.
    pub fn write_memo(&self, text: &str) {
        let sink = Arc::clone(&self.sink_read());
        sink.emit(text);
    }

    /// Emits `"<text>: <note>"`, clipping overlong components.
    pub fn write_memo_note(&self, text: &str, note: &str) {
        let line = compose_line(
            "%.900s: %.64s",
            &[FormatArg::Str(text), FormatArg::Str(note)],
        );
        self.write_memo(&line);
    }

    /// Emits `text` followed by the current platform error description.
    pub fn write_err_memo(&self, text: &str) {
        self.write_memo_note(text, &system_error_msg());
    }

    /// Posts a deferred error message tagged with the caller's source
    /// location, optionally with a context argument.
    #[track_caller]
    pub fn post_errmsg(&self, text: &str, arg: Option<&str>) {
        let location = Location::caller();
        self.pool.post(location.line(), location.file(), text, arg);
    }

    /// Posts a deferred error message and immediately drains the pool to
    /// the active sink.
    #[track_caller]
    pub fn put_errmsg(&self, text: &str, arg: Option<&str>) {
        self.post_errmsg(text, arg);
        self.write_errmsg_memos();
    }

    /// Posts `text` suffixed with the current platform error description.
    /// The text is clipped so the composed line fits the memo line buffer.
    #[track_caller]
    pub fn post_sys_errmsg(&self, text: &str, arg: Option<&str>) {
        let sysmsg = system_error_msg();
        let max_text = MEMO_LINE_SIZE.saturating_sub(2 + sysmsg.len() + 1);
        let line = compose_line(
            "%.*s: %s",
            &[
                FormatArg::Int(max_text as i64),
                FormatArg::Str(text),
                FormatArg::Str(&sysmsg),
            ],
        );
        self.post_errmsg(&line, arg);
    }

    /// Posts a platform-error message and immediately drains the pool.
    #[track_caller]
    pub fn put_sys_errmsg(&self, text: &str, arg: Option<&str>) {
        self.post_sys_errmsg(text, arg);
        self.write_errmsg_memos();
    }

    /// Retrieves the oldest pending message into `buffer`; returns its
    /// length, or 0 when none are pending. Retrieval removes the message.
    pub fn get_errmsg(&self, buffer: &mut [u8]) -> usize {
        self.pool.retrieve(buffer)
    }

    /// Returns true when deferred messages are pending.
    pub fn has_pending_errmsgs(&self) -> bool {
        !self.pool.is_empty()
    }

    /// Drains every pending message to the active sink, oldest first.
    /// An omission marker is emitted as the fixed omission notice.
    pub fn write_errmsg_memos(&self) {
        // Serialize whole drains so interleaved callers cannot interleave
        // their message sequences at the sink.
        let _guard = self.drain_lock.guard();
        let mut buffer = vec![0u8; self.pool.capacity()];
        loop {
            let length = self.pool.retrieve(&mut buffer);
            if length == 0 {
                return;
            }

            if ErrmsgPool::is_omission_marker(&buffer[..length]) {
                self.write_memo(OMISSION_NOTICE);
            } else {
                let end = length.min(buffer.len() - 1);
                self.write_memo(&String::from_utf8_lossy(&buffer[..end]));
            }
        }
    }

    /// Discards every pending message without emitting anything.
    pub fn discard_errmsgs(&self) {
        self.pool.discard();
    }

    /// Reports a failed assertion: posts `"Assertion failed."` with the
    /// given argument, drains pending messages, and aborts the process
    /// when the core-dump flag is set.
    #[track_caller]
    pub fn assertion_failed(&self, arg: Option<&str>) {
        self.post_errmsg("Assertion failed.", arg);
        self.write_errmsg_memos();
        if self.core_dump_wanted() {
            process::abort();
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("pending", &self.has_pending_errmsgs())
            .field("core_dump_wanted", &self.core_dump_wanted())
            .finish()
    }
}
