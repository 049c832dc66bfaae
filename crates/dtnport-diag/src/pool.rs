//! The bounded message region.
//!
//! Messages live back to back as NUL-terminated strings in one fixed byte
//! region. Posting appends at the tail; retrieval removes the oldest
//! message and compacts the remainder toward the front, so drains always
//! run oldest-first. The region is guarded throughout by its own
//! reentrant resource lock.

use dtnport_core::{
    compose::{compose_into, FormatArg},
    lock::Guarded,
};

/// Notice substituted for the omission marker when a drain encounters one.
pub const OMISSION_NOTICE: &str = "[?] message omitted due to excessive length";

struct MsgRegion {
    buf: Box<[u8]>,
    used: usize,
}

/// Bounded FIFO pool of deferred error messages.
pub struct ErrmsgPool {
    region: Guarded<MsgRegion>,
    capacity: usize,
}

impl ErrmsgPool {
    /// Creates a pool with the given byte capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            region: Guarded::new(MsgRegion { buf: vec![0u8; capacity].into_boxed_slice(), used: 0 }),
            capacity,
        }
    }

    /// Returns the fixed capacity of the region in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of bytes currently holding messages.
    pub fn used(&self) -> usize {
        self.region.with(|region| region.used).unwrap_or(0)
    }

    /// Returns true when no messages are pending.
    pub fn is_empty(&self) -> bool {
        self.used() == 0
    }

    /// Posts one message: `"at line <N> of <file>, <text>"`, optionally
    /// followed by `" (<arg>)"`.
    ///
    /// If the formatted message plus its terminator does not fit in the
    /// remaining space, a single-newline omission marker is recorded
    /// instead, provided at least two bytes remain; otherwise the post is
    /// silently dropped. Posts with an empty file name or empty text are
    /// ignored.
    pub fn post(&self, line: u32, file: &str, text: &str, arg: Option<&str>) {
        if file.is_empty() || text.is_empty() {
            return;
        }

        let line_text = line.to_string();
        // A refused lock drops the post; the lock fails open.
        let _ = self.region.with(|region| {
            let space_avbl = region.buf.len() - region.used;
            let space_for_text = 8 + line_text.len() + 4 + file.len() + 2 + text.len();
            let mut space_needed = space_for_text + 1;
            if let Some(arg) = arg {
                space_needed += 2 + arg.len() + 1;
            }

            if space_needed > space_avbl {
                if space_avbl < 2 {
                    // Cannot even note that the message was omitted.
                    tracing::warn!("deferred error message dropped; pool exhausted");
                    return;
                }

                region.buf[region.used] = b'\n';
                region.buf[region.used + 1] = 0;
                region.used += 2;
                return;
            }

            let tail = &mut region.buf[region.used..];
            compose_into(
                tail,
                "at line %s of %s, %s",
                &[
                    FormatArg::Str(&line_text),
                    FormatArg::Str(file),
                    FormatArg::Str(text),
                ],
            );
            if let Some(arg) = arg {
                let note = &mut tail[space_for_text..];
                compose_into(note, " (%s)", &[FormatArg::Str(arg)]);
            }

            region.used += space_needed;
        });
    }

    /// Retrieves the oldest message into `buffer`, removing it from the
    /// pool and compacting the remainder toward the front.
    ///
    /// The message content is copied with a terminating NUL, truncated if
    /// `buffer` is smaller than the message. Returns the message length
    /// (excluding the terminator), or 0 when the pool is empty.
    pub fn retrieve(&self, buffer: &mut [u8]) -> usize {
        self.region
            .with(|region| {
                let msg_length = region.buf[..region.used]
                    .iter()
                    .position(|&b| b == 0)
                    .unwrap_or(region.used);
                if region.used == 0 || msg_length == 0 {
                    return 0;
                }

                if !buffer.is_empty() {
                    let copied = msg_length.min(buffer.len() - 1);
                    buffer[..copied].copy_from_slice(&region.buf[..copied]);
                    buffer[copied] = 0;
                }

                // Removing the message releases its space for more
                // messages.
                let space_freed = (msg_length + 1).min(region.used);
                region.buf.copy_within(space_freed..region.used, 0);
                region.used -= space_freed;
                region.buf[region.used..region.used + space_freed].fill(0);
                msg_length
            })
            .unwrap_or(0)
    }

    /// Retrieves and discards messages until the pool is empty.
    pub fn discard(&self) {
        let mut scratch = [0u8; 2];
        while self.retrieve(&mut scratch) != 0 {}
    }

    /// True when a retrieved message is the omission marker rather than
    /// real text.
    pub fn is_omission_marker(message: &[u8]) -> bool {
        message.first() == Some(&b'\n')
    }
}
