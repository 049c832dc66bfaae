//! Bounded printf-style string composition.
//!
//! Provides a safe replacement for `snprintf`-style text assembly: the
//! destination buffer is never overrun and is always NUL-terminated, no
//! matter what the format string contains. The return value is the length
//! the fully rendered text *would* occupy, so callers detect truncation by
//! comparing it against the buffer capacity.
//!
//! # Module Organization
//!
//! - [`specifier`] - conversion-specifier parsing (flags, width, precision)
//! - [`render`] - integer, floating-point, and pointer field rendering
//!
//! Arguments are passed as a closed set of tagged values rather than a
//! variadic list, preserving the `%[flags][width][.precision]conv` grammar
//! without unchecked argument access.

pub mod render;
pub mod specifier;

#[cfg(test)]
mod tests;

use std::cell::Cell;

use crate::constants::MEMO_LINE_SIZE;
use specifier::{scan_flags, scan_number};

/// A single formatting argument.
///
/// A mismatch between a conversion character and the supplied variant makes
/// the specifier produce no output; the argument is still consumed.
#[derive(Clone, Copy, Debug)]
pub enum FormatArg<'a> {
    /// Signed integer operand, for `d i` (and accepted by `o x X u c`).
    Int(i64),
    /// Unsigned integer operand, for `o x X u c` (and accepted by `d i`).
    Uint(u64),
    /// Floating-point operand, for `f e E g G`.
    Float(f64),
    /// String operand, for `s`.
    Str(&'a str),
    /// Pointer-sized operand, for `p`.
    Ptr(usize),
    /// Caller-supplied slot written by the `n` conversion with the logical
    /// length produced so far.
    SizeSlot(&'a Cell<usize>),
}

impl From<i32> for FormatArg<'_> {
    fn from(v: i32) -> Self {
        FormatArg::Int(v as i64)
    }
}

impl From<i64> for FormatArg<'_> {
    fn from(v: i64) -> Self {
        FormatArg::Int(v)
    }
}

impl From<u32> for FormatArg<'_> {
    fn from(v: u32) -> Self {
        FormatArg::Uint(v as u64)
    }
}

impl From<u64> for FormatArg<'_> {
    fn from(v: u64) -> Self {
        FormatArg::Uint(v)
    }
}

impl From<f64> for FormatArg<'_> {
    fn from(v: f64) -> Self {
        FormatArg::Float(v)
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(v: &'a str) -> Self {
        FormatArg::Str(v)
    }
}

/// Output bookkeeping for one composition.
struct Output<'d> {
    dest: &'d mut [u8],
    /// Bytes actually written (always < capacity; one byte stays reserved
    /// for the terminator).
    written: usize,
    /// Untruncated length of the fully rendered text.
    logical: usize,
}

impl Output<'_> {
    fn push(&mut self, byte: u8) {
        if self.written + 1 < self.dest.len() {
            self.dest[self.written] = byte;
            self.written += 1;
        }

        self.logical += 1;
    }

    fn push_all(&mut self, field: &[u8]) {
        for &byte in field {
            self.push(byte);
        }
    }

    fn pad(&mut self, fill: u8, count: usize) {
        // Only the bytes that fit are written; the logical length counts
        // every pad byte, so an absurd field width costs no work beyond
        // the buffer capacity.
        let writable = count.min((self.dest.len().saturating_sub(1)).saturating_sub(self.written));
        for _ in 0..writable {
            self.dest[self.written] = fill;
            self.written += 1;
        }

        self.logical = self.logical.saturating_add(count);
    }

    /// Emits a field of `content` justified within `field_len` positions.
    fn push_field(&mut self, content: &[u8], field_len: usize, left_just: bool) {
        let padding = field_len.saturating_sub(content.len());
        if left_just {
            self.push_all(content);
            self.pad(b' ', padding);
        } else {
            self.pad(b' ', padding);
            self.push_all(content);
        }
    }
}

/// Composes `format` with `args` into `dest`, never writing past the end.
///
/// The destination is always NUL-terminated: after the full text when it
/// fits, otherwise at the last successfully written position, in which case
/// a truncation diagnostic is logged. Returns the logical (untruncated)
/// length of the rendered text. A zero-capacity destination produces
/// nothing and returns 0.
pub fn compose_into(dest: &mut [u8], format: &str, args: &[FormatArg<'_>]) -> usize {
    if dest.is_empty() {
        return 0;
    }

    let bytes = format.as_bytes();
    let mut out = Output { dest, written: 0, logical: 0 };
    let mut cursor = 0usize;
    let mut next_arg = 0usize;

    while cursor < bytes.len() {
        if bytes[cursor] != b'%' {
            out.push(bytes[cursor]);
            cursor += 1;
            continue;
        }

        cursor += 1;
        let flags = scan_flags(bytes, &mut cursor);

        // Minimum field width: a literal number, or '*' consuming an
        // argument (a negative argument means no width, as does a
        // mismatched one).
        let width = if bytes.get(cursor) == Some(&b'*') {
            cursor += 1;
            match take_arg(args, &mut next_arg) {
                Some(FormatArg::Int(w)) if w >= 0 => Some(w as usize),
                _ => None,
            }
        } else {
            scan_number(bytes, &mut cursor)
        };

        let mut precision = None;
        if bytes.get(cursor) == Some(&b'.') {
            cursor += 1;
            precision = if bytes.get(cursor) == Some(&b'*') {
                cursor += 1;
                match take_arg(args, &mut next_arg) {
                    Some(FormatArg::Int(p)) if p >= 0 => Some(p as usize),
                    _ => None,
                }
            } else {
                scan_number(bytes, &mut cursor)
            };
        }

        // Length modifiers carry no information here; tagged arguments are
        // already fully sized.
        if matches!(bytes.get(cursor), Some(b'h' | b'l' | b'L')) {
            cursor += 1;
        }

        let conversion = match bytes.get(cursor) {
            Some(&c) => c,
            None => break, // format ended mid-specifier
        };
        cursor += 1;

        match conversion {
            b'n' => {
                if let Some(FormatArg::SizeSlot(slot)) = take_arg(args, &mut next_arg) {
                    slot.set(out.logical);
                }
            }
            b'%' => {
                // Literal percent; consumes no argument.
                out.push(b'%');
            }
            b's' => {
                if let Some(FormatArg::Str(operand)) = take_arg(args, &mut next_arg) {
                    let text = operand.as_bytes();
                    let clipped = match precision {
                        Some(p) if p < text.len() => &text[..p],
                        _ => text,
                    };
                    let field_len = width.unwrap_or(0).max(clipped.len());
                    out.push_field(clipped, field_len, flags.left_just);
                }
            }
            b'd' | b'i' | b'o' | b'x' | b'X' | b'u' | b'c' => {
                let operand = match take_arg(args, &mut next_arg) {
                    Some(FormatArg::Int(v)) => Some(render::IntOperand::Signed(v)),
                    Some(FormatArg::Uint(v)) => Some(render::IntOperand::Unsigned(v)),
                    _ => None,
                };
                if let Some(operand) = operand {
                    let field = render::render_integer(operand, conversion, &flags, width, precision);
                    out.push_all(&field);
                }
            }
            b'f' | b'e' | b'E' | b'g' | b'G' => {
                if let Some(FormatArg::Float(value)) = take_arg(args, &mut next_arg) {
                    let field = render::render_float(value, conversion, &flags, width, precision);
                    out.push_all(&field);
                }
            }
            b'p' => {
                if let Some(FormatArg::Ptr(value)) = take_arg(args, &mut next_arg) {
                    let field = render::render_pointer(value);
                    out.push_all(field.as_bytes());
                }
            }
            _ => {
                // Unrecognized conversion character; consumes no argument.
            }
        }
    }

    let Output { dest, written, logical } = out;
    if logical < dest.len() {
        dest[logical] = 0;
    } else {
        dest[written] = 0;
        tracing::warn!(
            produced = logical,
            capacity = dest.len(),
            "composition buffer size exceeded; output truncated"
        );
    }

    logical
}

/// Copies `text` into `dest`, truncating to capacity and always writing a
/// terminating NUL. Returns the number of content bytes copied.
pub fn copy_into(dest: &mut [u8], text: &str) -> usize {
    if dest.is_empty() {
        return 0;
    }

    let copied = text.len().min(dest.len() - 1);
    dest[..copied].copy_from_slice(&text.as_bytes()[..copied]);
    dest[copied] = 0;
    copied
}

/// Composes into a stack-sized line buffer and returns the result as an
/// owned string, truncated to the standard memo line size.
pub fn compose_line(format: &str, args: &[FormatArg<'_>]) -> String {
    let mut line = [0u8; MEMO_LINE_SIZE];
    let produced = compose_into(&mut line, format, args);
    let end = produced.min(MEMO_LINE_SIZE - 1);
    String::from_utf8_lossy(&line[..end]).into_owned()
}

fn take_arg<'a>(args: &[FormatArg<'a>], next: &mut usize) -> Option<FormatArg<'a>> {
    let arg = args.get(*next).copied()?;
    *next += 1;
    Some(arg)
}
