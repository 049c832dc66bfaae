//! Behavior tests for bounded composition.

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::super::{compose_into, compose_line, copy_into, FormatArg};

    fn as_text(buffer: &[u8]) -> &str {
        let end = buffer.iter().position(|&b| b == 0).expect("terminator present");
        std::str::from_utf8(&buffer[..end]).expect("valid utf-8")
    }

    #[test]
    fn test_literal_text_passthrough() {
        let mut buffer = [0u8; 32];
        let produced = compose_into(&mut buffer, "plain text", &[]);
        assert_eq!(produced, 10);
        assert_eq!(as_text(&buffer), "plain text");
    }

    #[test]
    fn test_literal_percent() {
        let mut buffer = [0u8; 32];
        let produced = compose_into(&mut buffer, "100%% done", &[]);
        assert_eq!(produced, 9);
        assert_eq!(as_text(&buffer), "100% done");
    }

    #[test]
    fn test_signed_and_unsigned_integers() {
        let mut buffer = [0u8; 64];
        compose_into(
            &mut buffer,
            "%d %i %u",
            &[FormatArg::Int(-12), FormatArg::Int(34), FormatArg::Uint(56)],
        );
        assert_eq!(as_text(&buffer), "-12 34 56");
    }

    #[test]
    fn test_width_and_zero_pad() {
        let mut buffer = [0u8; 64];
        compose_into(&mut buffer, "[%5d][%-5d][%05d]", &[
            FormatArg::Int(42),
            FormatArg::Int(42),
            FormatArg::Int(42),
        ]);
        assert_eq!(as_text(&buffer), "[   42][42   ][00042]");
    }

    #[test]
    fn test_hex_octal_alternate() {
        let mut buffer = [0u8; 64];
        compose_into(&mut buffer, "%#x %#X %#o", &[
            FormatArg::Uint(255),
            FormatArg::Uint(255),
            FormatArg::Uint(8),
        ]);
        assert_eq!(as_text(&buffer), "0xff 0XFF 010");
    }

    #[test]
    fn test_string_precision_and_width() {
        let mut buffer = [0u8; 64];
        compose_into(&mut buffer, "[%8.3s][%-8.3s]", &[
            FormatArg::Str("abcdef"),
            FormatArg::Str("abcdef"),
        ]);
        assert_eq!(as_text(&buffer), "[     abc][abc     ]");
    }

    #[test]
    fn test_star_width_and_precision() {
        let mut buffer = [0u8; 64];
        compose_into(&mut buffer, "%*d|%.*f", &[
            FormatArg::Int(6),
            FormatArg::Int(7),
            FormatArg::Int(2),
            FormatArg::Float(2.5),
        ]);
        assert_eq!(as_text(&buffer), "     7|2.50");
    }

    #[test]
    fn test_negative_star_width_means_none() {
        let mut buffer = [0u8; 64];
        compose_into(&mut buffer, "%*d", &[FormatArg::Int(-6), FormatArg::Int(7)]);
        assert_eq!(as_text(&buffer), "7");
    }

    #[test]
    fn test_char_conversion() {
        let mut buffer = [0u8; 16];
        compose_into(&mut buffer, "%c%c", &[FormatArg::Int('o' as i64), FormatArg::Int('k' as i64)]);
        assert_eq!(as_text(&buffer), "ok");
    }

    #[test]
    fn test_float_conversions() {
        let mut buffer = [0u8; 64];
        compose_into(&mut buffer, "%.2f %e %g", &[
            FormatArg::Float(3.14159),
            FormatArg::Float(1234.5),
            FormatArg::Float(100.0),
        ]);
        assert_eq!(as_text(&buffer), "3.14 1.234500e+03 100");
    }

    #[test]
    fn test_pointer_conversion() {
        let mut buffer = [0u8; 32];
        compose_into(&mut buffer, "%p %p", &[FormatArg::Ptr(0xbeef), FormatArg::Ptr(0)]);
        assert_eq!(as_text(&buffer), "0xbeef 0");
    }

    #[test]
    fn test_size_report_conversion() {
        let slot = Cell::new(0usize);
        let mut buffer = [0u8; 64];
        let produced = compose_into(&mut buffer, "abc%ndef", &[FormatArg::SizeSlot(&slot)]);
        assert_eq!(slot.get(), 3);
        assert_eq!(produced, 6);
        assert_eq!(as_text(&buffer), "abcdef");
    }

    #[test]
    fn test_size_report_counts_logical_length() {
        // The slot reports the untruncated running length, even past the
        // capacity of the destination.
        let slot = Cell::new(0usize);
        let mut buffer = [0u8; 4];
        compose_into(&mut buffer, "%s%n", &[FormatArg::Str("hello"), FormatArg::SizeSlot(&slot)]);
        assert_eq!(slot.get(), 5);
    }

    #[test]
    fn test_truncation_reports_full_length() {
        let mut buffer = [0u8; 5];
        let produced = compose_into(&mut buffer, "%s", &[FormatArg::Str("hello world")]);
        assert_eq!(produced, 11);
        assert_eq!(&buffer[..5], b"hell\0");
    }

    #[test]
    fn test_termination_within_every_capacity() {
        let format = "x=%d y=%8.3s z=%#x!";
        let args = [FormatArg::Int(-1234), FormatArg::Str("abcdef"), FormatArg::Uint(48879)];

        let mut reference = [0u8; 64];
        let full = compose_into(&mut reference, format, &args);
        assert!(full < 64);

        for capacity in 1..=full + 2 {
            let mut buffer = vec![0xAAu8; capacity];
            let produced = compose_into(&mut buffer, format, &args);
            assert_eq!(produced, full);

            // Terminated in range, and all content bytes match the
            // untruncated rendering.
            let end = buffer.iter().position(|&b| b == 0).expect("terminator in range");
            assert!(end < capacity);
            assert_eq!(&buffer[..end], &reference[..end]);
        }
    }

    #[test]
    fn test_huge_width_is_tallied_not_written() {
        let mut buffer = [0u8; 8];
        let produced = compose_into(&mut buffer, "%999999s", &[FormatArg::Str("x")]);
        assert_eq!(produced, 999999);
        // Right-justified: only the pad bytes that fit land in the buffer.
        assert_eq!(&buffer[..8], b"       \0");
    }

    #[test]
    fn test_zero_capacity_is_a_noop() {
        let mut buffer = [0u8; 0];
        assert_eq!(compose_into(&mut buffer, "anything %d", &[FormatArg::Int(1)]), 0);
    }

    #[test]
    fn test_mismatched_argument_is_consumed() {
        let mut buffer = [0u8; 32];
        compose_into(&mut buffer, "[%d|%s]", &[FormatArg::Str("a"), FormatArg::Str("b")]);
        assert_eq!(as_text(&buffer), "[|b]");
    }

    #[test]
    fn test_missing_arguments_render_nothing() {
        let mut buffer = [0u8; 32];
        compose_into(&mut buffer, "a%db", &[]);
        assert_eq!(as_text(&buffer), "ab");
    }

    #[test]
    fn test_unknown_conversion_consumes_no_argument() {
        let mut buffer = [0u8; 32];
        compose_into(&mut buffer, "%q%d", &[FormatArg::Int(5)]);
        assert_eq!(as_text(&buffer), "5");
    }

    #[test]
    fn test_format_ending_mid_specifier() {
        let mut buffer = [0u8; 32];
        let produced = compose_into(&mut buffer, "tail %-8", &[]);
        assert_eq!(produced, 5);
        assert_eq!(as_text(&buffer), "tail ");
    }

    #[test]
    fn test_length_modifiers_are_ignored() {
        let mut buffer = [0u8; 32];
        compose_into(&mut buffer, "%ld %hu", &[FormatArg::Int(9), FormatArg::Uint(3)]);
        assert_eq!(as_text(&buffer), "9 3");
    }

    #[test]
    fn test_copy_into_truncates_and_terminates() {
        let mut buffer = [0u8; 4];
        let copied = copy_into(&mut buffer, "abcdef");
        assert_eq!(copied, 3);
        assert_eq!(&buffer, b"abc\0");

        let mut exact = [0u8; 8];
        let copied = copy_into(&mut exact, "abc");
        assert_eq!(copied, 3);
        assert_eq!(&exact[..4], b"abc\0");
    }

    #[test]
    fn test_compose_line_convenience() {
        let line = compose_line("at line %d of %s", &[FormatArg::Int(42), FormatArg::Str("x.rs")]);
        assert_eq!(line, "at line 42 of x.rs");
    }
}
