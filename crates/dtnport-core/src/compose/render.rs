//! Field rendering for numeric, floating-point, and pointer conversions.
//!
//! Each renderer produces the complete field (sign, prefix, digits, and
//! padding) as bytes; the composition loop copies them under its bounds
//! rule. Field width and precision are clamped so pathological requests
//! cannot balloon a single field.

use crate::constants::MAX_NUMERIC_FIELD;

use super::specifier::Flags;

/// Integer operand for the `d i o x X u c` conversions.
#[derive(Clone, Copy, Debug)]
pub enum IntOperand {
    /// Supplied as a signed value.
    Signed(i64),
    /// Supplied as an unsigned value.
    Unsigned(u64),
}

fn clamp(request: Option<usize>) -> Option<usize> {
    request.map(|n| n.min(MAX_NUMERIC_FIELD))
}

/// Assembles sign/prefix + digits into the final field with padding.
fn assemble(
    sign_prefix: &str,
    digits: &str,
    flags: &Flags,
    width: Option<usize>,
    allow_zero_pad: bool,
) -> Vec<u8> {
    let content_len = sign_prefix.len() + digits.len();
    let field_len = width.unwrap_or(0).max(content_len);
    let padding = field_len - content_len;

    let mut field = Vec::with_capacity(field_len);
    if padding > 0 && flags.pad_zero && !flags.left_just && allow_zero_pad {
        // Zeros go between the sign/prefix and the digits.
        field.extend_from_slice(sign_prefix.as_bytes());
        field.extend(std::iter::repeat(b'0').take(padding));
        field.extend_from_slice(digits.as_bytes());
    } else if flags.left_just {
        field.extend_from_slice(sign_prefix.as_bytes());
        field.extend_from_slice(digits.as_bytes());
        field.extend(std::iter::repeat(b' ').take(padding));
    } else {
        field.extend(std::iter::repeat(b' ').take(padding));
        field.extend_from_slice(sign_prefix.as_bytes());
        field.extend_from_slice(digits.as_bytes());
    }

    field
}

/// Renders one integer or character field.
pub fn render_integer(
    operand: IntOperand,
    conversion: u8,
    flags: &Flags,
    width: Option<usize>,
    precision: Option<usize>,
) -> Vec<u8> {
    let width = clamp(width);
    let precision = clamp(precision);

    if conversion == b'c' {
        // The low byte of the operand, emitted as-is.
        let byte = match operand {
            IntOperand::Signed(v) => v as u8,
            IntOperand::Unsigned(v) => v as u8,
        };
        let field_len = width.unwrap_or(0).max(1);
        let mut field = Vec::with_capacity(field_len);
        if flags.left_just {
            field.push(byte);
            field.extend(std::iter::repeat(b' ').take(field_len - 1));
        } else {
            field.extend(std::iter::repeat(b' ').take(field_len - 1));
            field.push(byte);
        }

        return field;
    }

    let signed = matches!(conversion, b'd' | b'i');
    let (negative, magnitude) = match operand {
        IntOperand::Signed(v) if signed => (v < 0, v.unsigned_abs()),
        IntOperand::Signed(v) => (false, v as u64),
        IntOperand::Unsigned(v) if signed => ((v as i64) < 0, (v as i64).unsigned_abs()),
        IntOperand::Unsigned(v) => (false, v),
    };

    let mut digits = match conversion {
        b'o' => format!("{:o}", magnitude),
        b'x' => format!("{:x}", magnitude),
        b'X' => format!("{:X}", magnitude),
        _ => format!("{}", magnitude),
    };

    // Precision is the minimum digit count; zero with precision zero
    // renders as the empty field.
    if let Some(p) = precision {
        if magnitude == 0 && p == 0 {
            digits.clear();
        } else if digits.len() < p {
            digits = format!("{}{}", "0".repeat(p - digits.len()), digits);
        }
    }

    let mut sign_prefix = String::new();
    if signed {
        if negative {
            sign_prefix.push('-');
        } else if flags.force_sign {
            sign_prefix.push('+');
        } else if flags.space_prefix {
            sign_prefix.push(' ');
        }
    }

    if flags.alt_form {
        match conversion {
            b'o' if !digits.starts_with('0') => sign_prefix.push('0'),
            b'x' if magnitude != 0 => sign_prefix.push_str("0x"),
            b'X' if magnitude != 0 => sign_prefix.push_str("0X"),
            _ => {}
        }
    }

    // Zero padding is suppressed when an explicit precision governs the
    // digit count.
    assemble(&sign_prefix, &digits, flags, width, precision.is_none())
}

/// Splits a Rust exponential rendering (`d.ddde±k` or `d.dddek`) into
/// mantissa and exponent, reformatting the exponent C-style: explicit sign
/// and at least two digits.
fn c_style_exponent(rendered: &str, upper: bool) -> String {
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => {
            let exp: i32 = exponent.parse().unwrap_or(0);
            let marker = if upper { 'E' } else { 'e' };
            format!("{}{}{:+03}", mantissa, marker, exp)
        }
        None => rendered.to_owned(),
    }
}

fn strip_trailing_zeros(core: &str) -> String {
    if core.contains('.') {
        core.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        core.to_owned()
    }
}

/// Renders one floating-point field for the `f e E g G` conversions.
pub fn render_float(
    value: f64,
    conversion: u8,
    flags: &Flags,
    width: Option<usize>,
    precision: Option<usize>,
) -> Vec<u8> {
    let width = clamp(width);
    let precision = clamp(precision);

    let negative = value.is_sign_negative() && !value.is_nan();
    let mut sign = String::new();
    if negative {
        sign.push('-');
    } else if flags.force_sign {
        sign.push('+');
    } else if flags.space_prefix {
        sign.push(' ');
    }

    if !value.is_finite() {
        let text = if value.is_nan() { "nan" } else { "inf" };
        return assemble(&sign, text, flags, width, false);
    }

    let magnitude = value.abs();
    let core = match conversion {
        b'f' => {
            let prec = precision.unwrap_or(6);
            let mut core = format!("{:.p$}", magnitude, p = prec);
            if prec == 0 && flags.alt_form {
                core.push('.');
            }

            core
        }
        b'e' | b'E' => {
            let prec = precision.unwrap_or(6);
            let rendered = format!("{:.p$e}", magnitude, p = prec);
            let mut core = c_style_exponent(&rendered, conversion == b'E');
            if prec == 0 && flags.alt_form {
                // Retain the decimal point ahead of the exponent marker.
                if let Some(pos) = core.find(['e', 'E']) {
                    core.insert(pos, '.');
                }
            }

            core
        }
        _ => {
            // g/G: significant-digit precision, style chosen by exponent.
            let upper = conversion == b'G';
            let significant = match precision {
                Some(0) => 1,
                Some(p) => p,
                None => 6,
            };
            let probe = format!("{:.p$e}", magnitude, p = significant - 1);
            let exponent: i32 = probe
                .split_once('e')
                .and_then(|(_, e)| e.parse().ok())
                .unwrap_or(0);
            if exponent >= -4 && exponent < significant as i32 {
                let prec = (significant as i32 - 1 - exponent).max(0) as usize;
                let fixed = format!("{:.p$}", magnitude, p = prec);
                if flags.alt_form {
                    fixed
                } else {
                    strip_trailing_zeros(&fixed)
                }
            } else {
                let (mantissa, _) = probe.split_once('e').unwrap_or((probe.as_str(), ""));
                let mantissa = if flags.alt_form {
                    mantissa.to_owned()
                } else {
                    strip_trailing_zeros(mantissa)
                };
                let marker = if upper { 'E' } else { 'e' };
                format!("{}{}{:+03}", mantissa, marker, exponent)
            }
        }
    };

    assemble(&sign, &core, flags, width, true)
}

/// Renders a pointer-sized value as alternate-form hex, the fixed style
/// used for the `p` conversion regardless of flags.
pub fn render_pointer(value: usize) -> String {
    if value == 0 {
        "0".to_owned()
    } else {
        format!("{:#x}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(field: Vec<u8>) -> String {
        String::from_utf8(field).unwrap()
    }

    #[test]
    fn test_signed_decimal() {
        let flags = Flags::default();
        let field = render_integer(IntOperand::Signed(-42), b'd', &flags, None, None);
        assert_eq!(text(field), "-42");
    }

    #[test]
    fn test_force_sign_and_width() {
        let flags = Flags { force_sign: true, ..Flags::default() };
        let field = render_integer(IntOperand::Signed(42), b'd', &flags, Some(6), None);
        assert_eq!(text(field), "   +42");
    }

    #[test]
    fn test_zero_pad_keeps_sign_leading() {
        let flags = Flags { pad_zero: true, ..Flags::default() };
        let field = render_integer(IntOperand::Signed(-7), b'd', &flags, Some(5), None);
        assert_eq!(text(field), "-0007");
    }

    #[test]
    fn test_precision_overrides_zero_pad() {
        let flags = Flags { pad_zero: true, ..Flags::default() };
        let field = render_integer(IntOperand::Signed(7), b'd', &flags, Some(6), Some(3));
        assert_eq!(text(field), "   007");
    }

    #[test]
    fn test_alt_form_hex() {
        let flags = Flags { alt_form: true, ..Flags::default() };
        let field = render_integer(IntOperand::Unsigned(255), b'x', &flags, None, None);
        assert_eq!(text(field), "0xff");

        // No prefix for zero, as in the C library.
        let field = render_integer(IntOperand::Unsigned(0), b'x', &flags, None, None);
        assert_eq!(text(field), "0");
    }

    #[test]
    fn test_alt_form_octal() {
        let flags = Flags { alt_form: true, ..Flags::default() };
        let field = render_integer(IntOperand::Unsigned(8), b'o', &flags, None, None);
        assert_eq!(text(field), "010");
    }

    #[test]
    fn test_zero_with_zero_precision_is_empty() {
        let flags = Flags::default();
        let field = render_integer(IntOperand::Unsigned(0), b'u', &flags, None, Some(0));
        assert_eq!(text(field), "");
    }

    #[test]
    fn test_char_field() {
        let flags = Flags::default();
        let field = render_integer(IntOperand::Signed('A' as i64), b'c', &flags, Some(3), None);
        assert_eq!(text(field), "  A");
    }

    #[test]
    fn test_float_fixed_default_precision() {
        let flags = Flags::default();
        let field = render_float(3.5, b'f', &flags, None, None);
        assert_eq!(text(field), "3.500000");
    }

    #[test]
    fn test_float_negative_zero_pad() {
        let flags = Flags { pad_zero: true, ..Flags::default() };
        let field = render_float(-1.25, b'f', &flags, Some(8), Some(2));
        assert_eq!(text(field), "-0001.25");
    }

    #[test]
    fn test_float_exponent_two_digit() {
        let flags = Flags::default();
        let field = render_float(1234.5, b'e', &flags, None, Some(2));
        assert_eq!(text(field), "1.23e+03");

        let field = render_float(0.00015, b'E', &flags, None, Some(1));
        assert_eq!(text(field), "1.5E-04");
    }

    #[test]
    fn test_float_g_strips_trailing_zeros() {
        let flags = Flags::default();
        let field = render_float(100.0, b'g', &flags, None, None);
        assert_eq!(text(field), "100");

        let field = render_float(0.0001, b'g', &flags, None, None);
        assert_eq!(text(field), "0.0001");

        let field = render_float(0.00001, b'g', &flags, None, None);
        assert_eq!(text(field), "1e-05");
    }

    #[test]
    fn test_pointer_form() {
        assert_eq!(render_pointer(0), "0");
        assert_eq!(render_pointer(0xdead), "0xdead");
    }
}
