//! Token scanning for command-line text.
//!
//! Agent programs in the stack read operator command lines and bundle
//! payload scripts as plain text. These helpers split such a line into
//! tokens:
//! - tokens are normally delimited by whitespace,
//! - a token opened with a single quote extends to the next unescaped
//!   single quote and may contain whitespace,
//! - a backslash escapes the following byte inside a quoted token; both
//!   bytes are kept in the token (nothing is unescaped),
//! - an unmatched opening quote consumes the rest of the line as one
//!   token.
//!
//! Tokens are borrowed subslices of the input; no allocation is performed.

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Extracts the next token, advancing `cursor` past it and its delimiter.
///
/// Returns `None` when nothing but whitespace remains (or when an opening
/// quote is the final character of the input).
///
/// # Examples
/// ```
/// use dtnport_core::text::find_token;
///
/// let mut line = "add plan 'dtn://node one' 30";
/// assert_eq!(find_token(&mut line), Some("add"));
/// assert_eq!(find_token(&mut line), Some("plan"));
/// assert_eq!(find_token(&mut line), Some("dtn://node one"));
/// assert_eq!(find_token(&mut line), Some("30"));
/// assert_eq!(find_token(&mut line), None);
/// ```
pub fn find_token<'a>(cursor: &mut &'a str) -> Option<&'a str> {
    let line = *cursor;
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() && is_space(bytes[i]) {
        i += 1;
    }

    if i == bytes.len() {
        *cursor = &line[i..];
        return None;
    }

    if bytes[i] == b'\'' {
        i += 1;
        let start = i;
        if start == bytes.len() {
            *cursor = &line[start..];
            return None;
        }

        while i < bytes.len() {
            match bytes[i] {
                // The escape and the escaped byte both stay in the token.
                b'\\' => i += 2,
                b'\'' => {
                    let token = &line[start..i];
                    *cursor = &line[i + 1..];
                    return Some(token);
                }
                _ => i += 1,
            }
        }

        // Unmatched quote: the rest of the line is the token.
        *cursor = &line[bytes.len()..];
        return Some(&line[start..]);
    }

    let start = i;
    while i < bytes.len() && !is_space(bytes[i]) {
        i += 1;
    }

    let token = &line[start..i];
    *cursor = if i < bytes.len() { &line[i + 1..] } else { &line[i..] };
    Some(token)
}

/// Iterator over the tokens of a line.
///
/// # Examples
/// ```
/// use dtnport_core::text::Tokens;
///
/// let tokens: Vec<&str> = Tokens::new("run  'load file' now").collect();
/// assert_eq!(tokens, vec!["run", "load file", "now"]);
/// ```
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    cursor: &'a str,
}

impl<'a> Tokens<'a> {
    /// Creates a token iterator over `line`.
    pub fn new(line: &'a str) -> Self {
        Self { cursor: line }
    }

    /// Returns the unscanned remainder of the line.
    pub fn remainder(&self) -> &'a str {
        self.cursor
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        find_token(&mut self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_delimited() {
        let mut line = "  alpha\tbeta  gamma ";
        assert_eq!(find_token(&mut line), Some("alpha"));
        assert_eq!(find_token(&mut line), Some("beta"));
        assert_eq!(find_token(&mut line), Some("gamma"));
        assert_eq!(find_token(&mut line), None);
    }

    #[test]
    fn test_empty_and_blank_lines() {
        let mut empty = "";
        assert_eq!(find_token(&mut empty), None);

        let mut blank = "   \t  ";
        assert_eq!(find_token(&mut blank), None);
    }

    #[test]
    fn test_quoted_token_keeps_whitespace() {
        let mut line = "'one two' three";
        assert_eq!(find_token(&mut line), Some("one two"));
        assert_eq!(find_token(&mut line), Some("three"));
        assert_eq!(find_token(&mut line), None);
    }

    #[test]
    fn test_empty_quoted_token() {
        let mut line = "'' next";
        assert_eq!(find_token(&mut line), Some(""));
        assert_eq!(find_token(&mut line), Some("next"));
    }

    #[test]
    fn test_escape_is_preserved() {
        let mut line = r"'don\'t panic' end";
        assert_eq!(find_token(&mut line), Some(r"don\'t panic"));
        assert_eq!(find_token(&mut line), Some("end"));
    }

    #[test]
    fn test_unmatched_quote_takes_rest_of_line() {
        let mut line = "cmd 'unterminated arg";
        assert_eq!(find_token(&mut line), Some("cmd"));
        assert_eq!(find_token(&mut line), Some("unterminated arg"));
        assert_eq!(find_token(&mut line), None);
    }

    #[test]
    fn test_trailing_lone_quote_yields_nothing() {
        let mut line = "cmd '";
        assert_eq!(find_token(&mut line), Some("cmd"));
        assert_eq!(find_token(&mut line), None);
    }

    #[test]
    fn test_trailing_escape_keeps_backslash() {
        let mut line = r"'abc\";
        assert_eq!(find_token(&mut line), Some(r"abc\"));
        assert_eq!(find_token(&mut line), None);
    }

    #[test]
    fn test_tokens_iterator() {
        let collected: Vec<&str> = Tokens::new("a 'b c' d").collect();
        assert_eq!(collected, vec!["a", "b c", "d"]);
    }
}
