//! ANSI-escape-aware text measurement, tab expansion, and hard wrapping.
//!
//! The renderer works on highlighted text, so every width computation has
//! to skip over embedded SGR escape sequences, and wrapping has to keep an
//! active style span alive across the row boundary: the style is closed at
//! the end of the wrapped row and re-opened at the start of the
//! continuation row.

use unicode_width::UnicodeWidthChar;

/// The reset sequence closing all active styles.
const SGR_RESET: &str = "\x1b[0m";

/// One token of styled text: either a visible character or a complete
/// escape sequence (zero display width).
enum Token<'a> {
    /// A printable character.
    Char(char),
    /// An escape sequence, and whether it is an SGR (`...m`) sequence.
    Escape {
        /// The full escape sequence text.
        text: &'a str,
        /// Whether the final byte is `m` (a style change).
        is_sgr: bool,
    },
}

/// Splits `text` into printable characters and escape sequences.
///
/// A CSI sequence runs from `ESC [` through its final byte (`@` to `~`);
/// a bare ESC followed by anything else is passed through as a two-byte
/// sequence. Malformed trailing escapes are passed through untouched.
fn tokens(text: &str) -> impl Iterator<Item = Token<'_>> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let mut chars = rest.char_indices();
        let (_, first) = chars.next()?;

        if first != '\x1b' {
            rest = &rest[first.len_utf8()..];
            return Some(Token::Char(first));
        }

        // Find the end of the escape sequence.
        let mut end = rest.len();
        let mut is_sgr = false;
        match chars.next() {
            Some((_, '[')) => {
                for (i, c) in chars {
                    if ('\x40'..='\x7e').contains(&c) {
                        end = i + c.len_utf8();
                        is_sgr = c == 'm';
                        break;
                    }
                }
            }
            Some((i, c)) => end = i + c.len_utf8(),
            None => {}
        }

        let text = &rest[..end];
        rest = &rest[end..];
        Some(Token::Escape { text, is_sgr })
    })
}

/// Display width of `text`, ignoring escape sequences.
#[must_use]
pub fn visible_width(text: &str) -> usize {
    tokens(text)
        .map(|token| match token {
            Token::Char(c) => c.width().unwrap_or(0),
            Token::Escape { .. } => 0,
        })
        .sum()
}

/// Expands tab characters to spaces against `tab_width`-sized tab stops.
///
/// The column count only advances on visible characters, so tabs inside
/// highlighted text expand exactly as they would in the plain text.
#[must_use]
pub fn expand_tabs(text: &str, tab_width: usize) -> String {
    if !text.contains('\t') {
        return text.to_owned();
    }

    let mut out = String::with_capacity(text.len() + tab_width);
    let mut column = 0usize;
    for token in tokens(text) {
        match token {
            Token::Char('\t') => {
                let spaces = tab_width - (column % tab_width);
                out.extend(std::iter::repeat_n(' ', spaces));
                column += spaces;
            }
            Token::Char(c) => {
                out.push(c);
                column += c.width().unwrap_or(0);
            }
            Token::Escape { text, .. } => out.push_str(text),
        }
    }
    out
}

/// Hard-wraps `text` into rows of at most `width` display columns.
///
/// Always returns at least one row. Splits happen mid-token when a token
/// is longer than the row, since display must make forward progress. SGR
/// state active at a split is closed with a reset on the broken row and
/// re-emitted at the start of the continuation row.
#[must_use]
pub fn wrap_ansi(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    if visible_width(text) <= width {
        return vec![text.to_owned()];
    }

    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_width = 0usize;
    let mut active_styles: Vec<String> = Vec::new();

    for token in tokens(text) {
        match token {
            Token::Char(c) => {
                let char_width = c.width().unwrap_or(0);
                if row_width + char_width > width {
                    if !active_styles.is_empty() {
                        row.push_str(SGR_RESET);
                    }
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                    for style in &active_styles {
                        row.push_str(style);
                    }
                }
                row.push(c);
                row_width += char_width;
            }
            Token::Escape { text, is_sgr } => {
                if is_sgr {
                    if is_sgr_reset(text) {
                        active_styles.clear();
                    } else {
                        active_styles.push(text.to_owned());
                    }
                }
                row.push_str(text);
            }
        }
    }

    rows.push(row);
    rows
}

/// Whether an SGR sequence resets all attributes (`ESC[0m` or `ESC[m`).
fn is_sgr_reset(sequence: &str) -> bool {
    sequence == SGR_RESET || sequence == "\x1b[m"
}

/// Pads `text` with spaces up to `width` display columns.
#[must_use]
pub fn pad_visible(text: &str, width: usize) -> String {
    let current = visible_width(text);
    if current >= width {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len() + width - current);
    out.push_str(text);
    out.extend(std::iter::repeat_n(' ', width - current));
    out
}
