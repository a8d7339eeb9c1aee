//! Pluggable syntax highlighting.
//!
//! Highlighters are collaborators of the pipeline, not part of it: the
//! diff is computed on plain text and a highlighter only supplies the
//! styled variant attached to a [`crate::code::CodeText`]. Any
//! implementation works as long as it colors line by line and never
//! changes line boundaries.
//!
//! The built-in [`IrHighlighter`] covers the common case of assembly and
//! LLVM-style IR listings well enough for terminal display; callers with
//! richer highlighting feed their own styled text instead.

use colored::Colorize;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Produces a styled variant of one line of plain code.
///
/// Implementations must keep the visible characters identical to the
/// input; only style markers may be added.
pub trait Highlighter {
    /// Returns `line` with style markers added.
    fn highlight_line(&self, line: &str) -> String;

    /// Highlights a whole text, line by line.
    fn highlight(&self, code: &str) -> String {
        code.lines()
            .map(|line| self.highlight_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The identity highlighter: plain text is its own styled form.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Highlighter for Passthrough {
    fn highlight_line(&self, line: &str) -> String {
        line.to_owned()
    }
}

/// One combined pass so already-inserted style markers are never
/// re-scanned: comments, labels, SSA values and registers, then bare
/// numeric literals.
static IR_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        (?P<comment>[;\#].*$)
        | (?P<label>^\s*[A-Za-z_.][\w.$]*:)
        | (?P<value>[%@][\w.$]+)
        | (?P<num>-?\b\d+\b)
        ",
    )
    .unwrap()
});

/// Lightweight highlighter for assembly and LLVM-style IR listings.
///
/// Comments are dimmed, labels yellow, SSA values and global symbols
/// cyan, numeric literals magenta. Output is plain ANSI SGR text, which
/// is exactly what the renderer's projection expects.
#[derive(Debug, Clone, Copy, Default)]
pub struct IrHighlighter;

impl Highlighter for IrHighlighter {
    fn highlight_line(&self, line: &str) -> String {
        IR_TOKEN
            .replace_all(line, |captures: &Captures<'_>| {
                let text = &captures[0];
                if captures.name("comment").is_some() {
                    text.dimmed().to_string()
                } else if captures.name("label").is_some() {
                    text.yellow().to_string()
                } else if captures.name("value").is_some() {
                    text.cyan().to_string()
                } else {
                    text.magenta().to_string()
                }
            })
            .into_owned()
    }
}
