//! Code text values consumed by the diff pipeline.
//!
//! A [`CodeText`] holds one rendering of code (assembly, LLVM IR, typed IR,
//! or pretty-printed syntax) as an ordered list of lines, optionally paired
//! with a syntax-highlighted variant of the same lines. The diff is always
//! computed on the plain lines; the highlighted lines are re-applied when
//! displaying the result, keyed by the same line indices.

use anyhow::{Result, bail};

/// One rendering of code, split into lines, with optional highlighting.
///
/// The plain and highlighted variants must describe the same text: same
/// line count, same characters once style markers are stripped. Only the
/// line count is enforced here; violating the character invariant merely
/// produces a confusing display, while a line-count mismatch would corrupt
/// the alignment and is therefore rejected up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeText {
    /// Plain text lines, without any style markers.
    lines: Vec<String>,
    /// Highlighted lines, parallel to `lines`, if a highlighter ran.
    highlighted: Option<Vec<String>>,
}

impl CodeText {
    /// Creates a `CodeText` from plain text with no highlighting.
    #[must_use]
    pub fn new(plain: &str) -> Self {
        Self {
            lines: plain.lines().map(str::to_owned).collect(),
            highlighted: None,
        }
    }

    /// Creates a `CodeText` from plain text and its highlighted form.
    ///
    /// # Errors
    ///
    /// Returns an error if the two texts do not have the same number of
    /// lines. This indicates that the highlighter and the diff disagree
    /// about line boundaries, which cannot be repaired by guessing.
    pub fn with_highlighting(plain: &str, highlighted: &str) -> Result<Self> {
        let lines: Vec<String> = plain.lines().map(str::to_owned).collect();
        let highlighted: Vec<String> = highlighted.lines().map(str::to_owned).collect();

        if lines.len() != highlighted.len() {
            bail!(
                "highlighted text has {} lines but plain text has {}: \
                 the highlighter changed line boundaries",
                highlighted.len(),
                lines.len()
            );
        }

        Ok(Self {
            lines,
            highlighted: Some(highlighted),
        })
    }

    /// Creates a `CodeText` from already-split plain lines.
    #[must_use]
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            highlighted: None,
        }
    }

    /// Plain text lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The plain text of line `index` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds. Indices stored in a diff over
    /// this text are always in bounds by construction.
    #[must_use]
    pub fn line(&self, index: usize) -> &str {
        &self.lines[index]
    }

    /// The highlighted text of line `index`, falling back to the plain
    /// text when no highlighted variant was provided.
    #[must_use]
    pub fn highlighted_line(&self, index: usize) -> &str {
        match &self.highlighted {
            Some(highlighted) => &highlighted[index],
            None => &self.lines[index],
        }
    }

    /// Whether a highlighted variant is attached.
    #[must_use]
    pub const fn has_highlighting(&self) -> bool {
        self.highlighted.is_some()
    }

    /// Number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether this text has no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
