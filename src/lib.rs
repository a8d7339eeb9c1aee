#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::cast_precision_loss)] // Line lengths fit in f64 mantissa
#![allow(clippy::indexing_slicing)] // Diff indices are in bounds by construction

//! # codediff - Aligned side-by-side diffs of compiler output
//!
//! codediff compares two renderings of code (native assembly, LLVM IR,
//! typed IR, or pretty-printed syntax) and displays the differences in the
//! terminal, aligned side by side. Syntax highlighting is kept separate
//! from the difference calculation: the diff runs on plain text and the
//! highlighted form is re-applied when displaying.
//!
//! ## Pipeline
//!
//! - [`normalize`]: strips unstable generated identifiers (`julia_f_2007`
//!   → `f`) so repeated generations compare as equal
//! - [`diff`]: LCS line alignment, then a similarity-based pass merging
//!   adjacent removals and additions into changed-line pairs
//! - [`highlight`]: the pluggable highlighter seam and a built-in
//!   assembly/IR highlighter
//! - [`render`]: the two-column terminal layout with tab expansion,
//!   width-aware wrapping, and optional line numbers
//!
//! ## Example Usage
//!
//! ```
//! use codediff::{CodeText, DiffOptions, RenderOptions, compare, render};
//!
//! # fn main() -> anyhow::Result<()> {
//! let left = CodeText::new("top:\n  ret i64 %1\n}");
//! let right = CodeText::new("top:\n  ret i64 %2\n}");
//!
//! let diff = compare(left, right, &DiffOptions::default())?;
//!
//! let options = RenderOptions::new(80, 4, false)?;
//! let mut out = Vec::new();
//! render::side_by_side_diff(&mut out, &diff, &options)?;
//! # Ok(())
//! # }
//! ```

/// Code text values consumed by the pipeline.
pub mod code;

/// Line alignment, distance metrics, and the merge pass.
pub mod diff;

/// Pluggable syntax highlighting.
pub mod highlight;

/// Normalization of unstable generated identifiers.
pub mod normalize;

/// Side-by-side terminal rendering.
pub mod render;

pub use code::CodeText;
pub use diff::{CodeDiff, DiffEntry, DistanceMetric, Levenshtein, optimize_line_changes};
pub use render::{RenderOptions, side_by_side_diff};

use anyhow::Result;

/// Current version of the codediff crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Comparison configuration for [`compare`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffOptions {
    /// Similarity tolerance of the merge pass, in `[0, 1]`. Lines must be
    /// at least this similar to merge into a single changed row.
    pub tolerance: f64,
    /// Whether to run the merge pass at all.
    pub optimize: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            tolerance: diff::optimize::DEFAULT_TOLERANCE,
            optimize: true,
        }
    }
}

/// Aligns two code renderings and refines the result for display.
///
/// This is the whole comparison pipeline after acquisition: alignment on
/// the plain lines, then (unless disabled) the merge pass turning similar
/// removal/addition pairs into changed rows. Normalization of unstable
/// identifiers belongs before this call, on the raw text, where the
/// caller still knows which symbol it generated.
///
/// # Errors
///
/// Returns an error if `options.tolerance` is outside `[0, 1]`.
pub fn compare(left: CodeText, right: CodeText, options: &DiffOptions) -> Result<CodeDiff> {
    let diff = CodeDiff::new(left, right);
    if options.optimize {
        optimize_line_changes(diff, &Levenshtein, options.tolerance)
    } else {
        Ok(diff)
    }
}
