//! Line-level diff computation between two code renderings.
//!
//! This module provides:
//! - The aligned diff data model ([`DiffEntry`], [`CodeDiff`])
//! - LCS-based line alignment ([`align`])
//! - Normalized string distances ([`metric`])
//! - The removal/addition merge pass ([`optimize`])

/// LCS line alignment producing the initial edit script.
pub mod align;
/// Normalized string distance metrics for the merge pass.
pub mod metric;
/// Merging of adjacent removals and additions into changed lines.
pub mod optimize;

pub use metric::{DistanceMetric, Levenshtein};
pub use optimize::optimize_line_changes;

use crate::code::CodeText;

/// One aligned record of the edit script.
///
/// Indices refer into the left and right [`CodeText`] line arrays. A
/// `Changed` entry always carries exactly one line on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffEntry {
    /// The same line appears on both sides.
    Unchanged {
        /// Line index on the left side.
        left: usize,
        /// Line index on the right side.
        right: usize,
    },
    /// A line present only on the left side.
    Removed {
        /// Line index on the left side.
        left: usize,
    },
    /// A line present only on the right side.
    Added {
        /// Line index on the right side.
        right: usize,
    },
    /// A removed and an added line merged into one pair by the optimizer.
    Changed {
        /// Line index on the left side.
        left: usize,
        /// Line index on the right side.
        right: usize,
    },
}

impl DiffEntry {
    /// The left-side line index, if this entry has left content.
    #[must_use]
    pub const fn left(&self) -> Option<usize> {
        match *self {
            Self::Unchanged { left, .. } | Self::Removed { left } | Self::Changed { left, .. } => {
                Some(left)
            }
            Self::Added { .. } => None,
        }
    }

    /// The right-side line index, if this entry has right content.
    #[must_use]
    pub const fn right(&self) -> Option<usize> {
        match *self {
            Self::Unchanged { right, .. }
            | Self::Added { right }
            | Self::Changed { right, .. } => Some(right),
            Self::Removed { .. } => None,
        }
    }
}

/// An aligned difference between two code renderings.
///
/// Owns both [`CodeText`] values and an ordered edit script over their
/// lines. The script always reconstructs both inputs: reading the left
/// indices of all entries (skipping `Added`) yields the left lines in
/// order, and likewise for the right side skipping `Removed`.
#[derive(Debug, Clone)]
pub struct CodeDiff {
    /// Left-hand ("old") code.
    left: CodeText,
    /// Right-hand ("new") code.
    right: CodeText,
    /// The aligned edit script.
    entries: Vec<DiffEntry>,
}

impl CodeDiff {
    /// Aligns two code renderings line by line.
    ///
    /// Identical inputs produce an all-`Unchanged` script; an empty side
    /// produces an all-`Added` or all-`Removed` script.
    #[must_use]
    pub fn new(left: CodeText, right: CodeText) -> Self {
        let entries = align::align_lines(left.lines(), right.lines());
        Self {
            left,
            right,
            entries,
        }
    }

    /// The aligned edit script.
    #[must_use]
    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    /// The left-hand code.
    #[must_use]
    pub const fn left(&self) -> &CodeText {
        &self.left
    }

    /// The right-hand code.
    #[must_use]
    pub const fn right(&self) -> &CodeText {
        &self.right
    }

    /// Whether the two sides are line-for-line identical.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.entries
            .iter()
            .all(|entry| matches!(entry, DiffEntry::Unchanged { .. }))
    }

    /// Left lines in script order, skipping `Added` entries.
    ///
    /// Always equal to `self.left().lines()`; exposed so callers and tests
    /// can check the reconstruction invariant directly.
    #[must_use]
    pub fn reconstructed_left(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(DiffEntry::left)
            .map(|index| self.left.line(index))
            .collect()
    }

    /// Right lines in script order, skipping `Removed` entries.
    #[must_use]
    pub fn reconstructed_right(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(DiffEntry::right)
            .map(|index| self.right.line(index))
            .collect()
    }

    /// Replaces the edit script. Reserved for the optimizer, which must
    /// keep the reconstruction invariant intact.
    pub(crate) fn set_entries(&mut self, entries: Vec<DiffEntry>) {
        self.entries = entries;
    }
}
