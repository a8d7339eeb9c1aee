//! LCS-based line alignment.
//!
//! Lines are treated as atomic tokens. A longest common subsequence of
//! lines determines the `Unchanged` entries; every gap between consecutive
//! matches emits the left-only lines as a run of `Removed` entries followed
//! by the right-only lines as a run of `Added` entries. The table is
//! quadratic in the two line counts, which is fine for function-sized
//! listings.

use super::DiffEntry;
use tracing::{Level, debug, span};

/// Computes the aligned edit script between two line sequences.
///
/// The result satisfies the reconstruction invariant: left indices appear
/// in order `0..left.len()` across all non-`Added` entries, and right
/// indices in order `0..right.len()` across all non-`Removed` entries.
pub(crate) fn align_lines(left: &[String], right: &[String]) -> Vec<DiffEntry> {
    let span = span!(
        Level::DEBUG,
        "line_alignment",
        left_lines = left.len(),
        right_lines = right.len()
    );
    let _guard = span.enter();

    let matches = lcs_matches(left, right);
    let mut entries = Vec::with_capacity(left.len() + right.len() - matches.len());

    let mut next_left = 0;
    let mut next_right = 0;
    for &(match_left, match_right) in &matches {
        push_gap(&mut entries, next_left..match_left, next_right..match_right);
        entries.push(DiffEntry::Unchanged {
            left: match_left,
            right: match_right,
        });
        next_left = match_left + 1;
        next_right = match_right + 1;
    }
    push_gap(&mut entries, next_left..left.len(), next_right..right.len());

    debug!(
        matched = matches.len(),
        entries = entries.len(),
        "alignment complete"
    );

    entries
}

/// Emits one gap between matches: all removals first, then all additions.
fn push_gap(
    entries: &mut Vec<DiffEntry>,
    left_range: std::ops::Range<usize>,
    right_range: std::ops::Range<usize>,
) {
    for left in left_range {
        entries.push(DiffEntry::Removed { left });
    }
    for right in right_range {
        entries.push(DiffEntry::Added { right });
    }
}

/// Returns the matched `(left, right)` index pairs of a longest common
/// subsequence, strictly increasing on both sides.
///
/// `table[i][j]` holds the LCS length of `left[i..]` and `right[j..]`.
/// Walking forward from `(0, 0)` and preferring the left side on ties
/// yields one canonical maximal matching.
fn lcs_matches(left: &[String], right: &[String]) -> Vec<(usize, usize)> {
    let n = left.len();
    let m = right.len();
    if n == 0 || m == 0 {
        return Vec::new();
    }

    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if left[i] == right[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut matches = Vec::with_capacity(table[0][0]);
    let mut i = 0;
    let mut j = 0;
    while i < n && j < m {
        if left[i] == right[j] && table[i][j] == table[i + 1][j + 1] + 1 {
            matches.push((i, j));
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    matches
}
