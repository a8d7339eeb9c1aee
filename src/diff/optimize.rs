//! Merging of adjacent removals and additions into changed-line pairs.
//!
//! Alignment alone renders a rewritten line as one removal plus one
//! addition on separate rows. When the two texts are similar enough, a
//! single changed row reads much better. This pass is a greedy, local
//! heuristic over the edit script: it improves the display and makes no
//! claim of optimality.

use super::{CodeDiff, DiffEntry, DistanceMetric};
use anyhow::{Result, bail};
use tracing::{Level, debug, span};

/// Default similarity tolerance: lines must be at least 70% similar to
/// merge into a changed pair.
pub const DEFAULT_TOLERANCE: f64 = 0.7;

/// Merges consecutive removals and additions into changed-line pairs.
///
/// Scans for every maximal run of `Removed` entries immediately followed
/// by a run of `Added` entries and pairs the two runs up greedily in
/// order, replacing a pair with a single `Changed` entry when the
/// metric's normalized distance over the plain text is at most
/// `1 - tolerance`. When a pair is too dissimilar and one run is longer
/// than the other, the longer run's line is emitted unpaired so later
/// lines can still pair up; with no surplus the pair stays as a plain
/// removal and addition. The pass is a single sweep: merged pairs are
/// never re-evaluated and left/right line order is never disturbed, so
/// both reconstruction invariants are preserved and the operation is
/// idempotent.
///
/// Takes the diff by ownership and returns the updated value.
///
/// # Errors
///
/// Returns an error if `tolerance` is outside `[0, 1]`.
pub fn optimize_line_changes(
    mut diff: CodeDiff,
    metric: &dyn DistanceMetric,
    tolerance: f64,
) -> Result<CodeDiff> {
    if !(0.0..=1.0).contains(&tolerance) {
        bail!("similarity tolerance must be in [0, 1], got {tolerance}");
    }

    let span = span!(
        Level::DEBUG,
        "optimize_line_changes",
        entries = diff.entries().len(),
        tolerance
    );
    let _guard = span.enter();

    let max_distance = 1.0 - tolerance;
    let old_entries = diff.entries();
    let mut entries = Vec::with_capacity(old_entries.len());
    let mut merged = 0usize;

    let mut index = 0;
    while index < old_entries.len() {
        // Collect a maximal Removed run followed by a maximal Added run.
        let removed_start = index;
        while index < old_entries.len()
            && matches!(old_entries[index], DiffEntry::Removed { .. })
        {
            index += 1;
        }
        let added_start = index;
        while index < old_entries.len() && matches!(old_entries[index], DiffEntry::Added { .. }) {
            index += 1;
        }

        let removed = &old_entries[removed_start..added_start];
        let added = &old_entries[added_start..index];

        if removed.is_empty() || added.is_empty() {
            entries.extend_from_slice(removed);
            entries.extend_from_slice(added);
        } else {
            merged += merge_run(&mut entries, &diff, metric, max_distance, removed, added);
        }

        // Copy through the entry that ended the run, unless it is a
        // Removed entry starting the next candidate run.
        if index < old_entries.len()
            && !matches!(old_entries[index], DiffEntry::Removed { .. })
        {
            entries.push(old_entries[index]);
            index += 1;
        }
    }

    debug!(merged, entries = entries.len(), "optimization complete");
    diff.set_entries(entries);
    Ok(diff)
}

/// Greedily pairs one removed run with one added run in order. A
/// dissimilar pair consumes a line from the longer run unpaired, so a
/// surplus never blocks later similar lines from pairing. Returns the
/// number of merged pairs.
fn merge_run(
    entries: &mut Vec<DiffEntry>,
    diff: &CodeDiff,
    metric: &dyn DistanceMetric,
    max_distance: f64,
    removed: &[DiffEntry],
    added: &[DiffEntry],
) -> usize {
    let mut merged = 0;
    let mut i = 0;
    let mut j = 0;

    while i < removed.len() && j < added.len() {
        let (DiffEntry::Removed { left }, DiffEntry::Added { right }) = (removed[i], added[j])
        else {
            unreachable!("runs contain only Removed and Added entries");
        };

        let distance = metric.normalized_distance(diff.left().line(left), diff.right().line(right));
        if distance <= max_distance {
            entries.push(DiffEntry::Changed { left, right });
            merged += 1;
            i += 1;
            j += 1;
            continue;
        }

        let removed_rest = removed.len() - i;
        let added_rest = added.len() - j;
        if added_rest > removed_rest {
            entries.push(DiffEntry::Added { right });
            j += 1;
        } else if removed_rest > added_rest {
            entries.push(DiffEntry::Removed { left });
            i += 1;
        } else {
            entries.push(DiffEntry::Removed { left });
            entries.push(DiffEntry::Added { right });
            i += 1;
            j += 1;
        }
    }

    entries.extend_from_slice(&removed[i..]);
    entries.extend_from_slice(&added[j..]);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CodeText;
    use crate::diff::Levenshtein;

    fn diff(left: &str, right: &str) -> CodeDiff {
        CodeDiff::new(CodeText::new(left), CodeText::new(right))
    }

    fn optimized(left: &str, right: &str, tolerance: f64) -> CodeDiff {
        optimize_line_changes(diff(left, right), &Levenshtein, tolerance).unwrap()
    }

    #[test]
    fn test_similar_pair_merges_into_changed() {
        let d = optimized("  ret i64 %1", "  ret i64 %2", DEFAULT_TOLERANCE);
        assert_eq!(d.entries(), [DiffEntry::Changed { left: 0, right: 0 }]);
    }

    #[test]
    fn test_dissimilar_pair_stays_split() {
        let d = optimized("ret i64 %1", "unrelated text entirely", DEFAULT_TOLERANCE);
        assert_eq!(
            d.entries(),
            [DiffEntry::Removed { left: 0 }, DiffEntry::Added { right: 0 }]
        );
    }

    #[test]
    fn test_surplus_additions_survive() {
        let d = optimized(
            "keep\nret i64 %1\nkeep2",
            "keep\nret i64 %9\nextra addition\nkeep2",
            0.7,
        );
        assert_eq!(
            d.entries(),
            [
                DiffEntry::Unchanged { left: 0, right: 0 },
                DiffEntry::Changed { left: 1, right: 1 },
                DiffEntry::Added { right: 2 },
                DiffEntry::Unchanged { left: 2, right: 3 },
            ]
        );
    }

    #[test]
    fn test_dissimilar_surplus_is_skipped_so_later_lines_pair() {
        // The added run has one extra, unrelated line up front; it must
        // not keep the two ret lines from merging.
        let d = optimized(
            "  ret i64 %1",
            "  %1 = sext i8 %0 to i64\n  ret i64 %2",
            0.7,
        );
        assert_eq!(
            d.entries(),
            [
                DiffEntry::Added { right: 0 },
                DiffEntry::Changed { left: 0, right: 1 },
            ]
        );
    }

    #[test]
    fn test_dissimilar_removed_surplus_is_emitted_early() {
        let d = optimized("unrelated removal\n  ret i64 %1", "  ret i64 %2", 0.7);
        assert_eq!(
            d.entries(),
            [
                DiffEntry::Removed { left: 0 },
                DiffEntry::Changed { left: 1, right: 0 },
            ]
        );
    }

    #[test]
    fn test_tolerance_zero_merges_everything() {
        let d = optimized("completely different", "no overlap at all", 0.0);
        assert_eq!(d.entries(), [DiffEntry::Changed { left: 0, right: 0 }]);
    }

    #[test]
    fn test_tolerance_one_merges_only_identical_text() {
        // Identical lines never reach the optimizer as Removed+Added, so
        // tolerance 1.0 effectively merges nothing here.
        let d = optimized("ret i64 %1", "ret i64 %2", 1.0);
        assert_eq!(
            d.entries(),
            [DiffEntry::Removed { left: 0 }, DiffEntry::Added { right: 0 }]
        );
    }

    #[test]
    fn test_out_of_range_tolerance_is_rejected() {
        assert!(optimize_line_changes(diff("a", "b"), &Levenshtein, -0.1).is_err());
        assert!(optimize_line_changes(diff("a", "b"), &Levenshtein, 1.5).is_err());
    }

    #[test]
    fn test_idempotent() {
        let once = optimized(
            "top:\n  add i64\n  ret %1\n}",
            "top:\n  sub i64\n  something else\n}",
            0.7,
        );
        let twice = optimize_line_changes(once.clone(), &Levenshtein, 0.7).unwrap();
        assert_eq!(once.entries(), twice.entries());
    }

    #[test]
    fn test_idempotent_with_skipped_surplus() {
        let once = optimized(
            "  ret i64 %1",
            "completely unrelated line one\nanother unrelated line",
            0.7,
        );
        let twice = optimize_line_changes(once.clone(), &Levenshtein, 0.7).unwrap();
        assert_eq!(once.entries(), twice.entries());
    }

    #[test]
    fn test_reconstruction_invariant_preserved() {
        let left = "a\nb\nc\nd\ne";
        let right = "a\nB\nC!\nd\nE?";
        let before = diff(left, right);
        let expected_left = before.reconstructed_left().join("\n");
        let expected_right = before.reconstructed_right().join("\n");

        let after = optimize_line_changes(before, &Levenshtein, 0.5).unwrap();
        assert_eq!(after.reconstructed_left().join("\n"), expected_left);
        assert_eq!(after.reconstructed_right().join("\n"), expected_right);
    }
}
