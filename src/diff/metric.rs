//! Normalized string distances used by the merge pass.
//!
//! The optimizer only needs a dissimilarity score in `[0, 1]`; the exact
//! metric is swappable behind [`DistanceMetric`] as long as it stays
//! monotonic (more similar lines must score lower). The default is
//! Levenshtein distance normalized by the longer line.

/// A normalized dissimilarity score between two lines of text.
pub trait DistanceMetric {
    /// Returns a value in `[0, 1]`: 0 for identical text, 1 for maximally
    /// dissimilar text relative to line length.
    fn normalized_distance(&self, a: &str, b: &str) -> f64;
}

/// Levenshtein edit distance divided by the longer line's character count.
///
/// Two empty lines are identical, so their distance is 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl DistanceMetric for Levenshtein {
    fn normalized_distance(&self, a: &str, b: &str) -> f64 {
        let len_a = a.chars().count();
        let len_b = b.chars().count();
        let longest = len_a.max(len_b);
        if longest == 0 {
            return 0.0;
        }
        levenshtein(a, b) as f64 / longest as f64
    }
}

/// Plain Levenshtein distance over characters, two-row dynamic program.
fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "", 0)]
    #[case("abc", "abc", 0)]
    #[case("abc", "", 3)]
    #[case("", "xy", 2)]
    #[case("kitten", "sitting", 3)]
    #[case("flaw", "lawn", 2)]
    fn test_levenshtein(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(levenshtein(a, b), expected);
        assert_eq!(levenshtein(b, a), expected);
    }

    #[test]
    fn test_normalized_distance_bounds() {
        let metric = Levenshtein;
        assert_eq!(metric.normalized_distance("", ""), 0.0);
        assert_eq!(metric.normalized_distance("same", "same"), 0.0);
        assert_eq!(metric.normalized_distance("abc", "xyz"), 1.0);
        assert_eq!(metric.normalized_distance("abcd", ""), 1.0);

        let partial = metric.normalized_distance("  ret i64 %1", "  ret i64 %2");
        assert!(partial > 0.0 && partial < 0.3);
    }

    #[test]
    fn test_distance_is_character_based() {
        // Multi-byte characters count as single edits.
        let metric = Levenshtein;
        assert_eq!(metric.normalized_distance("é", "e"), 1.0);
        assert_eq!(levenshtein("aéb", "ab"), 1);
    }
}
