//! Normalization of unstable identifiers in generated code.
//!
//! Every code-generation call stamps module-level symbols with a fresh
//! monotonic counter (`julia_f_2007`, `julia_f_2019`, ...), so two
//! otherwise-identical generations never compare as equal. Normalization
//! rewrites the counter-qualified form down to the bare name (`f`) before
//! any diff is computed, suppressing those false differences without
//! touching program meaning.

use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;

/// Prefixes the code generator attaches to module-level symbol names.
const UNSTABLE_PREFIXES: &str = "julia|jl|j";

/// Characters that can never appear inside a generated symbol name.
/// Anything containing one of these is some other token, not a symbol.
const FORBIDDEN_NAME_CHARS: &[char] = &['"', '\'', ';', ',', '-'];

/// Matches `prefix_name_NNN` where `name` is a valid generated symbol name.
/// The lazy quantifier keeps the capture at the bare name rather than
/// swallowing the trailing counter.
static UNSTABLE_IDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"\b(?:{UNSTABLE_PREFIXES})_([^"';,\-\s]+?)_\d+\b"#
    ))
    .unwrap()
});

/// Rewrites every counter-qualified identifier in `code` to its bare name.
///
/// `"julia_f_2007"` becomes `"f"`. Identifiers whose name part contains
/// characters forbidden in the symbol grammar are left untouched. The
/// transform is pure and idempotent: normalized text contains no matching
/// identifiers, so a second pass is a no-op.
#[must_use]
pub fn strip_unstable_suffix(code: &str) -> String {
    UNSTABLE_IDENT.replace_all(code, "$1").into_owned()
}

/// Rewrites counter-qualified identifiers for `name` only.
///
/// Used when the symbol being compared is known, so unrelated identifiers
/// that happen to match the generic pattern survive intact.
///
/// # Errors
///
/// Returns an error if `name` contains characters forbidden in the symbol
/// grammar (quotes, semicolons, commas, hyphens, or whitespace) — such a
/// name can never have been generated, so the request is malformed.
pub fn strip_unstable_suffix_for(code: &str, name: &str) -> Result<String> {
    if name.is_empty() {
        bail!("symbol name for normalization must not be empty");
    }
    if name.contains(FORBIDDEN_NAME_CHARS) || name.contains(char::is_whitespace) {
        bail!("symbol name {name:?} contains characters forbidden in generated identifiers");
    }

    let pattern = format!(
        r"\b(?:{UNSTABLE_PREFIXES})_({})_\d+\b",
        regex::escape(name)
    );
    let re = Regex::new(&pattern)
        .with_context(|| format!("invalid normalization pattern for symbol {name:?}"))?;
    Ok(re.replace_all(code, "$1").into_owned())
}
