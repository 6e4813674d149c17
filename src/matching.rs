//! Fuzzy title comparison.
//!
//! Storefront result titles rarely equal listing titles verbatim: editions,
//! franchise prefixes and punctuation differ. Matching therefore runs on a
//! canonical form and accepts containment in either direction.

use regex::Regex;
use std::sync::LazyLock;

static NON_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s]").expect("NON_WORD_RE: hardcoded regex is valid")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RE: hardcoded regex is valid"));

/// Canonicalize a title for comparison. Never used for display.
///
/// Lowercases, folds typographic apostrophes to straight ones, strips every
/// character that is neither a word character nor whitespace, collapses
/// whitespace runs to a single space and trims. Idempotent:
/// `normalize_title(normalize_title(s)) == normalize_title(s)`.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");
    let stripped = NON_WORD_RE.replace_all(&lowered, "");
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

/// Decide whether a storefront result title plausibly matches a listing.
///
/// An empty validation title carries no signal and accepts unconditionally.
/// Otherwise both sides are normalized and the candidate is accepted when
/// either string contains the other: storefront titles are frequently a
/// superset ("Hollow Knight: Voidheart Edition") or a subset of the listing
/// title. Deliberately loose — the resolver's retry loop tolerates false
/// positives far better than false negatives.
#[must_use]
pub fn titles_match(candidate: &str, validation_title: &str) -> bool {
    if validation_title.trim().is_empty() {
        return true;
    }

    let candidate = normalize_title(candidate);
    let validation = normalize_title(validation_title);
    candidate.contains(&validation) || validation.contains(&candidate)
}
