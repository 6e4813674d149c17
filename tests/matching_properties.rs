//! Property tests for the title normalizer and match validator.

use proptest::prelude::*;
use steamgraft::{normalize_title, titles_match};

proptest! {
    #[test]
    fn normalize_is_idempotent(s in ".*") {
        let once = normalize_title(&s);
        prop_assert_eq!(normalize_title(&once), once);
    }

    #[test]
    fn normalized_output_is_canonical(s in ".*") {
        let normalized = normalize_title(&s);
        prop_assert_eq!(normalized.to_lowercase(), normalized.clone());
        prop_assert!(!normalized.contains("  "), "no whitespace runs survive");
        prop_assert_eq!(normalized.trim(), normalized.as_str());
    }

    #[test]
    fn validator_is_symmetric(a in ".*", b in ".*") {
        prop_assert_eq!(titles_match(&a, &b), titles_match(&b, &a));
    }

    /// If one normalized title contains the other, both orderings accept.
    #[test]
    fn containment_accepts_both_ways(a in "[a-zA-Z'!:. ]{1,30}", extra in "[a-zA-Z]{1,10}") {
        let superset = format!("{a} {extra}");
        prop_assert!(titles_match(&a, &superset));
        prop_assert!(titles_match(&superset, &a));
    }
}

#[test]
fn voidheart_edition_matches_base_title() {
    assert!(titles_match("Hollow Knight: Voidheart Edition", "Hollow Knight"));
}
