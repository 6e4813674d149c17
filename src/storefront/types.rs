//! Selectors, wire constants and result types for the storefront.

use lazy_static::lazy_static;
use scraper::Selector;
use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Live storefront base URL.
pub const STEAM_STORE_URL: &str = "https://store.steampowered.com";

/// Category filter pinning search results to games.
pub const GAMES_CATEGORY: &str = "998";

/// Cookie pre-satisfying the storefront's age-verification gate: a fixed
/// birth date plus the mature-content opt-in.
pub const AGE_GATE_COOKIE: &str =
    "birthtime=568022401; lastagecheckage=1-0-1988; wants_mature_content=1";

/// Path segment the storefront substitutes when a product has no slug —
/// a de-listed or generic entry that is useless as a match.
pub const NO_SLUG_SEGMENT: &str = "/_/";

/// CSS selector for the first search result row.
/// The storefront renders results as anchors directly under
/// `#search_resultsRows`; the anchor's href is the product URL.
pub const SEARCH_RESULT_SELECTOR: &str = "#search_resultsRows > a";

/// CSS selector for the display title inside a result row.
pub const RESULT_TITLE_SELECTOR: &str = ".title";

lazy_static! {
    // These selectors are hardcoded and syntactically valid CSS selectors.
    // If they fail to parse, it indicates a compile-time bug in the selector
    // strings.
    pub static ref SEARCH_RESULT: Selector = Selector::parse(SEARCH_RESULT_SELECTOR)
        .expect("BUG: hardcoded CSS selector '#search_resultsRows > a' is invalid");

    pub static ref RESULT_TITLE: Selector = Selector::parse(RESULT_TITLE_SELECTOR)
        .expect("BUG: hardcoded CSS selector '.title' is invalid");

    pub static ref REVIEW_ROWS: Selector = Selector::parse(".user_reviews_summary_row")
        .expect("BUG: hardcoded CSS selector '.user_reviews_summary_row' is invalid");

    pub static ref REVIEW_SUMMARY: Selector = Selector::parse(".summary")
        .expect("BUG: hardcoded CSS selector '.summary' is invalid");

    pub static ref POPULAR_TAGS: Selector = Selector::parse(".glance_tags.popular_tags .app_tag")
        .expect("BUG: hardcoded CSS selector '.glance_tags.popular_tags .app_tag' is invalid");

    pub static ref AGE_RATING: Selector = Selector::parse(".shared_game_rating")
        .expect("BUG: hardcoded CSS selector '.shared_game_rating' is invalid");

    pub static ref METACRITIC: Selector = Selector::parse("#game_area_metascore")
        .expect("BUG: hardcoded CSS selector '#game_area_metascore' is invalid");

    pub static ref SYSREQ_CONTENTS: Selector = Selector::parse(".sysreq_contents")
        .expect("BUG: hardcoded CSS selector '.sysreq_contents' is invalid");

    pub static ref SYSREQ_BLOCK: Selector = Selector::parse(".game_area_sys_req")
        .expect("BUG: hardcoded CSS selector '.game_area_sys_req' is invalid");

    pub static ref DESCRIPTION: Selector = Selector::parse("#game_area_description")
        .expect("BUG: hardcoded CSS selector '#game_area_description' is invalid");
}

// =============================================================================
// Data Structures
// =============================================================================

/// The first row of a storefront search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Product URL as found in the result row (tracking params intact).
    pub url: String,

    /// Display title shown in the result row.
    pub title: String,
}
