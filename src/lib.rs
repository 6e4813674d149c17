//! steamgraft — grafts Steam store data onto repack listing pages.
//!
//! Given the HTML of a game-listing page, the pipeline derives a search
//! term per entry, resolves the matching storefront product page (with
//! fuzzy-validated retries), scrapes independent fragments from it
//! (review summary, tags, age rating, metacritic score, system
//! requirements, description) and splices them idempotently into the
//! page's DOM.

pub mod augment;
pub mod config;
pub mod dom;
pub mod error;
pub mod listing;
pub mod matching;
pub mod storefront;

pub use augment::{augment_html, AugmentOutcome, EntryReport};
pub use config::{AugmentConfig, AugmentConfigBuilder};
pub use error::{AugmentError, AugmentResult};
pub use listing::{merge_entry, ListingEntry, MergeReport};
pub use matching::{normalize_title, titles_match};
pub use storefront::{extract_all, resolve_store_url, ExtractedData, SearchHit, StorefrontClient};
