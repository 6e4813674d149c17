//! Storefront side of the pipeline: search, product fetch, extraction.

pub mod client;
pub mod extract;
pub mod search;
pub mod types;

pub use client::StorefrontClient;
pub use extract::{extract_all, ExtractedData};
pub use search::resolve_store_url;
pub use types::SearchHit;
