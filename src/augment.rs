//! Entry orchestrator: the full pipeline over one host page.
//!
//! Scans every listing entry, skips non-game digests, resolves a storefront
//! URL per entry (direct link or search), fetches and extracts the product
//! page, and merges the fragments back into the entry. Per-entry network
//! phases run concurrently; DOM mutation is synchronous and happens after
//! each entry's data is in hand. Every failure mode degrades to "entry left
//! unaugmented" — augmentation never errors because of one entry.

use futures::future::join_all;
use log::{debug, info};
use serde::Serialize;

use crate::config::AugmentConfig;
use crate::dom;
use crate::error::AugmentResult;
use crate::listing::entry::ListingEntry;
use crate::listing::merge::{merge_entry, MergeReport};
use crate::storefront::client::StorefrontClient;
use crate::storefront::extract::{extract_all, ExtractedData};
use crate::storefront::search::resolve_store_url;

/// Result of one augmentation run.
#[derive(Debug)]
pub struct AugmentOutcome {
    /// The augmented document, serialized.
    pub html: String,
    /// Per-entry summary, in page order.
    pub entries: Vec<EntryReport>,
}

/// What happened to one listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    pub title: String,
    /// Entry was a known non-game post and was not touched.
    pub skipped: bool,
    /// Resolved (or pre-existing) storefront product URL.
    pub matched_url: Option<String>,
    /// Fragments actually injected; `None` when the product page fetch
    /// yielded nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged: Option<MergeReport>,
}

/// Per-entry data gathered before any network work, so the concurrent
/// fetch phase holds no references into the DOM.
struct EntryPlan {
    skipped: bool,
    existing_link: Option<String>,
    term: Option<String>,
    validation_title: String,
}

/// Augment a host page.
///
/// # Errors
///
/// Only boundary failures error: serialization of the final document.
/// Per-entry misses (no search match, fetch failure, absent fragments) are
/// normal outcomes recorded in the reports.
pub async fn augment_html(
    html: &str,
    client: &StorefrontClient,
    config: &AugmentConfig,
) -> AugmentResult<AugmentOutcome> {
    let document = dom::parse_document(html);
    let entries = ListingEntry::scan(&document);

    let plans: Vec<EntryPlan> = entries
        .iter()
        .map(|entry| EntryPlan {
            skipped: entry.is_non_game(),
            existing_link: entry.existing_store_link(config.store_url()),
            term: entry.search_term(),
            validation_title: entry.validation_title(),
        })
        .collect();

    // Network phase: all entries fire concurrently, each entry's own
    // retry chain stays sequential inside resolve_store_url.
    let outcomes = join_all(plans.iter().map(|plan| fetch_entry_data(client, plan))).await;

    // Merge phase: synchronous, one entry at a time. Markers are re-checked
    // inside the merger immediately before each mutation.
    let mut reports = Vec::with_capacity(entries.len());
    for ((entry, plan), outcome) in entries.iter().zip(&plans).zip(outcomes) {
        let mut report = EntryReport {
            title: entry.title().to_string(),
            skipped: plan.skipped,
            matched_url: None,
            merged: None,
        };

        if let Some((url, data)) = outcome {
            // Navigation first: the links get re-pointed even when the
            // product fetch came back empty.
            entry.repoint_links(&url);
            report.merged = data
                .as_ref()
                .map(|data| merge_entry(entry, data, &url, config.max_tags()));
            report.matched_url = Some(url);
        } else if plan.skipped {
            debug!("Skipping non-game post '{}'", entry.title());
        } else {
            debug!("No storefront data for '{}'", entry.title());
        }

        reports.push(report);
    }

    let augmented = reports
        .iter()
        .filter(|report| report.merged.as_ref().is_some_and(|m| !m.is_empty()))
        .count();
    info!("Augmented {augmented} of {} entries", reports.len());

    let html = dom::serialize(&document)?;
    Ok(AugmentOutcome {
        html,
        entries: reports,
    })
}

/// Network phase for one entry: resolve a product URL, fetch the page,
/// extract fragments. `None` means the entry stays untouched.
async fn fetch_entry_data(
    client: &StorefrontClient,
    plan: &EntryPlan,
) -> Option<(String, Option<ExtractedData>)> {
    if plan.skipped {
        return None;
    }

    let url = match &plan.existing_link {
        Some(existing) => existing.clone(),
        None => {
            let term = plan.term.as_deref()?;
            resolve_store_url(client, term, &plan.validation_title).await?
        }
    };

    let data = client
        .product_page(&url)
        .await
        .map(|page| extract_all(&page));
    Some((url, data))
}
