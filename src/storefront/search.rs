//! Search resolver: term → product URL.
//!
//! One query per step, first result row only. A step either accepts the
//! candidate, retries with the last word dropped, or fails outright. The
//! term shrinks strictly, so an n-word term issues at most n requests.

use log::debug;
use scraper::Html;
use url::Url;

use crate::matching::titles_match;
use crate::storefront::client::StorefrontClient;
use crate::storefront::types::{SearchHit, NO_SLUG_SEGMENT, RESULT_TITLE, SEARCH_RESULT};

/// Outcome of a single search step.
#[derive(Debug)]
enum StepOutcome {
    /// Candidate validated; URL already cleaned of tracking params.
    Accepted(String),
    /// No usable row, or candidate rejected — shrink the term and retry.
    Retry,
    /// Transport-level failure — terminal, no retry.
    Failed,
}

/// Resolve a storefront product URL for a search term.
///
/// Drives the retry loop: query → validate against `validation_title` →
/// drop the last word on mismatch → retry, until a match or exhaustion.
/// Exactly one terminal outcome per call: the cleaned product URL, or
/// `None`. Transport failures are terminal immediately; only content
/// misses (no row, placeholder slug, validation mismatch) retry.
pub async fn resolve_store_url(
    client: &StorefrontClient,
    term: &str,
    validation_title: &str,
) -> Option<String> {
    let mut words: Vec<&str> = term.split_whitespace().collect();

    while !words.is_empty() {
        let current = words.join(" ");
        match search_step(client, &current, validation_title).await {
            StepOutcome::Accepted(url) => {
                debug!("Search term '{current}' resolved to {url}");
                return Some(url);
            }
            StepOutcome::Failed => return None,
            StepOutcome::Retry => {
                words.pop();
                if !words.is_empty() {
                    debug!("No match for '{current}', retrying with shorter term");
                }
            }
        }
    }

    debug!("Search exhausted for term '{term}'");
    None
}

/// Issue one query and classify the outcome.
async fn search_step(
    client: &StorefrontClient,
    term: &str,
    validation_title: &str,
) -> StepOutcome {
    let body = match client.search_page(term).await {
        Ok(body) => body,
        Err(e) => {
            debug!("Search request for '{term}' failed: {e:#}");
            return StepOutcome::Failed;
        }
    };

    let Some(hit) = first_result(&body) else {
        return StepOutcome::Retry;
    };

    // A placeholder slug marks a de-listed or generic product entry;
    // treat it the same as no result.
    if hit.url.contains(NO_SLUG_SEGMENT) {
        debug!("First result for '{term}' has a placeholder slug, skipping");
        return StepOutcome::Retry;
    }

    if titles_match(&hit.title, validation_title) {
        StepOutcome::Accepted(strip_tracking_params(&hit.url))
    } else {
        debug!(
            "Result title '{}' failed validation against '{validation_title}'",
            hit.title
        );
        StepOutcome::Retry
    }
}

/// Extract the first result row from a search response, if any.
#[must_use]
pub fn first_result(body: &str) -> Option<SearchHit> {
    let document = Html::parse_document(body);
    let row = document.select(&SEARCH_RESULT).next()?;
    let url = row.value().attr("href")?.to_string();
    let title = row
        .select(&RESULT_TITLE)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    Some(SearchHit { url, title })
}

/// Drop tracking query parameters (and fragment) from a product URL.
#[must_use]
pub fn strip_tracking_params(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        // Not a parseable absolute URL; leave it alone.
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_body(href: &str, title: &str) -> String {
        format!(
            r#"<div id="search_resultsRows">
                 <a href="{href}" class="search_result_row">
                   <span class="title">{title}</span>
                 </a>
                 <a href="https://example.com/app/2/Second_Game/" class="search_result_row">
                   <span class="title">Second Game</span>
                 </a>
               </div>"#
        )
    }

    #[test]
    fn first_result_takes_only_the_first_row() {
        let body = search_body("https://example.com/app/1/First_Game/?snr=1_4_4__12", "First Game");
        let hit = first_result(&body).unwrap();
        assert_eq!(hit.title, "First Game");
        assert!(hit.url.contains("/app/1/"));
    }

    #[test]
    fn first_result_absent_without_rows() {
        assert!(first_result("<div id=\"search_resultsRows\"></div>").is_none());
        assert!(first_result("<p>nothing here</p>").is_none());
    }

    #[test]
    fn strip_tracking_params_removes_query_and_fragment() {
        assert_eq!(
            strip_tracking_params("https://example.com/app/1/Game/?snr=1_4_4__12#reviews"),
            "https://example.com/app/1/Game/"
        );
    }

    #[test]
    fn strip_tracking_params_keeps_plain_urls() {
        assert_eq!(
            strip_tracking_params("https://example.com/app/1/Game/"),
            "https://example.com/app/1/Game/"
        );
    }
}
