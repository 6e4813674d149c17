//! HTTP access to the storefront.
//!
//! Two request shapes, both plain GETs: a search query (term + games
//! category filter) and a product page fetch carrying the fixed age-gate
//! cookie. Search failures are errors for the resolver to classify; product
//! failures are silently absent — the entry is simply left unaugmented.

use anyhow::{Context, Result};
use log::debug;
use reqwest::header::COOKIE;
use scraper::Html;
use url::Url;

use crate::config::AugmentConfig;
use crate::error::AugmentError;
use crate::storefront::types::GAMES_CATEGORY;

/// Client for one augmentation run.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    base: Url,
    age_gate_cookie: String,
}

impl StorefrontClient {
    /// Build a client from the run's config.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL does not parse or the underlying
    /// HTTP client cannot be constructed.
    pub fn new(config: &AugmentConfig) -> Result<Self, AugmentError> {
        let base =
            Url::parse(config.store_url()).map_err(|source| AugmentError::InvalidStoreUrl {
                url: config.store_url().to_string(),
                source,
            })?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base,
            age_gate_cookie: config.age_gate_cookie.clone(),
        })
    }

    /// Run one search query and return the response body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status; the
    /// resolver treats either as a terminal failure, never a retry.
    pub async fn search_page(&self, term: &str) -> Result<String> {
        let mut url = self.base.clone();
        url.set_path("/search/");
        url.query_pairs_mut()
            .append_pair("term", term)
            .append_pair("category1", GAMES_CATEGORY);

        debug!("Searching storefront: {url}");

        let response = self
            .http
            .get(url.as_str())
            .send()
            .await
            .context("Search request failed")?;

        let response = response
            .error_for_status()
            .context("Search returned a non-success status")?;

        response.text().await.context("Failed to read search body")
    }

    /// Fetch and parse a product page.
    ///
    /// The request replays the fixed age-gate cookie so mature-rated pages
    /// come back directly instead of the interstitial. Any failure —
    /// transport error or non-success status — yields `None` without retry.
    pub async fn product_page(&self, url: &str) -> Option<Html> {
        debug!("Fetching product page: {url}");

        let response = self
            .http
            .get(url)
            .header(COOKIE, self.age_gate_cookie.as_str())
            .send()
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!("Product page {url} returned {}", response.status());
                return None;
            }
            Err(e) => {
                debug!("Product page {url} failed: {e}");
                return None;
            }
        };

        match response.text().await {
            Ok(body) => Some(Html::parse_document(&body)),
            Err(e) => {
                debug!("Failed to read product page {url}: {e}");
                None
            }
        }
    }
}
