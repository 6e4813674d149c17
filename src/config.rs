//! Augmentation settings.
//!
//! This is deliberately a constructor surface, not a configuration system:
//! there are no files and no environment schema. The defaults match the live
//! storefront; tests point `store_url` at a local mock server.

use url::Url;

use crate::error::AugmentError;
use crate::storefront::types::{AGE_GATE_COOKIE, STEAM_STORE_URL};

/// Maximum combined tag count on a "Genres/Tags:" line (existing + injected).
pub const DEFAULT_MAX_TAGS: usize = 10;

const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings for one augmentation run.
#[derive(Debug, Clone)]
pub struct AugmentConfig {
    /// Storefront base URL.
    ///
    /// **INVARIANT:** Always a valid absolute URL without a trailing slash
    /// (normalized in `build()`), so request paths can be appended directly.
    pub(crate) store_url: String,
    pub(crate) user_agent: String,
    pub(crate) age_gate_cookie: String,
    pub(crate) max_tags: usize,
}

impl AugmentConfig {
    /// Start building a config with the live-storefront defaults.
    #[must_use]
    pub fn builder() -> AugmentConfigBuilder {
        AugmentConfigBuilder::default()
    }

    /// Storefront base URL, without trailing slash.
    #[must_use]
    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    #[must_use]
    pub fn max_tags(&self) -> usize {
        self.max_tags
    }
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            store_url: STEAM_STORE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            age_gate_cookie: AGE_GATE_COOKIE.to_string(),
            max_tags: DEFAULT_MAX_TAGS,
        }
    }
}

/// Fluent builder for [`AugmentConfig`].
#[derive(Debug, Default)]
pub struct AugmentConfigBuilder {
    store_url: Option<String>,
    user_agent: Option<String>,
    max_tags: Option<usize>,
}

impl AugmentConfigBuilder {
    /// Override the storefront base URL (e.g. a mirror or a test server).
    #[must_use]
    pub fn store_url(mut self, url: impl Into<String>) -> Self {
        self.store_url = Some(url.into());
        self
    }

    /// Override the User-Agent sent with storefront requests.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Override the combined tag cap.
    #[must_use]
    pub fn max_tags(mut self, cap: usize) -> Self {
        self.max_tags = Some(cap);
        self
    }

    /// Validate and produce the config.
    ///
    /// # Errors
    ///
    /// Returns [`AugmentError::InvalidStoreUrl`] when the base URL does not
    /// parse as an absolute URL.
    pub fn build(self) -> Result<AugmentConfig, AugmentError> {
        let raw = self
            .store_url
            .unwrap_or_else(|| STEAM_STORE_URL.to_string());
        Url::parse(&raw).map_err(|source| AugmentError::InvalidStoreUrl {
            url: raw.clone(),
            source,
        })?;

        Ok(AugmentConfig {
            store_url: raw.trim_end_matches('/').to_string(),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            age_gate_cookie: AGE_GATE_COOKIE.to_string(),
            max_tags: self.max_tags.unwrap_or(DEFAULT_MAX_TAGS),
        })
    }
}
