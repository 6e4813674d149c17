//! Public error type for the augmentation API.
//!
//! Only boundary failures surface here (bad configuration, HTTP client
//! construction, document serialization). Everything inside the pipeline —
//! selector misses, failed matches, dropped fetches — degrades to absence
//! and is never an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AugmentError {
    /// The configured storefront base URL does not parse.
    #[error("invalid storefront base URL '{url}': {source}")]
    InvalidStoreUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    /// The augmented document could not be serialized back to HTML.
    #[error("failed to serialize augmented document: {0}")]
    Serialize(String),
}

impl From<anyhow::Error> for AugmentError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve the full error chain with context.
        Self::Serialize(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `AugmentError`.
pub type AugmentResult<T> = Result<T, AugmentError>;
