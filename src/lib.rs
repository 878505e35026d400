use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod classifier;
mod error;
mod extractor;
mod fallback;
mod favicon;
mod fetcher;
mod github;
#[cfg(feature = "logging")]
mod logging;
mod preview_generator;
mod preview_service;
mod security;
mod utils;

pub use classifier::{classify, ContentType};
pub use error::{
    FetchError, GitHubResolutionError, PreviewError, ValidationError, ValidationErrorKind,
};
pub use extractor::{MetadataExtractor, PageMetadata};
pub use fallback::synthesize_fallback;
pub use favicon::{FaviconResolver, DEFAULT_FAVICON_TEMPLATE};
pub use fetcher::{Fetcher, FetcherConfig, DEFAULT_USER_AGENT, MAX_BODY_BYTES};
pub use github::{
    is_github_url, parse_github_repo, GitHubClient, GitHubConfig, GitHubRepoInfo, GITHUB_API_BASE,
};
#[cfg(feature = "logging")]
pub use logging::{log_error_card, log_preview_card, setup_logging, LogConfig};
pub use preview_generator::{PreviewOutcome, UrlPreviewGenerator};
pub use preview_service::{PreviewService, PreviewServiceConfig};
pub use security::{UrlValidationConfig, UrlValidator, ValidatedUrl};

/// Preview of a user-supplied link. Fields the page did not provide are empty
/// strings, never missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPreview {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
    pub site_name: String,
    pub domain: String,
    pub favicon_url: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
}

#[async_trait]
pub trait PreviewGenerator {
    async fn generate_preview(&self, url: &str) -> Result<LinkPreview, PreviewError>;
}
