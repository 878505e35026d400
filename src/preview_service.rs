use crate::error::{GitHubResolutionError, PreviewError, ValidationError};
use crate::favicon::{FaviconResolver, DEFAULT_FAVICON_TEMPLATE};
use crate::fetcher::{Fetcher, FetcherConfig};
use crate::github::{GitHubClient, GitHubConfig, GitHubRepoInfo};
use crate::preview_generator::UrlPreviewGenerator;
use crate::security::{UrlValidationConfig, UrlValidator};
use crate::{LinkPreview, PreviewGenerator};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// PreviewService is the entry point used by request handlers.
///
/// It holds configuration only. Every call validates, fetches and extracts
/// from scratch; concurrent calls for the same URL are independent.
#[derive(Debug, Clone, Default)]
pub struct PreviewService {
    validator: UrlValidator,
    generator: UrlPreviewGenerator,
    github: GitHubClient,
}

impl PreviewService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_config(config: PreviewServiceConfig) -> Self {
        debug!("Initializing PreviewService with custom configuration");
        Self {
            validator: UrlValidator::new(config.validation),
            generator: UrlPreviewGenerator::new(
                Fetcher::new_with_config(config.fetcher),
                FaviconResolver::new(config.favicon_template),
            ),
            github: GitHubClient::new(config.github),
        }
    }

    /// Generic path: always returns a preview once `url` clears validation.
    #[instrument(level = "debug", skip(self))]
    pub async fn generate_preview(&self, url: &str) -> Result<LinkPreview, ValidationError> {
        let validated = self.validator.validate(url)?;
        let outcome = self.generator.generate(&validated).await?;
        if outcome.is_degraded() {
            debug!(url = %validated, "Returning degraded preview");
        }
        Ok(outcome.into_preview())
    }

    /// Runs [`generate_preview`](Self::generate_preview) for every URL
    /// concurrently. Results keep the input order.
    pub async fn generate_previews(&self, urls: &[&str]) -> Vec<Result<LinkPreview, ValidationError>> {
        let futures = urls.iter().map(|url| self.generate_preview(url));
        futures::future::join_all(futures).await
    }

    /// GitHub path: resolves repository details or fails, with no fallback.
    pub async fn fetch_github_repo(&self, url: &str) -> Result<GitHubRepoInfo, GitHubResolutionError> {
        self.github.fetch_repo(url).await
    }
}

#[async_trait]
impl PreviewGenerator for PreviewService {
    async fn generate_preview(&self, url: &str) -> Result<LinkPreview, PreviewError> {
        Ok(PreviewService::generate_preview(self, url).await?)
    }
}

pub struct PreviewServiceConfig {
    pub validation: UrlValidationConfig,
    pub fetcher: FetcherConfig,
    pub github: GitHubConfig,
    pub favicon_template: String,
}

impl Default for PreviewServiceConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewServiceConfig {
    pub fn new() -> Self {
        Self {
            validation: UrlValidationConfig::default(),
            fetcher: FetcherConfig::default(),
            github: GitHubConfig::default(),
            favicon_template: DEFAULT_FAVICON_TEMPLATE.to_string(),
        }
    }

    /// Reads `GITHUB_TOKEN` and `LINK_PREVIEW_FAVICON_TEMPLATE`.
    pub fn from_env() -> Self {
        let mut config = Self::new().with_github_config(GitHubConfig::from_env());
        if let Ok(template) = std::env::var("LINK_PREVIEW_FAVICON_TEMPLATE") {
            if template.contains("{domain}") {
                config.favicon_template = template;
            }
        }
        config
    }

    pub fn with_validation_config(mut self, validation: UrlValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_fetcher_config(mut self, fetcher: FetcherConfig) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_github_config(mut self, github: GitHubConfig) -> Self {
        self.github = github;
        self
    }

    pub fn with_favicon_template(mut self, template: impl Into<String>) -> Self {
        self.favicon_template = template.into();
        self
    }
}
