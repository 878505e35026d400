use crate::classifier::classify;
use crate::error::{FetchError, ValidationError};
use crate::extractor::MetadataExtractor;
use crate::fallback::synthesize_fallback;
use crate::favicon::FaviconResolver;
use crate::fetcher::Fetcher;
use crate::security::ValidatedUrl;
use crate::LinkPreview;
use tracing::{debug, instrument, warn};

/// Result of running the pipeline past validation.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    /// Built from the fetched page.
    Fetched(LinkPreview),
    /// Built from the URL alone because fetching or parsing failed.
    Degraded {
        preview: LinkPreview,
        reason: FetchError,
    },
}

impl PreviewOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, PreviewOutcome::Degraded { .. })
    }

    pub fn into_preview(self) -> LinkPreview {
        match self {
            PreviewOutcome::Fetched(preview) => preview,
            PreviewOutcome::Degraded { preview, .. } => preview,
        }
    }
}

/// Preflight, fetch, extraction, classification and favicon lookup for an
/// already validated URL.
#[derive(Debug, Clone, Default)]
pub struct UrlPreviewGenerator {
    pub fetcher: Fetcher,
    extractor: MetadataExtractor,
    favicons: FaviconResolver,
}

impl UrlPreviewGenerator {
    pub fn new(fetcher: Fetcher, favicons: FaviconResolver) -> Self {
        Self {
            fetcher,
            extractor: MetadataExtractor::new(),
            favicons,
        }
    }

    /// Only an oversized preflight is an error; everything else downstream of
    /// validation produces a preview.
    #[instrument(level = "debug", skip(self, url), fields(url = %url))]
    pub async fn generate(&self, url: &ValidatedUrl) -> Result<PreviewOutcome, ValidationError> {
        self.fetcher.probe(url).await?;

        match self.fetch_and_extract(url).await {
            Ok(preview) => Ok(PreviewOutcome::Fetched(preview)),
            Err(reason) => {
                warn!(url = %url, reason = %reason, "Fetch failed, using fallback preview");
                Ok(PreviewOutcome::Degraded {
                    preview: synthesize_fallback(url.as_str(), &self.favicons),
                    reason,
                })
            }
        }
    }

    async fn fetch_and_extract(&self, url: &ValidatedUrl) -> Result<LinkPreview, FetchError> {
        let html = self.fetcher.fetch(url).await?;
        let metadata = self.extractor.extract(&html, url.as_url());
        let content_type = classify(url.as_url(), &metadata.declared_type);
        debug!(content_type = %content_type, "Classified page");

        Ok(LinkPreview {
            title: metadata.title,
            description: metadata.description,
            image: metadata.image,
            url: url.as_str().to_string(),
            site_name: metadata.site_name,
            domain: url.domain().to_string(),
            favicon_url: self.favicons.resolve(url.domain()),
            content_type,
        })
    }
}
