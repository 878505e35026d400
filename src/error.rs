use thiserror::Error;
use tracing::{error, warn};

/// Tag carried by every [`ValidationError`], stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    InvalidUrl,
    UnsupportedProtocol,
    BlockedHost,
    PrivateNetwork,
    OversizedResponse,
}

impl ValidationErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorKind::InvalidUrl => "invalid_url",
            ValidationErrorKind::UnsupportedProtocol => "unsupported_protocol",
            ValidationErrorKind::BlockedHost => "blocked_host",
            ValidationErrorKind::PrivateNetwork => "private_network",
            ValidationErrorKind::OversizedResponse => "oversized_response",
        }
    }
}

/// Raised before any content is downloaded. Never recovered into a fallback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("Blocked host: {0}")]
    BlockedHost(String),

    #[error("Private network address: {0}")]
    PrivateNetwork(String),

    #[error("Response too large: {content_length} bytes (limit {limit})")]
    OversizedResponse { content_length: u64, limit: u64 },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::InvalidUrl(_) => ValidationErrorKind::InvalidUrl,
            ValidationError::UnsupportedProtocol(_) => ValidationErrorKind::UnsupportedProtocol,
            ValidationError::BlockedHost(_) => ValidationErrorKind::BlockedHost,
            ValidationError::PrivateNetwork(_) => ValidationErrorKind::PrivateNetwork,
            ValidationError::OversizedResponse { .. } => ValidationErrorKind::OversizedResponse,
        }
    }
}

/// Raised when the GitHub repository path fails. There is no fallback for it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitHubResolutionError {
    #[error("Not a GitHub repository URL: {0}")]
    InvalidRepoUrl(String),

    #[error("GitHub API request failed: {0}")]
    Request(String),

    #[error("GitHub repository {owner}/{repo} not found")]
    NotFound { owner: String, repo: String },

    #[error("GitHub API rate limit exceeded")]
    RateLimited,

    #[error("GitHub API returned status {0}")]
    Status(u16),

    #[error("Failed to parse GitHub response: {0}")]
    Decode(String),
}

/// Either error family, for callers going through [`crate::PreviewGenerator`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PreviewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    GitHub(#[from] GitHubResolutionError),
}

impl PreviewError {
    pub fn log(&self) {
        match self {
            PreviewError::Validation(e) => {
                warn!(kind = e.kind().as_str(), error = %e, "URL rejected");
            }
            PreviewError::GitHub(GitHubResolutionError::RateLimited) => {
                warn!("GitHub rate limit exceeded");
            }
            PreviewError::GitHub(e) => {
                error!(error = %e, "GitHub repository resolution failed");
            }
        }
    }

    /// Message safe to hand back to an HTTP client.
    ///
    /// Host and address details stay in the logs; the client only learns which
    /// class of problem it has to fix.
    pub fn public_message(&self) -> &'static str {
        match self {
            PreviewError::Validation(e) => match e.kind() {
                ValidationErrorKind::InvalidUrl => "The URL could not be parsed",
                ValidationErrorKind::UnsupportedProtocol => "Only http and https URLs are supported",
                ValidationErrorKind::BlockedHost | ValidationErrorKind::PrivateNetwork => {
                    "This URL is not allowed"
                }
                ValidationErrorKind::OversizedResponse => "The linked page is too large to preview",
            },
            PreviewError::GitHub(GitHubResolutionError::InvalidRepoUrl(_)) => {
                "Not a GitHub repository URL"
            }
            PreviewError::GitHub(GitHubResolutionError::NotFound { .. }) => {
                "GitHub repository not found"
            }
            PreviewError::GitHub(GitHubResolutionError::RateLimited) => {
                "GitHub is rate limiting requests, try again later"
            }
            PreviewError::GitHub(_) => "Failed to fetch repository details from GitHub",
        }
    }
}

/// Why a fetch was abandoned. Only ever surfaces as the reason of a degraded
/// preview.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("redirect limit exceeded")]
    RedirectLimitExceeded,

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error("response exceeded {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return FetchError::Timeout;
        }
        if err.is_redirect() {
            return FetchError::RedirectLimitExceeded;
        }
        if err.is_body() || err.is_decode() {
            return FetchError::Body(err.to_string());
        }
        FetchError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_wire_tags() {
        let cases = [
            (ValidationError::InvalidUrl("x".into()), "invalid_url"),
            (ValidationError::UnsupportedProtocol("ftp".into()), "unsupported_protocol"),
            (ValidationError::BlockedHost("localhost".into()), "blocked_host"),
            (ValidationError::PrivateNetwork("10.0.0.1".into()), "private_network"),
            (
                ValidationError::OversizedResponse {
                    content_length: 2,
                    limit: 1,
                },
                "oversized_response",
            ),
        ];
        for (err, tag) in cases {
            assert_eq!(err.kind().as_str(), tag);
        }
    }

    #[test]
    fn public_message_hides_blocked_host() {
        let err = PreviewError::from(ValidationError::PrivateNetwork("169.254.169.254".into()));
        assert!(!err.public_message().contains("169.254"));
        assert_eq!(err.public_message(), "This URL is not allowed");

        let err = PreviewError::from(ValidationError::BlockedHost("metadata.internal".into()));
        assert!(!err.public_message().contains("internal"));
    }
}
