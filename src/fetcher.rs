use crate::error::{FetchError, ValidationError};
use crate::security::ValidatedUrl;
use futures::StreamExt;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{redirect, Client, Response};
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const DEFAULT_USER_AGENT: &str = "link_preview/0.1 (+metadata preview bot)";
pub const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Timeouts, redirect caps and the body ceiling used by [`Fetcher`].
///
/// # Examples
/// ```ignore
/// let fetcher = Fetcher::new_with_config(FetcherConfig {
///     fetch_timeout: Duration::from_secs(5),
///     ..Default::default()
/// });
/// ```
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub user_agent: String,
    pub probe_timeout: Duration,
    pub probe_max_redirects: usize,
    pub fetch_timeout: Duration,
    pub fetch_max_redirects: usize,
    pub max_body_bytes: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            probe_timeout: Duration::from_secs(5),
            probe_max_redirects: 2,
            fetch_timeout: Duration::from_secs(10),
            fetch_max_redirects: 5,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

/// Issues the preflight `HEAD` and the bounded `GET` for a validated URL.
///
/// Clients are built per call, so a `Fetcher` holds no connection state and
/// concurrent calls never share anything.
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    config: FetcherConfig,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_config(config: FetcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    fn build_client(&self, timeout: Duration, max_redirects: usize) -> Result<Client, FetchError> {
        Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .timeout(timeout)
            .redirect(redirect_policy(max_redirects))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))
    }

    /// Best-effort `HEAD` probe.
    ///
    /// Only a declared `content-length` above the ceiling is an error; every
    /// other failure is logged and ignored.
    #[instrument(level = "debug", skip(self, url), fields(url = %url))]
    pub async fn probe(&self, url: &ValidatedUrl) -> Result<(), ValidationError> {
        let declared = match self.probe_content_length(url).await {
            Ok(declared) => declared,
            Err(e) => {
                debug!(error = %e, "Preflight probe failed, continuing with fetch");
                return Ok(());
            }
        };

        match declared {
            Some(content_length) if content_length > self.config.max_body_bytes => {
                warn!(content_length, "Preflight reported oversized response");
                Err(ValidationError::OversizedResponse {
                    content_length,
                    limit: self.config.max_body_bytes,
                })
            }
            Some(content_length) => {
                debug!(content_length, "Preflight passed");
                Ok(())
            }
            None => {
                debug!("Preflight response carried no usable content-length");
                Ok(())
            }
        }
    }

    async fn probe_content_length(&self, url: &ValidatedUrl) -> Result<Option<u64>, FetchError> {
        let client = self.build_client(self.config.probe_timeout, self.config.probe_max_redirects)?;
        let response = client.head(url.as_url().clone()).send().await?;
        let response = check_status(response)?;

        Ok(response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok()))
    }

    /// Downloads the page body, aborting once it passes the ceiling.
    #[instrument(level = "debug", skip(self, url), fields(url = %url), err(level = "debug"))]
    pub async fn fetch(&self, url: &ValidatedUrl) -> Result<String, FetchError> {
        let limit = self.config.max_body_bytes;
        let client = self.build_client(self.config.fetch_timeout, self.config.fetch_max_redirects)?;

        let response = client.get(url.as_url().clone()).send().await?;
        let response = check_status(response)?;

        if let Some(content_length) = response.content_length() {
            if content_length > limit {
                return Err(FetchError::TooLarge { limit });
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if body.len() as u64 + chunk.len() as u64 > limit {
                return Err(FetchError::TooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        debug!(content_length = body.len(), "Successfully fetched webpage");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Follows at most `max_redirects` hops. `previous()` includes the starting
/// URL, so it holds the hop count once a redirect is being considered.
fn redirect_policy(max_redirects: usize) -> redirect::Policy {
    redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() > max_redirects {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

fn check_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status().as_u16();
    if (200..400).contains(&status) {
        Ok(response)
    } else {
        Err(FetchError::HttpStatus(status))
    }
}
