use crate::error::GitHubResolutionError;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const GITHUB_API_BASE: &str = "https://api.github.com";

static GITHUB_REPO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"github\.com/[^/]+/[^/]+").expect("valid regex"));

static GITHUB_REPO_CAPTURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"github\.com/([^/]+)/([^/?#]+)").expect("valid regex"));

/// Repository details returned by the GitHub path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubRepoInfo {
    pub name: String,
    pub description: String,
    pub stars: u64,
    pub language: String,
    pub repo_url: String,
    pub demo_url: String,
    pub topics: Vec<String>,
}

/// Subset of `GET /repos/{owner}/{repo}` we read.
#[derive(Debug, Deserialize)]
struct GitHubRepository {
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    language: Option<String>,
    html_url: Option<String>,
    homepage: Option<String>,
    topics: Option<Vec<String>>,
}

impl From<GitHubRepository> for GitHubRepoInfo {
    fn from(repo: GitHubRepository) -> Self {
        Self {
            name: repo.name.unwrap_or_default(),
            description: repo.description.unwrap_or_default(),
            stars: repo.stargazers_count,
            language: repo.language.unwrap_or_default(),
            repo_url: repo.html_url.unwrap_or_default(),
            demo_url: repo.homepage.unwrap_or_default(),
            topics: repo.topics.unwrap_or_default(),
        }
    }
}

/// True for anything containing `github.com/<owner>/<repo>`, sub-paths included.
pub fn is_github_url(url: &str) -> bool {
    GITHUB_REPO_RE.is_match(url)
}

/// Extracts `(owner, repo)` with a trailing `.git` removed from `repo`.
pub fn parse_github_repo(url: &str) -> Option<(String, String)> {
    let caps = GITHUB_REPO_CAPTURE_RE.captures(url)?;
    let owner = caps.get(1)?.as_str();
    let repo = caps.get(2)?.as_str();
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_base: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub token: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: GITHUB_API_BASE.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: crate::fetcher::DEFAULT_USER_AGENT.to_string(),
            token: None,
        }
    }
}

impl GitHubConfig {
    /// Default config with `GITHUB_TOKEN` applied when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.trim().is_empty() {
                debug!("Found GitHub token in environment");
                config.token = Some(token.trim().to_string());
            }
        }
        config
    }
}

#[derive(Debug, Clone, Default)]
pub struct GitHubClient {
    config: GitHubConfig,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Self {
        Self { config }
    }

    fn build_client(&self) -> Result<Client, GitHubResolutionError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));

        if let Some(token) = &self.config.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| GitHubResolutionError::Request(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .default_headers(headers)
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| GitHubResolutionError::Request(e.to_string()))
    }

    /// Resolves a GitHub repository URL through the REST API.
    ///
    /// One attempt, no fallback: any failure is returned to the caller.
    #[instrument(level = "debug", skip(self), err)]
    pub async fn fetch_repo(&self, url: &str) -> Result<GitHubRepoInfo, GitHubResolutionError> {
        let (owner, repo) = parse_github_repo(url)
            .ok_or_else(|| GitHubResolutionError::InvalidRepoUrl(url.to_string()))?;

        let api_url = format!(
            "{}/repos/{}/{}",
            self.config.api_base.trim_end_matches('/'),
            owner,
            repo
        );
        debug!(url = %api_url, "Fetching GitHub repository information");

        let response = self
            .build_client()?
            .get(&api_url)
            .send()
            .await
            .map_err(|e| GitHubResolutionError::Request(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(GitHubResolutionError::NotFound { owner, repo });
            }
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                warn!(status = %response.status(), "GitHub API refused the request");
                return Err(GitHubResolutionError::RateLimited);
            }
            status => return Err(GitHubResolutionError::Status(status.as_u16())),
        }

        let repository: GitHubRepository = response
            .json()
            .await
            .map_err(|e| GitHubResolutionError::Decode(e.to_string()))?;

        Ok(repository.into())
    }
}
