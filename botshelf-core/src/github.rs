//! GitHub REST client for the changelog and commit-detail fetchers.
//!
//! Only two read-only endpoints are used:
//!
//! - `GET /repos/{owner}/{name}/commits`: the changelog, truncated to
//!   [`HISTORY_LIMIT`] entries in API order (newest first).
//! - `GET /repos/{owner}/{name}/commits/{sha}`: the commit's changed files.
//!
//! Requests carry `Authorization: Bearer <token>` when a token is configured.
//! The client itself is stateless and cheap to clone, so every background
//! fetch task owns its own handle.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::GithubError;
use crate::types::{CommitSummary, FileChange};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Number of commits kept per changelog.
pub const HISTORY_LIMIT: usize = 5;
pub const RATE_LIMIT_MESSAGE: &str = "Changelog unavailable (GitHub API rate limit reached)";

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl GithubConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("botshelf/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[derive(Debug, Clone)]
pub struct GithubClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct WireCommit {
    sha: String,
    #[serde(default)]
    html_url: Option<String>,
    commit: WireCommitBody,
}

#[derive(Debug, Deserialize)]
struct WireCommitBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    author: Option<WireSignature>,
    #[serde(default)]
    committer: Option<WireSignature>,
}

#[derive(Debug, Deserialize)]
struct WireSignature {
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct WireCommitDetail {
    #[serde(default)]
    files: Vec<FileChange>,
}

impl From<WireCommit> for CommitSummary {
    fn from(wire: WireCommit) -> Self {
        let date = wire
            .commit
            .author
            .and_then(|s| s.date)
            .or_else(|| wire.commit.committer.and_then(|s| s.date))
            .unwrap_or_else(Utc::now);
        CommitSummary {
            sha: Some(wire.sha),
            message: wire.commit.message,
            date,
            url: wire.html_url,
        }
    }
}

impl GithubClient {
    /// # Errors
    ///
    /// Returns [`GithubError::Request`] if the HTTP client cannot be built
    /// (TLS backend initialisation failure).
    pub fn new(config: GithubConfig) -> Result<Self, GithubError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(GithubError::Request)?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: config.token,
            http,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header(ACCEPT, ACCEPT_GITHUB_JSON);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GithubError> {
        let response = request.send().await.map_err(GithubError::Request)?;
        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GithubError::RateLimited);
        }
        if !status.is_success() {
            return Err(GithubError::Status { status });
        }
        response.json::<T>().await.map_err(GithubError::Decode)
    }

    /// Fetches the most recent commits of `repo` (`"owner/name"`).
    ///
    /// At most [`HISTORY_LIMIT`] entries are returned, in API order.
    pub async fn list_commits(&self, repo: &str) -> Result<Vec<CommitSummary>, GithubError> {
        let request = self
            .get(&format!("/repos/{repo}/commits"))
            .query(&[("per_page", HISTORY_LIMIT)]);
        let commits: Vec<WireCommit> = self.get_json(request).await?;
        Ok(commits
            .into_iter()
            .take(HISTORY_LIMIT)
            .map(CommitSummary::from)
            .collect())
    }

    /// Changelog for `repo` with every failure folded into a placeholder entry.
    ///
    /// Never returns an empty list because of an error.
    pub async fn changelog(&self, repo: &str) -> Vec<CommitSummary> {
        let result = self.list_commits(repo).await;
        if let Err(e) = &result {
            tracing::warn!(repo, error = %e, "changelog fetch failed");
        }
        changelog_or_placeholder(result)
    }

    /// Fetches the changed files of commit `sha` in `repo`.
    pub async fn commit_files(&self, repo: &str, sha: &str) -> Result<Vec<FileChange>, GithubError> {
        let request = self.get(&format!("/repos/{repo}/commits/{sha}"));
        let detail: WireCommitDetail = self.get_json(request).await?;
        Ok(detail.files)
    }
}

/// Folds a history result into what the changelog pane shows.
pub fn changelog_or_placeholder(
    result: Result<Vec<CommitSummary>, GithubError>,
) -> Vec<CommitSummary> {
    match result {
        Ok(commits) => commits,
        Err(GithubError::RateLimited) => vec![CommitSummary::placeholder(RATE_LIMIT_MESSAGE)],
        Err(e) => vec![CommitSummary::placeholder(format!("Changelog unavailable: {e}"))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_becomes_single_placeholder() {
        let log = changelog_or_placeholder(Err(GithubError::RateLimited));
        assert_eq!(log.len(), 1);
        assert!(log[0].is_placeholder());
        assert!(log[0].message.contains("rate limit"));
    }

    #[test]
    fn other_status_is_reported_in_placeholder() {
        let log = changelog_or_placeholder(Err(GithubError::Status {
            status: StatusCode::NOT_FOUND,
        }));
        assert_eq!(log.len(), 1);
        assert!(log[0].message.contains("404"));
    }

    #[test]
    fn blank_token_is_dropped() {
        let config = GithubConfig::default().with_token(Some("  ".to_owned()));
        assert!(config.token.is_none());
    }

    #[test]
    fn commit_date_falls_back_to_committer() {
        let wire: WireCommit = serde_json::from_str(
            r#"{"sha": "abc", "commit": {"message": "m", "author": null,
                "committer": {"date": "2024-05-01T10:00:00Z"}}}"#,
        )
        .unwrap();
        let summary = CommitSummary::from(wire);
        assert_eq!(summary.date.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }
}
