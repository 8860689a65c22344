use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure while loading the bot catalog from its data directory.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read bot record {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid bot record {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate bot name '{name}' in {path}")]
    DuplicateName { name: String, path: PathBuf },
}

/// Failure talking to the GitHub REST API.
///
/// `RateLimited` is kept apart from other statuses because the changelog
/// placeholder reports it with its own message.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API rate limit reached")]
    RateLimited,
    #[error("GitHub returned HTTP {status}")]
    Status { status: StatusCode },
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("cannot decode GitHub response: {0}")]
    Decode(#[source] reqwest::Error),
}
