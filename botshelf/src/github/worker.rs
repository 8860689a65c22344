//! Runs navigator effects against the GitHub API.
//!
//! Each [`Effect`] becomes one spawned task. Tasks never touch application
//! state: they send a [`FetchOutcome`] back through `AppEvent::Fetched` and the
//! main loop hands it to the navigator, which drops it if the ticket is stale.
//! There is no cancellation; a superseded task simply finishes unobserved.

use botshelf_core::github::GithubClient;
use botshelf_core::navigation::{Effect, Ticket};
use botshelf_core::types::{CommitSummary, FileChange};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::AppEvent;

/// Result of one background request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Changelog with failures already folded into a placeholder entry.
    History {
        ticket: Ticket,
        commits: Vec<CommitSummary>,
    },
    Detail {
        ticket: Ticket,
        sha: String,
        result: Result<Vec<FileChange>, String>,
    },
}

/// Spawns the request described by `effect`.
pub fn dispatch(effect: Effect, client: &GithubClient, event_tx: &UnboundedSender<AppEvent>) {
    let client = client.clone();
    let event_tx = event_tx.clone();
    tokio::spawn(async move {
        let outcome = run(effect, &client).await;
        let _ = event_tx.send(AppEvent::Fetched(Box::new(outcome)));
    });
}

async fn run(effect: Effect, client: &GithubClient) -> FetchOutcome {
    match effect {
        Effect::FetchHistory { ticket, repo } => {
            tracing::debug!(%repo, ?ticket, "fetching changelog");
            let commits = client.changelog(&repo).await;
            FetchOutcome::History { ticket, commits }
        }
        Effect::FetchDetail { ticket, repo, sha } => {
            tracing::debug!(%repo, %sha, ?ticket, "fetching commit detail");
            let result = client.commit_files(&repo, &sha).await.map_err(|e| {
                tracing::warn!(%repo, %sha, error = %e, "commit detail fetch failed");
                e.to_string()
            });
            FetchOutcome::Detail { ticket, sha, result }
        }
    }
}
