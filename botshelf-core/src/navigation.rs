//! Navigation state machine: gallery → bot detail → diff view.
//!
//! [`Navigator`] is the single owner of the mutable UI-level state. Every
//! operation is synchronous; operations that need network data return an
//! [`Effect`] for the caller to run in the background. Each effect carries a
//! [`Ticket`] drawn from a monotonic counter, and a finished request is applied
//! only while its ticket is still the live one for its request kind. A late
//! response for a bot that is no longer selected, or for a commit that has
//! been collapsed or superseded, is dropped on arrival.

use std::sync::Arc;

use crate::types::{BotRecord, Changelog, CommitDetail, CommitSummary, FileChange};

/// Generation token identifying one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Gallery,
    BotDetail,
    DiffView,
}

/// The user's position in the view hierarchy.
///
/// Invariants: `expanded_commit` is set only with `selected_bot`, and
/// `viewing_diff` only with `expanded_commit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub selected_bot: Option<Arc<BotRecord>>,
    pub expanded_commit: Option<String>,
    pub viewing_diff: Option<FileChange>,
}

/// Background work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchHistory { ticket: Ticket, repo: String },
    FetchDetail { ticket: Ticket, repo: String, sha: String },
}

#[derive(Debug, Default)]
pub struct Navigator {
    state: NavigationState,
    changelog: Changelog,
    detail: CommitDetail,
    history_ticket: Option<Ticket>,
    detail_ticket: Option<Ticket>,
    issued: u64,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn view(&self) -> View {
        if self.state.viewing_diff.is_some() {
            View::DiffView
        } else if self.state.selected_bot.is_some() {
            View::BotDetail
        } else {
            View::Gallery
        }
    }

    pub fn selected_bot(&self) -> Option<&Arc<BotRecord>> {
        self.state.selected_bot.as_ref()
    }

    pub fn expanded_commit(&self) -> Option<&str> {
        self.state.expanded_commit.as_deref()
    }

    pub fn viewing_diff(&self) -> Option<&FileChange> {
        self.state.viewing_diff.as_ref()
    }

    pub fn changelog(&self) -> &Changelog {
        &self.changelog
    }

    pub fn detail(&self) -> &CommitDetail {
        &self.detail
    }

    /// Ticket of the history request still awaiting a result.
    pub fn pending_history(&self) -> Option<Ticket> {
        self.history_ticket
            .filter(|_| matches!(self.changelog, Changelog::Loading))
    }

    /// Ticket of the detail request still awaiting a result.
    pub fn pending_detail(&self) -> Option<Ticket> {
        self.detail_ticket
            .filter(|_| matches!(self.detail, CommitDetail::Loading { .. }))
    }

    fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    fn clear_detail(&mut self) {
        self.state.expanded_commit = None;
        self.state.viewing_diff = None;
        self.detail = CommitDetail::Absent;
        self.detail_ticket = None;
    }

    /// Opens `bot`'s profile and requests its changelog.
    ///
    /// Re-selecting the bot that is already open does nothing. Selecting a
    /// different bot discards every piece of state derived from the old one.
    pub fn select(&mut self, bot: Arc<BotRecord>) -> Option<Effect> {
        if self.state.selected_bot.as_ref() == Some(&bot) {
            return None;
        }
        self.clear_detail();
        let repo = bot.repository().map(str::to_owned);
        tracing::debug!(bot = %bot.name, "bot selected");
        self.state.selected_bot = Some(bot);

        match repo {
            Some(repo) => {
                let ticket = self.issue();
                self.history_ticket = Some(ticket);
                self.changelog = Changelog::Loading;
                Some(Effect::FetchHistory { ticket, repo })
            }
            None => {
                self.history_ticket = None;
                self.changelog = Changelog::Unlinked;
                None
            }
        }
    }

    /// Returns to the gallery, discarding all derived state.
    pub fn deselect(&mut self) {
        self.clear_detail();
        self.state.selected_bot = None;
        self.changelog = Changelog::Idle;
        self.history_ticket = None;
    }

    /// Expands `sha` in the changelog, or collapses it if it is already expanded.
    ///
    /// Expanding discards the previous commit's detail, including a request
    /// still in flight. Collapsing leaves no detail request live. Ignored
    /// outside the bot detail view.
    pub fn toggle_commit(&mut self, sha: &str) -> Option<Effect> {
        let linked = self.state.selected_bot.as_ref().and_then(|b| b.repository()).is_some();
        if self.view() != View::BotDetail || !linked {
            return None;
        }
        if self.state.expanded_commit.as_deref() == Some(sha) {
            self.clear_detail();
            return None;
        }
        self.clear_detail();
        self.state.expanded_commit = Some(sha.to_owned());
        self.request_detail(sha.to_owned())
    }

    /// Re-requests the expanded commit's files after a failed fetch.
    pub fn retry_detail(&mut self) -> Option<Effect> {
        if self.view() != View::BotDetail {
            return None;
        }
        match &self.detail {
            CommitDetail::Failed { sha, .. } => {
                let sha = sha.clone();
                self.request_detail(sha)
            }
            _ => None,
        }
    }

    fn request_detail(&mut self, sha: String) -> Option<Effect> {
        let repo = self.state.selected_bot.as_ref()?.repository()?.to_owned();
        let ticket = self.issue();
        self.detail_ticket = Some(ticket);
        self.detail = CommitDetail::Loading { sha: sha.clone() };
        Some(Effect::FetchDetail { ticket, repo, sha })
    }

    /// Opens the diff of file `index` of the expanded commit.
    ///
    /// Returns `false` if no detail is loaded or the index is out of range.
    pub fn open_diff(&mut self, index: usize) -> bool {
        if self.state.expanded_commit.is_none() {
            return false;
        }
        match self.detail.files().get(index) {
            Some(file) => {
                self.state.viewing_diff = Some(file.clone());
                true
            }
            None => false,
        }
    }

    /// Leaves the diff view; the expanded commit and its files are kept.
    pub fn close_diff(&mut self) -> bool {
        self.state.viewing_diff.take().is_some()
    }

    /// Moves one level up the view hierarchy. Returns `false` in the gallery.
    pub fn back(&mut self) -> bool {
        match self.view() {
            View::DiffView => self.close_diff(),
            View::BotDetail => {
                self.deselect();
                true
            }
            View::Gallery => false,
        }
    }

    /// Applies a finished history request. Returns `false` if it was stale.
    pub fn apply_history(&mut self, ticket: Ticket, commits: Vec<CommitSummary>) -> bool {
        if self.history_ticket != Some(ticket) {
            tracing::debug!(?ticket, "discarding stale changelog");
            return false;
        }
        self.history_ticket = None;
        self.changelog = Changelog::Ready(commits);
        true
    }

    /// Applies a finished detail request. Returns `false` if it was stale.
    pub fn apply_detail(&mut self, ticket: Ticket, result: Result<Vec<FileChange>, String>) -> bool {
        if self.detail_ticket != Some(ticket) {
            tracing::debug!(?ticket, "discarding stale commit detail");
            return false;
        }
        let Some(sha) = self.state.expanded_commit.clone() else {
            return false;
        };
        self.detail_ticket = None;
        self.detail = match result {
            Ok(files) => CommitDetail::Loaded { sha, files },
            Err(reason) => CommitDetail::Failed { sha, reason },
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot(name: &str, repo: Option<&str>) -> Arc<BotRecord> {
        Arc::new(BotRecord {
            name: name.to_owned(),
            avatar: String::new(),
            platform: "Telegram".to_owned(),
            tagline: String::new(),
            description: String::new(),
            invite_link: String::new(),
            repo: repo.map(str::to_owned),
            features: Vec::new(),
            links: Vec::new(),
        })
    }

    #[test]
    fn bot_without_repo_is_unlinked() {
        let mut nav = Navigator::new();
        assert!(nav.select(bot("Solo", None)).is_none());
        assert_eq!(nav.changelog(), &Changelog::Unlinked);
        assert!(nav.toggle_commit("abc").is_none());
        assert_eq!(nav.expanded_commit(), None);
    }

    #[test]
    fn reselecting_same_bot_is_noop() {
        let mut nav = Navigator::new();
        let b = bot("Aqua", Some("aqua/bot"));
        assert!(nav.select(b.clone()).is_some());
        assert!(nav.select(b).is_none());
        assert!(nav.pending_history().is_some());
    }

    #[test]
    fn toggle_ignored_in_gallery() {
        let mut nav = Navigator::new();
        assert!(nav.toggle_commit("abc").is_none());
        assert_eq!(nav.expanded_commit(), None);
    }

    #[test]
    fn back_walks_up_the_hierarchy() {
        let mut nav = Navigator::new();
        nav.select(bot("Aqua", Some("aqua/bot")));
        let Some(Effect::FetchDetail { ticket, .. }) = nav.toggle_commit("abc") else {
            panic!("expected detail fetch");
        };
        let file = FileChange {
            filename: "a.rs".to_owned(),
            additions: 1,
            deletions: 0,
            patch: "@@ -0,0 +1 @@\n+x".to_owned(),
        };
        assert!(nav.apply_detail(ticket, Ok(vec![file])));
        assert!(nav.open_diff(0));
        assert_eq!(nav.view(), View::DiffView);
        assert!(nav.back());
        assert_eq!(nav.view(), View::BotDetail);
        assert!(nav.back());
        assert_eq!(nav.view(), View::Gallery);
        assert!(!nav.back());
    }
}
