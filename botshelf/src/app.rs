//! Central application state for botshelf.
//!
//! `AppState` wraps the core [`Navigator`] (which owns the view hierarchy and
//! the fetched data) and adds everything that is purely presentational: the
//! gallery cursor, pane focus, scroll offsets, cached viewport heights, and the
//! highlighted lines of the open diff. No ratatui rendering happens here; the
//! render module reads this struct and the keybinding dispatcher mutates it.

use botshelf_core::catalog::Catalog;
use botshelf_core::navigation::{Effect, Navigator, View};
use botshelf_core::patch::parse_patch;
use botshelf_core::types::{Changelog, CommitDetail, CommitSummary};
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::ListState;

use crate::config::SubmitInfo;
use crate::github::worker::FetchOutcome;
use crate::highlight::highlight_patch;
use crate::theme::Theme;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    HelpOverlay,
    /// The "submit your bot" panel is shown above the current view.
    SubmitPanel,
}

/// Which pane of the bot detail view has keyboard focus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    Profile,
    #[default]
    Changelog,
}

impl PanelFocus {
    pub fn toggle(self) -> Self {
        match self {
            PanelFocus::Profile => PanelFocus::Changelog,
            PanelFocus::Changelog => PanelFocus::Profile,
        }
    }
}

/// One selectable row of the changelog pane.
///
/// The changelog is a flat list: commits, and below the expanded commit either
/// its files or a single notice row (loading, failure, or "no files").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangelogRow {
    /// Index into the changelog's commits.
    Commit(usize),
    /// Index into the expanded commit's files.
    File(usize),
    Notice,
}

pub struct AppState {
    pub catalog: Catalog,
    pub nav: Navigator,
    pub submit: SubmitInfo,

    pub mode: Mode,
    pub focus: PanelFocus,

    /// Index of the highlighted card in the gallery.
    pub gallery_cursor: usize,
    /// Card columns of the last rendered gallery (2 or 3).
    pub gallery_columns: usize,

    pub profile_scroll: u16,
    pub profile_viewport_height: u16,
    pub changelog_state: ListState,
    pub changelog_viewport_height: u16,
    /// `[profile, changelog]` outer rects from the last frame, for mouse focus.
    pub panel_rects: [Rect; 2],

    /// Highlighted lines of the open diff; empty outside the diff view.
    pub diff_lines: Vec<Line<'static>>,
    pub hunk_offsets: Vec<usize>,
    pub hunk_cursor: usize,
    pub diff_scroll: usize,
    pub diff_viewport_height: u16,

    pub help_scroll: u16,
    spinner: usize,
}

impl AppState {
    pub fn new(catalog: Catalog, submit: SubmitInfo) -> Self {
        Self {
            catalog,
            nav: Navigator::new(),
            submit,
            mode: Mode::default(),
            focus: PanelFocus::default(),
            gallery_cursor: 0,
            gallery_columns: 3,
            profile_scroll: 0,
            profile_viewport_height: 0,
            changelog_state: ListState::default(),
            changelog_viewport_height: 0,
            panel_rects: [Rect::default(); 2],
            diff_lines: Vec::new(),
            hunk_offsets: Vec::new(),
            hunk_cursor: 0,
            diff_scroll: 0,
            diff_viewport_height: 0,
            help_scroll: 0,
            spinner: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Busy indicator
    // -----------------------------------------------------------------------

    /// `true` while any request's result is still awaited.
    pub fn is_busy(&self) -> bool {
        self.nav.pending_history().is_some() || self.nav.pending_detail().is_some()
    }

    /// Advances the spinner; called on every `AppEvent::Tick`.
    pub fn on_tick(&mut self) {
        if self.is_busy() {
            self.spinner = (self.spinner + 1) % SPINNER.len();
        }
    }

    pub fn spinner_frame(&self) -> &'static str {
        SPINNER[self.spinner % SPINNER.len()]
    }

    // -----------------------------------------------------------------------
    // Gallery
    // -----------------------------------------------------------------------

    pub fn gallery_move(&mut self, dx: isize, dy: isize) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        let cols = self.gallery_columns.max(1) as isize;
        let target = self.gallery_cursor as isize + dx + dy * cols;
        if (0..len as isize).contains(&target) {
            self.gallery_cursor = target as usize;
        } else if dy > 0 {
            // Moving down from a partial last row lands on the last card.
            let last_row_start = (len as isize - 1) / cols * cols;
            if (self.gallery_cursor as isize) < last_row_start {
                self.gallery_cursor = len - 1;
            }
        }
    }

    pub fn gallery_first(&mut self) {
        self.gallery_cursor = 0;
    }

    pub fn gallery_last(&mut self) {
        self.gallery_cursor = self.catalog.len().saturating_sub(1);
    }

    /// Opens the bot under the gallery cursor.
    pub fn open_selected_bot(&mut self) -> Option<Effect> {
        let bot = self.catalog.get(self.gallery_cursor)?.clone();
        let effect = self.nav.select(bot);
        self.focus = PanelFocus::Changelog;
        self.profile_scroll = 0;
        self.changelog_state = ListState::default();
        effect
    }

    // -----------------------------------------------------------------------
    // Changelog rows
    // -----------------------------------------------------------------------

    fn commits(&self) -> &[CommitSummary] {
        match self.nav.changelog() {
            Changelog::Ready(commits) => commits,
            _ => &[],
        }
    }

    /// Flattens the changelog and the expanded commit's detail into rows.
    pub fn changelog_rows(&self) -> Vec<ChangelogRow> {
        let expanded = self.nav.expanded_commit();
        let mut rows = Vec::new();
        for (i, commit) in self.commits().iter().enumerate() {
            rows.push(ChangelogRow::Commit(i));
            if expanded.is_none() || commit.sha.as_deref() != expanded {
                continue;
            }
            match self.nav.detail() {
                CommitDetail::Loaded { files, .. } if !files.is_empty() => {
                    rows.extend((0..files.len()).map(ChangelogRow::File));
                }
                CommitDetail::Absent => {}
                _ => rows.push(ChangelogRow::Notice),
            }
        }
        rows
    }

    pub fn commit(&self, index: usize) -> Option<&CommitSummary> {
        self.commits().get(index)
    }

    fn selected_row(&self) -> Option<ChangelogRow> {
        let rows = self.changelog_rows();
        self.changelog_state.selected().and_then(|i| rows.get(i).copied())
    }

    fn select_row(&mut self, row: ChangelogRow) {
        let index = self.changelog_rows().iter().position(|r| *r == row);
        self.changelog_state.select(index);
    }

    /// Acts on the selected changelog row: toggles a commit, opens a file's
    /// diff, or retries a failed detail fetch.
    pub fn activate_row(&mut self, theme: &Theme) -> Option<Effect> {
        match self.selected_row()? {
            ChangelogRow::Commit(i) => {
                let sha = self.commit(i)?.sha.clone()?;
                let effect = self.nav.toggle_commit(&sha);
                // Collapsing a commit above the cursor shifts the rows.
                self.select_row(ChangelogRow::Commit(i));
                effect
            }
            ChangelogRow::File(j) => {
                self.open_file(j, theme);
                None
            }
            ChangelogRow::Notice => self.retry(),
        }
    }

    pub fn retry(&mut self) -> Option<Effect> {
        let effect = self.nav.retry_detail();
        if effect.is_some() {
            tracing::info!(sha = ?self.nav.expanded_commit(), "retrying commit detail");
        }
        effect
    }

    // -----------------------------------------------------------------------
    // Diff view
    // -----------------------------------------------------------------------

    /// Opens file `index` of the expanded commit and highlights its patch.
    pub fn open_file(&mut self, index: usize, theme: &Theme) {
        if !self.nav.open_diff(index) {
            return;
        }
        let Some(file) = self.nav.viewing_diff() else {
            return;
        };
        let hunks = parse_patch(&file.patch);
        let highlighted = highlight_patch(&file.filename, &hunks, theme);
        self.diff_lines = highlighted.lines;
        self.hunk_offsets = highlighted.hunk_offsets;
        self.hunk_cursor = 0;
        self.diff_scroll = 0;
    }

    pub fn prev_hunk(&mut self) {
        if self.hunk_offsets.is_empty() {
            return;
        }
        self.hunk_cursor = self.hunk_cursor.saturating_sub(1);
        self.diff_scroll = self.hunk_offsets[self.hunk_cursor];
    }

    pub fn next_hunk(&mut self) {
        if self.hunk_offsets.is_empty() {
            return;
        }
        self.hunk_cursor = (self.hunk_cursor + 1).min(self.hunk_offsets.len() - 1);
        self.diff_scroll = self.hunk_offsets[self.hunk_cursor];
    }

    /// Goes one level up. Returns `false` when already in the gallery.
    pub fn back(&mut self) -> bool {
        let from = self.nav.view();
        if !self.nav.back() {
            return false;
        }
        match from {
            View::DiffView => {
                self.diff_lines.clear();
                self.hunk_offsets.clear();
                self.diff_scroll = 0;
            }
            View::BotDetail => {
                self.changelog_state = ListState::default();
                self.profile_scroll = 0;
            }
            View::Gallery => {}
        }
        true
    }

    // -----------------------------------------------------------------------
    // Background results
    // -----------------------------------------------------------------------

    /// Hands a finished request to the navigator. Stale results are dropped
    /// there and leave the view untouched.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::History { ticket, commits } => {
                let count = commits.len();
                if self.nav.apply_history(ticket, commits) {
                    tracing::debug!(count, "changelog applied");
                    if self.changelog_state.selected().is_none() && count > 0 {
                        self.changelog_state.select(Some(0));
                    }
                }
            }
            FetchOutcome::Detail { ticket, sha, result } => {
                if self.nav.apply_detail(ticket, result) {
                    tracing::debug!(%sha, "commit detail applied");
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    /// Scrolls the focused pane of the current view down by `lines`.
    pub fn scroll_down(&mut self, lines: u16) {
        match (self.nav.view(), self.focus) {
            (View::Gallery, _) => self.gallery_move(0, 1),
            (View::BotDetail, PanelFocus::Profile) => {
                self.profile_scroll = self.profile_scroll.saturating_add(lines);
            }
            (View::BotDetail, PanelFocus::Changelog) => {
                let last = self.changelog_rows().len().saturating_sub(1);
                let next = self
                    .changelog_state
                    .selected()
                    .map_or(0, |i| i.saturating_add(lines as usize))
                    .min(last);
                if !self.changelog_rows().is_empty() {
                    self.changelog_state.select(Some(next));
                }
            }
            (View::DiffView, _) => {
                let last = self.diff_lines.len().saturating_sub(1);
                self.diff_scroll = self.diff_scroll.saturating_add(lines as usize).min(last);
            }
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        match (self.nav.view(), self.focus) {
            (View::Gallery, _) => self.gallery_move(0, -1),
            (View::BotDetail, PanelFocus::Profile) => {
                self.profile_scroll = self.profile_scroll.saturating_sub(lines);
            }
            (View::BotDetail, PanelFocus::Changelog) => {
                self.changelog_state.scroll_up_by(lines);
            }
            (View::DiffView, _) => {
                self.diff_scroll = self.diff_scroll.saturating_sub(lines as usize);
            }
        }
    }

    pub fn scroll_top(&mut self) {
        match (self.nav.view(), self.focus) {
            (View::Gallery, _) => self.gallery_first(),
            (View::BotDetail, PanelFocus::Profile) => self.profile_scroll = 0,
            (View::BotDetail, PanelFocus::Changelog) => self.changelog_state.select_first(),
            (View::DiffView, _) => {
                self.diff_scroll = 0;
                self.hunk_cursor = 0;
            }
        }
    }

    pub fn scroll_bottom(&mut self) {
        match (self.nav.view(), self.focus) {
            (View::Gallery, _) => self.gallery_last(),
            // Clamped to the content height on the next render.
            (View::BotDetail, PanelFocus::Profile) => self.profile_scroll = u16::MAX,
            (View::BotDetail, PanelFocus::Changelog) => {
                let len = self.changelog_rows().len();
                if len > 0 {
                    self.changelog_state.select(Some(len - 1));
                }
            }
            (View::DiffView, _) => {
                self.diff_scroll = self.diff_lines.len().saturating_sub(1);
                self.hunk_cursor = self.hunk_offsets.len().saturating_sub(1);
            }
        }
    }

    fn viewport_height(&self) -> u16 {
        match (self.nav.view(), self.focus) {
            (View::Gallery, _) => 1,
            (View::BotDetail, PanelFocus::Profile) => self.profile_viewport_height,
            (View::BotDetail, PanelFocus::Changelog) => self.changelog_viewport_height,
            (View::DiffView, _) => self.diff_viewport_height,
        }
    }

    /// Half-page scroll using the viewport height cached by the last render.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.viewport_height() / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.viewport_height() / 2).max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botshelf_core::navigation::Ticket;
    use botshelf_core::types::{BotRecord, FileChange};

    fn bot(name: &str, repo: Option<&str>) -> BotRecord {
        BotRecord {
            name: name.to_owned(),
            avatar: String::new(),
            platform: "WhatsApp".to_owned(),
            tagline: String::new(),
            description: String::new(),
            invite_link: String::new(),
            repo: repo.map(str::to_owned),
            features: Vec::new(),
            links: Vec::new(),
        }
    }

    fn commit(sha: &str) -> CommitSummary {
        CommitSummary {
            sha: Some(sha.to_owned()),
            message: format!("commit {sha}"),
            date: chrono::Utc::now(),
            url: None,
        }
    }

    fn file(name: &str, patch: &str) -> FileChange {
        FileChange {
            filename: name.to_owned(),
            additions: 1,
            deletions: 1,
            patch: patch.to_owned(),
        }
    }

    fn state() -> AppState {
        let catalog = Catalog::from_records(vec![
            bot("alpha", Some("o/alpha")),
            bot("beta", None),
            bot("gamma", Some("o/gamma")),
            bot("delta", Some("o/delta")),
        ])
        .unwrap();
        AppState::new(catalog, SubmitInfo::default())
    }

    fn ticket_of(effect: Option<Effect>) -> Ticket {
        match effect {
            Some(Effect::FetchHistory { ticket, .. }) | Some(Effect::FetchDetail { ticket, .. }) => {
                ticket
            }
            None => panic!("expected an effect"),
        }
    }

    /// Opens "alpha" with two commits, "a1" expanded and its files loaded.
    fn with_loaded_commit() -> AppState {
        let mut s = state();
        let t = ticket_of(s.open_selected_bot());
        s.apply_fetch(FetchOutcome::History { ticket: t, commits: vec![commit("a1"), commit("a2")] });
        let t = ticket_of(s.activate_row(&Theme::dark()));
        s.apply_fetch(FetchOutcome::Detail {
            ticket: t,
            sha: "a1".to_owned(),
            result: Ok(vec![file("src/main.rs", "@@ -1 +1 @@\n-a\n+b"), file("logo.png", "")]),
        });
        s
    }

    #[test]
    fn gallery_cursor_moves_in_grid() {
        let mut s = state();
        s.gallery_columns = 3;
        s.gallery_move(1, 0);
        assert_eq!(s.gallery_cursor, 1);
        s.gallery_move(0, 1);
        assert_eq!(s.gallery_cursor, 3, "row below, clamped to the last card");
        s.gallery_move(1, 0);
        assert_eq!(s.gallery_cursor, 3, "no wrap past the end");
        s.gallery_move(0, -1);
        assert_eq!(s.gallery_cursor, 0);
    }

    #[test]
    fn first_history_selects_first_row() {
        let mut s = state();
        let t = ticket_of(s.open_selected_bot());
        assert!(s.is_busy());
        s.apply_fetch(FetchOutcome::History { ticket: t, commits: vec![commit("a1")] });
        assert_eq!(s.changelog_state.selected(), Some(0));
        assert!(!s.is_busy());
    }

    #[test]
    fn expanded_commit_rows_follow_detail_state() {
        let mut s = state();
        let t = ticket_of(s.open_selected_bot());
        s.apply_fetch(FetchOutcome::History { ticket: t, commits: vec![commit("a1"), commit("a2")] });
        let t = ticket_of(s.activate_row(&Theme::dark()));
        assert_eq!(
            s.changelog_rows(),
            vec![ChangelogRow::Commit(0), ChangelogRow::Notice, ChangelogRow::Commit(1)]
        );

        s.apply_fetch(FetchOutcome::Detail { ticket: t, sha: "a1".to_owned(), result: Err("boom".to_owned()) });
        assert!(matches!(s.nav.detail(), CommitDetail::Failed { .. }));

        s.changelog_state.select(Some(1));
        assert!(s.activate_row(&Theme::dark()).is_some(), "notice row retries");
    }

    #[test]
    fn loaded_files_become_rows_and_open_diffs() {
        let mut s = with_loaded_commit();
        assert_eq!(
            s.changelog_rows(),
            vec![
                ChangelogRow::Commit(0),
                ChangelogRow::File(0),
                ChangelogRow::File(1),
                ChangelogRow::Commit(1),
            ]
        );
        s.changelog_state.select(Some(1));
        assert!(s.activate_row(&Theme::dark()).is_none());
        assert_eq!(s.nav.view(), View::DiffView);
        assert_eq!(s.hunk_offsets, vec![0]);
        assert!(!s.diff_lines.is_empty());

        assert!(s.back());
        assert_eq!(s.nav.view(), View::BotDetail);
        assert!(s.diff_lines.is_empty());
        assert_eq!(s.nav.expanded_commit(), Some("a1"));
    }

    #[test]
    fn binary_file_opens_an_empty_diff() {
        let mut s = with_loaded_commit();
        s.open_file(1, &Theme::dark());
        assert_eq!(s.nav.view(), View::DiffView);
        assert!(s.diff_lines.is_empty());
        assert!(s.hunk_offsets.is_empty());
    }

    #[test]
    fn collapsing_keeps_cursor_on_the_commit() {
        let mut s = with_loaded_commit();
        s.changelog_state.select(Some(0));
        assert!(s.activate_row(&Theme::dark()).is_none());
        assert_eq!(s.nav.expanded_commit(), None);
        assert_eq!(s.changelog_state.selected(), Some(0));
        assert_eq!(s.nav.pending_detail(), None);
    }

    #[test]
    fn stale_history_leaves_rows_empty() {
        let mut s = state();
        let old = ticket_of(s.open_selected_bot());
        s.back();
        s.gallery_cursor = 2;
        let _ = s.open_selected_bot();
        s.apply_fetch(FetchOutcome::History { ticket: old, commits: vec![commit("a1")] });
        assert!(s.changelog_rows().is_empty());
        assert_eq!(s.changelog_state.selected(), None);
    }

    #[test]
    fn hunk_jumps_clamp() {
        let mut s = state();
        s.hunk_offsets = vec![0, 10, 20];
        s.next_hunk();
        s.next_hunk();
        s.next_hunk();
        assert_eq!(s.diff_scroll, 20);
        s.prev_hunk();
        assert_eq!(s.diff_scroll, 10);
    }

    #[test]
    fn spinner_only_turns_while_busy() {
        let mut s = state();
        let before = s.spinner_frame();
        s.on_tick();
        assert_eq!(s.spinner_frame(), before);
        let _ = s.open_selected_bot();
        s.on_tick();
        assert_ne!(s.spinner_frame(), before);
    }
}
