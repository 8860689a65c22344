//! Keybinding dispatcher for botshelf.
//!
//! Translates crossterm key and mouse events into `AppState` mutations and
//! returns a [`KeyAction`] telling the event loop what to do next. Dispatch
//! branches first on `state.mode` (overlays swallow keys), then on the current
//! view.

use botshelf_core::navigation::{Effect, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;

/// Control-flow signal returned from the dispatchers.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
    /// Start a background request.
    Fetch(Effect),
}

impl From<Option<Effect>> for KeyAction {
    fn from(effect: Option<Effect>) -> Self {
        effect.map_or(KeyAction::Continue, KeyAction::Fetch)
    }
}

/// Dispatches a key event to the handler matching the current mode.
///
/// `theme` is needed because opening a file highlights its patch.
pub fn handle_key(key: KeyEvent, state: &mut AppState, theme: &Theme) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::SubmitPanel => handle_submit(key, state),
        Mode::Normal => handle_normal(key, state, theme),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState, theme: &Theme) -> KeyAction {
    match key.code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            return KeyAction::Continue;
        }
        KeyCode::Char('n') => {
            state.mode = Mode::SubmitPanel;
            return KeyAction::Continue;
        }
        _ => {}
    }

    match state.nav.view() {
        View::Gallery => handle_gallery(key, state),
        View::BotDetail => handle_detail(key, state, theme),
        View::DiffView => handle_diff(key, state),
    }
}

fn handle_gallery(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => state.gallery_move(-1, 0),
        KeyCode::Char('l') | KeyCode::Right => state.gallery_move(1, 0),
        KeyCode::Char('k') | KeyCode::Up => state.gallery_move(0, -1),
        KeyCode::Char('j') | KeyCode::Down => state.gallery_move(0, 1),
        KeyCode::Char('g') | KeyCode::Home => state.gallery_first(),
        KeyCode::Char('G') | KeyCode::End => state.gallery_last(),
        KeyCode::Enter => return state.open_selected_bot().into(),
        _ => {}
    }
    KeyAction::Continue
}

fn handle_detail(key: KeyEvent, state: &mut AppState, theme: &Theme) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => {
            state.focus = state.focus.toggle();
            KeyAction::Continue
        }
        KeyCode::Enter if state.focus == PanelFocus::Changelog => {
            state.activate_row(theme).into()
        }
        KeyCode::Char('r') => state.retry().into(),
        KeyCode::Esc | KeyCode::Backspace => {
            state.back();
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

fn handle_diff(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }
    match key.code {
        KeyCode::Char('[') => state.prev_hunk(),
        KeyCode::Char(']') => state.next_hunk(),
        KeyCode::Esc | KeyCode::Backspace => {
            state.back();
        }
        _ => {}
    }
    KeyAction::Continue
}

/// j / k / g / G / Ctrl-d / Ctrl-u and arrows. `None` when not a scroll key.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') | KeyCode::Home => state.scroll_top(),
        KeyCode::Char('G') | KeyCode::End => state.scroll_bottom(),
        KeyCode::PageDown => state.half_page_down(),
        KeyCode::PageUp => state.half_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

fn handle_submit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('n') | KeyCode::Enter) {
        state.mode = Mode::Normal;
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Scroll wheel scrolls by 3 lines; a left click in the bot detail view
/// focuses the pane under the cursor.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if state.nav.view() == View::BotDetail => {
            let pos = Position { x: mouse.column, y: mouse.row };
            let [profile, changelog] = state.panel_rects;
            if profile.contains(pos) {
                state.focus = PanelFocus::Profile;
            } else if changelog.contains(pos) {
                state.focus = PanelFocus::Changelog;
            }
        }
        MouseEventKind::ScrollUp => match state.mode {
            Mode::HelpOverlay => state.help_scroll = state.help_scroll.saturating_sub(3),
            Mode::Normal => state.scroll_up(3),
            Mode::SubmitPanel => {}
        },
        MouseEventKind::ScrollDown => match state.mode {
            Mode::HelpOverlay => state.help_scroll = state.help_scroll.saturating_add(3),
            Mode::Normal => state.scroll_down(3),
            Mode::SubmitPanel => {}
        },
        _ => {}
    }
    KeyAction::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use botshelf_core::catalog::Catalog;
    use botshelf_core::types::{BotRecord, CommitSummary};

    use crate::config::SubmitInfo;
    use crate::github::worker::FetchOutcome;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> AppState {
        let record = |name: &str| BotRecord {
            name: name.to_owned(),
            avatar: String::new(),
            platform: String::new(),
            tagline: String::new(),
            description: String::new(),
            invite_link: String::new(),
            repo: Some(format!("owner/{name}")),
            features: Vec::new(),
            links: Vec::new(),
        };
        let catalog = Catalog::from_records(vec![record("one"), record("two")]).unwrap();
        AppState::new(catalog, SubmitInfo::default())
    }

    fn press(state: &mut AppState, code: KeyCode) -> KeyAction {
        handle_key(key(code), state, &Theme::dark())
    }

    #[test]
    fn enter_in_gallery_fetches_history() {
        let mut s = state();
        press(&mut s, KeyCode::Right);
        match press(&mut s, KeyCode::Enter) {
            KeyAction::Fetch(Effect::FetchHistory { repo, .. }) => assert_eq!(repo, "owner/two"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s.nav.view(), View::BotDetail);
    }

    #[test]
    fn q_closes_overlays_before_quitting() {
        let mut s = state();
        press(&mut s, KeyCode::Char('?'));
        assert_eq!(s.mode, Mode::HelpOverlay);
        assert_eq!(press(&mut s, KeyCode::Char('q')), KeyAction::Continue);
        assert_eq!(s.mode, Mode::Normal);

        press(&mut s, KeyCode::Char('n'));
        assert_eq!(s.mode, Mode::SubmitPanel);
        assert_eq!(press(&mut s, KeyCode::Char('q')), KeyAction::Continue);
        assert_eq!(press(&mut s, KeyCode::Char('q')), KeyAction::Quit);
    }

    #[test]
    fn overlays_swallow_navigation_keys() {
        let mut s = state();
        press(&mut s, KeyCode::Char('?'));
        assert_eq!(press(&mut s, KeyCode::Enter), KeyAction::Continue);
        assert_eq!(s.nav.view(), View::Gallery);
    }

    #[test]
    fn enter_on_commit_fetches_detail_and_esc_goes_back() {
        let mut s = state();
        let ticket = match press(&mut s, KeyCode::Enter) {
            KeyAction::Fetch(Effect::FetchHistory { ticket, .. }) => ticket,
            other => panic!("unexpected {other:?}"),
        };
        let commit = CommitSummary {
            sha: Some("abc1234".to_owned()),
            message: "first".to_owned(),
            date: chrono::Utc::now(),
            url: None,
        };
        s.apply_fetch(FetchOutcome::History { ticket, commits: vec![commit] });

        match press(&mut s, KeyCode::Enter) {
            KeyAction::Fetch(Effect::FetchDetail { sha, .. }) => assert_eq!(sha, "abc1234"),
            other => panic!("unexpected {other:?}"),
        }
        press(&mut s, KeyCode::Esc);
        assert_eq!(s.nav.view(), View::Gallery);
        assert_eq!(s.nav.pending_detail(), None);
    }

    #[test]
    fn tab_switches_detail_focus() {
        let mut s = state();
        press(&mut s, KeyCode::Enter);
        assert_eq!(s.focus, PanelFocus::Changelog);
        press(&mut s, KeyCode::Tab);
        assert_eq!(s.focus, PanelFocus::Profile);
        assert_eq!(press(&mut s, KeyCode::Enter), KeyAction::Continue);
    }

    #[test]
    fn retry_key_is_a_no_op_without_failure() {
        let mut s = state();
        press(&mut s, KeyCode::Enter);
        assert_eq!(press(&mut s, KeyCode::Char('r')), KeyAction::Continue);
    }
}
