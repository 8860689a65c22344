//! Layout helpers shared by every view.
//!
//! Pure layout arithmetic plus the two widgets every frame needs: the panel
//! block and the status bar. Called inside `terminal.draw()` on every render,
//! so each frame's geometry reflects the current terminal size.

use botshelf_core::navigation::View;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::AppState;
use crate::theme::Theme;

/// Width below which the detail panes stack vertically.
const SIDE_BY_SIDE_MIN_WIDTH: u16 = 100;

/// Returns `[main, status_bar]` for the current frame.
pub fn compute_layout(frame: &Frame) -> [Rect; 2] {
    frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]))
}

/// Splits the bot detail area into `[profile, changelog]`.
///
/// Side by side (40 / 60) on wide terminals with merged borders, stacked on
/// narrow ones.
pub fn detail_panes(area: Rect) -> [Rect; 2] {
    if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
        area.layout(
            &Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .spacing(Spacing::Overlap(1)),
        )
    } else {
        area.layout(
            &Layout::vertical([Constraint::Percentage(45), Constraint::Percentage(55)])
                .spacing(Spacing::Overlap(1)),
        )
    }
}

/// Inner `Rect` of a bordered panel.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered panel block: thick and `border_active` when focused.
///
/// `MergeStrategy::Fuzzy` because `Exact` draws wrong junctions when a
/// `Thick` border meets a `Plain` one.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Breadcrumb for the status bar: bot > short sha > file.
pub fn breadcrumb(state: &AppState) -> String {
    let mut parts = Vec::new();
    if let Some(bot) = state.nav.selected_bot() {
        parts.push(bot.name.clone());
    }
    if let Some(sha) = state.nav.expanded_commit() {
        parts.push(sha.get(..7).unwrap_or(sha).to_owned());
    }
    if let Some(file) = state.nav.viewing_diff() {
        parts.push(file.filename.clone());
    }
    parts.join(" › ")
}

/// Renders the 1-row status bar: view name, breadcrumb, and a spinner while
/// any request is pending. Never renders blank.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let view = match state.nav.view() {
        View::Gallery => " GALLERY ",
        View::BotDetail => " BOT ",
        View::DiffView => " DIFF ",
    };

    let mut spans = vec![Span::styled(
        view,
        Style::default().fg(theme.status_view).add_modifier(Modifier::BOLD),
    )];
    let crumb = breadcrumb(state);
    if !crumb.is_empty() {
        spans.push(Span::raw(format!(" {crumb} ")));
    }
    if state.is_busy() {
        spans.push(Span::styled(
            format!(" {} fetching ", state.spinner_frame()),
            Style::default().fg(theme.accent),
        ));
    }

    let [left, right] =
        area.layout(&Layout::horizontal([Constraint::Fill(1), Constraint::Length(22)]));
    let style = Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg);
    frame.render_widget(Paragraph::new(Line::from(spans)).style(style), left);
    frame.render_widget(
        Paragraph::new("n submit  ? help  q quit ").style(style).right_aligned(),
        right,
    );
}
