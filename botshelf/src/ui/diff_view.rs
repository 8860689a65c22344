//! Diff view of a single changed file.
//!
//! Uses a `List` with manual virtual scrolling: only
//! `diff_lines[diff_scroll..diff_scroll + viewport]` is materialized per frame.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

pub fn render_diff(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let Some(file) = state.nav.viewing_diff() else {
        return;
    };
    let title = Line::from(vec![
        Span::raw(format!(" {}  ", file.filename)),
        Span::styled(format!("+{}", file.additions), Style::default().fg(theme.diff_added)),
        Span::raw(" "),
        Span::styled(format!("-{} ", file.deletions), Style::default().fg(theme.diff_removed)),
    ]);
    frame.render_widget(panel_block(title, true, theme), area);

    let inner = inner_rect(area);
    state.diff_viewport_height = inner.height;

    if state.diff_lines.is_empty() {
        let msg = Paragraph::new(Span::styled(
            "No textual patch for this file (binary or too large).",
            Style::default().fg(theme.muted),
        ));
        frame.render_widget(msg, inner);
        return;
    }

    let total = state.diff_lines.len();
    let visible_start = state.diff_scroll.min(total.saturating_sub(1));
    let visible_end = (visible_start + inner.height as usize).min(total);

    let items: Vec<ListItem> = state.diff_lines[visible_start..visible_end]
        .iter()
        .map(|l| ListItem::new(l.clone()))
        .collect();
    frame.render_widget(List::new(items), inner);
}
