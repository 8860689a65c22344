//! Gallery grid of bot cards.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Wrap},
};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Rows per card: border, name, badge, two description lines, border.
const CARD_HEIGHT: u16 = 6;

/// Three columns from this width, two below it.
const WIDE_MIN_WIDTH: u16 = 90;

pub fn columns_for(width: u16) -> usize {
    if width >= WIDE_MIN_WIDTH { 3 } else { 2 }
}

/// First grid row to draw so that `cursor_row` stays visible.
fn first_visible_row(cursor_row: usize, visible_rows: usize) -> usize {
    cursor_row.saturating_sub(visible_rows.saturating_sub(1))
}

pub fn render_gallery(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let title = format!(" Bots ({}) ", state.catalog.len());
    frame.render_widget(panel_block(title, true, theme), area);
    let inner = inner_rect(area);

    if state.catalog.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from("No bots in the catalog."),
            Line::from(Span::styled(
                "Add JSON files to the catalog directory and restart.",
                Style::default().fg(theme.muted),
            )),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(msg, inner);
        return;
    }

    let columns = columns_for(inner.width);
    state.gallery_columns = columns;
    state.gallery_cursor = state.gallery_cursor.min(state.catalog.len() - 1);

    let visible_rows = (inner.height / CARD_HEIGHT).max(1) as usize;
    let first_row = first_visible_row(state.gallery_cursor / columns, visible_rows);

    let row_areas = inner.layout_vec(&Layout::vertical(
        std::iter::repeat_n(Constraint::Length(CARD_HEIGHT), visible_rows),
    ));
    let col_constraints = std::iter::repeat_n(Constraint::Ratio(1, columns as u32), columns);

    for (r, row_area) in row_areas.iter().enumerate() {
        let cells = row_area.layout_vec(&Layout::horizontal(col_constraints.clone()));
        for (c, cell) in cells.iter().enumerate() {
            let index = (first_row + r) * columns + c;
            let Some(bot) = state.catalog.get(index) else {
                return;
            };
            let selected = index == state.gallery_cursor;
            let block = if selected {
                Block::bordered()
                    .border_type(BorderType::Thick)
                    .border_style(Style::default().fg(theme.selection))
            } else {
                Block::bordered().border_style(Style::default().fg(theme.border_inactive))
            };

            let blurb = if bot.tagline.is_empty() { &bot.description } else { &bot.tagline };
            let name_style = if selected {
                Style::default().fg(theme.selection).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.title).add_modifier(Modifier::BOLD)
            };
            let mut lines = vec![Line::from(Span::styled(bot.name.clone(), name_style))];
            if !bot.platform.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!(" {} ", bot.platform),
                    Style::default().fg(theme.badge_fg).bg(theme.badge_bg),
                )));
            }
            lines.push(Line::from(Span::styled(blurb.clone(), Style::default().fg(theme.muted))));

            frame.render_widget(
                Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
                *cell,
            );
        }
    }
}
