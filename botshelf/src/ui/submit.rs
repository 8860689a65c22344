//! "Submit your bot" panel, filled from the `[submit]` config table.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};

use crate::config::SubmitInfo;
use crate::theme::Theme;

pub fn render_submit_panel(frame: &mut Frame, info: &SubmitInfo, theme: &Theme) {
    let area = frame
        .area()
        .centered(Constraint::Percentage(60), Constraint::Length(12));
    frame.render_widget(Clear, area);

    let label = Style::default().fg(theme.muted);
    let text = Text::from(vec![
        Line::from(Span::styled(
            "Want your bot listed here?",
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(vec![
            Span::styled("Template  ", label),
            Span::styled(info.template.clone(), Style::default().fg(theme.link)),
        ]),
        Line::from(vec![
            Span::styled("Send to   ", label),
            Span::styled(info.contact.clone(), Style::default().fg(theme.accent)),
        ]),
        Line::default(),
        Line::from(info.rules.clone()),
    ]);

    frame.render_widget(
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme.border_active))
                    .title(" Submit a bot · Esc to close "),
            )
            .wrap(Wrap { trim: true }),
        area,
    );
}
