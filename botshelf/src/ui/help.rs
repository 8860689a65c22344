//! Help overlay.
//!
//! Drawn inside the same `terminal.draw()` closure as the views: `Clear`
//! erases the centred area, then a bordered `Paragraph` lists the keys.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay scrolled by `help_scroll` rows.
///
/// Skipped below 40 columns, where the centred area would be too small.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help · j/k scroll, ? or Esc to close ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text(theme))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn section(title: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        title.to_owned(),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    ))
}

fn build_help_text(theme: &Theme) -> Text<'static> {
    Text::from(vec![
        section("Gallery", theme),
        Line::from("  h j k l / arrows   Move between bot cards"),
        Line::from("  g / G              First / last bot"),
        Line::from("  Enter              Open the bot's profile"),
        Line::from(""),
        section("Bot profile", theme),
        Line::from("  Tab                Switch between profile and changelog"),
        Line::from("  j / k              Scroll profile / move in changelog"),
        Line::from("  Enter              Expand or collapse a commit, open a file"),
        Line::from("  r                  Retry a failed commit fetch"),
        Line::from("  Esc / Backspace    Back to the gallery"),
        Line::from(""),
        section("Diff", theme),
        Line::from("  j / k              Scroll one line"),
        Line::from("  Ctrl-d / Ctrl-u    Scroll half a page"),
        Line::from("  g / G              Top / bottom"),
        Line::from("  [ / ]              Previous / next hunk"),
        Line::from("  Esc / Backspace    Back to the profile"),
        Line::from(""),
        section("General", theme),
        Line::from("  n                  How to submit your own bot"),
        Line::from("  ?                  Open / close this help"),
        Line::from("  q                  Close overlay, or quit"),
    ])
}
