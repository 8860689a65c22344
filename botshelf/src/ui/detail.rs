//! Bot detail view: profile pane and changelog pane.
//!
//! The profile is a wrapped `Paragraph` scrolled by `profile_scroll`. The
//! changelog is a `List` over [`AppState::changelog_rows`], so the expanded
//! commit's files (or its loading / error notice) appear inline below it.

use botshelf_core::types::{BotRecord, Changelog, CommitDetail, CommitSummary, FileChange};
use chrono::Local;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{List, ListItem, Paragraph, Wrap},
};

use crate::app::{AppState, ChangelogRow, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{detail_panes, inner_rect, panel_block};

pub fn render_detail(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let Some(bot) = state.nav.selected_bot().cloned() else {
        return;
    };
    let [profile, changelog] = detail_panes(area);
    state.panel_rects = [profile, changelog];
    state.profile_viewport_height = inner_rect(profile).height;
    state.changelog_viewport_height = inner_rect(changelog).height;

    render_profile(frame, profile, &bot, state, theme);
    render_changelog(frame, changelog, &bot, state, theme);
}

fn heading(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        text.to_owned(),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    ))
}

fn labelled(label: &str, value: &str, value_style: Style, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<8}"), Style::default().fg(theme.muted)),
        Span::styled(value.to_owned(), value_style),
    ])
}

fn profile_text(bot: &BotRecord, theme: &Theme) -> Text<'static> {
    let link = Style::default().fg(theme.link).add_modifier(Modifier::UNDERLINED);
    let mut lines = vec![
        Line::from(Span::styled(
            bot.name.clone(),
            Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
        )),
    ];
    if !bot.tagline.is_empty() {
        lines.push(Line::from(Span::styled(
            bot.tagline.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    if !bot.platform.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" {} ", bot.platform),
            Style::default().fg(theme.badge_fg).bg(theme.badge_bg),
        )));
    }
    lines.push(Line::default());
    if !bot.invite_link.is_empty() {
        lines.push(labelled("Invite", &bot.invite_link, link, theme));
    }
    if let Some(repo) = bot.repository() {
        lines.push(labelled("Repo", repo, Style::default(), theme));
    }
    if !bot.avatar.is_empty() {
        lines.push(labelled("Avatar", &bot.avatar, Style::default().fg(theme.muted), theme));
    }

    if !bot.description.is_empty() {
        lines.push(Line::default());
        lines.extend(bot.description.lines().map(|l| Line::from(l.to_owned())));
    }

    if !bot.features.is_empty() {
        lines.push(Line::default());
        lines.push(heading("Features", theme));
        for feature in &bot.features {
            lines.push(Line::from(vec![
                Span::styled("• ", Style::default().fg(theme.accent)),
                Span::styled(feature.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ]));
            if !feature.description.is_empty() {
                lines.push(Line::from(format!("  {}", feature.description)));
            }
            if !feature.image.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", feature.image),
                    Style::default().fg(theme.muted),
                )));
            }
        }
    }

    if !bot.links.is_empty() {
        lines.push(Line::default());
        lines.push(heading("Tutorials", theme));
        for entry in &bot.links {
            lines.push(Line::from(vec![
                Span::styled("• ", Style::default().fg(theme.accent)),
                Span::raw(format!("{}  ", entry.label)),
                Span::styled(entry.url.clone(), link),
            ]));
            if !entry.description.is_empty() {
                lines.push(Line::from(format!("  {}", entry.description)));
            }
        }
    }

    Text::from(lines)
}

fn render_profile(frame: &mut Frame, area: Rect, bot: &BotRecord, state: &mut AppState, theme: &Theme) {
    let focused = state.focus == PanelFocus::Profile;
    let text = profile_text(bot, theme);

    // Wrapped height is not known here; clamp to the unwrapped line count.
    let max_scroll = text.lines.len().saturating_sub(1).min(u16::MAX as usize) as u16;
    state.profile_scroll = state.profile_scroll.min(max_scroll);

    frame.render_widget(
        Paragraph::new(text)
            .block(panel_block(" Profile ", focused, theme))
            .wrap(Wrap { trim: false })
            .scroll((state.profile_scroll, 0)),
        area,
    );
}

fn commit_item(commit: &CommitSummary, expanded: bool, theme: &Theme) -> ListItem<'static> {
    if commit.is_placeholder() {
        return ListItem::new(Line::from(Span::styled(
            commit.message.clone(),
            Style::default().fg(theme.error).add_modifier(Modifier::ITALIC),
        )));
    }
    let marker = if expanded { "▾ " } else { "▸ " };
    let date = commit.date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string();
    ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(theme.muted)),
        Span::styled(format!("{} ", commit.short_sha()), Style::default().fg(theme.accent)),
        Span::raw(commit.headline().to_owned()),
        Span::styled(format!("  {date}"), Style::default().fg(theme.muted)),
    ]))
}

fn file_item(file: &FileChange, theme: &Theme) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::raw(format!("    {}  ", file.filename)),
        Span::styled(format!("+{}", file.additions), Style::default().fg(theme.diff_added)),
        Span::raw(" "),
        Span::styled(format!("-{}", file.deletions), Style::default().fg(theme.diff_removed)),
    ]))
}

fn notice_item(detail: &CommitDetail, spinner: &str, theme: &Theme) -> ListItem<'static> {
    let line = match detail {
        CommitDetail::Loading { .. } => Line::from(Span::styled(
            format!("    {spinner} Loading files…"),
            Style::default().fg(theme.muted),
        )),
        CommitDetail::Failed { reason, .. } => Line::from(vec![
            Span::styled(format!("    ✗ {reason}"), Style::default().fg(theme.error)),
            Span::styled("  (r to retry)", Style::default().fg(theme.muted)),
        ]),
        _ => Line::from(Span::styled("    No files changed.", Style::default().fg(theme.muted))),
    };
    ListItem::new(line)
}

fn render_changelog(frame: &mut Frame, area: Rect, bot: &BotRecord, state: &mut AppState, theme: &Theme) {
    let focused = state.focus == PanelFocus::Changelog;
    let title = match bot.repository() {
        Some(repo) => format!(" Changelog · {repo} "),
        None => " Changelog ".to_owned(),
    };
    let block = panel_block(title, focused, theme);

    let message = match state.nav.changelog() {
        Changelog::Idle | Changelog::Loading => {
            Some(format!("{} Loading changelog…", state.spinner_frame()))
        }
        Changelog::Unlinked => Some("No repository linked to this bot.".to_owned()),
        Changelog::Ready(commits) if commits.is_empty() => Some("No commits yet.".to_owned()),
        Changelog::Ready(_) => None,
    };
    if let Some(message) = message {
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(theme.muted))).block(block),
            area,
        );
        return;
    }

    let expanded = state.nav.expanded_commit();
    let detail = state.nav.detail();
    let items: Vec<ListItem> = state
        .changelog_rows()
        .into_iter()
        .filter_map(|row| match row {
            ChangelogRow::Commit(i) => state.commit(i).map(|c| {
                let is_expanded = expanded.is_some() && c.sha.as_deref() == expanded;
                commit_item(c, is_expanded, theme)
            }),
            ChangelogRow::File(j) => detail.files().get(j).map(|f| file_item(f, theme)),
            ChangelogRow::Notice => Some(notice_item(detail, state.spinner_frame(), theme)),
        })
        .collect();

    let highlight = if focused {
        Style::default().fg(theme.selection).add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(items).block(block).highlight_style(highlight);
    frame.render_stateful_widget(list, area, &mut state.changelog_state);
}
