//! Turns parsed patch hunks into styled ratatui lines for the diff view.
//!
//! Code is syntax-highlighted with syntect (syntax picked by file extension).
//! A removed line directly followed by an added line is treated as an edit
//! and rendered with word-level emphasis computed by `similar`. Every output
//! line is `'static` so the result can be cached in `AppState` and reused
//! across frames until another diff is opened.

use std::sync::LazyLock;

use botshelf_core::patch::{DiffLine, DiffLineKind, PatchHunk};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use similar::{ChangeTag, TextDiff};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

use crate::theme::Theme;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Styled lines of one file's patch.
#[derive(Debug, Default)]
pub struct HighlightedPatch {
    pub lines: Vec<Line<'static>>,
    /// Indices into `lines` where each hunk starts (for `[` / `]`).
    pub hunk_offsets: Vec<usize>,
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
///
/// Background colors are dropped so the diff colors stay readable.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::FontStyle;
    let mut ratatui_style = Style::default();
    if style.foreground.a > 0 {
        let c = style.foreground;
        ratatui_style = ratatui_style.fg(Color::Rgb(c.r, c.g, c.b));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    Span::styled(content.to_owned(), ratatui_style)
}

/// Highlights one line of code; plain span on highlighter error.
fn code_spans(code: &str, h: Option<&mut HighlightLines>) -> Vec<Span<'static>> {
    let Some(h) = h else {
        return vec![Span::raw(code.to_owned())];
    };
    let ranges = h.highlight_line(code, &PS).unwrap_or_default();
    let spans: Vec<Span<'static>> =
        ranges.into_iter().map(|(style, text)| syntect_to_span(style, text)).collect();
    if spans.is_empty() {
        vec![Span::raw(code.to_owned())]
    } else {
        spans
    }
}

/// Word-level spans for a removed/added pair. Changed words are bold.
fn word_diff_spans(
    old_line: &str,
    new_line: &str,
    theme: &Theme,
) -> (Vec<Span<'static>>, Vec<Span<'static>>) {
    let diff = TextDiff::from_words(old_line, new_line);
    let mut old_spans = Vec::new();
    let mut new_spans = Vec::new();

    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            for (emphasized, value) in change.iter_strings_lossy() {
                let text = value.into_owned();
                let emphasis = |color: Color| {
                    let style = Style::default().fg(color);
                    if emphasized {
                        style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                    } else {
                        style
                    }
                };
                match change.tag() {
                    ChangeTag::Delete => {
                        old_spans.push(Span::styled(text, emphasis(theme.diff_removed)))
                    }
                    ChangeTag::Insert => {
                        new_spans.push(Span::styled(text, emphasis(theme.diff_added)))
                    }
                    ChangeTag::Equal => {
                        let span = Span::styled(text, Style::default().fg(theme.diff_context));
                        old_spans.push(span.clone());
                        new_spans.push(span);
                    }
                }
            }
        }
    }
    (old_spans, new_spans)
}

fn gutter(line: &DiffLine, theme: &Theme) -> Span<'static> {
    let num = |n: Option<u32>| n.map(|n| format!("{n:>4}")).unwrap_or_else(|| "    ".to_owned());
    Span::styled(
        format!("{} {} │", num(line.old_lineno), num(line.new_lineno)),
        Style::default().fg(theme.line_number),
    )
}

fn marker(kind: DiffLineKind, theme: &Theme) -> Span<'static> {
    match kind {
        DiffLineKind::Added => Span::styled(" + ", Style::default().fg(theme.diff_added)),
        DiffLineKind::Removed => Span::styled(" - ", Style::default().fg(theme.diff_removed)),
        _ => Span::raw("   "),
    }
}

fn assemble(line: &DiffLine, body: Vec<Span<'static>>, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(body.len() + 2);
    spans.push(gutter(line, theme));
    spans.push(marker(line.kind, theme));
    spans.extend(body);
    Line::from(spans)
}

/// Highlights `hunks` of the file named `filename`.
pub fn highlight_patch(filename: &str, hunks: &[PatchHunk], theme: &Theme) -> HighlightedPatch {
    let ext = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("txt");
    let syntax = PS
        .find_syntax_by_extension(ext)
        .unwrap_or_else(|| PS.find_syntax_plain_text());
    let syntect_theme = TS.themes.get("base16-ocean.dark").or_else(|| TS.themes.values().next());

    let mut out = HighlightedPatch::default();

    for hunk in hunks {
        out.hunk_offsets.push(out.lines.len());
        if !hunk.header.is_empty() {
            out.lines.push(Line::from(Span::styled(
                hunk.header.clone(),
                Style::default().fg(theme.diff_hunk_header),
            )));
        }

        // Fresh highlighter per hunk: hunks are not contiguous source.
        let mut h = syntect_theme.map(|t| HighlightLines::new(syntax, t));
        let mut pending_removed: Option<&DiffLine> = None;

        for dl in &hunk.lines {
            match dl.kind {
                DiffLineKind::Removed => {
                    if let Some(prev) = pending_removed.take() {
                        let body = code_spans(&prev.content, h.as_mut());
                        out.lines.push(assemble(prev, body, theme));
                    }
                    pending_removed = Some(dl);
                }
                DiffLineKind::Added => {
                    if let Some(prev) = pending_removed.take() {
                        let (old_words, new_words) = word_diff_spans(&prev.content, &dl.content, theme);
                        out.lines.push(assemble(prev, old_words, theme));
                        out.lines.push(assemble(dl, new_words, theme));
                        // Keep syntect's parse state in step with the source.
                        let _ = code_spans(&dl.content, h.as_mut());
                    } else {
                        let body = code_spans(&dl.content, h.as_mut());
                        out.lines.push(assemble(dl, body, theme));
                    }
                }
                DiffLineKind::Context => {
                    if let Some(prev) = pending_removed.take() {
                        let body = code_spans(&prev.content, h.as_mut());
                        out.lines.push(assemble(prev, body, theme));
                    }
                    let body = code_spans(&dl.content, h.as_mut());
                    out.lines.push(assemble(dl, body, theme));
                }
                DiffLineKind::NoNewline => {
                    if let Some(prev) = pending_removed.take() {
                        let body = code_spans(&prev.content, h.as_mut());
                        out.lines.push(assemble(prev, body, theme));
                    }
                    let body = vec![Span::styled(
                        dl.content.clone(),
                        Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
                    )];
                    out.lines.push(assemble(dl, body, theme));
                }
            }
        }
        if let Some(prev) = pending_removed.take() {
            let body = code_spans(&prev.content, h.as_mut());
            out.lines.push(assemble(prev, body, theme));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use botshelf_core::patch::parse_patch;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn header_and_lines_with_gutter() {
        let hunks = parse_patch("@@ -1,2 +1,2 @@\n keep\n-let x = 1;\n+let x = 2;");
        let out = highlight_patch("main.rs", &hunks, &Theme::dark());
        assert_eq!(out.hunk_offsets, vec![0]);
        assert_eq!(out.lines.len(), 4);
        assert!(text(&out.lines[0]).starts_with("@@ -1,2 +1,2 @@"));
        assert_eq!(text(&out.lines[1]), "   1    1 │   keep");
        assert_eq!(text(&out.lines[2]), "   2      │ - let x = 1;");
        assert_eq!(text(&out.lines[3]), "        2 │ + let x = 2;");
    }

    #[test]
    fn hunk_offsets_point_at_headers() {
        let hunks = parse_patch("@@ -1 +1 @@\n-a\n+b\n@@ -9 +9 @@\n-c\n+d");
        let out = highlight_patch("notes", &hunks, &Theme::dark());
        assert_eq!(out.hunk_offsets, vec![0, 3]);
    }

    #[test]
    fn unpaired_removals_are_flushed() {
        let hunks = parse_patch("@@ -1,2 +1,0 @@\n-a\n-b");
        let out = highlight_patch("x.txt", &hunks, &Theme::dark());
        assert_eq!(out.lines.len(), 3);
    }
}
