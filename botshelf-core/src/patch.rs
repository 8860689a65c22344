//! Unified patch parsing for the diff viewer.
//!
//! GitHub reports one patch per changed file: a sequence of `@@` hunks with
//! no `---`/`+++` file header. Only the patch itself is shown; the full
//! before/after file contents are never reconstructed.

/// The type of change for a diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    Added,
    Removed,
    Context,
    /// `\ No newline at end of file`
    NoNewline,
}

/// A single line within a hunk, without its leading marker character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub content: String,
    pub old_lineno: Option<u32>,
    pub new_lineno: Option<u32>,
}

/// One `@@` block of a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchHunk {
    /// The raw `@@ -old_start,old_lines +new_start,new_lines @@` header line.
    /// Empty for the synthetic hunk of header-less text.
    pub header: String,
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    pub lines: Vec<DiffLine>,
}

impl PatchHunk {
    fn new(header: String, old: (u32, u32), new: (u32, u32)) -> Self {
        Self {
            header,
            old_start: old.0,
            old_lines: old.1,
            new_start: new.0,
            new_lines: new.1,
            lines: Vec::new(),
        }
    }
}

/// Parses `-start,len` / `+start,len`. A missing length means one line.
fn parse_range(token: &str, sign: char) -> Option<(u32, u32)> {
    let body = token.strip_prefix(sign)?;
    let (start, len) = match body.split_once(',') {
        Some((s, l)) => (s.parse().ok()?, l.parse().ok()?),
        None => (body.parse().ok()?, 1),
    };
    Some((start, len))
}

/// Parses a hunk header such as `@@ -10,7 +10,8 @@ fn main() {`.
fn parse_header(line: &str) -> Option<((u32, u32), (u32, u32))> {
    let rest = line.strip_prefix("@@ ")?;
    let (ranges, _) = rest.split_once(" @@")?;
    let (old, new) = ranges.split_once(' ')?;
    Some((parse_range(old, '-')?, parse_range(new, '+')?))
}

/// Splits patch text into hunks with old/new line numbers.
///
/// Text that contains no hunk header before its first line is treated as a
/// file added from nothing: every line becomes an addition numbered from 1.
/// An empty patch yields no hunks.
pub fn parse_patch(text: &str) -> Vec<PatchHunk> {
    let mut hunks: Vec<PatchHunk> = Vec::new();
    let mut old_no = 0u32;
    let mut new_no = 0u32;

    for raw in text.lines() {
        if let Some((old, new)) = parse_header(raw) {
            old_no = old.0;
            new_no = new.0;
            hunks.push(PatchHunk::new(raw.to_owned(), old, new));
            continue;
        }

        match hunks.last().map(|h| h.header.is_empty()) {
            None => {
                hunks.push(PatchHunk::new(String::new(), (0, 0), (1, 0)));
                new_no = 1;
                push_implicit_addition(&mut hunks, raw, &mut new_no);
                continue;
            }
            Some(true) => {
                push_implicit_addition(&mut hunks, raw, &mut new_no);
                continue;
            }
            Some(false) => {}
        }

        let (kind, content) = match raw.chars().next() {
            Some('+') => (DiffLineKind::Added, &raw[1..]),
            Some('-') => (DiffLineKind::Removed, &raw[1..]),
            Some('\\') => (DiffLineKind::NoNewline, raw),
            Some(' ') => (DiffLineKind::Context, &raw[1..]),
            // GitHub strips the space marker from blank context lines.
            _ => (DiffLineKind::Context, raw),
        };
        let (old_lineno, new_lineno) = match kind {
            DiffLineKind::Added => (None, Some(new_no)),
            DiffLineKind::Removed => (Some(old_no), None),
            DiffLineKind::Context => (Some(old_no), Some(new_no)),
            DiffLineKind::NoNewline => (None, None),
        };
        match kind {
            DiffLineKind::Added => new_no += 1,
            DiffLineKind::Removed => old_no += 1,
            DiffLineKind::Context => {
                old_no += 1;
                new_no += 1;
            }
            DiffLineKind::NoNewline => {}
        }
        if let Some(hunk) = hunks.last_mut() {
            hunk.lines.push(DiffLine {
                kind,
                content: content.to_owned(),
                old_lineno,
                new_lineno,
            });
        }
    }

    hunks
}

fn push_implicit_addition(hunks: &mut [PatchHunk], raw: &str, new_no: &mut u32) {
    if let Some(hunk) = hunks.last_mut() {
        hunk.lines.push(DiffLine {
            kind: DiffLineKind::Added,
            content: raw.to_owned(),
            old_lineno: None,
            new_lineno: Some(*new_no),
        });
        hunk.new_lines += 1;
        *new_no += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_lines_from_hunk_header() {
        let patch = "@@ -3,3 +3,4 @@ fn main() {\n keep\n-old\n+new\n+extra\n keep2";
        let hunks = parse_patch(patch);
        assert_eq!(hunks.len(), 1);
        let h = &hunks[0];
        assert_eq!((h.old_start, h.old_lines, h.new_start, h.new_lines), (3, 3, 3, 4));
        let numbers: Vec<_> = h.lines.iter().map(|l| (l.old_lineno, l.new_lineno)).collect();
        assert_eq!(
            numbers,
            vec![
                (Some(3), Some(3)),
                (Some(4), None),
                (None, Some(4)),
                (None, Some(5)),
                (Some(5), Some(6)),
            ]
        );
        assert_eq!(h.lines[1].content, "old");
    }

    #[test]
    fn header_without_lengths_means_one_line() {
        let hunks = parse_patch("@@ -1 +1 @@\n-a\n+b");
        assert_eq!(hunks[0].old_lines, 1);
        assert_eq!(hunks[0].new_lines, 1);
    }

    #[test]
    fn multiple_hunks_restart_numbering() {
        let patch = "@@ -1,1 +1,1 @@\n-a\n+b\n@@ -40,2 +40,2 @@\n x\n-y\n+z";
        let hunks = parse_patch(patch);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[1].lines[0].old_lineno, Some(40));
        assert_eq!(hunks[1].lines[2].new_lineno, Some(41));
    }

    #[test]
    fn headerless_text_is_all_additions() {
        let hunks = parse_patch("first\nsecond");
        assert_eq!(hunks.len(), 1);
        assert!(hunks[0].header.is_empty());
        assert!(hunks[0].lines.iter().all(|l| l.kind == DiffLineKind::Added));
        assert_eq!(hunks[0].lines[1].new_lineno, Some(2));
        assert_eq!(hunks[0].new_lines, 2);
    }

    #[test]
    fn no_newline_marker_is_not_numbered() {
        let hunks = parse_patch("@@ -1 +1 @@\n-a\n\\ No newline at end of file\n+b");
        let marker = &hunks[0].lines[1];
        assert_eq!(marker.kind, DiffLineKind::NoNewline);
        assert_eq!(hunks[0].lines[2].new_lineno, Some(1));
    }

    #[test]
    fn empty_patch_has_no_hunks() {
        assert!(parse_patch("").is_empty());
    }
}
