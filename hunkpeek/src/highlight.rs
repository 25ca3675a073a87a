//! Syntax and word-level highlighting of extracted hunks.
//!
//! Produces exactly one ratatui `Line` per hunk line so renderers can index the
//! result with `ExtractedHunk::highlight_index` directly.

use std::sync::LazyLock;

use hunkpeek_core::{DiffLine, ExtractedHunk, LineKind};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use similar::{ChangeTag, TextDiff};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Loads the syntax and theme sets ahead of the first show.
pub fn warm_up() {
    let _ = &*PS;
    let _ = &*TS;
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
///
/// Only the foreground is taken over; diff colors own the background.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::FontStyle;
    let fg = style.foreground;
    let mut ratatui_style = Style::default();
    if fg.a > 0 {
        ratatui_style = ratatui_style.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    Span::styled(content.to_owned(), ratatui_style)
}

/// Builds syntect-highlighted spans for a single line of code.
///
/// Falls back to a plain unstyled span on error.
fn build_syntect_spans(code: &str, h: &mut HighlightLines) -> Vec<Span<'static>> {
    // The newline-aware syntax set expects line terminators.
    let with_newline = format!("{code}\n");
    let ranges = h.highlight_line(&with_newline, &PS).unwrap_or_default();
    let spans: Vec<Span<'static>> = ranges
        .into_iter()
        .map(|(style, text)| syntect_to_span(style, text.trim_end_matches('\n')))
        .filter(|s| !s.content.is_empty())
        .collect();
    if spans.is_empty() {
        vec![Span::raw(code.to_owned())]
    } else {
        spans
    }
}

/// Computes word-level diff spans for a removed/added line pair.
///
/// Returns parallel old/new span lists. Changed words are bold.
fn word_diff_spans(old_line: &str, new_line: &str) -> (Vec<Span<'static>>, Vec<Span<'static>>) {
    let diff = TextDiff::from_words(old_line, new_line);
    let mut old_spans: Vec<Span<'static>> = Vec::new();
    let mut new_spans: Vec<Span<'static>> = Vec::new();

    for op in diff.ops() {
        for change in diff.iter_inline_changes(op) {
            for (emphasized, value) in change.iter_strings_lossy() {
                let text = value.into_owned();
                let emphasis = |base: Style| {
                    if emphasized { base.add_modifier(Modifier::BOLD) } else { base }
                };
                match change.tag() {
                    ChangeTag::Delete => {
                        old_spans.push(Span::styled(text, emphasis(Style::default().fg(Color::Red))));
                    }
                    ChangeTag::Insert => {
                        new_spans
                            .push(Span::styled(text, emphasis(Style::default().fg(Color::Green))));
                    }
                    ChangeTag::Equal => {
                        let span = Span::styled(text, Style::default().fg(Color::DarkGray));
                        old_spans.push(span.clone());
                        new_spans.push(span);
                    }
                }
            }
        }
    }
    (old_spans, new_spans)
}

fn marker(kind: LineKind) -> Span<'static> {
    match kind {
        LineKind::Added => Span::styled("+ ", Style::default().fg(Color::Green)),
        LineKind::Removed => Span::styled("- ", Style::default().fg(Color::Red)),
        LineKind::Context | LineKind::HunkHeader => {
            Span::styled("  ", Style::default().fg(Color::DarkGray))
        }
    }
}

fn with_marker(kind: LineKind, body: Vec<Span<'static>>) -> Line<'static> {
    let mut spans = vec![marker(kind)];
    spans.extend(body);
    Line::from(spans)
}

/// Highlights the body lines of `hunk` for a file with extension `ext`.
///
/// A removed line directly followed by an added line is shown as a word diff;
/// everything else gets syntax colors. The output has the same length and
/// order as `hunk.lines`.
///
/// # Arguments
///
/// * `hunk` — the extracted hunk to highlight
/// * `ext` — file extension used to pick a syntax, e.g. `"rs"`
pub fn highlight_hunk(hunk: &ExtractedHunk, ext: &str) -> Vec<Line<'static>> {
    let theme = TS.themes.get("base16-ocean.dark").or_else(|| TS.themes.values().next());
    let Some(theme) = theme else {
        return hunk.lines.iter().map(plain_line).collect();
    };
    let syntax = PS.find_syntax_by_extension(ext).unwrap_or_else(|| PS.find_syntax_plain_text());
    let mut h = HighlightLines::new(syntax, theme);

    let mut out: Vec<Line<'static>> = Vec::with_capacity(hunk.lines.len());
    let mut pending_removed: Option<(String, Vec<Span<'static>>)> = None;

    for dl in &hunk.lines {
        let code = dl.content();
        let base_spans = if dl.is_no_newline_marker() {
            vec![Span::styled(dl.text.clone(), Style::default().fg(Color::DarkGray))]
        } else {
            build_syntect_spans(code, &mut h)
        };

        match dl.kind {
            LineKind::Removed => {
                if let Some((_, spans)) = pending_removed.take() {
                    out.push(with_marker(LineKind::Removed, spans));
                }
                pending_removed = Some((code.to_owned(), base_spans));
            }
            LineKind::Added => {
                if let Some((old_code, _)) = pending_removed.take() {
                    let (old_word, new_word) = word_diff_spans(&old_code, code);
                    out.push(with_marker(LineKind::Removed, old_word));
                    out.push(with_marker(LineKind::Added, new_word));
                } else {
                    out.push(with_marker(LineKind::Added, base_spans));
                }
            }
            LineKind::Context | LineKind::HunkHeader => {
                if let Some((_, spans)) = pending_removed.take() {
                    out.push(with_marker(LineKind::Removed, spans));
                }
                out.push(with_marker(dl.kind, base_spans));
            }
        }
    }
    if let Some((_, spans)) = pending_removed.take() {
        out.push(with_marker(LineKind::Removed, spans));
    }
    out
}

/// Uncolored fallback used when no syntect theme is available.
fn plain_line(dl: &DiffLine) -> Line<'static> {
    let color = match dl.kind {
        LineKind::Added => Color::Green,
        LineKind::Removed => Color::Red,
        _ => Color::DarkGray,
    };
    Line::from(Span::styled(dl.text.clone(), Style::default().fg(color)))
}

/// Extracts the file extension used for syntax lookup; `"txt"` when absent.
pub fn file_ext(path: &std::path::Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "txt".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hunkpeek_core::{locate, BoundaryPattern, DiffText, HunkExtractor};

    fn extract(raw: &str, cursor: usize) -> ExtractedHunk {
        let diff = DiffText::parse(raw, &BoundaryPattern::default());
        let mut extractor = HunkExtractor::new();
        extractor.extract(&diff, locate(&diff, cursor), cursor).unwrap()
    }

    #[test]
    fn one_line_out_per_hunk_line() {
        let hunk = extract(
            "@@ -1,4 +1,4 @@\n fn main() {\n-    let x = 1;\n-    let y = 2;\n+    let x = 3;\n }\n",
            2,
        );
        let lines = highlight_hunk(&hunk, "rs");
        assert_eq!(lines.len(), hunk.lines.len());
    }

    #[test]
    fn paired_change_is_word_diffed_in_order() {
        let hunk = extract("@@ -1 +1 @@\n-let a = 1;\n+let a = 2;\n", 1);
        let lines = highlight_hunk(&hunk, "rs");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "- ");
        assert_eq!(lines[1].spans[0].content, "+ ");
        assert!(lines[1].spans.iter().any(|s| s.style.add_modifier.contains(Modifier::BOLD)));
    }

    #[test]
    fn trailing_removed_line_is_flushed() {
        let hunk = extract("@@ -1,2 +1,1 @@\n keep\n-gone\n", 1);
        let lines = highlight_hunk(&hunk, "txt");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].spans[0].content, "- ");
    }

    #[test]
    fn extension_defaults_to_txt() {
        assert_eq!(file_ext(std::path::Path::new("Makefile")), "txt");
        assert_eq!(file_ext(std::path::Path::new("src/main.rs")), "rs");
    }
}
