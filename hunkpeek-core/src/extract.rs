//! Hunk narrowing and original-text reconstruction.

use std::path::Path;

use crate::diff::{first_new_line, parse_hunk_range, DiffText};
use crate::locate::HunkBoundary;
use crate::types::{DiffLine, HunkLocation, HunkRange, LineKind};

/// One hunk, materialised for a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedHunk {
    /// Body lines of the hunk, in diff order.
    pub lines: Vec<DiffLine>,
    /// Offset into `lines` matching the caller's cursor. Always `< lines.len()`.
    pub highlight_index: usize,
    /// Parsed header of the hunk, when the header carries line numbers.
    pub range: Option<HunkRange>,
}

impl ExtractedHunk {
    /// Working-file line where the hunk should be displayed.
    pub fn anchor_line(&self) -> u32 {
        self.range.map_or(1, |r| r.anchor_start())
    }

    /// Text of the removed lines, markers stripped, joined with `\n`.
    pub fn original_text(&self) -> String {
        self.lines
            .iter()
            .filter(|l| l.kind == LineKind::Removed)
            .map(DiffLine::content)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Builds the write-back description of this hunk for `file`.
    ///
    /// The span runs from the first to the last changed line; context lines
    /// outside it are left alone, context lines inside it are kept on both
    /// sides. Returns `None` when the hunk has no changes or no line numbers.
    pub fn location(&self, file: &Path) -> Option<HunkLocation> {
        let range = self.range?;
        let body: Vec<&DiffLine> =
            self.lines.iter().filter(|l| !l.is_no_newline_marker()).collect();
        let first = body.iter().position(|l| l.kind.is_change())?;
        let last = body.iter().rposition(|l| l.kind.is_change())?;

        let leading_context = body[..first]
            .iter()
            .filter(|l| l.kind == LineKind::Context)
            .count() as u32;
        let start = first_new_line(&range).saturating_add(leading_context);

        let mut current = Vec::new();
        let mut restored = Vec::new();
        for line in &body[first..=last] {
            match line.kind {
                LineKind::Added => current.push(line.content().to_owned()),
                LineKind::Removed => restored.push(line.content().to_owned()),
                LineKind::Context => {
                    current.push(line.content().to_owned());
                    restored.push(line.content().to_owned());
                }
                LineKind::HunkHeader => {}
            }
        }

        let (current_missing_newline, restored_missing_newline) = self.missing_newlines();
        Some(HunkLocation {
            file: file.to_path_buf(),
            start,
            current,
            restored,
            current_missing_newline,
            restored_missing_newline,
        })
    }

    /// Which sides end without a newline, from the `\ No newline` markers.
    ///
    /// A marker applies to the line right before it: an added line means the
    /// working file lacks the newline, a removed line the reference file, and a
    /// context line both.
    fn missing_newlines(&self) -> (bool, bool) {
        let mut current = false;
        let mut restored = false;
        let mut previous = None;
        for line in &self.lines {
            if !line.is_no_newline_marker() {
                previous = Some(line.kind);
                continue;
            }
            match previous {
                Some(LineKind::Added) => current = true,
                Some(LineKind::Removed) => restored = true,
                Some(LineKind::Context) => {
                    current = true;
                    restored = true;
                }
                Some(LineKind::HunkHeader) | None => {}
            }
        }
        (current, restored)
    }
}

/// Narrows diff text to single hunks and remembers the most recent original text.
///
/// Extraction is a pure function of its inputs apart from the stored original
/// text, which always reflects the last extraction and nothing older.
#[derive(Debug, Default)]
pub struct HunkExtractor {
    original_text: String,
}

impl HunkExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slices `boundary` out of `diff` and computes the highlight offset for
    /// `cursor` (an index into the full text).
    ///
    /// Returns `None` when the boundary is empty; the stored original text is
    /// reset to empty in that case as well.
    pub fn extract(
        &mut self,
        diff: &DiffText,
        boundary: HunkBoundary,
        cursor: usize,
    ) -> Option<ExtractedHunk> {
        let end = boundary.end.min(diff.len());
        let start = boundary.start.min(end);
        let lines = diff.lines()[start..end].to_vec();

        if lines.is_empty() {
            self.original_text.clear();
            return None;
        }

        let highlight_index = cursor.saturating_sub(start).min(lines.len() - 1);
        let range = start
            .checked_sub(1)
            .filter(|&h| diff.is_header(h))
            .and_then(|h| parse_hunk_range(&diff.lines()[h].text));

        let hunk = ExtractedHunk { lines, highlight_index, range };
        self.original_text = hunk.original_text();
        Some(hunk)
    }

    /// Original text of the most recently extracted hunk.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }
}
