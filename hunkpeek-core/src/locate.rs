//! Hunk boundary search around a positioned cursor.

use tracing::debug;

use crate::diff::DiffText;

/// Half-open `[start, end)` range of body lines belonging to one hunk.
///
/// `start` is one past a header (or 0 when no header precedes the cursor) and
/// `end` is the next header (or the end of the text). The range never contains
/// a header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkBoundary {
    pub start: usize,
    pub end: usize,
}

impl HunkBoundary {
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}

/// Finds the hunk enclosing `cursor`, an index into `diff`.
///
/// A cursor on a header belongs to the hunk that follows it. When no header
/// precedes the cursor the search starts at index 0, and when none follows it
/// the hunk runs to the end of the text, so a text without any header yields
/// the whole text. This never fails.
pub fn locate(diff: &DiffText, cursor: usize) -> HunkBoundary {
    let len = diff.len();
    let mut pos = cursor.min(len);
    if diff.is_header(pos) {
        pos += 1;
    }

    let start = (0..pos)
        .rev()
        .find(|&i| diff.is_header(i))
        .map_or(0, |header| header + 1);
    let end = (start..len).find(|&i| diff.is_header(i)).unwrap_or(len);

    debug!(cursor, start, end, "located hunk boundary");
    HunkBoundary { start, end }
}
