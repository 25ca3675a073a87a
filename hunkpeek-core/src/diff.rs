//! Line classification for unified diff text.
//!
//! Raw diff output is classified once into a [`DiffText`]; every later step
//! (locating, extracting, navigating) works on indices into that sequence
//! instead of re-scanning text. The hunk boundary syntax is a configurable
//! regex, so nothing downstream depends on the literal `@@` marker.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::types::{DiffLine, Direction, HunkRange, LineKind};

/// Default boundary pattern, matching conventional `@@ ... @@` headers.
pub const DEFAULT_BOUNDARY_PATTERN: &str = r"^@@.*@@";

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("hunk range regex is valid")
});

/// Compiled hunk boundary pattern.
#[derive(Debug, Clone)]
pub struct BoundaryPattern(Regex);

impl BoundaryPattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if `pattern` is not a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    /// Compiles `pattern`, falling back to [`DEFAULT_BOUNDARY_PATTERN`] on error.
    pub fn or_default(pattern: &str) -> Self {
        match Self::new(pattern) {
            Ok(p) => p,
            Err(e) => {
                warn!(%pattern, error = %e, "invalid boundary pattern, using default");
                Self::default()
            }
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.0.is_match(line)
    }
}

impl Default for BoundaryPattern {
    fn default() -> Self {
        Self(Regex::new(DEFAULT_BOUNDARY_PATTERN).expect("default boundary pattern is valid"))
    }
}

/// Parses the numeric ranges out of a conventional hunk header.
///
/// Returns `None` for headers that do not follow the `@@ -a,b +c,d @@` shape.
pub fn parse_hunk_range(header: &str) -> Option<HunkRange> {
    let caps = RANGE_RE.captures(header)?;
    let num = |i: usize, default: u32| -> Option<u32> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };
    Some(HunkRange {
        old_start: num(1, 0)?,
        old_len: num(2, 1)?,
        new_start: num(3, 0)?,
        new_len: num(4, 1)?,
    })
}

/// One hunk inside a [`DiffText`]: where its header sits and what it claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkSpan {
    /// Index of the header line.
    pub header: usize,
    /// Index one past the last body line.
    pub end: usize,
    pub range: Option<HunkRange>,
}

impl HunkSpan {
    /// Index of the first body line.
    pub fn body_start(&self) -> usize {
        self.header + 1
    }
}

/// Immutable, classified unified diff text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffText {
    lines: Vec<DiffLine>,
}

impl DiffText {
    /// Classifies every line of `raw`.
    ///
    /// Lines matching `pattern` become `HunkHeader`; otherwise the first
    /// character decides: `+` added, `-` removed, anything else context.
    pub fn parse(raw: &str, pattern: &BoundaryPattern) -> Self {
        let lines = raw
            .lines()
            .map(|line| {
                let kind = if pattern.is_match(line) {
                    LineKind::HunkHeader
                } else if line.starts_with('+') {
                    LineKind::Added
                } else if line.starts_with('-') {
                    LineKind::Removed
                } else {
                    LineKind::Context
                };
                DiffLine { kind, text: line.to_owned() }
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_header(&self, index: usize) -> bool {
        self.lines.get(index).is_some_and(|l| l.kind == LineKind::HunkHeader)
    }

    /// Returns `true` if any line is an addition or removal.
    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|l| l.kind.is_change())
    }

    /// All hunks in order, one per header line.
    pub fn hunks(&self) -> Vec<HunkSpan> {
        let headers: Vec<usize> = self
            .lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.kind == LineKind::HunkHeader)
            .map(|(i, _)| i)
            .collect();

        headers
            .iter()
            .enumerate()
            .map(|(n, &header)| HunkSpan {
                header,
                end: headers.get(n + 1).copied().unwrap_or(self.lines.len()),
                range: parse_hunk_range(&self.lines[header].text),
            })
            .collect()
    }

    /// The hunk whose working-file range contains `line`, if any.
    pub fn hunk_at_line(&self, line: u32) -> Option<HunkSpan> {
        self.hunks()
            .into_iter()
            .find(|h| h.range.is_some_and(|r| r.contains(line)))
    }

    /// Maps a 1-based working-file line to an index into this text.
    ///
    /// Inside a hunk, the index is the added or context line carrying that
    /// line number; for a line the hunk only covers by deletion it is the
    /// first body line. Outside every hunk the index falls back to the first
    /// body line of the nearest preceding hunk, then to 0.
    pub fn index_for_line(&self, line: u32) -> usize {
        let hunks = self.hunks();
        let Some(hunk) = hunks
            .iter()
            .find(|h| h.range.is_some_and(|r| r.contains(line)))
            .or_else(|| {
                hunks
                    .iter()
                    .rev()
                    .find(|h| h.range.is_some_and(|r| r.anchor_start() < line))
            })
        else {
            return 0;
        };

        if let Some(range) = hunk.range {
            let mut new_no = first_new_line(&range);
            for index in hunk.body_start()..hunk.end {
                let dl = &self.lines[index];
                if dl.is_no_newline_marker() {
                    continue;
                }
                match dl.kind {
                    LineKind::Added | LineKind::Context => {
                        if new_no == line {
                            return index;
                        }
                        new_no = new_no.saturating_add(1);
                    }
                    LineKind::Removed | LineKind::HunkHeader => {}
                }
            }
        }
        hunk.body_start().min(self.lines.len())
    }

    /// Start line of the hunk adjacent to `line` in `direction`.
    ///
    /// When `line` is inside hunk *i* the neighbours are *i-1* and *i+1*;
    /// outside any hunk they are the nearest hunks ending before and starting
    /// after `line`.
    pub fn adjacent_hunk_start(&self, line: u32, direction: Direction) -> Option<u32> {
        let ranges: Vec<HunkRange> = self.hunks().into_iter().filter_map(|h| h.range).collect();
        let inside = ranges.iter().position(|r| r.contains(line));

        let target = match (direction, inside) {
            (Direction::Previous, Some(i)) => i.checked_sub(1).and_then(|p| ranges.get(p)),
            (Direction::Next, Some(i)) => ranges.get(i + 1),
            (Direction::Previous, None) => ranges.iter().rev().find(|r| r.anchor_end() < line),
            (Direction::Next, None) => ranges.iter().find(|r| r.anchor_start() > line),
        };
        target.map(HunkRange::anchor_start)
    }
}

/// Working-file number of the first added or context line in a hunk body.
///
/// The unified format reports the line *before* the hunk when the new side is
/// empty, so the counter starts one later in that case.
pub(crate) fn first_new_line(range: &HunkRange) -> u32 {
    if range.new_len == 0 {
        range.new_start.saturating_add(1)
    } else {
        range.new_start
    }
}
