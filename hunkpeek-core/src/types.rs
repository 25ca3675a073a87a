use std::path::PathBuf;

/// The type of a line in unified diff text, derived from its first character.
///
/// `HunkHeader` lines are recognised by the configured boundary pattern before
/// the marker character is looked at, so a header never classifies as `Removed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Unchanged line (leading space), also used for `\ No newline` markers.
    Context,
    /// Line present only in the working file (`+`).
    Added,
    /// Line present only in the reference revision (`-`).
    Removed,
    /// Hunk boundary marker (`@@ ... @@` by default).
    HunkHeader,
}

impl LineKind {
    /// Returns `true` for `Added` and `Removed` lines.
    pub fn is_change(self) -> bool {
        matches!(self, LineKind::Added | LineKind::Removed)
    }
}

/// A single classified line of diff text, fully owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    /// Raw line text including the leading marker, without the trailing newline.
    pub text: String,
}

impl DiffLine {
    /// Returns `true` for `\ No newline at end of file` markers, which carry
    /// no line number on either side.
    pub fn is_no_newline_marker(&self) -> bool {
        self.text.starts_with('\\')
    }

    /// Line content with exactly one leading marker character stripped.
    ///
    /// Header lines are returned unchanged.
    pub fn content(&self) -> &str {
        match self.kind {
            LineKind::HunkHeader => &self.text,
            _ => {
                let mut chars = self.text.chars();
                chars.next();
                chars.as_str()
            }
        }
    }
}

/// Numbers carried by a conventional `@@ -a,b +c,d @@` header.
///
/// A missing length defaults to 1, as in the unified diff format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange {
    pub old_start: u32,
    pub old_len: u32,
    pub new_start: u32,
    pub new_len: u32,
}

impl HunkRange {
    /// First working-file line the hunk occupies (1-based).
    ///
    /// Pure deletions (`new_len == 0`) anchor on the line the removed block
    /// followed, or line 1 when the block was at the top of the file.
    pub fn anchor_start(&self) -> u32 {
        self.new_start.max(1)
    }

    /// Last working-file line the hunk occupies (inclusive, 1-based).
    pub fn anchor_end(&self) -> u32 {
        if self.new_len == 0 {
            self.anchor_start()
        } else {
            self.new_start.saturating_add(self.new_len - 1)
        }
    }

    /// Returns `true` when `line` lies within `anchor_start..=anchor_end`.
    pub fn contains(&self, line: u32) -> bool {
        (self.anchor_start()..=self.anchor_end()).contains(&line)
    }
}

/// Direction of a hunk navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Previous => f.write_str("previous"),
            Direction::Next => f.write_str("next"),
        }
    }
}

/// A cursor position in the caller's view. Lines are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Where the caller was when a hunk was opened.
///
/// Restored on every close so a dismissed hunk leaves the caller exactly where
/// it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Identity of the caller's view (panel, window, buffer name).
    pub view: String,
    /// File the caller was looking at.
    pub file: PathBuf,
    pub position: Position,
}

/// Everything a revert needs to write one hunk back.
///
/// `start..start + current.len()` is the span of working-file lines between the
/// first and last changed line of the hunk; `restored` holds the lines of the
/// reference revision that replace it (removed lines plus any context lines
/// interleaved between changes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkLocation {
    pub file: PathBuf,
    /// First working-file line of the changed span (1-based). For pure
    /// deletions this is the line the restored block is inserted before.
    pub start: u32,
    /// Lines currently in the working file over the changed span.
    pub current: Vec<String>,
    /// Lines from the reference revision replacing `current`.
    pub restored: Vec<String>,
    /// The last line of `current` ends the working file without a newline.
    pub current_missing_newline: bool,
    /// The last line of `restored` ended the reference file without a newline.
    pub restored_missing_newline: bool,
}
