//! Interfaces of the collaborators the pipeline drives.
//!
//! None of these are implemented in this crate. The binary provides git-backed
//! sources and terminal renderers; tests provide in-memory fakes.

use std::path::Path;

use crate::diff::DiffText;
use crate::error::{RevertError, SourceError};
use crate::extract::ExtractedHunk;
use crate::session::Teardown;
use crate::types::{Direction, HunkLocation, Origin};

/// Produces unified diff text for a file against a reference revision.
///
/// Only [`compute_diff`](DiffSource::compute_diff) is required. The provided
/// methods derive cursor placement and hunk adjacency from the hunk headers and
/// can be overridden by sources that know better.
pub trait DiffSource {
    /// Unified diff of `file` against `revision`: hunk headers followed by
    /// marker-prefixed lines.
    fn compute_diff(&self, file: &Path, revision: &str) -> Result<String, SourceError>;

    /// Index into `diff` of the line corresponding to working-file `line`.
    fn position_cursor(&self, diff: &DiffText, line: u32) -> usize {
        diff.index_for_line(line)
    }

    /// Whether working-file `line` lies inside a hunk.
    fn contains_change(&self, diff: &DiffText, line: u32) -> bool {
        diff.hunk_at_line(line).is_some()
    }

    /// Start line of the hunk next to `line` in `direction`.
    ///
    /// A query only: the caller's position is never touched.
    fn adjacent_hunk(&self, diff: &DiffText, line: u32, direction: Direction) -> Option<u32> {
        diff.adjacent_hunk_start(line, direction)
    }
}

/// Answers whether a file is under version control.
pub trait VersionControlProbe {
    fn is_tracked(&self, file: &Path) -> bool;
}

/// Presents an extracted hunk.
///
/// The returned teardown is invoked by the session when the hunk is hidden.
/// A renderer whose own UI dismisses the hunk should call
/// [`SessionState::close`](crate::session::SessionState::close) rather than
/// tearing itself down directly.
pub trait Renderer {
    fn show(&mut self, hunk: &ExtractedHunk) -> Teardown;
}

/// Writes the pre-change text of a hunk back to the working file.
pub trait RevertAction {
    fn revert(&mut self, original: &str, location: &HunkLocation) -> Result<(), RevertError>;
}

/// The caller's environment: which file it shows and where its cursor is.
pub trait Workspace {
    fn file(&self) -> &Path;

    /// Current view identity and cursor position.
    fn origin(&self) -> Origin;

    /// Moves the cursor to working-file `line`.
    fn move_to_line(&mut self, line: u32);

    /// Returns focus and cursor to `origin`.
    fn restore(&mut self, origin: &Origin);

    /// Degraded display used when no renderer is configured: jump to `cursor`
    /// inside the raw diff.
    fn show_raw_diff(&mut self, diff: &DiffText, cursor: usize);
}
