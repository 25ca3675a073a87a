use std::path::PathBuf;

use thiserror::Error;

use crate::types::Direction;

/// User-facing failures of the hunk pipeline.
///
/// Every variant is non-fatal: the viewer stays usable after any of them.
#[derive(Debug, Error)]
pub enum HunkError {
    /// The file has no version-control association. Nothing was touched.
    #[error("{} is not tracked by version control", .0.display())]
    NotTracked(PathBuf),

    /// Navigation ran past the first or last hunk. The session is unchanged.
    #[error("no {0} change")]
    NoAdjacentHunk(Direction),

    /// The diff holds no hunk at or around the cursor.
    #[error("no changes")]
    NoChanges,

    /// The renderer showed a hunk while another session was still open; the
    /// new hunk was dismissed again.
    #[error("another hunk is already open")]
    SessionBusy,

    /// A hunk action was requested with no hunk shown since the last revert.
    #[error("no hunk shown")]
    NoHunkShown,

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Revert(#[from] RevertError),
}

/// Failures reported by a diff source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("diff backend unavailable: {0}")]
    Unavailable(String),

    #[error("cannot diff {}: {message}", .file.display())]
    Diff { file: PathBuf, message: String },

    #[error("cannot read {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures reported by a revert action.
#[derive(Debug, Error)]
pub enum RevertError {
    /// No revert action is configured.
    #[error("revert is not supported here")]
    Unsupported,

    /// The shown hunk carries no line numbers, so it cannot be written back.
    #[error("hunk has no location to revert")]
    NoLocation,

    /// The working file changed since the hunk was shown.
    #[error("{} changed since the hunk was shown", .0.display())]
    Stale(PathBuf),

    #[error("revert backend unavailable: {0}")]
    Unavailable(String),

    #[error("cannot write {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
