//! Request types for the git background thread.
//!
//! Every request carries its own reply channel. The worker answers each
//! request exactly once, so callers can block on a `bounded(1)` receiver
//! without risking a deadlock. All payloads are fully owned and `Send`.

use std::path::PathBuf;

use crossbeam_channel::Sender;
use hunkpeek_core::{HunkLocation, RevertError, SourceError};

/// Commands sent from the UI thread to the git worker thread.
#[derive(Debug)]
pub enum GitRequest {
    /// Diff the working copy of `file` against `revision`.
    Diff {
        file: PathBuf,
        revision: String,
        reply: Sender<Result<String, SourceError>>,
    },
    /// Ask whether `file` is tracked by the repository.
    IsTracked {
        file: PathBuf,
        reply: Sender<bool>,
    },
    /// Replace `location.current` with `location.restored` in the working file.
    Revert {
        location: HunkLocation,
        reply: Sender<Result<(), RevertError>>,
    },
}
