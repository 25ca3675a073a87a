//! Blocking facade over the git worker thread.
//!
//! `GitClient` is the git-backed implementation of the pipeline's diff source,
//! version-control probe and revert action. Each call sends one request and
//! waits on a `bounded(1)` reply channel. Diffs of a single file are fast
//! enough that blocking the UI thread for the round trip is not noticeable.

use std::path::{Path, PathBuf};

use crossbeam_channel::{bounded, unbounded, Sender};
use hunkpeek_core::{
    DiffSource, HunkLocation, RevertAction, RevertError, SourceError, VersionControlProbe,
};
use tracing::warn;

use crate::git::types::GitRequest;
use crate::git::worker::git_worker_loop;

const WORKER_GONE: &str = "git worker is not running";

/// Handle to the git worker thread. Cheap to clone; the thread exits when the
/// last clone is dropped.
#[derive(Debug, Clone)]
pub struct GitClient {
    tx: Sender<GitRequest>,
}

impl GitClient {
    /// Spawns the worker thread for the repository containing `file`.
    ///
    /// # Arguments
    ///
    /// * `file` — the working file; its repository is discovered from its parent
    ///   directory inside the worker thread
    pub fn spawn(file: &Path) -> Self {
        let (tx, rx) = unbounded();
        let path = file.to_path_buf();
        std::thread::Builder::new()
            .name("hunkpeek-git".to_owned())
            .spawn(move || git_worker_loop(path, rx))
            .map_err(|e| warn!(error = %e, "failed to spawn git worker"))
            .ok();
        Self { tx }
    }
}

impl DiffSource for GitClient {
    fn compute_diff(&self, file: &Path, revision: &str) -> Result<String, SourceError> {
        let (reply, rx) = bounded(1);
        self.tx
            .send(GitRequest::Diff {
                file: file.to_path_buf(),
                revision: revision.to_owned(),
                reply,
            })
            .map_err(|_| SourceError::Unavailable(WORKER_GONE.to_owned()))?;
        rx.recv()
            .map_err(|_| SourceError::Unavailable(WORKER_GONE.to_owned()))?
    }
}

impl VersionControlProbe for GitClient {
    /// A missing worker means no repository, so nothing is tracked.
    fn is_tracked(&self, file: &Path) -> bool {
        let (reply, rx) = bounded(1);
        let request = GitRequest::IsTracked { file: PathBuf::from(file), reply };
        if self.tx.send(request).is_err() {
            return false;
        }
        rx.recv().unwrap_or(false)
    }
}

impl RevertAction for GitClient {
    fn revert(&mut self, original: &str, location: &HunkLocation) -> Result<(), RevertError> {
        tracing::debug!(
            file = %location.file.display(),
            removed_bytes = original.len(),
            "requesting revert"
        );
        let (reply, rx) = bounded(1);
        self.tx
            .send(GitRequest::Revert { location: location.clone(), reply })
            .map_err(|_| RevertError::Unavailable(WORKER_GONE.to_owned()))?;
        rx.recv()
            .map_err(|_| RevertError::Unavailable(WORKER_GONE.to_owned()))?
    }
}
