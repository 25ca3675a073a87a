//! hunkpeek-core — locate, extract and navigate single hunks of a unified diff.
//!
//! The crate is collaborator-agnostic: diff computation, version-control
//! probing, rendering and write-back are traits in [`collab`]. The pipeline
//! itself lives in [`viewer::HunkViewer`].
//!
//! # Flow
//!
//! 1. [`collab::VersionControlProbe`] refuses untracked files.
//! 2. [`collab::DiffSource`] produces diff text, classified into a
//!    [`diff::DiffText`], and positions a cursor in it.
//! 3. [`locate::locate`] finds the enclosing [`locate::HunkBoundary`].
//! 4. [`extract::HunkExtractor`] narrows to an [`extract::ExtractedHunk`] and
//!    stores the original text.
//! 5. A [`collab::Renderer`] shows the hunk; [`session::SessionState`] keeps
//!    its teardown until the hunk is hidden.

pub mod collab;
pub mod config;
pub mod diff;
pub mod error;
pub mod extract;
pub mod locate;
pub mod registry;
pub mod session;
pub mod types;
pub mod viewer;

pub use collab::{DiffSource, Renderer, RevertAction, VersionControlProbe, Workspace};
pub use config::Config;
pub use diff::{BoundaryPattern, DiffText};
pub use error::{ConfigError, HunkError, RevertError, SourceError};
pub use extract::{ExtractedHunk, HunkExtractor};
pub use locate::{locate, HunkBoundary};
pub use registry::RendererRegistry;
pub use session::{SessionState, Teardown};
pub use types::{DiffLine, Direction, HunkLocation, HunkRange, LineKind, Origin, Position};
pub use viewer::{HunkViewer, Shown};
