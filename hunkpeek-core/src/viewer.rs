//! The show / hide / navigate pipeline.
//!
//! `HunkViewer` strings the collaborators together:
//! probe → diff source → [`locate`] → [`HunkExtractor`] → renderer → session.
//! Navigation is always hide-then-show; there is no direct hand-over from one
//! open hunk to the next, so two renderers are never up at the same time.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::collab::{DiffSource, Renderer, RevertAction, VersionControlProbe, Workspace};
use crate::config::Config;
use crate::diff::{BoundaryPattern, DiffText};
use crate::error::{HunkError, RevertError};
use crate::extract::{ExtractedHunk, HunkExtractor};
use crate::locate::locate;
use crate::session::SessionState;
use crate::types::{Direction, HunkLocation};

/// How a successful show request was presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shown {
    /// A renderer displays the hunk and a session is open.
    Hunk,
    /// No renderer is configured; the workspace jumped into the raw diff.
    RawDiff,
}

pub struct HunkViewer {
    source: Box<dyn DiffSource>,
    probe: Box<dyn VersionControlProbe>,
    renderer: Option<Box<dyn Renderer>>,
    reverter: Option<Box<dyn RevertAction>>,
    pattern: BoundaryPattern,
    revision: String,
    session: SessionState,
    extractor: HunkExtractor,
    shown: Option<(PathBuf, ExtractedHunk)>,
}

impl HunkViewer {
    /// Creates a viewer with no renderer and no revert action.
    pub fn new(
        source: Box<dyn DiffSource>,
        probe: Box<dyn VersionControlProbe>,
        config: &Config,
    ) -> Self {
        Self {
            source,
            probe,
            renderer: None,
            reverter: None,
            pattern: config.boundary(),
            revision: config.revision.clone(),
            session: SessionState::new(),
            extractor: HunkExtractor::new(),
            shown: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Option<Box<dyn Renderer>>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_revert(mut self, reverter: Box<dyn RevertAction>) -> Self {
        self.reverter = Some(reverter);
        self
    }

    /// Handle to the session slot, for renderers that dismiss themselves.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Original text of the most recently extracted hunk.
    pub fn original_text(&self) -> &str {
        self.extractor.original_text()
    }

    /// The hunk shown last, until it is reverted.
    pub fn shown_hunk(&self) -> Option<&ExtractedHunk> {
        self.shown.as_ref().map(|(_, hunk)| hunk)
    }

    /// Write-back description of the hunk shown last, until it is reverted.
    ///
    /// `None` when nothing was shown or the hunk carries no line numbers.
    pub fn current_location(&self) -> Option<HunkLocation> {
        self.shown.as_ref().and_then(|(file, hunk)| hunk.location(file))
    }

    /// Shows the hunk at the workspace cursor.
    ///
    /// Untracked files are refused before anything is touched. Any open
    /// session is closed first. A cursor outside every change snaps to the
    /// previous hunk, or the next one when there is no previous.
    pub fn show(&mut self, ws: &mut dyn Workspace) -> Result<Shown, HunkError> {
        let file = ws.file().to_path_buf();
        let diff = self.tracked_diff(&file)?;
        self.hide(ws);
        self.show_in(ws, &file, &diff)
    }

    /// Closes the open session, restoring the workspace to its origin.
    ///
    /// Safe to call at any time; returns `false` when nothing was open.
    pub fn hide(&mut self, ws: &mut dyn Workspace) -> bool {
        self.session.close(|origin| ws.restore(origin))
    }

    pub fn has_previous(&self, ws: &dyn Workspace) -> bool {
        self.has_adjacent(ws, Direction::Previous)
    }

    pub fn has_next(&self, ws: &dyn Workspace) -> bool {
        self.has_adjacent(ws, Direction::Next)
    }

    pub fn go_previous(&mut self, ws: &mut dyn Workspace) -> Result<Shown, HunkError> {
        self.go(ws, Direction::Previous)
    }

    pub fn go_next(&mut self, ws: &mut dyn Workspace) -> Result<Shown, HunkError> {
        self.go(ws, Direction::Next)
    }

    /// Probes for a hunk next to the current one without moving anything.
    fn has_adjacent(&self, ws: &dyn Workspace, direction: Direction) -> bool {
        let file = ws.file();
        let diff = match self.tracked_diff(file) {
            Ok(diff) => diff,
            Err(e) => {
                debug!(error = %e, %direction, "adjacency probe failed");
                return false;
            }
        };
        let line = self.current_line(ws);
        self.source.adjacent_hunk(&diff, line, direction).is_some()
    }

    /// Hides the current hunk and shows the adjacent one.
    ///
    /// When there is no adjacent hunk nothing changes and `NoAdjacentHunk` is
    /// returned. The diff computed for the adjacency check is reused for the
    /// show.
    fn go(&mut self, ws: &mut dyn Workspace, direction: Direction) -> Result<Shown, HunkError> {
        let file = ws.file().to_path_buf();
        let diff = self.tracked_diff(&file)?;
        let line = self.current_line(ws);
        let target = self
            .source
            .adjacent_hunk(&diff, line, direction)
            .ok_or(HunkError::NoAdjacentHunk(direction))?;

        debug!(%direction, from = line, to = target, "navigating");
        self.hide(ws);
        ws.move_to_line(target);
        self.show_in(ws, &file, &diff)
    }

    /// Closes the session and writes the shown hunk's original text back.
    ///
    /// Returns the location that was reverted so the caller can reload.
    pub fn revert(&mut self, ws: &mut dyn Workspace) -> Result<HunkLocation, HunkError> {
        if self.reverter.is_none() {
            return Err(RevertError::Unsupported.into());
        }
        let (file, hunk) = self.shown.take().ok_or(HunkError::NoHunkShown)?;
        let Some(location) = hunk.location(&file) else {
            self.shown = Some((file, hunk));
            return Err(RevertError::NoLocation.into());
        };

        self.hide(ws);
        let original = hunk.original_text();
        if let Some(reverter) = self.reverter.as_mut() {
            reverter.revert(&original, &location)?;
        }
        debug!(file = %location.file.display(), start = location.start, "hunk reverted");
        Ok(location)
    }

    fn tracked_diff(&self, file: &Path) -> Result<DiffText, HunkError> {
        if !self.probe.is_tracked(file) {
            return Err(HunkError::NotTracked(file.to_path_buf()));
        }
        let raw = self.source.compute_diff(file, &self.revision)?;
        Ok(DiffText::parse(&raw, &self.pattern))
    }

    /// Line navigation is measured from: the session origin when a hunk is
    /// open, the workspace cursor otherwise.
    fn current_line(&self, ws: &dyn Workspace) -> u32 {
        self.session
            .origin()
            .map_or_else(|| ws.origin().position.line, |o| o.position.line)
    }

    fn show_in(
        &mut self,
        ws: &mut dyn Workspace,
        file: &Path,
        diff: &DiffText,
    ) -> Result<Shown, HunkError> {
        if !diff.has_changes() {
            return Err(HunkError::NoChanges);
        }

        let mut line = ws.origin().position.line;
        if !self.source.contains_change(diff, line) {
            let snapped = self
                .source
                .adjacent_hunk(diff, line, Direction::Previous)
                .or_else(|| self.source.adjacent_hunk(diff, line, Direction::Next));
            if let Some(target) = snapped {
                debug!(from = line, to = target, "cursor outside any change, snapping");
                ws.move_to_line(target);
                line = target;
            }
        }

        let cursor = self.source.position_cursor(diff, line);
        let boundary = locate(diff, cursor);
        let hunk = self
            .extractor
            .extract(diff, boundary, cursor)
            .ok_or(HunkError::NoChanges)?;

        let Some(renderer) = self.renderer.as_mut() else {
            warn!("no renderer configured, jumping into the raw diff");
            ws.show_raw_diff(diff, cursor);
            self.shown = Some((file.to_path_buf(), hunk));
            return Ok(Shown::RawDiff);
        };

        let teardown = renderer.show(&hunk);
        if let Err(teardown) = self.session.try_open(ws.origin(), teardown) {
            warn!(file = %file.display(), "session rejected, dismissing the new hunk");
            teardown();
            return Err(HunkError::SessionBusy);
        }
        self.shown = Some((file.to_path_buf(), hunk));
        Ok(Shown::Hunk)
    }
}
