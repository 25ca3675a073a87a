//! Central application state for hunkpeek.
//!
//! `AppState` owns everything the UI draws: the working file's lines, the
//! cursor and scroll position, gutter markers, the raw-diff fallback view and
//! the status line. It is also the [`Workspace`] the hunk pipeline drives, so
//! "move the cursor" and "restore the origin" are plain field updates here.
//!
//! `App` bundles the state with the viewer and the git client so keybindings
//! can borrow the pieces independently.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use hunkpeek_core::{
    BoundaryPattern, Config, DiffLine, DiffSource, DiffText, HunkError, HunkViewer, LineKind,
    Origin, Position, Shown, Workspace,
};
use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::git::GitClient;
use crate::render::HunkSlot;

/// Status messages disappear after this many ticks (250 ms each).
const STATUS_TICKS: u8 = 16;

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Help overlay is shown above everything else.
    HelpOverlay,
}

/// What the main panel shows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The working file with gutter markers.
    #[default]
    File,
    /// The raw diff, used when no renderer is configured.
    RawDiff,
}

impl View {
    pub fn name(self) -> &'static str {
        match self {
            View::File => "file",
            View::RawDiff => "raw-diff",
        }
    }

    fn from_name(name: &str) -> Self {
        if name == View::RawDiff.name() { View::RawDiff } else { View::File }
    }
}

/// Gutter marker for one working-file line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GutterMark {
    Added,
    Modified,
    /// Lines were removed just below this one.
    Removed,
}

/// A transient message in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
    ttl: u8,
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    pub mode: Mode,
    pub view: View,

    /// The working file, as given on the command line.
    pub file: PathBuf,
    pub file_lines: Vec<String>,
    /// 1-based cursor line in the file view.
    pub cursor_line: u32,
    /// Index of the first file line visible in the file view.
    pub scroll: usize,
    /// Inner height of the main panel, cached after each render.
    pub viewport_height: u16,
    pub gutter: HashMap<u32, GutterMark>,

    /// Diff lines shown in the raw-diff view.
    pub raw_diff: Vec<DiffLine>,
    pub raw_cursor: usize,
    pub raw_scroll: usize,

    pub help_scroll: u16,
    pub status: Option<Status>,
    /// Original text copied with `y`, printed to stdout on exit.
    pub yanked: Option<String>,

    pub revision: String,
    /// Renderer in use, for the status bar.
    pub renderer_name: String,
    pub floating_pct: (u16, u16),
    /// Hunk drawn by the renderers this frame.
    pub overlay: HunkSlot,
    /// Screen area of the floating panel in the last frame, for click-away.
    pub popup_area: Option<Rect>,
}

impl AppState {
    /// Reads `file` from disk and builds the initial state.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file cannot be read.
    pub fn load(file: &Path, config: &Config, overlay: HunkSlot) -> anyhow::Result<Self> {
        let file_lines = read_lines(file)?;
        Ok(Self {
            mode: Mode::default(),
            view: View::default(),
            file: file.to_path_buf(),
            file_lines,
            cursor_line: 1,
            scroll: 0,
            viewport_height: 0,
            gutter: HashMap::new(),
            raw_diff: Vec::new(),
            raw_cursor: 0,
            raw_scroll: 0,
            help_scroll: 0,
            status: None,
            yanked: None,
            revision: config.revision.clone(),
            renderer_name: config.renderer.clone().unwrap_or_else(|| "none".to_owned()),
            floating_pct: (config.floating.width_pct, config.floating.height_pct),
            overlay,
            popup_area: None,
        })
    }

    /// Re-reads the working file, keeping the cursor in range.
    pub fn reload(&mut self) -> anyhow::Result<()> {
        self.file_lines = read_lines(&self.file)?;
        self.move_to_line(self.cursor_line);
        Ok(())
    }

    fn last_line(&self) -> u32 {
        (self.file_lines.len() as u32).max(1)
    }

    /// Recomputes gutter markers from a fresh diff.
    pub fn refresh_gutter(&mut self, diff: &DiffText) {
        self.gutter = gutter_marks(diff);
        debug!(marked = self.gutter.len(), "gutter refreshed");
    }

    pub fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(Status { text: text.into(), is_error: false, ttl: STATUS_TICKS });
    }

    pub fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(Status { text: text.into(), is_error: true, ttl: STATUS_TICKS });
    }

    /// Ages the status message; called on every logic tick.
    pub fn tick(&mut self) {
        if let Some(status) = self.status.as_mut() {
            status.ttl = status.ttl.saturating_sub(1);
            if status.ttl == 0 {
                self.status = None;
            }
        }
    }

    // ---------------------------------------------------------------------
    // Cursor movement
    // ---------------------------------------------------------------------

    /// Moves the cursor by `delta` lines in the active view, clamped.
    pub fn move_cursor(&mut self, delta: i64) {
        match self.view {
            View::File => {
                let target = (self.cursor_line as i64 + delta).clamp(1, self.last_line() as i64);
                self.move_to_line(target as u32);
            }
            View::RawDiff => {
                let last = self.raw_diff.len().saturating_sub(1) as i64;
                self.raw_cursor = (self.raw_cursor as i64 + delta).clamp(0, last) as usize;
                self.raw_scroll = keep_visible(self.raw_cursor, self.raw_scroll, self.viewport_height);
            }
        }
    }

    /// Half the viewport height, at least one line.
    pub fn half_page(&self) -> i64 {
        i64::from((self.viewport_height / 2).max(1))
    }

    fn ensure_cursor_visible(&mut self) {
        let index = self.cursor_line.saturating_sub(1) as usize;
        self.scroll = keep_visible(index, self.scroll, self.viewport_height);
    }
}

impl Workspace for AppState {
    fn file(&self) -> &Path {
        &self.file
    }

    fn origin(&self) -> Origin {
        Origin {
            view: self.view.name().to_owned(),
            file: self.file.clone(),
            position: Position { line: self.cursor_line, column: 0 },
        }
    }

    fn move_to_line(&mut self, line: u32) {
        self.view = View::File;
        self.cursor_line = line.clamp(1, self.last_line());
        self.ensure_cursor_visible();
    }

    fn restore(&mut self, origin: &Origin) {
        if origin.file != self.file {
            warn!(file = %origin.file.display(), "origin belongs to another file");
            return;
        }
        self.view = View::from_name(&origin.view);
        self.cursor_line = origin.position.line.clamp(1, self.last_line());
        self.ensure_cursor_visible();
    }

    fn show_raw_diff(&mut self, diff: &DiffText, cursor: usize) {
        self.raw_diff = diff.lines().to_vec();
        self.raw_cursor = cursor.min(self.raw_diff.len().saturating_sub(1));
        let half = usize::from(self.viewport_height / 2);
        self.raw_scroll = self.raw_cursor.saturating_sub(half);
        self.view = View::RawDiff;
    }
}

/// Smallest scroll change that keeps `index` inside a window of `height` rows.
fn keep_visible(index: usize, scroll: usize, height: u16) -> usize {
    let height = usize::from(height.max(1));
    if index < scroll {
        index
    } else if index >= scroll + height {
        index + 1 - height
    } else {
        scroll
    }
}

fn read_lines(file: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    Ok(content.lines().map(str::to_owned).collect())
}

/// Derives per-line gutter markers from the hunk bodies of `diff`.
///
/// Added lines in a hunk that also removes lines are "modified"; a removal
/// with nothing added marks the line above the gap.
pub fn gutter_marks(diff: &DiffText) -> HashMap<u32, GutterMark> {
    let mut marks = HashMap::new();
    for hunk in diff.hunks() {
        let Some(range) = hunk.range else { continue };
        let body = &diff.lines()[hunk.body_start()..hunk.end];
        let removes = body.iter().any(|l| l.kind == LineKind::Removed);
        let adds = body.iter().any(|l| l.kind == LineKind::Added);

        if removes && !adds {
            marks.insert(range.anchor_start(), GutterMark::Removed);
            continue;
        }
        let mut line = if range.new_len == 0 { range.new_start + 1 } else { range.new_start };
        for dl in body.iter().filter(|l| !l.is_no_newline_marker()) {
            match dl.kind {
                LineKind::Added => {
                    let mark = if removes { GutterMark::Modified } else { GutterMark::Added };
                    marks.insert(line, mark);
                    line += 1;
                }
                LineKind::Context => line += 1,
                LineKind::Removed | LineKind::HunkHeader => {}
            }
        }
    }
    marks
}

/// The viewer, its workspace and the git backend, wired together.
pub struct App {
    pub state: AppState,
    pub viewer: HunkViewer,
    pub git: GitClient,
    pub pattern: BoundaryPattern,
}

impl App {
    pub fn new(state: AppState, viewer: HunkViewer, git: GitClient, config: &Config) -> Self {
        let mut app = Self { state, viewer, git, pattern: config.boundary() };
        app.refresh_gutter();
        app
    }

    /// Recomputes gutter markers; failures leave the gutter empty.
    pub fn refresh_gutter(&mut self) {
        match self.git.compute_diff(&self.state.file, &self.state.revision) {
            Ok(raw) => {
                let diff = DiffText::parse(&raw, &self.pattern);
                self.state.refresh_gutter(&diff);
            }
            Err(e) => {
                debug!(error = %e, "gutter diff unavailable");
                self.state.gutter.clear();
            }
        }
    }

    /// Reports the outcome of a show or navigation request on the status line.
    pub fn report(&mut self, result: Result<Shown, HunkError>) {
        match result {
            Ok(Shown::Hunk) => {
                let mut hints = Vec::new();
                if self.viewer.has_previous(&self.state) {
                    hints.push("[ prev");
                }
                if self.viewer.has_next(&self.state) {
                    hints.push("] next");
                }
                self.state.set_status(hints.join("  "));
            }
            Ok(Shown::RawDiff) => {
                self.state.set_status("no renderer configured, showing the raw diff");
            }
            Err(e) => {
                info!(error = %e, "hunk request refused");
                self.state.set_error(e.to_string());
            }
        }
    }

    pub fn show(&mut self) {
        let result = self.viewer.show(&mut self.state);
        self.report(result);
    }

    pub fn go_previous(&mut self) {
        let result = self.viewer.go_previous(&mut self.state);
        self.report(result);
    }

    pub fn go_next(&mut self) {
        let result = self.viewer.go_next(&mut self.state);
        self.report(result);
    }

    /// Hides the shown hunk. Returns `false` when nothing was open.
    pub fn hide(&mut self) -> bool {
        self.viewer.hide(&mut self.state)
    }

    /// Copies the original text of the last extracted hunk.
    pub fn yank(&mut self) {
        if self.viewer.shown_hunk().is_none() {
            self.state.set_error(HunkError::NoHunkShown.to_string());
            return;
        }
        let text = self.viewer.original_text().to_owned();
        let count = if text.is_empty() { 0 } else { text.lines().count() };
        self.state.yanked = Some(text);
        self.state.set_status(format!("copied {count} original line(s), printed on exit"));
    }

    /// Reverts the shown hunk, then reloads the file and gutter.
    pub fn revert(&mut self) {
        match self.viewer.revert(&mut self.state) {
            Ok(location) => {
                if let Err(e) = self.state.reload() {
                    warn!(error = %e, "reload after revert failed");
                    self.state.set_error(format!("{e:#}"));
                    return;
                }
                self.refresh_gutter();
                self.state.move_to_line(location.start);
                self.state.set_status(format!("reverted hunk at line {}", location.start));
            }
            Err(e) => {
                info!(error = %e, "revert refused");
                self.state.set_error(e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(lines: &[&str]) -> AppState {
        AppState {
            mode: Mode::Normal,
            view: View::File,
            file: PathBuf::from("a.txt"),
            file_lines: lines.iter().map(|s| s.to_string()).collect(),
            cursor_line: 1,
            scroll: 0,
            viewport_height: 4,
            gutter: HashMap::new(),
            raw_diff: Vec::new(),
            raw_cursor: 0,
            raw_scroll: 0,
            help_scroll: 0,
            status: None,
            yanked: None,
            revision: "HEAD".into(),
            renderer_name: "floating".into(),
            floating_pct: (70, 60),
            overlay: HunkSlot::default(),
            popup_area: None,
        }
    }

    #[test]
    fn move_to_line_clamps_and_scrolls() {
        let mut state = state_with(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        state.move_to_line(7);
        assert_eq!(state.cursor_line, 7);
        assert_eq!(state.scroll, 3);
        state.move_to_line(99);
        assert_eq!(state.cursor_line, 8);
        state.move_to_line(0);
        assert_eq!(state.cursor_line, 1);
        assert_eq!(state.scroll, 0);
    }

    #[test]
    fn raw_diff_origin_round_trips_through_restore() {
        let mut state = state_with(&["a", "b", "c"]);
        let diff = DiffText::parse("@@ -1 +1 @@\n-a\n+A\n", &BoundaryPattern::default());
        state.show_raw_diff(&diff, 2);
        assert_eq!(state.view, View::RawDiff);
        let origin = state.origin();

        state.move_to_line(3);
        assert_eq!(state.view, View::File);
        state.restore(&origin);
        assert_eq!(state.view, View::RawDiff);
    }

    #[test]
    fn status_expires_after_ticks() {
        let mut state = state_with(&["a"]);
        state.set_status("hello");
        for _ in 0..STATUS_TICKS - 1 {
            state.tick();
        }
        assert!(state.status.is_some());
        state.tick();
        assert!(state.status.is_none());
    }

    #[test]
    fn gutter_marks_added_modified_and_removed() {
        let raw = "\
@@ -1,2 +1,3 @@
 one
+new
 two
@@ -5,2 +6,2 @@
-five
+FIVE
 six
@@ -9,2 +9,0 @@
-nine
-ten
";
        let diff = DiffText::parse(raw, &BoundaryPattern::default());
        let marks = gutter_marks(&diff);
        assert_eq!(marks.get(&2), Some(&GutterMark::Added));
        assert_eq!(marks.get(&6), Some(&GutterMark::Modified));
        assert_eq!(marks.get(&9), Some(&GutterMark::Removed));
        assert_eq!(marks.len(), 3);
    }
}
