//! Integration tests for the show / hide / navigate pipeline.
//!
//! Exercises: HunkViewer::{show, hide, has_previous, has_next, go_previous,
//! go_next, revert, original_text, current_location}, SessionState,
//! RendererRegistry, against in-memory fakes for every collaborator.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hunkpeek_core::{
    Config, DiffSource, DiffText, Direction, ExtractedHunk, HunkError, HunkLocation, HunkViewer,
    Origin, Position, Renderer, RendererRegistry, RevertAction, RevertError, SessionState,
    Shown, SourceError, Teardown, VersionControlProbe, Workspace,
};

/// Three hunks anchored on working-file lines 2, 10..=11 and 20.
const THREE_HUNKS: &str = "\
@@ -2,1 +2,1 @@
-old two
+new two
@@ -10,0 +10,2 @@
+added ten
+added eleven
@@ -18,2 +20,1 @@
-old eighteen
-old nineteen
+new twenty
";

struct FakeSource(&'static str);

impl DiffSource for FakeSource {
    fn compute_diff(&self, _file: &Path, _revision: &str) -> Result<String, SourceError> {
        Ok(self.0.to_owned())
    }
}

struct FailingSource;

impl DiffSource for FailingSource {
    fn compute_diff(&self, file: &Path, _revision: &str) -> Result<String, SourceError> {
        Err(SourceError::Diff { file: file.to_path_buf(), message: "boom".to_owned() })
    }
}

struct FakeProbe(bool);

impl VersionControlProbe for FakeProbe {
    fn is_tracked(&self, _file: &Path) -> bool {
        self.0
    }
}

/// Records every hunk shown and counts teardowns.
#[derive(Clone, Default)]
struct Recorder {
    shown: Arc<Mutex<Vec<ExtractedHunk>>>,
    torn_down: Arc<AtomicUsize>,
}

impl Recorder {
    fn shown(&self) -> Vec<ExtractedHunk> {
        self.shown.lock().unwrap().clone()
    }

    fn torn_down(&self) -> usize {
        self.torn_down.load(Ordering::SeqCst)
    }
}

struct FakeRenderer(Recorder);

impl Renderer for FakeRenderer {
    fn show(&mut self, hunk: &ExtractedHunk) -> Teardown {
        self.0.shown.lock().unwrap().push(hunk.clone());
        let counter = Arc::clone(&self.0.torn_down);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }
}

#[derive(Clone, Default)]
struct FakeRevert {
    calls: Arc<Mutex<Vec<(String, HunkLocation)>>>,
}

impl RevertAction for FakeRevert {
    fn revert(&mut self, original: &str, location: &HunkLocation) -> Result<(), RevertError> {
        self.calls.lock().unwrap().push((original.to_owned(), location.clone()));
        Ok(())
    }
}

struct FakeWorkspace {
    file: PathBuf,
    line: u32,
    restores: usize,
    raw_cursor: Option<usize>,
}

impl FakeWorkspace {
    fn at(line: u32) -> Self {
        Self { file: PathBuf::from("src/main.rs"), line, restores: 0, raw_cursor: None }
    }
}

impl Workspace for FakeWorkspace {
    fn file(&self) -> &Path {
        &self.file
    }

    fn origin(&self) -> Origin {
        Origin {
            view: "file".to_owned(),
            file: self.file.clone(),
            position: Position { line: self.line, column: 0 },
        }
    }

    fn move_to_line(&mut self, line: u32) {
        self.line = line;
    }

    fn restore(&mut self, origin: &Origin) {
        self.restores += 1;
        self.line = origin.position.line;
    }

    fn show_raw_diff(&mut self, _diff: &DiffText, cursor: usize) {
        self.raw_cursor = Some(cursor);
    }
}

fn viewer(recorder: &Recorder) -> HunkViewer {
    HunkViewer::new(Box::new(FakeSource(THREE_HUNKS)), Box::new(FakeProbe(true)), &Config::default())
        .with_renderer(Some(Box::new(FakeRenderer(recorder.clone()))))
}

#[test]
fn show_opens_a_session_on_the_hunk_under_the_cursor() {
    let rec = Recorder::default();
    let mut viewer = viewer(&rec);
    let mut ws = FakeWorkspace::at(11);

    assert_eq!(viewer.show(&mut ws).unwrap(), Shown::Hunk);
    assert!(viewer.is_open());

    let shown = rec.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].anchor_line(), 10);
    assert_eq!(shown[0].lines.len(), 2);
    assert_eq!(shown[0].highlight_index, 1, "line 11 is the second added line");
    assert_eq!(ws.line, 11, "cursor inside a change is not moved");
}

#[test]
fn show_outside_a_change_snaps_backward_then_forward() {
    let rec = Recorder::default();
    let mut viewer = viewer(&rec);

    let mut ws = FakeWorkspace::at(15);
    viewer.show(&mut ws).unwrap();
    assert_eq!(ws.line, 10, "snaps to the previous hunk");

    let mut ws = FakeWorkspace::at(1);
    viewer.show(&mut ws).unwrap();
    assert_eq!(ws.line, 2, "nothing before line 1, snaps forward");
}

#[test]
fn show_while_open_replaces_the_session() {
    let rec = Recorder::default();
    let mut viewer = viewer(&rec);
    let mut ws = FakeWorkspace::at(2);

    viewer.show(&mut ws).unwrap();
    viewer.show(&mut ws).unwrap();
    assert_eq!(rec.torn_down(), 1, "first renderer torn down before the second");
    assert!(viewer.is_open());
}

#[test]
fn hide_is_idempotent() {
    let rec = Recorder::default();
    let mut viewer = viewer(&rec);
    let mut ws = FakeWorkspace::at(2);

    viewer.show(&mut ws).unwrap();
    assert!(viewer.hide(&mut ws));
    assert!(!viewer.hide(&mut ws));
    assert!(!viewer.hide(&mut ws));

    assert_eq!(rec.torn_down(), 1, "teardown runs exactly once");
    assert_eq!(ws.restores, 1);
    assert!(!viewer.is_open());
}

#[test]
fn hide_restores_the_origin() {
    let rec = Recorder::default();
    let mut viewer = viewer(&rec);
    let mut ws = FakeWorkspace::at(20);

    viewer.show(&mut ws).unwrap();
    ws.line = 42;
    viewer.hide(&mut ws);
    assert_eq!(ws.line, 20);
}

#[test]
fn untracked_file_is_refused_without_touching_state() {
    let rec = Recorder::default();
    let mut viewer = HunkViewer::new(
        Box::new(FakeSource(THREE_HUNKS)),
        Box::new(FakeProbe(false)),
        &Config::default(),
    )
    .with_renderer(Some(Box::new(FakeRenderer(rec.clone()))));
    let mut ws = FakeWorkspace::at(15);

    let err = viewer.show(&mut ws).unwrap_err();
    assert!(matches!(err, HunkError::NotTracked(ref p) if p == Path::new("src/main.rs")));
    assert!(!viewer.is_open());
    assert!(rec.shown().is_empty());
    assert_eq!(ws.line, 15, "no snap happened");
    assert!(!viewer.has_next(&ws));
}

#[test]
fn next_then_previous_round_trips() {
    let rec = Recorder::default();
    let mut viewer = viewer(&rec);
    let mut ws = FakeWorkspace::at(2);

    viewer.show(&mut ws).unwrap();
    viewer.go_next(&mut ws).unwrap();
    assert_eq!(ws.line, 10);
    assert_eq!(rec.torn_down(), 1);

    viewer.go_previous(&mut ws).unwrap();
    assert_eq!(ws.line, 2);
    assert_eq!(rec.torn_down(), 2);
    assert!(viewer.is_open());

    let shown = rec.shown();
    assert_eq!(shown.len(), 3);
    assert_eq!(shown[0], shown[2], "returned to the original hunk");
}

#[test]
fn previous_at_first_hunk_changes_nothing() {
    let rec = Recorder::default();
    let mut viewer = viewer(&rec);
    let mut ws = FakeWorkspace::at(2);

    viewer.show(&mut ws).unwrap();
    assert!(!viewer.has_previous(&ws));
    assert!(viewer.has_next(&ws));

    let err = viewer.go_previous(&mut ws).unwrap_err();
    assert!(matches!(err, HunkError::NoAdjacentHunk(Direction::Previous)));
    assert_eq!(err.to_string(), "no previous change");
    assert!(viewer.is_open(), "session left untouched");
    assert_eq!(rec.torn_down(), 0);
    assert_eq!(ws.line, 2);
}

#[test]
fn next_at_last_hunk_reports_no_next_change() {
    let rec = Recorder::default();
    let mut viewer = viewer(&rec);
    let mut ws = FakeWorkspace::at(20);

    viewer.show(&mut ws).unwrap();
    assert!(!viewer.has_next(&ws));
    let err = viewer.go_next(&mut ws).unwrap_err();
    assert_eq!(err.to_string(), "no next change");
    assert!(viewer.is_open());
}

#[test]
fn navigation_works_without_an_open_session() {
    let rec = Recorder::default();
    let mut viewer = viewer(&rec);
    let mut ws = FakeWorkspace::at(5);

    assert!(viewer.has_previous(&ws));
    viewer.go_next(&mut ws).unwrap();
    assert_eq!(ws.line, 10);
    assert!(viewer.is_open());
}

#[test]
fn missing_renderer_falls_back_to_raw_diff() {
    let mut viewer = HunkViewer::new(
        Box::new(FakeSource(THREE_HUNKS)),
        Box::new(FakeProbe(true)),
        &Config::default(),
    );
    let mut ws = FakeWorkspace::at(20);

    assert_eq!(viewer.show(&mut ws).unwrap(), Shown::RawDiff);
    assert_eq!(ws.raw_cursor, Some(9), "the '+new twenty' line");
    assert!(!viewer.is_open());
    assert_eq!(viewer.original_text(), "old eighteen\nold nineteen");
}

#[test]
fn unchanged_file_reports_no_changes() {
    let mut viewer = HunkViewer::new(Box::new(FakeSource("")), Box::new(FakeProbe(true)), &Config::default());
    let mut ws = FakeWorkspace::at(3);
    assert!(matches!(viewer.show(&mut ws), Err(HunkError::NoChanges)));
    assert!(!viewer.is_open());
}

#[test]
fn source_failure_is_reported_and_state_kept() {
    let rec = Recorder::default();
    let mut viewer = HunkViewer::new(Box::new(FailingSource), Box::new(FakeProbe(true)), &Config::default())
        .with_renderer(Some(Box::new(FakeRenderer(rec.clone()))));
    let mut ws = FakeWorkspace::at(3);
    assert!(matches!(viewer.show(&mut ws), Err(HunkError::Source(_))));
    assert!(!viewer.has_next(&ws));
}

#[test]
fn revert_closes_the_session_and_hands_over_original_text() {
    let rec = Recorder::default();
    let reverter = FakeRevert::default();
    let mut viewer = viewer(&rec).with_revert(Box::new(reverter.clone()));
    let mut ws = FakeWorkspace::at(2);

    viewer.show(&mut ws).unwrap();
    let location = viewer.revert(&mut ws).unwrap();
    assert!(!viewer.is_open());
    assert_eq!(rec.torn_down(), 1);

    let calls = reverter.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "old two");
    assert_eq!(calls[0].1, location);
    assert_eq!(location.start, 2);
    assert_eq!(location.current, vec!["new two"]);
    assert_eq!(location.restored, vec!["old two"]);
    drop(calls);

    assert!(matches!(viewer.revert(&mut ws), Err(HunkError::NoHunkShown)));
}

#[test]
fn revert_without_action_is_unsupported() {
    let rec = Recorder::default();
    let mut viewer = viewer(&rec);
    let mut ws = FakeWorkspace::at(2);
    viewer.show(&mut ws).unwrap();
    assert!(matches!(
        viewer.revert(&mut ws),
        Err(HunkError::Revert(RevertError::Unsupported))
    ));
    assert!(viewer.is_open(), "nothing closed when revert is unavailable");
}

#[test]
fn session_rejects_a_second_open() {
    let session = SessionState::new();
    let origin = FakeWorkspace::at(1).origin();
    assert!(session.open(origin.clone(), Box::new(|| {})));

    let second_ran = Arc::new(AtomicUsize::new(0));
    let flag = Arc::clone(&second_ran);
    let accepted = session.open(origin, Box::new(move || {
        flag.fetch_add(1, Ordering::SeqCst);
    }));
    assert!(!accepted);
    assert!(session.close(|_| {}));
    assert_eq!(second_ran.load(Ordering::SeqCst), 0, "rejected teardown never runs");
}

#[test]
fn teardown_may_reenter_close() {
    let session = SessionState::new();
    let runs = Arc::new(AtomicUsize::new(0));
    let inner = session.clone();
    let counter = Arc::clone(&runs);
    session.open(
        FakeWorkspace::at(1).origin(),
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            assert!(!inner.close(|_| {}), "re-entrant close is a no-op");
        }),
    );

    let mut restored = None;
    assert!(session.close(|o| restored = Some(o.position.line)));
    assert_eq!(restored, Some(1));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(!session.is_open());
}

#[test]
fn registry_resolves_configured_names() {
    let rec = Recorder::default();
    let mut registry = RendererRegistry::new();
    let r = rec.clone();
    registry.register("custom", move || Box::new(FakeRenderer(r.clone())) as Box<dyn Renderer>);

    assert_eq!(registry.names(), vec!["custom"]);
    assert!(registry.resolve(Some("custom")).is_some());
    assert!(registry.resolve(Some("none")).is_none());
    assert!(registry.resolve(Some("missing")).is_none());
    assert!(registry.resolve(None).is_none());
}

#[test]
fn current_location_follows_the_shown_hunk() {
    let rec = Recorder::default();
    let mut viewer = viewer(&rec).with_revert(Box::new(FakeRevert::default()));
    let mut ws = FakeWorkspace::at(2);
    assert!(viewer.current_location().is_none());

    viewer.show(&mut ws).unwrap();
    let location = viewer.current_location().unwrap();
    assert_eq!(location.file, PathBuf::from("src/main.rs"));
    assert_eq!(location.start, 2);
    assert_eq!(location.current, vec!["new two"]);
    assert_eq!(location.restored, vec!["old two"]);

    viewer.revert(&mut ws).unwrap();
    assert!(viewer.current_location().is_none());
}

/// Opens the viewer's session from inside `show`, so the viewer's own open is
/// refused.
struct GrabbingRenderer {
    session: Arc<Mutex<Option<SessionState>>>,
    torn_down: Arc<AtomicUsize>,
}

impl Renderer for GrabbingRenderer {
    fn show(&mut self, _hunk: &ExtractedHunk) -> Teardown {
        if let Some(session) = self.session.lock().unwrap().as_ref() {
            session.open(FakeWorkspace::at(1).origin(), Box::new(|| {}));
        }
        let counter = Arc::clone(&self.torn_down);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }
}

#[test]
fn rejected_open_dismisses_the_new_hunk() {
    let handle = Arc::new(Mutex::new(None));
    let torn_down = Arc::new(AtomicUsize::new(0));
    let renderer = GrabbingRenderer { session: Arc::clone(&handle), torn_down: Arc::clone(&torn_down) };
    let mut viewer = HunkViewer::new(
        Box::new(FakeSource(THREE_HUNKS)),
        Box::new(FakeProbe(true)),
        &Config::default(),
    )
    .with_renderer(Some(Box::new(renderer)));
    *handle.lock().unwrap() = Some(viewer.session().clone());

    let mut ws = FakeWorkspace::at(2);
    assert!(matches!(viewer.show(&mut ws), Err(HunkError::SessionBusy)));
    assert_eq!(torn_down.load(Ordering::SeqCst), 1, "refused hunk is torn down at once");
    assert!(viewer.shown_hunk().is_none());
    assert!(viewer.current_location().is_none());

    assert!(viewer.hide(&mut ws), "the session that won is still closable");
    assert_eq!(torn_down.load(Ordering::SeqCst), 1);
}
