//! Background thread that owns git2::Repository for its lifetime.
//!
//! git2::Repository is !Send, so it is discovered inside the thread and never
//! leaves it. Requests arrive over a crossbeam channel and each one is
//! answered on the reply sender it carries.

use std::path::{Path, PathBuf};

use crossbeam_channel::Receiver;
use git2::{DiffOptions, ObjectType, Patch, Repository, Status};
use hunkpeek_core::{HunkLocation, RevertError, SourceError};
use tracing::{debug, info, warn};

use crate::git::types::GitRequest;

const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file\n";

/// Entry point for the background thread that owns the git Repository.
///
/// Discovers the repository containing `path` and serves requests until every
/// sender is dropped. When no repository can be found the thread exits at
/// once; callers then see a disconnected channel and report the backend as
/// unavailable.
pub fn git_worker_loop(path: PathBuf, rx: Receiver<GitRequest>) {
    let start = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let repo = match Repository::discover(start) {
        Ok(r) => r,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "no git repository found");
            return;
        }
    };
    info!(workdir = ?repo.workdir(), "git worker started");

    for request in rx {
        handle_request(&repo, request);
    }
    debug!("git worker stopped");
}

/// Dispatches a request to the matching git2 operation and sends the answer.
///
/// Send failures mean the caller stopped waiting; they are ignored.
fn handle_request(repo: &Repository, request: GitRequest) {
    match request {
        GitRequest::Diff { file, revision, reply } => {
            let _ = reply.send(diff_file(repo, &file, &revision));
        }
        GitRequest::IsTracked { file, reply } => {
            let _ = reply.send(is_tracked(repo, &file));
        }
        GitRequest::Revert { location, reply } => {
            let _ = reply.send(revert_location(&location));
        }
    }
}

/// Path of `file` relative to the repository working directory.
fn repo_relative(repo: &Repository, file: &Path) -> Option<PathBuf> {
    let workdir = repo.workdir()?.canonicalize().ok()?;
    let absolute = file.canonicalize().ok()?;
    absolute.strip_prefix(&workdir).ok().map(Path::to_path_buf)
}

/// Returns `true` when `file` is inside the working directory and known to the
/// index or the reference tree. New and ignored files are not tracked.
pub fn is_tracked(repo: &Repository, file: &Path) -> bool {
    let Some(rel) = repo_relative(repo, file) else {
        return false;
    };
    match repo.status_file(&rel) {
        Ok(status) => !status.intersects(Status::WT_NEW | Status::IGNORED),
        Err(e) => {
            debug!(file = %rel.display(), error = %e, "status lookup failed");
            false
        }
    }
}

/// Diffs the working copy of `file` against its blob at `revision`.
///
/// The output holds hunk headers and marker-prefixed lines only, one per line.
/// File headers are omitted since the caller already knows the file. A file
/// absent from `revision` diffs against an empty blob.
pub fn diff_file(repo: &Repository, file: &Path, revision: &str) -> Result<String, SourceError> {
    let diff_err = |message: String| SourceError::Diff { file: file.to_path_buf(), message };

    let rel = repo_relative(repo, file)
        .ok_or_else(|| diff_err("not inside the repository working directory".to_owned()))?;
    let tree = repo
        .revparse_single(revision)
        .and_then(|obj| obj.peel_to_tree())
        .map_err(|e| diff_err(format!("cannot resolve {revision}: {}", e.message())))?;
    let old_blob = match tree.get_path(&rel) {
        Ok(entry) if entry.kind() == Some(ObjectType::Blob) => Some(
            repo.find_blob(entry.id())
                .map_err(|e| diff_err(e.message().to_owned()))?,
        ),
        Ok(_) => return Err(diff_err(format!("not a file in {revision}"))),
        Err(e) if e.code() == git2::ErrorCode::NotFound => None,
        Err(e) => return Err(diff_err(e.message().to_owned())),
    };

    let working = std::fs::read(file)
        .map_err(|source| SourceError::Io { file: file.to_path_buf(), source })?;

    let mut opts = DiffOptions::new();
    opts.context_lines(3);
    let patch = Patch::from_buffers(
        old_blob.as_ref().map_or(&[][..], |b| b.content()),
        Some(rel.as_path()),
        &working,
        Some(rel.as_path()),
        Some(&mut opts),
    )
    .map_err(|e| diff_err(e.message().to_owned()))?;

    let mut out = String::new();
    for h in 0..patch.num_hunks() {
        let (hunk, line_count) = patch.hunk(h).map_err(|e| diff_err(e.message().to_owned()))?;
        out.push_str(String::from_utf8_lossy(hunk.header()).trim_end());
        out.push('\n');
        for l in 0..line_count {
            let line = patch
                .line_in_hunk(h, l)
                .map_err(|e| diff_err(e.message().to_owned()))?;
            match line.origin() {
                origin @ ('+' | '-' | ' ') => {
                    out.push(origin);
                    let content = String::from_utf8_lossy(line.content());
                    out.push_str(content.trim_end_matches('\n').trim_end_matches('\r'));
                    out.push('\n');
                }
                // End-of-file newline changes follow the line they apply to.
                '<' | '>' | '=' => out.push_str(NO_NEWLINE_MARKER),
                _ => {}
            }
        }
    }
    debug!(file = %rel.display(), %revision, hunks = patch.num_hunks(), "diff computed");
    Ok(out)
}

/// Writes `location.restored` over `location.current` in the working file.
///
/// Refuses with [`RevertError::Stale`] when the lines at `location.start` no
/// longer match what the hunk showed. Lines outside the span keep their
/// endings byte for byte; restored lines take the file's dominant ending. When
/// the span runs to the end of the file, the final newline follows the
/// reference side.
pub fn revert_location(location: &HunkLocation) -> Result<(), RevertError> {
    let file = &location.file;
    let io_err = |source| RevertError::Io { file: file.clone(), source };
    let stale = || RevertError::Stale(file.clone());

    let content = std::fs::read_to_string(file).map_err(io_err)?;
    let eol = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let segments: Vec<&str> = content.split_inclusive('\n').collect();

    let from = location.start.saturating_sub(1) as usize;
    let to = from + location.current.len();
    if to > segments.len() {
        return Err(stale());
    }
    let current = &segments[from..to];
    if current.iter().zip(&location.current).any(|(have, want)| line_text(have) != want) {
        return Err(stale());
    }
    let at_end = to == segments.len();
    if at_end
        && current.last().is_some_and(|last| last.ends_with('\n') == location.current_missing_newline)
    {
        return Err(stale());
    }

    let mut rewritten = segments[..from].concat();
    if !location.restored.is_empty() && !rewritten.is_empty() && !rewritten.ends_with('\n') {
        rewritten.push_str(eol);
    }
    for (i, line) in location.restored.iter().enumerate() {
        rewritten.push_str(line);
        let ends_file = at_end && i + 1 == location.restored.len();
        if !(ends_file && location.restored_missing_newline) {
            rewritten.push_str(eol);
        }
    }
    rewritten.push_str(&segments[to..].concat());

    std::fs::write(file, rewritten).map_err(io_err)?;
    info!(file = %file.display(), start = location.start, "hunk reverted");
    Ok(())
}

/// A file line without its `\n` or `\r\n` terminator.
fn line_text(segment: &str) -> &str {
    match segment.strip_suffix('\n') {
        Some(line) => line.strip_suffix('\r').unwrap_or(line),
        None => segment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{IndexAddOption, Signature};
    use hunkpeek_core::{locate, BoundaryPattern, DiffText, HunkExtractor};
    use tempfile::TempDir;

    /// Creates a repository with `name` committed as `content`.
    fn repo_with(name: &str, content: &str) -> (TempDir, Repository, PathBuf) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        {
            let mut index = repo.index().unwrap();
            index.add_all(["*"], IndexAddOption::DEFAULT, None).unwrap();
            index.write().unwrap();
            let tree_id = index.write_tree().unwrap();
            let tree = repo.find_tree(tree_id).unwrap();
            let sig = Signature::now("test", "test@example.com").unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[]).unwrap();
        }
        (dir, repo, path)
    }

    /// Runs the diff of `path` against HEAD through locate and extract and
    /// returns the location of the hunk covering working-file `line`.
    fn location_at(repo: &Repository, path: &Path, line: u32) -> HunkLocation {
        let raw = diff_file(repo, path, "HEAD").unwrap();
        let diff = DiffText::parse(&raw, &BoundaryPattern::default());
        let cursor = diff.index_for_line(line);
        let hunk = HunkExtractor::new().extract(&diff, locate(&diff, cursor), cursor).unwrap();
        hunk.location(path).unwrap()
    }

    const BASE: &str = "one\ntwo\nthree\nfour\nfive\nsix\nseven\neight\nnine\nten\n";

    #[test]
    fn diff_emits_headers_and_marked_lines_only() {
        let (_dir, repo, path) = repo_with("a.txt", BASE);
        std::fs::write(&path, BASE.replace("two\n", "TWO\n")).unwrap();

        let diff = diff_file(&repo, &path, "HEAD").unwrap();
        let lines: Vec<&str> = diff.lines().collect();
        assert!(lines[0].starts_with("@@ -1,5 +1,5 @@"), "got {:?}", lines[0]);
        assert!(lines.contains(&"-two"));
        assert!(lines.contains(&"+TWO"));
        assert!(lines.iter().all(|l| !l.starts_with("---") && !l.starts_with("+++")));
    }

    #[test]
    fn unchanged_file_has_empty_diff() {
        let (_dir, repo, path) = repo_with("a.txt", BASE);
        assert_eq!(diff_file(&repo, &path, "HEAD").unwrap(), "");
    }

    #[test]
    fn unknown_revision_is_a_diff_error() {
        let (_dir, repo, path) = repo_with("a.txt", BASE);
        assert!(matches!(
            diff_file(&repo, &path, "no-such-branch"),
            Err(SourceError::Diff { .. })
        ));
    }

    #[test]
    fn tracking_distinguishes_new_files() {
        let (dir, repo, path) = repo_with("a.txt", BASE);
        assert!(is_tracked(&repo, &path));

        let fresh = dir.path().join("b.txt");
        std::fs::write(&fresh, "new\n").unwrap();
        assert!(!is_tracked(&repo, &fresh));
    }

    #[test]
    fn revert_restores_lines_and_trailing_newline() {
        let (_dir, _repo, path) = repo_with("a.txt", "a\nb\nc\n");
        std::fs::write(&path, "a\nB\nB2\nc\n").unwrap();

        let location = HunkLocation {
            file: path.clone(),
            start: 2,
            current: vec!["B".into(), "B2".into()],
            restored: vec!["b".into()],
            current_missing_newline: false,
            restored_missing_newline: false,
        };
        revert_location(&location).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\nc\n");
    }

    #[test]
    fn revert_refuses_stale_location() {
        let (_dir, _repo, path) = repo_with("a.txt", "a\nb\nc\n");
        std::fs::write(&path, "a\nX\nc\n").unwrap();

        let location = HunkLocation {
            file: path.clone(),
            start: 2,
            current: vec!["B".into()],
            restored: vec!["b".into()],
            current_missing_newline: false,
            restored_missing_newline: false,
        };
        assert!(matches!(revert_location(&location), Err(RevertError::Stale(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nX\nc\n");
    }

    #[test]
    fn revert_keeps_crlf_endings_of_untouched_lines() {
        let base: String = (1..=10).map(|n| format!("l{n}\r\n")).collect();
        let (_dir, repo, path) = repo_with("crlf.txt", &base);
        std::fs::write(&path, base.replace("l2\r\n", "L2\r\n")).unwrap();

        let location = location_at(&repo, &path, 2);
        assert_eq!(location.current, vec!["L2"]);
        assert_eq!(location.restored, vec!["l2"]);
        revert_location(&location).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), base);
    }

    #[test]
    fn diff_marks_missing_final_newline() {
        let (_dir, repo, path) = repo_with("a.txt", "a\nb");
        std::fs::write(&path, "a\nb\n").unwrap();

        let diff = diff_file(&repo, &path, "HEAD").unwrap();
        assert!(diff.contains("-b\n\\ No newline at end of file\n+b\n"), "got {diff:?}");
    }

    #[test]
    fn revert_drops_an_added_final_newline() {
        let (_dir, repo, path) = repo_with("a.txt", "a\nb");
        std::fs::write(&path, "a\nb\n").unwrap();

        let location = location_at(&repo, &path, 2);
        assert!(location.restored_missing_newline);
        revert_location(&location).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb");
    }

    #[test]
    fn revert_restores_a_removed_final_newline() {
        let (_dir, repo, path) = repo_with("a.txt", "a\nb\n");
        std::fs::write(&path, "a\nb").unwrap();

        let location = location_at(&repo, &path, 2);
        assert!(location.current_missing_newline);
        revert_location(&location).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
    }
}
