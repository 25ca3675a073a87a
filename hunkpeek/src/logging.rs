//! File logging for hunkpeek.
//!
//! The TUI owns the terminal, so logs only ever go to a file.
//!
//! ## Environment Variables
//!
//! 1. **`HUNKPEEK_LOG`** (highest priority) - a bare level like `debug` applies
//!    to the hunkpeek crates; anything with `=`, `:` or `,` is used verbatim
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for hunkpeek crates
//!
//! ## Log File Location
//!
//! Default: `$XDG_STATE_HOME/hunkpeek/hunkpeek.log`, falling back to
//! `~/.local/state/hunkpeek/hunkpeek.log`. Override with `--log-file <path>`.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

const LOG_FILE_NAME: &str = "hunkpeek.log";

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

/// Initialize file logging.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program;
/// dropping it flushes and stops the background writer.
///
/// # Arguments
///
/// * `override_path` — `--log-file` value; a path with an extension names the
///   file, anything else names the directory
pub fn init(override_path: Option<PathBuf>) -> anyhow::Result<LogGuard> {
    let (log_dir, filename) = resolve_log_path(override_path);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("cannot create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_filter());

    Registry::default()
        .with(file_layer)
        .try_init()
        .context("logging already initialized")?;

    Ok(LogGuard { _file_guard: file_guard, log_file: log_dir.join(filename) })
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| LOG_FILE_NAME.to_owned());
            return (dir, name);
        }
        return (path, LOG_FILE_NAME.to_owned());
    }

    let base = env::var("XDG_STATE_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".local").join("state"))
        })
        .unwrap_or_else(|| PathBuf::from("."));
    (base.join("hunkpeek"), LOG_FILE_NAME.to_owned())
}

/// Create the [`EnvFilter`] following `HUNKPEEK_LOG` > `RUST_LOG` > defaults.
fn create_filter() -> EnvFilter {
    if let Ok(level) = env::var("HUNKPEEK_LOG") {
        return expand_hunkpeek_log(&level);
    }
    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }
    EnvFilter::new("warn,hunkpeek=info,hunkpeek_core=info")
}

fn expand_hunkpeek_log(value: &str) -> EnvFilter {
    if value.contains(['=', ':', ',']) {
        return EnvFilter::new(value);
    }
    EnvFilter::new(format!("warn,hunkpeek={value},hunkpeek_core={value}"))
}
