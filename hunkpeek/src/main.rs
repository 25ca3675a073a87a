//! hunkpeek — show, navigate and revert single diff hunks of a file.
//!
//! Entry point for the `hunkpeek` binary. Wires together configuration and
//! logging, the git worker (`git`), the hunk renderers (`render`), the
//! terminal lifecycle (`tui`), the event bus (`event`) and the UI (`ui`).
//!
//! # Startup sequence
//!
//! 1. Parse arguments, load config, start file logging. Errors here are
//!    reported on stderr before the terminal is touched.
//! 2. Spawn the git worker and build the viewer with the configured renderer.
//! 3. `install_panic_hook()`, then `register_sigterm()`, then `init_tui()`.
//! 4. Run the event loop. It exits only via `break`, so `restore_tui()` is
//!    always reached.
//! 5. Print any yanked original text to stdout.

mod app;
mod event;
mod git;
mod highlight;
mod logging;
mod render;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::Context;
use clap::Parser;
use hunkpeek_core::{Config, HunkViewer, RendererRegistry, Workspace};
use tracing::{error, info, warn};

use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

/// Show the diff hunk under the cursor of a file, step between hunks and
/// revert them.
#[derive(Debug, Parser)]
#[command(name = "hunkpeek", version, about)]
struct Args {
    /// File to inspect. Must be tracked by git.
    file: PathBuf,

    /// Start with the cursor on this line and show its hunk.
    #[arg(short, long)]
    line: Option<u32>,

    /// Revision to diff against (default from config, else HEAD).
    #[arg(short, long)]
    rev: Option<String>,

    /// Renderer: inline, floating or none.
    #[arg(long)]
    renderer: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/hunkpeek/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file, or a directory to put hunkpeek.log in.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Loads the config file, falling back to defaults on any error.
///
/// Config errors are soft failures: printed to stderr and logged, never fatal.
fn load_config(path: Option<PathBuf>) -> Config {
    let path = path.unwrap_or_else(hunkpeek_core::config::config_path);
    match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("hunkpeek: {e}, using defaults");
            warn!(error = %e, "config fallback to defaults");
            Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let log = logging::init(args.log_file.clone())?;

    let mut config = load_config(args.config.clone());
    if let Some(rev) = args.rev {
        config.revision = rev;
    }
    if let Some(renderer) = args.renderer {
        config.renderer = Some(renderer);
    }
    info!(file = %args.file.display(), log = %log.log_file.display(), ?config, "starting");

    let theme = theme::Theme::from_name(&config.theme);
    let git = git::GitClient::spawn(&args.file);

    let overlay = render::HunkSlot::default();
    let mut registry = RendererRegistry::new();
    render::register_builtin(&mut registry, &overlay, &highlight::file_ext(&args.file));
    highlight::warm_up();

    let viewer = HunkViewer::new(Box::new(git.clone()), Box::new(git.clone()), &config)
        .with_renderer(registry.resolve(config.renderer.as_deref()))
        .with_revert(Box::new(git.clone()));

    let state = app::AppState::load(&args.file, &config, overlay)
        .with_context(|| format!("hunkpeek: cannot open {}", args.file.display()))?;
    let mut app = app::App::new(state, viewer, git, &config);
    if let Some(line) = args.line {
        app.state.move_to_line(line);
        app.show();
    }

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    // Draw errors are kept until after the terminal is restored.
    let mut outcome: anyhow::Result<()> = Ok(());

    'event_loop: loop {
        tokio::select! {
            // Heartbeat: SIGTERM is checked at least every 50ms even when the
            // terminal is quiet.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event::AppEvent::Render) => {
                        let hunk_open = app.viewer.is_open();
                        if let Err(e) = terminal
                            .draw(|frame| ui::render(frame, &mut app.state, hunk_open, &theme))
                        {
                            outcome = Err(e).context("draw failed");
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Key(key)) => {
                        if handle_key(key, &mut app) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Mouse(mouse)) => {
                        if handle_mouse(mouse, &mut app) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(event::AppEvent::Tick) => app.state.tick(),
                    // ratatui picks up the new size on the next draw.
                    Some(event::AppEvent::Resize(_, _)) => {}
                    None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    app.hide();
    tui::restore_tui()?;
    if let Err(e) = &outcome {
        error!(error = %e, "exiting after error");
    }
    outcome?;

    if let Some(text) = app.state.yanked.take() {
        println!("{text}");
    }
    info!("exiting");
    Ok(())
}
