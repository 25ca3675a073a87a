//! Keybinding dispatcher for hunkpeek.
//!
//! Translates crossterm key and mouse events into `App` calls and returns a
//! `KeyAction` telling the event loop whether to continue or quit. The
//! dispatcher branches first on `state.mode` so the help overlay and normal
//! navigation have isolated handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use hunkpeek_core::Workspace;
use ratatui::layout::Position;

use crate::app::{App, Mode, View};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly.
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
///
/// # Arguments
///
/// * `key` — the raw crossterm key event (code + modifiers)
/// * `app` — the application: state, viewer and git backend
pub fn handle_key(key: KeyEvent, app: &mut App) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match app.state.mode {
        Mode::HelpOverlay => handle_help(key, app),
        Mode::Normal => handle_normal(key, app),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

/// Handles a key event while in Normal mode.
///
/// Cursor keys dismiss an open hunk first, the same way moving away from a
/// hunk in an editor closes its preview.
fn handle_normal(key: KeyEvent, app: &mut App) -> KeyAction {
    if let Some(delta) = cursor_delta(key, app) {
        app.hide();
        app.state.move_cursor(delta);
        return KeyAction::Continue;
    }

    match key.code {
        KeyCode::Enter | KeyCode::Char('s') => app.show(),
        KeyCode::Char('[') => app.go_previous(),
        KeyCode::Char(']') => app.go_next(),
        KeyCode::Char('y') => app.yank(),
        KeyCode::Char('r') => app.revert(),

        KeyCode::Char('?') => {
            app.state.help_scroll = 0;
            app.state.mode = Mode::HelpOverlay;
        }

        // Peel one layer per press: hunk, then raw diff, then the program.
        KeyCode::Char('q') | KeyCode::Esc => {
            if app.hide() {
                return KeyAction::Continue;
            }
            if app.state.view == View::RawDiff {
                let line = app.state.cursor_line;
                app.state.move_to_line(line);
                return KeyAction::Continue;
            }
            return KeyAction::Quit;
        }

        _ => {}
    }
    KeyAction::Continue
}

/// Cursor movement for `key`, as a signed line delta, if it is a motion key.
fn cursor_delta(key: KeyEvent, app: &App) -> Option<i64> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(1),
        KeyCode::Char('k') | KeyCode::Up => Some(-1),
        KeyCode::Char('g') | KeyCode::Home => Some(i64::MIN / 2),
        KeyCode::Char('G') | KeyCode::End => Some(i64::MAX / 2),
        KeyCode::Char('d') if ctrl => Some(app.state.half_page()),
        KeyCode::Char('u') if ctrl => Some(-app.state.half_page()),
        KeyCode::PageDown => Some(app.state.half_page() * 2),
        KeyCode::PageUp => Some(-app.state.half_page() * 2),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// Handles a key event while the help overlay is visible.
///
/// `?`, `Esc` and `q` dismiss the overlay; j/k/g/G scroll it.
fn handle_help(key: KeyEvent, app: &mut App) -> KeyAction {
    let state = &mut app.state;
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('G') => state.help_scroll = u16::MAX,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: click-away dismissal and scroll-wheel.
///
/// A left click outside the floating panel hides the hunk; the renderer's own
/// UI closes the session the same way an explicit hide does. The wheel moves
/// the cursor by 3 lines, or scrolls the help overlay.
///
/// # Arguments
///
/// * `mouse` — the crossterm mouse event
/// * `app` — the application
pub fn handle_mouse(mouse: MouseEvent, app: &mut App) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let pos = Position { x: mouse.column, y: mouse.row };
            let inside = app.state.popup_area.is_some_and(|area| area.contains(pos));
            if !inside && app.state.mode == Mode::Normal {
                app.hide();
            }
        }
        MouseEventKind::ScrollUp => scroll(app, -3),
        MouseEventKind::ScrollDown => scroll(app, 3),
        _ => {}
    }
    KeyAction::Continue
}

fn scroll(app: &mut App, delta: i64) {
    if app.state.mode == Mode::HelpOverlay {
        let step = delta.unsigned_abs() as u16;
        app.state.help_scroll = if delta < 0 {
            app.state.help_scroll.saturating_sub(step)
        } else {
            app.state.help_scroll.saturating_add(step)
        };
        return;
    }
    app.hide();
    app.state.move_cursor(delta);
}
