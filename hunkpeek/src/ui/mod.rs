//! UI rendering module for hunkpeek.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`; each
//! surface has its own file.

mod file_view;
mod help;
mod hunk_popup;
pub mod keybindings;
mod layout;
mod raw_diff;

use ratatui::{Frame, style::Style, widgets::Block};

use crate::app::{AppState, Mode, View};
use crate::render::Placement;
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame.
///
/// Called exactly once per `AppEvent::Render`. The main panel's inner height
/// is cached in `state` so that half-page moves triggered by the *next*
/// keypress use the current size. The floating panel's area is cached too,
/// for click-away dismissal.
///
/// # Arguments
///
/// * `frame` — current render frame provided by `terminal.draw()`
/// * `state` — mutable reference to app state
/// * `hunk_open` — whether a hunk session is open
/// * `theme` — active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, hunk_open: bool, theme: &Theme) {
    frame.render_widget(Block::default().style(Style::default().bg(theme.background)), frame.area());
    let [main, status_bar] = compute_layout(frame);
    state.viewport_height = inner_rect(main).height;

    let overlay = state.overlay.current();

    match state.view {
        View::File => file_view::render_file(frame, main, state, overlay.as_ref(), theme),
        View::RawDiff => raw_diff::render_raw_diff(frame, main, state, theme),
    }

    state.popup_area = None;
    if let Some(o) = overlay.as_ref().filter(|o| o.placement == Placement::Floating) {
        state.popup_area = hunk_popup::render_hunk_popup(frame, o, state.floating_pct, theme);
    }

    render_status_bar(frame, status_bar, state, hunk_open, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}
