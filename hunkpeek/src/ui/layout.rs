//! Layout helpers for hunkpeek.
//!
//! Pure layout arithmetic, recomputed inside `terminal.draw()` on every render
//! so every frame reflects the current terminal size.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::{AppState, Mode, View};
use crate::theme::Theme;

/// Returns `[main, status_bar]` `Rect`s for the current frame.
///
/// The returned rects are valid only for the current draw closure.
///
/// # Arguments
///
/// * `frame` — current render frame (provides `frame.area()` with live terminal size)
pub fn compute_layout(frame: &Frame) -> [Rect; 2] {
    frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]))
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border on each side.
///
/// # Arguments
///
/// * `area` — the outer `Rect` of the panel (including borders)
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// Overlays get a thick border in the active color; the file view a plain one.
///
/// # Arguments
///
/// * `title` — panel title shown in the top border
/// * `is_overlay` — `true` for panels drawn on top of the file view
/// * `theme` — active color theme
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_overlay: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_overlay {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_overlay { BorderType::Thick } else { BorderType::Plain };

    Block::bordered().title(title).border_type(border_type).border_style(border_style)
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Shows the view, the file and revision, the cursor line, and the current
/// status message if any.
///
/// # Arguments
///
/// * `frame` — current render frame
/// * `area` — the 1-row `Rect` returned by `compute_layout`
/// * `state` — read-only app state
/// * `hunk_open` — whether a hunk session is open
/// * `theme` — active color theme
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    hunk_open: bool,
    theme: &Theme,
) {
    let mode_text = match (state.mode, state.view, hunk_open) {
        (Mode::HelpOverlay, _, _) => " HELP ",
        (_, View::RawDiff, _) => " DIFF ",
        (_, _, true) => " HUNK ",
        _ => " FILE ",
    };

    let mut spans = vec![
        Span::styled(
            mode_text,
            Style::default().fg(theme.status_mode_normal).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " {} @ {}  {}:{} ",
            state.file.display(),
            state.revision,
            state.cursor_line,
            state.file_lines.len(),
        )),
        Span::raw(format!("[{}] ", state.renderer_name)),
    ];
    if let Some(status) = &state.status {
        let style = if status.is_error {
            Style::default().fg(theme.status_error).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(status.text.clone(), style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
