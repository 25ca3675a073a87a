//! Floating hunk panel.
//!
//! Drawn as a centred modal over the file view, erased with `Clear` first, the
//! same way the help overlay is drawn.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Clear, Paragraph},
};

use crate::render::HunkOverlay;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders `overlay` in a centred panel sized by `(width_pct, height_pct)`.
///
/// The highlighted line is kept vertically centred when the hunk is taller
/// than the panel. Returns the area drawn, or `None` when the terminal is too
/// small.
///
/// # Arguments
///
/// * `frame` — current render frame
/// * `overlay` — the hunk to draw
/// * `pct` — panel width and height as percentages of the terminal
/// * `theme` — active color theme
pub fn render_hunk_popup(
    frame: &mut Frame,
    overlay: &HunkOverlay,
    pct: (u16, u16),
    theme: &Theme,
) -> Option<Rect> {
    let (width_pct, height_pct) = (pct.0.clamp(10, 100), pct.1.clamp(10, 100));
    let area = frame
        .area()
        .centered(Constraint::Percentage(width_pct), Constraint::Percentage(height_pct));
    if area.height < 3 || area.width < 10 {
        return None;
    }

    frame.render_widget(Clear, area);

    let title = format!(
        " {}  line {}  [ ] prev/next  y copy  r revert  q close ",
        overlay.range_label(),
        overlay.anchor_line
    );
    let inner_height = inner_rect(area).height as usize;
    let scroll = overlay.highlight_index.saturating_sub(inner_height / 2);

    let lines: Vec<Line> = overlay
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == overlay.highlight_index {
                line.clone().patch_style(
                    Style::default().bg(theme.cursor_line_bg).add_modifier(Modifier::BOLD),
                )
            } else {
                line.clone()
            }
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel_block(title, true, theme))
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        area,
    );
    Some(area)
}
