//! Raw diff view, used when no renderer is configured.
//!
//! Renders with a List widget and manual virtual scrolling: only
//! `raw_diff[raw_scroll..raw_scroll + height]` is materialised per frame.

use hunkpeek_core::LineKind;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{List, ListItem},
};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the raw diff of the working file with the diff cursor highlighted.
///
/// # Arguments
///
/// * `frame` — current render frame
/// * `area` — the `Rect` for the panel (includes borders)
/// * `state` — read-only app state supplying `raw_diff`, `raw_cursor` and `raw_scroll`
/// * `theme` — active color theme
pub fn render_raw_diff(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let title = format!(" diff {} @ {}  (q to return) ", state.file.display(), state.revision);
    frame.render_widget(panel_block(title, false, theme), area);
    let inner = inner_rect(area);

    if state.raw_diff.is_empty() {
        frame.render_widget(List::new([ListItem::new(Line::raw("No changes."))]), inner);
        return;
    }

    let total = state.raw_diff.len();
    let visible_start = state.raw_scroll.min(total.saturating_sub(1));
    let visible_end = (visible_start + inner.height as usize).min(total);

    let items: Vec<ListItem> = state.raw_diff[visible_start..visible_end]
        .iter()
        .enumerate()
        .map(|(offset, dl)| {
            let color = match dl.kind {
                LineKind::Added => theme.diff_added,
                LineKind::Removed => theme.diff_removed,
                LineKind::HunkHeader => theme.diff_hunk_header,
                LineKind::Context => theme.diff_context,
            };
            let mut style = Style::default().fg(color);
            if visible_start + offset == state.raw_cursor {
                style = style.bg(theme.cursor_line_bg);
            }
            ListItem::new(Line::raw(dl.text.as_str())).style(style)
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}
