//! File view: the working file with a change gutter, plus inline hunks.
//!
//! Like the diff panel it replaces, only the visible window of lines is
//! materialised per frame. An inline hunk overlay is spliced in just above its
//! anchor line and shifts the following lines down.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use crate::app::{AppState, GutterMark};
use crate::render::{HunkOverlay, Placement};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the file panel.
///
/// # Arguments
///
/// * `frame` — current render frame
/// * `area` — the `Rect` for the panel (includes borders)
/// * `state` — read-only app state
/// * `overlay` — hunk shown this frame, if any
/// * `theme` — active color theme
pub fn render_file(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    overlay: Option<&HunkOverlay>,
    theme: &Theme,
) {
    let title = format!(" {} ", state.file.display());
    frame.render_widget(panel_block(title, false, theme), area);
    let inner = inner_rect(area);
    let height = inner.height as usize;

    if state.file_lines.is_empty() {
        frame.render_widget(List::new([ListItem::new(Line::raw("(empty file)"))]), inner);
        return;
    }

    let number_width = state.file_lines.len().to_string().len();
    let inline = overlay.filter(|o| o.placement == Placement::Inline);

    let mut items: Vec<ListItem> = Vec::with_capacity(height);
    for (index, text) in state.file_lines.iter().enumerate().skip(state.scroll) {
        if items.len() >= height {
            break;
        }
        let line_no = index as u32 + 1;
        if let Some(o) = inline.filter(|o| o.anchor_line == line_no) {
            items.extend(inline_block(o, theme));
        }
        items.push(file_row(line_no, text, number_width, state, theme));
    }
    items.truncate(height);

    frame.render_widget(List::new(items), inner);
}

fn file_row<'a>(
    line_no: u32,
    text: &'a str,
    number_width: usize,
    state: &AppState,
    theme: &Theme,
) -> ListItem<'a> {
    let (mark, color) = match state.gutter.get(&line_no) {
        Some(GutterMark::Added) => ("▎", theme.gutter_added),
        Some(GutterMark::Modified) => ("▎", theme.gutter_modified),
        Some(GutterMark::Removed) => ("▁", theme.gutter_removed),
        None => (" ", theme.line_number),
    };
    let row = Line::from(vec![
        Span::styled(mark, Style::default().fg(color)),
        Span::styled(
            format!("{line_no:>number_width$} "),
            Style::default().fg(theme.line_number),
        ),
        Span::raw(text),
    ]);
    let item = ListItem::new(row);
    if line_no == state.cursor_line {
        item.style(Style::default().bg(theme.cursor_line_bg))
    } else {
        item
    }
}

/// Rows of an inline hunk: a header rule, then the highlighted lines.
fn inline_block(overlay: &HunkOverlay, theme: &Theme) -> Vec<ListItem<'static>> {
    let rule = Line::from(Span::styled(
        format!("┌─ {} ", overlay.range_label()),
        Style::default().fg(theme.border_active),
    ));
    let mut rows = vec![ListItem::new(rule)];
    for (i, line) in overlay.lines.iter().enumerate() {
        let mut spans = vec![Span::styled("│ ", Style::default().fg(theme.border_active))];
        spans.extend(line.spans.iter().cloned());
        let mut item = ListItem::new(Line::from(spans));
        if i == overlay.highlight_index {
            item = item.style(
                Style::default().bg(theme.cursor_line_bg).add_modifier(Modifier::BOLD),
            );
        }
        rows.push(item);
    }
    rows
}
