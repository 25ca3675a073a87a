//! Help overlay renderer for hunkpeek.
//!
//! Draws a centred modal over the current view using ratatui's `Clear` widget to
//! erase the background first, inside the same `terminal.draw()` closure as
//! everything else.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal.
///
/// The paragraph scrolls vertically by `help_scroll` rows. Skipped on
/// terminals narrower than 60 columns.
///
/// # Arguments
///
/// * `frame` — current render frame provided by `terminal.draw()`
/// * `theme` — active color theme (supplies `border_active` for the modal border)
/// * `help_scroll` — vertical scroll offset; j/k in HelpOverlay mode mutate this field
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  — j/k scroll, ? or Esc to dismiss ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Cursor"),
        Line::from("  j / k         Down / up one line"),
        Line::from("  g / G         First / last line"),
        Line::from("  Ctrl-d / u    Half page down / up"),
        Line::from("  mouse wheel   Three lines down / up"),
        Line::from(""),
        Line::from("Hunks"),
        Line::from("  Enter / s     Show the hunk at the cursor"),
        Line::from("  [ / ]         Previous / next hunk"),
        Line::from("  y             Copy the original text (printed on exit)"),
        Line::from("  r             Revert the shown hunk"),
        Line::from("  q / Esc       Hide the hunk, leave the raw diff, or quit"),
        Line::from("  click         Outside the floating panel hides it"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  Ctrl-c        Quit"),
    ])
}
