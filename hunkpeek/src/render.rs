//! Terminal renderers for extracted hunks.
//!
//! Renderers do not draw anything themselves: `show` highlights the hunk and
//! parks it in a shared [`HunkSlot`] that the UI module reads on every frame.
//! The returned teardown empties the slot, so the next frame no longer shows
//! the hunk.

use std::sync::{Arc, Mutex, MutexGuard};

use hunkpeek_core::{ExtractedHunk, HunkRange, Renderer, RendererRegistry, Teardown};
use ratatui::text::Line;
use tracing::debug;

use crate::highlight;

/// Where the UI draws a shown hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Spliced into the file view just above the anchor line.
    Inline,
    /// In a centred bordered panel on top of the file view.
    Floating,
}

impl Placement {
    pub fn name(self) -> &'static str {
        match self {
            Placement::Inline => "inline",
            Placement::Floating => "floating",
        }
    }
}

/// A highlighted hunk waiting to be drawn.
#[derive(Debug, Clone)]
pub struct HunkOverlay {
    pub placement: Placement,
    /// One line per hunk line.
    pub lines: Vec<Line<'static>>,
    /// Index into `lines` of the line under the caller's cursor.
    pub highlight_index: usize,
    /// Working-file line the hunk is attached to.
    pub anchor_line: u32,
    pub range: Option<HunkRange>,
}

impl HunkOverlay {
    /// Header text for the panel title, e.g. `-3,2 +3,4`.
    pub fn range_label(&self) -> String {
        match self.range {
            Some(r) => format!("-{},{} +{},{}", r.old_start, r.old_len, r.new_start, r.new_len),
            None => "hunk".to_owned(),
        }
    }
}

/// The single overlay slot shared by the renderers and the UI.
#[derive(Debug, Clone, Default)]
pub struct HunkSlot {
    inner: Arc<Mutex<Option<HunkOverlay>>>,
}

impl HunkSlot {
    fn lock(&self) -> MutexGuard<'_, Option<HunkOverlay>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the overlay to draw this frame.
    pub fn current(&self) -> Option<HunkOverlay> {
        self.lock().clone()
    }

    fn put(&self, overlay: HunkOverlay) {
        *self.lock() = Some(overlay);
    }

    fn clear(&self) {
        self.lock().take();
    }
}

/// Renderer that highlights a hunk into the shared slot.
pub struct SlotRenderer {
    placement: Placement,
    slot: HunkSlot,
    ext: String,
}

impl SlotRenderer {
    pub fn new(placement: Placement, slot: HunkSlot, ext: impl Into<String>) -> Self {
        Self { placement, slot, ext: ext.into() }
    }
}

impl Renderer for SlotRenderer {
    fn show(&mut self, hunk: &ExtractedHunk) -> Teardown {
        let overlay = HunkOverlay {
            placement: self.placement,
            lines: highlight::highlight_hunk(hunk, &self.ext),
            highlight_index: hunk.highlight_index,
            anchor_line: hunk.anchor_line(),
            range: hunk.range,
        };
        debug!(
            placement = self.placement.name(),
            anchor = overlay.anchor_line,
            lines = overlay.lines.len(),
            "hunk shown"
        );
        self.slot.put(overlay);

        let slot = self.slot.clone();
        Box::new(move || slot.clear())
    }
}

/// Registers the built-in `inline` and `floating` renderers.
///
/// # Arguments
///
/// * `registry` — registry to add the renderers to
/// * `slot` — overlay slot read by the UI
/// * `ext` — extension of the viewed file, for syntax lookup
pub fn register_builtin(registry: &mut RendererRegistry, slot: &HunkSlot, ext: &str) {
    for placement in [Placement::Inline, Placement::Floating] {
        let slot = slot.clone();
        let ext = ext.to_owned();
        registry.register(placement.name(), move || {
            Box::new(SlotRenderer::new(placement, slot.clone(), ext.clone()))
        });
    }
}
