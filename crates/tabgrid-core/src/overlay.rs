use crate::adapter::GridRenderer;
use crate::selection::SelectionEngine;

/// Deferred re-arm attempts kept as a safety net right after mount, when the
/// renderer may report not-mounted for a frame or two.
const MOUNT_RETRIES: u8 = 3;

/// A uniform hit target over the renderer's checkbox column.
///
/// The renderer recreates its checkbox cells on every data reload, filter,
/// sort, and page event, so the overlay must be re-armed after each of them;
/// the adapter does that from the renderer's own lifecycle events. On top of
/// that a small bounded number of tick-driven retries covers the window right
/// after mount. Activation order is fixed: cell selection resets first, then
/// the row toggles.
#[derive(Clone, Copy, Debug, Default)]
pub struct CheckboxOverlay {
    armed: bool,
    retries_left: u8,
}

impl CheckboxOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn on_mount(&mut self) {
        self.armed = false;
        self.retries_left = MOUNT_RETRIES;
    }

    /// Re-arm against the renderer's current content. No-op before mount.
    pub fn arm<R: GridRenderer + ?Sized>(&mut self, renderer: &R) {
        if renderer.mounted() {
            self.armed = true;
        } else {
            log::debug!("overlay arm skipped: renderer not mounted");
        }
    }

    /// One bounded retry step, driven by the host tick. Returns `true` when
    /// this call armed the overlay.
    pub fn retry<R: GridRenderer + ?Sized>(&mut self, renderer: &R) -> bool {
        if self.armed || self.retries_left == 0 {
            return false;
        }
        self.retries_left -= 1;
        if renderer.mounted() {
            self.armed = true;
            return true;
        }
        false
    }

    /// Checkbox activation: unconditionally reset cell selection, then toggle
    /// the row through the renderer.
    pub fn activate<R: GridRenderer + ?Sized>(
        &self,
        engine: &mut SelectionEngine,
        renderer: &mut R,
        row_key: &str,
    ) {
        if !self.armed {
            log::debug!("checkbox activation ignored: overlay not armed");
            return;
        }
        engine.escape();
        renderer.toggle_row_selection(row_key);
    }
}
