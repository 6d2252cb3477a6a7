use crate::clipboard;
use crate::clipboard::ClipboardWriter;
use crate::clipboard::CopyError;
use crate::clipboard::CopySuccess;
use crate::data::Cell;
use crate::data::Column;
use crate::data::Row;
use crate::input::InputEvent;
use crate::input::KeyEvent;
use crate::input::MouseButton;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::keymap::GridBindings;
use crate::overlay::CheckboxOverlay;
use crate::selection::SelectionChange;
use crate::selection::SelectionEngine;
use crate::selection::SelectionState;
use crate::stats::GridStats;
use crate::stats::StatsAggregator;
use crate::theme::Theme;
use crate::theme::ThemeRepainter;
use crate::theme::ThemeVariant;
use crate::window::DataWindow;
use crate::window::PageSize;

/// Lifecycle events emitted by a [`GridRenderer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridEvent {
    DataLoaded,
    DataFiltered,
    DataSorted,
    PageLoaded,
    RowSelected(String),
    RowDeselected(String),
}

impl GridEvent {
    /// Structural events recreate renderer content: the overlay re-arms and
    /// the repainter runs after each of these.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            GridEvent::DataLoaded
                | GridEvent::DataFiltered
                | GridEvent::DataSorted
                | GridEvent::PageLoaded
        )
    }
}

/// What a screen position resolved to inside the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// A body cell, logical coordinates, checkbox column excluded.
    Cell(Cell),
    /// Anywhere in a row's checkbox cell.
    Checkbox { row: usize },
    /// A header cell, by visible column index.
    Header { col: usize },
}

/// The third-party grid renderer, treated as a black box.
///
/// Everything above this trait works in logical coordinates only, so any
/// grid-rendering backend can sit behind it. Implementations queue their
/// lifecycle events and hand them over through `drain_events`.
pub trait GridRenderer {
    fn mounted(&self) -> bool;

    fn set_columns(&mut self, columns: Vec<Column>);
    fn replace_data(&mut self, rows: Vec<Row>);

    /// Visible data columns, checkbox column excluded.
    fn columns(&self) -> &[Column];

    /// Row keys in the current rendered (filtered/sorted) order.
    fn row_order(&self) -> Vec<String>;
    fn row(&self, key: &str) -> Option<&Row>;

    /// Rows passing the renderer's active filters, `None` when the renderer
    /// cannot answer (e.g. before mount).
    fn filtered_row_count(&self) -> Option<usize>;

    fn set_filter(&mut self, field: &str, value: &str);
    fn clear_filter(&mut self, field: &str);
    fn toggle_sort(&mut self, field: &str);

    /// Logical hit test for a screen position. `None` is a miss and callers
    /// treat it as a silent no-op.
    fn hit_test(&self, x: u16, y: u16) -> Option<HitTarget>;

    fn toggle_row_selection(&mut self, key: &str);
    fn deselect_all_rows(&mut self);
    fn selected_row_keys(&self) -> Vec<String>;

    /// Re-applies theme styling to retained chrome. See
    /// [`crate::theme::ThemeRepainter`].
    fn restyle(&mut self, theme: &Theme);

    fn drain_events(&mut self) -> Vec<GridEvent>;
}

/// Recognized host options.
#[derive(Clone, Debug)]
pub struct GridOptions {
    pub page_sizes: Vec<usize>,
    pub pagination: bool,
    pub row_selection: bool,
    pub cell_selection: bool,
    pub clipboard: bool,
    pub theme: ThemeVariant,
    /// Field the stats footer groups by (e.g. `category_l1`).
    pub grouping_field: Option<String>,
    pub bindings: GridBindings,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            page_sizes: vec![5, 10, 20, 50, 100],
            pagination: true,
            row_selection: true,
            cell_selection: true,
            clipboard: true,
            theme: ThemeVariant::Light,
            grouping_field: None,
            bindings: GridBindings::default(),
        }
    }
}

/// Result of feeding one input event through the adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridAction {
    None,
    Redraw,
    SelectionChanged,
    Copied(usize),
}

type Callback = Box<dyn FnMut(&str)>;

/// Wraps a [`GridRenderer`] and wires the data window, selection engine,
/// checkbox overlay, stats aggregator, and theme repainter to its lifecycle
/// events. This is the single entry point hosts drive.
pub struct RenderAdapter<R: GridRenderer> {
    renderer: R,
    window: DataWindow,
    engine: SelectionEngine,
    overlay: CheckboxOverlay,
    stats_agg: StatsAggregator,
    stats: GridStats,
    repainter: ThemeRepainter,
    options: GridOptions,
    clipboard: Option<Box<dyn ClipboardWriter>>,
    on_selection_changed: Option<Callback>,
    on_copy_success: Option<Callback>,
    on_cell_click: Option<Box<dyn FnMut(Cell)>>,
    status: Option<Status>,
}

#[derive(Clone, Debug)]
struct Status {
    message: String,
    ticks_left: u8,
}

/// How many host ticks a transient status message survives.
const STATUS_TICKS: u8 = 40;

impl<R: GridRenderer> RenderAdapter<R> {
    pub fn new(renderer: R, options: GridOptions) -> Self {
        let grouping = options.grouping_field.clone();
        Self {
            renderer,
            window: DataWindow::default(),
            engine: SelectionEngine::new(),
            overlay: CheckboxOverlay::new(),
            stats_agg: StatsAggregator::new(grouping),
            stats: GridStats::default(),
            repainter: ThemeRepainter::new(options.theme),
            options,
            clipboard: None,
            on_selection_changed: None,
            on_copy_success: None,
            on_cell_click: None,
            status: None,
        }
    }

    pub fn with_clipboard(mut self, writer: Box<dyn ClipboardWriter>) -> Self {
        self.clipboard = Some(writer);
        self
    }

    pub fn set_on_selection_changed(&mut self, cb: Callback) {
        self.on_selection_changed = Some(cb);
    }

    pub fn set_on_copy_success(&mut self, cb: Callback) {
        self.on_copy_success = Some(cb);
    }

    pub fn set_on_cell_click(&mut self, cb: Box<dyn FnMut(Cell)>) {
        self.on_cell_click = Some(cb);
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn selection(&self) -> &SelectionEngine {
        &self.engine
    }

    pub fn stats(&self) -> &GridStats {
        &self.stats
    }

    pub fn window(&self) -> &DataWindow {
        &self.window
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Borrows the renderer and selection together for host-side rendering.
    pub fn render_parts(&mut self) -> (&mut R, &SelectionEngine, &GridStats) {
        (&mut self.renderer, &self.engine, &self.stats)
    }

    /// Transient status line, if one is live.
    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.message.as_str())
    }

    /// Mounts columns and data into the renderer.
    pub fn mount(&mut self, columns: Vec<Column>, rows: Vec<Row>) {
        self.renderer.set_columns(columns);
        self.window.replace_dataset(rows);
        self.renderer.replace_data(self.window.page_slice().to_vec());
        self.overlay.on_mount();
        self.pump();
    }

    /// Replaces the dataset. The renderer only sees a push when dataset
    /// identity changed, so its filter/sort state survives value-only edits.
    pub fn set_data(&mut self, rows: Vec<Row>) {
        let changed = self.window.replace_dataset(rows);
        if changed {
            self.engine.dataset_changed();
            self.renderer.deselect_all_rows();
            self.renderer.replace_data(self.window.page_slice().to_vec());
        }
        self.pump();
    }

    pub fn set_page(&mut self, page: usize) {
        if !self.options.pagination {
            return;
        }
        self.window.set_page(page);
        self.push_page();
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        if !self.options.pagination {
            return;
        }
        self.window.set_page_size(size);
        self.push_page();
    }

    pub fn next_page(&mut self) {
        if !self.options.pagination {
            return;
        }
        self.window.next_page();
        self.push_page();
    }

    pub fn prev_page(&mut self) {
        if !self.options.pagination {
            return;
        }
        self.window.prev_page();
        self.push_page();
    }

    fn push_page(&mut self) {
        self.engine.dataset_changed();
        self.renderer.replace_data(self.window.page_slice().to_vec());
        self.pump();
    }

    /// Clears both selection modes, renderer checkboxes included.
    pub fn clear_selection(&mut self) {
        let had_rows = !self.renderer.selected_row_keys().is_empty();
        self.engine.escape();
        self.renderer.deselect_all_rows();
        self.pump();
        // Checked rows notify through the pumped deselect events; a
        // cell-only clear drains nothing and notifies here.
        if !had_rows {
            self.notify_selection("selection cleared");
        }
    }

    /// Category chip click: exact-value filter, toggled off on a second
    /// click; switching chips clears the prior filter first.
    pub fn toggle_category_chip(&mut self, category: &str) {
        self.stats_agg.toggle_chip(&mut self.renderer, category);
        self.pump();
    }

    pub fn active_category_chip(&self) -> Option<&str> {
        self.stats_agg.active_chip()
    }

    /// One host tick: decays the status line and runs the overlay's bounded
    /// deferred re-arm fallback.
    pub fn tick(&mut self) {
        if let Some(status) = &mut self.status {
            status.ticks_left = status.ticks_left.saturating_sub(1);
            if status.ticks_left == 0 {
                self.status = None;
            }
        }
        if self.overlay.retry(&self.renderer) {
            self.pump();
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) -> GridAction {
        if !self.renderer.mounted() {
            log::debug!("input ignored: renderer not mounted");
            return GridAction::None;
        }
        let action = match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
        };
        self.pump();
        action
    }

    fn handle_key(&mut self, key: KeyEvent) -> GridAction {
        if self.options.bindings.is_clear(&key) {
            let had_rows = !self.renderer.selected_row_keys().is_empty();
            let had_selection = !self.engine.is_empty() || had_rows;
            self.engine.escape();
            self.renderer.deselect_all_rows();
            if had_selection {
                // Checked rows notify through the pumped deselect events.
                if !had_rows {
                    self.notify_selection("selection cleared");
                }
                return GridAction::SelectionChanged;
            }
            return GridAction::None;
        }
        if self.options.bindings.is_copy(&key) {
            return match self.copy_selection() {
                Ok(success) => GridAction::Copied(success.rows),
                // The failure is already surfaced as a status line.
                Err(_) => GridAction::Redraw,
            };
        }
        GridAction::None
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> GridAction {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.mouse_down(mouse),
            MouseEventKind::Drag(MouseButton::Left) => self.mouse_drag(mouse),
            MouseEventKind::Up(MouseButton::Left) => self.mouse_up(),
            _ => GridAction::None,
        }
    }

    fn mouse_down(&mut self, mouse: MouseEvent) -> GridAction {
        let Some(target) = self.renderer.hit_test(mouse.x, mouse.y) else {
            // Coordinate misses are silent no-ops.
            log::debug!("hit test miss at ({}, {})", mouse.x, mouse.y);
            return GridAction::None;
        };
        match target {
            HitTarget::Checkbox { row } => {
                if !self.options.row_selection {
                    return GridAction::None;
                }
                // Row selection always wins over cell selection.
                let keys = self.renderer.row_order();
                let Some(key) = keys.get(row).cloned() else {
                    log::debug!("checkbox hit on unknown row index {row}");
                    return GridAction::None;
                };
                self.overlay
                    .activate(&mut self.engine, &mut self.renderer, &key);
                GridAction::SelectionChanged
            }
            HitTarget::Header { col } => {
                let field = self
                    .renderer
                    .columns()
                    .get(col)
                    .filter(|c| c.sortable)
                    .map(|c| c.field.clone());
                match field {
                    Some(field) => {
                        self.renderer.toggle_sort(&field);
                        GridAction::Redraw
                    }
                    None => GridAction::None,
                }
            }
            HitTarget::Cell(cell) => {
                if !self.options.cell_selection {
                    return GridAction::None;
                }
                if let Some(cb) = &mut self.on_cell_click {
                    cb(cell);
                }
                // Entering cell mode clears any checked rows.
                if !self.renderer.selected_row_keys().is_empty() {
                    self.renderer.deselect_all_rows();
                }
                let change = if mouse.modifiers.shift {
                    self.engine.shift_click(cell)
                } else {
                    // Ctrl keeps the committed selection for a merge on
                    // release; a zero-movement ctrl press toggles instead.
                    self.engine.mouse_down(cell, mouse.modifiers.ctrl_like())
                };
                if change == SelectionChange::Changed {
                    self.notify_cell_count();
                    GridAction::SelectionChanged
                } else {
                    GridAction::None
                }
            }
        }
    }

    fn mouse_drag(&mut self, mouse: MouseEvent) -> GridAction {
        if !self.engine.is_dragging() {
            return GridAction::None;
        }
        // Dragging over the checkbox column or header extends nothing.
        match self.renderer.hit_test(mouse.x, mouse.y) {
            Some(HitTarget::Cell(cell)) => match self.engine.drag_to(cell) {
                SelectionChange::Changed => GridAction::Redraw,
                SelectionChange::None => GridAction::None,
            },
            _ => GridAction::None,
        }
    }

    fn mouse_up(&mut self) -> GridAction {
        match self.engine.mouse_up() {
            SelectionChange::Changed => {
                self.notify_cell_count();
                GridAction::SelectionChanged
            }
            SelectionChange::None => GridAction::None,
        }
    }

    /// Serializes the current selection as TSV and writes it to the
    /// configured clipboard. Nothing here throws: every failure becomes a
    /// status string and an `Err` value.
    pub fn copy_selection(&mut self) -> Result<CopySuccess, CopyError> {
        if !self.options.clipboard {
            return Err(CopyError::Disabled);
        }
        let result = self.try_copy();
        match &result {
            Ok(success) => {
                let message = format!("{} row(s) copied", success.rows);
                if let Some(cb) = &mut self.on_copy_success {
                    cb(&message);
                }
                self.set_status(message);
            }
            Err(CopyError::NothingToCopy) => self.set_status("no selection".to_string()),
            Err(err) => {
                log::warn!("clipboard write failed: {err}");
                self.set_status("copy failed".to_string());
            }
        }
        result
    }

    fn try_copy(&mut self) -> Result<CopySuccess, CopyError> {
        let order = self.renderer.row_order();
        let rows_in_order: Vec<&Row> = order
            .iter()
            .filter_map(|key| self.renderer.row(key))
            .collect();
        let payload = clipboard::serialize_selection(
            self.engine.state(),
            self.renderer.columns(),
            &rows_in_order,
        )
        .ok_or(CopyError::NothingToCopy)?;
        let writer = self
            .clipboard
            .as_deref_mut()
            .ok_or_else(|| CopyError::Backend("no clipboard writer configured".to_string()))?;
        let rows = payload.row_count();
        writer.write_text(&payload.to_tsv())?;
        Ok(CopySuccess { rows })
    }

    /// Drains renderer lifecycle events and runs the dependents in order:
    /// overlay re-arm, selection sync, stats recompute, repaint last.
    fn pump(&mut self) {
        let events = self.renderer.drain_events();
        let mut structural = false;
        let mut row_selection_changed = false;
        for event in &events {
            if event.is_structural() {
                structural = true;
            }
            match event {
                GridEvent::RowSelected(_) | GridEvent::RowDeselected(_) => {
                    row_selection_changed = true;
                }
                _ => {}
            }
        }

        if structural {
            self.overlay.arm(&self.renderer);
        }
        if row_selection_changed {
            // Renderer checkbox state is authoritative for row mode. An
            // all-deselect that arrives while a cell selection is active is
            // the cell path clearing stale checkboxes, not a mode switch;
            // everything else, the un-check of the last row included, syncs
            // and notifies.
            let cell_mode = matches!(
                self.engine.state(),
                SelectionState::CellSelected { .. } | SelectionState::RangeSelecting { .. }
            );
            if !cell_mode {
                self.engine.set_selected_rows(self.renderer.selected_row_keys());
                let count = self.engine.selected_count();
                let message = if count == 0 {
                    "selection cleared".to_string()
                } else {
                    format!("{count} row(s) selected")
                };
                self.notify_selection(&message);
            }
        }

        self.stats = self
            .stats_agg
            .recompute(&self.renderer, &self.engine, self.window.total());

        if structural {
            self.repainter.repaint(&mut self.renderer);
        }
    }

    fn notify_cell_count(&mut self) {
        let count = self.engine.selected_count();
        let message = if count == 0 {
            "selection cleared".to_string()
        } else {
            format!("{count} cell(s) selected")
        };
        self.notify_selection(&message);
    }

    fn notify_selection(&mut self, message: &str) {
        if let Some(cb) = &mut self.on_selection_changed {
            cb(message);
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = Some(Status {
            message,
            ticks_left: STATUS_TICKS,
        });
    }
}
