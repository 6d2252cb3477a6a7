use crate::data::Cell;
use std::collections::BTreeSet;

/// Logical selection state. Cell-mode and row-mode are mutually exclusive by
/// construction: entering one always leaves the other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    /// A committed cell set with its range anchor. The anchor is always a
    /// member of `cells`.
    CellSelected {
        cells: BTreeSet<Cell>,
        anchor: Cell,
    },
    /// A drag in progress. `committed` holds the pre-drag selection that will
    /// be merged on release when the drag started with ctrl held.
    RangeSelecting {
        committed: BTreeSet<Cell>,
        merge: bool,
        start: Cell,
        cursor: Cell,
    },
    RowSelected {
        keys: BTreeSet<String>,
    },
}

/// What changed after a gesture, for callers that repaint lazily.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionChange {
    None,
    Changed,
}

/// Interprets click/ctrl/shift/drag gestures into selection transitions over
/// logical coordinates. Knows nothing about screens or renderers; callers
/// hit-test first and feed cells in.
#[derive(Debug, Default)]
pub struct SelectionEngine {
    state: SelectionState,
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState::Empty
    }
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, SelectionState::Empty)
    }

    /// Count in whichever mode is active.
    pub fn selected_count(&self) -> usize {
        match &self.state {
            SelectionState::Empty => 0,
            SelectionState::CellSelected { cells, .. } => cells.len(),
            SelectionState::RangeSelecting { .. } => self.selected_cells().len(),
            SelectionState::RowSelected { keys } => keys.len(),
        }
    }

    /// The effective cell set: committed cells plus the provisional rectangle
    /// while a drag is in flight. Empty in row mode.
    pub fn selected_cells(&self) -> BTreeSet<Cell> {
        match &self.state {
            SelectionState::CellSelected { cells, .. } => cells.clone(),
            SelectionState::RangeSelecting {
                committed,
                start,
                cursor,
                ..
            } => {
                let mut cells = committed.clone();
                cells.extend(rect_cells(*start, *cursor));
                cells
            }
            _ => BTreeSet::new(),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        match &self.state {
            SelectionState::CellSelected { cells, .. } => cells.contains(&cell),
            SelectionState::RangeSelecting {
                committed,
                start,
                cursor,
                ..
            } => committed.contains(&cell) || in_rect(*start, *cursor, cell),
            _ => false,
        }
    }

    pub fn anchor(&self) -> Option<Cell> {
        match &self.state {
            SelectionState::CellSelected { anchor, .. } => Some(*anchor),
            SelectionState::RangeSelecting { start, .. } => Some(*start),
            _ => None,
        }
    }

    pub fn selected_row_keys(&self) -> Vec<String> {
        match &self.state {
            SelectionState::RowSelected { keys } => keys.iter().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_row_selected(&self, key: &str) -> bool {
        matches!(&self.state, SelectionState::RowSelected { keys } if keys.contains(key))
    }

    /// Plain click: replace any prior selection with this cell.
    pub fn click(&mut self, cell: Cell) -> SelectionChange {
        self.state = SelectionState::CellSelected {
            cells: BTreeSet::from([cell]),
            anchor: cell,
        };
        SelectionChange::Changed
    }

    /// Ctrl/cmd-click: toggle membership without clearing, anchor follows the
    /// clicked cell. Toggling the last cell off empties the selection.
    pub fn ctrl_click(&mut self, cell: Cell) -> SelectionChange {
        let mut cells = match std::mem::take(&mut self.state) {
            SelectionState::CellSelected { cells, .. } => cells,
            // Row mode and in-flight drags do not mix with toggles.
            _ => BTreeSet::new(),
        };
        if !cells.insert(cell) {
            cells.remove(&cell);
        }
        self.state = match cells.iter().next_back().copied() {
            None => SelectionState::Empty,
            Some(last) => {
                let anchor = if cells.contains(&cell) { cell } else { last };
                SelectionState::CellSelected { cells, anchor }
            }
        };
        SelectionChange::Changed
    }

    /// Shift-click: rectangle from the anchor to `cell`, anchor unchanged.
    /// Without an anchor this degrades to a plain click.
    pub fn shift_click(&mut self, cell: Cell) -> SelectionChange {
        match self.anchor() {
            None => self.click(cell),
            Some(anchor) => {
                self.state = SelectionState::CellSelected {
                    cells: rect_cells(anchor, cell),
                    anchor,
                };
                SelectionChange::Changed
            }
        }
    }

    /// Begin a drag range at `cell`. With ctrl held the existing selection is
    /// kept and merged on release; otherwise it is replaced.
    pub fn mouse_down(&mut self, cell: Cell, ctrl: bool) -> SelectionChange {
        let committed = if ctrl {
            self.selected_cells()
        } else {
            BTreeSet::new()
        };
        self.state = SelectionState::RangeSelecting {
            committed,
            merge: ctrl,
            start: cell,
            cursor: cell,
        };
        SelectionChange::Changed
    }

    /// Each move recomputes the provisional rectangle between the drag start
    /// and the cell under the pointer.
    pub fn drag_to(&mut self, cell: Cell) -> SelectionChange {
        match &mut self.state {
            SelectionState::RangeSelecting { cursor, .. } => {
                if *cursor == cell {
                    SelectionChange::None
                } else {
                    *cursor = cell;
                    SelectionChange::Changed
                }
            }
            _ => SelectionChange::None,
        }
    }

    /// Commit the provisional rectangle into the permanent selection. A merge
    /// drag that never moved is a plain ctrl-click and toggles instead.
    pub fn mouse_up(&mut self) -> SelectionChange {
        match std::mem::take(&mut self.state) {
            SelectionState::RangeSelecting {
                committed,
                merge,
                start,
                cursor,
            } => {
                if merge && start == cursor {
                    self.state = match committed.iter().next_back().copied() {
                        Some(anchor) => SelectionState::CellSelected {
                            cells: committed,
                            anchor,
                        },
                        None => SelectionState::Empty,
                    };
                    return self.ctrl_click(start);
                }
                let mut cells = if merge { committed } else { BTreeSet::new() };
                cells.extend(rect_cells(start, cursor));
                self.state = SelectionState::CellSelected {
                    cells,
                    anchor: start,
                };
                SelectionChange::Changed
            }
            other => {
                self.state = other;
                SelectionChange::None
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SelectionState::RangeSelecting { .. })
    }

    /// Row-checkbox activation: any cell-selection state is reset first, then
    /// the row's membership toggles. An empty row set falls back to `Empty`.
    pub fn toggle_row(&mut self, key: &str) -> SelectionChange {
        let mut keys = match std::mem::take(&mut self.state) {
            SelectionState::RowSelected { keys } => keys,
            _ => BTreeSet::new(),
        };
        if !keys.insert(key.to_string()) {
            keys.remove(key);
        }
        self.state = if keys.is_empty() {
            SelectionState::Empty
        } else {
            SelectionState::RowSelected { keys }
        };
        SelectionChange::Changed
    }

    /// Mirrors the renderer's authoritative checkbox state into row mode.
    pub fn set_selected_rows(&mut self, keys: impl IntoIterator<Item = String>) {
        let keys: BTreeSet<String> = keys.into_iter().collect();
        self.state = if keys.is_empty() {
            SelectionState::Empty
        } else {
            SelectionState::RowSelected { keys }
        };
    }

    /// Escape: back to `Empty` from any state.
    pub fn escape(&mut self) -> SelectionChange {
        if self.is_empty() {
            SelectionChange::None
        } else {
            self.state = SelectionState::Empty;
            SelectionChange::Changed
        }
    }

    /// Dataset identity changed: logical coordinates are stale, drop them.
    pub fn dataset_changed(&mut self) {
        self.state = SelectionState::Empty;
    }
}

/// The min/max-aligned rectangle spanned by two corner cells.
pub fn rect_cells(a: Cell, b: Cell) -> BTreeSet<Cell> {
    let (r0, r1) = (a.row.min(b.row), a.row.max(b.row));
    let (c0, c1) = (a.col.min(b.col), a.col.max(b.col));
    let mut cells = BTreeSet::new();
    for row in r0..=r1 {
        for col in c0..=c1 {
            cells.insert(Cell { row, col });
        }
    }
    cells
}

fn in_rect(a: Cell, b: Cell, cell: Cell) -> bool {
    cell.row >= a.row.min(b.row)
        && cell.row <= a.row.max(b.row)
        && cell.col >= a.col.min(b.col)
        && cell.col <= a.col.max(b.col)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    #[test]
    fn plain_click_replaces_and_anchors() {
        let mut e = SelectionEngine::new();
        e.click(c(1, 1));
        e.click(c(2, 3));
        assert_eq!(e.selected_cells(), BTreeSet::from([c(2, 3)]));
        assert_eq!(e.anchor(), Some(c(2, 3)));
    }

    #[test]
    fn ctrl_click_toggles_without_clearing() {
        let mut e = SelectionEngine::new();
        e.click(c(0, 0));
        e.ctrl_click(c(1, 1));
        assert_eq!(e.selected_count(), 2);
        assert_eq!(e.anchor(), Some(c(1, 1)));

        e.ctrl_click(c(1, 1));
        assert_eq!(e.selected_cells(), BTreeSet::from([c(0, 0)]));
        // Anchor stays inside the selection after a toggle-off.
        assert_eq!(e.anchor(), Some(c(0, 0)));

        e.ctrl_click(c(0, 0));
        assert!(e.is_empty());
    }

    #[test]
    fn shift_click_selects_exact_rectangle() {
        let mut e = SelectionEngine::new();
        e.click(c(1, 0));
        e.shift_click(c(3, 2));
        assert_eq!(e.selected_cells(), rect_cells(c(1, 0), c(3, 2)));
        assert_eq!(e.selected_count(), 9);
        assert_eq!(e.anchor(), Some(c(1, 0)));

        // Reversed corners span the same rectangle.
        let mut e2 = SelectionEngine::new();
        e2.click(c(3, 2));
        e2.shift_click(c(1, 0));
        assert_eq!(e2.selected_cells(), e.selected_cells());
    }

    #[test]
    fn shift_click_without_anchor_is_a_plain_click() {
        let mut e = SelectionEngine::new();
        e.shift_click(c(2, 2));
        assert_eq!(e.selected_cells(), BTreeSet::from([c(2, 2)]));
    }

    #[test]
    fn drag_commits_rectangle_on_release() {
        let mut e = SelectionEngine::new();
        e.mouse_down(c(0, 0), false);
        e.drag_to(c(0, 1));
        e.drag_to(c(2, 1));
        assert!(e.is_dragging());
        assert_eq!(e.selected_count(), 6);

        e.mouse_up();
        assert!(!e.is_dragging());
        assert_eq!(e.selected_cells(), rect_cells(c(0, 0), c(2, 1)));
        assert_eq!(e.anchor(), Some(c(0, 0)));
    }

    #[test]
    fn drag_shrinks_when_pointer_backtracks() {
        let mut e = SelectionEngine::new();
        e.mouse_down(c(0, 0), false);
        e.drag_to(c(3, 3));
        e.drag_to(c(1, 1));
        e.mouse_up();
        assert_eq!(e.selected_cells(), rect_cells(c(0, 0), c(1, 1)));
    }

    #[test]
    fn ctrl_drag_merges_with_prior_selection() {
        let mut e = SelectionEngine::new();
        e.click(c(5, 5));
        e.mouse_down(c(0, 0), true);
        e.drag_to(c(1, 1));
        e.mouse_up();
        let mut expected = rect_cells(c(0, 0), c(1, 1));
        expected.insert(c(5, 5));
        assert_eq!(e.selected_cells(), expected);
    }

    #[test]
    fn stationary_merge_drag_toggles_like_ctrl_click() {
        let mut e = SelectionEngine::new();
        e.click(c(2, 2));
        e.mouse_down(c(4, 4), true);
        e.mouse_up();
        assert_eq!(e.selected_cells(), BTreeSet::from([c(2, 2), c(4, 4)]));

        e.mouse_down(c(4, 4), true);
        e.mouse_up();
        assert_eq!(e.selected_cells(), BTreeSet::from([c(2, 2)]));

        e.mouse_down(c(2, 2), true);
        e.mouse_up();
        assert!(e.is_empty());
    }

    #[test]
    fn plain_drag_replaces_prior_selection() {
        let mut e = SelectionEngine::new();
        e.click(c(5, 5));
        e.mouse_down(c(0, 0), false);
        e.mouse_up();
        assert_eq!(e.selected_cells(), BTreeSet::from([c(0, 0)]));
    }

    #[test]
    fn row_toggle_resets_cell_selection() {
        let mut e = SelectionEngine::new();
        e.click(c(1, 1));
        e.toggle_row("7");
        assert!(e.selected_cells().is_empty());
        assert_eq!(e.selected_row_keys(), vec!["7".to_string()]);

        e.toggle_row("3");
        assert_eq!(e.selected_count(), 2);
        e.toggle_row("7");
        e.toggle_row("3");
        assert!(e.is_empty());
    }

    #[test]
    fn modes_never_coexist() {
        let mut e = SelectionEngine::new();
        e.toggle_row("1");
        e.click(c(0, 0));
        assert!(e.selected_row_keys().is_empty());
        assert!(!e.selected_cells().is_empty());

        e.toggle_row("1");
        assert!(e.selected_cells().is_empty());
        assert!(!e.selected_row_keys().is_empty());
    }

    #[test]
    fn escape_empties_any_state() {
        let mut e = SelectionEngine::new();
        e.click(c(0, 0));
        e.escape();
        assert!(e.is_empty());

        e.toggle_row("1");
        e.escape();
        assert!(e.is_empty());

        e.mouse_down(c(0, 0), false);
        e.escape();
        assert!(e.is_empty());
        assert_eq!(e.mouse_up(), SelectionChange::None);
    }

    #[test]
    fn dataset_change_drops_stale_coordinates() {
        let mut e = SelectionEngine::new();
        e.click(c(10, 2));
        e.dataset_changed();
        assert!(e.is_empty());
        assert_eq!(e.anchor(), None);
    }

    #[test]
    fn anchor_always_member_of_selection() {
        let mut e = SelectionEngine::new();
        e.click(c(2, 2));
        e.ctrl_click(c(4, 4));
        e.shift_click(c(6, 6));
        if let Some(a) = e.anchor() {
            assert!(e.selected_cells().contains(&a));
        }
        e.mouse_down(c(1, 1), true);
        e.drag_to(c(0, 0));
        e.mouse_up();
        if let Some(a) = e.anchor() {
            assert!(e.selected_cells().contains(&a));
        }
    }
}
