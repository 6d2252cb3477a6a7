use crate::data::Cell;
use crate::data::Column;
use crate::data::Row;
use crate::selection::SelectionState;

/// A copy that reached the clipboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CopySuccess {
    pub rows: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("nothing to copy")]
    NothingToCopy,
    #[error("clipboard disabled")]
    Disabled,
    #[error("clipboard write failed: {0}")]
    Backend(String),
}

/// Destination for serialized selections. The facade crate provides a system
/// clipboard implementation with a fallback path; tests provide in-memory
/// ones.
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), CopyError>;
}

/// An ordered block of formatted values, rows outermost, in the dataset's
/// current rendered order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipboardPayload {
    lines: Vec<Vec<String>>,
}

impl ClipboardPayload {
    pub fn row_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[Vec<String>] {
        &self.lines
    }

    /// Tab-joined columns, CRLF-joined rows, spreadsheet paste compatible.
    pub fn to_tsv(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.join("\t"))
            .collect::<Vec<_>>()
            .join("\r\n")
    }
}

/// Serializes the selection against the rendered row order.
///
/// Row mode exports every visible column of each selected row. Cell mode
/// exports the bounding rectangle of the selected cells, interior cells
/// filled even when only the corners were touched. Returns `None` for an
/// empty selection; no clipboard write should happen in that case.
pub fn serialize_selection(
    state: &SelectionState,
    columns: &[Column],
    rows_in_order: &[&Row],
) -> Option<ClipboardPayload> {
    match state {
        SelectionState::Empty => None,
        SelectionState::RowSelected { keys } => {
            let lines: Vec<Vec<String>> = rows_in_order
                .iter()
                .filter(|row| keys.contains(row.key()))
                .map(|row| columns.iter().map(|col| col.render_value(row)).collect())
                .collect();
            non_empty(lines)
        }
        SelectionState::CellSelected { cells, .. } => {
            serialize_cells(cells.iter().copied(), columns, rows_in_order)
        }
        // An uncommitted drag copies what it would commit.
        SelectionState::RangeSelecting {
            committed,
            start,
            cursor,
            ..
        } => {
            let mut cells = committed.clone();
            cells.extend(crate::selection::rect_cells(*start, *cursor));
            serialize_cells(cells.into_iter(), columns, rows_in_order)
        }
    }
}

fn serialize_cells(
    cells: impl Iterator<Item = Cell>,
    columns: &[Column],
    rows_in_order: &[&Row],
) -> Option<ClipboardPayload> {
    let mut bounds: Option<(Cell, Cell)> = None;
    for cell in cells {
        bounds = Some(match bounds {
            None => (cell, cell),
            Some((min, max)) => (
                Cell::new(min.row.min(cell.row), min.col.min(cell.col)),
                Cell::new(max.row.max(cell.row), max.col.max(cell.col)),
            ),
        });
    }
    let (min, max) = bounds?;

    let mut lines = Vec::new();
    for row_idx in min.row..=max.row {
        let Some(row) = rows_in_order.get(row_idx) else {
            // Stale coordinate outside the rendered slice: skip, don't fail.
            log::debug!("selected row index {row_idx} outside rendered order");
            continue;
        };
        let line: Vec<String> = (min.col..=max.col)
            .map(|col_idx| {
                columns
                    .get(col_idx)
                    .map(|col| col.render_value(row))
                    .unwrap_or_default()
            })
            .collect();
        lines.push(line);
    }
    non_empty(lines)
}

fn non_empty(lines: Vec<Vec<String>>) -> Option<ClipboardPayload> {
    if lines.is_empty() {
        None
    } else {
        Some(ClipboardPayload { lines })
    }
}
