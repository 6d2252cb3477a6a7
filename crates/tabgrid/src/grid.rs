use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;
use tabgrid_core::adapter::GridEvent;
use tabgrid_core::adapter::GridRenderer;
use tabgrid_core::adapter::HitTarget;
use tabgrid_core::data::Cell;
use tabgrid_core::data::Column;
use tabgrid_core::data::Row;
use tabgrid_core::selection::SelectionEngine;
use tabgrid_core::stats;
use tabgrid_core::theme::Theme;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Renderer-level options. Grid-level behavior toggles live in
/// [`tabgrid_core::adapter::GridOptions`].
#[derive(Clone, Debug)]
pub struct GridViewOptions {
    pub show_header: bool,
    pub checkbox_column: bool,
    pub checkbox_width: u16,
    pub col_gap: u16,
}

impl Default for GridViewOptions {
    fn default() -> Self {
        Self {
            show_header: true,
            checkbox_column: true,
            checkbox_width: 3,
            col_gap: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SortDir {
    Asc,
    Desc,
}

#[derive(Clone, Debug)]
struct Sort {
    field: String,
    dir: SortDir,
}

/// Screen geometry captured at render time, used for hit testing.
#[derive(Clone, Debug)]
struct GridLayout {
    area: Rect,
    header_rows: u16,
    checkbox_span: Option<(u16, u16)>,
    col_spans: Vec<(u16, u16)>,
    body_rows: usize,
}

/// A ratatui-backed [`GridRenderer`].
///
/// Holds one page worth of rows (the adapter's data window does the paging),
/// applies its own exact-match header filters and single-column sort, and
/// translates terminal coordinates into logical cells. Styling chrome is
/// retained in a palette that reverts to the light default whenever content
/// is rebuilt, which is what makes the core's `ThemeRepainter` necessary.
pub struct GridView {
    options: GridViewOptions,
    columns: Vec<Column>,
    rows: Vec<Row>,
    filters: BTreeMap<String, String>,
    sort: Option<Sort>,
    selected_rows: BTreeSet<String>,
    palette: Theme,
    layout: Option<GridLayout>,
    events: VecDeque<GridEvent>,
}

impl Default for GridView {
    fn default() -> Self {
        Self {
            options: GridViewOptions::default(),
            columns: Vec::new(),
            rows: Vec::new(),
            filters: BTreeMap::new(),
            sort: None,
            selected_rows: BTreeSet::new(),
            palette: Theme::light(),
            layout: None,
            events: VecDeque::new(),
        }
    }
}

impl GridView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: GridViewOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &GridViewOptions {
        &self.options
    }

    pub fn active_filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn sort_indicator(&self, field: &str) -> Option<&'static str> {
        let sort = self.sort.as_ref()?;
        if sort.field != field {
            return None;
        }
        Some(match sort.dir {
            SortDir::Asc => "▲",
            SortDir::Desc => "▼",
        })
    }

    /// Content rebuilds revert retained styling to the renderer default.
    fn churn(&mut self) {
        self.palette = Theme::light();
    }

    fn row_passes_filters(&self, row: &Row) -> bool {
        self.filters.iter().all(|(field, value)| {
            match row.get(field) {
                Some(v) if !v.is_null() => v.display() == *value,
                // Null/missing values match the uncategorized chip.
                _ => value == stats::UNCATEGORIZED,
            }
        })
    }

    fn visible_rows(&self) -> Vec<&Row> {
        let mut rows: Vec<&Row> = self
            .rows
            .iter()
            .filter(|r| self.row_passes_filters(r))
            .collect();
        if let Some(sort) = &self.sort {
            rows.sort_by(|a, b| {
                let null = tabgrid_core::data::CellValue::Null;
                let av = a.get(&sort.field).unwrap_or(&null);
                let bv = b.get(&sort.field).unwrap_or(&null);
                let ord = av.sort_cmp(bv);
                match sort.dir {
                    SortDir::Asc => ord,
                    SortDir::Desc => ord.reverse(),
                }
            });
        }
        rows
    }

    /// Draws the grid and captures the layout used by `hit_test`. The
    /// selection engine is consulted for cell highlighting only; it is never
    /// mutated here.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, selection: &SelectionEngine) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let header_rows = if self.options.show_header { 1u16 } else { 0u16 };
        let header_rows = header_rows.min(area.height);

        let mut x = area.x;
        let checkbox_span = if self.options.checkbox_column {
            let w = self.options.checkbox_width.min(area.width);
            let span = (x, w);
            x = x.saturating_add(w + self.options.col_gap);
            Some(span)
        } else {
            None
        };

        let mut col_spans = Vec::with_capacity(self.columns.len());
        for col in &self.columns {
            let right = area.x.saturating_add(area.width);
            if x >= right {
                col_spans.push((x, 0));
                continue;
            }
            let w = col.width.min(right - x);
            col_spans.push((x, w));
            x = x.saturating_add(w + self.options.col_gap);
        }

        if header_rows > 0 {
            self.render_header(area.y, buf, &col_spans, checkbox_span);
        }

        let body_top = area.y + header_rows;
        let body_height = area.height - header_rows;
        let visible = self.visible_rows();
        let body_rows = visible.len().min(body_height as usize);

        for (row_idx, row) in visible.iter().take(body_rows).enumerate() {
            let y = body_top + row_idx as u16;
            let row_selected = self.selected_rows.contains(row.key());
            let base = if row_selected {
                self.palette.selected_row
            } else if row_idx % 2 == 1 {
                self.palette.row_alt
            } else {
                self.palette.row
            };
            buf.set_style(Rect::new(area.x, y, area.width, 1), base);

            if let Some((cx, cw)) = checkbox_span {
                let mark = if row_selected { "[x]" } else { "[ ]" };
                set_clipped(buf, cx, y, cw, mark, self.palette.checkbox.patch(base));
            }

            for (col_idx, (sx, sw)) in col_spans.iter().enumerate() {
                if *sw == 0 {
                    continue;
                }
                let cell = Cell::new(row_idx, col_idx);
                let style = if selection.contains(cell) {
                    self.palette.selected_cell
                } else {
                    base
                };
                buf.set_style(Rect::new(*sx, y, *sw, 1), style);
                let text = self.columns[col_idx].render_value(row);
                set_clipped(buf, *sx, y, *sw, &text, style);
            }
        }

        self.layout = Some(GridLayout {
            area,
            header_rows,
            checkbox_span,
            col_spans,
            body_rows,
        });
    }

    fn render_header(
        &self,
        y: u16,
        buf: &mut Buffer,
        col_spans: &[(u16, u16)],
        checkbox_span: Option<(u16, u16)>,
    ) {
        if let Some((cx, cw)) = checkbox_span {
            buf.set_style(Rect::new(cx, y, cw, 1), self.palette.header);
        }
        for (col, (sx, sw)) in self.columns.iter().zip(col_spans) {
            if *sw == 0 {
                continue;
            }
            buf.set_style(Rect::new(*sx, y, *sw, 1), self.palette.header);
            let title = match self.sort_indicator(&col.field) {
                Some(mark) => format!("{} {mark}", col.title),
                None => col.title.clone(),
            };
            set_clipped(buf, *sx, y, *sw, &title, self.palette.header);
        }
    }
}

impl GridRenderer for GridView {
    fn mounted(&self) -> bool {
        !self.columns.is_empty() && self.layout.is_some()
    }

    fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.filters.clear();
        self.sort = None;
        self.churn();
    }

    fn replace_data(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.selected_rows.clear();
        self.churn();
        self.events.push_back(GridEvent::DataLoaded);
        self.events.push_back(GridEvent::PageLoaded);
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }

    fn row_order(&self) -> Vec<String> {
        self.visible_rows()
            .iter()
            .map(|r| r.key().to_string())
            .collect()
    }

    fn row(&self, key: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.key() == key)
    }

    fn filtered_row_count(&self) -> Option<usize> {
        if !self.mounted() {
            return None;
        }
        Some(self.visible_rows().len())
    }

    fn set_filter(&mut self, field: &str, value: &str) {
        if !self.columns.iter().any(|c| c.field == field && c.filterable) {
            log::debug!("filter on non-filterable field {field} ignored");
            return;
        }
        self.filters.insert(field.to_string(), value.to_string());
        self.churn();
        self.events.push_back(GridEvent::DataFiltered);
    }

    fn clear_filter(&mut self, field: &str) {
        if self.filters.remove(field).is_some() {
            self.churn();
            self.events.push_back(GridEvent::DataFiltered);
        }
    }

    fn toggle_sort(&mut self, field: &str) {
        self.sort = match self.sort.take() {
            Some(sort) if sort.field == field => match sort.dir {
                SortDir::Asc => Some(Sort {
                    field: sort.field,
                    dir: SortDir::Desc,
                }),
                SortDir::Desc => None,
            },
            _ => Some(Sort {
                field: field.to_string(),
                dir: SortDir::Asc,
            }),
        };
        self.churn();
        self.events.push_back(GridEvent::DataSorted);
    }

    fn hit_test(&self, x: u16, y: u16) -> Option<HitTarget> {
        let layout = self.layout.as_ref()?;
        let area = layout.area;
        if x < area.x || x >= area.x + area.width || y < area.y || y >= area.y + area.height {
            return None;
        }

        let col_at = |x: u16| {
            layout
                .col_spans
                .iter()
                .position(|(sx, sw)| *sw > 0 && x >= *sx && x < sx + sw)
        };

        if y < area.y + layout.header_rows {
            // The checkbox header is not a sortable column.
            return col_at(x).map(|col| HitTarget::Header { col });
        }

        let row = (y - area.y - layout.header_rows) as usize;
        if row >= layout.body_rows {
            return None;
        }
        if let Some((cx, cw)) = layout.checkbox_span {
            if x >= cx && x < cx + cw {
                return Some(HitTarget::Checkbox { row });
            }
        }
        col_at(x).map(|col| HitTarget::Cell(Cell::new(row, col)))
    }

    fn toggle_row_selection(&mut self, key: &str) {
        if self.row(key).is_none() {
            log::debug!("row toggle for unknown key {key} ignored");
            return;
        }
        if self.selected_rows.remove(key) {
            self.events.push_back(GridEvent::RowDeselected(key.to_string()));
        } else {
            self.selected_rows.insert(key.to_string());
            self.events.push_back(GridEvent::RowSelected(key.to_string()));
        }
    }

    fn deselect_all_rows(&mut self) {
        let keys: Vec<String> = self.selected_rows.iter().cloned().collect();
        self.selected_rows.clear();
        for key in keys {
            self.events.push_back(GridEvent::RowDeselected(key));
        }
    }

    fn selected_row_keys(&self) -> Vec<String> {
        self.selected_rows.iter().cloned().collect()
    }

    fn restyle(&mut self, theme: &Theme) {
        self.palette = theme.clone();
    }

    fn drain_events(&mut self) -> Vec<GridEvent> {
        self.events.drain(..).collect()
    }
}

/// Writes `text` into a one-line span of `width` cells, truncating on a
/// display-column boundary. Wide glyphs that would straddle the edge are
/// dropped.
fn set_clipped(buf: &mut Buffer, x: u16, y: u16, width: u16, text: &str, style: Style) {
    if width == 0 {
        return;
    }
    let mut out = String::new();
    let mut used = 0u16;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0) as u16;
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    debug_assert!(out.width() as u16 <= width);
    buf.set_stringn(x, y, &out, width as usize, style);
}
