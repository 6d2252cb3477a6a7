use crate::data::Row;
use std::collections::HashSet;

/// Page size for the data window. `All` is the "show everything" sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSize {
    All,
    Limited(usize),
}

impl PageSize {
    fn limit(&self) -> Option<usize> {
        match *self {
            PageSize::All => None,
            PageSize::Limited(n) => Some(n.max(1)),
        }
    }
}

/// Owns the full dataset and computes the page slice fed to the renderer.
///
/// Paging here is independent of anything the renderer does internally: the
/// renderer only ever sees one page worth of rows. A full data push into the
/// renderer is only warranted when the dataset *identity* changes (row-key
/// set comparison), so in-renderer filter/sort state survives unrelated
/// refreshes.
#[derive(Debug)]
pub struct DataWindow {
    rows: Vec<Row>,
    page_size: PageSize,
    page: usize,
}

impl Default for DataWindow {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            page_size: PageSize::All,
            page: 1,
        }
    }
}

impl DataWindow {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        match self.page_size.limit() {
            None => 1,
            Some(size) => self.rows.len().div_ceil(size).max(1),
        }
    }

    /// Page size changes always reset to the first page.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.page = 1;
    }

    /// Page index clamps to `[1, total_pages]`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// The current page slice. Never allocates and never reorders the source.
    pub fn page_slice(&self) -> &[Row] {
        match self.page_size.limit() {
            None => &self.rows,
            Some(size) => {
                let start = (self.page - 1).saturating_mul(size).min(self.rows.len());
                let end = start.saturating_add(size).min(self.rows.len());
                &self.rows[start..end]
            }
        }
    }

    /// Replaces the dataset and reports whether its identity changed.
    ///
    /// Identity is the set of row keys: edits to field values inside existing
    /// rows do not count as a change, so callers can skip the renderer push
    /// and keep its filter/sort state intact.
    pub fn replace_dataset(&mut self, rows: Vec<Row>) -> bool {
        let changed = !same_key_set(&self.rows, &rows);
        self.rows = rows;
        if changed {
            self.page = self.page.clamp(1, self.total_pages());
        }
        changed
    }
}

fn same_key_set(a: &[Row], b: &[Row]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let keys: HashSet<&str> = a.iter().map(Row::key).collect();
    b.iter().all(|r| keys.contains(r.key()))
}
