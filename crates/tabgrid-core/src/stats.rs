use crate::adapter::GridRenderer;
use crate::selection::SelectionEngine;
use std::collections::BTreeMap;

/// Label used when a row has no value for the grouping field.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Counts derived from the renderer's current filtered view plus the
/// selection state. Never cached across events: the aggregator recomputes on
/// every data/filter/sort/selection event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridStats {
    pub total: usize,
    pub filtered: usize,
    pub selected: usize,
    pub categories: BTreeMap<String, usize>,
}

/// Recomputes [`GridStats`] and owns the click-to-filter category chip.
///
/// At most one chip-driven filter is active at a time; selecting a different
/// chip clears the prior filter first, and clicking the active chip clears it
/// entirely.
#[derive(Clone, Debug, Default)]
pub struct StatsAggregator {
    grouping_field: Option<String>,
    active_chip: Option<String>,
}

impl StatsAggregator {
    pub fn new(grouping_field: Option<String>) -> Self {
        Self {
            grouping_field,
            active_chip: None,
        }
    }

    pub fn active_chip(&self) -> Option<&str> {
        self.active_chip.as_deref()
    }

    pub fn recompute<R: GridRenderer + ?Sized>(
        &self,
        renderer: &R,
        engine: &SelectionEngine,
        total: usize,
    ) -> GridStats {
        // The renderer may not be able to answer yet; fall back to total.
        let filtered = renderer.filtered_row_count().unwrap_or(total);

        let mut categories = BTreeMap::new();
        if let Some(field) = &self.grouping_field {
            for key in renderer.row_order() {
                let Some(row) = renderer.row(&key) else {
                    continue;
                };
                let category = match row.get(field) {
                    Some(v) if !v.is_null() => v.display(),
                    _ => UNCATEGORIZED.to_string(),
                };
                *categories.entry(category).or_insert(0) += 1;
            }
        }

        GridStats {
            total,
            filtered,
            selected: engine.selected_count(),
            categories,
        }
    }

    /// Category chip click. Exact-value filter on the grouping field.
    pub fn toggle_chip<R: GridRenderer + ?Sized>(&mut self, renderer: &mut R, category: &str) {
        let Some(field) = self.grouping_field.clone() else {
            log::debug!("chip click ignored: no grouping field configured");
            return;
        };
        if !renderer.mounted() {
            log::debug!("chip click ignored: renderer not mounted");
            return;
        }
        // The renderer rejects filters on non-filterable fields, so the
        // chip must not claim one was applied.
        if !renderer
            .columns()
            .iter()
            .any(|c| c.field == field && c.filterable)
        {
            log::debug!("chip click ignored: field {field} is not filterable");
            return;
        }
        match self.active_chip.take() {
            Some(active) if active == category => {
                renderer.clear_filter(&field);
            }
            other => {
                if other.is_some() {
                    renderer.clear_filter(&field);
                }
                renderer.set_filter(&field, category);
                self.active_chip = Some(category.to_string());
            }
        }
    }
}
