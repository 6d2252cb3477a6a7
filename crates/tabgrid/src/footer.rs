use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use tabgrid_core::adapter::GridRenderer;
use tabgrid_core::adapter::RenderAdapter;
use tabgrid_core::theme::Theme;
use tabgrid_core::window::PageSize;
use unicode_width::UnicodeWidthStr;

/// One category chip in the footer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chip {
    pub category: String,
    pub count: usize,
    pub active: bool,
}

/// Snapshot of everything the footer shows. Built fresh from the adapter on
/// each frame; hosts that draw their own chrome consume this instead of
/// [`render_footer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FooterModel {
    pub total: usize,
    pub filtered: usize,
    pub selected: usize,
    pub chips: Vec<Chip>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: PageSize,
    pub page_sizes: Vec<PageSize>,
    pub status: Option<String>,
}

impl FooterModel {
    pub fn from_adapter<R: GridRenderer>(adapter: &RenderAdapter<R>) -> Self {
        let stats = adapter.stats();
        let active = adapter.active_category_chip();
        let chips = stats
            .categories
            .iter()
            .map(|(category, count)| Chip {
                category: category.clone(),
                count: *count,
                active: active == Some(category.as_str()),
            })
            .collect();
        let window = adapter.window();
        let mut page_sizes: Vec<PageSize> = adapter
            .options()
            .page_sizes
            .iter()
            .copied()
            .map(PageSize::Limited)
            .collect();
        page_sizes.push(PageSize::All);
        Self {
            total: stats.total,
            filtered: stats.filtered,
            selected: stats.selected,
            chips,
            page: window.page(),
            total_pages: window.total_pages(),
            page_size: window.page_size(),
            page_sizes,
            status: adapter.status().map(str::to_string),
        }
    }

    pub fn stats_line(&self) -> String {
        format!(
            "total {} | filtered {} | selected {}",
            self.total, self.filtered, self.selected
        )
    }

    pub fn page_line(&self) -> String {
        let size = match self.page_size {
            PageSize::All => "all".to_string(),
            PageSize::Limited(n) => n.to_string(),
        };
        format!("page {}/{} ({size}/page)", self.page, self.total_pages)
    }
}

/// Draws a two-line footer: stats plus chips, then paging plus status.
pub fn render_footer(area: Rect, buf: &mut Buffer, theme: &Theme, model: &FooterModel) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    buf.set_style(area, theme.text_muted);

    let mut x = area.x;
    let line = model.stats_line();
    buf.set_stringn(x, area.y, &line, area.width as usize, theme.text_primary);
    x = x.saturating_add(line.width() as u16 + 2);
    for chip in &model.chips {
        let style = if chip.active {
            theme.chip_active
        } else {
            theme.chip
        };
        let label = format!(" {} {} ", chip.category, chip.count);
        let right = area.x + area.width;
        if x >= right {
            break;
        }
        buf.set_stringn(x, area.y, &label, (right - x) as usize, style);
        x = x.saturating_add(label.width() as u16 + 1);
    }

    if area.height > 1 {
        let mut line = model.page_line();
        if let Some(status) = &model.status {
            line.push_str("  ");
            line.push_str(status);
        }
        buf.set_stringn(
            area.x,
            area.y + 1,
            &line,
            area.width as usize,
            theme.text_muted,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridView;
    use tabgrid_core::adapter::GridOptions;
    use tabgrid_core::data::Column;
    use tabgrid_core::data::Row;

    fn adapter() -> RenderAdapter<GridView> {
        let options = GridOptions {
            grouping_field: Some("category_l1".to_string()),
            ..GridOptions::default()
        };
        let mut adapter = RenderAdapter::new(GridView::new(), options);
        adapter.mount(
            vec![
                Column::new("name", "Name", 8),
                Column::new("category_l1", "Category", 10),
            ],
            vec![
                Row::new("1").with("name", "a").with("category_l1", "network"),
                Row::new("2").with("name", "b").with("category_l1", "network"),
                Row::new("3").with("name", "c").with("category_l1", "db"),
            ],
        );
        adapter
    }

    #[test]
    fn model_reflects_stats_and_paging() {
        let adapter = adapter();
        let model = FooterModel::from_adapter(&adapter);
        assert_eq!(model.total, 3);
        assert_eq!(model.page, 1);
        assert_eq!(
            model.chips,
            vec![
                Chip {
                    category: "db".to_string(),
                    count: 1,
                    active: false,
                },
                Chip {
                    category: "network".to_string(),
                    count: 2,
                    active: false,
                },
            ]
        );
        assert_eq!(model.page_sizes.last(), Some(&PageSize::All));
        assert_eq!(model.stats_line(), "total 3 | filtered 3 | selected 0");
    }
}
