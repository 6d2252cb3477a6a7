use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use std::io;
use std::time::Duration;
use tabgrid::Column;
use tabgrid::GridOptions;
use tabgrid::GridView;
use tabgrid::PageSize;
use tabgrid::RenderAdapter;
use tabgrid::Row;
use tabgrid::SystemClipboard;
use tabgrid::ThemeVariant;
use tabgrid::footer::FooterModel;
use tabgrid::footer::render_footer;
use tabgrid_core::crossterm_input::input_event_from_crossterm;
use tabgrid_core::source::MemorySource;
use tabgrid_core::source::RowSource;
use tabgrid_core::theme::Theme;

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let options = GridOptions {
        grouping_field: Some("category_l1".to_string()),
        theme: ThemeVariant::Dark,
        ..GridOptions::default()
    };
    let mut source = MemorySource::new(topic_rows());
    let rows = source
        .fetch_all(&[])
        .map_err(|e| io::Error::other(e.to_string()))?;

    let mut adapter = RenderAdapter::new(GridView::new(), options)
        .with_clipboard(Box::new(SystemClipboard::new()));
    adapter.mount(topic_columns(), rows);
    adapter.set_page_size(PageSize::Limited(10));

    let res = run(&mut terminal, &mut adapter);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    adapter: &mut RenderAdapter<GridView>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let block = Block::default()
                .title("tabgrid (click/ctrl/shift/drag, checkboxes, Ctrl+C copy, n/p page, 1-9 chips, q)")
                .borders(Borders::ALL);
            let inner = block.inner(area);
            f.render_widget(block, area);

            let buf = f.buffer_mut();
            let grid_area = Rect::new(
                inner.x,
                inner.y,
                inner.width,
                inner.height.saturating_sub(2),
            );
            let footer_area = Rect::new(inner.x, inner.y + grid_area.height, inner.width, 2);

            let model = FooterModel::from_adapter(adapter);
            let (renderer, selection, _stats) = adapter.render_parts();
            renderer.render(grid_area, buf, selection);
            render_footer(footer_area, buf, &Theme::dark(), &model);
        })?;

        if crossterm::event::poll(Duration::from_millis(50))? {
            let event = crossterm::event::read()?;
            if let Event::Key(key) = &event {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char('n') => {
                        adapter.next_page();
                        continue;
                    }
                    KeyCode::Char('p') => {
                        adapter.prev_page();
                        continue;
                    }
                    KeyCode::Char(c @ '1'..='9') => {
                        let idx = c as usize - '1' as usize;
                        let chips: Vec<String> = adapter
                            .stats()
                            .categories
                            .keys()
                            .cloned()
                            .collect();
                        if let Some(category) = chips.get(idx) {
                            adapter.toggle_category_chip(category);
                        }
                        continue;
                    }
                    _ => {}
                }
            }
            if let Some(ev) = input_event_from_crossterm(event) {
                adapter.handle_input(ev);
            }
        } else {
            adapter.tick();
        }
    }
}

fn topic_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Topic", 26),
        Column::new("category_l1", "Category", 14),
        Column::new("difficulty", "Difficulty", 10),
        Column::new("salary", "Salary", 16).currency("₩"),
    ]
}

fn topic_rows() -> Vec<Row> {
    let topics: &[(&str, &str, &str, i64)] = &[
        ("TCP three-way handshake", "network", "easy", 52_000_000),
        ("OSI reference model", "network", "easy", 48_000_000),
        ("Subnetting and CIDR", "network", "medium", 61_000_000),
        ("B-tree index structure", "database", "medium", 66_000_000),
        ("Transaction isolation levels", "database", "hard", 74_000_000),
        ("Normalization to BCNF", "database", "medium", 63_000_000),
        ("Deadlock detection", "os", "hard", 70_000_000),
        ("Page replacement policies", "os", "medium", 62_000_000),
        ("Process vs thread", "os", "easy", 50_000_000),
        ("Public key infrastructure", "security", "medium", 68_000_000),
        ("SQL injection defenses", "security", "medium", 67_000_000),
        ("Symmetric vs asymmetric crypto", "security", "easy", 55_000_000),
        ("Quicksort pivot strategies", "algorithm", "medium", 64_000_000),
        ("Dynamic programming basics", "algorithm", "hard", 76_000_000),
        ("Graph shortest paths", "algorithm", "hard", 75_000_000),
        ("UML class diagrams", "design", "easy", 49_000_000),
        ("Design pattern catalog", "design", "medium", 60_000_000),
    ];
    topics
        .iter()
        .enumerate()
        .map(|(i, (name, category, difficulty, salary))| {
            Row::new((i + 1).to_string())
                .with("name", *name)
                .with("category_l1", *category)
                .with("difficulty", *difficulty)
                .with("salary", *salary)
        })
        .collect()
}
