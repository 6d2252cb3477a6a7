use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use std::cell::RefCell;
use std::rc::Rc;
use tabgrid::Column;
use tabgrid::GridOptions;
use tabgrid::GridView;
use tabgrid::PageSize;
use tabgrid::RenderAdapter;
use tabgrid::Row;
use tabgrid_core::adapter::GridAction;
use tabgrid_core::adapter::GridRenderer;
use tabgrid_core::clipboard::ClipboardWriter;
use tabgrid_core::clipboard::CopyError;
use tabgrid_core::data::Cell;
use tabgrid_core::input::InputEvent;
use tabgrid_core::input::KeyCode;
use tabgrid_core::input::KeyEvent;
use tabgrid_core::input::KeyModifiers;
use tabgrid_core::input::MouseButton;
use tabgrid_core::input::MouseEvent;
use tabgrid_core::input::MouseEventKind;

#[derive(Clone, Default)]
struct CapturingClipboard {
    text: Rc<RefCell<Option<String>>>,
}

impl ClipboardWriter for CapturingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CopyError> {
        *self.text.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

struct FailingClipboard;

impl ClipboardWriter for FailingClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), CopyError> {
        Err(CopyError::Backend("write denied".to_string()))
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name", 6),
        Column::new("category_l1", "Category", 6),
        Column::new("difficulty", "Diff", 6),
        Column::new("salary", "Salary", 10).currency("₩"),
    ]
}

fn rows() -> Vec<Row> {
    [
        ("1", "alpha", "network", "easy", 52_000_000i64),
        ("2", "beta", "network", "medium", 61_000_000),
        ("3", "gamma", "database", "hard", 74_000_000),
        ("4", "delta", "security", "medium", 67_000_000),
        ("5", "omega", "database", "easy", 50_000_000),
    ]
    .into_iter()
    .map(|(key, name, category, difficulty, salary)| {
        Row::new(key)
            .with("name", name)
            .with("category_l1", category)
            .with("difficulty", difficulty)
            .with("salary", salary)
    })
    .collect()
}

fn adapter_with(clipboard: Box<dyn ClipboardWriter>) -> RenderAdapter<GridView> {
    let options = GridOptions {
        grouping_field: Some("category_l1".to_string()),
        ..GridOptions::default()
    };
    let mut adapter = RenderAdapter::new(GridView::new(), options).with_clipboard(clipboard);
    adapter.mount(columns(), rows());
    draw(&mut adapter);
    // Arms the checkbox overlay now that the renderer has a layout.
    adapter.tick();
    adapter
}

fn adapter() -> (RenderAdapter<GridView>, CapturingClipboard) {
    let clipboard = CapturingClipboard::default();
    (adapter_with(Box::new(clipboard.clone())), clipboard)
}

fn draw(adapter: &mut RenderAdapter<GridView>) {
    let area = Rect::new(0, 0, 40, 12);
    let mut buf = Buffer::empty(area);
    let (renderer, selection, _stats) = adapter.render_parts();
    renderer.render(area, &mut buf, selection);
}

// With the default renderer options the checkbox column spans x 0..3 and
// data column c starts at x = 4 + 7c (widths 6,6,6,10 with a 1-cell gap).
// The header is row y=0, so visual row r is at y = 1 + r.
fn cell_pos(row: usize, col: usize) -> (u16, u16) {
    ([4u16, 11, 18, 25][col], 1 + row as u16)
}

fn mouse(
    adapter: &mut RenderAdapter<GridView>,
    kind: MouseEventKind,
    (x, y): (u16, u16),
    modifiers: KeyModifiers,
) -> GridAction {
    adapter.handle_input(InputEvent::Mouse(MouseEvent {
        x,
        y,
        kind,
        modifiers,
    }))
}

fn click(adapter: &mut RenderAdapter<GridView>, pos: (u16, u16), modifiers: KeyModifiers) {
    mouse(
        adapter,
        MouseEventKind::Down(MouseButton::Left),
        pos,
        modifiers,
    );
    mouse(
        adapter,
        MouseEventKind::Up(MouseButton::Left),
        pos,
        modifiers,
    );
}

fn shift() -> KeyModifiers {
    KeyModifiers {
        shift: true,
        ..KeyModifiers::none()
    }
}

fn ctrl() -> KeyModifiers {
    KeyModifiers {
        ctrl: true,
        ..KeyModifiers::none()
    }
}

fn press(adapter: &mut RenderAdapter<GridView>, code: KeyCode, modifiers: KeyModifiers) -> GridAction {
    adapter.handle_input(InputEvent::Key(KeyEvent { code, modifiers }))
}

fn page_keys(adapter: &RenderAdapter<GridView>) -> Vec<String> {
    adapter
        .window()
        .page_slice()
        .iter()
        .map(|r| r.key().to_string())
        .collect()
}

#[test]
fn pages_partition_dataset_and_all_restores_order() {
    let (mut adapter, _clipboard) = adapter();
    adapter.set_page_size(PageSize::Limited(2));

    let mut seen = Vec::new();
    for page in 1..=adapter.window().total_pages() {
        adapter.set_page(page);
        seen.extend(page_keys(&adapter));
    }
    assert_eq!(seen, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(adapter.window().total_pages(), 3);

    // Next/prev clamp at the ends.
    adapter.next_page();
    assert_eq!(adapter.window().page(), 3);
    adapter.set_page(1);
    adapter.prev_page();
    assert_eq!(adapter.window().page(), 1);

    adapter.set_page_size(PageSize::All);
    assert_eq!(page_keys(&adapter), vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn shift_click_selects_exact_rectangle() {
    let (mut adapter, _clipboard) = adapter();

    click(&mut adapter, cell_pos(1, 0), KeyModifiers::none());
    click(&mut adapter, cell_pos(3, 2), shift());

    let cells = adapter.selection().selected_cells();
    assert_eq!(cells.len(), 9);
    for r in 1..=3 {
        for c in 0..=2 {
            assert!(cells.contains(&Cell::new(r, c)), "missing ({r},{c})");
        }
    }
}

#[test]
fn checkbox_rows_copy_as_tsv_in_rendered_order() {
    let (mut adapter, clipboard) = adapter();

    // Select rows 3 and 1 via their checkboxes, deliberately out of order.
    click(&mut adapter, (1, 1 + 2), KeyModifiers::none());
    click(&mut adapter, (1, 1), KeyModifiers::none());
    assert_eq!(adapter.stats().selected, 2);

    let action = press(&mut adapter, KeyCode::Char('c'), ctrl());
    assert_eq!(action, GridAction::Copied(2));

    let text = clipboard.text.borrow().clone().expect("clipboard written");
    let lines: Vec<&str> = text.split("\r\n").collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0].split('\t').collect::<Vec<_>>(),
        vec!["alpha", "network", "easy", "₩52,000,000"]
    );
    assert_eq!(
        lines[1].split('\t').collect::<Vec<_>>(),
        vec!["gamma", "database", "hard", "₩74,000,000"]
    );
}

#[test]
fn cell_block_tsv_round_trips() {
    let (mut adapter, clipboard) = adapter();

    click(&mut adapter, cell_pos(0, 0), KeyModifiers::none());
    click(&mut adapter, cell_pos(1, 1), shift());
    press(&mut adapter, KeyCode::Char('c'), ctrl());

    let text = clipboard.text.borrow().clone().expect("clipboard written");
    let block: Vec<Vec<&str>> = text
        .split("\r\n")
        .map(|line| line.split('\t').collect())
        .collect();
    assert_eq!(
        block,
        vec![vec!["alpha", "network"], vec!["beta", "network"]]
    );
}

#[test]
fn drag_selects_rectangle_and_ctrl_merges() {
    let (mut adapter, _clipboard) = adapter();

    mouse(
        &mut adapter,
        MouseEventKind::Down(MouseButton::Left),
        cell_pos(0, 0),
        KeyModifiers::none(),
    );
    mouse(
        &mut adapter,
        MouseEventKind::Drag(MouseButton::Left),
        cell_pos(1, 1),
        KeyModifiers::none(),
    );
    mouse(
        &mut adapter,
        MouseEventKind::Up(MouseButton::Left),
        cell_pos(1, 1),
        KeyModifiers::none(),
    );
    assert_eq!(adapter.selection().selected_cells().len(), 4);

    // Ctrl-drag a second disjoint rectangle merges with the first.
    mouse(
        &mut adapter,
        MouseEventKind::Down(MouseButton::Left),
        cell_pos(3, 0),
        ctrl(),
    );
    mouse(
        &mut adapter,
        MouseEventKind::Drag(MouseButton::Left),
        cell_pos(3, 1),
        ctrl(),
    );
    mouse(
        &mut adapter,
        MouseEventKind::Up(MouseButton::Left),
        cell_pos(3, 1),
        ctrl(),
    );
    assert_eq!(adapter.selection().selected_cells().len(), 6);

    // A stationary ctrl press toggles a merged cell back off.
    click(&mut adapter, cell_pos(3, 0), ctrl());
    assert_eq!(adapter.selection().selected_cells().len(), 5);
}

#[test]
fn chip_filter_toggle_restores_filtered_count() {
    let (mut adapter, _clipboard) = adapter();
    assert_eq!(adapter.stats().filtered, 5);

    adapter.toggle_category_chip("database");
    draw(&mut adapter);
    assert_eq!(adapter.active_category_chip(), Some("database"));
    assert_eq!(adapter.stats().filtered, 2);
    assert_eq!(adapter.renderer().row_order(), vec!["3", "5"]);

    // Switching chips replaces the filter instead of stacking.
    adapter.toggle_category_chip("network");
    draw(&mut adapter);
    assert_eq!(adapter.stats().filtered, 2);
    assert_eq!(adapter.renderer().row_order(), vec!["1", "2"]);

    adapter.toggle_category_chip("network");
    draw(&mut adapter);
    assert_eq!(adapter.active_category_chip(), None);
    assert_eq!(adapter.stats().filtered, 5);
}

#[test]
fn row_and_cell_selection_stay_mutually_exclusive() {
    let (mut adapter, _clipboard) = adapter();
    let clicked: Rc<RefCell<Vec<Cell>>> = Rc::default();
    let sink = clicked.clone();
    adapter.set_on_cell_click(Box::new(move |cell| sink.borrow_mut().push(cell)));

    click(&mut adapter, cell_pos(0, 0), KeyModifiers::none());
    assert_eq!(adapter.selection().selected_cells().len(), 1);
    assert_eq!(clicked.borrow().as_slice(), &[Cell::new(0, 0)]);

    // A checkbox click drops the cell selection before toggling the row.
    click(&mut adapter, (1, 1), KeyModifiers::none());
    assert!(adapter.selection().selected_cells().is_empty());
    assert_eq!(adapter.renderer().selected_row_keys(), vec!["1"]);

    // And a cell click drops the row selection, checkboxes included.
    click(&mut adapter, cell_pos(2, 1), KeyModifiers::none());
    assert_eq!(adapter.selection().selected_cells().len(), 1);
    assert!(adapter.selection().selected_row_keys().is_empty());
    assert!(adapter.renderer().selected_row_keys().is_empty());
}

#[test]
fn escape_empties_any_selection_state() {
    let (mut adapter, clipboard) = adapter();

    click(&mut adapter, cell_pos(2, 2), KeyModifiers::none());
    press(&mut adapter, KeyCode::Esc, KeyModifiers::none());
    assert_eq!(adapter.selection().selected_count(), 0);

    click(&mut adapter, (1, 1), KeyModifiers::none());
    press(&mut adapter, KeyCode::Esc, KeyModifiers::none());
    assert_eq!(adapter.selection().selected_count(), 0);
    assert!(adapter.renderer().selected_row_keys().is_empty());

    // Copying with nothing selected fails without touching the clipboard.
    let action = press(&mut adapter, KeyCode::Char('c'), ctrl());
    assert_eq!(action, GridAction::Redraw);
    assert!(clipboard.text.borrow().is_none());
    assert_eq!(adapter.status(), Some("no selection"));
}

#[test]
fn deselecting_the_last_row_notifies_selection_cleared() {
    let (mut adapter, _clipboard) = adapter();
    let messages: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = messages.clone();
    adapter.set_on_selection_changed(Box::new(move |m| sink.borrow_mut().push(m.to_string())));

    // Toggle the same checkbox on and back off.
    click(&mut adapter, (1, 1), KeyModifiers::none());
    click(&mut adapter, (1, 1), KeyModifiers::none());

    assert_eq!(
        messages.borrow().as_slice(),
        &["1 row(s) selected".to_string(), "selection cleared".to_string()]
    );
}

#[test]
fn clipboard_backend_failure_sets_copy_failed_status() {
    let mut adapter = adapter_with(Box::new(FailingClipboard));

    click(&mut adapter, cell_pos(0, 0), KeyModifiers::none());
    assert!(adapter.copy_selection().is_err());
    assert_eq!(adapter.status(), Some("copy failed"));

    // The key path surfaces the failure as a repaint, never a copy count.
    let action = press(&mut adapter, KeyCode::Char('c'), ctrl());
    assert_eq!(action, GridAction::Redraw);
    assert_eq!(adapter.status(), Some("copy failed"));
}

#[test]
fn status_line_decays_after_forty_ticks() {
    let (mut adapter, _clipboard) = adapter();

    press(&mut adapter, KeyCode::Char('c'), ctrl());
    assert_eq!(adapter.status(), Some("no selection"));

    for _ in 0..39 {
        adapter.tick();
    }
    assert_eq!(adapter.status(), Some("no selection"));

    adapter.tick();
    assert_eq!(adapter.status(), None);
}

#[test]
fn dataset_identity_change_clears_selection() {
    let (mut adapter, _clipboard) = adapter();

    click(&mut adapter, cell_pos(0, 0), KeyModifiers::none());

    // Same key set: value-only refresh keeps the renderer content.
    let mut refreshed = rows();
    refreshed[0].set("name", "renamed");
    adapter.set_data(refreshed);
    assert_eq!(adapter.selection().selected_count(), 1);

    // New key set: identity changed, selection goes with it.
    let mut extended = rows();
    extended.push(Row::new("6").with("name", "zeta").with("category_l1", "os"));
    adapter.set_data(extended);
    assert_eq!(adapter.selection().selected_count(), 0);
    assert_eq!(adapter.stats().total, 6);
}
