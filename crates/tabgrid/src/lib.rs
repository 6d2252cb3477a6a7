//! `tabgrid` is the ratatui facade for the `tabgrid-core` grid logic.
//!
//! The core crate holds everything renderer-agnostic: the data window,
//! selection engine, clipboard serialization, stats, and the adapter that
//! wires them together over the [`tabgrid_core::adapter::GridRenderer`]
//! trait. This crate supplies the concrete pieces a terminal app needs:
//!
//! - [`grid::GridView`]: a ratatui-backed renderer with header filters,
//!   single-column sort, a checkbox column, and coordinate hit testing.
//! - [`clipboard::SystemClipboard`]: OS clipboard with an OSC 52 fallback.
//! - [`footer::FooterModel`] / [`footer::render_footer`]: stats line,
//!   category chips, and page controls as plain data or a drawn footer.
//!
//! You own the event loop: feed input into the adapter, draw on each frame,
//! call `tick` at a steady rate. See `examples/topics.rs` for a complete
//! crossterm loop.

pub mod clipboard;
pub mod footer;
pub mod grid;

pub use tabgrid_core as core;

pub use tabgrid_core::adapter::GridAction;
pub use tabgrid_core::adapter::GridOptions;
pub use tabgrid_core::adapter::RenderAdapter;
pub use tabgrid_core::data::Column;
pub use tabgrid_core::data::Row;
pub use tabgrid_core::theme::ThemeVariant;
pub use tabgrid_core::window::PageSize;

pub use clipboard::SystemClipboard;
pub use footer::FooterModel;
pub use grid::GridView;
pub use grid::GridViewOptions;
