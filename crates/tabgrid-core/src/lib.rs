//! `tabgrid-core` provides the renderer-agnostic pieces of a data grid with
//! spreadsheet-style selection and clipboard export.
//!
//! The grid renderer itself is a black box behind [`adapter::GridRenderer`]:
//! it takes dataset and column inputs, answers logical hit tests, and emits
//! lifecycle events. The data window, selection state machine, checkbox
//! overlay, clipboard serializer, stats aggregator, and theme repainter all
//! work in logical `(row, col)` coordinates and run synchronously from the
//! host's event loop.
//!
//! ## Design notes
//!
//! - Event-loop agnostic: the host feeds [`input::InputEvent`]s into
//!   [`adapter::RenderAdapter::handle_input`] and renders when it likes.
//! - No async runtime: clipboard writes are the only potentially slow path
//!   and they are fire-and-forget; outcomes surface as transient status
//!   strings, never awaited by selection logic.
//! - Failures at the renderer boundary (hit-test misses, calls before mount)
//!   are logged no-ops, not errors.
//!
//! Most users should depend on the facade crate `tabgrid`, which adds a
//! ratatui-backed renderer and a system clipboard writer.

pub mod adapter;
pub mod clipboard;
pub mod data;
pub mod input;
pub mod keymap;
pub mod overlay;
pub mod selection;
pub mod source;
pub mod stats;
pub mod theme;
pub mod window;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;
