//! Shapeboard Application
//!
//! The application shell: windowing, input routing, the text side panel,
//! and integration of the core model with the renderer.

mod app;
mod event_handler;
mod shortcuts;
mod ui;

pub use app::{App, AppConfig};
pub use event_handler::EventHandler;
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{UiAction, UiState, render_ui};
