//! Terminal UI for logview
//!
//! Interactive view over a presentation document: keyboard navigation,
//! per-argument and global JSON expansion, live filtering and open-source
//! requests, all routed through the interaction controller.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{Action, AppState, UiState, ViewerOptions};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::components::{viewer_hints, HelpOverlay, StatusBar};
pub use ui::screens::LogViewerScreen;
pub use ui::{Layout, Theme};
