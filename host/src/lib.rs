//! Native clipboard host for clipboard-x clients.
//!
//! Serves the `plugin:clipboard-x|*` commands over a WebSocket and emits
//! `plugin:clipboard-x://clipboard_changed` while listening is enabled.

pub mod clipboard;
pub mod commands;
pub mod config;
mod error;
pub mod images;
pub mod server;
mod state;
mod watcher;

pub use error::{ClipboardError, ConfigError, Result};
pub use state::HostState;
