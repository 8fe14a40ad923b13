//! Client for a clipboard-x host.
//!
//! Every clipboard operation is one command sent to the host over a
//! [`Bridge`]. On top of those, [`ClipboardClient::read_clipboard`] merges
//! all content types into one [`ReadClipboard`] and
//! [`ClipboardClient::on_clipboard_change`] delivers a fresh one after each
//! change the host reports.
//!
//! ```no_run
//! use clipboard_x_client::{ClipboardChangeOptions, ClipboardClient};
//!
//! # async fn demo() -> clipboard_x_client::Result<()> {
//! let client = ClipboardClient::connect("ws://127.0.0.1:8787/ws").await?;
//! client.start_listening().await?;
//!
//! let unlisten = client
//!     .on_clipboard_change(
//!         |result| println!("{:?}", result.text),
//!         ClipboardChangeOptions::new(),
//!     )
//!     .await?;
//!
//! client.write_text("Hello, world!").await?;
//! # unlisten.unlisten();
//! # Ok(())
//! # }
//! ```

mod bridge;
mod client;
pub mod config;
mod error;
mod listener;
mod snapshot;
#[cfg(test)]
mod testing;
mod ws;

pub use bridge::{Bridge, Subscription};
pub use client::ClipboardClient;
pub use clipboard_x_protocol as protocol;
pub use clipboard_x_protocol::{ReadFile, ReadImage};
pub use error::{Error, Result};
pub use listener::{ClipboardChangeOptions, Unlisten};
pub use snapshot::{ClipboardType, ReadClipboard, ReadClipboardImage, ReadClipboardItem};
pub use ws::WsBridge;
