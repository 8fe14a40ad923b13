use crate::bridge::Bridge;
use crate::ws::WsBridge;
use crate::Result;
use clipboard_x_protocol::{
    Command, ReadFile, ReadImage, ReadImageArgs, WriteFiles, WriteHtml, WriteImage, WriteRtf,
    WriteText,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Clipboard operations, each one round trip to the host.
///
/// Cloning is cheap; clones share the bridge.
#[derive(Clone)]
pub struct ClipboardClient {
    pub(crate) bridge: Arc<dyn Bridge>,
}

impl ClipboardClient {
    pub fn new(bridge: Arc<dyn Bridge>) -> Self {
        Self { bridge }
    }

    /// Connects to a host over WebSocket, e.g. `ws://127.0.0.1:8787/ws`.
    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(Arc::new(WsBridge::connect(url).await?)))
    }

    async fn call<T: DeserializeOwned>(&self, cmd: Command) -> Result<T> {
        let value = self.bridge.invoke(cmd, Value::Null).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn send<A: Serialize>(&self, cmd: Command, args: A) -> Result<()> {
        self.bridge.invoke(cmd, serde_json::to_value(args)?).await?;
        Ok(())
    }

    /// Start listening for clipboard changes.
    pub async fn start_listening(&self) -> Result<()> {
        self.send(Command::StartListening, Value::Null).await
    }

    /// Stop listening for clipboard changes.
    pub async fn stop_listening(&self) -> Result<()> {
        self.send(Command::StopListening, Value::Null).await
    }

    /// Check if the clipboard contains plain text.
    pub async fn has_text(&self) -> Result<bool> {
        self.call(Command::HasText).await
    }

    /// Check if the clipboard contains rich text.
    pub async fn has_rtf(&self) -> Result<bool> {
        self.call(Command::HasRtf).await
    }

    /// Check if the clipboard contains html.
    pub async fn has_html(&self) -> Result<bool> {
        self.call(Command::HasHtml).await
    }

    /// Check if the clipboard contains an image.
    pub async fn has_image(&self) -> Result<bool> {
        self.call(Command::HasImage).await
    }

    /// Check if the clipboard contains files.
    pub async fn has_files(&self) -> Result<bool> {
        self.call(Command::HasFiles).await
    }

    /// Read the clipboard as plain text.
    pub async fn read_text(&self) -> Result<String> {
        self.call(Command::ReadText).await
    }

    /// Read the clipboard as rich text.
    pub async fn read_rtf(&self) -> Result<String> {
        self.call(Command::ReadRtf).await
    }

    /// Read the clipboard as html.
    pub async fn read_html(&self) -> Result<String> {
        self.call(Command::ReadHtml).await
    }

    /// Read the clipboard image. The host writes it to its default image
    /// directory and returns the file's path, byte size and pixel size.
    pub async fn read_image(&self) -> Result<ReadImage> {
        self.call(Command::ReadImage).await
    }

    /// Like [`read_image`](Self::read_image), but into `save_path`.
    pub async fn read_image_to(&self, save_path: impl Into<PathBuf>) -> Result<ReadImage> {
        let args = ReadImageArgs {
            save_path: Some(save_path.into()),
        };
        let value = self
            .bridge
            .invoke(Command::ReadImage, serde_json::to_value(args)?)
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Read the clipboard file list and the total size of the files.
    pub async fn read_files(&self) -> Result<ReadFile> {
        self.call(Command::ReadFiles).await
    }

    /// Write plain text to the clipboard.
    pub async fn write_text(&self, text: &str) -> Result<()> {
        let args = WriteText {
            text: text.to_string(),
        };
        self.send(Command::WriteText, args).await
    }

    /// Write rich text to the clipboard, with `text` as its plain text form.
    pub async fn write_rtf(&self, text: &str, rtf: &str) -> Result<()> {
        let args = WriteRtf {
            text: text.to_string(),
            rtf: rtf.to_string(),
        };
        self.send(Command::WriteRtf, args).await
    }

    /// Write html to the clipboard, with `text` as its plain text form.
    pub async fn write_html(&self, text: &str, html: &str) -> Result<()> {
        let args = WriteHtml {
            text: text.to_string(),
            html: html.to_string(),
        };
        self.send(Command::WriteHtml, args).await
    }

    /// Write the image file at `image` to the clipboard.
    pub async fn write_image(&self, image: impl AsRef<Path>) -> Result<()> {
        let args = WriteImage {
            image: image.as_ref().to_string_lossy().into_owned(),
        };
        self.send(Command::WriteImage, args).await
    }

    /// Write a list of file paths to the clipboard.
    pub async fn write_files<I, S>(&self, files: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = WriteFiles {
            files: files.into_iter().map(Into::into).collect(),
        };
        self.send(Command::WriteFiles, args).await
    }

    /// Clear the clipboard.
    pub async fn clear(&self) -> Result<()> {
        self.send(Command::Clear, Value::Null).await
    }

    /// Directory the host saves clipboard images into by default.
    pub async fn get_default_save_image_path(&self) -> Result<PathBuf> {
        self.call(Command::GetDefaultSaveImagePath).await
    }
}
