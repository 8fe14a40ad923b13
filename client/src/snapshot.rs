//! One merged view over every content type on the clipboard.

use crate::{ClipboardClient, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipboardType {
    Text,
    Rtf,
    Html,
    Image,
    Files,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadClipboardItem<T = String> {
    /// The type of the clipboard content.
    #[serde(rename = "type")]
    pub kind: ClipboardType,
    /// The value of the clipboard content.
    pub value: T,
    /// Characters for text types, bytes for images and files.
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadClipboardImage {
    #[serde(rename = "type")]
    pub kind: ClipboardType,
    /// Path of the image file the host wrote.
    pub value: PathBuf,
    /// Size of the image file in bytes.
    pub count: u64,
    /// The width of the image in pixels.
    pub width: u32,
    /// The height of the image in pixels.
    pub height: u32,
}

/// Everything on the clipboard at one point in time. Absent content types
/// are `None` and left out when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadClipboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<ReadClipboardItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtf: Option<ReadClipboardItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<ReadClipboardItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ReadClipboardImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<ReadClipboardItem<Vec<String>>>,
}

impl ReadClipboard {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.rtf.is_none()
            && self.html.is_none()
            && self.image.is_none()
            && self.files.is_none()
    }
}

/// Length in UTF-16 code units, the unit clipboard-x frontends count in.
fn char_count(text: &str) -> u64 {
    text.encode_utf16().count() as u64
}

impl ClipboardClient {
    /// Read all available content from the clipboard.
    ///
    /// Content types are checked and fetched one after another. When plain
    /// text is present, the rtf and html counts repeat the text's count
    /// instead of their own length.
    pub async fn read_clipboard(&self) -> Result<ReadClipboard> {
        let mut result = ReadClipboard::default();

        if present(self.has_text().await)? {
            let text = self.read_text().await?;

            result.text = Some(ReadClipboardItem {
                kind: ClipboardType::Text,
                count: char_count(&text),
                value: text,
            });
        }

        if present(self.has_rtf().await)? {
            let rtf = self.read_rtf().await?;

            result.rtf = Some(ReadClipboardItem {
                kind: ClipboardType::Rtf,
                count: result
                    .text
                    .as_ref()
                    .map_or_else(|| char_count(&rtf), |text| text.count),
                value: rtf,
            });
        }

        if present(self.has_html().await)? {
            let html = self.read_html().await?;

            result.html = Some(ReadClipboardItem {
                kind: ClipboardType::Html,
                count: result
                    .text
                    .as_ref()
                    .map_or_else(|| char_count(&html), |text| text.count),
                value: html,
            });
        }

        if present(self.has_image().await)? {
            let image = self.read_image().await?;

            result.image = Some(ReadClipboardImage {
                kind: ClipboardType::Image,
                value: image.path,
                count: image.size,
                width: image.width,
                height: image.height,
            });
        }

        if present(self.has_files().await)? {
            let files = self.read_files().await?;

            result.files = Some(ReadClipboardItem {
                kind: ClipboardType::Files,
                value: files.paths,
                count: files.size,
            });
        }

        Ok(result)
    }
}

/// A check the host itself failed means "not there"; a broken connection
/// is still an error.
fn present(check: Result<bool>) -> Result<bool> {
    match check {
        Err(Error::Host(message)) => {
            debug!("Existence check failed, treating as absent: {}", message);
            Ok(false)
        }
        other => other,
    }
}
