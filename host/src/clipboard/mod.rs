use crate::Result;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

mod memory;
#[cfg(target_os = "linux")]
mod linux;
#[cfg(any(target_os = "windows", target_os = "macos"))]
mod native;

pub use memory::MemoryClipboard;

#[cfg(target_os = "linux")]
pub use linux::LinuxClipboard;
#[cfg(any(target_os = "windows", target_os = "macos"))]
pub use native::NativeClipboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentFormat {
    Text,
    Rtf,
    Html,
    Image,
    Files,
}

impl ContentFormat {
    pub const ALL: [ContentFormat; 5] = [
        ContentFormat::Text,
        ContentFormat::Rtf,
        ContentFormat::Html,
        ContentFormat::Image,
        ContentFormat::Files,
    ];
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentFormat::Text => "plain text",
            ContentFormat::Rtf => "rich text",
            ContentFormat::Html => "html",
            ContentFormat::Image => "an image",
            ContentFormat::Files => "files",
        };
        f.write_str(name)
    }
}

/// PNG-encoded image as exchanged with the clipboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageData {
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClipboardContent {
    Text(String),
    Rtf(String),
    Html(String),
    Image(ImageData),
    Files(Vec<String>),
}

impl ClipboardContent {
    pub fn format(&self) -> ContentFormat {
        match self {
            ClipboardContent::Text(_) => ContentFormat::Text,
            ClipboardContent::Rtf(_) => ContentFormat::Rtf,
            ClipboardContent::Html(_) => ContentFormat::Html,
            ClipboardContent::Image(_) => ContentFormat::Image,
            ClipboardContent::Files(_) => ContentFormat::Files,
        }
    }
}

/// Access to one clipboard. Calls may block, so the host runs them on the
/// blocking pool.
pub trait ClipboardBackend: Send + Sync {
    fn has(&self, format: ContentFormat) -> Result<bool>;
    fn get_text(&self) -> Result<String>;
    fn get_rtf(&self) -> Result<String>;
    fn get_html(&self) -> Result<String>;
    fn get_image(&self) -> Result<ImageData>;
    /// Raw file list entries, possibly `file://` URIs.
    fn get_files(&self) -> Result<Vec<String>>;
    /// Replaces the clipboard content with `contents`.
    fn set(&self, contents: Vec<ClipboardContent>) -> Result<()>;
    fn clear(&self) -> Result<()>;

    /// Hash over every format currently present and its content.
    fn fingerprint(&self) -> Result<u64> {
        let mut hasher = DefaultHasher::new();
        for format in ContentFormat::ALL {
            if !self.has(format)? {
                continue;
            }
            format.hash(&mut hasher);
            // A format can vanish between `has` and the read; hash what is left.
            let _ = match format {
                ContentFormat::Text => self.get_text().map(|text| text.hash(&mut hasher)),
                ContentFormat::Rtf => self.get_rtf().map(|rtf| rtf.hash(&mut hasher)),
                ContentFormat::Html => self.get_html().map(|html| html.hash(&mut hasher)),
                ContentFormat::Image => self.get_image().map(|image| image.hash(&mut hasher)),
                ContentFormat::Files => self.get_files().map(|files| files.hash(&mut hasher)),
            };
        }
        Ok(hasher.finish())
    }
}

/// The clipboard of the machine the host runs on.
#[cfg(target_os = "linux")]
pub fn platform() -> Result<Arc<dyn ClipboardBackend>> {
    Ok(Arc::new(LinuxClipboard::new()?))
}

#[cfg(any(target_os = "windows", target_os = "macos"))]
pub fn platform() -> Result<Arc<dyn ClipboardBackend>> {
    Ok(Arc::new(NativeClipboard::new()?))
}

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
pub fn platform() -> Result<Arc<dyn ClipboardBackend>> {
    tracing::warn!("No native clipboard backend for this platform, using in-memory clipboard");
    Ok(Arc::new(MemoryClipboard::new()))
}
