use super::{ClipboardBackend, ClipboardContent, ContentFormat, ImageData};
use crate::{ClipboardError, Result};
use std::collections::HashSet;
use std::io::Read;
use tracing::debug;
use url::Url;

use wl_clipboard_rs::{
    copy::{self, copy_multi, MimeSource, MimeType as CopyMimeType, Options, Source},
    paste::{self, get_contents, get_mime_types, ClipboardType, MimeType, Seat},
};

const RTF_MIME_TYPES: &[&str] = &["text/rtf", "application/rtf"];
const HTML_MIME_TYPE: &str = "text/html";
const PNG_MIME_TYPE: &str = "image/png";
const URI_LIST_MIME_TYPE: &str = "text/uri-list";

/// Wayland clipboard through the wlr data-control protocol.
pub struct LinuxClipboard;

impl LinuxClipboard {
    pub fn new() -> Result<Self> {
        Ok(Self)
    }

    fn mime_types(&self) -> Result<HashSet<String>> {
        match get_mime_types(ClipboardType::Regular, Seat::Unspecified) {
            Ok(types) => Ok(types),
            Err(paste::Error::ClipboardEmpty) | Err(paste::Error::NoSeats) => Ok(HashSet::new()),
            Err(e) => Err(ClipboardError::Backend(e.to_string())),
        }
    }

    fn read(&self, mime_type: MimeType) -> Result<Vec<u8>> {
        match get_contents(ClipboardType::Regular, Seat::Unspecified, mime_type) {
            Ok((mut data, _)) => {
                let mut contents = Vec::new();
                data.read_to_end(&mut contents)?;
                Ok(contents)
            }
            Err(e) => {
                debug!("Failed to read clipboard via wl-clipboard-rs: {}", e);
                Err(ClipboardError::Backend(e.to_string()))
            }
        }
    }

    fn read_string(&self, mime_type: MimeType) -> Result<String> {
        String::from_utf8(self.read(mime_type)?)
            .map_err(|e| ClipboardError::Backend(e.to_string()))
    }

    fn offered(&self, format: ContentFormat) -> Result<Option<String>> {
        let types = self.mime_types()?;
        let found = match format {
            ContentFormat::Text => types.iter().find(|mime| is_text_mime_type(mime)),
            ContentFormat::Rtf => types
                .iter()
                .find(|mime| RTF_MIME_TYPES.contains(&mime.as_str())),
            ContentFormat::Html => types.iter().find(|mime| *mime == HTML_MIME_TYPE),
            ContentFormat::Image => types.iter().find(|mime| *mime == PNG_MIME_TYPE),
            ContentFormat::Files => types.iter().find(|mime| *mime == URI_LIST_MIME_TYPE),
        };
        Ok(found.cloned())
    }

    fn read_format(&self, format: ContentFormat) -> Result<Vec<u8>> {
        let mime = self.offered(format)?.ok_or(ClipboardError::Empty(format))?;
        self.read(MimeType::Specific(&mime))
    }
}

fn is_text_mime_type(mime: &str) -> bool {
    mime.starts_with("text/plain") || matches!(mime, "UTF8_STRING" | "STRING" | "TEXT")
}

fn uri_list(paths: &[String]) -> String {
    paths
        .iter()
        .map(|path| match Url::from_file_path(path) {
            Ok(url) => url.to_string(),
            Err(()) => path.clone(),
        })
        .collect::<Vec<_>>()
        .join("\r\n")
}

fn bytes_source(bytes: Vec<u8>, mime_type: CopyMimeType) -> MimeSource {
    MimeSource {
        source: Source::Bytes(bytes.into_boxed_slice()),
        mime_type,
    }
}

impl ClipboardBackend for LinuxClipboard {
    fn has(&self, format: ContentFormat) -> Result<bool> {
        Ok(self.offered(format)?.is_some())
    }

    fn get_text(&self) -> Result<String> {
        if self.offered(ContentFormat::Text)?.is_none() {
            return Err(ClipboardError::Empty(ContentFormat::Text));
        }
        self.read_string(MimeType::Text)
    }

    fn get_rtf(&self) -> Result<String> {
        String::from_utf8(self.read_format(ContentFormat::Rtf)?)
            .map_err(|e| ClipboardError::Backend(e.to_string()))
    }

    fn get_html(&self) -> Result<String> {
        if self.offered(ContentFormat::Html)?.is_none() {
            return Err(ClipboardError::Empty(ContentFormat::Html));
        }
        self.read_string(MimeType::Specific(HTML_MIME_TYPE))
    }

    fn get_image(&self) -> Result<ImageData> {
        let bytes = self.read_format(ContentFormat::Image)?;
        debug!("Got clipboard image: {} bytes", bytes.len());
        Ok(ImageData { bytes })
    }

    fn get_files(&self) -> Result<Vec<String>> {
        let list = String::from_utf8(self.read_format(ContentFormat::Files)?)
            .map_err(|e| ClipboardError::Backend(e.to_string()))?;
        Ok(list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }

    fn set(&self, contents: Vec<ClipboardContent>) -> Result<()> {
        let sources: Vec<MimeSource> = contents
            .into_iter()
            .map(|content| match content {
                ClipboardContent::Text(text) => bytes_source(text.into_bytes(), CopyMimeType::Text),
                ClipboardContent::Rtf(rtf) => bytes_source(
                    rtf.into_bytes(),
                    CopyMimeType::Specific(RTF_MIME_TYPES[0].to_string()),
                ),
                ClipboardContent::Html(html) => bytes_source(
                    html.into_bytes(),
                    CopyMimeType::Specific(HTML_MIME_TYPE.to_string()),
                ),
                ClipboardContent::Image(image) => bytes_source(
                    image.bytes,
                    CopyMimeType::Specific(PNG_MIME_TYPE.to_string()),
                ),
                ClipboardContent::Files(paths) => bytes_source(
                    uri_list(&paths).into_bytes(),
                    CopyMimeType::Specific(URI_LIST_MIME_TYPE.to_string()),
                ),
            })
            .collect();
        debug!("Offering {} formats on the clipboard", sources.len());
        copy_multi(Options::new(), sources).map_err(|e| ClipboardError::Backend(e.to_string()))
    }

    fn clear(&self) -> Result<()> {
        copy::clear(copy::ClipboardType::Regular, copy::Seat::All)
            .map_err(|e| ClipboardError::Backend(e.to_string()))
    }
}
