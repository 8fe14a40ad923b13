use super::{ClipboardBackend, ClipboardContent, ContentFormat, ImageData};
use crate::{ClipboardError, Result};
use clipboard_rs::common::RustImage;
use clipboard_rs::{
    Clipboard, ClipboardContent as NativeContent, ClipboardContext, ContentFormat as NativeFormat,
    RustImageData,
};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

type NativeResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// The system clipboard on Windows and macOS through clipboard-rs.
pub struct NativeClipboard {
    ctx: Mutex<ClipboardContext>,
}

impl NativeClipboard {
    pub fn new() -> Result<Self> {
        let ctx = ClipboardContext::new().map_err(|e| backend_error("open clipboard", e))?;
        Ok(Self {
            ctx: Mutex::new(ctx),
        })
    }

    fn ctx(&self) -> Result<MutexGuard<'_, ClipboardContext>> {
        self.ctx
            .lock()
            .map_err(|e| ClipboardError::Backend(format!("clipboard lock poisoned: {}", e)))
    }

    /// Reads `format` after checking it is there, so an absent format reports
    /// [`ClipboardError::Empty`] rather than a platform error.
    fn read<T>(
        &self,
        format: ContentFormat,
        get: impl FnOnce(&ClipboardContext) -> NativeResult<T>,
    ) -> Result<T> {
        let ctx = self.ctx()?;
        if !ctx.has(native_format(format)) {
            return Err(ClipboardError::Empty(format));
        }
        get(&ctx).map_err(|e| backend_error("read clipboard", e))
    }
}

fn backend_error(context: &str, e: impl std::fmt::Display) -> ClipboardError {
    ClipboardError::Backend(format!("{}: {}", context, e))
}

fn native_format(format: ContentFormat) -> NativeFormat {
    match format {
        ContentFormat::Text => NativeFormat::Text,
        ContentFormat::Rtf => NativeFormat::Rtf,
        ContentFormat::Html => NativeFormat::Html,
        ContentFormat::Image => NativeFormat::Image,
        ContentFormat::Files => NativeFormat::Files,
    }
}

fn native_content(content: ClipboardContent) -> Result<NativeContent> {
    Ok(match content {
        ClipboardContent::Text(text) => NativeContent::Text(text),
        ClipboardContent::Rtf(rtf) => NativeContent::Rtf(rtf),
        ClipboardContent::Html(html) => NativeContent::Html(html),
        ClipboardContent::Image(image) => NativeContent::Image(
            RustImageData::from_bytes(&image.bytes)
                .map_err(|e| backend_error("decode image", e))?,
        ),
        ClipboardContent::Files(files) => NativeContent::Files(files),
    })
}

impl ClipboardBackend for NativeClipboard {
    fn has(&self, format: ContentFormat) -> Result<bool> {
        Ok(self.ctx()?.has(native_format(format)))
    }

    fn get_text(&self) -> Result<String> {
        self.read(ContentFormat::Text, |ctx| ctx.get_text())
    }

    fn get_rtf(&self) -> Result<String> {
        self.read(ContentFormat::Rtf, |ctx| ctx.get_rich_text())
    }

    fn get_html(&self) -> Result<String> {
        self.read(ContentFormat::Html, |ctx| ctx.get_html())
    }

    fn get_image(&self) -> Result<ImageData> {
        let image = self.read(ContentFormat::Image, |ctx| ctx.get_image())?;
        let png = image
            .to_png()
            .map_err(|e| backend_error("encode clipboard image", e))?;
        Ok(ImageData {
            bytes: png.get_bytes().to_vec(),
        })
    }

    fn get_files(&self) -> Result<Vec<String>> {
        self.read(ContentFormat::Files, |ctx| ctx.get_files())
    }

    fn set(&self, contents: Vec<ClipboardContent>) -> Result<()> {
        let contents = contents
            .into_iter()
            .map(native_content)
            .collect::<Result<Vec<_>>>()?;
        debug!("Writing {} formats to the system clipboard", contents.len());
        self.ctx()?
            .set(contents)
            .map_err(|e| backend_error("set clipboard", e))
    }

    fn clear(&self) -> Result<()> {
        self.ctx()?
            .clear()
            .map_err(|e| backend_error("clear clipboard", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::sample_png;

    #[test]
    fn every_format_maps_to_its_native_counterpart() {
        assert!(matches!(native_format(ContentFormat::Text), NativeFormat::Text));
        assert!(matches!(native_format(ContentFormat::Rtf), NativeFormat::Rtf));
        assert!(matches!(native_format(ContentFormat::Html), NativeFormat::Html));
        assert!(matches!(native_format(ContentFormat::Image), NativeFormat::Image));
        assert!(matches!(native_format(ContentFormat::Files), NativeFormat::Files));
    }

    #[test]
    fn contents_convert_without_loss() {
        assert!(matches!(
            native_content(ClipboardContent::Rtf("{\\rtf1 a}".into())).unwrap(),
            NativeContent::Rtf(rtf) if rtf == "{\\rtf1 a}"
        ));
        assert!(matches!(
            native_content(ClipboardContent::Files(vec!["C:\\a.txt".into()])).unwrap(),
            NativeContent::Files(files) if files == vec!["C:\\a.txt".to_string()]
        ));

        let image = native_content(ClipboardContent::Image(ImageData {
            bytes: sample_png(5, 3),
        }))
        .unwrap();
        match image {
            NativeContent::Image(image) => assert_eq!(image.get_size(), (5, 3)),
            _ => panic!("image content converted to another format"),
        }
    }

    #[test]
    fn undecodable_image_is_rejected() {
        let result = native_content(ClipboardContent::Image(ImageData {
            bytes: b"not an image".to_vec(),
        }));
        assert!(matches!(result, Err(ClipboardError::Backend(_))));
    }
}
