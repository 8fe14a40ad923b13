use super::{ClipboardBackend, ClipboardContent, ContentFormat, ImageData};
use crate::{ClipboardError, Result};
use std::sync::{Mutex, MutexGuard};

/// Clipboard that lives only inside the host process.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Vec<ClipboardContent>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> Result<MutexGuard<'_, Vec<ClipboardContent>>> {
        self.contents
            .lock()
            .map_err(|err| ClipboardError::Backend(err.to_string()))
    }

    fn find<T>(
        &self,
        format: ContentFormat,
        pick: impl Fn(&ClipboardContent) -> Option<T>,
    ) -> Result<T> {
        self.contents()?
            .iter()
            .find_map(pick)
            .ok_or(ClipboardError::Empty(format))
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn has(&self, format: ContentFormat) -> Result<bool> {
        Ok(self.contents()?.iter().any(|content| content.format() == format))
    }

    fn get_text(&self) -> Result<String> {
        self.find(ContentFormat::Text, |content| match content {
            ClipboardContent::Text(text) => Some(text.clone()),
            _ => None,
        })
    }

    fn get_rtf(&self) -> Result<String> {
        self.find(ContentFormat::Rtf, |content| match content {
            ClipboardContent::Rtf(rtf) => Some(rtf.clone()),
            _ => None,
        })
    }

    fn get_html(&self) -> Result<String> {
        self.find(ContentFormat::Html, |content| match content {
            ClipboardContent::Html(html) => Some(html.clone()),
            _ => None,
        })
    }

    fn get_image(&self) -> Result<ImageData> {
        self.find(ContentFormat::Image, |content| match content {
            ClipboardContent::Image(image) => Some(image.clone()),
            _ => None,
        })
    }

    fn get_files(&self) -> Result<Vec<String>> {
        self.find(ContentFormat::Files, |content| match content {
            ClipboardContent::Files(files) => Some(files.clone()),
            _ => None,
        })
    }

    fn set(&self, contents: Vec<ClipboardContent>) -> Result<()> {
        *self.contents()? = contents;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.contents()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let clipboard = MemoryClipboard::new();
        for format in ContentFormat::ALL {
            assert!(!clipboard.has(format).unwrap());
        }
        assert!(matches!(
            clipboard.get_text(),
            Err(ClipboardError::Empty(ContentFormat::Text))
        ));
    }

    #[test]
    fn set_replaces_everything() {
        let clipboard = MemoryClipboard::new();
        clipboard
            .set(vec![
                ClipboardContent::Text("Hello, world!".into()),
                ClipboardContent::Html("<h1>Hello, world!</h1>".into()),
            ])
            .unwrap();
        assert!(clipboard.has(ContentFormat::Text).unwrap());
        assert!(clipboard.has(ContentFormat::Html).unwrap());
        assert_eq!(clipboard.get_html().unwrap(), "<h1>Hello, world!</h1>");

        clipboard
            .set(vec![ClipboardContent::Files(vec!["/tmp/a".into()])])
            .unwrap();
        assert!(!clipboard.has(ContentFormat::Text).unwrap());
        assert!(!clipboard.has(ContentFormat::Html).unwrap());
        assert_eq!(clipboard.get_files().unwrap(), vec!["/tmp/a".to_string()]);
    }

    #[test]
    fn clear_empties_all_formats() {
        let clipboard = MemoryClipboard::new();
        clipboard
            .set(vec![
                ClipboardContent::Rtf("{\\rtf1 hi}".into()),
                ClipboardContent::Image(ImageData { bytes: vec![1, 2, 3] }),
            ])
            .unwrap();
        clipboard.clear().unwrap();
        assert!(!clipboard.has(ContentFormat::Rtf).unwrap());
        assert!(!clipboard.has(ContentFormat::Image).unwrap());
    }
}
