//! Moving clipboard images between the clipboard and the filesystem.
//!
//! Clipboard images are handed to clients as files: the bytes are written
//! once under a content-hash name so repeated reads of the same image reuse
//! the same path.

use crate::clipboard::ImageData;
use crate::Result;
use clipboard_x_protocol::ReadImage;
use image::{ImageFormat, ImageReader};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(PNG_SIGNATURE)
}

/// Width and height in pixels, read from the image header.
pub fn dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

/// Writes `image` as `<dir>/<hash>.png`, creating `dir` when needed.
pub fn save_png(image: &ImageData, dir: &Path) -> Result<ReadImage> {
    fs::create_dir_all(dir)?;

    let (width, height) = dimensions(&image.bytes)?;

    let mut hasher = DefaultHasher::new();
    image.bytes.hash(&mut hasher);
    let hash = hasher.finish();

    let path = dir.join(format!("{hash}.png"));

    if path.exists() {
        debug!("Reusing saved clipboard image {}", path.display());
    } else {
        let png = if is_png(&image.bytes) {
            image.bytes.clone()
        } else {
            to_png(&image.bytes)?
        };
        // Readers only ever see a missing file or a complete one.
        let partial = dir.join(format!("{hash}.{}.part", uuid::Uuid::new_v4()));
        fs::write(&partial, &png)?;
        if let Err(e) = fs::rename(&partial, &path) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }
    }

    let size = fs::metadata(&path)?.len();
    debug!("Saved clipboard image to {} ({} bytes)", path.display(), size);

    Ok(ReadImage {
        path,
        size,
        width,
        height,
    })
}

/// Loads an image file for the clipboard, re-encoding it as PNG if needed.
pub fn load_png(path: &Path) -> Result<ImageData> {
    let bytes = fs::read(path)?;
    if is_png(&bytes) {
        return Ok(ImageData { bytes });
    }

    Ok(ImageData {
        bytes: to_png(&bytes)?,
    })
}

fn to_png(bytes: &[u8]) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(bytes)?;
    let mut png = Vec::new();
    decoded.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .unwrap();
    png
}
