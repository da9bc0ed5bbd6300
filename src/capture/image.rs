//! Background bitmap supplied by the capture layer, and PNG export

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use base64::{Engine as _, engine::general_purpose};
use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::domain::ImageSaveLocation;
use crate::render::image::pixmap_from_image;

const DATA_URI_PREFIX: &str = "data:";

/// A decoded screenshot with both straight RGBA data and a drawable pixmap
#[derive(Clone, Debug)]
pub struct BackgroundImage {
    pub rgba: RgbaImage,
    pub pixmap: Pixmap,
}

impl BackgroundImage {
    /// Wrap already-decoded pixels
    pub fn from_rgba(rgba: RgbaImage) -> anyhow::Result<Self> {
        let pixmap = pixmap_from_image(&rgba).with_context(|| {
            format!("Image has unusable size {}x{}", rgba.width(), rgba.height())
        })?;
        Ok(Self { rgba, pixmap })
    }

    /// Decode an encoded image payload: raw file bytes or a base64 `data:` URI
    pub fn decode(payload: &[u8]) -> anyhow::Result<Self> {
        let bytes = if payload.starts_with(DATA_URI_PREFIX.as_bytes()) {
            decode_data_uri(payload)?
        } else {
            payload.to_vec()
        };
        let rgba = image::load_from_memory(&bytes)
            .context("Failed to decode background image")?
            .to_rgba8();
        log::debug!(
            "Background image decoded: {}x{} pixels",
            rgba.width(),
            rgba.height()
        );
        Self::from_rgba(rgba)
    }

    /// Read and decode an image file
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image file: {}", path.display()))?;
        Self::decode(&bytes)
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}

fn decode_data_uri(payload: &[u8]) -> anyhow::Result<Vec<u8>> {
    let text = std::str::from_utf8(payload).context("data URI is not valid UTF-8")?;
    let (header, data) = text
        .split_once(',')
        .context("data URI has no ',' separator")?;
    if !header.ends_with(";base64") {
        bail!("Only base64 data URIs are supported, got {header:?}");
    }
    general_purpose::STANDARD
        .decode(data.trim())
        .context("data URI payload is not valid base64")
}

/// Encode as PNG bytes
pub fn encode_png(img: &RgbaImage) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_png(&mut buffer, img).context("Failed to encode PNG")?;
    Ok(buffer)
}

/// Encode as a `data:image/png;base64,` URI
pub fn encode_png_data_uri(img: &RgbaImage) -> anyhow::Result<String> {
    let png = encode_png(img)?;
    Ok(format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png)
    ))
}

/// Write a PNG file
pub fn save_png(img: &RgbaImage, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_png(io::BufWriter::new(file), img)
        .with_context(|| format!("Failed to write PNG: {}", path.display()))?;
    Ok(())
}

/// Timestamped file path for an export in the chosen directory
pub fn get_img_path(location: ImageSaveLocation) -> Option<PathBuf> {
    let mut path = match location {
        ImageSaveLocation::Pictures => {
            dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
        }
        ImageSaveLocation::Documents => {
            dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
        }
    }?;
    path.push(export_file_name());
    Some(path)
}

fn export_file_name() -> String {
    chrono::Local::now()
        .format("Snipmark_%Y-%m-%d_%H-%M-%S.png")
        .to_string()
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(4, 3, |x, y| image::Rgba([x as u8 * 60, y as u8 * 80, 7, 255]))
    }

    #[test]
    fn test_decode_png_bytes() {
        let png = encode_png(&sample()).unwrap();
        let bg = BackgroundImage::decode(&png).unwrap();
        assert_eq!((bg.width(), bg.height()), (4, 3));
        assert_eq!(bg.rgba, sample());
    }

    #[test]
    fn test_decode_data_uri() {
        let uri = encode_png_data_uri(&sample()).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        let bg = BackgroundImage::decode(uri.as_bytes()).unwrap();
        assert_eq!(bg.rgba, sample());
    }

    #[test]
    fn test_decode_failures_are_errors() {
        assert!(BackgroundImage::decode(b"not an image").is_err());
        assert!(BackgroundImage::decode(b"data:image/png;base64,@@@").is_err());
        assert!(BackgroundImage::decode(b"data:text/plain,hello").is_err());
        assert!(BackgroundImage::decode(b"data:image/png;base64").is_err());
    }

    #[test]
    fn test_export_file_name_is_timestamped() {
        let name = export_file_name();
        assert!(name.starts_with("Snipmark_"));
        assert!(name.ends_with(".png"));
        // Snipmark_YYYY-MM-DD_HH-MM-SS.png
        assert_eq!(name.len(), "Snipmark_".len() + 19 + ".png".len());
    }

    #[test]
    fn test_save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        save_png(&sample(), &path).unwrap();
        let bg = BackgroundImage::open(&path).unwrap();
        assert_eq!(bg.rgba, sample());
    }
}
