//! Downloaded picture normalization.
//!
//! Every image that ends up in a deck is decoded, scaled down to the configured
//! maximum width and re-encoded as PNG so the package carries one format.

use std::io::Cursor;

use anyhow::{Context, Result};
use bytes::Bytes;
use image::imageops::FilterType;
use image::ImageFormat;

/// Default maximum width in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 800;

/// Decode `data`, shrink it to at most `max_width` pixels wide (aspect ratio
/// kept) and encode it as PNG.
pub fn normalize_image(data: &[u8], max_width: u32) -> Result<Bytes> {
    let img = image::load_from_memory(data).context("Failed to decode image data")?;

    let img = if img.width() > max_width {
        img.resize(max_width, u32::MAX, FilterType::Lanczos3)
    } else {
        img
    };

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .context("Failed to encode image as PNG")?;
    Ok(Bytes::from(buf.into_inner()))
}

/// Download `url` and normalize the picture.
pub async fn download_image(client: &reqwest::Client, url: &str, max_width: u32) -> Result<Bytes> {
    let data = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("image download failed: {url}"))?
        .error_for_status()
        .with_context(|| format!("image download returned error: {url}"))?
        .bytes()
        .await
        .with_context(|| format!("failed to read image body: {url}"))?;

    normalize_image(&data, max_width)
}

#[cfg(test)]
pub(crate) fn test_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_images_are_scaled_down() {
        let png = normalize_image(&test_png(1600, 400), DEFAULT_MAX_WIDTH).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.width(), 800);
        assert_eq!(img.height(), 200);
    }

    #[test]
    fn small_images_keep_their_size() {
        let png = normalize_image(&test_png(300, 100), DEFAULT_MAX_WIDTH).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (300, 100));
        assert_eq!(
            image::guess_format(&png).unwrap(),
            ImageFormat::Png
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(normalize_image(b"not an image", DEFAULT_MAX_WIDTH).is_err());
    }
}
