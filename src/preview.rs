use iced::widget::image::Handle;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Decoded category preview, ready to hand to iced
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Thumbnail {
    pub fn into_handle(self) -> Handle {
        Handle::from_rgba(self.width, self.height, self.pixels)
    }
}

/// Decode `path` and scale it so its longest edge is at most `max_size`
pub fn generate_thumbnail(path: &Path, max_size: u32) -> Result<Thumbnail> {
    let img = image::open(path)?;

    let scaled = if img.width() > max_size || img.height() > max_size {
        img.resize(max_size, max_size, FilterType::Triangle)
    } else {
        img
    };

    let rgba = scaled.to_rgba8();
    Ok(Thumbnail {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Generate a thumbnail on a blocking worker thread
pub async fn generate_thumbnail_async(path: PathBuf, max_size: u32) -> std::result::Result<Thumbnail, String> {
    tokio::task::spawn_blocking(move || {
        generate_thumbnail(&path, max_size).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn test_large_image_is_scaled_down() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::from_pixel(400, 100, Rgb([200, 10, 10])).save(&path).unwrap();

        let thumb = generate_thumbnail(&path, 200).unwrap();

        assert_eq!(thumb.width, 200);
        assert_eq!(thumb.height, 50);
        assert_eq!(thumb.pixels.len(), 200 * 50 * 4);
    }

    #[test]
    fn test_small_image_keeps_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.png");
        RgbImage::from_pixel(16, 8, Rgb([0, 0, 0])).save(&path).unwrap();

        let thumb = generate_thumbnail(&path, 256).unwrap();
        assert_eq!((thumb.width, thumb.height), (16, 8));
    }

    #[test]
    fn test_unreadable_image_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        assert!(generate_thumbnail(&path, 256).is_err());
        assert!(generate_thumbnail(&dir.path().join("gone.png"), 256).is_err());
    }
}
