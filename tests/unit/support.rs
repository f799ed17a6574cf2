//! Fixture helpers shared by unit tests.

use std::path::{Path, PathBuf};

/// Fresh, empty scratch directory below `target/`.
pub(crate) fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("layermix-unit").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a solid-color straight-alpha PNG.
pub(crate) fn write_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// Write a PNG where only pixel `(x, y)` is set; everything else is transparent.
pub(crate) fn write_png_dot(path: &Path, width: u32, height: u32, x: u32, y: u32, rgba: [u8; 4]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut img = image::RgbaImage::new(width, height);
    img.put_pixel(x, y, image::Rgba(rgba));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// Write a solid-color JPEG.
pub(crate) fn write_jpeg(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
    img.save_with_format(path, image::ImageFormat::Jpeg).unwrap();
}

/// Write a PNG with the half-open rectangle `[x0, x1) x [y0, y1)` set; the rest is transparent.
pub(crate) fn write_png_rect(
    path: &Path,
    (width, height): (u32, u32),
    (x0, y0, x1, y1): (u32, u32, u32, u32),
    rgba: [u8; 4],
) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
            image::Rgba(rgba)
        } else {
            image::Rgba([0, 0, 0, 0])
        }
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}
