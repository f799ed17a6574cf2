use std::path::Path;

use crate::foundation::error::{LayermixError, LayermixResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Raster formats accepted for layer files, selected by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerFormat {
    /// `.png`
    Png,
    /// `.jpg` / `.jpeg`
    Jpeg,
}

impl LayerFormat {
    /// Detect the format from the extension (ASCII case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("png") {
            Some(Self::Png)
        } else if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Decoded layer in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
}

/// Decode encoded bytes with an explicit codec and convert to premultiplied RGBA8.
pub fn decode_layer_bytes(format: LayerFormat, bytes: &[u8]) -> image::ImageResult<LayerImage> {
    let dyn_img = image::load_from_memory_with_format(bytes, format.image_format())?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(LayerImage {
        width,
        height,
        rgba8_premul,
    })
}

/// Read and decode one layer file belonging to `category`.
///
/// An unrecognized extension, an unreadable file, or corrupt data is a
/// [`LayermixError::Decode`] naming the category and path.
pub fn decode_layer(category: &str, path: &Path) -> LayermixResult<LayerImage> {
    let format = LayerFormat::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_else(|| "(none)".to_string());
        LayermixError::decode(category, path, format!("file extension not supported: {ext}"))
    })?;

    let bytes = std::fs::read(path)
        .map_err(|e| LayermixError::decode(category, path, format!("read layer: {e}")))?;

    decode_layer_bytes(format, &bytes)
        .map_err(|e| LayermixError::decode(category, path, format!("decode {format:?}: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
