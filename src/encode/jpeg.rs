use crate::foundation::core::Raster;
use crate::foundation::error::{LayermixError, LayermixResult};
use crate::foundation::math::mul_div255_u16;

/// Background the premultiplied canvas is flattened over before JPEG encoding.
pub const FLATTEN_BACKGROUND_RGB: [u8; 3] = [0, 0, 0];

/// Encode a premultiplied raster as baseline JPEG at `quality` (1..=100).
pub fn encode_jpeg(raster: &Raster, quality: u8) -> LayermixResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(LayermixError::encode(format!(
            "jpeg quality must be in 1..=100, got {quality}"
        )));
    }

    let mut rgb = vec![0u8; raster.data.len() / 4 * 3];
    flatten_premul_over_bg_to_rgb8(&mut rgb, &raster.data, FLATTEN_BACKGROUND_RGB)?;

    let mut out = Vec::new();
    {
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
        encoder
            .encode(
                &rgb,
                raster.width,
                raster.height,
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| {
                LayermixError::encode(format!(
                    "jpeg encode {}x{}: {e}",
                    raster.width, raster.height
                ))
            })?;
    }
    Ok(out)
}

fn flatten_premul_over_bg_to_rgb8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgb: [u8; 3],
) -> LayermixResult<()> {
    if !src_premul.len().is_multiple_of(4) || dst.len() != src_premul.len() / 4 * 3 {
        return Err(LayermixError::encode(
            "flatten expects an rgba8 source and a matching rgb8 destination",
        ));
    }

    for (d, s) in dst.chunks_exact_mut(3).zip(src_premul.chunks_exact(4)) {
        let inv = 255u16 - u16::from(s[3]);
        for i in 0..3 {
            let v = u16::from(s[i]) + mul_div255_u16(u16::from(bg_rgb[i]), inv);
            d[i] = v.min(255) as u8;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/jpeg.rs"]
mod tests;
