use crate::assets::decode::{LayerImage, decode_layer};
use crate::combine::product::Combination;
use crate::config::settings::{RenderSettings, SizePolicy};
use crate::foundation::core::Raster;
use crate::foundation::error::{LayermixError, LayermixResult};
use crate::foundation::math::mul_div255_u8;

/// Premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Premultiplied source-over: `src + dst * (1 - src.a)`.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
            }
            out
        }
    }
}

/// Composite equal-length premultiplied RGBA8 buffers in place.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> LayermixResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(LayermixError::Other(anyhow::anyhow!(
            "over_in_place expects equal-length rgba8 buffers"
        )));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Draw `layer` over `canvas` anchored at the origin, compositing only the overlap.
pub fn over_at_origin(canvas: &mut Raster, layer: &LayerImage) {
    let w = canvas.width.min(layer.width) as usize;
    let h = canvas.height.min(layer.height) as usize;
    let dst_stride = canvas.width as usize * 4;
    let src_stride = layer.width as usize * 4;

    for y in 0..h {
        let d = &mut canvas.data[y * dst_stride..y * dst_stride + w * 4];
        let s = &layer.rgba8_premul[y * src_stride..y * src_stride + w * 4];
        for (dp, sp) in d.chunks_exact_mut(4).zip(s.chunks_exact(4)) {
            let out = over([dp[0], dp[1], dp[2], dp[3]], [sp[0], sp[1], sp[2], sp[3]]);
            dp.copy_from_slice(&out);
        }
    }
}

/// Decode every layer of `combo` in order and composite it onto a transparent canvas.
///
/// Layers are drawn strictly bottom to top. A layer whose size differs from the canvas
/// fails the combination under [`SizePolicy::Reject`] and is clipped under
/// [`SizePolicy::Clip`].
pub fn compose(combo: &Combination, settings: &RenderSettings) -> LayermixResult<Raster> {
    let mut canvas = Raster::transparent(settings.canvas)?;

    for choice in combo.layers() {
        let layer = decode_layer(choice.category(), choice.path())?;
        let matches = layer.width == canvas.width && layer.height == canvas.height;

        if matches {
            over_in_place(&mut canvas.data, &layer.rgba8_premul)?;
        } else {
            match settings.size_policy {
                SizePolicy::Reject => {
                    return Err(LayermixError::decode(
                        choice.category(),
                        choice.path(),
                        format!(
                            "layer is {}x{} but the canvas is {}",
                            layer.width, layer.height, settings.canvas
                        ),
                    ));
                }
                SizePolicy::Clip => over_at_origin(&mut canvas, &layer),
            }
        }
    }

    Ok(canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
