use crate::foundation::error::{StillreelError, StillreelResult};
use crate::raster::RasterImage;
use image::imageops::{self, FilterType};
use rayon::prelude::*;

/// Upscale `source` by an integer factor using Catmull-Rom interpolation.
pub(crate) fn upscale(source: &RasterImage, scale: u32) -> StillreelResult<RasterImage> {
    let out_w = source
        .width
        .checked_mul(scale)
        .ok_or_else(|| StillreelError::render_target("output width overflows u32"))?;
    let out_h = source
        .height
        .checked_mul(scale)
        .ok_or_else(|| StillreelError::render_target("output height overflows u32"))?;

    let out_bytes = (out_w as usize)
        .checked_mul(out_h as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| StillreelError::render_target("output surface byte size overflows"))?;
    // An unsatisfiable surface must fail with RenderTarget, not abort
    // inside the resampler.
    let mut probe: Vec<u8> = Vec::new();
    probe.try_reserve_exact(out_bytes).map_err(|_| {
        StillreelError::render_target(format!(
            "cannot allocate {out_w}x{out_h} output surface ({out_bytes} bytes)"
        ))
    })?;
    drop(probe);

    if out_w == source.width && out_h == source.height {
        return Ok(source.clone());
    }

    let src = source.to_rgba_image()?;
    let resized = imageops::resize(&src, out_w, out_h, FilterType::CatmullRom);
    Ok(RasterImage::from_rgba_image(resized))
}

/// Apply the brightness/saturation transform in place.
///
/// Per pixel: each channel moves to `gray + (c - gray) * saturation` (gray is
/// Rec. 601 luma), then scales by `brightness`, clamped to [0, 255]. Alpha is
/// untouched. A multiplier of exactly 1.0 skips its half of the transform so
/// the identity is byte-exact.
pub(crate) fn apply_color(img: &mut RasterImage, brightness: f32, saturation: f32) {
    let apply_sat = saturation != 1.0;
    let apply_bri = brightness != 1.0;
    if !apply_sat && !apply_bri {
        return;
    }

    let row_bytes = img.width as usize * 4;
    img.data.par_chunks_exact_mut(row_bytes).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let mut r = f32::from(px[0]);
            let mut g = f32::from(px[1]);
            let mut b = f32::from(px[2]);

            if apply_sat {
                let gray = 0.299 * r + 0.587 * g + 0.114 * b;
                r = gray + (r - gray) * saturation;
                g = gray + (g - gray) * saturation;
                b = gray + (b - gray) * saturation;
            }
            if apply_bri {
                r *= brightness;
                g *= brightness;
                b *= brightness;
            }

            px[0] = r.round().clamp(0.0, 255.0) as u8;
            px[1] = g.round().clamp(0.0, 255.0) as u8;
            px[2] = b.round().clamp(0.0, 255.0) as u8;
        }
    });
}
