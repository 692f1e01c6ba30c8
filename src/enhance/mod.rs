//! Stage 1: deterministic still-image enhancement.
//!
//! Upscale, brightness/saturation transform, optional unsharp pass, PNG
//! encoding. Enhancements of different source images share no mutable state
//! and may run concurrently.

mod params;
mod resample;
mod sharpen;

pub use params::EnhancementParams;

use crate::foundation::error::StillreelResult;
use crate::raster::RasterImage;
use tracing::{debug, instrument};

/// The result of an enhancement pass. The caller owns it after return.
#[derive(Clone, Debug)]
pub struct EnhancedAsset {
    /// The enhanced raster.
    pub raster: RasterImage,
    /// PNG-encoded bytes of the enhanced raster, ready for download.
    pub png: Vec<u8>,
    /// The scale factor that produced this asset.
    pub scale: u32,
}

/// Enhance a still image: upscale, color transform, optional sharpen, encode.
///
/// Fails with `Decode` when the source is not a usable raster and with
/// `RenderTarget` when the output surface cannot be allocated or encoded.
/// A failure here is fatal to this image only; batch iteration belongs to
/// the caller.
#[instrument(skip(source, params), fields(src_w = source.width, src_h = source.height))]
pub fn enhance(source: &RasterImage, params: &EnhancementParams) -> StillreelResult<EnhancedAsset> {
    let params = params.clamped();

    let mut raster = resample::upscale(source, params.scale)?;
    resample::apply_color(&mut raster, params.brightness, params.saturation);
    if params.sharpen > 0.0 {
        raster = sharpen::sharpen(&raster, params.sharpen);
    }

    let png = raster.encode_png()?;
    debug!(
        out_w = raster.width,
        out_h = raster.height,
        png_bytes = png.len(),
        "still enhancement complete"
    );

    Ok(EnhancedAsset {
        raster,
        png,
        scale: params.scale,
    })
}
