use crate::foundation::error::{StillreelError, StillreelResult};
use crate::foundation::math::lerp_u8;
use image::{DynamicImage, RgbaImage};
use std::io::Cursor;

/// A straight-alpha RGBA8 raster, row-major, top-to-bottom.
///
/// Every transform in the pipeline produces a new `RasterImage` rather than
/// mutating in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed (`width * height * 4`).
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Create a raster from an existing RGBA8 buffer.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> StillreelResult<Self> {
        if width == 0 || height == 0 {
            return Err(StillreelError::decode("raster dimensions must be non-zero"));
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(StillreelError::decode(format!(
                "raster buffer is {} bytes, expected {expected} for {width}x{height} RGBA8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create an opaque raster filled with a single color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> StillreelResult<Self> {
        let mut data = vec![0u8; width as usize * height as usize * 4];
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
        Self::new(width, height, data)
    }

    /// Decode a raster from encoded image bytes (JPEG, PNG, WebP, ...).
    pub fn decode(bytes: &[u8]) -> StillreelResult<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| StillreelError::decode(format!("failed to decode source image: {e}")))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::new(width, height, rgba.into_raw())
    }

    /// Encode the raster as PNG bytes.
    pub fn encode_png(&self) -> StillreelResult<Vec<u8>> {
        let img = self.to_rgba_image()?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| {
                StillreelError::render_target(format!("failed to encode still image: {e}"))
            })?;
        Ok(bytes)
    }

    pub(crate) fn to_rgba_image(&self) -> StillreelResult<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            StillreelError::decode("raster buffer does not match its dimensions")
        })
    }

    pub(crate) fn from_rgba_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Read the pixel at `(x, y)`; out-of-bounds reads return transparent black.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Bilinear sample at fractional pixel coordinates, edge-clamped.
    pub(crate) fn sample_bilinear(&self, fx: f32, fy: f32) -> [u8; 4] {
        let x0 = fx.floor() as i64;
        let y0 = fy.floor() as i64;
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let cx = |x: i64| x.clamp(0, i64::from(self.width) - 1) as u32;
        let cy = |y: i64| y.clamp(0, i64::from(self.height) - 1) as u32;

        let p00 = self.pixel(cx(x0), cy(y0));
        let p10 = self.pixel(cx(x0 + 1), cy(y0));
        let p01 = self.pixel(cx(x0), cy(y0 + 1));
        let p11 = self.pixel(cx(x0 + 1), cy(y0 + 1));

        let mut out = [0u8; 4];
        for ch in 0..4 {
            let top = lerp_u8(p00[ch], p10[ch], tx);
            let bot = lerp_u8(p01[ch], p11[ch], tx);
            out[ch] = lerp_u8(top, bot, ty);
        }
        out
    }
}
