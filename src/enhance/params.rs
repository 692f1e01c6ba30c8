use serde::{Deserialize, Serialize};

const MIN_SCALE: u32 = 1;
const MAX_SCALE: u32 = 8;
const COLOR_RANGE: (f32, f32) = (0.5, 2.0);
const SHARPEN_RANGE: (f32, f32) = (0.0, 1.0);

/// Numeric controls for the still-image enhancement pass.
///
/// Out-of-range values are clamped when the params are used, never rejected.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnhancementParams {
    /// Integer upscale factor (clamped to 1..=8, typically 2-4).
    pub scale: u32,
    /// Luminance multiplier (clamped to 0.5..=2.0).
    pub brightness: f32,
    /// Chroma multiplier around per-pixel gray (clamped to 0.5..=2.0).
    pub saturation: f32,
    /// Unsharp intensity (clamped to 0.0..=1.0; 0 disables the pass).
    pub sharpen: f32,
}

impl Default for EnhancementParams {
    fn default() -> Self {
        Self {
            scale: 2,
            brightness: 1.0,
            saturation: 1.0,
            sharpen: 0.0,
        }
    }
}

impl EnhancementParams {
    /// Return a copy with every field forced into its sane range.
    ///
    /// Non-finite multipliers fall back to the neutral value for that field.
    pub fn clamped(self) -> Self {
        Self {
            scale: self.scale.clamp(MIN_SCALE, MAX_SCALE),
            brightness: clamp_or(self.brightness, COLOR_RANGE, 1.0),
            saturation: clamp_or(self.saturation, COLOR_RANGE, 1.0),
            sharpen: clamp_or(self.sharpen, SHARPEN_RANGE, 0.0),
        }
    }
}

fn clamp_or(v: f32, (lo, hi): (f32, f32), neutral: f32) -> f32 {
    if v.is_finite() { v.clamp(lo, hi) } else { neutral }
}
