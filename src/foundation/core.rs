use crate::foundation::error::{StillreelError, StillreelResult};

/// Absolute 0-based frame index in job timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> StillreelResult<Self> {
        if num == 0 || den == 0 {
            return Err(StillreelError::resource("Fps num and den must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Number of whole frames covered by `duration_ms`, truncated.
    pub fn frames_for_duration_ms(self, duration_ms: u64) -> u64 {
        duration_ms * u64::from(self.num) / (1000 * u64::from(self.den))
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Byte length of one RGBA8 frame at these dimensions.
    pub fn frame_bytes(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}
