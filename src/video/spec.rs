use crate::caption::StyleTag;
use crate::encode::SinkConfig;
use crate::foundation::core::{Canvas, Fps};
use serde::{Deserialize, Serialize};

/// Fixed vertical short-form profile: 1080x1920.
pub const SHORT_FORM_CANVAS: Canvas = Canvas {
    width: 1080,
    height: 1920,
};

/// Fixed capture/delivery frame rate.
pub const SHORT_FORM_FPS: Fps = Fps { num: 30, den: 1 };

/// Fixed clip duration in milliseconds.
pub const SHORT_FORM_DURATION_MS: u64 = 12_000;

/// The full parameter set of one video job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoJobSpec {
    /// Output canvas dimensions.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Clip duration in milliseconds.
    pub duration_ms: u64,
    /// Editorial style; drives the overlay accent color.
    pub style: StyleTag,
    /// Normalized brand hashtag (`#` + alphanumerics), when a brand was given.
    pub brand_tag: Option<String>,
}

impl VideoJobSpec {
    /// The standard short-form profile for a given style and optional brand.
    pub fn portrait_short(style: StyleTag, brand: Option<&str>) -> Self {
        Self {
            canvas: SHORT_FORM_CANVAS,
            fps: SHORT_FORM_FPS,
            duration_ms: SHORT_FORM_DURATION_MS,
            style,
            brand_tag: brand.and_then(brand_hashtag),
        }
    }

    /// Exact frame count of the clip (`duration_ms / 1000 * fps`, truncated).
    pub fn total_frames(&self) -> u64 {
        self.fps.frames_for_duration_ms(self.duration_ms)
    }

    /// Accent color of the caption overlay.
    pub fn accent_rgba(&self) -> [u8; 4] {
        self.style.accent_rgba()
    }

    /// Capture/transcode target derived from this spec.
    pub fn sink_config(&self) -> SinkConfig {
        SinkConfig {
            canvas: self.canvas,
            fps: self.fps,
        }
    }
}

/// Normalize a brand string into hashtag form: strip everything that is not
/// alphanumeric (whitespace included), prefix `#`. `None` when nothing
/// survives the stripping.
pub(crate) fn brand_hashtag(brand: &str) -> Option<String> {
    let cleaned: String = brand.chars().filter(|c| c.is_alphanumeric()).collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(format!("#{cleaned}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_form_profile_runs_exactly_360_frames() {
        let spec = VideoJobSpec::portrait_short(StyleTag::Street, None);
        assert_eq!(spec.total_frames(), 360);
        assert_eq!(spec.canvas.width, 1080);
        assert_eq!(spec.canvas.height, 1920);
        assert_eq!(spec.fps.as_f64(), 30.0);
    }

    #[test]
    fn brand_hashtag_strips_and_prefixes() {
        assert_eq!(brand_hashtag("Atelier"), Some("#Atelier".to_owned()));
        assert_eq!(brand_hashtag("Crate & Vine"), Some("#CrateVine".to_owned()));
        assert_eq!(brand_hashtag("año 2"), Some("#año2".to_owned()));
        assert_eq!(brand_hashtag("!!!"), None);
        assert_eq!(brand_hashtag(""), None);
    }

    #[test]
    fn spec_serde_round_trip() {
        let spec = VideoJobSpec::portrait_short(StyleTag::Luxury, Some("Atelier 9"));
        let json = serde_json::to_string(&spec).unwrap();
        let back: VideoJobSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
        assert_eq!(back.brand_tag.as_deref(), Some("#Atelier9"));
    }
}
