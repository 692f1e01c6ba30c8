//! Stage 2: short-form video synthesis.
//!
//! A fixed 360-frame pan/zoom animation over the enhanced still, captured
//! through ffmpeg into a WebM intermediate and transcoded to a faststart MP4.

mod frame;
mod job;
mod spec;
mod text;

pub use frame::{FrameRenderer, FrameState};
pub use job::{JobState, VideoJob};
pub use spec::{SHORT_FORM_CANVAS, SHORT_FORM_DURATION_MS, SHORT_FORM_FPS, VideoJobSpec};
pub use text::CaptionFont;

use crate::caption::StyleTag;
use crate::encode::{EncodedVideo, FfmpegCaptureSink, FfmpegTranscoder};
use crate::foundation::error::StillreelResult;
use crate::raster::RasterImage;
use tracing::instrument;

/// Synthesize the standard short-form clip for an enhanced raster.
///
/// Renders the fixed 1080x1920/30fps/12s profile, capturing through the
/// system ffmpeg and transcoding to a faststart MP4. A system caption font
/// is used when one can be found; otherwise the deterministic block-glyph
/// fallback renders the overlay text.
#[instrument(skip(raster, caption), fields(src_w = raster.width, src_h = raster.height))]
pub fn synthesize_video(
    raster: &RasterImage,
    caption: &str,
    style: StyleTag,
    brand: Option<&str>,
) -> StillreelResult<EncodedVideo> {
    let spec = VideoJobSpec::portrait_short(style, brand);
    let font = CaptionFont::discover();
    let mut job = VideoJob::new(raster, caption, spec, font)?;
    let mut sink = FfmpegCaptureSink::new();
    let mut transcoder = FfmpegTranscoder::new();
    job.run(&mut sink, &mut transcoder)
}
