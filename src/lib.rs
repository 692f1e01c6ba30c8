//! Stillreel turns a product photo into two deliverables: an enhanced still
//! and a short-form vertical video.
//!
//! The pipeline has two stages, consumed in sequence per source image:
//!
//! - [`enhance`] upscales, color-adjusts and optionally sharpens a raster,
//!   returning the enhanced pixels plus a PNG payload.
//! - [`synthesize_video`] renders a fixed 360-frame pan/zoom animation over
//!   the enhanced raster with a caption overlay, captures it through ffmpeg
//!   into a WebM intermediate and transcodes to a faststart MP4.
//!
//! Label detection and caption templating are host collaborators behind the
//! [`caption::LabelDetector`] trait and [`caption::compose_caption`]; the
//! pipeline itself never depends on a model.
#![forbid(unsafe_code)]

mod foundation;
mod raster;

pub mod caption;
pub mod encode;
pub mod enhance;
pub mod video;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex};
pub use crate::foundation::error::{StillreelError, StillreelResult};
pub use crate::raster::RasterImage;

pub use crate::caption::{LabelDetector, NullDetector, StyleTag, caption_labels, compose_caption};
pub use crate::encode::{
    CaptureSink, Container, EncodedVideo, FfmpegCaptureSink, FfmpegTranscoder, InMemorySink,
    SinkConfig, Transcoder,
};
pub use crate::enhance::{EnhancedAsset, EnhancementParams, enhance};
pub use crate::video::{CaptionFont, JobState, VideoJob, VideoJobSpec, synthesize_video};
