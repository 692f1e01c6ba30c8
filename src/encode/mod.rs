//! Capture sinks and delivery transcoding.

mod ffmpeg;
mod sink;
mod transcode;

pub use ffmpeg::{FfmpegCaptureSink, is_ffmpeg_on_path};
pub use sink::{CaptureSink, Container, EncodedVideo, InMemorySink, SinkConfig};
pub use transcode::{FfmpegTranscoder, Transcoder};
