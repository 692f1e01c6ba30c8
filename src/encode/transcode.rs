use crate::encode::ffmpeg::{TempFileGuard, is_ffmpeg_on_path, temp_media_path};
use crate::encode::sink::{Container, EncodedVideo, SinkConfig};
use crate::foundation::error::{StillreelError, StillreelResult};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Re-encodes an intermediate capture into the delivery container.
pub trait Transcoder: Send {
    /// Transcode `intermediate` to the delivery profile in `target`.
    ///
    /// Implementations release every temporary buffer and file they acquire,
    /// whether or not the transcode succeeds.
    fn transcode(
        &mut self,
        intermediate: &EncodedVideo,
        target: SinkConfig,
    ) -> StillreelResult<EncodedVideo>;
}

/// ffmpeg argument list for the WebM -> MP4 delivery transcode: fixed output
/// rate, scale-to-fit then pad to the exact target with black letterboxing,
/// faststart metadata. Split out so the command shape is testable.
pub(crate) fn transcode_args(input: &Path, target: SinkConfig, out_path: &Path) -> Vec<String> {
    let w = target.canvas.width;
    let h = target.canvas.height;
    let filter = format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,\
         pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:color=black,setsar=1"
    );
    vec![
        "-y".to_owned(),
        "-loglevel".to_owned(),
        "error".to_owned(),
        "-i".to_owned(),
        input.to_string_lossy().into_owned(),
        "-vf".to_owned(),
        filter,
        "-r".to_owned(),
        format!("{}/{}", target.fps.num, target.fps.den),
        "-an".to_owned(),
        "-c:v".to_owned(),
        "libx264".to_owned(),
        "-preset".to_owned(),
        "medium".to_owned(),
        "-crf".to_owned(),
        "23".to_owned(),
        "-pix_fmt".to_owned(),
        "yuv420p".to_owned(),
        "-movflags".to_owned(),
        "+faststart".to_owned(),
        out_path.to_string_lossy().into_owned(),
    ]
}

/// Transcoder backed by the system `ffmpeg`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FfmpegTranscoder;

impl FfmpegTranscoder {
    /// Create a transcoder. ffmpeg availability is checked per call.
    pub fn new() -> Self {
        Self
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode(
        &mut self,
        intermediate: &EncodedVideo,
        target: SinkConfig,
    ) -> StillreelResult<EncodedVideo> {
        if intermediate.is_empty() {
            return Err(StillreelError::transcode(
                "intermediate stream carries no data",
            ));
        }
        if !is_ffmpeg_on_path() {
            return Err(StillreelError::resource(
                "ffmpeg is required for transcoding, but was not found on PATH",
            ));
        }

        // Both temps are guard-owned: they disappear on every exit path.
        let in_path = temp_media_path("transcode_in", intermediate.container);
        let in_guard = TempFileGuard(Some(in_path.clone()));
        std::fs::write(&in_path, &intermediate.data).map_err(|e| {
            StillreelError::transcode(format!("failed to stage intermediate stream: {e}"))
        })?;

        let out_path = temp_media_path("delivery", Container::Mp4);
        let out_guard = TempFileGuard(Some(out_path.clone()));

        let args = transcode_args(&in_path, target, &out_path);
        let output = Command::new("ffmpeg")
            .args(&args)
            .output()
            .map_err(|e| StillreelError::transcode(format!("failed to run ffmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StillreelError::transcode(format!(
                "ffmpeg transcode exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let data = std::fs::read(&out_path).map_err(|e| {
            StillreelError::transcode(format!("failed to read delivery container: {e}"))
        })?;
        drop(in_guard);
        drop(out_guard);

        if data.is_empty() {
            return Err(StillreelError::transcode("transcode produced no output"));
        }
        debug!(bytes = data.len(), "delivery transcode complete");
        Ok(EncodedVideo {
            container: Container::Mp4,
            data,
        })
    }
}
