use crate::encode::sink::{CaptureSink, Container, EncodedVideo, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{StillreelError, StillreelResult};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Removes the wrapped file when dropped. Used for every temp artifact in the
/// capture/transcode pipeline so cleanup happens on success and failure alike.
pub(crate) struct TempFileGuard(pub(crate) Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// A unique temp path for a media artifact of this process.
pub(crate) fn temp_media_path(stem: &str, container: Container) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!(
        "stillreel_{stem}_{}_{nanos}.{}",
        std::process::id(),
        container.extension()
    ))
}

/// ffmpeg argument list for capturing rawvideo RGBA from stdin into a WebM
/// intermediate. Split out so the command shape is testable without spawning.
pub(crate) fn capture_args(cfg: SinkConfig, out_path: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    args.extend(
        [
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
        ]
        .map(str::to_owned),
    );
    args.push(format!("{}x{}", cfg.canvas.width, cfg.canvas.height));
    args.push("-r".to_owned());
    args.push(format!("{}/{}", cfg.fps.num, cfg.fps.den));
    args.extend(["-i", "pipe:0", "-an"].map(str::to_owned));
    // Realtime deadline keeps VP9 capture near the frame rate; quality is
    // recovered in the transcode.
    args.extend(
        [
            "-c:v",
            "libvpx-vp9",
            "-deadline",
            "realtime",
            "-cpu-used",
            "5",
            "-b:v",
            "0",
            "-crf",
            "32",
        ]
        .map(str::to_owned),
    );
    args.push(out_path.to_owned());
    args
}

/// Capture sink that spawns the system `ffmpeg` and streams raw RGBA frames
/// to its stdin, producing a WebM intermediate.
///
/// `finish` drops stdin, waits for the encoder process to exit and joins the
/// stderr drain thread (the explicit "recorder has stopped" signal) before
/// collecting the payload. `abort` kills the process and removes the temp
/// file.
pub struct FfmpegCaptureSink {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    out_file: Option<TempFileGuard>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegCaptureSink {
    /// Create an idle sink. The ffmpeg process is spawned in `begin`.
    pub fn new() -> Self {
        Self {
            child: None,
            stdin: None,
            stderr_drain: None,
            out_file: None,
            cfg: None,
            last_idx: None,
        }
    }

    fn release(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
        self.out_file = None; // guard drop removes the temp file
        self.cfg = None;
        self.last_idx = None;
    }
}

impl Default for FfmpegCaptureSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSink for FfmpegCaptureSink {
    fn begin(&mut self, cfg: SinkConfig) -> StillreelResult<()> {
        if cfg.canvas.width == 0 || cfg.canvas.height == 0 {
            return Err(StillreelError::capture("capture canvas must be non-empty"));
        }
        if !cfg.canvas.width.is_multiple_of(2) || !cfg.canvas.height.is_multiple_of(2) {
            return Err(StillreelError::capture(
                "capture width/height must be even for the delivery pipeline",
            ));
        }
        if !is_ffmpeg_on_path() {
            return Err(StillreelError::resource(
                "ffmpeg is required for video capture, but was not found on PATH",
            ));
        }

        let out_path = temp_media_path("capture", Container::Webm);
        let args = capture_args(cfg, &out_path.to_string_lossy());

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| StillreelError::capture(format!("failed to spawn ffmpeg: {e}")))?;

        let stdin = match child.stdin.take() {
            Some(stdin) => stdin,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(StillreelError::capture("failed to open ffmpeg stdin"));
            }
        };
        let mut stderr = match child.stderr.take() {
            Some(stderr) => stderr,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(StillreelError::capture("failed to open ffmpeg stderr"));
            }
        };
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.out_file = Some(TempFileGuard(Some(out_path)));
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &[u8]) -> StillreelResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| StillreelError::capture("capture sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(StillreelError::capture(
                "capture sink received out-of-order frame index",
            ));
        }
        if frame.len() != cfg.canvas.frame_bytes() {
            return Err(StillreelError::capture(format!(
                "frame is {} bytes, expected {}",
                frame.len(),
                cfg.canvas.frame_bytes()
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(StillreelError::capture("capture sink is already finalized"));
        };
        use std::io::Write as _;
        stdin.write_all(frame).map_err(|e| {
            StillreelError::capture(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        self.last_idx = Some(idx);
        Ok(())
    }

    fn finish(&mut self) -> StillreelResult<EncodedVideo> {
        // Closing stdin is the stop signal; ffmpeg flushes and exits.
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| StillreelError::capture("capture sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| StillreelError::capture(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| StillreelError::capture("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| StillreelError::capture(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        let guard = self.out_file.take();
        self.cfg = None;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(StillreelError::capture(format!(
                "ffmpeg capture exited with status {status}: {}",
                stderr.trim()
            )));
        }

        let path = guard
            .as_ref()
            .and_then(|g| g.0.clone())
            .ok_or_else(|| StillreelError::capture("capture output path missing"))?;
        let data = std::fs::read(&path).map_err(|e| {
            StillreelError::capture(format!("failed to read captured stream: {e}"))
        })?;
        drop(guard);

        if data.is_empty() {
            return Err(StillreelError::capture("capture produced no data"));
        }
        Ok(EncodedVideo {
            container: Container::Webm,
            data,
        })
    }

    fn abort(&mut self) {
        self.release();
    }
}

impl Drop for FfmpegCaptureSink {
    fn drop(&mut self) {
        self.release();
    }
}
