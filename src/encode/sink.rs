use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{StillreelError, StillreelResult};

/// Container formats moving through the capture/transcode pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Container {
    /// Intermediate streaming capture (VP9).
    Webm,
    /// Delivery container (H.264, faststart).
    Mp4,
}

impl Container {
    /// File extension for temp artifacts in this container.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
        }
    }
}

/// An encoded video payload tagged with its container.
#[derive(Clone, Debug)]
pub struct EncodedVideo {
    /// Container the bytes are muxed into.
    pub container: Container,
    /// The encoded bytes.
    pub data: Vec<u8>,
}

impl EncodedVideo {
    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` when the payload carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Configuration handed to a [`CaptureSink`] when recording starts.
#[derive(Clone, Copy, Debug)]
pub struct SinkConfig {
    /// Frame dimensions in pixels.
    pub canvas: Canvas,
    /// Capture frame rate.
    pub fps: Fps,
}

/// Contract for consuming rendered frames and producing an intermediate
/// encoded stream.
///
/// Ordering contract: `push_frame` is called in strictly increasing
/// `FrameIndex` order. `finish` is called only after the final frame has been
/// pushed, and returns only once the recorder has confirmed it stopped and
/// flushed. On any failure path the owner calls `abort`, which must release
/// every acquired resource; `abort` is idempotent.
pub trait CaptureSink: Send {
    /// Establish the capture stream. On error, nothing may remain acquired.
    fn begin(&mut self, cfg: SinkConfig) -> StillreelResult<()>;
    /// Push one RGBA8 frame (`canvas.frame_bytes()` bytes) in timeline order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &[u8]) -> StillreelResult<()>;
    /// Stop the stream, wait for the recorder to confirm, collect the payload.
    fn finish(&mut self) -> StillreelResult<EncodedVideo>;
    /// Release all capture resources without producing a payload.
    fn abort(&mut self);
}

/// In-memory sink for tests and debugging: records pushed frames and
/// produces an empty WebM-tagged payload.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    /// Frames in timeline order.
    pub frames: Vec<(FrameIndex, Vec<u8>)>,
    /// Number of `finish` calls observed.
    pub finished: usize,
    /// Number of `abort` calls observed.
    pub aborted: usize,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }
}

impl CaptureSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StillreelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &[u8]) -> StillreelResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| StillreelError::capture("sink not started"))?;
        if frame.len() != cfg.canvas.frame_bytes() {
            return Err(StillreelError::capture(format!(
                "frame is {} bytes, expected {}",
                frame.len(),
                cfg.canvas.frame_bytes()
            )));
        }
        if let Some((last, _)) = self.frames.last()
            && idx.0 <= last.0
        {
            return Err(StillreelError::capture(
                "sink received out-of-order frame index",
            ));
        }
        self.frames.push((idx, frame.to_vec()));
        Ok(())
    }

    fn finish(&mut self) -> StillreelResult<EncodedVideo> {
        self.finished += 1;
        Ok(EncodedVideo {
            container: Container::Webm,
            data: Vec::new(),
        })
    }

    fn abort(&mut self) {
        self.aborted += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SinkConfig {
        SinkConfig {
            canvas: Canvas {
                width: 2,
                height: 2,
            },
            fps: Fps::new(30, 1).unwrap(),
        }
    }

    #[test]
    fn push_before_begin_fails() {
        let mut sink = InMemorySink::new();
        assert!(sink.push_frame(FrameIndex(0), &[0u8; 16]).is_err());
    }

    #[test]
    fn rejects_wrong_frame_size() {
        let mut sink = InMemorySink::new();
        sink.begin(cfg()).unwrap();
        assert!(sink.push_frame(FrameIndex(0), &[0u8; 4]).is_err());
    }

    #[test]
    fn rejects_out_of_order_frames() {
        let mut sink = InMemorySink::new();
        sink.begin(cfg()).unwrap();
        sink.push_frame(FrameIndex(0), &[0u8; 16]).unwrap();
        sink.push_frame(FrameIndex(1), &[0u8; 16]).unwrap();
        assert!(sink.push_frame(FrameIndex(1), &[0u8; 16]).is_err());
    }

    #[test]
    fn records_frames_in_order() {
        let mut sink = InMemorySink::new();
        sink.begin(cfg()).unwrap();
        for i in 0..5 {
            sink.push_frame(FrameIndex(i), &[i as u8; 16]).unwrap();
        }
        let payload = sink.finish().unwrap();
        assert_eq!(payload.container, Container::Webm);
        assert_eq!(sink.frames.len(), 5);
        for (i, (idx, frame)) in sink.frames.iter().enumerate() {
            assert_eq!(idx.0, i as u64);
            assert_eq!(frame[0], i as u8);
        }
    }
}
