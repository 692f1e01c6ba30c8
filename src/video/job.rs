use crate::encode::{CaptureSink, EncodedVideo, Transcoder};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{StillreelError, StillreelResult};
use crate::raster::RasterImage;
use crate::video::frame::FrameRenderer;
use crate::video::spec::VideoJobSpec;
use crate::video::text::CaptionFont;
use tracing::debug;

/// Lifecycle of one video job.
///
/// `Failed` is reachable from every non-`Done` state; there is no mid-job
/// cancellation; a job runs to `Done` or `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    /// Created, nothing acquired yet.
    Idle,
    /// Frame loop running, recorder capturing.
    Recording,
    /// Final frame pushed; waiting for the recorder to stop and flush.
    Finalizing,
    /// Intermediate payload handed to the transcoder.
    Transcoding,
    /// Delivery payload produced, all temporaries released.
    Done,
    /// A stage failed; capture resources were released before the error
    /// surfaced.
    Failed,
}

/// One short-form video synthesis job.
///
/// The job exclusively owns its canvas buffer; no two jobs render into the
/// same buffer. Concurrent jobs each bring their own sink and transcoder.
pub struct VideoJob<'a> {
    spec: VideoJobSpec,
    renderer: FrameRenderer<'a>,
    state: JobState,
}

impl<'a> VideoJob<'a> {
    /// Prepare a job over an enhanced raster.
    pub fn new(
        raster: &'a RasterImage,
        caption: &str,
        spec: VideoJobSpec,
        font: Option<CaptionFont>,
    ) -> StillreelResult<Self> {
        if raster.width == 0 || raster.height == 0 {
            return Err(StillreelError::decode("video source raster is empty"));
        }
        let renderer = FrameRenderer::new(spec.clone(), raster, caption, font);
        Ok(Self {
            spec,
            renderer,
            state: JobState::Idle,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Drive the job to completion: record every frame into `sink`, collect
    /// the intermediate stream, transcode it to the delivery container.
    ///
    /// The frame loop is an explicit scheduler: render one frame, hand it to
    /// the sink, then advance. One frame of work per iteration means
    /// the sink consumes each frame before the canvas buffer is overwritten.
    /// Transcoding starts only after the sink has confirmed a clean stop.
    pub fn run(
        &mut self,
        sink: &mut dyn CaptureSink,
        transcoder: &mut dyn Transcoder,
    ) -> StillreelResult<EncodedVideo> {
        if self.state != JobState::Idle {
            return Err(StillreelError::capture("video job was already run"));
        }

        let cfg = self.spec.sink_config();
        let total = self.spec.total_frames();

        if let Err(e) = sink.begin(cfg) {
            // begin leaves nothing acquired on error; no abort needed.
            self.state = JobState::Failed;
            return Err(e);
        }
        self.state = JobState::Recording;
        debug!(total_frames = total, "recording started");

        let mut buf = vec![0u8; cfg.canvas.frame_bytes()];
        for f in 0..total {
            let idx = FrameIndex(f);
            self.renderer.render(idx, &mut buf);
            if let Err(e) = sink.push_frame(idx, &buf) {
                sink.abort();
                self.state = JobState::Failed;
                return Err(e);
            }
        }

        self.state = JobState::Finalizing;
        let intermediate = match sink.finish() {
            Ok(payload) => payload,
            Err(e) => {
                sink.abort();
                self.state = JobState::Failed;
                return Err(e);
            }
        };
        debug!(
            intermediate_bytes = intermediate.len(),
            "capture finalized, transcoding"
        );

        self.state = JobState::Transcoding;
        let delivered = match transcoder.transcode(&intermediate, cfg) {
            Ok(payload) => payload,
            Err(e) => {
                // The sink finished cleanly and the transcoder cleans its own
                // temporaries; nothing is left to release here.
                self.state = JobState::Failed;
                return Err(e);
            }
        };
        drop(intermediate);

        self.state = JobState::Done;
        debug!(delivery_bytes = delivered.len(), "video job complete");
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caption::StyleTag;
    use crate::encode::{Container, InMemorySink, SinkConfig};
    use crate::foundation::core::{Canvas, Fps};

    fn tiny_spec() -> VideoJobSpec {
        VideoJobSpec {
            canvas: Canvas {
                width: 32,
                height: 48,
            },
            fps: Fps::new(30, 1).unwrap(),
            duration_ms: 400, // 12 frames
            style: StyleTag::Street,
            brand_tag: None,
        }
    }

    fn photo() -> RasterImage {
        RasterImage::filled(16, 16, [90, 90, 90, 255]).unwrap()
    }

    /// Transcoder double that returns a canned payload and counts calls.
    struct StubTranscoder {
        calls: usize,
        fail: bool,
    }

    impl StubTranscoder {
        fn new(fail: bool) -> Self {
            Self { calls: 0, fail }
        }
    }

    impl Transcoder for StubTranscoder {
        fn transcode(
            &mut self,
            intermediate: &EncodedVideo,
            _target: SinkConfig,
        ) -> StillreelResult<EncodedVideo> {
            self.calls += 1;
            assert_eq!(intermediate.container, Container::Webm);
            if self.fail {
                return Err(StillreelError::transcode("simulated failure"));
            }
            Ok(EncodedVideo {
                container: Container::Mp4,
                data: vec![1, 2, 3],
            })
        }
    }

    /// Sink double that fails on a chosen frame index.
    struct FailingSink {
        inner: InMemorySink,
        fail_at: u64,
    }

    impl CaptureSink for FailingSink {
        fn begin(&mut self, cfg: SinkConfig) -> StillreelResult<()> {
            self.inner.begin(cfg)
        }

        fn push_frame(&mut self, idx: FrameIndex, frame: &[u8]) -> StillreelResult<()> {
            if idx.0 == self.fail_at {
                return Err(StillreelError::capture("simulated push failure"));
            }
            self.inner.push_frame(idx, frame)
        }

        fn finish(&mut self) -> StillreelResult<EncodedVideo> {
            self.inner.finish()
        }

        fn abort(&mut self) {
            self.inner.abort();
        }
    }

    #[test]
    fn job_pushes_every_frame_in_order_and_completes() {
        let raster = photo();
        let spec = tiny_spec();
        let total = spec.total_frames();
        let mut job = VideoJob::new(&raster, "caption", spec, None).unwrap();
        let mut sink = InMemorySink::new();
        let mut transcoder = StubTranscoder::new(false);

        let out = job.run(&mut sink, &mut transcoder).unwrap();
        assert_eq!(job.state(), JobState::Done);
        assert_eq!(out.container, Container::Mp4);
        assert_eq!(transcoder.calls, 1);

        assert_eq!(sink.frames.len() as u64, total);
        for (i, (idx, _)) in sink.frames.iter().enumerate() {
            assert_eq!(idx.0, i as u64);
        }
        assert_eq!(sink.finished, 1);
        assert_eq!(sink.aborted, 0);
    }

    #[test]
    fn job_cannot_run_twice() {
        let raster = photo();
        let mut job = VideoJob::new(&raster, "caption", tiny_spec(), None).unwrap();
        let mut sink = InMemorySink::new();
        let mut transcoder = StubTranscoder::new(false);
        job.run(&mut sink, &mut transcoder).unwrap();
        assert!(job.run(&mut sink, &mut transcoder).is_err());
    }

    #[test]
    fn push_failure_aborts_sink_exactly_once() {
        let raster = photo();
        let mut job = VideoJob::new(&raster, "caption", tiny_spec(), None).unwrap();
        let mut sink = FailingSink {
            inner: InMemorySink::new(),
            fail_at: 5,
        };
        let mut transcoder = StubTranscoder::new(false);

        let err = job.run(&mut sink, &mut transcoder).unwrap_err();
        assert!(err.to_string().contains("capture error:"));
        assert_eq!(job.state(), JobState::Failed);
        assert_eq!(sink.inner.aborted, 1);
        assert_eq!(sink.inner.finished, 0);
        assert_eq!(transcoder.calls, 0);
    }

    #[test]
    fn transcode_failure_leaves_sink_released_and_job_failed() {
        let raster = photo();
        let mut job = VideoJob::new(&raster, "caption", tiny_spec(), None).unwrap();
        let mut sink = InMemorySink::new();
        let mut transcoder = StubTranscoder::new(true);

        let err = job.run(&mut sink, &mut transcoder).unwrap_err();
        assert!(err.to_string().contains("transcode error:"));
        assert_eq!(job.state(), JobState::Failed);
        // The sink's resources were released by its clean finish; no second
        // release may happen.
        assert_eq!(sink.finished, 1);
        assert_eq!(sink.aborted, 0);
    }

    #[test]
    fn empty_raster_is_rejected_up_front() {
        let mut raster = photo();
        raster.width = 0;
        assert!(VideoJob::new(&raster, "caption", tiny_spec(), None).is_err());
    }
}
