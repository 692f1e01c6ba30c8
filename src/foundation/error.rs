pub type StillreelResult<T> = Result<T, StillreelError>;

/// Pipeline error taxonomy.
///
/// Errors are reported per enhancement / per video job; a failure in one item
/// never aborts other items in a caller's batch.
#[derive(thiserror::Error, Debug)]
pub enum StillreelError {
    /// The source bytes or buffer cannot be interpreted as a raster image.
    #[error("decode error: {0}")]
    Decode(String),

    /// An output surface or buffer could not be allocated.
    #[error("render target error: {0}")]
    RenderTarget(String),

    /// The frame-capture stream could not be established or stopped cleanly.
    #[error("capture error: {0}")]
    Capture(String),

    /// The delivery re-encode failed or produced no output.
    #[error("transcode error: {0}")]
    Transcode(String),

    /// A required runtime capability is unavailable (e.g. ffmpeg on PATH).
    #[error("resource error: {0}")]
    Resource(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StillreelError {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn render_target(msg: impl Into<String>) -> Self {
        Self::RenderTarget(msg.into())
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    pub fn transcode(msg: impl Into<String>) -> Self {
        Self::Transcode(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }
}
