//! Caption collaborators: label detection and copy generation.
//!
//! Detection and captioning sit behind narrow interfaces so the pipeline has
//! no dependency on any particular model or templating scheme. Detection is
//! best-effort: a failing detector degrades to the empty label set.

mod script;
mod wrap;

pub use script::{StyleTag, compose_caption};
pub use wrap::wrap_caption;
pub(crate) use wrap::AVG_GLYPH_WIDTH_FACTOR;

use crate::raster::RasterImage;
use std::collections::BTreeSet;
use tracing::warn;

/// An opaque capability that labels the contents of a raster.
///
/// Implementations return an unordered set of human-readable label strings
/// (possibly empty). The pipeline treats the labels as opaque text.
pub trait LabelDetector {
    /// Detect labels in `image`.
    fn detect(&self, image: &RasterImage) -> crate::StillreelResult<BTreeSet<String>>;
}

/// Built-in detector that never labels anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullDetector;

impl LabelDetector for NullDetector {
    fn detect(&self, _image: &RasterImage) -> crate::StillreelResult<BTreeSet<String>> {
        Ok(BTreeSet::new())
    }
}

/// Run a detector, absorbing failures into the empty label set.
///
/// Captions degrade gracefully without labels, so a detector error is logged
/// and never propagated.
pub fn caption_labels(detector: &dyn LabelDetector, image: &RasterImage) -> BTreeSet<String> {
    match detector.detect(image) {
        Ok(labels) => labels,
        Err(e) => {
            warn!(error = %e, "label detection failed; continuing with no labels");
            BTreeSet::new()
        }
    }
}
