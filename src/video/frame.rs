use crate::caption::wrap_caption;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::math::blend_px;
use crate::raster::RasterImage;
use crate::video::spec::VideoJobSpec;
use crate::video::text::{CaptionFont, TextPainter};

/// Background fill behind the photo.
const BACKGROUND_RGBA: [u8; 4] = [14, 14, 18, 255];

const PANEL_MARGIN_X: u32 = 60;
const PANEL_BOTTOM_MARGIN: u32 = 120;
const PANEL_HEIGHT: u32 = 500;
const PANEL_PADDING: u32 = 48;
/// Panel opacity over the photo.
const PANEL_ALPHA: u8 = 150;

const TITLE_TEXT: &str = "FEATURED DROP";
const TITLE_SIZE: f32 = 34.0;
const CAPTION_SIZE: f32 = 44.0;
const LINE_HEIGHT: u32 = 58;
const TAG_SIZE: f32 = 30.0;

const TITLE_RGBA: [u8; 4] = [255, 255, 255, 255];
const CAPTION_RGBA: [u8; 4] = [244, 244, 244, 255];
const TAG_RGBA: [u8; 4] = [255, 255, 255, 210];

/// Animation state for one frame, purely a function of the frame index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameState {
    /// Progress fraction in `[0, 1)`.
    pub progress: f32,
    /// Photo zoom multiplier on top of cover-fit.
    pub zoom: f32,
    /// Horizontal pan offset in canvas pixels.
    pub offset_x: f32,
    /// Vertical pan offset in canvas pixels.
    pub offset_y: f32,
}

impl FrameState {
    /// State for `frame` out of `total_frames`.
    pub fn at(frame: FrameIndex, total_frames: u64) -> Self {
        let progress = if total_frames == 0 {
            0.0
        } else {
            frame.0 as f32 / total_frames as f32
        };
        let phase = progress * std::f32::consts::TAU;
        Self {
            progress,
            zoom: 1.05 + 0.15 * progress,
            offset_x: 40.0 * phase.sin(),
            offset_y: 30.0 * phase.cos(),
        }
    }
}

/// Composes animation frames for one video job.
///
/// `render` writes into the caller's canvas buffer and has no other
/// observable effect (the internal glyph cache only memoizes rasterization).
/// The renderer borrows the enhanced raster for the duration of the job; the
/// canvas buffer it writes into is exclusively owned by that job.
pub struct FrameRenderer<'a> {
    spec: VideoJobSpec,
    raster: &'a RasterImage,
    total_frames: u64,
    caption_lines: Vec<String>,
    painter: TextPainter,
}

impl<'a> FrameRenderer<'a> {
    /// Prepare a renderer: wraps the caption against the panel width up
    /// front so every frame reuses the same lines.
    pub fn new(
        spec: VideoJobSpec,
        raster: &'a RasterImage,
        caption: &str,
        font: Option<CaptionFont>,
    ) -> Self {
        let usable_width = spec
            .canvas
            .width
            .saturating_sub(2 * (PANEL_MARGIN_X + PANEL_PADDING)) as f32;
        let caption_lines = wrap_caption(caption, CAPTION_SIZE, usable_width);
        let total_frames = spec.total_frames();
        Self {
            spec,
            raster,
            total_frames,
            caption_lines,
            painter: TextPainter::new(font),
        }
    }

    /// The wrapped caption lines this renderer draws.
    pub fn caption_lines(&self) -> &[String] {
        &self.caption_lines
    }

    /// Compose frame `frame` into `buf` (`canvas.frame_bytes()` RGBA bytes).
    pub fn render(&mut self, frame: FrameIndex, buf: &mut [u8]) {
        let canvas = self.spec.canvas;
        debug_assert_eq!(buf.len(), canvas.frame_bytes());

        fill(buf, BACKGROUND_RGBA);
        let state = FrameState::at(frame, self.total_frames);
        self.draw_photo(buf, canvas, state);
        self.draw_panel(buf, canvas);
        self.draw_text(buf, canvas);
    }

    /// Cover-fit the photo, then zoom and pan: inverse-map every canvas
    /// pixel back into the source and sample bilinearly. Pixels that map
    /// outside the source keep the background.
    fn draw_photo(&self, buf: &mut [u8], canvas: Canvas, state: FrameState) {
        let img_w = self.raster.width as f32;
        let img_h = self.raster.height as f32;
        let cover = (canvas.width as f32 / img_w).max(canvas.height as f32 / img_h);
        let scale = cover * state.zoom;
        let inv_scale = 1.0 / scale;

        let center_x = canvas.width as f32 / 2.0 + state.offset_x;
        let center_y = canvas.height as f32 / 2.0 + state.offset_y;

        for y in 0..canvas.height {
            let sy = (y as f32 - center_y) * inv_scale + img_h / 2.0;
            if sy < 0.0 || sy >= img_h {
                continue;
            }
            let row = y as usize * canvas.width as usize * 4;
            for x in 0..canvas.width {
                let sx = (x as f32 - center_x) * inv_scale + img_w / 2.0;
                if sx < 0.0 || sx >= img_w {
                    continue;
                }
                let px = self.raster.sample_bilinear(sx, sy);
                blend_px(buf, row + x as usize * 4, px);
            }
        }
    }

    fn draw_panel(&self, buf: &mut [u8], canvas: Canvas) {
        let [r, g, b, _] = self.spec.accent_rgba();
        let color = [r, g, b, PANEL_ALPHA];
        let (px, py, pw, ph) = panel_rect(canvas);
        for y in py..py + ph {
            let row = y as usize * canvas.width as usize * 4;
            for x in px..px + pw {
                blend_px(buf, row + x as usize * 4, color);
            }
        }
    }

    fn draw_text(&mut self, buf: &mut [u8], canvas: Canvas) {
        let (px, py, _, ph) = panel_rect(canvas);
        let text_x = (px + PANEL_PADDING) as f32;
        let mut text_y = (py + PANEL_PADDING) as f32;
        let panel_bottom = (py + ph).saturating_sub(PANEL_PADDING) as f32;

        self.painter
            .draw_line(buf, canvas, text_x, text_y, TITLE_TEXT, TITLE_SIZE, TITLE_RGBA);
        text_y += LINE_HEIGHT as f32;

        for line in &self.caption_lines {
            if text_y + CAPTION_SIZE > panel_bottom - TAG_SIZE {
                break; // clip instead of spilling over the hashtag slot
            }
            self.painter
                .draw_line(buf, canvas, text_x, text_y, line, CAPTION_SIZE, CAPTION_RGBA);
            text_y += LINE_HEIGHT as f32;
        }

        if let Some(tag) = self.spec.brand_tag.clone() {
            let tag_y = panel_bottom - TAG_SIZE;
            self.painter
                .draw_line(buf, canvas, text_x, tag_y, &tag, TAG_SIZE, TAG_RGBA);
        }
    }
}

fn fill(buf: &mut [u8], rgba: [u8; 4]) {
    for px in buf.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

/// Panel geometry as `(x, y, w, h)`. The fixed insets apply to the standard
/// 1080x1920 profile; smaller canvases clamp rather than underflow.
fn panel_rect(canvas: Canvas) -> (u32, u32, u32, u32) {
    let x = PANEL_MARGIN_X.min(canvas.width);
    let w = canvas.width.saturating_sub(2 * PANEL_MARGIN_X);
    let h = PANEL_HEIGHT.min(canvas.height.saturating_sub(PANEL_BOTTOM_MARGIN));
    let y = canvas.height.saturating_sub(PANEL_BOTTOM_MARGIN + h);
    (x, y, w, h)
}
