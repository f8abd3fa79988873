//! Canvas2D renderer.
//!
//! Walks the paint list and draws to an HTML `<canvas>` via
//! `CanvasRenderingContext2d`. Rasters are uploaded once into offscreen
//! canvases and scaled into their node bounds on every frame.

use pse_core::measure::{ApproxMeasure, TextMeasure, text_lines};
use pse_core::model::*;
use pse_core::Viewport;
use pse_render::{HandleFrame, NodeKey, PaintKind, PaintNode, handle_rect};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

const STAGE_BG: &str = "#FFFFFF";
const BOUNDARY_STROKE: &str = "#FF3B30";
const FRAME_STROKE: &str = "#00A1FF";
const HANDLE_FILL: &str = "#FFFFFF";

// ─── Raster cache ────────────────────────────────────────────────────────

/// Offscreen canvases holding the decoded background and logo pixels.
#[derive(Default)]
pub struct RasterCache {
    background: Option<HtmlCanvasElement>,
    logo: Option<HtmlCanvasElement>,
}

impl RasterCache {
    pub fn invalidate_background(&mut self) {
        self.background = None;
    }

    pub fn invalidate_logo(&mut self) {
        self.logo = None;
    }

    fn slot(&mut self, key: NodeKey) -> Option<&mut Option<HtmlCanvasElement>> {
        match key {
            NodeKey::Background => Some(&mut self.background),
            NodeKey::Overlay(OverlayKey::Logo) => Some(&mut self.logo),
            _ => None,
        }
    }

    fn get_or_upload(
        &mut self,
        key: NodeKey,
        raster: &Raster,
    ) -> Result<Option<HtmlCanvasElement>, JsValue> {
        let Some(slot) = self.slot(key) else {
            return Ok(None);
        };
        if let Some(canvas) = slot.as_ref() {
            return Ok(Some(canvas.clone()));
        }
        let canvas = upload_raster(raster)?;
        *slot = Some(canvas.clone());
        Ok(Some(canvas))
    }
}

fn upload_raster(raster: &Raster) -> Result<HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(raster.width);
    canvas.set_height(raster.height);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("offscreen canvas has no 2d context"))?
        .dyn_into()?;
    let data = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(raster.rgba.as_slice()),
        raster.width,
        raster.height,
    )?;
    ctx.put_image_data(&data, 0.0, 0.0)?;
    log::debug!("uploaded raster {}x{}", raster.width, raster.height);
    Ok(canvas)
}

// ─── Scene ───────────────────────────────────────────────────────────────

/// Render the paint list, then the transformer on top.
pub fn render_scene(
    ctx: &CanvasRenderingContext2d,
    stage: Viewport,
    nodes: &[PaintNode<'_>],
    frame: Option<&HandleFrame>,
    cache: &mut RasterCache,
) -> Result<(), JsValue> {
    ctx.set_fill_style_str(STAGE_BG);
    ctx.fill_rect(0.0, 0.0, stage.width as f64, stage.height as f64);

    for node in nodes {
        match node.kind {
            PaintKind::Raster(raster) => {
                if raster.width == 0 || raster.height == 0 {
                    continue;
                }
                if let Some(canvas) = cache.get_or_upload(node.key, raster)? {
                    let b = &node.bounds;
                    ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                        &canvas,
                        b.x as f64,
                        b.y as f64,
                        b.width as f64,
                        b.height as f64,
                    )?;
                }
            }
            PaintKind::Outline => draw_boundary(ctx, &node.bounds)?,
            PaintKind::Text(text) => draw_text(ctx, text)?,
        }
    }

    if let Some(frame) = frame {
        draw_frame(ctx, frame)?;
    }
    Ok(())
}

fn draw_boundary(ctx: &CanvasRenderingContext2d, b: &Bounds) -> Result<(), JsValue> {
    ctx.save();
    let dash = js_sys::Array::of2(&JsValue::from_f64(6.0), &JsValue::from_f64(4.0));
    ctx.set_line_dash(&dash)?;
    ctx.set_stroke_style_str(BOUNDARY_STROKE);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(b.x as f64, b.y as f64, b.width as f64, b.height as f64);
    ctx.restore();
    Ok(())
}

fn draw_text(ctx: &CanvasRenderingContext2d, text: &TextOverlay) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(text.position.x as f64, text.position.y as f64)?;
    if text.rotation != 0.0 {
        ctx.rotate((text.rotation as f64).to_radians())?;
    }
    ctx.set_font(&font_css(text));
    ctx.set_fill_style_str(&text.color.to_css());
    ctx.set_text_baseline("top");

    let line_height = text.font_size as f64;
    for (i, line) in text_lines(&text.content).enumerate() {
        ctx.fill_text(line, 0.0, i as f64 * line_height)?;
    }

    ctx.restore();
    Ok(())
}

fn draw_frame(ctx: &CanvasRenderingContext2d, frame: &HandleFrame) -> Result<(), JsValue> {
    let b = &frame.bounds;
    ctx.save();
    ctx.set_stroke_style_str(FRAME_STROKE);
    ctx.set_line_width(1.0);
    // Rotate about the box origin, the same pivot `draw_text` uses.
    ctx.translate(b.x as f64, b.y as f64)?;
    if frame.rotation != 0.0 {
        ctx.rotate((frame.rotation as f64).to_radians())?;
    }
    ctx.stroke_rect(0.0, 0.0, b.width as f64, b.height as f64);
    ctx.restore();

    if frame.resizable {
        ctx.save();
        ctx.set_stroke_style_str(FRAME_STROKE);
        ctx.set_line_width(1.0);
        ctx.set_fill_style_str(HANDLE_FILL);
        for handle in Handle::ALL {
            let r = handle_rect(b, handle, frame.handle_size);
            let (x, y, w, h) = (r.x as f64, r.y as f64, r.width as f64, r.height as f64);
            ctx.fill_rect(x, y, w, h);
            ctx.stroke_rect(x, y, w, h);
        }
        ctx.restore();
    }
    Ok(())
}

/// CSS `font` shorthand for an overlay, e.g. `italic bold 20px "Arial"`.
pub fn font_css(text: &TextOverlay) -> String {
    format!(
        "{} {}px \"{}\"",
        text.font_style.to_css(),
        text.font_size,
        text.font_family
    )
}

// ─── Measurement ─────────────────────────────────────────────────────────

/// Text measurement backed by the page's real font metrics.
pub struct CanvasMeasure<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasMeasure<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for CanvasMeasure<'_> {
    fn measure(&self, text: &TextOverlay) -> Size {
        self.ctx.save();
        self.ctx.set_font(&font_css(text));
        let mut width = 0.0_f64;
        let mut lines = 0;
        for line in text_lines(&text.content) {
            lines += 1;
            match self.ctx.measure_text(line) {
                Ok(metrics) => width = width.max(metrics.width()),
                Err(_) => {
                    self.ctx.restore();
                    return ApproxMeasure.measure(text);
                }
            }
        }
        self.ctx.restore();
        Size::new(width as f32, lines.max(1) as f32 * text.font_size)
    }
}
