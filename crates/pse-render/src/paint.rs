//! Paint list → Vello drawing commands.
//!
//! Rasters become `peniko::Image`s scaled into their node bounds, the
//! boundary and transformer are stroked rectangles. Glyph shaping needs a
//! font context and is left to the host; text nodes are traced only.

use crate::hit::handle_rect;
use crate::scene::{HandleFrame, PaintKind, PaintNode};
use kurbo::{Affine, Rect, Stroke};
use peniko::{Blob, Color, Fill, Image, ImageFormat};
use pse_core::model::{Bounds, Handle, Raster};
use vello::Scene;

const BOUNDARY_COLOR: Color = Color::from_rgba8(255, 0, 0, 255);
const FRAME_COLOR: Color = Color::from_rgba8(0, 161, 255, 255);
const HANDLE_FILL: Color = Color::from_rgba8(255, 255, 255, 255);

/// Paint the whole list to a Vello scene.
///
/// Call once per frame with a freshly-cleared `Scene`.
/// The caller presents the scene via wgpu.
pub fn paint_scene(scene: &mut Scene, nodes: &[PaintNode<'_>], frame: Option<&HandleFrame>) {
    for node in nodes {
        match node.kind {
            PaintKind::Raster(raster) => paint_raster(scene, raster, &node.bounds),
            PaintKind::Outline => stroke_rect(scene, &node.bounds, 1.0, BOUNDARY_COLOR),
            PaintKind::Text(text) => {
                log::trace!(
                    "TEXT {} {:?} at ({}, {}) rot {}",
                    text.id,
                    text.content,
                    node.bounds.x,
                    node.bounds.y,
                    text.rotation
                );
            }
        }
    }

    if let Some(frame) = frame {
        paint_frame(scene, frame);
    }
}

fn paint_raster(scene: &mut Scene, raster: &Raster, b: &Bounds) {
    if raster.width == 0 || raster.height == 0 {
        return;
    }
    let image = Image::new(
        Blob::from(raster.rgba.clone()),
        ImageFormat::Rgba8,
        raster.width,
        raster.height,
    );
    let sx = b.width as f64 / raster.width as f64;
    let sy = b.height as f64 / raster.height as f64;
    let transform =
        Affine::translate((b.x as f64, b.y as f64)) * Affine::scale_non_uniform(sx, sy);
    scene.draw_image(&image, transform);
}

fn paint_frame(scene: &mut Scene, frame: &HandleFrame) {
    let b = &frame.bounds;
    let (ox, oy) = (b.x as f64, b.y as f64);
    let rotate = Affine::translate((ox, oy))
        * Affine::rotate((frame.rotation as f64).to_radians())
        * Affine::translate((-ox, -oy));
    scene.stroke(&Stroke::new(1.0), rotate, FRAME_COLOR, None, &to_rect(b));
    if !frame.resizable {
        return;
    }
    for handle in Handle::ALL {
        let r = to_rect(&handle_rect(&frame.bounds, handle, frame.handle_size));
        scene.fill(Fill::NonZero, Affine::IDENTITY, HANDLE_FILL, None, &r);
        scene.stroke(&Stroke::new(1.0), Affine::IDENTITY, FRAME_COLOR, None, &r);
    }
}

fn stroke_rect(scene: &mut Scene, b: &Bounds, width: f64, color: Color) {
    scene.stroke(&Stroke::new(width), Affine::IDENTITY, color, None, &to_rect(b));
}

fn to_rect(b: &Bounds) -> Rect {
    Rect::new(
        b.x as f64,
        b.y as f64,
        b.right() as f64,
        b.bottom() as f64,
    )
}
