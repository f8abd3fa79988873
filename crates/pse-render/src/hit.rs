//! Hit testing: point → overlay lookup.
//!
//! Reverse-walks the paint list (front-to-back) to find which overlay is
//! under a given stage position. Background and boundary never hit.

use crate::scene::{NodeKey, PaintKind, PaintNode};
use pse_core::model::{Bounds, Handle, OverlayKey, Point};

/// Find the topmost overlay at (px, py).
pub fn hit_test(nodes: &[PaintNode<'_>], px: f32, py: f32) -> Option<OverlayKey> {
    nodes.iter().rev().find_map(|node| {
        let NodeKey::Overlay(key) = node.key else {
            return None;
        };
        let (lx, ly) = match node.kind {
            PaintKind::Text(text) if text.rotation != 0.0 => {
                unrotate(px, py, node.bounds.origin(), text.rotation)
            }
            _ => (px, py),
        };
        node.bounds.contains(lx, ly).then_some(key)
    })
}

/// Which corner handle of `bounds`, if any, is under (px, py).
pub fn hit_handle(bounds: &Bounds, handle_size: f32, px: f32, py: f32) -> Option<Handle> {
    Handle::ALL
        .into_iter()
        .find(|h| handle_rect(bounds, *h, handle_size).contains(px, py))
}

/// The square drawn for a handle, centered on its anchor.
pub fn handle_rect(bounds: &Bounds, handle: Handle, size: f32) -> Bounds {
    let a = handle.anchor(bounds);
    Bounds::new(a.x - size / 2.0, a.y - size / 2.0, size, size)
}

/// Map a stage point into the frame of a node rotated by `degrees` about `pivot`.
fn unrotate(px: f32, py: f32, pivot: Point, degrees: f32) -> (f32, f32) {
    let (sin, cos) = (-degrees.to_radians()).sin_cos();
    let (dx, dy) = (px - pivot.x, py - pivot.y);
    (pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::build_scene;
    use pse_core::model::*;
    use pse_core::{ApproxMeasure, EditorConfig, OverlayStore};

    #[test]
    fn topmost_overlay_wins() {
        let config = EditorConfig::default();
        let mut store = OverlayStore::new(&config);
        let a = store.add_text();
        let b = store.add_text();
        let nodes = build_scene(&store, &config, &ApproxMeasure);
        // Both texts sit at (50, 50); the later one is on top.
        assert_eq!(hit_test(&nodes, 55.0, 55.0), Some(OverlayKey::Text(b)));

        store.delete_text(b);
        let nodes = build_scene(&store, &config, &ApproxMeasure);
        assert_eq!(hit_test(&nodes, 55.0, 55.0), Some(OverlayKey::Text(a)));
    }

    #[test]
    fn background_and_boundary_never_hit() {
        let config = EditorConfig::default();
        let mut store = OverlayStore::new(&config);
        store.load_background(Raster::solid(800, 600, Color::BLACK));
        let nodes = build_scene(&store, &config, &ApproxMeasure);
        assert_eq!(hit_test(&nodes, 400.0, 300.0), None);
    }

    #[test]
    fn logo_hit_inside_its_box() {
        let config = EditorConfig::default();
        let mut store = OverlayStore::new(&config);
        store.set_logo(Raster::solid(4, 4, Color::BLACK));
        let nodes = build_scene(&store, &config, &ApproxMeasure);
        assert_eq!(hit_test(&nodes, 150.0, 150.0), Some(OverlayKey::Logo));
        assert_eq!(hit_test(&nodes, 250.0, 150.0), None);
    }

    #[test]
    fn rotated_text_hit_follows_rotation() {
        let config = EditorConfig::default();
        let mut store = OverlayStore::new(&config);
        let id = store.add_text();
        store.update_text(
            id,
            TextPatch {
                rotation: Some(90.0),
                ..Default::default()
            },
        );
        let nodes = build_scene(&store, &config, &ApproxMeasure);
        // Rotated 90° clockwise about (50, 50): the box now extends downward.
        assert_eq!(hit_test(&nodes, 45.0, 100.0), Some(OverlayKey::Text(id)));
        assert_eq!(hit_test(&nodes, 100.0, 55.0), None);
    }

    #[test]
    fn handles_are_found_at_corners() {
        let b = Bounds::new(100.0, 100.0, 100.0, 50.0);
        assert_eq!(hit_handle(&b, 8.0, 101.0, 99.0), Some(Handle::TopLeft));
        assert_eq!(hit_handle(&b, 8.0, 203.0, 152.0), Some(Handle::BottomRight));
        assert_eq!(hit_handle(&b, 8.0, 150.0, 125.0), None);
    }
}
