//! Selection & transform controller.
//!
//! Keeps the transformer (outline + resize handles) attached to whatever
//! the store has selected, and keeps every overlay inside the boundary:
//!
//! - **Drag** clamps the proposed origin per axis.
//! - **Resize** is all-or-nothing: a proposal that is too small or leaves
//!   the boundary is dropped and the previous box stays.
//!
//! Both operate on `Placement`, so text and logo share one code path.

use pse_core::measure::TextMeasure;
use pse_core::model::*;
use pse_core::{Commit, EditorConfig, OverlayStore};
use pse_render::HandleFrame;

/// Clamp a drag proposal so the box `(proposed, size)` stays in `boundary`.
///
/// An axis on which the box is larger than the boundary pins to the
/// boundary's min edge.
pub fn clamp_drag(proposed: Point, size: Size, boundary: &Bounds) -> Point {
    Point::new(
        clamp_axis(proposed.x, size.width, boundary.x, boundary.width),
        clamp_axis(proposed.y, size.height, boundary.y, boundary.height),
    )
}

fn clamp_axis(pos: f32, extent: f32, min: f32, span: f32) -> f32 {
    let limit = min + span;
    let max = limit - extent;
    if !pos.is_finite() || max < min {
        return min;
    }
    let mut pos = pos.clamp(min, max);
    // `max + extent` can round past `limit` by an ulp.
    while pos > min && pos + extent > limit {
        pos = pos.next_down();
    }
    pos
}

/// Whether a resize proposal may replace the current box.
pub fn accept_resize(proposed: &Bounds, boundary: &Bounds, min_size: f32) -> bool {
    proposed.width >= min_size
        && proposed.height >= min_size
        && boundary.contains_bounds(proposed)
}

/// Box produced by dragging `handle` of `start` by (dx, dy). The opposite
/// corner stays anchored.
pub fn resize_from_handle(start: &Bounds, handle: Handle, dx: f32, dy: f32) -> Bounds {
    let Bounds {
        x,
        y,
        width: w,
        height: h,
    } = *start;
    match handle {
        Handle::TopLeft => Bounds::new(x + dx, y + dy, w - dx, h - dy),
        Handle::TopRight => Bounds::new(x, y + dy, w + dx, h - dy),
        Handle::BottomLeft => Bounds::new(x + dx, y, w - dx, h + dy),
        Handle::BottomRight => Bounds::new(x, y, w + dx, h + dy),
    }
}

/// Transformer attachment plus the boundary rules it enforces.
#[derive(Debug, Clone)]
pub struct TransformController {
    attached: Option<OverlayKey>,
    resizable: bool,
    boundary: Bounds,
    min_size: f32,
    handle_size: f32,
}

impl TransformController {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            attached: None,
            resizable: false,
            boundary: config.boundary,
            min_size: config.min_logo_size,
            handle_size: config.handle_size,
        }
    }

    pub fn attached(&self) -> Option<OverlayKey> {
        self.attached
    }

    /// Whether the attached overlay shows resize handles.
    pub fn is_resizable(&self) -> bool {
        self.attached.is_some() && self.resizable
    }

    /// Re-attach to the current selection, or detach when nothing (or
    /// nothing that still exists) is selected. Returns whether the
    /// attachment changed.
    pub fn sync(&mut self, store: &OverlayStore) -> bool {
        let target = store
            .selection()
            .target()
            .and_then(|key| store.placement(key).map(|p| (key, p.is_resizable())));
        let (attached, resizable) = match target {
            Some((key, resizable)) => (Some(key), resizable),
            None => (None, false),
        };
        let changed = attached != self.attached || resizable != self.resizable;
        if changed {
            log::debug!("transformer {:?} -> {:?}", self.attached, attached);
        }
        self.attached = attached;
        self.resizable = resizable;
        changed
    }

    /// What the renderer should draw for the transformer, if attached.
    pub fn frame(&self, store: &OverlayStore, measure: &dyn TextMeasure) -> Option<HandleFrame> {
        let key = self.attached?;
        let bounds = store.bounds_of(key, measure)?;
        let rotation = match key {
            OverlayKey::Text(id) => store.text(id).map_or(0.0, |t| t.rotation),
            OverlayKey::Logo => 0.0,
        };
        Some(HandleFrame {
            bounds,
            rotation,
            resizable: self.resizable,
            handle_size: self.handle_size,
        })
    }

    /// Apply a drag-move: clamp, then move.
    pub fn drag(
        &self,
        store: &mut OverlayStore,
        key: OverlayKey,
        proposed: Point,
        size: Size,
    ) -> Commit {
        let origin = clamp_drag(proposed, size, &self.boundary);
        if origin != proposed {
            log::trace!("drag {key:?} clamped {proposed:?} -> {origin:?}");
        }
        store.move_overlay(key, origin)
    }

    /// Apply a resize step, or drop it entirely.
    pub fn resize(&self, store: &mut OverlayStore, key: OverlayKey, proposed: Bounds) -> Commit {
        let resizable = store.placement(key).is_some_and(|p| p.is_resizable());
        if !resizable {
            return Commit::None;
        }
        if !accept_resize(&proposed, &self.boundary, self.min_size) {
            log::trace!("resize {key:?} rejected: {proposed:?}");
            return Commit::None;
        }
        store.resize_overlay(key, proposed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: Bounds = Bounds::new(50.0, 50.0, 700.0, 500.0);

    #[test]
    fn drag_inside_is_untouched() {
        let p = Point::new(100.0, 200.0);
        assert_eq!(clamp_drag(p, Size::new(50.0, 20.0), &BOUNDARY), p);
    }

    #[test]
    fn drag_clamps_each_axis_independently() {
        let size = Size::new(100.0, 40.0);
        assert_eq!(
            clamp_drag(Point::new(10.0, 300.0), size, &BOUNDARY),
            Point::new(50.0, 300.0)
        );
        assert_eq!(
            clamp_drag(Point::new(700.0, 600.0), size, &BOUNDARY),
            Point::new(650.0, 510.0)
        );
    }

    #[test]
    fn oversized_box_pins_to_min_edge() {
        let size = Size::new(900.0, 40.0);
        assert_eq!(
            clamp_drag(Point::new(300.0, 300.0), size, &BOUNDARY),
            Point::new(50.0, 300.0)
        );
    }

    #[test]
    fn non_finite_proposal_pins_to_min_edge() {
        let size = Size::new(10.0, 10.0);
        assert_eq!(
            clamp_drag(Point::new(f32::NAN, f32::INFINITY), size, &BOUNDARY),
            Point::new(50.0, 50.0)
        );
    }

    #[test]
    fn fractional_boundary_right_edge_is_exact() {
        let boundary = Bounds::new(0.1, 3.7, 333.3, 200.0);
        let size = Size::new(14.291, 9.0);
        let p = clamp_drag(Point::new(1000.0, 1000.0), size, &boundary);
        assert!(p.x + size.width <= boundary.right(), "{p:?}");
        assert!(p.y + size.height <= boundary.bottom(), "{p:?}");
    }

    #[test]
    fn fractional_sweep_stays_inside() {
        for k in 0..120 {
            let k = k as f32;
            let boundary = Bounds::new(
                0.1 + 1.3 * k,
                3.7 + 0.37 * k,
                333.3 + 0.71 * k,
                200.9 - 0.53 * k,
            );
            for j in 0..60 {
                let j = j as f32;
                let size = Size::new(0.013 + 5.377 * j, 0.029 + 3.113 * j);
                for proposal in [
                    Point::new(-1.0e4, -1.0e4),
                    Point::new(
                        boundary.right() - size.width + 0.3,
                        boundary.bottom() - size.height + 0.7,
                    ),
                    Point::new(boundary.right() - 0.01, boundary.bottom() - 0.01),
                    Point::new(1.0e4, 1.0e4),
                ] {
                    let p = clamp_drag(proposal, size, &boundary);
                    if size.width <= boundary.width && size.height <= boundary.height {
                        assert!(
                            boundary.contains_bounds(&Bounds::from_origin_size(p, size)),
                            "{boundary:?} {size:?} {proposal:?} -> {p:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn resize_rules() {
        assert!(accept_resize(&Bounds::new(60.0, 60.0, 10.0, 10.0), &BOUNDARY, 10.0));
        assert!(!accept_resize(&Bounds::new(60.0, 60.0, 9.9, 50.0), &BOUNDARY, 10.0));
        assert!(!accept_resize(&Bounds::new(60.0, 60.0, 50.0, 9.0), &BOUNDARY, 10.0));
        assert!(!accept_resize(&Bounds::new(40.0, 60.0, 50.0, 50.0), &BOUNDARY, 10.0));
        assert!(!accept_resize(&Bounds::new(700.0, 60.0, 60.0, 50.0), &BOUNDARY, 10.0));
    }

    #[test]
    fn handle_geometry_anchors_opposite_corner() {
        let start = Bounds::new(100.0, 100.0, 100.0, 100.0);
        assert_eq!(
            resize_from_handle(&start, Handle::BottomRight, 20.0, -10.0),
            Bounds::new(100.0, 100.0, 120.0, 90.0)
        );
        assert_eq!(
            resize_from_handle(&start, Handle::TopLeft, 20.0, -10.0),
            Bounds::new(120.0, 90.0, 80.0, 110.0)
        );
        assert_eq!(
            resize_from_handle(&start, Handle::TopRight, 5.0, 5.0),
            Bounds::new(100.0, 105.0, 105.0, 95.0)
        );
        assert_eq!(
            resize_from_handle(&start, Handle::BottomLeft, 5.0, 5.0),
            Bounds::new(105.0, 100.0, 95.0, 105.0)
        );
    }

    #[test]
    fn sync_follows_selection() {
        let config = EditorConfig::default();
        let mut store = OverlayStore::new(&config);
        let mut ctl = TransformController::new(&config);
        assert!(!ctl.sync(&store));
        assert_eq!(ctl.attached(), None);

        let id = store.add_text();
        assert!(ctl.sync(&store));
        assert_eq!(ctl.attached(), Some(OverlayKey::Text(id)));
        assert!(!ctl.is_resizable());

        store.set_logo(Raster::solid(2, 2, Color::BLACK));
        ctl.sync(&store);
        assert_eq!(ctl.attached(), Some(OverlayKey::Logo));
        assert!(ctl.is_resizable());

        store.delete_logo();
        ctl.sync(&store);
        assert_eq!(ctl.attached(), None);
        assert!(!ctl.is_resizable());
    }

    #[test]
    fn resize_on_text_is_ignored() {
        let config = EditorConfig::default();
        let mut store = OverlayStore::new(&config);
        let ctl = TransformController::new(&config);
        let id = store.add_text();
        let commit = ctl.resize(
            &mut store,
            OverlayKey::Text(id),
            Bounds::new(60.0, 60.0, 100.0, 100.0),
        );
        assert_eq!(commit, Commit::None);
    }
}
