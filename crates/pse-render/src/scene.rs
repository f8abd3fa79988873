//! Store → ordered paint list.
//!
//! This is everything a renderer needs per frame: background raster,
//! boundary outline, text overlays in insertion order, then the logo.
//! Later entries paint on top.

use pse_core::measure::TextMeasure;
use pse_core::model::*;
use pse_core::{EditorConfig, OverlayStore};

/// Identity of a paintable node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKey {
    Background,
    Boundary,
    Overlay(OverlayKey),
}

#[derive(Debug, Clone, Copy)]
pub enum PaintKind<'a> {
    /// Drawn scaled into the node bounds.
    Raster(&'a Raster),
    /// Stroked rectangle.
    Outline,
    Text(&'a TextOverlay),
}

#[derive(Debug, Clone, Copy)]
pub struct PaintNode<'a> {
    pub key: NodeKey,
    pub bounds: Bounds,
    pub kind: PaintKind<'a>,
}

/// The transformer as drawn: an outline around the attached overlay, plus
/// corner handles when it can be resized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleFrame {
    /// Unrotated box of the attached overlay.
    pub bounds: Bounds,
    /// Degrees clockwise about the box origin, matching how text is drawn.
    pub rotation: f32,
    pub resizable: bool,
    pub handle_size: f32,
}

/// Build the paint list for the current store state.
pub fn build_scene<'a>(
    store: &'a OverlayStore,
    config: &EditorConfig,
    measure: &dyn TextMeasure,
) -> Vec<PaintNode<'a>> {
    let mut nodes = Vec::with_capacity(store.texts().len() + 3);

    if let Some(bg) = store.background() {
        nodes.push(PaintNode {
            key: NodeKey::Background,
            bounds: Bounds::from_origin_size(Point::default(), bg.size()),
            kind: PaintKind::Raster(bg),
        });
    }

    nodes.push(PaintNode {
        key: NodeKey::Boundary,
        bounds: config.boundary,
        kind: PaintKind::Outline,
    });

    for text in store.texts() {
        nodes.push(PaintNode {
            key: NodeKey::Overlay(OverlayKey::Text(text.id)),
            bounds: text.bounds(measure),
            kind: PaintKind::Text(text),
        });
    }

    if let Some(logo) = store.logo() {
        nodes.push(PaintNode {
            key: NodeKey::Overlay(OverlayKey::Logo),
            bounds: logo.bounds(),
            kind: PaintKind::Raster(&logo.image),
        });
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pse_core::ApproxMeasure;

    #[test]
    fn paint_order_is_background_boundary_texts_logo() {
        let config = EditorConfig::default();
        let mut store = OverlayStore::new(&config);
        store.load_background(Raster::solid(800, 600, Color::BLACK));
        store.set_logo(Raster::solid(4, 4, Color::BLACK));
        let a = store.add_text();
        let b = store.add_text();

        let keys: Vec<NodeKey> = build_scene(&store, &config, &ApproxMeasure)
            .iter()
            .map(|n| n.key)
            .collect();
        assert_eq!(
            keys,
            vec![
                NodeKey::Background,
                NodeKey::Boundary,
                NodeKey::Overlay(OverlayKey::Text(a)),
                NodeKey::Overlay(OverlayKey::Text(b)),
                NodeKey::Overlay(OverlayKey::Logo),
            ]
        );
    }

    #[test]
    fn boundary_is_painted_without_background() {
        let config = EditorConfig::default();
        let store = OverlayStore::new(&config);
        let nodes = build_scene(&store, &config, &ApproxMeasure);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].key, NodeKey::Boundary);
        assert_eq!(nodes[0].bounds, config.boundary);
    }

    #[test]
    fn text_bounds_come_from_measure() {
        let config = EditorConfig::default();
        let mut store = OverlayStore::new(&config);
        store.add_text();
        let nodes = build_scene(&store, &config, &ApproxMeasure);
        // "Your Text Here" is 14 chars at 20px.
        assert_eq!(nodes[1].bounds, Bounds::new(50.0, 50.0, 168.0, 20.0));
    }
}
