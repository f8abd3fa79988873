//! Pointer gestures on the stage.
//!
//! The select tool translates pointer events into `EditorAction`s that the
//! `Editor` applies. It never touches the store itself; everything it knows
//! about the stage arrives through a `Hit` computed by the editor.

use crate::editor::EditorAction;
use crate::input::InputEvent;
use crate::transform::resize_from_handle;
use pse_core::model::*;

/// What lies under the pointer at pointer-down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hit {
    /// Topmost overlay and its current box.
    pub overlay: Option<(OverlayKey, Bounds)>,
    /// Resize handle of the attached overlay, with the overlay's box.
    /// Only set when the attached overlay is resizable.
    pub handle: Option<(OverlayKey, Handle, Bounds)>,
}

/// In-progress gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        key: OverlayKey,
        /// Pointer position relative to the overlay origin at grab time.
        grab: Point,
        size: Size,
    },
    Resizing {
        key: OverlayKey,
        handle: Handle,
        start: Bounds,
        press: Point,
    },
}

// ─── Select Tool ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SelectTool {
    gesture: Gesture,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Drop any in-progress gesture, e.g. when its overlay was deleted.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Handle a pointer event, returning zero or more actions.
    pub fn handle(&mut self, event: &InputEvent, hit: Hit) -> Vec<EditorAction> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                if let Some((key, handle, start)) = hit.handle {
                    self.gesture = Gesture::Resizing {
                        key,
                        handle,
                        start,
                        press: Point::new(*x, *y),
                    };
                    return vec![];
                }

                match hit.overlay {
                    Some((key, bounds)) => {
                        self.gesture = Gesture::Dragging {
                            key,
                            grab: Point::new(x - bounds.x, y - bounds.y),
                            size: bounds.size(),
                        };
                        vec![EditorAction::Select(key.into())]
                    }
                    None => {
                        self.gesture = Gesture::Idle;
                        vec![EditorAction::Select(Selection::None)]
                    }
                }
            }
            InputEvent::PointerMove { x, y, .. } => match self.gesture {
                Gesture::Idle => vec![],
                Gesture::Dragging { key, grab, size } => vec![EditorAction::Drag {
                    key,
                    proposed: Point::new(x - grab.x, y - grab.y),
                    size,
                }],
                Gesture::Resizing {
                    key,
                    handle,
                    start,
                    press,
                } => vec![EditorAction::Resize {
                    key,
                    proposed: resize_from_handle(&start, handle, x - press.x, y - press.y),
                }],
            },
            InputEvent::PointerUp { .. } => {
                self.gesture = Gesture::Idle;
                vec![]
            }
            InputEvent::Key { .. } => vec![],
        }
    }
}
