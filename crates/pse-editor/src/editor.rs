//! Editor engine.
//!
//! Owns the overlay store, the transform controller and the select tool.
//! Every state change, whether it comes from the panel, a shortcut or a
//! pointer gesture, is expressed as an `EditorAction` and funneled through
//! `Editor::apply`, which runs the post-commit hook on every real change.

use crate::input::{InputEvent, Modifiers};
use crate::panel::{PanelEdit, PanelError, PanelView, parse_field};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{Gesture, Hit, SelectTool};
use crate::transform::TransformController;
use pse_core::decode::{DecodeError, Decoder};
use pse_core::id::OverlayId;
use pse_core::measure::TextMeasure;
use pse_core::model::*;
use pse_core::{Commit, EditorConfig, OverlayStore};
use pse_render::{HandleFrame, PaintNode, build_scene, hit_handle, hit_test};

/// A single editor operation.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    LoadBackground(Raster),
    AddText,
    UpdateText { id: OverlayId, patch: TextPatch },
    ToggleTextStyle { id: OverlayId, style: FontStyle },
    DeleteText { id: OverlayId },
    SetLogo(Raster),
    DeleteLogo,
    Select(Selection),
    /// Move an overlay towards `proposed`, clamped to the boundary.
    Drag {
        key: OverlayKey,
        proposed: Point,
        size: Size,
    },
    /// Replace a resizable overlay's box, if the proposal is acceptable.
    Resize { key: OverlayKey, proposed: Bounds },
    /// Delete whatever is selected.
    DeleteSelected,
}

pub struct Editor {
    config: EditorConfig,
    store: OverlayStore,
    controller: TransformController,
    tool: SelectTool,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let store = OverlayStore::new(&config);
        let controller = TransformController::new(&config);
        Self {
            config,
            store,
            controller,
            tool: SelectTool::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &OverlayStore {
        &self.store
    }

    pub fn controller(&self) -> &TransformController {
        &self.controller
    }

    pub fn selection(&self) -> Selection {
        self.store.selection()
    }

    pub fn gesture(&self) -> Gesture {
        self.tool.gesture()
    }

    // ─── Actions ─────────────────────────────────────────────────────────

    /// Apply one action to the store.
    pub fn apply(&mut self, action: EditorAction) -> Commit {
        let commit = match action {
            EditorAction::LoadBackground(raster) => self.store.load_background(raster),
            EditorAction::AddText => Commit::TextAdded(self.store.add_text()),
            EditorAction::UpdateText { id, patch } => self.store.update_text(id, patch),
            EditorAction::ToggleTextStyle { id, style } => self.store.toggle_text_style(id, style),
            EditorAction::DeleteText { id } => self.store.delete_text(id),
            EditorAction::SetLogo(raster) => self.store.set_logo(raster),
            EditorAction::DeleteLogo => self.store.delete_logo(),
            EditorAction::Select(selection) => self.store.select(selection),
            EditorAction::Drag {
                key,
                proposed,
                size,
            } => self.controller.drag(&mut self.store, key, proposed, size),
            EditorAction::Resize { key, proposed } => {
                self.controller.resize(&mut self.store, key, proposed)
            }
            EditorAction::DeleteSelected => match self.store.selection() {
                Selection::Text(id) => self.store.delete_text(id),
                Selection::Logo => self.store.delete_logo(),
                Selection::None => Commit::None,
            },
        };

        if commit.is_change() {
            self.after_commit(commit);
        }
        commit
    }

    /// Post-commit hook: re-attach the transformer to the selection and
    /// drop gestures whose overlay is gone.
    fn after_commit(&mut self, commit: Commit) {
        log::trace!("commit {commit:?} (revision {})", self.store.revision());
        self.controller.sync(&self.store);

        let gesture_key = match self.tool.gesture() {
            Gesture::Idle => None,
            Gesture::Dragging { key, .. } | Gesture::Resizing { key, .. } => Some(key),
        };
        if let Some(key) = gesture_key
            && !self.store.contains(key)
        {
            self.tool.cancel();
        }
    }

    /// Decode `bytes` as the background. On failure the store is untouched.
    pub fn load_background(
        &mut self,
        bytes: &[u8],
        decoder: &dyn Decoder,
    ) -> Result<Commit, DecodeError> {
        let raster = decoder.decode(bytes).inspect_err(|e| {
            log::warn!("background upload rejected: {e}");
        })?;
        Ok(self.apply(EditorAction::LoadBackground(raster)))
    }

    /// Decode `bytes` as the logo image. On failure the store is untouched.
    pub fn load_logo(&mut self, bytes: &[u8], decoder: &dyn Decoder) -> Result<Commit, DecodeError> {
        let raster = decoder.decode(bytes).inspect_err(|e| {
            log::warn!("logo upload rejected: {e}");
        })?;
        Ok(self.apply(EditorAction::SetLogo(raster)))
    }

    // ─── Panel ───────────────────────────────────────────────────────────

    pub fn panel(&self) -> PanelView {
        PanelView::from_store(&self.store)
    }

    /// Apply one panel form input to the selected text overlay.
    ///
    /// Returns `Commit::None` when no text is selected.
    pub fn apply_panel_edit(&mut self, key: &str, value: &str) -> Result<Commit, PanelError> {
        let edit = parse_field(key, value).inspect_err(|e| {
            log::warn!("panel input rejected: {e}");
        })?;
        let Selection::Text(id) = self.store.selection() else {
            return Ok(Commit::None);
        };
        let action = match edit {
            PanelEdit::Patch(patch) => EditorAction::UpdateText { id, patch },
            PanelEdit::Toggle(style) => EditorAction::ToggleTextStyle { id, style },
        };
        Ok(self.apply(action))
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route an input event. Returns whether anything committed.
    pub fn handle_input(&mut self, event: &InputEvent, measure: &dyn TextMeasure) -> bool {
        if let InputEvent::Key { key, modifiers } = event {
            return self.handle_key(key, *modifiers);
        }

        let hit = match event {
            InputEvent::PointerDown { x, y, .. } => self.hit_at(*x, *y, measure),
            _ => Hit::default(),
        };
        let actions = self.tool.handle(event, hit);
        let mut changed = false;
        for action in actions {
            changed |= self.apply(action).is_change();
        }
        changed
    }

    /// Resolve and run a keyboard shortcut. Returns whether anything committed.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> bool {
        let Some(shortcut) = ShortcutMap::resolve(key, modifiers) else {
            return false;
        };
        let action = match shortcut {
            ShortcutAction::AddText => EditorAction::AddText,
            ShortcutAction::DeleteSelected => EditorAction::DeleteSelected,
            ShortcutAction::Deselect => EditorAction::Select(Selection::None),
            ShortcutAction::ToggleBold | ShortcutAction::ToggleItalic => {
                let Selection::Text(id) = self.store.selection() else {
                    return false;
                };
                let style = if shortcut == ShortcutAction::ToggleBold {
                    FontStyle::Bold
                } else {
                    FontStyle::Italic
                };
                EditorAction::ToggleTextStyle { id, style }
            }
        };
        self.apply(action).is_change()
    }

    fn hit_at(&self, x: f32, y: f32, measure: &dyn TextMeasure) -> Hit {
        let handle = self
            .controller
            .attached()
            .filter(|_| self.controller.is_resizable())
            .and_then(|key| {
                let bounds = self.store.bounds_of(key, measure)?;
                let handle = hit_handle(&bounds, self.config.handle_size, x, y)?;
                Some((key, handle, bounds))
            });

        let nodes = build_scene(&self.store, &self.config, measure);
        let overlay = hit_test(&nodes, x, y).and_then(|key| {
            let bounds = self.store.bounds_of(key, measure)?;
            Some((key, bounds))
        });

        Hit { overlay, handle }
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn scene(&self, measure: &dyn TextMeasure) -> Vec<PaintNode<'_>> {
        build_scene(&self.store, &self.config, measure)
    }

    pub fn frame(&self, measure: &dyn TextMeasure) -> Option<HandleFrame> {
        self.controller.frame(&self.store, measure)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
