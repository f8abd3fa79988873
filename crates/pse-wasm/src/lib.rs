//! WASM bridge for PSE — exposes the overlay editor to the browser page.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the file
//! pickers, the `<canvas>` and the panel form; everything else lives here.

mod logger;
mod render2d;

use pse_core::measure::{ApproxMeasure, TextMeasure};
use pse_core::model::{FONT_FAMILIES, FontStyle, Selection, TextPatch};
use pse_core::{Commit, EditorConfig, ImageDecoder, OverlayId, PsdDecoder};
use pse_editor::input::{InputEvent, Modifiers};
use pse_editor::panel::validate_patch;
use pse_editor::{Editor, EditorAction};
use render2d::{CanvasMeasure, RasterCache};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// Page-level options read from the same JSON as the editor config.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PageOptions {
    log_level: Option<String>,
}

/// The main WASM-facing editor handle.
///
/// Holds the editor engine and the raster cache. All interaction from the
/// page goes through this struct.
#[wasm_bindgen]
pub struct PsdEditor {
    editor: Editor,
    cache: RasterCache,
    /// Context of the last `render` call; used for text metrics.
    ctx: Option<CanvasRenderingContext2d>,
}

#[wasm_bindgen]
impl PsdEditor {
    /// Create an editor from a JSON config (`""` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<PsdEditor, JsError> {
        console_error_panic_hook_setup();

        let options: PageOptions = if config_json.trim().is_empty() {
            PageOptions::default()
        } else {
            serde_json::from_str(config_json).unwrap_or_default()
        };
        let level = options.log_level.as_deref().map_or(log::LevelFilter::Info, logger::parse_level);
        logger::init(level);

        let config = EditorConfig::from_json(config_json).map_err(|e| JsError::new(&e))?;
        log::info!(
            "editor ready: stage {}x{}, boundary {:?}",
            config.stage.width,
            config.stage.height,
            config.boundary
        );
        Ok(Self {
            editor: Editor::new(config),
            cache: RasterCache::default(),
            ctx: None,
        })
    }

    pub fn stage_width(&self) -> f32 {
        self.editor.config().stage.width
    }

    pub fn stage_height(&self) -> f32 {
        self.editor.config().stage.height
    }

    // ─── Uploads ─────────────────────────────────────────────────────────

    /// Decode a PSD and make its composite the background.
    /// Throws on malformed input; the page may retry with another file.
    pub fn load_psd(&mut self, bytes: &[u8]) -> Result<(), JsError> {
        self.editor.load_background(bytes, &PsdDecoder)?;
        self.cache.invalidate_background();
        Ok(())
    }

    /// Decode a PNG/JPEG/GIF/BMP/WebP and make it the logo.
    pub fn load_logo(&mut self, bytes: &[u8]) -> Result<(), JsError> {
        self.editor.load_logo(bytes, &ImageDecoder)?;
        self.cache.invalidate_logo();
        Ok(())
    }

    // ─── Overlay operations ──────────────────────────────────────────────

    /// Append a text overlay with default attributes. Returns its id.
    pub fn add_text(&mut self) -> String {
        match self.editor.apply(EditorAction::AddText) {
            Commit::TextAdded(id) => id.as_str().to_string(),
            _ => String::new(),
        }
    }

    /// Merge a JSON patch (`{"content": "...", "fontSize": 24, ...}`)
    /// into the text overlay with `id`. Returns whether anything changed.
    pub fn update_text(&mut self, id: &str, patch_json: &str) -> Result<bool, JsError> {
        let patch: TextPatch = serde_json::from_str(patch_json)?;
        validate_patch(&patch)?;
        let Some(id) = self.text_id(id) else {
            return Ok(false);
        };
        Ok(self.changed(EditorAction::UpdateText { id, patch }))
    }

    /// Apply one panel input to the selected text overlay.
    pub fn set_selected_prop(&mut self, key: &str, value: &str) -> Result<bool, JsError> {
        Ok(self.editor.apply_panel_edit(key, value)?.is_change())
    }

    /// Toggle `"bold"` or `"italic"` on the text overlay with `id`.
    pub fn toggle_text_style(&mut self, id: &str, style: &str) -> Result<bool, JsError> {
        let style =
            FontStyle::from_name(style).ok_or_else(|| JsError::new(&format!("unknown style {style:?}")))?;
        let Some(id) = self.text_id(id) else {
            return Ok(false);
        };
        Ok(self.changed(EditorAction::ToggleTextStyle { id, style }))
    }

    pub fn delete_text(&mut self, id: &str) -> bool {
        let Some(id) = self.text_id(id) else {
            return false;
        };
        self.changed(EditorAction::DeleteText { id })
    }

    pub fn delete_logo(&mut self) -> bool {
        let changed = self.changed(EditorAction::DeleteLogo);
        self.cache.invalidate_logo();
        changed
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select_text(&mut self, id: &str) -> bool {
        let Some(id) = self.text_id(id) else {
            return false;
        };
        self.changed(EditorAction::Select(Selection::Text(id)))
    }

    pub fn select_logo(&mut self) -> bool {
        self.changed(EditorAction::Select(Selection::Logo))
    }

    pub fn deselect(&mut self) -> bool {
        self.changed(EditorAction::Select(Selection::None))
    }

    /// Current selection as JSON: `{"kind":"none"}`, `{"kind":"text","id":"..."}`
    /// or `{"kind":"logo"}`.
    pub fn selection_json(&self) -> String {
        selection_value(self.editor.selection()).to_string()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Handle pointer down. Returns true if the store changed.
    pub fn handle_pointer_down(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.input(InputEvent::PointerDown { x, y, modifiers })
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.input(InputEvent::PointerMove { x, y, modifiers })
    }

    pub fn handle_pointer_up(
        &mut self,
        x: f32,
        y: f32,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.input(InputEvent::PointerUp { x, y, modifiers })
    }

    /// Handle a keyboard event from outside the panel inputs.
    /// Returns true if the store changed.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        let changed = self
            .editor
            .handle_key(key, modifiers(shift, ctrl, alt, meta));
        if changed && self.editor.store().logo().is_none() {
            self.cache.invalidate_logo();
        }
        changed
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Render the stage to a Canvas2D context.
    pub fn render(&mut self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        self.ctx = Some(ctx.clone());
        let measure = CanvasMeasure::new(ctx);
        let nodes = self.editor.scene(&measure);
        let frame = self.editor.frame(&measure);
        render2d::render_scene(
            ctx,
            self.editor.config().stage,
            &nodes,
            frame.as_ref(),
            &mut self.cache,
        )
    }

    // ─── Properties Panel API ────────────────────────────────────────────

    /// Panel contents for the current selection, as JSON.
    pub fn panel_json(&self) -> String {
        serde_json::to_string(&self.editor.panel())
            .unwrap_or_else(|_| r#"{"kind":"hidden"}"#.to_string())
    }

    /// Font families offered by the panel's dropdown, as a JSON array.
    pub fn font_families_json(&self) -> String {
        serde_json::Value::from(FONT_FAMILIES.to_vec()).to_string()
    }
}

impl PsdEditor {
    fn changed(&mut self, action: EditorAction) -> bool {
        self.editor.apply(action).is_change()
    }

    fn input(&mut self, event: InputEvent) -> bool {
        let measure = measure_for(&self.ctx);
        self.editor.handle_input(&event, measure.as_ref())
    }

    /// Resolve a page-supplied id to an existing text overlay.
    fn text_id(&self, id: &str) -> Option<OverlayId> {
        let id = OverlayId::lookup(id)?;
        self.editor.store().text(id).map(|t| t.id)
    }
}

fn measure_for(ctx: &Option<CanvasRenderingContext2d>) -> Box<dyn TextMeasure + '_> {
    match ctx {
        Some(ctx) => Box::new(CanvasMeasure::new(ctx)),
        None => Box::new(ApproxMeasure),
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn selection_value(selection: Selection) -> serde_json::Value {
    match selection {
        Selection::None => serde_json::json!({ "kind": "none" }),
        Selection::Text(id) => serde_json::json!({ "kind": "text", "id": id.as_str() }),
        Selection::Logo => serde_json::json!({ "kind": "logo" }),
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("PSE WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
