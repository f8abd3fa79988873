//! Overlay state store.
//!
//! The single owner of session state: the background raster, the text
//! overlays in paint order, the optional logo, and the selection. Every
//! mutation goes through a method here; each one is total (absent targets
//! are no-ops) and reports what it changed as a `Commit` so the editor can
//! run its post-commit synchronization.
//!
//! Invariant: `selection` never names an overlay that does not exist.

use crate::config::{EditorConfig, TextDefaults};
use crate::id::OverlayId;
use crate::measure::TextMeasure;
use crate::model::*;

/// What a store operation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Nothing changed (absent target, or the values were already equal).
    None,
    Background,
    TextAdded(OverlayId),
    TextUpdated(OverlayId),
    TextDeleted(OverlayId),
    LogoSet,
    LogoDeleted,
    Moved(OverlayKey),
    Resized(OverlayKey),
    Selected(Selection),
}

impl Commit {
    pub fn is_change(&self) -> bool {
        !matches!(self, Commit::None)
    }
}

#[derive(Debug, Clone)]
pub struct OverlayStore {
    background: Option<Raster>,
    texts: Vec<TextOverlay>,
    logo: Option<LogoOverlay>,
    selection: Selection,
    text_defaults: TextDefaults,
    logo_box: Bounds,
    revision: u64,
}

impl Default for OverlayStore {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl OverlayStore {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            background: None,
            texts: Vec::new(),
            logo: None,
            selection: Selection::None,
            text_defaults: config.text_defaults.clone(),
            logo_box: config.logo_box,
            revision: 0,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn background(&self) -> Option<&Raster> {
        self.background.as_ref()
    }

    /// Text overlays in paint order (last = topmost).
    pub fn texts(&self) -> &[TextOverlay] {
        &self.texts
    }

    pub fn text(&self, id: OverlayId) -> Option<&TextOverlay> {
        self.texts.iter().find(|t| t.id == id)
    }

    pub fn logo(&self) -> Option<&LogoOverlay> {
        self.logo.as_ref()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Number of committed changes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, key: OverlayKey) -> bool {
        self.placement(key).is_some()
    }

    /// The overlay behind `key`, viewed through its placement capability.
    pub fn placement(&self, key: OverlayKey) -> Option<&dyn Placement> {
        match key {
            OverlayKey::Text(id) => self.text(id).map(|t| t as &dyn Placement),
            OverlayKey::Logo => self.logo.as_ref().map(|l| l as &dyn Placement),
        }
    }

    /// Current box of an overlay, if it exists.
    pub fn bounds_of(&self, key: OverlayKey, measure: &dyn TextMeasure) -> Option<Bounds> {
        self.placement(key).map(|p| p.bounds(measure))
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Replace the background wholesale.
    pub fn load_background(&mut self, raster: Raster) -> Commit {
        log::debug!("background replaced: {raster:?}");
        self.background = Some(raster);
        self.commit(Commit::Background)
    }

    /// Append a text overlay with default attributes and select it.
    pub fn add_text(&mut self) -> OverlayId {
        let id = OverlayId::with_prefix("text");
        let d = &self.text_defaults;
        self.texts.push(TextOverlay {
            id,
            content: d.content.clone(),
            position: d.position,
            font_size: d.font_size,
            color: d.color,
            rotation: d.rotation,
            font_family: d.font_family.clone(),
            font_style: FontStyles::new(),
        });
        self.selection = Selection::Text(id);
        log::debug!("text added: {id}");
        self.commit(Commit::TextAdded(id));
        id
    }

    /// Shallow-merge `patch` into the overlay with `id`.
    pub fn update_text(&mut self, id: OverlayId, patch: TextPatch) -> Commit {
        let Some(text) = self.text_mut(id) else {
            return Commit::None;
        };
        if patch.apply_to(text) {
            self.commit(Commit::TextUpdated(id))
        } else {
            Commit::None
        }
    }

    /// Flip `style` in the overlay's style set.
    pub fn toggle_text_style(&mut self, id: OverlayId, style: FontStyle) -> Commit {
        let Some(text) = self.text_mut(id) else {
            return Commit::None;
        };
        text.font_style.toggle(style);
        self.commit(Commit::TextUpdated(id))
    }

    /// Remove the overlay; clears the selection if it pointed at it.
    pub fn delete_text(&mut self, id: OverlayId) -> Commit {
        let Some(pos) = self.texts.iter().position(|t| t.id == id) else {
            return Commit::None;
        };
        self.texts.remove(pos);
        if self.selection == Selection::Text(id) {
            self.selection = Selection::None;
        }
        log::debug!("text deleted: {id}");
        self.commit(Commit::TextDeleted(id))
    }

    /// Create the logo at the default box, or swap the image of the existing
    /// one in place. The logo becomes the selection either way.
    pub fn set_logo(&mut self, image: Raster) -> Commit {
        match self.logo.as_mut() {
            Some(logo) => logo.image = image,
            None => {
                self.logo = Some(LogoOverlay {
                    image,
                    position: self.logo_box.origin(),
                    width: self.logo_box.width,
                    height: self.logo_box.height,
                })
            }
        }
        self.selection = Selection::Logo;
        self.commit(Commit::LogoSet)
    }

    /// Remove the logo and clear the selection, whatever it pointed at.
    pub fn delete_logo(&mut self) -> Commit {
        let had_logo = self.logo.take().is_some();
        let previous = std::mem::take(&mut self.selection);
        if let Selection::Text(id) = previous {
            // Observed behavior, kept pending a product decision.
            log::debug!("delete_logo cleared unrelated text selection {id}");
        }
        if had_logo || !previous.is_none() {
            self.commit(Commit::LogoDeleted)
        } else {
            Commit::None
        }
    }

    /// Point the selection at an existing overlay, or clear it.
    pub fn select(&mut self, selection: Selection) -> Commit {
        if let Some(key) = selection.target()
            && !self.contains(key)
        {
            log::debug!("ignoring selection of missing overlay {key:?}");
            return Commit::None;
        }
        if self.selection == selection {
            return Commit::None;
        }
        self.selection = selection;
        self.commit(Commit::Selected(selection))
    }

    /// Move an overlay's origin. Callers clamp first.
    pub fn move_overlay(&mut self, key: OverlayKey, origin: Point) -> Commit {
        let Some(placement) = self.placement_mut(key) else {
            return Commit::None;
        };
        if placement.origin() == origin {
            return Commit::None;
        }
        placement.set_origin(origin);
        self.commit(Commit::Moved(key))
    }

    /// Replace a resizable overlay's box. Text overlays are left alone.
    pub fn resize_overlay(&mut self, key: OverlayKey, bounds: Bounds) -> Commit {
        let Some(placement) = self.placement_mut(key) else {
            return Commit::None;
        };
        if placement.set_bounds(bounds) {
            self.commit(Commit::Resized(key))
        } else {
            Commit::None
        }
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn text_mut(&mut self, id: OverlayId) -> Option<&mut TextOverlay> {
        self.texts.iter_mut().find(|t| t.id == id)
    }

    fn placement_mut(&mut self, key: OverlayKey) -> Option<&mut dyn Placement> {
        match key {
            OverlayKey::Text(id) => self.text_mut(id).map(|t| t as &mut dyn Placement),
            OverlayKey::Logo => self.logo.as_mut().map(|l| l as &mut dyn Placement),
        }
    }

    fn commit(&mut self, commit: Commit) -> Commit {
        self.revision += 1;
        commit
    }
}
