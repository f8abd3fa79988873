//! Editor configuration.
//!
//! Every field has a default, so the host page may pass a partial JSON
//! object (or nothing) when constructing the editor.

use crate::model::{Bounds, Color, Point};
use serde::{Deserialize, Serialize};

/// The stage (canvas) dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// Attributes given to a freshly added text overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextDefaults {
    pub content: String,
    pub font_size: f32,
    pub color: Color,
    pub rotation: f32,
    pub font_family: String,
    pub position: Point,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            content: "Your Text Here".to_string(),
            font_size: 20.0,
            color: Color::BLACK,
            rotation: 0.0,
            font_family: "Arial".to_string(),
            position: Point::new(50.0, 50.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub stage: Viewport,
    /// Overlays must stay inside this rectangle after a drag or resize.
    pub boundary: Bounds,
    /// Smallest logo side a resize may produce.
    pub min_logo_size: f32,
    pub text_defaults: TextDefaults,
    /// Where a newly uploaded logo is placed.
    pub logo_box: Bounds,
    /// Side length of a transformer corner handle.
    pub handle_size: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            stage: Viewport::default(),
            boundary: Bounds::new(50.0, 50.0, 700.0, 500.0),
            min_logo_size: 10.0,
            text_defaults: TextDefaults::default(),
            logo_box: Bounds::new(100.0, 100.0, 100.0, 100.0),
            handle_size: 8.0,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON config. An empty string yields defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("invalid editor config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the geometric invariants the controller relies on.
    pub fn validate(&self) -> Result<(), String> {
        let stage = Bounds::new(0.0, 0.0, self.stage.width, self.stage.height);
        if !positive(self.stage.width) || !positive(self.stage.height) {
            return Err("stage must have a positive size".to_string());
        }
        if !positive(self.boundary.width) || !positive(self.boundary.height) {
            return Err("boundary must have a positive size".to_string());
        }
        if !stage.contains_bounds(&self.boundary) {
            return Err(format!(
                "boundary {:?} does not fit inside the {}x{} stage",
                self.boundary, self.stage.width, self.stage.height
            ));
        }
        if !positive(self.min_logo_size) {
            return Err("minLogoSize must be positive".to_string());
        }
        if !positive(self.text_defaults.font_size) {
            return Err("textDefaults.fontSize must be positive".to_string());
        }
        if !positive(self.handle_size) {
            return Err("handleSize must be positive".to_string());
        }
        Ok(())
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}
