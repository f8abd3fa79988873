//! Editing-panel boundary.
//!
//! The panel is a set of plain form inputs bound to the selected overlay.
//! Form values arrive as strings; they are coerced and validated here so
//! the store only ever receives well-formed patches.

use pse_core::id::OverlayId;
use pse_core::model::*;
use pse_core::OverlayStore;
use serde::Serialize;
use std::fmt;

/// What the panel shows for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PanelView {
    /// Nothing selected: the panel is hidden.
    Hidden,
    #[serde(rename_all = "camelCase")]
    Text {
        id: OverlayId,
        content: String,
        font_size: f32,
        color: Color,
        rotation: f32,
        font_family: String,
        bold: bool,
        italic: bool,
    },
    #[serde(rename_all = "camelCase")]
    Logo {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

impl PanelView {
    pub fn from_store(store: &OverlayStore) -> Self {
        match store.selection() {
            Selection::None => PanelView::Hidden,
            Selection::Text(id) => match store.text(id) {
                Some(t) => PanelView::Text {
                    id,
                    content: t.content.clone(),
                    font_size: t.font_size,
                    color: t.color,
                    rotation: t.rotation,
                    font_family: t.font_family.clone(),
                    bold: t.font_style.contains(FontStyle::Bold),
                    italic: t.font_style.contains(FontStyle::Italic),
                },
                None => PanelView::Hidden,
            },
            Selection::Logo => match store.logo() {
                Some(l) => PanelView::Logo {
                    x: l.position.x,
                    y: l.position.y,
                    width: l.width,
                    height: l.height,
                },
                None => PanelView::Hidden,
            },
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, PanelView::Hidden)
    }
}

/// A validated panel edit, ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEdit {
    Patch(TextPatch),
    Toggle(FontStyle),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelError {
    UnknownField(String),
    NotANumber { field: &'static str, value: String },
    OutOfRange { field: &'static str, value: f32 },
    InvalidColor(String),
    UnknownFont(String),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelError::UnknownField(key) => write!(f, "unknown panel field {key:?}"),
            PanelError::NotANumber { field, value } => {
                write!(f, "{field} must be a number, got {value:?}")
            }
            PanelError::OutOfRange { field, value } => write!(f, "{field} out of range: {value}"),
            PanelError::InvalidColor(value) => write!(f, "invalid color {value:?}"),
            PanelError::UnknownFont(value) => write!(f, "unknown font family {value:?}"),
        }
    }
}

impl std::error::Error for PanelError {}

/// Coerce one form input into a panel edit.
///
/// Keys are the panel's field names: `content`, `fontSize`, `color`,
/// `rotation`, `fontFamily`, plus the `bold` / `italic` toggles.
pub fn parse_field(key: &str, value: &str) -> Result<PanelEdit, PanelError> {
    let patch = match key {
        "content" => TextPatch {
            content: Some(value.to_string()),
            ..Default::default()
        },
        "fontSize" => {
            let size = parse_number("fontSize", value)?;
            if size <= 0.0 {
                return Err(PanelError::OutOfRange {
                    field: "fontSize",
                    value: size,
                });
            }
            TextPatch {
                font_size: Some(size),
                ..Default::default()
            }
        }
        "rotation" => TextPatch {
            rotation: Some(parse_number("rotation", value)?),
            ..Default::default()
        },
        "color" => {
            let color =
                Color::from_hex(value.trim()).ok_or_else(|| PanelError::InvalidColor(value.into()))?;
            TextPatch {
                color: Some(color),
                ..Default::default()
            }
        }
        "fontFamily" => {
            if !is_known_font(value) {
                return Err(PanelError::UnknownFont(value.into()));
            }
            TextPatch {
                font_family: Some(value.to_string()),
                ..Default::default()
            }
        }
        "bold" => return Ok(PanelEdit::Toggle(FontStyle::Bold)),
        "italic" => return Ok(PanelEdit::Toggle(FontStyle::Italic)),
        _ => return Err(PanelError::UnknownField(key.to_string())),
    };
    Ok(PanelEdit::Patch(patch))
}

/// Check a patch that arrived as JSON rather than through `parse_field`.
pub fn validate_patch(patch: &TextPatch) -> Result<(), PanelError> {
    if let Some(size) = patch.font_size
        && !(size.is_finite() && size > 0.0)
    {
        return Err(PanelError::OutOfRange {
            field: "fontSize",
            value: size,
        });
    }
    if let Some(rotation) = patch.rotation
        && !rotation.is_finite()
    {
        return Err(PanelError::OutOfRange {
            field: "rotation",
            value: rotation,
        });
    }
    if let Some(family) = &patch.font_family
        && !is_known_font(family)
    {
        return Err(PanelError::UnknownFont(family.clone()));
    }
    Ok(())
}

fn parse_number(field: &'static str, value: &str) -> Result<f32, PanelError> {
    let n: f32 = value.trim().parse().map_err(|_| PanelError::NotANumber {
        field,
        value: value.to_string(),
    })?;
    if !n.is_finite() {
        return Err(PanelError::NotANumber {
            field,
            value: value.to_string(),
        });
    }
    Ok(n)
}
