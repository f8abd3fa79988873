//! Overlay data model.
//!
//! The editor session holds one flattened background raster, an ordered
//! sequence of text overlays (later = painted on top), and at most one
//! logo overlay. Both overlay kinds share the `Placement` capability so
//! drag and resize handling can treat them uniformly.

use crate::id::OverlayId;
use crate::measure::TextMeasure;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let short = |i: usize| hex_val(bytes[i]).map(|v| (v * 17) as f32 / 255.0);
        let long =
            |i: usize| Some((hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?) as f32 / 255.0);

        match bytes.len() {
            3 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, 1.0)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// The color as 8-bit channels.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// CSS `rgba(...)` string for Canvas2D fill styles.
    pub fn to_css(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("rgba({r}, {g}, {b}, {})", self.a.clamp(0.0, 1.0))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s:?}")))
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Edges are inclusive.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Whether `other` lies entirely inside `self` (shared edges allowed).
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

// ─── Rasters ─────────────────────────────────────────────────────────────

/// A decoded image: row-major RGBA8 pixels.
#[derive(Clone, PartialEq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Raster {
    /// Wrap a pixel buffer, checking that it matches the dimensions.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    /// A raster filled with one color. Handy for placeholders and tests.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let px = color.to_rgba8();
        let rgba = px.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Raster({}x{})", self.width, self.height)
    }
}

// ─── Fonts ───────────────────────────────────────────────────────────────

/// Font families offered by the editing panel.
pub const FONT_FAMILIES: [&str; 25] = [
    "Arial",
    "Times New Roman",
    "Verdana",
    "Courier New",
    "Georgia",
    "Tahoma",
    "Palatino",
    "Comic Sans MS",
    "Impact",
    "Lucida Console",
    "Trebuchet MS",
    "Arial Black",
    "Garamond",
    "Book Antiqua",
    "Century Gothic",
    "Franklin Gothic Medium",
    "Rockwell",
    "Baskerville",
    "Cambria",
    "Copperplate",
    "Futura",
    "Didot",
    "Helvetica",
    "Open Sans",
    "Roboto",
];

pub fn is_known_font(family: &str) -> bool {
    FONT_FAMILIES.contains(&family)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Bold,
    Italic,
}

impl FontStyle {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bold" => Some(Self::Bold),
            "italic" => Some(Self::Italic),
            _ => None,
        }
    }
}

/// A subset of {bold, italic}, kept sorted so equal sets compare equal
/// no matter the order styles were toggled in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<FontStyle>")]
pub struct FontStyles(SmallVec<[FontStyle; 2]>);

impl FontStyles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, style: FontStyle) -> bool {
        self.0.contains(&style)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FontStyle> + '_ {
        self.0.iter().copied()
    }

    /// Flip membership of `style`.
    pub fn toggle(&mut self, style: FontStyle) {
        match self.0.binary_search(&style) {
            Ok(pos) => {
                self.0.remove(pos);
            }
            Err(pos) => self.0.insert(pos, style),
        }
    }

    /// CSS `font-style`/`font-weight` prefix: `"normal"`, `"bold"`, `"italic"`, `"italic bold"`.
    pub fn to_css(&self) -> &'static str {
        match (self.contains(FontStyle::Bold), self.contains(FontStyle::Italic)) {
            (false, false) => "normal",
            (true, false) => "bold",
            (false, true) => "italic",
            (true, true) => "italic bold",
        }
    }
}

impl FromIterator<FontStyle> for FontStyles {
    fn from_iter<I: IntoIterator<Item = FontStyle>>(iter: I) -> Self {
        let mut styles = FontStyles::new();
        for style in iter {
            if !styles.contains(style) {
                styles.toggle(style);
            }
        }
        styles
    }
}

impl From<Vec<FontStyle>> for FontStyles {
    fn from(styles: Vec<FontStyle>) -> Self {
        styles.into_iter().collect()
    }
}

// ─── Overlays ────────────────────────────────────────────────────────────

/// A user-placed text box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub id: OverlayId,
    pub content: String,
    pub position: Point,
    pub font_size: f32,
    pub color: Color,
    /// Degrees, clockwise, around `position`.
    pub rotation: f32,
    pub font_family: String,
    pub font_style: FontStyles,
}

/// Partial attributes for a shallow merge into a `TextOverlay`.
/// Absent fields leave the overlay untouched.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextPatch {
    pub content: Option<String>,
    pub position: Option<Point>,
    pub font_size: Option<f32>,
    pub color: Option<Color>,
    pub rotation: Option<f32>,
    pub font_family: Option<String>,
    pub font_style: Option<FontStyles>,
}

impl TextPatch {
    /// Merge into `overlay`. Returns whether any field actually changed.
    pub fn apply_to(self, overlay: &mut TextOverlay) -> bool {
        let before = overlay.clone();
        if let Some(content) = self.content {
            overlay.content = content;
        }
        if let Some(position) = self.position {
            overlay.position = position;
        }
        if let Some(size) = self.font_size {
            overlay.font_size = size;
        }
        if let Some(color) = self.color {
            overlay.color = color;
        }
        if let Some(rotation) = self.rotation {
            overlay.rotation = rotation;
        }
        if let Some(family) = self.font_family {
            overlay.font_family = family;
        }
        if let Some(style) = self.font_style {
            overlay.font_style = style;
        }
        *overlay != before
    }
}

/// The single logo image. Existence is the flag; it has no ID.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoOverlay {
    pub image: Raster,
    pub position: Point,
    pub width: f32,
    pub height: f32,
}

impl LogoOverlay {
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position.x, self.position.y, self.width, self.height)
    }
}

// ─── Selection ───────────────────────────────────────────────────────────

/// Which overlay, if any, the transform handle and panel operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Text(OverlayId),
    Logo,
}

impl Selection {
    pub fn target(&self) -> Option<OverlayKey> {
        match *self {
            Selection::None => None,
            Selection::Text(id) => Some(OverlayKey::Text(id)),
            Selection::Logo => Some(OverlayKey::Logo),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

/// Addresses one overlay of either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKey {
    Text(OverlayId),
    Logo,
}

impl From<OverlayKey> for Selection {
    fn from(key: OverlayKey) -> Self {
        match key {
            OverlayKey::Text(id) => Selection::Text(id),
            OverlayKey::Logo => Selection::Logo,
        }
    }
}

/// Corner handles of the transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Handle {
    pub const ALL: [Handle; 4] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
    ];

    /// The handle's anchor point on `b`.
    pub fn anchor(&self, b: &Bounds) -> Point {
        match self {
            Handle::TopLeft => Point::new(b.x, b.y),
            Handle::TopRight => Point::new(b.right(), b.y),
            Handle::BottomLeft => Point::new(b.x, b.bottom()),
            Handle::BottomRight => Point::new(b.right(), b.bottom()),
        }
    }
}

// ─── Placement capability ────────────────────────────────────────────────

/// Shared "positionable, resizable" capability of both overlay kinds.
pub trait Placement {
    fn origin(&self) -> Point;

    fn set_origin(&mut self, origin: Point);

    /// Rendered size. Text depends on font metrics, hence the measure.
    fn size(&self, measure: &dyn TextMeasure) -> Size;

    fn is_resizable(&self) -> bool;

    /// Replace the box. Returns `false` for kinds that cannot be resized.
    fn set_bounds(&mut self, bounds: Bounds) -> bool;

    fn bounds(&self, measure: &dyn TextMeasure) -> Bounds {
        Bounds::from_origin_size(self.origin(), self.size(measure))
    }
}

impl Placement for TextOverlay {
    fn origin(&self) -> Point {
        self.position
    }

    fn set_origin(&mut self, origin: Point) {
        self.position = origin;
    }

    fn size(&self, measure: &dyn TextMeasure) -> Size {
        measure.measure(self)
    }

    fn is_resizable(&self) -> bool {
        false
    }

    fn set_bounds(&mut self, _bounds: Bounds) -> bool {
        false
    }
}

impl Placement for LogoOverlay {
    fn origin(&self) -> Point {
        self.position
    }

    fn set_origin(&mut self, origin: Point) {
        self.position = origin;
    }

    fn size(&self, _measure: &dyn TextMeasure) -> Size {
        Size::new(self.width, self.height)
    }

    fn is_resizable(&self) -> bool {
        true
    }

    fn set_bounds(&mut self, bounds: Bounds) -> bool {
        self.position = bounds.origin();
        self.width = bounds.width;
        self.height = bounds.height;
        true
    }
}
