//! Text metrics seam.
//!
//! The browser bridge measures with Canvas2D; everything else (tests, the
//! native painter) uses the em-based approximation.

use crate::model::{Size, TextOverlay};

/// Reports the rendered, unrotated size of a text overlay.
pub trait TextMeasure {
    fn measure(&self, text: &TextOverlay) -> Size;
}

/// The rendered lines of `content`. Every `\n` starts a line, so a trailing
/// newline adds an empty last line and `""` is one empty line. A `\r`
/// before the break is dropped.
pub fn text_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Average-advance approximation: 0.6 em per character, 1 em per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMeasure;

impl TextMeasure for ApproxMeasure {
    fn measure(&self, text: &TextOverlay) -> Size {
        let lines = text_lines(&text.content);
        let (count, longest) = lines.fold((0usize, 0usize), |(n, widest), line| {
            (n + 1, widest.max(line.chars().count()))
        });
        Size::new(
            // 0.6 em, written as 3/5 so whole-pixel results stay exact.
            longest as f32 * text.font_size * 3.0 / 5.0,
            count as f32 * text.font_size,
        )
    }
}
