// SPDX-License-Identifier: MIT OR Apache-2.0

//! Measured text.
//!
//! A [TextShaper] turns a string plus a [TextStyle] into a [TextSample]: the
//! overall size, one bounding box per character and, when the shaper is backed
//! by parley, the glyph layout the vello backend draws from. Widgets keep
//! samples around and reshape them when their size or text changes.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use parley::Layout;

use crate::geometry::{Point, Rectangle};

mod monospace;
mod parley_shaper;

pub use monospace::MonospaceShaper;
pub use parley_shaper::ParleyShaper;

/// Horizontal alignment of text lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centred.
    Center,
    /// Flush right.
    Right,
}

impl TextAlign {
    /// Offset of an item `used` wide inside `available` space.
    pub fn offset(self, available: f64, used: f64) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => (available - used) * 0.5,
            Self::Right => available - used,
        }
    }
}

/// How text that is too wide is broken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// Only explicit newlines break lines.
    #[default]
    NoWrap,
    /// Break between words to fit the maximum width.
    Word,
}

/// Parameters for shaping a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f32,
    /// Space the text may occupy. Width drives wrapping and alignment.
    pub max_size: Option<Point>,
    /// Alignment of each line.
    pub align: TextAlign,
    /// Line breaking.
    pub wrap: WrapMode,
}

impl TextStyle {
    /// Unbounded, left aligned, unwrapped text of the given size.
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            max_size: None,
            align: TextAlign::Left,
            wrap: WrapMode::NoWrap,
        }
    }

    /// Set the space available to the text.
    pub fn with_max_size(mut self, max_size: Point) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Set the line alignment.
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Set the wrap mode.
    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    pub(crate) fn max_width(&self) -> Option<f64> {
        match self.wrap {
            WrapMode::Word => self.max_size.map(|size| size.x.max(0.0)),
            WrapMode::NoWrap => None,
        }
    }
}

/// Bounds of one character inside a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBox {
    /// Bounds relative to the sample origin.
    pub bounds: Rectangle,
    /// Zero-based line the character sits on.
    pub line: usize,
}

/// A shaped, measured piece of text.
pub struct TextSample {
    text: String,
    size: Point,
    line_height: f64,
    glyphs: Vec<GlyphBox>,
    layout: Option<Layout<[u8; 4]>>,
}

impl std::fmt::Debug for TextSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSample")
            .field("text", &self.text)
            .field("size", &self.size)
            .field("line_height", &self.line_height)
            .field("glyphs", &self.glyphs.len())
            .field("layout", &self.layout.is_some())
            .finish()
    }
}

impl TextSample {
    /// Build a sample from measurements. `glyphs` holds one box per character.
    pub fn from_parts(text: String, size: Point, line_height: f64, glyphs: Vec<GlyphBox>) -> Self {
        debug_assert_eq!(glyphs.len(), text.chars().count());
        Self {
            text,
            size,
            line_height,
            glyphs,
            layout: None,
        }
    }

    /// An empty sample one line tall.
    pub fn empty(line_height: f64) -> Self {
        Self::from_parts(String::new(), Point::new(0.0, line_height), line_height, Vec::new())
    }

    /// Attach the parley layout the sample was measured from.
    pub fn with_layout(mut self, layout: Layout<[u8; 4]>) -> Self {
        self.layout = Some(layout);
        self
    }

    /// The shaped text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Overall size.
    pub fn size(&self) -> Point {
        self.size
    }

    /// Height of one line.
    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Per-character boxes, in character order.
    pub fn glyphs(&self) -> &[GlyphBox] {
        &self.glyphs
    }

    /// The glyph layout, for samples produced by [ParleyShaper].
    pub fn layout(&self) -> Option<&Layout<[u8; 4]>> {
        self.layout.as_ref()
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the sample holds no characters.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Top of the caret placed before character `index`.
    ///
    /// Indices past the end place the caret after the last character.
    pub fn caret_position(&self, index: usize) -> Point {
        match self.glyphs.get(index) {
            Some(glyph) => glyph.bounds.location,
            None => match self.glyphs.last() {
                Some(last) => Point::new(last.bounds.right(), last.bounds.top()),
                None => Point::ZERO,
            },
        }
    }

    /// The caret index closest to `point`, in `0..=len()`.
    pub fn hit_test(&self, point: Point) -> usize {
        let Some(line) = self.closest_line(point.y) else {
            return 0;
        };

        let mut last_on_line = None;
        for (index, glyph) in self.glyphs.iter().enumerate() {
            if glyph.line != line {
                continue;
            }
            if point.x < glyph.bounds.center().x {
                return index;
            }
            last_on_line = Some(index);
        }

        match last_on_line {
            // keep the caret on this line rather than after its line break
            Some(index) if self.char_at(index) == Some('\n') => index,
            Some(index) => index + 1,
            None => 0,
        }
    }

    /// Boxes covering the characters in `range`, merged per line.
    pub fn selection_rects(&self, range: Range<usize>) -> Vec<Rectangle> {
        let mut rects: Vec<(usize, Rectangle)> = Vec::new();
        let end = range.end.min(self.glyphs.len());
        for glyph in self.glyphs.get(range.start.min(end)..end).unwrap_or_default() {
            match rects.last_mut() {
                Some((line, rect)) if *line == glyph.line => {
                    *rect = Rectangle::from_corners(
                        rect.location.min(glyph.bounds.location),
                        rect.end().max(glyph.bounds.end()),
                    );
                },
                _ => rects.push((glyph.line, glyph.bounds)),
            }
        }
        rects.into_iter().map(|(_, rect)| rect).collect()
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.text.chars().nth(index)
    }

    fn closest_line(&self, y: f64) -> Option<usize> {
        self.glyphs
            .iter()
            .map(|glyph| {
                let bounds = glyph.bounds;
                let distance = if y < bounds.top() {
                    bounds.top() - y
                } else if y >= bounds.bottom() {
                    y - bounds.bottom()
                } else {
                    0.0
                };
                (distance, glyph.line)
            })
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, line)| line)
    }
}

/// Produces [TextSample]s.
pub trait TextShaper {
    /// Shape and measure `text`.
    fn shape(&mut self, text: &str, style: &TextStyle) -> TextSample;
}

/// A shaper shared by every widget of one interface.
pub type SharedTextShaper = Rc<RefCell<dyn TextShaper>>;

/// Wrap a shaper for sharing.
pub fn shared(shaper: impl TextShaper + 'static) -> SharedTextShaper {
    Rc::new(RefCell::new(shaper))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(text: &str) -> TextSample {
        // 5px advance, 12.5px lines at size 10
        MonospaceShaper::default().shape(text, &TextStyle::new(10.0))
    }

    #[test]
    fn caret_positions() {
        let sample = sample("abc");
        assert_eq!(sample.caret_position(0), Point::new(0.0, 0.0));
        assert_eq!(sample.caret_position(2), Point::new(10.0, 0.0));
        assert_eq!(sample.caret_position(3), Point::new(15.0, 0.0));
        assert_eq!(sample.caret_position(99), Point::new(15.0, 0.0));
        assert_eq!(TextSample::empty(12.0).caret_position(0), Point::ZERO);
    }

    #[test]
    fn hit_test_rounds_to_nearest_boundary() {
        let sample = sample("abc");
        assert_eq!(sample.hit_test(Point::new(-4.0, 3.0)), 0);
        assert_eq!(sample.hit_test(Point::new(2.0, 3.0)), 0);
        assert_eq!(sample.hit_test(Point::new(3.0, 3.0)), 1);
        assert_eq!(sample.hit_test(Point::new(14.0, 3.0)), 3);
        assert_eq!(sample.hit_test(Point::new(100.0, -50.0)), 3);
    }

    #[test]
    fn hit_test_picks_line_and_stays_before_newline() {
        let sample = sample("ab\ncd");
        // second line
        assert_eq!(sample.hit_test(Point::new(6.0, 15.0)), 4);
        // far right on the first line stops before the newline
        assert_eq!(sample.hit_test(Point::new(80.0, 2.0)), 2);
    }

    #[test]
    fn selection_merges_per_line() {
        let sample = sample("ab\ncd");
        let rects = sample.selection_rects(1..5);
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].left(), 5.0);
        assert_eq!(rects[1], Rectangle::from_xywh(0.0, 12.5, 10.0, 12.5));
        assert!(sample.selection_rects(7..9).is_empty());
    }

    #[test]
    fn align_offsets() {
        assert_eq!(TextAlign::Left.offset(100.0, 40.0), 0.0);
        assert_eq!(TextAlign::Center.offset(100.0, 40.0), 30.0);
        assert_eq!(TextAlign::Right.offset(100.0, 40.0), 60.0);
    }
}
