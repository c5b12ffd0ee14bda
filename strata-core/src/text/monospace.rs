use super::{GlyphBox, TextSample, TextShaper, TextStyle};
use crate::geometry::{Point, Rectangle};

/// A shaper with a fixed advance per character.
///
/// It needs no fonts, which makes it the shaper of choice for headless hosts
/// and tests. Samples it produces carry no glyph layout, so the vello backend
/// skips them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceShaper {
    /// Character advance as a fraction of the font size.
    pub advance: f64,
    /// Line height as a fraction of the font size.
    pub line_height: f64,
}

impl Default for MonospaceShaper {
    fn default() -> Self {
        Self {
            advance: 0.5,
            line_height: 1.25,
        }
    }
}

impl MonospaceShaper {
    /// Create a shaper with the given advance and line height ratios.
    pub fn new(advance: f64, line_height: f64) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

struct Line {
    chars: Vec<(usize, char)>,
    // width without trailing whitespace
    width: f64,
}

impl MonospaceShaper {
    fn break_lines(&self, text: &str, advance: f64, max_width: Option<f64>) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut index = 0;

        for paragraph in text.split_inclusive('\n') {
            let mut current: Vec<(usize, char)> = Vec::new();
            let mut word: Vec<(usize, char)> = Vec::new();
            let mut in_space = false;

            for ch in paragraph.chars() {
                let is_space = ch.is_whitespace();
                // a word is its letters plus the whitespace after them
                if !is_space && in_space {
                    Self::place_word(&mut lines, &mut current, &mut word, advance, max_width);
                }
                in_space = is_space;
                word.push((index, ch));
                index += 1;
            }
            Self::place_word(&mut lines, &mut current, &mut word, advance, max_width);
            lines.push(Self::finish(current, advance));
        }

        if text.is_empty() || text.ends_with('\n') {
            lines.push(Self::finish(Vec::new(), advance));
        }
        lines
    }

    fn place_word(
        lines: &mut Vec<Line>,
        current: &mut Vec<(usize, char)>,
        word: &mut Vec<(usize, char)>,
        advance: f64,
        max_width: Option<f64>,
    ) {
        if word.is_empty() {
            return;
        }
        let Some(max_width) = max_width else {
            current.append(word);
            return;
        };

        let visible = |chars: &[(usize, char)]| {
            chars.iter().filter(|(_, c)| !c.is_whitespace()).count() as f64 * advance
        };
        if !current.is_empty() && visible(current) + visible(word) > max_width {
            lines.push(Self::finish(std::mem::take(current), advance));
        }
        // words wider than a whole line are split between characters
        for entry in word.drain(..) {
            if !current.is_empty() && !entry.1.is_whitespace() && visible(current) + advance > max_width {
                lines.push(Self::finish(std::mem::take(current), advance));
            }
            current.push(entry);
        }
    }

    fn finish(chars: Vec<(usize, char)>, advance: f64) -> Line {
        let visible = chars
            .iter()
            .rposition(|(_, c)| !c.is_whitespace())
            .map_or(0, |last| last + 1);
        Line {
            width: visible as f64 * advance,
            chars,
        }
    }
}

impl TextShaper for MonospaceShaper {
    fn shape(&mut self, text: &str, style: &TextStyle) -> TextSample {
        let font_size = f64::from(style.font_size);
        let advance = font_size * self.advance;
        let line_height = font_size * self.line_height;
        let lines = self.break_lines(text, advance, style.max_width());

        let widest = lines.iter().map(|line| line.width).fold(0.0, f64::max);
        let span = match style.max_size {
            Some(max) if style.align != super::TextAlign::Left => max.x.max(widest),
            _ => widest,
        };

        let mut glyphs = Vec::with_capacity(text.chars().count());
        for (line_index, line) in lines.iter().enumerate() {
            let mut x = style.align.offset(span, line.width);
            let y = line_index as f64 * line_height;
            for &(_, ch) in &line.chars {
                let width = if ch == '\n' { 0.0 } else { advance };
                glyphs.push(GlyphBox {
                    bounds: Rectangle::from_xywh(x, y, width, line_height),
                    line: line_index,
                });
                x += width;
            }
        }

        let size = Point::new(span, lines.len() as f64 * line_height);
        TextSample::from_parts(text.to_string(), size, line_height, glyphs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{TextAlign, WrapMode};

    #[test]
    fn measures_single_line() {
        let sample = MonospaceShaper::default().shape("hello", &TextStyle::new(16.0));
        assert_eq!(sample.size(), Point::new(40.0, 20.0));
        assert_eq!(sample.len(), 5);
        assert_eq!(sample.glyphs()[4].bounds, Rectangle::from_xywh(32.0, 0.0, 8.0, 20.0));
    }

    #[test]
    fn empty_text_is_one_line_tall() {
        let sample = MonospaceShaper::default().shape("", &TextStyle::new(16.0));
        assert_eq!(sample.size(), Point::new(0.0, 20.0));
        assert!(sample.is_empty());
    }

    #[test]
    fn trailing_newline_opens_a_line() {
        let sample = MonospaceShaper::default().shape("ab\n", &TextStyle::new(16.0));
        assert_eq!(sample.size(), Point::new(16.0, 40.0));
    }

    #[test]
    fn wraps_between_words() {
        let style = TextStyle::new(10.0)
            .with_wrap(WrapMode::Word)
            .with_max_size(Point::new(20.0, 100.0));
        // "aaa " fits in 20px (trailing space does not count), "bb" goes below
        let sample = MonospaceShaper::default().shape("aaa bb", &style);
        let lines: Vec<usize> = sample.glyphs().iter().map(|g| g.line).collect();
        assert_eq!(lines, vec![0, 0, 0, 0, 1, 1]);
        assert_eq!(sample.size().y, 25.0);
    }

    #[test]
    fn splits_long_words() {
        let style = TextStyle::new(10.0)
            .with_wrap(WrapMode::Word)
            .with_max_size(Point::new(10.0, 100.0));
        let sample = MonospaceShaper::default().shape("abcde", &style);
        let lines: Vec<usize> = sample.glyphs().iter().map(|g| g.line).collect();
        assert_eq!(lines, vec![0, 0, 1, 1, 2]);
    }

    #[test]
    fn centers_within_max_width() {
        let style = TextStyle::new(10.0)
            .with_align(TextAlign::Center)
            .with_max_size(Point::new(50.0, 20.0));
        let sample = MonospaceShaper::default().shape("ab", &style);
        assert_eq!(sample.glyphs()[0].bounds.left(), 20.0);
        assert_eq!(sample.size().x, 50.0);
    }
}
