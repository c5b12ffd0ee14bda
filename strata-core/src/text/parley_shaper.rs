// SPDX-License-Identifier: MIT OR Apache-2.0

use parley::fontique::{Collection, CollectionOptions};
use parley::{Alignment, FontContext, LayoutContext, PositionedLayoutItem, StyleProperty};

use super::{GlyphBox, TextAlign, TextSample, TextShaper, TextStyle};
use crate::geometry::{Point, Rectangle};

/// Shapes text with parley using the system font collection.
pub struct ParleyShaper {
    font_cx: FontContext,
    layout_cx: LayoutContext<[u8; 4]>,
}

impl ParleyShaper {
    /// Create a shaper with system fonts loaded.
    pub fn new() -> Self {
        let font_cx = FontContext {
            collection: Collection::new(CollectionOptions {
                system_fonts: true,
                ..Default::default()
            }),
            source_cache: Default::default(),
        };

        Self {
            font_cx,
            layout_cx: LayoutContext::new(),
        }
    }
}

impl Default for ParleyShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper for ParleyShaper {
    fn shape(&mut self, text: &str, style: &TextStyle) -> TextSample {
        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, text, 1.0, true);
        builder.push_default(StyleProperty::FontSize(style.font_size));
        let mut layout = builder.build(text);

        let max_width = style.max_width().map(|w| w as f32);
        layout.break_all_lines(max_width);

        let alignment = match style.align {
            TextAlign::Left => Alignment::Start,
            TextAlign::Center => Alignment::Center,
            TextAlign::Right => Alignment::End,
        };
        let align_width = match style.max_size {
            Some(size) if style.align != TextAlign::Left => Some(size.x as f32),
            _ => max_width,
        };
        layout.align(align_width, alignment, Default::default());

        // one slot per character, filled from the clusters that cover it
        let byte_to_char: Vec<usize> = {
            let mut map = vec![0; text.len() + 1];
            for (char_index, (byte, ch)) in text.char_indices().enumerate() {
                for slot in &mut map[byte..byte + ch.len_utf8()] {
                    *slot = char_index;
                }
            }
            map
        };
        let char_count = text.chars().count();
        let mut slots: Vec<Option<GlyphBox>> = vec![None; char_count];
        let mut line_height = f64::from(style.font_size) * 1.2;

        for (line_index, line) in layout.lines().enumerate() {
            let metrics = line.metrics();
            let top = f64::from(metrics.baseline - metrics.ascent);
            let height = f64::from(metrics.ascent + metrics.descent);
            if line_index == 0 {
                line_height = height;
            }

            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = f64::from(glyph_run.offset());
                for cluster in glyph_run.run().visual_clusters() {
                    let advance = f64::from(cluster.advance());
                    let range = cluster.text_range();
                    let chars = text.get(range.clone()).map_or(0, |s| s.chars().count()).max(1);
                    let share = advance / chars as f64;
                    for (n, ch_byte) in text
                        .get(range.clone())
                        .unwrap_or_default()
                        .char_indices()
                        .map(|(offset, _)| range.start + offset)
                        .enumerate()
                    {
                        if let Some(slot) = slots.get_mut(byte_to_char[ch_byte]) {
                            *slot = Some(GlyphBox {
                                bounds: Rectangle::from_xywh(x + share * n as f64, top, share, height),
                                line: line_index,
                            });
                        }
                    }
                    x += advance;
                }
            }
        }

        // characters without a cluster (line breaks) sit where the previous one ended
        let mut glyphs = Vec::with_capacity(char_count);
        let mut previous = GlyphBox {
            bounds: Rectangle::from_xywh(0.0, 0.0, 0.0, line_height),
            line: 0,
        };
        for slot in slots {
            let glyph = slot.unwrap_or(GlyphBox {
                bounds: Rectangle::new(
                    Point::new(previous.bounds.right(), previous.bounds.top()),
                    Point::new(0.0, previous.bounds.size.y),
                ),
                line: previous.line,
            });
            glyphs.push(glyph);
            previous = glyph;
        }

        let size = Point::new(
            f64::from(layout.width()),
            f64::from(layout.height()).max(line_height),
        );
        log::trace!("shaped {:?} to {:?}", text, size);
        TextSample::from_parts(text.to_string(), size, line_height, glyphs).with_layout(layout)
    }
}
