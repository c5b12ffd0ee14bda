// SPDX-License-Identifier: MIT OR Apache-2.0

use vello::kurbo::{Affine, Point, Rect};
use vello::peniko::{Brush, Color, Fill, Mix};
use vello::Scene;

use super::backend::RenderBackend;
use super::texture::Texture;
use crate::text::TextSample;

/// Renders into a vello [Scene].
///
/// Clipping is a `Mix::Clip` layer that is replaced whenever the clip
/// changes. The layer is closed when the backend is dropped, so the scene is
/// always balanced.
pub struct VelloBackend<'a> {
    scene: &'a mut Scene,
    clip_layer: bool,
    hint: bool,
}

impl<'a> VelloBackend<'a> {
    /// Draw into `scene`.
    pub fn new(scene: &'a mut Scene) -> Self {
        Self {
            scene,
            clip_layer: false,
            hint: true,
        }
    }

    /// Enable or disable glyph hinting.
    pub fn with_hinting(mut self, hint: bool) -> Self {
        self.hint = hint;
        self
    }

    /// Get a mutable reference to the underlying Scene.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.scene
    }

    fn close_clip(&mut self) {
        if self.clip_layer {
            self.scene.pop_layer();
            self.clip_layer = false;
        }
    }
}

impl RenderBackend for VelloBackend<'_> {
    fn fill_rect(&mut self, transform: Affine, rect: Rect, color: Color) {
        self.scene
            .fill(Fill::NonZero, transform, &Brush::Solid(color), None, &rect);
    }

    fn draw_texture(&mut self, transform: Affine, rect: Rect, texture: &Texture) {
        if texture.width() == 0 || texture.height() == 0 {
            return;
        }
        let scale = Affine::scale_non_uniform(
            rect.width() / f64::from(texture.width()),
            rect.height() / f64::from(texture.height()),
        );
        let placement = transform * Affine::translate(rect.origin().to_vec2()) * scale;
        self.scene.draw_image(texture.brush(), placement);
    }

    fn draw_text(&mut self, transform: Affine, origin: Point, sample: &TextSample, color: Color) {
        let Some(layout) = sample.layout() else {
            log::trace!("sample {:?} has no glyph layout; skipped", sample.text());
            return;
        };

        let brush = Brush::Solid(color);
        let transform = transform * Affine::translate(origin.to_vec2());
        for line in layout.lines() {
            for item in line.items() {
                let parley::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };

                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));
                let coords = run.normalized_coords();

                self.scene
                    .draw_glyphs(font)
                    .brush(&brush)
                    .hint(self.hint)
                    .transform(transform)
                    .glyph_transform(glyph_xform)
                    .font_size(font_size)
                    .normalized_coords(coords)
                    .draw(
                        Fill::NonZero,
                        glyph_run.glyphs().map(|glyph| {
                            let gx = x + glyph.x;
                            let gy = y - glyph.y;
                            x += glyph.advance;
                            vello::Glyph {
                                id: glyph.id as _,
                                x: gx,
                                y: gy,
                            }
                        }),
                    );
            }
        }
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.close_clip();
        if let Some(rect) = clip {
            self.scene
                .push_layer(Mix::Clip, 1.0, Affine::IDENTITY, &rect);
            self.clip_layer = true;
        }
    }
}

impl Drop for VelloBackend<'_> {
    fn drop(&mut self) {
        self.close_clip();
    }
}
