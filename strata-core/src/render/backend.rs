use vello::kurbo::{Affine, Point, Rect};
use vello::peniko::Color;

use super::texture::Texture;
use crate::text::TextSample;

/// Where a [RenderContext](super::RenderContext) sends its draw calls.
///
/// Every shape arrives in local coordinates together with the transform that
/// maps it to device pixels. The clip is always in device pixels.
pub trait RenderBackend {
    /// Fill `rect` with a solid colour.
    fn fill_rect(&mut self, transform: Affine, rect: Rect, color: Color);

    /// Stretch `texture` over `rect`.
    fn draw_texture(&mut self, transform: Affine, rect: Rect, texture: &Texture);

    /// Draw `sample` with its top-left corner at `origin`, tinted with `color`.
    fn draw_text(&mut self, transform: Affine, origin: Point, sample: &TextSample, color: Color);

    /// Restrict drawing to `clip`, or draw everywhere with `None`.
    ///
    /// Each call replaces the previous clip.
    fn set_clip(&mut self, clip: Option<Rect>);
}
