//! The render pass.
//!
//! A [RenderContext] is an effect stack over the current transform and clip.
//! Controls draw in their own local space; translate and rotate effects map
//! that space to device pixels, and clip effects narrow where drawing lands.

use vello::kurbo::Affine;
use vello::peniko::Color;

use strata_skin::Surface;

use crate::effect::{Effect, EffectGuard, EffectHost, EffectStack, Effects};
use crate::geometry::{Point, Rectangle, Rotation};
use crate::text::{TextAlign, TextSample};

/// Contains the [backend::RenderBackend] trait.
pub mod backend;
/// Contains the [recorder::DrawList] recording backend.
pub mod recorder;
/// Contains the [texture::Texture] struct.
pub mod texture;
/// Contains the [vello_backend::VelloBackend] backend.
pub mod vello_backend;

pub use backend::RenderBackend;
pub use recorder::{DrawCommand, DrawList};
pub use texture::Texture;
pub use vello_backend::VelloBackend;

/// State threaded through the render pass.
pub struct RenderState<'b> {
    backend: &'b mut dyn RenderBackend,
    transform: Affine,
    clip: Option<Rectangle>,
}

/// Reversible render operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderEffect {
    /// Move the origin by `offset`.
    Translate {
        /// Offset in the enclosing space.
        offset: Point,
        /// Transform before the effect.
        saved: Affine,
    },
    /// Rotate about `pivot` by a quarter-turn multiple.
    Rotate {
        /// Pivot in the enclosing space.
        pivot: Point,
        /// Rotation applied.
        rotation: Rotation,
        /// Transform before the effect.
        saved: Affine,
    },
    /// Restrict drawing to `rect`.
    Clip {
        /// Clip rectangle in local space.
        rect: Rectangle,
        /// Effective device-space clip, filled in on apply.
        device: Rectangle,
    },
}

impl RenderEffect {
    /// A translate effect.
    pub fn translate(offset: Point) -> Self {
        Self::Translate {
            offset,
            saved: Affine::IDENTITY,
        }
    }

    /// A rotate effect.
    pub fn rotate(pivot: Point, rotation: Rotation) -> Self {
        Self::Rotate {
            pivot,
            rotation,
            saved: Affine::IDENTITY,
        }
    }

    /// A clip effect.
    pub fn clip(rect: Rectangle) -> Self {
        Self::Clip {
            rect,
            device: Rectangle::default(),
        }
    }
}

/// Map `rect` from the innermost space of `effects` to device space.
fn to_view(mut rect: Rectangle, effects: Effects<'_, RenderEffect>) -> Rectangle {
    for effect in effects {
        match *effect {
            RenderEffect::Translate { offset, .. } => rect = rect.translate(offset),
            RenderEffect::Rotate {
                pivot, rotation, ..
            } => rect = rect.rotate_about(pivot, rotation),
            RenderEffect::Clip { .. } => {},
        }
    }
    rect
}

/// The nearest enclosing clip, in device space.
fn enclosing_clip(mut effects: Effects<'_, RenderEffect>) -> Option<Rectangle> {
    effects.find_map(|effect| match effect {
        RenderEffect::Clip { device, .. } => Some(*device),
        _ => None,
    })
}

impl<'b> Effect<RenderState<'b>> for RenderEffect {
    fn apply(&mut self, env: &mut RenderState<'b>, enclosing: Effects<'_, Self>) {
        match self {
            Self::Translate { offset, saved } => {
                *saved = env.transform;
                env.transform = env.transform * Affine::translate((offset.x, offset.y));
            },
            Self::Rotate {
                pivot,
                rotation,
                saved,
            } => {
                *saved = env.transform;
                env.transform = env.transform * rotation.affine_about(*pivot);
            },
            Self::Clip { rect, device } => {
                let view = to_view(rect.clamped(), enclosing.clone());
                *device = match enclosing_clip(enclosing) {
                    Some(outer) => view.intersect(&outer),
                    None => view,
                };
                env.clip = Some(*device);
                env.backend.set_clip(Some((*device).into()));
            },
        }
    }

    fn remove(&mut self, env: &mut RenderState<'b>, enclosing: Effects<'_, Self>) {
        match self {
            Self::Translate { saved, .. } | Self::Rotate { saved, .. } => {
                env.transform = *saved;
            },
            Self::Clip { .. } => {
                env.clip = enclosing_clip(enclosing);
                env.backend.set_clip(env.clip.map(Into::into));
            },
        }
    }
}

/// Draws controls through a [RenderBackend].
///
/// ```ignore
/// let mut inner = ctx.translate(child_location);
/// let mut inner = inner.clip(Rectangle::from_size(child_size));
/// child.render(&mut inner);
/// ```
pub struct RenderContext<'b> {
    stack: EffectStack<RenderEffect, RenderState<'b>>,
}

impl<'b> RenderContext<'b> {
    /// Start a render pass on `backend`.
    pub fn new(backend: &'b mut dyn RenderBackend) -> Self {
        Self {
            stack: EffectStack::new(RenderState {
                backend,
                transform: Affine::IDENTITY,
                clip: None,
            }),
        }
    }

    /// Push an arbitrary render effect.
    pub fn with(&mut self, effect: RenderEffect) -> EffectGuard<'_, Self> {
        EffectGuard::new(self, effect)
    }

    /// Move the origin to `offset`.
    pub fn translate(&mut self, offset: Point) -> EffectGuard<'_, Self> {
        self.with(RenderEffect::translate(offset))
    }

    /// Rotate the local space about `pivot`.
    pub fn rotate(&mut self, pivot: Point, rotation: Rotation) -> EffectGuard<'_, Self> {
        self.with(RenderEffect::rotate(pivot, rotation))
    }

    /// Restrict drawing to `rect`, intersected with any enclosing clip.
    pub fn clip(&mut self, rect: Rectangle) -> EffectGuard<'_, Self> {
        self.with(RenderEffect::clip(rect))
    }

    /// Map a local rectangle to device space.
    pub fn to_view(&self, rect: Rectangle) -> Rectangle {
        to_view(rect, self.stack.effects())
    }

    /// The active clip in device space.
    pub fn clip_rect(&self) -> Option<Rectangle> {
        self.stack.env().clip
    }

    /// The local to device transform.
    pub fn transform(&self) -> Affine {
        self.stack.env().transform
    }

    /// Number of active effects.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Fill `rect` with `color`. Negative sizes draw nothing.
    pub fn draw_solid(&mut self, color: Color, rect: Rectangle) {
        let rect = rect.clamped();
        if rect.is_empty() {
            return;
        }
        let state = self.stack.env_mut();
        state.backend.fill_rect(state.transform, rect.into(), color);
    }

    /// Stretch `texture` over `rect`.
    pub fn draw_texture(&mut self, texture: &Texture, rect: Rectangle) {
        let rect = rect.clamped();
        if rect.is_empty() {
            return;
        }
        let state = self.stack.env_mut();
        state.backend.draw_texture(state.transform, rect.into(), texture);
    }

    /// Draw a skin surface: the fill inside, then the border around it.
    pub fn draw_surface(&mut self, surface: &Surface, rect: Rectangle) {
        let rect = rect.clamped();
        let inset = surface
            .inset()
            .min(rect.size.x * 0.5)
            .min(rect.size.y * 0.5);
        self.draw_solid(surface.fill, rect.pad(inset));

        let Some(border) = surface.border else {
            return;
        };
        if inset <= 0.0 {
            return;
        }
        let (x, y, w, h) = (rect.left(), rect.top(), rect.size.x, rect.size.y);
        self.draw_solid(border, Rectangle::from_xywh(x, y, w, inset));
        self.draw_solid(border, Rectangle::from_xywh(x, y + h - inset, w, inset));
        self.draw_solid(border, Rectangle::from_xywh(x, y + inset, inset, h - inset * 2.0));
        self.draw_solid(
            border,
            Rectangle::from_xywh(x + w - inset, y + inset, inset, h - inset * 2.0),
        );
    }

    /// Draw `sample` with its top-left corner at `point`.
    pub fn draw_text(&mut self, color: Color, sample: &TextSample, point: Point) {
        let state = self.stack.env_mut();
        state
            .backend
            .draw_text(state.transform, point.into(), sample, color);
    }

    /// Draw `sample` inside `rect`, vertically centred and aligned horizontally.
    pub fn draw_text_in(
        &mut self,
        color: Color,
        sample: &TextSample,
        rect: Rectangle,
        align: TextAlign,
    ) {
        let size = sample.size();
        let origin = Point::new(
            rect.left() + align.offset(rect.size.x, size.x),
            rect.top() + (rect.size.y - size.y) * 0.5,
        );
        self.draw_text(color, sample, origin);
    }
}

impl EffectHost for RenderContext<'_> {
    type Effect = RenderEffect;

    fn push_effect(&mut self, effect: RenderEffect) {
        self.stack.push(effect);
    }

    fn pop_effect(&mut self) -> RenderEffect {
        self.stack.pop()
    }
}

impl Drop for RenderContext<'_> {
    fn drop(&mut self) {
        if !self.stack.is_empty() {
            log::warn!(
                "render pass ended with {} effects still applied",
                self.stack.depth()
            );
            while self.stack.try_pop().is_some() {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{MonospaceShaper, TextShaper, TextStyle};

    fn red() -> Color {
        Color::from_rgb8(255, 0, 0)
    }

    #[test]
    fn translate_composes_and_restores() {
        let mut list = DrawList::new();
        {
            let mut ctx = RenderContext::new(&mut list);
            {
                let mut a = ctx.translate(Point::new(10.0, 20.0));
                let mut b = a.translate(Point::new(1.0, 2.0));
                b.draw_solid(red(), Rectangle::from_xywh(0.0, 0.0, 5.0, 5.0));
            }
            assert_eq!(ctx.transform(), Affine::IDENTITY);
            ctx.draw_solid(red(), Rectangle::from_xywh(0.0, 0.0, 5.0, 5.0));
        }
        let rects: Vec<Rectangle> = list.solids().map(|(r, _)| r).collect();
        assert_eq!(rects[0], Rectangle::from_xywh(11.0, 22.0, 5.0, 5.0));
        assert_eq!(rects[1], Rectangle::from_xywh(0.0, 0.0, 5.0, 5.0));
    }

    #[test]
    fn nested_clips_intersect_through_transforms() {
        let mut list = DrawList::new();
        {
            let mut ctx = RenderContext::new(&mut list);
            let mut outer = ctx.clip(Rectangle::from_xywh(0.0, 0.0, 100.0, 100.0));
            let mut moved = outer.translate(Point::new(50.0, 50.0));
            let mut turned = moved.rotate(Point::ZERO, Rotation::Clockwise);
            // local (0,0)-(80,30) is device (20,50)-(50,130) after the quarter turn
            let mut inner = turned.clip(Rectangle::from_xywh(0.0, 0.0, 80.0, 30.0));
            assert_eq!(
                inner.clip_rect(),
                Some(Rectangle::from_xywh(20.0, 50.0, 30.0, 50.0))
            );
            inner.draw_solid(red(), Rectangle::from_xywh(0.0, 0.0, 200.0, 200.0));
        }

        let command = &list.commands()[0];
        // exactly on the top-left boundary of the intersection
        assert!(command.paints(Point::new(20.0, 50.0)));
        assert!(command.paints(Point::new(49.9, 99.9)));
        // just outside on each side
        assert!(!command.paints(Point::new(19.9, 60.0)));
        assert!(!command.paints(Point::new(50.0, 60.0)));
        assert!(!command.paints(Point::new(30.0, 100.0)));
        assert!(!command.paints(Point::new(30.0, 49.9)));
    }

    #[test]
    fn clip_removal_restores_enclosing_clip() {
        let mut list = DrawList::new();
        {
            let mut ctx = RenderContext::new(&mut list);
            {
                let mut outer = ctx.clip(Rectangle::from_xywh(0.0, 0.0, 10.0, 10.0));
                {
                    let inner = outer.clip(Rectangle::from_xywh(5.0, 5.0, 10.0, 10.0));
                    assert_eq!(inner.clip_rect(), Some(Rectangle::from_xywh(5.0, 5.0, 5.0, 5.0)));
                }
                assert_eq!(outer.clip_rect(), Some(Rectangle::from_xywh(0.0, 0.0, 10.0, 10.0)));
            }
            assert_eq!(ctx.clip_rect(), None);
        }
        assert_eq!(list.clip(), None);
        assert_eq!(list.clip_changes(), 4);
    }

    #[test]
    fn to_view_replays_rotation_about_pivot() {
        let mut list = DrawList::new();
        let mut ctx = RenderContext::new(&mut list);
        let rect = Rectangle::from_xywh(0.0, 0.0, 10.0, 4.0);
        let mut turned = ctx.rotate(Point::new(5.0, 5.0), Rotation::Half);
        assert_eq!(turned.to_view(rect), Rectangle::from_xywh(0.0, 6.0, 10.0, 4.0));
        let back = turned.rotate(Point::new(5.0, 5.0), Rotation::Half);
        assert_eq!(back.to_view(rect), rect);
        assert_eq!(back.transform(), Affine::IDENTITY);
    }

    #[test]
    fn negative_sizes_draw_nothing() {
        let mut list = DrawList::new();
        {
            let mut ctx = RenderContext::new(&mut list);
            ctx.draw_solid(red(), Rectangle::from_xywh(0.0, 0.0, -5.0, 10.0));
            let _clip = ctx.clip(Rectangle::from_xywh(4.0, 4.0, -3.0, -3.0));
        }
        assert!(list.solids().next().is_none());
    }

    #[test]
    fn surface_draws_fill_then_border() {
        let mut list = DrawList::new();
        {
            let mut ctx = RenderContext::new(&mut list);
            let surface = Surface::bordered(Color::BLACK, Color::WHITE, 2.0);
            ctx.draw_surface(&surface, Rectangle::from_xywh(0.0, 0.0, 20.0, 10.0));
        }
        let rects: Vec<Rectangle> = list.solids().map(|(r, _)| r).collect();
        assert_eq!(rects.len(), 5);
        assert_eq!(rects[0], Rectangle::from_xywh(2.0, 2.0, 16.0, 6.0));
        assert_eq!(rects[4], Rectangle::from_xywh(18.0, 2.0, 2.0, 6.0));
    }

    #[test]
    fn text_is_placed_by_alignment() {
        let sample = MonospaceShaper::default().shape("abcd", &TextStyle::new(10.0));
        let mut list = DrawList::new();
        {
            let mut ctx = RenderContext::new(&mut list);
            ctx.draw_text_in(
                Color::WHITE,
                &sample,
                Rectangle::from_xywh(0.0, 0.0, 100.0, 32.5),
                TextAlign::Right,
            );
        }
        let (rect, text) = list.texts().next().unwrap();
        assert_eq!(text, "abcd");
        assert_eq!(rect, Rectangle::from_xywh(80.0, 10.0, 20.0, 12.5));
    }
}
