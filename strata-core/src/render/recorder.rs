use vello::kurbo::{Affine, Point as KurboPoint, Rect};
use vello::peniko::Color;

use super::backend::RenderBackend;
use super::texture::Texture;
use crate::geometry::{Point, Rectangle};
use crate::text::TextSample;

/// A draw call captured by [DrawList], in device pixels.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// A solid quad.
    Solid {
        /// Device-space bounds.
        rect: Rectangle,
        /// Fill colour.
        color: Color,
        /// Clip active at the time.
        clip: Option<Rectangle>,
    },
    /// A textured quad.
    Texture {
        /// Device-space bounds.
        rect: Rectangle,
        /// Texture dimensions in pixels.
        size: Point,
        /// Clip active at the time.
        clip: Option<Rectangle>,
    },
    /// A text sample.
    Text {
        /// Device-space bounds of the whole sample.
        rect: Rectangle,
        /// The sample's text.
        text: String,
        /// Tint colour.
        color: Color,
        /// Clip active at the time.
        clip: Option<Rectangle>,
    },
}

impl DrawCommand {
    /// Device-space bounds.
    pub fn rect(&self) -> Rectangle {
        match self {
            Self::Solid { rect, .. } | Self::Texture { rect, .. } | Self::Text { rect, .. } => *rect,
        }
    }

    /// Clip active when the command was issued.
    pub fn clip(&self) -> Option<Rectangle> {
        match self {
            Self::Solid { clip, .. } | Self::Texture { clip, .. } | Self::Text { clip, .. } => *clip,
        }
    }

    /// The part of the command that survives clipping.
    pub fn visible_rect(&self) -> Rectangle {
        match self.clip() {
            Some(clip) => self.rect().intersect(&clip),
            None => self.rect(),
        }
    }

    /// Whether a device pixel position would be painted by this command.
    pub fn paints(&self, point: Point) -> bool {
        self.rect().contains(point) && self.clip().map_or(true, |clip| clip.contains(point))
    }
}

/// A backend that records what would have been drawn.
///
/// Useful for headless hosts, and for asserting on layout and clipping.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    clip: Option<Rectangle>,
    clip_changes: usize,
}

impl DrawList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in submission order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// The clip currently set.
    pub fn clip(&self) -> Option<Rectangle> {
        self.clip
    }

    /// How often the clip was changed.
    pub fn clip_changes(&self) -> usize {
        self.clip_changes
    }

    /// Recorded solid quads as `(rect, color)`.
    pub fn solids(&self) -> impl Iterator<Item = (Rectangle, Color)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Solid { rect, color, .. } => Some((*rect, *color)),
            _ => None,
        })
    }

    /// Recorded text draws as `(rect, text)`.
    pub fn texts(&self) -> impl Iterator<Item = (Rectangle, &str)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { rect, text, .. } => Some((*rect, text.as_str())),
            _ => None,
        })
    }

    /// Forget everything recorded.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip = None;
        self.clip_changes = 0;
    }

    fn device_rect(transform: Affine, rect: Rect) -> Rectangle {
        transform.transform_rect_bbox(rect).into()
    }
}

impl RenderBackend for DrawList {
    fn fill_rect(&mut self, transform: Affine, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Solid {
            rect: Self::device_rect(transform, rect),
            color,
            clip: self.clip,
        });
    }

    fn draw_texture(&mut self, transform: Affine, rect: Rect, texture: &Texture) {
        self.commands.push(DrawCommand::Texture {
            rect: Self::device_rect(transform, rect),
            size: texture.size(),
            clip: self.clip,
        });
    }

    fn draw_text(&mut self, transform: Affine, origin: KurboPoint, sample: &TextSample, color: Color) {
        let size = sample.size();
        let rect = Rect::from_origin_size(origin, (size.x, size.y));
        self.commands.push(DrawCommand::Text {
            rect: Self::device_rect(transform, rect),
            text: sample.text().to_string(),
            color,
            clip: self.clip,
        });
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip.map(Rectangle::from);
        self.clip_changes += 1;
    }
}
