use strata_core::control::{checked_size, Control, Renderable, Resizable, Updatable};
use strata_core::geometry::{Point, Rectangle};
use strata_core::input::InputContext;
use strata_core::render::{RenderContext, Texture};

/// Shows a texture stretched over its whole area.
pub struct Picture {
    size: Point,
    texture: Option<Texture>,
}

impl Picture {
    /// A picture at the texture's natural size.
    pub fn new(texture: Texture) -> Self {
        Self {
            size: texture.size(),
            texture: Some(texture),
        }
    }

    /// The texture, until the picture is disposed.
    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    /// Show a different texture.
    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
    }
}

impl Renderable for Picture {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        if let Some(texture) = &self.texture {
            ctx.draw_texture(texture, Rectangle::from_size(self.size));
        }
    }
}

impl Updatable for Picture {
    fn update(&mut self, _input: &mut InputContext<'_>, _dt: f64) {}
}

impl Resizable for Picture {
    fn size(&self) -> Point {
        self.size
    }

    fn resize(&mut self, size: Point) {
        self.size = checked_size(size);
    }
}

impl Control for Picture {
    fn dispose(&mut self) {
        if self.texture.take().is_some() {
            log::trace!("picture texture released");
        }
    }
}

#[cfg(test)]
mod tests {
    use strata_core::render::{DrawCommand, DrawList};
    use strata_core::session::GuiSession;

    use super::*;

    #[test]
    fn draws_stretched_until_disposed() {
        let texture = Texture::from_rgba8(2, 1, vec![255; 8]).unwrap();
        let mut picture = Picture::new(texture);
        assert_eq!(picture.size(), Point::new(2.0, 1.0));
        picture.resize(Point::new(20.0, 10.0));

        let session = GuiSession::new();
        let mut list = DrawList::new();
        session.render(&picture, &mut list);
        match &list.commands()[0] {
            DrawCommand::Texture { rect, size, .. } => {
                assert_eq!(*rect, Rectangle::from_xywh(0.0, 0.0, 20.0, 10.0));
                assert_eq!(*size, Point::new(2.0, 1.0));
            },
            other => panic!("unexpected command {other:?}"),
        }

        picture.dispose();
        picture.dispose();
        list.clear();
        session.render(&picture, &mut list);
        assert!(list.commands().is_empty());
    }
}
