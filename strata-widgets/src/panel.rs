use strata_core::control::{checked_size, BoxedControl, Control, Renderable, Resizable, Updatable};
use strata_core::geometry::{Point, Rectangle};
use strata_core::input::InputContext;
use strata_core::render::RenderContext;
use strata_skin::Surface;

use crate::context::WidgetContext;

struct Child {
    position: Point,
    control: BoxedControl,
}

impl Child {
    fn bounds(&self) -> Rectangle {
        Rectangle::new(self.position, self.control.size())
    }
}

/// A container that places its children at fixed positions.
///
/// Children later in the list are drawn on top and see the mouse first.
pub struct Panel {
    size: Point,
    surface: Option<Surface>,
    children: Vec<Child>,
}

impl Panel {
    /// An empty panel with the skin's panel surface.
    pub fn new(ctx: &WidgetContext) -> Self {
        Self {
            size: Point::ZERO,
            surface: Some(ctx.skin.panel),
            children: Vec::new(),
        }
    }

    /// Draw `surface` behind the children, or nothing.
    pub fn with_surface(mut self, surface: Option<Surface>) -> Self {
        self.surface = surface;
        self
    }

    /// Add `control` at `bounds`. Returns its index.
    pub fn add_child(&mut self, control: impl Control + 'static, bounds: Rectangle) -> usize {
        self.add_boxed(Box::new(control), bounds)
    }

    /// Add an already boxed control at `bounds`. Returns its index.
    pub fn add_boxed(&mut self, mut control: BoxedControl, bounds: Rectangle) -> usize {
        control.resize(bounds.size);
        self.children.push(Child {
            position: bounds.location,
            control,
        });
        self.children.len() - 1
    }

    /// Builder form of [Panel::add_child].
    pub fn with_child(mut self, control: impl Control + 'static, bounds: Rectangle) -> Self {
        self.add_child(control, bounds);
        self
    }

    /// Take a child out. Later children move down one index.
    pub fn remove_child(&mut self, index: usize) -> Option<BoxedControl> {
        (index < self.children.len()).then(|| self.children.remove(index).control)
    }

    /// A child by index.
    pub fn child_mut(&mut self, index: usize) -> Option<&mut (dyn Control + 'static)> {
        self.children.get_mut(index).map(|child| &mut *child.control)
    }

    /// Move a child.
    pub fn set_child_position(&mut self, index: usize, position: Point) {
        if let Some(child) = self.children.get_mut(index) {
            child.position = position;
        }
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the panel has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Renderable for Panel {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        if let Some(surface) = &self.surface {
            ctx.draw_surface(surface, Rectangle::from_size(self.size));
        }
        for child in &self.children {
            let bounds = child.bounds();
            let mut moved = ctx.translate(bounds.location);
            let mut clipped = moved.clip(Rectangle::from_size(bounds.size));
            child.control.render(&mut clipped);
        }
    }
}

impl Updatable for Panel {
    fn update(&mut self, input: &mut InputContext<'_>, dt: f64) {
        let mut input = input.stencil();
        input.stencil_clip(Rectangle::from_size(self.size));
        for child in self.children.iter_mut().rev() {
            let bounds = child.bounds();
            {
                let mut own = input.stencil();
                own.stencil_clip(bounds);
                let mut moved = own.translate(bounds.location);
                child.control.update(&mut moved, dt);
            }
            input.stencil_occlude(bounds);
        }
    }
}

impl Resizable for Panel {
    fn size(&self) -> Point {
        self.size
    }

    fn resize(&mut self, size: Point) {
        self.size = checked_size(size);
    }
}

impl Control for Panel {
    fn dispose(&mut self) {
        for child in &mut self.children {
            child.control.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use strata_core::input::{DeviceInput, MouseButtons};
    use strata_core::render::DrawList;
    use strata_core::session::GuiSession;

    use super::*;
    use crate::button::Button;

    #[test]
    fn overlapping_children_topmost_wins() {
        let ctx = WidgetContext::headless();
        let mut panel = Panel::new(&ctx);
        panel.resize(Point::new(200.0, 200.0));
        let lower = Button::new(&ctx, "a");
        let upper = Button::new(&ctx, "b");
        let upper_id = upper.id();
        panel.add_child(lower, Rectangle::from_xywh(0.0, 0.0, 50.0, 50.0));
        panel.add_child(upper, Rectangle::from_xywh(25.0, 25.0, 50.0, 50.0));

        let mut device = DeviceInput::new();
        device.move_cursor(30.0, 30.0);
        device.press(MouseButtons::LEFT);
        let mut session = GuiSession::new();
        session.update(&mut panel, &device, 0.016);
        assert_eq!(session.mouse_focus(), Some(upper_id));

        device.reset();
        device.release(MouseButtons::LEFT);
        session.update(&mut panel, &device, 0.016);
        assert_eq!(session.mouse_focus(), None);
    }

    #[test]
    fn children_outside_the_panel_do_not_see_the_mouse() {
        let ctx = WidgetContext::headless();
        let mut panel = Panel::new(&ctx);
        panel.resize(Point::new(50.0, 50.0));
        panel.add_child(Button::new(&ctx, "x"), Rectangle::from_xywh(40.0, 40.0, 30.0, 30.0));

        let mut device = DeviceInput::new();
        device.move_cursor(60.0, 60.0);
        device.press(MouseButtons::LEFT);
        let mut session = GuiSession::new();
        session.update(&mut panel, &device, 0.016);
        assert_eq!(session.mouse_focus(), None);
    }

    #[test]
    fn children_render_translated_and_clipped() {
        let ctx = WidgetContext::headless();
        let mut panel = Panel::new(&ctx).with_surface(None);
        panel.resize(Point::new(100.0, 100.0));
        panel.add_child(Button::new(&ctx, "x"), Rectangle::from_xywh(10.0, 20.0, 30.0, 15.0));

        let mut list = DrawList::new();
        GuiSession::new().render(&panel, &mut list);
        let first = &list.commands()[0];
        assert_eq!(first.clip(), Some(Rectangle::from_xywh(10.0, 20.0, 30.0, 15.0)));
        assert_eq!(list.clip(), None);
    }
}
