use strata_core::control::{checked_size, Control, Renderable, Resizable, Updatable};
use strata_core::geometry::{Point, Rectangle};
use strata_core::input::{ControlId, InputContext, MouseButtons};
use strata_core::render::RenderContext;

use crate::context::WidgetContext;

/// Direction a [Scrollbar] runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Top to bottom.
    #[default]
    Vertical,
    /// Left to right.
    Horizontal,
}

impl Orientation {
    /// Map between this orientation's space and vertical space. The mapping is its own inverse.
    fn axis(self, point: Point) -> Point {
        match self {
            Self::Vertical => point,
            Self::Horizontal => point.swap(),
        }
    }

    fn axis_rect(self, rect: Rectangle) -> Rectangle {
        Rectangle::new(self.axis(rect.location), self.axis(rect.size))
    }
}

/// A scrollbar over `content` units of which `visible` are shown at a time.
///
/// All geometry is worked out as if the bar were vertical; horizontal bars
/// swap axes on the way in and out.
pub struct Scrollbar {
    id: ControlId,
    ctx: WidgetContext,
    orientation: Orientation,
    size: Point,
    content: f64,
    visible: f64,
    value: f64,
    wheel_step: f64,
    grab: Option<f64>,
}

impl Scrollbar {
    /// A bar as thick as the skin says and as long as its thickness.
    pub fn new(ctx: &WidgetContext, orientation: Orientation) -> Self {
        let width = ctx.skin.scrollbar.width;
        Self {
            id: ControlId::new(),
            ctx: ctx.clone(),
            orientation,
            size: Point::new(width, width),
            content: 1.0,
            visible: 1.0,
            value: 0.0,
            wheel_step: 1.0,
            grab: None,
        }
    }

    /// Set the content and visible extents.
    pub fn with_range(mut self, content: f64, visible: f64) -> Self {
        self.set_range(content, visible);
        self
    }

    /// Scale wheel distance (in pixels) to scroll units.
    pub fn with_wheel_step(mut self, step: f64) -> Self {
        self.wheel_step = step;
        self
    }

    /// Change the content and visible extents, keeping the value in range.
    pub fn set_range(&mut self, content: f64, visible: f64) {
        self.content = content.max(0.0);
        self.visible = visible.max(0.0);
        self.set_value(self.value);
    }

    /// The scroll position, in `0..=max_value()`.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Move the scroll position, clamped to the valid range.
    pub fn set_value(&mut self, value: f64) {
        self.value = value.clamp(0.0, self.max_value());
    }

    /// Largest scroll position.
    pub fn max_value(&self) -> f64 {
        (self.content - self.visible).max(0.0)
    }

    /// Whether the thumb is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Size in vertical space: `x` is the thickness, `y` the length.
    fn extent(&self) -> Point {
        self.orientation.axis(self.size)
    }

    fn thumb_length(&self) -> f64 {
        let length = self.extent().y;
        let share = if self.content > 0.0 {
            (self.visible / self.content).min(1.0)
        } else {
            1.0
        };
        (length * share).max(self.ctx.skin.scrollbar.min_thumb).min(length)
    }

    fn travel(&self) -> f64 {
        self.extent().y - self.thumb_length()
    }

    /// The thumb in vertical space.
    fn thumb(&self) -> Rectangle {
        let max = self.max_value();
        let top = if max > 0.0 {
            self.value / max * self.travel()
        } else {
            0.0
        };
        Rectangle::from_xywh(0.0, top, self.extent().x, self.thumb_length())
    }

    fn drag_to(&mut self, top: f64) {
        let travel = self.travel();
        if travel > 0.0 {
            self.set_value(top / travel * self.max_value());
        }
    }
}

impl Renderable for Scrollbar {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        let skin = &self.ctx.skin.scrollbar;
        ctx.draw_surface(&skin.track, Rectangle::from_size(self.size));
        let thumb = if self.grab.is_some() {
            &skin.thumb_active
        } else {
            &skin.thumb
        };
        ctx.draw_surface(thumb, self.orientation.axis_rect(self.thumb()));
    }
}

impl Updatable for Scrollbar {
    fn update(&mut self, input: &mut InputContext<'_>, _dt: f64) {
        let Some(mouse) = input.mouse(self.id) else {
            input.release_mouse(self.id);
            self.grab = None;
            return;
        };
        let position = self.orientation.axis(mouse.position);
        let inside = Rectangle::from_size(self.extent()).contains(position);

        if inside && mouse.was_pushed(MouseButtons::LEFT) {
            let thumb = self.thumb();
            if thumb.contains(position) {
                if input.capture_mouse(self.id) {
                    self.grab = Some(position.y - thumb.top());
                }
            } else if position.y < thumb.top() {
                self.set_value(self.value - self.visible);
            } else {
                self.set_value(self.value + self.visible);
            }
        }

        if let Some(grab) = self.grab {
            if mouse.is_down(MouseButtons::LEFT) {
                self.drag_to(position.y - grab);
            } else {
                input.release_mouse(self.id);
                self.grab = None;
            }
        }

        if inside {
            let wheel = match self.orientation {
                Orientation::Horizontal if mouse.scroll.x != 0.0 => mouse.scroll.x,
                _ => mouse.scroll.y,
            };
            if wheel != 0.0 {
                self.set_value(self.value - wheel * self.wheel_step);
            }
        }
    }
}

impl Resizable for Scrollbar {
    fn size(&self) -> Point {
        self.size
    }

    fn resize(&mut self, size: Point) {
        self.size = checked_size(size);
    }
}

impl Control for Scrollbar {}

#[cfg(test)]
mod tests {
    use strata_core::input::DeviceInput;
    use strata_core::render::DrawList;
    use strata_core::session::GuiSession;

    use super::*;

    fn vertical(ctx: &WidgetContext) -> Scrollbar {
        let mut bar = Scrollbar::new(ctx, Orientation::Vertical).with_range(400.0, 100.0);
        bar.resize(Point::new(12.0, 200.0));
        bar
    }

    #[test]
    fn thumb_is_proportional() {
        let ctx = WidgetContext::headless();
        let mut bar = vertical(&ctx);
        assert_eq!(bar.thumb(), Rectangle::from_xywh(0.0, 0.0, 12.0, 50.0));
        bar.set_value(1000.0);
        assert_eq!(bar.value(), 300.0);
        assert_eq!(bar.thumb().top(), 150.0);
    }

    #[test]
    fn dragging_the_thumb_scrolls() {
        let ctx = WidgetContext::headless();
        let mut bar = vertical(&ctx);
        let mut session = GuiSession::new();
        let mut device = DeviceInput::new();

        device.move_cursor(6.0, 10.0);
        device.press(MouseButtons::LEFT);
        session.update(&mut bar, &device, 0.016);
        device.reset();
        assert!(bar.is_dragging());

        // the thumb follows the cursor even outside the bar
        device.move_cursor(60.0, 85.0);
        session.update(&mut bar, &device, 0.016);
        assert_eq!(bar.thumb().top(), 75.0);
        assert_eq!(bar.value(), 150.0);

        device.release(MouseButtons::LEFT);
        session.update(&mut bar, &device, 0.016);
        assert!(!bar.is_dragging());
        assert_eq!(session.mouse_focus(), None);
    }

    #[test]
    fn cursor_leaving_the_window_ends_the_drag() {
        let ctx = WidgetContext::headless();
        let mut bar = vertical(&ctx);
        let mut session = GuiSession::new();
        let mut device = DeviceInput::new();

        device.move_cursor(6.0, 10.0);
        device.press(MouseButtons::LEFT);
        session.update(&mut bar, &device, 0.016);
        device.reset();
        assert!(bar.is_dragging());

        device.cursor_pos = None;
        device.release(MouseButtons::LEFT);
        session.update(&mut bar, &device, 0.016);
        device.reset();

        device.move_cursor(6.0, 100.0);
        for _ in 0..5 {
            session.update(&mut bar, &device, 0.016);
        }
        assert!(!bar.is_dragging());
        assert_eq!(session.mouse_focus(), None);
        assert_eq!(bar.value(), 0.0);
    }

    #[test]
    fn track_pages_and_wheel_scrolls() {
        let ctx = WidgetContext::headless();
        let mut bar = vertical(&ctx).with_wheel_step(0.5);
        let mut session = GuiSession::new();
        let mut device = DeviceInput::new();

        device.move_cursor(6.0, 150.0);
        device.press(MouseButtons::LEFT);
        session.update(&mut bar, &device, 0.016);
        device.reset();
        assert_eq!(bar.value(), 100.0);

        device.scroll_delta.y = -40.0;
        session.update(&mut bar, &device, 0.016);
        assert_eq!(bar.value(), 120.0);
    }

    #[test]
    fn horizontal_bar_swaps_axes() {
        let ctx = WidgetContext::headless();
        let mut bar = Scrollbar::new(&ctx, Orientation::Horizontal).with_range(200.0, 100.0);
        bar.resize(Point::new(100.0, 12.0));
        bar.set_value(100.0);

        let mut list = DrawList::new();
        GuiSession::new().render(&bar, &mut list);
        let thumb = list.solids().last().unwrap().0;
        assert_eq!(thumb, Rectangle::from_xywh(50.0, 0.0, 50.0, 12.0));
    }
}
