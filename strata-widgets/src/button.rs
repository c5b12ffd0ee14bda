use strata_core::control::{checked_size, Control, Renderable, Resizable, Updatable};
use strata_core::geometry::{Point, Rectangle};
use strata_core::input::{ControlId, InputContext, MouseButtons};
use strata_core::render::RenderContext;
use strata_core::text::{TextAlign, TextSample};

use crate::context::WidgetContext;

/// The visual state of a [Button].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// Not under the cursor.
    #[default]
    Idle,
    /// Under the cursor.
    Hovered,
    /// Held down with the cursor over it.
    Pressed,
}

/// A clickable area with a caption.
///
/// A push inside captures the mouse; the click fires when the button is
/// released while the cursor is still inside. Clicks are counted until
/// [Button::take_clicked] reads them, and the optional callback runs inline.
pub struct Button {
    id: ControlId,
    ctx: WidgetContext,
    size: Point,
    caption: TextSample,
    state: ButtonState,
    clicked: bool,
    disabled: bool,
    on_click: Option<Box<dyn FnMut()>>,
}

impl Button {
    /// A button labelled `caption`, sized to fit it plus padding.
    pub fn new(ctx: &WidgetContext, caption: &str) -> Self {
        let sample = ctx.shape_plain(caption);
        let padding = ctx.skin.padding * 2.0;
        Self {
            id: ControlId::new(),
            ctx: ctx.clone(),
            size: sample.size() + Point::new(padding * 2.0, padding),
            caption: sample,
            state: ButtonState::Idle,
            clicked: false,
            disabled: false,
            on_click: None,
        }
    }

    /// Run `callback` on every click.
    pub fn with_on_click(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_click = Some(Box::new(callback));
        self
    }

    /// Set whether the button ignores input.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Replace the caption.
    pub fn set_caption(&mut self, caption: &str) {
        if let Some(sample) = self.ctx.shape(caption, &self.ctx.style()) {
            self.caption = sample;
        }
    }

    /// The capture identity of the button.
    pub fn id(&self) -> ControlId {
        self.id
    }

    /// The current visual state.
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Whether the button was clicked since the last call.
    pub fn take_clicked(&mut self) -> bool {
        std::mem::take(&mut self.clicked)
    }

    fn click(&mut self) {
        log::trace!("button {:?} clicked", self.id);
        self.clicked = true;
        if let Some(callback) = &mut self.on_click {
            callback();
        }
    }
}

impl Renderable for Button {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        let skin = &self.ctx.skin;
        let surface = match self.state {
            ButtonState::Idle => &skin.button.idle,
            ButtonState::Hovered => &skin.button.hovered,
            ButtonState::Pressed => &skin.button.pressed,
        };
        let bounds = Rectangle::from_size(self.size);
        ctx.draw_surface(surface, bounds);

        let color = if self.disabled { skin.text_disabled } else { skin.text };
        ctx.draw_text_in(color, &self.caption, bounds, TextAlign::Center);
    }
}

impl Updatable for Button {
    fn update(&mut self, input: &mut InputContext<'_>, _dt: f64) {
        if self.disabled {
            input.release_mouse(self.id);
            self.state = ButtonState::Idle;
            return;
        }

        let Some(mouse) = input.mouse(self.id) else {
            // the cursor left the window; a press in progress is lost
            input.release_mouse(self.id);
            self.state = ButtonState::Idle;
            return;
        };

        let inside = Rectangle::from_size(self.size).contains(mouse.position);
        let mut captured = input.has_mouse_capture(self.id);
        if inside && mouse.was_pushed(MouseButtons::LEFT) && !captured {
            captured = input.capture_mouse(self.id);
        }
        if captured && !mouse.is_down(MouseButtons::LEFT) {
            input.release_mouse(self.id);
            captured = false;
            if inside && mouse.was_released(MouseButtons::LEFT) {
                self.click();
            }
        }

        self.state = match (captured, inside) {
            (true, true) => ButtonState::Pressed,
            (false, true) => ButtonState::Hovered,
            _ => ButtonState::Idle,
        };
    }
}

impl Resizable for Button {
    fn size(&self) -> Point {
        self.size
    }

    fn resize(&mut self, size: Point) {
        self.size = checked_size(size);
    }
}

impl Control for Button {}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use strata_core::input::DeviceInput;
    use strata_core::session::GuiSession;

    use super::*;

    fn button(ctx: &WidgetContext) -> Button {
        let mut button = Button::new(ctx, "OK");
        button.resize(Point::new(40.0, 20.0));
        button
    }

    #[test]
    fn click_fires_on_release_inside() {
        let ctx = WidgetContext::headless();
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let mut button = button(&ctx).with_on_click(move || seen.set(seen.get() + 1));
        let mut session = GuiSession::new();
        let mut device = DeviceInput::new();

        device.move_cursor(10.0, 10.0);
        device.press(MouseButtons::LEFT);
        session.update(&mut button, &device, 0.016);
        device.reset();
        assert_eq!(button.state(), ButtonState::Pressed);
        assert_eq!(session.mouse_focus(), Some(button.id()));
        assert!(!button.take_clicked());

        device.release(MouseButtons::LEFT);
        session.update(&mut button, &device, 0.016);
        assert!(button.take_clicked());
        assert!(!button.take_clicked());
        assert_eq!(count.get(), 1);
        assert_eq!(button.state(), ButtonState::Hovered);
        assert_eq!(session.mouse_focus(), None);
    }

    #[test]
    fn release_outside_cancels() {
        let ctx = WidgetContext::headless();
        let mut button = button(&ctx);
        let mut session = GuiSession::new();
        let mut device = DeviceInput::new();

        device.move_cursor(10.0, 10.0);
        device.press(MouseButtons::LEFT);
        session.update(&mut button, &device, 0.016);
        device.reset();

        // still captured after leaving the button
        device.move_cursor(100.0, 100.0);
        session.update(&mut button, &device, 0.016);
        assert_eq!(button.state(), ButtonState::Idle);
        assert_eq!(session.mouse_focus(), Some(button.id()));

        device.release(MouseButtons::LEFT);
        session.update(&mut button, &device, 0.016);
        assert!(!button.take_clicked());
        assert_eq!(session.mouse_focus(), None);
    }

    #[test]
    fn cursor_leaving_the_window_drops_capture() {
        let ctx = WidgetContext::headless();
        let mut button = button(&ctx);
        let mut session = GuiSession::new();
        let mut device = DeviceInput::new();

        device.move_cursor(10.0, 10.0);
        device.press(MouseButtons::LEFT);
        session.update(&mut button, &device, 0.016);
        device.reset();

        device.cursor_pos = None;
        device.release(MouseButtons::LEFT);
        session.update(&mut button, &device, 0.016);
        device.reset();
        assert_eq!(session.mouse_focus(), None);

        device.move_cursor(10.0, 10.0);
        session.update(&mut button, &device, 0.016);
        assert!(!button.take_clicked());
        assert_eq!(button.state(), ButtonState::Hovered);
        assert!(session.input(&device).is_mouse_visible());
    }

    #[test]
    fn disabled_button_ignores_clicks() {
        let ctx = WidgetContext::headless();
        let mut button = button(&ctx).with_disabled(true);
        let mut device = DeviceInput::new();
        device.move_cursor(10.0, 10.0);
        device.press(MouseButtons::LEFT);
        device.release(MouseButtons::LEFT);
        GuiSession::new().update(&mut button, &device, 0.016);
        assert!(!button.take_clicked());
    }
}
