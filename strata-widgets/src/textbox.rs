use strata_core::control::{checked_size, Control, Renderable, Resizable, Updatable};
use strata_core::geometry::{Point, Rectangle};
use strata_core::input::{ControlId, InputContext, MouseButtons};
use strata_core::render::RenderContext;
use strata_core::text::TextSample;
use strata_core::window::KeyCode;

use crate::context::WidgetContext;
use crate::edit::TextBuffer;

/// A single line text field.
///
/// Clicking inside places the caret and takes keyboard focus; pushing
/// anywhere else gives it up. The text scrolls horizontally to keep the
/// caret in view.
pub struct Textbox {
    id: ControlId,
    ctx: WidgetContext,
    size: Point,
    buffer: TextBuffer,
    sample: TextSample,
    scroll: f64,
    blink: f64,
    focused: bool,
    selecting: bool,
    submitted: bool,
    max_length: Option<usize>,
    on_submit: Option<Box<dyn FnMut(&str)>>,
}

impl Textbox {
    /// An empty textbox one line tall.
    pub fn new(ctx: &WidgetContext) -> Self {
        let sample = ctx.shape_plain("");
        let height = sample.line_height() + ctx.skin.padding * 2.0;
        Self {
            id: ControlId::new(),
            ctx: ctx.clone(),
            size: Point::new(sample.line_height() * 8.0, height),
            buffer: TextBuffer::new(),
            sample,
            scroll: 0.0,
            blink: 0.0,
            focused: false,
            selecting: false,
            submitted: false,
            max_length: None,
            on_submit: None,
        }
    }

    /// Start with `text`.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Limit the text to `max_length` characters.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Run `callback` with the text whenever Enter is pressed.
    pub fn with_on_submit(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_submit = Some(Box::new(callback));
        self
    }

    /// The capture identity of the textbox.
    pub fn id(&self) -> ControlId {
        self.id
    }

    /// The text.
    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// The edit buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer.set_text(text);
        self.reshape();
    }

    /// Whether the textbox held keyboard focus during the last update.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Horizontal scroll of the text in pixels.
    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Whether Enter was pressed since the last call.
    pub fn take_submitted(&mut self) -> bool {
        std::mem::take(&mut self.submitted)
    }

    fn reshape(&mut self) {
        if let Some(sample) = self.ctx.shape(self.buffer.text(), &self.ctx.style()) {
            self.sample = sample;
        }
        self.scroll_to_caret();
    }

    fn text_origin(&self) -> Point {
        Point::new(
            self.ctx.skin.padding - self.scroll,
            (self.size.y - self.sample.line_height()) * 0.5,
        )
    }

    fn scroll_to_caret(&mut self) {
        let inner = (self.size.x - self.ctx.skin.padding * 2.0).max(0.0);
        let caret = self.sample.caret_position(self.buffer.cursor().position).x;
        if caret - self.scroll > inner {
            self.scroll = caret - inner;
        }
        if caret < self.scroll {
            self.scroll = caret;
        }
        let overflow = (self.sample.size().x - inner).max(0.0);
        self.scroll = self.scroll.clamp(0.0, overflow.max(caret - inner).max(0.0));
    }

    fn caret_at(&self, position: Point) -> usize {
        self.sample.hit_test(position - self.text_origin())
    }

    fn fits(&self, text: &str) -> bool {
        self.max_length.map_or(true, |max| {
            let selected = self.buffer.cursor().selection().map_or(0, |range| range.len());
            self.buffer.char_count() - selected + text.chars().count() <= max
        })
    }

    fn submit(&mut self) {
        log::trace!("textbox {:?} submitted", self.id);
        self.submitted = true;
        if let Some(callback) = &mut self.on_submit {
            callback(self.buffer.text());
        }
    }

    fn update_mouse(&mut self, input: &mut InputContext<'_>) {
        let Some(mouse) = input.mouse(self.id) else {
            // the cursor left the window; the drag selection ends here
            input.release_mouse(self.id);
            self.selecting = false;
            return;
        };

        if mouse.was_pushed(MouseButtons::LEFT) {
            if Rectangle::from_size(self.size).contains(mouse.position) {
                input.capture_keyboard(self.id);
                self.selecting = input.capture_mouse(self.id);
                let index = self.caret_at(mouse.position);
                self.buffer.set_cursor(index, false);
                self.blink = 0.0;
            } else if input.has_keyboard_focus(self.id) {
                input.release_keyboard(self.id);
            }
        }

        if self.selecting {
            if mouse.is_down(MouseButtons::LEFT) {
                let index = self.caret_at(mouse.position);
                if index != self.buffer.cursor().position {
                    self.buffer.set_cursor(index, true);
                }
            } else {
                input.release_mouse(self.id);
                self.selecting = false;
            }
        }
    }

    fn update_keyboard(&mut self, input: &mut InputContext<'_>) {
        let Some(keys) = input.keyboard(self.id) else {
            return;
        };
        let modifiers = keys.modifiers();
        let shift = modifiers.shift_key();
        let mut changed = false;
        let mut active = false;

        for press in keys.presses() {
            active = true;
            match press.key {
                KeyCode::Backspace => {
                    self.buffer.delete_backward();
                    changed = true;
                },
                KeyCode::Delete => {
                    self.buffer.delete_forward();
                    changed = true;
                },
                KeyCode::ArrowLeft => self.buffer.move_left(shift),
                KeyCode::ArrowRight => self.buffer.move_right(shift),
                KeyCode::Home => self.buffer.move_to_start(shift),
                KeyCode::End => self.buffer.move_to_end(shift),
                KeyCode::KeyA if modifiers.control_key() => self.buffer.select_all(),
                KeyCode::Enter | KeyCode::NumpadEnter => self.submit(),
                KeyCode::Escape => input.release_keyboard(self.id),
                _ => {},
            }
        }

        let typed = keys.typed();
        if !typed.is_empty() && !modifiers.control_key() {
            active = true;
            if self.fits(typed) {
                self.buffer.insert(typed);
                changed = true;
            } else {
                log::debug!("textbox {:?} is full; input dropped", self.id);
            }
        }

        if active {
            self.blink = 0.0;
        }
        if changed {
            self.reshape();
        } else {
            self.scroll_to_caret();
        }
    }
}

impl Renderable for Textbox {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        let skin = &self.ctx.skin;
        let bounds = Rectangle::from_size(self.size);
        let surface = if self.focused {
            &skin.textbox.focused
        } else {
            &skin.textbox.idle
        };
        ctx.draw_surface(surface, bounds);

        let mut clipped = ctx.clip(bounds.pad(skin.padding));
        let origin = self.text_origin();
        if let Some(range) = self.buffer.cursor().selection() {
            for rect in self.sample.selection_rects(range) {
                clipped.draw_solid(skin.textbox.selection, rect.translate(origin));
            }
        }
        clipped.draw_text(skin.text, &self.sample, origin);

        let period = skin.textbox.caret_blink;
        let visible = period <= 0.0 || self.blink % (period * 2.0) < period;
        if self.focused && visible {
            let caret = self.sample.caret_position(self.buffer.cursor().position);
            clipped.draw_solid(
                skin.textbox.caret,
                Rectangle::new(origin + caret, Point::new(1.0, self.sample.line_height())),
            );
        }
    }
}

impl Updatable for Textbox {
    fn update(&mut self, input: &mut InputContext<'_>, dt: f64) {
        self.update_mouse(input);
        self.update_keyboard(input);
        self.focused = input.has_keyboard_focus(self.id);
        if self.focused {
            self.blink += dt;
        }
    }
}

impl Resizable for Textbox {
    fn size(&self) -> Point {
        self.size
    }

    fn resize(&mut self, size: Point) {
        self.size = checked_size(size);
        self.scroll_to_caret();
    }
}

impl Control for Textbox {
    fn dispose(&mut self) {
        self.sample = TextSample::empty(self.sample.line_height());
    }
}
