// SPDX-License-Identifier: MIT OR Apache-2.0

use strata_core::control::{
    checked_size, BoxedControl, Control, LayerControl, Placement, Renderable, Resizable, Updatable,
};
use strata_core::geometry::{Point, Rectangle};
use strata_core::input::{ControlId, InputContext, InputMask, MouseButtons, Scope};
use strata_core::render::RenderContext;
use strata_core::text::{TextAlign, TextSample};

use crate::context::WidgetContext;

/// Something the user asked a [Form] to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// The close button was clicked.
    CloseRequested,
}

/// A floating window with a title bar, meant to live in a
/// [LayerContainer](strata_core::layer::LayerContainer).
///
/// Dragging the title bar moves the form by exactly the distance the mouse
/// moved. While a drag is on, the form's title scope holds focus and hides
/// the mouse from everything else, so the drag survives the cursor leaving
/// the form or passing over other layers.
pub struct Form {
    id: ControlId,
    close_id: ControlId,
    ctx: WidgetContext,
    placement: Placement,
    size: Point,
    title: TextSample,
    title_scope: Scope,
    grab: Option<Point>,
    closable: bool,
    close_pressed: bool,
    content: Option<BoxedControl>,
    events: Vec<FormEvent>,
}

impl Form {
    /// A form titled `title`.
    pub fn new(ctx: &WidgetContext, title: &str, size: Point) -> Self {
        Self {
            id: ControlId::new(),
            close_id: ControlId::new(),
            ctx: ctx.clone(),
            placement: Placement::default(),
            size: checked_size(size),
            title: ctx.shape_plain(title),
            title_scope: Scope::new().with_hide_outside(InputMask::MOUSE),
            grab: None,
            closable: false,
            close_pressed: false,
            content: None,
            events: Vec::new(),
        }
    }

    /// Show a close button in the title bar.
    pub fn with_close_button(mut self) -> Self {
        self.closable = true;
        self
    }

    /// Fill the area below the title bar with `content`.
    pub fn with_content(mut self, content: impl Control + 'static) -> Self {
        self.set_content(Some(Box::new(content)));
        self
    }

    /// Replace the content, returning the old one.
    pub fn set_content(&mut self, content: Option<BoxedControl>) -> Option<BoxedControl> {
        let old = std::mem::replace(&mut self.content, content);
        let area = self.content_area().size;
        if let Some(content) = &mut self.content {
            content.resize(area);
        }
        old
    }

    /// The content control.
    pub fn content_mut(&mut self) -> Option<&mut (dyn Control + 'static)> {
        self.content.as_mut().map(|content| &mut **content)
    }

    /// Whether the title bar is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<FormEvent> {
        std::mem::take(&mut self.events)
    }

    fn title_height(&self) -> f64 {
        self.ctx.skin.form.title_height.min(self.size.y)
    }

    fn title_bar(&self) -> Rectangle {
        Rectangle::from_xywh(0.0, 0.0, self.size.x, self.title_height())
    }

    fn close_button(&self) -> Option<Rectangle> {
        if !self.closable {
            return None;
        }
        let height = self.title_height();
        let button = Rectangle::from_xywh(self.size.x - height, 0.0, height, height);
        Some(button.pad(self.ctx.skin.padding))
    }

    fn content_area(&self) -> Rectangle {
        let top = self.title_height();
        Rectangle::from_xywh(0.0, top, self.size.x, self.size.y - top).clamped()
    }

    fn update_close_button(&mut self, input: &mut InputContext<'_>) {
        let Some(button) = self.close_button() else {
            return;
        };
        let Some(mouse) = input.mouse(self.close_id) else {
            input.release_mouse(self.close_id);
            self.close_pressed = false;
            return;
        };
        let inside = button.contains(mouse.position);
        if inside && mouse.was_pushed(MouseButtons::LEFT) {
            self.close_pressed = input.capture_mouse(self.close_id);
        }
        if self.close_pressed && !mouse.is_down(MouseButtons::LEFT) {
            input.release_mouse(self.close_id);
            self.close_pressed = false;
            if inside && mouse.was_released(MouseButtons::LEFT) {
                log::debug!("form {:?} asked to close", self.id);
                self.events.push(FormEvent::CloseRequested);
            }
        }
    }

    fn update_title(&mut self, input: &mut InputContext<'_>) {
        let mut scoped = input.scope(self.title_scope);
        let Some(mouse) = scoped.mouse(self.id) else {
            return;
        };

        let on_close = self.close_button().is_some_and(|button| button.contains(mouse.position));
        if self.grab.is_none()
            && mouse.was_pushed(MouseButtons::LEFT)
            && self.title_bar().contains(mouse.position)
            && !on_close
        {
            log::trace!("form {:?} drag started", self.id);
            self.grab = Some(mouse.position);
        }

        let Some(grab) = self.grab else {
            return;
        };
        // the mouse is relative to the old position, so this moves by the cursor delta
        self.placement.position += mouse.position - grab;
        if mouse.is_down(MouseButtons::LEFT) {
            scoped.focus();
        } else {
            log::trace!("form {:?} drag ended", self.id);
            self.grab = None;
            scoped.release();
        }
    }
}

impl Renderable for Form {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        let skin = &self.ctx.skin;
        ctx.draw_surface(&skin.form.body, Rectangle::from_size(self.size));

        let title_bar = self.title_bar();
        ctx.draw_surface(&skin.form.title, title_bar);
        let text_area = Rectangle::from_xywh(
            skin.padding,
            0.0,
            title_bar.size.x - skin.padding * 2.0 - self.close_button().map_or(0.0, |b| b.size.x),
            title_bar.size.y,
        );
        ctx.draw_text_in(skin.text, &self.title, text_area, TextAlign::Left);

        if let Some(button) = self.close_button() {
            ctx.draw_surface(&skin.form.close, button);
        }

        if let Some(content) = &self.content {
            let area = self.content_area();
            let mut moved = ctx.translate(area.location);
            let mut clipped = moved.clip(Rectangle::from_size(area.size));
            content.render(&mut clipped);
        }
    }
}

impl Updatable for Form {
    fn update(&mut self, input: &mut InputContext<'_>, dt: f64) {
        self.update_close_button(input);
        self.update_title(input);

        let area = self.content_area();
        if let Some(content) = &mut self.content {
            let mut own = input.stencil();
            own.stencil_clip(area);
            let mut moved = own.translate(area.location);
            content.update(&mut moved, dt);
        }
    }
}

impl Resizable for Form {
    fn size(&self) -> Point {
        self.size
    }

    fn resize(&mut self, size: Point) {
        self.size = checked_size(size);
        let area = self.content_area().size;
        if let Some(content) = &mut self.content {
            content.resize(area);
        }
    }
}

impl Control for Form {
    fn dispose(&mut self) {
        if let Some(content) = &mut self.content {
            content.dispose();
        }
        self.title = TextSample::empty(self.title.line_height());
    }
}

impl LayerControl for Form {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }
}
