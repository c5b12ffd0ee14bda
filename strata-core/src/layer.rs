// SPDX-License-Identifier: MIT OR Apache-2.0

//! Floating layers over a background control.
//!
//! A [LayerContainer] owns its layers in z-order, back to front. Rendering
//! walks them back to front; the update pass walks them topmost first so the
//! topmost layer under the cursor claims the mouse and occludes it for
//! everything beneath.

use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use vello::peniko::Color;

use crate::control::{checked_size, BoxedControl, Control, LayerControl, Renderable, Resizable, Updatable};
use crate::error::{GuiError, GuiResult};
use crate::geometry::{Point, Rectangle};
use crate::input::{ControlId, InputContext};
use crate::render::RenderContext;

/// Default time for the lightbox to fade fully in or out, in seconds.
pub const DEFAULT_LIGHTBOX_FADE_TIME: f64 = 0.25;

/// Identity of a layer inside a [LayerContainer].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

impl LayerId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw ID value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A modal session on a [LayerContainer].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModalOptions {
    /// Layers below this one are blocked.
    pub lowest_modal: LayerId,
    /// Dim everything below the modal layer.
    pub lightbox: bool,
    /// Seconds for the lightbox to fade in or out.
    pub lightbox_fade_time: f64,
    /// Let the mouse reach blocked layers anyway. Background clicks are still reported.
    pub mouse_fallthrough: bool,
}

impl ModalOptions {
    /// Block everything below `lowest_modal`, without a lightbox.
    pub fn new(lowest_modal: LayerId) -> Self {
        Self {
            lowest_modal,
            lightbox: false,
            lightbox_fade_time: DEFAULT_LIGHTBOX_FADE_TIME,
            mouse_fallthrough: false,
        }
    }

    /// Dim the blocked layers, fading over `fade_time` seconds.
    pub fn with_lightbox(mut self, fade_time: f64) -> Self {
        self.lightbox = true;
        self.lightbox_fade_time = fade_time;
        self
    }

    /// Let the mouse through to blocked layers.
    pub fn with_mouse_fallthrough(mut self, fallthrough: bool) -> Self {
        self.mouse_fallthrough = fallthrough;
        self
    }
}

/// Something that happened in a [LayerContainer] during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerEvent {
    /// A mouse button was pushed below the modal layers, outside of them.
    BackgroundClick,
}

/// A background control with floating layers on top.
pub struct LayerContainer {
    id: ControlId,
    size: Point,
    background: Option<BoxedControl>,
    layers: IndexMap<LayerId, Box<dyn LayerControl>>,
    modal: Option<ModalOptions>,
    lightbox_color: Color,
    lightbox_alpha: f64,
    lightbox_anchor: Option<LayerId>,
    fade_time: f64,
    events: Vec<LayerEvent>,
}

impl LayerContainer {
    /// An empty container of `size`.
    pub fn new(size: Point) -> Self {
        Self {
            id: ControlId::new(),
            size: checked_size(size),
            background: None,
            layers: IndexMap::new(),
            modal: None,
            lightbox_color: Color::from_rgba8(0, 0, 0, 128),
            lightbox_alpha: 0.0,
            lightbox_anchor: None,
            fade_time: DEFAULT_LIGHTBOX_FADE_TIME,
            events: Vec::new(),
        }
    }

    /// Set the background control; it is resized to the container.
    pub fn with_background(mut self, background: BoxedControl) -> Self {
        self.set_background(Some(background));
        self
    }

    /// Set the lightbox colour at full opacity.
    pub fn with_lightbox_color(mut self, color: Color) -> Self {
        self.lightbox_color = color;
        self
    }

    /// Replace the background control, returning the old one.
    pub fn set_background(&mut self, background: Option<BoxedControl>) -> Option<BoxedControl> {
        let old = std::mem::replace(&mut self.background, background);
        if let Some(background) = &mut self.background {
            background.resize(self.size);
        }
        old
    }

    /// The background control.
    pub fn background_mut(&mut self) -> Option<&mut (dyn Control + 'static)> {
        self.background.as_mut().map(|background| &mut **background)
    }

    /// Put `control` on top at `position`.
    pub fn add_control(&mut self, mut control: Box<dyn LayerControl>, position: Point) -> LayerId {
        let id = LayerId::next();
        control.set_position(position);
        self.layers.insert(id, control);
        log::debug!("layer {:?} added at {:?}", id, position);
        id
    }

    /// Take a layer out of the container. Removing the lowest modal layer ends the modal session.
    pub fn remove_control(&mut self, id: LayerId) -> Option<Box<dyn LayerControl>> {
        let control = self.layers.shift_remove(&id)?;
        if self.modal.is_some_and(|modal| modal.lowest_modal == id) {
            log::debug!("lowest modal layer {:?} removed; modal session ended", id);
            self.modal = None;
        }
        log::debug!("layer {:?} removed", id);
        Some(control)
    }

    /// Move a layer to the top. Returns whether the layer exists.
    pub fn bring_to_top(&mut self, id: LayerId) -> bool {
        let Some(index) = self.layers.get_index_of(&id) else {
            return false;
        };
        let last = self.layers.len() - 1;
        if index != last {
            self.layers.move_index(index, last);
            log::trace!("layer {:?} brought to top", id);
        }
        true
    }

    /// Start, change or end (with `None`) the modal session.
    pub fn set_modal(&mut self, modal: Option<ModalOptions>) -> GuiResult<()> {
        if let Some(options) = &modal {
            if !self.layers.contains_key(&options.lowest_modal) {
                return Err(GuiError::unknown_layer(options.lowest_modal));
            }
            self.fade_time = options.lightbox_fade_time;
            self.lightbox_anchor = Some(options.lowest_modal);
        }
        log::debug!("modal session set to {:?}", modal);
        self.modal = modal;
        Ok(())
    }

    /// The active modal session.
    pub fn modal(&self) -> Option<&ModalOptions> {
        self.modal.as_ref()
    }

    /// Current lightbox opacity in `0..=1`.
    pub fn lightbox_alpha(&self) -> f64 {
        self.lightbox_alpha
    }

    /// A layer by ID.
    pub fn layer(&self, id: LayerId) -> Option<&dyn LayerControl> {
        self.layers.get(&id).map(|layer| &**layer)
    }

    /// A layer by ID, mutably.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut (dyn LayerControl + 'static)> {
        self.layers.get_mut(&id).map(|layer| &mut **layer)
    }

    /// Whether `id` is a layer of this container.
    pub fn contains(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    /// Layer IDs back to front.
    pub fn layers(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.keys().copied()
    }

    /// The topmost layer.
    pub fn top(&self) -> Option<LayerId> {
        self.layers.last().map(|(id, _)| *id)
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether there are no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<LayerEvent> {
        std::mem::take(&mut self.events)
    }

    fn fade_lightbox(&mut self, dt: f64) {
        let target = match self.modal {
            Some(options) if options.lightbox => 1.0,
            _ => 0.0,
        };
        if self.fade_time <= 0.0 {
            self.lightbox_alpha = target;
            return;
        }
        let step = dt / self.fade_time;
        self.lightbox_alpha = if self.lightbox_alpha < target {
            (self.lightbox_alpha + step).min(target)
        } else {
            (self.lightbox_alpha - step).max(target)
        };
    }

    /// Report a background click and hide the mouse from what lies below the modal layers.
    fn block_below_modal(&mut self, input: &mut InputContext<'_>, options: ModalOptions) {
        if input.mouse(self.id).is_some_and(|mouse| mouse.any_pushed()) {
            log::debug!("background click below modal layer {:?}", options.lowest_modal);
            self.events.push(LayerEvent::BackgroundClick);
        }
        if !options.mouse_fallthrough {
            input.stencil_fill();
        }
    }

    fn render_lightbox(&self, ctx: &mut RenderContext<'_>) {
        let alpha = self.lightbox_color.components[3] * self.lightbox_alpha as f32;
        let color = self.lightbox_color.with_alpha(alpha);
        ctx.draw_solid(color, Rectangle::from_size(self.size));
    }
}

impl Renderable for LayerContainer {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        if let Some(background) = &self.background {
            background.render(ctx);
        }

        let lightbox_index = if self.lightbox_alpha > 0.0 {
            let anchor = self
                .lightbox_anchor
                .and_then(|anchor| self.layers.get_index_of(&anchor));
            Some(anchor.unwrap_or(0))
        } else {
            None
        };

        for (index, layer) in self.layers.values().enumerate() {
            if lightbox_index == Some(index) {
                self.render_lightbox(ctx);
            }
            let bounds = layer.bounds();
            let mut moved = ctx.translate(bounds.location);
            let mut clipped = moved.clip(Rectangle::from_size(bounds.size));
            layer.render(&mut clipped);
        }

        if lightbox_index.is_some() && self.layers.is_empty() {
            self.render_lightbox(ctx);
        }
    }
}

impl Updatable for LayerContainer {
    fn update(&mut self, input: &mut InputContext<'_>, dt: f64) {
        self.fade_lightbox(dt);

        let modal = self.modal;
        let modal_index = modal.and_then(|options| self.layers.get_index_of(&options.lowest_modal));
        let mut blocked = false;
        let mut raise = None;

        let mut input = input.stencil();
        for index in (0..self.layers.len()).rev() {
            if let (Some(options), Some(lowest)) = (modal, modal_index) {
                if !blocked && index < lowest {
                    self.block_below_modal(&mut input, options);
                    blocked = true;
                }
            }

            let id = self.id;
            let Some((layer_id, layer)) = self.layers.get_index_mut(index) else {
                continue;
            };
            let bounds = layer.bounds();
            {
                let mut own = input.stencil();
                own.stencil_clip(bounds);
                let pushed = own.mouse(id).is_some_and(|mouse| mouse.any_pushed());
                if pushed && !blocked && raise.is_none() {
                    raise = Some(*layer_id);
                }
                let mut moved = own.translate(bounds.location);
                layer.update(&mut moved, dt);
            }
            input.stencil_occlude(bounds);
        }

        if let Some(options) = modal {
            if !blocked && modal_index.is_some() {
                self.block_below_modal(&mut input, options);
            }
        }

        if let Some(background) = &mut self.background {
            background.update(&mut input, dt);
        }
        drop(input);

        if let Some(id) = raise {
            self.bring_to_top(id);
        }
    }
}

impl Resizable for LayerContainer {
    fn size(&self) -> Point {
        self.size
    }

    fn resize(&mut self, size: Point) {
        self.size = checked_size(size);
        if let Some(background) = &mut self.background {
            background.resize(self.size);
        }
    }
}

impl Control for LayerContainer {
    fn dispose(&mut self) {
        for layer in self.layers.values_mut() {
            layer.dispose();
        }
        if let Some(background) = &mut self.background {
            background.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::control::Placement;
    use crate::input::{DeviceInput, MouseButtons};
    use crate::render::DrawList;
    use crate::session::GuiSession;

    #[derive(Default)]
    struct Counters {
        clicks: Cell<u32>,
        updates: Cell<u32>,
    }

    struct Probe {
        id: ControlId,
        placement: Placement,
        size: Point,
        color: Color,
        counters: Rc<Counters>,
    }

    impl Probe {
        fn boxed(size: Point, color: Color) -> (Box<Self>, Rc<Counters>) {
            let counters = Rc::new(Counters::default());
            let probe = Self {
                id: ControlId::new(),
                placement: Placement::default(),
                size,
                color,
                counters: counters.clone(),
            };
            (Box::new(probe), counters)
        }
    }

    impl Renderable for Probe {
        fn render(&self, ctx: &mut RenderContext<'_>) {
            ctx.draw_solid(self.color, Rectangle::from_size(self.size));
        }
    }

    impl Updatable for Probe {
        fn update(&mut self, input: &mut InputContext<'_>, _dt: f64) {
            self.counters.updates.set(self.counters.updates.get() + 1);
            if let Some(mouse) = input.mouse_in(self.id, Rectangle::from_size(self.size)) {
                if mouse.was_pushed(MouseButtons::LEFT) {
                    self.counters.clicks.set(self.counters.clicks.get() + 1);
                }
            }
        }
    }

    impl Resizable for Probe {
        fn size(&self) -> Point {
            self.size
        }

        fn resize(&mut self, size: Point) {
            self.size = checked_size(size);
        }
    }

    impl Control for Probe {}

    impl LayerControl for Probe {
        fn placement(&self) -> &Placement {
            &self.placement
        }

        fn placement_mut(&mut self) -> &mut Placement {
            &mut self.placement
        }
    }

    fn click_at(x: f64, y: f64) -> DeviceInput {
        let mut device = DeviceInput::new();
        device.move_cursor(x, y);
        device.press(MouseButtons::LEFT);
        device
    }

    const SIZE: Point = Point { x: 100.0, y: 100.0 };

    #[test]
    fn topmost_layer_takes_the_click() {
        let mut container = LayerContainer::new(Point::new(400.0, 400.0));
        let (lower, lower_hits) = Probe::boxed(SIZE, Color::BLACK);
        let (upper, upper_hits) = Probe::boxed(SIZE, Color::WHITE);
        let lower = container.add_control(lower, Point::new(0.0, 0.0));
        let upper = container.add_control(upper, Point::new(50.0, 50.0));

        let mut session = GuiSession::new();
        session.update(&mut container, &click_at(60.0, 60.0), 0.016);
        assert_eq!(upper_hits.clicks.get(), 1);
        assert_eq!(lower_hits.clicks.get(), 0);
        // both layers still update
        assert_eq!(lower_hits.updates.get(), 1);
        assert_eq!(container.top(), Some(upper));

        // a push on the exposed part of the lower layer raises it
        session.update(&mut container, &click_at(10.0, 10.0), 0.016);
        assert_eq!(lower_hits.clicks.get(), 1);
        assert_eq!(container.top(), Some(lower));
    }

    #[test]
    fn modal_blocks_lower_layers_and_background() {
        let (background, background_hits) = Probe::boxed(SIZE, Color::BLACK);
        let mut container = LayerContainer::new(Point::new(400.0, 400.0)).with_background(background);
        let (below, below_hits) = Probe::boxed(SIZE, Color::BLACK);
        let (dialog, dialog_hits) = Probe::boxed(SIZE, Color::WHITE);
        let below = container.add_control(below, Point::new(0.0, 0.0));
        let dialog = container.add_control(dialog, Point::new(200.0, 200.0));
        container.set_modal(Some(ModalOptions::new(dialog))).unwrap();

        let mut session = GuiSession::new();
        session.update(&mut container, &click_at(10.0, 10.0), 0.016);
        assert_eq!(below_hits.clicks.get(), 0);
        assert_eq!(background_hits.clicks.get(), 0);
        assert_eq!(container.drain_events(), vec![LayerEvent::BackgroundClick]);
        assert_eq!(container.top(), Some(dialog), "blocked layers are not raised");
        let _ = below;

        session.update(&mut container, &click_at(250.0, 250.0), 0.016);
        assert_eq!(dialog_hits.clicks.get(), 1);
        assert!(container.drain_events().is_empty());
    }

    #[test]
    fn fallthrough_still_reports_background_click() {
        let mut container = LayerContainer::new(Point::new(400.0, 400.0));
        let (below, below_hits) = Probe::boxed(SIZE, Color::BLACK);
        let (dialog, _) = Probe::boxed(SIZE, Color::WHITE);
        container.add_control(below, Point::ZERO);
        let dialog = container.add_control(dialog, Point::new(200.0, 200.0));
        container
            .set_modal(Some(ModalOptions::new(dialog).with_mouse_fallthrough(true)))
            .unwrap();

        GuiSession::new().update(&mut container, &click_at(10.0, 10.0), 0.016);
        assert_eq!(below_hits.clicks.get(), 1);
        assert_eq!(container.drain_events(), vec![LayerEvent::BackgroundClick]);
    }

    #[test]
    fn modal_must_name_a_member() {
        let mut container = LayerContainer::new(SIZE);
        let mut other = LayerContainer::new(SIZE);
        let (probe, _) = Probe::boxed(SIZE, Color::BLACK);
        let foreign = other.add_control(probe, Point::ZERO);
        assert_eq!(
            container.set_modal(Some(ModalOptions::new(foreign))),
            Err(GuiError::UnknownLayer { layer: foreign })
        );
        assert!(container.modal().is_none());
    }

    #[test]
    fn removing_the_modal_layer_ends_the_session() {
        let mut container = LayerContainer::new(SIZE);
        let (probe, _) = Probe::boxed(SIZE, Color::BLACK);
        let id = container.add_control(probe, Point::ZERO);
        container.set_modal(Some(ModalOptions::new(id))).unwrap();
        assert!(container.remove_control(id).is_some());
        assert!(container.modal().is_none());
        assert!(container.remove_control(id).is_none());
        assert!(!container.bring_to_top(id));
    }

    #[test]
    fn lightbox_fades_and_renders_below_modal() {
        let lightbox = Color::from_rgba8(0, 0, 255, 255);
        let mut container = LayerContainer::new(Point::new(400.0, 400.0)).with_lightbox_color(lightbox);
        let (below, _) = Probe::boxed(SIZE, Color::BLACK);
        let (dialog, _) = Probe::boxed(SIZE, Color::WHITE);
        container.add_control(below, Point::ZERO);
        let dialog = container.add_control(dialog, Point::new(200.0, 200.0));
        container
            .set_modal(Some(ModalOptions::new(dialog).with_lightbox(0.5)))
            .unwrap();

        let mut session = GuiSession::new();
        let device = DeviceInput::new();
        session.update(&mut container, &device, 0.25);
        assert!((container.lightbox_alpha() - 0.5).abs() < 1e-9);
        session.update(&mut container, &device, 1.0);
        assert_eq!(container.lightbox_alpha(), 1.0);

        let mut list = DrawList::new();
        session.render(&container, &mut list);
        let colors: Vec<Color> = list.solids().map(|(_, color)| color).collect();
        assert_eq!(colors, vec![Color::BLACK, lightbox, Color::WHITE]);

        container.set_modal(None).unwrap();
        session.update(&mut container, &device, 0.25);
        session.update(&mut container, &device, 0.25);
        assert_eq!(container.lightbox_alpha(), 0.0);
    }

    #[test]
    fn layers_render_translated_and_clipped() {
        let mut container = LayerContainer::new(Point::new(400.0, 400.0));
        let (probe, _) = Probe::boxed(SIZE, Color::WHITE);
        let id = container.add_control(probe, Point::new(30.0, 40.0));
        container.layer_mut(id).unwrap().resize(Point::new(20.0, 10.0));

        let mut list = DrawList::new();
        GuiSession::new().render(&container, &mut list);
        let command = &list.commands()[0];
        assert_eq!(command.rect(), Rectangle::from_xywh(30.0, 40.0, 20.0, 10.0));
        assert_eq!(command.clip(), Some(Rectangle::from_xywh(30.0, 40.0, 20.0, 10.0)));
        assert_eq!(list.clip(), None);
    }
}
