// SPDX-License-Identifier: MIT OR Apache-2.0

use strata_core::control::{Control, LayerControl, Placement, Renderable, Resizable, Updatable};
use strata_core::geometry::{Point, Rectangle};
use strata_core::input::{ControlId, InputContext, InputMask, MouseButtons, MouseState, Scope};
use strata_core::render::RenderContext;
use strata_core::text::{TextAlign, TextSample};

use crate::context::WidgetContext;

/// An entry of a [Popup] menu.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuItem {
    /// Picking it closes the menu and reports `command`.
    Command {
        /// Reported in [PopupEvent::Command].
        command: u32,
        /// Shown text.
        label: String,
        /// Disabled commands are drawn greyed out and cannot be picked.
        enabled: bool,
    },
    /// Hovering it opens a submenu.
    Compound {
        /// Shown text.
        label: String,
        /// Entries of the submenu.
        items: Vec<MenuItem>,
    },
    /// A thin line between groups of entries.
    Separator,
}

impl MenuItem {
    /// An enabled command.
    pub fn command(command: u32, label: impl Into<String>) -> Self {
        Self::Command {
            command,
            label: label.into(),
            enabled: true,
        }
    }

    /// A submenu.
    pub fn compound(label: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self::Compound {
            label: label.into(),
            items,
        }
    }

    /// The same item, disabled if it is a command.
    pub fn disabled(mut self) -> Self {
        if let Self::Command { enabled, .. } = &mut self {
            *enabled = false;
        }
        self
    }
}

/// What a [Popup] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupEvent {
    /// A command was picked.
    Command(u32),
    /// A push outside the menu closed it.
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Track {
    Outside,
    Inside,
    Picked(u32),
}

/// One level of a menu and its open submenu, if any.
struct Menu {
    items: Vec<MenuItem>,
    labels: Vec<Option<TextSample>>,
    rows: Vec<Rectangle>,
    marker: TextSample,
    size: Point,
    hovered: Option<usize>,
    submenu: Option<(usize, Box<Menu>)>,
}

impl Menu {
    fn new(ctx: &WidgetContext, items: Vec<MenuItem>) -> Self {
        let pad = ctx.skin.padding;
        let marker = ctx.shape_plain(">");
        let line = marker.line_height();

        let mut labels = Vec::with_capacity(items.len());
        let mut rows = Vec::with_capacity(items.len());
        let mut width: f64 = 0.0;
        let mut top = 0.0;
        for item in &items {
            let (label, row_width, height) = match item {
                MenuItem::Command { label, .. } => {
                    let sample = ctx.shape_plain(label);
                    let width = sample.size().x + pad * 2.0;
                    (Some(sample), width, line + pad * 2.0)
                },
                MenuItem::Compound { label, .. } => {
                    let sample = ctx.shape_plain(label);
                    let width = sample.size().x + marker.size().x + pad * 3.0;
                    (Some(sample), width, line + pad * 2.0)
                },
                MenuItem::Separator => (None, pad * 2.0, ctx.skin.popup.separator_height),
            };
            labels.push(label);
            rows.push(Rectangle::from_xywh(0.0, top, 0.0, height));
            width = width.max(row_width);
            top += height;
        }
        for row in &mut rows {
            row.size.x = width;
        }

        Self {
            items,
            labels,
            rows,
            marker,
            size: Point::new(width, top),
            hovered: None,
            submenu: None,
        }
    }

    fn submenu_offset(&self, index: usize) -> Point {
        Point::new(self.size.x, self.rows[index].top())
    }

    /// Size of this menu and every open submenu together.
    fn extent(&self) -> Point {
        match &self.submenu {
            Some((index, submenu)) => self.size.max(self.submenu_offset(*index) + submenu.extent()),
            None => self.size,
        }
    }

    fn collapse(&mut self) {
        self.hovered = None;
        self.submenu = None;
    }

    fn track(&mut self, ctx: &WidgetContext, position: Point, mouse: &MouseState) -> Track {
        if let Some((index, submenu)) = &mut self.submenu {
            let offset = Point::new(self.size.x, self.rows[*index].top());
            let inner = submenu.track(ctx, position - offset, mouse);
            if inner != Track::Outside {
                return inner;
            }
        }

        if !Rectangle::from_size(self.size).contains(position) {
            if self.submenu.is_none() {
                self.hovered = None;
            }
            return Track::Outside;
        }

        let Some(index) = self.rows.iter().position(|row| row.contains(position)) else {
            return Track::Inside;
        };
        match &self.items[index] {
            MenuItem::Command {
                command, enabled, ..
            } => {
                self.hovered = Some(index);
                self.submenu = None;
                if *enabled && mouse.was_released(MouseButtons::LEFT) {
                    return Track::Picked(*command);
                }
            },
            MenuItem::Compound { items, .. } => {
                self.hovered = Some(index);
                if self.submenu.as_ref().map(|(open, _)| *open) != Some(index) {
                    log::trace!("submenu {} opened", index);
                    self.submenu = Some((index, Box::new(Menu::new(ctx, items.clone()))));
                }
            },
            MenuItem::Separator => {
                self.hovered = None;
                self.submenu = None;
            },
        }
        Track::Inside
    }

    fn render(&self, ctx: &mut RenderContext<'_>, widgets: &WidgetContext) {
        let skin = &widgets.skin;
        let pad = skin.padding;
        ctx.draw_surface(&skin.popup.body, Rectangle::from_size(self.size));

        for (index, (item, row)) in self.items.iter().zip(&self.rows).enumerate() {
            if self.hovered == Some(index) {
                ctx.draw_surface(&skin.popup.highlight, *row);
            }
            let text_area = Rectangle::from_xywh(pad, row.top(), row.size.x - pad * 2.0, row.size.y);
            match (item, &self.labels[index]) {
                (MenuItem::Command { enabled, .. }, Some(label)) => {
                    let color = if *enabled { skin.text } else { skin.text_disabled };
                    ctx.draw_text_in(color, label, text_area, TextAlign::Left);
                },
                (MenuItem::Compound { .. }, Some(label)) => {
                    ctx.draw_text_in(skin.text, label, text_area, TextAlign::Left);
                    ctx.draw_text_in(skin.text, &self.marker, text_area, TextAlign::Right);
                },
                (MenuItem::Separator, _) => {
                    let middle = row.top() + row.size.y * 0.5;
                    let line = Rectangle::from_xywh(pad, middle - 0.5, row.size.x - pad * 2.0, 1.0);
                    ctx.draw_solid(skin.popup.separator, line);
                },
                _ => {},
            }
        }

        if let Some((index, submenu)) = &self.submenu {
            let mut moved = ctx.translate(self.submenu_offset(*index));
            submenu.render(&mut moved, widgets);
        }
    }
}

/// A popup menu with nested submenus.
///
/// The popup is a [LayerControl]: add it to a
/// [LayerContainer](strata_core::layer::LayerContainer) where it should open.
/// While open it keeps its scope focused with the mouse hidden outside, so it
/// sees pushes anywhere in the window and dismisses itself on one that lands
/// outside every open level.
pub struct Popup {
    id: ControlId,
    ctx: WidgetContext,
    placement: Placement,
    scope: Scope,
    menu: Menu,
    open: bool,
    /// Closed from outside an update pass while its scope may still hold focus.
    release_pending: bool,
    events: Vec<PopupEvent>,
    on_event: Option<Box<dyn FnMut(PopupEvent)>>,
}

impl Popup {
    /// An open popup listing `items`.
    pub fn new(ctx: &WidgetContext, items: Vec<MenuItem>) -> Self {
        Self {
            id: ControlId::new(),
            ctx: ctx.clone(),
            placement: Placement::default(),
            scope: Scope::new().with_hide_outside(InputMask::MOUSE),
            menu: Menu::new(ctx, items),
            open: true,
            release_pending: false,
            events: Vec::new(),
            on_event: None,
        }
    }

    /// Run `callback` for every event as it happens.
    pub fn with_on_event(mut self, callback: impl FnMut(PopupEvent) + 'static) -> Self {
        self.on_event = Some(Box::new(callback));
        self
    }

    /// Show the popup again, with every submenu closed.
    pub fn open(&mut self) {
        self.menu.collapse();
        self.open = true;
        self.release_pending = false;
    }

    /// Hide the popup.
    ///
    /// The popup gives its focus back during the next update pass. For that
    /// one pass the rest of the tree still cannot see the mouse, because the
    /// hidden input is fixed when the pass starts.
    pub fn close(&mut self) {
        self.menu.collapse();
        self.release_pending |= self.open;
        self.open = false;
    }

    /// Whether the popup is showing.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The top-level entries.
    pub fn items(&self) -> &[MenuItem] {
        &self.menu.items
    }

    /// Events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<PopupEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: PopupEvent) {
        log::debug!("popup {:?}: {:?}", self.id, event);
        if let Some(callback) = &mut self.on_event {
            callback(event);
        }
        self.events.push(event);
    }
}

impl Renderable for Popup {
    fn render(&self, ctx: &mut RenderContext<'_>) {
        if self.open {
            self.menu.render(ctx, &self.ctx);
        }
    }
}

impl Updatable for Popup {
    fn update(&mut self, input: &mut InputContext<'_>, _dt: f64) {
        if !self.open {
            if std::mem::take(&mut self.release_pending) {
                input.scope(self.scope).release();
            }
            return;
        }
        let mut scoped = input.scope(self.scope);
        scoped.focus();
        let Some(mouse) = scoped.mouse(self.id) else {
            return;
        };

        let event = match self.menu.track(&self.ctx, mouse.position, &mouse) {
            Track::Picked(command) => Some(PopupEvent::Command(command)),
            Track::Outside if mouse.any_pushed() => Some(PopupEvent::Dismissed),
            _ => None,
        };
        if let Some(event) = event {
            self.close();
            self.release_pending = false;
            scoped.release();
            drop(scoped);
            self.emit(event);
        }
    }
}

impl Resizable for Popup {
    fn size(&self) -> Point {
        if self.open {
            self.menu.extent()
        } else {
            Point::ZERO
        }
    }

    fn resize(&mut self, _size: Point) {
        log::trace!("popup {:?} sizes itself; resize ignored", self.id);
    }
}

impl Control for Popup {
    fn dispose(&mut self) {
        self.close();
        self.on_event = None;
    }
}

impl LayerControl for Popup {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use strata_core::config::GuiConfig;
    use strata_core::input::DeviceInput;
    use strata_core::layer::LayerContainer;
    use strata_core::session::GuiSession;

    use super::*;

    fn file_menu(ctx: &WidgetContext) -> Popup {
        Popup::new(
            ctx,
            vec![
                MenuItem::command(1, "Open"),
                MenuItem::Separator,
                MenuItem::command(2, "Quit"),
                MenuItem::command(3, "Gone").disabled(),
            ],
        )
    }

    fn click(session: &mut GuiSession, popup: &mut Popup, device: &mut DeviceInput) {
        device.press(MouseButtons::LEFT);
        session.update(popup, device, 0.016);
        device.reset();
        device.release(MouseButtons::LEFT);
        session.update(popup, device, 0.016);
        device.reset();
    }

    #[test]
    fn rows_stack_vertically() {
        let ctx = WidgetContext::headless();
        let popup = file_menu(&ctx);
        // rows are 17.5 + 2 * 4 high, the separator 7, labels 4 * 7 wide plus padding
        assert_eq!(popup.size(), Point::new(36.0, 25.5 * 3.0 + 7.0));
        assert_eq!(popup.menu.rows[2].top(), 32.5);
    }

    #[test]
    fn release_on_command_picks_it() {
        let ctx = WidgetContext::headless();
        let mut popup = file_menu(&ctx);
        let mut session = GuiSession::new();
        let mut device = DeviceInput::new();

        device.move_cursor(10.0, 40.0);
        session.update(&mut popup, &device, 0.016);
        assert_eq!(popup.menu.hovered, Some(2));
        assert_eq!(session.focus_stack().len(), 1);

        click(&mut session, &mut popup, &mut device);
        assert_eq!(popup.drain_events(), vec![PopupEvent::Command(2)]);
        assert!(!popup.is_open());
        assert_eq!(popup.size(), Point::ZERO);
        assert!(session.focus_stack().is_empty());
    }

    #[test]
    fn disabled_commands_and_separators_do_nothing() {
        let ctx = WidgetContext::headless();
        let mut popup = file_menu(&ctx);
        let mut session = GuiSession::new();
        let mut device = DeviceInput::new();

        device.move_cursor(10.0, 28.0);
        click(&mut session, &mut popup, &mut device);
        device.move_cursor(10.0, 70.0);
        click(&mut session, &mut popup, &mut device);
        assert!(popup.drain_events().is_empty());
        assert!(popup.is_open());
    }

    #[test]
    fn submenu_opens_on_hover_and_picks() {
        let ctx = WidgetContext::headless();
        let mut popup = Popup::new(
            &ctx,
            vec![
                MenuItem::compound("More", vec![MenuItem::command(7, "Deep")]),
                MenuItem::command(1, "A"),
            ],
        );
        let mut session = GuiSession::new();
        let mut device = DeviceInput::new();

        // "More" is 28 wide, plus the 7 wide marker and three paddings
        assert_eq!(popup.size(), Point::new(47.0, 51.0));
        device.move_cursor(5.0, 5.0);
        session.update(&mut popup, &device, 0.016);
        assert_eq!(popup.size(), Point::new(83.0, 51.0));

        // moving into the submenu keeps it open
        device.move_cursor(50.0, 5.0);
        session.update(&mut popup, &device, 0.016);
        assert_eq!(popup.menu.hovered, Some(0));
        click(&mut session, &mut popup, &mut device);
        assert_eq!(popup.drain_events(), vec![PopupEvent::Command(7)]);

        // hovering a command closes the submenu
        popup.open();
        device.move_cursor(5.0, 5.0);
        session.update(&mut popup, &device, 0.016);
        device.move_cursor(5.0, 30.0);
        session.update(&mut popup, &device, 0.016);
        assert_eq!(popup.size(), Point::new(47.0, 51.0));
    }

    #[test]
    fn closing_between_passes_gives_focus_back() {
        let ctx = WidgetContext::headless();
        let mut popup = file_menu(&ctx);
        // without clearing, only an explicit release drops the focus stack
        let config = GuiConfig::default().with_unreached_focus_clearing(false);
        let mut session = GuiSession::with_config(config);
        let mut device = DeviceInput::new();

        device.move_cursor(10.0, 10.0);
        session.update(&mut popup, &device, 0.016);
        assert_eq!(session.focus_stack().len(), 1);

        popup.close();
        session.update(&mut popup, &device, 0.016);
        assert!(session.focus_stack().is_empty());
        session.update(&mut popup, &device, 0.016);
        assert!(session.focus_stack().is_empty());
        assert!(popup.drain_events().is_empty());
    }

    #[test]
    fn push_outside_dismisses_through_the_layer_stencil() {
        let ctx = WidgetContext::headless();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let popup = file_menu(&ctx).with_on_event(move |event| sink.borrow_mut().push(event));

        let mut container = LayerContainer::new(Point::new(800.0, 600.0));
        let layer = container.add_control(Box::new(popup), Point::new(100.0, 100.0));
        let mut session = GuiSession::new();
        let mut device = DeviceInput::new();

        device.move_cursor(105.0, 105.0);
        session.update(&mut container, &device, 0.016);
        // the cursor is outside the layer, only the focused scope lets the popup see it
        device.move_cursor(400.0, 400.0);
        device.press(MouseButtons::LEFT);
        session.update(&mut container, &device, 0.016);

        assert_eq!(*seen.borrow(), vec![PopupEvent::Dismissed]);
        assert!(session.focus_stack().is_empty());
        assert_eq!(container.layer(layer).map(|layer| layer.size()), Some(Point::ZERO));
    }
}
