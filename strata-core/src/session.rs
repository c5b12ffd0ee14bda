use crate::config::GuiConfig;
use crate::control::Control;
use crate::input::{ControlId, DeviceInput, InputContext, Scope};
use crate::render::{RenderBackend, RenderContext};

/// Focus and capture state that outlives a single frame.
///
/// One session drives one control tree. Each tick the host feeds device
/// events into a [DeviceInput], calls [GuiSession::update], resets the device
/// input and then calls [GuiSession::render].
#[derive(Debug, Default)]
pub struct GuiSession {
    config: GuiConfig,
    pub(crate) mouse_focus: Option<ControlId>,
    pub(crate) keyboard_focus: Option<ControlId>,
    pub(crate) focus_stack: Vec<Scope>,
    pub(crate) frame: u64,
}

impl GuiSession {
    /// A session with the default [GuiConfig].
    pub fn new() -> Self {
        Self::default()
    }

    /// A session with a custom [GuiConfig].
    pub fn with_config(config: GuiConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    /// The control holding mouse capture.
    pub fn mouse_focus(&self) -> Option<ControlId> {
        self.mouse_focus
    }

    /// The control holding keyboard focus.
    pub fn keyboard_focus(&self) -> Option<ControlId> {
        self.keyboard_focus
    }

    /// The scope chain that holds focus for the next update pass.
    pub fn focus_stack(&self) -> &[Scope] {
        &self.focus_stack
    }

    /// Number of completed update passes.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Drop all focus and capture.
    pub fn clear_focus(&mut self) {
        self.mouse_focus = None;
        self.keyboard_focus = None;
        self.focus_stack.clear();
    }

    /// Begin an update pass by hand. Focus decisions are committed when the
    /// returned context is dropped.
    pub fn input<'s>(&'s mut self, device: &'s DeviceInput) -> InputContext<'s> {
        InputContext::new(self, device)
    }

    /// Run one update pass over `root`. `dt` is the time since the last pass in seconds.
    pub fn update(&mut self, root: &mut dyn Control, device: &DeviceInput, dt: f64) {
        let mut input = self.input(device);
        root.update(&mut input, dt);
    }

    /// Run one render pass over `root`.
    pub fn render(&self, root: &dyn Control, backend: &mut dyn RenderBackend) {
        let mut ctx = RenderContext::new(backend);
        root.render(&mut ctx);
    }
}
