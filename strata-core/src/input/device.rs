use std::collections::HashSet;

use bitflags::bitflags;
use nalgebra::Vector2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::geometry::Point;

/// Pixels scrolled per wheel notch for line based scroll events.
pub const SCROLL_LINE_PIXELS: f64 = 20.0;

bitflags! {
    /// A set of mouse buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u8 {
        /// Primary button.
        const LEFT = 1;
        /// Secondary button.
        const RIGHT = 1 << 1;
        /// Wheel button.
        const MIDDLE = 1 << 2;
        /// Back side button.
        const BACK = 1 << 3;
        /// Forward side button.
        const FORWARD = 1 << 4;
    }
}

impl MouseButtons {
    /// Map a winit button. Buttons without a flag map to the empty set.
    pub fn from_winit(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Self::LEFT,
            MouseButton::Right => Self::RIGHT,
            MouseButton::Middle => Self::MIDDLE,
            MouseButton::Back => Self::BACK,
            MouseButton::Forward => Self::FORWARD,
            MouseButton::Other(_) => Self::empty(),
        }
    }
}

/// A discrete key press, including repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// Physical key.
    pub key: KeyCode,
    /// Whether this press is an auto-repeat.
    pub repeat: bool,
    /// Modifiers held at the time.
    pub modifiers: ModifiersState,
}

/// Raw mouse and keyboard state for one tick, supplied by the host.
///
/// Feed window events through [DeviceInput::handle_window_event] and call
/// [DeviceInput::reset] after each update pass so per-tick events do not
/// repeat.
#[derive(Debug, Clone)]
pub struct DeviceInput {
    /// The position of the cursor. If [None], the cursor left the window.
    pub cursor_pos: Option<Vector2<f64>>,
    /// Buttons currently held.
    pub buttons_down: MouseButtons,
    /// Buttons pressed since the last reset.
    pub buttons_pushed: MouseButtons,
    /// Buttons released since the last reset.
    pub buttons_released: MouseButtons,
    /// Scroll distance in pixels since the last reset.
    pub scroll_delta: Vector2<f64>,
    /// Keys currently held.
    pub keys_down: HashSet<KeyCode>,
    /// Key presses since the last reset, in order.
    pub key_presses: Vec<KeyPress>,
    /// Text typed since the last reset.
    pub typed: String,
    /// Current modifier keys state.
    pub modifiers: ModifiersState,
}

impl Default for DeviceInput {
    fn default() -> Self {
        Self {
            cursor_pos: None,
            buttons_down: MouseButtons::empty(),
            buttons_pushed: MouseButtons::empty(),
            buttons_released: MouseButtons::empty(),
            scroll_delta: Vector2::zeros(),
            keys_down: HashSet::new(),
            key_presses: Vec::with_capacity(4),
            typed: String::new(),
            modifiers: ModifiersState::default(),
        }
    }
}

impl DeviceInput {
    /// No cursor, nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-tick events. Held buttons, held keys and the cursor persist.
    pub fn reset(&mut self) {
        self.buttons_pushed = MouseButtons::empty();
        self.buttons_released = MouseButtons::empty();
        self.scroll_delta = Vector2::zeros();
        self.key_presses.clear();
        self.typed.clear();
    }

    /// Fold a winit window event into the snapshot.
    ///
    /// `scale_factor` converts physical cursor positions to logical pixels.
    pub fn handle_window_event(&mut self, event: &WindowEvent, scale_factor: f64) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(scale_factor);
                self.cursor_pos = Some(Vector2::new(logical.x, logical.y));
            },
            WindowEvent::CursorLeft { .. } => {
                self.cursor_pos = None;
            },
            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButtons::from_winit(*button);
                match state {
                    ElementState::Pressed => self.press(button),
                    ElementState::Released => self.release(button),
                }
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vector2::new(
                        f64::from(*x) * SCROLL_LINE_PIXELS,
                        f64::from(*y) * SCROLL_LINE_PIXELS,
                    ),
                    MouseScrollDelta::PixelDelta(position) => {
                        let logical = position.to_logical::<f64>(scale_factor);
                        Vector2::new(logical.x, logical.y)
                    },
                };
                self.scroll_delta += delta;
            },
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            },
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return;
                };
                match event.state {
                    ElementState::Pressed => {
                        self.keys_down.insert(key);
                        self.key_presses.push(KeyPress {
                            key,
                            repeat: event.repeat,
                            modifiers: self.modifiers,
                        });
                        if let Some(text) = &event.text {
                            self.type_text(text);
                        }
                    },
                    ElementState::Released => {
                        self.keys_down.remove(&key);
                    },
                }
            },
            WindowEvent::Focused(false) => {
                // releases are lost while unfocused
                self.buttons_down = MouseButtons::empty();
                self.keys_down.clear();
            },
            _ => (),
        }
    }

    /// Move the cursor to logical position `(x, y)`.
    pub fn move_cursor(&mut self, x: f64, y: f64) {
        self.cursor_pos = Some(Vector2::new(x, y));
    }

    /// Record a button press.
    pub fn press(&mut self, buttons: MouseButtons) {
        self.buttons_down |= buttons;
        self.buttons_pushed |= buttons;
    }

    /// Record a button release.
    pub fn release(&mut self, buttons: MouseButtons) {
        self.buttons_down -= buttons;
        self.buttons_released |= buttons;
    }

    /// Record a key press without text.
    pub fn press_key(&mut self, key: KeyCode) {
        self.keys_down.insert(key);
        self.key_presses.push(KeyPress {
            key,
            repeat: false,
            modifiers: self.modifiers,
        });
    }

    /// Record a key release.
    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    /// Record typed text. Control characters are dropped.
    pub fn type_text(&mut self, text: &str) {
        self.typed.extend(text.chars().filter(|c| !c.is_control()));
    }

    pub(crate) fn mouse_at(&self, position: Point) -> MouseState {
        MouseState {
            position,
            down: self.buttons_down,
            pushed: self.buttons_pushed,
            released: self.buttons_released,
            scroll: Point::new(self.scroll_delta.x, self.scroll_delta.y),
        }
    }
}

/// Mouse state as seen by one control, in its local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseState {
    /// Cursor position relative to the control's origin.
    pub position: Point,
    /// Buttons held.
    pub down: MouseButtons,
    /// Buttons pressed this tick.
    pub pushed: MouseButtons,
    /// Buttons released this tick.
    pub released: MouseButtons,
    /// Scroll distance this tick.
    pub scroll: Point,
}

impl MouseState {
    /// Whether any of `buttons` is held.
    pub fn is_down(&self, buttons: MouseButtons) -> bool {
        self.down.intersects(buttons)
    }

    /// Whether any of `buttons` was pressed this tick.
    pub fn was_pushed(&self, buttons: MouseButtons) -> bool {
        self.pushed.intersects(buttons)
    }

    /// Whether any of `buttons` was released this tick.
    pub fn was_released(&self, buttons: MouseButtons) -> bool {
        self.released.intersects(buttons)
    }

    /// Whether any button was pressed this tick.
    pub fn any_pushed(&self) -> bool {
        !self.pushed.is_empty()
    }
}

/// Keyboard state, handed only to the control holding keyboard focus.
#[derive(Debug, Clone, Copy)]
pub struct KeyboardState<'a> {
    device: &'a DeviceInput,
}

impl<'a> KeyboardState<'a> {
    pub(crate) fn new(device: &'a DeviceInput) -> Self {
        Self { device }
    }

    /// Whether `key` is held.
    pub fn is_down(&self, key: KeyCode) -> bool {
        self.device.keys_down.contains(&key)
    }

    /// Whether `key` was pressed (or repeated) this tick.
    pub fn was_pressed(&self, key: KeyCode) -> bool {
        self.device.key_presses.iter().any(|press| press.key == key)
    }

    /// Key presses this tick, in order.
    pub fn presses(&self) -> &'a [KeyPress] {
        &self.device.key_presses
    }

    /// Text typed this tick.
    pub fn typed(&self) -> &'a str {
        &self.device.typed
    }

    /// Current modifier keys.
    pub fn modifiers(&self) -> ModifiersState {
        self.device.modifiers
    }
}
