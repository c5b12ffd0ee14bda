//! The update pass.
//!
//! An [InputContext] is an effect stack over the input state a control sees:
//! the local mouse offset, the stencil flag that says whether the mouse is
//! visible here, and the input hidden by focused scopes.
//!
//! ## Focus stack
//!
//! A control that wants exclusive input for a while (a dragged title bar, an
//! open menu) pushes a [Scope] and calls [InputContext::focus]. The chain of
//! scopes active at that moment becomes the focus stack of the **next**
//! frame. While the next frame is walked, every scope that matches the
//! recorded chain gets the fixed state computed when the context was built:
//! the mouse is visible regardless of the stencil, and only the input hidden
//! by deeper focused scopes stays hidden. Everything outside the chain loses
//! the input named by the focused scopes' `hide_outside` masks.
//!
//! ## Capture
//!
//! [InputContext::capture_mouse] and [InputContext::capture_keyboard] are the
//! coarse alternative. They name a single [ControlId] that alone receives the
//! mouse (or the keyboard) until it releases it. Within one frame the first
//! claim wins.

use crate::effect::{Effect, EffectGuard, EffectHost, EffectStack, Effects};
use crate::geometry::{Point, Rectangle};
use crate::session::GuiSession;

/// Contains [DeviceInput](device::DeviceInput) and the per-control input views.
pub mod device;
/// Contains [Scope](scope::Scope) and the identity types.
pub mod scope;

pub use device::{DeviceInput, KeyPress, KeyboardState, MouseButtons, MouseState};
pub use scope::{ControlId, InputMask, Scope, ScopeId};

/// State threaded through the update pass.
pub struct InputState<'s> {
    session: &'s mut GuiSession,
    device: &'s DeviceInput,
    /// Focus stack carried over from the previous frame.
    incoming: Vec<Scope>,
    /// `outside[i]` is the union of `hide_outside` of `incoming[i..]`.
    outside: Vec<InputMask>,
    offset: Point,
    stencil: bool,
    hidden: InputMask,
    inside: InputMask,
    /// Effect depth of the focused scope, once reached on the current path.
    focus_depth: Option<usize>,
    /// Number of incoming scopes matched along the current path.
    matched: usize,
    on_chain: bool,
    active: Vec<Scope>,
    next_focus: Option<Vec<Scope>>,
    focus_reached: bool,
    mouse_claim: Option<ControlId>,
    keyboard_claim: Option<ControlId>,
    mouse_holder_seen: bool,
    keyboard_holder_seen: bool,
}

impl InputState<'_> {
    fn cursor(&self) -> Option<Point> {
        self.device.cursor_pos.map(|pos| Point::from(pos) - self.offset)
    }
}

/// What a scope effect overwrote, so removal can put it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScopeSnapshot {
    stencil: bool,
    hidden: InputMask,
    inside: InputMask,
    focus_depth: Option<usize>,
    matched: usize,
    on_chain: bool,
    substituted: bool,
}

/// Reversible input operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEffect {
    /// Shift the local origin by `offset`.
    Translate {
        /// Offset in the enclosing space.
        offset: Point,
        /// Accumulated offset before the effect.
        saved: Point,
    },
    /// Enter a focusable scope.
    Scope {
        /// The scope entered.
        scope: Scope,
        /// State before the effect, filled in on apply.
        saved: Option<ScopeSnapshot>,
    },
    /// Save the stencil flag and restore it on removal.
    Stencil {
        /// Flag before the effect.
        saved: bool,
    },
}

impl InputEffect {
    /// A translate effect.
    pub fn translate(offset: Point) -> Self {
        Self::Translate {
            offset,
            saved: Point::ZERO,
        }
    }

    /// A scope effect.
    pub fn scope(scope: Scope) -> Self {
        Self::Scope { scope, saved: None }
    }

    /// A stencil effect.
    pub fn stencil() -> Self {
        Self::Stencil { saved: true }
    }
}

impl<'s> Effect<InputState<'s>> for InputEffect {
    fn apply(&mut self, env: &mut InputState<'s>, enclosing: Effects<'_, Self>) {
        match self {
            Self::Translate { offset, saved } => {
                *saved = env.offset;
                env.offset += *offset;
            },
            Self::Stencil { saved } => {
                *saved = env.stencil;
            },
            Self::Scope { scope, saved } => {
                let mut snapshot = ScopeSnapshot {
                    stencil: env.stencil,
                    hidden: env.hidden,
                    inside: env.inside,
                    focus_depth: env.focus_depth,
                    matched: env.matched,
                    on_chain: env.on_chain,
                    substituted: false,
                };
                env.active.push(*scope);

                let expected = env.incoming.get(env.matched).map(Scope::id);
                if env.on_chain && expected == Some(scope.id()) {
                    env.matched += 1;
                    env.stencil = true;
                    env.hidden = env.outside[env.matched];
                    snapshot.substituted = true;
                    if env.matched == env.incoming.len() {
                        env.focus_reached = true;
                        env.focus_depth = Some(enclosing.len() + 1);
                        env.inside = scope.hide_inside();
                        log::trace!("focused scope {:?} reached", scope.id());
                    }
                } else {
                    env.on_chain = false;
                }
                *saved = Some(snapshot);
            },
        }
    }

    fn remove(&mut self, env: &mut InputState<'s>, _enclosing: Effects<'_, Self>) {
        match self {
            Self::Translate { saved, .. } => {
                env.offset = *saved;
            },
            Self::Stencil { saved } => {
                env.stencil = *saved;
            },
            Self::Scope { saved, .. } => {
                env.active.pop();
                if let Some(snapshot) = saved.take() {
                    if snapshot.substituted {
                        env.stencil = snapshot.stencil;
                    }
                    env.hidden = snapshot.hidden;
                    env.inside = snapshot.inside;
                    env.focus_depth = snapshot.focus_depth;
                    env.matched = snapshot.matched;
                    env.on_chain = snapshot.on_chain;
                }
            },
        }
    }
}

/// Filters device input for each control during the update pass.
///
/// The context commits its focus decisions to the [GuiSession] when it is
/// dropped, so build one per frame.
pub struct InputContext<'s> {
    stack: EffectStack<InputEffect, InputState<'s>>,
}

impl<'s> InputContext<'s> {
    /// Start an update pass with last frame's focus state from `session`.
    pub fn new(session: &'s mut GuiSession, device: &'s DeviceInput) -> Self {
        let incoming = std::mem::take(&mut session.focus_stack);

        let mut outside = vec![InputMask::empty(); incoming.len() + 1];
        for (i, scope) in incoming.iter().enumerate().rev() {
            outside[i] = outside[i + 1] | scope.hide_outside();
        }
        let hidden = outside[0];

        Self {
            stack: EffectStack::new(InputState {
                session,
                device,
                incoming,
                outside,
                offset: Point::ZERO,
                stencil: true,
                hidden,
                inside: InputMask::empty(),
                focus_depth: None,
                matched: 0,
                on_chain: true,
                active: Vec::new(),
                next_focus: None,
                focus_reached: false,
                mouse_claim: None,
                keyboard_claim: None,
                mouse_holder_seen: false,
                keyboard_holder_seen: false,
            }),
        }
    }

    /// Push an arbitrary input effect.
    pub fn with(&mut self, effect: InputEffect) -> EffectGuard<'_, Self> {
        EffectGuard::new(self, effect)
    }

    /// Shift the local origin to `offset`; children see the mouse relative to it.
    pub fn translate(&mut self, offset: Point) -> EffectGuard<'_, Self> {
        self.with(InputEffect::translate(offset))
    }

    /// Enter `scope`.
    pub fn scope(&mut self, scope: Scope) -> EffectGuard<'_, Self> {
        self.with(InputEffect::scope(scope))
    }

    /// Save the stencil flag; it is restored when the guard drops.
    pub fn stencil(&mut self) -> EffectGuard<'_, Self> {
        self.with(InputEffect::stencil())
    }

    /// Keep the mouse visible only inside `rect` (local coordinates).
    pub fn stencil_clip(&mut self, rect: Rectangle) {
        let env = self.stack.env_mut();
        env.stencil &= env.cursor().is_some_and(|cursor| rect.contains(cursor));
    }

    /// Hide the mouse inside `rect` (local coordinates).
    pub fn stencil_occlude(&mut self, rect: Rectangle) {
        let env = self.stack.env_mut();
        env.stencil &= env.cursor().map_or(true, |cursor| !rect.contains(cursor));
    }

    /// Hide the mouse everywhere.
    pub fn stencil_fill(&mut self) {
        self.stack.env_mut().stencil = false;
    }

    fn hidden(&self) -> InputMask {
        let env = self.stack.env();
        match env.focus_depth {
            Some(depth) if self.stack.depth() > depth => env.hidden | env.inside,
            _ => env.hidden,
        }
    }

    /// Whether an uncaptured control would see the mouse here.
    pub fn is_mouse_visible(&self) -> bool {
        let env = self.stack.env();
        env.session.mouse_focus.is_none()
            && env.stencil
            && env.device.cursor_pos.is_some()
            && !self.hidden().contains(InputMask::MOUSE)
    }

    /// The mouse as seen by control `id`, in local coordinates.
    ///
    /// `None` when the cursor is outside the window, when the mouse is
    /// stenciled out or hidden by a focused scope, or when another control
    /// holds mouse capture. The capture holder always sees the mouse.
    pub fn mouse(&mut self, id: ControlId) -> Option<MouseState> {
        let visible = self.is_mouse_visible();
        let env = self.stack.env_mut();
        match env.session.mouse_focus {
            Some(holder) if holder == id => env.mouse_holder_seen = true,
            Some(_) => return None,
            None if !visible => return None,
            None => {},
        }
        let cursor = env.cursor()?;
        Some(env.device.mouse_at(cursor))
    }

    /// The mouse as seen by control `id`, only while the cursor is inside `rect`.
    ///
    /// The capture holder sees the mouse anywhere.
    pub fn mouse_in(&mut self, id: ControlId, rect: Rectangle) -> Option<MouseState> {
        let mouse = self.mouse(id)?;
        if rect.contains(mouse.position) || self.has_mouse_capture(id) {
            Some(mouse)
        } else {
            None
        }
    }

    /// Keyboard state for control `id`, if it holds keyboard focus here.
    pub fn keyboard(&mut self, id: ControlId) -> Option<KeyboardState<'s>> {
        let hidden = self.hidden();
        let env = self.stack.env_mut();
        if env.session.keyboard_focus != Some(id) {
            return None;
        }
        env.keyboard_holder_seen = true;
        if hidden.contains(InputMask::KEYBOARD) {
            return None;
        }
        Some(KeyboardState::new(env.device))
    }

    /// Whether `id` holds mouse capture.
    pub fn has_mouse_capture(&self, id: ControlId) -> bool {
        self.stack.env().session.mouse_focus == Some(id)
    }

    /// Whether `id` holds keyboard focus.
    pub fn has_keyboard_focus(&self, id: ControlId) -> bool {
        self.stack.env().session.keyboard_focus == Some(id)
    }

    /// Claim the mouse for `id`. Returns whether the claim succeeded.
    ///
    /// The first claim of a frame wins; later claims by other controls in the
    /// same frame are rejected.
    pub fn capture_mouse(&mut self, id: ControlId) -> bool {
        let env = self.stack.env_mut();
        if let Some(claimant) = env.mouse_claim.filter(|claimant| *claimant != id) {
            if env.session.config().warn_on_capture_conflict {
                log::warn!(
                    "mouse capture by {:?} rejected: {:?} claimed it first this frame",
                    id,
                    claimant
                );
            }
            return false;
        }
        if env.session.mouse_focus != Some(id) {
            log::trace!("mouse captured by {:?}", id);
        }
        env.mouse_claim = Some(id);
        env.session.mouse_focus = Some(id);
        env.mouse_holder_seen = true;
        true
    }

    /// Give up mouse capture, if `id` holds it.
    pub fn release_mouse(&mut self, id: ControlId) {
        let env = self.stack.env_mut();
        if env.session.mouse_focus == Some(id) {
            log::trace!("mouse released by {:?}", id);
            env.session.mouse_focus = None;
        }
        if env.mouse_claim == Some(id) {
            env.mouse_claim = None;
        }
    }

    /// Claim the keyboard for `id`. Returns whether the claim succeeded.
    pub fn capture_keyboard(&mut self, id: ControlId) -> bool {
        let env = self.stack.env_mut();
        if let Some(claimant) = env.keyboard_claim.filter(|claimant| *claimant != id) {
            if env.session.config().warn_on_capture_conflict {
                log::warn!(
                    "keyboard capture by {:?} rejected: {:?} claimed it first this frame",
                    id,
                    claimant
                );
            }
            return false;
        }
        if env.session.keyboard_focus != Some(id) {
            log::trace!("keyboard captured by {:?}", id);
        }
        env.keyboard_claim = Some(id);
        env.session.keyboard_focus = Some(id);
        env.keyboard_holder_seen = true;
        true
    }

    /// Give up keyboard focus, if `id` holds it.
    pub fn release_keyboard(&mut self, id: ControlId) {
        let env = self.stack.env_mut();
        if env.session.keyboard_focus == Some(id) {
            log::trace!("keyboard released by {:?}", id);
            env.session.keyboard_focus = None;
        }
        if env.keyboard_claim == Some(id) {
            env.keyboard_claim = None;
        }
    }

    /// Ask for the active scope chain to hold focus from the next frame on.
    ///
    /// The first request of a frame wins. Without an active scope the call
    /// does nothing.
    pub fn focus(&mut self) {
        let env = self.stack.env_mut();
        if env.active.is_empty() {
            log::debug!("focus requested outside of any scope; ignored");
            return;
        }
        match &env.next_focus {
            Some(pending) if !pending.is_empty() => {
                log::trace!("focus already requested this frame; ignored");
            },
            _ => env.next_focus = Some(env.active.clone()),
        }
    }

    /// Give up focus held or requested by the innermost active scope.
    pub fn release(&mut self) {
        let env = self.stack.env_mut();
        let Some(innermost) = env.active.last().map(Scope::id) else {
            return;
        };
        let pending = env
            .next_focus
            .as_ref()
            .and_then(|stack| stack.last())
            .map(Scope::id);
        let holding = env.focus_depth.is_some() && env.incoming.last().map(Scope::id) == Some(innermost);
        if pending == Some(innermost) || holding {
            log::trace!("focus released by scope {:?}", innermost);
            env.next_focus = Some(Vec::new());
        }
    }

    /// Whether the innermost active scope is the focused scope.
    pub fn has_focus(&self) -> bool {
        let env = self.stack.env();
        env.on_chain
            && !env.incoming.is_empty()
            && env.matched == env.incoming.len()
            && env.active.len() == env.matched
    }

    /// The focus stack this frame started with, outermost first.
    pub fn focus_stack(&self) -> &[Scope] {
        &self.stack.env().incoming
    }

    /// Number of active effects.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }
}

impl EffectHost for InputContext<'_> {
    type Effect = InputEffect;

    fn push_effect(&mut self, effect: InputEffect) {
        self.stack.push(effect);
    }

    fn pop_effect(&mut self) -> InputEffect {
        self.stack.pop()
    }
}

impl Drop for InputContext<'_> {
    fn drop(&mut self) {
        if !self.stack.is_empty() {
            log::warn!(
                "update pass ended with {} effects still applied",
                self.stack.depth()
            );
            while self.stack.try_pop().is_some() {}
        }

        let env = self.stack.env_mut();
        let config = *env.session.config();
        let next = match env.next_focus.take() {
            Some(stack) => stack,
            None if env.focus_reached || env.incoming.is_empty() => std::mem::take(&mut env.incoming),
            None if !config.clear_unreached_focus => std::mem::take(&mut env.incoming),
            None => {
                log::debug!("focused scope was not reached this frame; focus cleared");
                Vec::new()
            },
        };

        if config.release_unseen_capture {
            if env.session.mouse_focus.is_some() && !env.mouse_holder_seen {
                log::debug!("mouse holder {:?} did not update; capture released", env.session.mouse_focus);
                env.session.mouse_focus = None;
            }
            if env.session.keyboard_focus.is_some() && !env.keyboard_holder_seen {
                log::debug!(
                    "keyboard holder {:?} did not update; capture released",
                    env.session.keyboard_focus
                );
                env.session.keyboard_focus = None;
            }
        }

        env.session.focus_stack = next;
        env.session.frame += 1;
    }
}
