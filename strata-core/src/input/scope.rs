use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;

bitflags! {
    /// Input channels a scope can hide.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputMask: u8 {
        /// Mouse position and buttons.
        const MOUSE = 1;
        /// Keys and typed text.
        const KEYBOARD = 1 << 1;
    }
}

/// Stable identity of a [Scope].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(u64);

impl ScopeId {
    /// Generate a new unique scope ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw ID value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl Default for ScopeId {
    fn default() -> Self {
        Self::new()
    }
}

/// An input mode that can take focus.
///
/// A control creates its scope once and pushes it every frame with
/// [InputContext::scope](super::InputContext::scope). While the scope holds
/// focus, `hide_outside` removes the listed input from everything outside the
/// scope and `hide_inside` removes it from everything nested inside it. A
/// draggable title bar, for example, hides the mouse outside itself so the
/// drag cannot be stolen by whatever the cursor passes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope {
    id: ScopeId,
    hide_outside: InputMask,
    hide_inside: InputMask,
}

impl Scope {
    /// A new scope that hides nothing.
    pub fn new() -> Self {
        Self {
            id: ScopeId::new(),
            hide_outside: InputMask::empty(),
            hide_inside: InputMask::empty(),
        }
    }

    /// Hide `mask` from controls outside this scope while it holds focus.
    pub fn with_hide_outside(mut self, mask: InputMask) -> Self {
        self.hide_outside = mask;
        self
    }

    /// Hide `mask` from controls nested in this scope while it holds focus.
    pub fn with_hide_inside(mut self, mask: InputMask) -> Self {
        self.hide_inside = mask;
        self
    }

    /// The scope identity.
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Input hidden outside the scope while it holds focus.
    pub fn hide_outside(&self) -> InputMask {
        self.hide_outside
    }

    /// Input hidden inside the scope while it holds focus.
    pub fn hide_inside(&self) -> InputMask {
        self.hide_inside
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity a control uses for coarse mouse and keyboard capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(u64);

impl ControlId {
    /// Generate a new unique control ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw ID value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl Default for ControlId {
    fn default() -> Self {
        Self::new()
    }
}
