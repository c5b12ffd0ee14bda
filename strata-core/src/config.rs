/// Behaviour switches for a [GuiSession](crate::session::GuiSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuiConfig {
    /// Log a warning when a capture claim loses to an earlier claim in the same frame.
    pub warn_on_capture_conflict: bool,
    /// Drop mouse or keyboard capture whose holder did not query it during a frame.
    ///
    /// A control removed from the tree while holding capture would otherwise
    /// keep every other control blind forever.
    pub release_unseen_capture: bool,
    /// Clear the focus stack when the focused scope is not pushed during a frame.
    ///
    /// With `false` a frame without any `focus()` or `release()` call always
    /// keeps the previous focus stack, even when its scope is gone from the
    /// tree. That is the plain focus protocol; the default trades it for not
    /// leaving the rest of the tree blind behind a removed scope.
    pub clear_unreached_focus: bool,
}

impl GuiConfig {
    /// Set [GuiConfig::warn_on_capture_conflict].
    pub fn with_capture_conflict_warnings(mut self, warn: bool) -> Self {
        self.warn_on_capture_conflict = warn;
        self
    }

    /// Set [GuiConfig::release_unseen_capture].
    pub fn with_unseen_capture_release(mut self, release: bool) -> Self {
        self.release_unseen_capture = release;
        self
    }

    /// Set [GuiConfig::clear_unreached_focus].
    pub fn with_unreached_focus_clearing(mut self, clear: bool) -> Self {
        self.clear_unreached_focus = clear;
        self
    }
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            warn_on_capture_conflict: true,
            release_unseen_capture: true,
            clear_unreached_focus: true,
        }
    }
}
