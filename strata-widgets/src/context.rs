use std::sync::Arc;

use strata_core::text::{shared, MonospaceShaper, SharedTextShaper, TextSample, TextShaper, TextStyle};
use strata_skin::Skin;

/// What every widget of one interface shares: the skin and the text shaper.
///
/// Cloning is cheap; all clones refer to the same skin and shaper.
#[derive(Clone)]
pub struct WidgetContext {
    /// The look of the interface.
    pub skin: Arc<Skin>,
    /// Shapes and measures text.
    pub text: SharedTextShaper,
}

impl WidgetContext {
    /// A context owning `skin` and `shaper`.
    pub fn new(skin: Skin, shaper: impl TextShaper + 'static) -> Self {
        Self {
            skin: Arc::new(skin),
            text: shared(shaper),
        }
    }

    /// A context from already shared parts.
    pub fn from_shared(skin: Arc<Skin>, text: SharedTextShaper) -> Self {
        Self { skin, text }
    }

    /// The default skin with a font-free shaper.
    pub fn headless() -> Self {
        Self::new(Skin::default(), MonospaceShaper::default())
    }

    /// The skin's base text style.
    pub fn style(&self) -> TextStyle {
        TextStyle::new(self.skin.font_size)
    }

    /// Shape `text`, or `None` when the shaper is already busy further up the stack.
    pub fn shape(&self, text: &str, style: &TextStyle) -> Option<TextSample> {
        match self.text.try_borrow_mut() {
            Ok(mut shaper) => Some(shaper.shape(text, style)),
            Err(_) => {
                log::warn!("text shaper is already borrowed; keeping the previous sample for {:?}", text);
                None
            },
        }
    }

    /// Shape `text` with the base style.
    pub fn shape_plain(&self, text: &str) -> TextSample {
        self.shape(text, &self.style())
            .unwrap_or_else(|| TextSample::empty(f64::from(self.skin.font_size)))
    }
}

impl std::fmt::Debug for WidgetContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetContext")
            .field("skin", &self.skin.name)
            .finish_non_exhaustive()
    }
}
