#![warn(missing_docs)]

//! Build layered, skinnable user interfaces on top of vello.
//!
//! The host owns the window and the GPU surface. Each tick it feeds window
//! events into a [DeviceInput](core::input::DeviceInput), then asks a
//! [GuiSession](core::session::GuiSession) to update and render its root
//! control into a [vello::Scene].

pub use nalgebra as math;
pub use vello::peniko as color;

pub use strata_core as core;
pub use strata_skin as skin;
pub use strata_widgets as widgets;

/// A "prelude" for users of the strata toolkit.
///
/// Importing this module brings into scope the most common types
/// needed to build a basic strata interface.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::config::GuiConfig;
    pub use crate::core::control::{
        BoxedControl, Control, LayerControl, Placement, Renderable, Resizable, Updatable,
    };
    pub use crate::core::geometry::{Point, Rectangle, Rotation};
    pub use crate::core::input::{
        ControlId, DeviceInput, InputContext, InputMask, MouseButtons, MouseState, Scope,
    };
    pub use crate::core::layer::{LayerContainer, LayerEvent, LayerId, ModalOptions};
    pub use crate::core::render::{DrawList, RenderBackend, RenderContext, Texture, VelloBackend};
    pub use crate::core::session::GuiSession;
    pub use crate::core::text::{MonospaceShaper, ParleyShaper, TextAlign, TextSample, TextShaper};
    pub use crate::core::{GuiError, GuiResult};

    // Skin
    pub use crate::skin::{Color, Skin, SkinConfig, SkinError, SkinResult, Surface};

    // Widgets
    pub use crate::widgets::button::{Button, ButtonState};
    pub use crate::widgets::context::WidgetContext;
    pub use crate::widgets::form::{Form, FormEvent};
    pub use crate::widgets::label::Label;
    pub use crate::widgets::panel::Panel;
    pub use crate::widgets::picture::Picture;
    pub use crate::widgets::popup::{MenuItem, Popup, PopupEvent};
    pub use crate::widgets::scrollbar::{Orientation, Scrollbar};
    pub use crate::widgets::textbox::Textbox;
}
