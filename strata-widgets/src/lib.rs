#![warn(missing_docs)]

//! Widget library for strata => See `strata` crate.
//!
//! Contains the stock strata controls. Every widget shares a
//! [WidgetContext](context::WidgetContext) carrying the skin and the text shaper.

/// Contains the [WidgetContext](context::WidgetContext) shared by widgets.
pub mod context;

/// Contains the [TextBuffer](edit::TextBuffer) behind editable text.
pub mod edit;

/// Contains the [label::Label] widget.
pub mod label;

/// Contains the [button::Button] widget.
pub mod button;

/// Contains the [textbox::Textbox] widget.
pub mod textbox;

/// Contains the [scrollbar::Scrollbar] widget.
pub mod scrollbar;

/// Contains the [panel::Panel] container.
pub mod panel;

/// Contains the [picture::Picture] widget.
pub mod picture;

/// Contains the [form::Form] layer.
pub mod form;

/// Contains the [popup::Popup] menu layer.
pub mod popup;
