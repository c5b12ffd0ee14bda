#![warn(missing_docs)]

//! Core library for strata => See `strata` crate.
//!
//! Contains the effect stack, the render and input contexts, the focus and
//! capture protocol, and the control traits widgets implement.

pub use vello as vg;

/// Contains useful types for interacting with winit.
pub mod window {
    pub use winit::event::*;
    pub use winit::keyboard::*;
}

/// Contains the [GuiConfig](config::GuiConfig) struct.
pub mod config;

/// Contains the control traits and [LayerControl](control::LayerControl).
pub mod control;

/// Contains the generic [EffectStack](effect::EffectStack).
pub mod effect;

/// Contains the [GuiError](error::GuiError) type.
pub mod error;

/// Contains [Point](geometry::Point), [Rectangle](geometry::Rectangle) and [Rotation](geometry::Rotation).
pub mod geometry;

/// Contains the update pass and the focus protocol.
pub mod input;

/// Contains the [LayerContainer](layer::LayerContainer).
pub mod layer;

/// Contains the render pass and rendering backends.
pub mod render;

/// Contains the [GuiSession](session::GuiSession).
pub mod session;

/// Contains text measurement.
pub mod text;

pub use error::{GuiError, GuiResult};
