#![warn(missing_docs)]

//! # strata skins
//!
//! Colours, surfaces and metrics used by strata widgets.
//!
//! - **[Skin](skin::Skin)**: the complete look of an interface
//! - **[Surface](skin::Surface)**: a fill with an optional border
//! - **[SkinConfig](config::SkinConfig)**: picks a skin from `STRATA_SKIN` or code
//!
//! ```rust
//! use strata_skin::Skin;
//!
//! let skin = Skin::from_toml(r##"text = "#101010""##).unwrap();
//! assert_eq!(skin.padding, Skin::default().padding);
//! ```

/// Contains the [config::SkinConfig] struct for skin selection.
pub mod config;
/// Contains the [error::SkinError] type.
pub mod error;
/// Hex string serde helpers for colours.
pub mod serde_color;
/// Contains the [skin::Skin] struct and built-in skins.
pub mod skin;

pub use config::{SkinConfig, SkinSource};
pub use error::{SkinError, SkinResult};
pub use skin::{ButtonSkin, FormSkin, PopupSkin, ScrollbarSkin, Skin, Surface, TextboxSkin};
pub use vello::peniko::Color;
