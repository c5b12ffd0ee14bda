//! # Core Error Types
//!
//! Input and render operations never fail: "no input here" is `None` and
//! malformed rectangles are clamped. The errors below cover the few
//! configuration calls that can be handed bad arguments.

use thiserror::Error;

use crate::layer::LayerId;

/// Errors reported by strata core APIs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuiError {
    /// The layer is not a member of this container.
    #[error("Layer {layer:?} does not belong to this container")]
    UnknownLayer {
        /// The layer that was looked up.
        layer: LayerId,
    },

    /// A pixel buffer does not match the texture dimensions.
    #[error("Texture of {width}x{height} needs {expected} bytes, got {actual}")]
    TextureSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Bytes required.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
}

/// Result type alias for strata core operations.
pub type GuiResult<T> = Result<T, GuiError>;

impl GuiError {
    /// Create an unknown layer error.
    pub fn unknown_layer(layer: LayerId) -> Self {
        Self::UnknownLayer { layer }
    }
}
