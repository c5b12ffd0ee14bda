use vello::peniko::{Blob, ImageAlphaType, ImageBrush, ImageData, ImageFormat};

use crate::error::{GuiError, GuiResult};
use crate::geometry::Point;

/// An RGBA image ready to be drawn by a backend.
#[derive(Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    brush: ImageBrush,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Texture {
    /// Wrap tightly packed, non-premultiplied RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> GuiResult<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(GuiError::TextureSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        let brush = ImageBrush::new(ImageData {
            data: Blob::from(pixels),
            format: ImageFormat::Rgba8,
            alpha_type: ImageAlphaType::Alpha,
            width,
            height,
        });

        Ok(Self {
            width,
            height,
            brush,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size in pixels.
    pub fn size(&self) -> Point {
        Point::new(f64::from(self.width), f64::from(self.height))
    }

    /// The brush vello draws with.
    pub fn brush(&self) -> &ImageBrush {
        &self.brush
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_pixel_count() {
        let texture = Texture::from_rgba8(2, 3, vec![0; 24]).unwrap();
        assert_eq!(texture.size(), Point::new(2.0, 3.0));

        let err = Texture::from_rgba8(2, 3, vec![0; 23]).unwrap_err();
        assert!(matches!(
            err,
            GuiError::TextureSize {
                expected: 24,
                actual: 23,
                ..
            }
        ));
    }
}
