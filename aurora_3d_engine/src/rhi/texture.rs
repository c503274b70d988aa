/// Texture trait and texture descriptor

use crate::error::{Error, Result};
use super::format::Format;

/// Sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

/// Addressing mode outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureWrap {
    #[default]
    Repeat,
    ClampToEdge,
    ClampToBorder,
}

/// Descriptor for creating a 2D texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: Format,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub wrap_s: TextureWrap,
    pub wrap_t: TextureWrap,
    /// Generate the mip chain after the initial upload
    pub generate_mipmaps: bool,
    /// Optional initial pixels (tightly packed, `width * height * bytes_per_pixel` bytes)
    pub data: Option<Vec<u8>>,
}

impl TextureDesc {
    /// Linear / repeat texture without initial data
    pub fn new(width: u32, height: u32, format: Format) -> Self {
        Self {
            width,
            height,
            format,
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
            wrap_s: TextureWrap::Repeat,
            wrap_t: TextureWrap::Repeat,
            generate_mipmaps: false,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }

    /// Reject empty dimensions and initial data of the wrong size
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidResource(format!(
                "Texture dimensions must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }
        if let Some(data) = &self.data {
            check_pixel_data(self.width, self.height, self.format, data)?;
        }
        Ok(())
    }
}

/// Check that `data` holds exactly one full image of the given size and format
pub fn check_pixel_data(width: u32, height: u32, format: Format, data: &[u8]) -> Result<()> {
    if format.is_compressed() {
        return Ok(());
    }
    let expected = width as u64 * height as u64 * format.bytes_per_pixel() as u64;
    if data.len() as u64 != expected {
        return Err(Error::InvalidResource(format!(
            "Pixel data size mismatch for {}x{} {:?}: expected {} bytes, got {}",
            width, height, format, expected, data.len()
        )));
    }
    Ok(())
}

/// Texture resource trait
///
/// Implemented by backend-specific texture types (e.g., OpenGLTexture).
/// Textures are shared (`Rc<dyn Texture>`) between materials and render
/// targets; the native texture is released when the last handle drops.
pub trait Texture {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn format(&self) -> Format;

    /// Backend object name (opaque to engine code)
    fn handle(&self) -> u64;

    /// Bind to texture unit `slot`
    fn bind(&self, slot: u32);

    fn unbind(&self);

    /// Replace the full image; `data` must match the current dimensions
    fn update_data(&self, data: &[u8]) -> Result<()>;

    /// Reallocate storage at a new size; contents become undefined
    fn resize(&self, width: u32, height: u32) -> Result<()>;

    fn set_filter(&self, min: TextureFilter, mag: TextureFilter);

    fn set_wrap(&self, wrap_s: TextureWrap, wrap_t: TextureWrap);

    fn filter(&self) -> (TextureFilter, TextureFilter);

    fn wrap(&self) -> (TextureWrap, TextureWrap);
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
