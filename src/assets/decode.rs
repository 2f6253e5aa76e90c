use std::sync::Arc;

use crate::foundation::{
    error::{OverlayError, OverlayResult},
    math::premultiply_rgba8_in_place,
};

/// Largest width or height the painter can sample from.
pub const MAX_IMAGE_SIDE: u32 = u16::MAX as u32;

/// A decoded source image: premultiplied RGBA8 pixels, read-only once created.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba8_premul.len())
            .finish()
    }
}

impl DecodedImage {
    /// Wrap straight-alpha RGBA8 pixels.
    ///
    /// Either side being zero or above [`MAX_IMAGE_SIDE`] is
    /// [`OverlayError::InvalidImageDimensions`].
    pub fn from_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> OverlayResult<Self> {
        if width == 0 || height == 0 || width > MAX_IMAGE_SIDE || height > MAX_IMAGE_SIDE {
            return Err(OverlayError::invalid_dimensions(
                f64::from(width),
                f64::from(height),
            ));
        }
        let expected = width as usize * height as usize * 4;
        if rgba8.len() != expected {
            return Err(OverlayError::validation(format!(
                "rgba8 length {} does not match {width}x{height}",
                rgba8.len()
            )));
        }
        premultiply_rgba8_in_place(&mut rgba8);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8),
        })
    }

    /// Uniform straight-alpha fill, handy for placeholders and tests.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> OverlayResult<Self> {
        let px = width as usize * height as usize;
        Self::from_rgba8(width, height, rgba.repeat(px))
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) into premultiplied RGBA8.
///
/// Unknown containers are [`OverlayError::UnsupportedFormat`]; known containers that fail to
/// decode are [`OverlayError::CorruptImage`]. Images with a zero side or a side above
/// [`MAX_IMAGE_SIDE`] are [`OverlayError::InvalidImageDimensions`].
pub fn decode_image(bytes: &[u8]) -> OverlayResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).map_err(|e| match e {
        image::ImageError::Unsupported(u) => OverlayError::UnsupportedFormat(u.to_string()),
        other => OverlayError::CorruptImage(other.to_string()),
    })?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage::from_rgba8(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
