use crate::foundation::{
    core::Canvas,
    error::{OverlayError, OverlayResult},
    math::unpremultiply_rgba8_in_place,
};

/// Premultiplied RGBA8 pixel buffer for one canvas at one scale.
///
/// Drawing always happens in logical canvas coordinates; the surface maps them to
/// `round(canvas * scale)` device pixels.
#[derive(Clone, PartialEq)]
pub struct Surface {
    canvas: Canvas,
    scale: f64,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("canvas", &self.canvas)
            .field("scale", &self.scale())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Surface {
    pub fn new(canvas: Canvas, scale: f64) -> OverlayResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(OverlayError::validation(format!(
                "surface scale {scale} must be finite and > 0"
            )));
        }
        let width = (f64::from(canvas.width) * scale).round();
        let height = (f64::from(canvas.height) * scale).round();
        let max = f64::from(u16::MAX);
        if width < 1.0 || height < 1.0 || width > max || height > max {
            return Err(OverlayError::validation(format!(
                "surface {width}x{height} must be within 1..={max} on each side"
            )));
        }
        let (width, height) = (width as u32, height as u32);
        Ok(Self {
            canvas,
            scale,
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Premultiplied pixel at device coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Copy of the pixels with straight alpha, as encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}
