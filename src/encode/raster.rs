use image::ImageEncoder;

use crate::{
    config::output::OutputFormat,
    foundation::error::{OverlayError, OverlayResult},
    render::surface::Surface,
};

/// Encode a rendered surface.
///
/// PNG keeps the alpha channel. JPEG drops it (the composite is opaque) and maps `quality` in
/// `[0, 1]` onto the encoder's 1..=100 scale.
pub fn encode_surface(
    surface: &Surface,
    format: OutputFormat,
    quality: f32,
) -> OverlayResult<Vec<u8>> {
    let (w, h) = (surface.width(), surface.height());
    let rgba = surface.to_straight_rgba8();
    let mut out = Vec::new();

    match format {
        OutputFormat::Png => {
            image::codecs::png::PngEncoder::new(&mut out)
                .write_image(&rgba, w, h, image::ExtendedColorType::Rgba8)
                .map_err(|e| OverlayError::encode(format!("png: {e}")))?;
        }
        OutputFormat::Jpeg => {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, jpeg_quality(quality))
                .write_image(&rgb, w, h, image::ExtendedColorType::Rgb8)
                .map_err(|e| OverlayError::encode(format!("jpeg: {e}")))?;
        }
    }

    tracing::debug!(bytes = out.len(), mime = format.mime_type(), "encoded surface");
    Ok(out)
}

fn jpeg_quality(quality: f32) -> u8 {
    if !quality.is_finite() {
        return 100;
    }
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/encode/raster.rs"]
mod tests;
