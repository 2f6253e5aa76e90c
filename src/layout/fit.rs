use crate::foundation::{
    core::Rect,
    error::{OverlayError, OverlayResult},
};

/// Where a contained image lands inside its region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub dest: Rect,
    /// Uniform scale from source pixels to logical pixels.
    pub scale: f64,
}

/// "Contain" fit: the largest uniform scale at which the whole source is visible inside
/// `region`, centered on both axes. Never crops, never distorts.
pub fn contain(src_width: f64, src_height: f64, region: Rect) -> OverlayResult<Placement> {
    if !(src_width.is_finite() && src_height.is_finite()) || src_width <= 0.0 || src_height <= 0.0
    {
        return Err(OverlayError::invalid_dimensions(src_width, src_height));
    }

    let scale = (region.width() / src_width).min(region.height() / src_height);
    let w = src_width * scale;
    let h = src_height * scale;
    let x = region.x0 + (region.width() - w) / 2.0;
    let y = region.y0 + (region.height() - h) / 2.0;

    Ok(Placement {
        dest: Rect::new(x, y, x + w, y + h),
        scale,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
