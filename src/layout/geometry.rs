use crate::foundation::core::Rect;

/// Banner and image regions of the output canvas, in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BannerGeometry {
    /// `(0, 0) .. (W, banner_height)`.
    pub banner: Rect,
    /// `(0, banner_height) .. (W, H)`.
    pub image: Rect,
    pub banner_height: f64,
}

/// Split a `width` x `height` canvas into the top banner and the image region below it.
///
/// The banner height is `floor(height * fraction)`. `fraction` is expected to be validated
/// already (see [`crate::OutputSpec::validate`]).
pub fn resolve(width: u32, height: u32, fraction: f64) -> BannerGeometry {
    let w = f64::from(width);
    let h = f64::from(height);
    let banner_height = (h * fraction).floor().clamp(0.0, h);
    BannerGeometry {
        banner: Rect::new(0.0, 0.0, w, banner_height),
        image: Rect::new(0.0, banner_height, w, h),
        banner_height,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;
