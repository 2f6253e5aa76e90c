use crate::foundation::error::{OverlayError, OverlayResult};

/// Separable Gaussian blur of one 8-bit coverage plane.
///
/// Samples outside the plane count as empty, so coverage fades toward the border instead of
/// being smeared by edge clamping. Callers tint the result afterwards.
pub fn blur_alpha(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> OverlayResult<Vec<u8>> {
    let (w, h) = (width as usize, height as usize);
    let len = w
        .checked_mul(h)
        .ok_or_else(|| OverlayError::validation("blur plane size overflow"))?;
    if src.len() != len {
        return Err(OverlayError::validation(
            "blur_alpha expects one coverage byte per pixel",
        ));
    }
    if radius == 0 || len == 0 {
        return Ok(src.to_vec());
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(OverlayError::validation("blur sigma must be > 0"));
    }

    let kernel = gaussian_kernel(radius, sigma);
    let mut rows = vec![0f32; len];
    for (src_row, out_row) in src.chunks_exact(w).zip(rows.chunks_exact_mut(w)) {
        for (x, out) in out_row.iter_mut().enumerate() {
            *out = convolve(&kernel, x, w, |i| f32::from(src_row[i]));
        }
    }

    let mut out = vec![0u8; len];
    for x in 0..w {
        for y in 0..h {
            let v = convolve(&kernel, y, h, |i| rows[i * w + x]);
            out[y * w + x] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    Ok(out)
}

/// Radius that covers three standard deviations.
pub fn radius_for_sigma(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

/// Normalised weights for offsets `-radius..=radius`.
fn gaussian_kernel(radius: u32, sigma: f32) -> Vec<f32> {
    let r = radius as i32;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|v| v / sum).collect()
}

/// Weighted sum around `center` along an axis of `len` samples.
fn convolve(kernel: &[f32], center: usize, len: usize, sample: impl Fn(usize) -> f32) -> f32 {
    let r = kernel.len() / 2;
    kernel
        .iter()
        .enumerate()
        .filter_map(|(k, &weight)| {
            let i = (center + k).checked_sub(r)?;
            (i < len).then(|| weight * sample(i))
        })
        .sum()
}
