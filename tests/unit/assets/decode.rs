use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(width, height, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let decoded = decode_image(&png_bytes(1, 1, vec![100, 50, 200, 128])).unwrap();
    assert_eq!(decoded.width, 1);
    assert_eq!(decoded.height, 1);
    assert_eq!(
        decoded.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn unknown_bytes_are_unsupported() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, OverlayError::UnsupportedFormat(_)), "{err}");
}

#[test]
fn truncated_png_is_corrupt() {
    let mut bytes = png_bytes(8, 8, vec![255; 8 * 8 * 4]);
    bytes.truncate(40);
    let err = decode_image(&bytes).unwrap_err();
    assert!(matches!(err, OverlayError::CorruptImage(_)), "{err}");
}

#[test]
fn from_rgba8_rejects_zero_sides_and_bad_lengths() {
    assert!(matches!(
        DecodedImage::from_rgba8(0, 4, vec![]),
        Err(OverlayError::InvalidImageDimensions { .. })
    ));
    assert!(matches!(
        DecodedImage::from_rgba8(2, 2, vec![0; 15]),
        Err(OverlayError::Validation(_))
    ));
}

#[test]
fn sides_above_the_paintable_limit_are_invalid_dimensions() {
    let wide = MAX_IMAGE_SIDE as usize + 1;
    let err = DecodedImage::from_rgba8(MAX_IMAGE_SIDE + 1, 1, vec![0; wide * 4]).unwrap_err();
    assert!(
        matches!(err, OverlayError::InvalidImageDimensions { width, .. } if width == 65536.0),
        "{err}"
    );
    assert!(DecodedImage::from_rgba8(1, MAX_IMAGE_SIDE + 1, vec![0; wide * 4]).is_err());
    assert!(DecodedImage::from_rgba8(MAX_IMAGE_SIDE, 1, vec![0; (wide - 1) * 4]).is_ok());
}

#[test]
fn solid_fill_is_premultiplied() {
    let img = DecodedImage::solid(2, 1, [255, 0, 0, 128]).unwrap();
    assert_eq!(img.rgba8_premul.as_slice(), &[128, 0, 0, 128, 128, 0, 0, 128]);
}
