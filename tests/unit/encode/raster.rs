use super::*;
use crate::foundation::core::Canvas;

fn gray_surface() -> Surface {
    let mut s = Surface::new(
        Canvas {
            width: 6,
            height: 4,
        },
        1.0,
    )
    .unwrap();
    for px in s.data_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&[64, 64, 64, 128]);
    }
    s
}

#[test]
fn png_round_trips_straight_alpha() {
    let bytes = encode_surface(&gray_surface(), OutputFormat::Png, 1.0).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (6, 4));
    assert_eq!(decoded.get_pixel(0, 0).0, [128, 128, 128, 128]);
}

#[test]
fn jpeg_has_soi_marker_and_dimensions() {
    let bytes = encode_surface(&gray_surface(), OutputFormat::Jpeg, 0.8).unwrap();
    assert_eq!(&bytes[..2], &[0xff, 0xd8]);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (6, 4));
}

#[test]
fn quality_maps_to_percent() {
    assert_eq!(jpeg_quality(1.0), 100);
    assert_eq!(jpeg_quality(0.92), 92);
    assert_eq!(jpeg_quality(0.0), 1);
    assert_eq!(jpeg_quality(f32::NAN), 100);
}
