use super::*;

const EPS: f64 = 1e-9;

fn region() -> Rect {
    Rect::new(0.0, 324.0, 1080.0, 1620.0)
}

#[test]
fn landscape_photo_fills_width_and_centers_vertically() {
    let p = contain(800.0, 600.0, region()).unwrap();
    assert!((p.scale - 1.35).abs() < EPS);
    assert!((p.dest.width() - 1080.0).abs() < EPS);
    assert!((p.dest.height() - 810.0).abs() < EPS);
    assert!((p.dest.x0 - 0.0).abs() < EPS);
    assert!((p.dest.y0 - 567.0).abs() < EPS);
}

#[test]
fn tall_photo_fills_height_and_centers_horizontally() {
    let p = contain(500.0, 2000.0, region()).unwrap();
    assert!((p.scale - 0.648).abs() < EPS);
    assert!((p.dest.height() - 1296.0).abs() < EPS);
    assert!((p.dest.x0 - (1080.0 - 324.0) / 2.0).abs() < EPS);
    assert!((p.dest.y0 - 324.0).abs() < EPS);
}

#[test]
fn result_is_contained_and_keeps_aspect_ratio() {
    let r = region();
    for (w, h) in [(1.0, 1.0), (4000.0, 3.0), (7.0, 9000.0), (1080.0, 1296.0), (333.0, 777.0)] {
        let p = contain(w, h, r).unwrap();
        assert!(p.dest.x0 >= r.x0 - EPS && p.dest.x1 <= r.x1 + EPS);
        assert!(p.dest.y0 >= r.y0 - EPS && p.dest.y1 <= r.y1 + EPS);
        assert!((p.dest.width() / p.dest.height() - w / h).abs() < 1e-6 * (w / h));

        let center = p.dest.center();
        assert!((center.x - r.center().x).abs() < EPS);
        assert!((center.y - r.center().y).abs() < EPS);
    }
}

#[test]
fn zero_sides_are_rejected() {
    for (w, h) in [(0.0, 600.0), (800.0, 0.0), (f64::NAN, 1.0)] {
        let err = contain(w, h, region()).unwrap_err();
        assert!(matches!(err, OverlayError::InvalidImageDimensions { .. }));
    }
}
