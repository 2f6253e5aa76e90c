use super::*;

#[test]
fn stock_canvas_splits_at_twenty_percent() {
    let g = resolve(1080, 1620, 0.2);
    assert_eq!(g.banner_height, 324.0);
    assert_eq!(g.banner, Rect::new(0.0, 0.0, 1080.0, 324.0));
    assert_eq!(g.image, Rect::new(0.0, 324.0, 1080.0, 1620.0));
    assert_eq!(g.image.height(), 1296.0);
}

#[test]
fn banner_height_is_floored() {
    let g = resolve(100, 99, 0.25);
    assert_eq!(g.banner_height, 24.0);
    assert_eq!(g.image.y0, 24.0);
    assert_eq!(g.banner.height() + g.image.height(), 99.0);
}

#[test]
fn regions_tile_the_canvas_for_any_fraction() {
    for f in [0.01, 0.1, 0.333, 0.5, 0.99] {
        let g = resolve(640, 480, f);
        assert_eq!(g.banner.y1, g.image.y0);
        assert_eq!(g.image.y1, 480.0);
        assert_eq!(g.banner.width(), 640.0);
        assert_eq!(g.image.width(), 640.0);
    }
}
