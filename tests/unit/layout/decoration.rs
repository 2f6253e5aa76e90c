use super::*;

fn stock() -> BorderPaths {
    border_paths(Rect::new(0.0, 0.0, 1080.0, 324.0), 15.0, 20.0)
}

#[test]
fn frame_is_banner_inset_on_every_side() {
    assert_eq!(stock().frame, Rect::new(15.0, 15.0, 1065.0, 309.0));
}

#[test]
fn corners_sit_on_frame_corners() {
    let b = stock();
    let frame = b.frame;
    let vertices: Vec<Point> = b.corners.iter().map(|c| c.vertex).collect();
    assert_eq!(
        vertices,
        vec![
            Point::new(frame.x0, frame.y0),
            Point::new(frame.x1, frame.y0),
            Point::new(frame.x0, frame.y1),
            Point::new(frame.x1, frame.y1),
        ]
    );
    assert_eq!(b.corners[0].corner, Corner::TopLeft);
    assert_eq!(b.corners[3].corner, Corner::BottomRight);
}

#[test]
fn arms_run_inward_along_edges_with_corner_length() {
    let b = stock();
    let center = b.frame.center();
    for c in &b.corners {
        for arm_end in [c.start, c.end] {
            let d = arm_end - c.vertex;
            assert!(d.x == 0.0 || d.y == 0.0, "arm must be axis-aligned");
            assert_eq!(d.hypot(), 20.0);
            assert!((arm_end - center).hypot() < (c.vertex - center).hypot());
        }
    }
}

#[test]
fn corner_path_is_two_segments() {
    let path = stock().corners[1].to_path();
    assert_eq!(path.elements().len(), 3);
    assert_eq!(path.elements()[0], kurbo::PathEl::MoveTo(Point::new(1045.0, 15.0)));
}
