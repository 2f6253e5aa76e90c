use crate::foundation::core::{BezPath, Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// An L-shaped accent: `start -> vertex -> end`, both arms along the frame edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CornerStroke {
    pub corner: Corner,
    pub start: Point,
    pub vertex: Point,
    pub end: Point,
}

impl CornerStroke {
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start);
        path.line_to(self.vertex);
        path.line_to(self.end);
        path
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BorderPaths {
    pub frame: Rect,
    /// Top-left, top-right, bottom-left, bottom-right.
    pub corners: [CornerStroke; 4],
}

/// Frame and corner accents for a banner.
///
/// The frame is `banner` inset by `inset` on every side. Each corner accent has arms of
/// `corner_length` running inward from a frame corner.
pub fn border_paths(banner: Rect, inset: f64, corner_length: f64) -> BorderPaths {
    let x0 = banner.x0 + inset;
    let y0 = banner.y0 + inset;
    let x1 = (banner.x1 - inset).max(x0);
    let y1 = (banner.y1 - inset).max(y0);
    let cs = corner_length;

    BorderPaths {
        frame: Rect::new(x0, y0, x1, y1),
        corners: [
            CornerStroke {
                corner: Corner::TopLeft,
                start: Point::new(x0, y0 + cs),
                vertex: Point::new(x0, y0),
                end: Point::new(x0 + cs, y0),
            },
            CornerStroke {
                corner: Corner::TopRight,
                start: Point::new(x1 - cs, y0),
                vertex: Point::new(x1, y0),
                end: Point::new(x1, y0 + cs),
            },
            CornerStroke {
                corner: Corner::BottomLeft,
                start: Point::new(x0, y1 - cs),
                vertex: Point::new(x0, y1),
                end: Point::new(x0 + cs, y1),
            },
            CornerStroke {
                corner: Corner::BottomRight,
                start: Point::new(x1 - cs, y1),
                vertex: Point::new(x1, y1),
                end: Point::new(x1, y1 - cs),
            },
        ],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/decoration.rs"]
mod tests;
