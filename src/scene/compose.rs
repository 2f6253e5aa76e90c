use std::sync::Arc;

use kurbo::Shape;

use crate::{
    assets::decode::DecodedImage,
    config::theme::ResolvedStyle,
    foundation::{
        core::{BezPath, Canvas, Point, Rect, Rgba8, Vec2},
        error::{OverlayError, OverlayResult},
    },
    layout::{
        decoration::border_paths,
        fit::contain,
        geometry,
        text::{FitParams, LineLayout, PositionedLine, TextMeasurer, fit_text, place_lines},
    },
    project::Project,
};

/// Backend-agnostic description of one composite, in logical canvas coordinates.
///
/// Ops are painted in order with source-over blending. The same scene is painted for preview
/// and export; only the surface scale differs.
#[derive(Clone, Debug)]
pub struct Scene {
    pub canvas: Canvas,
    pub ops: Vec<DrawOp>,
    /// Caption layout chosen by the text fitter, if the caption is non-empty.
    pub caption: Option<LineLayout>,
}

#[derive(Clone, Debug)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Rgba8,
    },
    /// Top-to-bottom linear gradient filling `rect`.
    VerticalGradient {
        rect: Rect,
        stops: Vec<GradientStop>,
    },
    StrokePath {
        path: BezPath,
        color: Rgba8,
        width: f64,
    },
    /// Whole source image scaled into `dest`.
    Image {
        image: Arc<DecodedImage>,
        dest: Rect,
    },
    Text(TextOp),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextOp {
    pub lines: Vec<PositionedLine>,
    pub family: String,
    pub size_px: f64,
    pub color: Rgba8,
    pub shadow: Option<TextShadow>,
}

/// Drop shadow drawn under a text op. `blur` follows the canvas convention: the Gaussian
/// standard deviation is half of it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextShadow {
    pub color: Rgba8,
    pub blur: f64,
    pub offset: Vec2,
}

impl TextShadow {
    pub fn caption() -> Self {
        Self {
            color: Rgba8::BLACK.with_opacity(0.9),
            blur: 8.0,
            offset: Vec2::new(2.0, 2.0),
        }
    }
}

/// Dark top, clear middle, lighter dark bottom.
pub fn banner_gradient_stops() -> Vec<GradientStop> {
    vec![
        GradientStop {
            offset: 0.0,
            color: Rgba8::rgb(20, 20, 40).with_opacity(0.5),
        },
        GradientStop {
            offset: 0.5,
            color: Rgba8::TRANSPARENT,
        },
        GradientStop {
            offset: 1.0,
            color: Rgba8::BLACK.with_opacity(0.3),
        },
    ]
}

/// Build the draw list for `project` under `style`.
///
/// Order: background, banner fill, gradient, decoration, image region (letterbox + contained
/// image, or placeholder), caption. Fails with `InvalidImageDimensions` for an unfittable image
/// and `UnmeasurableText` when the caption font cannot be measured.
#[tracing::instrument(skip_all, fields(project = %project.id()))]
pub fn compose_scene(
    project: &Project,
    style: &ResolvedStyle,
    mut measurer: impl TextMeasurer,
) -> OverlayResult<Scene> {
    let canvas = style.canvas;
    let g = geometry::resolve(canvas.width, canvas.height, style.banner.height_fraction);
    let mut ops = Vec::new();

    ops.push(DrawOp::FillRect {
        rect: canvas.rect(),
        color: style.background,
    });

    ops.push(DrawOp::FillRect {
        rect: g.banner,
        color: style.banner.color,
    });
    if style.banner.gradient_overlay {
        ops.push(DrawOp::VerticalGradient {
            rect: g.banner,
            stops: banner_gradient_stops(),
        });
    }

    if let Some(deco) = &style.decoration {
        let border = border_paths(g.banner, deco.inset, deco.corner_length);
        ops.push(DrawOp::StrokePath {
            path: border.frame.to_path(0.1),
            color: deco.color,
            width: deco.stroke_width,
        });
        for corner in &border.corners {
            ops.push(DrawOp::StrokePath {
                path: corner.to_path(),
                color: deco.color,
                width: deco.stroke_width + 1.0,
            });
        }
    }

    match project.image() {
        Some(image) => {
            let placement = contain(f64::from(image.width), f64::from(image.height), g.image)?;
            ops.push(DrawOp::FillRect {
                rect: g.image,
                color: style.letterbox,
            });
            ops.push(DrawOp::Image {
                image: image.clone(),
                dest: placement.dest,
            });
        }
        None => {
            ops.push(DrawOp::FillRect {
                rect: g.image,
                color: style.placeholder.fill,
            });
            if let Some(label) = style
                .placeholder
                .label
                .as_deref()
                .filter(|l| !l.trim().is_empty())
            {
                ops.push(DrawOp::Text(placeholder_label(
                    label,
                    g.image,
                    style,
                    &mut measurer,
                )?));
            }
        }
    }

    let caption = project.caption().trim();
    let mut caption_layout = None;
    if !caption.is_empty() {
        let content = style.banner.padding.shrink(g.banner);
        let t = &style.text;
        let params = FitParams {
            max_size: t.max_font_size,
            min_size: t.min_font_size,
            step: t.font_size_step,
            line_height: t.line_height,
            box_width: content.width(),
            box_height: content.height(),
        };
        let layout = fit_text(caption, &t.family, &params, &mut measurer)?;
        let lines = place_lines(&layout, content, t.align, &t.family, &mut measurer)?;
        ops.push(DrawOp::Text(TextOp {
            lines,
            family: t.family.clone(),
            size_px: layout.font_size,
            color: t.color,
            shadow: Some(TextShadow::caption()),
        }));
        caption_layout = Some(layout);
    }

    Ok(Scene {
        canvas,
        ops,
        caption: caption_layout,
    })
}

/// Single line centered on `region`, no shadow.
fn placeholder_label(
    label: &str,
    region: Rect,
    style: &ResolvedStyle,
    measurer: &mut impl TextMeasurer,
) -> OverlayResult<TextOp> {
    let p = &style.placeholder;
    let size = p.label_size_px;
    let width = measurer
        .measure(label, &p.label_family, size)
        .map_err(|e| match e {
            OverlayError::UnmeasurableText(_) => e,
            other => OverlayError::unmeasurable(other.to_string()),
        })?;
    let center = region.center();
    Ok(TextOp {
        lines: vec![PositionedLine {
            text: label.to_string(),
            origin: Point::new(center.x - width / 2.0, center.y - size / 2.0),
            width,
        }],
        family: p.label_family.clone(),
        size_px: size,
        color: p.label_color,
        shadow: None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/scene/compose.rs"]
mod tests;
