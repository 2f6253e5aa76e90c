use std::sync::Arc;

use crate::{
    assets::{
        decode::DecodedImage,
        fonts::{FontBook, ShapedLine},
    },
    foundation::{
        core::{Affine, BezPath, Point, Rect, Rgba8},
        error::{OverlayError, OverlayResult},
        math::mul_div255_u8,
    },
    render::{
        blur::{blur_alpha, radius_for_sigma},
        composite::{PremulRgba8, fill_over_in_place, lerp, over_in_place},
        surface::Surface,
    },
    scene::compose::{DrawOp, GradientStop, Scene, TextOp, TextShadow},
};

/// Rasterises a [`Scene`] into a [`Surface`] with vello_cpu.
///
/// Consecutive vector ops are batched into one render context ("stage"). Ops that need pixel
/// access (gradients, blurred shadows) flush the stage into the surface first, then work on the
/// surface bytes directly.
#[derive(Debug, Default)]
pub struct CpuPainter;

/// A shaped line and the logical position of its top-left corner.
type PlacedLine = (Point, ShapedLine);

impl CpuPainter {
    pub fn new() -> Self {
        Self
    }

    /// Clear `surface` and paint every op of `scene` onto it.
    pub fn paint(
        &mut self,
        scene: &Scene,
        surface: &mut Surface,
        fonts: &mut FontBook,
    ) -> OverlayResult<()> {
        if scene.canvas != surface.canvas() {
            return Err(OverlayError::validation(
                "scene canvas does not match surface canvas",
            ));
        }
        surface.clear();

        let (w, h) = device_size(surface)?;
        let to_device = Affine::scale(surface.scale());
        let mut stage: Option<vello_cpu::RenderContext> = None;

        for op in &scene.ops {
            match op {
                DrawOp::FillRect { rect, color } => {
                    let ctx = stage.get_or_insert_with(|| vello_cpu::RenderContext::new(w, h));
                    ctx.set_transform(affine_to_cpu(to_device));
                    ctx.set_paint(color_to_cpu(*color));
                    ctx.fill_rect(&rect_to_cpu(*rect));
                }
                DrawOp::StrokePath { path, color, width } => {
                    let ctx = stage.get_or_insert_with(|| vello_cpu::RenderContext::new(w, h));
                    ctx.set_transform(affine_to_cpu(to_device));
                    ctx.set_paint(color_to_cpu(*color));
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                    ctx.stroke_path(&bezpath_to_cpu(path));
                }
                DrawOp::Image { image, dest } => {
                    let paint = image_paint(image)?;
                    let ctx = stage.get_or_insert_with(|| vello_cpu::RenderContext::new(w, h));
                    let (iw, ih) = (f64::from(image.width), f64::from(image.height));
                    let place = Affine::translate((dest.x0, dest.y0))
                        * Affine::scale_non_uniform(dest.width() / iw, dest.height() / ih);
                    ctx.set_transform(affine_to_cpu(to_device * place));
                    ctx.set_paint(paint);
                    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
                }
                DrawOp::VerticalGradient { rect, stops } => {
                    flush_stage(stage.take(), surface)?;
                    paint_vertical_gradient(surface, *rect, stops);
                }
                DrawOp::Text(text) => {
                    let lines = shape_text(text, fonts)?;
                    if let Some(shadow) = &text.shadow {
                        flush_stage(stage.take(), surface)?;
                        paint_text_shadow(&lines, shadow, surface)?;
                    }
                    let ctx = stage.get_or_insert_with(|| vello_cpu::RenderContext::new(w, h));
                    fill_lines(ctx, &lines, text.color, to_device);
                }
            }
        }

        flush_stage(stage.take(), surface)
    }
}

fn shape_text(text: &TextOp, fonts: &mut FontBook) -> OverlayResult<Vec<PlacedLine>> {
    text.lines
        .iter()
        .map(|line| {
            let shaped = fonts.shape_line(&line.text, &text.family, text.size_px)?;
            Ok((line.origin, shaped))
        })
        .collect()
}

/// Fill every run with the face it was shaped with.
fn fill_lines(
    ctx: &mut vello_cpu::RenderContext,
    lines: &[PlacedLine],
    color: Rgba8,
    transform: Affine,
) {
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(color_to_cpu(color));
    for (origin, shaped) in lines {
        let (ox, oy) = (origin.x as f32, origin.y as f32);
        for run in &shaped.runs {
            let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: ox + g.x,
                y: oy + g.y,
            });
            ctx.glyph_run(&run.font)
                .font_size(shaped.font_size)
                .fill_glyphs(glyphs);
        }
    }
}

/// Paint the shadow coverage offscreen, blur it and composite it tinted with the shadow color.
fn paint_text_shadow(
    lines: &[PlacedLine],
    shadow: &TextShadow,
    surface: &mut Surface,
) -> OverlayResult<()> {
    let scale = surface.scale();
    let sigma = (shadow.blur / 2.0 * scale) as f32;
    let radius = radius_for_sigma(sigma);

    let Some(bounds) = text_bounds(lines) else {
        return Ok(());
    };
    let pad = f64::from(radius) / scale + 1.0;
    let bounds = (bounds + shadow.offset).inflate(pad, pad);
    let Some(region) = device_region(bounds, surface) else {
        return Ok(());
    };

    let (w, h) = device_size(surface)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    let transform = Affine::scale(scale) * Affine::translate(shadow.offset);
    fill_lines(&mut ctx, lines, Rgba8::BLACK, transform);
    let layer = render_stage(ctx, w, h);

    let coverage = extract_alpha(&layer, surface.width(), region);
    let coverage = blur_alpha(&coverage, region.width(), region.height(), radius, sigma)?;
    let tint = shadow.color.to_premul();
    let patch: Vec<u8> = coverage
        .iter()
        .flat_map(|&a| tint.map(|c| mul_div255_u8(u16::from(c), u16::from(a))))
        .collect();
    composite_region(surface, &patch, region)
}

/// Logical box spanning each line's advance width and its font ascent to descent.
fn text_bounds(lines: &[PlacedLine]) -> Option<Rect> {
    lines
        .iter()
        .map(|(origin, shaped)| {
            Rect::new(
                origin.x,
                origin.y + f64::from(shaped.ink_top()),
                origin.x + shaped.width,
                origin.y + f64::from(shaped.ink_bottom()),
            )
        })
        .reduce(|a, b| a.union(b))
}

/// Integer device-space rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Region {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Region {
    fn width(self) -> u32 {
        self.x1 - self.x0
    }

    fn height(self) -> u32 {
        self.y1 - self.y0
    }
}

fn device_region(logical: Rect, surface: &Surface) -> Option<Region> {
    let s = surface.scale();
    let clamp_x = |v: f64| v.clamp(0.0, f64::from(surface.width())) as u32;
    let clamp_y = |v: f64| v.clamp(0.0, f64::from(surface.height())) as u32;
    let r = Region {
        x0: clamp_x((logical.x0 * s).floor()),
        y0: clamp_y((logical.y0 * s).floor()),
        x1: clamp_x((logical.x1 * s).ceil()),
        y1: clamp_y((logical.y1 * s).ceil()),
    };
    (r.x1 > r.x0 && r.y1 > r.y0).then_some(r)
}

/// Alpha channel of `region` from a full-surface premultiplied layer.
fn extract_alpha(full: &[u8], full_width: u32, region: Region) -> Vec<u8> {
    let mut out = Vec::with_capacity(region.width() as usize * region.height() as usize);
    for y in region.y0..region.y1 {
        let start = (y as usize * full_width as usize + region.x0 as usize) * 4;
        let row = &full[start..start + region.width() as usize * 4];
        out.extend(row.chunks_exact(4).map(|px| px[3]));
    }
    out
}

fn composite_region(surface: &mut Surface, patch: &[u8], region: Region) -> OverlayResult<()> {
    let full_width = surface.width() as usize;
    let row_bytes = region.width() as usize * 4;
    let data = surface.data_mut();
    for (row, y) in (region.y0..region.y1).enumerate() {
        let start = (y as usize * full_width + region.x0 as usize) * 4;
        over_in_place(
            &mut data[start..start + row_bytes],
            &patch[row * row_bytes..(row + 1) * row_bytes],
        )?;
    }
    Ok(())
}

fn device_size(surface: &Surface) -> OverlayResult<(u16, u16)> {
    let w: u16 = surface
        .width()
        .try_into()
        .map_err(|_| OverlayError::validation("surface width exceeds u16"))?;
    let h: u16 = surface
        .height()
        .try_into()
        .map_err(|_| OverlayError::validation("surface height exceeds u16"))?;
    Ok((w, h))
}

fn render_stage(mut ctx: vello_cpu::RenderContext, w: u16, h: u16) -> Vec<u8> {
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    pixmap.data_as_u8_slice().to_vec()
}

fn flush_stage(stage: Option<vello_cpu::RenderContext>, surface: &mut Surface) -> OverlayResult<()> {
    let Some(ctx) = stage else {
        return Ok(());
    };
    let (w, h) = device_size(surface)?;
    let layer = render_stage(ctx, w, h);
    over_in_place(surface.data_mut(), &layer)
}

/// Rows are sampled at their device-pixel centers; stops are interpolated premultiplied.
fn paint_vertical_gradient(surface: &mut Surface, rect: Rect, stops: &[GradientStop]) {
    let Some(region) = device_region(rect, surface) else {
        return;
    };
    if rect.height() <= 0.0 {
        return;
    }
    let s = surface.scale();
    let full_width = surface.width() as usize;
    let data = surface.data_mut();
    for y in region.y0..region.y1 {
        let logical_y = (f64::from(y) + 0.5) / s;
        let t = ((logical_y - rect.y0) / rect.height()) as f32;
        let color = sample_stops(stops, t);
        let start = (y as usize * full_width + region.x0 as usize) * 4;
        let end = start + region.width() as usize * 4;
        fill_over_in_place(&mut data[start..end], color);
    }
}

fn sample_stops(stops: &[GradientStop], t: f32) -> PremulRgba8 {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return [0; 4];
    };
    if t <= first.offset {
        return first.color.to_premul();
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span > 0.0 { (t - a.offset) / span } else { 1.0 };
            return lerp(a.color.to_premul(), b.color.to_premul(), local);
        }
    }
    last.color.to_premul()
}

fn image_paint(image: &DecodedImage) -> OverlayResult<vello_cpu::Image> {
    let (Ok(w), Ok(h)) = (u16::try_from(image.width), u16::try_from(image.height)) else {
        return Err(OverlayError::invalid_dimensions(
            f64::from(image.width),
            f64::from(image.height),
        ));
    };
    if image.rgba8_premul.len() != image.width as usize * image.height as usize * 4 {
        return Err(OverlayError::validation("decoded image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(image.width as usize * image.height as usize);
    for px in image.rgba8_premul.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
