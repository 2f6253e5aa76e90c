//! Rasterisation of composed scenes.

pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod cpu;
pub(crate) mod surface;

use crate::{
    assets::fonts::FontBook,
    config::theme::ResolvedStyle,
    foundation::error::OverlayResult,
    project::Project,
    render::{cpu::CpuPainter, surface::Surface},
    scene::compose::{Scene, compose_scene},
};

/// Compose `project` under `style` and paint it onto `surface` at the surface's scale.
///
/// The scene is always built in logical canvas coordinates, so any two surfaces of the same
/// canvas show the same composite. Returns the scene that was painted.
#[tracing::instrument(skip_all, fields(project = %project.id(), scale = surface.scale()))]
pub fn render(
    surface: &mut Surface,
    project: &Project,
    style: &ResolvedStyle,
    fonts: &mut FontBook,
) -> OverlayResult<Scene> {
    let scene = compose_scene(project, style, &mut *fonts)?;
    CpuPainter::new().paint(&scene, surface, fonts)?;
    Ok(scene)
}

/// Render at `style.preview_scale`.
pub fn render_preview(
    project: &Project,
    style: &ResolvedStyle,
    fonts: &mut FontBook,
) -> OverlayResult<Surface> {
    let mut surface = Surface::new(style.canvas, style.preview_scale)?;
    render(&mut surface, project, style, fonts)?;
    Ok(surface)
}

/// Render at full output resolution.
pub fn render_full(
    project: &Project,
    style: &ResolvedStyle,
    fonts: &mut FontBook,
) -> OverlayResult<Surface> {
    let mut surface = Surface::new(style.canvas, 1.0)?;
    render(&mut surface, project, style, fonts)?;
    Ok(surface)
}
