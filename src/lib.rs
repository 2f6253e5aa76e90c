//! fantasy-overlay composites a themed caption banner over a photo.
//!
//! Every render goes through the same pipeline, whether it is a half-scale preview or a
//! full-resolution export:
//!
//! - Resolve a project's [`ResolvedStyle`] from the shared [`OutputSpec`], its theme and font
//! - Compose a backend-agnostic [`Scene`] (geometry, contain fit, caption fit, decoration)
//! - Paint it onto a [`Surface`] at any scale with the CPU painter
//! - Encode the surface, or zip a whole batch of projects
#![forbid(unsafe_code)]

mod assets;
mod config;
mod encode;
mod export;
mod foundation;
mod layout;
mod project;
mod render;
mod scene;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Edges, Point, Rect, Rgba8, Vec2,
};
pub use crate::foundation::error::{OverlayError, OverlayResult};

pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::fonts::{FontBook, ShapedGlyph, ShapedLine, ShapedRun};
pub use crate::config::output::{
    BannerSpec, DecorationSpec, ImageRegionSpec, OutputFormat, OutputSpec, PlaceholderSpec,
    TextAlign, TextSpec,
};
pub use crate::config::theme::{
    FontCatalog, FontFace, ResolvedBanner, ResolvedDecoration, ResolvedPlaceholder,
    ResolvedStyle, ResolvedText, Theme, ThemeTable, resolve_style,
};
pub use crate::encode::archive::{ArchiveBuilder, ZipArchiveBuilder};
pub use crate::encode::raster::encode_surface;
pub use crate::export::{
    BatchExport, StyleResolver, ThemedStyles, entry_name, export_batch, export_batch_into,
    export_project,
};
pub use crate::layout::decoration::{BorderPaths, Corner, CornerStroke, border_paths};
pub use crate::layout::fit::{Placement, contain};
pub use crate::layout::geometry::{BannerGeometry, resolve as resolve_geometry};
pub use crate::layout::text::{
    FitParams, LineLayout, PositionedLine, TextMeasurer, fit_text, place_lines,
};
pub use crate::project::{Project, ProjectCollection, ProjectId};
pub use crate::render::cpu::CpuPainter;
pub use crate::render::surface::Surface;
pub use crate::render::{render, render_full, render_preview};
pub use crate::scene::compose::{
    DrawOp, GradientStop, Scene, TextOp, TextShadow, banner_gradient_stops, compose_scene,
};
