use crate::{
    assets::fonts::FontBook,
    config::{
        output::{OutputFormat, OutputSpec},
        theme::{FontCatalog, ResolvedStyle, ThemeTable, resolve_style},
    },
    encode::{
        archive::{ArchiveBuilder, ZipArchiveBuilder},
        raster::encode_surface,
    },
    foundation::error::{OverlayError, OverlayResult},
    project::{Project, ProjectId},
    render::render_full,
};

/// Produces the resolved style for each project of a batch.
pub trait StyleResolver {
    fn resolve(&self, project: &Project) -> OverlayResult<ResolvedStyle>;
}

impl<F> StyleResolver for F
where
    F: Fn(&Project) -> OverlayResult<ResolvedStyle>,
{
    fn resolve(&self, project: &Project) -> OverlayResult<ResolvedStyle> {
        self(project)
    }
}

/// Resolves each project against a shared spec, theme table and font catalog.
#[derive(Clone, Debug, Default)]
pub struct ThemedStyles {
    pub spec: OutputSpec,
    pub themes: ThemeTable,
    pub fonts: FontCatalog,
}

impl ThemedStyles {
    pub fn new(spec: OutputSpec) -> Self {
        Self {
            spec,
            ..Self::default()
        }
    }
}

impl StyleResolver for ThemedStyles {
    fn resolve(&self, project: &Project) -> OverlayResult<ResolvedStyle> {
        resolve_style(project, &self.spec, &self.themes, &self.fonts)
    }
}

/// Archive entry name for the `n`-th project (1-based) of a batch.
pub fn entry_name(n: usize, format: OutputFormat) -> String {
    format!("fantasy-overlay-{n:03}.{}", format.extension())
}

/// Render `project` at full resolution and encode it in the style's format.
///
/// A project without an image is rejected: the placeholder is a preview-only affordance.
#[tracing::instrument(skip_all, fields(project = %project.id()))]
pub fn export_project(
    project: &Project,
    style: &ResolvedStyle,
    fonts: &mut FontBook,
) -> OverlayResult<Vec<u8>> {
    if project.image().is_none() {
        return Err(OverlayError::validation(format!(
            "{} has no image to export",
            project.id()
        )));
    }
    let surface = render_full(project, style, fonts)?;
    encode_surface(&surface, style.format, style.quality)
}

/// Outcome of a batch export.
#[derive(Clone, Debug)]
pub struct BatchExport {
    /// Finalized archive.
    pub bytes: Vec<u8>,
    /// Number of entries written.
    pub written: usize,
    /// Projects left out of the archive.
    pub skipped: Vec<ProjectId>,
}

/// Export every project into a ZIP archive.
///
/// See [`export_batch_into`] for the skip rules.
pub fn export_batch<'a>(
    projects: impl IntoIterator<Item = &'a Project>,
    resolver: &impl StyleResolver,
    fonts: &mut FontBook,
) -> OverlayResult<BatchExport> {
    export_batch_into(projects, resolver, fonts, ZipArchiveBuilder::new())
}

/// Export every project into `archive`, in iteration order.
///
/// Entry `n` is named after the project's 1-based position in the batch, so skipped projects
/// leave gaps in the numbering. Projects with no image or unfittable image dimensions are
/// skipped with a warning; any other failure aborts the whole batch.
#[tracing::instrument(skip_all)]
pub fn export_batch_into<'a, A: ArchiveBuilder>(
    projects: impl IntoIterator<Item = &'a Project>,
    resolver: &impl StyleResolver,
    fonts: &mut FontBook,
    mut archive: A,
) -> OverlayResult<BatchExport> {
    let mut written = 0usize;
    let mut skipped = Vec::new();

    for (i, project) in projects.into_iter().enumerate() {
        if project.image().is_none() {
            tracing::warn!(project = %project.id(), "skipping project without an image");
            skipped.push(project.id());
            continue;
        }
        let style = resolver.resolve(project)?;
        let bytes = match export_project(project, &style, fonts) {
            Ok(bytes) => bytes,
            Err(err @ OverlayError::InvalidImageDimensions { .. }) => {
                tracing::warn!(project = %project.id(), error = %err, "skipping project");
                skipped.push(project.id());
                continue;
            }
            Err(err) => return Err(err),
        };
        archive.add_entry(&entry_name(i + 1, style.format), &bytes)?;
        written += 1;
    }

    let bytes = archive.finalize()?;
    tracing::debug!(written, skipped = skipped.len(), bytes = bytes.len(), "batch exported");
    Ok(BatchExport {
        bytes,
        written,
        skipped,
    })
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
