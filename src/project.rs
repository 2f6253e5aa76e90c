use std::sync::Arc;

use crate::{
    assets::decode::{DecodedImage, decode_image},
    foundation::error::{OverlayError, OverlayResult},
};

/// Opaque project identifier, unique within a [`ProjectCollection`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectId(u64);

impl ProjectId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "project-{}", self.0)
    }
}

/// One (image, caption, font, theme) unit.
///
/// The image is shared and never mutated after load; everything else can change between renders.
#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    id: ProjectId,
    image: Option<Arc<DecodedImage>>,
    caption: String,
    font: Option<String>,
    theme: Option<String>,
}

impl Project {
    pub fn new(id: ProjectId, image: Option<Arc<DecodedImage>>) -> Self {
        Self {
            id,
            image,
            caption: String::new(),
            font: None,
            theme: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn image(&self) -> Option<&Arc<DecodedImage>> {
        self.image.as_ref()
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn font(&self) -> Option<&str> {
        self.font.as_deref()
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// `None` returns the project to the theme (or default) font.
    pub fn set_font(&mut self, font: Option<String>) {
        self.font = font;
    }

    /// `None` returns the project to the default style block.
    pub fn set_theme(&mut self, theme: Option<String>) {
        self.theme = theme;
    }
}

/// Insertion-ordered projects with at most one "current" member.
#[derive(Clone, Debug, Default)]
pub struct ProjectCollection {
    projects: Vec<Project>,
    current: Option<ProjectId>,
    next_id: u64,
}

impl ProjectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a project around an already decoded image. The first project becomes current.
    pub fn create(&mut self, image: Arc<DecodedImage>) -> ProjectId {
        let id = ProjectId(self.next_id);
        self.next_id += 1;
        self.projects.push(Project::new(id, Some(image)));
        if self.current.is_none() {
            self.current = Some(id);
        }
        tracing::debug!(%id, "created project");
        id
    }

    /// Decode `bytes` and append a project for them. A decode failure creates nothing.
    pub fn create_from_bytes(&mut self, bytes: &[u8]) -> OverlayResult<ProjectId> {
        let image = decode_image(bytes)?;
        Ok(self.create(Arc::new(image)))
    }

    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// Remove a project. If it was current, the first remaining project becomes current.
    pub fn remove(&mut self, id: ProjectId) -> Option<Project> {
        let idx = self.projects.iter().position(|p| p.id == id)?;
        let removed = self.projects.remove(idx);
        if self.current == Some(id) {
            self.current = self.projects.first().map(|p| p.id);
        }
        Some(removed)
    }

    pub fn set_current(&mut self, id: ProjectId) -> OverlayResult<()> {
        if self.get(id).is_none() {
            return Err(OverlayError::validation(format!("unknown {id}")));
        }
        self.current = Some(id);
        Ok(())
    }

    pub fn current_id(&self) -> Option<ProjectId> {
        self.current
    }

    pub fn current(&self) -> Option<&Project> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn current_mut(&mut self) -> Option<&mut Project> {
        let id = self.current?;
        self.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/unit/project.rs"]
mod tests;
