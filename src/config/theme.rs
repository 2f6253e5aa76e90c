use std::collections::BTreeMap;

use crate::{
    config::output::{OutputFormat, OutputSpec, TextAlign},
    foundation::{
        core::{Canvas, Edges, Rgba8},
        error::{OverlayError, OverlayResult},
    },
    project::Project,
};

/// Named color/font preset applied to a single project's render.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Theme {
    /// Human-readable name shown in pickers.
    pub label: String,
    /// Banner fill.
    pub banner: Rgba8,
    /// Caption color. The decoration border uses it too.
    pub text: Rgba8,
    /// Font identifier applied when the project has no explicit font.
    pub font: String,
    /// Draw the decoration frame and corner accents.
    pub border: bool,
}

impl Theme {
    fn stock(label: &str, banner: Rgba8, text: Rgba8, font: &str, border: bool) -> Self {
        Self {
            label: label.to_string(),
            banner,
            text,
            font: font.to_string(),
            border,
        }
    }
}

/// Theme presets keyed by name.
///
/// Lookups are exact. Iteration is in name order so listings are stable.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ThemeTable {
    themes: BTreeMap<String, Theme>,
}

impl Default for ThemeTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert(
            "Classic",
            Theme::stock(
                "Classic Fantasy",
                Rgba8::rgb(0x0a, 0x0a, 0x15),
                Rgba8::rgb(0xd4, 0xa8, 0x57),
                "Cinzel",
                true,
            ),
        );
        table.insert(
            "Noir",
            Theme::stock(
                "Noir Detective",
                Rgba8::rgb(0x1a, 0x1a, 0x1a),
                Rgba8::rgb(0xf0, 0xf0, 0xf0),
                "Special Elite",
                false,
            ),
        );
        table.insert(
            "Parchment",
            Theme::stock(
                "Old Parchment",
                Rgba8::rgb(0xf0, 0xe6, 0xd2),
                Rgba8::rgb(0x3e, 0x27, 0x23),
                "Cinzel Decorative",
                true,
            ),
        );
        table.insert(
            "Royal",
            Theme::stock(
                "Royal Court",
                Rgba8::rgb(0x2d, 0x0a, 0x31),
                Rgba8::rgb(0xff, 0xd7, 0x00),
                "MedievalSharp",
                true,
            ),
        );
        table.insert(
            "Forest",
            Theme::stock(
                "Elven Forest",
                Rgba8::rgb(0x1a, 0x2f, 0x1a),
                Rgba8::rgb(0xe0, 0xf2, 0xf1),
                "Uncial Antiqua",
                true,
            ),
        );
        table.insert(
            "Crimson",
            Theme::stock(
                "Blood Pact",
                Rgba8::rgb(0x3a, 0x0a, 0x0a),
                Rgba8::rgb(0xff, 0xb3, 0xb3),
                "Rye",
                true,
            ),
        );
        table
    }
}

impl ThemeTable {
    pub fn empty() -> Self {
        Self {
            themes: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, theme: Theme) {
        self.themes.insert(name.into(), theme);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Theme)> {
        self.themes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

/// One selectable font face.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontFace {
    /// Family name as registered in the font book.
    pub name: String,
    pub label: String,
    /// Generic class the face belongs to (`serif`, `cursive`).
    #[serde(default = "default_generic")]
    pub generic: String,
}

fn default_generic() -> String {
    "serif".to_string()
}

/// The set of selectable fonts and the default one.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontCatalog {
    pub default: String,
    pub available: Vec<FontFace>,
}

impl Default for FontCatalog {
    fn default() -> Self {
        let face = |name: &str, label: &str, generic: &str| FontFace {
            name: name.to_string(),
            label: label.to_string(),
            generic: generic.to_string(),
        };
        Self {
            default: "Cinzel".to_string(),
            available: vec![
                face("Cinzel", "Cinzel (Classic)", "serif"),
                face("Cinzel Decorative", "Cinzel Decorative", "serif"),
                face("MedievalSharp", "Medieval Sharp", "cursive"),
                face("Uncial Antiqua", "Uncial Antiqua", "cursive"),
                face("Almendra Display", "Almendra", "cursive"),
                face("Special Elite", "Noir Typewriter", "cursive"),
                face("Rye", "Western/Grim", "cursive"),
                face("Metamorphous", "Metamorphous", "cursive"),
                face("Pirata One", "Pirate", "cursive"),
            ],
        }
    }
}

impl FontCatalog {
    pub fn get(&self, name: &str) -> Option<&FontFace> {
        self.available.iter().find(|f| f.name == name)
    }

    /// Family to render `name` with. Names outside the catalog fall back to the default.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        match self.get(name) {
            Some(face) => face.name.as_str(),
            None => {
                tracing::debug!(font = name, fallback = %self.default, "font not in catalog");
                self.default.as_str()
            }
        }
    }
}

/// Concrete values for one project's render.
///
/// Produced by [`resolve_style`]; everything the compositor needs, with themes already applied.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub canvas: Canvas,
    pub preview_scale: f64,
    pub format: OutputFormat,
    pub quality: f32,
    pub background: Rgba8,
    pub banner: ResolvedBanner,
    pub text: ResolvedText,
    /// `None` when decoration is disabled.
    pub decoration: Option<ResolvedDecoration>,
    pub letterbox: Rgba8,
    pub placeholder: ResolvedPlaceholder,
    /// Theme name applied, if any.
    pub theme: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedBanner {
    pub height_fraction: f64,
    pub color: Rgba8,
    pub gradient_overlay: bool,
    pub padding: Edges,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedText {
    pub color: Rgba8,
    pub family: String,
    pub max_font_size: f64,
    pub min_font_size: f64,
    pub font_size_step: f64,
    pub line_height: f64,
    pub align: TextAlign,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedDecoration {
    pub color: Rgba8,
    pub stroke_width: f64,
    pub corner_length: f64,
    pub inset: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPlaceholder {
    pub fill: Rgba8,
    pub label: Option<String>,
    pub label_color: Rgba8,
    pub label_size_px: f64,
    pub label_family: String,
}

/// Merge the shared spec with a project's theme and font selection.
///
/// Pure: `spec` and `themes` are never touched, so rendering one project under a theme cannot
/// leak into the next. A project without a theme gets the `OutputSpec`'s own style block. The
/// font is the project's explicit choice, else the theme font, else `spec.text.font`, resolved
/// through the catalog.
pub fn resolve_style(
    project: &Project,
    spec: &OutputSpec,
    themes: &ThemeTable,
    catalog: &FontCatalog,
) -> OverlayResult<ResolvedStyle> {
    let theme = match project.theme() {
        Some(name) => Some((
            name,
            themes
                .get(name)
                .ok_or_else(|| OverlayError::validation(format!("unknown theme '{name}'")))?,
        )),
        None => None,
    };

    let requested_font = project
        .font()
        .or(theme.map(|(_, t)| t.font.as_str()))
        .unwrap_or(spec.text.font.as_str());
    let family = catalog.resolve(requested_font).to_string();

    let (banner_color, text_color, decoration) = match theme {
        Some((_, t)) => (
            t.banner,
            t.text,
            t.border.then(|| ResolvedDecoration {
                color: t.text,
                stroke_width: spec.decoration.stroke_width,
                corner_length: spec.decoration.corner_length,
                inset: spec.decoration.inset,
            }),
        ),
        None => (
            spec.banner.background,
            spec.text.color,
            spec.decoration.enabled.then(|| ResolvedDecoration {
                color: spec.decoration.color,
                stroke_width: spec.decoration.stroke_width,
                corner_length: spec.decoration.corner_length,
                inset: spec.decoration.inset,
            }),
        ),
    };

    let placeholder = &spec.image.placeholder;
    let label_family = match placeholder.label_font.as_deref() {
        Some(name) => catalog.resolve(name).to_string(),
        None => family.clone(),
    };

    Ok(ResolvedStyle {
        canvas: spec.canvas(),
        preview_scale: spec.preview_scale,
        format: spec.format,
        quality: spec.quality,
        background: spec.background,
        banner: ResolvedBanner {
            height_fraction: spec.banner.height_fraction,
            color: banner_color,
            gradient_overlay: spec.banner.gradient_overlay,
            padding: spec.banner.padding,
        },
        text: ResolvedText {
            color: text_color,
            family,
            max_font_size: spec.text.max_font_size,
            min_font_size: spec.text.min_font_size,
            font_size_step: spec.text.font_size_step,
            line_height: spec.text.line_height,
            align: spec.text.align,
        },
        decoration,
        letterbox: spec.image.letterbox,
        placeholder: ResolvedPlaceholder {
            fill: placeholder.fill,
            label: placeholder.label.clone(),
            label_color: placeholder.label_color,
            label_size_px: placeholder.label_size_px,
            label_family,
        },
        theme: theme.map(|(name, _)| name.to_string()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/config/theme.rs"]
mod tests;
