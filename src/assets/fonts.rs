use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    foundation::error::{OverlayError, OverlayResult},
    layout::text::TextMeasurer,
};

/// Loaded font families plus the Parley contexts used to shape with them.
///
/// Only explicitly registered fonts are visible: no system fonts are consulted, so measurements
/// are reproducible across machines. Asking for a family that was never loaded is
/// [`OverlayError::UnmeasurableText`] rather than a fallback metric.
///
/// Painting uses whichever face Parley selected while shaping, so a family registered from
/// several files (weights, collection members) is drawn with the same face it was measured with.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    /// Lowercased family key to the registered family name.
    families: BTreeMap<String, String>,
    /// Paint-side handles, keyed by Parley blob id and collection index.
    paint_faces: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

/// One line of text shaped for painting. Positions are relative to the line's top-left corner,
/// in logical pixels.
#[derive(Clone, Debug)]
pub struct ShapedLine {
    pub family: String,
    pub font_size: f32,
    pub runs: Vec<ShapedRun>,
    pub width: f64,
    /// Baseline offset from the line top.
    pub baseline: f32,
    /// Font ascent above the baseline.
    pub ascent: f32,
    /// Font descent below the baseline.
    pub descent: f32,
}

impl ShapedLine {
    pub fn glyphs(&self) -> impl Iterator<Item = &ShapedGlyph> {
        self.runs.iter().flat_map(|r| r.glyphs.iter())
    }

    /// Logical extent from the top of the ascent to the bottom of the descent.
    pub fn ink_top(&self) -> f32 {
        self.baseline - self.ascent
    }

    pub fn ink_bottom(&self) -> f32 {
        self.baseline + self.descent
    }
}

/// Glyphs sharing one font face.
#[derive(Clone, Debug)]
pub struct ShapedRun {
    pub font: vello_cpu::peniko::FontData,
    pub glyphs: Vec<ShapedGlyph>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapedGlyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.families().collect::<Vec<_>>())
            .field("paint_faces", &self.paint_faces.len())
            .finish()
    }
}

fn family_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl FontBook {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: BTreeMap::new(),
            paint_faces: HashMap::new(),
        }
    }

    /// Register raw font bytes and return the family names they provide.
    pub fn register(&mut self, bytes: Vec<u8>) -> OverlayResult<Vec<String>> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes), None);
        if families.is_empty() {
            return Err(OverlayError::validation(
                "no font families registered from font bytes",
            ));
        }

        let mut names = Vec::with_capacity(families.len());
        for (id, _) in families {
            let name = self
                .font_ctx
                .collection
                .family_name(id)
                .ok_or_else(|| OverlayError::validation("registered font family has no name"))?
                .to_string();
            self.families.insert(family_key(&name), name.clone());
            names.push(name);
        }
        tracing::debug!(families = ?names, "registered font");
        Ok(names)
    }

    pub fn load_file(&mut self, path: &Path) -> OverlayResult<Vec<String>> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font file '{}'", path.display()))?;
        self.register(bytes)
    }

    /// Load every `.ttf`, `.otf` and `.ttc` file directly inside `dir`, in file name order.
    ///
    /// Unreadable or unparsable files are skipped with a warning. Returns the number of families
    /// registered.
    pub fn load_dir(&mut self, dir: &Path) -> OverlayResult<usize> {
        let rd = std::fs::read_dir(dir)
            .with_context(|| format!("read font dir '{}'", dir.display()))?;

        let mut paths: Vec<PathBuf> = rd
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.extension()
                    .and_then(|s| s.to_str())
                    .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();

        let mut count = 0;
        for path in paths {
            match self.load_file(&path) {
                Ok(names) => count += names.len(),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping font"),
            }
        }
        Ok(count)
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.families.contains_key(&family_key(family))
    }

    /// Registered family names, sorted case-insensitively.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.values().map(String::as_str)
    }

    fn family_name(&self, family: &str) -> OverlayResult<String> {
        self.families
            .get(&family_key(family))
            .cloned()
            .ok_or_else(|| OverlayError::unmeasurable(format!("font family '{family}' is not loaded")))
    }

    fn layout(
        &mut self,
        text: &str,
        family: &str,
        size_px: f64,
    ) -> OverlayResult<parley::Layout<()>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(OverlayError::unmeasurable(format!(
                "font size {size_px} must be finite and > 0"
            )));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Single(parley::style::FontFamily::Named(Cow::Owned(
                family.to_string(),
            ))),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }

    /// Shape `text` as a single unwrapped line.
    pub fn shape_line(
        &mut self,
        text: &str,
        family: &str,
        size_px: f64,
    ) -> OverlayResult<ShapedLine> {
        let family = self.family_name(family)?;
        let layout = self.layout(text, &family, size_px)?;

        let mut runs = Vec::new();
        let (mut baseline, mut ascent, mut descent) = (0.0f32, 0.0f32, 0.0f32);
        for line in layout.lines() {
            let m = line.metrics();
            baseline = baseline.max(m.baseline);
            ascent = ascent.max(m.ascent);
            descent = descent.max(m.descent);

            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let mut glyphs = Vec::new();
                for g in glyph_run.glyphs() {
                    glyphs.push(ShapedGlyph {
                        id: g.id,
                        x: x + g.x,
                        y: y - g.y,
                    });
                    x += g.advance;
                }
                if glyphs.is_empty() {
                    continue;
                }

                let face = glyph_run.run().font();
                let key = (face.data.id(), face.index);
                let font = self
                    .paint_faces
                    .entry(key)
                    .or_insert_with(|| {
                        vello_cpu::peniko::FontData::new(
                            vello_cpu::peniko::Blob::from(face.data.data().to_vec()),
                            face.index,
                        )
                    })
                    .clone();
                runs.push(ShapedRun { font, glyphs });
            }
        }

        Ok(ShapedLine {
            family,
            font_size: size_px as f32,
            runs,
            width: f64::from(layout.width()),
            baseline,
            ascent,
            descent,
        })
    }
}

impl TextMeasurer for FontBook {
    fn measure(&mut self, text: &str, family: &str, size_px: f64) -> OverlayResult<f64> {
        let family = self.family_name(family)?;
        let layout = self.layout(text, &family, size_px)?;
        Ok(f64::from(layout.width()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
