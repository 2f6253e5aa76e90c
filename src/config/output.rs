use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::{
        core::{Canvas, Edges, Rgba8},
        error::{OverlayError, OverlayResult},
    },
    layout::text::MAX_SIZE_STEPS,
};

/// Process-wide output configuration.
///
/// Built once at startup (usually [`OutputSpec::default`] or a JSON file) and never mutated
/// afterwards. Per-project differences such as themes are layered on top by
/// [`crate::resolve_style`], which produces a fresh [`crate::ResolvedStyle`] for every render.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutputSpec {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Encoded file format used by exports.
    pub format: OutputFormat,
    /// Encoder quality in `[0, 1]` (JPEG only).
    pub quality: f32,
    /// Surface scale used for interactive previews.
    pub preview_scale: f64,
    /// Fill behind everything else.
    pub background: Rgba8,
    pub banner: BannerSpec,
    pub text: TextSpec,
    pub decoration: DecorationSpec,
    pub image: ImageRegionSpec,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BannerSpec {
    /// Banner height as a fraction of the output height, in `(0, 1)`.
    pub height_fraction: f64,
    pub background: Rgba8,
    /// Paint the fixed dark-clear-dark vertical gradient over the banner fill.
    pub gradient_overlay: bool,
    /// Content box inset inside the banner.
    pub padding: Edges,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextSpec {
    pub color: Rgba8,
    pub max_font_size: f64,
    pub min_font_size: f64,
    /// Decrement between candidate font sizes.
    pub font_size_step: f64,
    /// Line pitch as a multiple of the font size.
    pub line_height: f64,
    pub align: TextAlign,
    /// Default font identifier (a [`crate::FontCatalog`] name).
    pub font: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DecorationSpec {
    pub enabled: bool,
    pub color: Rgba8,
    /// Frame stroke width. Corner accents are one pixel thicker.
    pub stroke_width: f64,
    /// Arm length of each L-shaped corner accent.
    pub corner_length: f64,
    /// Distance between the banner edge and the frame.
    pub inset: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageRegionSpec {
    /// Fill behind a contained image (visible as letterbox bars).
    pub letterbox: Rgba8,
    pub placeholder: PlaceholderSpec,
}

/// What the image region shows while a project has no image bound.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlaceholderSpec {
    pub fill: Rgba8,
    /// Centered hint text; `None` draws the fill only.
    pub label: Option<String>,
    pub label_color: Rgba8,
    pub label_size_px: f64,
    /// Font identifier for the label; `None` uses the caption font.
    pub label_font: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1620,
            format: OutputFormat::Png,
            quality: 1.0,
            preview_scale: 0.5,
            background: Rgba8::BLACK,
            banner: BannerSpec::default(),
            text: TextSpec::default(),
            decoration: DecorationSpec::default(),
            image: ImageRegionSpec::default(),
        }
    }
}

impl Default for BannerSpec {
    fn default() -> Self {
        Self {
            height_fraction: 0.2,
            background: Rgba8::rgb(0x0a, 0x0a, 0x15),
            gradient_overlay: true,
            padding: Edges {
                top: 60.0,
                bottom: 40.0,
                left: 80.0,
                right: 80.0,
            },
        }
    }
}

impl Default for TextSpec {
    fn default() -> Self {
        Self {
            color: Rgba8::rgb(0xd4, 0xa8, 0x57),
            max_font_size: 80.0,
            min_font_size: 30.0,
            font_size_step: 2.0,
            line_height: 1.2,
            align: TextAlign::Center,
            font: "Cinzel".to_string(),
        }
    }
}

impl Default for DecorationSpec {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Rgba8::rgb(0xd4, 0xa8, 0x57),
            stroke_width: 2.0,
            corner_length: 20.0,
            inset: 15.0,
        }
    }
}

impl Default for ImageRegionSpec {
    fn default() -> Self {
        Self {
            letterbox: Rgba8::rgb(0x0a, 0x0a, 0x15),
            placeholder: PlaceholderSpec::default(),
        }
    }
}

impl Default for PlaceholderSpec {
    fn default() -> Self {
        Self {
            fill: Rgba8::rgb(0x15, 0x15, 0x20),
            label: Some("Drop image here".to_string()),
            label_color: Rgba8::rgb(0x33, 0x33, 0x33),
            label_size_px: 48.0,
            label_font: None,
        }
    }
}

impl OutputSpec {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Parse a (possibly partial) JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> OverlayResult<Self> {
        let spec: Self = serde_json::from_str(json)
            .map_err(|e| OverlayError::validation(format!("parse output spec: {e}")))?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn from_json_file(path: &Path) -> OverlayResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read output spec '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> OverlayResult<()> {
        let max_side = u32::from(u16::MAX);
        if self.width == 0 || self.height == 0 {
            return Err(OverlayError::validation("output width/height must be > 0"));
        }
        if self.width > max_side || self.height > max_side {
            return Err(OverlayError::validation(format!(
                "output width/height must be <= {max_side}"
            )));
        }
        if !self.quality.is_finite() || !(0.0..=1.0).contains(&self.quality) {
            return Err(OverlayError::validation("quality must be within [0, 1]"));
        }
        if !self.preview_scale.is_finite() || self.preview_scale <= 0.0 {
            return Err(OverlayError::validation(
                "preview_scale must be finite and > 0",
            ));
        }

        let f = self.banner.height_fraction;
        if !f.is_finite() || f <= 0.0 || f >= 1.0 {
            return Err(OverlayError::validation(
                "banner.height_fraction must be within (0, 1)",
            ));
        }
        for (name, value) in [
            ("top", self.banner.padding.top),
            ("bottom", self.banner.padding.bottom),
            ("left", self.banner.padding.left),
            ("right", self.banner.padding.right),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(OverlayError::validation(format!(
                    "banner.padding.{name} must be finite and >= 0",
                )));
            }
        }

        let t = &self.text;
        if !t.min_font_size.is_finite() || t.min_font_size <= 0.0 {
            return Err(OverlayError::validation(
                "text.min_font_size must be finite and > 0",
            ));
        }
        if !t.max_font_size.is_finite() || t.max_font_size < t.min_font_size {
            return Err(OverlayError::validation(
                "text.max_font_size must be finite and >= min_font_size",
            ));
        }
        if !t.font_size_step.is_finite() || t.font_size_step <= 0.0 {
            return Err(OverlayError::validation(
                "text.font_size_step must be finite and > 0",
            ));
        }
        if (t.max_font_size - t.min_font_size) / t.font_size_step > MAX_SIZE_STEPS {
            return Err(OverlayError::validation(format!(
                "text font size range covers more than {MAX_SIZE_STEPS} steps",
            )));
        }
        if !t.line_height.is_finite() || t.line_height <= 0.0 {
            return Err(OverlayError::validation(
                "text.line_height must be finite and > 0",
            ));
        }
        if t.font.trim().is_empty() {
            return Err(OverlayError::validation("text.font must be non-empty"));
        }

        let d = &self.decoration;
        if !d.stroke_width.is_finite() || d.stroke_width <= 0.0 {
            return Err(OverlayError::validation(
                "decoration.stroke_width must be finite and > 0",
            ));
        }
        for (name, value) in [("corner_length", d.corner_length), ("inset", d.inset)] {
            if !value.is_finite() || value < 0.0 {
                return Err(OverlayError::validation(format!(
                    "decoration.{name} must be finite and >= 0",
                )));
            }
        }

        let p = &self.image.placeholder;
        if !p.label_size_px.is_finite() || p.label_size_px <= 0.0 {
            return Err(OverlayError::validation(
                "image.placeholder.label_size_px must be finite and > 0",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/output.rs"]
mod tests;
