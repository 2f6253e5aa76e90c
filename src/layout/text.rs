use crate::{
    config::output::TextAlign,
    foundation::{
        core::{Point, Rect},
        error::{OverlayError, OverlayResult},
    },
};

/// Width oracle for a single run of text.
///
/// Implementations must be deterministic: the same `(text, family, size_px)` always yields the
/// same width. [`crate::FontBook`] is the production implementation.
pub trait TextMeasurer {
    /// Advance width of `text` set in `family` at `size_px`, in logical pixels.
    fn measure(&mut self, text: &str, family: &str, size_px: f64) -> OverlayResult<f64>;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &mut T {
    fn measure(&mut self, text: &str, family: &str, size_px: f64) -> OverlayResult<f64> {
        (**self).measure(text, family, size_px)
    }
}

/// Upper bound on the sizes one [`fit_text`] call may evaluate.
pub const MAX_SIZE_STEPS: f64 = 10_000.0;

/// Search range and box for [`fit_text`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitParams {
    pub max_size: f64,
    pub min_size: f64,
    pub step: f64,
    /// Line pitch as a multiple of the font size.
    pub line_height: f64,
    pub box_width: f64,
    pub box_height: f64,
}

/// Wrapped caption at its chosen size.
#[derive(Clone, Debug, PartialEq)]
pub struct LineLayout {
    pub lines: Vec<String>,
    pub font_size: f64,
    /// Distance between consecutive line tops.
    pub line_pitch: f64,
    /// `lines.len() * line_pitch`.
    pub total_height: f64,
    /// Set when even the smallest evaluated size is taller than the box.
    pub overflows: bool,
}

/// One line of a [`LineLayout`] placed inside its content box.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedLine {
    pub text: String,
    /// Top-left corner of the line box.
    pub origin: Point,
    pub width: f64,
}

/// Pick the largest stepped font size at which `text` wraps into `params.box_height`.
///
/// Sizes are tried from `max_size` downward by `step` while they stay `>= min_size`. At each
/// size the text is word-wrapped greedily and any line still wider than the box is broken
/// between characters. If no size fits, the layout at the smallest evaluated size is returned
/// with `overflows` set.
///
/// Whitespace-only text yields zero lines without consulting the measurer.
#[tracing::instrument(skip(text, measurer), fields(chars = text.len()))]
pub fn fit_text(
    text: &str,
    family: &str,
    params: &FitParams,
    mut measurer: impl TextMeasurer,
) -> OverlayResult<LineLayout> {
    if !params.step.is_finite() || params.step <= 0.0 {
        return Err(OverlayError::validation("font size step must be finite and > 0"));
    }
    if !params.min_size.is_finite() || params.min_size <= 0.0 || !params.max_size.is_finite() {
        return Err(OverlayError::validation(
            "font size bounds must be finite and min_size > 0",
        ));
    }
    if (params.max_size - params.min_size) / params.step > MAX_SIZE_STEPS {
        return Err(OverlayError::validation(format!(
            "font size range {}..{} in steps of {} exceeds {MAX_SIZE_STEPS} sizes",
            params.min_size, params.max_size, params.step
        )));
    }

    let words: Vec<&str> = text.split_whitespace().collect();

    if words.is_empty() {
        let font_size = candidate_sizes(params).next().unwrap_or(params.min_size);
        return Ok(LineLayout {
            lines: Vec::new(),
            font_size,
            line_pitch: font_size * params.line_height,
            total_height: 0.0,
            overflows: false,
        });
    }

    let mut last = None;
    for size in candidate_sizes(params) {
        let mut at_size = Measured {
            inner: &mut measurer,
            family,
            size,
        };
        let lines = wrap_words(&words, params.box_width, &mut at_size)?;
        let line_pitch = size * params.line_height;
        let total_height = lines.len() as f64 * line_pitch;

        if total_height <= params.box_height {
            tracing::debug!(size, lines = lines.len(), "caption fits");
            return Ok(LineLayout {
                lines,
                font_size: size,
                line_pitch,
                total_height,
                overflows: false,
            });
        }
        last = Some(LineLayout {
            lines,
            font_size: size,
            line_pitch,
            total_height,
            overflows: true,
        });
    }

    let layout = last.ok_or_else(|| OverlayError::validation("no font size evaluated"))?;
    tracing::warn!(
        size = layout.font_size,
        total_height = layout.total_height,
        box_height = params.box_height,
        "caption overflows banner at smallest size"
    );
    Ok(layout)
}

/// Sizes to evaluate, largest first. Computed by index so long ranges do not drift.
fn candidate_sizes(params: &FitParams) -> impl Iterator<Item = f64> {
    const EPS: f64 = 1e-9;
    let FitParams {
        max_size,
        min_size,
        step,
        ..
    } = *params;
    let stepped = (max_size >= min_size).then(move || {
        (0u64..)
            .map(move |i| max_size - i as f64 * step)
            .take_while(move |size| *size >= min_size - EPS)
    });
    stepped
        .into_iter()
        .flatten()
        .chain((max_size < min_size).then_some(min_size))
}

/// Measurer pinned to one family and size.
struct Measured<'a, M> {
    inner: &'a mut M,
    family: &'a str,
    size: f64,
}

impl<M: TextMeasurer> Measured<'_, M> {
    fn width(&mut self, text: &str) -> OverlayResult<f64> {
        let w = self
            .inner
            .measure(text, self.family, self.size)
            .map_err(|e| match e {
                OverlayError::UnmeasurableText(_) => e,
                other => OverlayError::unmeasurable(format!(
                    "measure '{text}' in '{}': {other}",
                    self.family
                )),
            })?;
        if !w.is_finite() || w < 0.0 {
            return Err(OverlayError::unmeasurable(format!(
                "measurer returned width {w} for '{text}'"
            )));
        }
        Ok(w)
    }
}

fn wrap_words<M: TextMeasurer>(
    words: &[&str],
    box_width: f64,
    m: &mut Measured<'_, M>,
) -> OverlayResult<Vec<String>> {
    let mut greedy = Vec::new();
    let mut current = String::new();
    for word in words {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if m.width(&candidate)? < box_width {
            current = candidate;
        } else {
            greedy.push(std::mem::replace(&mut current, (*word).to_string()));
        }
    }
    if !current.is_empty() {
        greedy.push(current);
    }

    let mut lines = Vec::with_capacity(greedy.len());
    for line in greedy {
        if m.width(&line)? > box_width {
            break_chars(&line, box_width, m, &mut lines)?;
        } else {
            lines.push(line);
        }
    }
    Ok(lines)
}

/// Split an over-wide line between characters. Each piece is as long as possible without
/// exceeding `box_width`; a lone character wider than the box still gets its own line.
fn break_chars<M: TextMeasurer>(
    line: &str,
    box_width: f64,
    m: &mut Measured<'_, M>,
    out: &mut Vec<String>,
) -> OverlayResult<()> {
    let mut current = String::new();
    for ch in line.chars() {
        if current.is_empty() {
            current.push(ch);
            continue;
        }
        let mut candidate = current.clone();
        candidate.push(ch);
        if m.width(&candidate)? <= box_width {
            current = candidate;
        } else {
            out.push(std::mem::replace(&mut current, ch.to_string()));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    Ok(())
}

/// Position each line of `layout` inside `content`.
///
/// The block is centered vertically: its top is `content.y0 + (content.height() -
/// total_height) / 2`, which may sit above the box when the layout overflows. Horizontally each
/// line is anchored to the left edge, the center or the right edge of the box.
pub fn place_lines(
    layout: &LineLayout,
    content: Rect,
    align: TextAlign,
    family: &str,
    mut measurer: impl TextMeasurer,
) -> OverlayResult<Vec<PositionedLine>> {
    let mut m = Measured {
        inner: &mut measurer,
        family,
        size: layout.font_size,
    };

    let mut y = content.y0 + (content.height() - layout.total_height) / 2.0;
    let mut out = Vec::with_capacity(layout.lines.len());
    for line in &layout.lines {
        let width = m.width(line)?;
        let x = match align {
            TextAlign::Left => content.x0,
            TextAlign::Center => content.center().x - width / 2.0,
            TextAlign::Right => content.x1 - width,
        };
        out.push(PositionedLine {
            text: line.clone(),
            origin: Point::new(x, y),
            width,
        });
        y += layout.line_pitch;
    }
    Ok(out)
}

/// Fixed-advance measurer: every char is `em * size_px` wide.
#[cfg(test)]
#[derive(Clone, Copy, Debug)]
pub(crate) struct MonoMeasurer {
    pub em: f64,
}

#[cfg(test)]
impl MonoMeasurer {
    pub(crate) const HALF_EM: Self = Self { em: 0.5 };
}

#[cfg(test)]
impl TextMeasurer for MonoMeasurer {
    fn measure(&mut self, text: &str, _family: &str, size_px: f64) -> OverlayResult<f64> {
        Ok(text.chars().count() as f64 * size_px * self.em)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
