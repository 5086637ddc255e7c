//! Glyph rasterization for chart titles and legend labels.
//!
//! DejaVu Sans (regular and bold) is embedded and parsed once per process.
//! Glyph coverage from `fontdue` is blended onto the framebuffer, so text
//! composes with whatever was drawn underneath.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::output::TextAnchor;
use fontdue::{Font, FontSettings};
use std::sync::OnceLock;

const REGULAR_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const BOLD_TTF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

static FONTS: OnceLock<std::result::Result<Fonts, &'static str>> = OnceLock::new();

/// The embedded regular and bold faces.
pub struct Fonts {
    regular: Font,
    bold: Font,
}

impl std::fmt::Debug for Fonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fonts")
            .field("regular_glyphs", &self.regular.glyph_count())
            .field("bold_glyphs", &self.bold.glyph_count())
            .finish()
    }
}

impl Fonts {
    /// The process-wide embedded fonts, parsed on first use.
    ///
    /// # Errors
    ///
    /// [`Error::Rendering`] if the embedded font data cannot be parsed.
    pub fn embedded() -> Result<&'static Self> {
        FONTS
            .get_or_init(|| {
                Ok(Self {
                    regular: Font::from_bytes(REGULAR_TTF, FontSettings::default())?,
                    bold: Font::from_bytes(BOLD_TTF, FontSettings::default())?,
                })
            })
            .as_ref()
            .map_err(|e| Error::Rendering(format!("embedded font: {e}")))
    }

    fn face(&self, bold: bool) -> &Font {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    /// Advance width of `text` at `size` pixels, kerning included.
    #[must_use]
    pub fn measure(&self, text: &str, size: f32, bold: bool) -> f32 {
        let font = self.face(bold);
        let mut width = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            if let Some(left) = prev {
                width += font.horizontal_kern(left, ch, size).unwrap_or(0.0);
            }
            width += font.metrics(ch, size).advance_width;
            prev = Some(ch);
        }
        width
    }

    /// Draw `text` with its baseline at `y`, anchored horizontally at `x`.
    ///
    /// Glyphs falling outside the framebuffer are clipped.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        fb: &mut Framebuffer,
        x: f32,
        y: f32,
        text: &str,
        size: f32,
        bold: bool,
        color: Rgba,
        anchor: TextAnchor,
    ) {
        let font = self.face(bold);
        let mut pen = match anchor {
            TextAnchor::Start => x,
            TextAnchor::Middle => x - self.measure(text, size, bold) / 2.0,
            TextAnchor::End => x - self.measure(text, size, bold),
        };
        let baseline = y.round() as i32;
        let mut prev = None;

        for ch in text.chars() {
            if let Some(left) = prev {
                pen += font.horizontal_kern(left, ch, size).unwrap_or(0.0);
            }
            let (metrics, coverage) = font.rasterize(ch, size);
            let left = pen.round() as i32 + metrics.xmin;
            let top = baseline - metrics.ymin - metrics.height as i32;

            for (row, line) in coverage.chunks_exact(metrics.width.max(1)).enumerate() {
                for (col, &c) in line.iter().enumerate() {
                    if c == 0 {
                        continue;
                    }
                    let (px, py) = (left + col as i32, top + row as i32);
                    if px < 0 || py < 0 {
                        continue;
                    }
                    let alpha = (u32::from(color.a) * u32::from(c) / 255) as u8;
                    fb.blend_pixel(px as u32, py as u32, color.with_alpha(alpha));
                }
            }

            pen += metrics.advance_width;
            prev = Some(ch);
        }
    }
}
