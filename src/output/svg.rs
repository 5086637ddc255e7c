//! SVG output encoder.
//!
//! Vector output keeps the chart's text (title, legend labels) selectable and
//! scalable, which the raster export cannot carry.

use crate::color::Rgba;
use crate::geometry::Point;
use std::f32::consts::{PI, TAU};
use std::fmt::Write as FmtWrite;

/// SVG document builder.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    /// Background color (None for transparent)
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Circle
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: Rgba,
        stroke: Option<Rgba>,
        stroke_width: f32,
    },
    /// Path (SVG path data)
    Path {
        d: String,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f32,
    },
    /// Text
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        bold: bool,
        fill: Rgba,
        anchor: TextAnchor,
    },
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR)
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position (right-aligned for LTR)
    End,
}

impl Default for SvgEncoder {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SvgEncoder {
    /// Create a new SVG encoder with given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            elements: Vec::new(),
        }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Add a circle with stroke.
    #[must_use]
    pub fn circle_outlined(
        mut self,
        center: Point,
        r: f32,
        fill: Rgba,
        stroke: Option<Rgba>,
        stroke_width: f32,
    ) -> Self {
        self.elements.push(SvgElement::Circle {
            cx: center.x,
            cy: center.y,
            r,
            fill,
            stroke,
            stroke_width,
        });
        self
    }

    /// Add a pie wedge between two clock angles (radians, clockwise from 12 o'clock).
    ///
    /// A full turn is emitted as a circle, since an arc cannot start and end
    /// on the same point.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn wedge(
        self,
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        fill: Rgba,
        stroke: Option<Rgba>,
        stroke_width: f32,
    ) -> Self {
        let span = end_angle - start_angle;
        if span >= TAU {
            return self.circle_outlined(center, radius, fill, stroke, stroke_width);
        }

        let from = center.at_clock_angle(start_angle, radius);
        let to = center.at_clock_angle(end_angle, radius);
        let large_arc = u8::from(span > PI);
        let d = format!(
            "M {:.2} {:.2} L {:.2} {:.2} A {radius:.2} {radius:.2} 0 {large_arc} 1 {:.2} {:.2} Z",
            center.x, center.y, from.x, from.y, to.x, to.y
        );
        self.path(&d, Some(fill), stroke, stroke_width)
    }

    /// Add an SVG path.
    #[must_use]
    pub fn path(
        mut self,
        d: &str,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f32,
    ) -> Self {
        self.elements.push(SvgElement::Path {
            d: d.to_string(),
            fill,
            stroke,
            stroke_width,
        });
        self
    }

    /// Add text with anchor.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn text_anchored(
        mut self,
        x: f32,
        y: f32,
        text: &str,
        font_size: f32,
        bold: bool,
        fill: Rgba,
        anchor: TextAnchor,
    ) -> Self {
        self.elements.push(SvgElement::Text {
            x,
            y,
            text: text.to_string(),
            font_size,
            bold,
            fill,
            anchor,
        });
        self
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        if let Some(bg) = self.background {
            let _ = writeln!(
                svg,
                r#"  <rect width="100%" height="100%" fill="{}"/>"#,
                bg.to_css()
            );
        }

        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn stroke_attr(stroke: Option<Rgba>, stroke_width: f32) -> String {
    stroke
        .map(|s| {
            format!(
                r#" stroke="{}" stroke-width="{stroke_width}""#,
                s.to_css()
            )
        })
        .unwrap_or_default()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Convert an SVG element to its string representation.
fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
            stroke_width,
        } => format!(
            r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"{}/>"#,
            fill.to_css(),
            stroke_attr(*stroke, *stroke_width)
        ),
        SvgElement::Path {
            d,
            fill,
            stroke,
            stroke_width,
        } => {
            let fill_attr = fill.map_or_else(|| "none".to_string(), Rgba::to_css);
            format!(
                r#"<path d="{d}" fill="{fill_attr}"{}/>"#,
                stroke_attr(*stroke, *stroke_width)
            )
        }
        SvgElement::Text {
            x,
            y,
            text,
            font_size,
            bold,
            fill,
            anchor,
        } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let weight = if *bold { r#" font-weight="bold""# } else { "" };
            format!(
                r#"<text x="{x}" y="{y}" font-size="{font_size}"{weight} fill="{}" text-anchor="{anchor_str}" font-family="sans-serif">{}</text>"#,
                fill.to_css(),
                escape_xml(text)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::rgb(255, 0, 0);

    #[test]
    fn test_svg_encoder_new() {
        let svg = SvgEncoder::new(800, 600).render();

        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_svg_transparent_background() {
        let svg = SvgEncoder::new(100, 100).background(None).render();
        assert_eq!(svg.matches("<rect").count(), 0);
    }

    #[test]
    fn test_wedge_small_arc() {
        let svg = SvgEncoder::new(100, 100)
            .wedge(Point::new(50.0, 50.0), 40.0, 0.0, PI / 2.0, RED, Some(Rgba::WHITE), 2.0)
            .render();

        assert!(svg.contains("<path d=\"M 50.00 50.00 L 50.00 10.00 A 40.00 40.00 0 0 1 90.00 50.00 Z\""));
        assert!(svg.contains("fill=\"rgb(255,0,0)\""));
        assert!(svg.contains("stroke=\"rgb(255,255,255)\" stroke-width=\"2\""));
    }

    #[test]
    fn test_wedge_large_arc_flag() {
        let svg = SvgEncoder::new(100, 100)
            .wedge(Point::new(50.0, 50.0), 40.0, 0.0, 1.5 * PI, RED, None, 0.0)
            .render();
        assert!(svg.contains(" 0 1 1 "));
        assert!(!svg.contains("stroke="));
    }

    #[test]
    fn test_full_turn_wedge_is_circle() {
        let encoder = SvgEncoder::new(100, 100).wedge(
            Point::new(50.0, 50.0),
            40.0,
            0.0,
            TAU,
            RED,
            None,
            0.0,
        );
        let svg = encoder.render();
        assert!(svg.contains("<circle cx=\"50\" cy=\"50\" r=\"40\""));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn test_svg_text_bold_and_anchor() {
        let svg = SvgEncoder::new(100, 100)
            .text_anchored(50.0, 20.0, "Title", 16.0, true, Rgba::BLACK, TextAnchor::Middle)
            .render();

        assert!(svg.contains("font-weight=\"bold\""));
        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains(">Title</text>"));
    }

    #[test]
    fn test_svg_text_escaping() {
        let svg = SvgEncoder::new(100, 100)
            .text_anchored(
                10.0,
                50.0,
                "<b>A & B \"x\"</b>",
                12.0,
                false,
                Rgba::BLACK,
                TextAnchor::Start,
            )
            .render();

        assert!(!svg.contains("<b>"));
        assert!(svg.contains("&lt;b&gt;A &amp; B &quot;x&quot;&lt;/b&gt;"));
    }
}
