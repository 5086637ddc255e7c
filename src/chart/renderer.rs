//! Drawing surfaces and the renderers that draw pies onto them.
//!
//! A [`Renderer`] turns a [`PieSpec`] into a live instance on a [`Surface`]
//! and tears it down again. The controller never holds more than one
//! instance, and always hands the old one back through [`Renderer::destroy`]
//! before drawing the next.

use super::layout::{PieLayout, LEGEND_FONT_SIZE, LEGEND_SWATCH_RADIUS, TITLE_FONT_SIZE};
use super::spec::PieSpec;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::output::{PngEncoder, SvgEncoder, TextAnchor};
use crate::render::{draw_circle, draw_circle_outline, draw_spoke, fill_wedge, Fonts};
use batuta_common::display::WithDimensions;
use tokio::sync::oneshot;
use tracing::{debug, Level};

/// Default surface width.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default surface height.
pub const DEFAULT_HEIGHT: u32 = 600;

/// Fixed-size drawing area owned by the chart section.
///
/// The backing framebuffer is allocated when a renderer first draws and
/// dropped when the instance is destroyed, so a blank surface holds no
/// pixels.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    framebuffer: Option<Framebuffer>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl Surface {
    /// Create a blank surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            framebuffer: None,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Framebuffer to draw into, allocated on first use or after a resize.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] for a zero-sized surface.
    pub fn canvas(&mut self) -> Result<&mut Framebuffer> {
        let fits = self
            .framebuffer
            .as_ref()
            .is_some_and(|fb| fb.width() == self.width && fb.height() == self.height);
        if !fits {
            self.framebuffer = Some(Framebuffer::new(self.width, self.height)?);
        }
        self.framebuffer
            .as_mut()
            .ok_or_else(|| Error::Rendering("surface has no canvas".to_string()))
    }

    /// Current pixels, `None` while blank.
    #[must_use]
    pub fn framebuffer(&self) -> Option<&Framebuffer> {
        self.framebuffer.as_ref()
    }

    /// Whether nothing is drawn.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.framebuffer.is_none()
    }

    /// Drop the pixels.
    pub fn release(&mut self) {
        self.framebuffer = None;
    }
}

impl WithDimensions for Surface {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.framebuffer = None;
    }
}

/// Something that can draw a pie on a surface.
pub trait Renderer {
    /// Handle to a drawn chart.
    type Instance;

    /// Draw `spec` on `surface`.
    ///
    /// # Errors
    ///
    /// Renderer-specific; the surface is left blank on failure.
    fn draw(&mut self, surface: &mut Surface, spec: &PieSpec) -> Result<Self::Instance>;

    /// Tear down `instance`, leaving `surface` blank.
    fn destroy(&mut self, instance: Self::Instance, surface: &mut Surface);

    /// Encode what `instance` shows as PNG.
    ///
    /// # Errors
    ///
    /// [`Error::NoChartInstance`] on a blank surface, or an encoding error.
    fn export_png(&self, _instance: &Self::Instance, surface: &Surface) -> Result<Vec<u8>> {
        surface
            .framebuffer()
            .ok_or(Error::NoChartInstance("export"))
            .and_then(PngEncoder::to_bytes)
    }
}

/// Live pie drawn by [`FramebufferRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub struct PieInstance {
    /// Geometry the pie was drawn with.
    pub layout: PieLayout,
}

/// Software renderer rasterizing onto the surface's framebuffer.
///
/// Draws the slices, their borders, the rim, the title and the legend
/// (point-style swatches with their labels).
#[derive(Debug, Clone, Copy, Default)]
pub struct FramebufferRenderer;

impl FramebufferRenderer {
    /// Create a renderer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for FramebufferRenderer {
    type Instance = PieInstance;

    fn draw(&mut self, surface: &mut Surface, spec: &PieSpec) -> Result<PieInstance> {
        if spec.is_empty() || spec.total() <= 0.0 {
            return Err(Error::EmptyData);
        }

        let layout = PieLayout::compute(surface.width(), surface.height(), spec);
        let style = spec.style;
        let fb = surface.canvas()?;
        fb.clear(style.background);

        for (slice, &color) in layout.slices.iter().zip(&spec.colors) {
            fill_wedge(fb, layout.center, layout.radius, slice.start, slice.end, color);
        }

        if style.border_width > 0.0 {
            if layout.slices.len() > 1 {
                for slice in &layout.slices {
                    draw_spoke(fb, layout.center, layout.radius, slice.start, style.border_width, style.border_color);
                }
            }
            let (cx, cy) = (layout.center.x.round() as i32, layout.center.y.round() as i32);
            let rim = layout.radius.round() as i32;
            for k in 0..style.border_width.ceil() as i32 {
                draw_circle_outline(fb, cx, cy, rim + k, style.border_color);
            }
        }

        let fonts = Fonts::embedded()?;
        fonts.draw(
            fb,
            layout.title.x,
            layout.title.y,
            &spec.title,
            TITLE_FONT_SIZE,
            true,
            style.text_color,
            TextAnchor::Middle,
        );

        for ((row, label), &color) in layout.legend.iter().zip(&spec.labels).zip(&spec.colors) {
            let (x, y) = (row.swatch.x.round() as i32, row.swatch.y.round() as i32);
            draw_circle(fb, x, y, LEGEND_SWATCH_RADIUS as i32, color);
            fonts.draw(
                fb,
                row.text.x,
                row.text.y,
                label,
                LEGEND_FONT_SIZE,
                false,
                style.text_color,
                TextAnchor::Start,
            );
        }

        if tracing::enabled!(Level::DEBUG) {
            let (_, _, mean_luminance) = fb.luminance_stats();
            debug!(
                slices = layout.slices.len(),
                radius = layout.radius,
                mean_luminance,
                "rasterized pie"
            );
        }
        Ok(PieInstance { layout })
    }

    fn destroy(&mut self, _instance: PieInstance, surface: &mut Surface) {
        surface.release();
    }
}

/// Vector rendition of `spec` at the given size: title, wedges and legend.
#[must_use]
pub fn pie_svg(spec: &PieSpec, width: u32, height: u32) -> SvgEncoder {
    let layout = PieLayout::compute(width, height, spec);
    let style = spec.style;
    let stroke = (style.border_width > 0.0).then_some(style.border_color);
    let background = (style.background.a > 0).then_some(style.background);

    let mut svg = SvgEncoder::new(width, height).background(background).text_anchored(
        layout.title.x,
        layout.title.y,
        &spec.title,
        TITLE_FONT_SIZE,
        true,
        style.text_color,
        TextAnchor::Middle,
    );

    for (slice, &color) in layout.slices.iter().zip(&spec.colors) {
        svg = svg.wedge(layout.center, layout.radius, slice.start, slice.end, color, stroke, style.border_width);
    }

    for ((row, label), &color) in layout.legend.iter().zip(&spec.labels).zip(&spec.colors) {
        svg = svg
            .circle_outlined(row.swatch, LEGEND_SWATCH_RADIUS, color, None, 0.0)
            .text_anchored(
                row.text.x,
                row.text.y,
                label,
                LEGEND_FONT_SIZE,
                false,
                style.text_color,
                TextAnchor::Start,
            );
    }
    svg
}

/// Asynchronous source of a [`Renderer`], completing once.
#[allow(async_fn_in_trait)]
pub trait RendererLoader {
    /// Renderer produced.
    type Renderer: Renderer;

    /// Wait for the renderer to become available.
    ///
    /// # Errors
    ///
    /// [`Error::RendererUnavailable`] when loading fails.
    async fn load(self) -> Result<Self::Renderer>;
}

/// Loader for a renderer that is already in hand.
#[derive(Debug, Clone, Default)]
pub struct Preloaded<R>(pub R);

impl<R: Renderer> RendererLoader for Preloaded<R> {
    type Renderer = R;

    async fn load(self) -> Result<R> {
        Ok(self.0)
    }
}

/// A renderer delivered from another task; a dropped sender means it failed
/// to load.
impl<R: Renderer> RendererLoader for oneshot::Receiver<R> {
    type Renderer = R;

    async fn load(self) -> Result<R> {
        self.await.map_err(|_| Error::RendererUnavailable)
    }
}
