//! Lifecycle of the single chart a page shows.
//!
//! ```text
//!            build                 toggle
//!   Absent ─────────▶ Visible ◀──────────────▶ Hidden
//!     ▲                  │  (re-render after      │
//!     └── failed build ──┘   layout settles)      │
//!                         build (any state) ◀─────┘
//! ```
//!
//! The controller owns the chart section, its surface and the live renderer
//! instance. Every path that draws goes through one acquire step that
//! destroys the previous instance first, so at most one instance exists.

use super::export::Export;
use super::layout::PieLayout;
use super::renderer::{pie_svg, Renderer, RendererLoader, Surface};
use super::spec::PieSpec;
use crate::config::ChartConfig;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::palette::ColorAllocator;
use crate::relevance::{ChartDataset, RelevanceFilter};
use crate::table::TableSource;
use batuta_common::display::WithDimensions;
use std::path::Path;
use tracing::{debug, info};

/// Toggle control label while the chart is shown.
pub const CLOSE_LABEL: &str = "close chart";
/// Toggle control label while the chart is collapsed.
pub const OPEN_LABEL: &str = "open chart";
/// Save control label.
pub const SAVE_LABEL: &str = "save chart";

/// Where the chart is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartState {
    /// No chart section.
    #[default]
    Absent,
    /// Section expanded, chart drawn (or about to be).
    Visible,
    /// Section collapsed, no instance.
    Hidden,
}

/// The chart's container with its two controls and drawing surface.
#[derive(Debug, Clone)]
pub struct ChartSection {
    expanded: bool,
    toggle_label: &'static str,
    surface: Surface,
}

impl ChartSection {
    fn new(width: u32, height: u32) -> Self {
        Self {
            expanded: true,
            toggle_label: CLOSE_LABEL,
            surface: Surface::new(width, height),
        }
    }

    fn expand(&mut self) {
        self.expanded = true;
        self.toggle_label = CLOSE_LABEL;
    }

    fn collapse(&mut self) {
        self.expanded = false;
        self.toggle_label = OPEN_LABEL;
    }

    /// Whether the container is shown.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Current toggle control label.
    #[must_use]
    pub fn toggle_label(&self) -> &'static str {
        self.toggle_label
    }

    /// Save control label.
    #[must_use]
    pub fn save_label(&self) -> &'static str {
        SAVE_LABEL
    }

    /// The drawing surface.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

/// Permission to draw once layout has settled after re-opening.
///
/// Redeeming a ticket issued before any later state change does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct RenderTicket {
    generation: u64,
}

/// Extract, aggregate and filter a table into the dataset to chart.
///
/// # Errors
///
/// Extraction errors from `source`, or [`Error::NoDisplayableData`].
pub fn prepare_dataset<S: TableSource + ?Sized>(source: &S, filter: &RelevanceFilter) -> Result<ChartDataset> {
    let table = source.extract()?;
    let stats = table.stats();
    debug!(stats = stats.len(), "computed category statistics");
    filter.select(&stats)
}

/// Owns the chart section and its single renderer instance.
pub struct ChartController<R: Renderer> {
    config: ChartConfig,
    filter: RelevanceFilter,
    allocator: ColorAllocator,
    renderer: Option<R>,
    dataset: Option<ChartDataset>,
    spec: Option<PieSpec>,
    section: Option<ChartSection>,
    instance: Option<R::Instance>,
    state: ChartState,
    generation: u64,
}

impl<R: Renderer> ChartController<R> {
    /// Controller waiting for its renderer (see [`Self::ensure_renderer`]).
    #[must_use]
    pub fn new(config: ChartConfig) -> Self {
        Self {
            filter: config.relevance_filter(),
            allocator: config.color_allocator(),
            config,
            renderer: None,
            dataset: None,
            spec: None,
            section: None,
            instance: None,
            state: ChartState::Absent,
            generation: 0,
        }
    }

    /// Controller with a renderer already available.
    #[must_use]
    pub fn with_renderer(config: ChartConfig, renderer: R) -> Self {
        let mut controller = Self::new(config);
        controller.renderer = Some(renderer);
        controller
    }

    /// Wait for `loader` unless a renderer is already present.
    ///
    /// # Errors
    ///
    /// [`Error::RendererUnavailable`] when loading fails.
    pub async fn ensure_renderer<L>(&mut self, loader: L) -> Result<()>
    where
        L: RendererLoader<Renderer = R>,
    {
        if self.renderer.is_some() {
            debug!("renderer already loaded");
            return Ok(());
        }
        let renderer = loader.load().await?;
        self.renderer = Some(renderer);
        info!("renderer loaded");
        Ok(())
    }

    /// Whether drawing is possible.
    #[must_use]
    pub fn renderer_ready(&self) -> bool {
        self.renderer.is_some()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ChartState {
        self.state
    }

    /// Dataset currently held, if any.
    #[must_use]
    pub fn dataset(&self) -> Option<&ChartDataset> {
        self.dataset.as_ref()
    }

    /// Description of the current chart, if any.
    #[must_use]
    pub fn spec(&self) -> Option<&PieSpec> {
        self.spec.as_ref()
    }

    /// The chart section, if built.
    #[must_use]
    pub fn section(&self) -> Option<&ChartSection> {
        self.section.as_ref()
    }

    /// The live renderer instance, if any.
    #[must_use]
    pub fn instance(&self) -> Option<&R::Instance> {
        self.instance.as_ref()
    }

    /// The renderer, once loaded.
    #[must_use]
    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    /// Settings in use.
    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Replace any chart with a fresh section showing `dataset`.
    ///
    /// # Errors
    ///
    /// [`Error::RendererUnavailable`] before the renderer is loaded (nothing
    /// changes), [`Error::EmptyData`] for an empty dataset, or the renderer's
    /// error. Both of the latter leave the controller `Absent`.
    pub fn build(&mut self, dataset: ChartDataset) -> Result<()> {
        if self.renderer.is_none() {
            return Err(Error::RendererUnavailable);
        }

        self.remove_section();
        if dataset.is_empty() {
            return Err(Error::EmptyData);
        }

        let colors = self.allocator.colors(dataset.len());
        self.spec = Some(PieSpec::from_dataset(
            &dataset,
            &colors,
            &self.config.title,
            self.config.style(),
        ));
        self.dataset = Some(dataset);
        self.section = Some(ChartSection::new(self.config.width, self.config.height));

        self.render_or_remove()?;
        self.state = ChartState::Visible;
        info!(slices = self.spec.as_ref().map_or(0, PieSpec::len), "chart built");
        Ok(())
    }

    /// Collapse a visible chart or expand a hidden one.
    ///
    /// Collapsing destroys the instance immediately. Expanding returns a
    /// ticket; the chart is drawn when it is passed to
    /// [`Self::layout_settled`].
    ///
    /// # Errors
    ///
    /// [`Error::NoChartInstance`] when there is no chart section.
    pub fn toggle(&mut self) -> Result<Option<RenderTicket>> {
        let Some(section) = self.section.as_mut() else {
            return Err(Error::NoChartInstance("toggle"));
        };

        self.generation += 1;
        match self.state {
            ChartState::Visible => {
                section.collapse();
                self.release_instance();
                self.state = ChartState::Hidden;
                info!("chart closed");
                Ok(None)
            }
            ChartState::Hidden | ChartState::Absent => {
                section.expand();
                self.state = ChartState::Visible;
                info!("chart opened, waiting for layout");
                Ok(Some(RenderTicket {
                    generation: self.generation,
                }))
            }
        }
    }

    /// Draw the chart for a ticket from [`Self::toggle`].
    ///
    /// Returns `Ok(false)` without drawing when the ticket is stale.
    ///
    /// # Errors
    ///
    /// The renderer's error; the controller is then `Absent`.
    pub fn layout_settled(&mut self, ticket: RenderTicket) -> Result<bool> {
        if ticket.generation != self.generation || self.state != ChartState::Visible {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "skipping stale render"
            );
            return Ok(false);
        }
        self.render_or_remove()?;
        Ok(true)
    }

    /// Run control: redraw the held dataset, or extract one from `source`.
    ///
    /// A visible chart is redrawn at once. A hidden chart is expanded again
    /// and, as with [`Self::toggle`], drawn only when the returned ticket is
    /// passed to [`Self::layout_settled`].
    ///
    /// # Errors
    ///
    /// Extraction, relevance or renderer errors.
    pub fn rebuild_on_demand<S: TableSource + ?Sized>(&mut self, source: &S) -> Result<Option<RenderTicket>> {
        if self.renderer.is_none() {
            return Err(Error::RendererUnavailable);
        }

        if self.dataset.is_none() {
            let dataset = prepare_dataset(source, &self.filter)?;
            return self.build(dataset).map(|()| None);
        }

        let Some(section) = self.section.as_mut() else {
            let dataset = self.dataset.take().unwrap_or_default();
            return self.build(dataset).map(|()| None);
        };

        self.generation += 1;
        if self.state == ChartState::Hidden {
            section.expand();
            self.state = ChartState::Visible;
            info!("chart reopened by run, waiting for layout");
            return Ok(Some(RenderTicket {
                generation: self.generation,
            }));
        }

        self.render_or_remove()?;
        self.state = ChartState::Visible;
        info!("chart re-rendered");
        Ok(None)
    }

    /// Change the drawing surface size.
    ///
    /// The size applies to later builds too. A visible chart is torn down
    /// and drawn again at the new size; a hidden one is drawn when it is
    /// reopened.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] for a zero size (nothing changes), or the
    /// renderer's error, which leaves the controller `Absent`.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        self.config.width = width;
        self.config.height = height;

        if self.section.is_none() {
            return Ok(());
        }
        self.release_instance();
        if let Some(section) = self.section.as_mut() {
            section.surface.set_dimensions(width, height);
        }
        debug!(width, height, "chart surface resized");

        if self.state == ChartState::Visible {
            self.generation += 1;
            self.render_or_remove()?;
        }
        Ok(())
    }

    /// Encode the visible chart as PNG.
    ///
    /// # Errors
    ///
    /// [`Error::NoChartInstance`] unless a chart is visible.
    pub fn export(&self) -> Result<Export> {
        let (renderer, instance, section) = self.live()?;
        let png = renderer.export_png(instance, &section.surface)?;
        Ok(Export::png(self.config.export_filename.clone(), png))
    }

    /// Encode the visible chart as SVG, named after the PNG export.
    ///
    /// # Errors
    ///
    /// [`Error::NoChartInstance`] unless a chart is visible.
    pub fn export_svg(&self) -> Result<Export> {
        let (_, _, section) = self.live()?;
        let spec = self.spec.as_ref().ok_or(Error::NoChartInstance("export"))?;
        let document = pie_svg(spec, section.surface.width(), section.surface.height()).render();
        let filename = Path::new(&self.config.export_filename)
            .with_extension("svg")
            .to_string_lossy()
            .into_owned();
        Ok(Export::svg(filename, document))
    }

    /// Tooltip lines for the slice under surface coordinates `(x, y)`.
    #[must_use]
    pub fn tooltip_at(&self, x: f32, y: f32) -> Option<&[String; 2]> {
        let (_, _, section) = self.live().ok()?;
        let spec = self.spec.as_ref()?;
        let layout = PieLayout::compute(section.surface.width(), section.surface.height(), spec);
        layout
            .slice_at(Point::new(x, y))
            .and_then(|i| spec.tooltips.get(i))
    }

    fn live(&self) -> Result<(&R, &R::Instance, &ChartSection)> {
        if self.state != ChartState::Visible {
            return Err(Error::NoChartInstance("export"));
        }
        match (&self.renderer, &self.instance, &self.section) {
            (Some(renderer), Some(instance), Some(section)) => Ok((renderer, instance, section)),
            _ => Err(Error::NoChartInstance("export")),
        }
    }

    /// Destroy the current instance (if any), then draw a new one.
    fn acquire(&mut self) -> Result<()> {
        let renderer = self.renderer.as_mut().ok_or(Error::RendererUnavailable)?;
        let section = self.section.as_mut().ok_or(Error::NoChartInstance("render"))?;
        let spec = self.spec.as_ref().ok_or(Error::EmptyData)?;

        if let Some(old) = self.instance.take() {
            renderer.destroy(old, &mut section.surface);
        }
        self.instance = Some(renderer.draw(&mut section.surface, spec)?);
        Ok(())
    }

    fn render_or_remove(&mut self) -> Result<()> {
        let result = self.acquire();
        if result.is_err() {
            self.remove_section();
        }
        result
    }

    fn release_instance(&mut self) {
        if let Some(instance) = self.instance.take() {
            if let (Some(renderer), Some(section)) = (self.renderer.as_mut(), self.section.as_mut()) {
                renderer.destroy(instance, &mut section.surface);
            }
        }
    }

    fn remove_section(&mut self) {
        self.release_instance();
        self.section = None;
        self.state = ChartState::Absent;
        self.generation += 1;
    }
}

impl<R: Renderer> std::fmt::Debug for ChartController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartController")
            .field("state", &self.state)
            .field("renderer_ready", &self.renderer.is_some())
            .field("slices", &self.dataset.as_ref().map(|d| d.len()))
            .field("has_instance", &self.instance.is_some())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::renderer::{FramebufferRenderer, Preloaded};
    use crate::stats::CategoryStat;
    use crate::table::{Cell, CellRole, TableDocument};

    /// Renderer that counts live instances and can be told to fail.
    #[derive(Debug, Default)]
    struct CountingRenderer {
        live: usize,
        max_live: usize,
        drawn: usize,
        fail: bool,
    }

    impl Renderer for CountingRenderer {
        type Instance = usize;

        fn draw(&mut self, _surface: &mut Surface, _spec: &PieSpec) -> Result<usize> {
            if self.fail {
                return Err(Error::Rendering("boom".to_string()));
            }
            self.live += 1;
            self.drawn += 1;
            self.max_live = self.max_live.max(self.live);
            Ok(self.drawn)
        }

        fn destroy(&mut self, _instance: usize, _surface: &mut Surface) {
            self.live -= 1;
        }

        fn export_png(&self, _instance: &usize, _surface: &Surface) -> Result<Vec<u8>> {
            Ok(vec![0x89])
        }
    }

    fn dataset() -> ChartDataset {
        ChartDataset::new(vec![
            CategoryStat::new("Irish", 42.5, 3.5),
            CategoryStat::new("British", 35.0, 1.0),
        ])
    }

    fn controller() -> ChartController<CountingRenderer> {
        ChartController::with_renderer(ChartConfig::default(), CountingRenderer::default())
    }

    fn live(c: &ChartController<CountingRenderer>) -> usize {
        c.renderer().unwrap().live
    }

    #[test]
    fn test_build_shows_chart() {
        let mut c = controller();
        c.build(dataset()).unwrap();

        assert_eq!(c.state(), ChartState::Visible);
        let section = c.section().unwrap();
        assert!(section.is_expanded());
        assert_eq!(section.toggle_label(), "close chart");
        assert_eq!(section.save_label(), "save chart");
        assert_eq!(live(&c), 1);
        assert_eq!(c.spec().unwrap().labels[0], "Irish (42.5% ± 3.5)");
    }

    #[test]
    fn test_build_requires_renderer() {
        let mut c: ChartController<CountingRenderer> = ChartController::new(ChartConfig::default());
        assert!(matches!(c.build(dataset()), Err(Error::RendererUnavailable)));
        assert_eq!(c.state(), ChartState::Absent);
    }

    #[test]
    fn test_build_empty_dataset_stays_absent() {
        let mut c = controller();
        c.build(dataset()).unwrap();

        assert!(matches!(c.build(ChartDataset::default()), Err(Error::EmptyData)));
        assert_eq!(c.state(), ChartState::Absent);
        assert!(c.section().is_none());
        assert_eq!(live(&c), 0);
    }

    #[test]
    fn test_failed_render_leaves_absent() {
        let renderer = CountingRenderer {
            fail: true,
            ..CountingRenderer::default()
        };
        let mut c = ChartController::with_renderer(ChartConfig::default(), renderer);

        assert!(c.build(dataset()).is_err());
        assert_eq!(c.state(), ChartState::Absent);
        assert!(c.section().is_none());
    }

    #[test]
    fn test_rebuild_destroys_previous_instance() {
        let mut c = controller();
        c.build(dataset()).unwrap();
        c.build(dataset()).unwrap();

        assert_eq!(live(&c), 1);
        assert_eq!(c.renderer().unwrap().max_live, 1);
        assert_eq!(c.renderer().unwrap().drawn, 2);
    }

    #[test]
    fn test_toggle_close_then_open() {
        let mut c = controller();
        c.build(dataset()).unwrap();

        assert!(c.toggle().unwrap().is_none());
        assert_eq!(c.state(), ChartState::Hidden);
        assert_eq!(c.section().unwrap().toggle_label(), "open chart");
        assert!(!c.section().unwrap().is_expanded());
        assert_eq!(live(&c), 0);

        let ticket = c.toggle().unwrap().unwrap();
        assert_eq!(c.state(), ChartState::Visible);
        assert_eq!(c.section().unwrap().toggle_label(), "close chart");
        assert_eq!(live(&c), 0, "drawing waits for layout");

        assert!(c.layout_settled(ticket).unwrap());
        assert_eq!(live(&c), 1);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut c = controller();
        c.build(dataset()).unwrap();
        c.toggle().unwrap();
        let ticket = c.toggle().unwrap().unwrap();
        c.toggle().unwrap();

        assert!(!c.layout_settled(ticket).unwrap());
        assert_eq!(c.state(), ChartState::Hidden);
        assert_eq!(live(&c), 0);
    }

    #[test]
    fn test_ticket_invalidated_by_rebuild() {
        let mut c = controller();
        c.build(dataset()).unwrap();
        c.toggle().unwrap();
        let ticket = c.toggle().unwrap().unwrap();
        c.build(dataset()).unwrap();

        assert!(!c.layout_settled(ticket).unwrap());
        assert_eq!(live(&c), 1);
    }

    #[test]
    fn test_toggle_without_chart() {
        let mut c = controller();
        assert!(matches!(c.toggle(), Err(Error::NoChartInstance(_))));
    }

    #[test]
    fn test_export_only_when_visible() {
        let mut c = controller();
        assert!(c.export().is_err());

        c.build(dataset()).unwrap();
        let export = c.export().unwrap();
        assert_eq!(export.filename, "ancestry-chart.png");

        c.toggle().unwrap();
        assert!(matches!(c.export(), Err(Error::NoChartInstance(_))));
    }

    #[test]
    fn test_rebuild_on_demand_extracts_once() {
        let source = TableDocument::new(vec![
            vec![Cell::new(CellRole::Other, ""), Cell::new(CellRole::Source, "A")],
            vec![Cell::new(CellRole::Target, "Average"), Cell::new(CellRole::Result, "5")],
        ]);
        let mut c = controller();

        assert!(c.rebuild_on_demand(&source).unwrap().is_none());
        assert_eq!(c.dataset().unwrap().len(), 1);

        let empty = TableDocument::new(Vec::new());
        assert!(c.rebuild_on_demand(&empty).unwrap().is_none());
        assert_eq!(c.renderer().unwrap().drawn, 2);
        assert_eq!(live(&c), 1);
    }

    #[test]
    fn test_rebuild_on_demand_reopens_hidden_chart() {
        let mut c = controller();
        c.build(dataset()).unwrap();
        c.toggle().unwrap();

        let ticket = c.rebuild_on_demand(&TableDocument::new(Vec::new())).unwrap().unwrap();
        assert_eq!(c.state(), ChartState::Visible);
        assert_eq!(c.section().unwrap().toggle_label(), "close chart");
        assert_eq!(live(&c), 0, "drawing waits for layout");

        assert!(c.layout_settled(ticket).unwrap());
        assert_eq!(live(&c), 1);
    }

    #[test]
    fn test_rebuild_on_demand_redraws_visible_chart_at_once() {
        let mut c = controller();
        c.build(dataset()).unwrap();
        c.toggle().unwrap();
        let ticket = c.toggle().unwrap().unwrap();

        assert!(c.rebuild_on_demand(&TableDocument::new(Vec::new())).unwrap().is_none());
        assert_eq!(live(&c), 1);
        assert!(!c.layout_settled(ticket).unwrap(), "run supersedes the pending render");
        assert_eq!(c.renderer().unwrap().max_live, 1);
    }

    #[test]
    fn test_resize_redraws_visible_chart() {
        let mut c = controller();
        c.build(dataset()).unwrap();

        c.resize(320, 200).unwrap();
        let surface = c.section().unwrap().surface();
        assert_eq!((surface.width(), surface.height()), (320, 200));
        assert_eq!((c.config().width, c.config().height), (320, 200));
        assert_eq!(live(&c), 1);
        assert_eq!(c.renderer().unwrap().drawn, 2);
        assert_eq!(c.renderer().unwrap().max_live, 1);
    }

    #[test]
    fn test_resize_hidden_chart_draws_on_reopen() {
        let mut c = controller();
        c.build(dataset()).unwrap();
        c.toggle().unwrap();

        c.resize(320, 200).unwrap();
        assert_eq!(live(&c), 0);
        assert_eq!(c.renderer().unwrap().drawn, 1);

        let ticket = c.toggle().unwrap().unwrap();
        c.layout_settled(ticket).unwrap();
        assert_eq!(c.section().unwrap().surface().width(), 320);
        assert_eq!(live(&c), 1);
    }

    #[test]
    fn test_resize_before_build_sets_size() {
        let mut c = controller();
        c.resize(300, 150).unwrap();
        c.build(dataset()).unwrap();
        assert_eq!(c.section().unwrap().surface().height(), 150);
    }

    #[test]
    fn test_resize_to_zero_is_rejected() {
        let mut c = controller();
        c.build(dataset()).unwrap();

        assert!(matches!(c.resize(0, 100), Err(Error::InvalidDimensions { .. })));
        assert_eq!(c.section().unwrap().surface().width(), 800);
        assert_eq!(live(&c), 1);
    }

    #[test]
    fn test_resize_framebuffer_surface() {
        let mut c = ChartController::with_renderer(ChartConfig::default(), FramebufferRenderer::new());
        c.build(dataset()).unwrap();

        c.resize(240, 180).unwrap();
        let fb = c.section().unwrap().surface().framebuffer().unwrap();
        assert_eq!((fb.width(), fb.height()), (240, 180));
        let layout = &c.instance().unwrap().layout;
        assert!(layout.center.x < 240.0 && layout.center.y < 180.0);
        assert!(layout.radius < 90.0);
    }

    #[test]
    fn test_rebuild_on_demand_reports_extraction_failure() {
        let mut c = controller();
        let err = c.rebuild_on_demand(&TableDocument::new(Vec::new())).unwrap_err();
        assert!(err.is_extraction());
        assert_eq!(c.state(), ChartState::Absent);
    }

    #[test]
    fn test_tooltip_and_svg_with_framebuffer_renderer() {
        let config = ChartConfig {
            width: 400,
            height: 300,
            ..ChartConfig::default()
        };
        let mut c = ChartController::with_renderer(config, FramebufferRenderer::new());
        c.build(dataset()).unwrap();

        let center = c.instance().unwrap().layout.center;
        let right_of_top = center.at_clock_angle(0.2, 20.0);
        let lines = c.tooltip_at(right_of_top.x, right_of_top.y).unwrap();
        assert_eq!(lines[0], "Irish: 42.50%");
        assert_eq!(lines[1], "Std Dev: ± 3.50%");
        assert!(c.tooltip_at(0.0, 0.0).is_none());

        let svg = c.export_svg().unwrap();
        assert_eq!(svg.filename, "ancestry-chart.svg");

        c.toggle().unwrap();
        assert!(c.tooltip_at(right_of_top.x, right_of_top.y).is_none());
    }

    #[tokio::test]
    async fn test_ensure_renderer_is_idempotent() {
        let mut c: ChartController<CountingRenderer> = ChartController::new(ChartConfig::default());
        assert!(!c.renderer_ready());

        c.ensure_renderer(Preloaded(CountingRenderer::default())).await.unwrap();
        c.build(dataset()).unwrap();

        c.ensure_renderer(Preloaded(CountingRenderer::default())).await.unwrap();
        assert_eq!(live(&c), 1, "second load must not replace the renderer");
    }
}
