//! The pie chart: description, geometry, renderers, lifecycle and export.
//!
//! # Example
//!
//! ```
//! use ancestry_chart::chart::{ChartController, ChartState, FramebufferRenderer};
//! use ancestry_chart::config::ChartConfig;
//! use ancestry_chart::relevance::ChartDataset;
//! use ancestry_chart::stats::CategoryStat;
//!
//! let dataset = ChartDataset::new(vec![
//!     CategoryStat::new("Irish", 42.5, 3.5),
//!     CategoryStat::new("British", 35.0, 1.0),
//! ]);
//!
//! let mut chart = ChartController::with_renderer(ChartConfig::default(), FramebufferRenderer::new());
//! chart.build(dataset).unwrap();
//! assert_eq!(chart.state(), ChartState::Visible);
//!
//! let png = chart.export().unwrap();
//! assert_eq!(png.filename, "ancestry-chart.png");
//! ```

mod controller;
mod export;
mod host;
mod layout;
mod renderer;
mod spec;

pub use controller::{
    prepare_dataset, ChartController, ChartSection, ChartState, RenderTicket, CLOSE_LABEL,
    OPEN_LABEL, SAVE_LABEL,
};
pub use export::{DownloadSink, Export, ExportFormat, FileDownloads, DEFAULT_EXPORT_FILENAME};
pub use host::{ChartHost, HostEvent};
pub use layout::{LegendRow, PieLayout, SliceAngles};
pub use renderer::{
    pie_svg, FramebufferRenderer, PieInstance, Preloaded, Renderer, RendererLoader, Surface,
    DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
pub use spec::{slice_label, tooltip_lines, ChartKind, ChartStyle, LegendPosition, PieSpec, DEFAULT_TITLE};
