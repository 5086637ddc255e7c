//! # ancestry-chart
//!
//! Turns a multi-source ancestry results table into a pie chart.
//!
//! A results table has one column per source population, one row per target
//! sample and an `Average` row. The pipeline reads it, computes each
//! population's mean and spread, keeps the populations worth showing, gives
//! each one a distinct color and manages the single chart that displays them.
//!
//! ```text
//! TableSource ─▶ StatGenerator ─▶ RelevanceFilter ─▶ ChartController ─▶ Renderer
//!  (table)        (stats)          (relevance)        (chart)            (chart)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ancestry_chart::prelude::*;
//!
//! let table = DelimitedTable::from_text(
//!     "Target,Irish,British,French\n\
//!      s1,40.0,36.0,20.0\n\
//!      s2,45.0,34.0,25.0\n\
//!      Average,42.5,35.0,22.5\n",
//! );
//!
//! let config = ChartConfig::default();
//! let dataset = prepare_dataset(&table, &config.relevance_filter())?;
//! assert_eq!(dataset[0].name, "Irish");
//!
//! let mut chart = ChartController::with_renderer(config, FramebufferRenderer::new());
//! chart.build(dataset)?;
//! let png = chart.export()?;
//! assert_eq!(png.filename, "ancestry-chart.png");
//! # Ok::<(), ancestry_chart::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and color space conversions.
pub mod color;

/// RGBA framebuffer backing the drawing surface.
pub mod framebuffer;

/// Points, rectangles and clock angles.
pub mod geometry;

// ============================================================================
// Pipeline Modules
// ============================================================================

/// Results-table extraction.
pub mod table;

/// Per-category mean and spread.
pub mod stats;

/// Selection and ordering of categories to display.
pub mod relevance;

/// Slice color allocation.
pub mod palette;

/// Chart description, lifecycle, renderers and export.
pub mod chart;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization primitives.
pub mod render;

/// Output encoders (PNG, SVG).
pub mod output;

// ============================================================================
// Configuration & Errors
// ============================================================================

/// YAML configuration.
pub mod config;

/// Error types for ancestry-chart operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use ancestry_chart::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chart::{
        prepare_dataset, ChartController, ChartHost, ChartState, DownloadSink, Export,
        FileDownloads, FramebufferRenderer, HostEvent, PieSpec, Renderer, RendererLoader,
    };
    pub use crate::color::{Hsla, Rgba};
    pub use crate::config::ChartConfig;
    pub use crate::error::{Error, Result};
    pub use crate::palette::ColorAllocator;
    pub use crate::relevance::{ChartDataset, RelevanceFilter};
    pub use crate::stats::{CategoryStat, SampleSet, StatGenerator};
    pub use crate::table::{DelimitedTable, TableDocument, TableSource};
    pub use batuta_common::display::WithDimensions;
}
