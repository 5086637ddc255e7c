//! End-to-end pipeline tests: table in, chart lifecycle, exports out.
//!
//! Run: cargo test --test pipeline_test

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use ancestry_chart::chart::{
    prepare_dataset, ChartController, ChartHost, ChartState, Export, FileDownloads,
    FramebufferRenderer, HostEvent, PieSpec, Preloaded, Renderer, Surface,
};
use ancestry_chart::color::Rgba;
use ancestry_chart::config::ChartConfig;
use ancestry_chart::relevance::RelevanceFilter;
use ancestry_chart::table::{DelimitedTable, TableSource};
use ancestry_chart::Error;
use approx::assert_relative_eq;
use proptest::prelude::*;

const ANCESTRY_TABLE: &str = "\
Target,Irish,British,French
sample-1,41.3,34.2,0.0
sample-2,43.7,35.8,0.0
Average,42.5,35.0,0.0
Notes,not,a,sample
";

fn small_config() -> ChartConfig {
    ChartConfig {
        width: 320,
        height: 240,
        palette_seed: Some(7),
        ..ChartConfig::default()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

#[test]
fn test_end_to_end_dataset_and_labels() {
    let table = DelimitedTable::from_text(ANCESTRY_TABLE);
    let dataset = prepare_dataset(&table, &RelevanceFilter::default()).unwrap();

    let names: Vec<&str> = dataset.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Irish", "British"], "French has a zero mean");
    assert_relative_eq!(dataset[0].mean, 42.5);
    assert_relative_eq!(dataset[0].std_dev, 1.2, epsilon = 1e-9);
    assert_relative_eq!(dataset[1].mean, 35.0);
    assert_relative_eq!(dataset[1].std_dev, 0.8, epsilon = 1e-9);

    let mut chart = ChartController::with_renderer(small_config(), FramebufferRenderer::new());
    chart.build(dataset).unwrap();

    let spec = chart.spec().unwrap();
    assert_eq!(spec.labels, ["Irish (42.5% ± 1.2)", "British (35.0% ± 0.8)"]);
    assert_eq!(spec.tooltips[1], ["British: 35.00%".to_string(), "Std Dev: ± 0.80%".to_string()]);
    assert_eq!(spec.title, "Genetic Ancestry Distribution");
}

#[test]
fn test_rows_after_average_are_not_samples() {
    let table = DelimitedTable::from_text(ANCESTRY_TABLE).extract().unwrap();
    assert_eq!(table.samples.get("Irish").len(), 2);
}

#[test]
fn test_small_values_fall_back_to_second_tier() {
    let text = "T,A,B,C\ns,0.5,0.2,0.01\nAverage,0.5,0.2,0.01\n";
    let dataset = prepare_dataset(&DelimitedTable::from_text(text), &RelevanceFilter::default()).unwrap();
    let names: Vec<&str> = dataset.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
}

#[test]
fn test_nothing_displayable_is_reported_without_chart() {
    let text = "T,A,B\ns,0.05,0.02\nAverage,0.05,0.02\n";
    let mut chart = ChartController::with_renderer(small_config(), FramebufferRenderer::new());

    let err = chart.rebuild_on_demand(&DelimitedTable::from_text(text)).unwrap_err();
    assert!(matches!(err, Error::NoDisplayableData { .. }));
    assert_eq!(chart.state(), ChartState::Absent);
    assert!(chart.section().is_none());
}

#[test]
fn test_many_categories_get_distinct_colors() {
    let names: Vec<String> = (0..15).map(|i| format!("P{i}")).collect();
    let values: Vec<String> = (0..15).map(|i| format!("{}", 20 - i)).collect();
    let text = format!("T,{}\nAverage,{}\n", names.join(","), values.join(","));

    let dataset = prepare_dataset(&DelimitedTable::from_text(text), &RelevanceFilter::default()).unwrap();
    let mut chart = ChartController::with_renderer(small_config(), FramebufferRenderer::new());
    chart.build(dataset).unwrap();

    let colors = &chart.spec().unwrap().colors;
    assert_eq!(colors.len(), 15);
    let unique: std::collections::HashSet<_> = colors.iter().collect();
    assert_eq!(unique.len(), 15);
}

#[test]
fn test_saved_png_carries_title_and_labels() {
    let config = ChartConfig {
        background: Rgba::BLACK,
        ..small_config()
    };
    let mut chart = ChartController::with_renderer(config, FramebufferRenderer::new());
    assert!(chart.rebuild_on_demand(&DelimitedTable::from_text(ANCESTRY_TABLE)).unwrap().is_none());

    let fb = chart.section().unwrap().surface().framebuffer().unwrap();
    let layout = &chart.instance().unwrap().layout;
    let inked = |x0: u32, y0: u32, x1: u32, y1: u32| {
        (y0..y1.min(fb.height()))
            .flat_map(|y| (x0..x1.min(fb.width())).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.get_pixel(x, y) != Some(Rgba::BLACK))
            .count()
    };

    assert!(inked(0, 0, fb.width(), 30) > 0, "title band is blank");
    for row in &layout.legend {
        let (x, y) = (row.text.x as u32, row.text.y as u32);
        assert!(inked(x, y.saturating_sub(12), fb.width(), y + 4) > 0);
    }
    assert_eq!(&chart.export().unwrap().bytes[1..4], b"PNG");
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_toggle_twice_returns_to_same_chart() {
    let table = DelimitedTable::from_text(ANCESTRY_TABLE);
    let mut chart = ChartController::with_renderer(small_config(), FramebufferRenderer::new());
    assert!(chart.rebuild_on_demand(&table).unwrap().is_none());
    let before = chart.spec().cloned().unwrap();
    let dataset_before = chart.dataset().cloned().unwrap();

    assert!(chart.toggle().unwrap().is_none());
    let ticket = chart.toggle().unwrap().unwrap();
    assert!(chart.layout_settled(ticket).unwrap());

    assert_eq!(chart.state(), ChartState::Visible);
    assert_eq!(chart.spec().unwrap(), &before);
    assert_eq!(chart.dataset().unwrap(), &dataset_before);
    assert!(chart.instance().is_some());
}

#[tokio::test]
async fn test_host_saves_png_and_svg_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = ChartHost::new(
        DelimitedTable::from_text(ANCESTRY_TABLE),
        ChartController::new(small_config()),
        FileDownloads::new(dir.path()),
    );

    assert!(host.start(Preloaded(FramebufferRenderer::new())).await);
    assert!(host.dispatch(HostEvent::Save));

    let png = std::fs::read(dir.path().join("ancestry-chart.png")).unwrap();
    assert_eq!(&png[1..4], b"PNG");

    let svg = host.controller().export_svg().unwrap();
    assert_eq!(svg.filename, "ancestry-chart.svg");
    let text = String::from_utf8(svg.bytes).unwrap();
    assert!(text.contains("Irish (42.5% ± 1.2)"));
}

#[tokio::test]
async fn test_save_while_hidden_delivers_nothing() {
    let mut host = ChartHost::new(
        DelimitedTable::from_text(ANCESTRY_TABLE),
        ChartController::new(small_config()),
        Vec::<Export>::new(),
    );
    host.start(Preloaded(FramebufferRenderer::new())).await;

    host.dispatch(HostEvent::Toggle);
    assert!(!host.dispatch(HostEvent::Save));
    assert!(host.sink().is_empty());
}

// ============================================================================
// At most one live instance
// ============================================================================

/// Renderer that tracks how many instances are alive at once.
#[derive(Debug, Default)]
struct TrackingRenderer {
    live: usize,
    max_live: usize,
}

impl Renderer for TrackingRenderer {
    type Instance = ();

    fn draw(&mut self, surface: &mut Surface, _spec: &PieSpec) -> ancestry_chart::Result<()> {
        surface.canvas()?;
        self.live += 1;
        self.max_live = self.max_live.max(self.live);
        Ok(())
    }

    fn destroy(&mut self, _instance: (), surface: &mut Surface) {
        surface.release();
        self.live -= 1;
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Build,
    Toggle,
    Settle,
    Run,
    Resize(u32, u32),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Build),
        Just(Step::Toggle),
        Just(Step::Settle),
        Just(Step::Run),
        (0u32..400, 0u32..300).prop_map(|(w, h)| Step::Resize(w, h)),
    ]
}

proptest! {
    #[test]
    fn prop_at_most_one_live_instance(steps in prop::collection::vec(step(), 1..40)) {
        let table = DelimitedTable::from_text(ANCESTRY_TABLE);
        let filter = RelevanceFilter::default();
        let mut chart = ChartController::with_renderer(small_config(), TrackingRenderer::default());
        let mut tickets = Vec::new();

        for step in steps {
            match step {
                Step::Build => {
                    let dataset = prepare_dataset(&table, &filter).unwrap();
                    chart.build(dataset).unwrap();
                }
                Step::Toggle => {
                    if let Ok(Some(ticket)) = chart.toggle() {
                        tickets.push(ticket);
                    }
                }
                Step::Settle => {
                    if let Some(ticket) = tickets.pop() {
                        let _ = chart.layout_settled(ticket);
                    }
                }
                Step::Run => {
                    if let Ok(Some(ticket)) = chart.rebuild_on_demand(&table) {
                        tickets.push(ticket);
                    }
                }
                Step::Resize(width, height) => {
                    let _ = chart.resize(width, height);
                }
            }

            let renderer = chart.renderer().unwrap();
            prop_assert!(renderer.live <= 1);
            prop_assert_eq!(renderer.live == 1, chart.instance().is_some());
            if chart.state() != ChartState::Visible {
                prop_assert!(chart.instance().is_none());
            }
        }
        prop_assert!(chart.renderer().unwrap().max_live <= 1);
    }
}
