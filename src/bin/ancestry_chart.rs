//! ancestry-chart - render a multi-source ancestry results table as a pie chart.

use ancestry_chart::chart::{
    ChartController, ChartHost, DownloadSink, FileDownloads, FramebufferRenderer, HostEvent, Preloaded,
};
use ancestry_chart::config::ChartConfig;
use ancestry_chart::framebuffer::Framebuffer;
use ancestry_chart::table::DelimitedTable;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, warn};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "ancestry-chart")]
#[command(author, version, about = "Render an ancestry results table as a pie chart")]
#[command(long_about = "Reads a results table (one column per source population, one row per \
    target sample, plus an Average row), keeps the populations worth showing and saves the \
    chart as ancestry-chart.png.\n\n\
    Exit codes:\n  \
    0 - Finished (pipeline failures are logged and produce no file)\n  \
    2 - Usage, configuration or start-up error")]
struct Cli {
    /// Results table (CSV, TSV or semicolon separated)
    table: PathBuf,

    /// Configuration file (default: <config dir>/ancestry-chart/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to save the chart into
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// Also save the chart as SVG
    #[arg(long)]
    svg: bool,

    /// Seed for generated slice colors
    #[arg(long)]
    seed: Option<u64>,

    /// Field delimiter (guessed from the header line when omitted)
    #[arg(short, long)]
    delimiter: Option<char>,
}

fn load_config(cli: &Cli) -> Result<ChartConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default_path()
            .map(ChartConfig::load_or_default)
            .unwrap_or_default(),
    };
    if cli.seed.is_some() {
        config.palette_seed = cli.seed;
    }
    Ok(config)
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let exit_code = match run(&cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli)?;
    debug!(backend = ?Framebuffer::backend(), "framebuffer backend");

    let mut table = match DelimitedTable::from_path(&cli.table) {
        Ok(table) => table.with_average_label(config.average_label.clone()),
        Err(e) => {
            warn!(path = %cli.table.display(), error = %e, "cannot read table");
            return Ok(());
        }
    };
    if let Some(delimiter) = cli.delimiter {
        let Ok(byte) = u8::try_from(delimiter) else {
            return Err(format!("delimiter must be a single-byte character, got {delimiter:?}").into());
        };
        table = table.with_delimiter(byte);
    }

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let controller = ChartController::new(config);
    let mut host = ChartHost::new(table, controller, FileDownloads::new(&cli.out));

    runtime.block_on(async {
        if !host.start(Preloaded(FramebufferRenderer::new())).await {
            return;
        }

        if let Some(dataset) = host.controller().dataset() {
            for stat in dataset.iter() {
                println!("{:<24} {:>7.2}%  ± {:.2}", stat.name, stat.mean, stat.std_dev);
            }
        }

        host.dispatch(HostEvent::Save);
        if cli.svg {
            let saved = host.controller().export_svg().and_then(|svg| host.sink_mut().deliver(svg));
            if let Err(e) = saved {
                warn!(error = %e, "cannot save SVG");
            }
        }
    });

    for path in host.sink().written() {
        println!("saved {}", path.display());
    }
    Ok(())
}
