use std::io;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use hostmon::config::{self, load_config, load_config_from_path};
use hostmon::logging;
use hostmon::shutdown::Shutdown;
use hostmon::system::sampler::{Renderer, Sampler};
use hostmon::system::source::{CounterSource, ProcFs};
use hostmon::ui::theme::Theme;
use hostmon::ui::{JsonRenderer, PlainRenderer, RenderMode, TuiRenderer};

#[derive(Parser)]
#[command(
    name = "hostmon",
    about = "Terminal monitor for CPU, per-core and memory utilization"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sampling interval in seconds (minimum 1)
    #[arg(long)]
    interval: Option<u64>,

    /// Maximum number of cores to track (defaults to the host's logical CPU count)
    #[arg(long)]
    max_cores: Option<usize>,

    /// Output mode: tui, plain, json
    #[arg(long)]
    mode: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    let mode = RenderMode::from_str_config(&config.general.mode);
    logging::init(&config.logging, mode.is_interactive())?;

    let shutdown = Shutdown::new();
    let _signals = shutdown.listen_for_signals();

    let source = CounterSource::new(ProcFs::new());
    let mut sampler = Sampler::initialize(source, &config.general.sampler())
        .wrap_err("cannot start sampling")?;

    let mut renderer: Box<dyn Renderer> = match mode {
        RenderMode::Tui => Box::new(TuiRenderer::new(
            Theme::from_config(&config.colors),
            shutdown.clone(),
        )?),
        RenderMode::Plain => Box::new(PlainRenderer::new(io::stdout(), sampler.interval())),
        RenderMode::Json => Box::new(JsonRenderer::new(io::stdout())),
    };

    let ticks = sampler
        .run(renderer.as_mut(), &shutdown)
        .await
        .wrap_err("sampling stopped")?;
    drop(renderer);

    tracing::info!(ticks, "clean shutdown");
    if mode == RenderMode::Json {
        eprintln!("Exiting...");
    } else {
        println!("Exiting...");
    }
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> config::Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(secs) = cli.interval {
        config.general.interval_secs = secs;
    }
    if let Some(cores) = cli.max_cores {
        config.general.max_cores = Some(cores);
    }
    if let Some(ref mode) = cli.mode {
        config.general.mode = mode.clone();
    }
    if let Some(ref path) = cli.log_file {
        config.logging.file = Some(path.clone());
    }

    config
}
