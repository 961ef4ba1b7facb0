use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hook_snake::game::GameConfig;
use hook_snake::modes::{AutoplayMode, HeadlessMode};
use std::{
    fs::File,
    io::stdout,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hook_snake")]
#[command(version, about = "Self-playing Snake with a grappling hook")]
struct Cli {
    /// How to run the game
    #[arg(long, default_value = "autoplay")]
    mode: Mode,

    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Seed for target placement
    #[arg(long)]
    seed: Option<u64>,

    /// Stop a headless run after this many ticks
    #[arg(long)]
    max_ticks: Option<u32>,

    /// Print every headless snapshot as a JSON line on stdout
    #[arg(long)]
    emit_snapshots: bool,

    /// Write logs to this file (autoplay discards logs otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Watch the snake play in the terminal
    Autoplay,
    /// Run one game without rendering and print the result
    Headless,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.mode, cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }

    match cli.mode {
        Mode::Autoplay => {
            let mut autoplay = AutoplayMode::new(config, cli.seed)?;
            autoplay.run().await?;
        }
        Mode::Headless => {
            let mut headless = HeadlessMode::new(config, cli.seed)?
                .max_ticks(cli.max_ticks)
                .emit_snapshots(cli.emit_snapshots);
            let report = headless.run(stdout().lock())?;
            println!("{}", report.message());
        }
    }

    Ok(())
}

/// Route tracing output. The autoplay TUI owns the terminal, so it only logs
/// to a file.
fn init_logging(mode: Mode, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match (log_file, mode) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, Mode::Headless) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        (None, Mode::Autoplay) => {}
    }

    Ok(())
}
