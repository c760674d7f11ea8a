//! voxelcraft - a frame-driven voxel world engine
//!
//! Headless runner: loads config, replays scripted input through the game
//! loop, logs events and optionally saves the world.

mod config;
mod headless;
mod scripted_input;

use anyhow::Result;
use clap::Parser;
use config::{EngineConfig, DEFAULT_CONFIG_PATH};
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "voxelcraft", version, about = "Headless voxel world runner")]
struct Cli {
    /// Engine configuration (TOML).
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Scripted input file (JSON steps).
    #[arg(long)]
    script: Option<PathBuf>,
    /// Frames to run, overriding the config.
    #[arg(long)]
    frames: Option<u64>,
    /// World seed, overriding the config. Ignored with --load.
    #[arg(long)]
    seed: Option<u64>,
    /// Write a save file here on exit.
    #[arg(long)]
    save: Option<PathBuf>,
    /// Resume from this save file.
    #[arg(long)]
    load: Option<PathBuf>,
    /// Append frame events to this JSONL log.
    #[arg(long)]
    events: Option<PathBuf>,
    /// Write a JSON run report here.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Write the effective configuration here before running.
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // WARN by default; override with RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting voxelcraft v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let mut engine = EngineConfig::load_from_path(&cli.config);
    if let Some(frames) = cli.frames {
        engine.run.frames = frames;
    }
    if let Some(seed) = cli.seed {
        if cli.load.is_some() {
            tracing::warn!("--seed has no effect with --load");
        }
        engine.game.seed = seed;
    }
    if let Some(path) = cli.write_config.as_deref() {
        engine.save_to_path(path)?;
    }

    let report = headless::run(HeadlessConfig {
        engine,
        scripted_input: cli.script,
        events: cli.events,
        load: cli.load,
        save: cli.save,
        report: cli.report,
    })?;

    println!("{}", serde_json::to_string_pretty(&report.counters)?);
    Ok(())
}
