use crate::config::EngineConfig;
use crate::scripted_input::ScriptedInputPlayer;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use voxelcraft_game::{FrameInput, GameEvent, GameState, SaveGame};
use voxelcraft_testkit::{EventRecord, JsonlSink, RunCounters, RunReport, RunResult};

pub struct HeadlessConfig {
    pub engine: EngineConfig,
    pub scripted_input: Option<PathBuf>,
    pub events: Option<PathBuf>,
    pub load: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

pub fn run(cfg: HeadlessConfig) -> Result<RunReport> {
    let started = Instant::now();
    let mut game = match cfg.load.as_deref() {
        Some(path) => {
            let save = SaveGame::load_from_path(path)?;
            GameState::from_save(save, cfg.engine.game.clone())
        }
        None => GameState::new(cfg.engine.game.clone()),
    };
    let mut script = cfg
        .scripted_input
        .as_deref()
        .map(ScriptedInputPlayer::from_path)
        .transpose()?;
    let mut sink = cfg.events.as_deref().map(JsonlSink::create).transpose()?;

    let dt = cfg.engine.run.frame_dt;
    let mut counters = RunCounters::default();
    info!(frames = cfg.engine.run.frames, dt, "headless run starting");

    for _ in 0..cfg.engine.run.frames {
        let input = match script.as_mut() {
            Some(script) => script.advance(dt),
            None => FrameInput::default(),
        };
        let report = game.tick(&input, dt);
        counters.frames += 1;

        for event in &report.events {
            match event {
                GameEvent::BlockBroken { .. } => counters.blocks_broken += 1,
                GameEvent::BlockPlaced { .. } => counters.blocks_placed += 1,
                GameEvent::TargetChanged { target: Some(_) } => counters.target_changes += 1,
                _ => {}
            }
            if let Some(sink) = sink.as_mut() {
                sink.write(&EventRecord {
                    tick: report.tick,
                    kind: event.label(),
                    payload: event,
                })?;
            }
        }
    }
    if let Some(sink) = sink.as_mut() {
        sink.flush()?;
    }
    if script.as_ref().is_some_and(|s| !s.finished()) {
        warn!("frame budget ran out before the scripted input finished");
    }

    if let Some(path) = cfg.save.as_deref() {
        game.to_save(cfg.engine.run.world_name.clone())
            .save_to_path(path)?;
    }

    counters.chunks_loaded = game.world().loaded_chunks();
    counters.overlay_entries = game.world().overlay().len();
    let report = RunReport::new(
        cfg.engine.run.world_name.clone(),
        RunResult::Pass,
        started.elapsed(),
        counters,
    );
    if let Some(path) = cfg.report.as_deref() {
        report
            .write_to_path(path)
            .with_context(|| format!("Failed to export run report to {}", path.display()))?;
    }
    info!(
        frames = report.counters.frames,
        broken = report.counters.blocks_broken,
        placed = report.counters.blocks_placed,
        "headless run finished"
    );
    Ok(report)
}
