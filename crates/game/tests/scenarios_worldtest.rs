//! End-to-end frame scenarios driven through `GameState::tick`.

use std::f32::consts::FRAC_PI_2;
use std::fs;

use glam::Vec3;
use voxelcraft_core::{BlockKind, BlockPos};
use voxelcraft_game::{FrameInput, GameEvent, GameSettings, GameState, SaveGame};
use voxelcraft_physics::{Intents, MovementInput, Player};
use voxelcraft_testkit::{run_frames, scratch_path, EventRecord, JsonlSink};
use voxelcraft_world::{EmptyGenerator, Inventory};

const DT: f32 = 1.0 / 60.0;

fn flat_game() -> GameState {
    GameState::new(GameSettings {
        surface_y: 20,
        spawn: [8.5, 21.0, 8.5],
        load_radius: 1,
        ..GameSettings::default()
    })
}

fn look_down() -> FrameInput {
    FrameInput {
        pitch: -FRAC_PI_2,
        ..FrameInput::default()
    }
}

#[test]
fn set_then_break_stone_through_game_state() {
    let mut game = GameState::from_parts(
        GameSettings::default(),
        Box::new(EmptyGenerator),
        Player::new(Vec3::new(100.5, 10.0, 100.5)),
        Inventory::new(),
    );

    assert!(game.world_mut().set_block(5, 10, 5, BlockKind::Stone));
    assert_eq!(game.world().get_block(5, 10, 5), BlockKind::Stone);

    assert!(game.mutations().break_block(BlockPos::new(5, 10, 5)));
    assert_eq!(game.world().get_block(5, 10, 5), BlockKind::Air);
    // Catalogue stone drops cobblestone.
    assert_eq!(game.inventory().count_of(BlockKind::Cobblestone), 1);
    assert_eq!(game.inventory().empty_slots(), 35);
}

#[test]
fn two_second_block_breaks_after_about_two_seconds_of_frames() {
    let mut game = flat_game();
    game.world_mut().set_block(8, 20, 8, BlockKind::Planks);
    let input = FrameInput {
        breaking: true,
        ..look_down()
    };

    let mut first_break = None;
    let frames = run_frames(
        &mut game,
        130,
        |tick, game| {
            let report = game.tick(&input, DT);
            for event in report.events {
                if let GameEvent::BlockBroken { pos, kind, .. } = event {
                    first_break.get_or_insert((tick.0 + 1, pos, kind));
                }
            }
        },
        |_, game| game.breaking().progress,
    );

    let (broken_after, pos, kind) = first_break.expect("planks break within 130 frames");
    assert_eq!(pos, BlockPos::new(8, 20, 8));
    assert_eq!(kind, BlockKind::Planks);
    assert!((121..=122).contains(&broken_after), "broke after {broken_after} frames");
    assert_eq!(game.inventory().count_of(BlockKind::Planks), 65);

    let before_break = &frames[..broken_after as usize];
    for pair in before_break.windows(2) {
        assert!(pair[1].snapshot >= pair[0].snapshot);
    }
    assert!(before_break.last().map(|f| f.snapshot).unwrap_or(0.0) > 0.95);
    assert_eq!(frames[broken_after as usize].snapshot, 0.0);
}

#[test]
fn placing_into_own_body_is_rejected() {
    let mut game = GameState::from_parts(
        GameSettings {
            load_radius: 1,
            ..GameSettings::default()
        },
        Box::new(EmptyGenerator),
        Player::new(Vec3::new(5.5, 10.0, 5.5)),
        Inventory::starter(),
    );
    for x in 3..8 {
        for z in 3..8 {
            game.world_mut().set_block(x, 9, z, BlockKind::Stone);
        }
    }

    // Looking straight down, the placement cell is the one the feet occupy.
    let report = game.tick(
        &FrameInput {
            place: true,
            ..look_down()
        },
        DT,
    );
    assert_eq!(
        game.target().map(|t| t.placement_position),
        Some(BlockPos::new(5, 10, 5))
    );
    assert!(!report
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::BlockPlaced { .. })));
    assert_eq!(game.world().get_block(5, 10, 5), BlockKind::Air);

    let body = game.player().aabb(&game.settings().tuning);
    assert!(!game.mutations().place_block(BlockPos::new(5, 11, 5), 0, &body));
    assert_eq!(game.world().get_block(5, 11, 5), BlockKind::Air);
    assert_eq!(game.inventory().get(0).map(|s| s.count), Some(64));
}

#[test]
fn scripted_session_writes_event_log() {
    let mut game = flat_game();
    let path = scratch_path("scenario-events", "jsonl");
    let dig = FrameInput {
        breaking: true,
        ..look_down()
    };
    let walk = FrameInput {
        movement: MovementInput::new(Intents::FORWARD, 0.0),
        ..FrameInput::default()
    };
    let script: Vec<FrameInput> = std::iter::repeat(dig)
        .take(40)
        .chain(std::iter::repeat(walk).take(20))
        .collect();

    let mut written = Vec::new();
    {
        let mut sink = JsonlSink::create(&path).unwrap();
        for input in &script {
            let report = game.tick(input, DT);
            for event in &report.events {
                sink.write(&EventRecord {
                    tick: report.tick,
                    kind: event.label(),
                    payload: event,
                })
                .unwrap();
                written.push(event.clone());
            }
        }
        sink.flush().unwrap();
    }

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), written.len());
    assert!(lines.iter().any(|l| l["kind"] == "block_broken"));
    for (line, event) in lines.iter().zip(&written) {
        let parsed: GameEvent = serde_json::from_value(line["payload"].clone()).unwrap();
        assert_eq!(&parsed, event);
    }
    fs::remove_file(&path).ok();
}

#[test]
fn edits_survive_save_and_reload() {
    let mut game = flat_game();
    for _ in 0..10 {
        game.tick(&FrameInput::default(), DT);
    }
    game.world_mut().set_block(3, 21, 3, BlockKind::Glass);
    assert!(game.mutations().break_block(BlockPos::new(9, 20, 9)));

    let path = scratch_path("scenario-save", "vxs");
    game.to_save("scenario").save_to_path(&path).unwrap();
    let save = SaveGame::load_from_path(&path).unwrap();
    let mut reloaded = GameState::from_save(save, game.settings().clone());
    reloaded.tick(&FrameInput::default(), DT);

    assert_eq!(reloaded.world().get_block(3, 21, 3), BlockKind::Glass);
    assert_eq!(reloaded.world().get_block(9, 20, 9), BlockKind::Air);
    assert_eq!(reloaded.world().get_block(10, 20, 9), BlockKind::Grass);
    assert_eq!(reloaded.player().position, game.player().position);
    assert_eq!(reloaded.inventory(), game.inventory());
    fs::remove_file(&path).ok();
}
