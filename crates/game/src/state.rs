use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use voxelcraft_core::{BlockKind, BlockPos, BlockRegistry, FrameTick};
use voxelcraft_physics::{
    clamp_frame_dt, MovementInput, Player, PlayerController, PlayerTuning, TargetResolver,
    TargetResult, DEFAULT_REACH,
};
use voxelcraft_world::{
    area_radius_for_capacity, ChunkGenerator, Inventory, LayeredGenerator, SlotStack, VoxelWorld,
    DEFAULT_SURFACE_Y,
};

use crate::break_progress::{BreakOutcome, BreakProgress, BreakSnapshot};
use crate::mutation::BlockMutationService;

/// World and player parameters for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Seed for chunk generation.
    pub seed: u64,
    /// Grass height of the layered generator.
    pub surface_y: usize,
    /// Resident chunk limit.
    pub chunk_capacity: usize,
    /// Chunks kept loaded around the player, in each direction.
    pub load_radius: i32,
    /// Targeting distance in blocks.
    pub reach: f32,
    /// Feet position of a fresh player.
    pub spawn: [f32; 3],
    pub tuning: PlayerTuning,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            surface_y: DEFAULT_SURFACE_Y,
            chunk_capacity: 256,
            load_radius: 2,
            reach: DEFAULT_REACH,
            spawn: [8.5, DEFAULT_SURFACE_Y as f32 + 1.0, 8.5],
            tuning: PlayerTuning::default(),
        }
    }
}

/// Raw intents for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    pub movement: MovementInput,
    /// Look pitch in radians, positive up.
    pub pitch: f32,
    /// Break intent held this frame.
    pub breaking: bool,
    /// Place action fired this frame.
    pub place: bool,
    /// Flight toggle fired this frame.
    pub toggle_fly: bool,
    /// Direct slot selection.
    pub select_slot: Option<usize>,
    /// Hotbar scroll steps.
    pub scroll: i32,
}

impl FrameInput {
    /// Unit look vector from the movement yaw and this pitch.
    pub fn look_direction(&self) -> Vec3 {
        let yaw = self.movement.yaw;
        let (sin_p, cos_p) = self.pitch.sin_cos();
        Vec3::new(-yaw.sin() * cos_p, sin_p, -yaw.cos() * cos_p)
    }
}

/// Something that happened during a frame, for logs and observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    TargetChanged {
        target: Option<BlockPos>,
    },
    BlockBroken {
        pos: BlockPos,
        kind: BlockKind,
        drop: Option<BlockKind>,
    },
    BlockPlaced {
        pos: BlockPos,
        kind: BlockKind,
        slot: usize,
    },
    FlightToggled {
        flying: bool,
    },
}

impl GameEvent {
    /// Short label for log filtering; matches the serialized tag.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TargetChanged { .. } => "target_changed",
            Self::BlockBroken { .. } => "block_broken",
            Self::BlockPlaced { .. } => "block_placed",
            Self::FlightToggled { .. } => "flight_toggled",
        }
    }
}

/// Result of one [`GameState::tick`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub tick: FrameTick,
    pub events: Vec<GameEvent>,
}

/// Read-only player view for HUDs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub on_ground: bool,
    pub is_flying: bool,
    pub is_sprinting: bool,
    pub is_sneaking: bool,
    pub selected_slot: usize,
}

/// Everything a renderer or HUD reads after a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: FrameTick,
    pub player: PlayerSnapshot,
    pub target: Option<TargetResult>,
    pub breaking: BreakSnapshot,
    pub selected: Option<SlotStack>,
}

/// The single mutable aggregate advanced once per frame.
pub struct GameState {
    settings: GameSettings,
    world: VoxelWorld,
    player: Player,
    inventory: Inventory,
    breaking: BreakProgress,
    controller: PlayerController,
    resolver: TargetResolver,
    target: Option<TargetResult>,
    tick: FrameTick,
}

impl GameState {
    /// A fresh game on layered terrain with the starter inventory.
    pub fn new(settings: GameSettings) -> Self {
        let generator = LayeredGenerator::with_surface(settings.seed, settings.surface_y);
        let player = Player::new(Vec3::from(settings.spawn));
        Self::from_parts(settings, Box::new(generator), player, Inventory::starter())
    }

    /// Assemble a game from explicit parts.
    pub fn from_parts(
        mut settings: GameSettings,
        generator: Box<dyn ChunkGenerator>,
        player: Player,
        inventory: Inventory,
    ) -> Self {
        let fit = area_radius_for_capacity(settings.chunk_capacity);
        if settings.load_radius > fit {
            warn!(
                load_radius = settings.load_radius,
                chunk_capacity = settings.chunk_capacity,
                "Load area does not fit the chunk cache. Using radius {fit}"
            );
            settings.load_radius = fit;
        }
        let world = VoxelWorld::new(
            BlockRegistry::standard(),
            generator,
            settings.chunk_capacity,
        );
        info!(seed = settings.seed, "game state created");
        Self {
            controller: PlayerController::new(settings.tuning),
            resolver: TargetResolver::new(settings.reach),
            settings,
            world,
            player,
            inventory,
            breaking: BreakProgress::new(),
            target: None,
            tick: FrameTick::ZERO,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn world(&self) -> &VoxelWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut VoxelWorld {
        &mut self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    pub fn target(&self) -> Option<&TargetResult> {
        self.target.as_ref()
    }

    pub fn breaking(&self) -> BreakSnapshot {
        self.breaking.snapshot()
    }

    pub fn current_tick(&self) -> FrameTick {
        self.tick
    }

    /// Borrow the world and inventory together for direct edits.
    pub fn mutations(&mut self) -> BlockMutationService<'_> {
        BlockMutationService::new(&mut self.world, &mut self.inventory)
    }

    pub fn player_snapshot(&self) -> PlayerSnapshot {
        let p = &self.player;
        PlayerSnapshot {
            position: p.position.to_array(),
            velocity: p.velocity.to_array(),
            on_ground: p.on_ground,
            is_flying: p.is_flying,
            is_sprinting: p.is_sprinting,
            is_sneaking: p.is_sneaking,
            selected_slot: self.inventory.selected_slot(),
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            player: self.player_snapshot(),
            target: self.target,
            breaking: self.breaking.snapshot(),
            selected: self.inventory.selected_stack().copied(),
        }
    }

    /// Advance one frame: move, retarget, break, place.
    pub fn tick(&mut self, input: &FrameInput, dt: f32) -> FrameReport {
        let dt = clamp_frame_dt(dt);
        let mut events = Vec::new();

        if let Some(slot) = input.select_slot {
            self.inventory.select(slot);
        }
        if input.scroll != 0 {
            self.inventory.scroll_hotbar(input.scroll);
        }
        if input.toggle_fly {
            self.controller.toggle_fly(&mut self.player);
            events.push(GameEvent::FlightToggled {
                flying: self.player.is_flying,
            });
        }

        let feet = self.player.position;
        self.world.ensure_area(
            feet.x.floor() as i32,
            feet.z.floor() as i32,
            self.settings.load_radius,
        );

        self.controller
            .step(&mut self.player, &self.world, &input.movement, dt);

        let eye = self.player.eye(self.controller.tuning());
        let target = self
            .resolver
            .resolve(&self.world, eye, input.look_direction());
        if target.map(|t| t.position) != self.target.map(|t| t.position) {
            events.push(GameEvent::TargetChanged {
                target: target.map(|t| t.position),
            });
        }
        self.target = target;

        let outcome = self.breaking.update(
            self.target.as_ref(),
            input.breaking,
            dt,
            self.world.registry(),
        );
        if let BreakOutcome::Completed(pos) = outcome {
            if let Some(broken) = self.mutations().try_break(pos) {
                events.push(GameEvent::BlockBroken {
                    pos,
                    kind: broken.kind,
                    drop: broken.drop,
                });
            }
        }

        if input.place {
            if let Some(target) = self.target {
                let slot = self.inventory.selected_slot();
                let body = self.player.aabb(self.controller.tuning());
                let pos = target.placement_position;
                if let Some(kind) = self.mutations().try_place(pos, slot, &body) {
                    events.push(GameEvent::BlockPlaced { pos, kind, slot });
                }
            }
        }

        self.tick = self.tick.advance(1);
        if !events.is_empty() {
            debug!(tick = self.tick.0, count = events.len(), "frame events");
        }
        FrameReport {
            tick: self.tick,
            events,
        }
    }
}
