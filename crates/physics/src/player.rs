//! Player body and the per-frame movement integrator.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};
use voxelcraft_core::VoxelQuery;

use crate::Aabb;

/// Largest frame delta fed to the integrator, in seconds.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Frame delta actually integrated: capped at [`MAX_FRAME_DT`], and zero
/// when `dt` is negative or not finite.
pub fn clamp_frame_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Largest per-axis displacement resolved in one collision pass.
const MAX_SUBSTEP: f32 = 0.5;

/// How far below the feet the ground probe looks.
const GROUND_PROBE: f32 = 0.01;

/// Upward nudge applied while a landing body is still embedded.
const GROUND_SNAP_STEP: f32 = 0.1;

/// Cap on ground-snap nudges per landing.
const MAX_GROUND_SNAP_STEPS: u32 = 10;

bitflags::bitflags! {
    /// Held movement intents for one frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Intents: u8 {
        /// Move along the facing direction.
        const FORWARD = 0b0000_0001;
        /// Move against the facing direction.
        const BACK = 0b0000_0010;
        /// Strafe left.
        const LEFT = 0b0000_0100;
        /// Strafe right.
        const RIGHT = 0b0000_1000;
        /// Jump, or ascend while flying.
        const JUMP = 0b0001_0000;
        /// Sneak, or descend while flying.
        const SNEAK = 0b0010_0000;
        /// Sprint (only effective while moving forward).
        const SPRINT = 0b0100_0000;
    }
}

/// Movement input for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MovementInput {
    /// Held intents.
    pub intents: Intents,
    /// Horizontal facing in radians. Zero faces -Z; positive turns toward -X.
    pub yaw: f32,
}

impl MovementInput {
    /// Input with the given intents and facing.
    pub fn new(intents: Intents, yaw: f32) -> Self {
        Self { intents, yaw }
    }

    /// Unit vector the player faces, flattened onto the ground plane.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Unit vector to the player's right.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y)
    }

    /// Normalized horizontal direction of travel, or zero when idle or when
    /// opposing intents cancel.
    pub fn wish_direction(&self) -> Vec3 {
        let forward = self.forward();
        let right = self.right();
        let mut dir = Vec3::ZERO;
        if self.intents.contains(Intents::FORWARD) {
            dir += forward;
        }
        if self.intents.contains(Intents::BACK) {
            dir -= forward;
        }
        if self.intents.contains(Intents::LEFT) {
            dir -= right;
        }
        if self.intents.contains(Intents::RIGHT) {
            dir += right;
        }
        dir.normalize_or_zero()
    }
}

/// Movement constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Ground speed in blocks per second.
    pub walk_speed: f32,
    /// Ground speed while sprinting forward.
    pub sprint_speed: f32,
    /// Speed in flight, horizontal and vertical.
    pub fly_speed: f32,
    /// Multiplier applied to any speed while sneaking.
    pub sneak_multiplier: f32,
    /// Downward acceleration in blocks per second squared.
    pub gravity: f32,
    /// Upward velocity set by a grounded jump.
    pub jump_velocity: f32,
    /// Maximum falling speed.
    pub terminal_velocity: f32,
    /// Body width (X and Z).
    pub width: f32,
    /// Body height.
    pub height: f32,
    /// Eye height above the feet.
    pub eye_height: f32,
    /// Lowest allowed feet height.
    pub min_y: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            walk_speed: 4.3,
            sprint_speed: 5.6,
            fly_speed: 10.0,
            sneak_multiplier: 0.3,
            gravity: 20.0,
            jump_velocity: 7.0,
            terminal_velocity: 50.0,
            width: 0.6,
            height: 1.8,
            eye_height: 1.62,
            min_y: 1.0,
        }
    }
}

impl PlayerTuning {
    /// Half of the body width.
    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    /// Replace unusable values with their defaults, logging each one.
    ///
    /// Every value must be finite. Body dimensions, gravity and terminal
    /// velocity must be positive; speeds and the sneak multiplier must not be
    /// negative. The eye must sit inside the body.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32| v > 0.0;
        let non_negative = |v: f32| v >= 0.0;

        fix("walk_speed", &mut self.walk_speed, defaults.walk_speed, non_negative);
        fix("sprint_speed", &mut self.sprint_speed, defaults.sprint_speed, non_negative);
        fix("fly_speed", &mut self.fly_speed, defaults.fly_speed, non_negative);
        fix(
            "sneak_multiplier",
            &mut self.sneak_multiplier,
            defaults.sneak_multiplier,
            non_negative,
        );
        fix("gravity", &mut self.gravity, defaults.gravity, positive);
        fix("jump_velocity", &mut self.jump_velocity, defaults.jump_velocity, non_negative);
        fix(
            "terminal_velocity",
            &mut self.terminal_velocity,
            defaults.terminal_velocity,
            positive,
        );
        fix("width", &mut self.width, defaults.width, positive);
        fix("height", &mut self.height, defaults.height, positive);
        let height = self.height;
        fix(
            "eye_height",
            &mut self.eye_height,
            defaults.eye_height.min(height * 0.9),
            |v| v > 0.0 && v <= height,
        );
        fix("min_y", &mut self.min_y, defaults.min_y, |_| true);
        self
    }
}

fn fix(field: &'static str, value: &mut f32, fallback: f32, valid: impl Fn(f32) -> bool) {
    if !(value.is_finite() && valid(*value)) {
        warn!(field, value = *value, fallback, "Invalid player tuning value. Using default");
        *value = fallback;
    }
}

/// Player body state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Feet position (bottom centre of the body).
    pub position: Vec3,
    /// Velocity; only the vertical component carries between frames.
    pub velocity: Vec3,
    /// Standing on a solid block at the start of the last frame.
    pub on_ground: bool,
    /// Flight mode.
    pub is_flying: bool,
    /// Sprinting during the last frame.
    pub is_sprinting: bool,
    /// Sneaking during the last frame.
    pub is_sneaking: bool,
}

impl Player {
    /// A player standing still at `position`.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            on_ground: false,
            is_flying: false,
            is_sprinting: false,
            is_sneaking: false,
        }
    }

    /// Eye position for the given tuning.
    pub fn eye(&self, tuning: &PlayerTuning) -> Vec3 {
        self.position + Vec3::Y * tuning.eye_height
    }

    /// Collision box at the current position.
    pub fn aabb(&self, tuning: &PlayerTuning) -> Aabb {
        Aabb::around_feet(self.position, tuning.half_width(), tuning.height)
    }
}

/// Moves a [`Player`] through the world one frame at a time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerController {
    tuning: PlayerTuning,
}

impl PlayerController {
    /// Controller with the given constants, after
    /// [`PlayerTuning::sanitized`].
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            tuning: tuning.sanitized(),
        }
    }

    /// Movement constants in use.
    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    /// Flip flight mode. Entering or leaving flight clears velocity.
    pub fn toggle_fly(&self, player: &mut Player) {
        player.is_flying = !player.is_flying;
        player.velocity = Vec3::ZERO;
        player.on_ground = false;
    }

    /// Whether the four bottom corners rest on something solid.
    pub fn is_grounded<W: VoxelQuery + ?Sized>(&self, world: &W, feet: Vec3) -> bool {
        let hw = self.tuning.half_width();
        let probe = feet.y - GROUND_PROBE;
        [(-hw, -hw), (hw, -hw), (-hw, hw), (hw, hw)]
            .into_iter()
            .any(|(dx, dz)| {
                world.is_solid_at(voxelcraft_core::BlockPos::containing(
                    feet.x + dx,
                    probe,
                    feet.z + dz,
                ))
            })
    }

    fn collides_at<W: VoxelQuery + ?Sized>(&self, world: &W, feet: Vec3) -> bool {
        Aabb::around_feet(feet, self.tuning.half_width(), self.tuning.height).collides(world)
    }

    /// Advance the player by `dt` seconds, as limited by [`clamp_frame_dt`].
    pub fn step<W: VoxelQuery + ?Sized>(
        &self,
        player: &mut Player,
        world: &W,
        input: &MovementInput,
        dt: f32,
    ) {
        let dt = clamp_frame_dt(dt);
        let tuning = &self.tuning;
        let intents = input.intents;
        let wish = input.wish_direction();

        let sneaking = intents.contains(Intents::SNEAK);
        let sprinting = !player.is_flying
            && intents.contains(Intents::SPRINT)
            && intents.contains(Intents::FORWARD);
        let mut speed = if player.is_flying {
            tuning.fly_speed
        } else if sprinting {
            tuning.sprint_speed
        } else {
            tuning.walk_speed
        };
        if sneaking {
            speed *= tuning.sneak_multiplier;
        }
        player.is_sprinting = sprinting;
        player.is_sneaking = sneaking;

        let mut delta = wish * speed * dt;
        if player.is_flying {
            if intents.contains(Intents::JUMP) {
                delta.y += speed * dt;
            }
            if sneaking {
                delta.y -= speed * dt;
            }
            player.velocity = Vec3::ZERO;
            player.on_ground = false;
        } else {
            player.on_ground = self.is_grounded(world, player.position);
            if player.on_ground {
                if player.velocity.y < 0.0 {
                    player.velocity.y = 0.0;
                }
                if intents.contains(Intents::JUMP) {
                    player.velocity.y = tuning.jump_velocity;
                }
            } else {
                player.velocity.y -= tuning.gravity * dt;
            }
            player.velocity.y = player.velocity.y.max(-tuning.terminal_velocity);
            delta.y = player.velocity.y * dt;
        }

        self.resolve(player, world, delta);

        if player.position.y < tuning.min_y {
            player.position.y = tuning.min_y;
        }
    }

    /// Apply `delta` axis by axis (X, Z, then Y), splitting long moves into
    /// sub-steps so no pass crosses more than half a block.
    fn resolve<W: VoxelQuery + ?Sized>(&self, player: &mut Player, world: &W, delta: Vec3) {
        let substeps = (delta.abs().max_element() / MAX_SUBSTEP).ceil().max(1.0) as u32;
        let part = delta / substeps as f32;
        let (mut move_x, mut move_y, mut move_z) = (true, true, true);

        for _ in 0..substeps {
            let mut pos = player.position;

            if move_x && part.x != 0.0 {
                let test = Vec3::new(pos.x + part.x, pos.y, pos.z);
                if self.collides_at(world, test) {
                    move_x = false;
                } else {
                    pos.x = test.x;
                }
            }

            if move_z && part.z != 0.0 {
                let test = Vec3::new(pos.x, pos.y, pos.z + part.z);
                if self.collides_at(world, test) {
                    move_z = false;
                } else {
                    pos.z = test.z;
                }
            }

            if move_y && part.y != 0.0 {
                let test = Vec3::new(pos.x, pos.y + part.y, pos.z);
                if self.collides_at(world, test) {
                    move_y = false;
                    if !player.is_flying {
                        player.velocity.y = 0.0;
                    }
                    if part.y < 0.0 {
                        pos.y = self.settle(world, pos, test.y);
                    }
                } else {
                    pos.y = test.y;
                }
            }

            player.position = pos;
        }
    }

    /// Landing position after a blocked downward move from `pos` towards
    /// `blocked_y`: the top face of the cell under the feet when that is
    /// clear, otherwise `pos` nudged upward a bounded number of times.
    fn settle<W: VoxelQuery + ?Sized>(&self, world: &W, pos: Vec3, blocked_y: f32) -> f32 {
        let top = blocked_y.floor() + 1.0;
        if top <= pos.y && !self.collides_at(world, Vec3::new(pos.x, top, pos.z)) {
            return top;
        }
        let mut y = pos.y;
        let ceiling = pos.y + 1.0;
        let mut nudges = 0;
        while nudges < MAX_GROUND_SNAP_STEPS
            && y < ceiling
            && self.collides_at(world, Vec3::new(pos.x, y, pos.z))
        {
            y += GROUND_SNAP_STEP;
            nudges += 1;
        }
        if self.collides_at(world, Vec3::new(pos.x, y, pos.z)) {
            trace!(x = pos.x, y, z = pos.z, nudges, "ground snap gave up while embedded");
        }
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use voxelcraft_core::{BlockKind, BlockPos};

    /// Solid cells in a set, plus an optional infinite floor.
    #[derive(Default)]
    struct Terrain {
        solid: HashSet<BlockPos>,
        floor_y: Option<i32>,
    }

    impl Terrain {
        fn floor(y: i32) -> Self {
            Self {
                solid: HashSet::new(),
                floor_y: Some(y),
            }
        }

        fn with(mut self, x: i32, y: i32, z: i32) -> Self {
            self.solid.insert(BlockPos::new(x, y, z));
            self
        }
    }

    impl VoxelQuery for Terrain {
        fn block_at(&self, pos: BlockPos) -> BlockKind {
            if self.is_solid_at(pos) {
                BlockKind::Stone
            } else {
                BlockKind::Air
            }
        }

        fn is_solid_at(&self, pos: BlockPos) -> bool {
            self.solid.contains(&pos) || self.floor_y.is_some_and(|y| pos.y <= y)
        }
    }

    const DT: f32 = 1.0 / 60.0;

    fn idle() -> MovementInput {
        MovementInput::default()
    }

    fn run(
        controller: &PlayerController,
        player: &mut Player,
        world: &Terrain,
        input: MovementInput,
        frames: usize,
    ) {
        for _ in 0..frames {
            controller.step(player, world, &input, DT);
        }
    }

    #[test]
    fn falls_and_lands_on_floor() {
        let world = Terrain::floor(9);
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 15.0, 0.5));

        run(&controller, &mut player, &world, idle(), 120);

        assert_eq!(player.position.y, 10.0);
        assert_eq!(player.velocity.y, 0.0);
        assert!(player.on_ground);
    }

    #[test]
    fn standing_player_stays_put() {
        let world = Terrain::floor(9);
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 10.0, 0.5));

        run(&controller, &mut player, &world, idle(), 30);

        assert_eq!(player.position, Vec3::new(0.5, 10.0, 0.5));
        assert!(player.on_ground);
    }

    #[test]
    fn jump_leaves_ground_and_returns() {
        let world = Terrain::floor(9);
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 10.0, 0.5));

        controller.step(&mut player, &world, &MovementInput::new(Intents::JUMP, 0.0), DT);
        assert!(player.position.y > 10.0);
        assert!(player.velocity.y > 0.0);

        let mut peak = player.position.y;
        for _ in 0..90 {
            controller.step(&mut player, &world, &idle(), DT);
            peak = peak.max(player.position.y);
        }
        // v²/2g = 49/40
        assert!(peak > 11.0 && peak < 11.3, "peak {peak}");
        assert_eq!(player.position.y, 10.0);
    }

    #[test]
    fn cannot_jump_midair() {
        let world = Terrain::default();
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 50.0, 0.5));
        controller.step(&mut player, &world, &MovementInput::new(Intents::JUMP, 0.0), DT);
        assert!(player.velocity.y < 0.0);
    }

    #[test]
    fn walk_speed_on_flat_ground() {
        let world = Terrain::floor(9);
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 10.0, 0.5));

        run(&controller, &mut player, &world, MovementInput::new(Intents::FORWARD, 0.0), 60);

        assert!((player.position.z - (0.5 - 4.3)).abs() < 1e-3, "{}", player.position.z);
        assert!((player.position.x - 0.5).abs() < 1e-5);
        assert!(!player.is_sprinting);
    }

    #[test]
    fn sprint_requires_forward() {
        let world = Terrain::floor(9);
        let controller = PlayerController::default();

        let mut forward = Player::new(Vec3::new(0.5, 10.0, 0.5));
        controller.step(
            &mut forward,
            &world,
            &MovementInput::new(Intents::FORWARD | Intents::SPRINT, 0.0),
            DT,
        );
        assert!(forward.is_sprinting);

        let mut strafe = Player::new(Vec3::new(0.5, 10.0, 0.5));
        controller.step(
            &mut strafe,
            &world,
            &MovementInput::new(Intents::LEFT | Intents::SPRINT, 0.0),
            DT,
        );
        assert!(!strafe.is_sprinting);
        assert!((strafe.position.x - (0.5 - 4.3 * DT)).abs() < 1e-5);
    }

    #[test]
    fn sneak_slows_movement() {
        let world = Terrain::floor(9);
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 10.0, 0.5));
        controller.step(
            &mut player,
            &world,
            &MovementInput::new(Intents::RIGHT | Intents::SNEAK, 0.0),
            DT,
        );
        assert!(player.is_sneaking);
        assert!((player.position.x - (0.5 + 4.3 * 0.3 * DT)).abs() < 1e-5);
    }

    #[test]
    fn diagonal_is_normalized() {
        let input = MovementInput::new(Intents::FORWARD | Intents::RIGHT, 0.0);
        assert!((input.wish_direction().length() - 1.0).abs() < 1e-5);
        let cancelled = MovementInput::new(Intents::FORWARD | Intents::BACK, 0.0);
        assert_eq!(cancelled.wish_direction(), Vec3::ZERO);
    }

    #[test]
    fn wall_blocks_horizontal_movement() {
        // Two-high wall at x = 3.
        let world = Terrain::floor(9).with(3, 10, 0).with(3, 11, 0);
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 10.0, 0.5));
        // Yaw -90° faces +X.
        let input = MovementInput::new(Intents::FORWARD, -std::f32::consts::FRAC_PI_2);

        run(&controller, &mut player, &world, input, 120);

        assert!(player.position.x + 0.3 <= 3.0, "x {}", player.position.x);
        assert!(player.position.x > 2.0);
        assert_eq!(player.position.y, 10.0);
    }

    #[test]
    fn blocked_axis_does_not_stop_the_other() {
        let world = Terrain::floor(9).with(1, 10, 0).with(1, 11, 0);
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.65, 10.0, 0.5));
        let input = MovementInput::new(
            Intents::RIGHT | Intents::BACK,
            0.0,
        );
        run(&controller, &mut player, &world, input, 10);
        assert!(player.position.x < 0.7);
        assert!(player.position.z > 0.5);
    }

    #[test]
    fn ceiling_stops_jump() {
        let world = Terrain::floor(9).with(0, 12, 0);
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 10.0, 0.5));

        controller.step(&mut player, &world, &MovementInput::new(Intents::JUMP, 0.0), DT);
        for _ in 0..30 {
            controller.step(&mut player, &world, &idle(), DT);
            assert!(player.position.y + 1.8 <= 12.0 + 1e-4);
        }
    }

    #[test]
    fn fast_fall_does_not_tunnel_thin_floor() {
        let world = Terrain::default().with(0, 20, 0);
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 80.0, 0.5));
        player.velocity.y = -50.0;

        for _ in 0..200 {
            controller.step(&mut player, &world, &idle(), 0.1);
        }
        assert_eq!(player.position.y, 21.0);
    }

    #[test]
    fn terminal_velocity_caps_fall() {
        let world = Terrain::default();
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 120.0, 0.5));
        for _ in 0..60 {
            controller.step(&mut player, &world, &idle(), 0.1);
            assert!(player.velocity.y >= -50.0);
        }
        assert_eq!(player.velocity.y, -50.0);
    }

    #[test]
    fn never_below_min_y() {
        let world = Terrain::default();
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 3.0, 0.5));
        run(&controller, &mut player, &world, idle(), 300);
        assert_eq!(player.position.y, 1.0);
    }

    #[test]
    fn dt_is_capped() {
        let world = Terrain::floor(9);
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 10.0, 0.5));
        controller.step(&mut player, &world, &MovementInput::new(Intents::BACK, 0.0), 5.0);
        assert!((player.position.z - (0.5 + 4.3 * MAX_FRAME_DT)).abs() < 1e-4);
    }

    #[test]
    fn non_finite_dt_is_a_still_frame() {
        let world = Terrain::floor(9);
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 12.0, 0.5));
        run(&controller, &mut player, &world, idle(), 3);
        let before = player;

        let walk = MovementInput::new(Intents::FORWARD, 0.0);
        for dt in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            controller.step(&mut player, &world, &walk, dt);
            assert_eq!(player.position, before.position);
            assert_eq!(player.velocity, before.velocity);
        }

        run(&controller, &mut player, &world, idle(), 120);
        assert!(player.position.is_finite());
        assert_eq!(player.position.y, 10.0);
    }

    #[test]
    fn unusable_tuning_falls_back_to_defaults() {
        let defaults = PlayerTuning::default();
        let tuning = PlayerTuning {
            width: -0.6,
            height: -1.0,
            gravity: f32::NAN,
            terminal_velocity: 0.0,
            walk_speed: f32::INFINITY,
            ..PlayerTuning::default()
        }
        .sanitized();
        assert_eq!(tuning.width, defaults.width);
        assert_eq!(tuning.height, defaults.height);
        assert_eq!(tuning.gravity, defaults.gravity);
        assert_eq!(tuning.terminal_velocity, defaults.terminal_velocity);
        assert_eq!(tuning.walk_speed, defaults.walk_speed);
        assert_eq!(PlayerTuning::default().sanitized(), defaults);

        let short = PlayerTuning {
            height: 1.0,
            eye_height: 1.62,
            ..PlayerTuning::default()
        }
        .sanitized();
        assert!(short.eye_height > 0.0 && short.eye_height <= 1.0);
    }

    #[test]
    fn controller_with_negative_width_still_lands() {
        let world = Terrain::floor(9);
        let controller = PlayerController::new(PlayerTuning {
            width: -0.6,
            ..PlayerTuning::default()
        });
        let mut player = Player::new(Vec3::new(0.5, 12.0, 0.5));
        run(&controller, &mut player, &world, idle(), 120);
        assert_eq!(player.position.y, 10.0);
        assert!(player.on_ground);
    }

    #[test]
    fn flying_ignores_gravity() {
        let world = Terrain::default();
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 50.0, 0.5));
        controller.toggle_fly(&mut player);
        assert!(player.is_flying);

        run(&controller, &mut player, &world, idle(), 60);
        assert_eq!(player.position.y, 50.0);

        run(&controller, &mut player, &world, MovementInput::new(Intents::JUMP, 0.0), 60);
        assert!((player.position.y - 60.0).abs() < 1e-3);

        run(&controller, &mut player, &world, MovementInput::new(Intents::SNEAK, 0.0), 60);
        assert!((player.position.y - 57.0).abs() < 1e-3);
        assert_eq!(player.velocity, Vec3::ZERO);
    }

    #[test]
    fn flying_still_collides() {
        let world = Terrain::floor(9);
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::new(0.5, 10.5, 0.5));
        controller.toggle_fly(&mut player);
        run(&controller, &mut player, &world, MovementInput::new(Intents::SNEAK, 0.0), 120);
        assert_eq!(player.position.y, 10.0);
    }

    #[test]
    fn toggle_fly_clears_velocity() {
        let controller = PlayerController::default();
        let mut player = Player::new(Vec3::ZERO);
        player.velocity = Vec3::new(0.0, -12.0, 0.0);
        controller.toggle_fly(&mut player);
        assert_eq!(player.velocity, Vec3::ZERO);
        controller.toggle_fly(&mut player);
        assert!(!player.is_flying);
    }

    #[test]
    fn embedded_body_is_nudged_up_boundedly() {
        let controller = PlayerController::default();
        let world = Terrain::floor(9).with(0, 10, 0);
        // Feet inside a solid cell: settle nudges at most one block.
        let y = controller.settle(&world, Vec3::new(0.5, 10.2, 0.5), 10.1);
        assert!(y <= 11.2 + 1e-4);
        assert!(y > 10.2);
    }
}
