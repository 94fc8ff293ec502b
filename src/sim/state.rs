//! Game state and core breakout entities
//!
//! Entities are plain data; the systems in `tick` and `collision` mutate
//! them through `GameState`, which the game loop owns exclusively.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::reflect_direction;
use super::layout::generate_bricks;
use crate::config::GameConfig;
use crate::consts::*;
use crate::{heading_to_vector, normalize_degrees};

/// Stable identifier handed to the scene collaborator
pub type EntityId = u32;

/// Coarse phase derived from the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball attached to the platform, waiting for launch
    Serve,
    /// Ball in flight
    Playing,
    /// Frozen by the player
    Paused,
    /// All bricks destroyed
    Won,
    /// Ball passed the platform
    Lost,
}

/// Things that happened during the last tick (cleared every tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallLaunched { direction: f32 },
    PlatformHit { direction: f32 },
    BallAttached,
    WallHit { side: WallSide, reflected: bool },
    BrickDestroyed { id: EntityId, kind: BrickKind, points: u32 },
    SpecialSpawned { id: EntityId, source_brick: EntityId },
    SpecialCaught { id: EntityId, charges: u32 },
    SpecialMissed { id: EntityId },
    PauseToggled { paused: bool },
    Victory,
    Defeat,
}

/// The three immovable walls around the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    Right,
    Left,
    Top,
}

impl WallSide {
    pub fn index(self) -> usize {
        match self {
            WallSide::Right => 0,
            WallSide::Left => 1,
            WallSide::Top => 2,
        }
    }

    /// Side walls mirror the heading horizontally
    pub fn is_side(self) -> bool {
        !matches!(self, WallSide::Top)
    }
}

#[derive(Debug, Clone)]
pub struct Wall {
    pub side: WallSide,
    pub collider: Aabb,
}

/// Floor plus walls; static for the whole game. Walls are stored in
/// collision priority order.
#[derive(Debug, Clone)]
pub struct GameField {
    pub width: f32,
    pub depth: f32,
    pub walls: [Wall; 3],
}

impl GameField {
    pub fn new(config: &GameConfig) -> Self {
        let w = config.field_width;
        let d = config.field_depth;
        let t = config.wall_thickness;
        let h = config.wall_height;
        let wall = |side: WallSide, center: Vec3, size: Vec3| Wall {
            side,
            collider: Aabb::from_center_half_extents(center, size / 2.0),
        };

        Self {
            width: w,
            depth: d,
            walls: [
                wall(
                    WallSide::Right,
                    Vec3::new(w / 2.0 + t / 2.0, h / 2.0, 0.0),
                    Vec3::new(t, h, d),
                ),
                wall(
                    WallSide::Left,
                    Vec3::new(-w / 2.0 - t / 2.0, h / 2.0, 0.0),
                    Vec3::new(t, h, d),
                ),
                wall(
                    WallSide::Top,
                    Vec3::new(0.0, h / 2.0, -d / 2.0 - t / 2.0),
                    Vec3::new(w + 2.0 * t, h, t),
                ),
            ],
        }
    }

    pub fn wall(&self, side: WallSide) -> &Wall {
        &self.walls[side.index()]
    }
}

/// The player's paddle; only x changes during play
#[derive(Debug, Clone)]
pub struct Platform {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Platform {
    pub fn new(id: EntityId, config: &GameConfig) -> Self {
        Self {
            id,
            x: 0.0,
            y: config.platform_y(),
            z: config.platform_z(),
            width: config.platform_width,
            height: config.platform_height,
            depth: config.platform_depth,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn size(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }

    pub fn collider(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position(), self.size() / 2.0)
    }

    /// Edge of the platform furthest from the bricks
    pub fn far_edge_z(&self) -> f32 {
        self.z + self.depth / 2.0
    }

    /// Largest |x| the centre may reach on a field of the given width
    pub fn limit(&self, field_width: f32) -> f32 {
        (field_width / 2.0 - self.width / 2.0).max(0.0)
    }

    pub fn move_right(&mut self, field_width: f32, displacement: f32) {
        let limit = self.limit(field_width);
        self.x = (self.x + displacement).clamp(-limit, limit);
    }

    pub fn move_left(&mut self, field_width: f32, displacement: f32) {
        let limit = self.limit(field_width);
        self.x = (self.x - displacement).clamp(-limit, limit);
    }
}

/// The ball; heading is kept in degrees within [0, 360)
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: EntityId,
    pub position: Vec3,
    pub radius: f32,
    direction: f32,
    pub speed: f32,
}

impl Ball {
    pub fn new(id: EntityId, position: Vec3, radius: f32, direction: f32, speed: f32) -> Self {
        Self {
            id,
            position,
            radius,
            direction: normalize_degrees(direction),
            speed,
        }
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn set_direction(&mut self, degrees: f32) {
        self.direction = normalize_degrees(degrees);
    }

    /// Mirror the heading off a top (or side) face
    pub fn reflect(&mut self, side_wall: bool) {
        self.direction = reflect_direction(self.direction, side_wall);
    }

    pub fn velocity(&self) -> Vec3 {
        heading_to_vector(self.direction) * self.speed
    }

    /// Move one tick along the current heading
    pub fn advance(&mut self) {
        self.position += self.velocity();
    }

    /// Keep x in line with the platform while attached
    pub fn follow_platform(&mut self, platform_x: f32) {
        self.position.x = platform_x;
    }

    pub fn collider(&self) -> Aabb {
        Aabb::from_sphere(self.position, self.radius)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickKind {
    /// Breaks on contact
    Normal,
    /// Breaks on contact and drops a power-up
    Special,
}

impl BrickKind {
    pub fn points(self, config: &GameConfig) -> u32 {
        match self {
            BrickKind::Normal => config.normal_points,
            BrickKind::Special => config.special_points,
        }
    }
}

/// A destructible brick. Its collider is fixed at creation.
#[derive(Debug, Clone)]
pub struct Brick {
    pub id: EntityId,
    pub kind: BrickKind,
    pub points: u32,
    pub position: Vec3,
    pub size: Vec3,
    pub alive: bool,
    collider: Aabb,
}

impl Brick {
    pub fn new(
        id: EntityId,
        kind: BrickKind,
        points: u32,
        position: Vec3,
        size: Vec3,
        collider_margin: f32,
    ) -> Self {
        Self {
            id,
            kind,
            points,
            position,
            size,
            alive: true,
            collider: Aabb::from_center_half_extents(position, size / 2.0).expanded(collider_margin),
        }
    }

    pub fn collider(&self) -> &Aabb {
        &self.collider
    }
}

/// Power-up dropped by a special brick, falling toward the player
#[derive(Debug, Clone)]
pub struct SpecialObject {
    pub id: EntityId,
    pub source_brick: EntityId,
    pub position: Vec3,
    pub half_extents: Vec3,
    pub speed: f32,
}

impl SpecialObject {
    pub fn new(id: EntityId, source_brick: EntityId, position: Vec3, speed: f32) -> Self {
        Self {
            id,
            source_brick,
            position,
            half_extents: Vec3::new(SPECIAL_HALF_SIZE, SPECIAL_HALF_HEIGHT, SPECIAL_HALF_SIZE),
            speed,
        }
    }

    pub fn fall(&mut self) {
        self.position.z += self.speed;
    }

    pub fn collider(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }
}

/// Deadline for timed tiers. Computed at game start, only ever queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub deadline_tick: u64,
}

impl Countdown {
    pub fn from_secs(start_tick: u64, secs: u32) -> Self {
        Self {
            deadline_tick: start_tick + secs as u64 * TICKS_PER_SECOND as u64,
        }
    }

    pub fn remaining_ticks(&self, now: u64) -> u64 {
        self.deadline_tick.saturating_sub(now)
    }

    pub fn remaining_secs(&self, now: u64) -> f32 {
        self.remaining_ticks(now) as f32 / TICKS_PER_SECOND as f32
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.deadline_tick
    }
}

/// Complete breakout state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub seed: u64,
    pub field: GameField,
    pub platform: Platform,
    pub ball: Ball,
    /// Dense, never compacted; removal flips `alive`
    pub bricks: Vec<Brick>,
    /// Compacted on removal
    pub specials: Vec<SpecialObject>,
    pub points: u32,
    pub alive: bool,
    pub victory: bool,
    /// Ball attached to the platform (before launch or after a power-up catch)
    pub ball_paused: bool,
    /// Whole game frozen by the player
    pub paused: bool,
    /// Remaining ball-pause charges from caught power-ups
    pub charges: u32,
    /// Consecutive ticks the ball has been touching each wall
    pub wall_hits: [u32; 3],
    pub time_ticks: u64,
    pub countdown: Option<Countdown>,
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: EntityId,
}

impl GameState {
    /// Create a new game: platform centred, ball attached, bricks laid out
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let launch_angle = rng.random_range(LAUNCH_ANGLE_MIN..LAUNCH_ANGLE_MAX);

        let platform = Platform::new(1, &config);
        let ball = Ball::new(
            2,
            Vec3::new(platform.x, config.ball_y(), config.ball_attach_z()),
            config.ball_radius,
            launch_angle,
            config.effective_ball_speed(),
        );
        let countdown = config
            .difficulty
            .time_limit_secs()
            .map(|secs| Countdown::from_secs(0, secs));

        let mut state = Self {
            field: GameField::new(&config),
            config,
            seed,
            platform,
            ball,
            bricks: Vec::new(),
            specials: Vec::new(),
            points: 0,
            alive: true,
            victory: false,
            ball_paused: true,
            paused: false,
            charges: 0,
            wall_hits: [0; 3],
            time_ticks: 0,
            countdown,
            events: Vec::new(),
            rng,
            next_id: 3,
        };

        generate_bricks(&mut state);
        log::info!(
            "New {} game (level {}, seed {}): {} bricks",
            state.config.difficulty.as_str(),
            state.config.difficulty.level(),
            seed,
            state.bricks.len()
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn alive_bricks(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter().filter(|b| b.alive)
    }

    pub fn remaining_bricks(&self) -> usize {
        self.alive_bricks().count()
    }

    /// Once set, `tick` no longer mutates the state
    pub fn is_terminal(&self) -> bool {
        !self.alive || self.victory
    }

    pub fn phase(&self) -> GamePhase {
        if self.victory {
            GamePhase::Won
        } else if !self.alive {
            GamePhase::Lost
        } else if self.paused {
            GamePhase::Paused
        } else if self.ball_paused {
            GamePhase::Serve
        } else {
            GamePhase::Playing
        }
    }

    /// Pin the ball to the platform until the next launch
    pub fn attach_ball(&mut self) {
        self.ball_paused = true;
        self.ball.follow_platform(self.platform.x);
        self.ball.position.z = self.config.ball_attach_z();
        self.events.push(GameEvent::BallAttached);
    }

    /// Release an attached ball along its current heading
    pub fn launch_ball(&mut self) {
        if self.ball_paused {
            self.ball_paused = false;
            self.events.push(GameEvent::BallLaunched {
                direction: self.ball.direction(),
            });
        }
    }

    /// Seconds left on the countdown, if this tier has one
    pub fn remaining_time_secs(&self) -> Option<f32> {
        self.countdown.map(|c| c.remaining_secs(self.time_ticks))
    }
}
