//! Tirapiedras - a top-down rock throwing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, game state)
//! - `input`: Raw pointer/key events to domain actions
//! - `snapshot`: Read-only world view for renderers and HUDs
//! - `settings`: World bounds and run configuration

pub mod input;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use input::{Action, InputEvent, InputMapper, Key, PointerButton};
pub use settings::{Settings, SettingsError};
pub use snapshot::RenderSnapshot;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Rock radius tiers and their spawn weights
    pub const ROCK_SIZES: [f32; 3] = [6.0, 10.0, 16.0];
    pub const ROCK_WEIGHTS: [u32; 3] = [5, 3, 2];
    /// Rocks keep this distance from the world border when spawned
    pub const ROCK_SPAWN_MARGIN: f32 = 40.0;
    /// Seconds between ambient rock spawns
    pub const ROCK_SPAWN_INTERVAL: f32 = 2.0;
    /// Chance that a defeated (non-boss) enemy drops a large rock
    pub const ROCK_DROP_CHANCE: f32 = 0.5;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_SPEED: f32 = 160.0;
    pub const PLAYER_MAX_HP: u32 = 100;
    pub const PLAYER_LIVES: u32 = 3;
    pub const INVENTORY_CAPACITY: usize = 3;
    /// Target is considered reached inside this distance
    pub const ARRIVE_DISTANCE: f32 = 2.0;

    /// Pickup tolerances: click slack around the rock, reach slack around the player
    pub const PICKUP_CLICK_SLACK: f32 = 6.0;
    pub const PICKUP_REACH_SLACK: f32 = 4.0;

    /// Throw speed for a rock of radius r is THROW_BASE_SPEED / sqrt(max(1, r² * THROW_MASS_FACTOR))
    pub const THROW_BASE_SPEED: f32 = 420.0;
    pub const THROW_MASS_FACTOR: f32 = 0.02;
    /// Gap between the player body and a freshly thrown projectile
    pub const THROW_SPAWN_GAP: f32 = 2.0;
    /// Projectile damage is round(radius * PROJECTILE_DAMAGE_FACTOR)
    pub const PROJECTILE_DAMAGE_FACTOR: f32 = 3.0;
    /// Projectiles die this far outside the world
    pub const PROJECTILE_CULL_MARGIN: f32 = 50.0;

    /// Regular enemies
    pub const ENEMY_MIN_RADIUS: f32 = 12.0;
    pub const ENEMY_MAX_RADIUS: f32 = 20.0;
    /// Speed at the smallest radius / at the largest radius
    pub const ENEMY_FAST_SPEED: f32 = 85.0;
    pub const ENEMY_SLOW_SPEED: f32 = 45.0;
    pub const ENEMY_HP_PER_RADIUS: f32 = 4.0;
    pub const ENEMY_SPAWN_X_MARGIN: f32 = 30.0;
    pub const ENEMY_SPAWN_Y_OFFSET: f32 = 14.0;
    /// Enemies at or above this radius hit harder
    pub const BIG_ENEMY_RADIUS: f32 = 18.0;
    /// Enemies this far below the world are dropped
    pub const ENEMY_CULL_MARGIN: f32 = 120.0;

    /// Boss (level 5)
    pub const BOSS_LEVEL: u32 = 5;
    pub const BOSS_RADIUS: f32 = 80.0;
    pub const BOSS_HP: u32 = 400;
    pub const BOSS_SPEED: f32 = 30.0;
    pub const BOSS_SPAWN_X_MARGIN: f32 = 80.0;
    pub const BOSS_SPAWN_Y_OFFSET: f32 = 20.0;

    /// Contact damage before the cycle multiplier
    pub const BOSS_CONTACT_DAMAGE: u32 = 40;
    pub const BIG_CONTACT_DAMAGE: u32 = 20;
    pub const SMALL_CONTACT_DAMAGE: u32 = 10;

    /// Score per kill
    pub const BOSS_SCORE: u32 = 5;
    pub const ENEMY_SCORE: u32 = 1;
    /// Heal granted per kill
    pub const KILL_HEAL: u32 = 5;

    /// Hit response
    pub const HIT_GRACE: f64 = 0.7;
    pub const HIT_FLICKER: f32 = 0.6;
    pub const KNOCKBACK: f32 = 12.0;
    pub const RESPAWN_INVULNERABILITY: f32 = 1.2;
    /// Enemies closer than this to the respawn point get shoved away
    pub const RESPAWN_CLEAR_RADIUS: f32 = 80.0;
    pub const RESPAWN_SHOVE: f32 = 120.0;

    /// Enemy spawn pacing
    pub const INITIAL_SPAWN_INTERVAL: f32 = 2.8;
    pub const SPAWN_INTERVAL_BASE: f32 = 2.4;
    pub const SPAWN_INTERVAL_JITTER_MIN: f32 = -0.4;
    pub const SPAWN_INTERVAL_JITTER_MAX: f32 = 1.2;

    /// Cycle scaling
    pub const CYCLE_SPEED_SCALE: f32 = 1.25;

    /// Seconds the "Level N" banner stays up
    pub const LEVEL_BANNER_DURATION: f32 = 2.0;
}

/// Vectors shorter than this normalize to zero
pub const NORMALIZE_EPSILON: f32 = 1e-6;

/// Unit vector in the direction of `v`, or zero when `v` is (nearly) zero
#[inline]
pub fn safe_normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > NORMALIZE_EPSILON && len.is_finite() {
        v / len
    } else {
        Vec2::ZERO
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// True when two circles touch or overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    distance(a, b) <= ra + rb
}
