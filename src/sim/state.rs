//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]. There is no
//! ambient state: spawning and collision code receives the state (and its
//! random stream) explicitly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::LcgRng;
use super::spawn;
use crate::consts::*;
use crate::settings::Settings;
use crate::{circles_overlap, distance, safe_normalize};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Out of lives. Only a restart gets out of here.
    GameOver,
}

/// A throwable rock lying on the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rock {
    pub pos: Vec2,
    pub radius: f32,
    /// Set on pickup; the rock is compacted out during cleanup
    pub picked_up: bool,
}

impl Rock {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            picked_up: false,
        }
    }
}

/// A rock in flight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radius of the rock it was thrown from
    pub radius: f32,
    pub alive: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            alive: true,
        }
    }

    /// Damage dealt on impact: bigger rocks hurt more
    pub fn damage(&self) -> u32 {
        projectile_damage(self.radius)
    }

    /// Integrate position and kill the projectile once it leaves `world` by more than the cull margin
    pub fn advance(&mut self, dt: f32, world: Vec2) {
        self.pos += self.vel * dt;
        let m = PROJECTILE_CULL_MARGIN;
        if self.pos.x < -m || self.pos.x > world.x + m || self.pos.y < -m || self.pos.y > world.y + m {
            self.alive = false;
        }
    }
}

/// Damage dealt by a projectile of the given radius
pub fn projectile_damage(radius: f32) -> u32 {
    (radius * PROJECTILE_DAMAGE_FACTOR).round().max(0.0) as u32
}

/// Launch speed for a rock of the given radius (heavier rocks fly slower)
pub fn throw_speed(radius: f32) -> f32 {
    let mass = radius * radius;
    THROW_BASE_SPEED / (mass * THROW_MASS_FACTOR).max(1.0).sqrt()
}

/// A hostile walker chasing the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub alive: bool,
    pub is_boss: bool,
}

impl Enemy {
    /// Regular enemy: bigger means tougher and slower
    pub fn regular(pos: Vec2, radius: f32, speed_multiplier: f32) -> Self {
        let max_hp = (radius * ENEMY_HP_PER_RADIUS).round() as u32;
        let t = ((radius - ENEMY_MIN_RADIUS) / (ENEMY_MAX_RADIUS - ENEMY_MIN_RADIUS)).clamp(0.0, 1.0);
        let speed = (ENEMY_FAST_SPEED + (ENEMY_SLOW_SPEED - ENEMY_FAST_SPEED) * t) * speed_multiplier;
        Self {
            pos,
            radius,
            speed,
            hp: max_hp,
            max_hp,
            alive: true,
            is_boss: false,
        }
    }

    /// The level 5 boss
    pub fn boss(pos: Vec2, speed_multiplier: f32) -> Self {
        Self {
            pos,
            radius: BOSS_RADIUS,
            speed: BOSS_SPEED * speed_multiplier,
            hp: BOSS_HP,
            max_hp: BOSS_HP,
            alive: true,
            is_boss: true,
        }
    }

    /// Contact damage before the cycle multiplier
    pub fn contact_damage(&self) -> u32 {
        if self.is_boss {
            BOSS_CONTACT_DAMAGE
        } else if self.radius >= BIG_ENEMY_RADIUS {
            BIG_CONTACT_DAMAGE
        } else {
            SMALL_CONTACT_DAMAGE
        }
    }

    /// Points awarded for the kill
    pub fn score_value(&self) -> u32 {
        if self.is_boss { BOSS_SCORE } else { ENEMY_SCORE }
    }

    /// Apply damage, returns true if this hit killed the enemy
    pub fn take_damage(&mut self, damage: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = self.hp.saturating_sub(damage);
        if self.hp == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Step straight toward `target` (no pathfinding, no separation)
    pub fn chase(&mut self, target: Vec2, dt: f32) {
        let dir = safe_normalize(target - self.pos);
        self.pos += dir * self.speed * dt;
    }

    pub fn overlaps(&self, pos: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.radius, pos, radius)
    }
}

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    /// Movement target (valid while `has_target`)
    pub target: Vec2,
    pub has_target: bool,
    /// Collected rock radii, in pickup order
    pub inventory: Vec<f32>,
    pub capacity: usize,
    pub max_hp: u32,
    pub hp: u32,
    pub lives: u32,
    /// Seconds of hit immunity left (also drives the flicker)
    pub invulnerability: f32,
    /// Simulation time of the last hit taken
    pub last_hit_at: f64,
}

/// Last-hit timestamp that leaves a fresh player hittable right away
const NEVER_HIT: f64 = -10.0;

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            target: pos,
            has_target: false,
            inventory: Vec::with_capacity(INVENTORY_CAPACITY),
            capacity: INVENTORY_CAPACITY,
            max_hp: PLAYER_MAX_HP,
            hp: PLAYER_MAX_HP,
            lives: PLAYER_LIVES,
            invulnerability: 0.0,
            last_hit_at: NEVER_HIT,
        }
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
        self.has_target = true;
    }

    /// Move toward the target without overshooting; drop the target once within arrival range
    pub fn move_toward_target(&mut self, dt: f32) {
        if !self.has_target {
            return;
        }
        let to_target = self.target - self.pos;
        let d = to_target.length();
        if d < ARRIVE_DISTANCE {
            self.has_target = false;
            return;
        }
        let step = self.speed * dt;
        if step >= d {
            self.pos = self.target;
        } else {
            self.pos += safe_normalize(to_target) * step;
        }
    }

    pub fn inventory_full(&self) -> bool {
        self.inventory.len() >= self.capacity
    }

    /// Whether the rock is within arm's reach
    pub fn can_reach(&self, rock: &Rock) -> bool {
        distance(self.pos, rock.pos) <= self.radius + rock.radius + PICKUP_REACH_SLACK
    }

    /// Store a rock, returns false if the inventory is full
    pub fn stash(&mut self, radius: f32) -> bool {
        if self.inventory_full() {
            return false;
        }
        self.inventory.push(radius);
        true
    }

    /// Remove and return the largest rock (first one on ties)
    pub fn take_largest_rock(&mut self) -> Option<f32> {
        let mut best: Option<usize> = None;
        for (i, &r) in self.inventory.iter().enumerate() {
            match best {
                Some(b) if r <= self.inventory[b] => {}
                _ => best = Some(i),
            }
        }
        best.map(|i| self.inventory.remove(i))
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    /// Hit immunity: post-hit grace and respawn invulnerability
    pub fn can_be_hit(&self, now: f64) -> bool {
        self.invulnerability <= 0.0 && now - self.last_hit_at > HIT_GRACE
    }

    /// Apply contact damage at time `now`, returns true if it was lethal
    pub fn take_hit(&mut self, damage: u32, now: f64) -> bool {
        self.hp = self.hp.saturating_sub(damage);
        self.last_hit_at = now;
        self.invulnerability = HIT_FLICKER;
        self.hp == 0
    }

    /// Put the player back on the field after losing a life
    pub fn respawn(&mut self, at: Vec2) {
        self.hp = self.max_hp;
        self.pos = at;
        self.target = at;
        self.has_target = false;
        self.invulnerability = RESPAWN_INVULNERABILITY;
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability > 0.0
    }
}

/// Notable things that happened during a tick (for audio/renderer hooks)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RockPickedUp { radius: f32 },
    RockThrown { radius: f32 },
    EnemyHit { damage: u32, boss: bool },
    EnemyDefeated { pos: Vec2, boss: bool },
    RockDropped { pos: Vec2 },
    RocksCrushed { count: usize },
    PlayerHit { damage: u32 },
    LifeLost { lives_left: u32 },
    GameOver { score: u32 },
    LevelStarted { level: u32, cycle: u32 },
    CycleCompleted { cycle: u32 },
    Restarted,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub settings: Settings,
    /// Shared random stream for every spawn decision
    pub rng: LcgRng,
    pub phase: GamePhase,
    pub score: u32,
    /// Current level (1..=5)
    pub level: u32,
    /// Completed level-5 clears; drives difficulty
    pub cycle: u32,
    /// Enemies still to be introduced this level
    pub enemies_to_spawn: u32,
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub rock_spawn_timer: f32,
    /// Seconds the level banner has left on screen
    pub banner_timer: f32,
    /// Simulation clock (seconds)
    pub time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub rocks: Vec<Rock>,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    /// Events raised by the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl GameState {
    /// Fresh world: scatter the initial rocks and enter level 1
    pub fn new(settings: Settings) -> Self {
        let mut rng = LcgRng::new(settings.seed);
        let rocks = spawn::initial_rocks(&mut rng, &settings);
        let player = Player::new(settings.world_center());
        let mut state = Self {
            settings,
            rng,
            phase: GamePhase::Playing,
            score: 0,
            level: 1,
            cycle: 0,
            enemies_to_spawn: 0,
            spawn_timer: 0.0,
            spawn_interval: INITIAL_SPAWN_INTERVAL,
            rock_spawn_timer: 0.0,
            banner_timer: LEVEL_BANNER_DURATION,
            time: 0.0,
            time_ticks: 0,
            player,
            rocks,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            events: Vec::new(),
        };
        state.start_level(1);
        state
    }

    /// Enemy contact damage multiplier: 2^cycle
    pub fn damage_multiplier(&self) -> u32 {
        2u32.saturating_pow(self.cycle)
    }

    /// Enemy speed multiplier: 1.25^cycle
    pub fn speed_multiplier(&self) -> f32 {
        CYCLE_SPEED_SCALE.powi(i32::try_from(self.cycle).unwrap_or(i32::MAX))
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_boss_level(&self) -> bool {
        self.level == BOSS_LEVEL
    }

    /// Enter level `n`: set the spawn budget and show the banner
    pub fn start_level(&mut self, n: u32) {
        self.level = n;
        self.spawn_timer = 0.0;
        self.banner_timer = LEVEL_BANNER_DURATION;
        self.enemies_to_spawn = spawn::enemies_for_level(n);
        log::info!(
            "Level {} (cycle {}): {} enemies, damage x{}",
            n,
            self.cycle,
            self.enemies_to_spawn,
            self.damage_multiplier()
        );
        self.events.push(GameEvent::LevelStarted {
            level: n,
            cycle: self.cycle,
        });
    }

    /// Clear the run back to its starting values.
    ///
    /// Rocks on the field and the random stream are kept. Call
    /// [`GameState::start_level`] afterwards to re-enter level 1.
    pub fn reset(&mut self) {
        self.projectiles.clear();
        self.enemies.clear();
        self.events.clear();
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.player = Player::new(self.settings.world_center());
        self.cycle = 0;
        self.level = 1;
        self.enemies_to_spawn = 0;
        self.spawn_timer = 0.0;
        self.spawn_interval = INITIAL_SPAWN_INTERVAL;
        self.rock_spawn_timer = 0.0;
        self.banner_timer = LEVEL_BANNER_DURATION;
        self.time = 0.0;
        self.time_ticks = 0;
        log::info!("Game reset");
    }

    /// Reset and re-enter level 1
    pub fn restart(&mut self) {
        self.reset();
        self.start_level(1);
        self.events.push(GameEvent::Restarted);
    }

    /// Rocks still lying on the field
    pub fn field_rocks(&self) -> impl Iterator<Item = &Rock> {
        self.rocks.iter().filter(|r| !r.picked_up)
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.alive && e.is_boss)
    }
}
