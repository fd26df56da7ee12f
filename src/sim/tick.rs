//! Per-frame simulation step
//!
//! Applies the frame's actions, then advances the world by one clamped delta.
//! Phase order matters: later phases read what earlier ones wrote this frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision;
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState, Projectile, throw_speed};
use crate::consts::*;
use crate::{distance, safe_normalize};

/// Domain actions produced by input translation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Pick up the rock under the point, or walk there if there is none
    PickupOrMove(Vec2),
    /// Throw the largest carried rock toward the point
    Throw(Vec2),
    /// Start over (only honored after game over)
    Restart,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Actions in the order they were triggered
    pub actions: Vec<Action>,
    /// Idle/demo mode - the autopilot plays
    pub idle_mode: bool,
}

impl TickInput {
    pub fn with_actions(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            ..Default::default()
        }
    }
}

/// Clamp a frame delta to `[0, max]`, treating garbage as a zero step
pub fn clamp_dt(dt: f32, max: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, max) } else { 0.0 }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    let dt = clamp_dt(dt, state.settings.max_frame_dt);

    let autopilot = if input.idle_mode {
        autopilot_actions(state)
    } else {
        Vec::new()
    };
    for &action in input.actions.iter().chain(autopilot.iter()) {
        apply_action(state, action);
    }

    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time += f64::from(dt);
    state.time_ticks += 1;
    state.banner_timer = (state.banner_timer - dt).max(0.0);

    state.player.move_toward_target(dt);
    spawn::tick_enemy_spawner(state, dt);
    move_enemies(state, dt);
    move_projectiles(state, dt);
    collision::resolve_projectile_hits(state);
    collision::resolve_player_contacts(state);
    spawn::tick_rock_spawner(state, dt);
    cleanup(state, dt);
    progress_level(state);
}

/// Apply one action. Pickup and throw are ignored after game over; restart only works then.
pub fn apply_action(state: &mut GameState, action: Action) {
    match action {
        Action::PickupOrMove(point) => {
            if state.is_game_over() {
                return;
            }
            if !try_pickup(state, point) {
                state.player.set_target(point);
            }
        }
        Action::Throw(target) => {
            throw_rock(state, target);
        }
        Action::Restart => {
            if state.is_game_over() {
                state.restart();
            }
        }
    }
}

/// Pick up the first field rock under `point` that the player can reach.
///
/// Returns false (and changes nothing) if the inventory is full or no rock
/// qualifies.
pub fn try_pickup(state: &mut GameState, point: Vec2) -> bool {
    if state.is_game_over() || state.player.inventory_full() {
        return false;
    }
    let player = &state.player;
    let Some(index) = state.rocks.iter().position(|r| {
        !r.picked_up && distance(point, r.pos) <= r.radius + PICKUP_CLICK_SLACK && player.can_reach(r)
    }) else {
        return false;
    };

    let rock = &mut state.rocks[index];
    if !state.player.stash(rock.radius) {
        return false;
    }
    rock.picked_up = true;
    state.events.push(GameEvent::RockPickedUp { radius: rock.radius });
    true
}

/// Throw the largest carried rock toward `target`. Returns false if nothing was thrown.
pub fn throw_rock(state: &mut GameState, target: Vec2) -> bool {
    if state.is_game_over() {
        return false;
    }
    let Some(radius) = state.player.take_largest_rock() else {
        return false;
    };

    let player = &state.player;
    let mut dir = safe_normalize(target - player.pos);
    if dir == Vec2::ZERO {
        // Aiming at our own feet: lob it straight up
        dir = Vec2::NEG_Y;
    }
    let spawn_at = player.pos + dir * (player.radius + radius + THROW_SPAWN_GAP);
    state
        .projectiles
        .push(Projectile::new(spawn_at, dir * throw_speed(radius), radius));
    state.events.push(GameEvent::RockThrown { radius });
    true
}

/// Enemies chase the player; a boss flattens any rock it walks over
fn move_enemies(state: &mut GameState, dt: f32) {
    let target = state.player.pos;
    let mut crushed = 0;
    for enemy in state.enemies.iter_mut() {
        enemy.chase(target, dt);
        if enemy.is_boss {
            crushed += collision::crush_rocks(enemy, &mut state.rocks);
        }
    }
    if crushed > 0 {
        state.events.push(GameEvent::RocksCrushed { count: crushed });
    }
}

fn move_projectiles(state: &mut GameState, dt: f32) {
    let world = state.settings.world_size();
    for projectile in state.projectiles.iter_mut() {
        projectile.advance(dt, world);
    }
}

/// Compact dead entities out of the collections and decay timers
fn cleanup(state: &mut GameState, dt: f32) {
    state.projectiles.retain(|p| p.alive);
    let floor = state.settings.world_height + ENEMY_CULL_MARGIN;
    state.enemies.retain(|e| e.alive && e.pos.y <= floor);
    state.rocks.retain(|r| !r.picked_up);
    state.player.invulnerability = (state.player.invulnerability - dt).max(0.0);
}

/// Move on once the level's budget is spent and the field is clear
fn progress_level(state: &mut GameState) {
    if state.phase != GamePhase::Playing || state.enemies_to_spawn > 0 || !state.enemies.is_empty() {
        return;
    }
    if state.level < BOSS_LEVEL {
        state.start_level(state.level + 1);
    } else {
        state.cycle += 1;
        log::info!("Cycle {} complete, difficulty x{}", state.cycle, state.damage_multiplier());
        state.events.push(GameEvent::CycleCompleted { cycle: state.cycle });
        state.start_level(1);
    }
}

/// Range at which the autopilot starts throwing
const AUTOPILOT_THROW_RANGE: f32 = 320.0;
/// Enemies closer than this make the autopilot back off
const AUTOPILOT_PANIC_RANGE: f32 = 90.0;
const AUTOPILOT_RETREAT_STEP: f32 = 80.0;

/// Idle/demo mode: decide this frame's actions from the current state
pub fn autopilot_actions(state: &GameState) -> Vec<Action> {
    if state.is_game_over() {
        return Vec::new();
    }
    let player = &state.player;
    let nearest_enemy = state
        .enemies
        .iter()
        .filter(|e| e.alive && e.pos.y > 0.0)
        .min_by(|a, b| {
            distance(a.pos, player.pos)
                .partial_cmp(&distance(b.pos, player.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    // Shoot first if something is in range and we're armed
    if let Some(enemy) = nearest_enemy {
        let d = distance(enemy.pos, player.pos);
        if !player.inventory.is_empty() && d <= AUTOPILOT_THROW_RANGE {
            return vec![Action::Throw(enemy.pos)];
        }
        if d <= AUTOPILOT_PANIC_RANGE + enemy.radius {
            let away = safe_normalize(player.pos - enemy.pos);
            let r = player.radius;
            let retreat = (player.pos + away * AUTOPILOT_RETREAT_STEP)
                .clamp(Vec2::splat(r), state.settings.world_size() - Vec2::splat(r));
            if !collision::any_enemy_overlaps(state, retreat, r) {
                return vec![Action::PickupOrMove(retreat)];
            }
        }
    }

    // Restock from the nearest rock; a failed pickup walks toward it
    if !player.inventory_full() && !player.has_target {
        let nearest_rock = state.field_rocks().min_by(|a, b| {
            distance(a.pos, player.pos)
                .partial_cmp(&distance(b.pos, player.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(rock) = nearest_rock {
            return vec![Action::PickupOrMove(rock.pos)];
        }
    }

    Vec::new()
}
