//! Spawning policy for rocks and enemies
//!
//! Every function here takes the random stream explicitly and draws from it in
//! a fixed order, so a seed always produces the same world.

use glam::Vec2;

use super::rng::LcgRng;
use super::state::{Enemy, GameEvent, GameState, Rock};
use crate::consts::*;
use crate::settings::Settings;

/// Rock radius drawn from the 5:3:2 size distribution
pub fn random_rock_radius(rng: &mut LcgRng) -> f32 {
    ROCK_SIZES[rng.weighted_pick(&ROCK_WEIGHTS)]
}

/// A rock at a random position inset from the world border
pub fn random_rock(rng: &mut LcgRng, settings: &Settings) -> Rock {
    let radius = random_rock_radius(rng);
    let x = rng.range(ROCK_SPAWN_MARGIN, settings.world_width - ROCK_SPAWN_MARGIN);
    let y = rng.range(ROCK_SPAWN_MARGIN, settings.world_height - ROCK_SPAWN_MARGIN);
    Rock::new(Vec2::new(x, y), radius)
}

/// The rocks scattered over a brand new world
pub fn initial_rocks(rng: &mut LcgRng, settings: &Settings) -> Vec<Rock> {
    (0..settings.initial_rocks)
        .map(|_| random_rock(rng, settings))
        .collect()
}

/// Enemy budget for a level: 2^level on levels 1-4, a single boss on level 5
pub fn enemies_for_level(level: u32) -> u32 {
    match level {
        BOSS_LEVEL => 1,
        1..BOSS_LEVEL => 1 << level,
        _ => 0,
    }
}

/// Delay before the next enemy, in [2.0, 3.6)
pub fn next_spawn_interval(rng: &mut LcgRng) -> f32 {
    SPAWN_INTERVAL_BASE + rng.range(SPAWN_INTERVAL_JITTER_MIN, SPAWN_INTERVAL_JITTER_MAX)
}

/// Create the next enemy for `level`, just above the top edge
pub fn random_enemy(rng: &mut LcgRng, settings: &Settings, level: u32, speed_multiplier: f32) -> Enemy {
    if level == BOSS_LEVEL {
        let x = rng.range(BOSS_SPAWN_X_MARGIN, settings.world_width - BOSS_SPAWN_X_MARGIN);
        let y = -BOSS_RADIUS - BOSS_SPAWN_Y_OFFSET;
        return Enemy::boss(Vec2::new(x, y), speed_multiplier);
    }
    let radius = rng.range(ENEMY_MIN_RADIUS, ENEMY_MAX_RADIUS);
    let x = rng.range(ENEMY_SPAWN_X_MARGIN, settings.world_width - ENEMY_SPAWN_X_MARGIN);
    let y = -radius - ENEMY_SPAWN_Y_OFFSET;
    Enemy::regular(Vec2::new(x, y), radius, speed_multiplier)
}

/// Large rock left behind by a defeated enemy, if the roll succeeds
pub fn roll_rock_drop(rng: &mut LcgRng, at: Vec2) -> Option<Rock> {
    if rng.next_uniform() < f64::from(ROCK_DROP_CHANCE) {
        Some(Rock::new(at, ROCK_SIZES[ROCK_SIZES.len() - 1]))
    } else {
        None
    }
}

/// Advance the level spawner: one enemy per elapsed interval while the budget lasts
pub fn tick_enemy_spawner(state: &mut GameState, dt: f32) {
    if state.enemies_to_spawn == 0 {
        return;
    }
    state.spawn_timer += dt;
    if state.spawn_timer < state.spawn_interval {
        return;
    }
    state.spawn_timer = 0.0;
    let speed_multiplier = state.speed_multiplier();
    let enemy = random_enemy(&mut state.rng, &state.settings, state.level, speed_multiplier);
    log::debug!(
        "Spawned {} r={:.1} hp={} at ({:.0}, {:.0})",
        if enemy.is_boss { "boss" } else { "enemy" },
        enemy.radius,
        enemy.hp,
        enemy.pos.x,
        enemy.pos.y
    );
    state.enemies.push(enemy);
    state.enemies_to_spawn -= 1;
    state.spawn_interval = next_spawn_interval(&mut state.rng);
}

/// Advance the ambient rock spawner: one rock per interval, forever
pub fn tick_rock_spawner(state: &mut GameState, dt: f32) {
    state.rock_spawn_timer += dt;
    if state.rock_spawn_timer >= ROCK_SPAWN_INTERVAL {
        state.rock_spawn_timer = 0.0;
        let rock = random_rock(&mut state.rng, &state.settings);
        state.rocks.push(rock);
    }
}

/// Record a drop in the world
pub(crate) fn place_drop(state: &mut GameState, rock: Rock) {
    state.events.push(GameEvent::RockDropped { pos: rock.pos });
    state.rocks.push(rock);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_budgets() {
        assert_eq!(enemies_for_level(1), 2);
        assert_eq!(enemies_for_level(2), 4);
        assert_eq!(enemies_for_level(3), 8);
        assert_eq!(enemies_for_level(4), 16);
        assert_eq!(enemies_for_level(5), 1);
        assert_eq!(enemies_for_level(0), 0);
        assert_eq!(enemies_for_level(6), 0);
    }

    #[test]
    fn rocks_stay_inside_margins() {
        let settings = Settings::default();
        let mut rng = LcgRng::default();
        for rock in initial_rocks(&mut rng, &settings) {
            assert!(ROCK_SIZES.contains(&rock.radius));
            assert!(rock.pos.x >= 40.0 && rock.pos.x < 920.0);
            assert!(rock.pos.y >= 40.0 && rock.pos.y < 500.0);
            assert!(!rock.picked_up);
        }
    }

    #[test]
    fn initial_rocks_are_reproducible() {
        let settings = Settings::default();
        let a = initial_rocks(&mut LcgRng::new(42), &settings);
        let b = initial_rocks(&mut LcgRng::new(42), &settings);
        assert_eq!(a, b);
        let c = initial_rocks(&mut LcgRng::new(43), &settings);
        assert_ne!(a, c);
    }

    #[test]
    fn spawn_interval_range() {
        let mut rng = LcgRng::default();
        for _ in 0..1000 {
            let i = next_spawn_interval(&mut rng);
            assert!((2.0..3.6).contains(&i), "interval {i}");
        }
    }

    #[test]
    fn regular_enemy_spawns_above_screen() {
        let settings = Settings::default();
        let mut rng = LcgRng::default();
        for _ in 0..200 {
            let e = random_enemy(&mut rng, &settings, 3, 1.0);
            assert!(!e.is_boss);
            assert!(e.radius >= 12.0 && e.radius < 20.0);
            assert!(e.pos.x >= 30.0 && e.pos.x < 930.0);
            assert!((e.pos.y - (-e.radius - 14.0)).abs() < 1e-4);
            assert_eq!(e.hp, (e.radius * 4.0).round() as u32);
            assert!(e.speed > 45.0 - 1e-3 && e.speed <= 85.0 + 1e-3);
        }
    }

    #[test]
    fn boss_spawns_on_level_five() {
        let settings = Settings::default();
        let mut rng = LcgRng::default();
        let boss = random_enemy(&mut rng, &settings, 5, 1.0);
        assert!(boss.is_boss);
        assert_eq!(boss.pos.y, -100.0);
        assert!(boss.pos.x >= 80.0 && boss.pos.x < 880.0);
    }

    #[test]
    fn enemy_spawner_waits_for_interval() {
        let mut state = GameState::default();
        state.spawn_interval = 1.0;
        tick_enemy_spawner(&mut state, 0.5);
        assert!(state.enemies.is_empty());
        tick_enemy_spawner(&mut state, 0.5);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies_to_spawn, 1);
        assert_eq!(state.spawn_timer, 0.0);
        assert!((2.0..3.6).contains(&state.spawn_interval));
    }

    #[test]
    fn enemy_spawner_stops_at_zero() {
        let mut state = GameState::default();
        state.enemies_to_spawn = 0;
        tick_enemy_spawner(&mut state, 100.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.spawn_timer, 0.0);
    }

    #[test]
    fn rock_spawner_adds_one_per_interval() {
        let mut state = GameState::default();
        let before = state.rocks.len();
        tick_rock_spawner(&mut state, 1.5);
        assert_eq!(state.rocks.len(), before);
        tick_rock_spawner(&mut state, 0.5);
        assert_eq!(state.rocks.len(), before + 1);
        assert_eq!(state.rock_spawn_timer, 0.0);
    }

    #[test]
    fn drops_are_large_rocks_about_half_the_time() {
        let mut rng = LcgRng::default();
        let mut drops = 0;
        for _ in 0..10_000 {
            if let Some(rock) = roll_rock_drop(&mut rng, Vec2::new(5.0, 5.0)) {
                assert_eq!(rock.radius, 16.0);
                assert_eq!(rock.pos, Vec2::new(5.0, 5.0));
                drops += 1;
            }
        }
        assert!((4_700..5_300).contains(&drops), "drops {drops}");
    }
}
