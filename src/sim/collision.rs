//! Collision detection and response
//!
//! Everything is circle vs circle. Hits only mark entities dead; removal
//! happens in the cleanup pass at the end of the tick.

use glam::Vec2;

use super::spawn;
use super::state::{Enemy, GameEvent, GamePhase, GameState, Rock};
use crate::consts::*;
use crate::{circles_overlap, distance, safe_normalize};

/// Remove every field rock the boss is standing on. Returns how many were crushed.
pub fn crush_rocks(boss: &Enemy, rocks: &mut Vec<Rock>) -> usize {
    let before = rocks.len();
    rocks.retain(|r| r.picked_up || !boss.overlaps(r.pos, r.radius));
    before - rocks.len()
}

/// Projectiles against enemies.
///
/// A projectile dies on its first hit. An enemy can soak several projectiles
/// in one frame, but stops absorbing them once it is dead.
pub fn resolve_projectile_hits(state: &mut GameState) {
    let mut drops: Vec<Rock> = Vec::new();

    for enemy in state.enemies.iter_mut() {
        if !enemy.alive {
            continue;
        }
        for projectile in state.projectiles.iter_mut() {
            if !projectile.alive || !enemy.overlaps(projectile.pos, projectile.radius) {
                continue;
            }
            let damage = projectile.damage();
            projectile.alive = false;
            let killed = enemy.take_damage(damage);
            state.events.push(GameEvent::EnemyHit {
                damage,
                boss: enemy.is_boss,
            });
            log::debug!("Enemy hit for {} ({}/{} hp)", damage, enemy.hp, enemy.max_hp);

            if killed {
                state.score += enemy.score_value();
                state.player.heal(KILL_HEAL);
                state.events.push(GameEvent::EnemyDefeated {
                    pos: enemy.pos,
                    boss: enemy.is_boss,
                });
                if enemy.is_boss {
                    log::info!("Boss defeated! Score {}", state.score);
                } else if let Some(rock) = spawn::roll_rock_drop(&mut state.rng, enemy.pos) {
                    drops.push(rock);
                }
                break;
            }
        }
    }

    for rock in drops {
        spawn::place_drop(state, rock);
    }
}

/// Enemies touching the player.
///
/// Damage is gated by the hit grace period, so at most one enemy lands a hit
/// per frame.
pub fn resolve_player_contacts(state: &mut GameState) {
    let multiplier = state.damage_multiplier();

    for i in 0..state.enemies.len() {
        if state.phase == GamePhase::GameOver {
            break;
        }
        let enemy = state.enemies[i];
        if !enemy.alive || !enemy.overlaps(state.player.pos, state.player.radius) {
            continue;
        }
        if !state.player.can_be_hit(state.time) {
            continue;
        }

        let damage = enemy.contact_damage().saturating_mul(multiplier);
        let lethal = state.player.take_hit(damage, state.time);
        knock_back(state, enemy.pos);
        state.events.push(GameEvent::PlayerHit { damage });
        log::debug!("Player hit for {} ({} hp left)", damage, state.player.hp);

        if lethal {
            lose_life(state);
        }
    }
}

/// Shove the player away from `from`
fn knock_back(state: &mut GameState, from: Vec2) {
    let dir = safe_normalize(state.player.pos - from);
    let mut pos = state.player.pos + dir * KNOCKBACK;
    if state.settings.clamp_knockback {
        let r = state.player.radius;
        let max = state.settings.world_size() - Vec2::splat(r);
        pos = pos.clamp(Vec2::splat(r), max);
    }
    state.player.pos = pos;
}

/// Spend a life: respawn at the center, or end the run when none are left
fn lose_life(state: &mut GameState) {
    state.player.lives = state.player.lives.saturating_sub(1);
    state.events.push(GameEvent::LifeLost {
        lives_left: state.player.lives,
    });

    if state.player.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!(
            "Game over: score {} at level {} (cycle {})",
            state.score,
            state.level,
            state.cycle
        );
        return;
    }

    let center = state.settings.world_center();
    state.player.respawn(center);
    for enemy in state.enemies.iter_mut() {
        if distance(enemy.pos, center) < RESPAWN_CLEAR_RADIUS {
            enemy.pos.y -= RESPAWN_SHOVE;
        }
    }
    log::info!("Life lost, {} remaining", state.player.lives);
}

/// True if any live enemy overlaps the circle
pub fn any_enemy_overlaps(state: &GameState, pos: Vec2, radius: f32) -> bool {
    state
        .enemies
        .iter()
        .any(|e| e.alive && circles_overlap(e.pos, e.radius, pos, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Projectile;

    fn empty_state() -> GameState {
        let mut state = GameState::default();
        state.rocks.clear();
        state.events.clear();
        state
    }

    #[test]
    fn projectile_hit_deals_radius_damage() {
        let mut state = empty_state();
        let pos = Vec2::new(300.0, 100.0);
        state.enemies.push(Enemy::regular(pos, 20.0, 1.0));
        state.projectiles.push(Projectile::new(pos, Vec2::ZERO, 10.0));

        resolve_projectile_hits(&mut state);

        assert_eq!(state.enemies[0].hp, 80 - 30);
        assert!(!state.projectiles[0].alive);
        assert!(state.enemies[0].alive);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn projectile_only_hits_one_enemy() {
        let mut state = empty_state();
        let pos = Vec2::new(300.0, 100.0);
        state.enemies.push(Enemy::regular(pos, 20.0, 1.0));
        state.enemies.push(Enemy::regular(pos, 20.0, 1.0));
        state.projectiles.push(Projectile::new(pos, Vec2::ZERO, 16.0));

        resolve_projectile_hits(&mut state);

        assert_eq!(state.enemies[0].hp, 80 - 48);
        assert_eq!(state.enemies[1].hp, 80);
    }

    #[test]
    fn enemy_absorbs_several_projectiles() {
        let mut state = empty_state();
        let pos = Vec2::new(300.0, 100.0);
        state.enemies.push(Enemy::regular(pos, 20.0, 1.0));
        for _ in 0..2 {
            state.projectiles.push(Projectile::new(pos, Vec2::ZERO, 6.0));
        }

        resolve_projectile_hits(&mut state);

        assert_eq!(state.enemies[0].hp, 80 - 36);
        assert!(state.projectiles.iter().all(|p| !p.alive));
    }

    #[test]
    fn kill_scores_and_heals() {
        let mut state = empty_state();
        state.player.hp = 50;
        let pos = Vec2::new(300.0, 100.0);
        state.enemies.push(Enemy::regular(pos, 12.0, 1.0));
        for _ in 0..3 {
            state.projectiles.push(Projectile::new(pos, Vec2::ZERO, 16.0));
        }

        resolve_projectile_hits(&mut state);

        assert!(!state.enemies[0].alive);
        assert_eq!(state.enemies[0].hp, 0);
        assert_eq!(state.score, 1);
        assert_eq!(state.player.hp, 55);
        // The second and third projectiles flew on
        assert_eq!(state.projectiles.iter().filter(|p| p.alive).count(), 2);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::EnemyDefeated { boss: false, .. }))
        );
    }

    #[test]
    fn boss_kill_scores_five_without_drop() {
        let mut state = empty_state();
        let pos = Vec2::new(300.0, 100.0);
        let mut boss = Enemy::boss(pos, 1.0);
        boss.hp = 10;
        state.enemies.push(boss);
        state.projectiles.push(Projectile::new(pos, Vec2::ZERO, 6.0));

        resolve_projectile_hits(&mut state);

        assert_eq!(state.score, 5);
        assert!(state.rocks.is_empty());
    }

    #[test]
    fn boss_crushes_field_rocks_only() {
        let boss = Enemy::boss(Vec2::new(100.0, 100.0), 1.0);
        let mut rocks = vec![
            Rock::new(Vec2::new(150.0, 100.0), 6.0),
            Rock::new(Vec2::new(400.0, 100.0), 6.0),
            Rock {
                picked_up: true,
                ..Rock::new(Vec2::new(100.0, 100.0), 10.0)
            },
        ];
        assert_eq!(crush_rocks(&boss, &mut rocks), 1);
        assert_eq!(rocks.len(), 2);
        assert_eq!(rocks[0].pos.x, 400.0);
    }

    #[test]
    fn contact_damage_and_knockback() {
        let mut state = empty_state();
        state.time = 5.0;
        let player_pos = state.player.pos;
        let enemy_pos = player_pos - Vec2::new(20.0, 0.0);
        state.enemies.push(Enemy::regular(enemy_pos, 19.0, 1.0));

        resolve_player_contacts(&mut state);

        assert_eq!(state.player.hp, 80);
        assert_eq!(state.player.last_hit_at, 5.0);
        assert!((state.player.invulnerability - HIT_FLICKER).abs() < 1e-6);
        assert!((state.player.pos.x - (player_pos.x + KNOCKBACK)).abs() < 1e-4);

        // Grace period: a second contact right away does nothing
        resolve_player_contacts(&mut state);
        assert_eq!(state.player.hp, 80);
    }

    #[test]
    fn contact_damage_scales_with_cycle() {
        let mut state = empty_state();
        state.cycle = 2;
        state.enemies.push(Enemy::regular(state.player.pos, 12.0, 1.0));
        resolve_player_contacts(&mut state);
        assert_eq!(state.player.hp, 60);
    }

    #[test]
    fn knockback_clamped_to_world() {
        let mut state = empty_state();
        state.player.pos = Vec2::new(15.0, 270.0);
        state.enemies.push(Enemy::regular(Vec2::new(30.0, 270.0), 12.0, 1.0));
        resolve_player_contacts(&mut state);
        assert_eq!(state.player.pos.x, state.player.radius);

        let mut state = empty_state();
        state.settings.clamp_knockback = false;
        state.player.pos = Vec2::new(15.0, 270.0);
        state.enemies.push(Enemy::regular(Vec2::new(30.0, 270.0), 12.0, 1.0));
        resolve_player_contacts(&mut state);
        assert!((state.player.pos.x - 3.0).abs() < 1e-4);
    }

    #[test]
    fn lethal_hit_respawns_player() {
        let mut state = empty_state();
        state.player.hp = 5;
        state.player.lives = 2;
        state.player.pos = Vec2::new(100.0, 100.0);
        state.player.set_target(Vec2::new(50.0, 50.0));
        state.enemies.push(Enemy::regular(Vec2::new(100.0, 100.0), 12.0, 1.0));
        let lurker = Enemy::regular(state.settings.world_center() + Vec2::new(30.0, 0.0), 12.0, 1.0);
        state.enemies.push(lurker);

        resolve_player_contacts(&mut state);

        assert_eq!(state.player.lives, 1);
        assert_eq!(state.player.hp, 100);
        assert_eq!(state.player.pos, state.settings.world_center());
        assert!(!state.player.has_target);
        assert!((state.player.invulnerability - RESPAWN_INVULNERABILITY).abs() < 1e-6);
        assert_eq!(state.phase, GamePhase::Playing);
        // Lurker near the respawn point got shoved upward
        assert!((state.enemies[1].pos.y - (lurker.pos.y - RESPAWN_SHOVE)).abs() < 1e-4);
    }

    #[test]
    fn last_life_ends_the_game() {
        let mut state = empty_state();
        state.player.hp = 5;
        state.player.lives = 1;
        state.enemies.push(Enemy::regular(state.player.pos, 12.0, 1.0));

        resolve_player_contacts(&mut state);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.player.hp, 0);
        assert!(state.events.contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn respawn_invulnerability_blocks_hits() {
        let mut state = empty_state();
        state.player.invulnerability = 1.0;
        state.enemies.push(Enemy::regular(state.player.pos, 12.0, 1.0));
        resolve_player_contacts(&mut state);
        assert_eq!(state.player.hp, 100);
    }

    #[test]
    fn overlap_query() {
        let mut state = empty_state();
        state.enemies.push(Enemy::regular(Vec2::new(100.0, 100.0), 12.0, 1.0));
        assert!(any_enemy_overlaps(&state, Vec2::new(120.0, 100.0), 8.0));
        assert!(!any_enemy_overlaps(&state, Vec2::new(200.0, 100.0), 8.0));
    }
}
