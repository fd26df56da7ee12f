//! Render snapshot
//!
//! Owned copy of everything a renderer or HUD needs for one frame. Built
//! fresh from [`GameState`] each frame so nothing outlives entity cleanup.

use glam::Vec2;
use serde::Serialize;

use crate::consts::PLAYER_LIVES;
use crate::sim::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RockView {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnemyView {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub is_boss: bool,
}

impl EnemyView {
    /// Health bar fill in [0, 1]
    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            (self.hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    /// Where the player is walking to, if anywhere
    pub target: Option<Vec2>,
    /// Drawn faded this frame (invulnerability flicker)
    pub dimmed: bool,
}

/// Scalar HUD values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub lives: u32,
    pub max_lives: u32,
    pub level: u32,
    pub cycle: u32,
    /// Enemy damage multiplier shown as "difficulty xN"
    pub difficulty: u32,
    pub boss_level: bool,
    /// Seconds left on the big level banner (0 = hidden)
    pub banner_timer: f32,
    /// Carried rock radii, in pickup order
    pub inventory: Vec<f32>,
    pub inventory_capacity: usize,
    pub game_over: bool,
}

impl Hud {
    pub fn show_banner(&self) -> bool {
        self.banner_timer > 0.0
    }

    /// Player health bar fill in [0, 1]
    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            (self.hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub world_size: Vec2,
    pub rocks: Vec<RockView>,
    pub projectiles: Vec<ProjectileView>,
    pub enemies: Vec<EnemyView>,
    pub player: PlayerView,
    pub hud: Hud,
}

/// Flicker rate while invulnerable (toggles per second)
const FLICKER_HZ: f32 = 10.0;

/// Whether the player is drawn faded, derived from the invulnerability timer only
pub fn flicker_dimmed(invulnerability: f32) -> bool {
    invulnerability > 0.0 && ((invulnerability * FLICKER_HZ) as u32) % 2 == 0
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let rocks = state
            .field_rocks()
            .map(|r| RockView {
                pos: r.pos,
                radius: r.radius,
            })
            .collect();
        let projectiles = state
            .projectiles
            .iter()
            .filter(|p| p.alive)
            .map(|p| ProjectileView {
                pos: p.pos,
                radius: p.radius,
            })
            .collect();
        let enemies = state
            .enemies
            .iter()
            .filter(|e| e.alive)
            .map(|e| EnemyView {
                pos: e.pos,
                radius: e.radius,
                hp: e.hp,
                max_hp: e.max_hp,
                is_boss: e.is_boss,
            })
            .collect();

        let p = &state.player;
        let player = PlayerView {
            pos: p.pos,
            radius: p.radius,
            target: p.has_target.then_some(p.target),
            dimmed: flicker_dimmed(p.invulnerability),
        };

        let hud = Hud {
            score: state.score,
            hp: p.hp,
            max_hp: p.max_hp,
            lives: p.lives,
            max_lives: PLAYER_LIVES,
            level: state.level,
            cycle: state.cycle,
            difficulty: state.damage_multiplier(),
            boss_level: state.is_boss_level(),
            banner_timer: state.banner_timer,
            inventory: p.inventory.clone(),
            inventory_capacity: p.capacity,
            game_over: state.is_game_over(),
        };

        Self {
            world_size: state.settings.world_size(),
            rocks,
            projectiles,
            enemies,
            player,
            hud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, GamePhase, Rock};

    #[test]
    fn snapshot_of_fresh_game() {
        let state = GameState::default();
        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.rocks.len(), 70);
        assert!(snap.enemies.is_empty());
        assert_eq!(snap.hud.level, 1);
        assert_eq!(snap.hud.difficulty, 1);
        assert_eq!(snap.hud.lives, 3);
        assert!(snap.hud.show_banner());
        assert!(!snap.hud.game_over);
        assert_eq!(snap.player.target, None);
        assert!(!snap.player.dimmed);
    }

    #[test]
    fn picked_and_dead_entities_hidden() {
        let mut state = GameState::default();
        state.rocks.clear();
        state.rocks.push(Rock::new(Vec2::ZERO, 6.0));
        state.rocks.push(Rock {
            picked_up: true,
            ..Rock::new(Vec2::ONE, 6.0)
        });
        let mut dead = Enemy::regular(Vec2::ZERO, 12.0, 1.0);
        dead.alive = false;
        state.enemies.push(dead);
        state.enemies.push(Enemy::boss(Vec2::ONE, 1.0));

        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.rocks.len(), 1);
        assert_eq!(snap.enemies.len(), 1);
        assert!(snap.enemies[0].is_boss);
        assert_eq!(snap.enemies[0].hp_ratio(), 1.0);
    }

    #[test]
    fn hud_reflects_state() {
        let mut state = GameState::default();
        state.cycle = 1;
        state.start_level(5);
        state.player.hp = 25;
        state.player.inventory = vec![16.0, 6.0];
        state.phase = GamePhase::GameOver;
        state.player.set_target(Vec2::new(1.0, 2.0));

        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.hud.difficulty, 2);
        assert!(snap.hud.boss_level);
        assert_eq!(snap.hud.hp_ratio(), 0.25);
        assert_eq!(snap.hud.inventory, vec![16.0, 6.0]);
        assert!(snap.hud.game_over);
        assert_eq!(snap.player.target, Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn flicker_follows_timer() {
        assert!(!flicker_dimmed(0.0));
        assert!(flicker_dimmed(0.05));
        assert!(!flicker_dimmed(0.15));
        assert!(flicker_dimmed(0.25));
    }
}
