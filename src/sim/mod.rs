//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One seeded random stream, drawn in a fixed order
//! - Simulation-time timers only (no wall clock)
//! - Stable iteration order (entities keep insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use rng::LcgRng;
pub use state::{Enemy, GameEvent, GamePhase, GameState, Player, Projectile, Rock};
pub use tick::{Action, TickInput, apply_action, throw_rock, tick, try_pickup};
