//! Input translation
//!
//! Turns raw pointer/key events (window pixel coordinates) into domain
//! [`Action`]s. The window layer feeds events in; the simulation only ever sees
//! actions in world coordinates.

use glam::Vec2;

use crate::sim::GamePhase;
pub use crate::sim::tick::Action;

/// Mouse buttons the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Pick up / move
    Primary,
    /// Throw
    Secondary,
}

/// Keys the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Throw at the pointer
    Space,
    /// Restart after game over
    R,
    Other,
}

/// Raw input events in window pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },
    PointerPressed { button: PointerButton, x: f32, y: f32 },
    KeyPressed(Key),
}

/// Maps window pixels to world units and events to actions.
///
/// The world is scaled uniformly to fit the window and centered (letterboxed).
#[derive(Debug, Clone)]
pub struct InputMapper {
    world: Vec2,
    scale: f32,
    offset: Vec2,
    /// Last known pointer position, in world units
    pointer: Vec2,
}

impl InputMapper {
    /// Mapper for a window exactly the size of the world
    pub fn new(world: Vec2) -> Self {
        Self {
            world,
            scale: 1.0,
            offset: Vec2::ZERO,
            pointer: world * 0.5,
        }
    }

    /// Recompute the viewport transform after a window resize
    pub fn set_window_size(&mut self, width: f32, height: f32) {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("Ignoring degenerate window size {}x{}", width, height);
            return;
        }
        self.scale = (width / self.world.x).min(height / self.world.y);
        self.offset = (Vec2::new(width, height) - self.world * self.scale) * 0.5;
    }

    pub fn screen_to_world(&self, x: f32, y: f32) -> Vec2 {
        (Vec2::new(x, y) - self.offset) / self.scale
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }

    /// Last pointer position in world units
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Translate one event. Play actions are dropped after game over; restart only works then.
    pub fn translate(&mut self, event: InputEvent, phase: GamePhase) -> Option<Action> {
        let playing = phase == GamePhase::Playing;
        match event {
            InputEvent::PointerMoved { x, y } => {
                self.pointer = self.screen_to_world(x, y);
                None
            }
            InputEvent::PointerPressed { button, x, y } => {
                self.pointer = self.screen_to_world(x, y);
                if !playing {
                    return None;
                }
                Some(match button {
                    PointerButton::Primary => Action::PickupOrMove(self.pointer),
                    PointerButton::Secondary => Action::Throw(self.pointer),
                })
            }
            InputEvent::KeyPressed(Key::Space) if playing => Some(Action::Throw(self.pointer)),
            InputEvent::KeyPressed(Key::R) if !playing => Some(Action::Restart),
            InputEvent::KeyPressed(_) => None,
        }
    }

    /// Translate a frame's worth of events, preserving order
    pub fn translate_all(
        &mut self,
        events: impl IntoIterator<Item = InputEvent>,
        phase: GamePhase,
    ) -> Vec<Action> {
        events
            .into_iter()
            .filter_map(|e| self.translate(e, phase))
            .collect()
    }
}
