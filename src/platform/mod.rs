//! Platform abstraction layer
//!
//! The simulation only sees [`TickInput`](crate::sim::TickInput). Whatever
//! drives the game (keyboard, touch, a script, the autopilot) implements
//! [`InputSource`]; whatever draws it implements [`Renderer`].

use crate::sim::{Direction, GameState, TickInput};

/// Something that produces steering and confirm presses
pub trait InputSource {
    /// Current horizontal steering
    fn direction(&self) -> Direction;
    /// True once per confirm press; reading consumes the press
    fn take_confirm(&mut self) -> bool;
}

/// Sample an input source once for the next tick
///
/// Consumes any pending confirm press.
pub fn sample(source: &mut dyn InputSource, idle_mode: bool) -> TickInput {
    TickInput {
        direction: source.direction(),
        confirm: source.take_confirm(),
        idle_mode,
    }
}

/// Draws a frame from the current state. Never mutates the simulation.
pub trait Renderer {
    fn render(&mut self, state: &GameState);
}

/// Latched button state fed by key/touch events
#[derive(Debug, Default, Clone)]
pub struct InputState {
    left: bool,
    right: bool,
    /// Confirm is currently held down
    confirm_held: bool,
    /// A press that no tick has consumed yet
    confirm_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_left(&mut self, held: bool) {
        self.left = held;
    }

    pub fn set_right(&mut self, held: bool) {
        self.right = held;
    }

    /// Key/touch down. Auto-repeat while held does not latch again.
    pub fn press_confirm(&mut self) {
        if !self.confirm_held {
            self.confirm_pending = true;
        }
        self.confirm_held = true;
    }

    pub fn release_confirm(&mut self) {
        self.confirm_held = false;
    }

    /// Drop everything held (focus lost)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl InputSource for InputState {
    fn direction(&self) -> Direction {
        match (self.left, self.right) {
            (true, false) => Direction::Left,
            (false, true) => Direction::Right,
            _ => Direction::Idle,
        }
    }

    fn take_confirm(&mut self) -> bool {
        std::mem::take(&mut self.confirm_pending)
    }
}
