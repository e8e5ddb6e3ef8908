//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod bonus;
pub mod collision;
pub mod platform;
pub mod player;
pub mod pool;
pub mod state;
pub mod tick;

pub use bonus::{BonusEvent, BonusPhase};
pub use collision::{Aabb, find_landing, swept_landing};
pub use platform::{Platform, PlatformKind, PlatformTag};
pub use player::{Direction, Ground, Player};
pub use pool::{PlatformPool, spawn_weights, weighted_choice};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
