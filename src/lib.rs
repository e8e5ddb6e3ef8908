//! Shaft Fall - a falling-shaft arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (platforms, player, collisions, game state)
//! - `session`: Shell wiring the simulation to input, audio and storage
//! - `platform`: Input/render abstraction
//! - `persistence`: Key/value storage backends
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::BestScores;
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; all tuning rates are per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 6;

    /// Storage keys
    pub const HIGH_SCORES_KEY: &str = "shaft-fall-highscores";
    pub const SETTINGS_KEY: &str = "shaft-fall-settings";
    pub const TUNING_KEY: &str = "shaft-fall-tuning";
}
