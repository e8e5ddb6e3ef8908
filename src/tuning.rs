//! Data-driven game balance
//!
//! Every number the simulation reads lives in [`Tuning`]. A tuning value is
//! built once, handed to [`GameState::new`](crate::sim::GameState::new) and
//! never mutated afterwards. All rates are per tick at [`SIM_DT`](crate::consts::SIM_DT).

use serde::{Deserialize, Serialize};

use crate::consts::TUNING_KEY;
use crate::persistence::{self, Storage};

/// Spawn weights for the platform variants, parameterized by level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    pub normal_base: f32,
    pub normal_decay: f32,
    pub normal_floor: f32,
    pub spike_base: f32,
    pub spike_growth: f32,
    pub spike_cap: f32,
    pub conveyor: f32,
    pub crumble_base: f32,
    pub crumble_growth: f32,
    pub crumble_cap: f32,
    pub spring: f32,
    /// Levels above this are treated as this level
    pub level_ceiling: u32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            normal_base: 0.70,
            normal_decay: 0.03,
            normal_floor: 0.25,
            spike_base: 0.05,
            spike_growth: 0.017,
            spike_cap: 0.30,
            conveyor: 0.15,
            crumble_base: 0.10,
            crumble_growth: 0.01,
            crumble_cap: 0.25,
            spring: 0.05,
            level_ceiling: 15,
        }
    }
}

/// Complete tuning for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub game_width: f32,
    pub game_height: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Horizontal speed while steering
    pub player_speed: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub max_hp: u32,
    pub start_hp: u32,
    /// Feet start this far below the top on a new run
    pub player_spawn_y: f32,
    /// Horizontal velocity multiplier when not steering
    pub damping: f32,
    /// Below this horizontal speed the player stops dead
    pub stop_threshold: f32,
    pub walk_threshold: f32,
    pub walk_frame_ticks: u32,
    pub invulnerable_ticks: u32,

    // === HP deltas ===
    pub heal_amount: u32,
    pub spike_damage: u32,
    pub ceiling_damage: u32,

    // === Platforms ===
    pub platform_width: f32,
    pub platform_height: f32,
    pub platform_gap_y: f32,
    pub platform_count: usize,
    pub platform_margin: f32,
    pub platform_start_y: f32,
    /// Leading slots that are always Normal on a fresh pool
    pub safe_start_count: usize,
    /// How far above the top edge a platform must be before it is recycled
    pub recycle_tolerance: f32,

    // === Scrolling ===
    pub base_speed: f32,
    pub speed_increment: f32,
    pub max_speed: f32,

    // === Variants ===
    pub conveyor_push_speed: f32,
    pub conveyor_push_factor: f32,
    pub conveyor_arrow_step: f32,
    pub conveyor_arrow_period: f32,
    pub spring_bounce_vy: f32,
    pub spring_compress_ticks: u32,
    pub crumble_lifetime_ticks: u32,

    // === Difficulty ===
    pub level_interval: u32,
    pub score_per_platform: u32,
    pub spawn: SpawnWeights,

    // === Ceiling ===
    pub spike_ceiling_y: f32,
    pub spike_height: f32,
    pub ceiling_push_vy: f32,

    // === Flow ===
    pub gameover_delay_ticks: u32,
    pub bonus_threshold: u32,
    pub bonus_reveal_ticks: u32,
    pub bonus_show_ticks: u32,
    pub bonus_fade_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            game_width: 360.0,
            game_height: 480.0,

            player_width: 20.0,
            player_height: 24.0,
            player_speed: 3.0,
            gravity: 0.35,
            max_fall_speed: 8.0,
            max_hp: 10,
            start_hp: 10,
            player_spawn_y: 80.0,
            damping: 0.7,
            stop_threshold: 0.1,
            walk_threshold: 0.5,
            walk_frame_ticks: 6,
            invulnerable_ticks: 30,

            heal_amount: 1,
            spike_damage: 5,
            ceiling_damage: 5,

            platform_width: 70.0,
            platform_height: 8.0,
            platform_gap_y: 55.0,
            platform_count: 9,
            platform_margin: 10.0,
            platform_start_y: 100.0,
            safe_start_count: 3,
            recycle_tolerance: 10.0,

            base_speed: 0.8,
            speed_increment: 0.04,
            max_speed: 3.5,

            conveyor_push_speed: 1.5,
            conveyor_push_factor: 0.15,
            conveyor_arrow_step: 0.5,
            conveyor_arrow_period: 8.0,
            spring_bounce_vy: -9.0,
            spring_compress_ticks: 10,
            crumble_lifetime_ticks: 24,

            level_interval: 10,
            score_per_platform: 1,
            spawn: SpawnWeights::default(),

            spike_ceiling_y: 0.0,
            spike_height: 16.0,
            ceiling_push_vy: 2.0,

            gameover_delay_ticks: 60,
            bonus_threshold: 100,
            bonus_reveal_ticks: 120,
            bonus_show_ticks: 240,
            bonus_fade_ticks: 30,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning overrides from storage, falling back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        persistence::load(storage, TUNING_KEY, Self::default())
    }

    /// Y coordinate below which the player touches the ceiling spikes
    #[inline]
    pub fn ceiling_line(&self) -> f32 {
        self.spike_ceiling_y + self.spike_height
    }

    /// Inclusive range for a platform's left edge
    #[inline]
    pub fn spawn_x_range(&self) -> (f32, f32) {
        let lo = self.platform_margin;
        let hi = self.game_width - self.platform_width - self.platform_margin;
        (lo, hi.max(lo))
    }

    /// Scroll speed for a given level
    pub fn scroll_speed_for_level(&self, level: u32) -> f32 {
        (self.base_speed + level as f32 * self.speed_increment).min(self.max_speed)
    }
}
