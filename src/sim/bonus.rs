//! Bonus event: a one-off interlude at a score milestone
//!
//! Gameplay is frozen while it runs. The reveal plays for a fixed time, the
//! full picture then shows until the player confirms (or the show time runs
//! out), and finally the overlay fades away.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Overlay darkness while the bonus is up
const OVERLAY_ALPHA: f32 = 0.82;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusPhase {
    Revealing,
    Showing,
    Fading,
}

/// Nested state of the bonus interlude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusEvent {
    pub phase: BonusPhase,
    /// Ticks spent in the current phase
    pub timer: u32,
}

impl Default for BonusEvent {
    fn default() -> Self {
        Self::start()
    }
}

impl BonusEvent {
    pub fn start() -> Self {
        Self {
            phase: BonusPhase::Revealing,
            timer: 0,
        }
    }

    fn enter(&mut self, phase: BonusPhase) {
        log::debug!("Bonus {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.timer = 0;
    }

    /// Advance one tick. Returns true once the fade has finished.
    ///
    /// `skip` only has an effect while showing.
    pub fn update(&mut self, skip: bool, tuning: &Tuning) -> bool {
        self.timer += 1;
        match self.phase {
            BonusPhase::Revealing => {
                if self.timer >= tuning.bonus_reveal_ticks {
                    self.enter(BonusPhase::Showing);
                }
            }
            BonusPhase::Showing => {
                if skip || self.timer >= tuning.bonus_show_ticks {
                    self.enter(BonusPhase::Fading);
                }
            }
            BonusPhase::Fading => {
                if self.timer >= tuning.bonus_fade_ticks {
                    return true;
                }
            }
        }
        false
    }

    /// Reveal progress in [0, 1]; 1 once past the reveal
    pub fn reveal_progress(&self, tuning: &Tuning) -> f32 {
        match self.phase {
            BonusPhase::Revealing => {
                (self.timer as f32 / tuning.bonus_reveal_ticks.max(1) as f32).clamp(0.0, 1.0)
            }
            BonusPhase::Showing | BonusPhase::Fading => 1.0,
        }
    }

    /// Opacity of the content, fading out in the last phase
    pub fn content_alpha(&self, tuning: &Tuning) -> f32 {
        match self.phase {
            BonusPhase::Fading => {
                (1.0 - self.timer as f32 / tuning.bonus_fade_ticks.max(1) as f32).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    pub fn overlay_alpha(&self, tuning: &Tuning) -> f32 {
        OVERLAY_ALPHA * self.content_alpha(tuning)
    }
}
