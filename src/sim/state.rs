//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`].

use serde::{Deserialize, Serialize};

use super::bonus::BonusEvent;
use super::player::Player;
use super::pool::PlatformPool;
use crate::highscores::BestScores;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for confirm
    Menu,
    /// Active gameplay
    Playing,
    /// Gameplay frozen for the bonus interlude
    BonusEvent(BonusEvent),
    /// Run ended
    GameOver,
}

/// Something that happened during a tick (drives sounds and persistence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Landed on a platform without losing hp
    Landed,
    /// Hp went up on a landing
    Healed,
    /// Hurt by a spike platform or the ceiling
    Damaged,
    SpringBounce,
    LevelUp { level: u32 },
    BonusStarted,
    GameOver { score: u32, new_record: bool },
    /// A run was started from the menu
    MenuSelect,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Session seed; each run derives its own from this
    pub seed: u64,
    pub phase: GamePhase,
    pub score: u32,
    pub level: u32,
    pub scroll_speed: f32,
    pub player: Player,
    pub pool: PlatformPool,
    pub best: BestScores,
    /// Last finished run set a new best
    pub is_new_record: bool,
    /// Bonus event already shown this run
    pub bonus_seen: bool,
    /// Ticks spent in GameOver
    pub gameover_ticks: u32,
    /// Ticks since entering the current screen (menu animation clock)
    pub frame_count: u64,
    /// Runs started this session
    pub runs: u32,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session sitting on the menu
    pub fn new(tuning: Tuning, seed: u64, best: BestScores) -> Self {
        let player = Player::new(&tuning);
        let pool = PlatformPool::new(&tuning, seed);
        Self {
            scroll_speed: tuning.base_speed,
            tuning,
            seed,
            phase: GamePhase::Menu,
            score: 0,
            level: 0,
            player,
            pool,
            best,
            is_new_record: false,
            bonus_seen: false,
            gameover_ticks: 0,
            frame_count: 0,
            runs: 0,
            events: Vec::new(),
        }
    }

    /// Seed for the `run`-th run of this session
    pub fn run_seed(&self, run: u32) -> u64 {
        (run as u64).wrapping_mul(2654435761).wrapping_add(self.seed)
    }

    /// Reset everything run-scoped and start playing
    pub fn start_run(&mut self) {
        self.runs += 1;
        let seed = self.run_seed(self.runs);
        log::info!("Run {} starting with seed {}", self.runs, seed);

        self.phase = GamePhase::Playing;
        self.score = 0;
        self.level = 0;
        self.scroll_speed = self.tuning.base_speed;
        self.is_new_record = false;
        self.bonus_seen = false;
        self.gameover_ticks = 0;
        self.player.reset(&self.tuning);
        self.pool.init(&self.tuning, seed);
        self.events.push(GameEvent::MenuSelect);
    }

    /// Derive level and scroll speed from the score
    pub fn update_difficulty(&mut self) {
        let level = self.score / self.tuning.level_interval.max(1);
        if level != self.level {
            log::debug!("Level {} -> {}", self.level, level);
            self.events.push(GameEvent::LevelUp { level });
        }
        self.level = level;
        self.scroll_speed = self.tuning.scroll_speed_for_level(level);
        self.pool.set_level(level);
    }

    /// End the run and record the score
    pub fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.gameover_ticks = 0;
        self.is_new_record = self.best.record(self.score);
        log::info!(
            "Game over: score {} (best {}){}",
            self.score,
            self.best.best().unwrap_or(0),
            if self.is_new_record { ", new record!" } else { "" }
        );
        self.events.push(GameEvent::GameOver {
            score: self.score,
            new_record: self.is_new_record,
        });
    }

    /// Drop the current run and go back to the menu without recording it
    pub fn abort_to_menu(&mut self) {
        self.phase = GamePhase::Menu;
        self.frame_count = 0;
        self.player.reset(&self.tuning);
        self.events.clear();
    }

    /// Take all events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Top score on record, 0 when none
    pub fn best_score(&self) -> u32 {
        self.best.best().unwrap_or(0)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_sits_on_menu() {
        let state = GameState::new(Tuning::default(), 1, BestScores::new());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.runs, 0);
        assert_eq!(state.best_score(), 0);
    }

    #[test]
    fn test_start_run_resets_run_state() {
        let mut state = GameState::new(Tuning::default(), 1, BestScores::new());
        state.score = 42;
        state.level = 4;
        state.scroll_speed = 3.0;
        state.bonus_seen = true;
        state.player.hp = 1;
        state.start_run();
        assert!(state.is_playing());
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 0);
        assert_eq!(state.scroll_speed, state.tuning.base_speed);
        assert!(!state.bonus_seen);
        assert_eq!(state.player.hp, state.tuning.start_hp);
        assert_eq!(state.pool.recycled_count(), 0);
        assert_eq!(state.take_events(), vec![GameEvent::MenuSelect]);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_runs_get_different_seeds() {
        let state = GameState::new(Tuning::default(), 99, BestScores::new());
        assert_ne!(state.run_seed(1), state.run_seed(2));
    }

    #[test]
    fn test_difficulty_follows_score() {
        let mut state = GameState::new(Tuning::default(), 1, BestScores::new());
        state.score = 25;
        state.update_difficulty();
        assert_eq!(state.level, 2);
        assert_eq!(state.pool.level(), 2);
        assert!((state.scroll_speed - 0.88).abs() < 1e-5);
        assert_eq!(state.take_events(), vec![GameEvent::LevelUp { level: 2 }]);
    }
}
