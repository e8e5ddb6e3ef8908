//! Session shell
//!
//! Owns the simulation together with its side effects. Each [`Session::step`]
//! runs one tick, then routes the tick's events to audio and persistence.

use crate::audio::{AudioSink, sound_for};
use crate::highscores::BestScores;
use crate::persistence::Storage;
use crate::platform::Renderer;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;

pub struct Session<S, A> {
    state: GameState,
    settings: Settings,
    storage: S,
    audio: A,
    /// Window has focus (sound may be muted on blur)
    focused: bool,
}

impl<S: Storage, A: AudioSink> Session<S, A> {
    /// Load tuning, settings and best scores from `storage`
    pub fn new(storage: S, audio: A, seed: u64) -> Self {
        let tuning = Tuning::load(&storage);
        Self::with_tuning(storage, audio, tuning, seed)
    }

    /// Like [`Session::new`] with an explicit tuning
    pub fn with_tuning(storage: S, audio: A, tuning: Tuning, seed: u64) -> Self {
        let best = BestScores::load(&storage);
        let settings = Settings::load(&storage);
        log::info!(
            "Session ready: seed {}, best {}, sound {}",
            seed,
            best.best().unwrap_or(0),
            if settings.sound_enabled { "on" } else { "off" }
        );
        Self {
            state: GameState::new(tuning, seed, best),
            settings,
            storage,
            audio,
            focused: true,
        }
    }

    /// Run one tick and dispatch its events
    pub fn step(&mut self, input: &TickInput) {
        tick(&mut self.state, input);

        if !self.state.player.is_finite() {
            log::warn!(
                "Player state corrupted (pos {:?}, vel {:?}), resetting to menu",
                self.state.player.pos,
                self.state.player.vel
            );
            self.state.abort_to_menu();
            return;
        }

        let volume = self.volume();
        for event in self.state.take_events() {
            if volume > 0.0 {
                if let Some(effect) = sound_for(&event) {
                    self.audio.play(effect, volume);
                }
            }
            if let GameEvent::GameOver { .. } = event {
                self.state.best.save(&mut self.storage);
            }
        }
    }

    /// Hand the current state to a renderer
    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.render(&self.state);
    }

    /// Volume after settings and focus muting
    pub fn volume(&self) -> f32 {
        if !self.focused && self.settings.mute_on_blur {
            0.0
        } else {
            self.settings.effective_volume()
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Replace and persist the settings
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.settings.save(&mut self.storage);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use crate::consts::{HIGH_SCORES_KEY, SETTINGS_KEY, TUNING_KEY};
    use crate::persistence::MemoryStorage;
    use crate::sim::GamePhase;

    /// Remembers every effect played
    #[derive(Default)]
    struct RecordingAudio {
        played: Vec<(SoundEffect, f32)>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.played.push((effect, volume));
        }
    }

    struct CountingRenderer {
        frames: u32,
        last_phase: Option<GamePhase>,
    }

    impl Renderer for CountingRenderer {
        fn render(&mut self, state: &GameState) {
            self.frames += 1;
            self.last_phase = Some(state.phase);
        }
    }

    const CONFIRM: TickInput = TickInput {
        direction: crate::sim::Direction::Idle,
        confirm: true,
        idle_mode: false,
    };

    fn session_with_scores(json: &str) -> Session<MemoryStorage, RecordingAudio> {
        let mut storage = MemoryStorage::new();
        storage.insert(HIGH_SCORES_KEY, json);
        Session::new(storage, RecordingAudio::default(), 42)
    }

    fn finish_run(session: &mut Session<MemoryStorage, RecordingAudio>, score: u32) {
        session.step(&CONFIRM);
        assert!(session.state().is_playing());
        session.state_mut().score = score;
        session.state_mut().player.pos.y = 1000.0;
        session.step(&TickInput::default());
        assert_eq!(session.state().phase, GamePhase::GameOver);
    }

    #[test]
    fn test_equal_score_stacks_without_record() {
        let mut session = session_with_scores("[50]");
        finish_run(&mut session, 50);
        assert!(!session.state().is_new_record);
        assert_eq!(session.storage().get(HIGH_SCORES_KEY), Some("[50,50]"));
    }

    #[test]
    fn test_higher_score_is_new_record() {
        let mut session = session_with_scores("[50]");
        finish_run(&mut session, 80);
        assert!(session.state().is_new_record);
        assert_eq!(session.state().best_score(), 80);
        assert_eq!(session.storage().get(HIGH_SCORES_KEY), Some("[80,50]"));
    }

    #[test]
    fn test_events_reach_audio() {
        let mut session = session_with_scores("[]");
        finish_run(&mut session, 3);
        let effects: Vec<SoundEffect> = session.audio().played.iter().map(|(e, _)| *e).collect();
        assert_eq!(effects.first(), Some(&SoundEffect::MenuSelect));
        assert_eq!(effects.last(), Some(&SoundEffect::GameOver));
        assert!(session.audio().played.iter().all(|(_, v)| (*v - 0.8).abs() < 1e-6));
    }

    #[test]
    fn test_sound_disabled_is_silent() {
        let mut storage = MemoryStorage::new();
        storage.insert(SETTINGS_KEY, r#"{"sound_enabled": false}"#);
        let mut session = Session::new(storage, RecordingAudio::default(), 1);
        session.step(&CONFIRM);
        assert!(session.audio().played.is_empty());
    }

    #[test]
    fn test_blur_mutes_when_configured() {
        let mut session = session_with_scores("[]");
        session.set_focused(false);
        assert_eq!(session.volume(), 0.0);
        session.step(&CONFIRM);
        assert!(session.audio().played.is_empty());

        session.set_settings(Settings {
            mute_on_blur: false,
            ..Default::default()
        });
        assert!(session.volume() > 0.0);
        assert!(session.storage().get(SETTINGS_KEY).is_some());
    }

    #[test]
    fn test_tuning_comes_from_storage() {
        let mut storage = MemoryStorage::new();
        storage.insert(TUNING_KEY, r#"{"max_hp": 3, "start_hp": 3}"#);
        let mut session = Session::new(storage, RecordingAudio::default(), 1);
        session.step(&CONFIRM);
        assert_eq!(session.state().player.hp, 3);
    }

    #[test]
    fn test_corrupted_player_resets_to_menu() {
        let mut session = session_with_scores("[7]");
        session.step(&CONFIRM);
        session.state_mut().player.vel.x = f32::NAN;
        session.step(&TickInput::default());
        assert_eq!(session.state().phase, GamePhase::Menu);
        assert!(session.state().player.is_finite());
        // Nothing recorded for the aborted run
        assert_eq!(session.state().best.as_slice(), &[7]);
    }

    #[test]
    fn test_demo_mode_runs_unattended() {
        let mut session = Session::new(MemoryStorage::new(), crate::audio::NullAudio, 5);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..5000 {
            session.step(&input);
        }
        assert!(session.state().runs >= 1);
        assert!(session.state().player.is_finite());
    }

    #[test]
    fn test_render_sees_state() {
        let session = session_with_scores("[]");
        let mut renderer = CountingRenderer {
            frames: 0,
            last_phase: None,
        };
        session.render(&mut renderer);
        assert_eq!(renderer.frames, 1);
        assert_eq!(renderer.last_phase, Some(GamePhase::Menu));
    }
}
