//! Sound effects
//!
//! Procedurally generated tones - no external files needed! Each effect is
//! described as a short list of [`Note`]s; a sink turns them into sound.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Feet hit a platform
    Land,
    /// Spikes (platform or ceiling)
    Damage,
    /// Hp went up
    Heal,
    /// Spring launch
    Spring,
    GameOver,
    /// Bonus interlude starts
    Bonus,
    /// Run started from the menu
    MenuSelect,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator burst with an exponential decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub waveform: Waveform,
    /// Frequency at the start of the note (Hz)
    pub freq: f32,
    /// Frequency the note glides to by its end (Hz)
    pub freq_end: f32,
    /// Peak gain before master volume
    pub gain: f32,
    /// Delay from the trigger (seconds)
    pub offset: f64,
    /// Length (seconds)
    pub duration: f64,
}

const fn note(waveform: Waveform, freq: f32, freq_end: f32, gain: f32, offset: f64, duration: f64) -> Note {
    Note {
        waveform,
        freq,
        freq_end,
        gain,
        offset,
        duration,
    }
}

use Waveform::{Sawtooth, Sine, Square, Triangle};

const LAND: &[Note] = &[note(Triangle, 180.0, 60.0, 0.5, 0.0, 0.04)];
const DAMAGE: &[Note] = &[note(Sawtooth, 400.0, 80.0, 0.2, 0.0, 0.25)];
const HEAL: &[Note] = &[
    note(Sine, 523.0, 523.0, 0.1, 0.0, 0.08),
    note(Sine, 659.0, 659.0, 0.1, 0.08, 0.08),
];
const SPRING: &[Note] = &[
    note(Triangle, 200.0, 800.0, 0.2, 0.0, 0.05),
    note(Triangle, 800.0, 300.0, 0.2, 0.05, 0.15),
];
const GAME_OVER: &[Note] = &[
    note(Sine, 440.0, 440.0, 0.15, 0.0, 0.17),
    note(Sine, 349.0, 349.0, 0.15, 0.18, 0.17),
    note(Sine, 294.0, 294.0, 0.15, 0.36, 0.17),
    note(Sine, 220.0, 220.0, 0.15, 0.54, 0.17),
];
const BONUS: &[Note] = &[
    note(Sine, 523.0, 523.0, 0.15, 0.0, 0.3),
    note(Sine, 659.0, 659.0, 0.15, 0.15, 0.3),
    note(Sine, 784.0, 784.0, 0.15, 0.30, 0.3),
    note(Sine, 1047.0, 1047.0, 0.15, 0.45, 0.3),
];
const MENU_SELECT: &[Note] = &[note(Square, 600.0, 900.0, 0.1, 0.0, 0.08)];

impl SoundEffect {
    pub const ALL: [SoundEffect; 7] = [
        SoundEffect::Land,
        SoundEffect::Damage,
        SoundEffect::Heal,
        SoundEffect::Spring,
        SoundEffect::GameOver,
        SoundEffect::Bonus,
        SoundEffect::MenuSelect,
    ];

    /// Tone description for this effect
    pub fn notes(self) -> &'static [Note] {
        match self {
            SoundEffect::Land => LAND,
            SoundEffect::Damage => DAMAGE,
            SoundEffect::Heal => HEAL,
            SoundEffect::Spring => SPRING,
            SoundEffect::GameOver => GAME_OVER,
            SoundEffect::Bonus => BONUS,
            SoundEffect::MenuSelect => MENU_SELECT,
        }
    }

    /// Total length including the last note's tail (seconds)
    pub fn duration(self) -> f64 {
        self.notes()
            .iter()
            .map(|n| n.offset + n.duration)
            .fold(0.0, f64::max)
    }
}

/// Sound to play for a simulation event, if any
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::Landed => Some(SoundEffect::Land),
        GameEvent::Healed => Some(SoundEffect::Heal),
        GameEvent::Damaged => Some(SoundEffect::Damage),
        GameEvent::SpringBounce => Some(SoundEffect::Spring),
        GameEvent::BonusStarted => Some(SoundEffect::Bonus),
        GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        GameEvent::MenuSelect => Some(SoundEffect::MenuSelect),
        GameEvent::LevelUp { .. } => None,
    }
}

/// Anything that can play a sound effect
pub trait AudioSink {
    /// Play `effect` at `volume` (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Logs each effect instead of playing it (headless runs)
#[derive(Debug, Default, Clone)]
pub struct LogAudio {
    played: u64,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effects played so far
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.played += 1;
        log::debug!("sfx {:?} at {:.2} ({:.2}s)", effect, volume, effect.duration());
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Note, SoundEffect, Waveform};

    /// Web Audio API backend
    pub struct WebAudio {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn create_osc(ctx: &AudioContext, waveform: Waveform) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_note(ctx: &AudioContext, note: &Note, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, note.waveform) else {
                return;
            };
            let t = ctx.current_time() + note.offset;
            let end = t + note.duration;

            gain.gain().set_value_at_time(vol * note.gain, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.001, end).ok();
            osc.frequency().set_value_at_time(note.freq, t).ok();
            if note.freq_end != note.freq {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(note.freq_end, end)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(end).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            if volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for note in effect.notes() {
                Self::play_note(ctx, note, volume);
            }
        }
    }
}
