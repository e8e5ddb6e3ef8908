//! Shaft Fall entry point
//!
//! Native build runs a headless demo: the autopilot plays a few runs against
//! file-backed storage and the HUD is written to the log.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use shaft_fall::Session;
    use shaft_fall::audio::LogAudio;
    use shaft_fall::consts::{MAX_SUBSTEPS, SIM_DT};
    use shaft_fall::persistence::FileStorage;
    use shaft_fall::platform::Renderer;
    use shaft_fall::sim::{GamePhase, GameState, TickInput};

    /// Runs to play before exiting
    const DEMO_RUNS: u32 = 3;
    /// Simulated frame time (a 30 fps display)
    const FRAME_DT: f32 = 1.0 / 30.0;
    /// Hard stop in case the autopilot survives forever
    const MAX_FRAMES: u64 = 30 * 60 * 30;

    /// Writes the HUD to the log instead of drawing it
    #[derive(Default)]
    struct HudLog {
        last_phase: Option<GamePhase>,
        last_level: u32,
    }

    impl Renderer for HudLog {
        fn render(&mut self, state: &GameState) {
            let phase_changed = self.last_phase.as_ref().map(std::mem::discriminant)
                != Some(std::mem::discriminant(&state.phase));
            if phase_changed {
                log::info!(
                    "[{:?}] score {} level {} hp {}/{} best {}",
                    state.phase,
                    state.score,
                    state.level,
                    state.player.hp,
                    state.player.max_hp,
                    state.best_score()
                );
            } else if state.level != self.last_level {
                log::info!("Level {} (speed {:.2})", state.level, state.scroll_speed);
            }
            self.last_phase = Some(state.phase);
            self.last_level = state.level;
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Shaft Fall (native, headless demo) starting...");

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut session = Session::new(FileStorage::new("saves"), LogAudio::new(), seed);
        let mut hud = HudLog::default();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        let mut accumulator = 0.0f32;
        let mut frames = 0u64;
        loop {
            accumulator += FRAME_DT;
            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                session.step(&input);
                accumulator -= SIM_DT;
                substeps += 1;
            }
            session.render(&mut hud);

            frames += 1;
            let state = session.state();
            let done = state.runs > DEMO_RUNS
                || (state.runs == DEMO_RUNS && state.phase == GamePhase::GameOver);
            if done || frames >= MAX_FRAMES {
                break;
            }
        }

        let state = session.state();
        log::info!(
            "Demo finished after {} frames: {} runs, best scores {:?}, {} sounds",
            frames,
            state.runs,
            state.best.as_slice(),
            session.audio().played()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web build embeds the library; there is no binary entry point
}
