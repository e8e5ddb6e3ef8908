//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically. One call is
//! one tick at [`SIM_DT`](crate::consts::SIM_DT).

use super::autopilot;
use super::bonus::BonusEvent;
use super::collision::find_landing;
use super::platform::PlatformTag;
use super::player::Direction;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Horizontal steering
    pub direction: Direction,
    /// Confirm/action pressed since the last tick
    pub confirm: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the session by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.frame_count += 1;

    let mut input = *input;
    if input.idle_mode {
        match state.phase {
            GamePhase::Menu | GamePhase::GameOver => input.confirm = true,
            GamePhase::Playing => input.direction = autopilot::steer(state),
            GamePhase::BonusEvent(_) => {}
        }
    }

    match state.phase {
        GamePhase::Menu => {
            if input.confirm {
                state.start_run();
            }
        }

        GamePhase::Playing => update_playing(state, input.direction),

        GamePhase::BonusEvent(mut bonus) => {
            if bonus.update(input.confirm, &state.tuning) {
                log::debug!("Bonus finished, back to play");
                state.phase = GamePhase::Playing;
            } else {
                state.phase = GamePhase::BonusEvent(bonus);
            }
        }

        GamePhase::GameOver => {
            state.gameover_ticks += 1;
            if state.gameover_ticks > state.tuning.gameover_delay_ticks && input.confirm {
                log::debug!("Back to menu");
                state.phase = GamePhase::Menu;
                state.frame_count = 0;
            }
        }
    }
}

fn update_playing(state: &mut GameState, direction: Direction) {
    let was_standing = state.player.on_platform();

    // 1. Player physics
    state.player.update(direction, state.scroll_speed, &state.tuning);

    // 2. Scroll and recycle; one point per recycled platform
    let before = state.pool.recycled_count();
    state.pool.update(state.scroll_speed, &state.tuning);
    let recycled = state.pool.recycled_count() - before;
    if recycled > 0 {
        let gained = u32::try_from(recycled).unwrap_or(u32::MAX);
        state.score = state
            .score
            .saturating_add(gained.saturating_mul(state.tuning.score_per_platform));
        state.update_difficulty();
    }

    // 3. Bonus milestone, once per run
    if !state.bonus_seen && state.score >= state.tuning.bonus_threshold {
        log::info!("Bonus event at score {}", state.score);
        state.bonus_seen = true;
        state.phase = GamePhase::BonusEvent(BonusEvent::start());
        state.events.push(GameEvent::BonusStarted);
        return;
    }

    // 4. Landings
    check_collisions(state, was_standing);

    // 5. Terminal conditions
    if state.player.pos.y > state.tuning.game_height || !state.player.alive {
        state.game_over();
        return;
    }

    let ceiling = state.tuning.ceiling_line();
    if state.player.pos.y < ceiling {
        state
            .player
            .take_damage(state.tuning.ceiling_damage, state.tuning.invulnerable_ticks);
        state.player.pos.y = ceiling;
        state.player.vel.y = state.tuning.ceiling_push_vy;
        state.events.push(GameEvent::Damaged);
        if !state.player.alive {
            state.game_over();
        }
    }
}

/// Land the player on the first platform crossed this tick, if any
fn check_collisions(state: &mut GameState, was_standing: bool) {
    let tuning = &state.tuning;
    let player_box = state.player.bounds();
    let hit = find_landing(
        &player_box,
        state.player.vel.y,
        state.scroll_speed,
        state.pool.active().map(|(slot, p)| (slot, p.bounds())),
    );
    let Some(slot) = hit else {
        return;
    };
    let Some(platform) = state.pool.slot_mut(slot) else {
        return;
    };

    let hp_before = state.player.hp;
    state
        .player
        .land_on(platform.top(), slot, platform.conveyor_push(tuning));
    platform.on_land(&mut state.player, tuning);
    log::trace!("Landed on slot {} ({:?})", slot, platform.kind.tag());

    let hp_after = state.player.hp;
    if hp_after < hp_before {
        state.events.push(GameEvent::Damaged);
    } else if platform.kind.tag() == PlatformTag::Spring {
        state.events.push(GameEvent::SpringBounce);
    } else {
        if !was_standing {
            state.events.push(GameEvent::Landed);
        }
        if hp_after > hp_before {
            state.events.push(GameEvent::Healed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::BestScores;
    use crate::sim::platform::PlatformKind;
    use crate::tuning::Tuning;

    const CONFIRM: TickInput = TickInput {
        direction: Direction::Idle,
        confirm: true,
        idle_mode: false,
    };

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(Tuning::default(), seed, BestScores::new());
        tick(&mut state, &CONFIRM);
        assert_eq!(state.phase, GamePhase::Playing);
        state.take_events();
        state
    }

    /// Push slot 0 off the top so the next tick recycles it
    fn force_recycle(state: &mut GameState) {
        state.pool.slot_mut(0).unwrap().pos.y = -100.0;
    }

    /// Put slot 0 right under the player as a platform of `kind`
    fn platform_under_player(state: &mut GameState, kind: PlatformKind) {
        let x = state.player.pos.x - 20.0;
        let top = state.player.feet() + 6.0;
        let p = state.pool.slot_mut(0).unwrap();
        p.kind = kind;
        p.pos.x = x;
        p.pos.y = top;
    }

    fn tick_until_event(state: &mut GameState, wanted: GameEvent, max_ticks: u32) -> Vec<GameEvent> {
        for _ in 0..max_ticks {
            tick(state, &TickInput::default());
            let events = state.take_events();
            if events.contains(&wanted) {
                return events;
            }
        }
        panic!("no {wanted:?} within {max_ticks} ticks");
    }

    #[test]
    fn test_tick_menu_to_playing() {
        let mut state = GameState::new(Tuning::default(), 1, BestScores::new());

        // Tick without confirm - should stay in Menu
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Menu);

        tick(&mut state, &CONFIRM);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.runs, 1);
        assert_eq!(state.take_events(), vec![GameEvent::MenuSelect]);
    }

    #[test]
    fn test_recycle_scores_and_levels_up_at_ten() {
        let mut state = playing(2);
        state.score = 9;
        force_recycle(&mut state);
        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 10);
        assert_eq!(state.level, 1);
        assert_eq!(state.pool.level(), 1);
        let expected = state.tuning.base_speed + state.tuning.speed_increment;
        assert!((state.scroll_speed - expected).abs() < 1e-6);
        assert!(state.take_events().contains(&GameEvent::LevelUp { level: 1 }));
    }

    #[test]
    fn test_score_level_speed_invariants_over_a_run() {
        let mut state = playing(11);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut last_score = 0;
        for _ in 0..3000 {
            tick(&mut state, &input);
            if state.phase == GamePhase::Playing {
                assert!(state.score >= last_score);
                last_score = state.score;
            }
            assert_eq!(state.level, state.score / state.tuning.level_interval);
            assert_eq!(state.scroll_speed, state.tuning.scroll_speed_for_level(state.level));
            assert!(state.player.hp <= state.player.max_hp);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
    }

    #[test]
    fn test_bonus_triggers_once_per_run() {
        let mut state = playing(3);
        state.score = 99;
        force_recycle(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 100);
        assert!(matches!(state.phase, GamePhase::BonusEvent(_)));
        assert!(state.take_events().contains(&GameEvent::BonusStarted));

        // Gameplay is frozen while the bonus runs
        let frozen = state.player.pos;
        let tops: Vec<f32> = state.pool.slots().iter().map(|p| p.pos.y).collect();
        let mut ticks = 0;
        while matches!(state.phase, GamePhase::BonusEvent(_)) {
            tick(&mut state, &TickInput::default());
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos, frozen);
        let after: Vec<f32> = state.pool.slots().iter().map(|p| p.pos.y).collect();
        assert_eq!(tops, after);

        // Crossing 150 later does not trigger again
        state.score = 149;
        force_recycle(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 150);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.take_events().contains(&GameEvent::BonusStarted));
    }

    #[test]
    fn test_bonus_rearms_on_new_run() {
        let mut state = playing(3);
        state.bonus_seen = true;
        state.game_over();
        state.gameover_ticks = state.tuning.gameover_delay_ticks + 1;
        tick(&mut state, &CONFIRM);
        tick(&mut state, &CONFIRM);
        assert!(state.is_playing());
        assert!(!state.bonus_seen);
    }

    #[test]
    fn test_bonus_skip_while_showing() {
        let mut state = playing(4);
        state.phase = GamePhase::BonusEvent(BonusEvent::start());
        for _ in 0..state.tuning.bonus_reveal_ticks {
            tick(&mut state, &CONFIRM);
        }
        assert!(matches!(state.phase, GamePhase::BonusEvent(b) if b.phase == crate::sim::BonusPhase::Showing));
        tick(&mut state, &CONFIRM);
        assert!(matches!(state.phase, GamePhase::BonusEvent(b) if b.phase == crate::sim::BonusPhase::Fading));
    }

    #[test]
    fn test_landing_on_normal_heals() {
        let mut state = playing(5);
        state.player.hp = 5;
        platform_under_player(&mut state, PlatformKind::Normal);

        let events = tick_until_event(&mut state, GameEvent::Landed, 60);
        assert!(events.contains(&GameEvent::Healed));
        assert_eq!(state.player.hp, 6);
        assert!(state.player.on_platform());
        assert_eq!(state.player.ground.map(|g| g.slot), Some(0));
        assert!((state.player.feet() - state.pool.slots()[0].top()).abs() < 1e-4);
        assert_eq!(state.player.vel.y, 0.0);

        // Standing keeps the player on the platform without a second Landed
        tick(&mut state, &TickInput::default());
        let events = state.take_events();
        assert!(!events.contains(&GameEvent::Landed));
        assert!(state.player.on_platform());
        assert!((state.player.feet() - state.pool.slots()[0].top()).abs() < 1e-4);
    }

    #[test]
    fn test_landing_on_spike_hurts() {
        let mut state = playing(6);
        platform_under_player(&mut state, PlatformKind::Spike);
        tick_until_event(&mut state, GameEvent::Damaged, 60);
        assert_eq!(state.player.hp, 5);
        assert!(state.player.invulnerable > 0);
        assert!(state.is_playing());
    }

    #[test]
    fn test_spring_launches() {
        let mut state = playing(7);
        platform_under_player(
            &mut state,
            PlatformKind::Spring {
                compressed: false,
                ticks_left: 0,
            },
        );
        tick_until_event(&mut state, GameEvent::SpringBounce, 60);
        assert_eq!(state.player.vel.y, state.tuning.spring_bounce_vy);
        assert!(!state.player.on_platform());
        assert!(state.pool.slots()[0].spring_compressed());
    }

    #[test]
    fn test_conveyor_pushes_next_tick() {
        let mut state = playing(8);
        platform_under_player(
            &mut state,
            PlatformKind::Conveyor {
                direction: 1,
                arrow_offset: 0.0,
            },
        );
        tick_until_event(&mut state, GameEvent::Landed, 60);
        let x = state.player.pos.x;
        tick(&mut state, &TickInput::default());
        assert!(state.player.pos.x > x);
    }

    #[test]
    fn test_no_tunneling_at_max_speed() {
        let mut state = playing(9);
        state.scroll_speed = state.tuning.max_speed;
        state.player.vel.y = state.tuning.max_fall_speed;
        // Next tick: feet move +8, the platform moves -3.5; start 4 apart
        let top = state.player.feet() + 4.0;
        let x = state.player.pos.x - 20.0;
        {
            let p = state.pool.slot_mut(0).unwrap();
            p.kind = PlatformKind::Normal;
            p.pos.x = x;
            p.pos.y = top;
        }
        tick(&mut state, &TickInput::default());
        assert!(state.player.on_platform());
        assert!((state.player.feet() - (top - state.tuning.max_speed)).abs() < 1e-4);
    }

    #[test]
    fn test_rising_player_passes_through() {
        let mut state = playing(10);
        platform_under_player(&mut state, PlatformKind::Normal);
        state.player.vel.y = -6.0;
        tick(&mut state, &TickInput::default());
        assert!(!state.player.on_platform());
    }

    #[test]
    fn test_fall_off_bottom_ends_run() {
        let mut state = playing(12);
        state.player.pos.y = state.tuning.game_height + 1.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.take_events().contains(&GameEvent::GameOver {
            score: 0,
            new_record: false
        }));
    }

    #[test]
    fn test_ceiling_hurts_and_pushes_down() {
        let mut state = playing(13);
        state.player.pos.y = 5.0;
        state.player.vel.y = -5.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.hp, 5);
        assert_eq!(state.player.pos.y, state.tuning.ceiling_line());
        assert_eq!(state.player.vel.y, state.tuning.ceiling_push_vy);
        assert!(state.is_playing());
        assert!(state.take_events().contains(&GameEvent::Damaged));
    }

    #[test]
    fn test_ceiling_can_kill() {
        let mut state = playing(14);
        state.player.hp = 3;
        state.player.pos.y = 5.0;
        state.player.vel.y = -5.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.player.hp, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_game_over_records_scores() {
        let mut state = GameState::new(Tuning::default(), 15, BestScores::from_scores(vec![50]));
        tick(&mut state, &CONFIRM);
        state.score = 50;
        state.player.pos.y = 1000.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.best.as_slice(), &[50, 50]);
        assert!(!state.is_new_record);

        let mut state = GameState::new(Tuning::default(), 15, BestScores::from_scores(vec![50]));
        tick(&mut state, &CONFIRM);
        state.score = 80;
        state.player.pos.y = 1000.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.best.as_slice(), &[80, 50]);
        assert!(state.is_new_record);
        assert_eq!(state.best_score(), 80);
    }

    #[test]
    fn test_game_over_waits_before_menu() {
        let mut state = playing(16);
        state.player.pos.y = 1000.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        for _ in 0..state.tuning.gameover_delay_ticks {
            tick(&mut state, &CONFIRM);
            assert_eq!(state.phase, GamePhase::GameOver);
        }
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        tick(&mut state, &CONFIRM);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.frame_count, 0);
    }

    #[test]
    fn test_idle_mode_starts_and_plays() {
        let mut state = GameState::new(Tuning::default(), 17, BestScores::new());
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!(state.is_playing());
        for _ in 0..120 {
            tick(&mut state, &input);
        }
        assert!(state.runs >= 1);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(Tuning::default(), 99999, BestScores::new());
        let mut state2 = GameState::new(Tuning::default(), 99999, BestScores::new());

        let inputs = [
            CONFIRM,
            TickInput {
                direction: Direction::Left,
                ..Default::default()
            },
            TickInput {
                direction: Direction::Right,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..300 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.pool.slots(), state2.pool.slots());
    }
}
