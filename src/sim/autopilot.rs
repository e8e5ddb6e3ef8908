//! Idle/demo mode steering

use super::platform::PlatformTag;
use super::player::Direction;
use super::state::GameState;

/// Horizontal slack before the autopilot bothers steering
const DEAD_ZONE: f32 = 4.0;

/// Steer toward the nearest safe platform below the player's feet
pub fn steer(state: &GameState) -> Direction {
    let player = &state.player;
    let feet = player.feet();
    let center = player.pos.x + player.size.x / 2.0;

    let target = state
        .pool
        .active()
        .map(|(_, p)| p)
        .filter(|p| p.kind.tag() != PlatformTag::Spike && p.top() > feet + 1.0)
        .min_by(|a, b| a.top().total_cmp(&b.top()));

    let Some(target) = target else {
        return Direction::Idle;
    };
    let dx = (target.pos.x + target.size.x / 2.0) - center;
    if dx > DEAD_ZONE {
        Direction::Right
    } else if dx < -DEAD_ZONE {
        Direction::Left
    } else {
        Direction::Idle
    }
}
