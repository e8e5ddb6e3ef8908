//! Collision detection between the falling player and scrolling platforms
//!
//! Platforms are thin and both bodies move every tick, so a same-frame
//! overlap test misses fast passes. Landings are detected by sweeping the
//! player's feet and the platform top across the tick instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Open-interval overlap on the x axis (touching edges do not count)
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.right() > other.left() && self.left() < other.right()
    }
}

/// Swept landing test for one tick
///
/// `feet` is the player's feet now and `vy` the distance they moved down
/// this tick. `platform_top` is the platform top now; it moved up by
/// `scroll_speed` this tick. The player lands when the feet were at or above
/// the platform's old top and are now at or below its new top.
#[inline]
pub fn swept_landing(feet: f32, vy: f32, platform_top: f32, scroll_speed: f32) -> bool {
    let prev_feet = feet - vy;
    let prev_top = platform_top + scroll_speed;
    prev_feet <= prev_top && feet >= platform_top
}

/// First platform the player lands on this tick, in iteration order
///
/// Only a falling player (`vy > 0`) can land. `platforms` yields
/// `(slot, bounds)` pairs; the winning slot is returned.
pub fn find_landing(
    player: &Aabb,
    vy: f32,
    scroll_speed: f32,
    platforms: impl IntoIterator<Item = (usize, Aabb)>,
) -> Option<usize> {
    if vy <= 0.0 {
        return None;
    }
    let feet = player.bottom();
    platforms
        .into_iter()
        .find(|(_, plat)| player.overlaps_x(plat) && swept_landing(feet, vy, plat.top(), scroll_speed))
        .map(|(slot, _)| slot)
}
