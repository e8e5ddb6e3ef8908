//! Platform pool: spawning, scrolling and recycling
//!
//! The pool is a fixed set of slots. Platforms that scroll off the top are
//! reset in place below the lowest platform, so slot indices stay stable for
//! the whole run. Every recycle bumps a counter the scoring reads.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::platform::{Platform, PlatformKind, PlatformTag};
use crate::tuning::{SpawnWeights, Tuning};

/// Spawn weight of every variant at `level`, in [`PlatformTag::ALL`] order
pub fn spawn_weights(level: u32, w: &SpawnWeights) -> [(PlatformTag, f32); 5] {
    let l = level.min(w.level_ceiling) as f32;
    [
        (PlatformTag::Normal, (w.normal_base - l * w.normal_decay).max(w.normal_floor)),
        (PlatformTag::Spike, (w.spike_base + l * w.spike_growth).min(w.spike_cap)),
        (PlatformTag::Conveyor, w.conveyor),
        (PlatformTag::Crumble, (w.crumble_base + l * w.crumble_growth).min(w.crumble_cap)),
        (PlatformTag::Spring, w.spring),
    ]
}

/// Pick an item with probability proportional to its weight
///
/// Draws uniformly in `[0, total)` and subtracts weights in order until the
/// remainder drops to zero or below. Falls back to the first item if float
/// rounding leaves a remainder; `None` only for an empty slice.
pub fn weighted_choice<T: Copy, R: Rng>(rng: &mut R, items: &[(T, f32)]) -> Option<T> {
    let total: f32 = items.iter().map(|(_, w)| w.max(0.0)).sum();
    let mut r = rng.random::<f32>() * total;
    for &(item, weight) in items {
        if weight <= 0.0 {
            continue;
        }
        r -= weight;
        if r <= 0.0 {
            return Some(item);
        }
    }
    items.first().map(|&(item, _)| item)
}

/// Fixed-size collection of platform slots
#[derive(Debug, Clone)]
pub struct PlatformPool {
    slots: Vec<Platform>,
    /// Difficulty level driving spawn weights (set by the game)
    level: u32,
    /// Total recycles this run
    recycled: u64,
    rng: Pcg32,
}

impl PlatformPool {
    /// Create a populated pool
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        let mut pool = Self {
            slots: Vec::with_capacity(tuning.platform_count),
            level: 0,
            recycled: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        pool.init(tuning, seed);
        pool
    }

    /// Repopulate for a new run
    ///
    /// Slots are evenly spaced downward from the start height. The leading
    /// slots are always Normal so a run never opens on a hazard.
    pub fn init(&mut self, tuning: &Tuning, seed: u64) {
        debug_assert!(tuning.platform_count > 0, "platform pool must not be empty");

        self.rng = Pcg32::seed_from_u64(seed);
        self.slots.clear();
        self.level = 0;
        self.recycled = 0;

        for i in 0..tuning.platform_count {
            let x = self.random_x(tuning);
            let y = tuning.platform_start_y + i as f32 * tuning.platform_gap_y;
            let kind = if i < tuning.safe_start_count {
                PlatformKind::Normal
            } else {
                self.random_kind(tuning)
            };
            self.slots.push(Platform::new(Vec2::new(x, y), kind, tuning));
        }
    }

    /// Scroll every platform, then recycle the ones that left the screen
    ///
    /// Returns how many slots were recycled this tick.
    pub fn update(&mut self, scroll_speed: f32, tuning: &Tuning) -> u32 {
        debug_assert!(scroll_speed >= 0.0, "negative scroll speed: {scroll_speed}");

        for platform in &mut self.slots {
            platform.update(scroll_speed, tuning);
        }

        let mut recycled = 0;
        let mut lowest = self.lowest_y();
        for index in 0..self.slots.len() {
            if Self::off_screen(&self.slots[index], tuning) {
                self.recycle(index, lowest, tuning);
                recycled += 1;
                // Stack the next one under this one, not under the pre-tick lowest
                lowest = self.lowest_y();
            }
        }
        recycled
    }

    /// Scrolled past the top, or fell apart above the top edge
    fn off_screen(platform: &Platform, tuning: &Tuning) -> bool {
        platform.pos.y + platform.size.y < -tuning.recycle_tolerance
            || (!platform.active && platform.pos.y < 0.0)
    }

    fn recycle(&mut self, index: usize, lowest: f32, tuning: &Tuning) {
        let pos = Vec2::new(self.random_x(tuning), lowest + tuning.platform_gap_y);
        let kind = self.random_kind(tuning);
        log::trace!("Recycling slot {} as {:?} at y={}", index, kind.tag(), pos.y);
        if let Some(slot) = self.slots.get_mut(index) {
            slot.respawn(pos, kind);
        }
        self.recycled += 1;
    }

    /// Largest y (lowest on screen) of any platform, floored at 0
    pub fn lowest_y(&self) -> f32 {
        self.slots.iter().map(|p| p.pos.y).fold(0.0, f32::max)
    }

    fn random_x(&mut self, tuning: &Tuning) -> f32 {
        let (lo, hi) = tuning.spawn_x_range();
        self.rng.random_range(lo..=hi)
    }

    fn random_kind(&mut self, tuning: &Tuning) -> PlatformKind {
        let weights = spawn_weights(self.level, &tuning.spawn);
        let tag = weighted_choice(&mut self.rng, &weights).unwrap_or(PlatformTag::Normal);
        let direction = if self.rng.random_bool(0.5) { -1 } else { 1 };
        PlatformKind::fresh(tag, direction, tuning)
    }

    /// Active platforms with their slot index, in slot order
    pub fn active(&self) -> impl Iterator<Item = (usize, &Platform)> + '_ {
        self.slots.iter().enumerate().filter(|(_, p)| p.active)
    }

    /// Every slot, active or not
    pub fn slots(&self) -> &[Platform] {
        &self.slots
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Platform> {
        self.slots.get_mut(index)
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    pub fn recycled_count(&self) -> u64 {
        self.recycled
    }
}
