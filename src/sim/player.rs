//! Player body: steering, gravity, screen wrap, hp and invulnerability

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Horizontal steering input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Idle,
    Right,
}

impl Direction {
    /// -1, 0 or 1
    #[inline]
    pub fn sign(self) -> i8 {
        match self {
            Direction::Left => -1,
            Direction::Idle => 0,
            Direction::Right => 1,
        }
    }
}

/// The platform the player landed on last tick
///
/// Holds the pool slot index, never a reference. The conveyor push is
/// captured at landing time so the following tick does not have to look the
/// slot up again (it may have been recycled in between).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    pub slot: usize,
    pub push: f32,
}

/// The falling player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    /// -1 left, 0 neutral, 1 right
    pub facing: i8,
    /// Ticks of damage immunity left
    pub invulnerable: u32,
    pub alive: bool,
    /// Set by a landing, cleared at the end of the next `update`
    pub ground: Option<Ground>,
    /// 0..4 walk cycle, 0 is idle
    pub walk_frame: u8,
    walk_timer: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.player_width, tuning.player_height);
        Self {
            pos: Vec2::new(tuning.game_width / 2.0 - size.x / 2.0, tuning.player_spawn_y),
            vel: Vec2::ZERO,
            size,
            hp: tuning.start_hp.min(tuning.max_hp),
            max_hp: tuning.max_hp,
            facing: 0,
            invulnerable: 0,
            alive: true,
            ground: None,
            walk_frame: 0,
            walk_timer: 0,
        }
    }

    /// Reset for a new run
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Advance one tick
    pub fn update(&mut self, direction: Direction, scroll_speed: f32, tuning: &Tuning) {
        // Horizontal steering
        if direction != Direction::Idle {
            self.vel.x = f32::from(direction.sign()) * tuning.player_speed;
            self.facing = direction.sign();
        } else {
            self.vel.x *= tuning.damping;
            if self.vel.x.abs() < tuning.stop_threshold {
                self.vel.x = 0.0;
            }
        }

        // Conveyor push from last tick's landing
        if let Some(ground) = self.ground {
            self.vel.x += ground.push;
        }

        self.pos.x += self.vel.x;

        // Screen wrap once fully off one side
        if self.pos.x + self.size.x < 0.0 {
            self.pos.x = tuning.game_width;
        } else if self.pos.x > tuning.game_width {
            self.pos.x = -self.size.x;
        }

        self.vel.y = (self.vel.y + tuning.gravity).min(tuning.max_fall_speed);
        self.pos.y += self.vel.y;

        // Ride the scroll while standing
        if self.ground.is_some() {
            self.pos.y -= scroll_speed;
        }
        self.ground = None;

        self.invulnerable = self.invulnerable.saturating_sub(1);

        // Walk animation
        if self.vel.x.abs() > tuning.walk_threshold {
            self.walk_timer += 1;
            if self.walk_timer > tuning.walk_frame_ticks {
                self.walk_timer = 0;
                self.walk_frame = (self.walk_frame + 1) % 4;
            }
        } else {
            self.walk_frame = 0;
            self.walk_timer = 0;
        }
    }

    /// Stand on a platform whose top is at `platform_top`
    pub fn land_on(&mut self, platform_top: f32, slot: usize, push: f32) {
        self.pos.y = platform_top - self.size.y;
        self.vel.y = 0.0;
        self.ground = Some(Ground { slot, push });
    }

    /// Throw the player upward, leaving any platform
    pub fn launch(&mut self, vy: f32) {
        self.vel.y = vy;
        self.ground = None;
    }

    /// Lose hp unless invulnerable; starts a new invulnerability window
    pub fn take_damage(&mut self, amount: u32, invulnerable_ticks: u32) {
        if self.invulnerable > 0 {
            return;
        }
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.alive = false;
        }
        self.invulnerable = invulnerable_ticks;
    }

    /// Gain hp up to the maximum. No effect once dead.
    pub fn heal(&mut self, amount: u32) {
        if !self.alive {
            return;
        }
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
    }

    #[inline]
    pub fn on_platform(&self) -> bool {
        self.ground.is_some()
    }

    #[inline]
    pub fn feet(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Invulnerability flicker: hidden on two of every four ticks
    pub fn blink_hidden(&self) -> bool {
        self.invulnerable > 0 && self.invulnerable % 4 < 2
    }

    /// Position and velocity are finite numbers
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}
