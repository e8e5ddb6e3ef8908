//! Platform entity
//!
//! A platform is a fixed-size slab that scrolls up with the shaft. Its
//! behavior is one of a closed set of variants, each with its own landing
//! effect and per-tick state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::player::Player;
use crate::tuning::Tuning;

/// Platform variant and its per-variant state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Heals on landing
    Normal,
    /// Hurts on landing
    Spike,
    /// Heals on landing and pushes a standing player sideways
    Conveyor {
        /// -1 pushes left, 1 pushes right
        direction: i8,
        /// Visual arrow scroll in [0, period)
        arrow_offset: f32,
    },
    /// Heals on landing, then falls apart after a short countdown
    Crumble { crumbling: bool, ticks_left: u32 },
    /// Launches the player upward
    Spring { compressed: bool, ticks_left: u32 },
}

/// Variant tag without payload, used for spawn selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformTag {
    Normal,
    Spike,
    Conveyor,
    Crumble,
    Spring,
}

impl PlatformTag {
    /// Fixed enumeration order for weighted selection
    pub const ALL: [PlatformTag; 5] = [
        PlatformTag::Normal,
        PlatformTag::Spike,
        PlatformTag::Conveyor,
        PlatformTag::Crumble,
        PlatformTag::Spring,
    ];
}

impl PlatformKind {
    /// Fresh state for a newly spawned platform of `tag`
    pub fn fresh(tag: PlatformTag, conveyor_direction: i8, tuning: &Tuning) -> Self {
        match tag {
            PlatformTag::Normal => PlatformKind::Normal,
            PlatformTag::Spike => PlatformKind::Spike,
            PlatformTag::Conveyor => PlatformKind::Conveyor {
                direction: conveyor_direction,
                arrow_offset: 0.0,
            },
            PlatformTag::Crumble => PlatformKind::Crumble {
                crumbling: false,
                ticks_left: tuning.crumble_lifetime_ticks,
            },
            PlatformTag::Spring => PlatformKind::Spring {
                compressed: false,
                ticks_left: 0,
            },
        }
    }

    pub fn tag(&self) -> PlatformTag {
        match self {
            PlatformKind::Normal => PlatformTag::Normal,
            PlatformKind::Spike => PlatformTag::Spike,
            PlatformKind::Conveyor { .. } => PlatformTag::Conveyor,
            PlatformKind::Crumble { .. } => PlatformTag::Crumble,
            PlatformKind::Spring { .. } => PlatformTag::Spring,
        }
    }
}

/// A platform slot in the pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PlatformKind,
    /// Cleared once a crumble platform falls apart; only a recycle sets it again
    pub active: bool,
}

impl Platform {
    pub fn new(pos: Vec2, kind: PlatformKind, tuning: &Tuning) -> Self {
        Self {
            pos,
            size: Vec2::new(tuning.platform_width, tuning.platform_height),
            kind,
            active: true,
        }
    }

    /// Reuse this slot for a freshly generated platform
    pub fn respawn(&mut self, pos: Vec2, kind: PlatformKind) {
        self.pos = pos;
        self.kind = kind;
        self.active = true;
    }

    /// Scroll up and advance variant state by one tick
    pub fn update(&mut self, scroll_speed: f32, tuning: &Tuning) {
        self.pos.y -= scroll_speed;

        match &mut self.kind {
            PlatformKind::Normal | PlatformKind::Spike => {}
            PlatformKind::Conveyor {
                direction,
                arrow_offset,
            } => {
                let period = tuning.conveyor_arrow_period;
                *arrow_offset =
                    (*arrow_offset + f32::from(*direction) * tuning.conveyor_arrow_step).rem_euclid(period);
            }
            PlatformKind::Crumble {
                crumbling,
                ticks_left,
            } => {
                if *crumbling {
                    *ticks_left = ticks_left.saturating_sub(1);
                    if *ticks_left == 0 {
                        self.active = false;
                    }
                }
            }
            PlatformKind::Spring {
                compressed,
                ticks_left,
            } => {
                if *compressed {
                    *ticks_left = ticks_left.saturating_sub(1);
                    if *ticks_left == 0 {
                        *compressed = false;
                    }
                }
            }
        }
    }

    /// Apply this platform's landing effect. Called once per landing.
    pub fn on_land(&mut self, player: &mut Player, tuning: &Tuning) {
        match &mut self.kind {
            PlatformKind::Normal | PlatformKind::Conveyor { .. } => {
                player.heal(tuning.heal_amount);
            }
            PlatformKind::Spike => {
                player.take_damage(tuning.spike_damage, tuning.invulnerable_ticks);
            }
            PlatformKind::Crumble {
                crumbling,
                ticks_left,
            } => {
                player.heal(tuning.heal_amount);
                if !*crumbling {
                    *crumbling = true;
                    *ticks_left = tuning.crumble_lifetime_ticks;
                }
            }
            PlatformKind::Spring {
                compressed,
                ticks_left,
            } => {
                player.launch(tuning.spring_bounce_vy);
                *compressed = true;
                *ticks_left = tuning.spring_compress_ticks;
            }
        }
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    /// Horizontal push applied to a player standing here
    pub fn conveyor_push(&self, tuning: &Tuning) -> f32 {
        match self.kind {
            PlatformKind::Conveyor { direction, .. } => {
                f32::from(direction) * tuning.conveyor_push_speed * tuning.conveyor_push_factor
            }
            _ => 0.0,
        }
    }

    // === Render helpers ===

    /// Opacity while crumbling, fading to a 0.3 floor
    pub fn crumble_alpha(&self, tuning: &Tuning) -> f32 {
        match self.kind {
            PlatformKind::Crumble {
                crumbling: true,
                ticks_left,
            } => (ticks_left as f32 / tuning.crumble_lifetime_ticks.max(1) as f32).max(0.3),
            _ => 1.0,
        }
    }

    pub fn spring_compressed(&self) -> bool {
        matches!(self.kind, PlatformKind::Spring { compressed: true, .. })
    }

    pub fn arrow_offset(&self) -> Option<f32> {
        match self.kind {
            PlatformKind::Conveyor { arrow_offset, .. } => Some(arrow_offset),
            _ => None,
        }
    }
}
