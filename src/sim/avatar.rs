//! The player-controlled bird
//!
//! Vertical motion only: mic level sets an upward velocity, silence lets
//! gravity accumulate. The horizontal position never changes.

use glam::Vec2;

use crate::map_range;
use crate::tuning::Tuning;

/// Result of one motion step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarStatus {
    /// Still inside the playfield
    Flying,
    /// Came to rest on the ground this step (position clamped, velocity zeroed)
    Grounded,
    /// Left the top of the playfield; the round is over
    CeilingBreach,
}

/// The bird
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    /// Top-left corner in playfield coordinates (y grows downward)
    pub pos: Vec2,
    /// Vertical velocity per frame, positive = downward
    pub vel_y: f32,
}

impl Avatar {
    /// Spawn at the vertical center of the playfield, at rest
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.avatar_x, tuning.avatar_spawn_y()),
            vel_y: 0.0,
        }
    }

    /// Put the avatar back at its spawn point with zero velocity
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self::new(tuning);
    }

    /// Hold the avatar in place (used before the round starts)
    pub fn hold(&mut self) {
        self.vel_y = 0.0;
    }

    /// Advance one frame from the given mic level
    pub fn step(&mut self, level: f32, tuning: &Tuning) -> AvatarStatus {
        self.vel_y = next_velocity(self.vel_y, level, tuning);
        self.pos.y += self.vel_y;

        if self.pos.y < 0.0 {
            return AvatarStatus::CeilingBreach;
        }

        let floor = tuning.avatar_floor();
        if self.pos.y > floor {
            self.pos.y = floor;
            self.vel_y = 0.0;
            return AvatarStatus::Grounded;
        }

        AvatarStatus::Flying
    }
}

/// Velocity after one frame of input.
///
/// Above the threshold the level maps directly to a lift velocity; below it,
/// gravity is added to whatever velocity the avatar already had (unbounded).
pub fn next_velocity(vel_y: f32, level: f32, tuning: &Tuning) -> f32 {
    if level > tuning.level_threshold {
        map_range(
            level,
            tuning.level_min,
            tuning.level_max,
            tuning.lift_min,
            tuning.lift_max,
        )
    } else {
        vel_y + tuning.gravity
    }
}
