//! Mic Flap - a voice-controlled Flappy Bird style game
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (avatar motion, obstacle stream, round lifecycle)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction (storage)
//! - `mic`: Microphone level metering
//! - `tuning`: Data-driven game balance
//! - `session`: Round driver with high score persistence

pub mod audio;
pub mod highscores;
pub mod mic;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use session::Session;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate; the simulation advances exactly once per frame
    pub const NOMINAL_FPS: f32 = 60.0;

    /// Playfield dimensions (y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    pub const GROUND_HEIGHT: f32 = 135.0;

    /// Avatar defaults - anchored at its top-left corner
    pub const AVATAR_X: f32 = 50.0;
    pub const AVATAR_SIZE: f32 = 50.0;

    /// Downward acceleration while silent (per frame²)
    pub const GRAVITY: f32 = 0.2;
    /// Mic level that must be exceeded to produce thrust
    pub const LEVEL_THRESHOLD: f32 = 0.05;
    /// Mic level range mapped onto the lift velocity range
    pub const LEVEL_MIN: f32 = 0.02;
    pub const LEVEL_MAX: f32 = 0.3;
    /// Lift velocity for the quietest and loudest input (negative = up)
    pub const LIFT_MIN: f32 = -3.0;
    pub const LIFT_MAX: f32 = -8.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 40.0;
    pub const OBSTACLE_BASE_SPEED: f32 = 3.0;
    /// Speed increase per point scored (multiplicative, 1%)
    pub const SPEED_PER_POINT: f32 = 0.01;
    pub const GAP_MIN: f32 = 150.0;
    pub const GAP_MAX: f32 = 200.0;
    /// Minimum solid segment above the gap
    pub const GAP_MARGIN: f32 = 50.0;

    /// Frames of "Get Ready!" before a round starts (2 seconds)
    pub const START_DELAY_TICKS: u32 = 120;
    /// Frames between obstacle spawns
    pub const SPAWN_INTERVAL_TICKS: u32 = 100;
}

/// Linearly map `value` from `[in_lo, in_hi]` onto `[out_lo, out_hi]`,
/// clamped to the output range (which may be descending).
#[inline]
pub fn map_range(value: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    let t = (value - in_lo) / (in_hi - in_lo);
    let mapped = out_lo + t * (out_hi - out_lo);
    mapped.clamp(out_lo.min(out_hi), out_lo.max(out_hi))
}

/// Speed multiplier applied to obstacles at the given score
#[inline]
pub fn speed_multiplier(score: u64, per_point: f32) -> f32 {
    1.0 + score as f32 * per_point
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_range_descending_output() {
        assert!((map_range(0.02, 0.02, 0.3, -3.0, -8.0) - -3.0).abs() < 1e-6);
        assert!((map_range(0.3, 0.02, 0.3, -3.0, -8.0) - -8.0).abs() < 1e-6);
        // Midpoint
        assert!((map_range(0.16, 0.02, 0.3, -3.0, -8.0) - -5.5).abs() < 1e-5);
    }

    #[test]
    fn test_map_range_clamps() {
        assert_eq!(map_range(0.0, 0.02, 0.3, -3.0, -8.0), -3.0);
        assert_eq!(map_range(1.0, 0.02, 0.3, -3.0, -8.0), -8.0);
        assert_eq!(map_range(5.0, 0.0, 1.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_speed_multiplier() {
        assert_eq!(speed_multiplier(0, 0.01), 1.0);
        assert!((speed_multiplier(50, 0.01) - 1.5).abs() < 1e-6);
    }
}
