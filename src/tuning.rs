//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives in [`Tuning`]. Defaults
//! come from [`crate::consts`]; a JSON file can override any subset of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised when loading or validating tuning values.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("gap range is inverted: min {min} > max {max}")]
    InvertedGap { min: f32, max: f32 },
    #[error("level range is inverted: min {min} >= max {max}")]
    InvertedLevelRange { min: f32, max: f32 },
    #[error("largest gap {gap_max} plus margins {margin}x2 does not fit in {span} units of sky")]
    GapDoesNotFit { gap_max: f32, margin: f32, span: f32 },
    #[error("ground height {ground} leaves no room for the avatar in a {height} unit playfield")]
    NoSky { ground: f32, height: f32 },
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub ground_height: f32,

    pub avatar_x: f32,
    pub avatar_size: f32,

    pub gravity: f32,
    pub level_threshold: f32,
    pub level_min: f32,
    pub level_max: f32,
    pub lift_min: f32,
    pub lift_max: f32,

    pub obstacle_width: f32,
    pub base_speed: f32,
    pub speed_per_point: f32,
    pub gap_min: f32,
    pub gap_max: f32,
    pub gap_margin: f32,

    pub start_delay_ticks: u32,
    pub spawn_interval_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            ground_height: GROUND_HEIGHT,
            avatar_x: AVATAR_X,
            avatar_size: AVATAR_SIZE,
            gravity: GRAVITY,
            level_threshold: LEVEL_THRESHOLD,
            level_min: LEVEL_MIN,
            level_max: LEVEL_MAX,
            lift_min: LIFT_MIN,
            lift_max: LIFT_MAX,
            obstacle_width: OBSTACLE_WIDTH,
            base_speed: OBSTACLE_BASE_SPEED,
            speed_per_point: SPEED_PER_POINT,
            gap_min: GAP_MIN,
            gap_max: GAP_MAX,
            gap_margin: GAP_MARGIN,
            start_delay_ticks: START_DELAY_TICKS,
            spawn_interval_ticks: SPAWN_INTERVAL_TICKS,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields keep their defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Height of the sky between the top of the playfield and the ground
    #[inline]
    pub fn field_floor(&self) -> f32 {
        self.playfield_height - self.ground_height
    }

    /// Lowest y the avatar may occupy (top-left anchored, so its body sits on the ground)
    #[inline]
    pub fn avatar_floor(&self) -> f32 {
        self.field_floor() - self.avatar_size
    }

    /// Vertical center of the playfield, where the avatar spawns
    #[inline]
    pub fn avatar_spawn_y(&self) -> f32 {
        self.playfield_height / 2.0
    }

    /// Check that the values describe a playable field
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("avatar_size", self.avatar_size),
            ("gravity", self.gravity),
            ("obstacle_width", self.obstacle_width),
            ("base_speed", self.base_speed),
            ("gap_min", self.gap_min),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        if self.spawn_interval_ticks == 0 {
            return Err(TuningError::NotPositive {
                field: "spawn_interval_ticks",
                value: 0.0,
            });
        }
        if self.avatar_floor() <= 0.0 {
            return Err(TuningError::NoSky {
                ground: self.ground_height,
                height: self.playfield_height,
            });
        }
        if self.gap_min > self.gap_max {
            return Err(TuningError::InvertedGap {
                min: self.gap_min,
                max: self.gap_max,
            });
        }
        if self.level_min >= self.level_max {
            return Err(TuningError::InvertedLevelRange {
                min: self.level_min,
                max: self.level_max,
            });
        }
        let span = self.field_floor();
        if self.gap_max + 2.0 * self.gap_margin > span {
            return Err(TuningError::GapDoesNotFit {
                gap_max: self.gap_max,
                margin: self.gap_margin,
                span,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.field_floor(), 465.0);
        assert_eq!(tuning.avatar_floor(), 415.0);
        assert_eq!(tuning.avatar_spawn_y(), 300.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.3, "spawn_interval_ticks": 80 }"#)
            .expect("valid tuning");
        assert_eq!(tuning.gravity, 0.3);
        assert_eq!(tuning.spawn_interval_ticks, 80);
        assert_eq!(tuning.obstacle_width, OBSTACLE_WIDTH);
    }

    #[test]
    fn test_gap_that_cannot_fit_is_rejected() {
        let err = Tuning::from_json(r#"{ "ground_height": 320 }"#).unwrap_err();
        assert!(matches!(err, TuningError::GapDoesNotFit { .. }));
    }

    #[test]
    fn test_inverted_gap_is_rejected() {
        let err = Tuning::from_json(r#"{ "gap_min": 220, "gap_max": 180 }"#).unwrap_err();
        assert!(matches!(err, TuningError::InvertedGap { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ gravity: ").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_non_positive_rejected() {
        let err = Tuning::from_json(r#"{ "obstacle_width": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::NotPositive {
                field: "obstacle_width",
                ..
            }
        ));
    }
}
