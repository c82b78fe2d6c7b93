//! Pipe obstacles
//!
//! A pipe is two solid segments (from the top of the playfield down to
//! `gap.top`, and from `field_floor - gap.bottom` down to the ground) with a
//! passable gap between them. Geometry is fixed at spawn; only `x` moves.

use rand::Rng;

use crate::consts::{GAP_MARGIN, GAP_MAX, GAP_MIN};
use crate::speed_multiplier;
use crate::tuning::Tuning;

/// Vertical layout of a pipe. `top + spacing + bottom` always equals the
/// field floor the pipe was spawned for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    /// Height of the upper solid segment
    pub top: f32,
    /// Height of the passable gap
    pub spacing: f32,
    /// Height of the lower solid segment
    pub bottom: f32,
}

impl Gap {
    /// Draw a random gap that fits within `[0, field_floor]`
    pub fn random<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        let floor = tuning.field_floor();
        let (gap_min, gap_max) = spacing_range(tuning);
        let spacing = rng.random_range(gap_min..=gap_max);
        let lo = if tuning.gap_margin.is_finite() {
            tuning.gap_margin
        } else {
            GAP_MARGIN
        };
        let hi = floor - spacing - lo;
        if !hi.is_finite() || hi < lo {
            // Degenerate tuning: pin the gap under the top margin and let it
            // take whatever room is left.
            log::warn!("Gap {spacing} does not fit under margin {lo}; pinning gap top");
            let top = lo.min(floor);
            let spacing = spacing.min(floor - top);
            return Self::from_top(top, spacing, floor);
        }
        let top = rng.random_range(lo..=hi);
        Self::from_top(top, spacing, floor)
    }

    /// Build a gap from its top edge and size; the bottom segment takes the rest
    pub fn from_top(top: f32, spacing: f32, field_floor: f32) -> Self {
        Self {
            top,
            spacing,
            bottom: field_floor - (top + spacing),
        }
    }

    /// Y of the lower edge of the gap (top of the lower segment)
    #[inline]
    pub fn lower_edge(&self, field_floor: f32) -> f32 {
        field_floor - self.bottom
    }

    /// Y of the gap's vertical center
    #[inline]
    pub fn center(&self) -> f32 {
        self.top + self.spacing / 2.0
    }
}

/// Gap size bounds in ascending order; non-finite bounds fall back to the defaults
fn spacing_range(tuning: &Tuning) -> (f32, f32) {
    let (a, b) = (tuning.gap_min, tuning.gap_max);
    if !(a.is_finite() && b.is_finite()) {
        log::warn!("Gap range [{a}, {b}] is not finite; using defaults");
        return (GAP_MIN, GAP_MAX);
    }
    (a.min(b), a.max(b))
}

/// A pipe entity
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Leftward distance per frame, refreshed from the score every frame
    pub speed: f32,
    pub gap: Gap,
}

impl Obstacle {
    /// Spawn a pipe just off the right edge with a fresh random gap
    pub fn spawn<R: Rng>(id: u32, rng: &mut R, tuning: &Tuning) -> Self {
        Self {
            id,
            x: tuning.playfield_width,
            width: tuning.obstacle_width,
            speed: tuning.base_speed,
            gap: Gap::random(rng, tuning),
        }
    }

    /// Refresh speed from the current score, then move left by it
    pub fn advance(&mut self, score: u64, tuning: &Tuning) {
        self.speed = tuning.base_speed * speed_multiplier(score, tuning.speed_per_point);
        self.x -= self.speed;
    }

    /// Whether the pipe has fully left the playfield on the left
    #[inline]
    pub fn offscreen(&self) -> bool {
        self.x < -self.width
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_off_right_edge() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let pipe = Obstacle::spawn(1, &mut rng, &tuning);
        assert_eq!(pipe.x, 800.0);
        assert_eq!(pipe.width, 40.0);
        assert_eq!(pipe.speed, 3.0);
    }

    #[test]
    fn test_advance_scales_with_score() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut pipe = Obstacle::spawn(1, &mut rng, &tuning);

        pipe.advance(0, &tuning);
        assert_eq!(pipe.speed, 3.0);
        assert_eq!(pipe.x, 797.0);

        pipe.advance(10, &tuning);
        assert!((pipe.speed - 3.3).abs() < 1e-5);
        assert!((pipe.x - 793.7).abs() < 1e-3);
    }

    #[test]
    fn test_offscreen_boundary() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pipe = Obstacle::spawn(1, &mut rng, &tuning);
        pipe.x = -40.0;
        assert!(!pipe.offscreen());
        pipe.x = -40.01;
        assert!(pipe.offscreen());
    }

    #[test]
    fn test_degenerate_tuning_keeps_bottom_non_negative() {
        let tuning = Tuning {
            ground_height: 400.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let gap = Gap::random(&mut rng, &tuning);
        assert_eq!(gap.top, 50.0);
        assert!(gap.bottom >= 0.0);
        assert!((gap.top + gap.spacing + gap.bottom - 200.0).abs() < 1e-4);
    }

    #[test]
    fn test_inverted_gap_range_is_reordered() {
        let tuning = Tuning {
            gap_min: 220.0,
            gap_max: 180.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..50 {
            let gap = Gap::random(&mut rng, &tuning);
            assert!((180.0..=220.0).contains(&gap.spacing));
            assert!((gap.top + gap.spacing + gap.bottom - 465.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_nan_gap_bounds_use_defaults() {
        let tuning = Tuning {
            gap_min: f32::NAN,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(2);
        let gap = Gap::random(&mut rng, &tuning);
        assert!((150.0..=200.0).contains(&gap.spacing));
    }

    #[test]
    fn test_nan_margin_uses_default() {
        let tuning = Tuning {
            gap_margin: f32::NAN,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(4);
        let gap = Gap::random(&mut rng, &tuning);
        assert!(gap.top >= 50.0);
        assert!(gap.bottom >= 50.0 - 1e-3);
    }

    proptest! {
        #[test]
        fn prop_gap_fills_the_sky(seed in any::<u64>()) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let gap = Gap::random(&mut rng, &tuning);
            prop_assert!((150.0..=200.0).contains(&gap.spacing));
            prop_assert!(gap.top >= 50.0);
            prop_assert!(gap.top <= 465.0 - gap.spacing - 50.0 + 1e-3);
            prop_assert!(gap.bottom >= 50.0 - 1e-3);
            prop_assert!((gap.top + gap.spacing + gap.bottom - 465.0).abs() < 1e-3);
        }
    }
}
