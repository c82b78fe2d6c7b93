//! Per-frame simulation tick
//!
//! Exactly one tick runs per rendered frame. Order within a running frame:
//! avatar motion, then pipe movement, collision, retirement (scoring) and
//! spawning.

use super::avatar::AvatarStatus;
use super::collision::first_hit;
use super::state::{EndCause, GameEvent, GamePhase, GameState};

/// Level the autopilot "sings" at when it wants to climb
const AUTOPILOT_LEVEL: f32 = 0.08;
/// Autopilot aims this far below the gap center; it overshoots upward when it stops singing
const AUTOPILOT_AIM_OFFSET: f32 = 15.0;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Normalized mic level for this frame (0 when no mic)
    pub level: f32,
    /// Restart the round (R key)
    pub restart: bool,
    /// Idle/demo mode - the autopilot supplies the level
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart {
        log::info!("Restarting round (best {})", state.high_score);
        state.restart();
    }

    if state.phase == GamePhase::Ended {
        return;
    }

    state.frame += 1;

    match state.phase {
        GamePhase::NotStarted => {
            state.avatar.hold();
            state.ready_ticks += 1;
            if state.ready_ticks >= state.tuning.start_delay_ticks {
                state.phase = GamePhase::Running;
                state.running_ticks = 0;
                state.events.push(GameEvent::RoundStarted);
                log::info!("Round started");
            }
        }

        GamePhase::Running => {
            let level = if input.autopilot {
                autopilot_level(state)
            } else {
                input.level
            };

            // --- AVATAR ---
            if state.avatar.step(level, &state.tuning) == AvatarStatus::CeilingBreach {
                end_round(state, EndCause::Ceiling);
                return;
            }

            // --- MOVE PIPES ---
            let score = state.score;
            for obstacle in &mut state.obstacles {
                obstacle.advance(score, &state.tuning);
            }

            // --- COLLISION ---
            let field_floor = state.tuning.field_floor();
            if let Some((obstacle_id, segment)) =
                first_hit(state.avatar.pos, &state.obstacles, field_floor)
            {
                end_round(state, EndCause::Collision { obstacle_id, segment });
                return;
            }

            // --- RETIRE & SCORE ---
            // Back to front so removal never skips a neighbour
            for i in (0..state.obstacles.len()).rev() {
                if state.obstacles[i].offscreen() {
                    let passed = state.obstacles.remove(i);
                    state.score += 1;
                    log::debug!("Passed pipe {} (score {})", passed.id, state.score);
                    state.events.push(GameEvent::ObstaclePassed {
                        id: passed.id,
                        score: state.score,
                    });
                }
            }

            // --- SPAWN ---
            if state.running_ticks % u64::from(state.tuning.spawn_interval_ticks) == 0 {
                state.spawn_obstacle();
            }
            state.running_ticks += 1;
        }

        GamePhase::Ended => {}
    }
}

/// Stop the round and fold the score into the high score
fn end_round(state: &mut GameState, cause: EndCause) {
    state.phase = GamePhase::Ended;
    let new_record = state.score > state.high_score;
    if new_record {
        state.high_score = state.score;
    }
    log::info!(
        "Round over ({:?}) with score {}{}",
        cause,
        state.score,
        if new_record { " - new record!" } else { "" }
    );
    state.events.push(GameEvent::RoundEnded {
        score: state.score,
        cause,
        new_record,
    });
}

/// Synthetic mic level that steers the bird toward the next gap
pub fn autopilot_level(state: &GameState) -> f32 {
    let avatar_x = state.avatar.pos.x;
    let target = state
        .obstacles
        .iter()
        .find(|o| o.right() > avatar_x)
        .map(|o| o.gap.center() + AUTOPILOT_AIM_OFFSET)
        .unwrap_or_else(|| state.tuning.avatar_spawn_y());

    if state.avatar.pos.y > target {
        AUTOPILOT_LEVEL
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Segment;
    use crate::sim::obstacle::{Gap, Obstacle};

    const START: u32 = crate::consts::START_DELAY_TICKS;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        let input = TickInput::default();
        for _ in 0..START {
            tick(&mut state, &input);
        }
        assert_eq!(state.phase, GamePhase::Running);
        state.drain_events();
        state
    }

    /// A pipe whose gap surrounds the avatar's spawn height
    fn safe_pipe(state: &mut GameState, x: f32) -> Obstacle {
        Obstacle {
            id: state.next_entity_id(),
            x,
            width: 40.0,
            speed: 3.0,
            gap: Gap::from_top(200.0, 200.0, state.tuning.field_floor()),
        }
    }

    #[test]
    fn test_start_delay() {
        let mut state = GameState::new(12345);
        let input = TickInput {
            level: 0.5,
            ..Default::default()
        };
        for _ in 0..START - 1 {
            tick(&mut state, &input);
        }
        assert_eq!(state.phase, GamePhase::NotStarted);
        // Bird is held motionless regardless of input
        assert_eq!(state.avatar.pos.y, 300.0);
        assert_eq!(state.avatar.vel_y, 0.0);

        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.obstacles.is_empty());
        assert!(state.drain_events().contains(&GameEvent::RoundStarted));
    }

    #[test]
    fn test_first_pipe_spawns_on_first_running_frame() {
        let mut state = running_state(5);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].x, 800.0);
    }

    #[test]
    fn test_spawn_cadence() {
        let mut state = running_state(5);
        let mut spawn_frames = Vec::new();
        for frame in 0..301u64 {
            // Keep the bird level so it survives
            state.avatar.pos.y = 300.0;
            state.avatar.vel_y = 0.0;
            for o in &mut state.obstacles {
                o.gap = Gap::from_top(200.0, 200.0, 465.0);
            }
            tick(&mut state, &TickInput::default());
            for event in state.drain_events() {
                if let GameEvent::ObstacleSpawned { .. } = event {
                    spawn_frames.push(frame);
                }
            }
        }
        assert_eq!(spawn_frames, vec![0, 100, 200, 300]);
    }

    #[test]
    fn test_silent_fall_reaches_floor() {
        let mut state = running_state(77);
        let input = TickInput::default();
        let mut expected_y = 300.0f32;
        let mut expected_v = 0.0f32;
        for _ in 0..33 {
            tick(&mut state, &input);
            expected_v += 0.2;
            expected_y += expected_v;
            assert!((state.avatar.vel_y - expected_v).abs() < 1e-4);
            assert!((state.avatar.pos.y - expected_y).abs() < 1e-2);
        }
        assert!(state.avatar.pos.y < 415.0);

        tick(&mut state, &input);
        assert_eq!(state.avatar.pos.y, 415.0);
        assert_eq!(state.avatar.vel_y, 0.0);

        tick(&mut state, &input);
        assert_eq!(state.avatar.pos.y, 415.0);
        assert_eq!(state.avatar.vel_y, 0.0);
    }

    #[test]
    fn test_ceiling_ends_round() {
        let mut state = running_state(3);
        state.high_score = 4;
        state.score = 2;
        state.avatar.pos.y = 5.0;
        tick(
            &mut state,
            &TickInput {
                level: 0.3,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Ended);
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::RoundEnded {
                score: 2,
                cause: EndCause::Ceiling,
                new_record: false,
            }]
        );
        assert_eq!(state.high_score, 4);
    }

    #[test]
    fn test_collision_ends_round_and_skips_rest_of_frame() {
        let mut state = running_state(3);
        let mut pipe = safe_pipe(&mut state, 52.0);
        pipe.gap = Gap::from_top(350.0, 100.0, 465.0);
        let pipe_id = pipe.id;
        let mut gone = safe_pipe(&mut state, -39.0);
        gone.id = 99;
        state.obstacles = vec![gone, pipe];
        state.running_ticks = 0;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::Ended);
        // Off-screen pipe was not retired and nothing spawned
        assert_eq!(state.obstacles.len(), 2);
        assert_eq!(state.score, 0);
        let events = state.drain_events();
        assert_eq!(
            events,
            vec![GameEvent::RoundEnded {
                score: 0,
                cause: EndCause::Collision {
                    obstacle_id: pipe_id,
                    segment: Segment::Upper,
                },
                new_record: false,
            }]
        );
    }

    #[test]
    fn test_offscreen_pipes_score_once() {
        let mut state = running_state(8);
        let a = safe_pipe(&mut state, -38.0);
        let b = safe_pipe(&mut state, -39.5);
        let c = safe_pipe(&mut state, 400.0);
        state.obstacles = vec![a, b, c];
        state.running_ticks = 1;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 2);
        assert_eq!(state.obstacles.len(), 1);

        state.avatar.pos.y = 300.0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 2);

        let passed = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ObstaclePassed { .. }))
            .count();
        assert_eq!(passed, 2);
    }

    #[test]
    fn test_speed_tracks_score() {
        let mut state = running_state(8);
        let pipe = safe_pipe(&mut state, 700.0);
        state.obstacles = vec![pipe];
        state.running_ticks = 1;
        state.score = 20;

        tick(&mut state, &TickInput::default());
        let speed = state.obstacles[0].speed;
        assert!((speed - 3.0 * 1.2).abs() < 1e-5);
        assert!((state.obstacles[0].x - (700.0 - 3.6)).abs() < 1e-3);
    }

    #[test]
    fn test_ended_is_frozen_until_restart() {
        let mut state = running_state(3);
        state.avatar.pos.y = 1.0;
        tick(
            &mut state,
            &TickInput {
                level: 0.3,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Ended);
        let frozen_frame = state.frame;
        let frozen_y = state.avatar.pos.y;

        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.frame, frozen_frame);
        assert_eq!(state.avatar.pos.y, frozen_y);

        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.ready_ticks, 1);
        assert_eq!(state.avatar.pos.y, 300.0);
    }

    #[test]
    fn test_new_record_updates_high_score() {
        let mut state = running_state(3);
        state.high_score = 10;
        state.score = 15;
        state.avatar.pos.y = 1.0;
        tick(
            &mut state,
            &TickInput {
                level: 0.3,
                ..Default::default()
            },
        );
        assert_eq!(state.high_score, 15);
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::RoundEnded {
                new_record: true,
                ..
            }]
        ));
    }

    #[test]
    fn test_autopilot_passes_pipes() {
        for seed in 1..=5 {
            let mut state = running_state(seed);
            let input = TickInput {
                autopilot: true,
                ..Default::default()
            };
            for _ in 0..700 {
                tick(&mut state, &input);
            }
            assert_eq!(state.phase, GamePhase::Running, "seed {seed}");
            assert!(state.score >= 3, "seed {seed} scored {}", state.score);
        }
    }

    #[test]
    fn test_every_spawned_pipe_is_retired_or_live() {
        for seed in [3, 8, 21] {
            let mut state = running_state(seed);
            let input = TickInput {
                autopilot: true,
                ..Default::default()
            };
            let (mut spawned, mut passed) = (0usize, 0usize);
            for _ in 0..2000 {
                tick(&mut state, &input);
                for event in state.drain_events() {
                    match event {
                        GameEvent::ObstacleSpawned { .. } => spawned += 1,
                        GameEvent::ObstaclePassed { .. } => passed += 1,
                        _ => {}
                    }
                }
            }
            assert!(spawned > 0, "seed {seed}");
            assert_eq!(spawned, passed + state.obstacles.len(), "seed {seed}");
            assert_eq!(state.score, passed as u64, "seed {seed}");
        }
    }

    #[test]
    fn test_determinism() {
        let mut state1 = running_state(99999);
        let mut state2 = running_state(99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..400 {
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.obstacles, state2.obstacles);
        assert_eq!(state1.avatar, state2.avatar);
    }
}
