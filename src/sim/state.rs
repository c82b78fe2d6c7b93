//! Game state and core simulation types
//!
//! Everything a round needs lives in [`GameState`]; the tick function is the
//! only thing that mutates it.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::avatar::Avatar;
use super::collision::Segment;
use super::obstacle::Obstacle;
use crate::tuning::Tuning;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// "Get Ready!" countdown, bird held in place
    NotStarted,
    /// Active gameplay
    Running,
    /// Round over, waiting for restart
    Ended,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    /// Bird flew off the top of the playfield
    Ceiling,
    /// Bird hit a pipe
    Collision { obstacle_id: u32, segment: Segment },
}

/// Things that happened during a tick, for audio/HUD/persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    RoundStarted,
    ObstacleSpawned { id: u32 },
    ObstaclePassed { id: u32, score: u64 },
    RoundEnded {
        score: u64,
        cause: EndCause,
        new_record: bool,
    },
    Restarted,
}

/// Complete round state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Pipes passed this round
    pub score: u64,
    /// Best score seen this session (seeded from storage)
    pub high_score: u64,
    /// Frames spent in the current "Get Ready!" countdown
    pub ready_ticks: u32,
    /// Frames since the round entered Running
    pub running_ticks: u64,
    /// Total frames simulated
    pub frame: u64,
    pub avatar: Avatar,
    /// Live pipes, oldest (leftmost) first
    pub obstacles: Vec<Obstacle>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new round with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default(), 0)
    }

    /// Create a new round with explicit tuning and a previously stored best score
    ///
    /// Invalid tuning is logged, not rejected; pipe generation clamps it.
    pub fn with_tuning(seed: u64, tuning: Tuning, high_score: u64) -> Self {
        if let Err(e) = tuning.validate() {
            log::warn!("Playing with invalid tuning: {}", e);
        }
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            avatar: Avatar::new(&tuning),
            tuning,
            phase: GamePhase::NotStarted,
            score: 0,
            high_score,
            ready_ticks: 0,
            running_ticks: 0,
            frame: 0,
            obstacles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a freshly generated pipe at the right edge
    pub fn spawn_obstacle(&mut self) -> u32 {
        let id = self.next_entity_id();
        let obstacle = Obstacle::spawn(id, &mut self.rng, &self.tuning);
        log::debug!(
            "Spawned pipe {} (gap top {:.1}, spacing {:.1})",
            id,
            obstacle.gap.top,
            obstacle.gap.spacing
        );
        self.obstacles.push(obstacle);
        self.events.push(GameEvent::ObstacleSpawned { id });
        id
    }

    /// Reset for a new round: score, pipes and bird cleared, countdown restarted.
    /// The high score and RNG stream carry over.
    pub fn restart(&mut self) {
        self.score = 0;
        self.obstacles.clear();
        self.avatar.reset(&self.tuning);
        self.phase = GamePhase::NotStarted;
        self.ready_ticks = 0;
        self.running_ticks = 0;
        self.events.push(GameEvent::Restarted);
    }

    /// Current obstacle speed multiplier (for the HUD)
    pub fn speed_multiplier(&self) -> f32 {
        crate::speed_multiplier(self.score, self.tuning.speed_per_point)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
