//! Round driver
//!
//! Owns the game state together with the storage the best score lives in,
//! so browser and native frontends share one tick → persist path.

use crate::highscores::HighScore;
use crate::platform::KeyValueStore;
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// A play session: one round at a time, best score carried across rounds
pub struct Session<S: KeyValueStore> {
    pub state: GameState,
    pub best: HighScore,
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a session, reading the stored best score once
    pub fn new(seed: u64, tuning: Tuning, store: S) -> Self {
        let best = HighScore::load(&store);
        Self {
            state: GameState::with_tuning(seed, tuning, best.best),
            best,
            store,
        }
    }

    /// Run one frame and return what happened
    pub fn advance(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.state, input);
        let events = self.state.drain_events();

        for event in &events {
            if let GameEvent::RoundEnded {
                score,
                new_record: true,
                ..
            } = event
            {
                self.record(*score);
            }
        }

        events
    }

    /// Fold the score of a round that is still running into the best score.
    /// Returns true when it set a new best.
    pub fn bank_score(&mut self) -> bool {
        let score = self.state.score;
        if score > self.state.high_score {
            self.state.high_score = score;
        }
        self.record(score)
    }

    fn record(&mut self, score: u64) -> bool {
        if !self.best.submit(score) {
            return false;
        }
        if let Err(e) = self.best.save(&mut self.store) {
            log::warn!("Failed to persist high score {}: {}", score, e);
        }
        true
    }

    /// Storage backend (settings share it)
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}
