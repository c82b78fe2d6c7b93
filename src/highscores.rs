//! Best score persistence
//!
//! A single integer stored under a constant key. Missing or unreadable
//! values count as 0 so a corrupted entry never blocks play.

use crate::platform::{KeyValueStore, StorageError};

/// Best score, persisted across rounds and sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "highScore";

    /// Load the best score from storage (absent or malformed → 0)
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<u64>(raw.trim()) {
                Ok(best) => {
                    log::info!("Loaded high score {}", best);
                    Self { best }
                }
                Err(e) => {
                    log::warn!("Ignoring malformed high score {:?}: {}", raw, e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read high score: {}", e);
                Self::default()
            }
        }
    }

    /// Check if a score would beat the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished round. Returns true when it set a new best.
    pub fn submit(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Write the best score to storage
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.best).map_err(|source| StorageError::Encode {
            key: Self::STORAGE_KEY.to_string(),
            source,
        })?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("High score saved ({})", self.best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    #[test]
    fn test_absent_key_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(&store).best, 0);
    }

    #[test]
    fn test_malformed_value_defaults_to_zero() {
        let mut store = MemoryStore::new();
        store.set(HighScore::STORAGE_KEY, "not a number").unwrap();
        assert_eq!(HighScore::load(&store).best, 0);
        store.set(HighScore::STORAGE_KEY, "-4").unwrap();
        assert_eq!(HighScore::load(&store).best, 0);
    }

    #[test]
    fn test_submit_only_on_improvement() {
        let mut best = HighScore { best: 10 };
        assert!(!best.submit(7));
        assert!(!best.submit(10));
        assert_eq!(best.best, 10);
        assert!(best.submit(15));
        assert_eq!(best.best, 15);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        HighScore { best: 42 }.save(&mut store).unwrap();
        assert_eq!(store.get(HighScore::STORAGE_KEY).unwrap().as_deref(), Some("42"));
        assert_eq!(HighScore::load(&store).best, 42);
    }
}
