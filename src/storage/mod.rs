//! Key-value persistence for the high score.
//!
//! Only one key is ever written. Reads that fail for any reason count as
//! "no score yet", and a failed write never interrupts play.

pub mod error;
pub mod file;
pub mod memory;

pub use error::StoreError;
pub use file::{FileStore, app_data_dir};
pub use memory::MemoryStore;

/// Key holding the best score across sessions
pub const HIGH_SCORE_KEY: &str = "snake.high_score";

/// Minimal key-value store of non-negative integers
pub trait ScoreStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError>;
    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Outcome of comparing a finished game against the stored best
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighScoreUpdate {
    pub previous: u32,
    pub current: u32,
    pub is_new_record: bool,
}

/// Stored high score, or zero when it is missing or unreadable
pub fn load_high_score<S: ScoreStore + ?Sized>(store: &S) -> u32 {
    match store.get(HIGH_SCORE_KEY) {
        Ok(score) => score.unwrap_or(0),
        Err(err) => {
            tracing::warn!(error = %err, "high score unreadable, starting from zero");
            0
        }
    }
}

/// Raise the stored high score if `score` beats it. The stored value never
/// goes down. A failed write is logged and otherwise ignored.
pub fn record_score<S: ScoreStore + ?Sized>(store: &mut S, score: u32) -> HighScoreUpdate {
    let previous = load_high_score(store);
    if score <= previous {
        return HighScoreUpdate {
            previous,
            current: previous,
            is_new_record: false,
        };
    }

    if let Err(err) = store.set(HIGH_SCORE_KEY, score) {
        tracing::warn!(error = %err, score, "failed to persist high score");
    } else {
        tracing::info!(score, previous, "new high score");
    }

    HighScoreUpdate {
        previous,
        current: score,
        is_new_record: true,
    }
}
