//! One player's run of games: engine, clock and score store wired together.
//!
//! The session is the only owner of its state, so several can run side by
//! side (tests do exactly that).

use std::time::Duration;

use crate::game::{
    Direction, GameConfig, GameEngine, GameOverReason, GameState, SimulationClock, StepResult,
};
use crate::storage::{HighScoreUpdate, ScoreStore, load_high_score, record_score};

/// What the game-over screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub final_score: u32,
    pub reason: GameOverReason,
    pub high_score: HighScoreUpdate,
}

impl GameOverSummary {
    /// A record only counts when something was actually scored
    pub fn is_new_record(&self) -> bool {
        self.high_score.is_new_record && self.final_score > 0
    }
}

pub struct Session<S> {
    engine: GameEngine,
    state: GameState,
    clock: SimulationClock,
    store: S,
    high_score: u32,
    summary: Option<GameOverSummary>,
}

impl<S: ScoreStore> Session<S> {
    pub fn new(config: GameConfig, store: S) -> Self {
        Self::with_engine(GameEngine::new(config), store)
    }

    pub fn with_engine(engine: GameEngine, store: S) -> Self {
        let high_score = load_high_score(&store);
        let state = engine.idle();
        Self {
            engine,
            state,
            clock: SimulationClock::new(),
            store,
            high_score,
            summary: None,
        }
    }

    /// Read-only snapshot for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Summary of the last finished game, cleared when a new one starts
    pub fn summary(&self) -> Option<&GameOverSummary> {
        self.summary.as_ref()
    }

    pub fn is_ticking(&self) -> bool {
        self.clock.is_running()
    }

    pub fn tick_period(&self) -> Option<Duration> {
        self.clock.period()
    }

    /// Begin a game from idle or after game over. Ignored mid-game.
    pub fn start(&mut self) -> bool {
        if !self.engine.start(&mut self.state) {
            return false;
        }
        self.begin();
        true
    }

    /// Throw away the current game, unscored, and start a fresh one
    pub fn restart(&mut self) {
        if self.state.is_alive() {
            tracing::debug!(score = self.state.score, "abandoning game");
        }
        self.clock.stop();
        self.state = self.engine.reset();
        self.begin();
    }

    fn begin(&mut self) {
        self.summary = None;
        self.clock.stop();
        self.clock
            .start(Duration::from_millis(self.state.tick_interval_ms));
        tracing::info!(
            grid_size = self.state.grid_size,
            interval_ms = self.state.tick_interval_ms,
            high_score = self.high_score,
            "game started"
        );
    }

    /// Buffer a heading for the next tick; reversals and requests outside a
    /// running game are dropped
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        self.state.request_direction(direction)
    }

    /// Wait for the clock, then advance the game by one tick
    pub async fn next_tick(&mut self) -> StepResult {
        self.clock.tick().await;
        self.on_tick()
    }

    /// Advance one tick right now. Reschedules the clock on a speed-up and
    /// settles the high score when the game ends.
    pub fn on_tick(&mut self) -> StepResult {
        let result = self.engine.step(&mut self.state);

        if let Some(ms) = result.info.new_interval_ms {
            tracing::info!(score = self.state.score, interval_ms = ms, "speed up");
            self.clock.reschedule(Duration::from_millis(ms));
        }

        if let Some(reason) = result.info.game_over {
            self.finish(reason);
        }

        result
    }

    fn finish(&mut self, reason: GameOverReason) {
        self.clock.stop();

        let final_score = self.state.score;
        let high_score = record_score(&mut self.store, final_score);
        self.high_score = high_score.current;

        tracing::info!(
            final_score,
            steps = self.state.steps,
            ?reason,
            new_record = high_score.is_new_record,
            "game over"
        );

        self.summary = Some(GameOverSummary {
            final_score,
            reason,
            high_score,
        });
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
