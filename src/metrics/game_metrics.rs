use std::time::{Duration, Instant};

/// Per-run statistics shown next to the board. The persisted high score
/// lives in the session; this only covers the current process.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub best_this_run: u32,
    pub games_played: u32,
    running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_this_run: 0,
            games_played: 0,
            running: false,
        }
    }

    /// Refresh the game timer. Frozen while no game is running.
    pub fn update(&mut self) {
        if self.running {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.running = true;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.update();
        self.running = false;
        self.games_played += 1;
        self.best_this_run = self.best_this_run.max(final_score);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
