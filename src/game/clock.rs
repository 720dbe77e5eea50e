//! Fixed-period tick source for a game session.
//!
//! The clock is owned by the task that runs the session, so at most one tick
//! is ever being handled. It is meant to be polled from `tokio::select!`
//! next to input and render timers.

use std::future;
use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Default)]
pub struct SimulationClock {
    interval: Option<Interval>,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.interval.as_ref().map(Interval::period)
    }

    /// Begin ticking every `period`, first tick one period from now.
    /// Does nothing if the clock is already running.
    pub fn start(&mut self, period: Duration) -> bool {
        if self.is_running() {
            return false;
        }
        self.interval = Some(Self::interval(period));
        true
    }

    /// Replace the period. The old schedule is dropped in the same call that
    /// installs the new one, so no tick from the old period can fire after
    /// this returns and the next tick is exactly one new period away.
    pub fn reschedule(&mut self, period: Duration) {
        self.interval = Some(Self::interval(period));
    }

    /// Idempotent
    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Wait for the next tick. Never resolves while the clock is stopped.
    /// Cancel safe.
    pub async fn tick(&mut self) -> Instant {
        match self.interval.as_mut() {
            Some(interval) => interval.tick().await,
            None => future::pending().await,
        }
    }

    fn interval(period: Duration) -> Interval {
        let period = period.max(MIN_PERIOD);
        let mut interval = time::interval_at(Instant::now() + period, period);
        // A slow frame delays the schedule instead of bursting catch-up ticks
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }
}
