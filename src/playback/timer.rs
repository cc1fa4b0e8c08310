use std::time::Duration;
use tokio::time::Instant;

use super::PlaybackError;

/// Event produced by polling a running timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerEvent {
    /// The run is still going; `fraction` is the live progress
    Tick { run: u64, fraction: f64 },
    /// The run reached 1.0 at `at`. Emitted once per run.
    Completed { run: u64, at: Instant },
}

#[derive(Debug, Clone, Copy)]
struct TimerRun {
    id: u64,
    from: f64,
    started_at: Instant,
    duration: Duration,
}

impl TimerRun {
    fn deadline(&self) -> Instant {
        self.started_at + self.duration
    }

    fn fraction_at(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let ratio = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (self.from + (1.0 - self.from) * ratio).min(1.0)
    }
}

/// Drives a single progress scalar from a start fraction to 1.0.
///
/// A run from `s` lasts `(1 - s) * base`, so resuming from a captured fraction
/// keeps the total unpaused time of a slide equal to `base`. The timer does not
/// own a clock: the host loop passes `now` and decides when to poll.
#[derive(Debug, Clone)]
pub struct ProgressTimer {
    base: Duration,
    run: Option<TimerRun>,
    last_fraction: f64,
    next_run_id: u64,
}

impl ProgressTimer {
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            run: None,
            last_fraction: 0.0,
            next_run_id: 1,
        }
    }

    pub fn base_duration(&self) -> Duration {
        self.base
    }

    /// Begin a new run from `from`, discarding any run in progress.
    ///
    /// Returns the id of the new run.
    pub fn start(&mut self, from: f64, now: Instant) -> Result<u64, PlaybackError> {
        if !(0.0..1.0).contains(&from) {
            return Err(PlaybackError::InvalidFraction(from));
        }

        let id = self.next_run_id;
        self.next_run_id += 1;
        self.run = Some(TimerRun {
            id,
            from,
            started_at: now,
            duration: self.base.mul_f64(1.0 - from),
        });
        self.last_fraction = from;
        Ok(id)
    }

    /// Halt the active run and return the fraction it had reached.
    ///
    /// Cancelling an idle timer returns the last known fraction.
    pub fn cancel(&mut self, now: Instant) -> f64 {
        if let Some(run) = self.run.take() {
            self.last_fraction = run.fraction_at(now);
        }
        self.last_fraction
    }

    pub fn poll(&mut self, now: Instant) -> Option<TimerEvent> {
        let run = self.run?;
        if now >= run.deadline() {
            self.run = None;
            self.last_fraction = 1.0;
            return Some(TimerEvent::Completed {
                run: run.id,
                at: run.deadline(),
            });
        }

        let fraction = run.fraction_at(now);
        self.last_fraction = fraction;
        Some(TimerEvent::Tick {
            run: run.id,
            fraction,
        })
    }

    /// Live fraction at `now` without consuming a completion
    pub fn fraction_at(&self, now: Instant) -> f64 {
        match &self.run {
            Some(run) => run.fraction_at(now),
            None => self.last_fraction,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.run.as_ref().map(TimerRun::deadline)
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn current_run(&self) -> Option<u64> {
        self.run.as_ref().map(|run| run.id)
    }
}
