//! Fixed-timestep scheduling and the match countdown.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not enough time has accumulated for a step.
    Idle,
    /// Run one simulation step numbered `tick`. `last` is set when the match
    /// clock ran out, making this the final step of the match.
    Step { tick: u64, last: bool },
    /// The match is over; nothing more will run.
    Finished,
}

/// Accumulates wall-clock time and releases at most one step per call.
///
/// Surplus time stays in the accumulator for later calls instead of being
/// caught up in a burst.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    step: Duration,
    accumulated: Duration,
    tick: u64,
    remaining: Duration,
    finished: bool,
}

impl TickScheduler {
    pub fn new(step: Duration, match_duration: Duration) -> Self {
        Self {
            step,
            accumulated: Duration::ZERO,
            tick: 0,
            remaining: match_duration,
            finished: false,
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> TickOutcome {
        if self.finished {
            return TickOutcome::Finished;
        }

        self.accumulated += elapsed;
        self.remaining = self.remaining.saturating_sub(elapsed);

        if self.accumulated < self.step {
            return TickOutcome::Idle;
        }

        self.accumulated -= self.step;
        let tick = self.tick;
        self.tick += 1;

        let last = self.remaining.is_zero();
        self.finished = last;

        TickOutcome::Step { tick, last }
    }

    pub fn ticks_completed(&self) -> u64 {
        self.tick
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Remaining match time as `MM:SS`.
    pub fn clock(&self) -> String {
        format_clock(self.remaining)
    }
}

pub fn format_clock(remaining: Duration) -> String {
    let seconds = remaining.as_secs();
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
