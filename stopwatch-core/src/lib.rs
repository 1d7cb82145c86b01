//! Pure timing logic library with no platform dependencies.
//! Every operation takes the current time as an argument, so the
//! whole engine is testable on host without a real clock.

pub mod dial;
pub mod stopwatch;

pub use stopwatch::{Controls, LapEntry, Snapshot, Stopwatch};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Elapsed-time bookkeeping against a monotonic millisecond clock.
///
/// While running, elapsed is `accumulated + (now - segment_start)`;
/// otherwise it is `accumulated` exactly.
#[derive(Clone, Debug)]
pub struct TimerCore {
    pub state: TimerState,
    accumulated_ms: u64,
    segment_start_ms: u64,
}

impl TimerCore {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            accumulated_ms: 0,
            segment_start_ms: 0,
        }
    }

    /// Rebuild a timer in `state` that has already measured `elapsed_ms`.
    /// A running timer continues from `now_ms`.
    pub fn resume_from(elapsed_ms: u64, state: TimerState, now_ms: u64) -> Self {
        Self {
            state,
            accumulated_ms: elapsed_ms,
            segment_start_ms: now_ms,
        }
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.state == TimerState::Running {
            return;
        }
        self.segment_start_ms = now_ms;
        self.state = TimerState::Running;
    }

    pub fn pause(&mut self, now_ms: u64) {
        if self.state != TimerState::Running {
            return;
        }
        self.accumulated_ms = self.elapsed_ms(now_ms);
        self.state = TimerState::Paused;
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0;
        self.segment_start_ms = 0;
        self.state = TimerState::Idle;
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.state {
            TimerState::Running => {
                self.accumulated_ms + now_ms.saturating_sub(self.segment_start_ms)
            }
            _ => self.accumulated_ms,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }
}

impl Default for TimerCore {
    fn default() -> Self {
        Self::new()
    }
}

/// Format milliseconds as "MM:SS:CC" (centiseconds). Minutes are not
/// wrapped at an hour and grow past two digits on long runs.
pub fn format_elapsed(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms / 1000) % 60;
    let cs = (ms % 1000) / 10;
    format!("{:02}:{:02}:{:02}", minutes, seconds, cs)
}
