use std::time::Duration;

/// Repeating task driving display refresh. The pump only decides when the
/// next tick is due; whoever owns the event loop waits for it and calls
/// `fire`. Cancelling is idempotent.
pub struct Pump {
    interval_ms: u64,
    next_fire_ms: Option<u64>,
}

impl Pump {
    /// An interval of 0 fires on every pass of the event loop.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            next_fire_ms: None,
        }
    }

    /// Schedule the first tick immediately. No-op if already running.
    pub fn start(&mut self, now_ms: u64) {
        if self.next_fire_ms.is_none() {
            log::debug!("Pump started, interval {} ms", self.interval_ms);
            self.next_fire_ms = Some(now_ms);
        }
    }

    pub fn cancel(&mut self) {
        if self.next_fire_ms.take().is_some() {
            log::debug!("Pump stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_fire_ms.is_some()
    }

    /// How long the event loop may wait before the next tick, or `None`
    /// when nothing is scheduled.
    pub fn timeout(&self, now_ms: u64) -> Option<Duration> {
        self.next_fire_ms
            .map(|next| Duration::from_millis(next.saturating_sub(now_ms)))
    }

    /// Returns true if a tick was due, and schedules the following one.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.next_fire_ms {
            Some(next) if now_ms >= next => {
                self.next_fire_ms = Some(now_ms + self.interval_ms);
                true
            }
            _ => false,
        }
    }
}
