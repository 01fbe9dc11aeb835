use std::time::{Duration, Instant};

/// Decides when the active canvas is next copied into the stores.
#[derive(Debug, Clone)]
pub struct FlushSchedule {
    interval: Duration,
    last_flush: Option<Instant>,
}

impl FlushSchedule {
    pub fn new(interval: Duration) -> Self {
        FlushSchedule { interval, last_flush: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_flush {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    pub fn mark(&mut self, now: Instant) {
        self.last_flush = Some(now);
    }
}
