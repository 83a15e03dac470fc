//! Debounce for filter text input
//!
//! Keystrokes are held until no new input arrives for the delay, and the
//! value is only emitted when it differs from the last emitted one.

use std::time::{Duration, Instant};

pub const DEFAULT_FILTER_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
    last_emitted: String,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            last_emitted: String::new(),
        }
    }

    /// Record a new value at `now`, restarting the delay
    pub fn input(&mut self, value: &str, now: Instant) {
        self.pending = Some((value.to_string(), now));
    }

    /// Input waiting for the delay to pass
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Emit the settled value if the delay has elapsed and it changed
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let (_, at) = self.pending.as_ref()?;
        if now.duration_since(*at) < self.delay {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if value == self.last_emitted {
            return None;
        }
        self.last_emitted = value.clone();
        Some(value)
    }
}
