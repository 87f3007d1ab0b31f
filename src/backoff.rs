use std::cmp;
use std::time::Duration;

const BACKOFF_INITIAL: Duration = Duration::from_millis(500);
const BACKOFF_MAX: Duration = Duration::from_secs(5);

/// Reconnect delay that doubles on every use up to [`BACKOFF_MAX`].
///
/// The delay is never reset during a run, so a flapping connection keeps
/// getting slower retries instead of hammering the socket.
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
}

impl Backoff {
    pub fn new() -> Self {
        Backoff {
            next: BACKOFF_INITIAL,
        }
    }

    /// Delay to wait now; advances the schedule for the next call
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = cmp::min(self.next.saturating_mul(2), BACKOFF_MAX);
        delay
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}
