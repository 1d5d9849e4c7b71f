use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

/// A shared gate that lets at most one caller through per `min_interval`.
///
/// The gate owns a monotonic "next allowed" cursor. Waiters queue on the mutex,
/// so spacing holds across every caller sharing the gate, not per caller.
#[derive(Debug)]
pub struct ThrottleGate {
    min_interval: Duration,
    next_allowed: Mutex<Option<Instant>>,
}

impl ThrottleGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed: Mutex::new(None),
        }
    }

    /// Waits for this caller's slot. The caller should issue its request immediately.
    pub async fn acquire(&self) {
        let mut next_allowed = self.next_allowed.lock().await;
        if let Some(at) = *next_allowed
            && at > Instant::now()
        {
            sleep_until(at).await;
        }
        *next_allowed = Some(Instant::now() + self.min_interval);
    }
}
