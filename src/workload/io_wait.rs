//! I/O-bound workload: a simulated blocking wait
//!
//! Models an external I/O call. The mutual-exclusion token is held only to
//! submit and to retire the operation; it is released for the wait itself,
//! which is what lets concurrent contexts overlap their waits.

use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

/// Perform a simulated blocking I/O call of the given duration.
pub fn blocking_wait(wait: Duration, token: Option<&Mutex<()>>) {
    if let Some(t) = token {
        // Submit the operation while holding the token
        let _held = t.lock();
    }

    thread::sleep(wait);

    if let Some(t) = token {
        // Retire the completion while holding the token
        let _held = t.lock();
    }
}

/// Cooperative variant: suspends at the wait boundary instead of blocking
/// the executing thread.
pub async fn cooperative_wait(wait: Duration) {
    tokio::time::sleep(wait).await;
}
