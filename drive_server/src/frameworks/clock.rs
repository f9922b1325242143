// Wall-clock anchored monotonic clock.

use crate::domain::Clock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Epoch milliseconds that never go backwards.
///
/// The wall clock is read once; later readings add monotonic elapsed time to it,
/// so system clock adjustments cannot rewind the pose timestamp.
pub struct SystemClock {
    origin: Instant,
    origin_epoch_ms: u64,
}

impl SystemClock {
    pub fn new() -> Self {
        let origin_epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);
        Self {
            origin: Instant::now(),
            origin_epoch_ms,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin_epoch_ms + self.origin.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_start_near_wall_clock_and_never_decrease() {
        let clock = SystemClock::new();
        let wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("after epoch")
            .as_millis() as u64;

        let first = clock.now_ms();
        let second = clock.now_ms();

        assert!(first.abs_diff(wall) < 1_000);
        assert!(second >= first);
    }
}
