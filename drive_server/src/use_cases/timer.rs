// Replaceable fixed-cadence tick source for the simulation task.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Owns at most one running tick stream; restarting replaces it.
pub struct TickTimer {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl TickTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            // tokio intervals panic on a zero period.
            period: period.max(Duration::from_millis(1)),
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Cancels the current stream and starts a new one. The first tick arrives one
    /// period from now.
    pub fn restart(&mut self, tick_tx: mpsc::Sender<()>) {
        self.stop();

        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match tick_tx.try_send(()) {
                    // A full queue means the consumer is behind; skipping a tick loses nothing.
                    Ok(()) | Err(TrySendError::Full(())) => {}
                    Err(TrySendError::Closed(())) => break,
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut mpsc::Receiver<()>) -> usize {
        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        ticks
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut timer = TickTimer::new(Duration::from_millis(200));
        timer.restart(tx);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(drain(&mut rx), 0);

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert_eq!(drain(&mut rx), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_leaves_a_single_tick_stream() {
        let (tx, mut rx) = mpsc::channel(64);
        let mut timer = TickTimer::new(Duration::from_millis(200));

        timer.restart(tx.clone());
        tokio::time::sleep(Duration::from_millis(300)).await;
        timer.restart(tx.clone());
        timer.restart(tx.clone());
        tokio::time::sleep(Duration::from_millis(1050)).await;

        // One tick from the first stream (t=200), five from the last (t=500..=1300).
        assert_eq!(drain(&mut rx), 6);
        assert!(timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_stops_ticks() {
        let (tx, mut rx) = mpsc::channel(16);
        let mut timer = TickTimer::new(Duration::from_millis(200));
        timer.restart(tx);
        drop(timer);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(drain(&mut rx), 0);
    }

    #[test]
    fn zero_period_is_clamped() {
        let timer = TickTimer::new(Duration::ZERO);
        assert_eq!(timer.period(), Duration::from_millis(1));
    }
}
