use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use quiz_core::Clock;
use quiz_core::time::elapsed_seconds;

/// Default period between published ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerState {
    Idle,
    Running { started_at: DateTime<Utc> },
    Stopped { elapsed: u64 },
}

/// Elapsed-time tracker for one attempt.
///
/// Elapsed time is always `now - started_at` from the injected clock. The
/// optional ticker only publishes that value for render hooks; it never
/// accumulates ticks.
#[derive(Debug)]
pub struct SessionTimer {
    clock: Clock,
    state: TimerState,
    updates: watch::Sender<u64>,
    ticker: Option<JoinHandle<()>>,
}

impl SessionTimer {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        let (updates, _) = watch::channel(0);
        Self {
            clock,
            state: TimerState::Idle,
            updates,
            ticker: None,
        }
    }

    /// Start (or restart) timing from the clock's current instant.
    pub fn start(&mut self) {
        let now = self.clock.now();
        self.start_at(now);
    }

    /// Start (or restart) timing from `now`, discarding any previous elapsed time.
    ///
    /// The ticker is only spawned when called inside a Tokio runtime.
    pub fn start_at(&mut self, now: DateTime<Utc>) {
        self.abort_ticker();
        self.state = TimerState::Running { started_at: now };
        self.updates.send_replace(0);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                self.ticker = Some(handle.spawn(tick_loop(self.clock, now, self.updates.clone())));
            }
            Err(_) => tracing::debug!("no tokio runtime, timer runs without ticker"),
        }
        tracing::debug!(started_at = %now, "timer started");
    }

    /// Stop timing and freeze elapsed time at the clock's current instant.
    pub fn stop(&mut self) -> u64 {
        let now = self.clock.now();
        self.stop_at(now)
    }

    /// Stop timing at `now`. Returns the frozen elapsed seconds.
    ///
    /// Stopping an idle or already stopped timer changes nothing.
    pub fn stop_at(&mut self, now: DateTime<Utc>) -> u64 {
        self.abort_ticker();
        if let TimerState::Running { started_at } = self.state {
            let elapsed = elapsed_seconds(started_at, now);
            self.state = TimerState::Stopped { elapsed };
            self.updates.send_replace(elapsed);
            tracing::debug!(elapsed, "timer stopped");
        }
        self.elapsed_seconds_at(now)
    }

    /// Abort the ticker and return to zero.
    pub fn reset(&mut self) {
        self.abort_ticker();
        self.state = TimerState::Idle;
        self.updates.send_replace(0);
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds_at(self.clock.now())
    }

    #[must_use]
    pub fn elapsed_seconds_at(&self, now: DateTime<Utc>) -> u64 {
        match self.state {
            TimerState::Idle => 0,
            TimerState::Running { started_at } => elapsed_seconds(started_at, now),
            TimerState::Stopped { elapsed } => elapsed,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    #[must_use]
    pub fn has_ticker(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Receiver of elapsed-seconds updates, one per tick while running.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.updates.subscribe()
    }

    fn abort_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.abort_ticker();
    }
}

async fn tick_loop(clock: Clock, started_at: DateTime<Utc>, updates: watch::Sender<u64>) {
    let mut interval = tokio::time::interval(TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        updates.send_replace(elapsed_seconds(started_at, clock.now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use quiz_core::time::{fixed_clock, fixed_now};

    #[test]
    fn idle_timer_reports_zero() {
        let timer = SessionTimer::new(fixed_clock());
        assert_eq!(timer.elapsed_seconds(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn elapsed_is_wall_clock_delta() {
        let start = fixed_now();
        let mut timer = SessionTimer::new(fixed_clock());
        timer.start_at(start);
        assert!(!timer.has_ticker());

        assert_eq!(timer.elapsed_seconds_at(start + ChronoDuration::seconds(42)), 42);
        let frozen = timer.stop_at(start + ChronoDuration::seconds(75));
        assert_eq!(frozen, 75);
        assert_eq!(timer.elapsed_seconds_at(start + ChronoDuration::seconds(500)), 75);
    }

    #[test]
    fn restart_discards_previous_elapsed() {
        let start = fixed_now();
        let mut timer = SessionTimer::new(fixed_clock());
        timer.start_at(start);
        timer.stop_at(start + ChronoDuration::seconds(30));

        let again = start + ChronoDuration::seconds(100);
        timer.start_at(again);
        assert_eq!(timer.elapsed_seconds_at(again + ChronoDuration::seconds(5)), 5);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut timer = SessionTimer::new(fixed_clock());
        timer.start_at(fixed_now());
        timer.stop_at(fixed_now() + ChronoDuration::seconds(9));
        timer.reset();
        assert_eq!(timer.elapsed_seconds(), 0);
        assert_eq!(*timer.subscribe().borrow(), 0);
    }

    #[test]
    fn stop_publishes_frozen_value() {
        let mut timer = SessionTimer::new(fixed_clock());
        let rx = timer.subscribe();
        timer.start_at(fixed_now());
        timer.stop_at(fixed_now() + ChronoDuration::seconds(12));
        assert_eq!(*rx.borrow(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_publishes_and_stops() {
        let mut timer = SessionTimer::new(fixed_clock());
        let mut rx = timer.subscribe();
        timer.start();
        assert!(timer.has_ticker());

        rx.changed().await.unwrap();
        tokio::time::advance(TICK_PERIOD).await;
        rx.changed().await.unwrap();

        timer.stop();
        assert!(!timer.has_ticker());
        rx.borrow_and_update();

        tokio::time::advance(TICK_PERIOD * 5).await;
        tokio::task::yield_now().await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_timer_aborts_ticker() {
        let mut timer = SessionTimer::new(fixed_clock());
        let mut rx = timer.subscribe();
        timer.start();
        drop(timer);
        rx.borrow_and_update();

        // Every sender is gone once the ticker task is cancelled.
        assert!(rx.changed().await.is_err());
    }
}
