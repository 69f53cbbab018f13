/*!
 * Deadline and Timeout Sources
 * Breakers tripped by the timer wheel
 */

use std::time::{Duration, Instant};

use crate::breaker::Breaker;

impl Breaker {
    /// Creates a breaker that trips once `deadline` is reached.
    ///
    /// A deadline at or before the current instant yields an
    /// already-released breaker without arming a timer. Deadlines are
    /// monotonic; wall-clock adjustments do not move them.
    pub fn from_deadline(deadline: Instant) -> Self {
        if deadline <= Instant::now() {
            return Self::released();
        }
        Self::relay(async move {
            tokio::time::sleep_until(deadline.into()).await;
        })
    }

    /// Creates a breaker that trips once `timeout` has elapsed.
    ///
    /// A zero timeout yields an already-released breaker.
    pub fn from_timeout(timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Self::from_deadline(deadline),
            // Past the clock's horizon; such a timer never elapses.
            None => Self::relay(std::future::pending()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Interrupted;

    const DELTA: Duration = Duration::from_millis(10);

    #[tokio::test(start_paused = true)]
    async fn from_timeout_trips_at_the_deadline() {
        let breaker = Breaker::from_timeout(DELTA * 5);
        assert_eq!(breaker.err(), None);

        let started = tokio::time::Instant::now();
        breaker.done().await;
        let elapsed = started.elapsed();

        assert!(elapsed >= DELTA * 4, "tripped early: {elapsed:?}");
        assert!(elapsed <= DELTA * 6, "tripped late: {elapsed:?}");

        tokio::time::sleep(DELTA).await;
        assert!(breaker.is_released());
        assert_eq!(breaker.err(), Some(Interrupted));
    }

    #[tokio::test(start_paused = true)]
    async fn close_beats_the_timer() {
        let breaker = Breaker::from_timeout(DELTA * 5);
        let started = tokio::time::Instant::now();

        tokio::time::sleep(DELTA).await;
        breaker.close();
        breaker.done().await;

        assert!(started.elapsed() < DELTA * 5);
        tokio::time::sleep(DELTA).await;
        assert!(breaker.is_released());
    }

    #[test]
    fn past_deadline_is_already_released() {
        let now = Instant::now();
        let past = now.checked_sub(Duration::from_secs(1)).unwrap_or(now);
        let breaker = Breaker::from_deadline(past);
        assert!(breaker.is_released());
        assert_eq!(breaker.err(), Some(Interrupted));
    }

    #[test]
    fn zero_timeout_is_already_released() {
        let breaker = Breaker::from_timeout(Duration::ZERO);
        assert!(breaker.is_released());
    }

    #[tokio::test(start_paused = true)]
    async fn future_deadline_arms_a_timer() {
        let breaker = Breaker::from_deadline(Instant::now() + DELTA * 5);
        assert_eq!(breaker.err(), None);

        breaker.done().await;
        tokio::time::sleep(DELTA).await;
        assert!(breaker.is_released());
    }
}
