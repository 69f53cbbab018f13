/*!
 * Relayed Triggers
 * Breakers tripped by a channel or an arbitrary future
 */

use std::future::Future;

use tokio::sync::oneshot;

use crate::breaker::Breaker;

impl Breaker {
    /// Creates a breaker that trips when `trigger` completes.
    ///
    /// The trigger is dropped as soon as it fires or the breaker is closed
    /// from the outside, whichever comes first.
    pub fn from_future<F>(trigger: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self::relay(trigger)
    }

    /// Creates a breaker that trips when `trigger` delivers a message or its
    /// sender is dropped.
    ///
    /// Both outcomes trip the breaker: a closed channel means nobody can
    /// ever signal it again, which is treated the same as an explicit send.
    pub fn from_oneshot(trigger: oneshot::Receiver<()>) -> Self {
        Self::relay(async move {
            let _ = trigger.await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Interrupted;
    use std::time::Duration;

    const DELTA: Duration = Duration::from_millis(10);

    #[tokio::test(start_paused = true)]
    async fn from_oneshot_trips_on_message() {
        let (tx, rx) = oneshot::channel();
        let breaker = Breaker::from_oneshot(rx);
        assert_eq!(breaker.err(), None);

        tx.send(()).unwrap();
        breaker.done().await;

        tokio::time::sleep(DELTA).await;
        assert!(breaker.is_released());
        assert_eq!(breaker.err(), Some(Interrupted));
    }

    #[tokio::test(start_paused = true)]
    async fn from_oneshot_trips_on_sender_drop() {
        let (tx, rx) = oneshot::channel::<()>();
        let breaker = Breaker::from_oneshot(rx);

        drop(tx);
        breaker.done().await;

        tokio::time::sleep(DELTA).await;
        assert!(breaker.is_released());
    }

    #[tokio::test(start_paused = true)]
    async fn from_future_trips_on_completion() {
        let (tx, rx) = oneshot::channel::<()>();
        let breaker = Breaker::from_future(async move {
            let _ = rx.await;
        });
        assert_eq!(breaker.err(), None);

        tx.send(()).unwrap();
        breaker.done().await;

        tokio::time::sleep(DELTA).await;
        assert_eq!(breaker.err(), Some(Interrupted));
    }

    #[tokio::test(start_paused = true)]
    async fn close_drops_the_trigger() {
        let (tx, rx) = oneshot::channel::<()>();
        let breaker = Breaker::from_oneshot(rx);

        breaker.close();
        breaker.done().await;
        tokio::time::sleep(DELTA).await;

        assert!(breaker.is_released());
        // The listener dropped the receiver, so the sender sees a dead channel.
        assert!(tx.is_closed());
    }
}
