/*!
 * Breaker Core
 * One-shot cancellation state shared by every handle clone
 */

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};

use futures::future::select_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::{BreakResult, Interrupted};

/// A one-shot cancellation signal shared by everyone working on the same
/// interruptible operation.
///
/// A breaker starts armed, trips exactly once, and never resets. Handles are
/// cheap to clone and every clone observes the same trip:
/// [`done`](Breaker::done) wakes all waiters, [`err`](Breaker::err) starts
/// returning [`Interrupted`], and [`is_released`](Breaker::is_released)
/// reports true once the resources behind the breaker are gone.
///
/// Breakers are built from the event that should trip them: an explicit
/// [`close`](Breaker::close), a relayed [channel](Breaker::from_oneshot) or
/// [future](Breaker::from_future), a [deadline](Breaker::from_deadline) or
/// [timeout](Breaker::from_timeout), [OS signals](Breaker::from_signals), or
/// an existing [`CancellationToken`](crate::CancellationToken).
/// [`multiplex`](crate::multiplex) combines several into first-to-trip.
///
/// Constructors that watch an external trigger spawn one listener task and
/// must be called from within a Tokio runtime. Dropping handles never trips
/// the breaker; an armed breaker with no remaining handles simply becomes
/// unreachable.
#[derive(Clone)]
pub struct Breaker {
    inner: Arc<Inner>,
}

struct Inner {
    source: Source,
    /// Set once the trip has happened and trigger resources are dropped.
    released: AtomicBool,
    /// Run-once guard for the trip itself.
    closer: Once,
}

/// How a breaker is wired to the event that trips it.
enum Source {
    /// No background listener; `close` finalizes inline.
    Direct { done: CancellationToken },
    /// A spawned listener races an external trigger against `done` and
    /// finalizes after dropping the trigger's resources.
    Relay { done: CancellationToken },
    /// First-of-N fan-in; closing the output also closes every input.
    FanIn {
        done: CancellationToken,
        inputs: Box<[Breaker]>,
    },
    /// Full delegation to an external cancellation token.
    Delegated { token: CancellationToken },
}

impl Breaker {
    /// Creates a breaker that trips only on an explicit [`close`](Breaker::close).
    pub fn new() -> Self {
        Self::direct(false)
    }

    /// Creates a breaker that already tripped and released.
    ///
    /// Used wherever a constructor can prove up front that the trigger
    /// condition holds, so no listener needs to be armed.
    pub(crate) fn released() -> Self {
        Self::direct(true)
    }

    fn direct(tripped: bool) -> Self {
        let breaker = Self {
            inner: Arc::new(Inner {
                source: Source::Direct {
                    done: CancellationToken::new(),
                },
                released: AtomicBool::new(false),
                closer: Once::new(),
            }),
        };
        if tripped {
            breaker.close();
        }
        breaker
    }

    /// Creates a breaker tripped by `trigger` completing.
    ///
    /// Spawns the listener shared by every source-bound constructor: it races
    /// `trigger` against the breaker's own channel, drops the trigger and
    /// whatever it holds (timer, subscriptions, channel ends), closes, and
    /// only then marks the breaker released.
    pub(crate) fn relay<F>(trigger: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let done = CancellationToken::new();
        let breaker = Self {
            inner: Arc::new(Inner {
                source: Source::Relay { done: done.clone() },
                released: AtomicBool::new(false),
                closer: Once::new(),
            }),
        };

        let handle = breaker.clone();
        tokio::spawn(async move {
            trace!("breaker listener armed");
            tokio::select! {
                _ = trigger => {}
                _ = done.cancelled() => {}
            }
            // select! has dropped the trigger by now, so its resources are
            // gone before the release becomes observable.
            handle.close();
            handle.inner.released.store(true, Ordering::Release);
            debug!("breaker released");
        });
        breaker
    }

    /// Creates a breaker tripped by the first of `inputs` to trip.
    ///
    /// The caller guarantees `inputs` is non-empty. One listener waits on
    /// every input plus the output's own channel, then closes all of them.
    pub(crate) fn fan_in(inputs: Vec<Breaker>) -> Self {
        debug_assert!(!inputs.is_empty());
        let breaker = Self {
            inner: Arc::new(Inner {
                source: Source::FanIn {
                    done: CancellationToken::new(),
                    inputs: inputs.into_boxed_slice(),
                },
                released: AtomicBool::new(false),
                closer: Once::new(),
            }),
        };

        let handle = breaker.clone();
        tokio::spawn(async move {
            if let Source::FanIn { done, inputs } = &handle.inner.source {
                trace!(inputs = inputs.len(), "fan-in listener armed");
                let mut waits: Vec<Pin<Box<dyn Future<Output = ()> + Send + '_>>> =
                    Vec::with_capacity(inputs.len() + 1);
                for input in inputs.iter() {
                    waits.push(Box::pin(input.done()));
                }
                waits.push(Box::pin(done.cancelled()));
                select_all(waits).await;
            }
            handle.close();
            handle.inner.released.store(true, Ordering::Release);
            debug!("breaker released");
        });
        breaker
    }

    /// Creates a breaker that delegates all state to `token`.
    pub(crate) fn delegated(token: CancellationToken) -> Self {
        Self {
            inner: Arc::new(Inner {
                source: Source::Delegated { token },
                released: AtomicBool::new(false),
                closer: Once::new(),
            }),
        }
    }

    /// Trips the breaker.
    ///
    /// The first close wins; repeated and concurrent calls are no-ops.
    /// Closing a multiplexed breaker also closes every breaker it combines.
    /// Never blocks on listener shutdown.
    pub fn close(&self) {
        match &self.inner.source {
            Source::Delegated { token } => token.cancel(),
            Source::Direct { done } => self.inner.closer.call_once(|| {
                done.cancel();
                self.inner.released.store(true, Ordering::Release);
                debug!("breaker released");
            }),
            Source::Relay { done } => self.inner.closer.call_once(|| done.cancel()),
            Source::FanIn { done, inputs } => self.inner.closer.call_once(|| {
                for input in inputs.iter() {
                    input.close();
                }
                done.cancel();
            }),
        }
    }

    /// Waits until the breaker has tripped.
    ///
    /// Completes immediately if the trip already happened. Any number of
    /// tasks can wait concurrently and all of them are woken by the one trip.
    pub async fn done(&self) {
        self.done_token().cancelled().await;
    }

    /// Returns [`Interrupted`] once the breaker has released.
    ///
    /// `None` means the guarded operation may proceed. After release the
    /// same error is reported forever. Listener-backed breakers release
    /// shortly after the trip, once the listener has dropped its trigger
    /// resources, so `err` can briefly lag [`done`](Breaker::done).
    pub fn err(&self) -> Option<Interrupted> {
        self.is_released().then_some(Interrupted)
    }

    /// Propagation-friendly form of [`err`](Breaker::err).
    ///
    /// # Example
    ///
    /// ```
    /// use tripswitch::{BreakResult, Breaker};
    ///
    /// fn drain(breaker: &Breaker, work: &mut Vec<u32>) -> BreakResult<usize> {
    ///     let mut drained = 0;
    ///     while let Some(_item) = work.pop() {
    ///         breaker.check()?;
    ///         drained += 1;
    ///     }
    ///     Ok(drained)
    /// }
    ///
    /// let breaker = Breaker::new();
    /// assert_eq!(drain(&breaker, &mut vec![1, 2, 3]), Ok(3));
    ///
    /// breaker.close();
    /// assert_eq!(drain(&breaker, &mut vec![4, 5, 6]), Err(tripswitch::Interrupted));
    /// ```
    pub fn check(&self) -> BreakResult<()> {
        match self.err() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Reports whether the breaker has tripped and released its resources.
    ///
    /// Use [`done`](Breaker::done) to wait for the trip itself; this is the
    /// non-blocking state probe behind [`err`](Breaker::err).
    pub fn is_released(&self) -> bool {
        match &self.inner.source {
            Source::Delegated { token } => token.is_cancelled(),
            _ => self.inner.released.load(Ordering::Acquire),
        }
    }

    /// Reports whether the trip notification has fired, regardless of
    /// whether the listener has finished releasing resources.
    pub(crate) fn is_tripped(&self) -> bool {
        self.done_token().is_cancelled()
    }

    fn done_token(&self) -> &CancellationToken {
        match &self.inner.source {
            Source::Direct { done } | Source::Relay { done } | Source::FanIn { done, .. } => done,
            Source::Delegated { token } => token,
        }
    }

    fn source_name(&self) -> &'static str {
        match &self.inner.source {
            Source::Direct { .. } => "direct",
            Source::Relay { .. } => "relay",
            Source::FanIn { .. } => "fan-in",
            Source::Delegated { .. } => "token",
        }
    }
}

impl Default for Breaker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Breaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Breaker")
            .field("source", &self.source_name())
            .field("released", &self.is_released())
            .finish()
    }
}
