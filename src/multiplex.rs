/*!
 * Breaker Multiplexing
 * First-of-N fan-in over independent cancellation sources
 */

use tracing::trace;

use crate::breaker::Breaker;

/// Combines any number of breakers into one that trips as soon as the first
/// of them trips.
///
/// The combined breaker owns its inputs: when it trips, for whatever reason,
/// every input is closed too, so their timers, subscriptions and channels are
/// torn down along with it. Closing the combined breaker directly has the
/// same effect.
///
/// Combining zero breakers yields an already-released breaker. A guard
/// assembled from no sources has nothing that could ever trip it, and
/// treating it as already interrupted is safer than handing out a breaker
/// that waits forever.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use tripswitch::{multiplex, Breaker};
///
/// # async fn run() -> std::io::Result<()> {
/// let breaker = multiplex([
///     Breaker::from_ctrl_c()?,
///     Breaker::from_timeout(Duration::from_secs(60)),
/// ]);
///
/// tokio::select! {
///     _ = breaker.done() => { /* interrupted or out of time */ }
///     _ = serve() => {}
/// }
/// # Ok(())
/// # }
/// # async fn serve() {}
/// ```
pub fn multiplex<I>(breakers: I) -> Breaker
where
    I: IntoIterator<Item = Breaker>,
{
    let inputs: Vec<Breaker> = breakers.into_iter().collect();
    trace!(inputs = inputs.len(), "multiplexing breakers");
    if inputs.is_empty() {
        return Breaker::released();
    }
    Breaker::fan_in(inputs)
}
