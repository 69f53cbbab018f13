/*!
 * Tripswitch
 * Composable cancellation breakers for interruptible operations
 *
 * A [`Breaker`] is a one-shot cancellation signal: it trips at most once,
 * every clone observes the trip, and once released it reports the same
 * [`Interrupted`] error forever. Breakers are built from the event that
 * should stop the work: an explicit close, a relayed channel or future, a
 * deadline or timeout, OS signal delivery, or an existing cancellation
 * token. [`multiplex`] combines any number of them into first-to-trip.
 *
 * ```no_run
 * use std::time::Duration;
 * use tripswitch::{multiplex, Breaker};
 *
 * #[tokio::main]
 * async fn main() -> std::io::Result<()> {
 *     let breaker = multiplex([
 *         Breaker::from_ctrl_c()?,
 *         Breaker::from_timeout(Duration::from_secs(60)),
 *     ]);
 *
 *     while breaker.check().is_ok() {
 *         // one bounded unit of work per iteration
 *     }
 *     Ok(())
 * }
 * ```
 */

mod breaker;
mod error;
mod multiplex;
mod os;
mod relay;
mod time;
mod token;

pub use breaker::Breaker;
pub use error::{BreakResult, Interrupted};
pub use multiplex::multiplex;
#[cfg(unix)]
pub use os::SignalKind;
pub use token::CancellationToken;
