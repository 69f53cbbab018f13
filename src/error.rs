/*!
 * Interruption Error
 * Terminal error reported by released breakers
 */

use thiserror::Error;

/// The error a released breaker reports from [`err`](crate::Breaker::err)
/// and [`check`](crate::Breaker::check).
///
/// Every interruption maps to this one value. The breaker does not record
/// which source tripped it, so a reached deadline, a delivered signal and an
/// explicit close are indistinguishable here; callers that need to tell them
/// apart should hold on to the individual breakers before multiplexing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[error("operation interrupted")]
pub struct Interrupted;

/// Result type for cooperative interruption checks
pub type BreakResult<T> = Result<T, Interrupted>;
