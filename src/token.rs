/*!
 * Cancellation-Token Adapters
 * Bridges between breakers and the wider tokio-util token protocol
 */

use tracing::debug;

use crate::breaker::Breaker;

pub use tokio_util::sync::CancellationToken;

impl Breaker {
    /// Creates a breaker that delegates all state to `token`.
    ///
    /// [`done`](Breaker::done), [`err`](Breaker::err),
    /// [`is_released`](Breaker::is_released) and [`close`](Breaker::close)
    /// all read or drive the token directly, so breaker and token can never
    /// disagree: cancelling the token trips the breaker, and closing the
    /// breaker cancels the token. There is no listener here and no release
    /// lag.
    pub fn from_token(token: CancellationToken) -> Self {
        Self::delegated(token)
    }

    /// Returns a fresh token that is cancelled once this breaker trips.
    ///
    /// The breaker's own notification channel is never handed out; the
    /// bridge is one background task that forwards the trip and exits. A
    /// breaker that already tripped yields a token that is cancelled before
    /// this returns.
    pub fn to_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        if self.is_tripped() {
            token.cancel();
            return token;
        }

        let bridge = token.clone();
        let breaker = self.clone();
        tokio::spawn(async move {
            breaker.done().await;
            bridge.cancel();
            debug!("breaker trip forwarded to token");
        });
        token
    }
}
