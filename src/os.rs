/*!
 * OS Interrupt Sources
 * Breakers tripped by process signal delivery
 */

use std::io;

use crate::breaker::Breaker;

#[cfg(unix)]
pub use tokio::signal::unix::SignalKind;

#[cfg(unix)]
impl Breaker {
    /// Creates a breaker that trips when the process receives any of `kinds`.
    ///
    /// Subscriptions are registered before this returns, so a signal
    /// delivered right after construction is never missed, and the listener
    /// drops them before the release becomes observable. An empty set can
    /// never fire and yields an already-released breaker.
    ///
    /// # Errors
    ///
    /// Returns the OS error if a handler cannot be installed for one of the
    /// kinds.
    pub fn from_signals<I>(kinds: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = SignalKind>,
    {
        use futures::stream::StreamExt;
        use tokio_stream::wrappers::SignalStream;

        let mut streams = Vec::new();
        for kind in kinds {
            streams.push(SignalStream::new(tokio::signal::unix::signal(kind)?));
        }
        if streams.is_empty() {
            return Ok(Self::released());
        }
        Ok(Self::relay(async move {
            let mut merged = futures::stream::select_all(streams);
            merged.next().await;
        }))
    }

    /// Creates a breaker that trips on Ctrl-C (`SIGINT`).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the handler cannot be installed.
    pub fn from_ctrl_c() -> io::Result<Self> {
        Self::from_signals([SignalKind::interrupt()])
    }
}

#[cfg(windows)]
impl Breaker {
    /// Creates a breaker that trips on Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the console handler cannot be installed.
    pub fn from_ctrl_c() -> io::Result<Self> {
        let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
        Ok(Self::relay(async move {
            ctrl_c.recv().await;
        }))
    }
}
