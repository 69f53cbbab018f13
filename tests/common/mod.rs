/*!
 * Shared Test Helpers
 * Release-state assertions used across the breaker integration tests
 */

#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use tripswitch::{Breaker, Interrupted};

/// Scheduler slack granted to listener tasks in timing assertions.
pub const DELTA: Duration = Duration::from_millis(10);

/// Installs the test log subscriber once per test binary.
///
/// Run tests with `RUST_LOG=tripswitch=trace` to watch listeners arm and
/// release.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Asserts that the breaker reports released after its listener has had
/// time to drop trigger resources.
pub async fn assert_released(breaker: &Breaker) {
    tokio::time::sleep(DELTA).await;
    assert_released_now(breaker);
}

/// Asserts that the breaker reports released without granting listener
/// slack. Only valid for breakers whose release happens inline.
pub fn assert_released_now(breaker: &Breaker) {
    assert!(breaker.is_released(), "breaker has not released");
    assert_eq!(breaker.err(), Some(Interrupted));
    assert_eq!(breaker.check(), Err(Interrupted));
}

/// Asserts that the breaker is still armed.
pub fn assert_armed(breaker: &Breaker) {
    assert!(!breaker.is_released(), "breaker released prematurely");
    assert_eq!(breaker.err(), None);
    assert_eq!(breaker.check(), Ok(()));
}
