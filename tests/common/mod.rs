//! Common test utilities, fixtures, and mocks
//! This module contains shared functionality used across the integration tests

#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use std::future::Future;
use std::time::Duration;

/// How long [`wait_until`] polls before giving up
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Common test setup and utilities
pub mod test_utils {
    use std::sync::Once;
    use tracing::Level;

    static INIT: Once = Once::new();

    /// Initialize test environment
    pub fn init() {
        INIT.call_once(|| {
            // Initialize tracing for tests
            tracing_subscriber::fmt()
                .with_max_level(Level::DEBUG)
                .with_test_writer()
                .init();
        });
    }
}

/// Poll `condition` until it holds or [`WAIT_TIMEOUT`] passes. Returns whether it held.
pub async fn wait_until<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
    loop {
        if condition().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Let spawned tasks run for a moment, for asserting that something did not happen.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
