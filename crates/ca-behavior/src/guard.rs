//! Coordinator-level containment and bookkeeping.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::Serialize;
use tracing::error;

/// Invocation and oracle-usage counters for one coordinator.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CoordinatorStats {
    /// Number of `forward` calls.
    pub trigger_count:     u64,
    /// Oracle tokens spent inside those calls.
    pub token_consumption: u64,
}

/// Run `fut`, turning a panic into `Err` with the panic message.
///
/// State borrowed by `fut` may be left mid-update when a panic is caught.
pub async fn guarded<F, T>(label: &str, fut: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(value) => Ok(value),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_owned());
            error!(coordinator = label, panic = %message, "behavior panicked");
            Err(message)
        }
    }
}
