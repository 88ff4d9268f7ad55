//! Cancellation utilities
//!
//! Provides first-class cancellation handles for in-flight calls.

use crate::error::CozeError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A handle that can be used to request cancellation.
///
/// Clones share the same signal, so one handle can abort several calls.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Create a new, not yet cancelled handle.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation. Calls observing this handle stop as soon as
    /// possible; the pending transport future is dropped, which closes the
    /// underlying connection.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when cancellation is requested.
    pub fn cancelled(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Create a standalone cancel handle that can be shared across tasks.
pub fn new_cancel_handle() -> CancelHandle {
    CancelHandle::new()
}

/// Drive `future` to completion unless `cancel` fires or `timeout` elapses.
///
/// Cancellation wins over a result that becomes ready in the same poll, so a
/// cancelled call never hands back data.
pub async fn run_cancellable<F, T>(
    future: F,
    cancel: Option<&CancelHandle>,
    timeout: Option<Duration>,
) -> Result<T, CozeError>
where
    F: Future<Output = Result<T, CozeError>>,
{
    if let Some(c) = cancel
        && c.is_cancelled()
    {
        return Err(CozeError::Cancelled("cancelled before send".to_string()));
    }

    let deadline = async {
        match timeout {
            Some(t) => tokio::time::sleep(t).await,
            None => std::future::pending::<()>().await,
        }
    };
    let cancelled = async {
        match cancel {
            Some(c) => c.cancelled().await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancelled => Err(CozeError::Cancelled("call cancelled by caller".to_string())),
        _ = deadline => Err(CozeError::TimeoutError(format!(
            "call exceeded deadline of {:?}",
            timeout.unwrap_or_default()
        ))),
        res = future => res,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_wakes_pending_call_immediately() {
        let cancel = new_cancel_handle();
        let waiter = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                run_cancellable(
                    std::future::pending::<Result<(), CozeError>>(),
                    Some(&cancel),
                    None,
                )
                .await
            })
        };

        tokio::task::yield_now().await;
        cancel.cancel();

        let out = tokio::time::timeout(Duration::from_millis(200), waiter)
            .await
            .expect("cancel should wake the waiting task")
            .expect("task ok");
        assert!(matches!(out, Err(CozeError::Cancelled(_))));
    }

    #[tokio::test]
    async fn already_cancelled_handle_short_circuits() {
        let cancel = CancelHandle::new();
        cancel.cancel();
        let out = run_cancellable(async { Ok::<_, CozeError>(1) }, Some(&cancel), None).await;
        assert!(matches!(out, Err(CozeError::Cancelled(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_maps_to_timeout_error() {
        let out = run_cancellable(
            async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok::<_, CozeError>(())
            },
            None,
            Some(Duration::from_millis(50)),
        )
        .await;
        assert!(matches!(out, Err(CozeError::TimeoutError(_))));
    }

    #[tokio::test]
    async fn completed_future_passes_through() {
        let out = run_cancellable(
            async { Ok::<_, CozeError>("done") },
            Some(&CancelHandle::new()),
            Some(Duration::from_secs(5)),
        )
        .await;
        assert_eq!(out.unwrap(), "done");
    }
}
