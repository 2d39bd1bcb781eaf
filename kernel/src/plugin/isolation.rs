//! Plugin Isolation and Panic Safety
//!
//! Panics in plugin code are caught with `catch_unwind` and converted to
//! [`PluginError::Panic`], preventing one broken plugin from crashing the
//! dispatch loop.
//!
//! # Safety Considerations
//!
//! - `catch_unwind` only catches panics, not aborts
//! - Panics in sub-tasks a plugin spawns itself are not caught

use std::any::Any;
use std::panic::{AssertUnwindSafe, UnwindSafe, catch_unwind};

use zeeky_plugin_api::PluginError;

/// Safely call a synchronous plugin function with panic catching.
///
/// Ordinary `Err` results pass through untouched; a panic becomes
/// [`PluginError::Panic`].
///
/// ```ignore
/// let plugin = call_plugin_safely(AssertUnwindSafe(|| factory(&config)))?;
/// ```
pub fn call_plugin_safely<F, T>(plugin_fn: F) -> Result<T, PluginError>
where
    F: FnOnce() -> Result<T, PluginError> + UnwindSafe,
{
    match catch_unwind(plugin_fn) {
        Ok(result) => result,
        Err(panic_info) => {
            let msg = extract_panic_message(&panic_info);
            tracing::error!(message = %msg, "Plugin panicked");
            Err(PluginError::Panic(msg))
        }
    }
}

/// Safely call an async plugin function with panic catching.
///
/// Catches panics during both future creation and polling. The wrapped
/// future's own `Err` results pass through untouched.
///
/// ```ignore
/// let response = call_plugin_safely_async(AssertUnwindSafe(|| async {
///     plugin.handle_intent(&intent, &ctx).await
/// }))
/// .await?;
/// ```
pub async fn call_plugin_safely_async<F, Fut, T>(plugin_fn: F) -> Result<T, PluginError>
where
    F: FnOnce() -> Fut + UnwindSafe,
    Fut: std::future::Future<Output = Result<T, PluginError>>,
{
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    // Wrapper future that catches panics during poll
    struct CatchUnwindFuture<F> {
        inner: F,
    }

    impl<F: Future> Future for CatchUnwindFuture<AssertUnwindSafe<F>> {
        type Output = Result<F::Output, Box<dyn Any + Send>>;

        fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
            // SAFETY: We're only projecting to the inner field
            let inner = unsafe { self.map_unchecked_mut(|s| &mut s.inner) };

            match catch_unwind(AssertUnwindSafe(|| inner.poll(cx))) {
                Ok(Poll::Ready(output)) => Poll::Ready(Ok(output)),
                Ok(Poll::Pending) => Poll::Pending,
                Err(panic_info) => Poll::Ready(Err(panic_info)),
            }
        }
    }

    // First, safely create the future
    let future = match catch_unwind(plugin_fn) {
        Ok(fut) => fut,
        Err(panic_info) => {
            let msg = extract_panic_message(&panic_info);
            tracing::error!(message = %msg, "Plugin panicked during future creation");
            return Err(PluginError::Panic(msg));
        }
    };

    let catch_future = CatchUnwindFuture {
        inner: AssertUnwindSafe(future),
    };

    match catch_future.await {
        Ok(result) => result,
        Err(panic_info) => {
            let msg = extract_panic_message(&panic_info);
            tracing::error!(message = %msg, "Plugin panicked during async execution");
            Err(PluginError::Panic(msg))
        }
    }
}

/// Extract a human-readable message from panic info.
///
/// Handles the common panic payload types (&str and String) and falls back
/// to a generic message.
fn extract_panic_message(panic_info: &Box<dyn Any + Send>) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic (non-string payload)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_plugin_safely_success() {
        let result = call_plugin_safely(|| Ok(42));
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_call_plugin_safely_error_passes_through() {
        let result: Result<i32, PluginError> =
            call_plugin_safely(|| Err(PluginError::execution("test error")));
        match result {
            Err(PluginError::Execution(msg)) => assert!(msg.contains("test error")),
            other => panic!("Expected Execution error, got {other:?}"),
        }
    }

    #[test]
    fn test_call_plugin_safely_panic_str() {
        let result: Result<i32, PluginError> = call_plugin_safely(|| {
            panic!("test panic message");
        });
        match result {
            Err(PluginError::Panic(msg)) => assert!(msg.contains("test panic message")),
            other => panic!("Expected Panic error, got {other:?}"),
        }
    }

    #[test]
    fn test_call_plugin_safely_panic_string() {
        let result: Result<i32, PluginError> = call_plugin_safely(|| {
            panic!("{}", "dynamic panic message".to_string());
        });
        match result {
            Err(PluginError::Panic(msg)) => assert!(msg.contains("dynamic panic message")),
            other => panic!("Expected Panic error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_plugin_safely_async_success() {
        let result = call_plugin_safely_async(|| async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_call_plugin_safely_async_error_passes_through() {
        let result: Result<i32, PluginError> =
            call_plugin_safely_async(|| async { Err(PluginError::execution("async error")) })
                .await;
        match result {
            Err(PluginError::Execution(msg)) => assert!(msg.contains("async error")),
            other => panic!("Expected Execution error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_plugin_safely_async_panic_in_poll() {
        let result: Result<i32, PluginError> = call_plugin_safely_async(|| async {
            tokio::task::yield_now().await;
            panic!("poll panic");
        })
        .await;
        match result {
            Err(PluginError::Panic(msg)) => assert!(msg.contains("poll panic")),
            other => panic!("Expected Panic error, got {other:?}"),
        }
    }
}
