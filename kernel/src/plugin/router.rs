//! Intent Router
//!
//! Single entry point for dispatching one intent to its owning plugin and
//! normalizing the outcome. This is the error-isolation boundary of the
//! kernel: whatever a plugin does (return an error, panic, hang past the
//! deadline), `route` returns a well-formed [`Response`] envelope and never
//! propagates the failure to its caller.
//!
//! Dispatch is at-most-once; there are no retries at this layer.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use zeeky_plugin_api::{ExecutionContext, Intent, PluginError, Response};

use super::isolation::call_plugin_safely_async;
use super::registry::PluginRegistry;

/// Default per-dispatch deadline.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Dispatches intents to registered plugins.
pub struct IntentRouter {
    registry: Arc<PluginRegistry>,
    dispatch_timeout: Duration,
}

impl IntentRouter {
    /// Create a router over a registry with the default deadline.
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self::with_timeout(registry, DEFAULT_DISPATCH_TIMEOUT)
    }

    /// Create a router with an explicit per-dispatch deadline.
    pub fn with_timeout(registry: Arc<PluginRegistry>, dispatch_timeout: Duration) -> Self {
        Self {
            registry,
            dispatch_timeout,
        }
    }

    /// The registry this router resolves against.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// Dispatch one intent.
    ///
    /// 1. Resolve the owning plugin; unknown intents become error envelopes.
    /// 2. Refuse plugins that are not running (lifecycle guard).
    /// 3. Invoke `handle_intent` under panic isolation and a deadline.
    /// 4. Translate any failure into the uniform error envelope.
    /// 5. Fill in a missing `request_id` from the context.
    pub async fn route(&self, intent: &Intent, ctx: &ExecutionContext) -> Response {
        let Some(descriptor) = self.registry.resolve(&intent.name) else {
            tracing::warn!(
                intent = %intent.name,
                request_id = %ctx.request_id,
                "No plugin registered for intent"
            );
            return Response::error(
                &ctx.request_id,
                format!("No plugin can handle intent '{}'", intent.name),
            );
        };

        // Lifecycle guard: dispatching to a plugin whose initialize() has
        // not completed (or that already stopped) is a defined error, not
        // undefined behavior
        let state = self.registry.state(&descriptor.id);
        if !state.is_some_and(|s| s.can_dispatch()) {
            let guard_err = PluginError::LifecycleOrder {
                plugin: descriptor.id.clone(),
                detail: format!(
                    "cannot handle intent '{}' while {}",
                    intent.name,
                    state.map_or_else(|| "unregistered".to_string(), |s| s.to_string())
                ),
            };
            tracing::warn!(
                plugin_id = %descriptor.id,
                intent = %intent.name,
                request_id = %ctx.request_id,
                "Rejected dispatch to non-running plugin"
            );
            self.registry
                .record_error(&descriptor.id, guard_err.to_string());
            return Response::error(&ctx.request_id, guard_err.to_string());
        }

        let plugin = descriptor.plugin.clone();
        let invocation = call_plugin_safely_async(AssertUnwindSafe(|| async {
            plugin.handle_intent(intent, ctx).await
        }));

        let result = match tokio::time::timeout(self.dispatch_timeout, invocation).await {
            Ok(result) => result,
            Err(_) => Err(PluginError::Timeout {
                timeout_ms: self.dispatch_timeout.as_millis() as u64,
            }),
        };

        match result {
            Ok(response) => {
                self.registry.record_success(&descriptor.id);
                self.normalize(response, &descriptor.id, ctx)
            }
            Err(err) => {
                tracing::error!(
                    plugin_id = %descriptor.id,
                    intent = %intent.name,
                    request_id = %ctx.request_id,
                    error = %err,
                    "Plugin dispatch failed"
                );
                self.registry.record_error(&descriptor.id, err.to_string());
                Response::error(&ctx.request_id, err.to_string())
            }
        }
    }

    /// Defensive normalization of a plugin-produced envelope. Plugins are
    /// not trusted to echo the request id or keep the envelope invariant.
    fn normalize(
        &self,
        mut response: Response,
        plugin_id: &str,
        ctx: &ExecutionContext,
    ) -> Response {
        if response.request_id.is_empty() {
            response.request_id = ctx.request_id.clone();
        } else if response.request_id != ctx.request_id {
            tracing::warn!(
                plugin_id = %plugin_id,
                got = %response.request_id,
                expected = %ctx.request_id,
                "Plugin returned mismatched request id, overriding"
            );
            response.request_id = ctx.request_id.clone();
        }

        if !response.is_well_formed() {
            tracing::warn!(
                plugin_id = %plugin_id,
                kind = %response.kind,
                success = response.success,
                "Plugin returned malformed envelope, coercing to error"
            );
            return Response::error(
                &ctx.request_id,
                response
                    .error
                    .unwrap_or_else(|| format!("plugin '{plugin_id}' returned a malformed response")),
            );
        }

        response
    }
}
