//! Plugin Lifecycle State
//!
//! Every registered plugin moves through an explicit state machine. The
//! router refuses to dispatch to a plugin that is not `Running`, which turns
//! out-of-order calls (e.g. `handle_intent` before `initialize` completed)
//! into defined errors instead of undefined behavior.
//!
//! # State Machine
//!
//! ```text
//!  Uninitialized ──▶ Starting ──▶ Running ──▶ Stopping ──▶ Stopped
//!                       │
//!                       ▼
//!                     Failed
//! ```

use std::time::Instant;

/// Lifecycle state of a registered plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Registered, `initialize()` not yet called
    #[default]
    Uninitialized,

    /// `initialize()` in progress
    Starting,

    /// Initialized and accepting dispatches
    Running,

    /// `cleanup()` in progress
    Stopping,

    /// Cleaned up
    Stopped,

    /// `initialize()` returned an error or panicked
    Failed,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Uninitialized => write!(f, "uninitialized"),
            LifecycleState::Starting => write!(f, "starting"),
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::Stopping => write!(f, "stopping"),
            LifecycleState::Stopped => write!(f, "stopped"),
            LifecycleState::Failed => write!(f, "failed"),
        }
    }
}

impl LifecycleState {
    /// Check if the plugin can accept intent dispatches.
    pub fn can_dispatch(&self) -> bool {
        matches!(self, LifecycleState::Running)
    }

    /// Check if the plugin can be started.
    pub fn can_start(&self) -> bool {
        matches!(self, LifecycleState::Uninitialized | LifecycleState::Stopped)
    }

    /// Check if the plugin can be stopped.
    pub fn can_stop(&self) -> bool {
        matches!(self, LifecycleState::Running)
    }
}

/// Per-plugin bookkeeping kept by the registry alongside the descriptor.
#[derive(Debug)]
pub struct PluginEntry {
    /// Current lifecycle state
    pub state: LifecycleState,

    /// Time when the plugin was registered
    pub registered_at: Instant,

    /// Time when the plugin last handled a dispatch
    pub last_active: Instant,

    /// Number of dispatches handled
    pub call_count: u64,

    /// Number of dispatches that failed
    pub error_count: u64,

    /// Last error message, if any
    pub last_error: Option<String>,
}

impl PluginEntry {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            state: LifecycleState::Uninitialized,
            registered_at: now,
            last_active: now,
            call_count: 0,
            error_count: 0,
            last_error: None,
        }
    }

    /// Record a successful dispatch.
    pub fn record_success(&mut self) {
        self.last_active = Instant::now();
        self.call_count += 1;
    }

    /// Record a failed dispatch.
    pub fn record_error(&mut self, error: impl Into<String>) {
        self.last_active = Instant::now();
        self.call_count += 1;
        self.error_count += 1;
        self.last_error = Some(error.into());
    }

    /// Transition to a new state.
    pub fn transition(&mut self, new_state: LifecycleState) {
        tracing::debug!(
            from = %self.state,
            to = %new_state,
            "Plugin state transition"
        );
        self.state = new_state;
    }

    /// Time since registration.
    pub fn uptime(&self) -> std::time::Duration {
        self.registered_at.elapsed()
    }

    /// Time since the last dispatch.
    pub fn idle_time(&self) -> std::time::Duration {
        self.last_active.elapsed()
    }
}

impl Default for PluginEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of a plugin's health for the status surface.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PluginMetrics {
    /// Number of dispatches handled
    pub call_count: u64,
    /// Number of dispatches that failed
    pub error_count: u64,
    /// Error rate (0.0 to 1.0)
    pub error_rate: f64,
    /// Last error message, if any
    pub last_error: Option<String>,
    /// Seconds since registration
    pub uptime_seconds: u64,
    /// Seconds since the last dispatch
    pub idle_seconds: u64,
    /// Current lifecycle state
    pub state: String,
}

impl From<&PluginEntry> for PluginMetrics {
    fn from(entry: &PluginEntry) -> Self {
        Self {
            call_count: entry.call_count,
            error_count: entry.error_count,
            error_rate: if entry.call_count > 0 {
                entry.error_count as f64 / entry.call_count as f64
            } else {
                0.0
            },
            last_error: entry.last_error.clone(),
            uptime_seconds: entry.uptime().as_secs(),
            idle_seconds: entry.idle_time().as_secs(),
            state: entry.state.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(format!("{}", LifecycleState::Running), "running");
        assert_eq!(format!("{}", LifecycleState::Failed), "failed");
    }

    #[test]
    fn test_state_transitions() {
        assert!(LifecycleState::Uninitialized.can_start());
        assert!(LifecycleState::Stopped.can_start());
        assert!(!LifecycleState::Running.can_start());
        assert!(LifecycleState::Running.can_stop());
        assert!(!LifecycleState::Stopped.can_stop());
        assert!(LifecycleState::Running.can_dispatch());
        assert!(!LifecycleState::Starting.can_dispatch());
    }

    #[test]
    fn test_plugin_entry() {
        let mut entry = PluginEntry::new();
        assert_eq!(entry.state, LifecycleState::Uninitialized);
        assert_eq!(entry.call_count, 0);

        entry.record_success();
        assert_eq!(entry.call_count, 1);

        entry.record_error("test error");
        assert_eq!(entry.call_count, 2);
        assert_eq!(entry.error_count, 1);
        assert!(entry.last_error.as_ref().unwrap().contains("test error"));

        entry.transition(LifecycleState::Running);
        assert_eq!(entry.state, LifecycleState::Running);

        let metrics = PluginMetrics::from(&entry);
        assert_eq!(metrics.call_count, 2);
        assert!((metrics.error_rate - 0.5).abs() < f64::EPSILON);
        assert_eq!(metrics.state, "running");
    }
}
