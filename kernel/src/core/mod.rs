//! Core Orchestrator
//!
//! Owns the global startup/shutdown ordering across the kernel's managers:
//! Security → AI → Plugins → Integrations on start, the exact reverse on
//! stop. Security must be live before any plugin can run; integrations
//! depend on plugins being ready.
//!
//! # State Machine
//!
//! ```text
//!  NotStarted ──initialize()──▶ Running ──cleanup()──▶ Stopped
//!       │
//!       ▼ (a manager failed to start)
//!     Failed
//! ```
//!
//! Calling `initialize()` twice, or `cleanup()` before `initialize()`, is a
//! [`CoreError::LifecycleOrder`] rather than undefined behavior.

pub mod ai;
pub mod integration;
pub mod security;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

pub use ai::AiManager;
pub use integration::IntegrationManager;
pub use security::{SecurityError, SecurityManager};

/// Lifecycle contract shared by every kernel manager.
#[async_trait]
pub trait Manager: Send + Sync {
    /// Short manager name used in logs and error reports.
    fn name(&self) -> &'static str;

    /// Bring the manager up. A failure here is fatal to kernel startup.
    async fn start(&self) -> anyhow::Result<()>;

    /// Bring the manager down. Failures are logged and do not block the
    /// rest of the shutdown sequence.
    async fn stop(&self) -> anyhow::Result<()>;
}

/// Orchestrator-level errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// `initialize`/`cleanup` called out of order
    #[error("lifecycle order violation: {0}")]
    LifecycleOrder(String),

    /// A manager failed during startup; already-started managers were
    /// stopped again before this error was surfaced
    #[error("manager '{manager}' failed to start")]
    Startup {
        manager: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A manager failed during shutdown; the remaining managers were still
    /// stopped before this error was surfaced
    #[error("manager '{manager}' failed to stop")]
    Shutdown {
        manager: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// Orchestrator lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreState {
    NotStarted,
    Starting,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl std::fmt::Display for CoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreState::NotStarted => write!(f, "not_started"),
            CoreState::Starting => write!(f, "starting"),
            CoreState::Running => write!(f, "running"),
            CoreState::Stopping => write!(f, "stopping"),
            CoreState::Stopped => write!(f, "stopped"),
            CoreState::Failed => write!(f, "failed"),
        }
    }
}

/// The core orchestrator.
///
/// Managers are constructed once at process start and passed in explicitly;
/// there is no hidden global container, which keeps test setup (a fresh core
/// with mock managers) trivial.
pub struct ZeekyCore {
    managers: Vec<Arc<dyn Manager>>,
    state: Mutex<CoreState>,
}

impl ZeekyCore {
    /// Create a core over an ordered list of managers. Startup runs the
    /// list front to back, shutdown back to front.
    pub fn new(managers: Vec<Arc<dyn Manager>>) -> Self {
        Self {
            managers,
            state: Mutex::new(CoreState::NotStarted),
        }
    }

    /// Current orchestrator state.
    pub fn state(&self) -> CoreState {
        *self.state.lock()
    }

    /// Check-and-set the state under one lock so concurrent lifecycle calls
    /// cannot both pass the guard.
    fn transition(&self, from: CoreState, to: CoreState) -> Result<(), CoreError> {
        let mut state = self.state.lock();
        if *state != from {
            return Err(CoreError::LifecycleOrder(format!(
                "expected state {from}, found {state}"
            )));
        }
        *state = to;
        Ok(())
    }

    fn set_state(&self, to: CoreState) {
        *self.state.lock() = to;
    }

    /// Start all managers in order.
    ///
    /// On failure, managers that did start are stopped again in reverse
    /// order (compensating shutdown) before the error is returned; a
    /// partially initialized core never serves requests.
    pub async fn initialize(&self) -> Result<(), CoreError> {
        self.transition(CoreState::NotStarted, CoreState::Starting)?;

        for (index, manager) in self.managers.iter().enumerate() {
            tracing::info!(manager = manager.name(), "Starting manager");
            if let Err(source) = manager.start().await {
                tracing::error!(
                    manager = manager.name(),
                    error = %source,
                    "Manager failed to start, rolling back"
                );
                self.stop_range(&self.managers[..index]).await;
                self.set_state(CoreState::Failed);
                return Err(CoreError::Startup {
                    manager: manager.name(),
                    source,
                });
            }
        }

        self.set_state(CoreState::Running);
        tracing::info!(managers = self.managers.len(), "Zeeky core running");
        Ok(())
    }

    /// Stop all managers in reverse start order, best effort.
    ///
    /// A failing manager is logged and the sequence continues; the first
    /// failure is reported once the pass completes.
    pub async fn cleanup(&self) -> Result<(), CoreError> {
        self.transition(CoreState::Running, CoreState::Stopping)?;

        let first_error = self.stop_range(&self.managers).await;
        self.set_state(CoreState::Stopped);
        tracing::info!("Zeeky core stopped");

        match first_error {
            None => Ok(()),
            Some((manager, source)) => Err(CoreError::Shutdown { manager, source }),
        }
    }

    /// Stop the given managers in reverse order, continuing past failures.
    async fn stop_range(
        &self,
        managers: &[Arc<dyn Manager>],
    ) -> Option<(&'static str, anyhow::Error)> {
        let mut first_error = None;
        for manager in managers.iter().rev() {
            tracing::info!(manager = manager.name(), "Stopping manager");
            if let Err(source) = manager.stop().await {
                tracing::error!(
                    manager = manager.name(),
                    error = %source,
                    "Manager failed to stop, continuing shutdown"
                );
                if first_error.is_none() {
                    first_error = Some((manager.name(), source));
                }
            }
        }
        first_error
    }
}
