//! Lifecycle ordering tests
//!
//! Exercise plugin and core lifecycle through the public API: sequential
//! startup with fail-fast rollback, reverse-order best-effort shutdown,
//! and the orchestrator's state machine guards.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use zeeky_kernel::core::{CoreError, Manager, ZeekyCore};
use zeeky_kernel::plugin::lifecycle::LifecycleState;
use zeeky_kernel::plugin::{PluginManager, PluginRegistry};
use zeeky_plugin_api::{
    ExecutionContext, Intent, Plugin, PluginError, PluginManifest, Response,
};

/// Shared event log for observing call order across plugins and managers.
type EventLog = Arc<Mutex<Vec<String>>>;

/// Plugin that records lifecycle calls and optionally fails them.
struct ProbePlugin {
    id: &'static str,
    intent: &'static str,
    log: EventLog,
    fail_init: bool,
    fail_cleanup: bool,
}

impl ProbePlugin {
    fn new(id: &'static str, intent: &'static str, log: EventLog) -> Self {
        Self {
            id,
            intent,
            log,
            fail_init: false,
            fail_cleanup: false,
        }
    }

    fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    fn failing_cleanup(mut self) -> Self {
        self.fail_cleanup = true;
        self
    }
}

#[async_trait]
impl Plugin for ProbePlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest::new(self.id, self.id, "1.0.0")
    }

    fn intents(&self) -> Vec<String> {
        vec![self.intent.to_string()]
    }

    async fn initialize(&self) -> Result<(), PluginError> {
        self.log.lock().push(format!("init:{}", self.id));
        if self.fail_init {
            return Err(PluginError::InitializationFailed("probe refused".into()));
        }
        Ok(())
    }

    async fn handle_intent(
        &self,
        _intent: &Intent,
        ctx: &ExecutionContext,
    ) -> Result<Response, PluginError> {
        Ok(Response::confirmation(&ctx.request_id, "ok"))
    }

    async fn cleanup(&self) -> Result<(), PluginError> {
        self.log.lock().push(format!("cleanup:{}", self.id));
        if self.fail_cleanup {
            return Err(PluginError::execution("cleanup refused"));
        }
        Ok(())
    }
}

/// Manager that records start/stop calls and optionally fails them.
struct ProbeManager {
    name: &'static str,
    log: EventLog,
    fail_start: bool,
}

impl ProbeManager {
    fn new(name: &'static str, log: EventLog) -> Arc<Self> {
        Arc::new(Self {
            name,
            log,
            fail_start: false,
        })
    }

    fn failing(name: &'static str, log: EventLog) -> Arc<Self> {
        Arc::new(Self {
            name,
            log,
            fail_start: true,
        })
    }
}

#[async_trait]
impl Manager for ProbeManager {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn start(&self) -> anyhow::Result<()> {
        self.log.lock().push(format!("start:{}", self.name));
        if self.fail_start {
            anyhow::bail!("probe start failure");
        }
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.log.lock().push(format!("stop:{}", self.name));
        Ok(())
    }
}

#[tokio::test]
async fn test_plugins_start_in_registration_order_and_stop_in_reverse() {
    let log: EventLog = Arc::default();
    let registry = Arc::new(PluginRegistry::new());
    registry
        .register(Arc::new(ProbePlugin::new("a", "ia", log.clone())))
        .unwrap();
    registry
        .register(Arc::new(ProbePlugin::new("b", "ib", log.clone())))
        .unwrap();
    registry
        .register(Arc::new(ProbePlugin::new("c", "ic", log.clone())))
        .unwrap();

    let manager = PluginManager::new(registry.clone());
    manager.start().await.unwrap();
    for id in ["a", "b", "c"] {
        assert_eq!(registry.state(id), Some(LifecycleState::Running));
    }

    manager.stop().await.unwrap();
    for id in ["a", "b", "c"] {
        assert_eq!(registry.state(id), Some(LifecycleState::Stopped));
    }

    let events = log.lock().clone();
    assert_eq!(
        events,
        vec![
            "init:a", "init:b", "init:c", "cleanup:c", "cleanup:b", "cleanup:a"
        ]
    );
}

#[tokio::test]
async fn test_failed_plugin_start_rolls_back_started_plugins() {
    let log: EventLog = Arc::default();
    let registry = Arc::new(PluginRegistry::new());
    registry
        .register(Arc::new(ProbePlugin::new("a", "ia", log.clone())))
        .unwrap();
    registry
        .register(Arc::new(ProbePlugin::new("b", "ib", log.clone())))
        .unwrap();
    registry
        .register(Arc::new(
            ProbePlugin::new("c", "ic", log.clone()).failing_init(),
        ))
        .unwrap();

    let manager = PluginManager::new(registry.clone());
    assert!(manager.start().await.is_err());

    // a and b came up, then went down again in reverse; c never ran cleanup.
    let events = log.lock().clone();
    assert_eq!(
        events,
        vec!["init:a", "init:b", "init:c", "cleanup:b", "cleanup:a"]
    );
    assert_eq!(registry.state("c"), Some(LifecycleState::Failed));
}

#[tokio::test]
async fn test_plugin_shutdown_continues_past_failures() {
    let log: EventLog = Arc::default();
    let registry = Arc::new(PluginRegistry::new());
    registry
        .register(Arc::new(ProbePlugin::new("a", "ia", log.clone())))
        .unwrap();
    registry
        .register(Arc::new(
            ProbePlugin::new("b", "ib", log.clone()).failing_cleanup(),
        ))
        .unwrap();
    registry
        .register(Arc::new(ProbePlugin::new("c", "ic", log.clone())))
        .unwrap();

    let manager = PluginManager::new(registry.clone());
    manager.start().await.unwrap();
    let result = manager.stop().await;
    assert!(result.is_err());

    // All three saw cleanup despite b failing, and all report stopped.
    let events = log.lock().clone();
    assert!(events.ends_with(&[
        "cleanup:c".to_string(),
        "cleanup:b".to_string(),
        "cleanup:a".to_string()
    ]));
    for id in ["a", "b", "c"] {
        assert_eq!(registry.state(id), Some(LifecycleState::Stopped));
    }
}

#[tokio::test]
async fn test_core_starts_managers_in_order_and_stops_in_reverse() {
    let log: EventLog = Arc::default();
    let core = ZeekyCore::new(vec![
        ProbeManager::new("security", log.clone()),
        ProbeManager::new("ai", log.clone()),
        ProbeManager::new("plugins", log.clone()),
        ProbeManager::new("integrations", log.clone()),
    ]);

    core.initialize().await.unwrap();
    core.cleanup().await.unwrap();

    let events = log.lock().clone();
    assert_eq!(
        events,
        vec![
            "start:security",
            "start:ai",
            "start:plugins",
            "start:integrations",
            "stop:integrations",
            "stop:plugins",
            "stop:ai",
            "stop:security",
        ]
    );
}

#[tokio::test]
async fn test_core_rolls_back_when_a_manager_fails_to_start() {
    let log: EventLog = Arc::default();
    let core = ZeekyCore::new(vec![
        ProbeManager::new("security", log.clone()),
        ProbeManager::new("ai", log.clone()),
        ProbeManager::failing("plugins", log.clone()),
        ProbeManager::new("integrations", log.clone()),
    ]);

    let err = core.initialize().await.unwrap_err();
    match err {
        CoreError::Startup { manager, .. } => assert_eq!(manager, "plugins"),
        other => panic!("unexpected error: {other}"),
    }

    // The two managers that started were stopped again, newest first;
    // integrations never started at all.
    let events = log.lock().clone();
    assert_eq!(
        events,
        vec![
            "start:security",
            "start:ai",
            "start:plugins",
            "stop:ai",
            "stop:security",
        ]
    );
}

#[tokio::test]
async fn test_core_rejects_out_of_order_lifecycle_calls() {
    let log: EventLog = Arc::default();
    let core = ZeekyCore::new(vec![ProbeManager::new("security", log.clone())]);

    // cleanup before initialize
    assert!(matches!(
        core.cleanup().await,
        Err(CoreError::LifecycleOrder(_))
    ));

    core.initialize().await.unwrap();

    // double initialize
    assert!(matches!(
        core.initialize().await,
        Err(CoreError::LifecycleOrder(_))
    ));

    core.cleanup().await.unwrap();

    // double cleanup
    assert!(matches!(
        core.cleanup().await,
        Err(CoreError::LifecycleOrder(_))
    ));
}
