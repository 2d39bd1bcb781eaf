//! Integration Manager
//!
//! Tracks the outbound integrations (Slack, CRMs, ...) the operator has
//! configured. The kernel never calls a provider API itself; it only hands
//! plugins a record of what is configured, so this manager is bookkeeping
//! plus lifecycle.

use async_trait::async_trait;
use parking_lot::RwLock;

use super::Manager;

pub struct IntegrationManager {
    configured: Vec<String>,
    connected: RwLock<bool>,
}

impl IntegrationManager {
    pub fn new(configured: Vec<String>) -> Self {
        Self {
            configured,
            connected: RwLock::new(false),
        }
    }

    /// Names of configured integrations.
    pub fn integrations(&self) -> &[String] {
        &self.configured
    }

    /// Whether the manager has been started.
    pub fn is_connected(&self) -> bool {
        *self.connected.read()
    }
}

#[async_trait]
impl Manager for IntegrationManager {
    fn name(&self) -> &'static str {
        "integrations"
    }

    async fn start(&self) -> anyhow::Result<()> {
        for name in &self.configured {
            tracing::info!(integration = %name, "Integration registered");
        }
        *self.connected.write() = true;
        tracing::info!(count = self.configured.len(), "Integration manager started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        *self.connected.write() = false;
        tracing::info!("Integration manager stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lifecycle_tracks_connection() {
        let manager = IntegrationManager::new(vec!["slack".into()]);
        assert!(!manager.is_connected());

        manager.start().await.unwrap();
        assert!(manager.is_connected());
        assert_eq!(manager.integrations(), ["slack".to_string()]);

        manager.stop().await.unwrap();
        assert!(!manager.is_connected());
    }
}
