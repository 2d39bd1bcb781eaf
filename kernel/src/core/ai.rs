//! AI Manager
//!
//! Hosts the NLU pipeline that turns raw utterance text into a structured
//! [`Intent`](zeeky_plugin_api::Intent) before routing. The classifier
//! itself is a keyword placeholder (see [`crate::nlu`]); this manager exists
//! so a real model can slot in behind the same lifecycle seam.

use async_trait::async_trait;

use zeeky_plugin_api::Intent;

use super::Manager;
use crate::nlu::IntentClassifier;

pub struct AiManager {
    classifier: IntentClassifier,
}

impl AiManager {
    pub fn new() -> Self {
        Self {
            classifier: IntentClassifier::new(),
        }
    }

    /// Turn utterance text into a structured intent.
    pub fn analyze(&self, text: &str) -> Intent {
        let intent = self.classifier.analyze(text);
        tracing::debug!(
            intent = %intent.name,
            confidence = intent.confidence,
            entities = intent.entities.len(),
            "Classified utterance"
        );
        intent
    }
}

impl Default for AiManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Manager for AiManager {
    fn name(&self) -> &'static str {
        "ai"
    }

    async fn start(&self) -> anyhow::Result<()> {
        tracing::info!("AI manager started (keyword classifier)");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!("AI manager stopped");
        Ok(())
    }
}
