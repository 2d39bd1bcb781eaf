//! Intent and entity types.
//!
//! An intent is a named, structured representation of what the user wants
//! done, together with the parameters ("entities") extracted by upstream NLU.
//! Intents are transient: constructed per request, never persisted, never
//! mutated after creation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single extracted parameter of an intent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    /// Entity name/type (e.g., "media_type", "event_type")
    pub name: String,

    /// Extracted value; free-form JSON so plugins can carry structured data
    pub value: Value,

    /// Start token index in the source utterance, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,

    /// End token index (exclusive) in the source utterance, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl Entity {
    /// Create an entity without span information.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            start: None,
            end: None,
        }
    }

    /// Create an entity with a token span from the source utterance.
    pub fn spanned(
        name: impl Into<String>,
        value: impl Into<Value>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            start: Some(start),
            end: Some(end),
        }
    }
}

/// A named user intent with extracted entities.
///
/// `confidence` is informational only (0.0 to 1.0); the kernel does not
/// enforce a threshold on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    /// Intent identifier (e.g., "create_task", "turn_on")
    pub name: String,

    /// Classifier confidence, 0.0 to 1.0
    #[serde(default = "default_confidence")]
    pub confidence: f32,

    /// Extracted entities, in utterance order
    #[serde(default)]
    pub entities: Vec<Entity>,
}

fn default_confidence() -> f32 {
    1.0
}

impl Intent {
    /// Create an intent with full confidence and no entities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            confidence: 1.0,
            entities: Vec::new(),
        }
    }

    /// Set the confidence score.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Attach entities.
    pub fn with_entities(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        self.entities.extend(entities);
        self
    }

    /// Look up the first entity with the given name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}
