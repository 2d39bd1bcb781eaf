//! Keyword-based NLU
//!
//! Classifies raw utterance text into a named intent and extracts toy
//! entities. This is a deliberate placeholder for an upstream ML model; the
//! categories and the fixed confidence mirror the original kernel service
//! so downstream plugins see stable intent names.

use zeeky_plugin_api::{Entity, Intent};

/// Placeholder confidence reported for every classification.
const CLASSIFIER_CONFIDENCE: f32 = 0.8;

/// Intent name used when no category matches.
pub const GENERAL_QUERY: &str = "general_query";

/// Keyword table: first category with a matching keyword wins.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("music_control", &["play", "music", "song", "album"]),
    (
        "calendar_management",
        &["schedule", "meeting", "calendar", "appointment"],
    ),
    ("note_taking", &["note", "remember", "write", "save"]),
    ("weather_query", &["weather", "temperature", "forecast"]),
    ("news_query", &["news", "headlines", "update"]),
];

/// Keyword-driven intent classifier.
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify an utterance into an intent name.
    pub fn classify(&self, text: &str) -> &'static str {
        let lower = text.to_lowercase();
        for (intent, keywords) in CATEGORIES {
            if keywords.iter().any(|kw| lower.contains(kw)) {
                return intent;
            }
        }
        GENERAL_QUERY
    }

    /// Extract entities with token spans from an utterance.
    pub fn extract_entities(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();
        for (i, word) in text.split_whitespace().enumerate() {
            let lower = word.to_lowercase();
            if matches!(lower.as_str(), "music" | "song" | "album") {
                entities.push(Entity::spanned("media_type", word, i, i + 1));
            } else if matches!(lower.as_str(), "meeting" | "appointment") {
                entities.push(Entity::spanned("event_type", word, i, i + 1));
            }
        }
        entities
    }

    /// Full analysis: classification plus entity extraction.
    pub fn analyze(&self, text: &str) -> Intent {
        Intent::new(self.classify(text))
            .with_confidence(CLASSIFIER_CONFIDENCE)
            .with_entities(self.extract_entities(text))
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}
