//! Productivity Plugin
//!
//! Tasks and notes over in-memory stores. Handlers validate their required
//! entities, synthesize a record and confirm; search filters and sorts the
//! store by a couple of fields.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use zeeky_plugin_api::prelude::*;

use super::store::{KeyValueStore, MemoryStore};
use crate::register_plugin;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub completed: bool,
    pub created_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub content: String,
    pub created_at: u64,
}

pub struct ProductivityPlugin {
    tasks: Arc<dyn KeyValueStore<Task>>,
    notes: Arc<dyn KeyValueStore<Note>>,
    next_id: AtomicU64,
}

impl ProductivityPlugin {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(MemoryStore::new()),
            notes: Arc::new(MemoryStore::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn entity_text<'a>(intent: &'a Intent, name: &str) -> Option<&'a str> {
        intent
            .entity(name)
            .and_then(|e| e.value.as_str())
            .filter(|s| !s.is_empty())
    }

    fn create_task(&self, intent: &Intent, ctx: &ExecutionContext) -> Response {
        let Some(title) = Self::entity_text(intent, "title") else {
            return Response::error(&ctx.request_id, "Task title is required");
        };

        let task = Task {
            id: self.next_id(),
            title: title.to_string(),
            completed: false,
            created_at: Self::now(),
        };
        let content = format!("Task '{}' has been created.", task.title);
        self.tasks.put(task.id.to_string(), task.clone());

        Response::confirmation(&ctx.request_id, content)
            .with_data(json!({ "task": task }))
    }

    fn search_tasks(&self, intent: &Intent, ctx: &ExecutionContext) -> Response {
        let query = Self::entity_text(intent, "query").unwrap_or("").to_lowercase();

        let mut matches: Vec<Task> = self
            .tasks
            .entries()
            .into_iter()
            .map(|(_, task)| task)
            .filter(|task| query.is_empty() || task.title.to_lowercase().contains(&query))
            .collect();
        // Newest first, ties broken by id for determinism
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Response::data(
            &ctx.request_id,
            format!("Found {} task(s).", matches.len()),
            json!({ "tasks": matches }),
        )
    }

    fn create_note(&self, intent: &Intent, ctx: &ExecutionContext) -> Response {
        let Some(text) = Self::entity_text(intent, "content") else {
            return Response::error(&ctx.request_id, "Note content is required");
        };

        let note = Note {
            id: self.next_id(),
            content: text.to_string(),
            created_at: Self::now(),
        };
        self.notes.put(note.id.to_string(), note.clone());

        Response::confirmation(&ctx.request_id, "Note saved.")
            .with_data(json!({ "note": note }))
    }
}

impl Default for ProductivityPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for ProductivityPlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest::new("productivity", "Productivity", "1.0.0")
            .with_description("Tasks and notes")
    }

    fn intents(&self) -> Vec<String> {
        ["create_task", "search_tasks", "create_note", "note_taking"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    async fn handle_intent(
        &self,
        intent: &Intent,
        ctx: &ExecutionContext,
    ) -> Result<Response, PluginError> {
        match intent.name.as_str() {
            "create_task" => Ok(self.create_task(intent, ctx)),
            "search_tasks" => Ok(self.search_tasks(intent, ctx)),
            "create_note" | "note_taking" => Ok(self.create_note(intent, ctx)),
            other => Err(PluginError::execution(format!(
                "productivity received undeclared intent '{other}'"
            ))),
        }
    }
}

fn create_productivity(_config: &Value) -> Result<Arc<dyn Plugin>, PluginError> {
    Ok(Arc::new(ProductivityPlugin::new()))
}

register_plugin!("productivity", create_productivity);

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ExecutionContext {
        ExecutionContext::new("r1")
    }

    fn task_intent(title: &str) -> Intent {
        Intent::new("create_task").with_entities([Entity::new("title", title)])
    }

    #[tokio::test]
    async fn test_create_task() {
        let plugin = ProductivityPlugin::new();
        let response = plugin
            .handle_intent(&task_intent("buy milk"), &ctx())
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.content, "Task 'buy milk' has been created.");
        assert_eq!(plugin.tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_create_task_requires_title() {
        let plugin = ProductivityPlugin::new();
        let response = plugin
            .handle_intent(&Intent::new("create_task"), &ctx())
            .await
            .unwrap();

        assert!(!response.success);
        assert!(response.content.contains("title"));
        assert!(plugin.tasks.is_empty());
    }

    #[tokio::test]
    async fn test_search_tasks_filters_by_query() {
        let plugin = ProductivityPlugin::new();
        for title in ["buy milk", "buy bread", "walk the dog"] {
            plugin
                .handle_intent(&task_intent(title), &ctx())
                .await
                .unwrap();
        }

        let intent =
            Intent::new("search_tasks").with_entities([Entity::new("query", "Buy")]);
        let response = plugin.handle_intent(&intent, &ctx()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.content, "Found 2 task(s).");
        let tasks = response.data.unwrap()["tasks"].as_array().unwrap().len();
        assert_eq!(tasks, 2);
    }

    #[tokio::test]
    async fn test_create_note_via_nlu_alias() {
        let plugin = ProductivityPlugin::new();
        let intent =
            Intent::new("note_taking").with_entities([Entity::new("content", "remember this")]);
        let response = plugin.handle_intent(&intent, &ctx()).await.unwrap();

        assert!(response.success);
        assert_eq!(plugin.notes.len(), 1);
    }
}
