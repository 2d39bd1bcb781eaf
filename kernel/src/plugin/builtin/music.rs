//! Music Plugin
//!
//! Playback control stub anchoring the `music_control` intent the NLU
//! produces. Tracks a single playing/paused flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use zeeky_plugin_api::prelude::*;

use crate::register_plugin;

pub struct MusicPlugin {
    playing: AtomicBool,
}

impl MusicPlugin {
    pub fn new() -> Self {
        Self {
            playing: AtomicBool::new(false),
        }
    }
}

impl Default for MusicPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for MusicPlugin {
    fn manifest(&self) -> PluginManifest {
        PluginManifest::new("music", "Music Playback", "1.0.0")
            .with_description("Playback control")
    }

    fn intents(&self) -> Vec<String> {
        vec!["music_control".to_string()]
    }

    async fn handle_intent(
        &self,
        intent: &Intent,
        ctx: &ExecutionContext,
    ) -> Result<Response, PluginError> {
        if intent.name != "music_control" {
            return Err(PluginError::execution(format!(
                "music received undeclared intent '{}'",
                intent.name
            )));
        }

        let action = intent
            .entity("action")
            .and_then(|e| e.value.as_str())
            .unwrap_or("play");

        let (playing, content) = match action {
            "pause" | "stop" => (false, "Playback paused."),
            _ => (true, "Now playing your music."),
        };
        self.playing.store(playing, Ordering::Relaxed);

        Ok(Response::confirmation(&ctx.request_id, content)
            .with_data(json!({ "playing": playing })))
    }
}

fn create_music(_config: &Value) -> Result<Arc<dyn Plugin>, PluginError> {
    Ok(Arc::new(MusicPlugin::new()))
}

register_plugin!("music", create_music);
