//! Data models exchanged with the model service

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-request generation options merged into the `/generate` body
/// (e.g. `temperature`, `options`, `system`)
pub type GenerationParams = serde_json::Map<String, serde_json::Value>;

/// Information about a model served by the endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    /// Model name (e.g., "llama3:latest"), unique within one listing
    #[serde(default)]
    pub name: String,

    /// Model size in bytes
    #[serde(default)]
    pub size: u64,

    /// Last modification timestamp as reported by the server
    #[serde(default)]
    pub modified_at: String,

    /// Optional parameter map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<HashMap<String, serde_json::Value>>,
}

/// One completed generation, folded from the streamed fragments.
///
/// Durations are expressed in the server's units except `total_duration`,
/// which is measured by the client in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub response: String,
    /// True only when a fragment with `done = true` was received
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<i64>>,
    pub total_duration: u64,
    pub load_duration: u64,
    pub prompt_eval_count: u64,
    pub prompt_eval_duration: u64,
    pub eval_count: u64,
    pub eval_duration: u64,
}

impl GenerationResult {
    /// Whether the stream signalled completion before it ended
    pub fn is_complete(&self) -> bool {
        self.done
    }

    /// Prompt tokens plus generated tokens
    pub fn token_count(&self) -> u64 {
        self.prompt_eval_count + self.eval_count
    }
}

/// `GET /tags` response body
#[derive(Debug, Deserialize)]
pub(crate) struct TagsResponse {
    #[serde(default)]
    pub models: Option<Vec<ModelInfo>>,
}
