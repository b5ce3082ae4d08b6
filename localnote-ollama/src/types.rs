//! Ollama `/api/generate` and `/api/tags` wire types.
//!
//! The generate endpoint takes a single prompt string rather than a message
//! list, and streams its response as NDJSON. Fragment fields other than
//! `response` and `done` only appear on the final line.

use serde::{Deserialize, Serialize};

/// Ollama `/api/generate` request body.
#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest {
    /// Model identifier (e.g. "llama3.2").
    pub model: String,
    /// The full prompt text.
    pub prompt: String,
    /// Whether to stream the response. Always `true` here.
    pub stream: bool,
    /// How long to keep the model loaded in memory (e.g. "5m", "0").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

/// One NDJSON line of the `/api/generate` response.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateFragment {
    /// Incremental response text. Empty on the final line.
    #[serde(default)]
    pub response: String,
    /// Whether this is the final line.
    #[serde(default)]
    pub done: bool,
    /// Number of tokens in the prompt (final line only).
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    /// Number of tokens generated (final line only).
    #[serde(default)]
    pub eval_count: Option<u64>,
    /// Total request time in nanoseconds (final line only).
    #[serde(default)]
    pub total_duration: Option<u64>,
    /// Generation time in nanoseconds (final line only).
    #[serde(default)]
    pub eval_duration: Option<u64>,
}

/// `/api/tags` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelTags {
    /// Locally installed models.
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

/// One installed model in the `/api/tags` listing.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelEntry {
    /// Model name, including the tag (e.g. "llama3.2:latest").
    pub name: String,
}
