//! Request and outcome types for a single generation.

use std::time::Duration;

use crate::error::GenerateError;

/// A single prompt submission to the local model server.
///
/// Immutable once constructed; one is created per user-initiated submission.
/// Streaming is always enabled by the dispatcher, so there is no flag here.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Base URL of the model server (e.g. `http://localhost:11434`).
    pub base_url: String,
    /// Model identifier (e.g. `llama3.2`).
    pub model: String,
    /// The full prompt text, already formatted.
    pub prompt: String,
}

impl GenerationRequest {
    /// Build a request from its three parts.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

/// Counters the server reports on the final line of a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Number of tokens in the prompt.
    pub input_tokens: u64,
    /// Number of tokens generated.
    pub output_tokens: u64,
    /// Wall-clock time for the whole request, when reported.
    pub total_duration: Option<Duration>,
    /// Time spent generating tokens, when reported.
    pub eval_duration: Option<Duration>,
}

/// The outcome of one generation attempt.
///
/// `text` holds everything accumulated before the terminal condition, so
/// partial output survives cancellation and mid-stream failure.
#[derive(Debug)]
pub struct GenerationOutcome {
    /// How the generation ended.
    pub status: FinalStatus,
    /// The accumulated output, in arrival order.
    pub text: String,
    /// Final-line counters; absent unless the stream completed.
    pub stats: Option<GenerationStats>,
}

/// How a generation ended.
#[derive(Debug)]
pub enum FinalStatus {
    /// The stream ended normally.
    Completed,
    /// The user stopped the generation; accumulated output is preserved.
    Cancelled,
    /// The dispatch or the stream failed; accumulated output is preserved.
    Failed(GenerateError),
}

impl FinalStatus {
    /// Whether the generation ran to natural completion.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, FinalStatus::Completed)
    }
}
