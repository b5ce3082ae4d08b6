//! Ollama API client struct and builder.

use localnote_types::{GenerateError, GenerationRequest, GenerationStream};

use crate::error::{map_connect_error, map_http_status};
use crate::streaming::stream_generation;
use crate::types::{GenerateRequest, ModelTags};

/// Client for the Ollama generate API.
///
/// Holds the shared HTTP client and per-client options; the endpoint and
/// model come in on each [`GenerationRequest`], supplied verbatim from the
/// host's persisted configuration.
///
/// # Example
///
/// ```no_run
/// use localnote_ollama::Ollama;
///
/// let client = Ollama::new().keep_alive("5m");
/// ```
#[derive(Clone)]
pub struct Ollama {
    /// Optional keep_alive duration string (e.g. "5m", "0" to unload).
    keep_alive: Option<String>,
    /// Shared HTTP client.
    client: reqwest::Client,
}

impl Ollama {
    /// Create a new client.
    ///
    /// No authentication is involved; Ollama is local.
    #[must_use]
    pub fn new() -> Self {
        Self {
            keep_alive: None,
            client: reqwest::Client::new(),
        }
    }

    /// Set the keep_alive duration for model memory residency.
    ///
    /// Examples: `"5m"` (keep for 5 minutes), `"0"` (unload immediately
    /// after the request). When not set, the server default applies.
    #[must_use]
    pub fn keep_alive(mut self, duration: impl Into<String>) -> Self {
        self.keep_alive = Some(duration.into());
        self
    }

    /// Build the generate endpoint URL.
    fn generate_url(base_url: &str) -> String {
        format!("{base_url}/api/generate")
    }

    /// Build the model-listing endpoint URL.
    fn tags_url(base_url: &str) -> String {
        format!("{base_url}/api/tags")
    }

    /// Dispatch a streaming generation.
    ///
    /// Sends `POST {base_url}/api/generate` with `stream: true` and hands the
    /// response body to the NDJSON decoder. Opens exactly one outbound
    /// connection, owned by the returned [`GenerationStream`]; dropping the
    /// stream aborts the transfer, which stops server-side generation.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Connection`] if the endpoint cannot be reached and
    /// [`GenerateError::Status`] on a non-success response, both before any
    /// streaming begins.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationStream, GenerateError> {
        let url = Self::generate_url(&request.base_url);
        let body = GenerateRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            stream: true,
            keep_alive: self.keep_alive.clone(),
        };

        tracing::debug!(url = %url, model = %body.model, "sending streaming generate request");

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(map_connect_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_status(status, &body_text));
        }

        Ok(stream_generation(response))
    }

    /// List the models installed on the server.
    ///
    /// Sends `GET {base_url}/api/tags` and returns the model names.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Connection`] or [`GenerateError::Status`], as for
    /// [`Ollama::generate`].
    pub async fn list_models(&self, base_url: &str) -> Result<Vec<String>, GenerateError> {
        let url = Self::tags_url(base_url);

        tracing::debug!(url = %url, "listing installed models");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_connect_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_status(status, &body_text));
        }

        let tags: ModelTags = response
            .json()
            .await
            .map_err(|e| GenerateError::StreamRead(format!("invalid tags response: {e}")))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

impl Default for Ollama {
    fn default() -> Self {
        Self::new()
    }
}
