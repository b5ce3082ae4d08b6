//! The panel component: lifecycle, start/stop contract, single-flight rule.

use localnote_ollama::Ollama;
use localnote_types::{GenerateError, GenerationRequest};
use tokio_util::sync::CancellationToken;

use crate::config::Settings;
use crate::prompt::PromptStyle;
use crate::session::Generation;

/// One generation panel.
///
/// Owns the current generation's cancellation token as an explicit field,
/// replaced (never mutated in place) on each submission. At most one
/// generation is in flight per panel; [`Panel::begin`] enforces this at the
/// seam the way the original UI hides its start control while running.
pub struct Panel {
    settings: Settings,
    prompt_style: PromptStyle,
    client: Ollama,
    current: Option<CancellationToken>,
}

impl Panel {
    /// Open a panel with the given settings.
    #[must_use]
    pub fn open(settings: Settings) -> Self {
        Self {
            settings,
            prompt_style: PromptStyle::default(),
            client: Ollama::new(),
            current: None,
        }
    }

    /// Override the prompt formatting step applied before dispatch.
    #[must_use]
    pub fn prompt_style(mut self, style: PromptStyle) -> Self {
        self.prompt_style = style;
        self
    }

    /// Override the transport client (e.g. one with `keep_alive` set).
    #[must_use]
    pub fn with_client(mut self, client: Ollama) -> Self {
        self.client = client;
        self
    }

    /// The panel's settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether a generation is currently in flight.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.current.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Begin a new generation for `input`.
    ///
    /// The input goes through the panel's prompt style; endpoint and model
    /// come from the settings verbatim. A fresh cancellation token replaces
    /// the previous one, so a stop control holding the old token can no
    /// longer affect anything.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Busy`] while a generation is in flight.
    pub fn begin(&mut self, input: &str) -> Result<Generation, GenerateError> {
        if self.is_generating() {
            return Err(GenerateError::Busy);
        }

        let token = CancellationToken::new();
        self.current = Some(token.clone());

        let request = GenerationRequest::new(
            self.settings.ollama_url.clone(),
            self.settings.default_model.clone(),
            self.prompt_style.apply(input),
        );

        Ok(Generation::new(self.client.clone(), request, token))
    }

    /// Stop the current generation, if any.
    ///
    /// Flips the current token; flipping an already-retired token is a
    /// no-op, and stopping an idle panel does nothing.
    pub fn stop(&self) {
        if let Some(token) = &self.current {
            token.cancel();
        }
    }

    /// List the models installed on the configured server.
    ///
    /// # Errors
    ///
    /// [`GenerateError::Connection`] or [`GenerateError::Status`] when the
    /// server cannot be queried.
    pub async fn available_models(&self) -> Result<Vec<String>, GenerateError> {
        self.client.list_models(&self.settings.ollama_url).await
    }

    /// Close the panel, stopping any in-flight generation.
    pub fn close(&mut self) {
        self.stop();
        self.current = None;
    }
}
