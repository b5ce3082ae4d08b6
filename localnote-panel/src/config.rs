//! The persisted settings document.
//!
//! Field names serialize in camelCase so documents written by earlier
//! versions of the host load unchanged, and every field is defaulted
//! individually: a partial document merges over the defaults rather than
//! failing to parse.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or saving the settings document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read or written.
    #[error("settings file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The settings file exists but is not a valid settings document.
    #[error("malformed settings document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The panel's persisted configuration.
///
/// `ollama_url` and `default_model` are consumed verbatim by the dispatcher;
/// no URL validation happens here. The remaining fields configure host-side
/// behavior (tagging, dialogs, logging) and ride along in the same document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Base URL of the local Ollama server.
    pub ollama_url: String,
    /// Model used for new generations.
    pub default_model: String,
    /// Prefix newly suggested tags with the app's namespace.
    pub use_autotag_prefix: bool,
    /// Insert suggested tags under a dedicated front-matter key.
    pub use_frontmatter_autotags_key: bool,
    /// Case style for newly suggested tags.
    pub tags_format: TagFormat,
    /// Review suggested changes before they are applied.
    pub show_pre_update_dialog: bool,
    /// Show a summary after changes are applied.
    pub show_post_update_dialog: bool,
    /// Mirror generation activity to a log file.
    pub write_to_log_file: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".into(),
            default_model: "llama2".into(),
            use_autotag_prefix: true,
            use_frontmatter_autotags_key: true,
            tags_format: TagFormat::KebabCase,
            show_pre_update_dialog: true,
            show_post_update_dialog: true,
            write_to_log_file: true,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] on any read failure other than a missing file,
    /// [`ConfigError::Malformed`] when the file is not a settings document.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write settings to `path` as a pretty-printed JSON document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] on write failure.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

/// Case style for suggested tags.
///
/// The serialized names match the values the original settings documents
/// carry (`"kebabCase"`, `"snakeCase"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagFormat {
    /// `two-words`
    KebabCase,
    /// `two_words`
    SnakeCase,
    /// `TwoWords`
    PascalCase,
    /// `twoWords`
    CamelCase,
    /// `Two_Words`
    PascalSnakeCase,
    /// `Two-Words`
    TrainCase,
    /// `TWO_WORDS`
    ConstantCase,
}

impl TagFormat {
    /// Render a phrase as a tag in this style.
    ///
    /// Words are split on whitespace, `-`, and `_`, so re-rendering an
    /// already-formatted tag into another style works too.
    #[must_use]
    pub fn render(self, phrase: &str) -> String {
        let words: Vec<String> = phrase
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        match self {
            TagFormat::KebabCase => words.join("-"),
            TagFormat::SnakeCase => words.join("_"),
            TagFormat::PascalCase => words.iter().map(|w| capitalize(w)).collect(),
            TagFormat::CamelCase => {
                let mut out = String::new();
                for (i, word) in words.iter().enumerate() {
                    if i == 0 {
                        out.push_str(word);
                    } else {
                        out.push_str(&capitalize(word));
                    }
                }
                out
            }
            TagFormat::PascalSnakeCase => words
                .iter()
                .map(|w| capitalize(w))
                .collect::<Vec<_>>()
                .join("_"),
            TagFormat::TrainCase => words
                .iter()
                .map(|w| capitalize(w))
                .collect::<Vec<_>>()
                .join("-"),
            TagFormat::ConstantCase => words
                .iter()
                .map(|w| w.to_uppercase())
                .collect::<Vec<_>>()
                .join("_"),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
