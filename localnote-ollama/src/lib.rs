#![deny(missing_docs)]
//! Ollama `/api/generate` client and NDJSON stream decoder for localnote.
//!
//! Ollama runs models locally, so there are no auth headers. The response to
//! a streaming generate call is newline-delimited JSON, one fragment per
//! line:
//!
//! ```text
//! {"model":"llama3.2","response":"Hello","done":false}
//! {"model":"llama3.2","response":" world","done":false}
//! {"model":"llama3.2","response":"","done":true,"eval_count":10,"prompt_eval_count":20}
//! ```
//!
//! Reference: <https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-completion>

mod client;
mod error;
mod streaming;
mod types;

pub use client::Ollama;
