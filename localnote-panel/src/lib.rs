#![deny(missing_docs)]
//! The host-facing generation panel for localnote.
//!
//! A [`Panel`] replaces the original host-framework view: it is given a
//! [`DisplaySink`](localnote_types::DisplaySink) and a lifecycle instead of
//! inheriting a UI base class. One panel runs at most one generation at a
//! time; the stop control flips the current generation's cancellation token
//! and nothing else.

pub mod config;
pub mod panel;
pub mod prompt;
pub mod session;

pub use config::{ConfigError, Settings, TagFormat};
pub use panel::Panel;
pub use prompt::PromptStyle;
pub use session::Generation;
