#![deny(missing_docs)]
//! Shared types and trait seams for localnote.
//!
//! Everything that crosses a crate boundary lives here: the per-submission
//! [`GenerationRequest`], the decoded [`StreamEvent`]s, the terminal
//! [`FinalStatus`], the [`GenerateError`] taxonomy, and the [`DisplaySink`]
//! seam the host UI implements.

pub mod error;
pub mod sink;
pub mod stream;
pub mod types;

pub use error::*;
pub use sink::*;
pub use stream::*;
pub use types::*;
