//! Streaming event types for incremental generation output.

use std::pin::Pin;

use futures::Stream;

use crate::types::GenerationStats;

/// An event decoded from the response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental text from one response line.
    Delta(String),
    /// The stream's final line, with the counters the server reported.
    Done(GenerationStats),
    /// Transport or decode failure mid-stream. The stream ends after this.
    Error(String),
}

/// Handle to an in-flight generation's decoded event stream.
///
/// Owns the underlying HTTP response body; dropping the handle aborts the
/// transfer, which is how every exit path releases the connection.
pub struct GenerationStream {
    /// The stream of events. Consume with `StreamExt::next()`.
    pub events: Pin<Box<dyn Stream<Item = StreamEvent> + Send>>,
}
