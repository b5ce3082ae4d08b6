//! The display seam between the consume loop and the host UI.

use std::fmt;

/// Where streamed output is rendered.
///
/// The host panel implements this instead of the core inheriting any UI base
/// type. Deltas arrive synchronously, in stream order, one line's worth at a
/// time; a terminal notice arrives at most once, after the last delta.
pub trait DisplaySink: Send {
    /// Append incremental text to the running output.
    fn append_delta(&mut self, text: &str);

    /// Append a distinguishable terminal message (cancelled or failed).
    ///
    /// Hosts typically render this in an error style, separate from the
    /// generated text.
    fn append_notice(&mut self, notice: &SinkNotice);
}

/// Terminal, non-delta message appended to the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkNotice {
    /// The user stopped the generation. Not an error.
    Cancelled,
    /// The generation failed; the reason is already human-readable.
    Failed(String),
}

impl fmt::Display for SinkNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkNotice::Cancelled => write!(f, "\n\nProcessing stopped by user"),
            SinkNotice::Failed(reason) => write!(f, "\n\nError: {reason}"),
        }
    }
}
