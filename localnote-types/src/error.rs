//! Error taxonomy for dispatch and stream consumption.

use thiserror::Error;

/// Errors from dispatching a generation or reading its stream.
///
/// Fragment-level parse failures are not represented here: a single
/// unparseable response line is recovered locally by the decoder and never
/// surfaces. Cancellation is not an error either; it is reported as
/// [`FinalStatus::Cancelled`](crate::FinalStatus::Cancelled).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The endpoint could not be reached. Raised before any streaming began,
    /// so there is no body to parse and no partial output.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The endpoint answered with a non-success status before streaming
    /// began.
    #[error("HTTP {status}: {body}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, verbatim.
        body: String,
    },

    /// The transport failed after streaming began. Output accumulated up to
    /// the failure is preserved by the consume loop.
    #[error("stream read failed: {0}")]
    StreamRead(String),

    /// A generation is already in flight on this panel.
    #[error("a generation is already running")]
    Busy,
}

impl GenerateError {
    /// Whether the failure occurred before any of the response body streamed.
    ///
    /// Pre-stream failures are shown as a single terminal message; there is
    /// no partial output to keep.
    #[must_use]
    pub fn is_pre_stream(&self) -> bool {
        matches!(
            self,
            GenerateError::Connection(_) | GenerateError::Status { .. } | GenerateError::Busy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            GenerateError::Connection("refused".into()).to_string(),
            "connection failed: refused"
        );
        assert_eq!(
            GenerateError::Status {
                status: 404,
                body: "model not found".into()
            }
            .to_string(),
            "HTTP 404: model not found"
        );
        assert_eq!(
            GenerateError::StreamRead("reset".into()).to_string(),
            "stream read failed: reset"
        );
        assert_eq!(
            GenerateError::Busy.to_string(),
            "a generation is already running"
        );
    }

    #[test]
    fn pre_stream_classification() {
        assert!(GenerateError::Connection("x".into()).is_pre_stream());
        assert!(
            GenerateError::Status {
                status: 500,
                body: String::new()
            }
            .is_pre_stream()
        );
        assert!(GenerateError::Busy.is_pre_stream());
        assert!(!GenerateError::StreamRead("x".into()).is_pre_stream());
    }
}
