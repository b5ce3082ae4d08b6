//! One in-flight generation: dispatch, the consume loop, and cancellation.

use futures::StreamExt;
use localnote_ollama::Ollama;
use localnote_types::{
    DisplaySink, FinalStatus, GenerateError, GenerationOutcome, GenerationRequest,
    GenerationStream, SinkNotice, StreamEvent,
};
use tokio_util::sync::{CancellationToken, DropGuard};

/// A single generation attempt, from dispatch to terminal status.
///
/// Created by [`Panel::begin`](crate::Panel::begin), consumed by
/// [`Generation::run`]. Owns this attempt's [`CancellationToken`]; the token
/// is retired (cancelled) when the generation ends on any path, so a stale
/// stop control's flip is a no-op.
pub struct Generation {
    client: Ollama,
    request: GenerationRequest,
    token: CancellationToken,
    // Cancels the token when this attempt is dropped, retiring it.
    _retire: DropGuard,
}

impl Generation {
    pub(crate) fn new(
        client: Ollama,
        request: GenerationRequest,
        token: CancellationToken,
    ) -> Self {
        let retire = token.clone().drop_guard();
        Self {
            client,
            request,
            token,
            _retire: retire,
        }
    }

    /// A clone of this generation's cancellation token, for a stop control.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Drive the generation to its terminal status.
    ///
    /// Dispatches the request, then runs the sequential pull loop, surfacing
    /// each delta to `sink` in arrival order. Cancellation is honored during
    /// the dispatch as well as between pulls; on every exit path the stream
    /// (and the connection it owns) is dropped.
    pub async fn run<S>(self, sink: &mut S) -> GenerationOutcome
    where
        S: DisplaySink + ?Sized,
    {
        let stream = tokio::select! {
            biased;
            () = self.token.cancelled() => {
                sink.append_notice(&SinkNotice::Cancelled);
                return GenerationOutcome {
                    status: FinalStatus::Cancelled,
                    text: String::new(),
                    stats: None,
                };
            }
            dispatched = self.client.generate(&self.request) => match dispatched {
                Ok(stream) => stream,
                Err(e) => {
                    sink.append_notice(&SinkNotice::Failed(e.to_string()));
                    return GenerationOutcome {
                        status: FinalStatus::Failed(e),
                        text: String::new(),
                        stats: None,
                    };
                }
            },
        };

        consume(stream, &self.token, sink).await
    }
}

/// The sequential pull loop.
///
/// Pulling the next event is the sole suspension point. Deltas are appended
/// to the output buffer and delivered to the sink synchronously, one line's
/// worth at a time. The accumulated output survives cancellation and
/// failure.
async fn consume<S>(
    stream: GenerationStream,
    token: &CancellationToken,
    sink: &mut S,
) -> GenerationOutcome
where
    S: DisplaySink + ?Sized,
{
    let mut events = stream.events;
    let mut output = String::new();

    loop {
        // Biased: when a fragment and the flip are both ready, the flip wins,
        // so no fragment arriving after it reaches the sink.
        let event = tokio::select! {
            biased;
            () = token.cancelled() => {
                tracing::debug!(chars = output.len(), "generation cancelled");
                sink.append_notice(&SinkNotice::Cancelled);
                return GenerationOutcome {
                    status: FinalStatus::Cancelled,
                    text: output,
                    stats: None,
                };
            }
            event = events.next() => event,
        };

        match event {
            Some(StreamEvent::Delta(text)) => {
                output.push_str(&text);
                sink.append_delta(&text);
            }
            Some(StreamEvent::Done(stats)) => {
                tracing::debug!(
                    input_tokens = stats.input_tokens,
                    output_tokens = stats.output_tokens,
                    "generation complete"
                );
                return GenerationOutcome {
                    status: FinalStatus::Completed,
                    text: output,
                    stats: Some(stats),
                };
            }
            Some(StreamEvent::Error(reason)) => {
                tracing::warn!(reason = %reason, "stream failed mid-generation");
                sink.append_notice(&SinkNotice::Failed(reason.clone()));
                return GenerationOutcome {
                    status: FinalStatus::Failed(GenerateError::StreamRead(reason)),
                    text: output,
                    stats: None,
                };
            }
            // The source ended without a done line; everything received
            // still counts.
            None => {
                return GenerationOutcome {
                    status: FinalStatus::Completed,
                    text: output,
                    stats: None,
                };
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
