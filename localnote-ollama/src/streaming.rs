//! NDJSON stream decoding for the `/api/generate` endpoint.
//!
//! Turns the raw byte stream of a streaming generate call into
//! [`StreamEvent`]s. Two invariants drive the shape of this module:
//!
//! - Bytes are decoded statefully: a multi-byte UTF-8 character split across
//!   two chunks is held back until its remaining bytes arrive.
//! - A line is parsed only after its trailing newline has been observed;
//!   the last (possibly incomplete) segment of each chunk stays buffered as
//!   the prefix of the next one.
//!
//! A line that is not valid JSON is logged and skipped; servers emit blank
//! keep-alive lines and those must not kill the generation.

use std::time::Duration;

use futures::{Stream, StreamExt};
use localnote_types::{GenerationStats, GenerationStream, StreamEvent};

use crate::types::GenerateFragment;

/// Wrap an HTTP response body into a [`GenerationStream`].
pub(crate) fn stream_generation(response: reqwest::Response) -> GenerationStream {
    GenerationStream {
        events: Box::pin(decode_ndjson(response.bytes_stream())),
    }
}

/// Decode a raw byte stream into [`StreamEvent`]s.
///
/// The event stream ends when the byte source ends, or immediately after a
/// transport or decode failure. The fragment marked `done` yields a final
/// [`StreamEvent::Done`]; consumers typically stop pulling there.
fn decode_ndjson<E>(
    byte_stream: impl Stream<Item = Result<bytes::Bytes, E>> + Send + 'static,
) -> impl Stream<Item = StreamEvent> + Send + 'static
where
    E: std::fmt::Display + Send + 'static,
{
    async_stream::stream! {
        let mut decoder = LineDecoder::new();
        let mut byte_stream = std::pin::pin!(byte_stream);

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    yield StreamEvent::Error(format!("stream read error: {e}"));
                    return;
                }
            };

            let lines = match decoder.push(&chunk) {
                Ok(lines) => lines,
                Err(reason) => {
                    yield StreamEvent::Error(reason);
                    return;
                }
            };

            for line in lines {
                for event in parse_line(&line) {
                    yield event;
                }
            }
        }

        // A final line without a trailing newline is still a complete line
        // once the source ends.
        if let Some(line) = decoder.finish() {
            for event in parse_line(&line) {
                yield event;
            }
        }
    }
}

/// Stateful bytes-to-lines decoder.
///
/// `pending` carries the trailing bytes of an incomplete UTF-8 sequence
/// between chunks; `line_buf` carries the trailing segment of an incomplete
/// line.
struct LineDecoder {
    pending: Vec<u8>,
    line_buf: String,
}

impl LineDecoder {
    fn new() -> Self {
        Self {
            pending: Vec::new(),
            line_buf: String::new(),
        }
    }

    /// Feed one chunk; returns the complete lines it unlocked.
    ///
    /// Fails only on a definitely-invalid UTF-8 sequence. An incomplete
    /// trailing sequence is kept for the next chunk.
    fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, String> {
        self.pending.extend_from_slice(chunk);

        match String::from_utf8(std::mem::take(&mut self.pending)) {
            Ok(text) => self.line_buf.push_str(&text),
            Err(e) => {
                let utf8_error = e.utf8_error();
                if utf8_error.error_len().is_some() {
                    return Err(format!(
                        "invalid UTF-8 in response stream at byte {}",
                        utf8_error.valid_up_to()
                    ));
                }
                let valid_up_to = utf8_error.valid_up_to();
                let mut bytes = e.into_bytes();
                self.pending = bytes.split_off(valid_up_to);
                // The prefix was just validated, so the lossy conversion is
                // exact.
                self.line_buf.push_str(&String::from_utf8_lossy(&bytes));
            }
        }

        let mut lines = Vec::new();
        while let Some(newline_pos) = self.line_buf.find('\n') {
            let line = self.line_buf[..newline_pos]
                .trim_end_matches('\r')
                .to_string();
            self.line_buf.drain(..=newline_pos);
            lines.push(line);
        }
        Ok(lines)
    }

    /// Flush the trailing segment once the source has ended.
    fn finish(self) -> Option<String> {
        if !self.pending.is_empty() {
            tracing::debug!(
                bytes = self.pending.len(),
                "dropping incomplete UTF-8 sequence at end of stream"
            );
        }
        let remaining = self.line_buf.trim().to_string();
        (!remaining.is_empty()).then_some(remaining)
    }
}

/// Parse one complete line into zero or more events.
///
/// Blank lines produce nothing. An unparseable line is skipped; a framing
/// error on one line must not abort the generation. The `done` line yields
/// its trailing delta (if any) before the final [`StreamEvent::Done`].
fn parse_line(line: &str) -> Vec<StreamEvent> {
    if line.trim().is_empty() {
        return Vec::new();
    }

    let fragment: GenerateFragment = match serde_json::from_str(line) {
        Ok(f) => f,
        Err(e) => {
            tracing::debug!(error = %e, "skipping unparseable response line");
            return Vec::new();
        }
    };

    let stats = fragment.done.then(|| stats_from(&fragment));
    let mut events = Vec::new();
    if !fragment.response.is_empty() {
        events.push(StreamEvent::Delta(fragment.response));
    }
    if let Some(stats) = stats {
        events.push(StreamEvent::Done(stats));
    }
    events
}

fn stats_from(fragment: &GenerateFragment) -> GenerationStats {
    GenerationStats {
        input_tokens: fragment.prompt_eval_count.unwrap_or(0),
        output_tokens: fragment.eval_count.unwrap_or(0),
        total_duration: fragment.total_duration.map(Duration::from_nanos),
        eval_duration: fragment.eval_duration.map(Duration::from_nanos),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[derive(Debug)]
    struct FakeTransportError;

    impl std::fmt::Display for FakeTransportError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "connection reset")
        }
    }

    fn chunks(parts: &[&[u8]]) -> Vec<Result<bytes::Bytes, FakeTransportError>> {
        parts
            .iter()
            .map(|p| Ok(bytes::Bytes::copy_from_slice(p)))
            .collect()
    }

    async fn collect_events(
        parts: Vec<Result<bytes::Bytes, FakeTransportError>>,
    ) -> Vec<StreamEvent> {
        decode_ndjson(stream::iter(parts)).collect().await
    }

    fn deltas(events: &[StreamEvent]) -> String {
        events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Delta(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn decoder_splits_complete_lines() {
        let mut decoder = LineDecoder::new();
        let lines = decoder.push(b"one\ntwo\npartial").expect("valid utf8");
        assert_eq!(lines, vec!["one", "two"]);
        let lines = decoder.push(b" line\n").expect("valid utf8");
        assert_eq!(lines, vec!["partial line"]);
    }

    #[test]
    fn decoder_strips_carriage_returns() {
        let mut decoder = LineDecoder::new();
        let lines = decoder.push(b"one\r\ntwo\r\n").expect("valid utf8");
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn decoder_reassembles_multibyte_character_across_chunks() {
        // "héllo" with the two-byte 'é' (0xC3 0xA9) split between chunks.
        let bytes = "h\u{e9}llo\n".as_bytes();
        assert_eq!(&bytes[1..3], &[0xC3, 0xA9]);

        let mut decoder = LineDecoder::new();
        let lines = decoder.push(&bytes[..2]).expect("incomplete is not invalid");
        assert!(lines.is_empty());
        let lines = decoder.push(&bytes[2..]).expect("valid utf8");
        assert_eq!(lines, vec!["h\u{e9}llo"]);
    }

    #[test]
    fn decoder_reassembles_at_every_split_offset() {
        let text = "日本語テキスト\n";
        let bytes = text.as_bytes();
        for split in 1..bytes.len() {
            let mut decoder = LineDecoder::new();
            let mut lines = decoder.push(&bytes[..split]).expect("prefix");
            lines.extend(decoder.push(&bytes[split..]).expect("suffix"));
            assert_eq!(lines, vec![text.trim_end()], "split at byte {split}");
        }
    }

    #[test]
    fn decoder_rejects_invalid_utf8() {
        let mut decoder = LineDecoder::new();
        // 0xFF can never start a UTF-8 sequence.
        let err = decoder.push(&[0x68, 0xFF, 0x69]).expect_err("invalid byte");
        assert!(err.contains("invalid UTF-8"), "got: {err}");
    }

    #[test]
    fn decoder_finish_flushes_unterminated_line() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"no newline here").expect("valid utf8");
        assert_eq!(decoder.finish(), Some("no newline here".to_string()));
    }

    #[test]
    fn decoder_finish_is_empty_after_clean_end() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"line\n").expect("valid utf8");
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn parse_line_yields_delta() {
        let events = parse_line(r#"{"response":"Hello","done":false}"#);
        assert_eq!(events, vec![StreamEvent::Delta("Hello".into())]);
    }

    #[test]
    fn parse_line_skips_garbage() {
        assert!(parse_line("not json at all").is_empty());
    }

    #[test]
    fn parse_line_skips_blank_lines() {
        assert!(parse_line("").is_empty());
        assert!(parse_line("   ").is_empty());
    }

    #[test]
    fn parse_line_done_carries_stats() {
        let events = parse_line(
            r#"{"response":"","done":true,"eval_count":10,"prompt_eval_count":20,"total_duration":5000000000}"#,
        );
        assert_eq!(events.len(), 1);
        match &events[0] {
            StreamEvent::Done(stats) => {
                assert_eq!(stats.input_tokens, 20);
                assert_eq!(stats.output_tokens, 10);
                assert_eq!(stats.total_duration, Some(Duration::from_secs(5)));
                assert_eq!(stats.eval_duration, None);
            }
            other => panic!("expected Done, got: {other:?}"),
        }
    }

    #[test]
    fn parse_line_done_with_text_emits_delta_first() {
        let events = parse_line(r#"{"response":"tail","done":true}"#);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], StreamEvent::Delta("tail".into()));
        assert!(matches!(events[1], StreamEvent::Done(_)));
    }

    #[tokio::test]
    async fn concatenated_deltas_reproduce_stream_order() {
        let events = collect_events(chunks(&[
            b"{\"response\":\"Hello \"}\n",
            b"{\"response\":\"world\"}\n",
        ]))
        .await;
        assert_eq!(deltas(&events), "Hello world");
    }

    #[tokio::test]
    async fn garbage_line_does_not_break_later_lines() {
        let events = collect_events(chunks(&[
            b"{\"response\":\"A\"}\n garbage \n{\"response\":\"B\"}\n",
        ]))
        .await;
        assert_eq!(deltas(&events), "AB");
        assert!(
            events.iter().all(|e| !matches!(e, StreamEvent::Error(_))),
            "garbage must not surface as an error"
        );
    }

    #[tokio::test]
    async fn line_split_across_chunks_parses_once() {
        let events = collect_events(chunks(&[
            b"{\"response\":\"Hel",
            b"lo\"}\n{\"response\":\"!\"}\n",
        ]))
        .await;
        assert_eq!(deltas(&events), "Hello!");
    }

    #[tokio::test]
    async fn multibyte_split_decodes_correctly_end_to_end() {
        let line = "{\"response\":\"caf\u{e9}\"}\n".as_bytes();
        // Split inside the 'é'.
        let split = line.len() - 4;
        let events = collect_events(chunks(&[&line[..split], &line[split..]])).await;
        assert_eq!(deltas(&events), "caf\u{e9}");
    }

    #[tokio::test]
    async fn transport_failure_ends_stream_with_error() {
        let parts: Vec<Result<bytes::Bytes, FakeTransportError>> = vec![
            Ok(bytes::Bytes::from_static(b"{\"response\":\"A\"}\n")),
            Err(FakeTransportError),
        ];
        let events = collect_events(parts).await;
        assert_eq!(deltas(&events), "A");
        assert!(
            matches!(events.last(), Some(StreamEvent::Error(reason)) if reason.contains("connection reset"))
        );
    }

    #[tokio::test]
    async fn unterminated_final_line_is_parsed_at_end() {
        let events = collect_events(chunks(&[b"{\"response\":\"tail\",\"done\":true}"])).await;
        assert_eq!(deltas(&events), "tail");
        assert!(matches!(events.last(), Some(StreamEvent::Done(_))));
    }

    #[tokio::test]
    async fn blank_keepalive_lines_are_ignored() {
        let events = collect_events(chunks(&[
            b"\n\n{\"response\":\"A\"}\n\n{\"response\":\"B\"}\n",
        ]))
        .await;
        assert_eq!(deltas(&events), "AB");
        assert_eq!(events.len(), 2);
    }
}
