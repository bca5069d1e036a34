//! NDJSON stream handling for `/generate`
//!
//! The endpoint answers a generation request with one JSON object per line.
//! [`LineBuffer`] cuts raw body chunks into lines and [`StreamAccumulator`]
//! folds the decoded fragments into a [`GenerationResult`].

use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::GenerationResult;

/// One streamed fragment. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize)]
struct GenerateChunk {
    response: Option<String>,
    done: Option<bool>,
    context: Option<Vec<i64>>,
    load_duration: Option<u64>,
    prompt_eval_count: Option<u64>,
    prompt_eval_duration: Option<u64>,
    eval_count: Option<u64>,
    eval_duration: Option<u64>,
    // Reported by the server but never trusted: the client measures wall-clock time itself.
    #[serde(rename = "total_duration")]
    _total_duration: Option<u64>,
}

/// Splits a byte stream into newline-terminated lines.
///
/// Chunk boundaries from the transport do not line up with JSON objects, so
/// partial lines are kept until their terminator arrives.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    // Prefix of `pending` already known to hold no newline.
    scanned: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        let mut from = self.scanned;
        while let Some(offset) = self.pending[from..].iter().position(|b| *b == b'\n') {
            let end = from + offset;
            lines.push(String::from_utf8_lossy(&self.pending[start..end]).into_owned());
            start = end + 1;
            from = start;
        }
        self.pending.drain(..start);
        self.scanned = self.pending.len();
        lines
    }

    /// Flush a trailing line that was not newline-terminated
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        self.scanned = 0;
        let rest = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&rest).into_owned())
    }
}

/// Folds generation fragments into one result.
///
/// Text chunks are concatenated in arrival order. Once a fragment with
/// `done = true` has been applied, further fragments are ignored.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    done: bool,
    fragments: usize,
    skipped_lines: usize,
    context: Option<Vec<i64>>,
    load_duration: Option<u64>,
    prompt_eval_count: Option<u64>,
    prompt_eval_duration: Option<u64>,
    eval_count: Option<u64>,
    eval_duration: Option<u64>,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one line of the stream.
    ///
    /// Returns `true` once the stream is complete; the caller should stop reading.
    /// Blank lines are ignored and malformed lines are logged and skipped.
    pub fn push_line(&mut self, line: &str) -> bool {
        if self.done {
            return true;
        }

        let line = line.trim();
        if line.is_empty() {
            return false;
        }

        let chunk: GenerateChunk = match serde_json::from_str(line) {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!("Failed to decode response line: {}", e);
                self.skipped_lines += 1;
                return false;
            }
        };

        self.apply(chunk);
        self.done
    }

    fn apply(&mut self, chunk: GenerateChunk) {
        self.fragments += 1;

        if let Some(text) = chunk.response {
            debug!("Response chunk: {:?}", text);
            self.text.push_str(&text);
        }

        if chunk.context.is_some() {
            self.context = chunk.context;
        }
        self.load_duration = chunk.load_duration.or(self.load_duration);
        self.prompt_eval_count = chunk.prompt_eval_count.or(self.prompt_eval_count);
        self.prompt_eval_duration = chunk.prompt_eval_duration.or(self.prompt_eval_duration);
        self.eval_count = chunk.eval_count.or(self.eval_count);
        self.eval_duration = chunk.eval_duration.or(self.eval_duration);

        if chunk.done.unwrap_or(false) {
            debug!(
                "Response completed after {} fragments, eval_count={:?}",
                self.fragments, self.eval_count
            );
            self.done = true;
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Text accumulated so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of fragments applied (malformed lines excluded)
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Number of malformed lines that were skipped
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Build the final result.
    ///
    /// `elapsed` is the wall-clock time of the whole call and becomes
    /// `total_duration`. Missing `eval_count` falls back to the whitespace-token
    /// count of the text; missing `eval_duration` falls back to `elapsed`.
    pub fn finish(self, model: &str, elapsed: Duration) -> GenerationResult {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let eval_count = self
            .eval_count
            .unwrap_or_else(|| self.text.split_whitespace().count() as u64);

        GenerationResult {
            model: model.to_string(),
            created_at: Utc::now(),
            done: self.done,
            context: self.context,
            total_duration: elapsed_ms,
            load_duration: self.load_duration.unwrap_or(0),
            prompt_eval_count: self.prompt_eval_count.unwrap_or(0),
            prompt_eval_duration: self.prompt_eval_duration.unwrap_or(0),
            eval_count,
            eval_duration: self.eval_duration.unwrap_or(elapsed_ms),
            response: self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_buffer_joins_split_chunks() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"{\"response\":\"He").is_empty());
        let lines = buffer.push(b"l\"}\n{\"done\":true}\n");
        assert_eq!(lines, vec!["{\"response\":\"Hel\"}", "{\"done\":true}"]);
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_line_buffer_flushes_unterminated_tail() {
        let mut buffer = LineBuffer::new();
        assert!(buffer.push(b"{\"response\":\"x\"}").is_empty());
        assert_eq!(buffer.finish().as_deref(), Some("{\"response\":\"x\"}"));
        assert_eq!(buffer.finish(), None);
    }

    #[test]
    fn test_line_buffer_keeps_multibyte_characters_across_chunks() {
        let mut buffer = LineBuffer::new();
        let text = "{\"response\":\"caf\u{e9}\"}\n".as_bytes();
        let (head, tail) = text.split_at(text.len() - 4);
        assert!(buffer.push(head).is_empty());
        assert_eq!(buffer.push(tail), vec!["{\"response\":\"caf\u{e9}\"}"]);
    }

    #[test]
    fn test_line_buffer_long_line_in_single_byte_chunks() {
        let mut buffer = LineBuffer::new();
        let line = format!("{{\"response\":\"{}\"}}", "x".repeat(4096));

        for byte in line.as_bytes() {
            assert!(buffer.push(std::slice::from_ref(byte)).is_empty());
        }
        assert_eq!(buffer.scanned, line.len());

        assert_eq!(buffer.push(b"\n{\"done\""), vec![line]);
        assert_eq!(buffer.scanned, "{\"done\"".len());
        assert_eq!(buffer.push(b":true}\n"), vec!["{\"done\":true}"]);
        assert_eq!(buffer.scanned, 0);
        assert_eq!(buffer.finish(), None);
    }
}
