//! Byte chunk to line framing.
//!
//! Chunks may split a line, or a single UTF-8 character, at any byte. The
//! decoder keeps two pieces of state between calls: bytes of an incomplete
//! trailing character, and decoded text of the incomplete trailing line.

use crate::config::DEFAULT_MAX_LINE_BYTES;
use crate::error::StreamError;

/// Incremental NDJSON line framer.
///
/// # Example
///
/// ```
/// use chatline::ndjson::FrameDecoder;
///
/// let mut decoder = FrameDecoder::new();
/// assert!(decoder.feed(b"{\"type\":").unwrap().is_empty());
/// let lines = decoder.feed(b"\"done\"}\r\n{\"ty").unwrap();
/// assert_eq!(lines, vec!["{\"type\":\"done\"}".to_string()]);
/// assert_eq!(decoder.flush(), Some("{\"ty".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    /// Decoded text of the line not yet terminated by `\n`
    buffer: String,
    /// Leading bytes of a character whose remaining bytes have not arrived
    pending: Vec<u8>,
    /// Total bytes successfully decoded, used for error offsets
    decoded: usize,
    max_line_bytes: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::with_max_line_bytes(DEFAULT_MAX_LINE_BYTES)
    }

    /// Create a decoder that rejects lines longer than `max_line_bytes`.
    pub fn with_max_line_bytes(max_line_bytes: usize) -> Self {
        Self {
            buffer: String::new(),
            pending: Vec::new(),
            decoded: 0,
            max_line_bytes,
        }
    }

    /// Feed one chunk and return every line it completed, in order.
    ///
    /// Line terminators are not included and a trailing `\r` is stripped.
    /// An invalid byte sequence or a line over the configured limit is an
    /// error; the decoder should be discarded after one.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<String>, StreamError> {
        // The held line has no `\n`, so only newly decoded text is scanned
        let scanned = self.buffer.len();
        self.decode(chunk)?;

        let lines = self.take_complete_lines(scanned);
        if let Some(long) = lines.iter().find(|l| l.len() > self.max_line_bytes) {
            return Err(StreamError::LineTooLong {
                len: long.len(),
                limit: self.max_line_bytes,
            });
        }
        if self.buffer.len() > self.max_line_bytes {
            return Err(StreamError::LineTooLong {
                len: self.buffer.len(),
                limit: self.max_line_bytes,
            });
        }
        Ok(lines)
    }

    /// Consume the decoder and return the unterminated trailing fragment.
    ///
    /// Bytes of an incomplete character at end of stream cannot be decoded
    /// and are replaced with U+FFFD. Returns `None` when nothing is left.
    pub fn flush(self) -> Option<String> {
        let mut rest = self.buffer;
        if !self.pending.is_empty() {
            rest.push_str(&String::from_utf8_lossy(&self.pending));
        }
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }

    /// Bytes currently held for an unterminated line.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() + self.pending.len()
    }

    fn decode(&mut self, chunk: &[u8]) -> Result<(), StreamError> {
        self.pending.extend_from_slice(chunk);

        let valid_up_to = match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                self.buffer.push_str(text);
                self.pending.len()
            }
            Err(e) => {
                if e.error_len().is_some() {
                    return Err(StreamError::InvalidUtf8 {
                        offset: self.decoded + e.valid_up_to(),
                    });
                }
                // Incomplete character at the end: decode the prefix, keep the rest
                let valid_up_to = e.valid_up_to();
                self.buffer
                    .push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));
                valid_up_to
            }
        };

        self.decoded += valid_up_to;
        self.pending.drain(..valid_up_to);
        Ok(())
    }

    fn take_complete_lines(&mut self, from: usize) -> Vec<String> {
        let Some(last_newline) = self.buffer[from..].rfind('\n').map(|i| from + i) else {
            return Vec::new();
        };

        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);
        complete[..last_newline]
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect()
    }
}
