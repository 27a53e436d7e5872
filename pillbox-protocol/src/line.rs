//! Line accumulation for the command channel.
//!
//! Bytes are collected into a bounded buffer until a line terminator
//! arrives:
//! - CR (`\r`) or LF (`\n`) ends a line, but only when the buffer is non-empty
//!   (so CRLF pairs and blank lines never produce empty commands)
//! - At most [`MAX_LINE_LEN`] payload bytes are kept; anything beyond that is
//!   discarded until the next terminator and the line is flagged as truncated

use heapless::Vec;

/// Maximum payload bytes kept per line (excluding the terminator)
pub const MAX_LINE_LEN: usize = 63;

/// Carriage return terminator
pub const CR: u8 = b'\r';

/// Line feed terminator
pub const LF: u8 = b'\n';

/// A completed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    bytes: Vec<u8, MAX_LINE_LEN>,
    truncated: bool,
}

impl Line {
    /// Build a line from raw bytes, truncating to [`MAX_LINE_LEN`]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let keep = bytes.len().min(MAX_LINE_LEN);
        let mut buf = Vec::new();
        // Cannot fail: `keep` never exceeds the capacity
        let _ = buf.extend_from_slice(&bytes[..keep]);
        Self {
            bytes: buf,
            truncated: bytes.len() > MAX_LINE_LEN,
        }
    }

    /// Raw payload bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload as text, or `None` if the bytes are not UTF-8
    ///
    /// Truncation can split a multi-byte character at the end of the line;
    /// only that case is repaired, by dropping the partial character.
    pub fn as_str(&self) -> Option<&str> {
        match core::str::from_utf8(&self.bytes) {
            Ok(text) => Some(text),
            Err(e) if self.truncated && e.error_len().is_none() => {
                core::str::from_utf8(&self.bytes[..e.valid_up_to()]).ok()
            }
            Err(_) => None,
        }
    }

    /// Number of payload bytes kept
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Lines are never empty once dispatched, but the check is cheap
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether bytes were discarded because the line exceeded the buffer
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// State machine that turns a byte stream into lines
#[derive(Debug, Clone, Default)]
pub struct LineAccumulator {
    buffer: Vec<u8, MAX_LINE_LEN>,
    overflowed: bool,
}

impl LineAccumulator {
    /// Create an empty accumulator
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            overflowed: false,
        }
    }

    /// Drop any partially received line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.overflowed = false;
    }

    /// Number of bytes currently buffered
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the line being received has already overflowed
    pub fn is_overflowing(&self) -> bool {
        self.overflowed
    }

    /// Feed a single byte
    ///
    /// Returns `Some(line)` when a terminator completes a non-empty line.
    pub fn feed(&mut self, byte: u8) -> Option<Line> {
        match byte {
            CR | LF => {
                if self.buffer.is_empty() {
                    return None;
                }
                let line = Line {
                    bytes: self.buffer.clone(),
                    truncated: self.overflowed,
                };
                self.reset();
                Some(line)
            }
            _ => {
                if self.buffer.push(byte).is_err() {
                    // Buffer full: discard until the next terminator
                    self.overflowed = true;
                }
                None
            }
        }
    }

    /// Feed multiple bytes
    ///
    /// Returns the first complete line found, if any.
    /// Remaining bytes after a complete line are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<Line> {
        for &byte in bytes {
            if let Some(line) = self.feed(byte) {
                return Some(line);
            }
        }
        None
    }
}
