// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Frame accumulator
//
// Reassembles newline-delimited frames from raw byte chunks of arbitrary
// length. Bytes are held until a newline confirms the line is complete,
// so a frame (or a multi-byte UTF-8 character) split across two chunks
// is decoded exactly once, whole.

/// Buffers partial lines between chunks.
#[derive(Debug, Default)]
pub struct FrameAccumulator {
    /// Bytes after the last newline seen so far.
    pending: Vec<u8>,
    /// Prefix of `pending` already known to hold no newline.
    scanned: usize,
}

impl FrameAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every frame it completes, in order.
    ///
    /// The bytes after the final newline stay buffered and are prepended
    /// to the next chunk.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut start = 0;
        let mut from = self.scanned;
        while let Some(offset) = self.pending[from..].iter().position(|b| *b == b'\n') {
            let end = from + offset;
            frames.push(line_to_frame(&self.pending[start..end]));
            start = end + 1;
            from = start;
        }
        self.pending.drain(..start);
        self.scanned = self.pending.len();
        frames
    }

    /// Flush whatever partial line remains at end of stream.
    ///
    /// Returns `None` when the stream ended on a newline.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        self.scanned = 0;
        Some(line_to_frame(&rest))
    }

    /// Number of bytes waiting for a newline.
    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Decode one complete line, dropping a CRLF carriage return.
fn line_to_frame(line: &[u8]) -> String {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}
