// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Pull iterator over a streaming response
//
// Each call to `next_item` suspends on the transport until a complete
// frame is available, then decodes it. Frames are yielded strictly in
// arrival order.

use std::collections::VecDeque;

use futures_util::StreamExt;

use super::accumulator::FrameAccumulator;
use super::decoder::FrameDecoder;
use super::types::StreamItem;
use crate::transport::{ByteStream, TransportError};

pub struct DeltaStream {
    body: ByteStream,
    accumulator: FrameAccumulator,
    decoder: FrameDecoder,
    /// Complete frames not yet decoded.
    ready: VecDeque<String>,
    /// The transport has no more chunks.
    body_closed: bool,
    /// Nothing more will be yielded.
    exhausted: bool,
}

impl DeltaStream {
    pub fn new(body: ByteStream, decoder: FrameDecoder) -> Self {
        Self {
            body,
            accumulator: FrameAccumulator::new(),
            decoder,
            ready: VecDeque::new(),
            body_closed: false,
            exhausted: false,
        }
    }

    /// Next decoded frame, or `None` once the stream is exhausted.
    ///
    /// The sentinel is yielded as `StreamItem::Done` and ends the stream.
    /// At end of body a trailing unterminated line is flushed and decoded.
    pub async fn next_item(&mut self) -> Result<Option<StreamItem>, TransportError> {
        loop {
            if self.exhausted {
                return Ok(None);
            }

            if let Some(frame) = self.ready.pop_front() {
                let item = self.decoder.decode_item(&frame);
                if item == StreamItem::Done {
                    self.exhausted = true;
                }
                return Ok(Some(item));
            }

            if self.body_closed {
                self.exhausted = true;
                return Ok(None);
            }

            match self.body.next().await {
                Some(Ok(chunk)) => self.ready.extend(self.accumulator.feed(&chunk)),
                Some(Err(e)) => {
                    self.exhausted = true;
                    return Err(e);
                }
                None => {
                    self.body_closed = true;
                    if let Some(rest) = self.accumulator.finish() {
                        tracing::debug!(len = rest.len(), "flushing unterminated final frame");
                        self.ready.push_back(rest);
                    }
                }
            }
        }
    }
}

/// Run already-received chunks through the accumulator and decoder.
///
/// Same framing and end-of-stream policy as `DeltaStream`, without a
/// transport. Items after the sentinel are not decoded.
pub fn decode_chunks<'a>(
    chunks: impl IntoIterator<Item = &'a [u8]>,
    decoder: &FrameDecoder,
) -> Vec<StreamItem> {
    let mut accumulator = FrameAccumulator::new();
    let mut items = Vec::new();

    let frames = chunks
        .into_iter()
        .flat_map(|chunk| accumulator.feed(chunk))
        .collect::<Vec<_>>();
    let frames = frames.into_iter().chain(accumulator.finish());

    for frame in frames {
        let item = decoder.decode_item(&frame);
        let done = item == StreamItem::Done;
        items.push(item);
        if done {
            break;
        }
    }
    items
}
