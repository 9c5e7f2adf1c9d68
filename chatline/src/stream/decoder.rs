// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Frame decoder
//
// Turns one frame into a DeltaEvent. Malformed JSON never fails the
// stream: the raw payload is surfaced as assistant content and a
// diagnostic record is written.

use std::sync::Arc;

use chrono::Utc;

use super::diagnostics::DiagnosticSink;
use super::types::{
    DecodeFailure, DeltaEvent, StreamItem, WireChunk, DATA_PREFIX, DONE_SENTINEL,
};
use crate::message::Role;

/// Decodes frames for a single request.
#[derive(Clone)]
pub struct FrameDecoder {
    diagnostics: Arc<dyn DiagnosticSink>,
    /// The user message that triggered the request, for diagnostics.
    trigger: String,
}

impl FrameDecoder {
    pub fn new(diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            diagnostics,
            trigger: String::new(),
        }
    }

    /// Bind the decoder to the user message whose response it decodes.
    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = trigger.into();
        self
    }

    /// Decode a frame into an event. The sentinel decodes to the empty event.
    pub fn decode(&self, frame: &str) -> DeltaEvent {
        match self.decode_item(frame) {
            StreamItem::Delta(event) => event,
            StreamItem::Done => DeltaEvent::default(),
        }
    }

    /// Decode a frame, distinguishing the sentinel from an empty delta.
    pub fn decode_item(&self, frame: &str) -> StreamItem {
        if frame.trim() == DONE_SENTINEL {
            return StreamItem::Done;
        }

        let payload = extract_payload(frame);
        if payload.is_empty() {
            // Blank keep-alive, comment line, or a frame with no object.
            return StreamItem::Delta(DeltaEvent::default());
        }

        match serde_json::from_str::<WireChunk>(payload) {
            Ok(chunk) => StreamItem::Delta(event_from_chunk(chunk)),
            Err(e) => {
                tracing::warn!(error = %e, frame_len = frame.len(), "undecodable stream frame");
                self.diagnostics.record(&DecodeFailure {
                    timestamp: Utc::now(),
                    trigger: self.trigger.clone(),
                    frame: frame.to_string(),
                });
                StreamItem::Delta(DeltaEvent {
                    role: Some(Role::Assistant),
                    content: Some(payload.to_string()),
                    usage: None,
                })
            }
        }
    }
}

/// The JSON object embedded in a frame: from the first `{` to the last `}`.
///
/// A truncated object (opening brace, no closing brace after it) runs to
/// the end of the frame so the fragment is not lost. A frame without any
/// `{` has no payload.
pub fn extract_payload(frame: &str) -> &str {
    let body = frame.strip_prefix(DATA_PREFIX).unwrap_or(frame);
    let Some(start) = body.find('{') else {
        return "";
    };
    match body.rfind('}') {
        Some(end) if end >= start => &body[start..=end],
        _ => &body[start..],
    }
}

fn event_from_chunk(chunk: WireChunk) -> DeltaEvent {
    let (delta, usage) = chunk.into_delta();
    let delta = delta.unwrap_or_default();

    let role = delta.role.as_deref().and_then(|raw| {
        let role = Role::parse(raw);
        if role.is_none() {
            tracing::debug!(role = raw, "ignoring unknown delta role");
        }
        role
    });

    DeltaEvent {
        role,
        content: delta.content,
        usage,
    }
}
