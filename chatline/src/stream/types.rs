// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Stream types
//
// Decoded delta events, token usage, and the wire shapes of a chat
// completions stream chunk.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::message::Role;

// ---------------------------------------------------------------------------
// Frame markers
// ---------------------------------------------------------------------------

/// Literal prefix of every data frame.
pub const DATA_PREFIX: &str = "data: ";

/// Frame that terminates the stream.
pub const DONE_SENTINEL: &str = "data: [DONE]";

// ---------------------------------------------------------------------------
// Decoded events
// ---------------------------------------------------------------------------

/// Token accounting reported by the API when `stream_options.include_usage`
/// is requested. Arrives in its own chunk right before `[DONE]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// The semantic content of one frame.
///
/// Every field is optional: the first frame of a turn usually carries only
/// the role, later frames only content, and the sentinel nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaEvent {
    pub role: Option<Role>,
    pub content: Option<String>,
    pub usage: Option<Usage>,
}

impl DeltaEvent {
    /// True when the event carries nothing the session would act on.
    pub fn is_empty(&self) -> bool {
        self.role.is_none()
            && self.content.as_deref().map_or(true, str::is_empty)
            && self.usage.is_none()
    }
}

/// A frame pulled from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamItem {
    /// A decoded data frame (possibly empty, e.g. a keep-alive).
    Delta(DeltaEvent),
    /// The `data: [DONE]` sentinel was seen.
    Done,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// A frame whose JSON payload could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub timestamp: DateTime<Utc>,
    /// The user message whose request produced the frame.
    pub trigger: String,
    /// The frame exactly as received.
    pub frame: String,
}

// ---------------------------------------------------------------------------
// Wire shapes (internal)
// ---------------------------------------------------------------------------

/// One streamed chunk. Some servers put the delta at the top level, the
/// OpenAI shape nests it under `choices[0]`. Top-level `delta` wins.
#[derive(Debug, Deserialize)]
pub(crate) struct WireChunk {
    pub delta: Option<WireDelta>,
    pub choices: Option<Vec<WireChoice>>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireChoice {
    pub delta: Option<WireDelta>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireDelta {
    pub role: Option<String>,
    pub content: Option<String>,
}

impl WireChunk {
    /// Resolve the delta by precedence: top-level `delta`, then
    /// `choices[0].delta`.
    pub fn into_delta(self) -> (Option<WireDelta>, Option<Usage>) {
        let usage = self.usage;
        if let Some(delta) = self.delta {
            return (Some(delta), usage);
        }
        let delta = self
            .choices
            .and_then(|choices| choices.into_iter().next())
            .and_then(|choice| choice.delta);
        (delta, usage)
    }
}
