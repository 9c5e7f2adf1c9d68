// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Streaming response decoding
//
// Responsibilities:
// - Reassemble newline-delimited frames across arbitrary chunk boundaries
// - Decode `data: ` frames into role / content / usage deltas
// - Recover from malformed JSON by surfacing the raw payload as content
// - Record undecodable frames to an append-only diagnostic log
// - Drive one request/response cycle and assemble the final message

mod accumulator;
mod decoder;
mod delta_stream;
mod diagnostics;
mod session;
mod types;

pub use accumulator::FrameAccumulator;
pub use decoder::{extract_payload, FrameDecoder};
pub use delta_stream::{decode_chunks, DeltaStream};
pub use diagnostics::{format_record, DiagnosticSink, FileDiagnosticLog, NullDiagnostics};
pub use session::{Completion, StreamSession, CHAT_COMPLETIONS_PATH, DEFAULT_TIMEOUT};
pub use types::{DecodeFailure, DeltaEvent, StreamItem, Usage, DATA_PREFIX, DONE_SENTINEL};
