// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Stream session
//
// One request/response cycle: post the request, pull frames until the
// sentinel or end of body, forward content to the sink, and assemble the
// final message.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use uuid::Uuid;

use super::decoder::FrameDecoder;
use super::delta_stream::DeltaStream;
use super::diagnostics::DiagnosticSink;
use super::types::{StreamItem, Usage};
use crate::message::{Message, Role};
use crate::transport::{ChatRequest, Transport, TransportError};

/// Endpoint for text completions, relative to the API base URL.
pub const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

/// Ceiling on a whole request, headers through final frame.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// The assembled result of a successful stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub message: Message,
    pub usage: Option<Usage>,
}

/// Drives streaming requests against an injected transport.
pub struct StreamSession {
    transport: Arc<dyn Transport>,
    diagnostics: Arc<dyn DiagnosticSink>,
    timeout: Duration,
}

impl StreamSession {
    pub fn new(transport: Arc<dyn Transport>, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            transport,
            diagnostics,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `request` and stream the answer.
    ///
    /// Each non-empty content fragment is passed to `sink` as it arrives.
    /// Exceeding the timeout is reported as `TransportError::Timeout`.
    pub async fn run(
        &self,
        request: &ChatRequest,
        sink: &mut dyn FnMut(&str),
    ) -> Result<Completion, TransportError> {
        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!(
            "stream_session",
            %request_id,
            model = %request.model,
            messages = request.messages.len(),
        );

        let trigger = request
            .messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let decoder = FrameDecoder::new(Arc::clone(&self.diagnostics)).with_trigger(trigger);

        let result = tokio::time::timeout(self.timeout, self.drive(request, decoder, sink))
            .instrument(span.clone())
            .await;

        let _entered = span.enter();
        match result {
            Ok(Ok(completion)) => {
                tracing::info!(
                    role = completion.message.role.as_str(),
                    content_len = completion.message.content.len(),
                    total_tokens = completion.usage.map(|u| u.total_tokens),
                    "completion received"
                );
                Ok(completion)
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "completion request failed");
                Err(e)
            }
            Err(_) => {
                let e = TransportError::Timeout(format!(
                    "no complete response within {}ms",
                    self.timeout.as_millis()
                ));
                tracing::warn!(error = %e, "completion request failed");
                Err(e)
            }
        }
    }

    async fn drive(
        &self,
        request: &ChatRequest,
        decoder: FrameDecoder,
        sink: &mut dyn FnMut(&str),
    ) -> Result<Completion, TransportError> {
        let body = self
            .transport
            .post_stream(CHAT_COMPLETIONS_PATH, request, self.timeout)
            .await?;
        let mut stream = DeltaStream::new(body, decoder);

        let mut role: Option<Role> = None;
        let mut content = String::new();
        let mut usage = None;

        while let Some(item) = stream.next_item().await? {
            let event = match item {
                StreamItem::Done => break,
                StreamItem::Delta(event) if event.is_empty() => continue,
                StreamItem::Delta(event) => event,
            };

            if role.is_none() {
                role = event.role;
            }
            if event.usage.is_some() {
                usage = event.usage;
            }
            if let Some(fragment) = event.content.as_deref().filter(|c| !c.is_empty()) {
                sink(fragment);
                content.push_str(fragment);
            }
        }

        Ok(Completion {
            message: Message::new(role.unwrap_or(Role::Assistant), content),
            usage,
        })
    }
}
