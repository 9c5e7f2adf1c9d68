// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// HTTP transport
//
// Responsibilities:
// - Chat completions request body (model, stream flag, full history)
// - Transport trait: the injection point for the HTTP client
// - reqwest implementation exposing the response body as a byte stream
// - Mapping of network failures, timeouts and non-2xx statuses

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{Stream, TryStreamExt};
use serde::Serialize;

use crate::message::Message;

// ---------------------------------------------------------------------------
// Request body
// ---------------------------------------------------------------------------

/// Body of a streaming `chat/completions` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub stream: bool,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamOptions {
    pub include_usage: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures that abort a request. All of them leave history untouched.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response stream failed: {0}")]
    Body(String),
}

// ---------------------------------------------------------------------------
// Trait: Transport (dependency injection point)
// ---------------------------------------------------------------------------

/// Raw response body chunks, in arrival order.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Performs authenticated HTTP calls against the completion API.
///
/// Implementations must be Send + Sync so the session can hold them
/// behind an `Arc`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `path` and return the streaming response body.
    ///
    /// Resolves once response headers arrive; a non-2xx status is an error.
    async fn post_stream(
        &self,
        path: &str,
        body: &ChatRequest,
        timeout: Duration,
    ) -> Result<ByteStream, TransportError>;
}

// ---------------------------------------------------------------------------
// Reqwest transport
// ---------------------------------------------------------------------------

pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ReqwestTransport {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_stream(
        &self,
        path: &str,
        body: &ChatRequest,
        timeout: Duration,
    ) -> Result<ByteStream, TransportError> {
        let url = self.url(path);
        let mut req = self.client.post(&url).json(body).timeout(timeout);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::Request(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "completion request rejected");
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let stream = resp.bytes_stream().map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::Body(e.to_string())
            }
        });
        Ok(Box::pin(stream))
    }
}
