// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Test doubles shared by unit tests across modules.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::stream::{DecodeFailure, DiagnosticSink};
use crate::transport::{ByteStream, ChatRequest, Transport, TransportError};

/// One step of a scripted response body.
#[derive(Clone)]
pub enum Step {
    Chunk(&'static str),
    Fail(&'static str),
}

/// Replies to every request with the same scripted body and records the
/// requests it receives.
pub struct ScriptedTransport {
    steps: Vec<Step>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            steps,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// A well-formed body with one frame per chunk.
    pub fn frames(frames: &[&'static str]) -> Arc<Self> {
        let mut steps: Vec<Step> = Vec::new();
        for frame in frames {
            steps.push(Step::Chunk(*frame));
            steps.push(Step::Chunk("\n\n"));
        }
        Self::new(steps)
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_stream(
        &self,
        _path: &str,
        body: &ChatRequest,
        _timeout: Duration,
    ) -> Result<ByteStream, TransportError> {
        self.requests.lock().unwrap().push(body.clone());
        let items: Vec<Result<Bytes, TransportError>> = self
            .steps
            .iter()
            .map(|step| match step {
                Step::Chunk(text) => Ok(Bytes::from_static(text.as_bytes())),
                Step::Fail(reason) => Err(TransportError::Body(reason.to_string())),
            })
            .collect();
        Ok(Box::pin(futures_util::stream::iter(items)))
    }
}

/// Rejects every request before streaming begins.
pub struct RejectingTransport {
    pub status: u16,
}

#[async_trait]
impl Transport for RejectingTransport {
    async fn post_stream(
        &self,
        _path: &str,
        _body: &ChatRequest,
        _timeout: Duration,
    ) -> Result<ByteStream, TransportError> {
        Err(TransportError::Status {
            status: self.status,
            body: "rejected".to_string(),
        })
    }
}

/// Accepts the request but never produces a chunk.
pub struct StalledTransport;

#[async_trait]
impl Transport for StalledTransport {
    async fn post_stream(
        &self,
        _path: &str,
        _body: &ChatRequest,
        _timeout: Duration,
    ) -> Result<ByteStream, TransportError> {
        Ok(Box::pin(futures_util::stream::pending::<
            Result<Bytes, TransportError>,
        >()))
    }
}

/// Keeps every diagnostic record in memory.
#[derive(Default)]
pub struct RecordingDiagnostics {
    records: Mutex<Vec<DecodeFailure>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<DecodeFailure> {
        self.records.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn record(&self, failure: &DecodeFailure) {
        self.records.lock().unwrap().push(failure.clone());
    }
}
