// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::time::Duration;

/// Top-level parsed and validated chatline config.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Contract version. Always "v1".
    pub version: String,
    pub api: ApiConfig,
    /// Model used for the first request of a session.
    pub model: String,
    /// Models offered by `/model`. Always contains `model`.
    pub models: Vec<String>,
    /// Seeded into every new conversation.
    pub system_message: Option<String>,
    pub request: RequestConfig,
    pub diagnostics: DiagnosticsConfig,
}

/// Where and how to reach the completion API.
#[derive(Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Sent as a bearer token when present.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Per-request behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    /// Ceiling on a whole streaming request, in milliseconds.
    pub timeout_ms: u64,
    /// Request `stream_options.include_usage`.
    pub include_usage: bool,
}

impl RequestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Undecodable-frame log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    pub log_file: PathBuf,
}
