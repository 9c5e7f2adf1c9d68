// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Raw YAML deserialization types (internal)
// Kept separate from the public Config structs: interpolation, defaults
// and validation happen between raw and public.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RawConfig {
    pub chatline: String,
    pub api: Option<RawApiConfig>,
    pub model: Option<String>,
    #[serde(default)]
    pub models: Vec<String>,
    pub system_message: Option<String>,
    pub request: Option<RawRequestConfig>,
    pub diagnostics: Option<RawDiagnosticsConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RawApiConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawRequestConfig {
    pub timeout_ms: Option<u64>,
    pub include_usage: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct RawDiagnosticsConfig {
    pub log_file: Option<String>,
}
