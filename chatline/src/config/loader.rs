// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use super::defaults::{
    DEFAULT_BASE_URL, DEFAULT_LOG_FILE, DEFAULT_MODEL, DEFAULT_MODELS, DEFAULT_TIMEOUT_MS,
};
use super::error::ConfigError;
use super::interpolation::resolve_variables;
use super::raw;
use super::source::ConfigSource;
use super::types::*;

/// Load and validate a chatline config from the given source.
///
/// Steps:
/// 1. Read raw YAML from source
/// 2. Parse YAML into raw deserialization types
/// 3. Validate version and required values
/// 4. Resolve variable interpolation in the api and diagnostics fields
/// 5. Fill defaults and build the typed Config
pub fn load_config(source: &dyn ConfigSource) -> Result<Config, ConfigError> {
    let raw_yaml = source.load()?;
    let raw: raw::RawConfig = serde_yaml::from_str(&raw_yaml)?;

    // Validate version
    if raw.chatline != "v1" {
        return Err(ConfigError::Validation(format!(
            "unsupported config version \"{}\", expected \"v1\"",
            raw.chatline
        )));
    }

    let api = build_api_config(raw.api)?;

    let model = raw.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
    if model.trim().is_empty() {
        return Err(ConfigError::Validation("model must not be empty".to_string()));
    }

    let mut models = if raw.models.is_empty() {
        DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
    } else {
        raw.models
    };
    if let Some(blank) = models.iter().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "models entries must not be empty, got \"{blank}\""
        )));
    }
    if !models.contains(&model) {
        models.insert(0, model.clone());
    }

    let request = build_request_config(raw.request)?;

    let log_file = match raw.diagnostics.and_then(|d| d.log_file) {
        Some(path) => resolve_variables(&path)?,
        None => DEFAULT_LOG_FILE.to_string(),
    };
    if log_file.is_empty() {
        return Err(ConfigError::Validation(
            "diagnostics.log_file must not be empty".to_string(),
        ));
    }

    let system_message = raw.system_message.filter(|s| !s.trim().is_empty());

    Ok(Config {
        version: raw.chatline,
        api,
        model,
        models,
        system_message,
        request,
        diagnostics: DiagnosticsConfig {
            log_file: PathBuf::from(log_file),
        },
    })
}

fn build_api_config(raw: Option<raw::RawApiConfig>) -> Result<ApiConfig, ConfigError> {
    let (base_url, api_key) = match raw {
        Some(api) => (api.base_url, api.api_key),
        None => (None, None),
    };

    let base_url = match base_url {
        Some(url) => resolve_variables(&url)?,
        None => DEFAULT_BASE_URL.to_string(),
    };
    if base_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api.base_url must not be empty".to_string(),
        ));
    }

    let api_key = api_key
        .map(|key| resolve_variables(&key))
        .transpose()?
        .filter(|key| !key.is_empty());

    Ok(ApiConfig { base_url, api_key })
}

fn build_request_config(raw: Option<raw::RawRequestConfig>) -> Result<RequestConfig, ConfigError> {
    let (timeout_ms, include_usage) = match raw {
        Some(r) => (r.timeout_ms, r.include_usage),
        None => (None, None),
    };

    let timeout_ms = timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
    if timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request.timeout_ms must be greater than zero".to_string(),
        ));
    }

    Ok(RequestConfig {
        timeout_ms,
        include_usage: include_usage.unwrap_or(true),
    })
}
