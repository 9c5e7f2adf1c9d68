// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o"];
pub const DEFAULT_TIMEOUT_MS: u64 = 120_000;
pub const DEFAULT_LOG_FILE: &str = "./error.log";

/// Config used when no config file exists.
pub const DEFAULT_CONFIG_YAML: &str = r#"chatline: v1

api:
  base_url: "https://api.openai.com/v1/"
  api_key: "${OPENAI_API_KEY}"

model: gpt-4o-mini
models:
  - gpt-4o-mini
  - gpt-4o

request:
  timeout_ms: 120000
  include_usage: true

diagnostics:
  log_file: "./error.log"
"#;
