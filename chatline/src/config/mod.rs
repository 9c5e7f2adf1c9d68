// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Config loader and validator
//
// Loads chatline.yaml, validates structure, resolves `${VAR}` interpolation
// and fills defaults for anything the file leaves out.

mod defaults;
mod error;
mod interpolation;
mod loader;
mod raw;
mod source;
mod types;

pub use defaults::DEFAULT_CONFIG_YAML;
pub use error::ConfigError;
pub use interpolation::resolve_variables;
pub use loader::load_config;
pub use source::{source_for, ConfigSource, FileSource, StringSource};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Duration;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env<F: FnOnce()>(name: &str, value: Option<&str>, f: F) {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let previous = std::env::var(name).ok();
        match value {
            Some(v) => std::env::set_var(name, v),
            None => std::env::remove_var(name),
        }
        f();
        match previous {
            Some(v) => std::env::set_var(name, v),
            None => std::env::remove_var(name),
        }
    }

    fn load_str(yaml: &str) -> Result<Config, ConfigError> {
        load_config(&StringSource {
            content: yaml.to_string(),
        })
    }

    const FULL_YAML: &str = r#"chatline: v1

api:
  base_url: "https://llm.internal.example/v1/"
  api_key: "${CHATLINE_TEST_KEY}"

model: gpt-4o
models:
  - gpt-4o
  - gpt-4o-mini
  - o3-mini

system_message: "You are a concise assistant."

request:
  timeout_ms: 30000
  include_usage: false

diagnostics:
  log_file: "/tmp/chatline-errors.log"
"#;

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    #[test]
    fn full_config_loads() {
        with_env("CHATLINE_TEST_KEY", Some("sk-test"), || {
            let config = load_str(FULL_YAML).unwrap();
            assert_eq!(config.version, "v1");
            assert_eq!(config.api.base_url, "https://llm.internal.example/v1/");
            assert_eq!(config.api.api_key.as_deref(), Some("sk-test"));
            assert_eq!(config.model, "gpt-4o");
            assert_eq!(config.models, vec!["gpt-4o", "gpt-4o-mini", "o3-mini"]);
            assert_eq!(
                config.system_message.as_deref(),
                Some("You are a concise assistant.")
            );
            assert_eq!(config.request.timeout(), Duration::from_secs(30));
            assert!(!config.request.include_usage);
            assert_eq!(
                config.diagnostics.log_file,
                PathBuf::from("/tmp/chatline-errors.log")
            );
        });
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let config = load_str("chatline: v1\n").unwrap();
        assert_eq!(config.api.base_url, "https://api.openai.com/v1/");
        assert_eq!(config.api.api_key, None);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.models, vec!["gpt-4o-mini", "gpt-4o"]);
        assert_eq!(config.system_message, None);
        assert_eq!(config.request.timeout_ms, 120_000);
        assert!(config.request.include_usage);
        assert_eq!(config.diagnostics.log_file, PathBuf::from("./error.log"));
    }

    #[test]
    fn built_in_defaults_load_with_key_set() {
        with_env("OPENAI_API_KEY", Some("sk-default"), || {
            let config = load_str(DEFAULT_CONFIG_YAML).unwrap();
            assert_eq!(config.api.api_key.as_deref(), Some("sk-default"));
            assert_eq!(config.model, "gpt-4o-mini");
        });
    }

    #[test]
    fn built_in_defaults_require_key() {
        with_env("OPENAI_API_KEY", None, || {
            let err = load_str(DEFAULT_CONFIG_YAML).unwrap_err();
            match err {
                ConfigError::UndefinedVariable { name } => assert_eq!(name, "OPENAI_API_KEY"),
                other => panic!("Expected UndefinedVariable, got: {other:?}"),
            }
        });
    }

    #[test]
    fn configured_model_is_added_to_models() {
        let config = load_str("chatline: v1\nmodel: o3-mini\nmodels: [gpt-4o]\n").unwrap();
        assert_eq!(config.models, vec!["o3-mini", "gpt-4o"]);
    }

    #[test]
    fn blank_system_message_is_none() {
        let config = load_str("chatline: v1\nsystem_message: \"  \"\n").unwrap();
        assert_eq!(config.system_message, None);
    }

    #[test]
    fn api_key_is_redacted_in_debug() {
        let config = load_str("chatline: v1\napi:\n  api_key: sk-secret\n").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    #[test]
    fn wrong_version_is_rejected() {
        let err = load_str("chatline: v2\n").unwrap_err();
        match err {
            ConfigError::Validation(msg) => assert!(msg.contains("v2"), "got: {msg}"),
            other => panic!("Expected Validation, got: {other:?}"),
        }
    }

    #[test]
    fn missing_version_is_a_yaml_error() {
        let err = load_str("model: gpt-4o\n").unwrap_err();
        assert!(matches!(err, ConfigError::YamlError(_)), "got: {err:?}");
    }

    #[test]
    fn empty_model_is_rejected() {
        let err = load_str("chatline: v1\nmodel: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got: {err:?}");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = load_str("chatline: v1\nrequest:\n  timeout_ms: 0\n").unwrap_err();
        match err {
            ConfigError::Validation(msg) => assert!(msg.contains("timeout_ms")),
            other => panic!("Expected Validation, got: {other:?}"),
        }
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = load_str("chatline: v1\napi:\n  base_url: \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got: {err:?}");
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let err = load_str("chatline: v1\nmodels: [unclosed\n").unwrap_err();
        assert!(matches!(err, ConfigError::YamlError(_)), "got: {err:?}");
    }

    // -----------------------------------------------------------------------
    // Sources
    // -----------------------------------------------------------------------

    #[test]
    fn file_source_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chatline: v1\nmodel: gpt-4o").unwrap();

        let config = load_config(&FileSource {
            path: file.path().to_path_buf(),
        })
        .unwrap();
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config(&FileSource {
            path: PathBuf::from("/nonexistent/chatline.yaml"),
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)), "got: {err:?}");
    }

    #[test]
    fn source_for_missing_path_uses_defaults() {
        let source = source_for(std::path::Path::new("/nonexistent/chatline.yaml"));
        assert_eq!(source.load().unwrap(), DEFAULT_CONFIG_YAML);
    }

    #[test]
    fn source_for_existing_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "chatline: v1\n").unwrap();
        let source = source_for(file.path());
        assert_eq!(source.load().unwrap(), "chatline: v1\n");
    }
}
