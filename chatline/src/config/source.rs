// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

use std::path::{Path, PathBuf};

use super::defaults::DEFAULT_CONFIG_YAML;
use super::error::ConfigError;

/// Abstraction over where config YAML comes from.
///
/// `FileSource` reads from disk; `StringSource` provides content directly
/// (built-in defaults, and tests that avoid file I/O).
pub trait ConfigSource {
    fn load(&self) -> Result<String, ConfigError>;
}

/// Loads config from a file on disk.
pub struct FileSource {
    pub path: PathBuf,
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<String, ConfigError> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Provides config content directly as a string.
pub struct StringSource {
    pub content: String,
}

impl ConfigSource for StringSource {
    fn load(&self) -> Result<String, ConfigError> {
        Ok(self.content.clone())
    }
}

/// The file at `path` if it exists, otherwise the built-in defaults.
pub fn source_for(path: &Path) -> Box<dyn ConfigSource> {
    if path.exists() {
        Box::new(FileSource {
            path: path.to_path_buf(),
        })
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Box::new(StringSource {
            content: DEFAULT_CONFIG_YAML.to_string(),
        })
    }
}
