// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Diagnostic log for undecodable frames
//
// Record format (one per failure):
//   <RFC 3339 timestamp> <user message>\n<raw frame>\n

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::SecondsFormat;
use tokio::runtime::{Handle, RuntimeFlavor};

use super::types::DecodeFailure;

/// Receives a record for every frame the decoder could not parse.
///
/// Recording must never fail the stream, so implementations swallow
/// their own I/O errors.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, failure: &DecodeFailure);
}

/// Discards every record.
pub struct NullDiagnostics;

impl DiagnosticSink for NullDiagnostics {
    fn record(&self, _failure: &DecodeFailure) {}
}

/// Appends records to a text file.
///
/// Writes are serialized through a mutex and the file is opened in append
/// mode per record, so concurrent failures never interleave. The write is
/// blocking I/O; on a multi-thread tokio runtime it runs under
/// `block_in_place` so a slow log path does not stall other tasks on the
/// worker.
pub struct FileDiagnosticLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileDiagnosticLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }
}

impl FileDiagnosticLog {
    fn append(&self, record: &str) -> std::io::Result<()> {
        // A poisoned lock only means another writer panicked mid-append.
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(record.as_bytes()))
    }
}

impl DiagnosticSink for FileDiagnosticLog {
    fn record(&self, failure: &DecodeFailure) {
        let record = format_record(failure);
        let append = || self.append(&record);

        // block_in_place panics on a current-thread runtime.
        let result = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(append)
            }
            _ => append(),
        };

        if let Err(e) = result {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "failed to write diagnostic log"
            );
        }
    }
}

pub fn format_record(failure: &DecodeFailure) -> String {
    format!(
        "{} {}\n{}\n",
        failure
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        failure.trigger,
        failure.frame
    )
}
