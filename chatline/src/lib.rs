// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

pub mod chat;
pub mod config;
pub mod history;
pub mod message;
pub mod repl;
pub mod stream;
pub mod transport;

#[cfg(test)]
mod testing;
