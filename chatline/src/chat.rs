// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Chat session
//
// Owns one live conversation and the settings for the next request.
// Requests are strictly sequential: `send` borrows the session mutably
// for the whole stream, and history only changes after a request
// succeeds.

use crate::history::ConversationHistory;
use crate::message::{Message, Role};
use crate::stream::{Completion, StreamSession};
use crate::transport::{ChatRequest, StreamOptions, TransportError};

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Parameters for the next request. Reconfiguring produces a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub model: String,
    /// Leads every request and seeds every new conversation.
    pub system_message: Option<String>,
    /// Ask the API to report token usage at the end of each stream.
    pub include_usage: bool,
}

impl SessionSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_message: None,
            include_usage: false,
        }
    }

    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..self.clone()
        }
    }

    pub fn with_system_message(&self, system_message: Option<String>) -> Self {
        Self {
            system_message,
            ..self.clone()
        }
    }

    pub fn with_include_usage(&self, include_usage: bool) -> Self {
        Self {
            include_usage,
            ..self.clone()
        }
    }

    /// Wrap `messages` in a streaming request.
    ///
    /// The standing system message is put in front unless `messages`
    /// already starts with it.
    pub fn build_request(&self, mut messages: Vec<Message>) -> ChatRequest {
        if let Some(system) = &self.system_message {
            let leading = messages
                .first()
                .is_some_and(|m| m.role == Role::System && m.content == *system);
            if !leading {
                messages.insert(0, Message::system(system.clone()));
            }
        }
        ChatRequest {
            model: self.model.clone(),
            stream: true,
            messages,
            stream_options: self.include_usage.then_some(StreamOptions {
                include_usage: true,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

// ---------------------------------------------------------------------------
// ChatSession
// ---------------------------------------------------------------------------

pub struct ChatSession {
    stream: StreamSession,
    settings: SessionSettings,
    history: ConversationHistory,
}

impl ChatSession {
    /// Start a session with a fresh conversation.
    pub fn new(stream: StreamSession, settings: SessionSettings) -> Self {
        let history = ConversationHistory::seeded(settings.system_message.clone());
        Self {
            stream,
            settings,
            history,
        }
    }

    /// Send a user message with the whole conversation and stream the answer.
    ///
    /// On success the user message and the answer are appended to history.
    /// On failure history is exactly as it was before the call.
    pub async fn send(
        &mut self,
        text: &str,
        sink: &mut dyn FnMut(&str),
    ) -> Result<Completion, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let user = Message::user(text);
        let mut messages = self.history.snapshot();
        messages.push(user.clone());
        let request = self.settings.build_request(messages);

        let completion = self.stream.run(&request, sink).await?;

        self.history.append(user);
        self.history.append(completion.message.clone());
        Ok(completion)
    }

    /// Discard the current conversation and start over.
    pub fn new_conversation(&mut self) {
        tracing::info!(discarded = self.history.len(), "starting new conversation");
        self.history.reset(self.settings.system_message.clone());
    }

    /// Use `model` for subsequent requests. History is kept.
    pub fn set_model(&mut self, model: impl Into<String>) {
        let model = model.into();
        tracing::info!(from = %self.settings.model, to = %model, "switching model");
        self.settings = self.settings.with_model(model);
    }

    /// Replace the standing system message. It leads the next request and
    /// seeds later conversations; history is not touched.
    pub fn set_system_message(&mut self, system_message: Option<String>) {
        self.settings = self.settings.with_system_message(system_message);
    }

    /// Add a system message to the live conversation. It is sent with the
    /// next request.
    pub fn inject_system(&mut self, text: impl Into<String>) {
        self.history.append(Message::system(text));
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }
}
