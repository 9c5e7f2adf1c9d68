// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Conversation history
//
// The completion API is stateless, so every request replays the whole
// conversation. History only grows by append; starting a new conversation
// replaces it wholesale.

use crate::message::Message;

/// Ordered log of the messages in one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a single system message, or empty.
    pub fn seeded(system: Option<String>) -> Self {
        let mut history = Self::new();
        history.reset(system);
        history
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// An owned copy of the current sequence, for building a request.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Replace the sequence with an empty one, or with a single system message.
    pub fn reset(&mut self, system: Option<String>) {
        self.messages = system.map(Message::system).into_iter().collect();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
