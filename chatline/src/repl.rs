// Copyright 2026 The Chatline Project
// SPDX-License-Identifier: Apache-2.0

// Line-oriented terminal loop
//
// Reads one line at a time, dispatches slash commands, and streams answers
// to the output as they arrive. A request is awaited to completion before
// the next line is read.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::chat::{ChatError, ChatSession};
use crate::stream::Usage;

/// One parsed line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send the text as a user message.
    Send(String),
    /// `/new`
    NewConversation,
    /// `/model [name]`; bare `/model` lists the configured models.
    Model(Option<String>),
    /// `/system <text>`
    System(String),
    /// `/quit` or `/exit`
    Quit,
    /// Blank line.
    Empty,
    /// A slash command this loop does not know.
    Unknown(String),
}

/// Classify one line of input. Never fails.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Send(line.trim_end_matches(['\r', '\n']).to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "new" => Command::NewConversation,
        "model" if arg.is_empty() => Command::Model(None),
        "model" => Command::Model(Some(arg.to_string())),
        "system" if !arg.is_empty() => Command::System(arg.to_string()),
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(name.to_string()),
    }
}

/// Render a usage report line.
pub fn format_usage(usage: &Usage) -> String {
    format!(
        "[tokens: {} prompt + {} completion = {} total]",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    )
}

pub struct Repl<R, W> {
    input: R,
    output: W,
    models: Vec<String>,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// `models` is the list offered by `/model`.
    pub fn new(input: R, output: W, models: Vec<String>) -> Self {
        Self {
            input,
            output,
            models,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until `/quit` or end of input.
    pub async fn run(&mut self, chat: &mut ChatSession) -> std::io::Result<()> {
        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line).await? == 0 {
                writeln!(self.output)?;
                return Ok(());
            }

            match parse_command(&line) {
                Command::Empty => {}
                Command::Quit => return Ok(()),
                Command::NewConversation => {
                    chat.new_conversation();
                    writeln!(self.output, "Started a new conversation.")?;
                }
                Command::Model(None) => {
                    let current = chat.settings().model.clone();
                    for model in &self.models {
                        let marker = if *model == current { "*" } else { " " };
                        writeln!(self.output, "{marker} {model}")?;
                    }
                }
                Command::Model(Some(model)) => {
                    if !self.models.contains(&model) {
                        tracing::warn!(%model, "model is not in the configured list");
                        writeln!(self.output, "Note: {model} is not a configured model.")?;
                    }
                    chat.set_model(model.clone());
                    writeln!(self.output, "Using {model}.")?;
                }
                Command::System(text) => {
                    chat.inject_system(text);
                    writeln!(self.output, "System message added.")?;
                }
                Command::Unknown(name) => {
                    writeln!(
                        self.output,
                        "Unknown command /{name}. Try /new, /model, /system or /quit."
                    )?;
                }
                Command::Send(text) => self.send(chat, &text).await?,
            }
        }
    }

    async fn send(&mut self, chat: &mut ChatSession, text: &str) -> std::io::Result<()> {
        let output = &mut self.output;
        let mut write_error: Option<std::io::Error> = None;
        let mut sink = |fragment: &str| {
            if write_error.is_some() {
                return;
            }
            if let Err(e) = write_fragment(output, fragment) {
                write_error = Some(e);
            }
        };

        let result = chat.send(text, &mut sink).await;
        if let Some(e) = write_error {
            return Err(e);
        }

        match result {
            Ok(completion) => {
                writeln!(self.output)?;
                if let Some(usage) = completion.usage {
                    writeln!(self.output, "{}", format_usage(&usage))?;
                }
            }
            Err(ChatError::EmptyMessage) => {}
            Err(ChatError::Transport(e)) => {
                writeln!(self.output)?;
                writeln!(self.output, "Error: {e}")?;
            }
        }
        Ok(())
    }
}

fn write_fragment<W: Write>(output: &mut W, fragment: &str) -> std::io::Result<()> {
    output.write_all(fragment.as_bytes())?;
    output.flush()
}
