//! One operator connection worth of console state.
//!
//! A session writes everything it has to say into a caller-supplied
//! [`std::io::Write`] buffer; the transport layer decides when that buffer
//! reaches the wire. Every processed line ends with the prompt, including
//! rejected and blank input, so the operator never waits on a silent channel.

use chrono::{DateTime, Utc};
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;

use super::command::Command;
use super::history::History;
use super::registry::{CommandRegistry, RegistrationError};
use super::render;
use crate::config::{ConsoleConfig, LineDelimiter};
use crate::node::{DisconnectCause, NodeControl, NodeIdentity, StatusRenderer};
use crate::shutdown::ProcessControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub delimiter: LineDelimiter,
    pub show_hint: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            delimiter: LineDelimiter::Platform,
            show_hint: true,
        }
    }
}

impl From<&ConsoleConfig> for SessionSettings {
    fn from(cfg: &ConsoleConfig) -> Self {
        Self {
            delimiter: cfg.delimiter(),
            show_hint: cfg.show_hint(),
        }
    }
}

/// What a single input line amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank or whitespace-only input
    Empty,
    DecodeFailed,
    /// Normalized key that matched nothing
    Rejected(String),
    Executed(Command),
}

impl LineOutcome {
    pub fn is_halt(&self) -> bool {
        matches!(self, LineOutcome::Executed(c) if c.halts_process())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("console write failed: {0}")]
    Io(#[from] io::Error),
    /// A node or renderer call failed. Not recovered here.
    #[error("'{command}' failed: {source}")]
    Collaborator {
        command: Command,
        source: anyhow::Error,
    },
}

pub struct ConsoleSession {
    node: Arc<dyn NodeControl>,
    renderer: Arc<dyn StatusRenderer>,
    process: Arc<dyn ProcessControl>,
    identity: NodeIdentity,
    start_time: DateTime<Utc>,
    prompt: String,
    registry: CommandRegistry<Command>,
    history: History,
    settings: SessionSettings,
}

impl ConsoleSession {
    pub fn new(
        node: Arc<dyn NodeControl>,
        renderer: Arc<dyn StatusRenderer>,
        process: Arc<dyn ProcessControl>,
        settings: SessionSettings,
    ) -> Result<Self, RegistrationError> {
        let registry = CommandRegistry::builtin()?;
        let identity = node.identity();
        let prompt = render::prompt_for(&identity);
        Ok(Self {
            node,
            renderer,
            process,
            identity,
            start_time: Utc::now(),
            prompt,
            registry,
            history: History::default(),
            settings,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Banner, optional hint, then the first prompt.
    pub fn connection_made<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in render::banner_lines(&self.identity, self.settings.show_hint) {
            self.write_line(out, &line)?;
        }
        self.write_prompt(out)
    }

    /// Read-evaluate-print for one delimiter-stripped frame.
    pub fn line_received<W: Write>(
        &mut self,
        raw: &[u8],
        out: &mut W,
    ) -> Result<LineOutcome, SessionError> {
        let outcome = match std::str::from_utf8(raw) {
            Err(_) => {
                self.write_line(out, render::DECODE_ERROR)?;
                LineOutcome::DecodeFailed
            }
            Ok(raw_line) => {
                let key = raw_line.trim().to_lowercase();
                if key.is_empty() {
                    LineOutcome::Empty
                } else {
                    match self.registry.lookup(&key) {
                        Ok(command) => {
                            let command = *command;
                            self.execute(command, out)?;
                            self.history.push(raw_line);
                            LineOutcome::Executed(command)
                        }
                        Err(_) => {
                            let message = render::invalid_input(self.registry.names());
                            self.write_line(out, &message)?;
                            LineOutcome::Rejected(key)
                        }
                    }
                }
            }
        };
        self.write_prompt(out)?;
        Ok(outcome)
    }

    /// Ends the session, forwarding `cause` to the node verbatim.
    pub fn connection_lost(self, cause: DisconnectCause) -> anyhow::Result<()> {
        self.node.stop_learning_loop(Some(cause))
    }

    fn execute<W: Write>(&self, command: Command, out: &mut W) -> Result<(), SessionError> {
        let fail = |source| SessionError::Collaborator { command, source };
        match command {
            Command::Help => {
                for line in render::help_lines(self.registry.list_all()) {
                    self.write_line(out, &line)?;
                }
            }
            Command::Status => {
                let text = self
                    .renderer
                    .node_status(self.node.as_ref(), self.start_time)
                    .map_err(fail)?;
                self.write_text(out, &text)?;
            }
            Command::KnownNodes => {
                let text = self.renderer.known_nodes(self.node.as_ref()).map_err(fail)?;
                self.write_text(out, &text)?;
            }
            Command::FleetState => {
                let text = self.renderer.fleet_state(self.node.as_ref()).map_err(fail)?;
                self.write_text(out, &text)?;
            }
            Command::CycleTeacher => self.node.cycle_teacher_node().map_err(fail)?,
            Command::StartLearning => self.node.start_learning_loop().map_err(fail)?,
            Command::StopLearning => self.node.stop_learning_loop(None).map_err(fail)?,
            Command::Stop => self.process.halt(),
        }
        Ok(())
    }

    fn write_text<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        for line in text.lines() {
            self.write_line(out, line)?;
        }
        Ok(())
    }

    fn write_line<W: Write>(&self, out: &mut W, line: &str) -> io::Result<()> {
        out.write_all(line.as_bytes())?;
        out.write_all(self.settings.delimiter.as_bytes())
    }

    fn write_prompt<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.prompt.as_bytes())
    }
}
