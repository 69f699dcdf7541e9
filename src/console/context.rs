use std::sync::Arc;

use super::command::Command;
use super::registry::{CommandRegistry, RegistrationError};
use super::session::{ConsoleSession, SessionSettings};
use crate::config::ConsoleConfig;
use crate::constants::DEFAULT_MAX_LINE_LENGTH;
use crate::node::{NodeControl, StatusRenderer};
use crate::shutdown::{ProcessControl, ShutdownHandle};

/// Everything needed to open sessions; cloned into each connection task.
#[derive(Clone)]
pub struct ConsoleContext {
    pub node: Arc<dyn NodeControl>,
    pub renderer: Arc<dyn StatusRenderer>,
    pub process: Arc<dyn ProcessControl>,
    pub shutdown: ShutdownHandle,
    pub settings: SessionSettings,
    pub max_line_length: usize,
}

impl ConsoleContext {
    /// `stop` halts through `shutdown` unless replaced with [`Self::with_process_control`].
    pub fn new(
        node: Arc<dyn NodeControl>,
        renderer: Arc<dyn StatusRenderer>,
        shutdown: ShutdownHandle,
    ) -> Self {
        Self {
            node,
            renderer,
            process: Arc::new(shutdown.clone()),
            shutdown,
            settings: SessionSettings::default(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    pub fn with_console_config(mut self, cfg: &ConsoleConfig) -> Self {
        self.settings = SessionSettings::from(cfg);
        self.max_line_length = cfg.max_line_length();
        self
    }

    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    pub fn with_process_control(mut self, process: Arc<dyn ProcessControl>) -> Self {
        self.process = process;
        self
    }

    /// Build the command table once so a broken table fails before any
    /// connection is accepted.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        CommandRegistry::<Command>::builtin().map(|_| ())
    }

    pub fn open_session(&self) -> Result<ConsoleSession, RegistrationError> {
        ConsoleSession::new(
            self.node.clone(),
            self.renderer.clone(),
            self.process.clone(),
            self.settings,
        )
    }
}
