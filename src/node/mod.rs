//! Collaborator surface the console drives.
//!
//! The console never computes node state itself. It reads identity and fleet
//! views through [`NodeControl`], toggles the learning loop through the same
//! trait, and hands text production to a [`StatusRenderer`].

pub mod standalone;

pub use standalone::{spawn_learning_loop, PlainRenderer, StandaloneNode};

use chrono::{DateTime, Utc};
use std::fmt;
use std::io;

/// Public identity shown in the banner and prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    /// Checksummed public address, e.g. `0xA1b2...`
    pub checksum_address: String,
    /// Where the node serves its network API
    pub rest_url: String,
    pub nickname: String,
}

/// Aggregated view of the peer population as the node sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetState {
    pub checksum: String,
    pub population: usize,
    pub updated: Option<DateTime<Utc>>,
}

/// Why a console connection ended. Handed to the node untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectCause {
    /// Peer closed the stream cleanly
    Done,
    /// Transport failure
    Lost { kind: io::ErrorKind, message: String },
    /// A frame exceeded the configured limit without a delimiter
    LineTooLong { limit: usize },
    /// A command delegate failed; the session was torn down
    HandlerFailed(String),
    /// The process is halting
    Shutdown,
}

impl DisconnectCause {
    pub fn from_io(err: &io::Error) -> Self {
        DisconnectCause::Lost {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, DisconnectCause::Done | DisconnectCause::Shutdown)
    }
}

impl fmt::Display for DisconnectCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisconnectCause::Done => write!(f, "connection closed cleanly"),
            DisconnectCause::Lost { kind, message } => {
                write!(f, "connection lost ({:?}): {}", kind, message)
            }
            DisconnectCause::LineTooLong { limit } => {
                write!(f, "line exceeded {} bytes", limit)
            }
            DisconnectCause::HandlerFailed(e) => write!(f, "command failed: {}", e),
            DisconnectCause::Shutdown => write!(f, "process shutting down"),
        }
    }
}

/// Query/control calls the console may make on the node.
///
/// Implementations must return promptly: the console calls these on the
/// connection's task and stalls that operator until they return.
pub trait NodeControl: Send + Sync {
    fn identity(&self) -> NodeIdentity;

    fn is_learning(&self) -> bool;

    fn current_teacher(&self) -> Option<String>;

    fn known_nodes(&self) -> Vec<String>;

    fn fleet_state(&self) -> FleetState;

    /// Switch discovery to a different teacher node.
    fn cycle_teacher_node(&self) -> anyhow::Result<()>;

    fn start_learning_loop(&self) -> anyhow::Result<()>;

    /// Stop the discovery loop. `reason` is set when a console connection
    /// went away and carries its cause exactly as observed.
    fn stop_learning_loop(&self, reason: Option<DisconnectCause>) -> anyhow::Result<()>;
}

/// Text producers for the read-only commands.
pub trait StatusRenderer: Send + Sync {
    fn node_status(
        &self,
        node: &dyn NodeControl,
        session_start: DateTime<Utc>,
    ) -> anyhow::Result<String>;

    fn known_nodes(&self, node: &dyn NodeControl) -> anyhow::Result<String>;

    fn fleet_state(&self, node: &dyn NodeControl) -> anyhow::Result<String>;
}
