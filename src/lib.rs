//! # nodeconsole
//!
//! Line-oriented control console for a long-running network node. An operator
//! attaches over TCP (or the process's own stdin/stdout), sees a banner and a
//! short prompt derived from the node's address, and drives the node with a
//! fixed set of text commands.
//!
//! ## Design Principles
//! * Async-first: the listener and every connection run on Tokio tasks.
//! * The console holds no node state. Queries and control go through
//!   [`node::NodeControl`]; text production through [`node::StatusRenderer`].
//! * Process halt is an injected capability ([`shutdown::ProcessControl`]).
//! * Event-driven instrumentation (JSON line audit log + console).
//!
//! ## Key Modules
//! * `console` – Command table, per-connection session, history, rendering.
//! * `network` – Line framing, TCP listener, stdio transport.
//! * `node` – Collaborator traits plus a standalone reference node.
//! * `config` – TOML runtime configuration.
//! * `events` – Structured logging/events dispatcher.
//! * `shutdown` – Halt fan-out shared by the listener, sessions and node loops.

pub mod config;
pub mod console;
pub mod constants;
pub mod events;
pub mod network;
pub mod node;
pub mod shutdown;
