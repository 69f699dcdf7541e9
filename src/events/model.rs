use serde::Serialize;
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTransport {
    Tcp,
    Stdio,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventMeta {
    pub ts: SystemTime,
    pub level: LogLevel,
    pub corr_id: Option<String>,
    pub session_id: String,
    pub component: &'static str,
    pub suppress_console: bool,
}

/// Operator connection and command activity.
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleEvent {
    pub meta: EventMeta,
    pub action: String,
    pub transport: ConsoleTransport,
    pub peer_addr: Option<String>,
    pub command: Option<String>,
    pub detail: Option<String>,
}

/// Learning loop transitions reported by the node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeEvent {
    pub meta: EventMeta,
    pub action: String,
    pub teacher: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemEvent {
    pub meta: EventMeta,
    pub action: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEvent {
    Console(ConsoleEvent),
    Node(NodeEvent),
    System(SystemEvent),
}

impl LogEvent {
    pub fn meta(&self) -> &EventMeta {
        match self {
            LogEvent::Console(e) => &e.meta,
            LogEvent::Node(e) => &e.meta,
            LogEvent::System(e) => &e.meta,
        }
    }
}
