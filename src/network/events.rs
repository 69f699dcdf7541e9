use crate::events::{
    dispatcher,
    model::{ConsoleEvent, ConsoleTransport, LogEvent, LogLevel},
};

/// Where a console connection came from; stamped on every event it produces.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub transport: ConsoleTransport,
    pub peer_addr: Option<String>,
    pub corr_id: String,
}

impl ConnectionInfo {
    pub fn tcp(peer_addr: impl ToString) -> Self {
        Self {
            transport: ConsoleTransport::Tcp,
            peer_addr: Some(peer_addr.to_string()),
            corr_id: dispatcher::correlation_id(),
        }
    }

    pub fn stdio() -> Self {
        Self {
            transport: ConsoleTransport::Stdio,
            peer_addr: None,
            corr_id: dispatcher::correlation_id(),
        }
    }
}

/// Emit a structured console event tied to one connection.
pub(crate) fn emit_console_event(
    conn: &ConnectionInfo,
    level: LogLevel,
    action: &str,
    command: Option<String>,
    detail: Option<String>,
) {
    let mut meta = dispatcher::meta("console", level);
    meta.corr_id = Some(conn.corr_id.clone());
    dispatcher::emit(LogEvent::Console(ConsoleEvent {
        meta,
        action: action.to_string(),
        transport: conn.transport,
        peer_addr: conn.peer_addr.clone(),
        command,
        detail,
    }));
}
