// src/network/listener.rs

use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;

use crate::console::ConsoleContext;
use crate::events::model::{ConsoleTransport, LogLevel};
use crate::network::connection::serve_connection;
use crate::network::events::{emit_console_event, ConnectionInfo};
use crate::node::DisconnectCause;

/// Pause after a failed accept before trying again.
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

fn log_listener_event(
    level: LogLevel,
    action: &str,
    addr: Option<String>,
    detail: Option<String>,
) {
    let conn = ConnectionInfo {
        transport: ConsoleTransport::Tcp,
        peer_addr: addr,
        corr_id: crate::events::dispatcher::correlation_id(),
    };
    emit_console_event(&conn, level, action, None, detail);
}

/// A bound console listener. Bind first, then [`ConsoleListener::serve`].
pub struct ConsoleListener {
    listener: TcpListener,
    ctx: ConsoleContext,
}

impl ConsoleListener {
    /// Validates the command table, then binds `addr`.
    pub async fn bind(addr: &str, ctx: ConsoleContext) -> anyhow::Result<Self> {
        ctx.validate()?;
        let listener = TcpListener::bind(addr).await?;
        log_listener_event(
            LogLevel::Info,
            "listener_bind",
            Some(listener.local_addr()?.to_string()),
            None,
        );
        Ok(Self { listener, ctx })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until halt is requested, then wait for every open
    /// session to run its disconnect hook.
    pub async fn serve(self) -> anyhow::Result<()> {
        let mut shutdown = self.ctx.shutdown.subscribe();
        let mut sessions: JoinSet<DisconnectCause> = JoinSet::new();
        loop {
            tokio::select! {
                _ = shutdown.halted() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        log_listener_event(
                            LogLevel::Info,
                            "incoming_connection",
                            Some(peer_addr.to_string()),
                            None,
                        );
                        sessions.spawn(handle_connection(stream, peer_addr, self.ctx.clone()));
                    }
                    Err(e) => {
                        log_listener_event(
                            LogLevel::Error,
                            "accept_failed",
                            None,
                            Some(e.to_string()),
                        );
                        // Persistent failures (e.g. EMFILE) would otherwise spin.
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
                Some(_) = sessions.join_next(), if !sessions.is_empty() => {}
            }
        }
        log_listener_event(
            LogLevel::Info,
            "listener_stopped",
            None,
            Some(format!("draining={}", sessions.len())),
        );
        while sessions.join_next().await.is_some() {}
        Ok(())
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    ctx: ConsoleContext,
) -> DisconnectCause {
    let conn = ConnectionInfo::tcp(peer_addr);
    let session = match ctx.open_session() {
        Ok(session) => session,
        Err(e) => {
            emit_console_event(
                &conn,
                LogLevel::Error,
                "session_open_failed",
                None,
                Some(e.to_string()),
            );
            return DisconnectCause::HandlerFailed(e.to_string());
        }
    };
    let (read_half, write_half) = stream.into_split();
    let reader = tokio::io::BufReader::new(read_half);
    serve_connection(
        reader,
        write_half,
        session,
        ctx.max_line_length,
        ctx.shutdown.subscribe(),
        conn,
    )
    .await
}
