//! Drives one console session over an async byte stream.

use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};

use crate::console::{ConsoleSession, LineOutcome, SessionError};
use crate::events::model::LogLevel;
use crate::network::events::{emit_console_event, ConnectionInfo};
use crate::network::framing::{Frame, LineReader};
use crate::node::DisconnectCause;
use crate::shutdown::ShutdownSignal;

/// Serve `session` until the peer leaves, a command fails, or the process halts.
///
/// The session's disconnect hook always runs exactly once and receives the
/// same cause this function returns.
pub async fn serve_connection<R, W>(
    reader: R,
    mut writer: W,
    mut session: ConsoleSession,
    max_line_length: usize,
    mut shutdown: ShutdownSignal,
    conn: ConnectionInfo,
) -> DisconnectCause
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    emit_console_event(&conn, LogLevel::Info, "connection_open", None, None);
    let delimiter = session.settings().delimiter;
    let mut lines = LineReader::new(reader, delimiter, max_line_length);
    let mut out: Vec<u8> = Vec::new();

    let cause = 'serve: {
        if let Err(e) = session.connection_made(&mut out) {
            break 'serve DisconnectCause::from_io(&e);
        }
        if let Err(e) = flush_out(&mut writer, &mut out).await {
            break 'serve DisconnectCause::from_io(&e);
        }

        loop {
            let frame = tokio::select! {
                _ = shutdown.halted() => break 'serve DisconnectCause::Shutdown,
                frame = lines.next_frame() => frame,
            };
            let raw = match frame {
                Ok(Frame::Line(raw)) => raw,
                Ok(Frame::Eof) => break 'serve DisconnectCause::Done,
                Ok(Frame::TooLong) => {
                    let limit = lines.max_line_length();
                    emit_console_event(
                        &conn,
                        LogLevel::Warn,
                        "line_too_long",
                        None,
                        Some(format!("limit={}", limit)),
                    );
                    let message = format!("Line too long (limit {} bytes).", limit);
                    out.extend_from_slice(message.as_bytes());
                    out.extend_from_slice(delimiter.as_bytes());
                    let _ = flush_out(&mut writer, &mut out).await;
                    break 'serve DisconnectCause::LineTooLong { limit };
                }
                Err(e) => break 'serve DisconnectCause::from_io(&e),
            };

            let outcome = match session.line_received(&raw, &mut out) {
                Ok(outcome) => outcome,
                Err(SessionError::Collaborator { command, source }) => {
                    emit_console_event(
                        &conn,
                        LogLevel::Error,
                        "handler_failed",
                        Some(command.to_string()),
                        Some(source.to_string()),
                    );
                    out.clear();
                    break 'serve DisconnectCause::HandlerFailed(format!(
                        "{}: {}",
                        command, source
                    ));
                }
                Err(SessionError::Io(e)) => break 'serve DisconnectCause::from_io(&e),
            };
            log_outcome(&conn, &outcome);
            if let Err(e) = flush_out(&mut writer, &mut out).await {
                break 'serve DisconnectCause::from_io(&e);
            }
            if outcome.is_halt() {
                break 'serve DisconnectCause::Shutdown;
            }
        }
    };

    emit_console_event(
        &conn,
        if cause.is_clean() {
            LogLevel::Info
        } else {
            LogLevel::Warn
        },
        "connection_closed",
        None,
        Some(cause.to_string()),
    );
    if let Err(e) = session.connection_lost(cause.clone()) {
        emit_console_event(
            &conn,
            LogLevel::Error,
            "disconnect_hook_failed",
            None,
            Some(e.to_string()),
        );
    }
    let _ = writer.shutdown().await;
    cause
}

async fn flush_out<W: AsyncWrite + Unpin>(
    writer: &mut W,
    out: &mut Vec<u8>,
) -> std::io::Result<()> {
    if !out.is_empty() {
        writer.write_all(out).await?;
        out.clear();
    }
    writer.flush().await
}

fn log_outcome(conn: &ConnectionInfo, outcome: &LineOutcome) {
    match outcome {
        LineOutcome::Empty => {}
        LineOutcome::DecodeFailed => {
            emit_console_event(conn, LogLevel::Warn, "decode_failed", None, None)
        }
        LineOutcome::Rejected(key) => emit_console_event(
            conn,
            LogLevel::Info,
            "command_rejected",
            Some(key.clone()),
            None,
        ),
        LineOutcome::Executed(command) => {
            emit_console_event(
                conn,
                LogLevel::Info,
                "command_executed",
                Some(command.to_string()),
                None,
            );
            if command.halts_process() {
                emit_console_event(
                    conn,
                    LogLevel::Warn,
                    "halt_requested",
                    Some(command.to_string()),
                    None,
                );
            }
        }
    }
}
