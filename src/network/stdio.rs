use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::console::ConsoleContext;
use crate::network::connection::serve_connection;
use crate::network::events::ConnectionInfo;
use crate::node::DisconnectCause;

/// Serve a single console session on the process's own stdin/stdout.
/// EOF on stdin ends the session with [`DisconnectCause::Done`]; the process
/// keeps running.
pub async fn serve_stdio(ctx: &ConsoleContext) -> anyhow::Result<DisconnectCause> {
    serve_stdio_streams(
        ctx,
        tokio::io::BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

/// [`serve_stdio`] over caller-supplied streams.
pub async fn serve_stdio_streams<R, W>(
    ctx: &ConsoleContext,
    reader: R,
    writer: W,
) -> anyhow::Result<DisconnectCause>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let session = ctx.open_session()?;
    let cause = serve_connection(
        reader,
        writer,
        session,
        ctx.max_line_length,
        ctx.shutdown.subscribe(),
        ConnectionInfo::stdio(),
    )
    .await;
    Ok(cause)
}
