use clap::Parser;
use tokio::io::{self, AsyncWriteExt};
use tokio::net::TcpStream;

/// nodeconsole-attach: connect the terminal to a running node's console.
///
/// Bytes typed on stdin go to the console as-is; everything the console writes
/// is copied to stdout. Exits when either side closes.
#[derive(Parser, Debug)]
#[command(
    name = "nodeconsole-attach",
    version,
    about = "Attach to a node console over TCP"
)]
struct Cli {
    /// Console address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:9151")]
    addr: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli.addr).await {
        eprintln!("❌ {}: {}", cli.addr, e);
        std::process::exit(1);
    }
}

async fn run(addr: &str) -> anyhow::Result<()> {
    let stream = TcpStream::connect(addr).await?;
    let (mut from_node, mut to_node) = stream.into_split();
    let mut stdin = io::stdin();
    let mut stdout = io::stdout();

    let upstream = async {
        io::copy(&mut stdin, &mut to_node).await?;
        to_node.shutdown().await
    };
    let downstream = async {
        io::copy(&mut from_node, &mut stdout).await?;
        stdout.flush().await
    };

    // The console closing the connection (e.g. after `stop`) ends the session
    // even while stdin is still open. Stdin EOF only half-closes.
    tokio::pin!(downstream);
    tokio::select! {
        res = &mut downstream => return Ok(res?),
        res = upstream => res?,
    }
    downstream.await?;
    Ok(())
}
