use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

use nodeconsole::{
    config::Config,
    console::ConsoleContext,
    constants::*,
    emit_system_event,
    events::model::LogLevel,
    network::{serve_stdio, ConsoleListener},
    node::{spawn_learning_loop, NodeControl, PlainRenderer, StandaloneNode},
    shutdown::{ProcessControl, ShutdownHandle},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Node control console")]
struct Args {
    /// Path to config file (TOML)
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Serve one console session on stdin/stdout instead of TCP
    #[arg(long)]
    stdio: bool,
}

fn load_config(path: &str) -> Config {
    if !std::path::Path::new(path).exists() {
        eprintln!(
            "⚠️ No config file found at '{}', falling back to default config.",
            path
        );
        return Config::default();
    }
    match Config::from_file(path) {
        Ok(cfg) => {
            eprintln!("{}Loaded config from: {}", ICON_PLACEHOLDER, path);
            cfg
        }
        Err(err) => {
            eprintln!("❌ {}", err);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = load_config(&args.config);

    // stdout carries the session in stdio mode, so the console sink stays off.
    let mut logging = config.logging.clone().unwrap_or_default();
    if args.stdio {
        logging.disable_console = Some(true);
    }
    nodeconsole::events::init_events_from_config(Some(&logging)).await;

    let app_name = config
        .app_name
        .clone()
        .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
    emit_system_event!(
        LogLevel::Info,
        "startup",
        Some(format!("{} {}", app_name, full_version()))
    );

    let node_cfg = config.node();
    let node = Arc::new(StandaloneNode::from_config(&node_cfg));
    emit_system_event!(
        LogLevel::Info,
        "identity_resolved",
        Some(format!("address={}", node.identity().checksum_address))
    );

    let shutdown = ShutdownHandle::new();
    spawn_ctrl_c_handler(shutdown.clone());
    if node_cfg.start_learning.unwrap_or(true) {
        if let Err(e) = node.start_learning_loop() {
            eprintln!("❌ Failed to start learning loop: {}", e);
        }
    }
    let interval = Duration::from_secs(node_cfg.learning_interval_secs.unwrap_or(30).max(1));
    let learning = spawn_learning_loop(node.clone(), interval, shutdown.subscribe());

    let console_cfg = config.console();
    let ctx = ConsoleContext::new(node.clone(), Arc::new(PlainRenderer), shutdown.clone())
        .with_console_config(&console_cfg);

    if args.stdio {
        match serve_stdio(&ctx).await {
            Ok(cause) => emit_system_event!(
                LogLevel::Info,
                "stdio_session_ended",
                Some(cause.to_string())
            ),
            Err(e) => eprintln!("❌ Console error: {}", e),
        }
        // Losing the operator only stops learning; the node runs until halted.
        if !shutdown.is_halted() {
            eprintln!(
                "🟢 {} console detached; node still running. Press Ctrl+C to shut down...",
                app_name
            );
            shutdown.subscribe().halted().await;
        }
        eprintln!("🛑 {} shutting down gracefully.", app_name);
        emit_system_event!(LogLevel::Info, "shutdown", None);
        let _ = learning.await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        nodeconsole::events::dispatcher::flush().await;
        // A blocked stdin read would otherwise hold the runtime open.
        std::process::exit(0);
    }

    let listener = match ConsoleListener::bind(&console_cfg.listen_addr(), ctx).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!(
                "❌ Failed to start console on {}: {}",
                console_cfg.listen_addr(),
                e
            );
            std::process::exit(1);
        }
    };
    if let Ok(addr) = listener.local_addr() {
        println!("{}Console listening on {}", ICON_PLACEHOLDER, addr);
    }
    let server = tokio::spawn(listener.serve());

    println!("🟢 {} is running. Press Ctrl+C to shut down...", app_name);

    shutdown.subscribe().halted().await;
    println!("🛑 {} shutting down gracefully.", app_name);
    emit_system_event!(LogLevel::Info, "shutdown", None);

    match server.await {
        Ok(Err(e)) => eprintln!("❌ Console listener error: {}", e),
        Err(e) => eprintln!("❌ Console listener task failed: {}", e),
        Ok(Ok(())) => {}
    }
    let _ = learning.await;
    // Let the dispatcher drain queued events before the runtime drops.
    tokio::time::sleep(Duration::from_millis(50)).await;
    nodeconsole::events::dispatcher::flush().await;
}

/// Ctrl+C halts the process the same way `stop` does.
fn spawn_ctrl_c_handler(shutdown: ShutdownHandle) {
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => shutdown.halt(),
            Err(e) => eprintln!("❌ Failed to listen for shutdown signal: {}", e),
        }
    });
}
