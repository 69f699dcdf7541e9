mod common;

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use common::{lf_settings, RecordingNode, RecordingRenderer, PROMPT};
use nodeconsole::console::ConsoleContext;
use nodeconsole::network::ConsoleListener;
use nodeconsole::node::DisconnectCause;
use nodeconsole::shutdown::{ProcessControl, ShutdownHandle};

struct Running {
    addr: std::net::SocketAddr,
    node: Arc<RecordingNode>,
    shutdown: ShutdownHandle,
    server: JoinHandle<anyhow::Result<()>>,
}

async fn start(renderer: RecordingRenderer, max_line_length: usize) -> Running {
    let node = Arc::new(RecordingNode::default());
    let shutdown = ShutdownHandle::new();
    let ctx = ConsoleContext::new(node.clone(), Arc::new(renderer), shutdown.clone())
        .with_settings(lf_settings())
        .with_max_line_length(max_line_length);
    let listener = ConsoleListener::bind("127.0.0.1:0", ctx).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(listener.serve());
    Running {
        addr,
        node,
        shutdown,
        server,
    }
}

async fn read_until_prompt(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.ends_with(PROMPT.as_bytes()) {
        let n = tokio::time::timeout(Duration::from_secs(2), stream.read(&mut chunk))
            .await
            .expect("timed out waiting for prompt")
            .unwrap();
        assert!(n > 0, "connection closed before prompt: {:?}", buf);
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8(buf).unwrap()
}

async fn read_to_close(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let read = tokio::time::timeout(Duration::from_secs(2), stream.read(&mut chunk))
            .await
            .expect("timed out waiting for close");
        match read {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn wait_for_stop(node: &RecordingNode) -> Vec<Option<DisconnectCause>> {
    for _ in 0..200 {
        let calls = node.stop_calls();
        if !calls.is_empty() {
            return calls;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("node never received stop_learning_loop");
}

#[tokio::test]
async fn banner_prompt_and_clean_disconnect() {
    let running = start(RecordingRenderer::default(), 1024).await;
    let mut client = TcpStream::connect(running.addr).await.unwrap();

    let banner = read_until_prompt(&mut client).await;
    assert!(banner.starts_with("Attached 0xAbCdEf0123456789"));
    assert!(banner.contains("Type 'help' or '?' for help\n"));

    client.write_all(b"STATUS\n").await.unwrap();
    let reply = read_until_prompt(&mut client).await;
    assert_eq!(reply, format!("status: ok\nlearning: on\n{}", PROMPT));

    drop(client);
    let stops = wait_for_stop(&running.node).await;
    assert_eq!(stops, vec![Some(DisconnectCause::Done)]);
    assert!(!running.shutdown.is_halted());

    // The node is still reachable after the operator left.
    let mut again = TcpStream::connect(running.addr).await.unwrap();
    read_until_prompt(&mut again).await;
    drop(again);

    running.shutdown.halt();
    running.server.await.unwrap().unwrap();
}

#[tokio::test]
async fn stop_command_halts_listener() {
    let running = start(RecordingRenderer::default(), 1024).await;
    let mut client = TcpStream::connect(running.addr).await.unwrap();
    read_until_prompt(&mut client).await;

    client.write_all(b"stop\n").await.unwrap();
    let tail = read_to_close(&mut client).await;
    assert_eq!(tail, PROMPT);

    tokio::time::timeout(Duration::from_secs(2), running.server)
        .await
        .expect("listener did not stop")
        .unwrap()
        .unwrap();
    assert!(running.shutdown.is_halted());
    assert_eq!(
        running.node.stop_calls(),
        vec![Some(DisconnectCause::Shutdown)]
    );
}

#[tokio::test]
async fn halt_closes_every_open_session() {
    let running = start(RecordingRenderer::default(), 1024).await;
    let mut a = TcpStream::connect(running.addr).await.unwrap();
    let mut b = TcpStream::connect(running.addr).await.unwrap();
    read_until_prompt(&mut a).await;
    read_until_prompt(&mut b).await;

    running.shutdown.halt();
    read_to_close(&mut a).await;
    read_to_close(&mut b).await;
    running.server.await.unwrap().unwrap();

    assert_eq!(
        running.node.stop_calls(),
        vec![
            Some(DisconnectCause::Shutdown),
            Some(DisconnectCause::Shutdown)
        ]
    );
}

#[tokio::test]
async fn overlong_line_closes_connection() {
    let running = start(RecordingRenderer::default(), 16).await;
    let mut client = TcpStream::connect(running.addr).await.unwrap();
    read_until_prompt(&mut client).await;

    client.write_all(&[b'x'; 20]).await.unwrap();
    let tail = read_to_close(&mut client).await;
    assert_eq!(tail, "Line too long (limit 16 bytes).\n");

    let stops = wait_for_stop(&running.node).await;
    assert_eq!(stops, vec![Some(DisconnectCause::LineTooLong { limit: 16 })]);
    running.shutdown.halt();
    running.server.await.unwrap().unwrap();
}

#[tokio::test]
async fn collaborator_failure_ends_only_that_session() {
    let running = start(RecordingRenderer::failing("boom"), 1024).await;
    let mut client = TcpStream::connect(running.addr).await.unwrap();
    read_until_prompt(&mut client).await;

    client.write_all(b"status\n").await.unwrap();
    let tail = read_to_close(&mut client).await;
    assert!(tail.is_empty(), "unexpected output: {:?}", tail);

    let stops = wait_for_stop(&running.node).await;
    assert_eq!(
        stops,
        vec![Some(DisconnectCause::HandlerFailed("status: boom".into()))]
    );

    // The listener keeps serving other operators.
    let mut next = TcpStream::connect(running.addr).await.unwrap();
    read_until_prompt(&mut next).await;
    drop(next);

    running.shutdown.halt();
    running.server.await.unwrap().unwrap();
}

#[tokio::test]
async fn injected_halt_capability_receives_stop() {
    let node = Arc::new(RecordingNode::default());
    let halt = Arc::new(common::CountingHalt::default());
    let shutdown = ShutdownHandle::new();
    let ctx = ConsoleContext::new(
        node.clone(),
        Arc::new(RecordingRenderer::default()),
        shutdown.clone(),
    )
    .with_settings(lf_settings())
    .with_process_control(halt.clone());
    let listener = ConsoleListener::bind("127.0.0.1:0", ctx).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(listener.serve());

    let mut client = TcpStream::connect(addr).await.unwrap();
    read_until_prompt(&mut client).await;
    client.write_all(b"stop\n").await.unwrap();
    read_to_close(&mut client).await;

    assert_eq!(halt.count(), 1);
    assert!(!shutdown.is_halted());
    assert_eq!(
        wait_for_stop(&node).await,
        vec![Some(DisconnectCause::Shutdown)]
    );

    shutdown.halt();
    server.await.unwrap().unwrap();
}
