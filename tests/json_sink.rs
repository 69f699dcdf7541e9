use nodeconsole::events::{
    dispatcher,
    model::{LogEvent, LogLevel, SystemEvent},
    sink::{JsonFileSink, LogSink},
};

fn system_event(action: &str) -> LogEvent {
    LogEvent::System(SystemEvent {
        meta: dispatcher::meta("test", LogLevel::Info),
        action: action.to_string(),
        detail: None,
    })
}

#[tokio::test]
async fn writes_json_lines_and_rotates() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("logs").join("events.jsonl");
    let sink = JsonFileSink::new(path.clone(), true, 1, 2).await.unwrap();

    sink.handle(&system_event("first")).await;
    sink.handle(&system_event("second")).await;
    sink.flush().await;

    let current = std::fs::read_to_string(&path).unwrap();
    let rotated = std::fs::read_to_string(path.with_extension("jsonl.1")).unwrap();
    assert_eq!(current.lines().count(), 1);
    assert!(current.contains("\"action\":\"second\""));
    assert!(rotated.contains("\"action\":\"first\""));

    let parsed: serde_json::Value = serde_json::from_str(current.trim()).unwrap();
    assert_eq!(parsed["type"], "system");
    assert_eq!(parsed["meta"]["level"], "info");
}
