#![allow(dead_code)]

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nodeconsole::config::LineDelimiter;
use nodeconsole::console::{ConsoleSession, SessionSettings};
use nodeconsole::node::{DisconnectCause, FleetState, NodeControl, NodeIdentity, StatusRenderer};
use nodeconsole::shutdown::ProcessControl;

pub const ADDRESS: &str = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";
pub const PROMPT: &str = "0xAbCdEf0 >>> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeCall {
    CycleTeacher,
    StartLearning,
    StopLearning(Option<DisconnectCause>),
}

#[derive(Default)]
pub struct RecordingNode {
    pub calls: Mutex<Vec<NodeCall>>,
}

impl RecordingNode {
    pub fn calls(&self) -> Vec<NodeCall> {
        self.calls.lock().clone()
    }

    pub fn stop_calls(&self) -> Vec<Option<DisconnectCause>> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                NodeCall::StopLearning(reason) => Some(reason.clone()),
                _ => None,
            })
            .collect()
    }
}

impl NodeControl for RecordingNode {
    fn identity(&self) -> NodeIdentity {
        NodeIdentity {
            checksum_address: ADDRESS.to_string(),
            rest_url: "https://10.0.0.7:9151".to_string(),
            nickname: "Lavender Tango".to_string(),
        }
    }

    fn is_learning(&self) -> bool {
        true
    }

    fn current_teacher(&self) -> Option<String> {
        None
    }

    fn known_nodes(&self) -> Vec<String> {
        vec!["10.0.0.8:9151".to_string()]
    }

    fn fleet_state(&self) -> FleetState {
        FleetState {
            checksum: "abc123".to_string(),
            population: 2,
            updated: None,
        }
    }

    fn cycle_teacher_node(&self) -> anyhow::Result<()> {
        self.calls.lock().push(NodeCall::CycleTeacher);
        Ok(())
    }

    fn start_learning_loop(&self) -> anyhow::Result<()> {
        self.calls.lock().push(NodeCall::StartLearning);
        Ok(())
    }

    fn stop_learning_loop(&self, reason: Option<DisconnectCause>) -> anyhow::Result<()> {
        self.calls.lock().push(NodeCall::StopLearning(reason));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub status_calls: AtomicUsize,
    pub known_calls: AtomicUsize,
    pub fleet_calls: AtomicUsize,
    /// When set, every render call fails with this message
    pub fail_with: Option<String>,
}

impl RecordingRenderer {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Default::default()
        }
    }

    fn result(&self, text: &str) -> anyhow::Result<String> {
        match &self.fail_with {
            Some(msg) => Err(anyhow::anyhow!(msg.clone())),
            None => Ok(text.to_string()),
        }
    }
}

impl StatusRenderer for RecordingRenderer {
    fn node_status(
        &self,
        _node: &dyn NodeControl,
        _session_start: DateTime<Utc>,
    ) -> anyhow::Result<String> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.result("status: ok\nlearning: on")
    }

    fn known_nodes(&self, _node: &dyn NodeControl) -> anyhow::Result<String> {
        self.known_calls.fetch_add(1, Ordering::SeqCst);
        self.result("10.0.0.8:9151")
    }

    fn fleet_state(&self, _node: &dyn NodeControl) -> anyhow::Result<String> {
        self.fleet_calls.fetch_add(1, Ordering::SeqCst);
        self.result("fleet abc123")
    }
}

#[derive(Default)]
pub struct CountingHalt {
    pub halts: AtomicUsize,
}

impl CountingHalt {
    pub fn count(&self) -> usize {
        self.halts.load(Ordering::SeqCst)
    }
}

impl ProcessControl for CountingHalt {
    fn halt(&self) {
        self.halts.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn lf_settings() -> SessionSettings {
    SessionSettings {
        delimiter: LineDelimiter::Lf,
        show_hint: true,
    }
}

pub struct Harness {
    pub node: Arc<RecordingNode>,
    pub renderer: Arc<RecordingRenderer>,
    pub halt: Arc<CountingHalt>,
    pub session: ConsoleSession,
}

pub fn harness_with(renderer: RecordingRenderer) -> Harness {
    let node = Arc::new(RecordingNode::default());
    let renderer = Arc::new(renderer);
    let halt = Arc::new(CountingHalt::default());
    let session = ConsoleSession::new(
        node.clone(),
        renderer.clone(),
        halt.clone(),
        lf_settings(),
    )
    .unwrap();
    Harness {
        node,
        renderer,
        halt,
        session,
    }
}

pub fn harness() -> Harness {
    harness_with(RecordingRenderer::default())
}
