// src/node/standalone.rs
//
// In-process node used by the bundled binary. It owns no peer protocol: the
// "learning loop" only rotates through configured addresses and records rounds.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::{DisconnectCause, FleetState, NodeControl, NodeIdentity, StatusRenderer};
use crate::config::NodeConfig;
use crate::events::model::LogLevel;
use crate::shutdown::ShutdownSignal;

pub struct StandaloneNode {
    identity: NodeIdentity,
    known_nodes: Vec<String>,
    learning: AtomicBool,
    teacher_index: AtomicUsize,
    rounds: AtomicU64,
    last_round: Mutex<Option<DateTime<Utc>>>,
    last_stop_reason: Mutex<Option<DisconnectCause>>,
}

impl StandaloneNode {
    pub fn new(identity: NodeIdentity, known_nodes: Vec<String>) -> Self {
        Self {
            identity,
            known_nodes,
            learning: AtomicBool::new(false),
            teacher_index: AtomicUsize::new(0),
            rounds: AtomicU64::new(0),
            last_round: Mutex::new(None),
            last_stop_reason: Mutex::new(None),
        }
    }

    /// Build from `[node]`, generating an address and nickname when absent.
    pub fn from_config(cfg: &NodeConfig) -> Self {
        let checksum_address = cfg
            .checksum_address
            .clone()
            .unwrap_or_else(generate_checksum_address);
        let nickname = cfg.nickname.clone().unwrap_or_else(|| {
            let tag: String = checksum_address
                .trim_start_matches("0x")
                .chars()
                .take(6)
                .collect();
            format!("node-{}", tag.to_lowercase())
        });
        let identity = NodeIdentity {
            checksum_address,
            rest_url: cfg
                .rest_url
                .clone()
                .unwrap_or_else(|| "https://127.0.0.1:9151".to_string()),
            nickname,
        };
        let mut seen = HashSet::new();
        let known = cfg
            .known_nodes
            .clone()
            .unwrap_or_default()
            .into_iter()
            .filter(|addr| seen.insert(addr.clone()))
            .collect();
        Self::new(identity, known)
    }

    pub fn learning_rounds(&self) -> u64 {
        self.rounds.load(Ordering::Relaxed)
    }

    pub fn last_stop_reason(&self) -> Option<DisconnectCause> {
        self.last_stop_reason.lock().clone()
    }

    /// One discovery round against the current teacher.
    pub fn learn_once(&self) {
        if !self.is_learning() {
            return;
        }
        let round = self.rounds.fetch_add(1, Ordering::Relaxed) + 1;
        *self.last_round.lock() = Some(Utc::now());
        crate::emit_node_event!(
            quiet LogLevel::Debug,
            "learning_round",
            self.current_teacher(),
            Some(format!("round={}", round))
        );
    }
}

fn generate_checksum_address() -> String {
    let hex = format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    );
    // Mixed case like an EIP-55 address; cosmetic only.
    let body: String = hex[..40]
        .chars()
        .enumerate()
        .map(|(i, c)| if i % 3 == 0 { c.to_ascii_uppercase() } else { c })
        .collect();
    format!("0x{}", body)
}

fn fleet_checksum(nodes: &[String]) -> String {
    let mut sorted: Vec<&String> = nodes.iter().collect();
    sorted.sort();
    let mut hasher = DefaultHasher::new();
    sorted.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

impl NodeControl for StandaloneNode {
    fn identity(&self) -> NodeIdentity {
        self.identity.clone()
    }

    fn is_learning(&self) -> bool {
        self.learning.load(Ordering::SeqCst)
    }

    fn current_teacher(&self) -> Option<String> {
        if self.known_nodes.is_empty() {
            return None;
        }
        let idx = self.teacher_index.load(Ordering::SeqCst) % self.known_nodes.len();
        self.known_nodes.get(idx).cloned()
    }

    fn known_nodes(&self) -> Vec<String> {
        self.known_nodes.clone()
    }

    fn fleet_state(&self) -> FleetState {
        FleetState {
            checksum: fleet_checksum(&self.known_nodes),
            population: self.known_nodes.len() + 1,
            updated: *self.last_round.lock(),
        }
    }

    fn cycle_teacher_node(&self) -> anyhow::Result<()> {
        if self.known_nodes.is_empty() {
            crate::emit_node_event!(LogLevel::Warn, "no_teacher_available", None, None);
            return Ok(());
        }
        self.teacher_index.fetch_add(1, Ordering::SeqCst);
        crate::emit_node_event!(LogLevel::Info, "teacher_cycled", self.current_teacher(), None);
        Ok(())
    }

    fn start_learning_loop(&self) -> anyhow::Result<()> {
        if !self.learning.swap(true, Ordering::SeqCst) {
            crate::emit_node_event!(LogLevel::Info, "learning_started", self.current_teacher(), None);
        }
        Ok(())
    }

    fn stop_learning_loop(&self, reason: Option<DisconnectCause>) -> anyhow::Result<()> {
        let was_learning = self.learning.swap(false, Ordering::SeqCst);
        let detail = reason.as_ref().map(|r| r.to_string());
        *self.last_stop_reason.lock() = reason;
        if was_learning {
            crate::emit_node_event!(LogLevel::Info, "learning_stopped", None, detail);
        }
        Ok(())
    }
}

/// Run `learn_once` every `interval` until halt.
pub fn spawn_learning_loop(
    node: Arc<StandaloneNode>,
    interval: Duration,
    mut shutdown: ShutdownSignal,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.halted() => break,
                _ = ticker.tick() => node.learn_once(),
            }
        }
        node.learning.store(false, Ordering::SeqCst);
    })
}

/// Minimal text output for the read-only commands.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

fn format_uptime(since: DateTime<Utc>) -> String {
    let secs = (Utc::now() - since).num_seconds().max(0);
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

impl StatusRenderer for PlainRenderer {
    fn node_status(
        &self,
        node: &dyn NodeControl,
        session_start: DateTime<Utc>,
    ) -> anyhow::Result<String> {
        let identity = node.identity();
        let fleet = node.fleet_state();
        let teacher = node.current_teacher().unwrap_or_else(|| "None".into());
        Ok(format!(
            "Nickname ................ {}\n\
             Checksum address ........ {}\n\
             Rest URL ................ {}\n\
             Session start ........... {}\n\
             Session uptime .......... {}\n\
             Learning ................ {}\n\
             Current teacher ......... {}\n\
             Known nodes ............. {}\n\
             Fleet state ............. {}",
            identity.nickname,
            identity.checksum_address,
            identity.rest_url,
            session_start.to_rfc3339(),
            format_uptime(session_start),
            if node.is_learning() { "On" } else { "Off" },
            teacher,
            node.known_nodes().len(),
            fleet.checksum,
        ))
    }

    fn known_nodes(&self, node: &dyn NodeControl) -> anyhow::Result<String> {
        let nodes = node.known_nodes();
        if nodes.is_empty() {
            return Ok("No known nodes".to_string());
        }
        let teacher = node.current_teacher();
        let mut out = format!("Known nodes ({}):", nodes.len());
        for addr in &nodes {
            let marker = if teacher.as_deref() == Some(addr.as_str()) {
                " (teacher)"
            } else {
                ""
            };
            out.push_str(&format!("\n  {}{}", addr, marker));
        }
        Ok(out)
    }

    fn fleet_state(&self, node: &dyn NodeControl) -> anyhow::Result<String> {
        let fleet = node.fleet_state();
        let updated = fleet
            .updated
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".into());
        Ok(format!(
            "Fleet {} | {} nodes | updated {}",
            fleet.checksum, fleet.population, updated
        ))
    }
}
