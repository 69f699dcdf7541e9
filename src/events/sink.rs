use crate::{
    constants::ICON_PLACEHOLDER,
    events::model::{LogEvent, LogLevel},
};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

#[async_trait]
pub trait LogSink: Send + Sync {
    async fn handle(&self, event: &LogEvent);
    async fn flush(&self) {}
}

pub struct ConsoleSink {
    level_filter: Option<LogLevel>,
}
impl ConsoleSink {
    pub fn new(level_filter: Option<LogLevel>) -> Self {
        Self { level_filter }
    }
}

fn level_rank(level: LogLevel) -> u8 {
    match level {
        LogLevel::Trace => 0,
        LogLevel::Debug => 1,
        LogLevel::Info => 2,
        LogLevel::Warn => 3,
        LogLevel::Error => 4,
    }
}

#[async_trait]
impl LogSink for ConsoleSink {
    async fn handle(&self, event: &LogEvent) {
        let meta = event.meta();
        if meta.suppress_console {
            return;
        }
        if let Some(min) = self.level_filter {
            if level_rank(meta.level) < level_rank(min) {
                return;
            }
        }
        match event {
            LogEvent::Console(c) => {
                println!(
                    "{}CONSOLE action={} via={:?} peer={:?} cmd={:?} detail={:?} corr={:?}",
                    ICON_PLACEHOLDER,
                    c.action,
                    c.transport,
                    c.peer_addr,
                    c.command,
                    c.detail,
                    c.meta.corr_id
                );
            }
            LogEvent::Node(n) => {
                println!(
                    "{}NODE action={} teacher={:?} detail={:?}",
                    ICON_PLACEHOLDER, n.action, n.teacher, n.detail
                );
            }
            LogEvent::System(s) => {
                println!(
                    "{}SYS action={} detail={:?} corr={:?}",
                    ICON_PLACEHOLDER, s.action, s.detail, s.meta.corr_id
                );
            }
        }
    }
}

pub struct JsonFileSink {
    path: std::path::PathBuf,
    rotate: bool,
    max_size_bytes: u64,
    max_backups: u32,
    writer: tokio::sync::Mutex<Option<tokio::fs::File>>,
}

impl JsonFileSink {
    pub async fn new<P: Into<std::path::PathBuf>>(
        path: P,
        rotate: bool,
        max_size_bytes: u64,
        max_backups: u32,
    ) -> std::io::Result<Self> {
        let pb = path.into();
        if let Some(parent) = pb.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&pb)
            .await?;
        Ok(Self {
            path: pb,
            rotate,
            max_size_bytes,
            max_backups,
            writer: tokio::sync::Mutex::new(Some(file)),
        })
    }

    async fn rotate_if_needed(&self) {
        if !self.rotate {
            return;
        }
        if let Ok(meta) = tokio::fs::metadata(&self.path).await {
            if meta.len() >= self.max_size_bytes {
                let _ = self.perform_rotation().await;
            }
        }
    }

    async fn perform_rotation(&self) -> std::io::Result<()> {
        let mut guard = self.writer.lock().await;
        *guard = None;
        for idx in (1..self.max_backups).rev() {
            let from = self.path.with_extension(format!("jsonl.{}", idx));
            let to = self.path.with_extension(format!("jsonl.{}", idx + 1));
            if tokio::fs::metadata(&from).await.is_ok() {
                let _ = tokio::fs::rename(&from, &to).await;
            }
        }
        tokio::fs::rename(&self.path, self.path.with_extension("jsonl.1")).await?;
        let file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        *guard = Some(file);
        Ok(())
    }
}

#[async_trait]
impl LogSink for JsonFileSink {
    async fn handle(&self, event: &LogEvent) {
        self.rotate_if_needed().await;
        if let Ok(mut json) = serde_json::to_string(event) {
            json.push('\n');
            let mut guard = self.writer.lock().await;
            if let Some(f) = guard.as_mut() {
                // Rotation checks on-disk size before each event.
                let _ = f.write_all(json.as_bytes()).await;
                let _ = f.flush().await;
            }
        }
    }
    async fn flush(&self) {
        let mut guard = self.writer.lock().await;
        if let Some(f) = guard.as_mut() {
            let _ = f.flush().await;
            let _ = f.sync_all().await;
        }
    }
}
