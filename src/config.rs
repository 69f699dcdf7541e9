use serde::Deserialize;
use std::path::Path;

use crate::constants::{
    DEFAULT_CONSOLE_BIND, DEFAULT_CONSOLE_PORT, DEFAULT_MAX_LINE_LENGTH, PLATFORM_NEWLINE,
};

/// Frame delimiter for the console byte stream.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineDelimiter {
    /// `\r\n` on Windows, `\n` elsewhere
    #[default]
    Platform,
    Lf,
    Crlf,
}

impl LineDelimiter {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineDelimiter::Platform => PLATFORM_NEWLINE.as_bytes(),
            LineDelimiter::Lf => b"\n",
            LineDelimiter::Crlf => b"\r\n",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    /// Interface the TCP listener binds to (default 127.0.0.1)
    pub bind: Option<String>,
    pub port: Option<u16>,
    /// platform | lf | crlf
    pub delimiter: Option<LineDelimiter>,
    /// Longest accepted frame in bytes; longer input closes the connection
    pub max_line_length: Option<usize>,
    /// Print the help hint after the banner (default true)
    pub show_hint: Option<bool>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            bind: Some(DEFAULT_CONSOLE_BIND.to_string()),
            port: Some(DEFAULT_CONSOLE_PORT),
            delimiter: Some(LineDelimiter::Platform),
            max_line_length: Some(DEFAULT_MAX_LINE_LENGTH),
            show_hint: Some(true),
        }
    }
}

impl ConsoleConfig {
    pub fn listen_addr(&self) -> String {
        format!(
            "{}:{}",
            self.bind.as_deref().unwrap_or(DEFAULT_CONSOLE_BIND),
            self.port.unwrap_or(DEFAULT_CONSOLE_PORT)
        )
    }

    pub fn delimiter(&self) -> LineDelimiter {
        self.delimiter.unwrap_or_default()
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length.unwrap_or(DEFAULT_MAX_LINE_LENGTH)
    }

    pub fn show_hint(&self) -> bool {
        self.show_hint.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Path to JSON line event log (rotated). If unset, defaults to logs/console_events.jsonl
    pub json_path: Option<String>,
    /// Max size in bytes before rotation (default 5MB)
    pub json_max_bytes: Option<usize>,
    /// Number of rotated files to retain (default 3)
    pub json_rotate: Option<u32>,
    /// Disable console sink (default false)
    pub disable_console: Option<bool>,
}

/// Identity and behaviour of the standalone node driven by the bundled binary.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Public checksum address; the prompt shows its first characters
    pub checksum_address: Option<String>,
    /// Network address advertised in the banner
    pub rest_url: Option<String>,
    pub nickname: Option<String>,
    /// Peers the standalone node rotates through as teachers
    pub known_nodes: Option<Vec<String>>,
    pub learning_interval_secs: Option<u64>,
    /// Start the learning loop at boot (default true)
    pub start_learning: Option<bool>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            checksum_address: None,
            rest_url: Some("https://127.0.0.1:9151".to_string()),
            nickname: None,
            known_nodes: Some(vec![]),
            learning_interval_secs: Some(30),
            start_learning: Some(true),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    pub app_name: Option<String>,
    pub console: Option<ConsoleConfig>,
    /// Logging / events configuration
    pub logging: Option<LoggingConfig>,
    pub node: Option<NodeConfig>,
}

impl Config {
    /// Parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read '{}': {}", path.display(), e))?;
        Self::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse '{}': {}", path.display(), e))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str::<Config>(content)?)
    }

    pub fn console(&self) -> ConsoleConfig {
        self.console.clone().unwrap_or_default()
    }

    pub fn node(&self) -> NodeConfig {
        self.node.clone().unwrap_or_default()
    }
}
