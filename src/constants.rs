//! Central place for console-wide constants and default values.

/// Default application name used in banners and logs
pub const DEFAULT_APP_NAME: &str = "nodeconsole";

/// Left padding used to align log lines with those that include emoji prefixes.
pub const ICON_PLACEHOLDER: &str = "   "; // Three spaces for alignment

/// Number of leading checksum-address characters shown in the prompt
pub const SHORT_ID_LEN: usize = 9;

/// Literal separating the short node id from operator input
pub const PROMPT_SUFFIX: &str = " >>> ";

/// Accepted command lines retained per session
pub const HISTORY_CAPACITY: usize = 10;

/// Default TCP port for the console listener
pub const DEFAULT_CONSOLE_PORT: u16 = 9151;

/// Default bind address; loopback only since the channel is unauthenticated
pub const DEFAULT_CONSOLE_BIND: &str = "127.0.0.1";

/// Longest frame accepted before the connection is dropped
pub const DEFAULT_MAX_LINE_LENGTH: usize = 16384;

/// Hint printed after the banner
pub const HELP_HINT: &str = "Type 'help' or '?' for help";

/// Application / crate version (populated from Cargo.toml via env! macro)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Platform newline sequence, the default frame delimiter.
#[cfg(windows)]
pub const PLATFORM_NEWLINE: &str = "\r\n";
#[cfg(not(windows))]
pub const PLATFORM_NEWLINE: &str = "\n";

/// Human friendly version string used in banners / logs.
pub fn full_version() -> String {
    format!("v{}", APP_VERSION)
}
