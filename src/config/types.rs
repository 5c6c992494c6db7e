// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub app: AppConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Verbosity; `debug` and `trace` enable handler trace lines
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

impl LoggingConfig {
    /// Whether handler trace lines should be written
    pub fn debug_enabled(&self) -> bool {
        matches!(
            self.level.to_ascii_lowercase().as_str(),
            "debug" | "trace"
        )
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Content type of plain text responses
    pub default_content_type: String,
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Application content settings
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Name echoed by the root endpoint
    pub owner_name: String,
    /// `chrono` format string for the root endpoint's date
    pub date_format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            owner_name: "James Nissenbaum".to_string(),
            date_format: "%-m/%-d/%Y".to_string(),
        }
    }
}
