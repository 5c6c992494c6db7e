// Configuration module entry point
// Manages application configuration and the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{AppConfig, Config, HttpConfig};

/// Environment variable prefix, e.g. `MOVIES_SERVER__PORT=4000`
const ENV_PREFIX: &str = "MOVIES";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let defaults = AppConfig::default();
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.default_content_type", "text/html; charset=utf-8")?
            .set_default("http.server_name", "movie-list-server")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 102_400)? // 100kb
            .set_default("app.owner_name", defaults.owner_name)?
            .set_default("app.date_format", defaults.date_format)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
