//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variable` substitution

use chrono::{DateTime, Local};

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Parsed `logging.access_log_format` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Combined,
    Common,
    Json,
    Custom(String),
}

impl LogFormat {
    pub fn parse(format: &str) -> Self {
        match format {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            custom => Self::Custom(custom.to_string()),
        }
    }
}

/// One served request, as recorded in the access log
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Handler time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry stamped with the current time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Path plus query string
    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.request_uri(), self.http_version)
    }

    /// Render the entry in the given format
    pub fn format(&self, format: &LogFormat) -> String {
        match format {
            LogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.format_common(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            LogFormat::Common => self.format_common(),
            LogFormat::Json => self.format_json(),
            LogFormat::Custom(pattern) => self.format_custom(pattern),
        }
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables: `$remote_addr`, `$time_local`, `$time_iso8601`,
    /// `$request`, `$request_method`, `$request_uri`, `$request_time`
    /// (seconds, 3 decimals), `$status`, `$body_bytes_sent`,
    /// `$http_referer`, `$http_user_agent`.
    fn format_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // $request_* before $request, otherwise the shorter name eats the prefix
        let substitutions = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{request_time:.3}")),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.request_uri()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            (
                "$http_referer",
                self.referer.clone().unwrap_or_else(|| "-".to_string()),
            ),
            (
                "$http_user_agent",
                self.user_agent.clone().unwrap_or_else(|| "-".to_string()),
            ),
        ];

        substitutions
            .iter()
            .fold(pattern.to_string(), |acc, (var, value)| acc.replace(*var, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1".to_string(),
            "GET".to_string(),
            "/save-user-info".to_string(),
        );
        entry.query = Some("firstName=Timmy".to_string());
        entry.status = 200;
        entry.body_bytes = 31;
        entry.referer = Some("https://example.com".to_string());
        entry.user_agent = Some("curl/8.0".to_string());
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(LogFormat::parse("combined"), LogFormat::Combined);
        assert_eq!(LogFormat::parse("common"), LogFormat::Common);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(
            LogFormat::parse("$status"),
            LogFormat::Custom("$status".to_string())
        );
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format(&LogFormat::Combined);
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"GET /save-user-info?firstName=Timmy HTTP/1.1\" 200 31"));
        assert!(log.ends_with("\"https://example.com\" \"curl/8.0\""));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format(&LogFormat::Common);
        assert!(log.contains("\"GET /save-user-info?firstName=Timmy HTTP/1.1\" 200 31"));
        // Common format does not include referer/user-agent
        assert!(!log.contains("https://example.com"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format(&LogFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "192.168.1.1");
        assert_eq!(value["query"], "firstName=Timmy");
        assert_eq!(value["status"], 200);
        assert_eq!(value["body_bytes"], 31);
    }

    #[test]
    fn test_format_json_missing_fields_are_null() {
        let entry = AccessLogEntry::new(
            "127.0.0.1".to_string(),
            "GET".to_string(),
            "/all-movies".to_string(),
        );
        let value: serde_json::Value =
            serde_json::from_str(&entry.format(&LogFormat::Json)).unwrap();
        assert!(value["query"].is_null());
        assert!(value["user_agent"].is_null());
    }

    #[test]
    fn test_format_custom() {
        let entry = create_test_entry();
        let log = entry.format(&LogFormat::Custom(
            "$request_method $request_uri $status $request_time $http_user_agent".to_string(),
        ));
        // 1500us = 0.0015s, formatted with 3 decimal places
        assert!(
            log.starts_with("GET /save-user-info?firstName=Timmy 200 0.00"),
            "unexpected custom output: {log}"
        );
        assert!(log.ends_with("curl/8.0"));
    }
}
