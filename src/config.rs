//! Configuration module for LearnSync.

use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

use crate::{LearnSyncError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timezone for human-readable chat timestamps (e.g., "Asia/Shanghai", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_timezone() -> String {
    "Asia/Shanghai".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timezone: default_timezone(),
        }
    }
}

impl ServerConfig {
    /// Resolve the listening socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                LearnSyncError::Config(format!(
                    "invalid listen address {}:{}: {e}",
                    self.host, self.port
                ))
            })
    }
}

/// Upper bound for `chat.channel_capacity`.
pub const MAX_CHANNEL_CAPACITY: usize = 65_536;

/// Chat room configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Display name used when a client joins without a username.
    #[serde(default = "default_anonymous_name")]
    pub anonymous_name: String,
    /// Sender label for system notices.
    #[serde(default = "default_system_sender")]
    pub system_sender: String,
    /// Maximum number of retained chat events (0 = unbounded).
    #[serde(default)]
    pub history_limit: usize,
    /// Capacity of the broadcast channel shared by all connections.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// strftime format for event and join times.
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

fn default_anonymous_name() -> String {
    "匿名用户".to_string()
}

fn default_system_sender() -> String {
    "系统".to_string()
}

fn default_channel_capacity() -> usize {
    256
}

fn default_time_format() -> String {
    "%H:%M:%S".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            anonymous_name: default_anonymous_name(),
            system_sender: default_system_sender(),
            history_limit: 0,
            channel_capacity: default_channel_capacity(),
            time_format: default_time_format(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file (empty for console only).
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/learnsync.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins (empty allows any origin).
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve static files.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_static_path() -> String {
    "public".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![],
            serve_static: false,
            static_path: default_static_path(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Chat configuration.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LearnSyncError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| LearnSyncError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: Override the listening port
    /// - `LEARNSYNC_LOG_LEVEL`: Override the log level
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => eprintln!("Ignoring invalid PORT value: {port}"),
            }
        }

        if let Some(level) = lookup("LEARNSYNC_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(LearnSyncError::Validation(
                "server.host must not be empty".to_string(),
            ));
        }
        if !crate::datetime::is_valid_timezone(&self.server.timezone) {
            return Err(LearnSyncError::Validation(format!(
                "unknown timezone: {}",
                self.server.timezone
            )));
        }
        if self.chat.channel_capacity == 0 {
            return Err(LearnSyncError::Validation(
                "chat.channel_capacity must be greater than zero".to_string(),
            ));
        }
        if self.chat.channel_capacity > MAX_CHANNEL_CAPACITY {
            return Err(LearnSyncError::Validation(format!(
                "chat.channel_capacity must be at most {MAX_CHANNEL_CAPACITY}"
            )));
        }
        if StrftimeItems::new(&self.chat.time_format).any(|item| item == Item::Error) {
            return Err(LearnSyncError::Validation(format!(
                "invalid chat.time_format: {}",
                self.chat.time_format
            )));
        }
        if self.chat.anonymous_name.trim().is_empty() {
            return Err(LearnSyncError::Validation(
                "chat.anonymous_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.timezone, "Asia/Shanghai");

        assert_eq!(config.chat.anonymous_name, "匿名用户");
        assert_eq!(config.chat.system_sender, "系统");
        assert_eq!(config.chat.history_limit, 0);
        assert_eq!(config.chat.channel_capacity, 256);
        assert_eq!(config.chat.time_format, "%H:%M:%S");

        assert!(config.web.cors_origins.is_empty());
        assert!(!config.web.serve_static);
        assert_eq!(config.web.static_path, "public");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/learnsync.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080
timezone = "UTC"

[chat]
anonymous_name = "anonymous"
system_sender = "system"
history_limit = 500
channel_capacity = 64
time_format = "%H:%M"

[web]
cors_origins = ["http://localhost:5173"]
serve_static = true
static_path = "client/dist"

[logging]
level = "debug"
file = ""
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.timezone, "UTC");

        assert_eq!(config.chat.anonymous_name, "anonymous");
        assert_eq!(config.chat.system_sender, "system");
        assert_eq!(config.chat.history_limit, 500);
        assert_eq!(config.chat.channel_capacity, 64);
        assert_eq!(config.chat.time_format, "%H:%M");

        assert_eq!(config.web.cors_origins, vec!["http://localhost:5173"]);
        assert!(config.web.serve_static);
        assert_eq!(config.web.static_path, "client/dist");

        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.file.is_empty());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 4000

[chat]
history_limit = 10
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.chat.history_limit, 10);

        // Defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.chat.anonymous_name, "匿名用户");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.chat.channel_capacity, 256);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(LearnSyncError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(LearnSyncError::Io(_))));
    }

    #[test]
    fn test_overrides_port_and_level() {
        let env: HashMap<&str, &str> =
            HashMap::from([("PORT", "5050"), ("LEARNSYNC_LOG_LEVEL", "debug")]);

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 5050);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_overrides_ignore_invalid_port() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_overrides_ignore_empty_level() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "LEARNSYNC_LOG_LEVEL").then(String::new));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_socket_addr() {
        let mut config = ServerConfig::default();
        config.host = "127.0.0.1".to_string();
        config.port = 3001;
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3001");

        config.host = "not a host".to_string();
        assert!(matches!(
            config.socket_addr(),
            Err(LearnSyncError::Config(_))
        ));
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_capacity() {
        let mut config = Config::default();
        config.chat.channel_capacity = 0;

        let result = config.validate();
        if let Err(LearnSyncError::Validation(msg)) = result {
            assert!(msg.contains("channel_capacity"));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_validate_capacity_upper_bound() {
        let mut config = Config::default();
        config.chat.channel_capacity = MAX_CHANNEL_CAPACITY;
        assert!(config.validate().is_ok());

        config.chat.channel_capacity = MAX_CHANNEL_CAPACITY + 1;
        match config.validate() {
            Err(LearnSyncError::Validation(msg)) => assert!(msg.contains("at most 65536")),
            other => panic!("Expected Validation error, got {other:?}"),
        }

        config.chat.channel_capacity = usize::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_blank_anonymous_name() {
        let mut config = Config::default();
        config.chat.anonymous_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_unknown_timezone() {
        let mut config = Config::default();
        config.server.timezone = "Nowhere/Special".to_string();

        let result = config.validate();
        if let Err(LearnSyncError::Validation(msg)) = result {
            assert!(msg.contains("Nowhere/Special"));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_validate_bad_time_format() {
        let mut config = Config::default();
        config.chat.time_format = "%H:%M %".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_host() {
        let mut config = Config::default();
        config.server.host = String::new();
        assert!(config.validate().is_err());
    }
}
