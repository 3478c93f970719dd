// Configuration management with layered configuration (defaults, file, env)

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Main settings structure containing all configuration options
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub console: ConsoleConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Root URL of the platform server; the REST API and the embedded
    /// sub-tools are resolved relative to it, so it must end with a slash.
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Directory holding the session-scoped key/value store.
    pub session_dir: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            session_dir: ".console-session".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl Settings {
    /// Load configuration with layered precedence: defaults → file → env
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default configuration
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add local configuration (not committed to git)
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // Add environment-specific configuration
            .add_source(
                Environment::with_prefix("CONSOLE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        let base = Url::parse(&self.server.base_url)
            .map_err(|e| format!("Invalid server base URL '{}': {}", self.server.base_url, e))?;
        if base.cannot_be_a_base() || !base.path().ends_with('/') {
            return Err(format!(
                "Server base URL '{}' must be an absolute URL ending with '/'",
                self.server.base_url
            ));
        }

        if self.server.timeout_seconds == 0 {
            return Err("Server timeout must be greater than 0".to_string());
        }

        if self.console.session_dir.is_empty() {
            return Err("Session directory must not be empty".to_string());
        }

        if self.observability.log_level.is_empty() {
            return Err("Log level must not be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.server.base_url, "http://localhost:8080/");
        assert_eq!(settings.server.timeout_seconds, 30);
        assert_eq!(settings.observability.log_level, "info");
    }

    #[test]
    fn load_without_files_uses_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let settings = Settings::load_from_path(dir.path()).expect("Failed to load settings");
        assert_eq!(settings.console.session_dir, ".console-session");
    }

    #[test]
    fn load_reads_file_overrides() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::write(
            dir.path().join("default.toml"),
            "[server]\nbase_url = \"https://frank.example.org/\"\ntimeout_seconds = 5\n",
        )
        .expect("Failed to write config file");

        let settings = Settings::load_from_path(dir.path()).expect("Failed to load settings");
        assert_eq!(settings.server.base_url, "https://frank.example.org/");
        assert_eq!(settings.server.timeout_seconds, 5);
        // Untouched sections keep their defaults
        assert_eq!(settings.observability.log_level, "info");
    }

    #[test]
    fn validate_rejects_relative_base_url() {
        let mut settings = Settings::default();
        settings.server.base_url = "not-a-url".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_base_url_without_trailing_slash() {
        let mut settings = Settings::default();
        settings.server.base_url = "http://localhost:8080/console".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut settings = Settings::default();
        settings.server.timeout_seconds = 0;
        assert!(settings.validate().is_err());
    }
}
