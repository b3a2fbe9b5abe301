use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable that overrides `auth.jwt_private_key`
pub const JWT_KEY_ENV: &str = "STATBOARD_JWT_PRIVATE_KEY";
/// Environment variable that overrides `server.port`
pub const PORT_ENV: &str = "STATBOARD_PORT";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_private_key: String,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_spreadsheet")]
    pub spreadsheet: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub console: bool,
}

// The signing key must never end up in logs
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_private_key", &"<redacted>")
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_private_key: String::new(),
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            spreadsheet: default_spreadsheet(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: false,
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_spreadsheet() -> PathBuf {
    PathBuf::from("data.xlsx")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&content, |name| std::env::var(name).ok())
    }

    /// Parse and validate configuration text.
    ///
    /// `env` resolves override variables; tests pass a closure instead of touching the process env.
    pub fn from_toml_str<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Config = toml::from_str(content).context("Failed to parse config file")?;

        if let Some(key) = env(JWT_KEY_ENV).filter(|k| !k.is_empty()) {
            config.auth.jwt_private_key = key;
        }

        if let Some(port) = env(PORT_ENV) {
            config.server.port = port
                .parse()
                .context(format!("{} must be a valid port number", PORT_ENV))?;
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_private_key.is_empty() {
            bail!("FATAL ERROR: jwtPrivateKey is not defined.");
        }

        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            bail!(
                "bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            );
        }

        if self.server.port == 0 {
            bail!("Server port must be greater than 0");
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        if self.storage.data_dir.as_os_str().is_empty() {
            bail!("data_dir must not be empty");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [server]
        port = 3000

        [auth]
        jwt_private_key = "secret"
    "#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = Config::from_toml_str(MINIMAL, no_env).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert!(config.server.num_threads > 0);
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert_eq!(config.import.spreadsheet, PathBuf::from("data.xlsx"));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_missing_private_key_is_fatal() {
        let content = "[server]\nport = 3000\n";
        let err = Config::from_toml_str(content, no_env).unwrap_err();
        assert!(err.to_string().contains("jwtPrivateKey is not defined"));
    }

    #[test]
    fn test_empty_private_key_is_fatal() {
        let content = "[server]\nport = 3000\n[auth]\njwt_private_key = \"\"\n";
        assert!(Config::from_toml_str(content, no_env).is_err());
    }

    #[test]
    fn test_private_key_from_env() {
        let content = "[server]\nport = 3000\n";
        let config = Config::from_toml_str(content, |name| {
            (name == JWT_KEY_ENV).then(|| "from-env".to_string())
        })
        .unwrap();
        assert_eq!(config.auth.jwt_private_key, "from-env");
    }

    #[test]
    fn test_port_from_env() {
        let config = Config::from_toml_str(MINIMAL, |name| {
            (name == PORT_ENV).then(|| "8080".to_string())
        })
        .unwrap();
        assert_eq!(config.server.port, 8080);

        let bad = Config::from_toml_str(MINIMAL, |name| {
            (name == PORT_ENV).then(|| "not-a-port".to_string())
        });
        assert!(bad.is_err());
    }

    #[test]
    fn test_invalid_bcrypt_cost() {
        let content = "[server]\nport = 3000\n[auth]\njwt_private_key = \"k\"\nbcrypt_cost = 3\n";
        assert!(Config::from_toml_str(content, no_env).is_err());
    }

    #[test]
    fn test_invalid_log_format() {
        let content = format!("{}\n[logging]\nformat = \"xml\"\n", MINIMAL);
        assert!(Config::from_toml_str(&content, no_env).is_err());
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let config = Config::from_toml_str(MINIMAL, no_env).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
