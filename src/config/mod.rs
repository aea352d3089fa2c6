//! Application configuration.
//!
//! Settings are layered: built-in defaults, then an optional `config.toml`, then
//! environment variables (usually loaded from `.env` by `dotenvy`).

/// Database configuration and connection management
pub mod database;

/// Seed hierarchy loading from seed.toml
pub mod seed;

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `SeaORM` connection URL
    pub database_url: String,
    /// HTTP listener settings
    pub server: ServerConfig,
    /// Token signing settings
    pub auth: AuthSettings,
    /// Path of the TOML hierarchy used by the `seed` command
    pub seed_file: PathBuf,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Whether to install a permissive CORS layer
    pub enable_cors: bool,
}

/// Token signing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// HS256 secret; required to serve, unused by the admin commands
    pub jwt_secret: Option<String>,
    /// Lifetime of issued access tokens in seconds
    pub token_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: database::DEFAULT_DATABASE_URL.to_string(),
            server: ServerConfig::default(),
            auth: AuthSettings::default(),
            seed_file: PathBuf::from(seed::DEFAULT_SEED_FILE),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            enable_cors: true,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: 3600,
        }
    }
}

impl AppConfig {
    /// Overrides file values with any of `DATABASE_URL`, `SERVER_HOST`, `SERVER_PORT`,
    /// `ENABLE_CORS`, `JWT_SECRET_KEY`, `TOKEN_TTL_SECS` and `SEED_FILE` that `lookup`
    /// resolves.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port.parse().map_err(|e| Error::Config {
                message: format!("Invalid SERVER_PORT '{port}': {e}"),
            })?;
        }
        if let Some(cors) = lookup("ENABLE_CORS") {
            self.server.enable_cors = matches!(cors.to_lowercase().as_str(), "true" | "1");
        }
        if let Some(secret) = lookup("JWT_SECRET_KEY") {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(ttl) = lookup("TOKEN_TTL_SECS") {
            self.auth.token_ttl_secs = ttl.parse().map_err(|e| Error::Config {
                message: format!("Invalid TOKEN_TTL_SECS '{ttl}': {e}"),
            })?;
        }
        if let Some(path) = lookup("SEED_FILE") {
            self.seed_file = PathBuf::from(path);
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file {}: {e}", path_ref.display()),
    })
}

/// Builds the runtime configuration: `config.toml` (or the file named by `CONFIG_FILE`)
/// when present, defaults otherwise, then environment overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        tracing::info!("No config file at {path}, using defaults");
        AppConfig::default()
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
            database_url = "sqlite://test.sqlite"

            [server]
            port = 8080
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database_url, "sqlite://test.sqlite");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.server.enable_cors);
        assert_eq!(config.auth.token_ttl_secs, 3600);
        assert!(config.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_env_overrides_take_precedence() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("SERVER_PORT", "9000"),
            ("JWT_SECRET_KEY", "from-env"),
            ("ENABLE_CORS", "false"),
        ]);

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("from-env"));
        assert!(!config.server.enable_cors);
        assert_eq!(config.database_url, database::DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| (key == "SERVER_PORT").then(|| "abc".to_string()));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
