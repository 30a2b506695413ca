use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for strophe.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. Environment variables (STROPHE_* prefix)
/// 2. Config file (~/.config/strophe/config.toml)
/// 3. Built-in defaults (lowest priority)
///
/// The CLI surface stays limited to the title/artist flags, so the
/// database path and provider token only come from here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Genius API access token (required for remote lyrics fetches;
    /// local-only lookups work without it).
    ///
    /// Can be set via:
    /// - ENV: STROPHE_GENIUS_TOKEN
    /// - Config: genius_token = "..."
    pub genius_token: Option<String>,

    /// Path to the SQLite database.
    ///
    /// Can be set via:
    /// - ENV: STROPHE_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/strophe/strophe.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            genius_token: None,
            database_path: default_db_path(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/strophe/config.toml
    /// Reads environment variables with STROPHE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("strophe");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }
}

/// Get the default database path.
///
/// Returns: ~/.local/share/strophe/strophe.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("strophe")
        .join("strophe.db")
}

/// Get the config file path.
///
/// Returns: ~/.config/strophe/config.toml (or platform equivalent)
fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("strophe")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.genius_token.is_none());
        assert!(config.database_path.ends_with("strophe/strophe.db"));
    }

    #[test]
    fn test_config_file_path_under_config_dir() {
        let path = config_file_path();
        assert!(path.ends_with("strophe/config.toml"));
    }
}
