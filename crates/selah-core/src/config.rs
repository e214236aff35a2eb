//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/selah/config.toml)
//! 3. Environment variables (SELAH_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "SELAH";

/// Fixed relative path of the scripture snapshot on the backend
const SNAPSHOT_ROUTE: &str = "/data/bible.db";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for local data (cached scripture snapshot)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base URL of the backend API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            api_base_url: default_api_base_url(),
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (SELAH_DATA_DIR, SELAH_API_URL)
    /// 2. Config file (~/.config/selah/config.toml or SELAH_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // SELAH_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // SELAH_API_URL
        if let Ok(val) = std::env::var(format!("{}_API_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.api_base_url = val;
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with SELAH_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("selah")
            .join("config.toml")
    }

    /// Get the path of the locally cached scripture snapshot
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join("bible.db")
    }

    /// Get the full URL the scripture snapshot is downloaded from
    pub fn snapshot_url(&self) -> String {
        format!(
            "{}{}",
            self.api_base_url.trim_end_matches('/'),
            SNAPSHOT_ROUTE
        )
    }

    /// Build the full URL for an API route
    pub fn api_url(&self, route: &str) -> String {
        format!("{}{}", self.api_base_url.trim_end_matches('/'), route)
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("selah")
}

/// Get the default API base URL
fn default_api_base_url() -> String {
    "https://api.selah.app".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap();
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            // Clear all the vars
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &["SELAH_DATA_DIR", "SELAH_API_URL"];

    #[test]
    fn test_default_config() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::default();
        assert!(config.data_dir.ends_with("selah"));
        assert_eq!(config.api_base_url, "https://api.selah.app");
    }

    #[test]
    fn test_snapshot_paths() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::default();
        assert!(config.snapshot_path().ends_with("bible.db"));
        assert_eq!(
            config.snapshot_url(),
            "https://api.selah.app/data/bible.db"
        );
    }

    #[test]
    fn test_api_url_trailing_slash() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            api_base_url: "https://api.example.com/".to_string(),
            ..Config::default()
        };

        assert_eq!(
            config.api_url("/api/daily-verse"),
            "https://api.example.com/api/daily-verse"
        );
        assert_eq!(
            config.snapshot_url(),
            "https://api.example.com/data/bible.db"
        );
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("SELAH_DATA_DIR", "/tmp/selah-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/selah-test"));
    }

    #[test]
    fn test_env_override_api_url() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("SELAH_API_URL", "http://localhost:3000");
        config.apply_env_overrides();
        assert_eq!(config.api_base_url, "http://localhost:3000");

        // Empty string is ignored, keeps previous value
        env::set_var("SELAH_API_URL", "");
        config.apply_env_overrides();
        assert_eq!(config.api_base_url, "http://localhost:3000");
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/selah"),
            api_base_url: "https://api.example.com".to_string(),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("api_base_url"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.api_base_url, config.api_base_url);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            api_base_url = "http://localhost:8080"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.api_base_url, "http://localhost:8080");
    }

    #[test]
    fn test_load_from_str_partial() {
        let _guard = EnvGuard::new(ENV_VARS);

        // Missing keys fall back to defaults
        let config = Config::load_from_str("api_base_url = \"http://x.test\"").unwrap();
        assert_eq!(config.api_base_url, "http://x.test");
        assert!(config.data_dir.ends_with("selah"));
    }
}
