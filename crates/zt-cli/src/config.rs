//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Country whose public holidays apply.
    pub country_code: String,

    /// Base URL of the holiday API.
    pub holiday_api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("zt.db"),
            country_code: "AT".to_string(),
            holiday_api_url: zt_holidays::DEFAULT_API_URL.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (ZT_*)
        figment = figment.merge(Env::prefixed("ZT_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for zt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("zt"))
}

/// Returns the platform-specific data directory for zt.
///
/// On Linux: `~/.local/share/zt`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("zt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_zt() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "zt");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("zt.db"));
        assert_eq!(config.country_code, "AT");
    }

    #[test]
    fn test_explicit_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "country_code = \"DE\"\ndatabase_path = \"/tmp/other.db\"\n")
            .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.country_code, "DE");
        assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.holiday_api_url, zt_holidays::DEFAULT_API_URL);
    }
}
