//! Configuration management for eventdesk.
//!
//! Loads configuration from ${EVENTDESK_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Merges user config values into the default template.
///
/// New comments/sections from the template are always present,
/// while the user's customized values are preserved.
fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;

    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for eventdesk configuration and data files.
    //!
    //! EVENTDESK_HOME resolution order:
    //! 1. EVENTDESK_HOME environment variable (if set and non-empty)
    //! 2. ~/.config/eventdesk (default)
    //!
    //! Every accessor returns `None` when no home can be determined, so callers
    //! can degrade (e.g. the session store reports "no token") instead of panicking.

    use std::path::PathBuf;

    /// Environment variable that overrides the home directory.
    pub const HOME_ENV: &str = "EVENTDESK_HOME";

    /// Returns the eventdesk home directory.
    pub fn eventdesk_home() -> Option<PathBuf> {
        if let Ok(home) = std::env::var(HOME_ENV)
            && !home.trim().is_empty()
        {
            return Some(PathBuf::from(home));
        }

        dirs::home_dir().map(|h| h.join(".config").join("eventdesk"))
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> Option<PathBuf> {
        eventdesk_home().map(|home| home.join("config.toml"))
    }

    /// Returns the path to the single-slot session file.
    pub fn session_path() -> Option<PathBuf> {
        eventdesk_home().map(|home| home.join("session.json"))
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> Option<PathBuf> {
        eventdesk_home().map(|home| home.join("logs"))
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the admin API (no default, must be supplied)
    pub api_url: Option<String>,

    /// Page size sent with quiz list requests
    pub page_size: Option<u32>,

    /// Per-request timeout in seconds (0 disables)
    pub request_timeout_secs: u32,

    /// Email prefilled on the login screen
    pub login_email: Option<String>,
}

impl Config {
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 30;

    /// Loads configuration from the default config path.
    ///
    /// Returns defaults when no home directory can be determined.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        match paths::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the configured API base URL if set and non-empty.
    pub fn effective_api_url(&self) -> Option<&str> {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns the effective login email prefill if set and non-empty.
    pub fn effective_login_email(&self) -> Option<&str> {
        self.login_email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Applies a command-line/env override for the API base URL.
    ///
    /// Blank overrides are ignored so an empty env var does not mask the config value.
    pub fn apply_api_url_override(&mut self, api_url: Option<&str>) {
        if let Some(url) = api_url.map(str::trim).filter(|s| !s.is_empty()) {
            self.api_url = Some(url.to_string());
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Saves only the `api_url` field to a specific config file path.
    ///
    /// Creates the file with the default template if it doesn't exist.
    /// If the file exists, merges user values into the latest template.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the file cannot be written.
    pub fn save_api_url_to(path: &Path, api_url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let trimmed = api_url.trim();
        url::Url::parse(trimmed).with_context(|| format!("Invalid API base URL: {trimmed}"))?;

        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["api_url"] = value(trimmed);

        Self::write_config(path, &doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            page_size: None,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            login_email: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.effective_api_url(), None);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "api_url = \"https://api.test/\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.effective_api_url(), Some("https://api.test/"));
        assert_eq!(config.page_size, None);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_load_invalid_toml_is_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "api_url = [unterminated").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_blank_api_url_is_none() {
        let config = Config {
            api_url: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.effective_api_url(), None);
    }

    #[test]
    fn test_override_wins_over_config() {
        let mut config = Config {
            api_url: Some("https://from-config.test".to_string()),
            ..Default::default()
        };
        config.apply_api_url_override(Some("https://from-flag.test"));
        assert_eq!(config.effective_api_url(), Some("https://from-flag.test"));
    }

    #[test]
    fn test_blank_override_keeps_config() {
        let mut config = Config {
            api_url: Some("https://from-config.test".to_string()),
            ..Default::default()
        };
        config.apply_api_url_override(Some(""));
        config.apply_api_url_override(None);
        assert_eq!(config.effective_api_url(), Some("https://from-config.test"));
    }

    #[test]
    fn test_request_timeout_zero_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_init_creates_config_with_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# api_url ="));
        assert!(contents.contains("request_timeout_secs = 30"));
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_save_api_url_creates_file_with_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        Config::save_api_url_to(&config_path, "https://api.test").unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("request_timeout_secs"));
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.effective_api_url(), Some("https://api.test"));
    }

    #[test]
    fn test_save_api_url_preserves_other_fields() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "page_size = 50\nlogin_email = \"root@test.com\"\n",
        )
        .unwrap();

        Config::save_api_url_to(&config_path, "https://api.test").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.effective_api_url(), Some("https://api.test"));
        assert_eq!(config.page_size, Some(50));
        assert_eq!(config.effective_login_email(), Some("root@test.com"));
    }

    #[test]
    fn test_save_api_url_rejects_invalid_url() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        assert!(Config::save_api_url_to(&config_path, "not a url").is_err());
        assert!(!config_path.exists());
    }
}
