// src/infrastructure/config.rs
use crate::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_ACCESS_TOKEN, ENV_TEAM_ID};
use crate::domain::SyncError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// TOML configuration for DocBase access
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub docbase: Settings,
}

#[derive(Clone, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            team_id: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Keep the token out of logs
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("access_token", &mask_token(&self.access_token))
            .field("team_id", &self.team_id)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Settings {
    /// Both credentials must be present before talking to DocBase
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.access_token.trim().is_empty() {
            return Err(SyncError::Config(
                "access token is not set (run `docbase-sync config set --token ...`)".to_string(),
            ));
        }
        if self.team_id.trim().is_empty() {
            return Err(SyncError::Config(
                "team id is not set (run `docbase-sync config set --team ...`)".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(SyncError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Apply non-empty environment overrides for the credentials
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(non_empty_env(ENV_ACCESS_TOKEN), non_empty_env(ENV_TEAM_ID))
    }

    /// Replace the credentials with the given values where present
    pub fn with_overrides(mut self, token: Option<String>, team: Option<String>) -> Self {
        if let Some(token) = token.filter(|v| !v.trim().is_empty()) {
            debug!("Using access token override");
            self.access_token = token;
        }
        if let Some(team) = team.filter(|v| !v.trim().is_empty()) {
            debug!(team = %team, "Using team id override");
            self.team_id = team;
        }
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Show only the last four characters of a token
pub fn mask_token(token: &str) -> String {
    let count = token.chars().count();
    if count == 0 {
        return "<unset>".to_string();
    }
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

/// Where settings are persisted
pub trait ConfigStore {
    fn load(&self) -> Result<Config, SyncError>;
    fn save(&self, config: &Config) -> Result<(), SyncError>;
}

/// Config store backed by a TOML file
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    path: PathBuf,
}

impl TomlConfigStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `<config_dir>/docbase-sync/config.toml`
    pub fn default_path() -> Result<PathBuf, SyncError> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SyncError::Config("Could not determine configuration directory".to_string())
        })?;
        Ok(dir.join("docbase-sync").join("config.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<Config, SyncError> {
        if !self.path.exists() {
            debug!(path = ?self.path, "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            SyncError::Config(format!(
                "Failed to parse config file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn save(&self, config: &Config) -> Result<(), SyncError> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| SyncError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_private(&self.path, toml_string.as_bytes())?;

        debug!(path = ?self.path, "Saved config");
        Ok(())
    }
}

/// The file holds the access token, so keep it readable by the owner only
#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies when the file is created
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn valid_settings() -> Settings {
        Settings {
            access_token: "secret-token".to_string(),
            team_id: "acme".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn given_no_file_when_loading_then_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlConfigStore::new(temp_dir.path().join("missing.toml"));

        let config = store.load().unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.docbase.base_url, "https://api.docbase.io");
        assert_eq!(config.docbase.timeout_secs, 30);
    }

    #[test]
    fn given_config_when_saving_then_writes_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");
        let store = TomlConfigStore::new(&config_path);

        store
            .save(&Config {
                docbase: valid_settings(),
            })
            .unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[docbase]"));
        assert!(content.contains("team_id = \"acme\""));
    }

    #[test]
    fn given_partial_toml_when_loading_then_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        fs::write(&config_path, "[docbase]\nteam_id = \"acme\"\n").unwrap();

        let config = TomlConfigStore::new(&config_path).load().unwrap();

        assert_eq!(config.docbase.team_id, "acme");
        assert_eq!(config.docbase.access_token, "");
        assert_eq!(config.docbase.timeout_secs, 30);
    }

    #[test]
    fn given_malformed_toml_when_loading_then_returns_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bad.toml");
        fs::write(&config_path, "[docbase\nteam_id = ").unwrap();

        let result = TomlConfigStore::new(&config_path).load();

        assert!(matches!(result, Err(SyncError::Config(_))));
    }

    #[test]
    fn given_round_trip_when_saving_and_loading_then_preserves_values() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlConfigStore::new(temp_dir.path().join("roundtrip.toml"));
        let original = Config {
            docbase: Settings {
                base_url: "http://localhost:1234".to_string(),
                timeout_secs: 5,
                ..valid_settings()
            },
        };

        store.save(&original).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn given_missing_token_when_validating_then_returns_config_error() {
        let settings = Settings {
            access_token: "  ".to_string(),
            ..valid_settings()
        };
        assert!(matches!(settings.validate(), Err(SyncError::Config(_))));
    }

    #[test]
    fn given_missing_team_when_validating_then_returns_config_error() {
        let settings = Settings {
            team_id: String::new(),
            ..valid_settings()
        };
        assert!(matches!(settings.validate(), Err(SyncError::Config(_))));
    }

    #[test]
    fn given_complete_settings_when_validating_then_succeeds() {
        assert!(valid_settings().validate().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn given_config_when_saving_then_file_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();
        fs::set_permissions(&config_path, fs::Permissions::from_mode(0o644)).unwrap();
        let store = TomlConfigStore::new(&config_path);

        store
            .save(&Config {
                docbase: valid_settings(),
            })
            .unwrap();

        let mode = fs::metadata(&config_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn given_new_config_file_when_saving_then_file_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("fresh").join("config.toml");

        TomlConfigStore::new(&config_path)
            .save(&Config::default())
            .unwrap();

        let mode = fs::metadata(&config_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn given_overrides_when_applying_then_replaces_only_non_empty_values() {
        let settings =
            valid_settings().with_overrides(Some("other-token".to_string()), Some(" ".to_string()));

        assert_eq!(settings.access_token, "other-token");
        assert_eq!(settings.team_id, "acme");
    }

    #[test]
    fn given_no_overrides_when_applying_then_keeps_settings() {
        let settings = valid_settings().with_overrides(None, None);

        assert_eq!(settings, valid_settings());
    }

    #[test]
    fn given_token_when_masking_then_shows_only_tail() {
        assert_eq!(mask_token("abcdefgh"), "****efgh");
        assert_eq!(mask_token("abc"), "***");
        assert_eq!(mask_token(""), "<unset>");
    }

    #[test]
    fn given_settings_when_debug_formatting_then_token_is_masked() {
        let rendered = format!("{:?}", valid_settings());
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("oken"));
    }
}
