use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{CalKeepError, CalKeepResult};

/// OAuth scope required for reading and writing calendars and events.
pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/calendar"];

/// Out-of-band redirect target: Google shows the authorization code in the
/// browser for the operator to copy instead of delivering it via callback.
pub const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Everything the components need, resolved once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the client-secret JSON exported from the Google Cloud console
    #[serde(default = "default_client_secret_path")]
    pub client_secret_path: PathBuf,

    /// Path to the persisted OAuth2 token store
    #[serde(default = "default_token_store_path")]
    pub token_store_path: PathBuf,

    /// Path to the file remembering the dedicated calendar's identifier
    #[serde(default = "default_calendar_id_path")]
    pub calendar_id_path: PathBuf,

    /// Token store key for this operator
    #[serde(default = "default_user")]
    pub user: String,

    /// Display name given to the dedicated calendar on creation
    #[serde(default = "default_calendar_summary")]
    pub calendar_summary: String,

    /// Time zone attached to the dedicated calendar and to inserted events
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// How many upcoming events to list
    #[serde(default = "default_list_max")]
    pub list_max: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_secret_path: default_client_secret_path(),
            token_store_path: default_token_store_path(),
            calendar_id_path: default_calendar_id_path(),
            user: default_user(),
            calendar_summary: default_calendar_summary(),
            time_zone: default_time_zone(),
            list_max: default_list_max(),
        }
    }
}

/// Get the config directory path (~/.config/calkeep)
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("calkeep")
}

/// Get the config file path (~/.config/calkeep/config.toml)
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

fn default_client_secret_path() -> PathBuf {
    config_dir().join("client_secret.json")
}

fn default_token_store_path() -> PathBuf {
    config_dir().join("tokens.json")
}

fn default_calendar_id_path() -> PathBuf {
    config_dir().join("calendar.id")
}

fn default_user() -> String {
    "default".to_string()
}

fn default_calendar_summary() -> String {
    "calkeep".to_string()
}

fn default_time_zone() -> String {
    "Japan".to_string()
}

fn default_list_max() -> i64 {
    10
}

impl Config {
    /// Load config from ~/.config/calkeep/config.toml, falling back to the
    /// defaults when no file exists.
    pub fn load() -> CalKeepResult<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &std::path::Path) -> CalKeepResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| {
            CalKeepError::Config(format!(
                "Failed to parse config file at {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.user, "default");
        assert_eq!(config.time_zone, "Japan");
        assert_eq!(config.list_max, 10);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "calendar_summary = \"raids\"").unwrap();
        writeln!(file, "calendar_id_path = \"/tmp/raids.id\"").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.calendar_summary, "raids");
        assert_eq!(config.calendar_id_path, PathBuf::from("/tmp/raids.id"));
        assert_eq!(config.time_zone, "Japan");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "list_max = \"ten\"").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
