use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CalKeepResult;

/// Refresh when the access token is within this many seconds of expiring.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// OAuth2 credentials for one user, as persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scope: String,
}

impl StoredToken {
    /// Whether the access token should be refreshed before use.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::seconds(EXPIRY_LEEWAY_SECS) >= expires_at,
            // No recorded expiry: assume stale and let the refresh sort it out
            None => true,
        }
    }
}

/// Token storage: user id -> credentials, kept in a single JSON file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TokenStore {
    #[serde(default)]
    users: HashMap<String, StoredToken>,

    #[serde(skip)]
    path: PathBuf,
}

impl TokenStore {
    /// Load the store from disk, starting empty when the file doesn't exist.
    pub fn load(path: &Path) -> CalKeepResult<Self> {
        if !path.exists() {
            return Ok(Self {
                users: HashMap::new(),
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let mut store: TokenStore = serde_json::from_str(&contents)?;
        store.path = path.to_path_buf();
        Ok(store)
    }

    pub fn get(&self, user: &str) -> Option<&StoredToken> {
        self.users.get(user)
    }

    pub fn put(&mut self, user: &str, token: StoredToken) {
        self.users.insert(user.to_string(), token);
    }

    /// Write the store back to disk, creating parent directories as needed.
    pub fn save(&self) -> CalKeepResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(access: &str) -> StoredToken {
        StoredToken {
            access_token: access.to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Some(Utc::now() + Duration::hours(1)),
            scope: "https://www.googleapis.com/auth/calendar".to_string(),
        }
    }

    #[test]
    fn starts_empty_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::load(&dir.path().join("tokens.json")).unwrap();

        assert!(store.get("default").is_none());
    }

    #[test]
    fn round_trips_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        let mut store = TokenStore::load(&path).unwrap();
        store.put("default", token("a"));
        store.put("work", token("b"));
        store.save().unwrap();

        let reloaded = TokenStore::load(&path).unwrap();
        assert_eq!(reloaded.get("default").unwrap().access_token, "a");
        assert_eq!(reloaded.get("work").unwrap().access_token, "b");
        assert!(reloaded.get("other").is_none());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tokens.json");

        let mut store = TokenStore::load(&path).unwrap();
        store.put("default", token("a"));
        store.save().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn expiry_respects_leeway() {
        let now = Utc::now();
        let mut tok = token("a");

        tok.expires_at = Some(now + Duration::hours(1));
        assert!(!tok.is_expired(now));

        tok.expires_at = Some(now + Duration::seconds(30));
        assert!(tok.is_expired(now));

        tok.expires_at = Some(now - Duration::hours(1));
        assert!(tok.is_expired(now));

        tok.expires_at = None;
        assert!(tok.is_expired(now));
    }
}
