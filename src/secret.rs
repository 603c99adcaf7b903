use std::path::Path;

use serde::Deserialize;

use crate::error::{CalKeepError, CalKeepResult};

/// Client-secret JSON as exported for an "installed application" from the
/// Google Cloud console credentials page. Only the fields the client needs
/// are kept; the endpoint URLs in the export are owned by the client library.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub installed: InstalledSecret,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstalledSecret {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientSecret {
    pub fn load(path: &Path) -> CalKeepResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CalKeepError::Config(format!(
                "Failed to read client secret at {}: {}",
                path.display(),
                e
            ))
        })?;

        let secret: ClientSecret = serde_json::from_str(&contents).map_err(|e| {
            CalKeepError::Config(format!(
                "Failed to parse client secret at {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "installed": {
            "client_id": "abc.apps.googleusercontent.com",
            "client_secret": "s3cret",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "token_uri": "https://oauth2.googleapis.com/token",
            "redirect_uris": ["urn:ietf:wg:oauth:2.0:oob", "http://localhost"]
        }
    }"#;

    #[test]
    fn parses_installed_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client_secret.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let secret = ClientSecret::load(&path).unwrap();

        assert_eq!(secret.installed.client_id, "abc.apps.googleusercontent.com");
        assert_eq!(secret.installed.client_secret, "s3cret");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientSecret::load(&dir.path().join("nope.json")).unwrap_err();

        assert!(matches!(err, CalKeepError::Config(_)));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client_secret.json");
        std::fs::write(&path, "{\"web\": {}}").unwrap();

        let err = ClientSecret::load(&path).unwrap_err();
        assert!(matches!(err, CalKeepError::Config(_)));
    }
}
