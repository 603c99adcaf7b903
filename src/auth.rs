//! Credential bootstrap: cached tokens when we have them, the out-of-band
//! consent flow when we don't.

use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};

use crate::config::{Config, OOB_REDIRECT_URI, SCOPES};
use crate::error::{CalKeepError, CalKeepResult};
use crate::secret::ClientSecret;
use crate::token_store::{StoredToken, TokenStore};

/// Source of the pasted authorization code during first-run authorization.
/// Tests inject a fixed value instead of reading a terminal.
pub trait CodeProvider {
    fn authorization_code(&self) -> CalKeepResult<String>;
}

/// Prompts on stdout and reads one line from standard input.
pub struct StdinCode;

impl CodeProvider for StdinCode {
    fn authorization_code(&self) -> CalKeepResult<String> {
        use std::io::Write;

        print!("Enter the authorization code: ");
        std::io::stdout().flush()?;

        let mut code = String::new();
        std::io::stdin().read_line(&mut code)?;
        Ok(code.trim().to_string())
    }
}

/// Obtain an authorized Google Calendar client for the configured user,
/// either from the token store or by walking the operator through the
/// out-of-band grant flow.
pub async fn authorize(config: &Config, codes: &dyn CodeProvider) -> CalKeepResult<Client> {
    let secret = ClientSecret::load(&config.client_secret_path)?;
    let mut store = TokenStore::load(&config.token_store_path)?;

    if let Some(token) = store.get(&config.user).cloned() {
        if !token.is_expired(Utc::now()) {
            return Ok(client_from(&secret, &token));
        }

        tracing::debug!(user = %config.user, "access token expired, refreshing");

        let client = client_from(&secret, &token);
        let response = client.refresh_access_token().await.map_err(|e| {
            CalKeepError::Authorization(format!("Failed to refresh access token: {}", e))
        })?;

        let refreshed = merge_refresh(&token, &response);
        store.put(&config.user, refreshed.clone());
        store.save()?;

        return Ok(client_from(&secret, &refreshed));
    }

    interactive(&secret, &mut store, config, codes).await
}

/// Run the grant flow unconditionally, replacing whatever the store holds.
/// `calkeep auth` uses this after access was revoked or the account changed.
pub async fn reauthorize(config: &Config, codes: &dyn CodeProvider) -> CalKeepResult<Client> {
    let secret = ClientSecret::load(&config.client_secret_path)?;
    let mut store = TokenStore::load(&config.token_store_path)?;
    interactive(&secret, &mut store, config, codes).await
}

/// First-run grant flow: show the consent URL, wait for the pasted code,
/// exchange it and persist the resulting credentials.
async fn interactive(
    secret: &ClientSecret,
    store: &mut TokenStore,
    config: &Config,
    codes: &dyn CodeProvider,
) -> CalKeepResult<Client> {
    let mut client = Client::new(
        secret.installed.client_id.clone(),
        secret.installed.client_secret.clone(),
        OOB_REDIRECT_URI.to_string(),
        String::new(),
        String::new(),
    );

    let scopes: Vec<String> = SCOPES.iter().map(|s| s.to_string()).collect();
    let auth_url = client.user_consent_url(&scopes);

    println!("\nOpen this URL in your browser and enter the resulting code after authorization:\n");
    println!("{}\n", auth_url);

    // Try to open the browser automatically
    if open::that(&auth_url).is_err() {
        println!("(Could not open browser automatically, please copy the URL above)");
    }

    let code = codes.authorization_code()?;

    let response = client.get_access_token(&code, "").await.map_err(|e| {
        CalKeepError::Authorization(format!("Failed to exchange authorization code: {}", e))
    })?;

    let token = StoredToken {
        access_token: response.access_token.clone(),
        refresh_token: response.refresh_token.clone(),
        expires_at: expires_at(response.expires_in),
        scope: response.scope.clone(),
    };

    store.put(&config.user, token.clone());
    store.save()?;

    tracing::debug!(user = %config.user, "stored new credentials");

    Ok(client_from(secret, &token))
}

fn client_from(secret: &ClientSecret, token: &StoredToken) -> Client {
    Client::new(
        secret.installed.client_id.clone(),
        secret.installed.client_secret.clone(),
        OOB_REDIRECT_URI.to_string(),
        token.access_token.clone(),
        token.refresh_token.clone(),
    )
}

fn expires_at(expires_in: i64) -> Option<DateTime<Utc>> {
    if expires_in > 0 {
        Some(Utc::now() + Duration::seconds(expires_in))
    } else {
        None
    }
}

/// Fold a refresh response into the stored credentials. Google omits the
/// refresh token and scope from refresh responses, so keep the old ones
/// when the response leaves them empty.
fn merge_refresh(previous: &StoredToken, response: &AccessToken) -> StoredToken {
    StoredToken {
        access_token: response.access_token.clone(),
        refresh_token: if response.refresh_token.is_empty() {
            previous.refresh_token.clone()
        } else {
            response.refresh_token.clone()
        },
        expires_at: expires_at(response.expires_in),
        scope: if response.scope.is_empty() {
            previous.scope.clone()
        } else {
            response.scope.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedCode(&'static str);

    impl CodeProvider for FixedCode {
        fn authorization_code(&self) -> CalKeepResult<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn code_provider_injection() {
        let codes = FixedCode("4/abcdef");
        assert_eq!(codes.authorization_code().unwrap(), "4/abcdef");
    }

    #[test]
    fn expires_at_handles_missing_lifetime() {
        assert!(expires_at(0).is_none());

        let at = expires_at(3600).unwrap();
        let delta = at - Utc::now();
        assert!(delta > Duration::minutes(59) && delta <= Duration::hours(1));
    }

    #[test]
    fn refresh_keeps_previous_refresh_token() {
        let previous = StoredToken {
            access_token: "old-access".to_string(),
            refresh_token: "long-lived".to_string(),
            expires_at: None,
            scope: "https://www.googleapis.com/auth/calendar".to_string(),
        };
        let response = AccessToken {
            access_token: "new-access".to_string(),
            expires_in: 3600,
            ..Default::default()
        };

        let merged = merge_refresh(&previous, &response);

        assert_eq!(merged.access_token, "new-access");
        assert_eq!(merged.refresh_token, "long-lived");
        assert_eq!(merged.scope, previous.scope);
        assert!(merged.expires_at.is_some());
    }
}
