use anyhow::Result;

use crate::auth::{self, CodeProvider};
use crate::config::Config;

/// Run the authorization flow and persist the credentials, replacing cached
/// ones (useful after revoking access or switching accounts).
pub async fn run(config: &Config, codes: &dyn CodeProvider) -> Result<()> {
    auth::reauthorize(config, codes).await?;

    println!(
        "Authorization complete; credentials stored for '{}'.",
        config.user
    );

    Ok(())
}
