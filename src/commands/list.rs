use anyhow::Result;
use chrono::Utc;

use crate::auth::{self, CodeProvider};
use crate::config::Config;
use crate::events;

/// List the next events of a calendar (the account's primary one by default).
pub async fn run(
    config: &Config,
    codes: &dyn CodeProvider,
    calendar_id: &str,
    max: Option<i64>,
) -> Result<()> {
    let client = auth::authorize(config, codes).await?;
    let max = max.unwrap_or(config.list_max);

    let upcoming = events::list_upcoming(&client, calendar_id, max, Utc::now()).await?;

    println!("Upcoming events:");
    for line in events::render_upcoming(&upcoming) {
        println!("{line}");
    }

    Ok(())
}
