use anyhow::Result;
use chrono::Utc;

use crate::auth::{self, CodeProvider};
use crate::commands::add;
use crate::config::Config;
use crate::events;

/// The single-shot flow: authorize, list the primary calendar's upcoming
/// events, then register the event into the dedicated calendar.
pub async fn run(config: &Config, codes: &dyn CodeProvider) -> Result<()> {
    let client = auth::authorize(config, codes).await?;

    let upcoming = events::list_upcoming(&client, "primary", config.list_max, Utc::now()).await?;

    println!("Upcoming events:");
    for line in events::render_upcoming(&upcoming) {
        println!("{line}");
    }

    add::insert_into_resolved(&client, config).await
}
