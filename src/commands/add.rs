use anyhow::Result;
use chrono::Utc;
use google_calendar::Client;

use crate::auth::{self, CodeProvider};
use crate::calendar::{self, Resolution};
use crate::config::Config;
use crate::error::CalKeepError;
use crate::events::{self, EventSpec};

/// Resolve the dedicated calendar and register the event into it.
pub async fn run(config: &Config, codes: &dyn CodeProvider) -> Result<()> {
    let client = auth::authorize(config, codes).await?;
    insert_into_resolved(&client, config).await
}

/// Shared by `add` and `run`: find or create the dedicated calendar, then
/// insert the event. A cached identifier whose calendar is gone remotely is
/// fatal; no replacement calendar is created.
pub(crate) async fn insert_into_resolved(client: &Client, config: &Config) -> Result<()> {
    let calendar_id = match calendar::resolve(client, config).await? {
        Resolution::Existing(id) => id,
        Resolution::Created(id) => {
            println!("Created calendar '{}' ({})", config.calendar_summary, id);
            id
        }
        Resolution::Gone(id) => {
            println!("calendar was deleted.");
            return Err(CalKeepError::CalendarGone(id).into());
        }
    };

    let event = events::build_event(&EventSpec::default(), Utc::now(), &config.time_zone);
    let created = events::insert_event(client, &calendar_id, &event).await?;

    println!("Registered event '{}' ({})", created.summary, created.id);

    Ok(())
}
