//! Find-or-create for the dedicated calendar, with its identifier remembered
//! in a local file.

use std::path::Path;

use google_calendar::types::Calendar;
use google_calendar::Client;

use crate::config::Config;
use crate::error::{CalKeepError, CalKeepResult};

/// Outcome of resolving the dedicated calendar. Callers decide exit behavior;
/// in particular `Gone` must never lead to creating a replacement, so a
/// deleted calendar is surfaced to the operator instead of silently
/// fragmenting history under a new identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The cached identifier still names a live remote calendar
    Existing(String),
    /// No cached identifier existed; a calendar was created and persisted
    Created(String),
    /// The cached identifier no longer exists remotely
    Gone(String),
}

/// Resolve the dedicated calendar, idempotent across repeated invocations.
pub async fn resolve(client: &Client, config: &Config) -> CalKeepResult<Resolution> {
    if let Some(id) = read_cached_id(&config.calendar_id_path)? {
        tracing::debug!(%id, "verifying cached calendar id");

        return match client.calendars().get(&id).await {
            Ok(_) => Ok(Resolution::Existing(id)),
            Err(e) if is_not_found(&e.to_string()) => Ok(Resolution::Gone(id)),
            Err(e) => Err(CalKeepError::Api(format!(
                "Failed to look up calendar {}: {}",
                id, e
            ))),
        };
    }

    let calendar = dedicated_calendar(config);

    let created = client
        .calendars()
        .insert(&calendar)
        .await
        .map_err(|e| CalKeepError::Api(format!("Failed to create calendar: {}", e)))?;

    let id = created.body.id;
    write_cached_id(&config.calendar_id_path, &id)?;

    tracing::debug!(%id, "created dedicated calendar");

    Ok(Resolution::Created(id))
}

/// The calendar resource submitted on creation. `types::Calendar` has no
/// `Default` impl, so every field is spelled out; the API assigns the id.
fn dedicated_calendar(config: &Config) -> Calendar {
    Calendar {
        conference_properties: None,
        description: String::new(),
        etag: String::new(),
        id: String::new(),
        kind: String::new(),
        location: String::new(),
        summary: config.calendar_summary.clone(),
        time_zone: config.time_zone.clone(),
    }
}

/// Read the cached identifier, trimmed. An absent or empty file counts as
/// unresolved.
pub fn read_cached_id(path: &Path) -> CalKeepResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)?;
    let id = contents.trim();
    if id.is_empty() {
        return Ok(None);
    }

    Ok(Some(id.to_string()))
}

/// Persist the identifier as plain text, creating parent directories.
pub fn write_cached_id(path: &Path, id: &str) -> CalKeepResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, id)?;
    Ok(())
}

/// Classify a client error as "calendar does not exist remotely". The client
/// library surfaces HTTP failures as strings, so match on the status the way
/// the API reports missing calendars.
fn is_not_found(error: &str) -> bool {
    error.contains("404") || error.contains("Not Found") || error.contains("notFound")
}
