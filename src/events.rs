//! Listing upcoming events and building the event to register.

use chrono::{DateTime, Duration, Utc};
use google_calendar::types::{Event, EventDateTime, OrderBy, SendUpdates};
use google_calendar::Client;

use crate::error::{CalKeepError, CalKeepResult};

/// Fixed placeholder content for the registered event.
#[derive(Debug, Clone)]
pub struct EventSpec {
    pub summary: String,
    pub description: String,
    pub location: String,
}

impl Default for EventSpec {
    fn default() -> Self {
        Self {
            summary: "Summary".to_string(),
            description: "description".to_string(),
            location: "location".to_string(),
        }
    }
}

/// One upcoming event reduced to what the listing displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upcoming {
    pub summary: String,
    pub start: String,
}

/// Fetch the next `max` events of a calendar, ordered by start time,
/// recurring events expanded to single instances, starting from `now`.
pub async fn list_upcoming(
    client: &Client,
    calendar_id: &str,
    max: i64,
    now: DateTime<Utc>,
) -> CalKeepResult<Vec<Upcoming>> {
    let time_min = now.to_rfc3339();

    let response = client
        .events()
        .list(
            calendar_id,
            "",                 // i_cal_uid
            0,                  // max_attendees
            max,                // max_results
            OrderBy::StartTime, // order_by
            "",                 // page_token
            &[],                // private_extended_property
            "",                 // q (search query)
            &[],                // shared_extended_property
            false,              // show_deleted
            false,              // show_hidden_invitations
            true,               // single_events
            "",                 // time_max
            &time_min,          // time_min
            "",                 // time_zone
            "",                 // updated_min
        )
        .await
        .map_err(|e| CalKeepError::Api(format!("Failed to fetch events: {}", e)))?;

    Ok(response.body.into_iter().map(upcoming_from).collect())
}

fn upcoming_from(event: Event) -> Upcoming {
    let start = event
        .start
        .as_ref()
        .and_then(display_start)
        .unwrap_or_default();

    Upcoming {
        summary: event.summary,
        start,
    }
}

/// All-day events carry a date, timed events a date-time; prefer the date.
/// The client crate normalizes date-times to UTC, so render them back in the
/// event's own time zone to keep the offset the calendar reported.
fn display_start(start: &EventDateTime) -> Option<String> {
    if let Some(date) = start.date {
        return Some(date.to_string());
    }

    let dt = start.date_time?;
    match start.time_zone.parse::<chrono_tz::Tz>() {
        Ok(tz) => Some(dt.with_timezone(&tz).to_rfc3339()),
        Err(_) => Some(dt.to_rfc3339()),
    }
}

pub fn format_line(event: &Upcoming) -> String {
    format!("- {} ({})", event.summary, event.start)
}

/// Lines the listing prints: one per event, or the no-events notice.
pub fn render_upcoming(events: &[Upcoming]) -> Vec<String> {
    if events.is_empty() {
        return vec!["No upcoming events found".to_string()];
    }
    events.iter().map(format_line).collect()
}

/// Build the event to register: placeholder fields, spanning `start` to
/// `start` + 1 day, both ends tagged with the given time zone.
pub fn build_event(spec: &EventSpec, start: DateTime<Utc>, time_zone: &str) -> Event {
    let end = start + Duration::days(1);

    Event {
        summary: spec.summary.clone(),
        description: spec.description.clone(),
        location: spec.location.clone(),
        start: Some(EventDateTime {
            date: None,
            date_time: Some(start),
            time_zone: time_zone.to_string(),
        }),
        end: Some(EventDateTime {
            date: None,
            date_time: Some(end),
            time_zone: time_zone.to_string(),
        }),
        ..Default::default()
    }
}

/// Submit the event for creation; the response carries the assigned id.
pub async fn insert_event(
    client: &Client,
    calendar_id: &str,
    event: &Event,
) -> CalKeepResult<Event> {
    let response = client
        .events()
        .insert(
            calendar_id,
            0,                 // conference_data_version
            0,                 // max_attendees
            false,             // send_notifications
            SendUpdates::None, // send_updates
            false,             // supports_attachments
            event,
        )
        .await
        .map_err(|e| CalKeepError::Api(format!("Failed to insert event: {}", e)))?;

    Ok(response.body)
}
