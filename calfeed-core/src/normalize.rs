//! Canonicalization of raw event payloads.
//!
//! Sync requests arrive as loosely-typed JSON objects with whatever field
//! names and formats the client produced. Normalization is a pure transform:
//! each element either becomes a well-formed [`Event`] or is dropped with a
//! warning. A bad element never fails the batch.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::event::Event;

const UNTITLED: &str = "Untitled Event";

/// Normalize a batch of raw events, dropping the ones that can't be made
/// well-formed. Order of the survivors matches the input.
pub fn normalize_events(raw_events: &[Value]) -> Vec<Event> {
    raw_events.iter().filter_map(normalize_event).collect()
}

/// Normalize a single raw event.
///
/// Returns `None` (with a logged warning) when the input is not an object or
/// its `start` is absent or unparseable; every other problem is repaired
/// with a default.
pub fn normalize_event(raw: &Value) -> Option<Event> {
    let Some(obj) = raw.as_object() else {
        warn!("Skipping non-object event payload");
        return None;
    };

    let summary = obj
        .get("summary")
        .and_then(Value::as_str)
        .or_else(|| obj.get("title").and_then(Value::as_str))
        .unwrap_or(UNTITLED)
        .to_string();

    let start = match obj.get("start").and_then(Value::as_str) {
        Some(value) => match parse_timestamp(value) {
            Some(dt) => dt,
            None => {
                warn!("Skipping event '{summary}' with unparseable start time: {value}");
                return None;
            }
        },
        None => {
            warn!("Skipping event without start time: {summary}");
            return None;
        }
    };

    // A missing or malformed end collapses to a zero-duration event.
    let end = obj
        .get("end")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .unwrap_or(start);

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    };

    let created = obj
        .get("created")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now);

    Some(Event {
        id,
        summary,
        description: string_field(obj, "description"),
        location: string_field(obj, "location"),
        start,
        end,
        created,
    })
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Parse an ISO-8601-like timestamp into UTC.
///
/// A trailing `Z` is rewritten to an explicit `+00:00` offset before
/// parsing; timestamps with no offset at all are taken as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let normalized = match value.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => value.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }

    // Offset-less timestamps like "2025-01-06T09:00:00"
    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
