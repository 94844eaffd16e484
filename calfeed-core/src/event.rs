//! Canonical event types.
//!
//! An [`Event`] is the normalized form of whatever a client pushed through
//! the sync endpoint. By the time one of these exists, `start` is guaranteed
//! present; everything else has been defaulted. `end >= start` is NOT
//! enforced anywhere: callers that send an end before the start get it
//! stored and served back as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single scheduled item in a user's collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique within one user's collection; generated when the client
    /// didn't supply one.
    pub id: String,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub start: DateTime<Utc>,
    /// Falls back to `start` during normalization (zero-duration event).
    pub end: DateTime<Utc>,
    /// Stamp-of-record for the feed's DTSTAMP line, not display data.
    pub created: DateTime<Utc>,
}

/// The persisted per-user record.
///
/// Insertion order from the last sync is preserved; there is no implied
/// chronological sort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub identifier: String,
    pub events: Vec<Event>,
    pub last_updated: DateTime<Utc>,
}
