//! The sync/feed service.
//!
//! One stable contract in front of the normalizer, store and encoder,
//! regardless of how many process entry points call it. Error policy:
//! per-event problems are absorbed (skip and continue), store failures are
//! hard errors on the sync path only. The feed path never fails: calendar
//! pollers can't display errors, so a storage failure degrades to an empty
//! valid document and is logged for the operator instead.

use serde_json::Value;
use tracing::{error, info};

use crate::error::{CalFeedError, CalFeedResult};
use crate::ics::encode_calendar;
use crate::normalize::normalize_events;
use crate::store::EventStore;
use crate::userid::encode_identifier;

pub struct CalendarService {
    store: EventStore,
}

impl CalendarService {
    pub fn new(store: EventStore) -> Self {
        CalendarService { store }
    }

    /// Accept and store a batch of events for a user.
    ///
    /// Returns the number of events actually stored, which can be less than
    /// the input length when elements fail normalization.
    pub fn sync(&self, raw_identifier: &str, raw_events: &[Value]) -> CalFeedResult<usize> {
        if raw_identifier.is_empty() {
            return Err(CalFeedError::MissingIdentifier);
        }

        let events = normalize_events(raw_events);
        let stored = events.len();

        let key = encode_identifier(raw_identifier);
        self.store.replace(&key, raw_identifier, events)?;

        info!("Synced {stored} of {} events for user", raw_events.len());
        Ok(stored)
    }

    /// Produce the calendar document for a user.
    ///
    /// Always yields a well-formed document: unknown users get an empty
    /// container, and a storage failure is absorbed the same way.
    pub fn feed(&self, raw_identifier: &str) -> String {
        let key = encode_identifier(raw_identifier);

        let events = match self.store.read(&key) {
            Ok(events) => events,
            Err(err) => {
                error!("Feed read failed for {key}, serving empty calendar: {err}");
                Vec::new()
            }
        };

        encode_calendar(&events)
    }

    /// Number of users with a persisted record.
    pub fn user_count(&self) -> usize {
        self.store.user_count()
    }
}
