//! Core types and logic for the calfeed ecosystem.
//!
//! This crate implements everything the HTTP layer orchestrates:
//! - `event` — the canonical `Event` record and the persisted `UserRecord`
//! - `normalize` — canonicalization of loosely-typed event payloads
//! - `userid` — reversible mapping from user identifiers to storage keys
//! - `store` — durable per-user event storage with atomic replacement
//! - `ics` — deterministic iCalendar feed generation
//! - `service` — the sync/feed operations tying the above together

pub mod error;
pub mod event;
pub mod ics;
pub mod normalize;
pub mod service;
pub mod store;
pub mod userid;

pub use error::{CalFeedError, CalFeedResult};
pub use event::{Event, UserRecord};
pub use service::CalendarService;
pub use store::EventStore;
