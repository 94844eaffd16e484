//! Durable per-user event storage.
//!
//! One JSON file per storage key under the data directory. Writes go to a
//! temp file first and are renamed into place, so a concurrent reader sees
//! either the old complete record or the new one, never a partial write.
//! Writers for the same key are serialized by a per-key mutex; different
//! keys don't contend.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{debug, info};

use crate::error::CalFeedResult;
use crate::event::{Event, UserRecord};
use crate::userid::decode_identifier;

pub struct EventStore {
    data_dir: PathBuf,
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EventStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> CalFeedResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;

        Ok(EventStore {
            data_dir,
            write_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Replace the entire event collection for a user.
    ///
    /// Stamps `last_updated` with the current time. On failure the
    /// previously persisted record is untouched.
    pub fn replace(&self, key: &str, identifier: &str, events: Vec<Event>) -> CalFeedResult<()> {
        let lock = self.write_lock_for(key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let record = UserRecord {
            identifier: identifier.to_string(),
            events,
            last_updated: Utc::now(),
        };

        let path = self.record_path(key);
        let temp = path.with_extension("json.tmp");

        fs::write(&temp, serde_json::to_vec_pretty(&record)?)?;
        fs::rename(&temp, &path)?;

        info!("Replaced event collection for {key} ({} events)", record.events.len());
        Ok(())
    }

    /// Read the event collection for a user.
    ///
    /// A never-synced key yields an empty collection, indistinguishable
    /// from a user whose last sync was empty.
    pub fn read(&self, key: &str) -> CalFeedResult<Vec<Event>> {
        let path = self.record_path(key);

        if !path.exists() {
            debug!("No record on disk for {key}, returning empty collection");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let record: UserRecord = serde_json::from_str(&content)?;

        Ok(record.events)
    }

    /// Number of persisted user records (for the health endpoint).
    pub fn user_count(&self) -> usize {
        let Ok(entries) = fs::read_dir(&self.data_dir) else {
            return 0;
        };

        entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.path().extension().is_some_and(|ext| ext == "json")
            })
            .count()
    }

    fn record_path(&self, key: &str) -> PathBuf {
        // Keys come from the identifier codec, whose alphabet contains no
        // path separators. Anything else is flattened just in case.
        debug_assert!(decode_identifier(key).is_ok(), "non-codec storage key: {key}");
        let safe: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' || c == '.' { '_' } else { c })
            .collect();

        self.data_dir.join(format!("{safe}.json"))
    }

    fn write_lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        locks.entry(key.to_string()).or_default().clone()
    }
}
