use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use calfeed_core::{CalendarService, EventStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CalendarService>,
}

impl AppState {
    pub fn new(data_dir: &Path) -> Result<Self> {
        let store = EventStore::new(data_dir)?;

        Ok(AppState {
            service: Arc::new(CalendarService::new(store)),
        })
    }
}
