//! Singleton pattern to ensure only one calfeed-server touches a data dir.
//!
//! The store's single-writer-per-key discipline is an in-process lock, so
//! two server instances sharing a data directory would break it. An
//! advisory file lock inside the data directory rules that out.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::File;
use std::path::Path;

/// A lock guard that releases the lock when dropped
pub struct LockGuard {
    _file: File,
}

/// Acquire an exclusive lock on the data directory, failing if another
/// instance already holds it.
pub fn acquire_lock(data_dir: &Path) -> Result<LockGuard> {
    let path = data_dir.join("server.lock");
    let file = File::create(&path).context("Failed to create lock file")?;

    file.try_lock_exclusive().map_err(|_| {
        anyhow::anyhow!(
            "Another calfeed-server instance is already using {}.\n\
            If you believe this is an error, remove: {}",
            data_dir.display(),
            path.display()
        )
    })?;

    Ok(LockGuard { _file: file })
}
