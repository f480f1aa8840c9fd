//! Database Hot Reload
//!
//! Watches the geo database file and reloads the filter when it changes,
//! so a refreshed database goes live without a restart.

use crate::application::GeoFilter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;

/// Polls the database file modification time and reloads on change.
pub struct DatabaseWatcher {
    filter: Arc<GeoFilter>,
    path: PathBuf,
    /// Modification time of the file that was last loaded successfully
    last_mtime: Mutex<Option<SystemTime>>,
    poll_interval: Duration,
}

impl DatabaseWatcher {
    /// Create a watcher for the file the filter was loaded from.
    ///
    /// The current modification time is recorded right away so the first
    /// poll does not reload a file that is already in service.
    pub fn new(filter: Arc<GeoFilter>, path: impl AsRef<Path>, poll_interval: Duration) -> Self {
        let path = path.as_ref().to_path_buf();
        let last_mtime = modified(&path);

        Self {
            filter,
            path,
            last_mtime: Mutex::new(last_mtime),
            poll_interval,
        }
    }

    /// Check the file once; reload the filter if it changed.
    ///
    /// Returns true when a new database was installed. A failed reload is
    /// logged and the previous database stays in service; the old
    /// modification time is kept so the next poll tries again.
    pub async fn check(&self) -> bool {
        let Some(mtime) = modified(&self.path) else {
            return false;
        };

        let mut last_mtime = self.last_mtime.lock().await;
        if *last_mtime == Some(mtime) {
            return false;
        }

        tracing::info!(path = ?self.path, "database file modified");

        match self.filter.reload(&self.path) {
            Ok(()) => {
                *last_mtime = Some(mtime);
                true
            }
            Err(e) => {
                tracing::warn!("keeping the previous database: {}", e);
                false
            }
        }
    }

    /// Start the watcher loop.
    ///
    /// This spawns a background task that periodically checks the file.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.poll_interval);

            loop {
                interval.tick().await;
                self.check().await;
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
