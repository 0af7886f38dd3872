//! Progress and skip notifications emitted while enumerating files

use super::filter::SearchFilter;
use crate::fs::FileObject;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Receives traversal events. All methods default to doing nothing.
///
/// Listeners are called from whichever thread drives the iterator, so they
/// must be thread-safe; counters should be atomics.
pub trait SearchListener: Send + Sync {
    /// A folder (or archive root) is about to be listed
    fn directory_entered(&self, _path: &str) {}

    /// A file or folder was left out. `filter` is the filter that rejected it,
    /// if any; `reason` is a human readable explanation, if any.
    fn file_skipped(
        &self,
        _file: &FileObject,
        _filter: Option<&dyn SearchFilter>,
        _reason: Option<&str>,
    ) {
    }

    /// Something went wrong that did not stop the search
    fn general_error(&self, _error: &anyhow::Error) {}
}

/// Listener that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl SearchListener for NoopListener {}

/// Listener that forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl SearchListener for TracingListener {
    fn directory_entered(&self, path: &str) {
        tracing::debug!("Entering {}", path);
    }

    fn file_skipped(
        &self,
        file: &FileObject,
        filter: Option<&dyn SearchFilter>,
        reason: Option<&str>,
    ) {
        tracing::trace!(
            "Skipped {} (filter: {}, reason: {})",
            file.path(),
            filter.map(|f| f.name()).unwrap_or("-"),
            reason.unwrap_or("-")
        );
    }

    fn general_error(&self, error: &anyhow::Error) {
        tracing::warn!("{:#}", error);
    }
}

/// Thread-safe counters for a search
#[derive(Debug, Default)]
pub struct SearchStats {
    pub directories_entered: AtomicUsize,
    pub files_skipped: AtomicUsize,
    pub folders_skipped: AtomicUsize,
    pub errors: AtomicUsize,
}

/// Plain copy of [`SearchStats`] at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StatsSnapshot {
    pub directories_entered: usize,
    pub files_skipped: usize,
    pub folders_skipped: usize,
    pub errors: usize,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            directories_entered: self.directories_entered.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            folders_skipped: self.folders_skipped.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

impl SearchListener for SearchStats {
    fn directory_entered(&self, _path: &str) {
        self.directories_entered.fetch_add(1, Ordering::Relaxed);
    }

    fn file_skipped(
        &self,
        file: &FileObject,
        _filter: Option<&dyn SearchFilter>,
        _reason: Option<&str>,
    ) {
        if file.is_folder() {
            self.folders_skipped.fetch_add(1, Ordering::Relaxed);
        } else {
            self.files_skipped.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn general_error(&self, _error: &anyhow::Error) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// Fans every event out to several listeners, in order
#[derive(Default, Clone)]
pub struct ListenerChain {
    listeners: Vec<Arc<dyn SearchListener>>,
}

impl ListenerChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, listener: Arc<dyn SearchListener>) -> Self {
        self.listeners.push(listener);
        self
    }
}

impl SearchListener for ListenerChain {
    fn directory_entered(&self, path: &str) {
        for listener in &self.listeners {
            listener.directory_entered(path);
        }
    }

    fn file_skipped(
        &self,
        file: &FileObject,
        filter: Option<&dyn SearchFilter>,
        reason: Option<&str>,
    ) {
        for listener in &self.listeners {
            listener.file_skipped(file, filter, reason);
        }
    }

    fn general_error(&self, error: &anyhow::Error) {
        for listener in &self.listeners {
            listener.general_error(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{FileKind, Location};

    #[test]
    fn test_stats_split_files_and_folders() {
        let stats = Arc::new(SearchStats::new());
        let chain = ListenerChain::new()
            .with(Arc::new(NoopListener))
            .with(stats.clone());

        let virtual_file = |path: &str, kind| {
            let name = path.rsplit('/').next().unwrap_or(path);
            FileObject::new(name, path, kind, Location::Virtual(path.into()))
        };
        let folder = virtual_file("/p/.git", FileKind::Folder);
        let file = virtual_file("/p/a.o", FileKind::Data);

        chain.directory_entered("/p");
        chain.file_skipped(&folder, None, Some("hidden"));
        chain.file_skipped(&file, None, None);
        chain.general_error(&anyhow::anyhow!("boom"));

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                directories_entered: 1,
                files_skipped: 1,
                folders_skipped: 1,
                errors: 1,
            }
        );
    }
}
