//! The scan-and-diff polling watcher shared by every backend.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::access::Access;
use crate::cancel::CancellationToken;
use crate::direntry::DirEntry;
use crate::error::Result;

/// An object that repeatedly diffs a directory listing and reports
/// first-sight entries. Renames and deletions are never reported; only
/// names that were not present in the previous scan are returned.
pub trait Watcher: Send {
    /// Wait up to the configured scan interval, then report newly-seen
    /// entries since the last call (or since construction, for the first
    /// call). Raises `Cancelled` if the wait is woken by cancellation.
    fn watch(&mut self) -> Result<Vec<DirEntry>>;
}

/// The only watcher implementation this crate specifies: poll the
/// directory on an interval and diff against the previous snapshot.
pub struct PollingWatcher {
    backend: Arc<dyn Access>,
    dir: PathBuf,
    scan_interval: Duration,
    cancel: CancellationToken,
    last_seen: HashMap<String, DirEntry>,
}

impl PollingWatcher {
    /// Performs the initial `ls` synchronously, per the data model: the
    /// last-seen map is seeded at construction, not at the first `watch()`.
    pub fn new(
        backend: Arc<dyn Access>,
        dir: &Path,
        scan_interval: Duration,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let entries = backend.ls(dir, &cancel)?;
        let last_seen = entries
            .into_iter()
            .map(|entry| (entry.name.clone(), entry))
            .collect();
        Ok(Self {
            backend,
            dir: dir.to_path_buf(),
            scan_interval,
            cancel,
            last_seen,
        })
    }
}

impl Watcher for PollingWatcher {
    fn watch(&mut self) -> Result<Vec<DirEntry>> {
        if self.cancel.wait_timeout(self.scan_interval) {
            return Err(crate::error::FsError::cancelled());
        }

        let current = self.backend.ls(&self.dir, &self.cancel)?;
        let mut additions = Vec::new();
        let mut snapshot = HashMap::with_capacity(current.len());

        for entry in current {
            if !self.last_seen.contains_key(&entry.name) {
                additions.push(entry.clone());
            }
            snapshot.insert(entry.name.clone(), entry);
        }

        self.last_seen = snapshot;
        Ok(additions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{Attributes, FileType};
    use std::sync::Mutex;

    struct FakeAccess {
        listings: Mutex<Vec<Vec<&'static str>>>,
    }

    impl Access for FakeAccess {
        fn is_remote(&self) -> bool {
            false
        }

        fn ls(&self, _dir: &Path, _cancel: &CancellationToken) -> Result<Vec<DirEntry>> {
            let mut listings = self.listings.lock().unwrap();
            let names = if listings.len() > 1 {
                listings.remove(0)
            } else {
                listings[0].clone()
            };
            Ok(names
                .into_iter()
                .map(|name| DirEntry::new(name, Attributes::new(FileType::File)))
                .collect())
        }

        fn exists(&self, _path: &Path, _cancel: &CancellationToken) -> Result<bool> {
            unimplemented!()
        }

        fn try_stat(
            &self,
            _path: &Path,
            _cancel: &CancellationToken,
        ) -> Result<Option<Attributes>> {
            unimplemented!()
        }

        fn stat(&self, _path: &Path, _cancel: &CancellationToken) -> Result<Attributes> {
            unimplemented!()
        }

        fn lstat(&self, _path: &Path, _cancel: &CancellationToken) -> Result<Attributes> {
            unimplemented!()
        }

        fn remove(&self, _path: &Path, _cancel: &CancellationToken) -> Result<()> {
            unimplemented!()
        }

        fn mkdir(&self, _path: &Path, _parents: bool, _cancel: &CancellationToken) -> Result<()> {
            unimplemented!()
        }

        fn rename(&self, _old: &Path, _new: &Path, _cancel: &CancellationToken) -> Result<()> {
            unimplemented!()
        }

        fn open(
            &self,
            _path: &Path,
            _flags: crate::access::OpenFlags,
            _mode: u32,
            _cancel: &CancellationToken,
        ) -> Result<Box<dyn crate::access::FileHandle>> {
            unimplemented!()
        }

        fn create_watcher(
            self: Arc<Self>,
            _dir: &Path,
            _cancel: CancellationToken,
        ) -> Result<Box<dyn Watcher>> {
            unimplemented!()
        }
    }

    #[test]
    fn first_watch_reports_only_new_names() {
        let backend = Arc::new(FakeAccess {
            listings: Mutex::new(vec![vec!["a", "b"], vec!["a", "b", "c", "d"]]),
        });
        let cancel = CancellationToken::new();
        let mut watcher = PollingWatcher::new(
            backend,
            Path::new("/dir"),
            Duration::from_millis(1),
            cancel,
        )
        .unwrap();

        let additions = watcher.watch().unwrap();
        let mut names: Vec<_> = additions.iter().map(|e| e.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["c", "d"]);
    }

    #[test]
    fn removed_entries_produce_no_event() {
        let backend = Arc::new(FakeAccess {
            listings: Mutex::new(vec![vec!["a", "b"], vec!["b"]]),
        });
        let cancel = CancellationToken::new();
        let mut watcher = PollingWatcher::new(
            backend,
            Path::new("/dir"),
            Duration::from_millis(1),
            cancel,
        )
        .unwrap();

        let additions = watcher.watch().unwrap();
        assert!(additions.is_empty());
    }

    #[test]
    fn cancellation_during_wait_is_reported() {
        let backend = Arc::new(FakeAccess {
            listings: Mutex::new(vec![vec!["a"]]),
        });
        let cancel = CancellationToken::new();
        let mut watcher = PollingWatcher::new(
            backend,
            Path::new("/dir"),
            Duration::from_secs(5),
            cancel.clone(),
        )
        .unwrap();

        cancel.signal();
        let result = watcher.watch();
        assert!(result.unwrap_err().is_cancelled());
    }
}
