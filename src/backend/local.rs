//! Local filesystem backend: a thin, synchronous mapping of [`Access`] onto
//! native filesystem calls.

use std::ffi::CString;
use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::os::unix::io::FromRawFd;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::access::{Access, FileHandle, OpenFlags};
use crate::attributes::{Attributes, Timestamp};
use crate::cancel::CancellationToken;
use crate::direntry::DirEntry;
use crate::error::{FsError, FsErrorKind, Result};
use crate::watcher::{PollingWatcher, Watcher};

/// Default interval between scans for watchers created on this backend.
const DEFAULT_SCAN_INTERVAL_MS: u64 = 5000;

/// Maps [`Access`] onto the host filesystem via `std::fs` and raw POSIX
/// syscalls (for `open`, where the flag bits must be controlled precisely).
#[derive(Debug, Clone, Default)]
pub struct LocalBackend;

impl LocalBackend {
    pub fn new() -> Self {
        Self
    }
}

fn metadata_to_attributes(meta: &fs::Metadata) -> Attributes {
    let mut attr = Attributes::default();
    attr.set_mode(meta.mode());
    attr.size = Some(meta.size());
    attr.uid = Some(meta.uid());
    attr.gid = Some(meta.gid());
    attr.atime = Some(Timestamp::new(meta.atime(), meta.atime_nsec() as u32));
    attr.mtime = Some(Timestamp::new(meta.mtime(), meta.mtime_nsec() as u32));
    attr.ctime = Some(Timestamp::new(meta.ctime(), meta.ctime_nsec() as u32));
    attr
}

fn io_err(err: io::Error, path: &Path, op: &str) -> FsError {
    let code = err.raw_os_error().map(i64::from);
    let mut fs_err: FsError = err.into();
    fs_err = fs_err.with_path(path).with_operation(op);
    if let Some(code) = code {
        fs_err = fs_err.with_code(code);
    }
    fs_err
}

impl Access for LocalBackend {
    fn is_remote(&self) -> bool {
        false
    }

    fn ls(&self, dir: &Path, cancel: &CancellationToken) -> Result<Vec<DirEntry>> {
        cancel.check()?;
        let mut entries = Vec::new();
        let read_dir = fs::read_dir(dir).map_err(|e| io_err(e, dir, "readdir"))?;

        for entry in read_dir {
            cancel.check()?;
            let entry = entry.map_err(|e| io_err(e, dir, "readdir"))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            let attr = self.lstat(&path, cancel)?;
            let mut dir_entry = DirEntry::new(name, attr.clone());
            if attr.is_link() {
                if let Ok(target) = fs::read_link(&path) {
                    dir_entry = dir_entry.with_symlink_target(target);
                }
            }
            entries.push(dir_entry);
        }

        Ok(entries)
    }

    fn exists(&self, path: &Path, cancel: &CancellationToken) -> Result<bool> {
        cancel.check()?;
        Ok(path.symlink_metadata().is_ok())
    }

    fn try_stat(&self, path: &Path, cancel: &CancellationToken) -> Result<Option<Attributes>> {
        cancel.check()?;
        match fs::metadata(path) {
            Ok(meta) => Ok(Some(metadata_to_attributes(&meta))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(e, path, "stat")),
        }
    }

    fn stat(&self, path: &Path, cancel: &CancellationToken) -> Result<Attributes> {
        cancel.check()?;
        let meta = fs::metadata(path).map_err(|e| io_err(e, path, "stat"))?;
        Ok(metadata_to_attributes(&meta))
    }

    fn lstat(&self, path: &Path, cancel: &CancellationToken) -> Result<Attributes> {
        cancel.check()?;
        let meta = fs::symlink_metadata(path).map_err(|e| io_err(e, path, "lstat"))?;
        Ok(metadata_to_attributes(&meta))
    }

    fn remove(&self, path: &Path, cancel: &CancellationToken) -> Result<()> {
        cancel.check()?;
        let meta = fs::symlink_metadata(path).map_err(|e| io_err(e, path, "remove"))?;
        if meta.is_dir() {
            fs::remove_dir(path).map_err(|e| io_err(e, path, "rmdir"))
        } else {
            fs::remove_file(path).map_err(|e| io_err(e, path, "unlink"))
        }
    }

    fn mkdir(&self, path: &Path, parents: bool, cancel: &CancellationToken) -> Result<()> {
        cancel.check()?;
        if parents {
            fs::create_dir_all(path).map_err(|e| io_err(e, path, "mkdir"))
        } else {
            fs::create_dir(path).map_err(|e| io_err(e, path, "mkdir"))
        }
    }

    fn rename(&self, old: &Path, new: &Path, cancel: &CancellationToken) -> Result<()> {
        cancel.check()?;
        fs::rename(old, new).map_err(|e| {
            io_err(e, old, "rename")
                .with_second_path(new)
        })
    }

    fn open(
        &self,
        path: &Path,
        flags: OpenFlags,
        mode: u32,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn FileHandle>> {
        cancel.check()?;

        let mut raw_flags = 0;
        if flags.contains(OpenFlags::RD_ONLY) {
            raw_flags |= libc::O_RDONLY;
        }
        if flags.contains(OpenFlags::WR_ONLY) {
            raw_flags |= libc::O_WRONLY;
        }
        if flags.contains(OpenFlags::RD_WR) {
            raw_flags |= libc::O_RDWR;
        }
        if flags.contains(OpenFlags::APPEND) {
            raw_flags |= libc::O_APPEND;
        }
        if flags.contains(OpenFlags::CREATE) {
            raw_flags |= libc::O_CREAT;
        }
        if flags.contains(OpenFlags::TRUNC) {
            raw_flags |= libc::O_TRUNC;
        }
        if flags.contains(OpenFlags::EXCL) {
            raw_flags |= libc::O_EXCL;
        }

        let c_path = CString::new(path.as_os_str().as_encoded_bytes())
            .map_err(|_| FsError::new(FsErrorKind::InvalidArgument).with_path(path))?;

        let fd = unsafe { libc::open(c_path.as_ptr(), raw_flags, mode as libc::c_uint) };
        if fd < 0 {
            let err = io::Error::last_os_error();
            return Err(io_err(err, path, "open"));
        }

        Ok(Box::new(unsafe { fs::File::from_raw_fd(fd) }))
    }

    fn create_watcher(
        self: Arc<Self>,
        dir: &Path,
        cancel: CancellationToken,
    ) -> Result<Box<dyn Watcher>> {
        let interval = std::time::Duration::from_millis(DEFAULT_SCAN_INTERVAL_MS);
        let watcher = PollingWatcher::new(self, dir, interval, cancel)?;
        Ok(Box::new(watcher))
    }
}
