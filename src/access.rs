//! The backend-agnostic filesystem contract.

use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use bitflags::bitflags;

use crate::cancel::CancellationToken;
use crate::direntry::DirEntry;
use crate::error::Result;
use crate::watcher::Watcher;
use crate::attributes::Attributes;

bitflags! {
    /// POSIX-style open flags, shared by every backend.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        const RD_ONLY = 0b0000_0001;
        const WR_ONLY = 0b0000_0010;
        const RD_WR   = 0b0000_0100;
        const APPEND  = 0b0000_1000;
        const CREATE  = 0b0001_0000;
        const TRUNC   = 0b0010_0000;
        const EXCL    = 0b0100_0000;
    }
}

/// An open file handle on any backend. Short reads/writes are expected and
/// must be re-driven by the caller, matching plain POSIX semantics.
pub trait FileHandle: Read + Write + Send {}
impl<T: Read + Write + Send> FileHandle for T {}

/// The polymorphic contract every backend (local, SFTP) implements.
///
/// Every method checks the shared [`CancellationToken`] on entry; `ls` and
/// the watcher additionally check once per iteration. A positive check
/// raises [`crate::error::FsErrorKind::Cancelled`].
pub trait Access: Send + Sync {
    /// `true` for backends whose calls cross a network boundary.
    fn is_remote(&self) -> bool;

    /// List the contents of `dir` in backend-native order.
    fn ls(&self, dir: &Path, cancel: &CancellationToken) -> Result<Vec<DirEntry>>;

    /// `false` iff the path is absent; never distinguishes "absent" as an error.
    fn exists(&self, path: &Path, cancel: &CancellationToken) -> Result<bool>;

    /// `Some(attr)` if present, `None` if absent.
    fn try_stat(&self, path: &Path, cancel: &CancellationToken) -> Result<Option<Attributes>>;

    /// Stat, following symlinks. Errors (including `NotFound`) if absent.
    fn stat(&self, path: &Path, cancel: &CancellationToken) -> Result<Attributes>;

    /// Stat without following a terminal symlink.
    fn lstat(&self, path: &Path, cancel: &CancellationToken) -> Result<Attributes>;

    /// Remove a file or directory. Behavior on a non-empty directory is
    /// backend-dependent and intentionally unspecified here.
    fn remove(&self, path: &Path, cancel: &CancellationToken) -> Result<()>;

    /// Create a directory. `parents = true` creates the full chain
    /// idempotently; `parents = false` fails if an ancestor is missing or
    /// `path` already exists.
    fn mkdir(&self, path: &Path, parents: bool, cancel: &CancellationToken) -> Result<()>;

    fn rename(&self, old: &Path, new: &Path, cancel: &CancellationToken) -> Result<()>;

    fn open(
        &self,
        path: &Path,
        flags: OpenFlags,
        mode: u32,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn FileHandle>>;

    /// Create a watcher over `dir`, sharing `cancel` with the caller.
    ///
    /// Takes `self` by `Arc` (rather than `&self`) because the returned
    /// watcher holds a shared reference to the backend for as long as it
    /// keeps polling, per the ownership model in the data model section.
    fn create_watcher(
        self: Arc<Self>,
        dir: &Path,
        cancel: CancellationToken,
    ) -> Result<Box<dyn Watcher>>;
}
