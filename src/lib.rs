/*!
 * waypoint-fs - A backend-agnostic filesystem access abstraction
 *
 * [`access::Access`] is the contract every backend implements: a local
 * filesystem mapping ([`backend::local::LocalBackend`]) and an SFTP client
 * ([`backend::sftp::SftpBackend`]). [`destination::resolve_destination`] and
 * [`operations::copy_entry`]/[`operations::move_entry`] build higher-level
 * copy/move semantics on top of the trait; [`watcher::PollingWatcher`]
 * provides directory-change notification by diffing successive listings.
 * Every blocking call threads a [`cancel::CancellationToken`].
 */

pub mod access;
pub mod attributes;
pub mod backend;
pub mod cancel;
pub mod config;
pub mod destination;
pub mod direntry;
pub mod error;
pub mod logging;
pub mod operations;
pub mod source;
pub mod watcher;

pub use access::{Access, FileHandle, OpenFlags};
pub use attributes::{Attributes, FileType, Perm, SpecialMode, Timestamp};
pub use backend::local::LocalBackend;
pub use backend::sftp::{
    HostKeyStatus, Identity, IdentityFactory, KnownHosts, MemoryKnownHosts, SftpBackend,
    SingleKeyIdentity,
};
pub use cancel::CancellationToken;
pub use config::{SftpOptions, SshLogVerbosity};
pub use destination::{ConflictPolicy, DestinationSpec, TimeExpand};
pub use direntry::DirEntry;
pub use error::{FsError, FsErrorKind, Result};
pub use logging::LogLevel;
pub use operations::{copy_entry, move_entry, ProgressFn};
pub use source::Source;
pub use watcher::{PollingWatcher, Watcher};

/// Library version, taken from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
