//! Error types for the filesystem-access abstraction.
//!
//! Every error raised by this crate is a single [`FsError`] value tagged with
//! an [`FsErrorKind`] plus whatever contextual fields apply to that kind
//! (path, a second path for rename, the failing operation name, an
//! underlying OS/protocol code, and for host-key failures the remote host
//! and its key hash). Every error also carries a freshly generated
//! correlation UUID so a single failure can be traced across logs even when
//! the same kind/path repeats.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, FsError>;

/// The stable classification of an [`FsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorKind {
    NotFound,
    AlreadyExists,
    NotADirectory,
    IsADirectory,
    PermissionDenied,
    InvalidArgument,
    Io,
    /// SFTP protocol-level failure.
    Protocol,
    /// SSH transport/connect failure.
    Transport,
    AuthFailed,
    HostKeyUnknown,
    HostKeyChanged,
    Cancelled,
    Other,
}

impl fmt::Display for FsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FsErrorKind::NotFound => "not found",
            FsErrorKind::AlreadyExists => "already exists",
            FsErrorKind::NotADirectory => "not a directory",
            FsErrorKind::IsADirectory => "is a directory",
            FsErrorKind::PermissionDenied => "permission denied",
            FsErrorKind::InvalidArgument => "invalid argument",
            FsErrorKind::Io => "I/O error",
            FsErrorKind::Protocol => "protocol error",
            FsErrorKind::Transport => "transport error",
            FsErrorKind::AuthFailed => "authentication failed",
            FsErrorKind::HostKeyUnknown => "host key unknown",
            FsErrorKind::HostKeyChanged => "host key changed",
            FsErrorKind::Cancelled => "cancelled",
            FsErrorKind::Other => "error",
        };
        f.write_str(s)
    }
}

/// A single error value carrying a kind plus whatever context applies.
#[derive(Debug, Clone)]
pub struct FsError {
    kind: FsErrorKind,
    uuid: Uuid,
    message: Option<String>,
    path: Option<PathBuf>,
    second_path: Option<PathBuf>,
    operation: Option<String>,
    code: Option<i64>,
    host: Option<String>,
    host_key_hash: Option<String>,
}

impl FsError {
    /// Construct a bare error of the given kind with a fresh correlation id.
    pub fn new(kind: FsErrorKind) -> Self {
        Self {
            kind,
            uuid: Uuid::new_v4(),
            message: None,
            path: None,
            second_path: None,
            operation: None,
            code: None,
            host: None,
            host_key_hash: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_second_path(mut self, path: impl AsRef<Path>) -> Self {
        self.second_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_host_key(mut self, host: impl Into<String>, hash: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self.host_key_hash = Some(hash.into());
        self
    }

    pub fn kind(&self) -> FsErrorKind {
        self.kind
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn second_path(&self) -> Option<&Path> {
        self.second_path.as_deref()
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    pub fn code(&self) -> Option<i64> {
        self.code
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn host_key_hash(&self) -> Option<&str> {
        self.host_key_hash.as_deref()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == FsErrorKind::NotFound
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == FsErrorKind::Cancelled
    }

    pub(crate) fn not_found(path: impl AsRef<Path>) -> Self {
        Self::new(FsErrorKind::NotFound).with_path(path)
    }

    pub(crate) fn cancelled() -> Self {
        Self::new(FsErrorKind::Cancelled)
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(op) = &self.operation {
            write!(f, " during {op}")?;
        }
        if let Some(path) = &self.path {
            write!(f, ": {}", path.display())?;
        }
        if let Some(second) = &self.second_path {
            write!(f, " -> {}", second.display())?;
        }
        if let Some(host) = &self.host {
            write!(f, " (host {host})")?;
        }
        if let Some(hash) = &self.host_key_hash {
            write!(f, " [{hash}]")?;
        }
        if let Some(code) = self.code {
            write!(f, " (code {code})")?;
        }
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        write!(f, " [{}]", self.uuid)
    }
}

impl std::error::Error for FsError {}

impl From<io::Error> for FsError {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => FsErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => FsErrorKind::PermissionDenied,
            io::ErrorKind::AlreadyExists => FsErrorKind::AlreadyExists,
            _ => FsErrorKind::Io,
        };
        FsError::new(kind).with_message(err.to_string())
    }
}

impl From<ssh2::Error> for FsError {
    fn from(err: ssh2::Error) -> Self {
        let kind = if err.code() == ssh2::ErrorCode::SFTP(2) {
            // LIBSSH2_FX_NO_SUCH_FILE
            FsErrorKind::NotFound
        } else {
            FsErrorKind::Protocol
        };
        FsError::new(kind).with_message(err.message().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_never_panics_for_every_kind() {
        let kinds = [
            FsErrorKind::NotFound,
            FsErrorKind::AlreadyExists,
            FsErrorKind::NotADirectory,
            FsErrorKind::IsADirectory,
            FsErrorKind::PermissionDenied,
            FsErrorKind::InvalidArgument,
            FsErrorKind::Io,
            FsErrorKind::Protocol,
            FsErrorKind::Transport,
            FsErrorKind::AuthFailed,
            FsErrorKind::HostKeyUnknown,
            FsErrorKind::HostKeyChanged,
            FsErrorKind::Cancelled,
            FsErrorKind::Other,
        ];
        for kind in kinds {
            let err = FsError::new(kind)
                .with_path("/a/b")
                .with_operation("stat")
                .with_code(2);
            let _ = err.to_string();
        }
    }

    #[test]
    fn each_error_gets_a_distinct_correlation_id() {
        let a = FsError::new(FsErrorKind::Other);
        let b = FsError::new(FsErrorKind::Other);
        assert_ne!(a.uuid(), b.uuid());
    }

    #[test]
    fn host_key_errors_carry_host_and_hash() {
        let err = FsError::new(FsErrorKind::HostKeyUnknown).with_host_key("example.com", "ab:cd");
        assert_eq!(err.host(), Some("example.com"));
        assert_eq!(err.host_key_hash(), Some("ab:cd"));
    }

    #[test]
    fn io_not_found_maps_to_not_found_kind() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: FsError = io_err.into();
        assert!(err.is_not_found());
    }
}
