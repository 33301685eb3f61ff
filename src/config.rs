//! Builder-style configuration for the SFTP backend.

use secrecy::SecretString;

/// SSH/libssh2 trace verbosity, passed straight through to the session's log
/// callback. Does not affect [`crate::logging`], which governs this crate's
/// own `tracing` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SshLogVerbosity {
    #[default]
    NoLog,
    Warning,
    Protocol,
    Packet,
    Functions,
}

/// Connection and policy options for [`crate::backend::sftp::SftpBackend`].
///
/// Constructed with the two required fields, then refined with `with_*`
/// setters; every optional field defaults as documented on its setter.
#[derive(Debug, Clone)]
pub struct SftpOptions {
    pub(crate) host: String,
    pub(crate) port: Option<u16>,
    pub(crate) user: String,
    pub(crate) password: Option<SecretString>,
    pub(crate) allow_unknown_host_key: bool,
    pub(crate) allow_changed_host_key: bool,
    pub(crate) watcher_scan_interval_ms: u64,
    pub(crate) ssh_logging_verbosity: SshLogVerbosity,
}

impl SftpOptions {
    /// `port = None` (library default, 22), `allow_unknown_host_key = true`,
    /// `allow_changed_host_key = false`, `watcher_scan_interval_ms = 5000`,
    /// `ssh_logging_verbosity = NoLog`.
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            user: user.into(),
            password: None,
            allow_unknown_host_key: true,
            allow_changed_host_key: false,
            watcher_scan_interval_ms: 5000,
            ssh_logging_verbosity: SshLogVerbosity::NoLog,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::new(password.into().into_boxed_str()));
        self
    }

    pub fn with_allow_unknown_host_key(mut self, allow: bool) -> Self {
        self.allow_unknown_host_key = allow;
        self
    }

    pub fn with_allow_changed_host_key(mut self, allow: bool) -> Self {
        self.allow_changed_host_key = allow;
        self
    }

    pub fn with_watcher_scan_interval_ms(mut self, millis: u64) -> Self {
        self.watcher_scan_interval_ms = millis;
        self
    }

    pub fn with_ssh_logging_verbosity(mut self, verbosity: SshLogVerbosity) -> Self {
        self.ssh_logging_verbosity = verbosity;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}
