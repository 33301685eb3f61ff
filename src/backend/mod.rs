//! Backend implementations of [`crate::access::Access`]: a native local
//! filesystem mapping and an SFTP client.

pub mod local;
pub mod sftp;

pub use local::LocalBackend;
pub use sftp::{
    HostKeyStatus, Identity, IdentityFactory, KnownHosts, MemoryKnownHosts, SftpBackend,
    SingleKeyIdentity,
};
