//! Filesystem-entry attributes and POSIX mode-bit (de)coding.

use bitflags::bitflags;

/// The type of filesystem entry an [`Attributes`] value describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Block,
    Char,
    Dir,
    Fifo,
    Link,
    File,
    Sock,
    Special,
    Unknown,
}

bitflags! {
    /// Special mode bits: setuid, setgid, sticky.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SpecialMode: u8 {
        const SET_UID = 0b001;
        const SET_GID = 0b010;
        const STICKY  = 0b100;
    }
}

bitflags! {
    /// A single permission triplet (read/write/execute).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Perm: u8 {
        const READ  = 0b100;
        const WRITE = 0b010;
        const EXEC  = 0b001;
    }
}

/// A timestamp at nanosecond resolution, measured from the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub secs: i64,
    pub nanos: u32,
}

impl Timestamp {
    pub fn from_secs(secs: i64) -> Self {
        Self { secs, nanos: 0 }
    }

    pub fn new(secs: i64, nanos: u32) -> Self {
        Self { secs, nanos }
    }
}

/// Typed description of a filesystem entry.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    pub file_type: Option<FileType>,
    pub mode: SpecialMode,
    pub uperm: Perm,
    pub gperm: Perm,
    pub operm: Perm,
    pub size: Option<u64>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub owner: Option<String>,
    pub group: Option<String>,
    pub atime: Option<Timestamp>,
    pub mtime: Option<Timestamp>,
    pub ctime: Option<Timestamp>,
}

impl Attributes {
    pub fn new(file_type: FileType) -> Self {
        Self {
            file_type: Some(file_type),
            ..Default::default()
        }
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == Some(FileType::Dir)
    }

    pub fn is_reg(&self) -> bool {
        self.file_type == Some(FileType::File)
    }

    pub fn is_link(&self) -> bool {
        self.file_type == Some(FileType::Link)
    }

    /// Decode a raw POSIX `st_mode` value (type + special bits + perms).
    pub fn set_mode(&mut self, st_mode: u32) {
        self.file_type = Some(decode_file_type(st_mode));

        let mut special = SpecialMode::empty();
        if st_mode & libc::S_ISUID as u32 != 0 {
            special |= SpecialMode::SET_UID;
        }
        if st_mode & libc::S_ISGID as u32 != 0 {
            special |= SpecialMode::SET_GID;
        }
        if st_mode & libc::S_ISVTX as u32 != 0 {
            special |= SpecialMode::STICKY;
        }
        self.mode = special;

        self.uperm = decode_perm(st_mode, libc::S_IRUSR, libc::S_IWUSR, libc::S_IXUSR);
        self.gperm = decode_perm(st_mode, libc::S_IRGRP, libc::S_IWGRP, libc::S_IXGRP);
        self.operm = decode_perm(st_mode, libc::S_IROTH, libc::S_IWOTH, libc::S_IXOTH);
    }

    /// Re-encode into a raw POSIX `st_mode`-shaped value (type + special + perms).
    pub fn get_mode(&self) -> u32 {
        let mut mode = encode_file_type(self.file_type.unwrap_or(FileType::Unknown));

        if self.mode.contains(SpecialMode::SET_UID) {
            mode |= libc::S_ISUID as u32;
        }
        if self.mode.contains(SpecialMode::SET_GID) {
            mode |= libc::S_ISGID as u32;
        }
        if self.mode.contains(SpecialMode::STICKY) {
            mode |= libc::S_ISVTX as u32;
        }

        mode |= encode_perm(self.uperm, libc::S_IRUSR, libc::S_IWUSR, libc::S_IXUSR);
        mode |= encode_perm(self.gperm, libc::S_IRGRP, libc::S_IWGRP, libc::S_IXGRP);
        mode |= encode_perm(self.operm, libc::S_IROTH, libc::S_IWOTH, libc::S_IXOTH);

        mode
    }

    /// The canonical 10-character `ls -l`-style mode string, minus any
    /// special-bit overlay (setuid/setgid/sticky are not folded into the
    /// execute column here; see [`Attributes::mode`] for those bits).
    pub fn mode_string(&self) -> String {
        let mut s = String::with_capacity(10);
        s.push(type_char(self.file_type.unwrap_or(FileType::Unknown)));
        s.push_str(&perm_triplet(self.uperm));
        s.push_str(&perm_triplet(self.gperm));
        s.push_str(&perm_triplet(self.operm));
        s
    }

    /// The owner name if known, else the decimal uid, else `None`.
    pub fn owner_or_uid(&self) -> Option<String> {
        self.owner
            .clone()
            .or_else(|| self.uid.map(|u| u.to_string()))
    }

    /// The group name if known, else the decimal gid, else `None`.
    pub fn group_or_gid(&self) -> Option<String> {
        self.group
            .clone()
            .or_else(|| self.gid.map(|g| g.to_string()))
    }
}

fn decode_file_type(st_mode: u32) -> FileType {
    match st_mode & libc::S_IFMT as u32 {
        m if m == libc::S_IFBLK as u32 => FileType::Block,
        m if m == libc::S_IFCHR as u32 => FileType::Char,
        m if m == libc::S_IFDIR as u32 => FileType::Dir,
        m if m == libc::S_IFIFO as u32 => FileType::Fifo,
        m if m == libc::S_IFLNK as u32 => FileType::Link,
        m if m == libc::S_IFREG as u32 => FileType::File,
        m if m == libc::S_IFSOCK as u32 => FileType::Sock,
        0 => FileType::Unknown,
        _ => FileType::Special,
    }
}

fn encode_file_type(file_type: FileType) -> u32 {
    match file_type {
        FileType::Block => libc::S_IFBLK as u32,
        FileType::Char => libc::S_IFCHR as u32,
        FileType::Dir => libc::S_IFDIR as u32,
        FileType::Fifo => libc::S_IFIFO as u32,
        FileType::Link => libc::S_IFLNK as u32,
        FileType::File => libc::S_IFREG as u32,
        FileType::Sock => libc::S_IFSOCK as u32,
        FileType::Special | FileType::Unknown => 0,
    }
}

fn decode_perm(st_mode: u32, r: libc::mode_t, w: libc::mode_t, x: libc::mode_t) -> Perm {
    let mut perm = Perm::empty();
    if st_mode & r as u32 != 0 {
        perm |= Perm::READ;
    }
    if st_mode & w as u32 != 0 {
        perm |= Perm::WRITE;
    }
    if st_mode & x as u32 != 0 {
        perm |= Perm::EXEC;
    }
    perm
}

fn encode_perm(perm: Perm, r: libc::mode_t, w: libc::mode_t, x: libc::mode_t) -> u32 {
    let mut mode = 0u32;
    if perm.contains(Perm::READ) {
        mode |= r as u32;
    }
    if perm.contains(Perm::WRITE) {
        mode |= w as u32;
    }
    if perm.contains(Perm::EXEC) {
        mode |= x as u32;
    }
    mode
}

fn type_char(file_type: FileType) -> char {
    match file_type {
        FileType::Block => 'b',
        FileType::Char => 'c',
        FileType::Dir => 'd',
        FileType::Fifo => 'p',
        FileType::Link => 'l',
        FileType::File => '-',
        FileType::Sock => 's',
        FileType::Special => 'S',
        FileType::Unknown => '?',
    }
}

fn perm_triplet(perm: Perm) -> String {
    let r = if perm.contains(Perm::READ) { 'r' } else { '-' };
    let w = if perm.contains(Perm::WRITE) { 'w' } else { '-' };
    let x = if perm.contains(Perm::EXEC) { 'x' } else { '-' };
    [r, w, x].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_type_and_perms() {
        let raw = libc::S_IFREG as u32 | 0o754;
        let mut attr = Attributes::default();
        attr.set_mode(raw);
        assert_eq!(attr.file_type, Some(FileType::File));
        assert_eq!(attr.get_mode(), raw);
    }

    #[test]
    fn mode_round_trips_directory_with_special_bits() {
        let raw = libc::S_IFDIR as u32 | libc::S_ISGID as u32 | 0o2750;
        let mut attr = Attributes::default();
        attr.set_mode(raw);
        assert!(attr.is_dir());
        assert!(attr.mode.contains(SpecialMode::SET_GID));
        assert_eq!(attr.get_mode(), raw);
    }

    #[test]
    fn mode_string_is_ten_characters() {
        let mut attr = Attributes::default();
        attr.set_mode(libc::S_IFDIR as u32 | 0o750);
        let s = attr.mode_string();
        assert_eq!(s.len(), 10);
        assert_eq!(s, "drwxr-x---");
    }

    #[test]
    fn mode_string_renders_absent_bits_as_dash() {
        let mut attr = Attributes::default();
        attr.set_mode(libc::S_IFREG as u32 | 0o000);
        assert_eq!(attr.mode_string(), "----------");
    }

    #[test]
    fn owner_or_uid_falls_back_to_numeric_id() {
        let mut attr = Attributes::default();
        attr.uid = Some(1000);
        assert_eq!(attr.owner_or_uid(), Some("1000".to_string()));
        attr.owner = Some("alice".to_string());
        assert_eq!(attr.owner_or_uid(), Some("alice".to_string()));
    }

    #[test]
    fn group_or_gid_falls_back_to_numeric_id() {
        let mut attr = Attributes::default();
        assert_eq!(attr.group_or_gid(), None);
        attr.gid = Some(100);
        assert_eq!(attr.group_or_gid(), Some("100".to_string()));
    }
}
