//! Directory entries returned by [`Access::ls`](crate::access::Access::ls).

use std::path::PathBuf;

use crate::attributes::Attributes;

/// A single entry returned from listing a directory.
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// Basename of the entry. Never empty, never contains a path separator.
    pub name: String,
    pub attr: Attributes,
    /// Present iff `attr.file_type == Some(FileType::Link)`.
    pub symlink_target: Option<PathBuf>,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, attr: Attributes) -> Self {
        Self {
            name: name.into(),
            attr,
            symlink_target: None,
        }
    }

    pub fn with_symlink_target(mut self, target: PathBuf) -> Self {
        self.symlink_target = Some(target);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::FileType;

    #[test]
    fn symlink_target_is_only_set_when_requested() {
        let entry = DirEntry::new("f", Attributes::new(FileType::File));
        assert!(entry.symlink_target.is_none());

        let entry = DirEntry::new("l", Attributes::new(FileType::Link))
            .with_symlink_target(PathBuf::from("/elsewhere"));
        assert_eq!(entry.symlink_target, Some(PathBuf::from("/elsewhere")));
    }
}
