//! Destination resolution: turning a symbolic [`DestinationSpec`] into a
//! concrete target path.
//!
//! The resolver is a pure function apart from one possible side effect
//! (`mkdir` on a missing parent when `create_parents` is set); it never
//! touches file contents.

use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};

use crate::access::Access;
use crate::cancel::CancellationToken;
use crate::error::{FsError, FsErrorKind, Result};
use crate::source::Source;

/// Which timezone, if any, to evaluate strftime-style placeholders in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeExpand {
    Utc,
    Local,
}

/// What to do when the resolved path already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    Overwrite,
    AutoRename,
    Fail,
}

/// The declarative description of a destination.
#[derive(Debug, Clone)]
pub struct DestinationSpec {
    pub path: String,
    pub expand_time_placeholders: Option<TimeExpand>,
    pub create_parents: bool,
    pub on_name_conflict: ConflictPolicy,
}

impl DestinationSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expand_time_placeholders: None,
            create_parents: false,
            on_name_conflict: ConflictPolicy::Fail,
        }
    }

    pub fn with_time_expansion(mut self, expand: TimeExpand) -> Self {
        self.expand_time_placeholders = Some(expand);
        self
    }

    pub fn with_create_parents(mut self, create_parents: bool) -> Self {
        self.create_parents = create_parents;
        self
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.on_name_conflict = policy;
        self
    }
}

fn ends_with_separator(path: &str) -> bool {
    path.ends_with('/') || (cfg!(windows) && path.ends_with('\\'))
}

fn expand_time_placeholders(
    template: &str,
    source_access: &dyn Access,
    source: &Source,
    expand: TimeExpand,
    cancel: &CancellationToken,
) -> Result<String> {
    let attr = source_access.stat(source.current_path(), cancel)?;
    let mtime = attr
        .mtime
        .ok_or_else(|| FsError::new(FsErrorKind::Other).with_message("mtime unavailable"))?;

    let utc = Utc
        .timestamp_opt(mtime.secs, mtime.nanos)
        .single()
        .ok_or_else(|| FsError::new(FsErrorKind::Other).with_message("mtime unavailable"))?;

    let formatted = match expand {
        TimeExpand::Utc => utc.format(template).to_string(),
        TimeExpand::Local => {
            let local: chrono::DateTime<chrono::Local> = utc.with_timezone(&chrono::Local);
            local.format(template).to_string()
        }
    };
    Ok(formatted)
}

fn stem_and_ext(basename: &str) -> (&str, &str) {
    match basename.rfind('.') {
        Some(0) | None => (basename, ""),
        Some(idx) => (&basename[..idx], &basename[idx..]),
    }
}

fn apply_conflict_policy(
    dest_access: &dyn Access,
    path: PathBuf,
    policy: ConflictPolicy,
    cancel: &CancellationToken,
) -> Result<PathBuf> {
    match policy {
        ConflictPolicy::Overwrite => Ok(path),
        ConflictPolicy::Fail => Err(FsError::new(FsErrorKind::AlreadyExists).with_path(&path)),
        ConflictPolicy::AutoRename => {
            let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
            let basename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let (stem, ext) = stem_and_ext(&basename);
            let (stem, ext) = (stem.to_string(), ext.to_string());

            let mut i = 1u64;
            loop {
                let candidate = parent.join(format!("{stem}~{i}{ext}"));
                if !dest_access.exists(&candidate, cancel)? {
                    return Ok(candidate);
                }
                i += 1;
            }
        }
    }
}

/// Resolve `spec` against `dest_access`, given `source` (read via
/// `source_access` only to obtain its mtime for time-placeholder expansion).
pub fn resolve_destination(
    source_access: &dyn Access,
    source: &Source,
    dest_access: &dyn Access,
    spec: &DestinationSpec,
    cancel: &CancellationToken,
) -> Result<PathBuf> {
    if spec.path.is_empty() {
        return Err(FsError::new(FsErrorKind::InvalidArgument).with_message("empty destination path"));
    }

    let had_trailing_separator = ends_with_separator(&spec.path);

    let path_string = if let Some(expand) = spec.expand_time_placeholders {
        expand_time_placeholders(&spec.path, source_access, source, expand, cancel)?
    } else {
        spec.path.clone()
    };

    let mut p = PathBuf::from(&path_string);
    let basename = source
        .orig_path()
        .file_name()
        .map(Path::new)
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            FsError::new(FsErrorKind::InvalidArgument).with_message("source path has no basename")
        })?;

    let attr = dest_access.try_stat(&p, cancel)?;

    if let Some(attr) = attr {
        if attr.is_dir() {
            p = p.join(&basename);
            let restat = dest_access.try_stat(&p, cancel)?;
            match restat {
                Some(a) if a.is_dir() => {
                    return Err(FsError::new(FsErrorKind::IsADirectory).with_path(&p));
                }
                Some(_) => {
                    p = apply_conflict_policy(dest_access, p, spec.on_name_conflict, cancel)?;
                }
                None => {}
            }
        } else if ends_with_separator(&path_string) {
            return Err(FsError::new(FsErrorKind::NotADirectory).with_path(&p));
        } else {
            p = apply_conflict_policy(dest_access, p, spec.on_name_conflict, cancel)?;
        }
    } else {
        if had_trailing_separator {
            p = p.join(&basename);
        }
        if let Some(parent) = p.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            if spec.create_parents {
                dest_access.mkdir(parent, true, cancel)?;
            } else if !dest_access.exists(parent, cancel)? {
                return Err(FsError::new(FsErrorKind::NotFound).with_path(parent));
            }
        }
    }

    Ok(p)
}
