//! High-level copy/move operations built on top of [`Access`] and the
//! destination resolver.

use std::path::PathBuf;

use crate::access::{Access, OpenFlags};
use crate::cancel::CancellationToken;
use crate::destination::{resolve_destination, DestinationSpec};
use crate::error::Result;
use crate::source::Source;

/// Bytes copied so far; invoked after each successful write chunk during
/// [`copy_entry`] with the running cumulative total.
pub type ProgressFn<'a> = dyn FnMut(u64) + 'a;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Resolve the destination on `access`, rename the entry there, then update
/// `source.current_path`.
pub fn move_entry(
    access: &dyn Access,
    source: &mut Source,
    spec: &DestinationSpec,
    cancel: &CancellationToken,
) -> Result<PathBuf> {
    let resolved = resolve_destination(access, source, access, spec, cancel)?;
    access.rename(source.current_path(), &resolved, cancel)?;
    source.set_current_path(resolved.clone());
    Ok(resolved)
}

/// Stream-copy `source` to a resolved destination on `dest_access`.
///
/// Opens the source read-only, resolves the destination, then opens it
/// write-only/create/truncate using the source's mode bits, and streams
/// through a 64 KiB buffer. `on_progress`, if given, is called after every
/// successful write with the cumulative byte count. No rollback is
/// attempted on error: a partially written destination is left in place.
pub fn copy_entry(
    source_access: &dyn Access,
    source: &Source,
    dest_access: &dyn Access,
    spec: &DestinationSpec,
    cancel: &CancellationToken,
    mut on_progress: Option<&mut ProgressFn<'_>>,
) -> Result<PathBuf> {
    let mut reader = source_access.open(
        source.current_path(),
        OpenFlags::RD_ONLY,
        0,
        cancel,
    )?;

    let resolved = resolve_destination(source_access, source, dest_access, spec, cancel)?;

    let source_attr = source_access.stat(source.current_path(), cancel)?;
    let mode = source_attr.get_mode() & 0o777;

    let mut writer = dest_access.open(
        &resolved,
        OpenFlags::WR_ONLY | OpenFlags::CREATE | OpenFlags::TRUNC,
        mode,
        cancel,
    )?;

    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut total: u64 = 0;

    loop {
        let read = std::io::Read::read(&mut reader, &mut buf)?;
        if read == 0 {
            break;
        }

        let mut written = 0;
        while written < read {
            written += std::io::Write::write(&mut writer, &buf[written..read])?;
        }

        total += read as u64;
        if let Some(cb) = on_progress.as_deref_mut() {
            cb(total);
        }
    }

    Ok(resolved)
}
