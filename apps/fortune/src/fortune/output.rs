use std::fs::{File, Metadata};
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::Builder;
use tracing::warn;

use crate::errors::FortuneError;

/// Replaces `path` with `text`, UTF-8, no trailing newline added.
///
/// The text lands in a sibling temp file first and is renamed over the target,
/// so a failed write leaves the previous artifact intact. The new file keeps the
/// old one's mode and owner, and a symlinked `path` is written through, not replaced.
pub fn write_fortune(path: &Path, text: &str) -> Result<usize, FortuneError> {
    let io_err = |source: std::io::Error| FortuneError::Io {
        path: path.to_path_buf(),
        source,
    };

    let target = match std::fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(io_err(e)),
    };
    let existing = std::fs::metadata(&target).ok();

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    builder.prefix(".fortune").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // tempfile defaults to 0600; a fresh artifact gets 0666 less the umask
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut tmp = builder.tempfile_in(dir).map_err(io_err)?;
    if let Some(meta) = &existing {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(io_err)?;
        keep_owner(tmp.as_file(), meta);
    }

    tmp.write_all(text.as_bytes()).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(&target).map_err(|e| io_err(e.error))?;

    Ok(text.len())
}

#[cfg(unix)]
fn keep_owner(file: &File, meta: &Metadata) {
    use std::os::unix::fs::MetadataExt;

    if let Err(e) = std::os::unix::fs::fchown(file, Some(meta.uid()), Some(meta.gid())) {
        warn!(
            "Could not keep owner {}:{} on the new fortune file: {e}",
            meta.uid(),
            meta.gid()
        );
    }
}

#[cfg(not(unix))]
fn keep_owner(_file: &File, _meta: &Metadata) {}
