//! Filesystem side of organizing: folder creation and moves.

use crate::error::FileOpError;
use std::fs;
use std::io;
use std::path::Path;

/// Create `dir` and any missing ancestors. Returns true if it had to.
pub fn ensure_dir(dir: &Path) -> Result<bool, FileOpError> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|source| FileOpError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Move `source` to `target`.
///
/// Tries a rename first. Renames fail across filesystems, so fall back to
/// copy + size check + delete; the source is only removed once the copy
/// is verified, and the copy is dropped again if the source cannot be.
pub fn move_file(source: &Path, target: &Path) -> Result<(), FileOpError> {
    let rename_error = match fs::rename(source, target) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    if !source.is_file() {
        return Err(move_error(target, rename_error));
    }

    tracing::debug!(
        from = %source.display(),
        to = %target.display(),
        error = %rename_error,
        "rename failed, copying instead"
    );

    copy_then_remove(source, target)
}

fn copy_then_remove(source: &Path, target: &Path) -> Result<(), FileOpError> {
    let source_size = fs::metadata(source)
        .map_err(|e| move_error(target, e))?
        .len();
    fs::copy(source, target).map_err(|e| move_error(target, e))?;

    let dest_size = fs::metadata(target)
        .map_err(|e| move_error(target, e))?
        .len();
    if dest_size != source_size {
        let _ = fs::remove_file(target);
        return Err(FileOpError::CopyVerification {
            source_size,
            dest_size,
        });
    }

    // Leave exactly one copy behind: if the source stays, the copy goes
    if let Err(e) = fs::remove_file(source) {
        let _ = fs::remove_file(target);
        return Err(move_error(target, e));
    }
    Ok(())
}

fn move_error(target: &Path, source: io::Error) -> FileOpError {
    FileOpError::Move {
        to: target.to_path_buf(),
        source,
    }
}
