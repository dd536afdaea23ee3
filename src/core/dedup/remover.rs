//! Removes a duplicate according to the chosen [`RemovalMode`].

use super::types::RemovalMode;
use crate::error::FileOpError;
use std::fs;
use std::path::Path;

pub fn remove_duplicate(path: &Path, mode: RemovalMode) -> Result<(), FileOpError> {
    match mode {
        RemovalMode::Delete => fs::remove_file(path).map_err(FileOpError::Remove),
        RemovalMode::Trash => trash::delete(path).map_err(|e| FileOpError::Trash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn delete_removes_the_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("copy.mp3");
        fs::write(&path, b"dup").unwrap();

        remove_duplicate(&path, RemovalMode::Delete).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn deleting_a_vanished_file_fails() {
        let temp = TempDir::new().unwrap();
        let result = remove_duplicate(&temp.path().join("gone.mp3"), RemovalMode::Delete);
        assert!(matches!(result, Err(FileOpError::Remove(_))));
    }
}
