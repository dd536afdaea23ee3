//! Size pre-filter: files with a unique size cannot be exact duplicates.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// File sizes in candidate order; `None` when metadata could not be read
pub fn file_sizes(paths: &[PathBuf]) -> Vec<Option<u64>> {
    paths
        .iter()
        .map(|path| fs::metadata(path).ok().map(|m| m.len()))
        .collect()
}

/// Which candidates still need hashing.
///
/// A file is skipped only when its size is known and no other candidate
/// shares it. Unknown sizes are always hashed.
pub fn needs_hashing(sizes: &[Option<u64>]) -> Vec<bool> {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for size in sizes.iter().flatten() {
        *counts.entry(*size).or_default() += 1;
    }

    sizes
        .iter()
        .map(|size| match size {
            Some(size) => counts.get(size).copied().unwrap_or(0) > 1,
            None => true,
        })
        .collect()
}
