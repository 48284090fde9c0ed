use std::fs::{self, Metadata};
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use rayon::prelude::*;
use walkdir::WalkDir;

/// On-disk allocated size of a single file, in bytes.
///
/// Prefers the block count reported by the filesystem (which accounts for
/// filesystem-level compression and sparse regions); falls back to the
/// apparent length when no block information is available. `st_blocks` is
/// in 512-byte units.
pub fn allocated_size_of_file(metadata: &Metadata) -> u64 {
    let blocks = metadata.blocks();
    if blocks > 0 {
        blocks * 512
    } else {
        metadata.len()
    }
}

/// On-disk allocated size of a path, in bytes.
///
/// For a directory this sums the allocated size of every regular file in
/// the hierarchy. Symbolic links, hard links and directory metadata get no
/// special handling. A path that does not exist or cannot be read
/// contributes 0, silently.
pub fn allocated_size(path: &Path) -> u64 {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(_) => return 0,
    };

    if !metadata.is_dir() {
        return allocated_size_of_file(&metadata);
    }

    // Collect first, then stat in parallel. Cache bundles routinely hold
    // tens of thousands of small files and the stat calls dominate.
    let files: Vec<_> = WalkDir::new(path)
        .into_iter()
        .flatten()
        .filter(|e| e.file_type().is_file())
        .collect();

    files
        .par_iter()
        .filter_map(|e| e.metadata().ok())
        .map(|m| allocated_size_of_file(&m))
        .sum()
}
