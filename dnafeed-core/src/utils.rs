use std::path::{Path, PathBuf};

use glob::glob;
use log::debug;

use crate::consts::ARCHIVE_MANIFEST;
use crate::errors::Result;

///
/// Find archive directories below `root`.
///
/// A directory is an archive when it holds an `archive.json` manifest. `root` itself
/// counts if it is an archive. The result is sorted so that archive indices are stable
/// across runs.
///
/// # Arguments
/// * `root` - folder to search recursively
///
pub fn find_archives<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let pattern = root.as_ref().join("**").join(ARCHIVE_MANIFEST);
    let pattern = pattern.to_string_lossy();

    let mut archives = glob(&pattern)?
        .map(|entry| {
            entry.map(|manifest| {
                manifest
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default()
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    archives.sort();

    debug!(
        "Found {} archives under {}",
        archives.len(),
        root.as_ref().display()
    );

    Ok(archives)
}
