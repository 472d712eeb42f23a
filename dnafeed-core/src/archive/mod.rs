use std::path::Path;

use crate::errors::Result;

pub mod directory;
pub mod memory;

pub use directory::{DirectoryArchive, DirectoryOpener};
pub use memory::InMemoryArchive;

///
/// A read-only, random-access store of sequences for a single sample.
///
/// Sequences are addressed by decimal string keys in `[0, len)`. Implementations never
/// mutate the underlying store, so independent handles onto the same archive may be read
/// concurrently.
///
pub trait Archive {
    /// Human readable identifier (usually the path) used in error messages.
    fn name(&self) -> &str;

    /// Number of sequences stored in the archive.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the raw bytes stored under `key`.
    fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Fetch the sequence stored under the decimal encoding of `index`.
    fn get_index(&self, index: usize) -> Result<Vec<u8>> {
        self.get(&index.to_string())
    }

    /// Release the handle. Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;

    fn is_closed(&self) -> bool;
}

///
/// Opens archives from paths, read-only and without taking locks.
///
pub trait ArchiveOpener {
    type Archive: Archive;

    fn open(&self, path: &Path) -> Result<Self::Archive>;
}

/// Parse a decimal archive key, rejecting anything outside `[0, len)`.
pub(crate) fn parse_key(key: &str, len: usize) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse::<usize>().ok().filter(|&index| index < len)
}
