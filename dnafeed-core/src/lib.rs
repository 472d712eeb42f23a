//! # dnafeed-core
//!
//! Read-only access to per-sample sequence archives.
//!
//! ## Purpose
//!
//! Every biological sample is stored as its own archive: an ordered, keyed store of
//! variable-length sequences, addressed by decimal keys `"0"`, `"1"`, ... `"len - 1"`.
//! The sampling engine in `dnafeed-sampling` consumes archives exclusively through the
//! [`Archive`] and [`ArchiveOpener`] traits defined here, so the storage engine behind an
//! archive is interchangeable.
//!
//! ## Main Components
//!
//! - **[`Archive`]**: random-access, read-only sequence store
//! - **[`InMemoryArchive`]**: archive backed by a `Vec` of sequences (tests, ad hoc sampling)
//! - **[`DirectoryArchive`]**: a directory with an `archive.json` manifest and one file per key
//! - **[`find_archives`]**: discovers archive directories below a root folder
//! - **[`alphabet`]**: the five base codes (`A C G T N`) stored inside archives
//!
//! ## Example
//!
//! ```rust
//! use dnafeed_core::{Archive, InMemoryArchive};
//!
//! let archive = InMemoryArchive::new("sample", vec![vec![0, 1, 2, 3], vec![3, 2, 1, 0]]);
//! assert_eq!(archive.len(), 2);
//! assert_eq!(archive.get("1").unwrap(), vec![3, 2, 1, 0]);
//! ```
//!
pub mod alphabet;
pub mod archive;
pub mod errors;
pub mod utils;

// re-export things
pub use alphabet::{decode_bases, encode_bases};
pub use archive::*;
pub use errors::*;
pub use utils::find_archives;

pub mod consts {
    /// File marking a directory as a [`DirectoryArchive`](crate::DirectoryArchive).
    pub const ARCHIVE_MANIFEST: &str = "archive.json";
}
