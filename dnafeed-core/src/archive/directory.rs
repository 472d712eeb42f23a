use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{Archive, ArchiveOpener, parse_key};
use crate::consts::ARCHIVE_MANIFEST;
use crate::errors::{ArchiveError, Result};

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq)]
pub struct ArchiveManifest {
    pub length: usize,
}

///
/// An archive laid out as a directory: an `archive.json` manifest holding the number of
/// sequences, plus one file per sequence named after its decimal key.
///
/// Reads go straight to the filesystem, so a handle holds no open file descriptors and
/// many handles may point at the same directory.
///
#[derive(Debug)]
pub struct DirectoryArchive {
    root: PathBuf,
    name: String,
    length: usize,
    closed: bool,
}

impl DirectoryArchive {
    ///
    /// Open an existing directory archive.
    ///
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let manifest_path = root.join(ARCHIVE_MANIFEST);
        let file = File::open(&manifest_path).map_err(|source| ArchiveError::Read {
            path: manifest_path.clone(),
            source,
        })?;
        let manifest: ArchiveManifest = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| ArchiveError::Manifest {
                path: manifest_path,
                source,
            })?;

        Ok(Self {
            name: root.display().to_string(),
            root,
            length: manifest.length,
            closed: false,
        })
    }

    ///
    /// Write `sequences` to a new directory archive at `path` and open it.
    ///
    /// The manifest is written last, so a partially written directory is never
    /// discovered as an archive.
    ///
    pub fn create<P, I, S>(path: P, sequences: I) -> Result<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let root = path.as_ref();
        fs::create_dir_all(root)?;

        let mut length = 0;
        for (index, sequence) in sequences.into_iter().enumerate() {
            fs::write(root.join(index.to_string()), sequence.as_ref())?;
            length += 1;
        }

        let mut writer = BufWriter::new(File::create(root.join(ARCHIVE_MANIFEST))?);
        serde_json::to_writer(&mut writer, &ArchiveManifest { length }).map_err(|source| {
            ArchiveError::Manifest {
                path: root.join(ARCHIVE_MANIFEST),
                source,
            }
        })?;
        writer.flush()?;

        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Archive for DirectoryArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.length
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        if self.closed {
            return Err(ArchiveError::Closed(self.name.clone()));
        }
        let missing = || ArchiveError::MissingKey {
            archive: self.name.clone(),
            key: key.to_string(),
        };

        let index = parse_key(key, self.length).ok_or_else(missing)?;
        let path = self.root.join(index.to_string());
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(missing()),
            Err(source) => Err(ArchiveError::Read { path, source }),
        }
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Opens [`DirectoryArchive`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryOpener;

impl ArchiveOpener for DirectoryOpener {
    type Archive = DirectoryArchive;

    fn open(&self, path: &Path) -> Result<Self::Archive> {
        DirectoryArchive::open(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_create_and_read_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample");

        let archive =
            DirectoryArchive::create(&path, vec![vec![0u8, 1, 2], vec![3u8, 3, 3, 3]]).unwrap();

        assert_eq!(archive.len(), 2);
        assert_eq!(archive.get("0").unwrap(), vec![0, 1, 2]);
        assert_eq!(archive.get_index(1).unwrap(), vec![3, 3, 3, 3]);
    }

    #[rstest]
    fn test_reopen_through_opener() {
        let dir = tempdir().unwrap();
        DirectoryArchive::create(dir.path(), vec![b"\x00\x01"]).unwrap();

        let archive = DirectoryOpener.open(dir.path()).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.name(), dir.path().display().to_string());
    }

    #[rstest]
    fn test_missing_manifest() {
        let dir = tempdir().unwrap();
        let result = DirectoryArchive::open(dir.path());
        assert!(matches!(result, Err(ArchiveError::Read { .. })));
    }

    #[rstest]
    fn test_corrupt_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(ARCHIVE_MANIFEST), b"{ not json").unwrap();
        let result = DirectoryArchive::open(dir.path());
        assert!(matches!(result, Err(ArchiveError::Manifest { .. })));
    }

    #[rstest]
    fn test_key_outside_manifest_range() {
        let dir = tempdir().unwrap();
        let archive = DirectoryArchive::create(dir.path(), vec![b"\x00"]).unwrap();
        assert!(matches!(
            archive.get("1"),
            Err(ArchiveError::MissingKey { .. })
        ));
        assert!(matches!(
            archive.get(ARCHIVE_MANIFEST),
            Err(ArchiveError::MissingKey { .. })
        ));
    }

    #[rstest]
    fn test_closed_archive() {
        let dir = tempdir().unwrap();
        let mut archive = DirectoryArchive::create(dir.path(), vec![b"\x00"]).unwrap();
        archive.close().unwrap();
        archive.close().unwrap();
        assert!(matches!(archive.get("0"), Err(ArchiveError::Closed(_))));
    }
}
