use super::{Archive, parse_key};
use crate::errors::{ArchiveError, Result};

///
/// An archive held entirely in memory.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryArchive {
    name: String,
    sequences: Vec<Vec<u8>>,
    closed: bool,
}

impl InMemoryArchive {
    pub fn new<S: Into<String>>(name: S, sequences: Vec<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            sequences,
            closed: false,
        }
    }
}

impl Archive for InMemoryArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.sequences.len()
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        if self.closed {
            return Err(ArchiveError::Closed(self.name.clone()));
        }
        parse_key(key, self.sequences.len())
            .map(|index| self.sequences[index].clone())
            .ok_or_else(|| ArchiveError::MissingKey {
                archive: self.name.clone(),
                key: key.to_string(),
            })
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn archive() -> InMemoryArchive {
        InMemoryArchive::new("memory", vec![vec![0, 1], vec![2, 3, 4]])
    }

    #[rstest]
    fn test_get(archive: InMemoryArchive) {
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.get("1").unwrap(), vec![2, 3, 4]);
        assert_eq!(archive.get_index(0).unwrap(), vec![0, 1]);
    }

    #[rstest]
    fn test_missing_key(archive: InMemoryArchive) {
        let result = archive.get("2");
        assert!(matches!(result, Err(ArchiveError::MissingKey { .. })));
    }

    #[rstest]
    fn test_close_is_idempotent(mut archive: InMemoryArchive) {
        archive.close().unwrap();
        archive.close().unwrap();
        assert!(archive.is_closed());
        assert!(matches!(archive.get("0"), Err(ArchiveError::Closed(_))));
    }
}
