use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Can't read archive {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid archive manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Archive {archive} has no sequence under key `{key}`")]
    MissingKey { archive: String, key: String },

    #[error("Archive {0} has already been closed")]
    Closed(String),

    #[error("Invalid archive search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Error reading archive directory entry: {0}")]
    Glob(#[from] glob::GlobError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
