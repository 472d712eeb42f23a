use std::path::PathBuf;

use thiserror::Error;

use dnafeed_core::ArchiveError;

use crate::config::ConfigError;
use crate::kmer::MAX_KMER;

#[derive(Error, Debug)]
pub enum SamplingError {
    //
    // configuration
    //
    #[error("No archives were supplied")]
    NoArchives,

    #[error("Archive {index} ({name}) holds no sequences")]
    EmptyArchive { index: usize, name: String },

    #[error("Invalid k-mer size {0}: expected a value between 1 and {max}", max = MAX_KMER)]
    InvalidKmer(usize),

    #[error("Window length {window_length} must be greater than the k-mer size {kmer}")]
    WindowTooShort { window_length: usize, kmer: usize },

    #[error("Window length must be at least 1")]
    ZeroWindowLength,

    #[error("Batch size must be at least 1")]
    ZeroBatchSize,

    #[error("Batches per epoch must be at least 1")]
    ZeroBatchesPerEpoch,

    #[error("Group size must be at least 1")]
    ZeroGroupSize,

    #[error(
        "Can't draw {group_size} distinct sequences from archive {archive}: only {available} available"
    )]
    GroupTooLarge {
        group_size: usize,
        available: usize,
        archive: usize,
    },

    //
    // requests
    //
    #[error("Batch index {index} is out of range for an epoch of {len} batches")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Index table is stale, rebuild it with `on_epoch_boundary` first")]
    Stale,

    #[error("The generator has been closed")]
    GeneratorClosed,

    //
    // data preconditions
    //
    #[error(
        "Sequence `{key}` of archive {archive} ({name}) has length {length}, shorter than the window length {window_length} (batch {batch})"
    )]
    SequenceTooShort {
        archive: usize,
        name: String,
        key: String,
        batch: usize,
        length: usize,
        window_length: usize,
    },

    #[error(
        "Sequence `{key}` of archive {archive} ({name}) contains invalid base code {code} (batch {batch})"
    )]
    InvalidBaseCode {
        archive: usize,
        name: String,
        key: String,
        batch: usize,
        code: u8,
    },

    //
    // collaborators
    //
    #[error("Archive {archive} ({name}), batch {batch}: {source}")]
    Archive {
        archive: usize,
        name: String,
        batch: usize,
        #[source]
        source: ArchiveError,
    },

    #[error("Can't open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: ArchiveError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

impl SamplingError {
    /// Whether this error stems from an impossible sampling setup rather than from data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SamplingError::NoArchives
                | SamplingError::EmptyArchive { .. }
                | SamplingError::InvalidKmer(_)
                | SamplingError::WindowTooShort { .. }
                | SamplingError::ZeroWindowLength
                | SamplingError::ZeroBatchSize
                | SamplingError::ZeroBatchesPerEpoch
                | SamplingError::ZeroGroupSize
                | SamplingError::GroupTooLarge { .. }
                | SamplingError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SamplingError>;
