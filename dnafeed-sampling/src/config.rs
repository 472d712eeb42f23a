use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::{Result, SamplingError};
use crate::index::SamplingShape;
use crate::kmer::MAX_KMER;
use crate::labels::LabelMode;
use crate::policy::{AugmentPolicy, BalancePolicy};

pub const DEFAULT_KMER: usize = 1;
pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const DEFAULT_BATCHES_PER_EPOCH: usize = 128;

fn default_kmer() -> usize {
    DEFAULT_KMER
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_batches_per_epoch() -> usize {
    DEFAULT_BATCHES_PER_EPOCH
}

fn default_augment() -> bool {
    true
}

///
/// Everything a [`BatchGenerator`](crate::BatchGenerator) needs besides its archives.
///
/// There is no implicit seed: reproducibility requires `rng_seed` to be spelled out.
///
/// ```toml
/// window_length = 150
/// kmer = 3
/// batch_size = 512
/// batches_per_epoch = 100
/// balance = true
/// group_size = 8
/// label_mode = "sample_origin"
/// rng_seed = 42
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub window_length: usize,
    #[serde(default = "default_kmer")]
    pub kmer: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_batches_per_epoch")]
    pub batches_per_epoch: usize,
    #[serde(default = "default_augment")]
    pub augment: bool,
    #[serde(default)]
    pub balance: bool,
    #[serde(default)]
    pub group_size: Option<usize>,
    #[serde(default)]
    pub label_mode: LabelMode,
    pub rng_seed: u64,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl GeneratorConfig {
    pub fn new(window_length: usize, rng_seed: u64) -> Self {
        Self {
            window_length,
            kmer: DEFAULT_KMER,
            batch_size: DEFAULT_BATCH_SIZE,
            batches_per_epoch: DEFAULT_BATCHES_PER_EPOCH,
            augment: default_augment(),
            balance: false,
            group_size: None,
            label_mode: LabelMode::None,
            rng_seed,
        }
    }

    pub fn with_kmer(mut self, kmer: usize) -> Self {
        self.kmer = kmer;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_batches_per_epoch(mut self, batches_per_epoch: usize) -> Self {
        self.batches_per_epoch = batches_per_epoch;
        self
    }

    pub fn with_augment(mut self, augment: bool) -> Self {
        self.augment = augment;
        self
    }

    pub fn with_balance(mut self, balance: bool) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_group_size(mut self, group_size: usize) -> Self {
        self.group_size = Some(group_size);
        self
    }

    pub fn with_label_mode(mut self, label_mode: LabelMode) -> Self {
        self.label_mode = label_mode;
        self
    }

    pub fn shape(&self) -> SamplingShape {
        SamplingShape {
            batches_per_epoch: self.batches_per_epoch,
            batch_size: self.batch_size,
            group_size: self.group_size,
        }
    }

    pub fn balance_policy(&self) -> BalancePolicy {
        BalancePolicy::new(self.balance)
    }

    pub fn augment_policy(&self) -> AugmentPolicy {
        AugmentPolicy::new(self.augment)
    }

    ///
    /// Check the archive independent constraints. Group sizes are checked against the
    /// archives when the index table is built.
    ///
    pub fn validate(&self) -> Result<()> {
        if self.kmer == 0 || self.kmer > MAX_KMER {
            return Err(SamplingError::InvalidKmer(self.kmer));
        }
        if self.window_length <= self.kmer {
            return Err(SamplingError::WindowTooShort {
                window_length: self.window_length,
                kmer: self.kmer,
            });
        }
        if self.batch_size == 0 {
            return Err(SamplingError::ZeroBatchSize);
        }
        if self.batches_per_epoch == 0 {
            return Err(SamplingError::ZeroBatchesPerEpoch);
        }
        if self.group_size == Some(0) {
            return Err(SamplingError::ZeroGroupSize);
        }
        Ok(())
    }
}

impl TryFrom<&Path> for GeneratorConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> std::result::Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}
