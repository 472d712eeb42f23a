use std::ops::Range;
use std::path::Path;

use log::{debug, info, warn};
use ndarray::{Array1, ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dnafeed_core::{Archive, ArchiveOpener};

use crate::config::GeneratorConfig;
use crate::errors::{Result, SamplingError};
use crate::fetch::{Draw, close_archives, open_archives, read_window};
use crate::index::{IndexTable, validate_lengths};
use crate::kmer::KmerEncoder;
use crate::labels::Batch;
use crate::policy::{AugmentPolicy, BalancePolicy};
use crate::window::WindowExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    /// The index table is current and batches can be served.
    Ready,
    /// The index table is being (or failed to be) rebuilt.
    NeedsShuffle,
    /// Archive handles were released.
    Closed,
}

///
/// Serves fixed-shape batches of k-mer encoded windows from a set of archives.
///
/// One generator covers both sampling modes: with `group_size` unset every batch slot
/// holds one window, with `group_size = Some(g)` it holds `g` windows of distinct
/// sequences from the same archive.
///
/// The generator owns its archives and its random number generator. Each epoch is
/// materialized as an [`IndexTable`] up front, so `get_batch` is a pure lookup: requesting
/// the same batch twice gives the same result until [`on_epoch_boundary`] draws a new
/// epoch. Nothing is scheduled implicitly; the training loop calls `on_epoch_boundary`.
///
/// [`on_epoch_boundary`]: BatchGenerator::on_epoch_boundary
///
pub struct BatchGenerator<A: Archive, R: Rng = StdRng> {
    archives: Vec<A>,
    lengths: Vec<usize>,
    effective_lengths: Vec<usize>,
    config: GeneratorConfig,
    balance: BalancePolicy,
    augment: AugmentPolicy,
    extractor: WindowExtractor,
    encoder: KmerEncoder,
    rng: R,
    table: IndexTable,
    state: GeneratorState,
    epoch: usize,
}

impl<A: Archive> BatchGenerator<A, StdRng> {
    ///
    /// Create a generator whose random state is seeded from `config.rng_seed`.
    ///
    pub fn from_seed(archives: Vec<A>, config: GeneratorConfig) -> Result<Self> {
        let rng = StdRng::seed_from_u64(config.rng_seed);
        Self::new(archives, config, rng)
    }

    ///
    /// Open archives at `paths` and create a seeded generator over them.
    ///
    pub fn open<O, P>(paths: &[P], opener: &O, config: GeneratorConfig) -> Result<Self>
    where
        O: ArchiveOpener<Archive = A>,
        P: AsRef<Path>,
    {
        let archives = open_archives(paths, opener)?;
        Self::from_seed(archives, config)
    }
}

/// Everything derived from the archives and the config before the generator exists.
struct Setup {
    lengths: Vec<usize>,
    effective_lengths: Vec<usize>,
    encoder: KmerEncoder,
    table: IndexTable,
}

impl<A: Archive, R: Rng> BatchGenerator<A, R> {
    ///
    /// Create a generator and draw its first epoch.
    ///
    /// The generator takes ownership of `archives`. If construction fails they are closed
    /// before the error is returned.
    ///
    /// # Arguments
    /// * `archives` - opened archives, owned (and eventually closed) by the generator
    /// * `config` - sampling configuration
    /// * `rng` - random state used for this and every later epoch
    ///
    pub fn new(mut archives: Vec<A>, config: GeneratorConfig, mut rng: R) -> Result<Self> {
        let setup = match Self::setup(&archives, &config, &mut rng) {
            Ok(setup) => setup,
            Err(err) => {
                close_archives(&mut archives);
                return Err(err);
            }
        };

        info!(
            "Batch generator over {} archives (effective lengths {:?}): window {}, k {}, {} batches of {}{}",
            archives.len(),
            setup.effective_lengths,
            config.window_length,
            config.kmer,
            config.batches_per_epoch,
            config.batch_size,
            config
                .group_size
                .map(|group_size| format!(" x {group_size}"))
                .unwrap_or_default()
        );

        Ok(Self {
            extractor: WindowExtractor::new(config.window_length),
            balance: config.balance_policy(),
            augment: config.augment_policy(),
            encoder: setup.encoder,
            archives,
            lengths: setup.lengths,
            effective_lengths: setup.effective_lengths,
            rng,
            table: setup.table,
            config,
            state: GeneratorState::Ready,
            epoch: 0,
        })
    }

    fn setup(archives: &[A], config: &GeneratorConfig, rng: &mut R) -> Result<Setup> {
        config.validate()?;
        let encoder = KmerEncoder::new(config.kmer)?;

        let lengths: Vec<usize> = archives.iter().map(|archive| archive.len()).collect();
        let names: Vec<&str> = archives.iter().map(|archive| archive.name()).collect();
        validate_lengths(&lengths, &names)?;

        let balance = config.balance_policy();
        let effective_lengths = balance.effective_lengths(&lengths);

        if balance.is_enabled() {
            let largest = lengths.iter().copied().max().unwrap_or(0);
            if effective_lengths[0] * 2 < largest {
                warn!(
                    "Balancing uses {} of {} sequences in the largest archive",
                    effective_lengths[0], largest
                );
            }
        }

        let table = IndexTable::build(
            &lengths,
            config.shape(),
            balance,
            config.augment_policy(),
            rng,
        )?;

        Ok(Setup {
            lengths,
            effective_lengths,
            encoder,
            table,
        })
    }

    /// Batches per epoch.
    pub fn len(&self) -> usize {
        self.config.batches_per_epoch
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    /// Number of completed epoch boundaries.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn index_table(&self) -> &IndexTable {
        &self.table
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// The key range drawn from per archive, after balancing.
    pub fn effective_lengths(&self) -> &[usize] {
        &self.effective_lengths
    }

    /// The owned archive handles, in index order.
    pub fn archives(&self) -> &[A] {
        &self.archives
    }

    pub fn archive_names(&self) -> Vec<&str> {
        self.archives.iter().map(|archive| archive.name()).collect()
    }

    /// Shape of the feature tensor of every batch.
    pub fn feature_shape(&self) -> Vec<usize> {
        let mut shape = self.window_shape();
        if let Some(last) = shape.last_mut() {
            *last = self.encoder.output_len(self.config.window_length);
        }
        shape
    }

    fn window_shape(&self) -> Vec<usize> {
        match self.config.group_size {
            Some(group_size) => vec![
                self.config.batch_size,
                group_size,
                self.config.window_length,
            ],
            None => vec![self.config.batch_size, self.config.window_length],
        }
    }

    ///
    /// Produce batch `batch_index` of the current epoch.
    ///
    /// The batch is assembled in fresh buffers, so a failure leaves nothing half-written.
    ///
    pub fn get_batch(&self, batch_index: usize) -> Result<Batch> {
        match self.state {
            GeneratorState::Ready => {}
            GeneratorState::NeedsShuffle => return Err(SamplingError::Stale),
            GeneratorState::Closed => return Err(SamplingError::GeneratorClosed),
        }
        if batch_index >= self.len() {
            return Err(SamplingError::IndexOutOfRange {
                index: batch_index,
                len: self.len(),
            });
        }

        let members = self.table.shape().members();
        let window_length = self.config.window_length;
        let mut raw = Vec::with_capacity(self.config.batch_size * members * window_length);
        let mut origin = Vec::with_capacity(self.config.batch_size);

        for slot in 0..self.config.batch_size {
            let archive_index = self.table.archive(batch_index, slot);
            origin.push(archive_index as u32);
            for member in 0..members {
                let draw = Draw {
                    archive: &self.archives[archive_index],
                    archive_index,
                    key: self.table.key(batch_index, slot, member),
                    batch: batch_index,
                    fraction: self.table.augment_fraction(batch_index, slot, member),
                };
                read_window(draw, &self.extractor, self.augment, &mut raw)?;
            }
        }

        let features = self.encode(&raw);
        let raw = ArrayD::from_shape_vec(IxDyn(&self.window_shape()), raw)?;
        let features = ArrayD::from_shape_vec(IxDyn(&self.feature_shape()), features)?;

        Ok(self
            .config
            .label_mode
            .package(raw, features, Array1::from(origin)))
    }

    fn encode(&self, raw: &[u8]) -> Vec<u32> {
        if self.encoder.is_identity() {
            return raw.iter().map(|&base| base as u32).collect();
        }
        let window_length = self.config.window_length;
        let out_len = self.encoder.output_len(window_length);
        let mut features = vec![0; (raw.len() / window_length) * out_len];
        for (window, out) in raw
            .chunks_exact(window_length)
            .zip(features.chunks_exact_mut(out_len))
        {
            self.encoder.encode_into(window, out);
        }
        features
    }

    /// All batches of the current epoch, in order.
    pub fn iter(&self) -> impl Iterator<Item = Result<Batch>> + '_ {
        (0..self.len()).map(move |batch_index| self.get_batch(batch_index))
    }

    ///
    /// Draw the next epoch. Must be called by the training loop after every epoch.
    ///
    pub fn on_epoch_boundary(&mut self) -> Result<()> {
        if self.state == GeneratorState::Closed {
            return Err(SamplingError::GeneratorClosed);
        }
        self.state = GeneratorState::NeedsShuffle;
        self.table = IndexTable::build(
            &self.lengths,
            self.config.shape(),
            self.balance,
            self.augment,
            &mut self.rng,
        )?;
        self.state = GeneratorState::Ready;
        self.epoch += 1;

        debug!("Drew index table for epoch {}", self.epoch);
        Ok(())
    }

    ///
    /// Release all archive handles. Safe to call more than once; also run on drop.
    ///
    pub fn close(&mut self) {
        if self.state == GeneratorState::Closed {
            return;
        }
        close_archives(&mut self.archives);
        self.state = GeneratorState::Closed;
    }
}

impl<A: Archive + Sync, R: Rng + Sync> BatchGenerator<A, R> {
    ///
    /// Produce a range of batches of the current epoch on the rayon thread pool.
    ///
    /// The output equals calling [`get_batch`](Self::get_batch) for each index in order.
    ///
    #[cfg(feature = "parallel")]
    pub fn get_batches(&self, batch_indices: Range<usize>) -> Result<Vec<Batch>> {
        use rayon::prelude::*;

        batch_indices
            .into_par_iter()
            .map(|batch_index| self.get_batch(batch_index))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    pub fn get_batches(&self, batch_indices: Range<usize>) -> Result<Vec<Batch>> {
        batch_indices
            .map(|batch_index| self.get_batch(batch_index))
            .collect()
    }
}

impl<A: Archive, R: Rng> Drop for BatchGenerator<A, R> {
    fn drop(&mut self) {
        self.close();
    }
}
