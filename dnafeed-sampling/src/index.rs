use ndarray::{Array2, Array3, ArrayView1, ArrayView2, ArrayView3, s};
use rand::Rng;
use rand::seq::index;

use crate::errors::{Result, SamplingError};
use crate::policy::{AugmentPolicy, BalancePolicy};

///
/// Shape of one epoch: `batches_per_epoch` batches of `batch_size` slots, each slot
/// holding one sequence or, in group mode, `group_size` distinct sequences from the
/// same archive.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingShape {
    pub batches_per_epoch: usize,
    pub batch_size: usize,
    pub group_size: Option<usize>,
}

impl SamplingShape {
    pub fn single(batches_per_epoch: usize, batch_size: usize) -> Self {
        Self {
            batches_per_epoch,
            batch_size,
            group_size: None,
        }
    }

    pub fn grouped(batches_per_epoch: usize, batch_size: usize, group_size: usize) -> Self {
        Self {
            batches_per_epoch,
            batch_size,
            group_size: Some(group_size),
        }
    }

    pub fn is_grouped(&self) -> bool {
        self.group_size.is_some()
    }

    /// Sequences per slot.
    pub fn members(&self) -> usize {
        self.group_size.unwrap_or(1)
    }
}

///
/// Check that sampling from archives of these lengths is possible at all.
///
pub(crate) fn validate_lengths<S: AsRef<str>>(lengths: &[usize], names: &[S]) -> Result<()> {
    if lengths.is_empty() {
        return Err(SamplingError::NoArchives);
    }
    if let Some(index) = lengths.iter().position(|&len| len == 0) {
        return Err(SamplingError::EmptyArchive {
            index,
            name: names
                .get(index)
                .map(|name| name.as_ref().to_string())
                .unwrap_or_default(),
        });
    }
    Ok(())
}

///
/// Check that `group_size` distinct keys can be drawn from every archive.
///
pub(crate) fn validate_group_size(group_size: usize, effective_lengths: &[usize]) -> Result<()> {
    if group_size == 0 {
        return Err(SamplingError::ZeroGroupSize);
    }
    let smallest = effective_lengths
        .iter()
        .enumerate()
        .min_by_key(|(_, len)| **len);
    if let Some((archive, &available)) = smallest {
        if group_size > available {
            return Err(SamplingError::GroupTooLarge {
                group_size,
                available,
                archive,
            });
        }
    }
    Ok(())
}

///
/// The materialized draws for one epoch.
///
/// For every `(batch, slot)` the table stores the archive to read from; for every
/// `(batch, slot, member)` the sequence key and, when augmenting, the fraction that places
/// the window inside the sequence. Single-sequence tables have one member per slot.
///
#[derive(Debug, Clone, PartialEq)]
pub struct IndexTable {
    shape: SamplingShape,
    archives: Array2<usize>,
    keys: Array3<usize>,
    augments: Option<Array3<f64>>,
}

impl IndexTable {
    ///
    /// Draw a fresh epoch.
    ///
    /// Draw order is fixed so a seeded `rng` always reproduces the same table:
    /// archive indices row-major first, then keys slot by slot, then augment fractions.
    ///
    /// # Arguments
    /// * `lengths` - number of sequences in each archive (all >= 1)
    /// * `shape` - epoch shape
    /// * `balance` - clamp every archive's key range to the smallest archive
    /// * `augment` - draw window placement fractions
    /// * `rng` - generator state, advanced by the draws
    ///
    pub fn build<R: Rng>(
        lengths: &[usize],
        shape: SamplingShape,
        balance: BalancePolicy,
        augment: AugmentPolicy,
        rng: &mut R,
    ) -> Result<Self> {
        validate_lengths::<&str>(lengths, &[])?;
        if shape.batch_size == 0 {
            return Err(SamplingError::ZeroBatchSize);
        }
        if shape.batches_per_epoch == 0 {
            return Err(SamplingError::ZeroBatchesPerEpoch);
        }

        let effective_lengths = balance.effective_lengths(lengths);
        if let Some(group_size) = shape.group_size {
            validate_group_size(group_size, &effective_lengths)?;
        }

        let slots = shape.batches_per_epoch * shape.batch_size;
        let members = shape.members();

        let archives: Vec<usize> = (0..slots)
            .map(|_| rng.random_range(0..lengths.len()))
            .collect();

        let mut keys = Vec::with_capacity(slots * members);
        for &archive in archives.iter() {
            let available = effective_lengths[archive];
            match shape.group_size {
                None => keys.push(rng.random_range(0..available)),
                Some(group_size) => keys.extend(index::sample(rng, available, group_size).iter()),
            }
        }

        let augments = if augment.is_enabled() {
            let fractions: Vec<f64> = (0..slots * members)
                .filter_map(|_| augment.draw(rng))
                .collect();
            Some(Array3::from_shape_vec(
                (shape.batches_per_epoch, shape.batch_size, members),
                fractions,
            )?)
        } else {
            None
        };

        Ok(Self {
            shape,
            archives: Array2::from_shape_vec((shape.batches_per_epoch, shape.batch_size), archives)?,
            keys: Array3::from_shape_vec((shape.batches_per_epoch, shape.batch_size, members), keys)?,
            augments,
        })
    }

    pub fn shape(&self) -> SamplingShape {
        self.shape
    }

    pub fn archive(&self, batch: usize, slot: usize) -> usize {
        self.archives[[batch, slot]]
    }

    pub fn key(&self, batch: usize, slot: usize, member: usize) -> usize {
        self.keys[[batch, slot, member]]
    }

    /// Window placement fraction, `None` when the table was built without augmentation.
    pub fn augment_fraction(&self, batch: usize, slot: usize, member: usize) -> Option<f64> {
        self.augments
            .as_ref()
            .map(|augments| augments[[batch, slot, member]])
    }

    /// Archive index of every slot in a batch.
    pub fn archive_row(&self, batch: usize) -> ArrayView1<'_, usize> {
        self.archives.row(batch)
    }

    /// The keys drawn for one slot.
    pub fn group(&self, batch: usize, slot: usize) -> ArrayView1<'_, usize> {
        self.keys.slice(s![batch, slot, ..])
    }

    pub fn archives(&self) -> ArrayView2<'_, usize> {
        self.archives.view()
    }

    pub fn keys(&self) -> ArrayView3<'_, usize> {
        self.keys.view()
    }
}
