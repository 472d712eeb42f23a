use std::path::Path;

use log::info;
use ndarray::Array4;
use rand::Rng;
use rand::seq::index;

use dnafeed_core::{Archive, ArchiveOpener};

use crate::errors::{Result, SamplingError};
use crate::fetch::{Draw, close_archives, open_archives, read_window};
use crate::index::{validate_group_size, validate_lengths};
use crate::policy::{AugmentPolicy, BalancePolicy};
use crate::window::WindowExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsampleOptions {
    pub window_length: usize,
    pub group_size: usize,
    pub repetitions: usize,
    pub augment: bool,
    pub balance: bool,
}

impl SubsampleOptions {
    pub fn new(window_length: usize, group_size: usize) -> Self {
        Self {
            window_length,
            group_size,
            repetitions: 1,
            augment: true,
            balance: false,
        }
    }
}

///
/// Draw `repetitions` groups of `group_size` distinct sequences from every archive.
///
/// This is a one-shot sampler for evaluation and inspection; it has no epoch lifecycle.
/// Augment fractions (if any) are drawn first for the whole output, then keys archive by
/// archive, so a seeded `rng` reproduces the result.
///
/// Returns base codes shaped `(archives, repetitions, group_size, window_length)`. In
/// errors, `batch` holds the repetition index.
///
pub fn random_subsamples<A: Archive, R: Rng>(
    archives: &[A],
    options: &SubsampleOptions,
    rng: &mut R,
) -> Result<Array4<u8>> {
    let lengths: Vec<usize> = archives.iter().map(|archive| archive.len()).collect();
    let names: Vec<&str> = archives.iter().map(|archive| archive.name()).collect();
    validate_lengths(&lengths, &names)?;

    let effective_lengths = BalancePolicy::new(options.balance).effective_lengths(&lengths);
    validate_group_size(options.group_size, &effective_lengths)?;
    if options.window_length == 0 {
        return Err(SamplingError::ZeroWindowLength);
    }

    let augment = AugmentPolicy::new(options.augment);
    let extractor = WindowExtractor::new(options.window_length);
    let groups = archives.len() * options.repetitions;

    let fractions: Vec<Option<f64>> = (0..groups * options.group_size)
        .map(|_| augment.draw(rng))
        .collect();

    let mut data = Vec::with_capacity(groups * options.group_size * options.window_length);
    for (archive_index, archive) in archives.iter().enumerate() {
        for repetition in 0..options.repetitions {
            let keys = index::sample(rng, effective_lengths[archive_index], options.group_size);
            let group = archive_index * options.repetitions + repetition;
            for (member, key) in keys.iter().enumerate() {
                let draw = Draw {
                    archive,
                    archive_index,
                    key,
                    batch: repetition,
                    fraction: fractions[group * options.group_size + member],
                };
                read_window(draw, &extractor, augment, &mut data)?;
            }
        }
    }

    info!(
        "Subsampled {} x {} groups of {} windows",
        archives.len(),
        options.repetitions,
        options.group_size
    );

    Ok(Array4::from_shape_vec(
        (
            archives.len(),
            options.repetitions,
            options.group_size,
            options.window_length,
        ),
        data,
    )?)
}

///
/// Open the archives at `paths`, subsample them and close them again.
///
pub fn random_subsamples_from_paths<O, P, R>(
    paths: &[P],
    opener: &O,
    options: &SubsampleOptions,
    rng: &mut R,
) -> Result<Array4<u8>>
where
    O: ArchiveOpener,
    P: AsRef<Path>,
    R: Rng,
{
    let mut archives = open_archives(paths, opener)?;
    let result = random_subsamples(&archives, options, rng);
    close_archives(&mut archives);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::*;

    use dnafeed_core::{DirectoryArchive, DirectoryOpener, InMemoryArchive};

    /// Sequence `i` of archive `a` starts with the marker `[a, i / 5, i % 5]`.
    fn tagged_archive(archive: u8, len: usize, sequence_length: usize) -> InMemoryArchive {
        let sequences = (0..len)
            .map(|i| {
                let mut sequence = vec![archive, (i / 5) as u8, (i % 5) as u8];
                sequence.resize(sequence_length, 4);
                sequence
            })
            .collect();
        InMemoryArchive::new(format!("sample{archive}"), sequences)
    }

    #[fixture]
    fn archives() -> Vec<InMemoryArchive> {
        vec![
            tagged_archive(0, 10, 3),
            tagged_archive(1, 20, 3),
            tagged_archive(2, 24, 3),
        ]
    }

    fn key_of(window: &[u8]) -> usize {
        window[1] as usize * 5 + window[2] as usize
    }

    #[rstest]
    fn test_shape_and_distinct_keys(archives: Vec<InMemoryArchive>) {
        let options = SubsampleOptions {
            window_length: 3,
            group_size: 5,
            repetitions: 4,
            augment: false,
            balance: false,
        };
        let result = random_subsamples(&archives, &options, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(result.dim(), (3, 4, 5, 3));

        for (archive, per_archive) in result.outer_iter().enumerate() {
            for group in per_archive.outer_iter() {
                let mut keys: Vec<usize> = group
                    .outer_iter()
                    .map(|window| {
                        assert_eq!(window[0] as usize, archive);
                        key_of(window.as_slice().unwrap())
                    })
                    .collect();
                keys.sort_unstable();
                keys.dedup();
                assert_eq!(keys.len(), 5);
            }
        }
    }

    #[rstest]
    fn test_balance_limits_keys(archives: Vec<InMemoryArchive>) {
        let options = SubsampleOptions {
            window_length: 3,
            group_size: 10,
            repetitions: 3,
            augment: false,
            balance: true,
        };
        let result = random_subsamples(&archives, &options, &mut StdRng::seed_from_u64(2)).unwrap();
        for window in result.into_shape((3 * 3 * 10, 3)).unwrap().outer_iter() {
            assert!(key_of(window.as_slice().unwrap()) < 10);
        }
    }

    #[rstest]
    fn test_group_too_large(archives: Vec<InMemoryArchive>) {
        let options = SubsampleOptions::new(3, 11);
        let result = random_subsamples(&archives, &options, &mut StdRng::seed_from_u64(0));
        assert!(matches!(
            result,
            Err(SamplingError::GroupTooLarge { archive: 0, .. })
        ));
    }

    #[rstest]
    fn test_zero_window_length(archives: Vec<InMemoryArchive>) {
        let result = random_subsamples(
            &archives,
            &SubsampleOptions::new(0, 2),
            &mut StdRng::seed_from_u64(0),
        );
        let err = result.unwrap_err();
        assert!(matches!(err, SamplingError::ZeroWindowLength));
        assert!(err.is_configuration());
        assert!(!err.to_string().contains("k-mer"));
    }

    #[rstest]
    fn test_reproducible(archives: Vec<InMemoryArchive>) {
        let options = SubsampleOptions {
            repetitions: 2,
            ..SubsampleOptions::new(3, 4)
        };
        let a = random_subsamples(&archives, &options, &mut StdRng::seed_from_u64(8)).unwrap();
        let b = random_subsamples(&archives, &options, &mut StdRng::seed_from_u64(8)).unwrap();
        assert_eq!(a, b);
    }

    #[rstest]
    fn test_augmented_windows_are_subsequences() {
        let sequence: Vec<u8> = (0..40).map(|i| (i % 5) as u8).collect();
        let archives = vec![InMemoryArchive::new("cyclic", vec![sequence.clone(); 6])];
        let options = SubsampleOptions {
            repetitions: 8,
            ..SubsampleOptions::new(7, 6)
        };
        let result = random_subsamples(&archives, &options, &mut StdRng::seed_from_u64(3)).unwrap();
        for window in result.into_shape((8 * 6, 7)).unwrap().outer_iter() {
            let window = window.to_vec();
            assert!(sequence.windows(7).any(|candidate| candidate == window.as_slice()));
        }
    }

    #[rstest]
    fn test_from_paths() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<_> = (0..2)
            .map(|i| {
                let path = dir.path().join(format!("s{i}"));
                DirectoryArchive::create(&path, vec![vec![i as u8; 5]; 4]).unwrap();
                path
            })
            .collect();

        let options = SubsampleOptions::new(5, 2);
        let result = random_subsamples_from_paths(
            &paths,
            &DirectoryOpener,
            &options,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();
        assert_eq!(result.dim(), (2, 1, 2, 5));
        assert!(result.slice(ndarray::s![1, .., .., ..]).iter().all(|&b| b == 1));
    }

    #[rstest]
    fn test_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = random_subsamples_from_paths(
            &[dir.path().join("missing")],
            &DirectoryOpener,
            &SubsampleOptions::new(5, 1),
            &mut StdRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(SamplingError::Open { .. })));
    }
}
