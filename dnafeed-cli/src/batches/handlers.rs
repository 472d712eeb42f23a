use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use dnafeed_core::{DirectoryOpener, find_archives};
use dnafeed_sampling::{Batch, BatchGenerator, GeneratorConfig};

use super::cli::{DEFAULT_CHUNK_SIZE, DEFAULT_EPOCHS};

///
/// Order-sensitive digest of a batch's features, for comparing runs.
///
pub fn batch_checksum(batch: &Batch) -> u64 {
    batch.features.iter().fold(0u64, |acc, &code| {
        acc.wrapping_mul(31).wrapping_add(code as u64)
    })
}

pub fn run_batches(matches: &ArgMatches) -> Result<()> {
    let root = matches
        .get_one::<String>("root")
        .expect("A path to an archive folder is required.");
    let config_path = matches
        .get_one::<String>("config")
        .expect("A generator config is required.");
    let epochs = matches
        .get_one::<usize>("epochs")
        .copied()
        .unwrap_or(DEFAULT_EPOCHS);
    let chunk = matches
        .get_one::<usize>("chunk")
        .copied()
        .unwrap_or(DEFAULT_CHUNK_SIZE)
        .max(1);

    let mut config = GeneratorConfig::try_from(Path::new(config_path))
        .with_context(|| format!("Failed to read generator config {config_path}"))?;
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.rng_seed = *seed;
    }

    let paths = find_archives(Path::new(root))?;
    let mut generator = BatchGenerator::open(&paths, &DirectoryOpener, config)?;

    let progress = ProgressBar::new((epochs * generator.len()) as u64);
    progress.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} batches",
    )?);

    for epoch in 0..epochs {
        let mut checksum = 0u64;
        let mut start = 0;
        while start < generator.len() {
            let end = (start + chunk).min(generator.len());
            for batch in generator.get_batches(start..end)? {
                checksum = checksum.rotate_left(7) ^ batch_checksum(&batch);
            }
            progress.inc((end - start) as u64);
            start = end;
        }

        let mut draws = vec![0usize; paths.len()];
        for &archive in generator.index_table().archives().iter() {
            draws[archive] += 1;
        }
        progress.suspend(|| {
            println!(
                "epoch {epoch}\tshape {:?}\tchecksum {checksum:016x}\tdraws per archive {:?}",
                generator.feature_shape(),
                draws
            )
        });

        if epoch + 1 < epochs {
            generator.on_epoch_boundary()?;
        }
    }
    progress.finish();

    info!("Served {} epochs of {} batches", epochs, generator.len());
    generator.close();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;
    use rstest::rstest;

    #[rstest]
    fn test_checksum_is_order_sensitive() {
        let a = Batch {
            features: array![[1u32, 2]].into_dyn(),
            labels: None,
        };
        let b = Batch {
            features: array![[2u32, 1]].into_dyn(),
            labels: None,
        };
        assert_ne!(batch_checksum(&a), batch_checksum(&b));
    }
}
