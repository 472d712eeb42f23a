use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::Path;

use anyhow::Result;
use clap::ArgMatches;
use ndarray::Array4;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use dnafeed_core::{DirectoryOpener, find_archives};
use dnafeed_sampling::{SubsampleOptions, random_subsamples_from_paths};

use super::cli::DEFAULT_REPETITIONS;

///
/// Dense subsample array flattened in row-major order.
///
#[derive(Serialize, Debug, PartialEq)]
pub struct SubsampleOutput {
    pub archives: Vec<String>,
    pub shape: Vec<usize>,
    pub data: Vec<u8>,
}

impl SubsampleOutput {
    pub fn new(archives: &[impl AsRef<Path>], subsamples: &Array4<u8>) -> Self {
        Self {
            archives: archives
                .iter()
                .map(|path| path.as_ref().display().to_string())
                .collect(),
            shape: subsamples.shape().to_vec(),
            data: subsamples.iter().copied().collect(),
        }
    }
}

pub fn run_subsample(matches: &ArgMatches) -> Result<()> {
    let root = matches
        .get_one::<String>("root")
        .expect("A path to an archive folder is required.");
    let window_length = *matches
        .get_one::<usize>("length")
        .expect("A window length is required.");
    let group_size = *matches
        .get_one::<usize>("group")
        .expect("A group size is required.");
    let seed = *matches
        .get_one::<u64>("seed")
        .expect("A random seed is required.");
    let repetitions = matches
        .get_one::<usize>("repetitions")
        .copied()
        .unwrap_or(DEFAULT_REPETITIONS);

    let options = SubsampleOptions {
        window_length,
        group_size,
        repetitions,
        augment: matches.get_flag("augment"),
        balance: matches.get_flag("balance"),
    };

    let paths = find_archives(Path::new(root))?;
    let mut rng = StdRng::seed_from_u64(seed);
    let subsamples = random_subsamples_from_paths(&paths, &DirectoryOpener, &options, &mut rng)?;
    let output = SubsampleOutput::new(&paths, &subsamples);

    let mut writer: Box<dyn Write> = match matches.get_one::<String>("output") {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(stdout())),
    };
    serde_json::to_writer(&mut writer, &output)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::Array;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_output_is_row_major() {
        let subsamples = Array::from_shape_vec((1, 1, 2, 2), vec![0u8, 1, 2, 3]).unwrap();
        let output = SubsampleOutput::new(&["a"], &subsamples);
        assert_eq!(output.shape, vec![1, 1, 2, 2]);
        assert_eq!(output.data, vec![0, 1, 2, 3]);
        assert_eq!(output.archives, vec!["a".to_string()]);
    }
}
