use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use dnafeed_core::{Archive, DirectoryArchive, encode_bases};

///
/// Read sequences from `input`, one per line, skipping blank lines.
///
pub fn read_sequences(input: &Path) -> Result<Vec<Vec<u8>>> {
    let file = File::open(input).with_context(|| format!("Can't open {}", input.display()))?;
    let mut sequences = vec![];
    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            sequences.push(encode_bases(line));
        }
    }
    Ok(sequences)
}

pub fn run_pack(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("A path to a sequence file is required.");
    let output = matches
        .get_one::<String>("output")
        .expect("An output folder is required.");

    let sequences = read_sequences(Path::new(input))?;
    if sequences.is_empty() {
        anyhow::bail!("No sequences found in {}", input);
    }
    let archive = DirectoryArchive::create(Path::new(output), sequences)?;

    info!("Packed {} sequences into {}", archive.len(), output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_read_sequences() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("reads.txt");
        std::fs::write(&input, "ACGT\n\n  ggna  \n").unwrap();

        let sequences = read_sequences(&input).unwrap();
        assert_eq!(sequences, vec![vec![0, 1, 2, 3], vec![2, 2, 4, 0]]);
    }
}
