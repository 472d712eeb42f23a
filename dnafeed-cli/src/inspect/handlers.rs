use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use dnafeed_core::{Archive, DirectoryArchive, find_archives};

pub fn run_inspect(matches: &ArgMatches) -> Result<()> {
    let root = matches
        .get_one::<String>("root")
        .expect("A path to an archive folder is required.");

    let paths = find_archives(Path::new(root))?;
    if paths.is_empty() {
        anyhow::bail!("No archives found under {}", root);
    }

    let mut total = 0;
    for (index, path) in paths.iter().enumerate() {
        let archive = DirectoryArchive::open(path)
            .with_context(|| format!("Failed to open archive {}", path.display()))?;
        total += archive.len();
        println!("{index}\t{}\t{}", archive.len(), path.display());
    }
    println!("{} archives, {} sequences", paths.len(), total);

    Ok(())
}
