mod batches;
mod inspect;
mod pack;
mod subsample;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "dnafeed";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Reproducible sampling of fixed-length training batches from per-sample sequence archives.")
        .subcommand_required(true)
        .subcommand(inspect::cli::create_inspect_cli())
        .subcommand(pack::cli::create_pack_cli())
        .subcommand(subsample::cli::create_subsample_cli())
        .subcommand(batches::cli::create_batches_cli())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        Some((inspect::cli::INSPECT_CMD, matches)) => {
            inspect::handlers::run_inspect(matches)?;
        }

        Some((pack::cli::PACK_CMD, matches)) => {
            pack::handlers::run_pack(matches)?;
        }

        Some((subsample::cli::SUBSAMPLE_CMD, matches)) => {
            subsample::handlers::run_subsample(matches)?;
        }

        Some((batches::cli::BATCHES_CMD, matches)) => {
            batches::handlers::run_batches(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }
}
