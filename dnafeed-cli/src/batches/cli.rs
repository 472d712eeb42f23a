use clap::{Arg, Command, arg, value_parser};

pub const BATCHES_CMD: &str = "batches";
pub const DEFAULT_EPOCHS: usize = 1;
pub const DEFAULT_CHUNK_SIZE: usize = 16;

pub fn create_batches_cli() -> Command {
    Command::new(BATCHES_CMD)
        .about("Run the batch generator over the archives under a folder and summarize every epoch.")
        .arg(Arg::new("root").required(true))
        .arg(arg!(--config <config> "Generator config (TOML)").required(true))
        .arg(arg!(--epochs <epochs> "Number of epochs").value_parser(value_parser!(usize)))
        .arg(arg!(--seed <seed> "Override the seed from the config").value_parser(value_parser!(u64)))
        .arg(
            arg!(--chunk <chunk> "Batches produced in parallel at a time")
                .value_parser(value_parser!(usize)),
        )
}
